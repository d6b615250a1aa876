use async_trait::async_trait;

use crate::error::{Operation, UpstreamFailure};
use crate::schemas::SchemaHandle;

/// One call to the text-generation service.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub operation: Operation,
    pub instruction: String,
    /// Output contract the service is asked to honour.
    pub schema: SchemaHandle,
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
}

impl GenerationRequest {
    pub fn new(operation: Operation, instruction: impl Into<String>, schema: SchemaHandle) -> Self {
        Self {
            operation,
            instruction: instruction.into(),
            schema,
            temperature: None,
            top_p: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_top_p(mut self, top_p: f32) -> Self {
        self.top_p = Some(top_p);
        self
    }
}

/// A service that turns an instruction and an output schema into raw text.
///
/// Implementations return the text exactly as produced. Parsing and validation belong to
/// the planner, so a double only needs to hand back canned strings.
#[async_trait]
pub trait TextGenerator: Send + Sync + std::fmt::Debug {
    async fn generate_text(&self, request: &GenerationRequest) -> Result<String, UpstreamFailure>;
}
