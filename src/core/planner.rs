use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::PlannerConfig;
use crate::error::{ItineraryError, Operation, Result, UpstreamFailure};
use crate::schemas::contract::validate;
use crate::services::generator::{GenerationRequest, TextGenerator};
use crate::services::openai_client::OpenAIClient;
use crate::services::prompt::{
    build_generation_prompt, build_refinement_prompt, itinerary_response_schema,
};
use crate::types::itinerary::ItineraryPlan;
use crate::types::preferences::TripPreferences;

pub const GENERATION_TEMPERATURE: f32 = 0.8;
pub const GENERATION_TOP_P: f32 = 0.9;
pub const REFINEMENT_TEMPERATURE: f32 = 0.7;

const FENCE: &str = "```";

/// Generates and refines itineraries through a [`TextGenerator`].
///
/// Each operation makes at most one collaborator call. Invalid input is rejected before
/// any call is made, and nothing is retried.
#[derive(Debug, Clone)]
pub struct Planner {
    config: PlannerConfig,
    generator: Arc<dyn TextGenerator>,
}

impl Planner {
    /// Planner backed by the chat-completions client described by `config`.
    pub fn new(config: PlannerConfig) -> Result<Self> {
        let client = OpenAIClient::from_config(&config)?;
        Ok(Self::with_generator(config, Arc::new(client)))
    }

    pub fn with_generator(config: PlannerConfig, generator: Arc<dyn TextGenerator>) -> Self {
        Self { config, generator }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub async fn generate(&self, preferences: &TripPreferences) -> Result<ItineraryPlan> {
        let issues = preferences.issues();
        if !issues.is_empty() {
            debug!(
                target: "itinerae::planner",
                issues = issues.len(),
                "rejecting incomplete preferences"
            );
            return Err(ItineraryError::InvalidPreferences(issues));
        }

        let request = GenerationRequest::new(
            Operation::Generate,
            build_generation_prompt(preferences),
            itinerary_response_schema().clone(),
        )
        .with_temperature(GENERATION_TEMPERATURE)
        .with_top_p(GENERATION_TOP_P);

        let plan = self.execute(request).await?;
        if Some(plan.duration_days) != preferences.trip_duration || !plan.matches_duration() {
            warn!(
                target: "itinerae::planner",
                requested = ?preferences.trip_duration,
                reported = plan.duration_days,
                days = plan.daily_plan.len(),
                "generated plan length differs from the requested duration"
            );
        }
        Ok(plan)
    }

    /// Replace `current` with a version reflecting `request`.
    ///
    /// The request is trimmed before use. The returned plan is a full replacement, never
    /// a merge with `current`.
    pub async fn refine(
        &self,
        current: Option<&ItineraryPlan>,
        request: &str,
    ) -> Result<ItineraryPlan> {
        let current = current.ok_or_else(|| {
            ItineraryError::InvalidRefinementRequest("there is no itinerary to refine".to_string())
        })?;
        let request = request.trim();
        if request.is_empty() {
            return Err(ItineraryError::InvalidRefinementRequest(
                "the refinement request is empty".to_string(),
            ));
        }

        let request = GenerationRequest::new(
            Operation::Refine,
            build_refinement_prompt(current, request)?,
            itinerary_response_schema().clone(),
        )
        .with_temperature(REFINEMENT_TEMPERATURE);

        self.execute(request).await
    }

    async fn execute(&self, request: GenerationRequest) -> Result<ItineraryPlan> {
        let operation = request.operation;
        let started = Instant::now();
        debug!(
            target: "itinerae::planner",
            %operation,
            prompt_chars = request.instruction.len(),
            "requesting itinerary"
        );

        let outcome = match self.generator.generate_text(&request).await {
            Ok(raw) => {
                debug!(target: "itinerae::planner", %operation, raw = %raw, "received payload");
                parse_itinerary(&raw)
            }
            Err(cause) => Err(cause),
        };

        match outcome {
            Ok(plan) => {
                info!(
                    target: "itinerae::planner",
                    %operation,
                    days = plan.daily_plan.len(),
                    activities = plan.activity_count(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "itinerary ready"
                );
                Ok(plan)
            }
            Err(cause) => {
                warn!(
                    target: "itinerae::planner",
                    %operation,
                    code = cause.code(),
                    error = %cause,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "itinerary request failed"
                );
                Err(ItineraryError::upstream(operation, cause))
            }
        }
    }
}

/// Turn raw collaborator text into a validated plan.
///
/// Whitespace-only text is an empty response. A surrounding Markdown code fence is
/// tolerated.
pub fn parse_itinerary(raw: &str) -> std::result::Result<ItineraryPlan, UpstreamFailure> {
    let text = strip_code_fence(raw.trim());
    if text.is_empty() {
        return Err(UpstreamFailure::EmptyResponse);
    }

    let payload: Value = serde_json::from_str(text)?;
    Ok(validate(&payload)?)
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix(FENCE) else {
        return text;
    };
    // drop the language tag, e.g. ```json
    let body = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };
    body.strip_suffix(FENCE).unwrap_or(body).trim()
}
