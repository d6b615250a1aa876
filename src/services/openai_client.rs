use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::config::PlannerConfig;
use crate::error::{ItineraryError, Result, UpstreamFailure};
use crate::services::generator::{GenerationRequest, TextGenerator};

/// Chat-completions client for OpenAI-compatible endpoints (OpenRouter by default).
///
/// Each call is a single HTTP request. Rate limiting and server errors are reported to
/// the caller instead of being retried here.
#[derive(Clone, Debug)]
pub struct OpenAIClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    max_tokens: Option<u32>,
}

impl OpenAIClient {
    pub fn from_config(config: &PlannerConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(|err| {
            ItineraryError::Config(format!("Failed to build HTTP client: {err}"))
        })?;

        Ok(Self {
            http,
            api_key: config.api_key().to_string(),
            base_url: config.base_url().to_string(),
            model: config.model().to_string(),
            max_tokens: config.max_tokens(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub async fn chat_completion(&self, body: &Value) -> std::result::Result<Value, UpstreamFailure> {
        let request_url = build_chat_url(&self.base_url);

        let response = self
            .http
            .post(&request_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .header("X-Title", "itinerae")
            .json(body)
            .send()
            .await
            .map_err(|err| UpstreamFailure::Transport(format!("HTTP request failed: {err}")))?;

        let status = response.status();
        let headers = response.headers().clone();
        let response_text = response
            .text()
            .await
            .map_err(|err| UpstreamFailure::Transport(format!("Failed to read response: {err}")))?;

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = headers
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.parse::<u64>().ok());
            warn!(target: "itinerae::client", ?retry_after, "rate limited by provider");
            return Err(UpstreamFailure::RateLimited { retry_after });
        }

        let response_json: Option<Value> = serde_json::from_str(&response_text).ok();

        if !status.is_success() {
            let api_message = response_json
                .as_ref()
                .and_then(api_error_message)
                .unwrap_or(response_text);
            return Err(UpstreamFailure::Transport(format!(
                "HTTP {} error: {}",
                status, api_message
            )));
        }

        let response_json = response_json.ok_or_else(|| {
            UpstreamFailure::Transport("Provider returned a non-JSON envelope".to_string())
        })?;

        if let Some(message) = api_error_message(&response_json) {
            return Err(UpstreamFailure::Transport(format!("API error: {message}")));
        }

        Ok(response_json)
    }
}

#[async_trait]
impl TextGenerator for OpenAIClient {
    async fn generate_text(
        &self,
        request: &GenerationRequest,
    ) -> std::result::Result<String, UpstreamFailure> {
        let body = ChatCompletionRequest::new(
            &self.model,
            vec![json!({ "role": "user", "content": request.instruction })],
        )
        .with_response_format(request.schema.response_format())
        .with_temperature(request.temperature)
        .with_top_p(request.top_p)
        .with_max_tokens(self.max_tokens)
        .into_value();

        debug!(
            target: "itinerae::client",
            operation = %request.operation,
            model = %self.model,
            "sending chat completion request"
        );

        let response = self.chat_completion(&body).await?;
        extract_message_content(&response)
    }
}

fn api_error_message(body: &Value) -> Option<String> {
    let error = body.get("error")?;
    Some(
        error
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| error.to_string()),
    )
}

/// `choices[0].message.content`, the only part of the envelope the planner needs.
fn extract_message_content(response: &Value) -> std::result::Result<String, UpstreamFailure> {
    response
        .get("choices")
        .and_then(|choices| choices.get(0))
        .and_then(|choice| choice.get("message"))
        .and_then(|message| message.get("content"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or(UpstreamFailure::EmptyResponse)
}

fn build_chat_url(base_url: &str) -> String {
    let trimmed = base_url.trim_end_matches('/');
    if trimmed.ends_with("/chat/completions") {
        trimmed.to_string()
    } else {
        format!("{}/chat/completions", trimmed)
    }
}

#[derive(Clone, Debug)]
pub struct ChatCompletionRequest {
    model: String,
    messages: Vec<Value>,
    max_tokens: Option<u32>,
    temperature: Option<f32>,
    top_p: Option<f32>,
    response_format: Option<Value>,
}

impl ChatCompletionRequest {
    pub fn new(model: impl Into<String>, messages: Vec<Value>) -> Self {
        Self {
            model: model.into(),
            messages,
            max_tokens: None,
            temperature: None,
            top_p: None,
            response_format: None,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_top_p(mut self, top_p: Option<f32>) -> Self {
        self.top_p = top_p;
        self
    }

    pub fn with_response_format(mut self, response_format: Value) -> Self {
        self.response_format = Some(response_format);
        self
    }

    pub fn into_value(self) -> Value {
        let mut body = json!({
            "model": self.model,
            "messages": self.messages,
        });

        if let Some(max_tokens) = self.max_tokens {
            body["max_tokens"] = json!(max_tokens);
        }

        if let Some(temperature) = self.temperature {
            body["temperature"] = json!(temperature);
        }

        if let Some(top_p) = self.top_p {
            body["top_p"] = json!(top_p);
        }

        if let Some(response_format) = self.response_format {
            body["response_format"] = response_format;
        }

        body
    }
}
