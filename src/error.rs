use std::fmt;

use thiserror::Error;

pub use crate::schemas::contract::ContractError;
use crate::types::preferences::PreferenceIssue;

/// The two requests the planner can make of the text-generation service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Generate,
    Refine,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Generate => f.write_str("generate"),
            Operation::Refine => f.write_str("refine"),
        }
    }
}

/// Why a call to the text-generation service did not produce a usable itinerary.
#[derive(Error, Debug)]
pub enum UpstreamFailure {
    #[error("transport failure: {0}")]
    Transport(String),

    #[error("rate limit exceeded")]
    RateLimited { retry_after: Option<u64> },

    #[error("the model returned an empty response")]
    EmptyResponse,

    #[error("response is not valid JSON: {0}")]
    MalformedJson(#[from] serde_json::Error),

    #[error("response failed structural validation: {0}")]
    SchemaValidation(#[from] ContractError),
}

impl UpstreamFailure {
    pub fn code(&self) -> &'static str {
        match self {
            UpstreamFailure::Transport(_) => "TRANSPORT_FAILURE",
            UpstreamFailure::RateLimited { .. } => "RATE_LIMITED",
            UpstreamFailure::EmptyResponse => "EMPTY_RESPONSE",
            UpstreamFailure::MalformedJson(_) => "MALFORMED_JSON",
            UpstreamFailure::SchemaValidation(_) => "SCHEMA_VALIDATION_FAILURE",
        }
    }
}

/// Main error type for itinerary planning
#[derive(Error, Debug)]
pub enum ItineraryError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Preferences are incomplete: {}", join_issues(.0))]
    InvalidPreferences(Vec<PreferenceIssue>),

    #[error("Invalid refinement request: {0}")]
    InvalidRefinementRequest(String),

    #[error("A request is already in flight for this session")]
    RequestInFlight,

    #[error("Failed to {operation} itinerary: {cause}")]
    GenerationFailed {
        operation: Operation,
        #[source]
        cause: UpstreamFailure,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

fn join_issues(issues: &[PreferenceIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result type alias
pub type Result<T> = std::result::Result<T, ItineraryError>;

impl ItineraryError {
    pub(crate) fn upstream(operation: Operation, cause: impl Into<UpstreamFailure>) -> Self {
        ItineraryError::GenerationFailed {
            operation,
            cause: cause.into(),
        }
    }

    /// Whether offering the user a manual retry makes sense. Nothing is retried
    /// automatically.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ItineraryError::GenerationFailed { .. } | ItineraryError::RequestInFlight
        )
    }

    /// Local precondition failures, shown inline next to the form rather than as an
    /// error screen.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            ItineraryError::InvalidPreferences(_) | ItineraryError::InvalidRefinementRequest(_)
        )
    }

    /// Get the error code for structured responses
    pub fn error_code(&self) -> &'static str {
        match self {
            ItineraryError::Config(_) => "CONFIG_ERROR",
            ItineraryError::InvalidPreferences(_) => "INVALID_PREFERENCES",
            ItineraryError::InvalidRefinementRequest(_) => "INVALID_REFINEMENT_REQUEST",
            ItineraryError::RequestInFlight => "REQUEST_IN_FLIGHT",
            ItineraryError::GenerationFailed { cause, .. } => cause.code(),
            ItineraryError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// The message shown to the traveller. Upstream failures collapse into one generic
    /// message per operation; the detail stays in logs and [`Self::error_code`].
    pub fn user_message(&self) -> String {
        match self {
            ItineraryError::GenerationFailed {
                operation: Operation::Generate,
                ..
            } => "Sorry, we encountered an issue generating your itinerary. Please try again."
                .to_string(),
            ItineraryError::GenerationFailed {
                operation: Operation::Refine,
                ..
            } => "Sorry, we couldn't refine your itinerary. Please try a different request."
                .to_string(),
            ItineraryError::RequestInFlight => {
                "Your itinerary is still being prepared. Please wait a moment.".to_string()
            }
            other => other.to_string(),
        }
    }

    /// Convert to a structured error payload
    pub fn to_error_payload(&self) -> serde_json::Value {
        let mut payload = serde_json::json!({
            "error": {
                "code": self.error_code(),
                "message": self.user_message(),
                "retryable": self.is_retryable()
            }
        });

        if let ItineraryError::InvalidPreferences(issues) = self {
            payload["error"]["fields"] = issues
                .iter()
                .map(|issue| serde_json::Value::from(issue.field()))
                .collect();
        }

        payload
    }
}
