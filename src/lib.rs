//! itinerae: the itinerary generation contract of a travel-planning application.
//!
//! The crate turns typed traveller preferences into a deterministic prompt, asks a
//! text-generation service for a structured itinerary, and refuses to hand back anything
//! that does not match the itinerary schema.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use itinerae::{BudgetLevel, Pacing, Planner, PlannerConfig, TripPreferences};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let planner = Planner::new(PlannerConfig::from_env()?)?;
//!
//!     let preferences = TripPreferences {
//!         name: "Alex".to_string(),
//!         destination: "Tokyo, Japan".to_string(),
//!         travel_from: "London, UK".to_string(),
//!         start_date: "2025-04-01".to_string(),
//!         trip_duration: Some(3),
//!         trip_purpose: vec!["Holiday/Vacation".to_string()],
//!         top_interests: vec!["Restaurants and Food".to_string()],
//!         budget: Some(BudgetLevel::MidRange),
//!         pacing: Some(Pacing::ExploreAndUnwind),
//!         ..TripPreferences::default()
//!     };
//!
//!     let plan = planner.generate(&preferences).await?;
//!     println!("{}", plan.outline(preferences.start_date()));
//!     Ok(())
//! }
//! ```

extern crate self as itinerae;

pub mod config;
pub mod core;
pub mod error;
pub mod schemas;
pub mod services;
pub mod types;

pub use config::PlannerConfig;
pub use self::core::{parse_itinerary, Planner, PlannerSession, RequestState};
pub use error::{ContractError, ItineraryError, Operation, Result, UpstreamFailure};
pub use itinerae_macros::completion_schema;
pub use schemas::{validate, CompletionSchema, SchemaHandle};
pub use services::{
    build_generation_prompt, build_refinement_prompt, itinerary_response_schema,
    GenerationRequest, OpenAIClient, TextGenerator,
};
pub use types::{
    is_submittable, normalize_interests, normalize_purpose, Activity, AlternativeSuggestions,
    BudgetLevel, DayPlan, ItineraryPlan, Pacing, PreferenceIssue, SuggestionItem, TravelRadius,
    TripPreferences,
};

pub use schemas as schema;

#[cfg(feature = "cli")]
pub mod cli;
