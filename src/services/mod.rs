pub mod generator;
pub mod openai_client;
pub mod prompt;
pub mod sampling;

pub use generator::{GenerationRequest, TextGenerator};
pub use openai_client::OpenAIClient;
pub use prompt::{build_generation_prompt, build_refinement_prompt, itinerary_response_schema};
pub use sampling::{pick_distinct, pick_with_mandatory, surprise_interests};
