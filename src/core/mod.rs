pub mod planner;
pub mod session;

pub use planner::{
    parse_itinerary, Planner, GENERATION_TEMPERATURE, GENERATION_TOP_P, REFINEMENT_TEMPERATURE,
};
pub use session::{PlannerSession, RequestState};
