pub mod itinerary;
pub mod preferences;
pub mod samples;

pub use itinerary::{
    day_date, Activity, AlternativeSuggestions, DayPlan, ItineraryPlan, SuggestionItem,
};
pub use preferences::{
    is_submittable, normalize_interests, normalize_purpose, BudgetLevel, Pacing,
    PreferenceIssue, TravelRadius, TripPreferences, INTEREST_OPTIONS, OTHER,
    TRIP_PURPOSE_OPTIONS,
};
pub use samples::{
    draw_samples, draw_samples_including, SampleItinerary, SamplePreset, SAMPLE_ITINERARIES,
};
