use rand::Rng;
use serde::Serialize;

use super::preferences::{BudgetLevel, Pacing};
use crate::services::sampling::{pick_distinct, pick_with_mandatory};

/// Preference values a sample itinerary fills into the form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SamplePreset {
    pub destination: &'static str,
    pub trip_duration: u32,
    pub budget: BudgetLevel,
    pub pacing: Pacing,
    pub trip_purpose: &'static [&'static str],
    pub top_interests: &'static [&'static str],
}

/// A ready-made trip offered as inspiration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleItinerary {
    pub title: &'static str,
    pub description: &'static str,
    pub image_url: &'static str,
    pub preset: SamplePreset,
}

impl SampleItinerary {
    /// Card caption, e.g. "8 Days".
    pub fn duration_label(&self) -> String {
        format!("{} Days", self.preset.trip_duration)
    }
}

pub static SAMPLE_ITINERARIES: [SampleItinerary; 4] = [
    SampleItinerary {
        title: "Cape Town",
        description: "Discover the beauty of Table Mountain and the rich history of South Africa's Mother City.",
        image_url: "https://images.unsplash.com/photo-1576487248805-cf40f3c02882?q=80&w=2070&auto=format&fit=crop",
        preset: SamplePreset {
            destination: "Cape Town, South Africa",
            trip_duration: 8,
            budget: BudgetLevel::MidRange,
            pacing: Pacing::ExploreAndUnwind,
            trip_purpose: &["Adventure and Hiking", "Cultural Exploration"],
            top_interests: &[
                "Beaches and Scenic Views",
                "Nature and adventures",
                "Wine Farms",
            ],
        },
    },
    SampleItinerary {
        title: "Kyoto",
        description: "Immerse yourself in ancient temples, serene gardens, and traditional arts in old Japan.",
        image_url: "https://images.unsplash.com/photo-1536531015638-3c35b1599d8d?q=80&w=1974&auto=format&fit=crop",
        preset: SamplePreset {
            destination: "Kyoto, Japan",
            trip_duration: 7,
            budget: BudgetLevel::MidRange,
            pacing: Pacing::ExploreAndUnwind,
            trip_purpose: &["Cultural Exploration"],
            top_interests: &[
                "Art Galleries and Museums",
                "Restaurants and Food",
                "Nature and adventures",
            ],
        },
    },
    SampleItinerary {
        title: "Paris",
        description: "Experience the magic of the City of Light with museums, charming cafés, and romantic strolls.",
        image_url: "https://images.unsplash.com/photo-1502602898657-3e91760c0337?q=80&w=1974&auto=format&fit=crop",
        preset: SamplePreset {
            destination: "Paris, France",
            trip_duration: 4,
            budget: BudgetLevel::Lux,
            pacing: Pacing::MaximizeEveryMoment,
            trip_purpose: &["Romantic Getaway"],
            top_interests: &[
                "Art Galleries and Museums",
                "Restaurants and Food",
                "Cocktails and Nightlife",
            ],
        },
    },
    SampleItinerary {
        title: "Costa Rica",
        description: "Explore lush rainforests, volcanic landscapes, and stunning coastlines for nature lovers.",
        image_url: "https://images.unsplash.com/photo-1532598199736-54de93d395a1?q=80&w=2070&auto=format&fit=crop",
        preset: SamplePreset {
            destination: "Costa Rica",
            trip_duration: 10,
            budget: BudgetLevel::Budget,
            pacing: Pacing::MaximizeEveryMoment,
            trip_purpose: &["Adventure and Hiking"],
            top_interests: &["Nature and adventures", "Beaches and Scenic Views"],
        },
    },
];

/// Draw `count` distinct samples for the landing page.
pub fn draw_samples<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Vec<&'static SampleItinerary> {
    pick_distinct(&SAMPLE_ITINERARIES, count, rng)
}

/// Draw `count` distinct samples, at least one of which satisfies `must_include`.
pub fn draw_samples_including<R, F>(
    rng: &mut R,
    count: usize,
    must_include: F,
) -> Vec<&'static SampleItinerary>
where
    R: Rng + ?Sized,
    F: Fn(&SampleItinerary) -> bool,
{
    pick_with_mandatory(&SAMPLE_ITINERARIES, count, must_include, rng)
}
