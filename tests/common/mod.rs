#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use itinerae::{
    GenerationRequest, Planner, PlannerConfig, TextGenerator, TripPreferences, UpstreamFailure,
};
use serde_json::{json, Value};

/// Canned-response generator that records every request it sees.
#[derive(Debug, Default)]
pub struct ScriptedGenerator {
    responses: Mutex<VecDeque<Result<String, UpstreamFailure>>>,
    requests: Mutex<Vec<GenerationRequest>>,
    calls: AtomicUsize,
}

impl ScriptedGenerator {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn replying(text: impl Into<String>) -> Arc<Self> {
        let generator = Self::new();
        generator.push_ok(text);
        generator
    }

    pub fn push_ok(&self, text: impl Into<String>) {
        self.responses.lock().unwrap().push_back(Ok(text.into()));
    }

    pub fn push_err(&self, failure: UpstreamFailure) {
        self.responses.lock().unwrap().push_back(Err(failure));
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<GenerationRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate_text(&self, request: &GenerationRequest) -> Result<String, UpstreamFailure> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(UpstreamFailure::EmptyResponse))
    }
}

pub fn planner_with(generator: Arc<ScriptedGenerator>) -> Planner {
    Planner::with_generator(PlannerConfig::new("test-key"), generator)
}

/// The preferences from the Tokyo walkthrough, written the way the form posts them.
pub fn tokyo_preferences() -> TripPreferences {
    serde_json::from_value(json!({
        "name": "Alex",
        "destination": "Tokyo, Japan",
        "travelFrom": "London, UK",
        "startDate": "2025-04-01",
        "tripDuration": 3,
        "tripPurpose": ["Holiday/Vacation"],
        "topInterests": ["Restaurants and Food"],
        "budget": "MidRange",
        "pacing": "ExploreAndUnwind"
    }))
    .unwrap()
}

pub fn minimal_day(day: u32, description: &str) -> Value {
    json!({
        "day": day,
        "title": format!("Day {day}"),
        "theme": "Food",
        "activities": [{ "time": "Morning", "description": description }]
    })
}

pub fn tokyo_plan_json() -> Value {
    json!({
        "tripTitle": "Three Days of Tokyo Flavours",
        "destination": "Tokyo, Japan",
        "duration": 3,
        "summary": "Alex, get ready to eat your way across Tokyo.",
        "weather": "Mild with spring showers, around 15C",
        "dailyPlan": [
            minimal_day(1, "Tsukiji Outer Market breakfast"),
            {
                "day": 2,
                "title": "Museums and Ueno",
                "theme": "Culture",
                "activities": [
                    { "time": "Morning", "description": "Tokyo National Museum" },
                    { "time": "Evening", "description": "Izakaya crawl in Ueno" }
                ]
            },
            minimal_day(3, "Depachika food halls in Ginza")
        ],
        "alternativeSuggestions": {
            "topRestaurants": [
                { "name": "Sushi Dai", "description": "Counter sushi at the market." }
            ],
            "topExperiences": [
                { "name": "teamLab Planets", "description": "Immersive digital art." }
            ],
            "topBeaches": [],
            "otherIdeas": [
                { "name": "Yanaka Ginza", "description": "Old-town shopping street." }
            ]
        }
    })
}
