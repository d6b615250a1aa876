use crate::completion_schema;
use chrono::{Days, NaiveDate};
use schemars::JsonSchema;
use serde::{de, Deserialize, Deserializer, Serialize};

/// A personalised, day-by-day travel itinerary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
#[completion_schema(name = "ItineraryPlan")]
pub struct ItineraryPlan {
    /// A creative, catchy title for the trip, e.g. "An Epic Adventure in Tokyo"
    pub trip_title: String,
    /// The primary destination city and country
    pub destination: String,
    /// Total number of days of the trip, taken from the traveller's input
    #[serde(rename = "duration", deserialize_with = "integral_u32")]
    pub duration_days: u32,
    /// A brief, engaging 2-3 sentence summary of the trip that addresses the traveller by name
    pub summary: String,
    /// Expected weather during the trip dates, including average temperature and conditions
    #[serde(rename = "weather")]
    pub weather_outlook: String,
    /// One entry per day of the trip, in order
    pub daily_plan: Vec<DayPlan>,
    /// Highly recommended places that did not fit into the daily plan
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternative_suggestions: Option<AlternativeSuggestions>,
}

/// `n` as a `u32` when it is a whole number in range. Models sometimes write `3.0` for `3`.
pub(crate) fn whole_u32(n: &serde_json::Number) -> Option<u32> {
    if let Some(v) = n.as_u64() {
        return u32::try_from(v).ok();
    }
    let f = n.as_f64()?;
    (f.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(&f)).then_some(f as u32)
}

fn integral_u32<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let n = serde_json::Number::deserialize(deserializer)?;
    whole_u32(&n).ok_or_else(|| de::Error::custom(format!("expected a whole number, found {n}")))
}

/// A single day of the itinerary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DayPlan {
    /// The day number (1, 2, 3, ...)
    #[serde(rename = "day", deserialize_with = "integral_u32")]
    pub day_number: u32,
    /// A short thematic title for the day, e.g. "Ancient Temples & Modern Marvels"
    pub title: String,
    /// A one-word theme for the day, e.g. "History", "Food", "Adventure"
    pub theme: String,
    /// Public holiday, festival or closure affecting this day and how it impacts the plan. Omit when nothing applies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Activities for the day in chronological order
    pub activities: Vec<Activity>,
}

/// One scheduled activity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    /// Suggested time, e.g. "Morning", "9:00 AM", "Evening"
    pub time: String,
    /// A concise description of the activity
    pub description: String,
    /// One sentence of extra detail about the experience
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Estimated distance from the city centre, e.g. "5km" or "In City Centre"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_from_center: Option<String>,
    /// Operating hours, e.g. "9:00 AM - 5:00 PM" or "24/7"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trading_hours: Option<String>,
    /// Estimated cost per person. Must follow the currency conversion rules.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_cost: Option<String>,
    /// A single practical tip, e.g. "Book tickets online to avoid queues."
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tip: Option<String>,
    /// A direct, working reservation link for restaurants. Omit if no valid link is known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reservation_link: Option<String>,
}

/// Alternative suggestions grouped by category. Every category may be absent or empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AlternativeSuggestions {
    /// 3-5 top restaurants not included in the itinerary
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_restaurants: Option<Vec<SuggestionItem>>,
    /// 3-5 top experiences or attractions not included in the itinerary
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_experiences: Option<Vec<SuggestionItem>>,
    /// 3-5 top beaches if the destination is coastal, otherwise an empty list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_beaches: Option<Vec<SuggestionItem>>,
    /// 2-3 other ideas such as a unique shop, a scenic walk or a local market
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other_ideas: Option<Vec<SuggestionItem>>,
}

/// A named recommendation with a one-sentence description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SuggestionItem {
    pub name: String,
    pub description: String,
}

impl AlternativeSuggestions {
    /// Categories in display order, with their headings. Absent categories are skipped.
    pub fn categories(&self) -> Vec<(&'static str, &[SuggestionItem])> {
        [
            ("Top Restaurants", &self.top_restaurants),
            ("Top Experiences", &self.top_experiences),
            ("Top Beaches", &self.top_beaches),
            ("Other Ideas", &self.other_ideas),
        ]
        .into_iter()
        .filter_map(|(heading, items)| items.as_deref().map(|items| (heading, items)))
        .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.categories().iter().all(|(_, items)| items.is_empty())
    }
}

impl ItineraryPlan {
    /// Whether the plan has exactly one day entry per day of the trip.
    pub fn matches_duration(&self) -> bool {
        self.daily_plan.len() == self.duration_days as usize
    }

    pub fn day(&self, day_number: u32) -> Option<&DayPlan> {
        self.daily_plan
            .iter()
            .find(|day| day.day_number == day_number)
    }

    pub fn activity_count(&self) -> usize {
        self.daily_plan.iter().map(|day| day.activities.len()).sum()
    }

    /// Printable plain-text rendering of the plan.
    pub fn outline(&self, start_date: Option<NaiveDate>) -> String {
        let mut lines = Vec::new();

        lines.push(format!("=== {} ===", self.trip_title));
        lines.push(format!(
            "{} ({} days)",
            self.destination, self.duration_days
        ));
        lines.push(String::new());
        lines.push(self.summary.clone());

        if !self.weather_outlook.is_empty() {
            lines.push(String::new());
            lines.push(format!("Weather Outlook: {}", self.weather_outlook));
        }

        for day in &self.daily_plan {
            lines.push(String::new());
            let date = start_date
                .and_then(|start| day_date(start, day.day_number))
                .map(|date| format!(" ({})", date.format("%A, %B %-d, %Y")))
                .unwrap_or_default();
            lines.push(format!(
                "--- Day {}: {} [{}]{} ---",
                day.day_number, day.title, day.theme, date
            ));

            if let Some(note) = &day.note {
                lines.push(format!("Note: {}", note));
            }

            for activity in &day.activities {
                lines.push(format!("{} - {}", activity.time, activity.description));
                if let Some(details) = &activity.details {
                    lines.push(format!("    {}", details));
                }
                let facts = [
                    ("Distance", &activity.distance_from_center),
                    ("Hours", &activity.trading_hours),
                    ("Cost", &activity.estimated_cost),
                    ("Tip", &activity.tip),
                    ("Book", &activity.reservation_link),
                ];
                for (label, value) in facts {
                    if let Some(value) = value {
                        lines.push(format!("    {}: {}", label, value));
                    }
                }
            }
        }

        if let Some(suggestions) = self
            .alternative_suggestions
            .as_ref()
            .filter(|suggestions| !suggestions.is_empty())
        {
            lines.push(String::new());
            lines.push("--- Alternative Suggestions ---".to_string());
            for (heading, items) in suggestions.categories() {
                if items.is_empty() {
                    continue;
                }
                lines.push(format!("{}:", heading));
                for item in items {
                    lines.push(format!("  * {}: {}", item.name, item.description));
                }
            }
        }

        lines.join("\n")
    }
}

/// Calendar date of a 1-based day number, counted from the trip's start date.
pub fn day_date(start: NaiveDate, day_number: u32) -> Option<NaiveDate> {
    let offset = day_number.checked_sub(1)?;
    start.checked_add_days(Days::new(u64::from(offset)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schemas::CompletionSchema;

    fn activity(time: &str, description: &str) -> Activity {
        Activity {
            time: time.to_string(),
            description: description.to_string(),
            details: None,
            distance_from_center: None,
            trading_hours: None,
            estimated_cost: None,
            tip: None,
            reservation_link: None,
        }
    }

    fn plan(days: u32) -> ItineraryPlan {
        ItineraryPlan {
            trip_title: "Lisbon Lights".to_string(),
            destination: "Lisbon, Portugal".to_string(),
            duration_days: days,
            summary: "Sam, get ready for trams and tiles.".to_string(),
            weather_outlook: "Mild, 18C".to_string(),
            daily_plan: (1..=days)
                .map(|n| DayPlan {
                    day_number: n,
                    title: format!("Day {n} title"),
                    theme: "Culture".to_string(),
                    note: None,
                    activities: vec![activity("Morning", "Walk through Alfama")],
                })
                .collect(),
            alternative_suggestions: None,
        }
    }

    #[test]
    fn test_wire_keys_follow_contract() {
        let value = serde_json::to_value(plan(1)).unwrap();

        assert!(value.get("tripTitle").is_some());
        assert_eq!(value["duration"], 1);
        assert_eq!(value["weather"], "Mild, 18C");
        assert_eq!(value["dailyPlan"][0]["day"], 1);
        assert!(value.get("alternativeSuggestions").is_none());
        assert!(value["dailyPlan"][0].get("note").is_none());
    }

    #[test]
    fn test_schema_lists_required_fields() {
        let schema = ItineraryPlan::schema();
        let required = schema.required_fields();

        for field in [
            "tripTitle",
            "destination",
            "duration",
            "summary",
            "weather",
            "dailyPlan",
        ] {
            assert!(required.contains(&field), "missing {field}");
        }
        assert!(!required.contains(&"alternativeSuggestions"));

        let activity_required = schema.definition_required_fields("Activity");
        assert!(activity_required.contains(&"time"));
        assert!(activity_required.contains(&"description"));
        assert!(!activity_required.contains(&"reservationLink"));
    }

    #[test]
    fn test_schema_carries_field_descriptions() {
        let schema = ItineraryPlan::schema().schema_json();
        let description = schema["properties"]["tripTitle"]["description"]
            .as_str()
            .unwrap();
        assert!(description.contains("catchy title"));
    }

    #[test]
    fn test_whole_u32_accepts_integral_floats_only() {
        let number = |v: serde_json::Value| match v {
            serde_json::Value::Number(n) => n,
            other => panic!("not a number: {other}"),
        };

        assert_eq!(whole_u32(&number(serde_json::json!(4))), Some(4));
        assert_eq!(whole_u32(&number(serde_json::json!(4.0))), Some(4));
        assert_eq!(whole_u32(&number(serde_json::json!(4.5))), None);
        assert_eq!(whole_u32(&number(serde_json::json!(-1))), None);
        assert_eq!(whole_u32(&number(serde_json::json!(-2.0))), None);
        assert_eq!(whole_u32(&number(serde_json::json!(5_000_000_000u64))), None);
    }

    #[test]
    fn test_day_number_deserializes_from_integral_float() {
        let day: DayPlan = serde_json::from_str(
            r#"{"day": 2.0, "title": "Belem", "theme": "History", "activities": []}"#,
        )
        .unwrap();
        assert_eq!(day.day_number, 2);

        let err = serde_json::from_str::<DayPlan>(
            r#"{"day": 2.5, "title": "Belem", "theme": "History", "activities": []}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("whole number"));
    }

    #[test]
    fn test_matches_duration() {
        let mut itinerary = plan(3);
        assert!(itinerary.matches_duration());
        itinerary.daily_plan.pop();
        assert!(!itinerary.matches_duration());
    }

    #[test]
    fn test_day_date_counts_from_start() {
        let start = NaiveDate::from_ymd_opt(2025, 4, 1).unwrap();
        assert_eq!(day_date(start, 1), Some(start));
        assert_eq!(
            day_date(start, 3),
            NaiveDate::from_ymd_opt(2025, 4, 3)
        );
        assert_eq!(day_date(start, 0), None);
    }

    #[test]
    fn test_outline_includes_dates_and_suggestions() {
        let mut itinerary = plan(2);
        itinerary.daily_plan[1].note = Some("Public Holiday: expect parades.".to_string());
        itinerary.alternative_suggestions = Some(AlternativeSuggestions {
            top_restaurants: Some(vec![SuggestionItem {
                name: "Cervejaria Ramiro".to_string(),
                description: "Seafood institution.".to_string(),
            }]),
            top_beaches: Some(Vec::new()),
            ..Default::default()
        });

        let start = NaiveDate::from_ymd_opt(2025, 4, 1).unwrap();
        let text = itinerary.outline(Some(start));

        assert!(text.contains("=== Lisbon Lights ==="));
        assert!(text.contains("Day 1: Day 1 title [Culture] (Tuesday, April 1, 2025)"));
        assert!(text.contains("Note: Public Holiday: expect parades."));
        assert!(text.contains("Top Restaurants:"));
        assert!(!text.contains("Top Beaches:"));
    }
}
