//! Structural validation of itinerary payloads returned by the text-generation service.
//!
//! The service is asked to honour [`ItineraryPlan::schema`], but nothing it returns is
//! trusted until it passes [`validate`]. Required fields are read from that same schema,
//! so the contract sent out and the contract enforced here cannot disagree. Only shape is
//! checked; whether costs, holidays or links are correct is not.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::schemas::CompletionSchema;
use crate::types::itinerary::{whole_u32, ItineraryPlan};

const DAILY_PLAN: &str = "dailyPlan";
const DAY_DEFINITION: &str = "DayPlan";
const ACTIVITY_DEFINITION: &str = "Activity";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContractError {
    #[error("payload is not a JSON object")]
    NotAnObject,

    #[error("missing required field `{path}`")]
    MissingField { path: String },

    #[error("activity {index} on day {day} is missing `{field}`")]
    MalformedActivity {
        day: u32,
        index: usize,
        field: String,
    },

    #[error("day {day} has no activities")]
    EmptyActivities { day: u32 },

    #[error("day numbers must be positive and increasing, found day {found} after day {previous}")]
    DayOutOfOrder { previous: u32, found: u32 },

    #[error("unexpected value at `{path}`: {message}")]
    WrongType { path: String, message: String },
}

impl ContractError {
    fn missing(path: impl Into<String>) -> Self {
        ContractError::MissingField { path: path.into() }
    }

    fn wrong_type(path: impl Into<String>, message: impl Into<String>) -> Self {
        ContractError::WrongType {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Check a parsed payload against the itinerary contract and convert it.
pub fn validate(payload: &Value) -> Result<ItineraryPlan, ContractError> {
    let root = payload.as_object().ok_or(ContractError::NotAnObject)?;

    let days = match root.get(DAILY_PLAN) {
        Some(Value::Array(days)) => days,
        _ => return Err(ContractError::missing(DAILY_PLAN)),
    };

    let schema = ItineraryPlan::schema();
    for field in schema.required_fields() {
        if is_absent(root, field) {
            return Err(ContractError::missing(field));
        }
    }

    let day_required = schema.definition_required_fields(DAY_DEFINITION);
    let activity_required = schema.definition_required_fields(ACTIVITY_DEFINITION);

    for (position, day) in days.iter().enumerate() {
        let path = format!("{DAILY_PLAN}[{position}]");
        let day = day
            .as_object()
            .ok_or_else(|| ContractError::wrong_type(&path, "expected a day object"))?;

        for field in &day_required {
            if is_absent(day, field) {
                return Err(ContractError::missing(format!("{path}.{field}")));
            }
        }

        let day_number = day
            .get("day")
            .and_then(|value| match value {
                Value::Number(n) => whole_u32(n),
                _ => None,
            })
            .unwrap_or(position as u32 + 1);

        let activities = day
            .get("activities")
            .and_then(Value::as_array)
            .ok_or_else(|| {
                ContractError::wrong_type(format!("{path}.activities"), "expected an array")
            })?;

        if activities.is_empty() {
            return Err(ContractError::EmptyActivities { day: day_number });
        }

        for (index, activity) in activities.iter().enumerate() {
            let activity = activity.as_object().ok_or_else(|| {
                ContractError::wrong_type(
                    format!("{path}.activities[{index}]"),
                    "expected an activity object",
                )
            })?;

            let missing = activity_required.iter().find(|field| {
                !activity
                    .get(**field)
                    .map(Value::is_string)
                    .unwrap_or(false)
            });
            if let Some(field) = missing {
                return Err(ContractError::MalformedActivity {
                    day: day_number,
                    index,
                    field: (*field).to_string(),
                });
            }
        }
    }

    let plan: ItineraryPlan = serde_path_to_error::deserialize(payload).map_err(|err| {
        let path = err.path().to_string();
        let location = if path.is_empty() || path == "." {
            "<root>".to_string()
        } else {
            path
        };
        ContractError::wrong_type(location, err.inner().to_string())
    })?;

    check_day_order(&plan)?;

    Ok(plan)
}

fn is_absent(object: &Map<String, Value>, field: &str) -> bool {
    matches!(object.get(field), None | Some(Value::Null))
}

fn check_day_order(plan: &ItineraryPlan) -> Result<(), ContractError> {
    let mut previous = 0;
    for day in &plan.daily_plan {
        if day.day_number <= previous {
            return Err(ContractError::DayOutOfOrder {
                previous,
                found: day.day_number,
            });
        }
        previous = day.day_number;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn minimal_payload() -> Value {
        json!({
            "tripTitle": "Three Days in Tokyo",
            "destination": "Tokyo, Japan",
            "duration": 2,
            "summary": "Alex, Tokyo awaits.",
            "weather": "Mild spring weather, 15C",
            "dailyPlan": [
                {
                    "day": 1,
                    "title": "Arrival",
                    "theme": "Food",
                    "activities": [
                        { "time": "Evening", "description": "Ramen in Shinjuku" }
                    ]
                },
                {
                    "day": 2,
                    "title": "Temples",
                    "theme": "History",
                    "activities": [
                        { "time": "Morning", "description": "Senso-ji" },
                        { "time": "Afternoon", "description": "Ueno Park" }
                    ]
                }
            ]
        })
    }

    #[test]
    fn test_accepts_minimal_payload_without_optional_fields() {
        let plan = validate(&minimal_payload()).unwrap();

        assert_eq!(plan.daily_plan.len(), 2);
        assert_eq!(plan.daily_plan[0].note, None);
        assert_eq!(plan.daily_plan[0].activities[0].reservation_link, None);
        assert_eq!(plan.alternative_suggestions, None);
    }

    #[test]
    fn test_null_optionals_mean_not_present() {
        let mut payload = minimal_payload();
        payload["alternativeSuggestions"] = json!({ "topBeaches": null, "otherIdeas": [] });
        payload["dailyPlan"][0]["note"] = Value::Null;
        payload["dailyPlan"][0]["activities"][0]["reservationLink"] = Value::Null;

        let plan = validate(&payload).unwrap();
        let suggestions = plan.alternative_suggestions.unwrap();
        assert_eq!(suggestions.top_beaches, None);
        assert_eq!(suggestions.top_restaurants, None);
        assert_eq!(suggestions.other_ideas, Some(Vec::new()));
        assert_eq!(plan.daily_plan[0].note, None);
    }

    #[test]
    fn test_rejects_missing_daily_plan() {
        let mut payload = minimal_payload();
        payload.as_object_mut().unwrap().remove("dailyPlan");

        assert_eq!(
            validate(&payload).unwrap_err(),
            ContractError::MissingField {
                path: "dailyPlan".to_string()
            }
        );
    }

    #[test]
    fn test_rejects_daily_plan_that_is_not_a_list() {
        let mut payload = minimal_payload();
        payload["dailyPlan"] = json!({ "day": 1 });

        assert!(matches!(
            validate(&payload),
            Err(ContractError::MissingField { path }) if path == "dailyPlan"
        ));
    }

    #[test]
    fn test_rejects_activity_without_description() {
        let mut payload = minimal_payload();
        payload["dailyPlan"][1]["activities"][1]
            .as_object_mut()
            .unwrap()
            .remove("description");

        assert_eq!(
            validate(&payload).unwrap_err(),
            ContractError::MalformedActivity {
                day: 2,
                index: 1,
                field: "description".to_string()
            }
        );
    }

    #[test]
    fn test_rejects_activity_without_time() {
        let mut payload = minimal_payload();
        payload["dailyPlan"][0]["activities"][0]["time"] = Value::Null;

        assert!(matches!(
            validate(&payload),
            Err(ContractError::MalformedActivity { day: 1, index: 0, field }) if field == "time"
        ));
    }

    #[test]
    fn test_rejects_missing_top_level_field() {
        let mut payload = minimal_payload();
        payload.as_object_mut().unwrap().remove("tripTitle");

        assert_eq!(
            validate(&payload).unwrap_err(),
            ContractError::MissingField {
                path: "tripTitle".to_string()
            }
        );
    }

    #[test]
    fn test_rejects_day_missing_title_with_path() {
        let mut payload = minimal_payload();
        payload["dailyPlan"][1].as_object_mut().unwrap().remove("title");

        assert_eq!(
            validate(&payload).unwrap_err(),
            ContractError::MissingField {
                path: "dailyPlan[1].title".to_string()
            }
        );
    }

    #[test]
    fn test_rejects_empty_activity_list() {
        let mut payload = minimal_payload();
        payload["dailyPlan"][0]["activities"] = json!([]);

        assert_eq!(
            validate(&payload).unwrap_err(),
            ContractError::EmptyActivities { day: 1 }
        );
    }

    #[test]
    fn test_rejects_repeated_day_numbers() {
        let mut payload = minimal_payload();
        payload["dailyPlan"][1]["day"] = json!(1);

        assert_eq!(
            validate(&payload).unwrap_err(),
            ContractError::DayOutOfOrder {
                previous: 1,
                found: 1
            }
        );
    }

    #[test]
    fn test_reports_path_of_wrong_type() {
        let mut payload = minimal_payload();
        payload["duration"] = json!("two");

        match validate(&payload).unwrap_err() {
            ContractError::WrongType { path, .. } => assert_eq!(path, "duration"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_integral_float_day_number_is_reported_as_written() {
        let mut payload = minimal_payload();
        payload["dailyPlan"][0]["day"] = json!(5.0);
        payload["dailyPlan"][0]["activities"] = json!([]);

        assert_eq!(
            validate(&payload).unwrap_err(),
            ContractError::EmptyActivities { day: 5 }
        );
    }

    #[test]
    fn test_rejects_non_object_payload() {
        assert_eq!(
            validate(&json!([1, 2, 3])).unwrap_err(),
            ContractError::NotAnObject
        );
    }
}
