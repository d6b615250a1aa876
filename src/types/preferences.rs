//! Trip preferences captured from the planning form.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::samples::SamplePreset;

/// Selection that requires a companion free-text field.
pub const OTHER: &str = "Other";

pub const TRIP_PURPOSE_OPTIONS: [&str; 7] = [
    "Holiday/Vacation",
    "Family Trip",
    "Adventure and Hiking",
    "Romantic Getaway",
    "Cultural Exploration",
    "Business Trip",
    OTHER,
];

pub const INTEREST_OPTIONS: [&str; 8] = [
    "Restaurants and Food",
    "Cocktails and Nightlife",
    "Beaches and Scenic Views",
    "Wine Farms",
    "Art Galleries and Museums",
    "Local Markets and Shopping",
    "Nature and adventures",
    OTHER,
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TravelRadius {
    #[serde(rename = "City Center")]
    CityCenter,
    #[serde(rename = "Within 15km")]
    Within15Km,
    #[serde(rename = "Within 30km")]
    Within30Km,
    #[default]
    #[serde(rename = "No preference")]
    NoPreference,
}

impl TravelRadius {
    pub fn label(&self) -> &'static str {
        match self {
            TravelRadius::CityCenter => "City Center",
            TravelRadius::Within15Km => "Within 15km",
            TravelRadius::Within30Km => "Within 30km",
            TravelRadius::NoPreference => "No preference",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BudgetLevel {
    Budget,
    #[serde(rename = "Mid range", alias = "MidRange")]
    MidRange,
    Lux,
    Mix,
}

impl BudgetLevel {
    pub fn label(&self) -> &'static str {
        match self {
            BudgetLevel::Budget => "Budget",
            BudgetLevel::MidRange => "Mid range",
            BudgetLevel::Lux => "Lux",
            BudgetLevel::Mix => "Mix",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Pacing {
    #[serde(rename = "Maximize Every Moment", alias = "MaximizeEveryMoment")]
    MaximizeEveryMoment,
    #[serde(rename = "Explore and Unwind", alias = "ExploreAndUnwind")]
    ExploreAndUnwind,
    #[serde(rename = "Go with the Flow", alias = "GoWithTheFlow")]
    GoWithTheFlow,
}

impl Pacing {
    pub fn label(&self) -> &'static str {
        match self {
            Pacing::MaximizeEveryMoment => "Maximize Every Moment",
            Pacing::ExploreAndUnwind => "Explore and Unwind",
            Pacing::GoWithTheFlow => "Go with the Flow",
        }
    }
}

macro_rules! display_label {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        })*
    };
}

display_label!(TravelRadius, BudgetLevel, Pacing);

/// Everything the traveller told us about the trip.
///
/// Values are built up field by field while the form is edited, so any of the required
/// fields may still be empty. Use [`TripPreferences::is_submittable`] before handing the
/// value to the planner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TripPreferences {
    pub name: String,
    pub destination: String,
    pub travel_from: String,
    pub travel_radius: TravelRadius,
    /// ISO `YYYY-MM-DD`
    pub start_date: String,
    pub trip_duration: Option<u32>,
    pub number_of_travelers: u32,
    pub first_time_visitor: bool,
    pub trip_purpose: Vec<String>,
    pub other_trip_purpose: Option<String>,
    pub top_interests: Vec<String>,
    pub other_interest: Option<String>,
    pub budget: Option<BudgetLevel>,
    pub pacing: Option<Pacing>,
    pub specific_inclusions: Option<String>,
}

impl Default for TripPreferences {
    fn default() -> Self {
        Self {
            name: String::new(),
            destination: String::new(),
            travel_from: String::new(),
            travel_radius: TravelRadius::default(),
            start_date: String::new(),
            trip_duration: None,
            number_of_travelers: 1,
            first_time_visitor: false,
            trip_purpose: Vec::new(),
            other_trip_purpose: None,
            top_interests: Vec::new(),
            other_interest: None,
            budget: None,
            pacing: None,
            specific_inclusions: None,
        }
    }
}

/// A reason a [`TripPreferences`] value cannot be submitted yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PreferenceIssue {
    MissingName,
    MissingDestination,
    MissingTravelFrom,
    MissingStartDate,
    InvalidStartDate,
    MissingTripDuration,
    NoTravelers,
    MissingTripPurpose,
    MissingOtherTripPurpose,
    MissingTopInterest,
    MissingOtherInterest,
    MissingBudget,
    MissingPacing,
}

impl PreferenceIssue {
    /// Form field the issue should be reported against.
    pub fn field(&self) -> &'static str {
        match self {
            PreferenceIssue::MissingName => "name",
            PreferenceIssue::MissingDestination => "destination",
            PreferenceIssue::MissingTravelFrom => "travelFrom",
            PreferenceIssue::MissingStartDate | PreferenceIssue::InvalidStartDate => "startDate",
            PreferenceIssue::MissingTripDuration => "tripDuration",
            PreferenceIssue::NoTravelers => "numberOfTravelers",
            PreferenceIssue::MissingTripPurpose => "tripPurpose",
            PreferenceIssue::MissingOtherTripPurpose => "otherTripPurpose",
            PreferenceIssue::MissingTopInterest => "topInterests",
            PreferenceIssue::MissingOtherInterest => "otherInterest",
            PreferenceIssue::MissingBudget => "budget",
            PreferenceIssue::MissingPacing => "pacing",
        }
    }
}

impl fmt::Display for PreferenceIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            PreferenceIssue::InvalidStartDate => "start date must be a YYYY-MM-DD calendar date",
            PreferenceIssue::NoTravelers => "at least one traveller is required",
            PreferenceIssue::MissingTripPurpose => "select at least one trip purpose",
            PreferenceIssue::MissingTopInterest => "select at least one interest",
            PreferenceIssue::MissingOtherTripPurpose => "describe the \"Other\" trip purpose",
            PreferenceIssue::MissingOtherInterest => "describe the \"Other\" interest",
            _ => return write!(f, "{} is required", self.field()),
        };
        f.write_str(message)
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn is_blank_opt(value: Option<&str>) -> bool {
    value.map(is_blank).unwrap_or(true)
}

impl TripPreferences {
    /// Every reason this value is not submittable, in form order. Empty when submittable.
    ///
    /// Purpose and interest labels are not checked against the form's option lists, and
    /// duplicates are kept, so free-form labels pass through to the prompt as written.
    pub fn issues(&self) -> Vec<PreferenceIssue> {
        let mut issues = Vec::new();

        if is_blank(&self.name) {
            issues.push(PreferenceIssue::MissingName);
        }
        if is_blank(&self.destination) {
            issues.push(PreferenceIssue::MissingDestination);
        }
        if is_blank(&self.travel_from) {
            issues.push(PreferenceIssue::MissingTravelFrom);
        }
        if is_blank(&self.start_date) {
            issues.push(PreferenceIssue::MissingStartDate);
        } else if self.start_date().is_none() {
            issues.push(PreferenceIssue::InvalidStartDate);
        }
        if !matches!(self.trip_duration, Some(days) if days > 0) {
            issues.push(PreferenceIssue::MissingTripDuration);
        }
        if self.number_of_travelers == 0 {
            issues.push(PreferenceIssue::NoTravelers);
        }
        if self.trip_purpose.is_empty() {
            issues.push(PreferenceIssue::MissingTripPurpose);
        } else if self.has_other(&self.trip_purpose)
            && is_blank_opt(self.other_trip_purpose.as_deref())
        {
            issues.push(PreferenceIssue::MissingOtherTripPurpose);
        }
        if self.top_interests.is_empty() {
            issues.push(PreferenceIssue::MissingTopInterest);
        } else if self.has_other(&self.top_interests)
            && is_blank_opt(self.other_interest.as_deref())
        {
            issues.push(PreferenceIssue::MissingOtherInterest);
        }
        if self.budget.is_none() {
            issues.push(PreferenceIssue::MissingBudget);
        }
        if self.pacing.is_none() {
            issues.push(PreferenceIssue::MissingPacing);
        }

        issues
    }

    pub fn is_submittable(&self) -> bool {
        self.issues().is_empty()
    }

    /// The start date, if it parses as an ISO calendar date.
    pub fn start_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.start_date.trim(), "%Y-%m-%d").ok()
    }

    fn has_other(&self, selection: &[String]) -> bool {
        selection.iter().any(|item| item == OTHER)
    }

    /// Select or deselect a trip purpose. Deselecting "Other" clears its description.
    pub fn toggle_purpose(&mut self, option: &str) {
        toggle(&mut self.trip_purpose, option);
        if !self.has_other(&self.trip_purpose) {
            self.other_trip_purpose = None;
        }
    }

    /// Select or deselect an interest. Deselecting "Other" clears its description.
    pub fn toggle_interest(&mut self, option: &str) {
        toggle(&mut self.top_interests, option);
        if !self.has_other(&self.top_interests) {
            self.other_interest = None;
        }
    }

    /// Replace the interests wholesale, e.g. with a "surprise me" draw.
    pub fn set_interests<I, S>(&mut self, interests: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.top_interests = interests.into_iter().map(Into::into).collect();
        if !self.has_other(&self.top_interests) {
            self.other_interest = None;
        }
    }

    /// Prefill trip details from a sample itinerary, keeping who and where-from intact.
    pub fn apply_preset(&mut self, preset: &SamplePreset) {
        self.destination = preset.destination.to_string();
        self.trip_duration = Some(preset.trip_duration);
        self.budget = Some(preset.budget);
        self.pacing = Some(preset.pacing);
        self.trip_purpose = preset.trip_purpose.iter().map(|s| s.to_string()).collect();
        self.other_trip_purpose = None;
        self.set_interests(preset.top_interests.iter().copied());
    }
}

fn toggle(selection: &mut Vec<String>, option: &str) {
    if let Some(position) = selection.iter().position(|item| item == option) {
        selection.remove(position);
    } else {
        selection.push(option.to_string());
    }
}

fn normalize_selection(selection: &[String], other_text: Option<&str>) -> String {
    selection
        .iter()
        .map(|item| match other_text.map(str::trim) {
            Some(text) if item == OTHER && !text.is_empty() => format!("{OTHER}: {text}"),
            _ => item.clone(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn is_submittable(prefs: &TripPreferences) -> bool {
    prefs.is_submittable()
}

/// Selected purposes joined for the prompt, with "Other" expanded to `Other: <text>`.
pub fn normalize_purpose(prefs: &TripPreferences) -> String {
    normalize_selection(&prefs.trip_purpose, prefs.other_trip_purpose.as_deref())
}

/// Selected interests joined for the prompt, with "Other" expanded to `Other: <text>`.
pub fn normalize_interests(prefs: &TripPreferences) -> String {
    normalize_selection(&prefs.top_interests, prefs.other_interest.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submittable() -> TripPreferences {
        TripPreferences {
            name: "Alex".to_string(),
            destination: "Tokyo, Japan".to_string(),
            travel_from: "London, UK".to_string(),
            start_date: "2025-04-01".to_string(),
            trip_duration: Some(3),
            trip_purpose: vec!["Holiday/Vacation".to_string()],
            top_interests: vec!["Restaurants and Food".to_string()],
            budget: Some(BudgetLevel::MidRange),
            pacing: Some(Pacing::ExploreAndUnwind),
            ..Default::default()
        }
    }

    #[test]
    fn test_complete_preferences_are_submittable() {
        let prefs = submittable();
        assert!(prefs.is_submittable());
        assert!(is_submittable(&prefs));
        assert!(prefs.issues().is_empty());
    }

    fn assert_blocked(label: &str, clear: impl Fn(&mut TripPreferences), expected: PreferenceIssue) {
        let mut prefs = submittable();
        clear(&mut prefs);
        assert!(!prefs.is_submittable(), "{label} should block submission");
        assert_eq!(prefs.issues(), vec![expected], "{label}");
    }

    #[test]
    fn test_each_missing_required_field_blocks_submission() {
        assert_blocked("name", |p| p.name.clear(), PreferenceIssue::MissingName);
        assert_blocked(
            "destination",
            |p| p.destination = "   ".to_string(),
            PreferenceIssue::MissingDestination,
        );
        assert_blocked(
            "travelFrom",
            |p| p.travel_from.clear(),
            PreferenceIssue::MissingTravelFrom,
        );
        assert_blocked(
            "startDate",
            |p| p.start_date.clear(),
            PreferenceIssue::MissingStartDate,
        );
        assert_blocked(
            "tripDuration",
            |p| p.trip_duration = None,
            PreferenceIssue::MissingTripDuration,
        );
        assert_blocked(
            "zero tripDuration",
            |p| p.trip_duration = Some(0),
            PreferenceIssue::MissingTripDuration,
        );
        assert_blocked(
            "numberOfTravelers",
            |p| p.number_of_travelers = 0,
            PreferenceIssue::NoTravelers,
        );
        assert_blocked(
            "tripPurpose",
            |p| p.trip_purpose.clear(),
            PreferenceIssue::MissingTripPurpose,
        );
        assert_blocked(
            "topInterests",
            |p| p.top_interests.clear(),
            PreferenceIssue::MissingTopInterest,
        );
        assert_blocked("budget", |p| p.budget = None, PreferenceIssue::MissingBudget);
        assert_blocked("pacing", |p| p.pacing = None, PreferenceIssue::MissingPacing);
    }

    #[test]
    fn test_every_combination_of_missing_identity_fields_blocks_submission() {
        for mask in 1u8..(1 << 5) {
            let mut prefs = submittable();
            if mask & 1 != 0 {
                prefs.name.clear();
            }
            if mask & 2 != 0 {
                prefs.destination.clear();
            }
            if mask & 4 != 0 {
                prefs.travel_from.clear();
            }
            if mask & 8 != 0 {
                prefs.start_date.clear();
            }
            if mask & 16 != 0 {
                prefs.trip_duration = None;
            }
            assert!(!prefs.is_submittable(), "mask {mask:#07b}");
            assert_eq!(prefs.issues().len(), mask.count_ones() as usize);
        }
    }

    #[test]
    fn test_unparseable_start_date_is_rejected() {
        let mut prefs = submittable();
        prefs.start_date = "01/04/2025".to_string();
        assert_eq!(prefs.issues(), vec![PreferenceIssue::InvalidStartDate]);
    }

    #[test]
    fn test_other_purpose_requires_description() {
        let mut prefs = submittable();
        prefs.trip_purpose.push(OTHER.to_string());
        assert_eq!(prefs.issues(), vec![PreferenceIssue::MissingOtherTripPurpose]);

        prefs.other_trip_purpose = Some("  ".to_string());
        assert!(!prefs.is_submittable());

        prefs.other_trip_purpose = Some("Attending a wedding".to_string());
        assert!(prefs.is_submittable());
    }

    #[test]
    fn test_other_interest_requires_description() {
        let mut prefs = submittable();
        prefs.top_interests = vec![OTHER.to_string()];
        assert_eq!(prefs.issues(), vec![PreferenceIssue::MissingOtherInterest]);

        prefs.other_interest = Some("Vintage record shops".to_string());
        assert!(prefs.is_submittable());
    }

    #[test]
    fn test_free_form_and_repeated_labels_are_accepted_as_is() {
        let mut prefs = submittable();
        prefs.trip_purpose = vec!["Birdwatching retreat".to_string()];
        prefs.top_interests = vec![
            "Tide pools".to_string(),
            "Tide pools".to_string(),
            "Restaurants and Food".to_string(),
        ];

        assert!(prefs.is_submittable());
        assert_eq!(normalize_purpose(&prefs), "Birdwatching retreat");
        assert_eq!(
            normalize_interests(&prefs),
            "Tide pools, Tide pools, Restaurants and Food"
        );
    }

    #[test]
    fn test_normalize_substitutes_other_text() {
        let mut prefs = submittable();
        prefs.trip_purpose = vec!["Family Trip".to_string(), OTHER.to_string()];
        prefs.other_trip_purpose = Some("Graduation".to_string());
        prefs.top_interests = vec![OTHER.to_string(), "Wine Farms".to_string()];
        prefs.other_interest = Some("Street art".to_string());

        assert_eq!(normalize_purpose(&prefs), "Family Trip, Other: Graduation");
        assert_eq!(normalize_interests(&prefs), "Other: Street art, Wine Farms");
    }

    #[test]
    fn test_normalize_keeps_bare_other_without_text() {
        let mut prefs = submittable();
        prefs.trip_purpose = vec![OTHER.to_string()];
        assert_eq!(normalize_purpose(&prefs), "Other");
    }

    #[test]
    fn test_toggle_clears_other_description_when_deselected() {
        let mut prefs = submittable();
        prefs.toggle_purpose(OTHER);
        prefs.other_trip_purpose = Some("Conference".to_string());
        prefs.toggle_purpose("Family Trip");
        assert_eq!(prefs.other_trip_purpose.as_deref(), Some("Conference"));

        prefs.toggle_purpose(OTHER);
        assert_eq!(prefs.other_trip_purpose, None);
        assert_eq!(
            prefs.trip_purpose,
            vec!["Holiday/Vacation".to_string(), "Family Trip".to_string()]
        );

        prefs.toggle_interest(OTHER);
        prefs.other_interest = Some("Jazz".to_string());
        prefs.toggle_interest(OTHER);
        assert_eq!(prefs.other_interest, None);
    }

    #[test]
    fn test_deserializes_form_labels() {
        let prefs: TripPreferences = serde_json::from_value(serde_json::json!({
            "name": "Alex",
            "destination": "Tokyo, Japan",
            "travelFrom": "London, UK",
            "travelRadius": "Within 15km",
            "startDate": "2025-04-01",
            "tripDuration": 3,
            "tripPurpose": ["Holiday/Vacation"],
            "topInterests": ["Restaurants and Food"],
            "budget": "MidRange",
            "pacing": "Explore and Unwind"
        }))
        .unwrap();

        assert_eq!(prefs.travel_radius, TravelRadius::Within15Km);
        assert_eq!(prefs.budget, Some(BudgetLevel::MidRange));
        assert_eq!(prefs.number_of_travelers, 1);
        assert!(prefs.is_submittable());
    }
}
