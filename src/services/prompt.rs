//! Deterministic prompt construction.
//!
//! Both builders are pure: the same input always yields the same text, which keeps
//! prompts diffable in tests and logs.

use std::fmt::Write as _;

use crate::error::Result;
use crate::schemas::{CompletionSchema, SchemaHandle};
use crate::types::itinerary::ItineraryPlan;
use crate::types::preferences::{normalize_interests, normalize_purpose, TripPreferences};

const NONE_GIVEN: &str = "None";

const TRAVEL_RADIUS_GUIDE: &str = "\
    - 'City Center': stay with walkable areas, central districts and sights reachable from the main public transport hubs.
    - 'Within 15km': the centre plus nearby suburbs or places a short drive or train ride away.
    - 'Within 30km': half-day or full-day trips to nearby towns, nature parks or landmarks outside the city are welcome.
    - 'No preference': choose freely between central and further-afield activities.";

const PACING_GUIDE: &str = "\
    - 'Maximize Every Moment': full days with several activities from morning to night and little downtime.
    - 'Explore and Unwind': two or three main activities a day with leisure time in between.
    - 'Go with the Flow': one or two key activities a day and plenty of unplanned time.";

const GENERATION_RULES: &str = "\
Generation rules (mandatory):
1. Currency. Compare the home location with the destination.
   - International trip: every `estimatedCost` is in the destination's currency followed by an approximate amount in the traveller's home currency in parentheses, e.g. \"¥3,000 (approx. £15 GBP)\".
   - Domestic trip: a single local figure, e.g. \"£20 GBP\".
2. Opening days and holidays.
   - Check the usual opening days of every venue. Never schedule a venue on a day it is likely to be closed; suggest an alternative instead.
   - Look for public holidays, festivals or major events during the trip. When one falls on a day, add a short `note` to that day describing it and its impact. Leave `note` out otherwise.
3. Reservations. For restaurants give a `reservationLink` only when it is a real, working link (official site, Google Maps or a major booking platform). Never invent a URL; omit the field when no valid link exists.
4. Activity detail. For every activity fill in `estimatedCost`, `tradingHours`, `distanceFromCenter` and a practical `tip` wherever they apply.
5. Follow the supplied JSON schema exactly.
6. Keep the plan logical, geographically sensible and aligned with every preference above.
7. Greet the traveller by name in the `summary`.
8. After the daily plan add `alternativeSuggestions` with places that did not fit but are worth considering:
   - 3-5 `topRestaurants`
   - 3-5 `topExperiences` (museums, tours, viewpoints)
   - 3-5 `topBeaches` when the destination is coastal, otherwise an empty array
   - 2-3 `otherIdeas` (shops, parks, markets)
   Every item has a `name` and a short `description`. Use an empty array for any category with no good candidates.";

const REFINEMENT_RULES: &str = "\
Instructions:
1. Read the current itinerary and the request carefully.
2. Change `dailyPlan` and any other affected fields (such as `summary`) to reflect the request.
3. New activities follow the original rules: currency conversion, opening days, holiday notes and reliable reservation links.
4. Keep the plan logical, geographically sensible and consistent.
5. Return the complete updated itinerary, not only the changed parts, following the supplied JSON schema exactly.
6. Keep `alternativeSuggestions`. When the request involves one of the suggestions, update the daily plan and the suggestion lists together. Otherwise return `alternativeSuggestions` unchanged.";

/// Schema sent with both generation and refinement requests.
pub fn itinerary_response_schema() -> &'static SchemaHandle {
    ItineraryPlan::schema()
}

/// Prompt for a fresh itinerary. Every preference field appears in the text.
pub fn build_generation_prompt(prefs: &TripPreferences) -> String {
    let duration = prefs
        .trip_duration
        .map(|days| days.to_string())
        .unwrap_or_default();
    let budget = prefs.budget.map(|b| b.label()).unwrap_or_default();
    let pacing = prefs.pacing.map(|p| p.label()).unwrap_or_default();
    let inclusions = prefs
        .specific_inclusions
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .unwrap_or(NONE_GIVEN);

    let mut prompt = String::new();
    let _ = writeln!(prompt, "Create a personalised travel itinerary for {}.", prefs.name);
    prompt.push_str(
        "You are an expert travel planner known for memorable, practical and well-structured trips.\n\n",
    );

    prompt.push_str("Trip details:\n");
    let _ = writeln!(prompt, "- Travelling from: {} (the traveller's home)", prefs.travel_from);
    let _ = writeln!(prompt, "- Destination: {}", prefs.destination);
    let _ = writeln!(
        prompt,
        "- Travel radius: {}. Interpret it as follows:\n{}",
        prefs.travel_radius, TRAVEL_RADIUS_GUIDE
    );
    let _ = writeln!(prompt, "- Start date: {}", prefs.start_date);
    let _ = writeln!(prompt, "- Trip duration: {duration} days");
    let _ = writeln!(prompt, "- Number of travellers: {}", prefs.number_of_travelers);
    let _ = writeln!(
        prompt,
        "- First-time visitor: {}",
        if prefs.first_time_visitor { "yes" } else { "no" }
    );
    let _ = writeln!(prompt, "- Purpose of trip: {}", normalize_purpose(prefs));

    prompt.push_str("\nPreferences:\n");
    let _ = writeln!(
        prompt,
        "- Budget level: {budget} (match activities and dining to it; \"Mix\" means a combination of levels)"
    );
    let _ = writeln!(
        prompt,
        "- Daily rhythm: {pacing}. Interpret it as follows:\n{PACING_GUIDE}"
    );
    let _ = writeln!(prompt, "- Top interests: {}", normalize_interests(prefs));
    let _ = writeln!(prompt, "- Specific inclusions or requests: {inclusions}");

    prompt.push('\n');
    prompt.push_str(GENERATION_RULES);
    prompt.push('\n');
    prompt
}

/// Prompt asking for a full replacement of `plan` according to `request`.
pub fn build_refinement_prompt(plan: &ItineraryPlan, request: &str) -> Result<String> {
    let current = serde_json::to_string(plan)?;

    let mut prompt = String::from(
        "You are an expert travel planner. A traveller has an itinerary and wants a change.\n\
         Apply the change and return the full updated itinerary in the same JSON format.\n\n",
    );
    let _ = writeln!(prompt, "Current itinerary (JSON):\n{current}\n");
    let _ = writeln!(prompt, "Requested change:\n\"{request}\"\n");
    prompt.push_str(REFINEMENT_RULES);
    prompt.push('\n');
    Ok(prompt)
}
