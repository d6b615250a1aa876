use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, info};

use crate::core::planner::Planner;
use crate::error::{ItineraryError, Operation, Result};
use crate::types::itinerary::ItineraryPlan;
use crate::types::preferences::TripPreferences;

/// Where a session is in its request lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RequestState {
    #[default]
    Idle,
    Requesting,
    Succeeded,
    Failed,
}

#[derive(Debug, Default)]
struct SessionState {
    request: RequestState,
    plan: Option<ItineraryPlan>,
    last_error_code: Option<&'static str>,
    last_error_message: Option<String>,
}

/// One traveller's planning session: a current plan plus at most one request in flight.
///
/// A successful generate or refine replaces the plan as a whole. A failed one leaves the
/// previous plan untouched. The lock is only held between awaits, never across one.
#[derive(Debug)]
pub struct PlannerSession {
    planner: Planner,
    state: Mutex<SessionState>,
}

impl PlannerSession {
    pub fn new(planner: Planner) -> Self {
        Self {
            planner,
            state: Mutex::new(SessionState::default()),
        }
    }

    pub fn planner(&self) -> &Planner {
        &self.planner
    }

    pub fn state(&self) -> RequestState {
        self.lock().request
    }

    pub fn current_plan(&self) -> Option<ItineraryPlan> {
        self.lock().plan.clone()
    }

    /// Code of the most recent upstream failure, cleared by the next success.
    pub fn last_error_code(&self) -> Option<&'static str> {
        self.lock().last_error_code
    }

    pub fn last_error_message(&self) -> Option<String> {
        self.lock().last_error_message.clone()
    }

    /// Drop the current plan and return to `Idle`. Refused while a request is in flight.
    pub fn reset(&self) -> Result<()> {
        let mut state = self.lock();
        if state.request == RequestState::Requesting {
            return Err(ItineraryError::RequestInFlight);
        }
        *state = SessionState::default();
        debug!(target: "itinerae::session", "session reset");
        Ok(())
    }

    pub async fn generate(&self, preferences: &TripPreferences) -> Result<ItineraryPlan> {
        let (ticket, _) = self.begin(Operation::Generate)?;
        let outcome = self.planner.generate(preferences).await;
        ticket.finish(outcome)
    }

    /// Refine the current plan. Fails locally when there is no plan yet.
    pub async fn refine(&self, request: &str) -> Result<ItineraryPlan> {
        let (ticket, current) = self.begin(Operation::Refine)?;
        let outcome = self.planner.refine(current.as_ref(), request).await;
        ticket.finish(outcome)
    }

    fn begin(&self, operation: Operation) -> Result<(InFlight<'_>, Option<ItineraryPlan>)> {
        let mut state = self.lock();
        if state.request == RequestState::Requesting {
            debug!(target: "itinerae::session", %operation, "request already in flight");
            return Err(ItineraryError::RequestInFlight);
        }

        let previous = state.request;
        state.request = RequestState::Requesting;
        let current = state.plan.clone();
        drop(state);

        debug!(target: "itinerae::session", %operation, "request started");
        Ok((
            InFlight {
                session: self,
                operation,
                previous,
                settled: false,
            },
            current,
        ))
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Marks the session as `Requesting` until settled. Dropping it unsettled (the caller
/// abandoned the future) puts the previous state back.
struct InFlight<'a> {
    session: &'a PlannerSession,
    operation: Operation,
    previous: RequestState,
    settled: bool,
}

impl InFlight<'_> {
    fn finish(mut self, outcome: Result<ItineraryPlan>) -> Result<ItineraryPlan> {
        let mut state = self.session.lock();
        match &outcome {
            Ok(plan) => {
                state.plan = Some(plan.clone());
                state.request = RequestState::Succeeded;
                state.last_error_code = None;
                state.last_error_message = None;
                info!(
                    target: "itinerae::session",
                    operation = %self.operation,
                    "plan replaced"
                );
            }
            Err(err) if err.is_local() => {
                state.request = self.previous;
            }
            Err(err) => {
                state.request = RequestState::Failed;
                state.last_error_code = Some(err.error_code());
                state.last_error_message = Some(err.to_string());
            }
        }
        drop(state);

        self.settled = true;
        outcome
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.session.lock().request = self.previous;
        }
    }
}
