//! Submission state shared by the intake, recommendation and diagnosis flows
//!
//! `Idle → Submitting → {Success | Failed}`, back to `Idle` on input change.
//! Each request is issued a [`Ticket`]; a result is applied only while its
//! ticket is still the active one, so late or superseded responses are
//! dropped instead of overwriting newer state.

use crate::error::{ClientError, ClientResult};

/// Observable state of one result slot
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionState<T> {
    Idle,
    /// A request is outstanding; the last good result stays visible
    Submitting { previous: Option<T> },
    Success(T),
    /// The attempt failed; the last good result stays visible
    Failed {
        error: ClientError,
        previous: Option<T>,
    },
}

impl<T> Default for SubmissionState<T> {
    fn default() -> Self {
        SubmissionState::Idle
    }
}

impl<T> SubmissionState<T> {
    pub fn is_idle(&self) -> bool {
        matches!(self, SubmissionState::Idle)
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self, SubmissionState::Submitting { .. })
    }

    /// Latest successful result, including one retained through a failure
    pub fn result(&self) -> Option<&T> {
        match self {
            SubmissionState::Idle => None,
            SubmissionState::Submitting { previous } => previous.as_ref(),
            SubmissionState::Success(value) => Some(value),
            SubmissionState::Failed { previous, .. } => previous.as_ref(),
        }
    }

    pub fn error(&self) -> Option<&ClientError> {
        match self {
            SubmissionState::Failed { error, .. } => Some(error),
            _ => None,
        }
    }

    fn into_result(self) -> Option<T> {
        match self {
            SubmissionState::Idle => None,
            SubmissionState::Submitting { previous } => previous,
            SubmissionState::Success(value) => Some(value),
            SubmissionState::Failed { previous, .. } => previous,
        }
    }
}

/// Tag identifying one issued request and the input it was issued for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket<K> {
    generation: u64,
    key: K,
}

impl<K> Ticket<K> {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn key(&self) -> &K {
        &self.key
    }
}

/// Outcome of one request, tagged with the ticket it was issued under
#[derive(Debug)]
pub struct Completed<K, T> {
    pub ticket: Ticket<K>,
    pub outcome: ClientResult<T>,
}

/// In-memory result slot owned by one component
#[derive(Debug, Clone)]
pub struct ResultSlot<K, T> {
    generation: u64,
    key: Option<K>,
    active: Option<Ticket<K>>,
    state: SubmissionState<T>,
    closed: bool,
}

impl<K, T> Default for ResultSlot<K, T> {
    fn default() -> Self {
        Self {
            generation: 0,
            key: None,
            active: None,
            state: SubmissionState::Idle,
            closed: false,
        }
    }
}

impl<K: Clone + PartialEq, T> ResultSlot<K, T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SubmissionState<T> {
        &self.state
    }

    /// Input the current state belongs to
    pub fn key(&self) -> Option<&K> {
        self.key.as_ref()
    }

    pub fn is_submitting(&self) -> bool {
        self.active.is_some()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Start a request for `key`, superseding any outstanding one
    ///
    /// A previous result is carried through only when it belongs to the same
    /// key; results for other inputs are dropped.
    pub fn begin(&mut self, key: K) -> Ticket<K> {
        self.generation += 1;

        let same_key = self.key.as_ref() == Some(&key);
        let previous = std::mem::take(&mut self.state).into_result();
        self.state = SubmissionState::Submitting {
            previous: if same_key { previous } else { None },
        };

        let ticket = Ticket {
            generation: self.generation,
            key: key.clone(),
        };
        self.key = Some(key);
        self.active = Some(ticket.clone());
        self.closed = false;
        ticket
    }

    /// Apply the outcome of a request; returns whether it was applied
    ///
    /// Outcomes for superseded, reset or closed tickets are discarded.
    pub fn settle(&mut self, ticket: &Ticket<K>, outcome: Result<T, ClientError>) -> bool {
        if self.closed || self.active.as_ref() != Some(ticket) {
            tracing::debug!(
                generation = ticket.generation,
                current = self.generation,
                "Discarding stale result"
            );
            return false;
        }

        self.active = None;
        let previous = std::mem::take(&mut self.state).into_result();
        self.state = match outcome {
            Ok(value) => SubmissionState::Success(value),
            Err(error) => SubmissionState::Failed { error, previous },
        };
        true
    }

    pub fn apply(&mut self, completed: Completed<K, T>) -> bool {
        self.settle(&completed.ticket, completed.outcome)
    }

    /// Record a failure that happened before any request was issued
    pub fn fail(&mut self, key: K, error: ClientError) {
        self.generation += 1;
        let previous = if self.key.as_ref() == Some(&key) {
            std::mem::take(&mut self.state).into_result()
        } else {
            None
        };
        self.key = Some(key);
        self.active = None;
        self.state = SubmissionState::Failed { error, previous };
    }

    /// Input changed: back to `Idle`, clearing results and in-flight requests
    pub fn reset(&mut self) {
        self.generation += 1;
        self.key = None;
        self.active = None;
        self.state = SubmissionState::Idle;
    }

    /// The owning view went away; any late result is discarded
    pub fn close(&mut self) {
        self.reset();
        self.closed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failure() -> ClientError {
        ClientError::RecommendationFetch("API returned 500".to_string())
    }

    #[test]
    fn test_success_path() {
        let mut slot: ResultSlot<&str, u32> = ResultSlot::new();
        assert!(slot.state().is_idle());

        let ticket = slot.begin("f-1");
        assert!(slot.state().is_submitting());
        assert!(slot.is_submitting());

        assert!(slot.settle(&ticket, Ok(7)));
        assert_eq!(slot.state(), &SubmissionState::Success(7));
        assert_eq!(slot.key(), Some(&"f-1"));
        assert!(!slot.is_submitting());
    }

    #[test]
    fn test_superseded_ticket_is_discarded() {
        let mut slot: ResultSlot<&str, u32> = ResultSlot::new();
        let first = slot.begin("f-1");
        let second = slot.begin("f-2");

        // Second completes first, then the slow first response arrives
        assert!(slot.settle(&second, Ok(2)));
        assert!(!slot.settle(&first, Ok(1)));

        assert_eq!(slot.state().result(), Some(&2));
        assert_eq!(slot.key(), Some(&"f-2"));
    }

    #[test]
    fn test_resubmission_for_same_key_is_a_new_generation() {
        let mut slot: ResultSlot<&str, u32> = ResultSlot::new();
        let first = slot.begin("f-1");
        let second = slot.begin("f-1");
        assert_ne!(first, second);
        assert!(!slot.settle(&first, Ok(1)));
        assert!(slot.settle(&second, Ok(2)));
    }

    #[test]
    fn test_failure_keeps_previous_result_for_same_key() {
        let mut slot: ResultSlot<&str, u32> = ResultSlot::new();
        let ticket = slot.begin("f-1");
        slot.settle(&ticket, Ok(5));

        let retry = slot.begin("f-1");
        assert_eq!(slot.state().result(), Some(&5));
        slot.settle(&retry, Err(failure()));

        assert_eq!(slot.state().result(), Some(&5));
        assert_eq!(slot.state().error(), Some(&failure()));
    }

    #[test]
    fn test_new_key_drops_previous_result() {
        let mut slot: ResultSlot<&str, u32> = ResultSlot::new();
        let ticket = slot.begin("f-1");
        slot.settle(&ticket, Ok(5));

        let other = slot.begin("f-2");
        assert_eq!(slot.state().result(), None);
        slot.settle(&other, Err(failure()));
        assert_eq!(slot.state().result(), None);
    }

    #[test]
    fn test_reset_invalidates_in_flight_request() {
        let mut slot: ResultSlot<&str, u32> = ResultSlot::new();
        let ticket = slot.begin("f-1");
        slot.reset();

        assert!(!slot.settle(&ticket, Ok(1)));
        assert!(slot.state().is_idle());
        assert_eq!(slot.key(), None);
    }

    #[test]
    fn test_close_discards_late_result() {
        let mut slot: ResultSlot<&str, u32> = ResultSlot::new();
        let ticket = slot.begin("f-1");
        slot.close();

        assert!(slot.is_closed());
        assert!(!slot.settle(&ticket, Ok(1)));
        assert!(slot.state().is_idle());
    }

    #[test]
    fn test_fail_before_request() {
        let mut slot: ResultSlot<u64, u32> = ResultSlot::new();
        slot.fail(1, failure());
        assert_eq!(slot.state().error(), Some(&failure()));
        assert!(!slot.is_submitting());
    }
}
