//! The failure-reporting seam between assertions and the test framework.
//!
//! An [`Asserter`](crate::Asserter) never decides how a test stops. Every
//! failed assertion becomes a [`FailureEvent`] handed to a [`Reporter`], and
//! the reporter performs the abort.

use std::fmt;
use std::panic::Location;
use std::sync::{Mutex, PoisonError};

use crate::errors::Failure;

/// A single failed assertion together with the call site that made it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureEvent {
    pub failure: Failure,
    pub location: &'static Location<'static>,
}

impl FailureEvent {
    pub fn new(failure: Failure, location: &'static Location<'static>) -> Self {
        Self { failure, location }
    }

    /// The undecorated contract message, e.g. `unexpected zero`.
    pub fn message(&self) -> String {
        self.failure.to_string()
    }
}

impl fmt::Display for FailureEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: {}",
            self.location.file(),
            self.location.line(),
            self.failure
        )
    }
}

/// Something that can abort the current test.
///
/// Reporters used with real tests must not return from [`fail_now`]; the
/// asserter still stops evaluating after the call so that recording
/// reporters observe exactly one event per failed assertion.
///
/// [`fail_now`]: Reporter::fail_now
pub trait Reporter: Send + Sync {
    fn fail_now(&self, event: &FailureEvent);
}

/// Fails the test by panicking, which is how the Rust test harness marks a
/// test as failed.
#[derive(Debug, Default, Clone, Copy)]
pub struct PanicReporter;

impl Reporter for PanicReporter {
    fn fail_now(&self, event: &FailureEvent) {
        panic!("{event}");
    }
}

/// Records failures instead of aborting. Used to test assertions themselves.
#[derive(Debug, Default)]
pub struct Recorder {
    events: Mutex<Vec<FailureEvent>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failed(&self) -> bool {
        !self.lock().is_empty()
    }

    pub fn events(&self) -> Vec<FailureEvent> {
        self.lock().clone()
    }

    pub fn failures(&self) -> Vec<Failure> {
        self.lock().iter().map(|e| e.failure.clone()).collect()
    }

    pub fn last(&self) -> Option<FailureEvent> {
        self.lock().last().cloned()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<FailureEvent>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Reporter for Recorder {
    fn fail_now(&self, event: &FailureEvent) {
        self.lock().push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[track_caller]
    fn event(failure: Failure) -> FailureEvent {
        FailureEvent::new(failure, Location::caller())
    }

    #[test]
    fn test_event_display_is_decorated() {
        let e = event(Failure::UnexpectedFalse);
        let rendered = e.to_string();
        assert!(rendered.starts_with(file!()));
        assert!(rendered.ends_with(": unexpected false"));
        assert_eq!(e.message(), "unexpected false");
    }

    #[test]
    fn test_recorder_collects_in_order() {
        let recorder = Recorder::new();
        assert!(!recorder.failed());
        recorder.fail_now(&event(Failure::UnexpectedNil));
        recorder.fail_now(&event(Failure::ExpectedPanic));
        assert!(recorder.failed());
        assert_eq!(
            recorder.failures(),
            vec![Failure::UnexpectedNil, Failure::ExpectedPanic]
        );
        assert_eq!(
            recorder.last().map(|e| e.failure),
            Some(Failure::ExpectedPanic)
        );
        recorder.clear();
        assert!(!recorder.failed());
        assert!(recorder.events().is_empty());
    }

    #[test]
    fn test_panic_reporter_panics_with_decorated_message() {
        let result = std::panic::catch_unwind(|| {
            PanicReporter.fail_now(&event(Failure::UnexpectedZero));
        });
        let payload = result.unwrap_err();
        let message = payload.downcast_ref::<String>().unwrap();
        assert!(message.ends_with(": unexpected zero"));
    }
}
