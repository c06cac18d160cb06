use std::panic::Location;
use std::sync::{Mutex, PoisonError};

use tracing::error;

use crate::capture::capture;
use crate::classify::{Okay, OkayAll, check};
use crate::config::AsserterConfig;
use crate::equality::are_equal;
use crate::errors::Failure;
use crate::reporter::{FailureEvent, PanicReporter, Reporter};
use crate::value::Inspect;

static PANIC_REPORTER: PanicReporter = PanicReporter;

/// Create an asserter that fails the current test by panicking.
pub fn new() -> Asserter<'static> {
    Asserter::new(&PANIC_REPORTER)
}

/// Makes assertions inside one test.
///
/// Passing assertions have no effect. A failing assertion is logged, stored
/// as the last failure, and handed to the reporter, which aborts the test.
/// An asserter can be shared by reference between threads of the same test.
pub struct Asserter<'r> {
    reporter: &'r dyn Reporter,
    config: AsserterConfig,
    last: Mutex<Option<Failure>>,
}

impl<'r> Asserter<'r> {
    pub fn new(reporter: &'r dyn Reporter) -> Self {
        Self::with_config(reporter, AsserterConfig::default())
    }

    pub fn with_config(reporter: &'r dyn Reporter, config: AsserterConfig) -> Self {
        Self {
            reporter,
            config,
            last: Mutex::new(None),
        }
    }

    pub fn config(&self) -> AsserterConfig {
        self.config
    }

    /// Assert that `value` is OK for its kind: `true`, non-zero, non-empty,
    /// not nil, no error, or a callable that does not panic.
    #[track_caller]
    pub fn ok<T: Okay>(&self, value: T) {
        let location = Location::caller();
        if let Err(failure) = check(value.classify()) {
            self.fail(failure, location);
        }
    }

    /// Assert that every value is OK, in order.
    ///
    /// Stops at the first failure; later values are never looked at, so a
    /// later callable is never invoked.
    #[track_caller]
    pub fn ok_all<T: OkayAll>(&self, values: T) {
        let location = Location::caller();
        if let Err(failure) = values.check_all() {
            self.fail(failure, location);
        }
    }

    /// Assert that `a` and `b` are effectively equal. Non strict: exact
    /// numeric conversions between types are allowed.
    #[track_caller]
    pub fn equal<A: Inspect, B: Inspect>(&self, a: A, b: B) {
        let location = Location::caller();
        let (a, b) = (a.inspect(), b.inspect());
        if !are_equal(&a, &b) {
            self.fail(
                Failure::NotEqual {
                    left: a.to_string(),
                    right: b.to_string(),
                },
                location,
            );
        }
    }

    /// Assert that `f` panics.
    #[track_caller]
    pub fn panic<F: FnOnce()>(&self, f: F) {
        let location = Location::caller();
        if capture(f).is_none() {
            self.fail(Failure::ExpectedPanic, location);
        }
    }

    /// Assert that `f` panics with exactly `message`.
    #[track_caller]
    pub fn panic_with<F: FnOnce()>(&self, message: &str, f: F) {
        let location = Location::caller();
        match capture(f) {
            Some(payload) if payload.is(message) => {}
            _ => self.fail(
                Failure::ExpectedPanicWith {
                    message: message.to_string(),
                },
                location,
            ),
        }
    }

    /// The most recent failure, if any assertion has failed.
    pub fn last_failure(&self) -> Option<Failure> {
        self.last
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The most recent failure message, e.g. `unexpected zero`.
    pub fn last_message(&self) -> Option<String> {
        self.last_failure().map(|f| f.to_string())
    }

    fn fail(&self, failure: Failure, location: &'static Location<'static>) {
        error!(
            event = "isok.assert.failed",
            code = failure.code(),
            file = location.file(),
            line = location.line(),
            message = %failure
        );

        let report = FailureEvent::new(failure, location);
        {
            let mut last = self.last.lock().unwrap_or_else(PoisonError::into_inner);
            *last = Some(report.failure.clone());
            if self.config.echo {
                if self.config.decorate {
                    eprintln!("\t{report}");
                } else {
                    eprintln!("\t{}", report.failure);
                }
            }
        }

        // Must come after the lock is released: real reporters do not return.
        self.reporter.fail_now(&report);
    }
}
