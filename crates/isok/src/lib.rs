//! # isok
//!
//! A mini assertion helper for unit tests.
//!
//! ```
//! let is = isok::new();
//! let greeting: Result<&str, std::io::Error> = Ok("Hello world");
//! is.ok(&greeting);
//! is.ok(greeting.as_ref().map(|s| s.len()).unwrap_or(0));
//! is.equal(greeting.unwrap(), "Hello world");
//! is.panic_with("boom", || panic!("boom"));
//! ```
//!
//! # OK
//!
//! [`Asserter::ok`] asserts that a value is OK, which means different things
//! for different kinds of value:
//!
//! - callable ([`call`]): invoking it does not panic
//! - error (`Result`, error types): no error
//! - text: not `""`
//! - `bool`: not `false`
//! - `Option`, raw pointers: not nil
//! - numbers: not zero
//! - everything else: always OK
//!
//! # Equal
//!
//! [`Asserter::equal`] asserts that two values are effectively equal. See
//! [`equality::are_equal`] for the exact rules.
//!
//! # Panic
//!
//! [`Asserter::panic`] and [`Asserter::panic_with`] assert that a closure
//! panics, optionally with an exact message. The panic never escapes.

mod asserter;
mod capture;
mod classify;
mod config;

pub mod equality;
pub mod errors;
pub mod logging;
pub mod reporter;
pub mod value;

// Public API re-exports
pub use asserter::{Asserter, new};
pub use capture::{Payload, capture};
pub use classify::{Call, Class, Okay, OkayAll, call, check};
pub use config::AsserterConfig;
pub use errors::Failure;
pub use logging::init_logging;
pub use reporter::{FailureEvent, PanicReporter, Recorder, Reporter};
pub use value::{Inspect, Nil, NumType, Value};
