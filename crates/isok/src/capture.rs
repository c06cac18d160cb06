use std::any::Any;
use std::cell::Cell;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Once;

use tracing::debug;

/// The value a captured panic unwound with.
///
/// Every unwind carries a payload, so there is no "panicked with nothing"
/// case: a panic is a panic whatever it carried.
#[derive(Debug)]
pub struct Payload(Box<dyn Any + Send>);

impl Payload {
    /// The payload as text, when it was raised by `panic!` or with a string.
    pub fn as_str(&self) -> Option<&str> {
        if let Some(s) = self.0.downcast_ref::<&'static str>() {
            return Some(s);
        }
        self.0.downcast_ref::<String>().map(String::as_str)
    }

    /// Exact match against a textual payload. Non-text payloads never match.
    pub fn is(&self, message: &str) -> bool {
        self.as_str() == Some(message)
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(s) = self.as_str() {
            return f.write_str(s);
        }
        macro_rules! primitive {
            ($($ty:ty),+) => {
                $(
                    if let Some(v) = self.0.downcast_ref::<$ty>() {
                        return write!(f, "{v}");
                    }
                )+
            };
        }
        primitive!(
            i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, bool, char
        );
        f.write_str("Box<dyn Any>")
    }
}

// Depth of `capture` calls on this thread. The panic hook is quiet while
// it is non-zero.
thread_local! {
    static CAPTURE_DEPTH: Cell<usize> = const { Cell::new(0) };
}

static QUIET_HOOK: Once = Once::new();

/// Wrap the current panic hook so it is skipped for captured panics.
/// Panics outside `capture`, and on other threads, still reach it.
fn install_quiet_hook() {
    QUIET_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if !capturing() {
                previous(info);
            }
        }));
    });
}

fn capturing() -> bool {
    CAPTURE_DEPTH.with(Cell::get) > 0
}

struct DepthGuard;

impl DepthGuard {
    fn enter() -> Self {
        CAPTURE_DEPTH.with(|d| d.set(d.get() + 1));
        DepthGuard
    }
}

impl Drop for DepthGuard {
    fn drop(&mut self) {
        CAPTURE_DEPTH.with(|d| d.set(d.get().saturating_sub(1)));
    }
}

/// Run `f` to completion or until it unwinds, returning the payload if it
/// panicked. The unwind stops here and never reaches the caller.
///
/// The default "thread panicked at" report is suppressed for the captured
/// panic.
pub fn capture<F: FnOnce()>(f: F) -> Option<Payload> {
    install_quiet_hook();
    let outcome = {
        let _depth = DepthGuard::enter();
        panic::catch_unwind(AssertUnwindSafe(f))
    };
    match outcome {
        Ok(()) => None,
        Err(raw) => {
            let payload = Payload(raw);
            debug!(event = "isok.panic.captured", payload = %payload);
            Some(payload)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_no_panic() {
        assert!(capture(|| {}).is_none());
    }

    #[test]
    fn test_capture_static_str_payload() {
        let payload = capture(|| panic!("boom")).unwrap();
        assert_eq!(payload.as_str(), Some("boom"));
        assert!(payload.is("boom"));
        assert!(!payload.is("boo"));
        assert_eq!(payload.to_string(), "boom");
    }

    #[test]
    fn test_capture_formatted_payload() {
        let n = 3;
        let payload = capture(|| panic!("bad {n}")).unwrap();
        assert_eq!(payload.as_str(), Some("bad 3"));
    }

    #[test]
    fn test_capture_non_string_payload() {
        let payload = capture(|| std::panic::panic_any(42_u8)).unwrap();
        assert_eq!(payload.as_str(), None);
        assert!(!payload.is("42"));
        assert_eq!(payload.to_string(), "42");
    }

    #[test]
    fn test_primitive_payloads_render_their_value() {
        let render = |f: fn()| capture(f).map(|p| p.to_string());
        assert_eq!(render(|| std::panic::panic_any(42_i32)).as_deref(), Some("42"));
        assert_eq!(render(|| std::panic::panic_any(-7_i64)).as_deref(), Some("-7"));
        assert_eq!(render(|| std::panic::panic_any(true)).as_deref(), Some("true"));
        assert_eq!(render(|| std::panic::panic_any('x')).as_deref(), Some("x"));
        assert_eq!(render(|| std::panic::panic_any(1.5_f64)).as_deref(), Some("1.5"));
    }

    #[test]
    fn test_other_payloads_fall_back_to_type() {
        let payload = capture(|| std::panic::panic_any(vec![1_u8])).unwrap();
        assert_eq!(payload.to_string(), "Box<dyn Any>");
    }

    #[test]
    fn test_hook_is_quiet_only_inside_capture() {
        assert!(!capturing());
        let mut inside = false;
        let outer = capture(|| {
            inside = capturing();
            let inner = capture(|| panic!("inner"));
            assert!(inner.is_some());
            assert!(capturing());
            panic!("outer");
        });
        assert!(inside);
        assert!(outer.unwrap().is("outer"));
        assert!(!capturing());
    }

    #[test]
    fn test_capture_unit_payload_still_counts() {
        assert!(capture(|| std::panic::panic_any(())).is_some());
    }

    #[test]
    fn test_capture_runs_closure_exactly_once() {
        let mut calls = 0;
        let result = capture(|| {
            calls += 1;
        });
        assert!(result.is_none());
        assert_eq!(calls, 1);
    }
}
