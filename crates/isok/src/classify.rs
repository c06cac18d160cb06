//! The "is this value OK" predicate.
//!
//! Every checkable type implements [`Okay`] and reports exactly one [`Class`].
//! The category decides what acceptable means. When a type could belong to
//! several categories it reports the first one in this order:
//!
//! 1. callable: must not panic when invoked
//! 2. error-like: the error must be absent
//! 3. text: must be non-empty
//! 4. boolean: must be `true`
//! 5. reference-like: must not be nil
//! 6. numeric: must not be zero
//! 7. anything else: always acceptable, since it cannot be nil

use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::error::Error;
use std::fmt;
use std::num::{
    NonZeroI8, NonZeroI16, NonZeroI32, NonZeroI64, NonZeroI128, NonZeroIsize, NonZeroU8,
    NonZeroU16, NonZeroU32, NonZeroU64, NonZeroU128, NonZeroUsize,
};
use std::rc::Rc;
use std::sync::Arc;

use crate::capture::capture;
use crate::errors::Failure;
use crate::value::Nil;

/// The category a value falls into, with just enough data to judge it.
pub enum Class<'a> {
    Callable(&'a dyn Fn()),
    /// `None` means no error. `Some` carries the error's message.
    ErrorLike(Option<String>),
    Text(&'a str),
    Bool(bool),
    Reference {
        nil: bool,
    },
    Numeric {
        zero: bool,
    },
    Other,
}

impl fmt::Debug for Class<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Class::Callable(_) => f.write_str("Callable"),
            Class::ErrorLike(e) => f.debug_tuple("ErrorLike").field(e).finish(),
            Class::Text(s) => f.debug_tuple("Text").field(s).finish(),
            Class::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Class::Reference { nil } => f.debug_struct("Reference").field("nil", nil).finish(),
            Class::Numeric { zero } => f.debug_struct("Numeric").field("zero", zero).finish(),
            Class::Other => f.write_str("Other"),
        }
    }
}

/// A value the `OK` predicate knows how to judge.
pub trait Okay {
    /// Error-like types: an absent value of this type means "no error"
    /// rather than "nil".
    const ERROR_LIKE: bool = false;

    fn classify(&self) -> Class<'_>;
}

/// Judge a classified value.
///
/// Callables are invoked here, and only here, so a value is never run
/// unless it is actually being checked.
pub fn check(class: Class<'_>) -> Result<(), Failure> {
    match class {
        Class::Callable(f) => match capture(f) {
            Some(payload) => Err(Failure::UnexpectedPanic {
                payload: payload.to_string(),
            }),
            None => Ok(()),
        },
        Class::ErrorLike(Some(message)) => Err(Failure::UnexpectedError { message }),
        Class::ErrorLike(None) => Ok(()),
        Class::Text("") => Err(Failure::UnexpectedEmpty),
        Class::Text(_) => Ok(()),
        Class::Bool(false) => Err(Failure::UnexpectedFalse),
        Class::Bool(true) => Ok(()),
        Class::Reference { nil: true } => Err(Failure::UnexpectedNil),
        Class::Reference { nil: false } => Ok(()),
        Class::Numeric { zero: true } => Err(Failure::UnexpectedZero),
        Class::Numeric { zero: false } => Ok(()),
        Class::Other => Ok(()),
    }
}

/// Several values checked in order, stopping at the first failure.
pub trait OkayAll {
    fn check_all(self) -> Result<(), Failure>;
}

// --- Callables ---

/// Wraps a closure so it is checked as a callable.
pub struct Call<F>(pub F);

/// Mark `f` as a callable for `OK`: it passes when invoking it does not panic.
pub fn call<F: Fn()>(f: F) -> Call<F> {
    Call(f)
}

impl<F: Fn()> Okay for Call<F> {
    fn classify(&self) -> Class<'_> {
        Class::Callable(&self.0)
    }
}

impl Okay for fn() {
    fn classify(&self) -> Class<'_> {
        Class::Callable(self)
    }
}

// --- Error-like ---

/// Implement [`Okay`] for error types: a present value is always an
/// unexpected error, and `Option::None` of the type is no error.
#[macro_export]
macro_rules! okay_error {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::Okay for $ty {
                const ERROR_LIKE: bool = true;

                fn classify(&self) -> $crate::Class<'_> {
                    $crate::Class::ErrorLike(Some(self.to_string()))
                }
            }
        )+
    };
}

okay_error!(
    std::io::Error,
    std::fmt::Error,
    std::num::ParseIntError,
    std::num::ParseFloatError,
    std::num::TryFromIntError,
    std::str::ParseBoolError,
    std::str::Utf8Error,
    std::string::FromUtf8Error,
    std::char::ParseCharError,
    std::env::VarError,
    std::sync::mpsc::RecvError,
);

impl Okay for dyn Error + '_ {
    const ERROR_LIKE: bool = true;

    fn classify(&self) -> Class<'_> {
        Class::ErrorLike(Some(self.to_string()))
    }
}

impl Okay for dyn Error + Send + '_ {
    const ERROR_LIKE: bool = true;

    fn classify(&self) -> Class<'_> {
        Class::ErrorLike(Some(self.to_string()))
    }
}

impl Okay for dyn Error + Send + Sync + '_ {
    const ERROR_LIKE: bool = true;

    fn classify(&self) -> Class<'_> {
        Class::ErrorLike(Some(self.to_string()))
    }
}

/// `Ok` is no error whatever it holds; `Err` is always an unexpected error.
impl<T, E: fmt::Display> Okay for Result<T, E> {
    const ERROR_LIKE: bool = true;

    fn classify(&self) -> Class<'_> {
        match self {
            Ok(_) => Class::ErrorLike(None),
            Err(e) => Class::ErrorLike(Some(e.to_string())),
        }
    }
}

// --- Text ---

impl Okay for str {
    fn classify(&self) -> Class<'_> {
        Class::Text(self)
    }
}

impl Okay for String {
    fn classify(&self) -> Class<'_> {
        Class::Text(self)
    }
}

impl Okay for Cow<'_, str> {
    fn classify(&self) -> Class<'_> {
        Class::Text(self)
    }
}

// --- Boolean ---

impl Okay for bool {
    fn classify(&self) -> Class<'_> {
        Class::Bool(*self)
    }
}

// --- Reference-like ---

/// `None` is nil, unless `T` is error-like, where `None` is "no error".
impl<T: Okay> Okay for Option<T> {
    const ERROR_LIKE: bool = T::ERROR_LIKE;

    fn classify(&self) -> Class<'_> {
        match self {
            None if T::ERROR_LIKE => Class::ErrorLike(None),
            None => Class::Reference { nil: true },
            Some(inner) if T::ERROR_LIKE => inner.classify(),
            Some(_) => Class::Reference { nil: false },
        }
    }
}

impl<T: ?Sized> Okay for *const T {
    fn classify(&self) -> Class<'_> {
        Class::Reference {
            nil: self.is_null(),
        }
    }
}

impl<T: ?Sized> Okay for *mut T {
    fn classify(&self) -> Class<'_> {
        Class::Reference {
            nil: self.is_null(),
        }
    }
}

impl Okay for Nil {
    fn classify(&self) -> Class<'_> {
        Class::Reference { nil: true }
    }
}

macro_rules! okay_collection {
    ($($ty:ty => [$($param:tt)*]),+ $(,)?) => {
        $(
            impl<$($param)*> Okay for $ty {
                fn classify(&self) -> Class<'_> {
                    Class::Reference { nil: false }
                }
            }
        )+
    };
}

okay_collection!(
    Vec<T> => [T],
    [T] => [T],
    VecDeque<T> => [T],
    HashMap<K, V, S> => [K, V, S],
    BTreeMap<K, V> => [K, V],
    HashSet<T, S> => [T, S],
    BTreeSet<T> => [T],
);

// Pointers in Rust are never null; they are as OK as what they point to.

impl<T: Okay + ?Sized> Okay for &T {
    const ERROR_LIKE: bool = T::ERROR_LIKE;

    fn classify(&self) -> Class<'_> {
        (**self).classify()
    }
}

impl<T: Okay + ?Sized> Okay for &mut T {
    const ERROR_LIKE: bool = T::ERROR_LIKE;

    fn classify(&self) -> Class<'_> {
        (**self).classify()
    }
}

impl<T: Okay + ?Sized> Okay for Box<T> {
    const ERROR_LIKE: bool = T::ERROR_LIKE;

    fn classify(&self) -> Class<'_> {
        (**self).classify()
    }
}

impl<T: Okay + ?Sized> Okay for Rc<T> {
    const ERROR_LIKE: bool = T::ERROR_LIKE;

    fn classify(&self) -> Class<'_> {
        (**self).classify()
    }
}

impl<T: Okay + ?Sized> Okay for Arc<T> {
    const ERROR_LIKE: bool = T::ERROR_LIKE;

    fn classify(&self) -> Class<'_> {
        (**self).classify()
    }
}

// --- Numeric ---

macro_rules! okay_numeric {
    ($zero:expr => $($ty:ty),+) => {
        $(
            impl Okay for $ty {
                fn classify(&self) -> Class<'_> {
                    Class::Numeric { zero: *self == $zero }
                }
            }
        )+
    };
}

okay_numeric!(0 => i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
okay_numeric!(0.0 => f32, f64);
okay_numeric!('\0' => char);

macro_rules! okay_non_zero {
    ($($ty:ty),+) => {
        $(
            impl Okay for $ty {
                fn classify(&self) -> Class<'_> {
                    Class::Numeric { zero: false }
                }
            }
        )+
    };
}

okay_non_zero!(
    NonZeroI8,
    NonZeroI16,
    NonZeroI32,
    NonZeroI64,
    NonZeroI128,
    NonZeroIsize,
    NonZeroU8,
    NonZeroU16,
    NonZeroU32,
    NonZeroU64,
    NonZeroU128,
    NonZeroUsize
);

// --- Everything else ---

impl Okay for () {
    fn classify(&self) -> Class<'_> {
        Class::Other
    }
}

impl<T, const N: usize> Okay for [T; N] {
    fn classify(&self) -> Class<'_> {
        Class::Other
    }
}

// --- Multiple values ---

macro_rules! okay_all_tuple {
    ($($ty:ident $var:ident),+) => {
        impl<$($ty: Okay),+> OkayAll for ($($ty,)+) {
            fn check_all(self) -> Result<(), Failure> {
                let ($($var,)+) = self;
                $( check($var.classify())?; )+
                Ok(())
            }
        }
    };
}

okay_all_tuple!(A a);
okay_all_tuple!(A a, B b);
okay_all_tuple!(A a, B b, C c);
okay_all_tuple!(A a, B b, C c, D d);
okay_all_tuple!(A a, B b, C c, D d, E e);
okay_all_tuple!(A a, B b, C c, D d, E e, F f);
okay_all_tuple!(A a, B b, C c, D d, E e, F f, G g);
okay_all_tuple!(A a, B b, C c, D d, E e, F f, G g, H h);

impl<T: Okay, const N: usize> OkayAll for [T; N] {
    fn check_all(self) -> Result<(), Failure> {
        self.iter().try_for_each(|v| check(v.classify()))
    }
}

impl<T: Okay> OkayAll for Vec<T> {
    fn check_all(self) -> Result<(), Failure> {
        self.iter().try_for_each(|v| check(v.classify()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::io;

    fn judge<T: Okay>(value: T) -> Result<(), Failure> {
        check(value.classify())
    }

    #[derive(Debug)]
    struct Oops;

    impl fmt::Display for Oops {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("Oops")
        }
    }

    impl Error for Oops {}

    okay_error!(Oops);

    #[test]
    fn test_bool() {
        assert_eq!(judge(true), Ok(()));
        assert_eq!(judge(false), Err(Failure::UnexpectedFalse));
    }

    #[test]
    fn test_text() {
        assert_eq!(judge("Yep"), Ok(()));
        assert_eq!(judge(""), Err(Failure::UnexpectedEmpty));
        assert_eq!(judge(String::new()), Err(Failure::UnexpectedEmpty));
        assert_eq!(judge(Cow::Borrowed("")), Err(Failure::UnexpectedEmpty));
    }

    #[test]
    fn test_char_zero() {
        assert_eq!(judge('a'), Ok(()));
        assert_eq!(judge('\0'), Err(Failure::UnexpectedZero));
    }

    #[test]
    fn test_float_zero_and_nan() {
        assert_eq!(judge(-0.0_f64), Err(Failure::UnexpectedZero));
        assert_eq!(judge(f64::NAN), Ok(()));
        assert_eq!(judge(0.5_f32), Ok(()));
    }

    #[test]
    fn test_non_zero() {
        assert_eq!(judge(NonZeroU8::MIN), Ok(()));
    }

    #[test]
    fn test_error_values() {
        assert_eq!(
            judge(io::Error::other("an error")),
            Err(Failure::UnexpectedError {
                message: "an error".to_string()
            })
        );
        assert_eq!(
            judge(Oops),
            Err(Failure::UnexpectedError {
                message: "Oops".to_string()
            })
        );
    }

    #[test]
    fn test_absent_error_is_ok() {
        assert_eq!(judge(None::<io::Error>), Ok(()));
        assert_eq!(judge(None::<Oops>), Ok(()));
        assert_eq!(judge(None::<Box<dyn Error>>), Ok(()));
        assert_eq!(judge(None::<&Oops>), Ok(()));
    }

    #[test]
    fn test_present_optional_error_fails() {
        assert_eq!(
            judge(Some(Oops)),
            Err(Failure::UnexpectedError {
                message: "Oops".to_string()
            })
        );
    }

    #[test]
    fn test_boxed_dyn_error() {
        let err: Box<dyn Error + Send + Sync> = "boom".into();
        assert_eq!(
            judge(err),
            Err(Failure::UnexpectedError {
                message: "boom".to_string()
            })
        );
    }

    #[test]
    fn test_result() {
        assert_eq!(judge(Ok::<i32, Oops>(0)), Ok(()));
        assert_eq!(
            judge(Err::<(), String>("bad".to_string())),
            Err(Failure::UnexpectedError {
                message: "bad".to_string()
            })
        );
        assert_eq!(
            judge("x".parse::<i32>()),
            Err(Failure::UnexpectedError {
                message: "invalid digit found in string".to_string()
            })
        );
    }

    #[test]
    fn test_option_is_nilable() {
        assert_eq!(judge(None::<i32>), Err(Failure::UnexpectedNil));
        // Present values are not dereferenced
        assert_eq!(judge(Some(0)), Ok(()));
        assert_eq!(judge(Some(false)), Ok(()));
    }

    #[test]
    fn test_raw_pointers() {
        let x = 5;
        assert_eq!(judge(&x as *const i32), Ok(()));
        assert_eq!(judge(std::ptr::null::<i32>()), Err(Failure::UnexpectedNil));
        assert_eq!(
            judge(std::ptr::null_mut::<u8>()),
            Err(Failure::UnexpectedNil)
        );
    }

    #[test]
    fn test_nil_marker() {
        assert_eq!(judge(Nil), Err(Failure::UnexpectedNil));
    }

    #[test]
    fn test_collections_are_never_nil() {
        assert_eq!(judge(Vec::<i32>::new()), Ok(()));
        assert_eq!(judge(HashMap::<String, i32>::new()), Ok(()));
        assert_eq!(judge(&[0_u8][..]), Ok(()));
    }

    #[test]
    fn test_pointers_delegate() {
        assert_eq!(judge(&0), Err(Failure::UnexpectedZero));
        assert_eq!(judge(Box::new(false)), Err(Failure::UnexpectedFalse));
        assert_eq!(judge(Rc::new("")), Err(Failure::UnexpectedEmpty));
        assert_eq!(judge(Arc::new(1_u64)), Ok(()));
    }

    #[test]
    fn test_other() {
        assert_eq!(judge(()), Ok(()));
        assert_eq!(judge([0, 0]), Ok(()));
    }

    #[test]
    fn test_callable() {
        assert_eq!(judge(call(|| {})), Ok(()));
        assert_eq!(
            judge(call(|| panic!("panic message"))),
            Err(Failure::UnexpectedPanic {
                payload: "panic message".to_string()
            })
        );

        fn quiet() {}
        assert_eq!(judge(quiet as fn()), Ok(()));
    }

    #[test]
    fn test_classify_does_not_invoke() {
        let calls = Cell::new(0);
        let c = call(|| calls.set(calls.get() + 1));
        assert!(matches!(c.classify(), Class::Callable(_)));
        assert_eq!(calls.get(), 0);
        assert_eq!(judge(&c), Ok(()));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_check_all_is_fail_fast() {
        let reached = Cell::new(false);
        let result = (0, call(|| reached.set(true))).check_all();
        assert_eq!(result, Err(Failure::UnexpectedZero));
        assert!(!reached.get());
    }

    #[test]
    fn test_check_all_passes() {
        assert_eq!((1, 2, 3).check_all(), Ok(()));
        assert_eq!(("Yep", None::<Oops>).check_all(), Ok(()));
        assert_eq!([1, 0, 3].check_all(), Err(Failure::UnexpectedZero));
        assert_eq!(vec!["a", "b"].check_all(), Ok(()));
    }
}
