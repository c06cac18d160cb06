/// Why an assertion failed.
///
/// The `Display` output of each variant is the exact line reported to the
/// test. Tooling matches on this wording, so it must not change.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Failure {
    #[error("unexpected false")]
    UnexpectedFalse,

    #[error("unexpected nil")]
    UnexpectedNil,

    #[error("unexpected zero")]
    UnexpectedZero,

    #[error("unexpected \"\"")]
    UnexpectedEmpty,

    #[error("unexpected error: {message}")]
    UnexpectedError { message: String },

    #[error("unexpected panic: {payload}")]
    UnexpectedPanic { payload: String },

    #[error("{left} != {right}")]
    NotEqual { left: String, right: String },

    #[error("expected panic")]
    ExpectedPanic,

    #[error("expected panic: \"{message}\"")]
    ExpectedPanicWith { message: String },
}

impl Failure {
    /// Stable code for programmatic handling and log filtering.
    pub fn code(&self) -> &'static str {
        match self {
            Failure::UnexpectedFalse => "UNEXPECTED_FALSE",
            Failure::UnexpectedNil => "UNEXPECTED_NIL",
            Failure::UnexpectedZero => "UNEXPECTED_ZERO",
            Failure::UnexpectedEmpty => "UNEXPECTED_EMPTY",
            Failure::UnexpectedError { .. } => "UNEXPECTED_ERROR",
            Failure::UnexpectedPanic { .. } => "UNEXPECTED_PANIC",
            Failure::NotEqual { .. } => "NOT_EQUAL",
            Failure::ExpectedPanic => "EXPECTED_PANIC",
            Failure::ExpectedPanicWith { .. } => "EXPECTED_PANIC_WITH",
        }
    }

    /// Whether the failure came from the `OK` predicate.
    pub fn is_ok_failure(&self) -> bool {
        matches!(
            self,
            Failure::UnexpectedFalse
                | Failure::UnexpectedNil
                | Failure::UnexpectedZero
                | Failure::UnexpectedEmpty
                | Failure::UnexpectedError { .. }
                | Failure::UnexpectedPanic { .. }
        )
    }
}
