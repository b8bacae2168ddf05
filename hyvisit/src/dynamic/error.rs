use strum::EnumIs;
use thiserror::Error;

/// Reasons a runtime-assembled handler set is rejected by [`super::DispatchBuilder::build`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, EnumIs, Error)]
pub enum VisitError {
    /// Some alternative has no handler.
    #[error(
        "Variant `{variant}` has no handler for alternative `{alternative}`. Every alternative must be covered before the dispatch table is built."
    )]
    IncompleteCoverage {
        variant: &'static str,
        alternative: &'static str,
    },

    /// Two handlers accept the same alternative.
    #[error(
        "Variant `{variant}` has more than one handler for alternative `{alternative}`. Each alternative must be matched by exactly one handler."
    )]
    AmbiguousCoverage {
        variant: &'static str,
        alternative: &'static str,
    },

    /// A handler accepts a type that is not an alternative of the variant.
    #[error(
        "A handler accepting `{handler}` was registered, but variant `{variant}` never holds that type."
    )]
    UnknownAlternative {
        variant: &'static str,
        handler: &'static str,
    },

    /// Handlers declare different result types.
    #[error(
        "The handler for alternative `{alternative}` of variant `{variant}` returns `{found}`, but the first handler declaring a result type returns `{expected}`."
    )]
    InconsistentResultType {
        variant: &'static str,
        alternative: &'static str,
        expected: &'static str,
        found: &'static str,
    },
}

/// Result alias for runtime-checked dispatch.
pub type VisitResult<T> = Result<T, VisitError>;
