//! Selection criteria parse errors.

use thiserror::Error;

use crate::error::{Diagnostic, ErrorCode};

/// Errors raised while turning raw criteria maps into predicates.
#[derive(Debug, Clone, Error)]
pub enum CriteriaError {
    #[error("unknown predicate key `{0}`")]
    UnknownKey(String),

    #[error("predicate `{key}` expects {expected}")]
    InvalidValue { key: String, expected: &'static str },

    #[error("predicate `{key}` has an invalid regular expression: {source}")]
    InvalidRegex {
        key: String,
        #[source]
        source: regex::Error,
    },

    #[error("predicate `{key}` has invalid maturity `{value}`")]
    InvalidMaturity { key: String, value: String },
}

impl CriteriaError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::UnknownKey(_) => ErrorCode::E200,
            Self::InvalidValue { .. } => ErrorCode::E201,
            Self::InvalidRegex { .. } => ErrorCode::E202,
            Self::InvalidMaturity { .. } => ErrorCode::E203,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.to_string()).with_code(self.code());
        match self {
            Self::InvalidMaturity { .. } => {
                diag.with_help("use `proposed`, `deprecated` or `none`")
            }
            _ => diag,
        }
    }
}
