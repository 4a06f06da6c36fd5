//! View composition errors and warnings.

use std::fmt;

use thiserror::Error;

use astrolabe_core::identifier::Id;

use crate::error::{CriteriaError, Diagnostic, ErrorCode, model::format_path};

/// Why a view was rejected as having an invalid type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidViewReason {
    /// The filtered view's base view does not exist.
    MissingBase(Id),
    /// Following base views leads back to the starting view.
    CyclicBase(Vec<Id>),
    /// The base view failed to compose.
    BaseFailed(Id),
    /// A custom view contains an element whose kind is modeled explicitly.
    NonCustomElement(Id),
    /// The view kind and its body disagree, e.g. a `filtered` kind without a base.
    BodyMismatch(String),
}

impl fmt::Display for InvalidViewReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingBase(base) => write!(f, "base view `{base}` does not exist"),
            Self::CyclicBase(path) => write!(f, "cyclic base views {}", format_path(path)),
            Self::BaseFailed(base) => write!(f, "base view `{base}` failed to compose"),
            Self::NonCustomElement(id) => {
                write!(f, "custom view contains non-custom element `{id}`")
            }
            Self::BodyMismatch(details) => f.write_str(details),
        }
    }
}

/// Errors that fail a single view. Other views in the batch are unaffected,
/// except for [`ViewError::DuplicateView`] which rejects the whole view set.
#[derive(Debug, Clone, Error)]
pub enum ViewError {
    #[error("view `{view}` has an invalid type: {reason}")]
    InvalidViewType {
        view: Id,
        reason: InvalidViewReason,
    },

    #[error("duplicate view id `{0}`")]
    DuplicateView(Id),

    #[error("view `{0}` not found")]
    NotFound(Id),

    #[error("view `{view}` has invalid criteria: {source}")]
    Criteria {
        view: Id,
        #[source]
        source: CriteriaError,
    },
}

impl ViewError {
    pub(crate) fn invalid(view: Id, reason: InvalidViewReason) -> Self {
        Self::InvalidViewType { view, reason }
    }

    /// The view this error is about.
    pub fn view(&self) -> Id {
        match self {
            Self::InvalidViewType { view, .. } | Self::Criteria { view, .. } => *view,
            Self::DuplicateView(view) | Self::NotFound(view) => *view,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidViewType { .. } => ErrorCode::E301,
            Self::DuplicateView(_) => ErrorCode::E304,
            Self::NotFound(_) => ErrorCode::E305,
            Self::Criteria { source, .. } => source.code(),
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::error(self.to_string())
            .with_code(self.code())
            .with_subject(self.view())
    }
}

/// Recovered composition problems, carried inside the composed content.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewWarning {
    #[error("view `{view}` selected no content")]
    EmptySelection { view: Id },

    #[error("view `{view}` references unknown item `{reference}`")]
    UnresolvedReference { view: Id, reference: Id },

    #[error("view `{view}` mixes ordered and unordered entries; using list position")]
    MixedOrdering { view: Id },
}

impl ViewWarning {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::EmptySelection { .. } => ErrorCode::E300,
            Self::UnresolvedReference { .. } => ErrorCode::E302,
            Self::MixedOrdering { .. } => ErrorCode::E303,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::warning(self.to_string()).with_code(self.code());
        match self {
            Self::EmptySelection { view } => diag
                .with_subject(*view)
                .with_help("check the selection criteria and include flags"),
            Self::UnresolvedReference { view, reference } => {
                diag.with_subject(*view).with_subject(*reference)
            }
            Self::MixedOrdering { view } => diag
                .with_subject(*view)
                .with_help("give every entry an `order` or none of them"),
        }
    }
}
