//! Model build errors and warnings.

use std::fmt;

use thiserror::Error;

use astrolabe_core::identifier::Id;

use crate::error::{Diagnostic, ErrorCode};

/// Where a declaration came from: source and position within the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclSite {
    pub source: String,
    pub source_index: usize,
    pub position: usize,
}

impl fmt::Display for DeclSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.source.is_empty() {
            write!(f, "source #{}", self.source_index)?;
        } else {
            write!(f, "source `{}`", self.source)?;
        }
        write!(f, " declaration #{}", self.position)
    }
}

/// Fatal model build errors. The first one encountered aborts the build.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("duplicate id `{id}`: declared in {first} and again in {duplicate}")]
    DuplicateId {
        id: Id,
        first: DeclSite,
        duplicate: DeclSite,
    },

    #[error("containment cycle: {}", format_path(.cycle))]
    CyclicHierarchy { cycle: Vec<Id> },
}

impl ModelError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::DuplicateId { .. } => ErrorCode::E100,
            Self::CyclicHierarchy { .. } => ErrorCode::E101,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.to_string()).with_code(self.code());
        match self {
            Self::DuplicateId { id, .. } => diag
                .with_subject(*id)
                .with_help("rename one of the declarations; later declarations never replace earlier ones"),
            Self::CyclicHierarchy { cycle } => cycle
                .iter()
                .fold(diag, |diag, id| diag.with_subject(*id))
                .with_help("containment must form a tree; remove one owner or `contained-in` relation"),
        }
    }
}

/// Which reference of a declaration failed to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    From,
    To,
    Owner,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::From => write!(f, "from"),
            Self::To => write!(f, "to"),
            Self::Owner => write!(f, "owner"),
        }
    }
}

/// Recovered model build problems, reported alongside a usable model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelWarning {
    #[error("`{item}` {endpoint} references unknown element `{missing}`")]
    UnresolvedReference {
        item: Id,
        endpoint: Endpoint,
        missing: Id,
    },

    #[error("`{element}` is placed in both `{kept}` and `{ignored}`; keeping `{kept}`")]
    ConflictingParent { element: Id, kept: Id, ignored: Id },
}

impl ModelWarning {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::UnresolvedReference { .. } => ErrorCode::E102,
            Self::ConflictingParent { .. } => ErrorCode::E103,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::warning(self.to_string()).with_code(self.code());
        match self {
            Self::UnresolvedReference { item, missing, .. } => diag
                .with_subject(*item)
                .with_subject(*missing)
                .with_help("declare the element or fix the id"),
            Self::ConflictingParent {
                element,
                kept,
                ignored,
            } => diag
                .with_subject(*element)
                .with_subject(*kept)
                .with_subject(*ignored),
        }
    }
}

pub(crate) fn format_path(ids: &[Id]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}
