//! Error types for Astrolabe operations.
//!
//! Typed errors per phase ([`ModelError`], [`CriteriaError`], [`ViewError`])
//! and recovered warnings ([`ModelWarning`], [`ViewWarning`]) all convert
//! into a [`Diagnostic`] with an [`ErrorCode`] for uniform reporting.
//! [`AstrolabeError`] is the umbrella type returned by the [`crate::Engine`].

mod criteria;
mod diagnostic;
mod error_code;
mod model;
mod view;

use std::io;

use thiserror::Error;

pub use criteria::CriteriaError;
pub use diagnostic::{Diagnostic, Severity};
pub use error_code::ErrorCode;
pub use model::{DeclSite, Endpoint, ModelError, ModelWarning};
pub use view::{InvalidViewReason, ViewError, ViewWarning};

/// The main error type for Astrolabe operations.
#[derive(Debug, Error)]
pub enum AstrolabeError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Input error: {0}")]
    Input(String),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Criteria(#[from] CriteriaError),

    #[error(transparent)]
    View(#[from] ViewError),
}

impl AstrolabeError {
    /// Returns the structured diagnostic for errors that carry one.
    pub fn diagnostic(&self) -> Option<Diagnostic> {
        match self {
            Self::Io(_) | Self::Input(_) => None,
            Self::Model(err) => Some(err.to_diagnostic()),
            Self::Criteria(err) => Some(err.to_diagnostic()),
            Self::View(err) => Some(err.to_diagnostic()),
        }
    }
}
