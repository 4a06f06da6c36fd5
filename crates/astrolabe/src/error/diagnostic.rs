//! Severity levels and the reportable [`Diagnostic`] record.
//!
//! Typed errors and warnings (model, criteria, view) convert into
//! diagnostics so that front ends can render all of them the same way.

use std::fmt;

use astrolabe_core::identifier::Id;

use crate::error::ErrorCode;

/// The severity level of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// A fatal issue. For model errors the whole session stops, for view
    /// errors only the affected view.
    Error,

    /// A recovered issue. Processing continued with the offending part
    /// dropped or defaulted.
    Warning,
}

impl Severity {
    pub fn is_error(&self) -> bool {
        matches!(self, Severity::Error)
    }

    pub fn is_warning(&self) -> bool {
        matches!(self, Severity::Warning)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A reportable message with severity, code and the ids it concerns.
///
/// # Example
///
/// ```text
/// warning[E102]: relation `acme/user-to-cache` references unknown element `acme/cache`
///   = subjects: acme/user-to-cache, acme/cache
///   = help: declare the element or fix the id
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    severity: Severity,
    code: Option<ErrorCode>,
    message: String,
    subjects: Vec<Id>,
    help: Option<String>,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn code(&self) -> Option<ErrorCode> {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Ids of the elements, relations or views this diagnostic is about.
    pub fn subjects(&self) -> &[Id] {
        &self.subjects
    }

    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self
    }

    pub fn with_subject(mut self, id: Id) -> Self {
        self.subjects.push(id);
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            code: None,
            message: message.into(),
            subjects: Vec::new(),
            help: None,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.severity)?;
        if let Some(code) = self.code {
            write!(f, "[{code}]")?;
        }
        write!(f, ": {}", self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_with_code() {
        let diag = Diagnostic::error("duplicate id `a`").with_code(ErrorCode::E100);
        assert_eq!(diag.to_string(), "error[E100]: duplicate id `a`");
    }

    #[test]
    fn test_display_without_code() {
        let diag = Diagnostic::warning("something odd");
        assert_eq!(diag.to_string(), "warning: something odd");
        assert!(diag.severity().is_warning());
    }

    #[test]
    fn test_builder() {
        let diag = Diagnostic::warning("unresolved")
            .with_code(ErrorCode::E102)
            .with_subject(Id::new("r1"))
            .with_subject(Id::new("missing"))
            .with_help("declare it");

        assert_eq!(diag.code(), Some(ErrorCode::E102));
        assert_eq!(diag.subjects().len(), 2);
        assert_eq!(diag.help(), Some("declare it"));
        assert_eq!(diag.message(), "unresolved");
    }
}
