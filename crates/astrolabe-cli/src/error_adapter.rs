//! Error adapter for converting AstrolabeError to miette diagnostics.
//!
//! This module bridges the library's [`Diagnostic`] records and plain error
//! variants to miette's report formatting used in the CLI.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, Severity as MietteSeverity};

use astrolabe::{AstrolabeError, Diagnostic, Severity};

/// Adapter for a single astrolabe diagnostic.
///
/// Diagnostics carry no source spans, so only code, severity and help are
/// forwarded. The ids the diagnostic concerns are listed after the help.
pub struct DiagnosticAdapter {
    diag: Diagnostic,
}

impl DiagnosticAdapter {
    /// Create a new diagnostic adapter.
    pub fn new(diag: Diagnostic) -> Self {
        Self { diag }
    }

    pub fn diagnostic(&self) -> &Diagnostic {
        &self.diag
    }
}

impl fmt::Debug for DiagnosticAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiagnosticAdapter")
            .field("diag", &self.diag)
            .finish()
    }
}

impl fmt::Display for DiagnosticAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.diag.message())
    }
}

impl std::error::Error for DiagnosticAdapter {}

impl MietteDiagnostic for DiagnosticAdapter {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diag
            .code()
            .map(|c| Box::new(c) as Box<dyn fmt::Display>)
    }

    fn severity(&self) -> Option<MietteSeverity> {
        Some(match self.diag.severity() {
            Severity::Error => MietteSeverity::Error,
            Severity::Warning => MietteSeverity::Warning,
        })
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let subjects = self.diag.subjects();
        match (self.diag.help(), subjects.is_empty()) {
            (None, true) => None,
            (help, _) => Some(Box::new(HelpText {
                help,
                subjects: subjects.iter().map(ToString::to_string).collect(),
            })),
        }
    }
}

/// Help line followed by the subject ids, if any.
struct HelpText<'a> {
    help: Option<&'a str>,
    subjects: Vec<String>,
}

impl fmt::Display for HelpText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(help) = self.help {
            f.write_str(help)?;
            if !self.subjects.is_empty() {
                f.write_str("\n")?;
            }
        }
        if !self.subjects.is_empty() {
            write!(f, "subjects: {}", self.subjects.join(", "))?;
        }
        Ok(())
    }
}

/// Adapter for [`AstrolabeError`] variants without a diagnostic,
/// such as I/O and input errors.
pub struct ErrorAdapter<'a>(pub &'a AstrolabeError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            AstrolabeError::Io(_) => "astrolabe::io",
            AstrolabeError::Input(_) => "astrolabe::input",
            AstrolabeError::Model(_) | AstrolabeError::Criteria(_) | AstrolabeError::View(_) => {
                return None;
            }
        };
        Some(Box::new(code))
    }
}

/// A reportable error that can be rendered by miette.
#[derive(Debug)]
pub enum Reportable<'a> {
    /// A coded diagnostic from the model, criteria or view phase.
    Diagnostic(DiagnosticAdapter),
    /// A simple error without a diagnostic.
    Error(ErrorAdapter<'a>),
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reportable::Diagnostic(d) => fmt::Display::fmt(d, f),
            Reportable::Error(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for Reportable<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Reportable::Diagnostic(_) => None,
            Reportable::Error(e) => e.source(),
        }
    }
}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Diagnostic(d) => d.code(),
            Reportable::Error(e) => e.code(),
        }
    }

    fn severity(&self) -> Option<MietteSeverity> {
        match self {
            Reportable::Diagnostic(d) => d.severity(),
            Reportable::Error(e) => e.severity(),
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Diagnostic(d) => d.help(),
            Reportable::Error(e) => e.help(),
        }
    }
}

/// Convert an [`AstrolabeError`] into a list of reportable errors.
///
/// Errors that carry a [`Diagnostic`] are reported through it; the rest are
/// wrapped as they are.
pub fn to_reportables(err: &AstrolabeError) -> Vec<Reportable<'_>> {
    match err.diagnostic() {
        Some(diag) => vec![Reportable::Diagnostic(DiagnosticAdapter::new(diag))],
        None => vec![Reportable::Error(ErrorAdapter(err))],
    }
}
