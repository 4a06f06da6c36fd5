//! Astrolabe - selection and view composition for architecture models.
//!
//! Builds an immutable [`model::Model`] from ordered sources, evaluates
//! selection [`criteria`] against it, expands matches along relations and
//! containment, and composes [`view`]s into ordered content for renderers.

pub mod compose;
pub mod config;
pub mod criteria;
pub mod expand;
pub mod model;
pub mod query;
pub mod view;

mod error;

pub use astrolabe_core::{decl, element, identifier, kind, relation};

pub use error::{
    AstrolabeError, CriteriaError, DeclSite, Diagnostic, Endpoint, ErrorCode, InvalidViewReason,
    ModelError, ModelWarning, Severity, ViewError, ViewWarning,
};

use log::{debug, info};

use compose::{ComposeOutcome, OrderedContent, ViewSet};
use config::AppConfig;
use criteria::Criteria;
use decl::Source;
use expand::IncludeFlag;
use identifier::Id;
use model::{BuiltModel, Model};
use query::Selection;

/// Entry point for building models, selecting and composing views.
///
/// # Examples
///
/// ```rust
/// use astrolabe::{
///     Engine,
///     config::AppConfig,
///     decl::{RawDecl, RawElement, Source},
///     kind::ElementKind,
/// };
///
/// let engine = Engine::new(AppConfig::default());
/// let source = Source::new(
///     "acme",
///     vec![RawDecl::Element(RawElement::new("acme/api", ElementKind::System))],
/// );
///
/// let built = engine.build_model(&[source]).expect("Failed to build model");
/// let criteria = serde_json::from_str(r#"{"el": "system"}"#).expect("Invalid criteria");
/// let selection = engine.select(&built.model, &criteria);
///
/// assert_eq!(selection.len(), 1);
/// ```
#[derive(Default)]
pub struct Engine {
    config: AppConfig,
}

impl Engine {
    /// Create a new engine with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Merge `sources` in order into a model.
    ///
    /// # Errors
    ///
    /// Returns `AstrolabeError::Model` for duplicate ids and containment
    /// cycles. Unresolved references come back as warnings on the result.
    pub fn build_model(&self, sources: &[Source]) -> Result<BuiltModel, AstrolabeError> {
        info!(sources = sources.len(); "Building model");
        let built = Model::build(sources)?;
        debug!(warnings = built.warnings.len(); "Model ready");
        Ok(built)
    }

    /// Select every item matching `criteria`, without expansion.
    pub fn select<'a>(&self, model: &'a Model, criteria: &Criteria) -> Selection<'a> {
        self.select_expanded(model, criteria, &[])
    }

    /// Select matching items and apply `include` flags to them.
    pub fn select_expanded<'a>(
        &self,
        model: &'a Model,
        criteria: &Criteria,
        include: &[IncludeFlag],
    ) -> Selection<'a> {
        let selection = query::select_with(model, criteria, include, self.config.selection());
        info!(criteria = criteria.to_string(), selected = selection.len(); "Selection complete");
        selection
    }

    /// Compose a single view.
    ///
    /// # Errors
    ///
    /// Returns `AstrolabeError::View` if the view is unknown or invalid.
    pub fn compose(
        &self,
        model: &Model,
        views: &ViewSet,
        view: Id,
    ) -> Result<OrderedContent, AstrolabeError> {
        info!(view = view.to_string(); "Composing view");
        Ok(compose::compose(model, views, view, &self.config)?)
    }

    /// Compose every view. Failures are reported per view.
    pub fn compose_all(&self, model: &Model, views: &ViewSet) -> Vec<ComposeOutcome> {
        info!(views = views.len(), parallel = self.config.compose().parallel(); "Composing views");
        compose::compose_all(model, views, &self.config)
    }
}
