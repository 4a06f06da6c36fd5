//! View composition: turning a [`View`] into [`OrderedContent`].
//!
//! Each view body has its own strategy:
//!
//! - selection bodies are matched, expanded and then excluded ([`selection`])
//! - explicit bodies are resolved, ordered and overridden ([`explicit`])
//! - filtered bodies narrow their composed base view by tags ([`filtered`])
//!
//! Views fail one at a time. A failing view never affects the others in a
//! batch, but a filtered view whose base fails fails with it.

mod content;
mod explicit;
mod filtered;
mod selection;

use indexmap::IndexMap;
use log::{debug, info, warn};
use rayon::prelude::*;

use astrolabe_core::identifier::Id;

pub use content::{ContentEntry, ContentItem, OrderedContent};

use crate::{
    config::AppConfig,
    error::{InvalidViewReason, ViewError, ViewWarning},
    model::Model,
    view::{View, ViewBody, ViewKind},
};

/// The result of composing one view of a batch.
pub type ComposeOutcome = Result<OrderedContent, ViewError>;

/// Views of one session, keyed by id in declaration order.
#[derive(Debug, Clone, Default)]
pub struct ViewSet {
    views: IndexMap<Id, View>,
}

impl ViewSet {
    /// Collects views, rejecting duplicate ids.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::DuplicateView`] for the first repeated id.
    pub fn new(views: Vec<View>) -> Result<Self, ViewError> {
        let mut map = IndexMap::with_capacity(views.len());
        for view in views {
            let id = view.id();
            if map.insert(id, view).is_some() {
                return Err(ViewError::DuplicateView(id));
            }
        }
        Ok(Self { views: map })
    }

    pub fn get(&self, id: Id) -> Option<&View> {
        self.views.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &View> {
        self.views.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = Id> + '_ {
        self.views.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }
}

/// Composes the view `view_id` of `views`.
///
/// # Errors
///
/// - [`ViewError::NotFound`] if the view does not exist
/// - [`ViewError::InvalidViewType`] for a missing, cyclic or failing base
///   view, or a custom view holding a non-custom element
pub fn compose(
    model: &Model,
    views: &ViewSet,
    view_id: Id,
    config: &AppConfig,
) -> Result<OrderedContent, ViewError> {
    Composer {
        model,
        views,
        config,
    }
    .compose(view_id, &mut Vec::new())
}

/// Composes every view, returning outcomes in view declaration order.
///
/// Views are composed on the rayon pool when `compose.parallel` is set.
pub fn compose_all(model: &Model, views: &ViewSet, config: &AppConfig) -> Vec<ComposeOutcome> {
    let composer = Composer {
        model,
        views,
        config,
    };
    let ids: Vec<Id> = views.ids().collect();

    let outcomes: Vec<ComposeOutcome> = if config.compose().parallel() {
        ids.par_iter()
            .map(|id| composer.compose(*id, &mut Vec::new()))
            .collect()
    } else {
        ids.iter()
            .map(|id| composer.compose(*id, &mut Vec::new()))
            .collect()
    };

    let failed = outcomes.iter().filter(|outcome| outcome.is_err()).count();
    info!(views = outcomes.len(), failed = failed; "Views composed");
    outcomes
}

struct Composer<'a> {
    model: &'a Model,
    views: &'a ViewSet,
    config: &'a AppConfig,
}

impl Composer<'_> {
    /// Composes `id`; `stack` holds the filtered views currently resolving
    /// their base, outermost first.
    fn compose(&self, id: Id, stack: &mut Vec<Id>) -> Result<OrderedContent, ViewError> {
        let view = self.views.get(id).ok_or(ViewError::NotFound(id))?;
        debug!(view = id.to_string(), kind = view.kind().to_string(); "Composing view");

        let mut warnings = Vec::new();
        let (layout, entries) = match view.body() {
            ViewBody::Selection {
                selection,
                include,
                exclude,
            } => (
                view.layout().clone(),
                selection::compose(
                    self.model,
                    selection,
                    include,
                    exclude.as_ref(),
                    self.config.selection(),
                ),
            ),
            ViewBody::Explicit { content } => (
                view.layout().clone(),
                explicit::compose(self.model, id, content, &mut warnings),
            ),
            ViewBody::Filtered { base, mode, tags } => {
                let base = self.compose_base(id, *base, stack)?;
                (
                    view.layout().inherit(base.layout()),
                    filtered::filter(
                        &base,
                        *mode,
                        tags,
                        self.config.compose().prune_dangling_relations(),
                    ),
                )
            }
        };

        if *view.kind() == ViewKind::Custom {
            let non_custom = entries.iter().find_map(|(_, entry)| {
                entry
                    .as_element()
                    .filter(|el| !el.kind().is_custom())
                    .map(|el| el.id())
            });
            if let Some(element) = non_custom {
                return Err(ViewError::invalid(
                    id,
                    InvalidViewReason::NonCustomElement(element),
                ));
            }
        }

        if entries.is_empty() {
            warnings.push(ViewWarning::EmptySelection { view: id });
        }
        for warning in &warnings {
            warn!(view = id.to_string(), code = warning.code().to_string(); "{warning}");
        }

        let content = OrderedContent::new(
            id,
            view.kind().clone(),
            view.title().map(str::to_string),
            layout,
            entries,
        )
        .with_warnings(warnings);

        debug!(view = id.to_string(), items = content.len(); "View composed");
        Ok(content)
    }

    fn compose_base(
        &self,
        view: Id,
        base: Id,
        stack: &mut Vec<Id>,
    ) -> Result<OrderedContent, ViewError> {
        if self.views.get(base).is_none() {
            return Err(ViewError::invalid(view, InvalidViewReason::MissingBase(base)));
        }

        stack.push(view);
        if let Some(start) = stack.iter().position(|id| *id == base) {
            let mut cycle = stack[start..].to_vec();
            cycle.push(base);
            stack.pop();
            return Err(ViewError::invalid(view, InvalidViewReason::CyclicBase(cycle)));
        }

        let result = self.compose(base, stack);
        stack.pop();

        result.map_err(|err| match err {
            ViewError::InvalidViewType {
                reason: InvalidViewReason::CyclicBase(cycle),
                ..
            } => ViewError::invalid(view, InvalidViewReason::CyclicBase(cycle)),
            _ => ViewError::invalid(view, InvalidViewReason::BaseFailed(base)),
        })
    }
}
