//! Ad-hoc selection over a model, without any view semantics.

use serde::Serialize;

use astrolabe_core::identifier::Id;

use crate::{
    config::SelectionConfig,
    criteria::{self, Criteria},
    expand::{self, IncludeFlag},
    model::{ItemRef, Model},
};

/// Items selected from a model, elements first, in declaration order.
///
/// Serializes as a list of the items with their resolved fields.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct Selection<'a> {
    items: Vec<ItemRef<'a>>,
}

impl<'a> Selection<'a> {
    pub fn ids(&self) -> Vec<Id> {
        self.items.iter().map(ItemRef::id).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = ItemRef<'a>> + '_ {
        self.items.iter().copied()
    }

    pub fn contains(&self, id: Id) -> bool {
        self.items.iter().any(|item| item.id() == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Returns every element and resolved relation matching `criteria`.
pub fn select<'a>(model: &'a Model, criteria: &Criteria) -> Selection<'a> {
    select_expanded(model, criteria, &[])
}

/// Like [`select`], then applies `include` flags to the matches.
pub fn select_expanded<'a>(
    model: &'a Model,
    criteria: &Criteria,
    include: &[IncludeFlag],
) -> Selection<'a> {
    select_with(model, criteria, include, &SelectionConfig::default())
}

pub(crate) fn select_with<'a>(
    model: &'a Model,
    criteria: &Criteria,
    include: &[IncludeFlag],
    config: &SelectionConfig,
) -> Selection<'a> {
    let matched = criteria::matching(model, criteria, config);

    let mut items: Vec<ItemRef<'a>> = expand::expand(model, &matched, include)
        .into_iter()
        .filter_map(|id| model.item(id))
        .collect();
    items.sort_by_key(|item| (item.is_relation(), model.declaration_index(item.id())));

    Selection { items }
}
