//! Selection-based views: match, expand, exclude, order.

use log::debug;

use super::content::ContentEntry;
use crate::{
    config::SelectionConfig,
    criteria::{self, Criteria},
    expand::{self, IncludeFlag},
    model::{ItemRef, Model},
};

/// Resolves a selection body to display entries.
///
/// Order: elements before relations, each in declaration order.
pub(super) fn compose(
    model: &Model,
    selection: &Criteria,
    include: &[IncludeFlag],
    exclude: Option<&Criteria>,
    config: &SelectionConfig,
) -> Vec<(Option<i64>, ContentEntry)> {
    let matched = criteria::matching(model, selection, config);
    let expanded = expand::expand(model, &matched, include);
    debug!(matched = matched.len(), expanded = expanded.len(); "Selection expanded");

    let mut items: Vec<ItemRef<'_>> = expanded
        .into_iter()
        .filter_map(|id| model.item(id))
        .filter(|item| !exclude.is_some_and(|ex| criteria::matches(model, ex, *item)))
        .collect();

    items.sort_by_key(|item| (item.is_relation(), model.declaration_index(item.id())));

    items
        .into_iter()
        .map(|item| (None, to_entry(item)))
        .collect()
}

pub(super) fn to_entry(item: ItemRef<'_>) -> ContentEntry {
    match item {
        ItemRef::Element(el) => ContentEntry::Element(el.clone()),
        ItemRef::Relation(rel) => ContentEntry::Relation(rel.clone()),
    }
}
