//! Filtered views: a base view's content narrowed by tags.

use std::collections::HashSet;

use astrolabe_core::identifier::Id;

use super::content::{ContentEntry, OrderedContent};
use crate::view::FilterMode;

/// Keeps (`include`) or drops (`exclude`) base items carrying any of `tags`.
///
/// With `prune`, relations whose endpoint was in the base but got filtered
/// out are dropped too. Base order and explicit orders are preserved; the
/// result is always a subset of the base.
pub(super) fn filter(
    base: &OrderedContent,
    mode: FilterMode,
    tags: &[String],
    prune: bool,
) -> Vec<(Option<i64>, ContentEntry)> {
    let keep = |entry: &ContentEntry| match mode {
        FilterMode::Include => entry.has_any_tag(tags),
        FilterMode::Exclude => !entry.has_any_tag(tags),
    };

    let kept: Vec<_> = base
        .items()
        .iter()
        .filter(|item| keep(&item.entry))
        .collect();

    let removed: HashSet<Id> = if prune {
        let kept_ids: HashSet<Id> = kept.iter().map(|item| item.id()).collect();
        base.items()
            .iter()
            .filter(|item| item.entry.is_element() && !kept_ids.contains(&item.id()))
            .map(|item| item.id())
            .collect()
    } else {
        HashSet::new()
    };

    kept.into_iter()
        .filter(|item| {
            item.entry
                .as_relation()
                .is_none_or(|rel| !removed.contains(&rel.from()) && !removed.contains(&rel.to()))
        })
        .map(|item| (item.order, item.entry.clone()))
        .collect()
}
