//! Explicit content lists with per-view overrides.

use std::collections::HashSet;

use log::debug;

use astrolabe_core::identifier::Id;

use super::{content::ContentEntry, selection::to_entry};
use crate::{error::ViewWarning, model::Model, view::ContentRef};

/// Resolves an explicit content list.
///
/// References that do not resolve, or repeat an earlier entry, are skipped.
/// When every remaining entry carries an `order` the list is sorted by it
/// (ties keep list position); when none does, list position is the order;
/// a mix falls back to list position and warns.
pub(super) fn compose(
    model: &Model,
    view: Id,
    content: &[ContentRef],
    warnings: &mut Vec<ViewWarning>,
) -> Vec<(Option<i64>, ContentEntry)> {
    let mut seen = HashSet::new();
    let mut entries = Vec::with_capacity(content.len());

    for reference in content {
        let Some(item) = model.item(reference.reference()) else {
            warnings.push(ViewWarning::UnresolvedReference {
                view,
                reference: reference.reference(),
            });
            continue;
        };
        if !seen.insert(reference.reference()) {
            debug!(view = view.to_string(), reference = reference.reference().to_string();
                "Skipping repeated content reference");
            continue;
        }
        entries.push((reference.order(), apply_overrides(to_entry(item), reference)));
    }

    let ordered = entries.iter().filter(|(order, _)| order.is_some()).count();
    if ordered == entries.len() {
        entries.sort_by_key(|(order, _)| *order);
    } else if ordered > 0 {
        warnings.push(ViewWarning::MixedOrdering { view });
    }

    entries
}

fn apply_overrides(entry: ContentEntry, reference: &ContentRef) -> ContentEntry {
    match entry {
        ContentEntry::Element(mut el) => {
            if let Some(name) = reference.name() {
                el = el.with_name(name);
            }
            if let Some(desc) = reference.desc() {
                el = el.with_desc(desc);
            }
            if let Some(tech) = reference.tech() {
                el = el.with_tech(tech.iter().cloned());
            }
            ContentEntry::Element(el)
        }
        ContentEntry::Relation(mut rel) => {
            if let Some(name) = reference.name() {
                rel = rel.with_name(name);
            }
            if let Some(desc) = reference.desc() {
                rel = rel.with_desc(desc);
            }
            if let Some(tech) = reference.tech() {
                rel = rel.with_tech(tech.iter().cloned());
            }
            ContentEntry::Relation(rel)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::test_support::*;

    fn ids(entries: &[(Option<i64>, ContentEntry)]) -> Vec<String> {
        entries.iter().map(|(_, e)| e.id().to_string()).collect()
    }

    fn entry(id: &str) -> ContentRef {
        ContentRef::new(Id::new(id))
    }

    #[test]
    fn test_all_ordered_sorts_by_order() {
        let model = acme();
        let mut warnings = Vec::new();
        let entries = compose(
            &model,
            Id::new("flow"),
            &[entry("acme/api").with_order(2), entry("acme/user").with_order(1)],
            &mut warnings,
        );

        assert_eq!(ids(&entries), ["acme/user", "acme/api"]);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_equal_orders_keep_list_position() {
        let model = acme();
        let mut warnings = Vec::new();
        let entries = compose(
            &model,
            Id::new("flow"),
            &[
                entry("acme/db").with_order(5),
                entry("acme/user").with_order(1),
                entry("acme/api").with_order(5),
            ],
            &mut warnings,
        );

        assert_eq!(ids(&entries), ["acme/user", "acme/db", "acme/api"]);
    }

    #[test]
    fn test_unordered_uses_list_position() {
        let model = acme();
        let mut warnings = Vec::new();
        let entries = compose(
            &model,
            Id::new("flow"),
            &[entry("acme/db"), entry("acme/user-to-api"), entry("acme/user")],
            &mut warnings,
        );

        assert_eq!(ids(&entries), ["acme/db", "acme/user-to-api", "acme/user"]);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_mixed_ordering_warns() {
        let model = acme();
        let mut warnings = Vec::new();
        let entries = compose(
            &model,
            Id::new("flow"),
            &[entry("acme/api").with_order(2), entry("acme/user")],
            &mut warnings,
        );

        assert_eq!(ids(&entries), ["acme/api", "acme/user"]);
        assert_eq!(
            warnings,
            [ViewWarning::MixedOrdering {
                view: Id::new("flow")
            }]
        );
    }

    #[test]
    fn test_unresolved_and_repeated_references_are_skipped() {
        let model = acme();
        let mut warnings = Vec::new();
        let entries = compose(
            &model,
            Id::new("flow"),
            &[entry("acme/ghost"), entry("acme/api"), entry("acme/api")],
            &mut warnings,
        );

        assert_eq!(ids(&entries), ["acme/api"]);
        assert_eq!(
            warnings,
            [ViewWarning::UnresolvedReference {
                view: Id::new("flow"),
                reference: Id::new("acme/ghost"),
            }]
        );
    }

    #[test]
    fn test_overrides_touch_only_the_copy() {
        let model = acme();
        let mut warnings = Vec::new();
        let entries = compose(
            &model,
            Id::new("flow"),
            &[entry("acme/user-to-api")
                .with_name("Logs in")
                .with_tech(["HTTPS"])],
            &mut warnings,
        );

        let rel = entries[0].1.as_relation().unwrap();
        assert_eq!(rel.name(), Some("Logs in"));
        assert_eq!(rel.tech(), ["HTTPS"]);

        let original = model.relation(Id::new("acme/user-to-api")).unwrap();
        assert_eq!(original.name(), None);
        assert!(original.tech().is_empty());
    }
}
