//! Relation expansion and containment closures over a [`Model`].
//!
//! Everything here is a pure function of its inputs. Expansion output keeps
//! the input order and appends additions in model declaration order, so
//! running it twice yields the same ordered set.

use std::{collections::HashSet, fmt, str::FromStr};

use indexmap::IndexSet;
use log::trace;
use serde::{Deserialize, Serialize};

use astrolabe_core::identifier::Id;

use crate::model::Model;

/// A single expansion pass requested by a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IncludeFlag {
    /// Add relations whose endpoints are both in the set.
    Relations,
    /// Add elements one relation hop away from the set.
    Related,
}

impl fmt::Display for IncludeFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Relations => write!(f, "relations"),
            Self::Related => write!(f, "related"),
        }
    }
}

impl FromStr for IncludeFlag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "relations" => Ok(Self::Relations),
            "related" => Ok(Self::Related),
            other => Err(format!("unknown include flag `{other}`")),
        }
    }
}

/// Expands `matched` by applying each flag once, in order.
///
/// `related` is one hop per occurrence; list it twice for two hops.
/// Additions never remove ids, so the result is a superset of `matched`.
pub fn expand(model: &Model, matched: &IndexSet<Id>, include: &[IncludeFlag]) -> IndexSet<Id> {
    let mut current = matched.clone();

    for flag in include {
        let additions: Vec<Id> = match flag {
            IncludeFlag::Relations => model
                .relations()
                .filter(|rel| current.contains(&rel.from()) && current.contains(&rel.to()))
                .map(|rel| rel.id())
                .collect(),
            IncludeFlag::Related => model
                .elements()
                .map(|el| el.id())
                .filter(|id| !current.contains(id) && is_adjacent(model, &current, *id))
                .collect(),
        };

        trace!(flag = flag.to_string(), added = additions.len(); "Expansion pass");
        current.extend(additions);
    }

    current
}

fn is_adjacent(model: &Model, set: &IndexSet<Id>, element: Id) -> bool {
    model
        .relations_from(element)
        .any(|rel| set.contains(&rel.to()))
        || model
            .relations_to(element)
            .any(|rel| set.contains(&rel.from()))
}

/// The direct container of `id`, if any.
pub fn parent(model: &Model, id: Id) -> Option<Id> {
    model.parent(id)
}

/// Directly contained elements of `id` in declaration order.
pub fn children(model: &Model, id: Id) -> &[Id] {
    model.children(id)
}

/// All containers of `id`, nearest first.
///
/// The walk stops on a revisited id or after as many steps as there are
/// elements, so it terminates even on a malformed forest.
pub fn ancestors(model: &Model, id: Id) -> Vec<Id> {
    let bound = model.element_count();
    let mut visited = HashSet::new();
    let mut out = Vec::new();
    let mut current = model.parent(id);

    while let Some(ancestor) = current {
        if out.len() >= bound || !visited.insert(ancestor) || ancestor == id {
            break;
        }
        out.push(ancestor);
        current = model.parent(ancestor);
    }

    out
}

/// All elements contained in `id` at any depth, in pre-order.
pub fn descendants(model: &Model, id: Id) -> Vec<Id> {
    let bound = model.element_count();
    let mut visited = HashSet::from([id]);
    let mut out = Vec::new();
    let mut stack: Vec<Id> = model.children(id).iter().rev().copied().collect();

    while let Some(next) = stack.pop() {
        if out.len() >= bound {
            break;
        }
        if !visited.insert(next) {
            continue;
        }
        out.push(next);
        stack.extend(model.children(next).iter().rev().copied());
    }

    out
}

/// Whether `ancestor` contains `id` at any depth.
pub fn is_ancestor(model: &Model, ancestor: Id, id: Id) -> bool {
    let bound = model.element_count();
    let mut visited = HashSet::new();
    let mut current = model.parent(id);

    while let Some(candidate) = current {
        if candidate == ancestor {
            return true;
        }
        if visited.len() >= bound || !visited.insert(candidate) {
            return false;
        }
        current = model.parent(candidate);
    }

    false
}

#[cfg(test)]
mod tests {
    use crate::model::test_support::*;

    use super::*;

    fn set(ids: &[&str]) -> IndexSet<Id> {
        ids.iter().map(|id| Id::new(id)).collect()
    }

    #[test]
    fn test_relations_adds_internal_relations() {
        let model = acme();
        let out = expand(
            &model,
            &set(&["acme/user", "acme/api"]),
            &[IncludeFlag::Relations],
        );

        assert_eq!(out, set(&["acme/user", "acme/api", "acme/user-to-api"]));
    }

    #[test]
    fn test_relations_needs_both_endpoints() {
        let model = acme();
        let out = expand(&model, &set(&["acme/user"]), &[IncludeFlag::Relations]);

        assert_eq!(out, set(&["acme/user"]));
    }

    #[test]
    fn test_related_is_one_hop() {
        let model = shop();
        let start = set(&["shop/customer"]);

        let once = expand(&model, &start, &[IncludeFlag::Related]);
        assert_eq!(once, set(&["shop/customer", "shop/web"]));

        // web has no direct relation to db; the cart does.
        let twice = expand(&model, &start, &[IncludeFlag::Related, IncludeFlag::Related]);
        assert_eq!(twice, once);
    }

    #[test]
    fn test_related_follows_both_directions() {
        let model = shop();
        let out = expand(&model, &set(&["shop/db"]), &[IncludeFlag::Related]);

        assert_eq!(out, set(&["shop/db", "shop/web/cart"]));
    }

    #[test]
    fn test_flags_apply_in_order() {
        let model = acme();
        let start = set(&["acme/user"]);

        let related_then_relations =
            expand(&model, &start, &[IncludeFlag::Related, IncludeFlag::Relations]);
        assert!(related_then_relations.contains(&Id::new("acme/user-to-api")));

        let relations_then_related =
            expand(&model, &start, &[IncludeFlag::Relations, IncludeFlag::Related]);
        assert!(!relations_then_related.contains(&Id::new("acme/user-to-api")));
    }

    #[test]
    fn test_no_flags_is_identity() {
        let model = acme();
        let start = set(&["acme/db", "acme/user"]);
        assert_eq!(expand(&model, &start, &[]), start);
    }

    #[test]
    fn test_hierarchy_closures() {
        let model = shop();
        let system = Id::new("shop/system");
        let cart = Id::new("shop/web/cart");

        assert_eq!(
            descendants(&model, system),
            [Id::new("shop/web"), cart, Id::new("shop/db")]
        );
        assert_eq!(ancestors(&model, cart), [Id::new("shop/web"), system]);
        assert!(is_ancestor(&model, system, cart));
        assert!(!is_ancestor(&model, cart, system));
        assert!(!is_ancestor(&model, system, system));
        assert_eq!(parent(&model, cart), Some(Id::new("shop/web")));
        assert_eq!(children(&model, Id::new("shop/web")), [cart]);
        assert!(descendants(&model, Id::new("shop/customer")).is_empty());
    }

    #[test]
    fn test_hierarchy_closures_terminate_on_cycle() {
        // a is inside b, b inside c, c inside a.
        let model = malformed(&[("a", "b"), ("b", "c"), ("c", "a")]);
        let [a, b, c, w] = ["a", "b", "c", "w"].map(Id::new);

        assert_eq!(ancestors(&model, a), [b, c]);
        assert_eq!(descendants(&model, a), [c, b]);
        assert!(is_ancestor(&model, c, a));
        assert!(!is_ancestor(&model, w, a));
        // a reaches itself around the cycle.
        assert!(is_ancestor(&model, a, a));
    }

    #[test]
    fn test_hierarchy_closures_terminate_on_self_containment() {
        let model = malformed(&[("a", "a")]);
        let [a, w] = ["a", "w"].map(Id::new);

        assert!(ancestors(&model, a).is_empty());
        assert!(descendants(&model, a).is_empty());
        assert!(!is_ancestor(&model, w, a));
        assert_eq!(model.ancestors(a).len(), 0);
    }

    #[test]
    fn test_include_flag_parse() {
        assert_eq!("related".parse::<IncludeFlag>(), Ok(IncludeFlag::Related));
        assert!("everything".parse::<IncludeFlag>().is_err());
    }
}

#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use crate::model::test_support::*;

    use super::*;

    fn start_strategy() -> impl Strategy<Value = Vec<&'static str>> {
        prop::sample::subsequence(
            vec![
                "shop/customer",
                "shop/system",
                "shop/web",
                "shop/web/cart",
                "shop/db",
            ],
            0..=3,
        )
    }

    fn flags_strategy() -> impl Strategy<Value = Vec<IncludeFlag>> {
        prop::collection::vec(
            prop_oneof![Just(IncludeFlag::Relations), Just(IncludeFlag::Related)],
            0..4,
        )
    }

    proptest! {
        #[test]
        fn sequential_expansion_never_shrinks(start in start_strategy(), flags in flags_strategy()) {
            let model = shop();
            let start: IndexSet<Id> = start.into_iter().map(Id::new).collect();

            let once = expand(&model, &start, &flags);
            let twice = expand(&model, &once, &flags);

            prop_assert!(start.is_subset(&once));
            prop_assert!(once.is_subset(&twice));
        }

        #[test]
        fn expansion_is_deterministic(start in start_strategy(), flags in flags_strategy()) {
            let model = shop();
            let start: IndexSet<Id> = start.into_iter().map(Id::new).collect();

            let a: Vec<Id> = expand(&model, &start, &flags).into_iter().collect();
            let b: Vec<Id> = expand(&model, &start, &flags).into_iter().collect();
            prop_assert_eq!(a, b);
        }
    }
}
