//! Evaluation of criteria against model items.

use indexmap::IndexSet;
use log::warn;
use regex::Regex;

use astrolabe_core::identifier::{Id, NAMESPACE_SEPARATOR};

use super::{Clause, Conjunction, Criteria, Predicate};
use crate::{
    config::SelectionConfig,
    expand,
    model::{ItemRef, Model},
};

/// Tests `item` against `criteria`.
///
/// Pure: the result depends only on the model, the criteria and the item.
/// The model is needed for predicates that look past the item itself
/// (`refers-to`, `referred-by` and the containment predicates).
pub fn matches(model: &Model, criteria: &Criteria, item: ItemRef<'_>) -> bool {
    match criteria {
        Criteria::Conjunction(conj) => conj.matches(model, item),
        Criteria::Disjunction(alternatives) => {
            alternatives.iter().any(|conj| conj.matches(model, item))
        }
    }
}

/// Ids of every element and resolved relation matching `criteria`, in
/// declaration order.
pub fn matching(model: &Model, criteria: &Criteria, config: &SelectionConfig) -> IndexSet<Id> {
    warn_if_unrestricted(criteria, config);
    model
        .items()
        .filter(|item| matches(model, criteria, *item))
        .map(|item| item.id())
        .collect()
}

/// Logs a warning for criteria that accept every item, if `config` asks
/// for it. Returns whether the warning was raised.
pub(crate) fn warn_if_unrestricted(criteria: &Criteria, config: &SelectionConfig) -> bool {
    let warned = config.warn_unrestricted() && criteria.is_unrestricted();
    if warned {
        warn!(criteria = criteria.to_string(); "Criteria match every item in the model");
    }
    warned
}

impl Conjunction {
    fn matches(&self, model: &Model, item: ItemRef<'_>) -> bool {
        self.clauses.iter().all(|clause| clause.matches(model, item))
    }
}

impl Clause {
    fn matches(&self, model: &Model, item: ItemRef<'_>) -> bool {
        self.predicate.test(model, item) != self.negated
    }
}

impl Predicate {
    fn test(&self, model: &Model, item: ItemRef<'_>) -> bool {
        match self {
            Self::Kind(kind) => item.kind_name() == kind,
            Self::Kinds(kinds) => kinds.iter().any(|k| item.kind_name() == k),
            Self::Id(id) => item.id() == *id,
            Self::Ids(ids) => ids.contains(&item.id()),
            Self::Namespace(ns) => item.namespace() == ns,
            Self::Namespaces(namespaces) => namespaces.iter().any(|ns| item.namespace() == ns),
            Self::NamespacePrefix(prefix) => has_namespace_prefix(item.namespace(), prefix),
            Self::Tech(text) => item.tech().iter().any(|t| t.contains(text.as_str())),
            Self::Techs(techs) => techs.iter().any(|t| item.tech().contains(t)),
            Self::AllTechs(techs) => techs.iter().all(|t| item.tech().contains(t)),
            Self::Tag(tag) => item.tags().contains(tag),
            Self::Tags(tags) => tags.iter().any(|t| item.tags().contains(t)),
            Self::AllTags(tags) => tags.iter().all(|t| item.tags().contains(t)),
            Self::External(external) => item.is_external() == *external,
            Self::IsElement(expected) => item.is_element() == *expected,
            Self::IsRelation(expected) => item.is_relation() == *expected,
            Self::Maturity(maturity) => item.maturity() == *maturity,
            Self::Maturities(maturities) => maturities.contains(&item.maturity()),
            Self::From(id) => item.as_relation().is_some_and(|rel| rel.from() == *id),
            Self::To(id) => item.as_relation().is_some_and(|rel| rel.to() == *id),
            Self::RefersTo(target) => refers_to(model, item, *target),
            Self::ReferredBy(source) => referred_by(model, item, *source),
            Self::ChildOf(parent) => item.is_element() && model.parent(item.id()) == Some(*parent),
            Self::ParentOf(child) => item.is_element() && model.parent(*child) == Some(item.id()),
            Self::DescendantOf(ancestor) => {
                item.is_element() && expand::is_ancestor(model, *ancestor, item.id())
            }
            Self::AncestorOf(descendant) => {
                item.is_element() && expand::is_ancestor(model, item.id(), *descendant)
            }
            Self::Name(re) => search(re, item.name()),
            Self::Desc(re) => search(re, item.desc()),
            Self::Doc(re) => search(re, item.doc()),
        }
    }
}

fn has_namespace_prefix(namespace: &str, prefix: &str) -> bool {
    if prefix.is_empty() {
        return true;
    }
    namespace
        .strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with(NAMESPACE_SEPARATOR))
}

/// An element refers to `target` when one of its outgoing relations ends
/// there; a relation when its `to` is `target`.
fn refers_to(model: &Model, item: ItemRef<'_>, target: Id) -> bool {
    match item {
        ItemRef::Element(el) => model.relations_from(el.id()).any(|rel| rel.to() == target),
        ItemRef::Relation(rel) => rel.to() == target,
    }
}

fn referred_by(model: &Model, item: ItemRef<'_>, source: Id) -> bool {
    match item {
        ItemRef::Element(el) => model.relations_to(el.id()).any(|rel| rel.from() == source),
        ItemRef::Relation(rel) => rel.from() == source,
    }
}

fn search(re: &Regex, field: Option<&str>) -> bool {
    field.is_some_and(|text| re.is_match(text))
}
