//! The model store: an immutable snapshot of elements and relations.
//!
//! A [`Model`] is built once per session from ordered [`Source`]s by
//! [`Model::build`] and is read-only afterwards. It keeps declaration order
//! for both elements and relations so that everything computed from it
//! (selection results, view content) is reproducible.
//!
//! # Architecture
//!
//! - [`builder`]: ordered merge, duplicate detection, reference resolution
//! - [`hierarchy`]: the containment forest and its build-time cycle check
//!
//! Relations whose endpoints do not resolve are kept aside
//! ([`Model::unresolved_relations`]) and take no part in selection,
//! expansion or composition.

mod builder;
mod hierarchy;

use std::collections::{BTreeSet, HashMap};

use indexmap::IndexMap;
use serde::Serialize;

use astrolabe_core::{
    decl::Source,
    element::Element,
    identifier::Id,
    kind::Maturity,
    relation::Relation,
};

use crate::{
    error::{ModelError, ModelWarning},
    expand,
};

pub(crate) use hierarchy::Hierarchy;

/// A model together with the warnings recovered while building it.
#[derive(Debug)]
pub struct BuiltModel {
    pub model: Model,
    pub warnings: Vec<ModelWarning>,
}

/// Immutable snapshot of the architecture graph.
#[derive(Debug, Default)]
pub struct Model {
    elements: IndexMap<Id, Element>,
    relations: IndexMap<Id, Relation>,
    unresolved: IndexMap<Id, Relation>,
    declaration_index: HashMap<Id, usize>,
    hierarchy: Hierarchy,
    outgoing: HashMap<Id, Vec<Id>>,
    incoming: HashMap<Id, Vec<Id>>,
}

impl Model {
    /// Builds a model by merging `sources` in order.
    ///
    /// Sources are merged in the given order and declarations in their order
    /// within each source. The first fatal problem aborts the build;
    /// unresolved references and conflicting parents are returned as
    /// warnings alongside the model.
    ///
    /// # Errors
    ///
    /// - [`ModelError::DuplicateId`] if two declarations share an id
    /// - [`ModelError::CyclicHierarchy`] if containment forms a cycle
    pub fn build(sources: &[Source]) -> Result<BuiltModel, ModelError> {
        builder::ModelBuilder::new().merge(sources)
    }

    pub fn element(&self, id: Id) -> Option<&Element> {
        self.elements.get(&id)
    }

    pub fn relation(&self, id: Id) -> Option<&Relation> {
        self.relations.get(&id)
    }

    /// Looks up an element or resolved relation.
    pub fn item(&self, id: Id) -> Option<ItemRef<'_>> {
        self.element(id)
            .map(ItemRef::Element)
            .or_else(|| self.relation(id).map(ItemRef::Relation))
    }

    pub fn contains(&self, id: Id) -> bool {
        self.elements.contains_key(&id) || self.relations.contains_key(&id)
    }

    /// Elements in declaration order.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.elements.values()
    }

    /// Resolved relations in declaration order.
    pub fn relations(&self) -> impl Iterator<Item = &Relation> {
        self.relations.values()
    }

    /// Every element, then every resolved relation, in declaration order.
    pub fn items(&self) -> impl Iterator<Item = ItemRef<'_>> {
        self.elements()
            .map(ItemRef::Element)
            .chain(self.relations().map(ItemRef::Relation))
    }

    /// Relations dropped because an endpoint did not resolve.
    pub fn unresolved_relations(&self) -> impl Iterator<Item = &Relation> {
        self.unresolved.values()
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    pub fn relation_count(&self) -> usize {
        self.relations.len()
    }

    /// Position of the declaration across all sources, if the id is present.
    pub fn declaration_index(&self, id: Id) -> Option<usize> {
        self.declaration_index.get(&id).copied()
    }

    /// Resolved relations starting at `element`, in declaration order.
    pub fn relations_from(&self, element: Id) -> impl Iterator<Item = &Relation> {
        self.adjacent(&self.outgoing, element)
    }

    /// Resolved relations ending at `element`, in declaration order.
    pub fn relations_to(&self, element: Id) -> impl Iterator<Item = &Relation> {
        self.adjacent(&self.incoming, element)
    }

    /// The containing element, from an owner or a `contained-in` relation.
    pub fn parent(&self, id: Id) -> Option<Id> {
        self.hierarchy.parent(id)
    }

    /// Directly contained elements in declaration order.
    pub fn children(&self, id: Id) -> &[Id] {
        self.hierarchy.children(id)
    }

    /// All containers of `id`, nearest first.
    pub fn ancestors(&self, id: Id) -> Vec<Id> {
        expand::ancestors(self, id)
    }

    /// All contained elements at any depth, in pre-order.
    pub fn descendants(&self, id: Id) -> Vec<Id> {
        expand::descendants(self, id)
    }

    pub fn is_ancestor(&self, ancestor: Id, id: Id) -> bool {
        expand::is_ancestor(self, ancestor, id)
    }

    fn adjacent<'a>(
        &'a self,
        index: &'a HashMap<Id, Vec<Id>>,
        element: Id,
    ) -> impl Iterator<Item = &'a Relation> + 'a {
        index
            .get(&element)
            .into_iter()
            .flatten()
            .filter_map(|id| self.relations.get(id))
    }
}

/// Tag that marks an item as external in addition to the element flag.
pub const EXTERNAL_TAG: &str = "external";

/// A borrowed element or relation.
///
/// Gives uniform access to the fields predicates look at. Relations have no
/// `doc` and no maturity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ItemRef<'a> {
    Element(&'a Element),
    Relation(&'a Relation),
}

impl<'a> ItemRef<'a> {
    pub fn id(&self) -> Id {
        match self {
            Self::Element(el) => el.id(),
            Self::Relation(rel) => rel.id(),
        }
    }

    /// The kind tag, e.g. `system` or `request`.
    pub fn kind_name(&self) -> &'a str {
        match self {
            Self::Element(el) => el.kind().as_str(),
            Self::Relation(rel) => rel.kind().as_str(),
        }
    }

    pub fn is_element(&self) -> bool {
        matches!(self, Self::Element(_))
    }

    pub fn is_relation(&self) -> bool {
        matches!(self, Self::Relation(_))
    }

    pub fn name(&self) -> Option<&'a str> {
        match self {
            Self::Element(el) => el.name(),
            Self::Relation(rel) => rel.name(),
        }
    }

    pub fn desc(&self) -> Option<&'a str> {
        match self {
            Self::Element(el) => el.desc(),
            Self::Relation(rel) => rel.desc(),
        }
    }

    pub fn doc(&self) -> Option<&'a str> {
        match self {
            Self::Element(el) => el.doc(),
            Self::Relation(_) => None,
        }
    }

    pub fn tech(&self) -> &'a [String] {
        match self {
            Self::Element(el) => el.tech(),
            Self::Relation(rel) => rel.tech(),
        }
    }

    pub fn tags(&self) -> &'a BTreeSet<String> {
        match self {
            Self::Element(el) => el.tags(),
            Self::Relation(rel) => rel.tags(),
        }
    }

    pub fn namespace(&self) -> &'a str {
        match self {
            Self::Element(el) => el.namespace(),
            Self::Relation(rel) => rel.namespace(),
        }
    }

    /// Set by the element's `external` flag or by an `external` tag.
    pub fn is_external(&self) -> bool {
        match self {
            Self::Element(el) => el.is_external() || el.has_tag(EXTERNAL_TAG),
            Self::Relation(rel) => rel.has_tag(EXTERNAL_TAG),
        }
    }

    pub fn maturity(&self) -> Option<Maturity> {
        match self {
            Self::Element(el) => el.maturity(),
            Self::Relation(_) => None,
        }
    }

    pub fn as_element(&self) -> Option<&'a Element> {
        match self {
            Self::Element(el) => Some(el),
            Self::Relation(_) => None,
        }
    }

    pub fn as_relation(&self) -> Option<&'a Relation> {
        match self {
            Self::Element(_) => None,
            Self::Relation(rel) => Some(rel),
        }
    }
}


#[cfg(test)]
mod tests {
    use astrolabe_core::kind::ElementKind;

    use super::test_support::*;
    use super::*;

    #[test]
    fn test_items_in_declaration_order() {
        let model = acme();
        let ids: Vec<String> = model.items().map(|item| item.id().to_string()).collect();
        assert_eq!(
            ids,
            ["acme/user", "acme/api", "acme/db", "acme/user-to-api"]
        );
    }

    #[test]
    fn test_item_lookup() {
        let model = acme();

        let api = model.item(Id::new("acme/api")).unwrap();
        assert!(api.is_element());
        assert_eq!(api.kind_name(), "system");

        let rel = model.item(Id::new("acme/user-to-api")).unwrap();
        assert!(rel.is_relation());
        assert_eq!(rel.kind_name(), "request");
        assert!(!rel.is_external());
        assert_eq!(rel.doc(), None);

        assert!(model.item(Id::new("acme/missing")).is_none());
    }

    #[test]
    fn test_adjacency() {
        let model = acme();
        let out: Vec<Id> = model
            .relations_from(Id::new("acme/user"))
            .map(|r| r.id())
            .collect();
        let inc: Vec<Id> = model
            .relations_to(Id::new("acme/api"))
            .map(|r| r.id())
            .collect();

        assert_eq!(out, [Id::new("acme/user-to-api")]);
        assert_eq!(inc, [Id::new("acme/user-to-api")]);
        assert_eq!(model.relations_from(Id::new("acme/db")).count(), 0);
    }

    #[test]
    fn test_hierarchy_accessors() {
        let model = shop();

        assert_eq!(
            model.parent(Id::new("shop/web/cart")),
            Some(Id::new("shop/web"))
        );
        assert_eq!(
            model.children(Id::new("shop/system")),
            [Id::new("shop/web"), Id::new("shop/db")]
        );
        assert!(model.children(Id::new("shop/customer")).is_empty());
        assert_eq!(model.parent(Id::new("shop/system")), None);
    }

    #[test]
    fn test_declaration_index_spans_sources() {
        let model = Model::build(&[
            source(
                "a",
                vec![astrolabe_core::decl::RawDecl::Element(element(
                    "a/x",
                    ElementKind::System,
                ))],
            ),
            source(
                "b",
                vec![astrolabe_core::decl::RawDecl::Element(element(
                    "b/y",
                    ElementKind::System,
                ))],
            ),
        ])
        .unwrap()
        .model;

        assert_eq!(model.declaration_index(Id::new("a/x")), Some(0));
        assert_eq!(model.declaration_index(Id::new("b/y")), Some(1));
        assert_eq!(model.declaration_index(Id::new("c/z")), None);
    }
}
