//! Ordered merge of sources into a [`Model`].

use std::collections::HashMap;

use indexmap::IndexMap;
use log::{debug, info, warn};

use astrolabe_core::{
    decl::{Declaration, Source},
    element::Element,
    identifier::Id,
    relation::Relation,
};

use super::{BuiltModel, Hierarchy, Model};
use crate::error::{DeclSite, Endpoint, ModelError, ModelWarning};

/// Accumulates declarations and resolves them into a [`Model`].
#[derive(Debug, Default)]
pub(super) struct ModelBuilder {
    sites: HashMap<Id, DeclSite>,
    elements: IndexMap<Id, Element>,
    relations: Vec<Relation>,
    declaration_index: HashMap<Id, usize>,
    warnings: Vec<ModelWarning>,
}

impl ModelBuilder {
    pub(super) fn new() -> Self {
        Self::default()
    }

    pub(super) fn merge(mut self, sources: &[Source]) -> Result<BuiltModel, ModelError> {
        for (source_index, source) in sources.iter().enumerate() {
            debug!(source = source.name, index = source_index; "Merging source");
            for (position, decl) in source.declarations().into_iter().enumerate() {
                let site = DeclSite {
                    source: source.name.clone(),
                    source_index,
                    position,
                };
                self.add(decl, site)?;
            }
        }

        self.finish()
    }

    fn add(&mut self, decl: Declaration, site: DeclSite) -> Result<(), ModelError> {
        let id = decl.id();
        if let Some(first) = self.sites.get(&id) {
            return Err(ModelError::DuplicateId {
                id,
                first: first.clone(),
                duplicate: site,
            });
        }
        self.sites.insert(id, site);
        self.declaration_index.insert(id, self.declaration_index.len());

        match decl {
            Declaration::Element(element) => {
                self.elements.insert(id, element);
            }
            Declaration::Relation(relation) => self.relations.push(relation),
        }
        Ok(())
    }

    fn finish(mut self) -> Result<BuiltModel, ModelError> {
        let mut hierarchy = Hierarchy::default();

        self.resolve_owners(&mut hierarchy);
        let (relations, unresolved) = self.resolve_relations(&mut hierarchy);

        if let Some(cycle) = hierarchy.find_cycle(self.elements.keys().copied()) {
            return Err(ModelError::CyclicHierarchy { cycle });
        }

        let mut outgoing: HashMap<Id, Vec<Id>> = HashMap::new();
        let mut incoming: HashMap<Id, Vec<Id>> = HashMap::new();
        for relation in relations.values() {
            outgoing.entry(relation.from()).or_default().push(relation.id());
            incoming.entry(relation.to()).or_default().push(relation.id());
        }

        for warning in &self.warnings {
            warn!(code = warning.code().to_string(); "{warning}");
        }
        info!(
            elements = self.elements.len(),
            relations = relations.len(),
            unresolved = unresolved.len(),
            warnings = self.warnings.len();
            "Model built"
        );

        Ok(BuiltModel {
            model: Model {
                elements: self.elements,
                relations,
                unresolved,
                declaration_index: self.declaration_index,
                hierarchy,
                outgoing,
                incoming,
            },
            warnings: self.warnings,
        })
    }

    /// Assigns declared owners, dropping owners that name unknown elements.
    fn resolve_owners(&mut self, hierarchy: &mut Hierarchy) {
        let declared: Vec<(Id, Id)> = self
            .elements
            .values()
            .filter_map(|el| el.owner().map(|owner| (el.id(), owner)))
            .collect();

        for (child, owner) in declared {
            if self.elements.contains_key(&owner) {
                self.place(hierarchy, child, owner);
                continue;
            }

            self.warnings.push(ModelWarning::UnresolvedReference {
                item: child,
                endpoint: Endpoint::Owner,
                missing: owner,
            });
            if let Some(slot) = self.elements.get_mut(&child) {
                *slot = slot.clone().with_owner(None);
            }
        }
    }

    /// Splits relations into resolved and unresolved, placing elements for
    /// resolved containment relations.
    fn resolve_relations(
        &mut self,
        hierarchy: &mut Hierarchy,
    ) -> (IndexMap<Id, Relation>, IndexMap<Id, Relation>) {
        let mut resolved = IndexMap::new();
        let mut unresolved = IndexMap::new();

        for relation in std::mem::take(&mut self.relations) {
            let mut missing = false;
            let endpoints = [(Endpoint::From, relation.from()), (Endpoint::To, relation.to())];
            for (endpoint, target) in endpoints {
                if !self.elements.contains_key(&target) {
                    missing = true;
                    self.warnings.push(ModelWarning::UnresolvedReference {
                        item: relation.id(),
                        endpoint,
                        missing: target,
                    });
                }
            }

            if missing {
                unresolved.insert(relation.id(), relation);
                continue;
            }

            if relation.kind().is_containment() {
                self.place(hierarchy, relation.from(), relation.to());
            }
            resolved.insert(relation.id(), relation);
        }

        (resolved, unresolved)
    }

    fn place(&mut self, hierarchy: &mut Hierarchy, child: Id, parent: Id) {
        if let Err(kept) = hierarchy.assign(child, parent) {
            self.warnings.push(ModelWarning::ConflictingParent {
                element: child,
                kept,
                ignored: parent,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use astrolabe_core::{
        decl::RawDecl,
        kind::{ElementKind, RelationKind},
    };

    use super::super::test_support::*;
    use super::*;
    use crate::error::ErrorCode;

    fn el(id: &str) -> RawDecl {
        RawDecl::Element(element(id, ElementKind::System))
    }

    fn rel(id: &str, kind: RelationKind, from: &str, to: &str) -> RawDecl {
        RawDecl::Relation(relation(id, kind, from, to))
    }

    #[test]
    fn test_duplicate_across_sources_names_both_sites() {
        let err = Model::build(&[
            source("a.edn", vec![el("x/one"), el("x/dup")]),
            source("b.edn", vec![el("x/dup")]),
        ])
        .unwrap_err();

        match err {
            ModelError::DuplicateId {
                id,
                first,
                duplicate,
            } => {
                assert_eq!(id, "x/dup");
                assert_eq!(first.source, "a.edn");
                assert_eq!(first.position, 1);
                assert_eq!(duplicate.source, "b.edn");
                assert_eq!(duplicate.source_index, 1);
                assert_eq!(duplicate.position, 0);
            }
            other => panic!("Expected DuplicateId, got {other:?}"),
        }
    }

    #[test]
    fn test_element_and_relation_share_id_space() {
        let err = Model::build(&[source(
            "s",
            vec![
                el("a"),
                el("b"),
                rel("a", RelationKind::Uses, "a", "b"),
            ],
        )])
        .unwrap_err();

        assert_eq!(err.code(), ErrorCode::E100);
    }

    #[test]
    fn test_unresolved_relation_is_kept_aside() {
        let built = Model::build(&[source(
            "s",
            vec![el("a"), rel("r", RelationKind::Request, "a", "ghost")],
        )])
        .unwrap();

        assert_eq!(built.model.relation_count(), 0);
        assert!(built.model.relation(Id::new("r")).is_none());
        assert_eq!(built.model.unresolved_relations().count(), 1);
        assert_eq!(
            built.warnings,
            [ModelWarning::UnresolvedReference {
                item: Id::new("r"),
                endpoint: Endpoint::To,
                missing: Id::new("ghost"),
            }]
        );
        assert_eq!(built.model.relations_from(Id::new("a")).count(), 0);
    }

    #[test]
    fn test_both_endpoints_unresolved_warn_twice() {
        let built = Model::build(&[source(
            "s",
            vec![rel("r", RelationKind::Request, "nope", "nada")],
        )])
        .unwrap();

        let endpoints: Vec<Endpoint> = built
            .warnings
            .iter()
            .map(|w| match w {
                ModelWarning::UnresolvedReference { endpoint, .. } => *endpoint,
                other => panic!("Unexpected warning {other:?}"),
            })
            .collect();
        assert_eq!(endpoints, [Endpoint::From, Endpoint::To]);
    }

    #[test]
    fn test_unresolved_owner_is_dropped_in_place() {
        let mut orphan = element("p/orphan", ElementKind::Container);
        orphan.owner = Some("p/missing".to_string());

        let built = Model::build(&[source(
            "s",
            vec![el("p/first"), RawDecl::Element(orphan), el("p/last")],
        )])
        .unwrap();

        let ids: Vec<String> = built.model.elements().map(|e| e.id().to_string()).collect();
        assert_eq!(ids, ["p/first", "p/orphan", "p/last"]);
        assert_eq!(built.model.element(Id::new("p/orphan")).unwrap().owner(), None);
        assert_eq!(built.model.parent(Id::new("p/orphan")), None);
        assert_eq!(built.warnings.len(), 1);
        assert_eq!(built.warnings[0].code(), ErrorCode::E102);
    }

    #[test]
    fn test_contained_in_relation_sets_parent() {
        let model = build(vec![
            el("sys"),
            el("sys/api"),
            rel("in", RelationKind::ContainedIn, "sys/api", "sys"),
        ]);

        assert_eq!(model.parent(Id::new("sys/api")), Some(Id::new("sys")));
        assert_eq!(model.children(Id::new("sys")), [Id::new("sys/api")]);
        // The containment relation is still an ordinary relation.
        assert!(model.relation(Id::new("in")).is_some());
    }

    #[test]
    fn test_conflicting_parent_keeps_owner() {
        let mut child = element("c", ElementKind::Container);
        child.owner = Some("p1".to_string());

        let built = Model::build(&[source(
            "s",
            vec![
                el("p1"),
                el("p2"),
                RawDecl::Element(child),
                rel("in", RelationKind::ContainedIn, "c", "p2"),
            ],
        )])
        .unwrap();

        assert_eq!(built.model.parent(Id::new("c")), Some(Id::new("p1")));
        assert_eq!(
            built.warnings,
            [ModelWarning::ConflictingParent {
                element: Id::new("c"),
                kept: Id::new("p1"),
                ignored: Id::new("p2"),
            }]
        );
    }

    #[test]
    fn test_agreeing_owner_and_relation_do_not_warn() {
        let mut child = element("c", ElementKind::Container);
        child.owner = Some("p".to_string());

        let built = Model::build(&[source(
            "s",
            vec![
                el("p"),
                RawDecl::Element(child),
                rel("in", RelationKind::ContainedIn, "c", "p"),
            ],
        )])
        .unwrap();

        assert!(built.warnings.is_empty());
        assert_eq!(built.model.children(Id::new("p")), [Id::new("c")]);
    }

    #[test]
    fn test_containment_cycle_is_fatal() {
        let err = Model::build(&[source(
            "s",
            vec![
                el("a"),
                el("b"),
                rel("ab", RelationKind::ContainedIn, "a", "b"),
                rel("ba", RelationKind::ContainedIn, "b", "a"),
            ],
        )])
        .unwrap_err();

        assert_eq!(
            err,
            ModelError::CyclicHierarchy {
                cycle: vec![Id::new("a"), Id::new("b"), Id::new("a")],
            }
        );
    }

    #[test]
    fn test_self_containment_is_a_cycle() {
        let err = Model::build(&[source(
            "s",
            vec![el("a"), rel("aa", RelationKind::ContainedIn, "a", "a")],
        )])
        .unwrap_err();

        assert_eq!(err.code(), ErrorCode::E101);
    }

    #[test]
    fn test_later_source_may_reference_earlier_elements() {
        let built = Model::build(&[
            source("core", vec![el("core/db")]),
            source(
                "app",
                vec![
                    el("app/api"),
                    rel("q", RelationKind::Request, "app/api", "core/db"),
                ],
            ),
        ])
        .unwrap();

        assert!(built.warnings.is_empty());
        assert_eq!(built.model.relations_to(Id::new("core/db")).count(), 1);
    }

    #[test]
    fn test_forward_references_resolve() {
        let built = Model::build(&[source(
            "s",
            vec![rel("q", RelationKind::Request, "a", "b"), el("a"), el("b")],
        )])
        .unwrap();

        assert!(built.warnings.is_empty());
        assert_eq!(built.model.relation_count(), 1);
    }
}
