//! Model elements: the typed nodes of the architecture graph.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::{
    identifier::Id,
    kind::{ElementKind, Maturity},
};

/// A typed, identified node of the architecture model.
///
/// Elements are immutable once a model is built. View-level overrides are
/// applied to clones through the `with_*` methods.
///
/// # Examples
///
/// ```
/// use astrolabe_core::{element::Element, identifier::Id, kind::ElementKind};
///
/// let api = Element::new(Id::new("acme/api"), ElementKind::System)
///     .with_name("API")
///     .with_tags(["backend"]);
///
/// assert_eq!(api.namespace(), "acme");
/// assert!(api.has_tag("backend"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Element {
    id: Id,
    kind: ElementKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    desc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    doc: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tech: Vec<String>,
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    tags: BTreeSet<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    maturity: Option<Maturity>,
    external: bool,
    namespace: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    owner: Option<Id>,
}

impl Element {
    /// Creates an element with the given id and kind and no other fields set.
    pub fn new(id: Id, kind: ElementKind) -> Self {
        Self {
            id,
            kind,
            name: None,
            desc: None,
            doc: None,
            tech: Vec::new(),
            tags: BTreeSet::new(),
            maturity: None,
            external: false,
            namespace: id.namespace(),
            owner: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_desc(mut self, desc: impl Into<String>) -> Self {
        self.desc = Some(desc.into());
        self
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    pub fn with_tech<I, S>(mut self, tech: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tech = tech.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_maturity(mut self, maturity: Option<Maturity>) -> Self {
        self.maturity = maturity;
        self
    }

    pub fn with_external(mut self, external: bool) -> Self {
        self.external = external;
        self
    }

    /// Sets the containing element.
    pub fn with_owner(mut self, owner: Option<Id>) -> Self {
        self.owner = owner;
        self
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn kind(&self) -> &ElementKind {
        &self.kind
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn desc(&self) -> Option<&str> {
        self.desc.as_deref()
    }

    pub fn doc(&self) -> Option<&str> {
        self.doc.as_deref()
    }

    pub fn tech(&self) -> &[String] {
        &self.tech
    }

    pub fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    pub fn maturity(&self) -> Option<Maturity> {
        self.maturity
    }

    pub fn is_external(&self) -> bool {
        self.external
    }

    /// The id with its final segment removed.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// The element this one is nested in, if declared inside a container.
    pub fn owner(&self) -> Option<Id> {
        self.owner
    }
}
