//! Relations: typed, directed edges between two elements.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::{
    identifier::Id,
    kind::{Direction, RelationKind},
};

/// A directed edge of the architecture model.
///
/// Endpoints are fully qualified element ids. Whether they resolve is checked
/// when the model is built, not here.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Relation {
    id: Id,
    kind: RelationKind,
    from: Id,
    to: Id,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    desc: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tech: Vec<String>,
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    tags: BTreeSet<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    direction: Option<Direction>,
    namespace: String,
}

impl Relation {
    /// Creates a relation of `kind` from one element id to another.
    pub fn new(id: Id, kind: RelationKind, from: Id, to: Id) -> Self {
        Self {
            id,
            kind,
            from,
            to,
            name: None,
            desc: None,
            tech: Vec::new(),
            tags: BTreeSet::new(),
            direction: None,
            namespace: id.namespace(),
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

    /// Sets the layout hint. Has no effect on selection.
    pub fn with_direction(mut self, direction: Option<Direction>) -> Self {
        self.direction = direction;
        self
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn kind(&self) -> &RelationKind {
        &self.kind
    }

    /// Source element id.
    pub fn from(&self) -> Id {
        self.from
    }

    /// Target element id.
    pub fn to(&self) -> Id {
        self.to
    }

    /// Returns `true` if either endpoint is `id`.
    pub fn touches(&self, id: Id) -> bool {
        self.from == id || self.to == id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn desc(&self) -> Option<&str> {
        self.desc.as_deref()
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

    pub fn direction(&self) -> Option<Direction> {
        self.direction
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_relation() {
        let rel = Relation::new(
            Id::new("acme/user-to-api"),
            RelationKind::Request,
            Id::new("acme/user"),
            Id::new("acme/api"),
        )
        .with_name("calls")
        .with_tech(["HTTPS"])
        .with_direction(Some(Direction::Right));

        assert_eq!(rel.from(), "acme/user");
        assert_eq!(rel.to(), "acme/api");
        assert_eq!(rel.namespace(), "acme");
        assert_eq!(rel.name(), Some("calls"));
        assert_eq!(rel.direction(), Some(Direction::Right));
    }

    #[test]
    fn test_touches() {
        let rel = Relation::new(
            Id::new("r1"),
            RelationKind::Uses,
            Id::new("a"),
            Id::new("b"),
        );

        assert!(rel.touches(Id::new("a")));
        assert!(rel.touches(Id::new("b")));
        assert!(!rel.touches(Id::new("c")));
    }
}
