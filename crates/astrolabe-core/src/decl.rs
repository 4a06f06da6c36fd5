//! Raw declarations handed over by the model builder.
//!
//! Sources arrive already normalized to the element/relation shape. The only
//! structure left is nesting: an element may declare child elements inline,
//! which [`Source::declarations`] flattens in pre-order while recording each
//! child's owner explicitly.

use log::warn;
use serde::Deserialize;

use crate::{
    element::Element,
    identifier::Id,
    kind::{Direction, ElementKind, Maturity, RelationKind},
    relation::Relation,
};

/// A single raw declaration.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RawDecl {
    Element(RawElement),
    Relation(RawRelation),
}

/// Raw element declaration, possibly with nested children.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RawElement {
    pub id: String,
    #[serde(alias = "el")]
    pub kind: ElementKind,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub desc: Option<String>,
    #[serde(default)]
    pub doc: Option<String>,
    #[serde(default)]
    pub tech: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub maturity: Option<Maturity>,
    #[serde(default, alias = "external?")]
    pub external: bool,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default, alias = "ct")]
    pub children: Vec<RawElement>,
}

/// Raw relation declaration with fully qualified endpoints.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RawRelation {
    pub id: String,
    #[serde(alias = "el")]
    pub kind: RelationKind,
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub desc: Option<String>,
    #[serde(default)]
    pub tech: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub direction: Option<Direction>,
}

/// An ordered group of declarations from one origin (file, module, ...).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Source {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub decls: Vec<RawDecl>,
}

/// A flattened declaration ready to be merged into a model.
#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    Element(Element),
    Relation(Relation),
}

impl Declaration {
    pub fn id(&self) -> Id {
        match self {
            Self::Element(el) => el.id(),
            Self::Relation(rel) => rel.id(),
        }
    }
}

impl Source {
    /// Creates a named source from raw declarations.
    pub fn new(name: impl Into<String>, decls: Vec<RawDecl>) -> Self {
        Self {
            name: name.into(),
            decls,
        }
    }

    /// Flattens the source into declarations in declaration order.
    ///
    /// Nested children follow their parent immediately (pre-order) and get
    /// the parent as owner.
    pub fn declarations(&self) -> Vec<Declaration> {
        let mut out = Vec::with_capacity(self.decls.len());
        for decl in &self.decls {
            match decl {
                RawDecl::Element(raw) => flatten_element(raw, None, &mut out),
                RawDecl::Relation(raw) => out.push(Declaration::Relation(raw.to_relation())),
            }
        }
        out
    }
}

fn flatten_element(raw: &RawElement, enclosing: Option<Id>, out: &mut Vec<Declaration>) {
    let declared_owner = raw.owner.as_deref().map(Id::new);
    let owner = match (enclosing, declared_owner) {
        (Some(enclosing), Some(declared)) if enclosing != declared => {
            warn!(
                element = raw.id,
                declared_owner = declared.to_string(),
                enclosing = enclosing.to_string();
                "Nested element declares a different owner, using the enclosing element"
            );
            Some(enclosing)
        }
        (Some(enclosing), _) => Some(enclosing),
        (None, declared) => declared,
    };

    let element = raw.to_element(owner);
    let id = element.id();
    out.push(Declaration::Element(element));

    for child in &raw.children {
        flatten_element(child, Some(id), out);
    }
}

impl RawElement {
    /// Creates a raw element with only id and kind set.
    pub fn new(id: impl Into<String>, kind: ElementKind) -> Self {
        Self {
            id: id.into(),
            kind,
            name: None,
            desc: None,
            doc: None,
            tech: Vec::new(),
            tags: Vec::new(),
            maturity: None,
            external: false,
            owner: None,
            children: Vec::new(),
        }
    }

    fn to_element(&self, owner: Option<Id>) -> Element {
        let mut element = Element::new(Id::new(&self.id), self.kind.clone())
            .with_tech(self.tech.iter().cloned())
            .with_tags(self.tags.iter().cloned())
            .with_maturity(self.maturity)
            .with_external(self.external)
            .with_owner(owner);
        if let Some(name) = &self.name {
            element = element.with_name(name.clone());
        }
        if let Some(desc) = &self.desc {
            element = element.with_desc(desc.clone());
        }
        if let Some(doc) = &self.doc {
            element = element.with_doc(doc.clone());
        }
        element
    }
}

impl RawRelation {
    /// Creates a raw relation with only id, kind and endpoints set.
    pub fn new(
        id: impl Into<String>,
        kind: RelationKind,
        from: impl Into<String>,
        to: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            from: from.into(),
            to: to.into(),
            name: None,
            desc: None,
            tech: Vec::new(),
            tags: Vec::new(),
            direction: None,
        }
    }

    fn to_relation(&self) -> Relation {
        let mut relation = Relation::new(
            Id::new(&self.id),
            self.kind.clone(),
            Id::new(&self.from),
            Id::new(&self.to),
        )
        .with_tech(self.tech.iter().cloned())
        .with_tags(self.tags.iter().cloned())
        .with_direction(self.direction);
        if let Some(name) = &self.name {
            relation = relation.with_name(name.clone());
        }
        if let Some(desc) = &self.desc {
            relation = relation.with_desc(desc.clone());
        }
        relation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_source() {
        let json = r#"{
            "name": "acme.edn",
            "decls": [
                {"element": {"id": "acme/user", "kind": "person"}},
                {"element": {"id": "acme/api", "el": "system", "tags": ["backend"]}},
                {"relation": {"id": "acme/user-to-api", "kind": "request",
                              "from": "acme/user", "to": "acme/api"}}
            ]
        }"#;

        let source: Source = serde_json::from_str(json).unwrap();
        let decls = source.declarations();

        assert_eq!(source.name, "acme.edn");
        assert_eq!(decls.len(), 3);
        assert_eq!(decls[0].id(), "acme/user");
        match &decls[1] {
            Declaration::Element(el) => {
                assert_eq!(el.kind(), &ElementKind::System);
                assert!(el.has_tag("backend"));
            }
            Declaration::Relation(_) => panic!("Expected element"),
        }
        assert!(matches!(decls[2], Declaration::Relation(_)));
    }

    #[test]
    fn test_nested_children_get_owner_in_pre_order() {
        let mut system = RawElement::new("shop/system", ElementKind::System);
        let mut web = RawElement::new("shop/web", ElementKind::Container);
        web.children
            .push(RawElement::new("shop/web/cart", ElementKind::Component));
        system.children.push(web);
        system
            .children
            .push(RawElement::new("shop/db", ElementKind::Container));

        let source = Source::new("shop", vec![RawDecl::Element(system)]);
        let decls = source.declarations();

        let ids: Vec<String> = decls.iter().map(|d| d.id().to_string()).collect();
        assert_eq!(ids, ["shop/system", "shop/web", "shop/web/cart", "shop/db"]);

        let owners: Vec<Option<Id>> = decls
            .iter()
            .map(|d| match d {
                Declaration::Element(el) => el.owner(),
                Declaration::Relation(_) => None,
            })
            .collect();
        assert_eq!(
            owners,
            [
                None,
                Some(Id::new("shop/system")),
                Some(Id::new("shop/web")),
                Some(Id::new("shop/system")),
            ]
        );
    }

    #[test]
    fn test_enclosing_element_wins_over_declared_owner() {
        let mut parent = RawElement::new("p", ElementKind::System);
        let mut child = RawElement::new("p/c", ElementKind::Container);
        child.owner = Some("elsewhere".to_string());
        parent.children.push(child);

        let decls = Source::new("s", vec![RawDecl::Element(parent)]).declarations();
        match &decls[1] {
            Declaration::Element(el) => assert_eq!(el.owner(), Some(Id::new("p"))),
            Declaration::Relation(_) => panic!("Expected element"),
        }
    }

    #[test]
    fn test_top_level_owner_is_kept() {
        let mut child = RawElement::new("p/c", ElementKind::Container);
        child.owner = Some("p".to_string());

        let decls = Source::new("s", vec![RawDecl::Element(child)]).declarations();
        match &decls[0] {
            Declaration::Element(el) => assert_eq!(el.owner(), Some(Id::new("p"))),
            Declaration::Relation(_) => panic!("Expected element"),
        }
    }
}
