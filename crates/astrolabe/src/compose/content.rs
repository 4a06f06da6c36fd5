//! Composed view content handed to renderers.

use serde::{Serialize, Serializer, ser::SerializeSeq};

use astrolabe_core::{element::Element, identifier::Id, relation::Relation};

use crate::{
    error::ViewWarning,
    view::{Layout, ViewKind},
};

/// A display copy of a model item. Overrides never reach the model.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "category", rename_all = "lowercase")]
pub enum ContentEntry {
    Element(Element),
    Relation(Relation),
}

impl ContentEntry {
    pub fn id(&self) -> Id {
        match self {
            Self::Element(el) => el.id(),
            Self::Relation(rel) => rel.id(),
        }
    }

    pub fn is_element(&self) -> bool {
        matches!(self, Self::Element(_))
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(el) => Some(el),
            Self::Relation(_) => None,
        }
    }

    pub fn as_relation(&self) -> Option<&Relation> {
        match self {
            Self::Element(_) => None,
            Self::Relation(rel) => Some(rel),
        }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        match self {
            Self::Element(el) => el.has_tag(tag),
            Self::Relation(rel) => rel.has_tag(tag),
        }
    }

    pub(crate) fn has_any_tag(&self, tags: &[String]) -> bool {
        tags.iter().any(|tag| self.has_tag(tag))
    }
}

/// One positioned entry of a composed view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentItem {
    /// Position in the composed list.
    pub index: usize,
    /// The explicit order given in the view, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    #[serde(flatten)]
    pub entry: ContentEntry,
}

impl ContentItem {
    pub fn id(&self) -> Id {
        self.entry.id()
    }
}

/// The result of composing one view.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct OrderedContent {
    view: Id,
    kind: ViewKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    layout: Layout,
    items: Vec<ContentItem>,
    #[serde(serialize_with = "serialize_warnings")]
    warnings: Vec<ViewWarning>,
}

impl OrderedContent {
    pub(crate) fn new(
        view: Id,
        kind: ViewKind,
        title: Option<String>,
        layout: Layout,
        entries: Vec<(Option<i64>, ContentEntry)>,
    ) -> Self {
        let items = entries
            .into_iter()
            .enumerate()
            .map(|(index, (order, entry))| ContentItem {
                index,
                order,
                entry,
            })
            .collect();
        Self {
            view,
            kind,
            title,
            layout,
            items,
            warnings: Vec::new(),
        }
    }

    pub(crate) fn with_warnings(mut self, warnings: Vec<ViewWarning>) -> Self {
        self.warnings = warnings;
        self
    }

    pub fn view(&self) -> Id {
        self.view
    }

    pub fn kind(&self) -> &ViewKind {
        &self.kind
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn items(&self) -> &[ContentItem] {
        &self.items
    }

    /// Item ids in content order.
    pub fn ids(&self) -> Vec<Id> {
        self.items.iter().map(ContentItem::id).collect()
    }

    pub fn contains(&self, id: Id) -> bool {
        self.items.iter().any(|item| item.id() == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn warnings(&self) -> &[ViewWarning] {
        &self.warnings
    }
}

fn serialize_warnings<S: Serializer>(
    warnings: &[ViewWarning],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let mut seq = serializer.serialize_seq(Some(warnings.len()))?;
    for warning in warnings {
        seq.serialize_element(&warning.to_diagnostic().to_string())?;
    }
    seq.end()
}
