//! View definitions: what a view shows and how it was specified.
//!
//! A [`View`] has one of three bodies:
//!
//! - [`ViewBody::Selection`]: criteria, include flags and an optional
//!   subtractive `exclude`
//! - [`ViewBody::Explicit`]: a hand-ordered list of [`ContentRef`]s with
//!   display overrides
//! - [`ViewBody::Filtered`]: another view's content narrowed by tags
//!
//! Views are usually deserialized from [`RawView`], which accepts the loose
//! shape found in source files and is checked by `View::try_from`.

use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};

use astrolabe_core::{identifier::Id, kind::Direction};

use crate::{
    criteria::{Criteria, RawCriteria},
    error::{InvalidViewReason, ViewError},
    expand::IncludeFlag,
};

/// Kind of a view. Unknown kinds are kept as [`ViewKind::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ViewKind {
    Context,
    Landscape,
    Container,
    Component,
    Dynamic,
    Deployment,
    Custom,
    Filtered,
    Other(String),
}

impl ViewKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Context => "context",
            Self::Landscape => "landscape",
            Self::Container => "container",
            Self::Component => "component",
            Self::Dynamic => "dynamic",
            Self::Deployment => "deployment",
            Self::Custom => "custom",
            Self::Filtered => "filtered",
            Self::Other(kind) => kind,
        }
    }
}

impl From<String> for ViewKind {
    fn from(kind: String) -> Self {
        match kind.as_str() {
            "context" => Self::Context,
            "landscape" => Self::Landscape,
            "container" => Self::Container,
            "component" => Self::Component,
            "dynamic" => Self::Dynamic,
            "deployment" => Self::Deployment,
            "custom" => Self::Custom,
            "filtered" => Self::Filtered,
            _ => Self::Other(kind),
        }
    }
}

impl From<ViewKind> for String {
    fn from(kind: ViewKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rendering hints. Carried through composition untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Layout {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub hints: BTreeMap<String, String>,
}

impl Layout {
    /// Fills fields not set here from `base`. Hints set here win per key.
    pub fn inherit(&self, base: &Layout) -> Layout {
        let mut hints = base.hints.clone();
        hints.extend(self.hints.iter().map(|(k, v)| (k.clone(), v.clone())));
        Layout {
            direction: self.direction.or(base.direction),
            hints,
        }
    }
}

/// One entry of an explicit content list.
///
/// The overrides apply to this view's copy of the item only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ContentRef {
    #[serde(rename = "ref")]
    reference: Id,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    order: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    desc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tech: Option<Vec<String>>,
}

impl ContentRef {
    pub fn new(reference: Id) -> Self {
        Self {
            reference,
            order: None,
            name: None,
            desc: None,
            tech: None,
        }
    }

    pub fn with_order(mut self, order: i64) -> Self {
        self.order = Some(order);
        self
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
        self.tech = Some(tech.into_iter().map(Into::into).collect());
        self
    }

    pub fn reference(&self) -> Id {
        self.reference
    }

    pub fn order(&self) -> Option<i64> {
        self.order
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn desc(&self) -> Option<&str> {
        self.desc.as_deref()
    }

    pub fn tech(&self) -> Option<&[String]> {
        self.tech.as_deref()
    }
}

/// Whether a filtered view keeps or drops the tagged items.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    /// Keep only items carrying one of the tags.
    #[default]
    Include,
    /// Drop items carrying one of the tags.
    Exclude,
}

#[derive(Debug, Clone)]
pub enum ViewBody {
    Selection {
        selection: Criteria,
        include: Vec<IncludeFlag>,
        exclude: Option<Criteria>,
    },
    Explicit {
        content: Vec<ContentRef>,
    },
    Filtered {
        base: Id,
        mode: FilterMode,
        tags: Vec<String>,
    },
}

impl ViewBody {
    pub fn selection(selection: Criteria) -> Self {
        Self::Selection {
            selection,
            include: Vec::new(),
            exclude: None,
        }
    }

    pub fn explicit(content: Vec<ContentRef>) -> Self {
        Self::Explicit { content }
    }

    pub fn filtered<I, S>(base: Id, mode: FilterMode, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Filtered {
            base,
            mode,
            tags: tags.into_iter().map(Into::into).collect(),
        }
    }

    /// Appends include flags to a selection body. Other bodies are unchanged.
    pub fn with_include(mut self, flags: impl IntoIterator<Item = IncludeFlag>) -> Self {
        if let Self::Selection { include, .. } = &mut self {
            include.extend(flags);
        }
        self
    }

    /// Sets the subtractive criteria of a selection body.
    pub fn with_exclude(mut self, criteria: Criteria) -> Self {
        if let Self::Selection { exclude, .. } = &mut self {
            *exclude = Some(criteria);
        }
        self
    }
}

/// A named projection of the model.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "RawView")]
pub struct View {
    id: Id,
    kind: ViewKind,
    title: Option<String>,
    layout: Layout,
    body: ViewBody,
}

impl View {
    pub fn new(id: Id, kind: ViewKind, body: ViewBody) -> Self {
        Self {
            id,
            kind,
            title: None,
            layout: Layout::default(),
            body,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    pub fn id(&self) -> Id {
        self.id
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

    pub fn body(&self) -> &ViewBody {
        &self.body
    }
}

/// A view as written in a source document.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RawView {
    pub id: String,
    pub kind: ViewKind,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub layout: Layout,
    #[serde(default)]
    pub selection: Option<RawCriteria>,
    #[serde(default)]
    pub include: Vec<IncludeFlag>,
    #[serde(default)]
    pub exclude: Option<RawCriteria>,
    #[serde(default, alias = "ct")]
    pub content: Option<Vec<ContentRef>>,
    #[serde(default, alias = "base-view")]
    pub base: Option<String>,
    #[serde(default)]
    pub mode: Option<FilterMode>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl TryFrom<RawView> for View {
    type Error = ViewError;

    fn try_from(raw: RawView) -> Result<Self, Self::Error> {
        let id = Id::new(&raw.id);
        let mismatch = |details: &str| {
            ViewError::invalid(id, InvalidViewReason::BodyMismatch(details.to_string()))
        };
        let criteria = |raw: RawCriteria| {
            Criteria::try_from(raw).map_err(|source| ViewError::Criteria { view: id, source })
        };

        let has_selection_parts =
            raw.selection.is_some() || !raw.include.is_empty() || raw.exclude.is_some();

        let body = if raw.kind == ViewKind::Filtered {
            let Some(base) = raw.base else {
                return Err(mismatch("filtered view needs a `base` view"));
            };
            if has_selection_parts || raw.content.is_some() {
                return Err(mismatch("filtered view cannot have a selection or content"));
            }
            ViewBody::Filtered {
                base: Id::new(&base),
                mode: raw.mode.unwrap_or_default(),
                tags: raw.tags,
            }
        } else if raw.base.is_some() || raw.mode.is_some() {
            return Err(mismatch("only filtered views have a `base` or `mode`"));
        } else if let Some(content) = raw.content {
            if has_selection_parts {
                return Err(mismatch("view has both a selection and explicit content"));
            }
            ViewBody::Explicit { content }
        } else if let Some(selection) = raw.selection {
            if raw.kind == ViewKind::Dynamic {
                return Err(mismatch("dynamic views list their content explicitly"));
            }
            ViewBody::Selection {
                selection: criteria(selection)?,
                include: raw.include,
                exclude: raw.exclude.map(criteria).transpose()?,
            }
        } else if has_selection_parts {
            return Err(mismatch("`include` or `exclude` given without a selection"));
        } else {
            ViewBody::Explicit {
                content: Vec::new(),
            }
        };

        Ok(Self {
            id,
            kind: raw.kind,
            title: raw.title,
            layout: raw.layout,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CriteriaError, ErrorCode};

    fn parse(json: &str) -> Result<View, String> {
        serde_json::from_str(json).map_err(|e| e.to_string())
    }

    #[test]
    fn test_selection_view() {
        let view = parse(
            r#"{"id": "acme/context", "kind": "context", "title": "Acme",
                "selection": {"namespace": "acme"}, "include": ["related", "relations"],
                "exclude": {"tag": "internal"}}"#,
        )
        .unwrap();

        assert_eq!(view.id(), "acme/context");
        assert_eq!(view.kind(), &ViewKind::Context);
        assert_eq!(view.title(), Some("Acme"));
        match view.body() {
            ViewBody::Selection {
                include, exclude, ..
            } => {
                assert_eq!(include, &[IncludeFlag::Related, IncludeFlag::Relations]);
                assert!(exclude.is_some());
            }
            other => panic!("Expected selection body, got {other:?}"),
        }
    }

    #[test]
    fn test_explicit_view_with_ct_alias() {
        let view = parse(
            r#"{"id": "flow", "kind": "dynamic",
                "ct": [{"ref": "a", "order": 2, "name": "Second"}, {"ref": "b", "order": 1}]}"#,
        )
        .unwrap();

        let ViewBody::Explicit { content } = view.body() else {
            panic!("Expected explicit body");
        };
        assert_eq!(content[0].reference(), "a");
        assert_eq!(content[0].order(), Some(2));
        assert_eq!(content[0].name(), Some("Second"));
        assert_eq!(content[1].tech(), None);
    }

    #[test]
    fn test_filtered_view() {
        let view = parse(
            r#"{"id": "no-ext", "kind": "filtered", "base": "landscape",
                "mode": "exclude", "tags": ["external"]}"#,
        )
        .unwrap();

        match view.body() {
            ViewBody::Filtered { base, mode, tags } => {
                assert_eq!(*base, "landscape");
                assert_eq!(*mode, FilterMode::Exclude);
                assert_eq!(tags, &["external"]);
            }
            other => panic!("Expected filtered body, got {other:?}"),
        }
    }

    #[test]
    fn test_filtered_mode_defaults_to_include() {
        let view = parse(r#"{"id": "f", "kind": "filtered", "base-view": "b"}"#).unwrap();
        assert!(matches!(
            view.body(),
            ViewBody::Filtered {
                mode: FilterMode::Include,
                ..
            }
        ));
    }

    #[test]
    fn test_body_mismatches() {
        let cases = [
            r#"{"id": "v", "kind": "filtered"}"#,
            r#"{"id": "v", "kind": "context", "base": "b"}"#,
            r#"{"id": "v", "kind": "context", "selection": {}, "ct": []}"#,
            r#"{"id": "v", "kind": "dynamic", "selection": {}}"#,
            r#"{"id": "v", "kind": "context", "include": ["related"]}"#,
        ];

        for json in cases {
            let err = parse(json).unwrap_err();
            assert!(err.contains("has an invalid type"), "{json}: {err}");
        }
    }

    #[test]
    fn test_invalid_criteria_names_view() {
        let raw: RawView = serde_json::from_str(
            r#"{"id": "v", "kind": "context", "selection": {"el": "system"},
                "exclude": {"colour": "red"}}"#,
        )
        .unwrap();

        let err = View::try_from(raw).unwrap_err();
        assert!(matches!(
            err,
            ViewError::Criteria { view, source: CriteriaError::UnknownKey(ref key) }
                if view == Id::new("v") && key == "colour"
        ));
        assert_eq!(err.code(), ErrorCode::E200);
    }

    #[test]
    fn test_bodyless_view_is_empty_explicit() {
        let view = parse(r#"{"id": "v", "kind": "custom"}"#).unwrap();
        assert!(matches!(view.body(), ViewBody::Explicit { content } if content.is_empty()));
    }

    #[test]
    fn test_unknown_kind_is_other() {
        let view = parse(r#"{"id": "v", "kind": "code", "ct": []}"#).unwrap();
        assert_eq!(view.kind(), &ViewKind::Other("code".to_string()));
        assert_eq!(view.kind().to_string(), "code");
    }

    #[test]
    fn test_layout_inherit() {
        let base = Layout {
            direction: Some(Direction::Down),
            hints: BTreeMap::from([
                ("theme".to_string(), "dark".to_string()),
                ("legend".to_string(), "on".to_string()),
            ]),
        };
        let own = Layout {
            direction: None,
            hints: BTreeMap::from([("theme".to_string(), "light".to_string())]),
        };

        let merged = own.inherit(&base);
        assert_eq!(merged.direction, Some(Direction::Down));
        assert_eq!(merged.hints["theme"], "light");
        assert_eq!(merged.hints["legend"], "on");
    }

    #[test]
    fn test_builders() {
        let body = ViewBody::selection(Criteria::all())
            .with_include([IncludeFlag::Relations])
            .with_exclude(Criteria::all());
        let view = View::new(Id::new("v"), ViewKind::Landscape, body).with_title("All");

        assert_eq!(view.title(), Some("All"));
        assert!(matches!(
            view.body(),
            ViewBody::Selection { include, exclude: Some(_), .. } if include.len() == 1
        ));
    }
}
