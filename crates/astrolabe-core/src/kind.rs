//! Closed kind tags for elements, relations and small enumerations shared by
//! both.
//!
//! Element and relation kinds are closed enums with a trailing `Custom`
//! variant. Tags seen in data but not modeled here parse to `Custom` and keep
//! their original spelling, so selection by kind name still works for them.

use std::{convert::Infallible, fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Declares a kind enum with a `Custom(String)` fallback variant.
///
/// Generates `as_str`, infallible `FromStr`, `Display` and string-based serde
/// implementations.
macro_rules! kind_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $tag:literal, )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )*
            /// A tag not known to this version of the model.
            Custom(String),
        }

        impl $name {
            /// Returns the canonical tag for this kind.
            pub fn as_str(&self) -> &str {
                match self {
                    $( Self::$variant => $tag, )*
                    Self::Custom(tag) => tag,
                }
            }

            /// Returns `true` for tags that are not modeled explicitly.
            pub fn is_custom(&self) -> bool {
                matches!(self, Self::Custom(_))
            }
        }

        impl FromStr for $name {
            type Err = Infallible;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(match s {
                    $( $tag => Self::$variant, )*
                    other => Self::Custom(other.to_string()),
                })
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let tag = String::deserialize(deserializer)?;
                let Ok(kind) = tag.parse::<Self>();
                Ok(kind)
            }
        }
    };
}

kind_enum! {
    /// Kind of a model element.
    pub enum ElementKind {
        Person => "person",
        System => "system",
        Container => "container",
        Component => "component",
        Node => "node",
        Actor => "actor",
        UseCase => "use-case",
        Class => "class",
        Interface => "interface",
        Protocol => "protocol",
        Enum => "enum",
        State => "state",
        Transition => "transition",
        Concept => "concept",
        OrgUnit => "org-unit",
        Capability => "capability",
        Process => "process",
    }
}

kind_enum! {
    /// Kind of a relation between two elements.
    pub enum RelationKind {
        Request => "request",
        Response => "response",
        Send => "send",
        Publish => "publish",
        Subscribe => "subscribe",
        Dataflow => "dataflow",
        Rel => "rel",
        /// `from` is nested inside `to`.
        ContainedIn => "contained-in",
        Implements => "implements",
        Uses => "uses",
        Include => "include",
        Extends => "extends",
        Association => "association",
        Aggregation => "aggregation",
        Composition => "composition",
        Inheritance => "inheritance",
        Implementation => "implementation",
        Dependency => "dependency",
        Link => "link",
        DeployedTo => "deployed-to",
        IsA => "is-a",
        Has => "has",
    }
}

impl RelationKind {
    /// Returns `true` if relations of this kind establish containment.
    pub fn is_containment(&self) -> bool {
        matches!(self, Self::ContainedIn)
    }
}

/// Lifecycle maturity of an element.
///
/// Absence of a maturity is written `none` in selection criteria.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Maturity {
    Proposed,
    Deprecated,
}

impl FromStr for Maturity {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "proposed" => Ok(Self::Proposed),
            "deprecated" => Ok(Self::Deprecated),
            _ => Err("Unsupported maturity"),
        }
    }
}

impl fmt::Display for Maturity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Proposed => write!(f, "proposed"),
            Self::Deprecated => write!(f, "deprecated"),
        }
    }
}

/// Layout direction hint for relations and views.
///
/// Carries no selection semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl FromStr for Direction {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" => Ok(Self::Up),
            "down" => Ok(Self::Down),
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            _ => Err("Unsupported direction"),
        }
    }
}
