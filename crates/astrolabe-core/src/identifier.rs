//! Interned identifiers for model elements, relations and views.
//!
//! Model ids are namespaced strings such as `acme/billing/api`. The namespace
//! is everything before the final `/`; an id without `/` lives in the empty
//! namespace.

use std::{
    fmt,
    sync::{Mutex, MutexGuard, OnceLock},
};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use string_interner::{DefaultStringInterner, DefaultSymbol};

/// Global string interner for identifier storage.
///
/// # Thread Safety
///
/// Access goes through a `Mutex`, so ids can be created and resolved from
/// the worker threads that compose views in parallel.
static INTERNER: OnceLock<Mutex<DefaultStringInterner>> = OnceLock::new();

/// Separator between namespace segments.
pub const NAMESPACE_SEPARATOR: char = '/';

fn interner() -> MutexGuard<'static, DefaultStringInterner> {
    INTERNER
        .get_or_init(|| Mutex::new(DefaultStringInterner::new()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Interned identifier.
///
/// Cheap to copy and compare; the string form is only materialized on
/// demand.
///
/// # Examples
///
/// ```
/// use astrolabe_core::identifier::Id;
///
/// let api = Id::new("acme/billing/api");
/// assert_eq!(api, "acme/billing/api");
/// assert_eq!(api.namespace(), "acme/billing");
///
/// let root = Id::new("user");
/// assert_eq!(root.namespace(), "");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Id(DefaultSymbol);

impl Id {
    /// Creates an `Id` from its string form.
    pub fn new(name: &str) -> Self {
        Self(interner().get_or_intern(name))
    }

    /// Runs `f` against the string form without allocating.
    pub fn with_str<R>(&self, f: impl FnOnce(&str) -> R) -> R {
        let interner = interner();
        let value = interner.resolve(self.0).unwrap_or_default();
        f(value)
    }

    /// Returns the namespace: the id with its final `/segment` removed.
    pub fn namespace(&self) -> String {
        self.with_str(|s| namespace_of(s).to_string())
    }
}

/// Returns the namespace part of a raw id string.
pub fn namespace_of(id: &str) -> &str {
    id.rsplit_once(NAMESPACE_SEPARATOR)
        .map_or("", |(namespace, _)| namespace)
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.with_str(|s| f.write_str(s))
    }
}

impl From<&str> for Id {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<&String> for Id {
    fn from(name: &String) -> Self {
        Self::new(name)
    }
}

impl PartialEq<str> for Id {
    fn eq(&self, other: &str) -> bool {
        self.with_str(|s| s == other)
    }
}

impl PartialEq<&str> for Id {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl Serialize for Id {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.with_str(|s| serializer.serialize_str(s))
    }
}

impl<'de> Deserialize<'de> for Id {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Self::new(&name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_interns() {
        let id1 = Id::new("acme/api");
        let id2 = Id::new("acme/api");
        let id3 = Id::new("acme/db");

        assert_eq!(id1, id2);
        assert_ne!(id1, id3);
        assert_eq!(id1, "acme/api");
    }

    #[test]
    fn test_namespace() {
        assert_eq!(Id::new("acme/billing/api").namespace(), "acme/billing");
        assert_eq!(Id::new("acme/api").namespace(), "acme");
        assert_eq!(Id::new("standalone").namespace(), "");
        assert_eq!(Id::new("/leading").namespace(), "");
    }

    #[test]
    fn test_display() {
        let id = Id::new("display/test");
        assert_eq!(format!("{id}"), "display/test");
    }

    #[test]
    fn test_hash_and_eq() {
        use std::collections::HashMap;

        let mut map = HashMap::new();
        map.insert(Id::new("key1"), "value1");
        map.insert(Id::new("key2"), "value2");

        assert_eq!(map.get(&Id::new("key1")), Some(&"value1"));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_serde_as_string() {
        let id = Id::new("acme/user");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"acme/user\"");

        let back: Id = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}

#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    fn segment_strategy() -> impl Strategy<Value = String> {
        "[a-z][a-z0-9-]{0,8}"
    }

    proptest! {
        #[test]
        fn namespace_drops_exactly_the_last_segment(
            segments in prop::collection::vec(segment_strategy(), 1..5)
        ) {
            let raw = segments.join("/");
            let id = Id::new(&raw);
            let expected = segments[..segments.len() - 1].join("/");

            prop_assert_eq!(id.namespace(), expected);
        }
    }
}
