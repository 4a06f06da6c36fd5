//! Error codes for the Astrolabe diagnostic system.
//!
//! Error codes are organized by phase:
//! - `E1xx` - Model build errors and warnings
//! - `E2xx` - Selection criteria errors
//! - `E3xx` - View composition errors and warnings

use std::fmt;

/// Error codes for categorizing diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Model Build (E1xx)
    // =========================================================================
    /// Duplicate id.
    ///
    /// Two declarations share an id. Later declarations never shadow earlier
    /// ones; the build is aborted instead.
    E100,

    /// Cyclic containment.
    ///
    /// Following owners and `contained-in` relations leads back to the
    /// starting element.
    E101,

    /// Unresolved reference.
    ///
    /// A relation endpoint or an element owner names an id that is not
    /// declared. The reference is dropped and the rest of the model stays
    /// usable.
    E102,

    /// Conflicting parent.
    ///
    /// An element was placed in two different containers. The first declared
    /// parent is kept.
    E103,

    // =========================================================================
    // Selection Criteria (E2xx)
    // =========================================================================
    /// Unknown predicate key.
    E200,

    /// Invalid predicate value.
    ///
    /// The value has the wrong shape for the key, for example a list where a
    /// single string is expected.
    E201,

    /// Invalid regular expression in a `name`, `desc` or `doc` predicate.
    E202,

    /// Invalid maturity value. Valid values are `proposed`, `deprecated` and
    /// `none`.
    E203,

    // =========================================================================
    // View Composition (E3xx)
    // =========================================================================
    /// Empty selection.
    ///
    /// The view composed to zero items. Usually the criteria are too narrow.
    E300,

    /// Invalid view type.
    ///
    /// A filtered view with a missing or cyclic base, a custom view holding
    /// non-custom elements, or a view whose body does not fit its kind.
    E301,

    /// Unresolved content reference.
    ///
    /// An explicit content entry names an id that is not in the model.
    E302,

    /// Mixed ordering.
    ///
    /// Some explicit content entries carry an `order` and some do not. List
    /// position is used for all of them.
    E303,

    /// Duplicate view id.
    E304,

    /// Unknown view.
    E305,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches_variant_name() {
        assert_eq!(ErrorCode::E100.to_string(), "E100");
        assert_eq!(ErrorCode::E302.to_string(), "E302");
    }
}
