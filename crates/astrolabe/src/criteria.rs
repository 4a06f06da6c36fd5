//! Selection criteria: predicates over elements and relations.
//!
//! A [`Criteria`] is either a [`Conjunction`] of clauses, every one of which
//! must hold, or a disjunction of conjunctions of which any must hold. Each
//! [`Clause`] wraps one [`Predicate`] and may be negated on its own.
//!
//! Criteria are usually deserialized from a map such as
//! `{"el": "system", "!external?": true}` or a list of such maps; see
//! [`RawCriteria`] for the accepted keys and value shapes. They can also be built
//! in code:
//!
//! ```
//! use astrolabe::criteria::{Conjunction, Criteria, Predicate};
//!
//! let backend_internal = Criteria::from(
//!     Conjunction::new()
//!         .with(Predicate::Tag("backend".into()))
//!         .without(Predicate::External(true)),
//! );
//! assert!(!backend_internal.is_unrestricted());
//! ```

mod evaluate;
mod parse;

use std::fmt;

use regex::Regex;
use serde::Deserialize;

use astrolabe_core::{identifier::Id, kind::Maturity};

pub use evaluate::{matches, matching};
pub use parse::{RawConjunction, RawCriteria, RawValue};

/// A single test against an element or relation.
///
/// Kind, namespace, tech and tag values compare as plain strings. Regex
/// predicates search the field; an absent field never matches.
#[derive(Debug, Clone)]
pub enum Predicate {
    /// `el`: kind name equals.
    Kind(String),
    /// `els`: kind name is one of.
    Kinds(Vec<String>),
    Id(Id),
    Ids(Vec<Id>),
    /// `namespace`: exact namespace equality.
    Namespace(String),
    Namespaces(Vec<String>),
    /// `namespace-prefix`: namespace equals the prefix or lies below it.
    NamespacePrefix(String),
    /// `tech`: some tech entry contains the text.
    Tech(String),
    /// `techs`: some tech entry equals one of the values.
    Techs(Vec<String>),
    /// `all-techs`: every value is a tech entry.
    AllTechs(Vec<String>),
    Tag(String),
    Tags(Vec<String>),
    AllTags(Vec<String>),
    External(bool),
    IsElement(bool),
    IsRelation(bool),
    /// `maturity`: `None` matches items without a maturity.
    Maturity(Option<Maturity>),
    Maturities(Vec<Option<Maturity>>),
    From(Id),
    To(Id),
    RefersTo(Id),
    ReferredBy(Id),
    ChildOf(Id),
    ParentOf(Id),
    DescendantOf(Id),
    AncestorOf(Id),
    Name(Regex),
    Desc(Regex),
    Doc(Regex),
}

impl Predicate {
    /// The criteria key this predicate is written as.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Kind(_) => "el",
            Self::Kinds(_) => "els",
            Self::Id(_) => "id",
            Self::Ids(_) => "ids",
            Self::Namespace(_) => "namespace",
            Self::Namespaces(_) => "namespaces",
            Self::NamespacePrefix(_) => "namespace-prefix",
            Self::Tech(_) => "tech",
            Self::Techs(_) => "techs",
            Self::AllTechs(_) => "all-techs",
            Self::Tag(_) => "tag",
            Self::Tags(_) => "tags",
            Self::AllTags(_) => "all-tags",
            Self::External(_) => "external?",
            Self::IsElement(_) => "element?",
            Self::IsRelation(_) => "relation?",
            Self::Maturity(_) => "maturity",
            Self::Maturities(_) => "maturities",
            Self::From(_) => "from",
            Self::To(_) => "to",
            Self::RefersTo(_) => "refers-to",
            Self::ReferredBy(_) => "referred-by",
            Self::ChildOf(_) => "child-of",
            Self::ParentOf(_) => "parent-of",
            Self::DescendantOf(_) => "descendant-of",
            Self::AncestorOf(_) => "ancestor-of",
            Self::Name(_) => "name",
            Self::Desc(_) => "desc",
            Self::Doc(_) => "doc",
        }
    }
}

/// A predicate, optionally negated.
#[derive(Debug, Clone)]
pub struct Clause {
    predicate: Predicate,
    negated: bool,
}

impl Clause {
    pub fn new(predicate: Predicate, negated: bool) -> Self {
        Self { predicate, negated }
    }

    pub fn predicate(&self) -> &Predicate {
        &self.predicate
    }

    pub fn is_negated(&self) -> bool {
        self.negated
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negated {
            f.write_str("!")?;
        }
        f.write_str(self.predicate.key())
    }
}

/// Clauses that must all hold. The empty conjunction matches everything.
#[derive(Debug, Clone, Default)]
pub struct Conjunction {
    clauses: Vec<Clause>,
}

impl Conjunction {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a clause requiring `predicate` to hold.
    pub fn with(mut self, predicate: Predicate) -> Self {
        self.clauses.push(Clause::new(predicate, false));
        self
    }

    /// Adds a clause requiring `predicate` not to hold.
    pub fn without(mut self, predicate: Predicate) -> Self {
        self.clauses.push(Clause::new(predicate, true));
        self
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }
}

impl fmt::Display for Conjunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, clause) in self.clauses.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{clause}")?;
        }
        f.write_str("}")
    }
}

/// A selection criteria expression.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "parse::RawCriteria")]
pub enum Criteria {
    Conjunction(Conjunction),
    /// Matches if any conjunction matches. An empty list matches nothing.
    Disjunction(Vec<Conjunction>),
}

impl Criteria {
    /// Criteria that match every item.
    pub fn all() -> Self {
        Self::Conjunction(Conjunction::new())
    }

    /// Whether these criteria accept every item, which is rarely intended.
    pub fn is_unrestricted(&self) -> bool {
        match self {
            Self::Conjunction(conj) => conj.is_empty(),
            Self::Disjunction(alternatives) => alternatives.iter().any(Conjunction::is_empty),
        }
    }
}

impl Default for Criteria {
    fn default() -> Self {
        Self::all()
    }
}

impl From<Conjunction> for Criteria {
    fn from(conj: Conjunction) -> Self {
        Self::Conjunction(conj)
    }
}

impl fmt::Display for Criteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Conjunction(conj) => write!(f, "{conj}"),
            Self::Disjunction(alternatives) => {
                f.write_str("[")?;
                for (i, conj) in alternatives.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{conj}")?;
                }
                f.write_str("]")
            }
        }
    }
}
