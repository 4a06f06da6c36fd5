//! Conversion from raw criteria maps to [`Criteria`].

use indexmap::IndexMap;
use regex::Regex;
use serde::Deserialize;

use astrolabe_core::{identifier::Id, kind::Maturity};

use super::{Clause, Conjunction, Criteria, Predicate};
use crate::error::CriteriaError;

const STRING: &str = "a string";
const LIST: &str = "a list of strings";
const BOOLEAN: &str = "a boolean";

/// Criteria as written: one map, or a list of maps.
///
/// Each map key names a predicate, optionally prefixed with `!` to negate
/// it. Value shapes by key:
///
/// | Keys | Value |
/// |------|-------|
/// | `el`, `id`, `namespace`, `namespace-prefix`, `tech`, `tag` | string |
/// | `from`, `to`, `refers-to`, `referred-by` | id string |
/// | `child-of`, `parent-of`, `descendant-of`, `ancestor-of` | id string |
/// | `els`, `ids`, `namespaces`, `techs`, `all-techs`, `tags`, `all-tags` | list of strings |
/// | `external?`, `element?`, `relation?` | boolean |
/// | `maturity` | maturity name, or `"none"` |
/// | `maturities` | list of maturity names |
/// | `name`, `desc`, `doc` | regular expression |
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawCriteria {
    Conjunction(RawConjunction),
    Disjunction(Vec<RawConjunction>),
}

pub type RawConjunction = IndexMap<String, RawValue>;

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Bool(bool),
    Str(String),
    List(Vec<String>),
}

impl TryFrom<RawCriteria> for Criteria {
    type Error = CriteriaError;

    fn try_from(raw: RawCriteria) -> Result<Self, Self::Error> {
        match raw {
            RawCriteria::Conjunction(map) => Ok(Self::Conjunction(parse_conjunction(map)?)),
            RawCriteria::Disjunction(maps) => maps
                .into_iter()
                .map(parse_conjunction)
                .collect::<Result<Vec<_>, _>>()
                .map(Self::Disjunction),
        }
    }
}

fn parse_conjunction(map: RawConjunction) -> Result<Conjunction, CriteriaError> {
    let clauses = map
        .into_iter()
        .map(|(key, value)| parse_clause(&key, value))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Conjunction { clauses })
}

fn parse_clause(key: &str, value: RawValue) -> Result<Clause, CriteriaError> {
    let (negated, key) = match key.strip_prefix('!') {
        Some(rest) => (true, rest),
        None => (false, key),
    };
    Ok(Clause::new(parse_predicate(key, value)?, negated))
}

fn parse_predicate(key: &str, value: RawValue) -> Result<Predicate, CriteriaError> {
    let predicate = match key {
        "el" => Predicate::Kind(string(key, value)?),
        "els" => Predicate::Kinds(list(key, value)?),
        "id" => Predicate::Id(id(key, value)?),
        "ids" => Predicate::Ids(list(key, value)?.iter().map(Id::from).collect()),
        "namespace" => Predicate::Namespace(string(key, value)?),
        "namespaces" => Predicate::Namespaces(list(key, value)?),
        "namespace-prefix" => Predicate::NamespacePrefix(string(key, value)?),
        "tech" => Predicate::Tech(string(key, value)?),
        "techs" => Predicate::Techs(list(key, value)?),
        "all-techs" => Predicate::AllTechs(list(key, value)?),
        "tag" => Predicate::Tag(string(key, value)?),
        "tags" => Predicate::Tags(list(key, value)?),
        "all-tags" => Predicate::AllTags(list(key, value)?),
        "external?" => Predicate::External(boolean(key, value)?),
        "element?" => Predicate::IsElement(boolean(key, value)?),
        "relation?" => Predicate::IsRelation(boolean(key, value)?),
        "maturity" => Predicate::Maturity(maturity(key, &string(key, value)?)?),
        "maturities" => Predicate::Maturities(
            list(key, value)?
                .iter()
                .map(|m| maturity(key, m))
                .collect::<Result<_, _>>()?,
        ),
        "from" => Predicate::From(id(key, value)?),
        "to" => Predicate::To(id(key, value)?),
        "refers-to" => Predicate::RefersTo(id(key, value)?),
        "referred-by" => Predicate::ReferredBy(id(key, value)?),
        "child-of" => Predicate::ChildOf(id(key, value)?),
        "parent-of" => Predicate::ParentOf(id(key, value)?),
        "descendant-of" => Predicate::DescendantOf(id(key, value)?),
        "ancestor-of" => Predicate::AncestorOf(id(key, value)?),
        "name" => Predicate::Name(regex(key, value)?),
        "desc" => Predicate::Desc(regex(key, value)?),
        "doc" => Predicate::Doc(regex(key, value)?),
        unknown => return Err(CriteriaError::UnknownKey(unknown.to_string())),
    };
    Ok(predicate)
}

fn invalid(key: &str, expected: &'static str) -> CriteriaError {
    CriteriaError::InvalidValue {
        key: key.to_string(),
        expected,
    }
}

fn string(key: &str, value: RawValue) -> Result<String, CriteriaError> {
    match value {
        RawValue::Str(s) => Ok(s),
        _ => Err(invalid(key, STRING)),
    }
}

fn id(key: &str, value: RawValue) -> Result<Id, CriteriaError> {
    string(key, value).map(|s| Id::new(&s))
}

fn list(key: &str, value: RawValue) -> Result<Vec<String>, CriteriaError> {
    match value {
        RawValue::List(items) => Ok(items),
        _ => Err(invalid(key, LIST)),
    }
}

fn boolean(key: &str, value: RawValue) -> Result<bool, CriteriaError> {
    match value {
        RawValue::Bool(b) => Ok(b),
        _ => Err(invalid(key, BOOLEAN)),
    }
}

fn maturity(key: &str, value: &str) -> Result<Option<Maturity>, CriteriaError> {
    if value == "none" {
        return Ok(None);
    }
    value
        .parse()
        .map(Some)
        .map_err(|_| CriteriaError::InvalidMaturity {
            key: key.to_string(),
            value: value.to_string(),
        })
}

fn regex(key: &str, value: RawValue) -> Result<Regex, CriteriaError> {
    let pattern = string(key, value)?;
    Regex::new(&pattern).map_err(|source| CriteriaError::InvalidRegex {
        key: key.to_string(),
        source,
    })
}
