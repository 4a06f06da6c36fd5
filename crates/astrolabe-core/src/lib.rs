//! Astrolabe Core Types
//!
//! This crate provides the data model shared by the Astrolabe selection and
//! view-composition engine:
//!
//! - **Identifiers**: Interned, namespaced identifiers ([`identifier::Id`])
//! - **Kinds**: Closed element/relation kind tags with a custom fallback ([`kind`] module)
//! - **Elements and relations**: The nodes and edges of the model ([`element`], [`relation`])
//! - **Declarations**: The raw, source-ordered input of a model build ([`decl`] module)

pub mod decl;
pub mod element;
pub mod identifier;
pub mod kind;
pub mod relation;
