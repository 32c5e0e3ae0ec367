// ─────────────────────────────────────────────────────────────────────
// SCPN VERA Bridge — Raw Document
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! The raw parsed-document tree.
//!
//! A VERA deck is one big parameter list of parameter lists. The XML
//! front-end (an external collaborator) flattens tag traversal and type
//! coercion into this mapping/sequence structure; the same structure
//! deserializes from JSON, which is what the tests and tooling use.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{VeraError, VeraResult};

/// A typed scalar or sequence leaf of the raw document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    IntArray(Vec<i64>),
    FloatArray(Vec<f64>),
    StrArray(Vec<String>),
}

/// A named parameter list: scalar parameters plus ordered child lists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawList {
    pub name: String,
    #[serde(default)]
    pub params: BTreeMap<String, RawValue>,
    #[serde(default)]
    pub lists: Vec<RawList>,
}

impl RawList {
    /// Look up a direct child list by name, case-insensitively (VERA block
    /// names appear in both cases in the wild).
    pub fn child(&self, name: &str) -> Option<&RawList> {
        self.lists
            .iter()
            .find(|list| list.name.eq_ignore_ascii_case(name))
    }

    /// Like `child`, but a missing list is a schema error.
    pub fn require_child(&self, name: &str) -> VeraResult<&RawList> {
        self.child(name).ok_or_else(|| {
            VeraError::schema(&self.name, format!("missing required section `{name}`"))
        })
    }

    fn param(&self, key: &str) -> VeraResult<&RawValue> {
        self.params.get(key).ok_or_else(|| {
            VeraError::schema(&self.name, format!("missing parameter `{key}`"))
        })
    }

    /// True if the parameter exists on this list.
    pub fn has_param(&self, key: &str) -> bool {
        self.params.contains_key(key)
    }

    pub fn str_param(&self, key: &str) -> VeraResult<&str> {
        match self.param(key)? {
            RawValue::Str(s) => Ok(s),
            other => Err(self.type_error(key, "string", other)),
        }
    }

    pub fn f64_param(&self, key: &str) -> VeraResult<f64> {
        match self.param(key)? {
            RawValue::Float(v) => Ok(*v),
            RawValue::Int(v) => Ok(*v as f64),
            other => Err(self.type_error(key, "double", other)),
        }
    }

    pub fn usize_param(&self, key: &str) -> VeraResult<usize> {
        match self.param(key)? {
            RawValue::Int(v) if *v >= 0 => Ok(*v as usize),
            other => Err(self.type_error(key, "non-negative integer", other)),
        }
    }

    pub fn f64_array(&self, key: &str) -> VeraResult<Vec<f64>> {
        match self.param(key)? {
            RawValue::FloatArray(v) => Ok(v.clone()),
            RawValue::IntArray(v) => Ok(v.iter().map(|&x| x as f64).collect()),
            RawValue::Float(v) => Ok(vec![*v]),
            RawValue::Int(v) => Ok(vec![*v as f64]),
            other => Err(self.type_error(key, "Array(double)", other)),
        }
    }

    pub fn str_array(&self, key: &str) -> VeraResult<Vec<String>> {
        match self.param(key)? {
            RawValue::StrArray(v) => Ok(v.clone()),
            RawValue::Str(s) => Ok(vec![s.clone()]),
            other => Err(self.type_error(key, "Array(string)", other)),
        }
    }

    fn type_error(&self, key: &str, expected: &str, got: &RawValue) -> VeraError {
        VeraError::schema(
            &self.name,
            format!("parameter `{key}` should be {expected}, got {got:?}"),
        )
    }
}
