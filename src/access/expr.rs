//! # Tag Predicates
//!
//! A small boolean tree over an OSM tag set. The same tree is evaluated
//! directly against tags (classification, tests) and lowered into the
//! rendering engine's filter syntax (MapLibre legacy filters).
//!
//! ```text
//! Expr
//! ├── Has(key)                  ["has", key]
//! ├── Equals(key, value)        ["==", key, value]
//! ├── NotEquals(key, value)     ["!=", key, value]
//! ├── All(exprs)                ["all", ...]
//! ├── Any(exprs)                ["any", ...]
//! └── None(exprs)               ["none", ...]
//! ```
//!
//! Empty combinators follow the filter semantics: `All([])` and `None([])`
//! are true, `Any([])` is false. `NotEquals` holds when the key is absent.

use std::collections::BTreeMap;

use serde_json::{Value, json};

/// Free-form OSM attributes. Sorted so the tag table renders in key order.
pub type TagSet = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Has(String),
    Equals(String, String),
    NotEquals(String, String),
    All(Vec<Expr>),
    Any(Vec<Expr>),
    None(Vec<Expr>),
}

impl Expr {
    pub fn has(key: &str) -> Expr {
        Expr::Has(key.to_string())
    }

    /// Key is absent. Lowered as `["none", ["has", key]]`.
    pub fn lacks(key: &str) -> Expr {
        Expr::None(vec![Expr::has(key)])
    }

    pub fn eq(key: &str, value: &str) -> Expr {
        Expr::Equals(key.to_string(), value.to_string())
    }

    pub fn ne(key: &str, value: &str) -> Expr {
        Expr::NotEquals(key.to_string(), value.to_string())
    }

    /// Key equals one of `values`.
    pub fn one_of(key: &str, values: &[&str]) -> Expr {
        Expr::Any(values.iter().map(|v| Expr::eq(key, v)).collect())
    }

    /// Key differs from every one of `values` (or is absent).
    pub fn none_of(key: &str, values: &[&str]) -> Expr {
        Expr::All(values.iter().map(|v| Expr::ne(key, v)).collect())
    }

    /// Negation, expressed with the only negating combinator available.
    pub fn not(self) -> Expr {
        Expr::None(vec![self])
    }

    /// Evaluates the predicate against a tag set.
    pub fn matches(&self, tags: &TagSet) -> bool {
        match self {
            Expr::Has(key) => tags.contains_key(key),
            Expr::Equals(key, value) => tags.get(key).is_some_and(|v| v == value),
            Expr::NotEquals(key, value) => tags.get(key).is_none_or(|v| v != value),
            Expr::All(exprs) => exprs.iter().all(|e| e.matches(tags)),
            Expr::Any(exprs) => exprs.iter().any(|e| e.matches(tags)),
            Expr::None(exprs) => !exprs.iter().any(|e| e.matches(tags)),
        }
    }

    /// Lowers the tree into a MapLibre legacy filter expression.
    pub fn to_filter(&self) -> Value {
        match self {
            Expr::Has(key) => json!(["has", key]),
            Expr::Equals(key, value) => json!(["==", key, value]),
            Expr::NotEquals(key, value) => json!(["!=", key, value]),
            Expr::All(exprs) => combinator("all", exprs),
            Expr::Any(exprs) => combinator("any", exprs),
            Expr::None(exprs) => combinator("none", exprs),
        }
    }
}

fn combinator(op: &str, exprs: &[Expr]) -> Value {
    let mut items = Vec::with_capacity(exprs.len() + 1);
    items.push(Value::String(op.to_string()));
    items.extend(exprs.iter().map(Expr::to_filter));
    Value::Array(items)
}

/// Builds a tag set from `(key, value)` pairs.
pub fn tags(pairs: &[(&str, &str)]) -> TagSet {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
