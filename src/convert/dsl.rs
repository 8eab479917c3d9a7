//! Typed Elasticsearch request body
//!
//! Only the subset of the query DSL the converter emits. Each enum is
//! externally tagged so a variant serializes as `{"<kind>": {...}}`.

use serde::Serialize;
use std::collections::BTreeMap;

/// Complete search request body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchBody {
    pub query: Clause,
    pub from: i64,
    pub size: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aggs: Option<BTreeMap<String, AggClause>>,
}

/// One query clause
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Clause {
    /// `{"match": {field: value}}`
    Match(BTreeMap<String, String>),
    /// `{"range": {field: {bounds}}}`
    Range(BTreeMap<String, RangeBounds>),
    /// `{"bool": {...}}`
    Bool(BoolQuery),
}

impl Clause {
    pub fn match_field(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Match(BTreeMap::from([(field.into(), value.into())]))
    }

    pub fn range(field: impl Into<String>, bounds: RangeBounds) -> Self {
        Self::Range(BTreeMap::from([(field.into(), bounds)]))
    }

    /// Conjunction of clauses
    pub fn must(clauses: Vec<Clause>) -> Self {
        Self::Bool(BoolQuery {
            must: clauses,
            must_not: None,
        })
    }

    /// Negation of a single clause
    pub fn must_not(clause: Clause) -> Self {
        Self::Bool(BoolQuery {
            must: Vec::new(),
            must_not: Some(Box::new(clause)),
        })
    }
}

/// Body of a `bool` clause
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct BoolQuery {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub must: Vec<Clause>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub must_not: Option<Box<Clause>>,
}

/// Bounds of a `range` clause; unset bounds are left out
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct RangeBounds {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gte: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lte: Option<String>,
}

impl RangeBounds {
    pub fn gt(value: impl Into<String>) -> Self {
        Self {
            gt: Some(value.into()),
            ..Default::default()
        }
    }

    pub fn gte(value: impl Into<String>) -> Self {
        Self {
            gte: Some(value.into()),
            ..Default::default()
        }
    }

    pub fn lt(value: impl Into<String>) -> Self {
        Self {
            lt: Some(value.into()),
            ..Default::default()
        }
    }

    pub fn lte(value: impl Into<String>) -> Self {
        Self {
            lte: Some(value.into()),
            ..Default::default()
        }
    }

    /// Closed interval `[from, to]`
    pub fn between(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            gte: Some(from.into()),
            lte: Some(to.into()),
            ..Default::default()
        }
    }
}

/// One aggregation definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AggClause {
    Terms { field: String, size: i64 },
    Sum { field: String },
    Avg { field: String },
}
