//! Simple query model
//!
//! The engine-agnostic shape callers use to describe a search:
//! - a mandatory date range
//! - conjunctive field filters
//! - aggregations keyed by field
//! - offset/limit pagination
//!
//! These are plain values. Nothing here talks to a search engine; see
//! [`crate::convert`] for the translation into the engine's query DSL.

use crate::error::QueryError;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer, Serialize};

/// A search request with date range, filters, aggregations and pagination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimpleQuery {
    /// Time period to search in
    pub date_range: DateRange,
    /// Conditions that all must match
    #[serde(default, deserialize_with = "null_as_empty")]
    pub filters: Vec<Filter>,
    /// Grouping and metric calculations over the matched documents
    #[serde(default, deserialize_with = "null_as_empty")]
    pub aggregations: Vec<Aggregation>,
    /// Maximum number of hits to return
    pub limit: i64,
    /// Number of hits to skip
    pub offset: i64,
}

impl SimpleQuery {
    /// Create a query over the given time period with no filters or aggregations
    pub fn new(from: impl Into<DateTime<FixedOffset>>, to: impl Into<DateTime<FixedOffset>>) -> Self {
        Self {
            date_range: DateRange::new(from, to),
            filters: Vec::new(),
            aggregations: Vec::new(),
            limit: 10,
            offset: 0,
        }
    }

    /// Add a filter
    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Add an aggregation
    pub fn with_aggregation(mut self, aggregation: Aggregation) -> Self {
        self.aggregations.push(aggregation);
        self
    }

    /// Set result window size
    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = limit;
        self
    }

    /// Set number of results to skip
    pub fn with_offset(mut self, offset: i64) -> Self {
        self.offset = offset;
        self
    }

    /// Check filters and aggregations against the supported vocabulary.
    ///
    /// Conversion never calls this. Callers that want unsupported
    /// operators or aggregation types rejected instead of silently
    /// dropped should validate first. The date range is not checked for
    /// ordering.
    pub fn validate(&self) -> Result<(), QueryError> {
        for (index, filter) in self.filters.iter().enumerate() {
            if filter.field.is_empty() {
                return Err(QueryError::EmptyField {
                    kind: "filter",
                    index,
                });
            }
            if filter.value.is_empty() {
                return Err(QueryError::EmptyValue {
                    index,
                    field: filter.field.clone(),
                });
            }
            if !filter.operator.is_supported() {
                return Err(QueryError::UnsupportedOperator {
                    index,
                    field: filter.field.clone(),
                    operator: filter.operator.to_string(),
                });
            }
        }

        for (index, agg) in self.aggregations.iter().enumerate() {
            if agg.field.is_empty() {
                return Err(QueryError::EmptyField {
                    kind: "aggregation",
                    index,
                });
            }
            if !agg.agg_type.is_supported() {
                return Err(QueryError::UnsupportedAggregation {
                    index,
                    field: agg.field.clone(),
                    agg_type: agg.agg_type.to_string(),
                });
            }
        }

        Ok(())
    }
}

/// Read a list that may be written as `null`
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Inclusive time interval. `from <= to` is not enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: DateTime<FixedOffset>,
    pub to: DateTime<FixedOffset>,
}

impl DateRange {
    pub fn new(from: impl Into<DateTime<FixedOffset>>, to: impl Into<DateTime<FixedOffset>>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// A single field condition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    /// Field to compare
    pub field: String,
    /// Comparison operation
    pub operator: Operator,
    /// Comparison value, kept as text whatever the field type
    pub value: String,
}

impl Filter {
    pub fn new(field: impl Into<String>, operator: Operator, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            operator,
            value: value.into(),
        }
    }
}

/// Comparison operator of a filter
///
/// Serialized as its symbol. Any symbol outside the supported six is kept
/// in [`Operator::Unsupported`] so a deserialized query never fails on it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Operator {
    /// `=`
    Equal,
    /// `!=`
    NotEqual,
    /// `>`
    GreaterThan,
    /// `<`
    LessThan,
    /// `>=`
    GreaterOrEqual,
    /// `<=`
    LessOrEqual,
    Unsupported(String),
}

impl Operator {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Equal => "=",
            Self::NotEqual => "!=",
            Self::GreaterThan => ">",
            Self::LessThan => "<",
            Self::GreaterOrEqual => ">=",
            Self::LessOrEqual => "<=",
            Self::Unsupported(op) => op,
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Unsupported(_))
    }
}

impl From<&str> for Operator {
    fn from(symbol: &str) -> Self {
        match symbol {
            "=" => Self::Equal,
            "!=" => Self::NotEqual,
            ">" => Self::GreaterThan,
            "<" => Self::LessThan,
            ">=" => Self::GreaterOrEqual,
            "<=" => Self::LessOrEqual,
            other => Self::Unsupported(other.to_string()),
        }
    }
}

impl From<String> for Operator {
    fn from(symbol: String) -> Self {
        Self::from(symbol.as_str())
    }
}

impl From<Operator> for String {
    fn from(op: Operator) -> Self {
        match op {
            Operator::Unsupported(op) => op,
            supported => supported.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A grouping or calculation over the matched documents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aggregation {
    /// Field to aggregate on; also names the aggregation in the output
    pub field: String,
    /// Kind of aggregation
    #[serde(rename = "type")]
    pub agg_type: AggregationType,
    /// Maximum number of buckets. Only used by bucketing types.
    #[serde(default)]
    pub size: i64,
}

impl Aggregation {
    pub fn new(field: impl Into<String>, agg_type: AggregationType, size: i64) -> Self {
        Self {
            field: field.into(),
            agg_type,
            size,
        }
    }

    /// Top distinct values of a field
    pub fn terms(field: impl Into<String>, size: i64) -> Self {
        Self::new(field, AggregationType::Terms, size)
    }

    /// Sum of a numeric field
    pub fn sum(field: impl Into<String>) -> Self {
        Self::new(field, AggregationType::Sum, 0)
    }

    /// Average of a numeric field
    pub fn avg(field: impl Into<String>) -> Self {
        Self::new(field, AggregationType::Avg, 0)
    }
}

/// Kind of aggregation, serialized in lowercase
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AggregationType {
    /// Bucket aggregation over distinct values
    Terms,
    /// Metric: sum
    Sum,
    /// Metric: average
    Avg,
    Unsupported(String),
}

impl AggregationType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Terms => "terms",
            Self::Sum => "sum",
            Self::Avg => "avg",
            Self::Unsupported(kind) => kind,
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Unsupported(_))
    }
}

impl From<&str> for AggregationType {
    fn from(name: &str) -> Self {
        match name {
            "terms" => Self::Terms,
            "sum" => Self::Sum,
            "avg" => Self::Avg,
            other => Self::Unsupported(other.to_string()),
        }
    }
}

impl From<String> for AggregationType {
    fn from(name: String) -> Self {
        Self::from(name.as_str())
    }
}

impl From<AggregationType> for String {
    fn from(kind: AggregationType) -> Self {
        match kind {
            AggregationType::Unsupported(kind) => kind,
            supported => supported.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for AggregationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
