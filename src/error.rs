//! Error types for query validation and conversion

use thiserror::Error;

/// Reasons a query fails validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    /// A filter or aggregation names no field
    #[error("{kind} #{index} has an empty field")]
    EmptyField { kind: &'static str, index: usize },

    /// A filter carries an empty comparison value
    #[error("filter #{index} on '{field}' has an empty value")]
    EmptyValue { index: usize, field: String },

    #[error("filter #{index} on '{field}' uses unsupported operator '{operator}'")]
    UnsupportedOperator {
        index: usize,
        field: String,
        operator: String,
    },

    #[error("aggregation #{index} on '{field}' uses unsupported type '{agg_type}'")]
    UnsupportedAggregation {
        index: usize,
        field: String,
        agg_type: String,
    },
}

/// Failure while rendering the query DSL document
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("failed to serialize query document: {0}")]
    Serialize(#[from] serde_json::Error),
}
