//! smpsearch: simple search queries to Elasticsearch query DSL
//!
//! Callers describe a search as a [`SimpleQuery`] (date range, filters,
//! aggregations, pagination) and a [`Converter`] renders it as the JSON
//! body of a search request. All knowledge of the engine's query grammar
//! stays inside [`convert`].

pub mod config;
pub mod convert;
pub mod error;
pub mod query;

pub use config::Settings;
pub use convert::{Converter, ElasticConverter};
pub use error::{ConvertError, QueryError};
pub use query::{Aggregation, AggregationType, DateRange, Filter, Operator, SimpleQuery};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
