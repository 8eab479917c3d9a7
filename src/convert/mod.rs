//! Query DSL conversion
//!
//! Turns a [`SimpleQuery`] into the JSON request body of an
//! Elasticsearch-style search endpoint:
//!
//! ```text
//! {
//!   "query": {"bool": {"must": [<date range>, <filter>...]}},
//!   "from": <offset>,
//!   "size": <limit>,
//!   "aggs": {<field>: <aggregation>, ...}
//! }
//! ```
//!
//! Conversion never fails outwardly. Unsupported operators and
//! aggregation types are dropped, and a serialization fault yields `{}`.
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use smpsearch::convert::{Converter, ElasticConverter};
//! use smpsearch::query::{Filter, Operator, SimpleQuery};
//!
//! let query = SimpleQuery::new(
//!     Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap(),
//!     Utc.with_ymd_and_hms(2023, 1, 2, 0, 0, 0).unwrap(),
//! )
//! .with_filter(Filter::new("status", Operator::Equal, "active"));
//!
//! let body = ElasticConverter::default().convert(&query);
//! assert!(body.contains(r#""match":{"status":"active"}"#));
//! ```

mod aggregation;
pub mod dsl;
mod filter;

pub use aggregation::aggregation_clause;
pub use filter::filter_clause;

use crate::config::{self, ConverterSettings, DEFAULT_TIMESTAMP_FIELD};
use crate::error::ConvertError;
use crate::query::SimpleQuery;
use chrono::{DateTime, FixedOffset, SecondsFormat};
use dsl::{Clause, RangeBounds, SearchBody};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Text returned when the document cannot be serialized
pub const EMPTY_DOCUMENT: &str = "{}";

/// Converts simple queries into a search engine's request body
pub trait Converter: Send + Sync {
    /// Target engine name
    fn name(&self) -> &str;

    /// Render the query as JSON text. Never fails; see [`EMPTY_DOCUMENT`].
    fn convert(&self, query: &SimpleQuery) -> String;
}

/// Converter for the Elasticsearch query DSL
#[derive(Debug, Clone)]
pub struct ElasticConverter {
    timestamp_field: String,
    pretty: bool,
}

impl ElasticConverter {
    pub fn new() -> Self {
        Self {
            timestamp_field: DEFAULT_TIMESTAMP_FIELD.to_string(),
            pretty: false,
        }
    }

    pub fn from_settings(settings: &ConverterSettings) -> Self {
        Self {
            timestamp_field: settings.timestamp_field.clone(),
            pretty: settings.pretty,
        }
    }

    /// Converter from the process-wide settings, defaults if none are installed
    pub fn configured() -> Self {
        Self::from_settings(&config::converter_settings())
    }

    /// Apply the date range to a different field
    pub fn with_timestamp_field(mut self, field: impl Into<String>) -> Self {
        self.timestamp_field = field.into();
        self
    }

    /// Indent the emitted JSON
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn timestamp_field(&self) -> &str {
        &self.timestamp_field
    }

    /// Build the typed request body
    pub fn build(&self, query: &SimpleQuery) -> SearchBody {
        let range = &query.date_range;
        let mut must = vec![Clause::range(
            self.timestamp_field.as_str(),
            RangeBounds::between(format_timestamp(&range.from), format_timestamp(&range.to)),
        )];

        for filter in &query.filters {
            match filter_clause(filter) {
                Some(clause) => must.push(clause),
                None => debug!(
                    "Dropping filter on '{}' with unsupported operator '{}'",
                    filter.field, filter.operator
                ),
            }
        }

        let mut aggs = BTreeMap::new();
        for agg in &query.aggregations {
            match aggregation_clause(agg) {
                // Keyed by field: a later aggregation on the same field wins
                Some(clause) => {
                    aggs.insert(agg.field.clone(), clause);
                }
                None => debug!(
                    "Dropping aggregation on '{}' with unsupported type '{}'",
                    agg.field, agg.agg_type
                ),
            }
        }

        SearchBody {
            query: Clause::must(must),
            from: query.offset,
            size: query.limit,
            aggs: if aggs.is_empty() { None } else { Some(aggs) },
        }
    }

    /// Render the query, surfacing serialization faults
    pub fn try_convert(&self, query: &SimpleQuery) -> Result<String, ConvertError> {
        render(&self.build(query), self.pretty)
    }
}

impl Default for ElasticConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl Converter for ElasticConverter {
    fn name(&self) -> &str {
        "elasticsearch"
    }

    fn convert(&self, query: &SimpleQuery) -> String {
        or_empty_document(self.try_convert(query))
    }
}

/// RFC 3339 at second precision, `Z` for UTC, otherwise the instant's offset.
///
/// Years outside `0..=9999` are written with an explicit sign and as many
/// digits as needed (`+10000-01-01T00:00:00Z`, `-0001-...`), the RFC 3339
/// expanded-year form. Engines that only accept four-digit years will
/// reject such bounds.
pub fn format_timestamp(ts: &DateTime<FixedOffset>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn render<T: Serialize>(body: &T, pretty: bool) -> Result<String, ConvertError> {
    let text = if pretty {
        serde_json::to_string_pretty(body)?
    } else {
        serde_json::to_string(body)?
    };
    Ok(text)
}

fn or_empty_document(result: Result<String, ConvertError>) -> String {
    result.unwrap_or_else(|e| {
        warn!("Query conversion fell back to empty document: {}", e);
        EMPTY_DOCUMENT.to_string()
    })
}
