//! Aggregation to aggregation clause mapping

use super::dsl::AggClause;
use crate::query::{Aggregation, AggregationType};

/// Map an aggregation to its clause.
///
/// `size` is carried only by `terms`; metric types ignore it. Returns
/// `None` for unsupported types.
pub fn aggregation_clause(agg: &Aggregation) -> Option<AggClause> {
    let field = agg.field.clone();

    match &agg.agg_type {
        AggregationType::Terms => Some(AggClause::Terms {
            field,
            size: agg.size,
        }),
        AggregationType::Sum => Some(AggClause::Sum { field }),
        AggregationType::Avg => Some(AggClause::Avg { field }),
        AggregationType::Unsupported(_) => None,
    }
}
