//! Filter to query clause mapping

use super::dsl::{Clause, RangeBounds};
use crate::query::{Filter, Operator};

/// Map a filter to its query clause.
///
/// Returns `None` for operators outside the supported set. The value is
/// passed through as a string; numeric-looking values are not converted.
pub fn filter_clause(filter: &Filter) -> Option<Clause> {
    let field = filter.field.as_str();
    let value = filter.value.as_str();

    let clause = match &filter.operator {
        Operator::Equal => Clause::match_field(field, value),
        Operator::NotEqual => Clause::must_not(Clause::match_field(field, value)),
        Operator::GreaterThan => Clause::range(field, RangeBounds::gt(value)),
        Operator::LessThan => Clause::range(field, RangeBounds::lt(value)),
        Operator::GreaterOrEqual => Clause::range(field, RangeBounds::gte(value)),
        Operator::LessOrEqual => Clause::range(field, RangeBounds::lte(value)),
        Operator::Unsupported(_) => return None,
    };

    Some(clause)
}
