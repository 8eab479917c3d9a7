//! End-to-end conversion of simple queries into query DSL documents

use chrono::{FixedOffset, TimeZone, Utc};
use serde_json::{json, Value};
use smpsearch::{Aggregation, Converter, ElasticConverter, Filter, Operator, SimpleQuery};

fn january_query() -> SimpleQuery {
    SimpleQuery::new(
        Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2023, 1, 2, 0, 0, 0).unwrap(),
    )
    .with_limit(10)
    .with_offset(0)
}

fn date_clause() -> Value {
    json!({
        "range": {
            "@timestamp": {
                "gte": "2023-01-01T00:00:00Z",
                "lte": "2023-01-02T00:00:00Z"
            }
        }
    })
}

fn convert(query: &SimpleQuery) -> Value {
    let text = ElasticConverter::default().convert(query);
    serde_json::from_str(&text).expect("converter must emit valid JSON")
}

#[test]
fn test_date_range_only() {
    let got = convert(&january_query());

    assert_eq!(
        got,
        json!({
            "query": {"bool": {"must": [date_clause()]}},
            "from": 0,
            "size": 10
        })
    );
    assert!(got.get("aggs").is_none());
}

#[test]
fn test_filters_follow_date_range_in_order() {
    let query = january_query()
        .with_filter(Filter::new("status", Operator::Equal, "active"))
        .with_filter(Filter::new("age", Operator::GreaterThan, "25"));

    assert_eq!(
        convert(&query),
        json!({
            "query": {
                "bool": {
                    "must": [
                        date_clause(),
                        {"match": {"status": "active"}},
                        {"range": {"age": {"gt": "25"}}}
                    ]
                }
            },
            "from": 0,
            "size": 10
        })
    );
}

#[test]
fn test_aggregations() {
    let query = january_query()
        .with_aggregation(Aggregation::terms("status", 5))
        .with_aggregation(Aggregation::sum("amount"));

    assert_eq!(
        convert(&query),
        json!({
            "query": {"bool": {"must": [date_clause()]}},
            "from": 0,
            "size": 10,
            "aggs": {
                "status": {"terms": {"field": "status", "size": 5}},
                "amount": {"sum": {"field": "amount"}}
            }
        })
    );
}

#[test]
fn test_unsupported_operator_is_omitted() {
    let query = january_query().with_filter(Filter::new("name", Operator::from("~="), "al"));

    let got = convert(&query);
    assert_eq!(got["query"]["bool"]["must"], json!([date_clause()]));
}

#[test]
fn test_duplicate_aggregation_field_last_wins() {
    let query = january_query()
        .with_aggregation(Aggregation::sum("amount"))
        .with_aggregation(Aggregation::avg("amount"));

    let got = convert(&query);
    assert_eq!(got["aggs"], json!({"amount": {"avg": {"field": "amount"}}}));
}

#[test]
fn test_all_operators_in_one_query() {
    let query = january_query()
        .with_filter(Filter::new("a", Operator::Equal, "1"))
        .with_filter(Filter::new("b", Operator::NotEqual, "2"))
        .with_filter(Filter::new("c", Operator::from("contains"), "x"))
        .with_filter(Filter::new("d", Operator::LessThan, "3"))
        .with_filter(Filter::new("e", Operator::GreaterOrEqual, "4"))
        .with_filter(Filter::new("f", Operator::LessOrEqual, "5"));

    let got = convert(&query);
    assert_eq!(
        got["query"]["bool"]["must"],
        json!([
            date_clause(),
            {"match": {"a": "1"}},
            {"bool": {"must_not": {"match": {"b": "2"}}}},
            {"range": {"d": {"lt": "3"}}},
            {"range": {"e": {"gte": "4"}}},
            {"range": {"f": {"lte": "5"}}}
        ])
    );
}

#[test]
fn test_zero_pagination_and_zero_terms_size() {
    let query = january_query()
        .with_limit(0)
        .with_aggregation(Aggregation::terms("status", 0));

    let got = convert(&query);
    assert_eq!(got["from"], json!(0));
    assert_eq!(got["size"], json!(0));
    assert_eq!(got["aggs"]["status"], json!({"terms": {"field": "status", "size": 0}}));
}

#[test]
fn test_reversed_range_emitted_verbatim() {
    let query = SimpleQuery::new(
        Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap(),
    );

    let got = convert(&query);
    assert_eq!(
        got["query"]["bool"]["must"][0]["range"]["@timestamp"],
        json!({"gte": "2024-03-01T00:00:00Z", "lte": "2024-02-01T00:00:00Z"})
    );
}

#[test]
fn test_offset_timestamps_keep_their_zone() {
    let cet = FixedOffset::east_opt(3600).unwrap();
    let query = SimpleQuery::new(
        cet.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap(),
        cet.with_ymd_and_hms(2023, 1, 1, 23, 59, 59).unwrap(),
    );

    let got = convert(&query);
    assert_eq!(
        got["query"]["bool"]["must"][0]["range"]["@timestamp"],
        json!({"gte": "2023-01-01T00:00:00+01:00", "lte": "2023-01-01T23:59:59+01:00"})
    );
}

#[test]
fn test_json_input_round_trip() {
    let raw = r#"{
        "date_range": {"from": "2023-01-01T00:00:00Z", "to": "2023-01-02T00:00:00Z"},
        "filters": [
            {"field": "status", "operator": "=", "value": "active"},
            {"field": "name", "operator": "like", "value": "al%"}
        ],
        "aggregations": [
            {"field": "country", "type": "terms", "size": 3},
            {"field": "amount", "type": "median"}
        ],
        "limit": 25,
        "offset": 50
    }"#;
    let query: SimpleQuery = serde_json::from_str(raw).unwrap();
    assert!(query.validate().is_err());

    assert_eq!(
        convert(&query),
        json!({
            "query": {
                "bool": {
                    "must": [date_clause(), {"match": {"status": "active"}}]
                }
            },
            "from": 50,
            "size": 25,
            "aggs": {"country": {"terms": {"field": "country", "size": 3}}}
        })
    );
}

#[test]
fn test_conversion_is_deterministic_and_leaves_input_alone() {
    let query = january_query()
        .with_filter(Filter::new("status", Operator::NotEqual, "closed"))
        .with_aggregation(Aggregation::terms("status", 5))
        .with_aggregation(Aggregation::avg("amount"));
    let before = query.clone();

    let converter = ElasticConverter::default();
    let first = converter.convert(&query);
    let second = converter.convert(&query);

    assert_eq!(first, second);
    assert_eq!(query, before);
}

#[test]
fn test_shared_converter_across_threads() {
    let converter = std::sync::Arc::new(ElasticConverter::default());
    let expected = converter.convert(&january_query());

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let converter = converter.clone();
            std::thread::spawn(move || converter.convert(&january_query()))
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}
