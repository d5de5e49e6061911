//! Query engine through the public API, over real `Record`s.

mod common;

use chrono::NaiveDate;
use common::record;
use rotsit::RotsitError;
use rotsit::model::Record;
use rotsit::query::{EvalError, OperationError, Query, QueryError, eval_str, filter};
use rotsit::storage::{decode_records, encode_records};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 19).expect("valid date")
}

fn tracker() -> Vec<Record> {
    vec![
        record(&[
            ("guid", "0x1a2b3c4d5e6f7081"),
            ("order", "1"),
            ("opened_by", "alice"),
            ("opened_on", "Mon Jun 13 09:00:00 2016"),
            ("message", "Crash on start"),
            ("status", "open"),
        ]),
        record(&[
            ("guid", "0x00000000000000ff"),
            ("order", "2"),
            ("opened_by", "bob"),
            ("opened_on", "Tue Oct 13 14:30:00 2026"),
            ("message", "Typo in README"),
            ("status", "closed"),
            ("closed_by", "alice"),
            ("closed_on", "Wed Oct 14 10:00:00 2026"),
        ]),
        record(&[
            ("guid", "0xfedcba9876543210"),
            ("order", "3"),
            ("opened_by", "carol"),
            ("opened_on", "Sun Oct 18 08:15:00 2026"),
            ("message", "Slow search"),
            ("status", "open"),
            ("assigned_to", "alice"),
        ]),
    ]
}

fn orders(selected: &[&Record]) -> Vec<String> {
    selected
        .iter()
        .map(|r| r.get_field("ORDER").unwrap_or_default().to_string())
        .collect()
}

fn select(records: &[Record], expr: &str) -> Vec<String> {
    let query = Query::parse_on(expr, today()).expect("query parses");
    orders(&query.select(records).expect("query runs"))
}

#[test]
fn arithmetic_table() {
    let _log = common::test_log("arithmetic_table");
    for (expr, expected) in [
        ("5 + 3", "8"),
        ("5 + 3 * 2", "11"),
        ("(5 + 3) * 2", "16"),
        ("(5 + (3 - 1)) * 2", "14"),
        ("5 != 3", "1"),
        ("5 == 3", "0"),
        ("((((5 + 3))))", "8"),
        ("0x10 + 1", "17"),
        ("7 / 2", "3"),
    ] {
        assert_eq!(eval_str(expr).unwrap(), expected, "{expr}");
    }
}

#[test]
fn unbalanced_group_never_yields_a_number() {
    let _log = common::test_log("unbalanced_group_never_yields_a_number");
    assert!(matches!(eval_str("(5 + 3"), Err(QueryError::Syntax { .. })));
    assert!(matches!(eval_str("5 + 3)"), Err(QueryError::Syntax { .. })));
}

#[test]
fn field_equals_itself() {
    let _log = common::test_log("field_equals_itself");
    let records = tracker();
    for name in rotsit::query::FIELD_NAMES {
        let expr = format!("{name} == {name}");
        assert_eq!(select(&records, &expr).len(), 3, "{expr}");
    }
}

#[test]
fn filter_by_people_and_status() {
    let _log = common::test_log("filter_by_people_and_status");
    let records = tracker();
    assert_eq!(select(&records, "status == \"open\""), ["1", "3"]);
    assert_eq!(select(&records, "\"alice\" == closed_by | \"alice\" == assigned_to"), ["2", "3"]);
    assert_eq!(select(&records, "opened_by != \"alice\" & order > 1"), ["2", "3"]);
}

#[test]
fn filter_by_dates() {
    let _log = common::test_log("filter_by_dates");
    let records = tracker();
    assert_eq!(select(&records, "opened_on < \"1 Jan 2020\""), ["1"]);
    assert_eq!(select(&records, "opened_on >= \"Oct 13\""), ["2", "3"]);
    assert_eq!(select(&records, "opened_on > \"13 Oct 2026 12:00\""), ["2", "3"]);
    assert_eq!(select(&records, "closed_on > opened_on"), ["2"]);
}

#[test]
fn calendrically_equal_dates_are_equal() {
    let _log = common::test_log("calendrically_equal_dates_are_equal");
    let query = Query::parse_on("\"12 June 2016\" == \"12/6/2016\"", today()).unwrap();
    let empty: std::collections::HashMap<String, String> = std::collections::HashMap::new();
    assert_eq!(query.evaluate(&empty).unwrap(), "1");
}

#[test]
fn filtering_is_idempotent() {
    let _log = common::test_log("filtering_is_idempotent");
    let records = tracker();
    let query = Query::parse_on("status == \"open\" | order == 2", today()).unwrap();
    let once: Vec<Record> = query
        .select(&records)
        .unwrap()
        .into_iter()
        .cloned()
        .collect();
    let twice = query.select(&once).unwrap();
    assert_eq!(orders(&twice), orders(&once.iter().collect::<Vec<_>>()));
}

#[test]
fn driver_errors() {
    let _log = common::test_log("driver_errors");
    let records = tracker();
    assert_eq!(filter(&records, "   ").unwrap_err(), QueryError::EmptyExpression);
    assert_eq!(
        filter::<Record>(&[], "status == \"open\"").unwrap_err(),
        QueryError::NoRecords
    );
    assert!(matches!(
        filter(&records, "status ! \"open\""),
        Err(QueryError::Tokenize { .. })
    ));
    assert!(matches!(
        filter(&records, "status == == \"open\""),
        Err(QueryError::Syntax { .. })
    ));
}

#[test]
fn malformed_query_aborts_before_any_record_is_evaluated() {
    let _log = common::test_log("malformed_query_aborts_before_any_record_is_evaluated");
    let mut records = tracker();
    for record in &mut records {
        record.set_field("ORDER", "0");
    }
    let err = filter(&records, "6 / order + 1 1").unwrap_err();
    assert!(matches!(
        err,
        QueryError::Syntax {
            source: EvalError::UnexpectedOperand { position: 5 },
            ..
        }
    ));
    assert!(matches!(
        eval_str("1 / 0 + 1 1"),
        Err(QueryError::Syntax { .. })
    ));
    assert!(matches!(
        Query::parse_on("order / 0 )", today()),
        Err(QueryError::Syntax { .. })
    ));
}

#[test]
fn overflow_excludes_only_that_record() {
    let _log = common::test_log("overflow_excludes_only_that_record");
    let mut records = tracker();
    records[1].set_field("ORDER", "9223372036854775807");
    let selected = filter(&records, "order + 1 > 0").unwrap();
    assert_eq!(orders(&selected), ["1", "3"]);

    let query = Query::parse("order + 1").unwrap();
    let err = query.evaluate(&records[1]).unwrap_err();
    assert!(matches!(
        err,
        QueryError::Evaluation {
            source: EvalError::Operation(OperationError::Overflow { .. }),
            ..
        }
    ));
}

#[test]
fn field_values_never_change_structure() {
    let _log = common::test_log("field_values_never_change_structure");
    let mut records = tracker();
    records[0].set_field("ISSUE-DESCR", "1 | 1");
    records[2].set_field("ISSUE-DESCR", "(");
    assert_eq!(select(&records, "message == \"1 | 1\""), ["1"]);
}

#[test]
fn queries_work_on_records_loaded_from_disk() {
    let _log = common::test_log("queries_work_on_records_loaded_from_disk");
    let text = encode_records(&tracker()).unwrap();
    let loaded = decode_records(&text).unwrap();
    assert_eq!(select(&loaded, "order == 3 & \"alice\" == assigned_to"), ["3"]);
}

#[test]
fn query_errors_convert_into_crate_errors() {
    let _log = common::test_log("query_errors_convert_into_crate_errors");
    let err: RotsitError = eval_str("(1").unwrap_err().into();
    assert!(matches!(err, RotsitError::Query(QueryError::Syntax { .. })));
}
