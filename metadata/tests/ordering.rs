//! Series ordering of parsed studies.

use dicomweb_metadata::{parse_study, parse_study_ordered, SeriesOrder, Study};
use serde_json::{json, Map, Value};

/// A data set of a series with the given attributes,
/// each given as `(tag, vr, value)`.
fn series_json(uid: &str, fields: &[(&str, &str, Value)]) -> Value {
    let mut data = Map::new();
    data.insert("0020000D".into(), json!({ "vr": "UI", "Value": ["study"] }));
    data.insert("0020000E".into(), json!({ "vr": "UI", "Value": [uid] }));
    for (tag, vr, value) in fields {
        data.insert(tag.to_string(), json!({ "vr": vr, "Value": [value] }));
    }
    Value::Object(data)
}

fn uids(study: &Study) -> Vec<&str> {
    study.series().iter().map(|s| s.series_instance_uid()).collect()
}

#[test]
fn invalid_series_numbers_go_last() {
    let input = json!([
        series_json("uid-2", &[("00200011", "IS", json!("2"))]),
        series_json("uid-null", &[("00200011", "IS", Value::Null)]),
        series_json("uid-1", &[("00200011", "IS", json!(1))]),
    ]);
    let study = parse_study_ordered(&input, [SeriesOrder::BySeriesNumber]).unwrap();
    assert_eq!(uids(&study), vec!["uid-1", "uid-2", "uid-null"]);
}

#[test]
fn orders_by_series_date() {
    let input = json!([
        series_json("uid-middle", &[("00080021", "DA", json!("20230201"))]),
        series_json("uid-invalid", &[("00080021", "DA", json!(""))]),
        series_json("uid-early", &[("00080021", "DA", json!("20230101"))]),
    ]);
    let study = parse_study_ordered(&input, [SeriesOrder::BySeriesDate]).unwrap();
    assert_eq!(uids(&study), vec!["uid-early", "uid-middle", "uid-invalid"]);
}

#[test]
fn orders_by_study_date() {
    let input = json!([
        series_json("uid-newer", &[("00080020", "DA", json!("20230115"))]),
        series_json("uid-invalid", &[("00080020", "DA", Value::Null)]),
        series_json("uid-old", &[("00080020", "DA", json!("20221231"))]),
    ]);
    let study = parse_study_ordered(&input, [SeriesOrder::ByEarliestStudyDate]).unwrap();
    assert_eq!(uids(&study), vec!["uid-old", "uid-newer", "uid-invalid"]);
}

#[test]
fn reordering_starts_from_the_current_order() {
    let series = |uid: &str, number: &str, date: Option<&str>| {
        let mut fields = vec![("00200011", "IS", json!(number))];
        if let Some(date) = date {
            fields.push(("00080020", "DA", json!(date)));
        }
        series_json(uid, &fields)
    };
    let input = json!([
        series("uid-A", "5", Some("2023-01-15")),
        series("uid-B", "3", None),
        series("uid-C", "8", Some("2022-12-31")),
        series("uid-D", "2", None),
        series("uid-E", "7", Some("20230115")),
        series("uid-F", "6", None),
        series("uid-G", "1", Some("20221231")),
        series("uid-H", "4", None),
    ]);

    let mut study = parse_study(&input).unwrap();
    assert_eq!(study.current_order(), None);

    study.order_series(SeriesOrder::BySeriesNumber);
    assert_eq!(
        uids(&study),
        vec!["uid-G", "uid-D", "uid-B", "uid-H", "uid-A", "uid-F", "uid-E", "uid-C"]
    );

    study.order_series(SeriesOrder::ByEarliestStudyDate);
    assert_eq!(
        uids(&study),
        vec!["uid-G", "uid-C", "uid-A", "uid-E", "uid-D", "uid-B", "uid-H", "uid-F"]
    );
    assert_eq!(study.current_order(), Some(SeriesOrder::ByEarliestStudyDate));
}

#[test]
fn ordering_modes_are_named() {
    let modes: Vec<SeriesOrder> = ["by-series-number", "by-series-date", "by-earliest-study-date"]
        .iter()
        .map(|name| name.parse().unwrap())
        .collect();
    assert_eq!(
        modes,
        vec![
            SeriesOrder::BySeriesNumber,
            SeriesOrder::BySeriesDate,
            SeriesOrder::ByEarliestStudyDate,
        ]
    );
    assert_eq!(SeriesOrder::Default.to_string(), "default");
}
