use flowdash_rs::core::query::{Criteria, PageMode};
use flowdash_rs::response::{RawResponse, adapt, build_series};

const PACKET_RESPONSE: &str = r#"{
    "cmd": "dump -n 2",
    "nflows": 2,
    "interval": 300,
    "duration": 86400,
    "start_time": 1609459200,
    "end_time": 1609545600,
    "labels": ["[6]:80 10.0.0.1", "[17]:53 10.0.0.2", "TOTAL"],
    "data": [
        [1609459200, 150000, 90000, 60000],
        [1609459500, 900000, 300000, 600000]
    ],
    "criteria": "packet"
}"#;

fn packet_response() -> RawResponse {
    RawResponse::from_json_str(PACKET_RESPONSE).expect("valid payload")
}

#[test]
fn adapt_parses_scalar_fields() {
    let parsed = adapt(&packet_response(), None, PageMode::Overview);
    assert_eq!(parsed.nflows, Some(2));
    assert_eq!(parsed.interval, Some(300));
    assert_eq!(parsed.duration, Some(86_400));
    assert_eq!(parsed.start_time, Some(1_609_459_200));
    assert_eq!(parsed.end_time, Some(1_609_545_600));
    assert_eq!(parsed.criteria, Some(Criteria::Packet));
}

#[test]
fn adapt_assigns_chart_slot_only_on_overview() {
    let parsed = adapt(&packet_response(), None, PageMode::Overview);
    assert_eq!(parsed.chart_id, Some("PPS"));
    assert_eq!(parsed.unit_label, "Kpps");

    let parsed = adapt(&packet_response(), None, PageMode::Detail);
    assert_eq!(parsed.chart_id, None);
    assert_eq!(parsed.unit_label, "Kpps");
}

#[test]
fn adapt_falls_back_to_request_criteria() {
    let raw = RawResponse::from_json_str(r#"{"nflows": 1}"#).expect("valid payload");
    let parsed = adapt(&raw, Some(Criteria::Byte), PageMode::Overview);
    assert_eq!(parsed.criteria, Some(Criteria::Byte));
    assert_eq!(parsed.chart_id, Some("BPS"));
    assert_eq!(parsed.unit_label, "Mbps");
}

#[test]
fn adapt_tolerates_string_encoded_scalars() {
    let raw = RawResponse::from_json_str(
        r#"{"nflows": "2", "interval": "300", "start_time": "1609459200"}"#,
    )
    .expect("valid payload");
    let parsed = adapt(&raw, None, PageMode::Detail);
    assert_eq!(parsed.nflows, Some(2));
    assert_eq!(parsed.interval, Some(300));
    assert_eq!(parsed.start_time, Some(1_609_459_200));
}

#[test]
fn adapt_marks_unparsable_scalars_as_none() {
    let raw =
        RawResponse::from_json_str(r#"{"nflows": "n/a", "interval": 300}"#).expect("valid payload");
    let parsed = adapt(&raw, None, PageMode::Detail);
    assert_eq!(parsed.nflows, None);
}

#[test]
fn malformed_payload_is_an_error() {
    assert!(RawResponse::from_json_str("{nflows").is_err());
    assert!(RawResponse::from_json_str(r#"{"labels": 3}"#).is_err());
}

#[test]
fn build_series_produces_one_series_per_flow_plus_total() {
    let parsed = adapt(&packet_response(), None, PageMode::Overview);
    let series = build_series(&parsed, 0).expect("has data");

    assert_eq!(series.len(), 3);
    assert_eq!(series[0].label, "[6]:80 10.0.0.1");
    assert_eq!(series[2].label, "TOTAL");
    assert_eq!(series[0].points.len(), 2);

    // 150000 packets over a 300 s bucket is 0.5 Kpps, floored to 0.
    assert_eq!(series[0].points[0].x, 1_609_459_200_000);
    assert_eq!(series[0].points[0].y, 0);
    // 900000 packets over 300 s is 3 Kpps.
    assert_eq!(series[0].points[1].x, 1_609_459_500_000);
    assert_eq!(series[0].points[1].y, 3);
    // TOTAL column reads the last value of each row.
    assert_eq!(series[2].points[1].y, 2);
}

#[test]
fn build_series_shifts_x_into_display_timezone() {
    let parsed = adapt(&packet_response(), None, PageMode::Overview);
    let series = build_series(&parsed, 9).expect("has data");
    assert_eq!(series[0].points[0].x, 1_609_459_200_000 + 32_400_000);
}

#[test]
fn byte_series_scale_to_megabits_per_second() {
    let raw = RawResponse::from_json_str(
        r#"{
            "nflows": 1,
            "interval": 60,
            "labels": ["10.0.0.1", "TOTAL"],
            "data": [[1609459200, 60000000, 30000000]],
            "criteria": "byte"
        }"#,
    )
    .expect("valid payload");
    let parsed = adapt(&raw, None, PageMode::Detail);
    let series = build_series(&parsed, 0).expect("has data");

    // 60 MB over 60 s is 8 Mbps.
    assert_eq!(series[0].points[0].y, 8);
    assert_eq!(series[1].points[0].y, 4);
}

#[test]
fn zero_or_unparsable_nflows_yields_no_series() {
    let raw = RawResponse::from_json_str(r#"{"nflows": 0, "interval": 300, "criteria": "packet"}"#)
        .expect("valid payload");
    assert!(build_series(&adapt(&raw, None, PageMode::Detail), 0).is_none());

    let raw = RawResponse::from_json_str(r#"{"nflows": "?", "interval": 300, "criteria": "packet"}"#)
        .expect("valid payload");
    assert!(build_series(&adapt(&raw, None, PageMode::Detail), 0).is_none());

    let raw = RawResponse::from_json_str(r#"{"interval": 300, "criteria": "packet"}"#)
        .expect("valid payload");
    assert!(build_series(&adapt(&raw, None, PageMode::Detail), 0).is_none());
}

#[test]
fn missing_interval_or_criteria_yields_no_series() {
    let raw = RawResponse::from_json_str(r#"{"nflows": 1, "criteria": "packet"}"#)
        .expect("valid payload");
    assert!(build_series(&adapt(&raw, None, PageMode::Detail), 0).is_none());

    let raw = RawResponse::from_json_str(r#"{"nflows": 1, "interval": 300}"#)
        .expect("valid payload");
    assert!(build_series(&adapt(&raw, None, PageMode::Detail), 0).is_none());
}

#[test]
fn short_rows_contribute_zero_rate_points() {
    let raw = RawResponse::from_json_str(
        r#"{
            "nflows": 2,
            "interval": 300,
            "labels": ["a", "b", "TOTAL"],
            "data": [[1609459200, 900000]],
            "criteria": "packet"
        }"#,
    )
    .expect("valid payload");
    let series = build_series(&adapt(&raw, None, PageMode::Detail), 0).expect("has data");

    assert_eq!(series.len(), 3);
    assert_eq!(series[0].points[0].y, 3);
    assert_eq!(series[1].points[0].y, 0);
    assert_eq!(series[2].points[0].y, 0);
}

#[test]
fn missing_labels_default_to_empty() {
    let raw = RawResponse::from_json_str(
        r#"{
            "nflows": 1,
            "interval": 300,
            "labels": ["only"],
            "data": [[1609459200, 300000, 300000]],
            "criteria": "packet"
        }"#,
    )
    .expect("valid payload");
    let series = build_series(&adapt(&raw, None, PageMode::Detail), 0).expect("has data");
    assert_eq!(series[0].label, "only");
    assert_eq!(series[1].label, "");
}
