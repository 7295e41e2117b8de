use criterion::{Criterion, criterion_group, criterion_main};
use flowdash_rs::codec;
use flowdash_rs::core::query::{LastWindow, PageMode, QueryState};
use flowdash_rs::core::window::step_back;
use flowdash_rs::response::{RawResponse, adapt, build_series};
use std::hint::black_box;

fn bench_calendar_step_back(c: &mut Criterion) {
    let last = LastWindow::new(9);
    let template = QueryState {
        start_time: 1_615_766_400,
        duration: 31 * 86_400,
        ..QueryState::default()
    };

    c.bench_function("calendar_step_back_month", |b| {
        b.iter(|| {
            let mut query = black_box(template.clone());
            step_back(&mut query, black_box(&last));
            query.start_time
        })
    });
}

fn bench_codec_round_trip(c: &mut Criterion) {
    let state = QueryState {
        criteria: Some(flowdash_rs::core::query::Criteria::Byte),
        dataset: "core".to_owned(),
        view: "proto".to_owned(),
        filter: "6".to_owned(),
        duration: 604_800,
        interval: 600,
        nflows: 10,
        start_time: 1_615_680_000,
        end_time: 1_616_284_800,
        ..QueryState::default()
    };

    c.bench_function("codec_encode_decode_round_trip", |b| {
        b.iter(|| {
            let encoded = codec::encode(black_box(&state));
            let mut decoded = QueryState::default();
            codec::decode(encoded.split('&'), &mut decoded, 9);
            decoded
        })
    });
}

fn bench_build_series_10k_rows(c: &mut Criterion) {
    let rows: Vec<String> = (0..10_000)
        .map(|i| {
            let stamp = 1_609_459_200 + i * 300;
            format!("[{stamp}, 150000, 90000, 60000]")
        })
        .collect();
    let payload = format!(
        r#"{{
            "nflows": 2,
            "interval": 300,
            "start_time": 1609459200,
            "end_time": 1612459200,
            "labels": ["a", "b", "TOTAL"],
            "data": [{}],
            "criteria": "packet"
        }}"#,
        rows.join(",")
    );
    let raw = RawResponse::from_json_str(&payload).expect("valid payload");
    let parsed = adapt(&raw, None, PageMode::Overview);

    c.bench_function("build_series_10k_rows", |b| {
        b.iter(|| build_series(black_box(&parsed), black_box(9)))
    });
}

criterion_group!(
    benches,
    bench_calendar_step_back,
    bench_codec_round_trip,
    bench_build_series_10k_rows
);
criterion_main!(benches);
