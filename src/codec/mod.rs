//! Flat `key=value&…` token codec for the query state.
//!
//! The same token format feeds both the shareable URL query string and
//! the outbound request body. Decoding is a partial merge driven by an
//! explicit key set: unknown keys are ignored and malformed values
//! degrade to field defaults, because tokens originate from
//! user-editable URLs.

use chrono::NaiveDate;
use indexmap::IndexMap;
use smallvec::SmallVec;
use tracing::debug;

use crate::core::calendar::{CivilDate, epoch_from_civil};
use crate::core::query::{Criteria, OutputFormat, QueryState};

/// Encodes the address-bar form of the query: non-default fields only,
/// in a fixed order.
#[must_use]
pub fn encode(state: &QueryState) -> String {
    let mut pairs: IndexMap<&'static str, String> = IndexMap::new();
    if let Some(criteria) = state.criteria {
        pairs.insert("criteria", criteria.as_str().to_owned());
    }
    if state.outfmt != OutputFormat::Json {
        pairs.insert("outfmt", state.outfmt.as_str().to_owned());
    }
    if !state.dataset.is_empty() {
        pairs.insert("dsname", state.dataset.clone());
    }
    if !state.view.is_empty() {
        pairs.insert("view", state.view.clone());
    }
    if !state.filter.is_empty() {
        pairs.insert("filter", state.filter.clone());
    }
    if state.duration != 0 {
        pairs.insert("duration", state.duration.to_string());
    }
    if state.interval != 0 {
        pairs.insert("interval", state.interval.to_string());
    }
    if state.nflows != 0 {
        pairs.insert("nflows", state.nflows.to_string());
    }
    if state.start_time != 0 {
        pairs.insert("startTime", state.start_time.to_string());
    }
    if state.end_time != 0 {
        pairs.insert("endTime", state.end_time.to_string());
    }
    join_pairs(&pairs)
}

/// Encodes the outbound request body in wire order.
///
/// `criteria` and `outfmt` are always present (the backend keys its
/// dispatch on them); the remaining fields appear only when set.
/// Unlike the address-bar form this includes `threshold`.
#[must_use]
pub fn encode_request(state: &QueryState) -> String {
    let mut pairs: IndexMap<&'static str, String> = IndexMap::new();
    pairs.insert(
        "criteria",
        state.criteria.map_or("", Criteria::as_str).to_owned(),
    );
    if !state.dataset.is_empty() {
        pairs.insert("dsname", state.dataset.clone());
    }
    if !state.view.is_empty() {
        pairs.insert("view", state.view.clone());
    }
    if state.interval != 0 {
        pairs.insert("interval", state.interval.to_string());
    }
    if state.threshold != 0 {
        pairs.insert("threshold", state.threshold.to_string());
    }
    if state.nflows != 0 {
        pairs.insert("nflows", state.nflows.to_string());
    }
    if state.duration != 0 {
        pairs.insert("duration", state.duration.to_string());
    }
    if state.start_time != 0 {
        pairs.insert("startTime", state.start_time.to_string());
    }
    if state.end_time != 0 {
        pairs.insert("endTime", state.end_time.to_string());
    }
    if !state.filter.is_empty() {
        pairs.insert("filter", state.filter.clone());
    }
    pairs.insert("outfmt", state.outfmt.as_str().to_owned());
    join_pairs(&pairs)
}

/// Merges `key=value` tokens into `state`.
///
/// Fields not mentioned keep their current values. Integer fields
/// parse with a 0 fallback, enum fields fall back to their defaults,
/// and time fields additionally accept `DATE` / `DATE"T"TIME` tokens
/// interpreted in the display timezone.
pub fn decode<'a, I>(tokens: I, state: &mut QueryState, offset_hours: i32)
where
    I: IntoIterator<Item = &'a str>,
{
    for token in tokens {
        let (key, value) = token.split_once('=').unwrap_or((token, ""));
        match key {
            "criteria" => state.criteria = Criteria::parse(value),
            "dsname" => state.dataset = value.to_owned(),
            "view" => state.view = value.to_owned(),
            "filter" => state.filter = value.to_owned(),
            "interval" => state.interval = parse_int(value),
            "threshold" => state.threshold = parse_int(value),
            "nflows" => state.nflows = parse_int(value),
            "duration" => state.duration = parse_int(value),
            "startTime" => state.start_time = parse_time_token(value, offset_hours),
            "endTime" => state.end_time = parse_time_token(value, offset_hours),
            "outfmt" => state.outfmt = OutputFormat::parse(value).unwrap_or_default(),
            _ => debug!(key, "ignoring unknown query key"),
        }
    }
}

/// Parses a user-entered time token into Unix seconds.
///
/// A bare integer is already UTC seconds. Otherwise the token is
/// `DATE` or `DATE"T"TIME`: the date names civil midnight in the
/// display timezone and the optional time adds `HH:MM:SS` seconds on
/// top. Anything unparsable degrades to 0.
#[must_use]
pub fn parse_time_token(value: &str, offset_hours: i32) -> i64 {
    if value.is_empty() {
        return 0;
    }
    if let Ok(secs) = value.parse::<i64>() {
        return secs;
    }

    let (date_part, time_part) = match value.split_once('T') {
        Some((date, time)) => (date, Some(time)),
        None => (value, None),
    };
    let Some(midnight) = parse_civil_date(date_part)
        .and_then(|date| epoch_from_civil(date, offset_hours))
    else {
        debug!(value, "unparsable time token");
        return 0;
    };
    midnight + time_part.map_or(0, parse_duration)
}

/// Parses `"HH:MM:SS"` into seconds.
///
/// Components are read right-to-left as seconds, minutes, hours, so a
/// lone numeric token lands in the seconds place. Missing or
/// non-numeric components contribute 0.
#[must_use]
pub fn parse_duration(value: &str) -> i64 {
    let parts: SmallVec<[&str; 3]> = value.split(':').collect();
    let mut total = 0;
    let mut scale = 1;
    for part in parts.iter().rev().take(3) {
        total += scale * part.trim().parse::<i64>().unwrap_or(0);
        scale *= 60;
    }
    total
}

fn parse_int(value: &str) -> i64 {
    value.trim().parse().unwrap_or(0)
}

fn parse_civil_date(token: &str) -> Option<CivilDate> {
    let mut parts = token.splitn(3, ['-', '/']);
    let year = parts.next()?.parse().ok()?;
    let month = parts.next()?.parse().ok()?;
    let day = parts.next()?.parse().ok()?;
    // Reject out-of-range calendar components rather than normalizing
    // typos into unrelated dates.
    NaiveDate::from_ymd_opt(year, month, day)?;
    Some(CivilDate { year, month, day })
}

fn join_pairs(pairs: &IndexMap<&'static str, String>) -> String {
    let mut out = String::new();
    for (key, value) in pairs {
        if !out.is_empty() {
            out.push('&');
        }
        out.push_str(key);
        out.push('=');
        out.push_str(value);
    }
    out
}
