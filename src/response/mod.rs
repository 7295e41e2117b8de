//! Normalization of raw backend responses into typed chart series.
//!
//! The backend emits loosely-typed JSON (scalar fields may arrive as
//! numbers or strings). Everything funnels through [`RawResponse`]
//! into an immutable [`ParsedResponse`], from which series are built
//! for an external plotting library. An unparsable scalar becomes
//! `None`; a response without usable flow data yields no series rather
//! than a panic or a mismatched series list.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::query::{Criteria, PageMode};
use crate::error::{DashError, DashResult};

/// Scalar that tolerates number-or-string encodings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawScalar {
    Int(i64),
    Float(f64),
    Text(String),
}

impl RawScalar {
    /// Integer value, truncating fractional encodings; `None` when the
    /// scalar does not parse as a finite number.
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            Self::Float(value) if value.is_finite() => Some(value.trunc() as i64),
            Self::Float(_) => None,
            Self::Text(text) => {
                let text = text.trim();
                text.parse::<i64>().ok().or_else(|| {
                    text.parse::<f64>()
                        .ok()
                        .filter(|value| value.is_finite())
                        .map(|value| value.trunc() as i64)
                })
            }
        }
    }
}

/// Backend JSON response, decoded as-is.
#[derive(Debug, Clone, Deserialize)]
pub struct RawResponse {
    /// Echo of the executed backend command, log-only.
    #[serde(default)]
    pub cmd: Option<String>,
    #[serde(default)]
    pub nflows: Option<RawScalar>,
    #[serde(default)]
    pub interval: Option<RawScalar>,
    #[serde(default)]
    pub duration: Option<RawScalar>,
    #[serde(default)]
    pub start_time: Option<RawScalar>,
    #[serde(default)]
    pub end_time: Option<RawScalar>,
    #[serde(default)]
    pub labels: Vec<String>,
    /// Row layout: `[timestamp, v0, v1, …, v_nflows]`.
    #[serde(default)]
    pub data: Vec<Vec<f64>>,
    #[serde(default)]
    pub criteria: Option<String>,
}

impl RawResponse {
    pub fn from_json_str(input: &str) -> DashResult<Self> {
        serde_json::from_str(input)
            .map_err(|e| DashError::MalformedResponse(format!("failed to parse response json: {e}")))
    }
}

/// Validated response, immutable once built; one per request cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedResponse {
    pub criteria: Option<Criteria>,
    pub interval: Option<i64>,
    pub nflows: Option<i64>,
    pub duration: Option<i64>,
    pub start_time: Option<i64>,
    pub end_time: Option<i64>,
    /// `nflows + 1` labels, the last being the aggregate `"TOTAL"`.
    pub labels: Vec<String>,
    pub rows: Vec<Vec<f64>>,
    pub unit_label: &'static str,
    /// Fixed chart slot, only assigned on the overview page.
    pub chart_id: Option<&'static str>,
}

/// Maps a raw response into a [`ParsedResponse`].
///
/// The response's own criteria wins; the in-flight request's criteria
/// is the fallback when the backend echo is absent. The chart id is
/// only assigned in overview mode, where each criteria owns a fixed
/// chart slot.
#[must_use]
pub fn adapt(
    raw: &RawResponse,
    request_criteria: Option<Criteria>,
    mode: PageMode,
) -> ParsedResponse {
    if let Some(cmd) = &raw.cmd {
        debug!(cmd = %cmd, "backend executed");
    }

    let criteria = raw
        .criteria
        .as_deref()
        .and_then(Criteria::parse)
        .or(request_criteria);
    let (unit_label, chart_id) = match criteria {
        Some(Criteria::Packet) => ("Kpps", (mode == PageMode::Overview).then_some("PPS")),
        Some(Criteria::Byte) => ("Mbps", (mode == PageMode::Overview).then_some("BPS")),
        None => ("", None),
    };

    ParsedResponse {
        criteria,
        interval: raw.interval.as_ref().and_then(RawScalar::as_int),
        nflows: raw.nflows.as_ref().and_then(RawScalar::as_int),
        duration: raw.duration.as_ref().and_then(RawScalar::as_int),
        start_time: raw.start_time.as_ref().and_then(RawScalar::as_int),
        end_time: raw.end_time.as_ref().and_then(RawScalar::as_int),
        labels: raw.labels.clone(),
        rows: raw.data.clone(),
        unit_label,
        chart_id,
    }
}

/// One chart point: display-timezone milliseconds and a per-second
/// rate in the display unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlotPoint {
    pub x: i64,
    pub y: i64,
}

/// One labeled chart series, ready for an external plotting library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlotSeries {
    pub label: String,
    pub points: Vec<PlotPoint>,
}

/// Builds `nflows + 1` series (per-flow plus the `"TOTAL"` aggregate)
/// from a parsed response.
///
/// Returns `None` when the response carries no usable flow data:
/// unparsable or zero `nflows` or `interval`, or no criteria to pick a
/// display unit by. Cumulative bucket counts become per-second rates:
/// packets scale to Kpps (divisor 1000), bytes to Mbps (divisor
/// 1,000,000 / 8).
#[must_use]
pub fn build_series(response: &ParsedResponse, offset_hours: i32) -> Option<Vec<PlotSeries>> {
    let flow_count = match response.nflows {
        Some(n) if n > 0 => usize::try_from(n).ok()?,
        _ => {
            warn!(nflows = ?response.nflows, "no data to plot");
            return None;
        }
    };
    let interval = match response.interval {
        Some(i) if i > 0 => i as f64,
        _ => {
            warn!(interval = ?response.interval, "response has no usable interval");
            return None;
        }
    };
    let unit_divisor = match response.criteria {
        Some(Criteria::Packet) => 1_000.0,
        Some(Criteria::Byte) => 125_000.0,
        None => {
            warn!("response names no criteria, cannot pick a display unit");
            return None;
        }
    };

    let offset_ms = i64::from(offset_hours) * 3_600_000;
    let mut series: Vec<PlotSeries> = (0..=flow_count)
        .map(|flow| PlotSeries {
            label: response.labels.get(flow).cloned().unwrap_or_default(),
            points: Vec::with_capacity(response.rows.len()),
        })
        .collect();

    for row in &response.rows {
        let Some(&stamp) = row.first() else {
            continue;
        };
        let x = (stamp as i64) * 1000 + offset_ms;
        for (flow, slot) in series.iter_mut().enumerate() {
            let rate = row
                .get(flow + 1)
                .map(|value| value / (unit_divisor * interval))
                .filter(|rate| rate.is_finite());
            // A short row contributes a zero-rate point.
            let y = rate.map_or(0, |rate| rate.floor() as i64);
            slot.points.push(PlotPoint { x, y });
        }
    }

    Some(series)
}
