//! Event-driven session facade tying the pure parts together.
//!
//! A [`DashboardSession`] owns the canonical [`QueryState`] and the
//! last response window for one page. All mutation happens
//! synchronously inside its methods: user actions mutate the query and
//! yield the request bodies to dispatch, response arrival updates the
//! window anchor and produces renderer-ready series. Transport and
//! rendering stay with the host.
//!
//! There is no request cancellation. A stale in-flight response still
//! overwrites the window anchor on arrival, so a fast second
//! navigation can visibly snap back once the first response lands.

use serde::Serialize;

use tracing::{debug, warn};

use crate::codec;
use crate::core::query::{Criteria, LastWindow, OutputFormat, PageMode, QueryState};
use crate::core::{timefmt, window};
use crate::error::{DashError, DashResult};
use crate::interaction;
use crate::response::{self, PlotSeries, RawResponse};

/// Decoded response, ready for hand-off to an external renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseOutcome {
    /// Fixed chart slot on the overview page, `None` elsewhere.
    pub chart_id: Option<&'static str>,
    pub unit_label: &'static str,
    /// Human time-range header; present when the response window parsed.
    pub range_label: Option<String>,
    /// `None` when the response carried no usable flow data.
    pub series: Option<Vec<PlotSeries>>,
}

/// One dashboard page's query session.
#[derive(Debug, Clone)]
pub struct DashboardSession {
    query: QueryState,
    last: LastWindow,
    mode: PageMode,
}

impl DashboardSession {
    /// Session for the overview page: no URL parameters, two charts.
    pub fn overview(offset_hours: i32) -> DashResult<Self> {
        Self::new(PageMode::Overview, offset_hours, &[])
    }

    /// Session for the detail page, seeded from URL query tokens.
    pub fn detail(offset_hours: i32, params: &[&str]) -> DashResult<Self> {
        Self::new(PageMode::Detail, offset_hours, params)
    }

    /// Session for the spec page: a parameterized one-shot entry that
    /// demotes itself to detail after its first dispatch.
    pub fn spec(offset_hours: i32, params: &[&str]) -> DashResult<Self> {
        Self::new(PageMode::Spec, offset_hours, params)
    }

    fn new(mode: PageMode, offset_hours: i32, params: &[&str]) -> DashResult<Self> {
        if !(-23..=23).contains(&offset_hours) {
            return Err(DashError::InvalidOffset {
                hours: offset_hours,
            });
        }
        let mut query = QueryState::default();
        codec::decode(params.iter().copied(), &mut query, offset_hours);
        Ok(Self {
            query,
            last: LastWindow::new(offset_hours),
            mode,
        })
    }

    #[must_use]
    pub fn query(&self) -> &QueryState {
        &self.query
    }

    #[must_use]
    pub fn mode(&self) -> PageMode {
        self.mode
    }

    #[must_use]
    pub fn last_window(&self) -> &LastWindow {
        &self.last
    }

    /// Request bodies for the next dispatch.
    ///
    /// The overview page fans out one request per criteria (packet and
    /// byte); detail and spec pages issue a single request with the
    /// current criteria. The criteria of each request is stamped into
    /// the query before encoding, and a spec session demotes to detail
    /// here.
    pub fn take_requests(&mut self) -> Vec<String> {
        let criteria_list: Vec<Option<Criteria>> = match self.mode {
            PageMode::Overview => vec![Some(Criteria::Packet), Some(Criteria::Byte)],
            PageMode::Detail | PageMode::Spec => vec![self.query.criteria],
        };
        if self.mode == PageMode::Spec {
            self.mode = PageMode::Detail;
        }
        criteria_list
            .into_iter()
            .map(|criteria| {
                self.query.criteria = criteria;
                codec::encode_request(&self.query)
            })
            .collect()
    }

    /// Address-bar reflection of the query; only the detail page keeps
    /// its URL in sync with navigation.
    #[must_use]
    pub fn url_query(&self) -> Option<String> {
        (self.mode == PageMode::Detail).then(|| codec::encode(&self.query))
    }

    pub fn back(&mut self) {
        window::step_back(&mut self.query, &self.last);
    }

    pub fn forward(&mut self) {
        window::step_forward(&mut self.query, &self.last);
    }

    pub fn zoom_in(&mut self) {
        window::zoom_in(&mut self.query);
    }

    /// Zooms out one ladder rung; `now` is the current wall clock in
    /// Unix seconds, used to avoid requesting a future window.
    pub fn zoom_out(&mut self, now: i64) {
        window::zoom_out(&mut self.query, now);
    }

    /// Applies a plot-selection rectangle (display-timezone
    /// milliseconds) as the new query window. Only the detail page
    /// offers selection.
    pub fn select_range(&mut self, from_ms: i64, to_ms: i64) {
        if self.mode != PageMode::Detail {
            return;
        }
        interaction::apply_selection_zoom(&mut self.query, from_ms, to_ms, self.last.offset_hours);
    }

    /// Ingests a JSON response body for the given in-flight criteria.
    ///
    /// Updates the last-window anchor when the response window parsed,
    /// then builds renderer-ready series. A response without usable
    /// flow data is a valid outcome with `series: None`, not an error.
    pub fn apply_response(
        &mut self,
        payload: &str,
        request_criteria: Option<Criteria>,
    ) -> DashResult<ResponseOutcome> {
        let raw = RawResponse::from_json_str(payload)?;
        let parsed = response::adapt(&raw, request_criteria, self.mode);

        let range_label = match (parsed.start_time, parsed.end_time) {
            (Some(start), Some(end)) => {
                self.last.record(start, end);
                Some(timefmt::range_label(
                    start,
                    end,
                    parsed.interval.unwrap_or(0),
                    self.last.offset_hours,
                ))
            }
            _ => {
                debug!("response window did not parse, keeping previous anchor");
                None
            }
        };

        let series = response::build_series(&parsed, self.last.offset_hours);
        Ok(ResponseOutcome {
            chart_id: parsed.chart_id,
            unit_label: parsed.unit_label,
            range_label,
            series,
        })
    }

    /// Transport failure: log and fall back to a clean query rather
    /// than retrying, so the next request cannot inherit a
    /// half-specified window.
    pub fn on_transport_failure(&mut self) {
        warn!("query dispatch failed, resetting query state");
        self.query.reset();
    }

    pub fn select_dataset(&mut self, name: &str) {
        self.query.dataset = name.to_owned();
    }

    #[must_use]
    pub fn dataset(&self) -> &str {
        &self.query.dataset
    }

    pub fn select_view(&mut self, view: &str) {
        self.query.view = view.to_owned();
    }

    #[must_use]
    pub fn view(&self) -> &str {
        &self.query.view
    }

    /// Drill-down on a clicked legend flow: derives the flow filter
    /// for the current view.
    pub fn filter_flow(&mut self, label: &str) {
        self.query.filter = interaction::filter_for_flow(&self.query.view, label);
    }

    /// Switches the session to file output for the next dispatch.
    pub fn request_download(&mut self) {
        self.query.outfmt = OutputFormat::File;
    }

    /// Name for the downloaded export of the current query window.
    #[must_use]
    pub fn download_filename(&self) -> String {
        timefmt::download_filename(
            self.query.start_time,
            self.query.end_time,
            self.last.offset_hours,
        )
    }
}
