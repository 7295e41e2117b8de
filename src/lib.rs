//! flowdash-rs: query-state and time-window navigation core for
//! traffic-volume dashboards.
//!
//! This crate owns the canonical query of a traffic dashboard page and
//! the pure logic around it: calendar-aware pan/zoom of the rolling
//! time window, URL-token encoding/decoding of the query, and
//! normalization of backend responses into typed chart series. Chart
//! rendering and HTTP transport stay with the host application.

pub mod api;
pub mod codec;
pub mod core;
pub mod error;
pub mod interaction;
pub mod response;
pub mod telemetry;

pub use api::{DashboardSession, ResponseOutcome};
pub use error::{DashError, DashResult};
