use serde::{Deserialize, Serialize};

/// Counter a query aggregates over: packets per bucket or bytes per bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Criteria {
    Packet,
    Byte,
}

impl Criteria {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Packet => "packet",
            Self::Byte => "byte",
        }
    }

    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "packet" => Some(Self::Packet),
            "byte" => Some(Self::Byte),
            _ => None,
        }
    }
}

/// Requested response encoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Text,
    File,
}

impl OutputFormat {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Text => "text",
            Self::File => "file",
        }
    }

    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "json" => Some(Self::Json),
            "text" => Some(Self::Text),
            "file" => Some(Self::File),
            _ => None,
        }
    }
}

/// Page context a session dispatches from.
///
/// `Spec` is a one-shot parameterized entry into the detail page and
/// demotes itself to `Detail` on its first dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageMode {
    Overview,
    Detail,
    Spec,
}

/// Canonical query for one dashboard page session.
///
/// Zero/empty means "unset, server picks a default". Times are whole
/// Unix seconds, UTC. Navigation keeps `duration` and `end_time` from
/// ever being meaningfully set together: every transition clears
/// `end_time` before deriving a new `(start_time, duration)` pair.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryState {
    pub criteria: Option<Criteria>,
    pub dataset: String,
    pub view: String,
    pub interval: i64,
    pub threshold: i64,
    pub nflows: i64,
    pub duration: i64,
    pub start_time: i64,
    pub end_time: i64,
    pub filter: String,
    pub outfmt: OutputFormat,
}

impl QueryState {
    /// Restores zero/empty defaults after a failed dispatch.
    ///
    /// The output format survives the reset so a pending download
    /// request keeps its encoding.
    pub fn reset(&mut self) {
        let outfmt = self.outfmt;
        *self = Self::default();
        self.outfmt = outfmt;
    }
}

/// Window actually returned by the last server response, plus the
/// display timezone fixed at session start.
///
/// Serves as the fallback anchor when navigation needs a "current"
/// start and the user has not set one explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastWindow {
    pub start_time: i64,
    pub end_time: i64,
    pub offset_hours: i32,
}

impl LastWindow {
    #[must_use]
    pub fn new(offset_hours: i32) -> Self {
        Self {
            start_time: 0,
            end_time: 0,
            offset_hours,
        }
    }

    pub fn record(&mut self, start_time: i64, end_time: i64) {
        self.start_time = start_time;
        self.end_time = end_time;
    }
}
