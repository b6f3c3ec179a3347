//! RRD statistics query types.
//!
//! The device exposes its round-robin database (time-series statistics)
//! under `/rrd/`. The payload it returns is an opaque dump the client
//! does not interpret; these types only describe the query side. Note the
//! requested window can be adjusted by the device to fit the best
//! available resolution.

use serde::{Deserialize, Serialize};

/// RRD database selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RrdDatabase {
    /// Network rates and available bandwidth.
    Net,
    /// Temperature sensors and fan speed.
    Temp,
    /// DSL rates and signal/noise ratios.
    Dsl,
    /// Per-port switch rates.
    Switch,
}

impl RrdDatabase {
    /// Get the wire name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Net => "net",
            Self::Temp => "temp",
            Self::Dsl => "dsl",
            Self::Switch => "switch",
        }
    }
}

impl std::fmt::Display for RrdDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Query parameters for an RRD fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RrdQuery {
    /// Database to read.
    pub db: RrdDatabase,
    /// Requested start timestamp.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_start: Option<u64>,
    /// Requested end timestamp.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_end: Option<u64>,
    /// Precision factor applied to all values before they are returned;
    /// e.g. 100 for two-digit precision (divide the results by 100).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precision: Option<u32>,
    /// Restrict the response to these fields.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub fields: Vec<String>,
}

impl RrdQuery {
    /// Query the full contents of a database.
    pub fn new(db: RrdDatabase) -> Self {
        Self {
            db,
            date_start: None,
            date_end: None,
            precision: None,
            fields: Vec::new(),
        }
    }

    /// Restrict the query to a time window.
    pub fn with_window(mut self, date_start: u64, date_end: u64) -> Self {
        self.date_start = Some(date_start);
        self.date_end = Some(date_end);
        self
    }

    /// Request a precision factor for returned values.
    pub fn with_precision(mut self, precision: u32) -> Self {
        self.precision = Some(precision);
        self
    }

    /// Restrict the response to the given fields.
    pub fn with_fields(mut self, fields: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }
}
