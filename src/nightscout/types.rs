//! Nightscout Payload Types
//!
//! Nightscout returns loosely-shaped JSON documents. Entries, treatments and
//! device statuses are kept as raw JSON values, in server key order, and only
//! inspected through optional key access; the profile endpoint gets a tagged
//! result because its top-level shape varies between servers.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single JSON document as returned by the Nightscout API
///
/// Usually an object, but nothing is validated: elements of any shape are
/// passed through untouched.
pub type Record = Value;

/// Field holding the sensor glucose value (mg/dL) on an entry
pub const SGV_FIELD: &str = "sgv";

/// Field holding closed-loop telemetry on a device status
pub const LOOP_FIELD: &str = "loop";

/// Read the sensor glucose value of an entry, if present and numeric
///
/// Non-object entries have no value.
pub fn sgv(entry: &Record) -> Option<f64> {
    entry.get(SGV_FIELD).and_then(Value::as_f64)
}

/// Payload of `/api/v1/profile.json`
///
/// Most servers answer with an array holding the active profile document
/// first, but some return the document itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProfilePayload {
    /// A list of profile documents, newest first
    List(Vec<Record>),
    /// A single profile document, or any other non-array payload
    Single(Record),
}

impl ProfilePayload {
    /// The active profile document, if any
    pub fn active(&self) -> Option<&Record> {
        match self {
            ProfilePayload::Single(record) => Some(record),
            ProfilePayload::List(records) => records.first(),
        }
    }

    /// Number of profile documents in the payload
    pub fn len(&self) -> usize {
        match self {
            ProfilePayload::Single(_) => 1,
            ProfilePayload::List(records) => records.len(),
        }
    }

    /// True when the server returned an empty list
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ProfilePayload {
    fn default() -> Self {
        ProfilePayload::List(Vec::new())
    }
}

/// Closed-loop telemetry extracted from a device status record
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct LoopSnapshot {
    /// Insulin on board (U)
    pub iob: f64,
    /// Carbs on board (g)
    pub cob: f64,
}

impl LoopSnapshot {
    /// Extract the `loop` sub-record of a device status
    ///
    /// Returns `None` when the record carries no `loop` key. Missing
    /// `iob.iob` / `cob.cob` values count as zero.
    pub fn from_device_status(status: &Record) -> Option<Self> {
        let loop_data = status.get(LOOP_FIELD)?;

        Some(Self {
            iob: nested_number(loop_data, "iob"),
            cob: nested_number(loop_data, "cob"),
        })
    }
}

/// Read `value[key][key]` as a number, defaulting to zero
fn nested_number(value: &Value, key: &str) -> f64 {
    value
        .get(key)
        .and_then(|inner| inner.get(key))
        .and_then(Value::as_f64)
        .unwrap_or(0.0)
}
