//! Record model: a single [`Person`] and the ordered [`People`] collection.
//!
//! Records are kept as raw JSON objects (`serde_json::Map`) rather than typed structs so that any
//! field of the source payload can be addressed with a dotted path (see [`path::lookup`]).

pub mod path;
pub mod people;
pub mod person;

pub use people::{People, ProjectedRecord, Projection};
pub use person::{Person, derive_company_email};

use serde_json::Value;

/// Render a JSON value as plain text: strings verbatim, everything else as compact JSON.
pub(crate) fn value_text(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
