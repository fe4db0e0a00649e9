//! Users payload loading.
//!
//! Supported inputs:
//! - The `{JSON} Placeholder` users endpoint (or any URL returning a JSON array of objects)
//! - A local JSON array of objects: `[{"name": ...}, {"name": ...}]`
//! - A single JSON object, treated as a one-element list
//! - Newline-delimited JSON (NDJSON), one user object per line

use std::fs;
use std::path::Path;

use reqwest::blocking::Client;
use serde_json::Value;

use crate::error::{PeopleError, PeopleResult};
use crate::observability::{ObserverOptions, PipelineContext, PipelineStage};

/// `{JSON} Placeholder` users listing.
pub const USERS_URL: &str = "https://jsonplaceholder.typicode.com/users";

/// Fetch the raw users payload from `url`.
///
/// Transport failures and non-2xx statuses are returned as [`PeopleError::Http`]; a payload that
/// is not a JSON array is [`PeopleError::InvalidInput`].
pub fn fetch_users(url: &str) -> PeopleResult<Vec<Value>> {
    let client = Client::builder().build()?;
    let payload: Value = client.get(url).send()?.error_for_status()?.json()?;
    match payload {
        Value::Array(items) => Ok(items),
        _ => Err(PeopleError::invalid(format!(
            "users payload from {url} is not a json array"
        ))),
    }
}

/// [`fetch_users`], reporting the outcome to `options.observer`.
pub fn fetch_users_with_options(url: &str, options: &ObserverOptions) -> PeopleResult<Vec<Value>> {
    let result = fetch_users(url);
    let ctx = PipelineContext::new(PipelineStage::FetchUsers, url);
    options.report(&ctx, result.as_ref().map(Vec::len));
    result
}

/// Read a users payload from a local JSON/NDJSON file.
pub fn read_users_from_path(path: impl AsRef<Path>) -> PeopleResult<Vec<Value>> {
    let text = fs::read_to_string(path)?;
    read_users_from_str(&text)
}

/// Parse a users payload from an in-memory string.
pub fn read_users_from_str(input: &str) -> PeopleResult<Vec<Value>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(PeopleError::invalid("users input is empty"));
    }

    // First try parsing as a single JSON value (array or object).
    if let Ok(v) = serde_json::from_str::<Value>(trimmed) {
        return match v {
            Value::Array(items) => Ok(items),
            Value::Object(_) => Ok(vec![v]),
            _ => Err(PeopleError::invalid(
                "users input must be an object, an array of objects, or NDJSON",
            )),
        };
    }

    // Fall back to NDJSON.
    let mut values = Vec::new();
    for (i, line) in trimmed.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let v = serde_json::from_str::<Value>(line).map_err(|e| {
            PeopleError::invalid(format!("invalid ndjson at line {}: {}", i + 1, e))
        })?;
        values.push(v);
    }
    Ok(values)
}
