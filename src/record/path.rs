//! Dotted-path lookup into nested JSON objects.
//!
//! A path such as `address.geo.lat` names a sequence of keys; each key is looked up in the object
//! produced by the previous one.

use serde_json::{Map, Value};

use crate::error::{PeopleError, PeopleResult};

/// Resolve `path` against `root`, returning the leaf value.
///
/// Fails with [`PeopleError::KeyNotFound`] when any segment is absent, or when an intermediate
/// value is not an object.
///
/// ```
/// use placeholder_people::record::path::lookup;
///
/// let data = serde_json::json!({"address": {"geo": {"lat": "-37.3159"}}});
/// let root = data.as_object().unwrap();
/// assert_eq!(lookup("address.geo.lat", root).unwrap(), "-37.3159");
/// assert!(lookup("address.city", root).is_err());
/// ```
pub fn lookup<'a>(path: &str, root: &'a Map<String, Value>) -> PeopleResult<&'a Value> {
    let mut segments = path.split('.');
    // `split` always yields at least one item.
    let first = segments.next().unwrap_or(path);
    let mut current = root.get(first).ok_or_else(|| key_not_found(path, first))?;

    for segment in segments {
        current = match current {
            Value::Object(map) => map.get(segment),
            _ => None,
        }
        .ok_or_else(|| key_not_found(path, segment))?;
    }
    Ok(current)
}

/// Mutable variant of [`lookup`], used to rewrite derived fields in place.
pub(crate) fn lookup_mut<'a>(
    path: &str,
    root: &'a mut Map<String, Value>,
) -> PeopleResult<&'a mut Value> {
    let mut segments = path.split('.');
    let first = segments.next().unwrap_or(path);
    let mut current = root.get_mut(first).ok_or_else(|| key_not_found(path, first))?;

    for segment in segments {
        current = match current {
            Value::Object(map) => map.get_mut(segment),
            _ => None,
        }
        .ok_or_else(|| key_not_found(path, segment))?;
    }
    Ok(current)
}

fn key_not_found(path: &str, segment: &str) -> PeopleError {
    PeopleError::KeyNotFound {
        path: path.to_string(),
        segment: segment.to_string(),
    }
}
