//! Reverse geocoding through the Geoapify API.
//!
//! The response is expected to look like `{"features": [{"properties": {...}}]}`. Only the first
//! feature is used:
//!
//! - `location` is `properties.formatted`, falling back to `properties.name`
//! - `timezone` is `properties.timezone.name`
//!
//! Missing pieces leave the corresponding field empty. Transport failures and non-2xx statuses
//! are returned as [`crate::error::PeopleError::Http`].

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::PeopleResult;
use crate::record::value_text;

/// Geoapify reverse geocoding endpoint.
pub const GEOAPIFY_REVERSE_URL: &str = "https://api.geoapify.com/v1/geocode/reverse";

/// Location name and timezone for a coordinate pair. Both default to empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeoLocation {
    pub location: String,
    pub timezone: String,
}

impl GeoLocation {
    pub fn new(location: impl Into<String>, timezone: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            timezone: timezone.into(),
        }
    }
}

impl From<GeoLocation> for Map<String, Value> {
    fn from(g: GeoLocation) -> Self {
        let mut map = Map::with_capacity(2);
        map.insert("location".to_string(), Value::String(g.location));
        map.insert("timezone".to_string(), Value::String(g.timezone));
        map
    }
}

/// Blocking reverse geocoding client.
#[derive(Debug, Clone)]
pub struct ReverseGeocoder {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl ReverseGeocoder {
    /// Create a client for the Geoapify endpoint.
    pub fn new(api_key: impl Into<String>) -> PeopleResult<Self> {
        Ok(Self {
            client: Client::builder().build()?,
            endpoint: GEOAPIFY_REVERSE_URL.to_string(),
            api_key: api_key.into(),
        })
    }

    /// Use a different endpoint (same query parameters and response shape).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Look up location name and timezone for `lat`/`lon`.
    pub fn reverse_geocode(&self, lat: &str, lon: &str) -> PeopleResult<GeoLocation> {
        let body: Value = self
            .client
            .get(&self.endpoint)
            .query(&[("lat", lat), ("lon", lon), ("apiKey", self.api_key.as_str())])
            .send()?
            .error_for_status()?
            .json()?;
        Ok(parse_reverse_geocode(&body))
    }
}

/// One-shot lookup against the Geoapify endpoint.
pub fn reverse_geocode(lat: &str, lon: &str, api_key: &str) -> PeopleResult<GeoLocation> {
    ReverseGeocoder::new(api_key)?.reverse_geocode(lat, lon)
}

/// Extract location and timezone from a reverse geocoding response body.
///
/// Never fails: absent or `null` fields stay empty.
pub fn parse_reverse_geocode(body: &Value) -> GeoLocation {
    let Some(properties) = body
        .get("features")
        .and_then(|features| features.get(0))
        .and_then(|feature| feature.get("properties"))
    else {
        return GeoLocation::default();
    };

    let present = |v: &&Value| !v.is_null();
    let location = properties
        .get("formatted")
        .filter(present)
        .or_else(|| properties.get("name").filter(present))
        .map(value_text)
        .unwrap_or_default();
    let timezone = properties
        .get("timezone")
        .and_then(|tz| tz.get("name"))
        .filter(present)
        .map(value_text)
        .unwrap_or_default();

    GeoLocation { location, timezone }
}
