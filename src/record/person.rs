//! A single user record with derived fields.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::error::{PeopleError, PeopleResult};
use crate::source::geocode::GeoLocation;

use super::path::{lookup, lookup_mut};
use super::value_text;

/// Name tokens matching this pattern are courtesy titles (`Mr.`, `Mrs.`, `MR.`) and are left out
/// of the derived email.
static COURTESY_TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^mr.*\.$").expect("courtesy title pattern is valid"));

/// Company name tokens (compared lower-cased) left out of the derived email domain.
const COMPANY_STOP_WORDS: [&str; 2] = ["llc", "and"];

/// Derive the synthetic company email for a person.
///
/// - local part: name tokens without courtesy titles, lower-cased, trailing periods trimmed,
///   joined with `.`
/// - domain: company name tokens without `llc`/`and`, lower-cased, joined with `-`, plus `.com`
///
/// ```
/// use placeholder_people::record::derive_company_email;
///
/// assert_eq!(derive_company_email("Mrs. Dennis Schulist", "Considine-Lockman"),
///            "dennis.schulist@considine-lockman.com");
/// assert_eq!(derive_company_email("Clementine Bauch", "Yost and Sons"),
///            "clementine.bauch@yost-sons.com");
/// ```
pub fn derive_company_email(name: &str, company: &str) -> String {
    let local = name
        .split_whitespace()
        .filter(|token| !COURTESY_TITLE.is_match(token))
        .map(|token| token.trim_end_matches('.').to_lowercase())
        .filter(|token| !token.is_empty())
        .collect::<Vec<_>>()
        .join(".");

    let domain = company
        .split_whitespace()
        .map(str::to_lowercase)
        .filter(|token| !COMPANY_STOP_WORDS.contains(&token.as_str()))
        .collect::<Vec<_>>()
        .join("-");

    format!("{local}@{domain}.com")
}

/// One user record from the placeholder API, plus derived fields.
///
/// Construction always writes `company.email`; [`Person::acquire_location`] adds `location` and
/// `timezone`.
#[derive(Debug, Clone, PartialEq)]
pub struct Person {
    data: Map<String, Value>,
}

impl Person {
    pub const NAME: &'static str = "name";
    pub const COMPANY: &'static str = "company";
    pub const COMPANY_NAME: &'static str = "company.name";
    pub const COMPANY_EMAIL: &'static str = "company.email";
    pub const LATITUDE: &'static str = "address.geo.lat";
    pub const LONGITUDE: &'static str = "address.geo.lng";

    /// Wrap a raw JSON record. The record must be an object with string `name` and
    /// `company.name` fields.
    pub fn new(data: Value) -> PeopleResult<Self> {
        match data {
            Value::Object(map) => Self::from_map(map),
            other => Err(PeopleError::invalid(format!(
                "person record must be a json object, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// Wrap a raw JSON object and derive `company.email`, overwriting any existing value.
    pub fn from_map(mut data: Map<String, Value>) -> PeopleResult<Self> {
        let email = {
            let name = text_field(&data, Self::NAME)?;
            let company = text_field(&data, Self::COMPANY_NAME)?;
            derive_company_email(name, company)
        };

        // `company.name` resolved above, so `company` is an object.
        let company = lookup_mut(Self::COMPANY, &mut data)?
            .as_object_mut()
            .ok_or_else(|| PeopleError::invalid("field 'company' must be a json object"))?;
        company.insert("email".to_string(), Value::String(email));

        Ok(Self { data })
    }

    /// Get a field by key or dotted path.
    pub fn get(&self, path: &str) -> PeopleResult<&Value> {
        if !path.contains('.') {
            return self.data.get(path).ok_or_else(|| PeopleError::KeyNotFound {
                path: path.to_string(),
                segment: path.to_string(),
            });
        }
        lookup(path, &self.data)
    }

    /// Top-level field names, in source order.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.data.keys().map(String::as_str)
    }

    /// Merge top-level `fields` into the record, overwriting existing keys.
    pub fn update(&mut self, fields: Map<String, Value>) -> &mut Self {
        for (key, value) in fields {
            self.data.insert(key, value);
        }
        self
    }

    /// Latitude (`address.geo.lat`) as text.
    pub fn latitude(&self) -> PeopleResult<String> {
        self.get(Self::LATITUDE).map(value_text)
    }

    /// Longitude (`address.geo.lng`) as text.
    pub fn longitude(&self) -> PeopleResult<String> {
        self.get(Self::LONGITUDE).map(value_text)
    }

    /// The derived `company.email`.
    pub fn email(&self) -> PeopleResult<&str> {
        text_field(&self.data, Self::COMPANY_EMAIL)
    }

    /// Resolve this person's coordinates with `geocode` and merge `location`/`timezone` into the
    /// record.
    pub fn acquire_location<F>(&mut self, mut geocode: F) -> PeopleResult<&mut Self>
    where
        F: FnMut(&str, &str) -> PeopleResult<GeoLocation>,
    {
        let lat = self.latitude()?;
        let lon = self.longitude()?;
        let location = geocode(&lat, &lon)?;
        Ok(self.update(location.into()))
    }

    /// The full record.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.data
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.data
    }
}

fn text_field<'a>(data: &'a Map<String, Value>, path: &str) -> PeopleResult<&'a str> {
    lookup(path, data)?
        .as_str()
        .ok_or_else(|| PeopleError::invalid(format!("field '{path}' must be a string")))
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
