//! The ordered collection of [`Person`] records and its projections.

use std::io;
use std::path::Path;

use serde_json::{Map, Value};

use crate::error::PeopleResult;
use crate::export::console::write_console;
use crate::observability::{ObserverOptions, PipelineContext, PipelineStage};
use crate::source::geocode::GeoLocation;
use crate::source::users;

use super::person::Person;

/// One projected record: requested field name → value.
pub type ProjectedRecord = Map<String, Value>;

/// A field-restricted view of a [`People`] collection, in collection order.
pub type Projection = Vec<ProjectedRecord>;

/// Ordered list of people, in source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct People {
    people: Vec<Person>,
}

impl People {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a collection from raw JSON records, one [`Person`] per entry.
    pub fn from_values(items: impl IntoIterator<Item = Value>) -> PeopleResult<Self> {
        let mut people = Self::new();
        people.load_json(items)?;
        Ok(people)
    }

    /// Replace the collection with `items`, preserving their order.
    ///
    /// On error the collection is left unchanged.
    pub fn load_json(&mut self, items: impl IntoIterator<Item = Value>) -> PeopleResult<()> {
        self.people = items
            .into_iter()
            .map(Person::new)
            .collect::<PeopleResult<Vec<_>>>()?;
        Ok(())
    }

    /// Fetch users from `url` and build a collection in one step.
    pub fn from_url(url: &str) -> PeopleResult<Self> {
        Self::from_values(users::fetch_users(url)?)
    }

    /// Load users from a local JSON/NDJSON file.
    pub fn from_json_path(path: impl AsRef<Path>) -> PeopleResult<Self> {
        Self::from_values(users::read_users_from_path(path)?)
    }

    /// Load users from an in-memory JSON/NDJSON string.
    pub fn from_json_str(input: &str) -> PeopleResult<Self> {
        Self::from_values(users::read_users_from_str(input)?)
    }

    pub fn len(&self) -> usize {
        self.people.len()
    }

    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Person> {
        self.people.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Person> {
        self.people.iter()
    }

    /// Enrich every person, in order, with the location/timezone returned by `geocode` for their
    /// own coordinates.
    ///
    /// Stops at the first error; people before it keep their enrichment.
    pub fn update_location<F>(&mut self, mut geocode: F) -> PeopleResult<()>
    where
        F: FnMut(&str, &str) -> PeopleResult<GeoLocation>,
    {
        for person in &mut self.people {
            person.acquire_location(&mut geocode)?;
        }
        Ok(())
    }

    /// [`Self::update_location`], reporting the outcome to `options.observer` against `target`
    /// (usually the geocoding endpoint).
    pub fn update_location_with_options<F>(
        &mut self,
        target: &str,
        options: &ObserverOptions,
        geocode: F,
    ) -> PeopleResult<()>
    where
        F: FnMut(&str, &str) -> PeopleResult<GeoLocation>,
    {
        let result = self.update_location(geocode);
        let ctx = PipelineContext::new(PipelineStage::Geocode, target);
        options.report(&ctx, result.as_ref().map(|_| self.people.len()));
        result
    }

    /// Project every person onto `fields`.
    ///
    /// - No fields: each person's full record (top-level keys, nested values untouched).
    /// - Otherwise: `{field: person.get(field)}` for each requested field, in the requested order.
    ///   Dotted fields resolve through nested objects and keep their dotted name as the key.
    ///
    /// Fails with [`crate::PeopleError::KeyNotFound`] if any person lacks a requested field.
    pub fn filter<S: AsRef<str>>(&self, fields: &[S]) -> PeopleResult<Projection> {
        if fields.is_empty() {
            return Ok(self.people.iter().map(|p| p.as_map().clone()).collect());
        }

        self.people
            .iter()
            .map(|person| {
                fields
                    .iter()
                    .map(|field| {
                        let field = field.as_ref();
                        Ok((field.to_string(), person.get(field)?.clone()))
                    })
                    .collect::<PeopleResult<ProjectedRecord>>()
            })
            .collect()
    }

    /// Print the projection onto `fields` to stdout as indented JSON.
    pub fn print<S: AsRef<str>>(&self, fields: &[S]) -> PeopleResult<()> {
        let projection = self.filter(fields)?;
        write_console(&mut io::stdout().lock(), &projection)
    }
}

impl<'a> IntoIterator for &'a People {
    type Item = &'a Person;
    type IntoIter = std::slice::Iter<'a, Person>;

    fn into_iter(self) -> Self::IntoIter {
        self.people.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PeopleError;
    use serde_json::json;

    fn sample() -> People {
        People::from_values(vec![
            json!({
                "name": "Leanne Graham",
                "username": "Bret",
                "address": {"geo": {"lat": "-37.3159", "lng": "81.1496"}},
                "company": {"name": "Romaguera-Crona"}
            }),
            json!({
                "name": "Ervin Howell",
                "username": "Antonette",
                "address": {"geo": {"lat": "-43.9509", "lng": "-34.4618"}},
                "company": {"name": "Deckow-Crist"}
            }),
        ])
        .unwrap()
    }

    #[test]
    fn load_preserves_order() {
        let people = sample();
        assert_eq!(people.len(), 2);
        assert_eq!(people.get(0).unwrap().get("username").unwrap(), "Bret");
        assert_eq!(people.get(1).unwrap().get("username").unwrap(), "Antonette");
    }

    #[test]
    fn failed_load_keeps_previous_records() {
        let mut people = sample();
        let err = people.load_json(vec![json!({"name": "No Company"})]).unwrap_err();
        assert!(matches!(err, PeopleError::KeyNotFound { .. }));
        assert_eq!(people.len(), 2);
    }

    #[test]
    fn update_location_uses_each_persons_coordinates() {
        let mut people = sample();
        people
            .update_location(|lat, lon| Ok(GeoLocation::new(format!("{lat}/{lon}"), "UTC")))
            .unwrap();

        assert_eq!(people.get(0).unwrap().get("location").unwrap(), "-37.3159/81.1496");
        assert_eq!(people.get(1).unwrap().get("location").unwrap(), "-43.9509/-34.4618");
    }

    #[test]
    fn update_location_stops_at_first_error() {
        let mut people = sample();
        let mut calls = 0;
        let err = people
            .update_location(|_, _| {
                calls += 1;
                if calls == 1 {
                    Ok(GeoLocation::new("First", "UTC"))
                } else {
                    Err(PeopleError::Io(std::io::Error::other("connection reset")))
                }
            })
            .unwrap_err();

        assert!(matches!(err, PeopleError::Io(_)));
        assert_eq!(people.get(0).unwrap().get("location").unwrap(), "First");
        assert!(people.get(1).unwrap().get("location").is_err());
    }

    #[test]
    fn filter_without_fields_returns_full_records() {
        let people = sample();
        let projection = people.filter::<&str>(&[]).unwrap();
        assert_eq!(projection.len(), 2);
        assert_eq!(&projection[0], people.get(0).unwrap().as_map());
        let keys: Vec<&str> = projection[1].keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["name", "username", "address", "company"]);
    }

    #[test]
    fn filter_returns_exactly_the_requested_fields_in_order() {
        let people = sample();
        let projection = people.filter(&["company.email", "username", "address.geo.lat"]).unwrap();

        assert_eq!(
            Value::Object(projection[0].clone()),
            json!({
                "company.email": "leanne.graham@romaguera-crona.com",
                "username": "Bret",
                "address.geo.lat": "-37.3159"
            })
        );
        let keys: Vec<&str> = projection[1].keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["company.email", "username", "address.geo.lat"]);
    }

    #[test]
    fn filter_fails_on_missing_field() {
        let people = sample();
        let err = people.filter(&["name", "location"]).unwrap_err();
        assert!(matches!(err, PeopleError::KeyNotFound { ref path, .. } if path == "location"));
    }
}
