//! `placeholder-people` fetches users from the `{JSON} Placeholder` API
//! (<https://jsonplaceholder.typicode.com/users>), enriches every record with a reverse-geocoded
//! location and timezone, derives a synthetic company email, and exports the result.
//!
//! ## Pipeline
//!
//! 1. Load: [`People::from_url`] (or [`People::from_json_path`] for a local copy) builds one
//!    [`Person`] per user. Construction derives `company.email` from `name` and `company.name`.
//! 2. Enrich: [`People::update_location`] calls a geocoding function with each person's
//!    `address.geo.lat`/`address.geo.lng` and merges `location`/`timezone` into the record.
//!    [`source::ReverseGeocoder`] is the Geoapify-backed implementation.
//! 3. Project: [`People::filter`] restricts records to a list of (possibly dotted) field paths.
//! 4. Export: console ([`export::console`]), JSON ([`export::json`]) or `.xlsx`
//!    ([`export::xlsx`], Cargo feature `excel`), usually through [`export::export_to_path`].
//!
//! ## Example
//!
//! ```rust
//! use placeholder_people::{GeoLocation, People};
//!
//! let mut people = People::from_json_str(r#"[{
//!     "name": "Mr. John Smith.",
//!     "company": {"name": "Acme LLC"},
//!     "address": {"geo": {"lat": "1.0", "lng": "2.0"}}
//! }]"#).unwrap();
//!
//! people.update_location(|_lat, _lon| Ok(GeoLocation::new("Nowhere", "UTC"))).unwrap();
//!
//! let projection = people.filter(&["company.email", "location", "timezone"]).unwrap();
//! assert_eq!(projection[0]["company.email"], "john.smith@acme.com");
//! assert_eq!(projection[0]["timezone"], "UTC");
//! ```
//!
//! ## Failure model
//!
//! - Missing fields requested through a dotted path fail with [`PeopleError::KeyNotFound`].
//! - Malformed or partial geocoding responses degrade to empty `location`/`timezone` strings.
//! - Transport failures and non-2xx statuses fail with [`PeopleError::Http`] and abort enrichment.
//!
//! ## Modules
//!
//! - [`record`]: [`Person`], [`People`], dotted-path lookup and projections
//! - [`source`]: users endpoint and reverse geocoding clients
//! - [`export`]: console/JSON/spreadsheet writers and the unified [`export::export_to_path`]
//! - [`observability`]: observer hooks for stage outcomes
//! - [`error`]: the crate error type

pub mod error;
pub mod export;
pub mod observability;
pub mod record;
pub mod source;

pub use error::{PeopleError, PeopleResult};
pub use record::{People, Person, ProjectedRecord, Projection};
pub use source::GeoLocation;

/// Fields shown and exported when no explicit filter is given.
pub const DEFAULT_FIELDS: [&str; 7] = [
    "name",
    "username",
    "location",
    "timezone",
    "address.geo.lat",
    "address.geo.lng",
    "company.email",
];
