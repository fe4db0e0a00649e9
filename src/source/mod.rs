//! Remote data sources: the placeholder users API and the reverse geocoding API.
//!
//! - [`users`]: fetch (or read from disk) the raw users payload
//! - [`geocode`]: coordinate → location name/timezone lookups

pub mod geocode;
pub mod users;

pub use geocode::{
    GEOAPIFY_REVERSE_URL, GeoLocation, ReverseGeocoder, parse_reverse_geocode, reverse_geocode,
};
pub use users::{
    USERS_URL, fetch_users, fetch_users_with_options, read_users_from_path, read_users_from_str,
};
