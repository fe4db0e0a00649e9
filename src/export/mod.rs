//! Exporters for [`crate::record::Projection`]s.
//!
//! Most callers should use [`export_to_path`] (from [`unified`]) which:
//!
//! - picks the output format from [`ExportOptions::format`] or the file extension
//! - writes the whole file in one go (overwriting an existing one)
//! - optionally reports success/failure/alerts to a [`crate::observability::PipelineObserver`]
//!
//! Format-specific functions are also available under:
//! - [`console`] (indented JSON text to any writer)
//! - [`json`]
//! - [`xlsx`] (requires the Cargo feature `excel`, on by default)

pub mod console;
pub mod json;
pub mod unified;
#[cfg(feature = "excel")]
pub mod xlsx;

pub use unified::{ExportFormat, ExportOptions, export_to_path};
