//! Unified export entrypoint.
//!
//! - If [`ExportOptions::format`] is `None`, the format is inferred from the file extension.
//! - If a [`PipelineObserver`] is provided, success/failure/alerts are reported to it.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::error::{PeopleError, PeopleResult};
use crate::observability::{
    PipelineContext, PipelineObserver, PipelineSeverity, PipelineStage, report_outcome,
};
use crate::record::ProjectedRecord;

use super::json;

/// Supported file export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Indented JSON array of objects.
    Json,
    /// Excel workbook (feature-gated behind `excel`).
    Excel,
}

impl ExportFormat {
    /// Parse an export format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "xlsx" | "xls" => Some(Self::Excel),
            _ => None,
        }
    }

    /// Infer the format from `path`'s extension.
    pub fn from_path(path: &Path) -> PeopleResult<Self> {
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .ok_or_else(|| {
                PeopleError::invalid(format!(
                    "cannot infer export format: path has no extension ({})",
                    path.display()
                ))
            })?;

        Self::from_extension(ext).ok_or_else(|| {
            PeopleError::invalid(format!(
                "cannot infer export format from extension '{ext}' for path ({})",
                path.display()
            ))
        })
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => f.write_str("json"),
            Self::Excel => f.write_str("xlsx"),
        }
    }
}

/// Options controlling [`export_to_path`].
///
/// Use [`Default`] for common cases.
#[derive(Clone)]
pub struct ExportOptions {
    /// If `None`, infer the format from the file extension.
    pub format: Option<ExportFormat>,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn PipelineObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: PipelineSeverity,
}

impl fmt::Debug for ExportOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExportOptions")
            .field("format", &self.format)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            format: None,
            observer: None,
            alert_at_or_above: PipelineSeverity::Critical,
        }
    }
}

/// Write `projection` to `path` in the chosen or inferred format.
///
/// When an observer is configured, this function reports:
///
/// - `on_success` on success, with the number of records written
/// - `on_failure` on failure, with a computed severity
/// - `on_alert` on failure when the computed severity is >= `options.alert_at_or_above`
///
/// A path whose format cannot be inferred fails before any observer callback, since there is no
/// stage to attribute it to.
///
/// ```no_run
/// use placeholder_people::export::{export_to_path, ExportOptions};
/// use placeholder_people::People;
///
/// # fn main() -> Result<(), placeholder_people::PeopleError> {
/// let people = People::from_json_path("users.json")?;
/// let projection = people.filter(&["name", "company.email"])?;
/// // `.xlsx` selects the spreadsheet exporter.
/// export_to_path(&projection, "people.xlsx", &ExportOptions::default())?;
/// # Ok(())
/// # }
/// ```
pub fn export_to_path(
    projection: &[ProjectedRecord],
    path: impl AsRef<Path>,
    options: &ExportOptions,
) -> PeopleResult<()> {
    let path = path.as_ref();
    let format = match options.format {
        Some(f) => f,
        None => ExportFormat::from_path(path)?,
    };

    let result = match format {
        ExportFormat::Json => json::write_json_to_path(path, projection),
        ExportFormat::Excel => export_excel_dispatch(path, projection),
    };

    let ctx = PipelineContext::new(PipelineStage::Export(format), path.display().to_string());
    report_outcome(
        options.observer.as_deref(),
        options.alert_at_or_above,
        &ctx,
        result.as_ref().map(|_| projection.len()),
    );

    result
}

fn export_excel_dispatch(path: &Path, projection: &[ProjectedRecord]) -> PeopleResult<()> {
    #[cfg(feature = "excel")]
    {
        super::xlsx::write_xlsx_to_path(path, projection)
    }

    #[cfg(not(feature = "excel"))]
    {
        let _ = (path, projection);
        Err(PeopleError::invalid(
            "excel export not enabled (enable cargo feature 'excel')",
        ))
    }
}
