//! Outcome reporting for pipeline stages (fetching users, geocoding, exporting).
//!
//! Stages report to an optional [`PipelineObserver`]: `on_success` with record counts,
//! `on_failure` with a severity computed from the error, and `on_alert` when that severity meets
//! the configured threshold.

#[cfg(feature = "excel")]
use std::error::Error as StdError;
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::PeopleError;
use crate::export::ExportFormat;

/// Severity classification used for observer callbacks and alerting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PipelineSeverity {
    /// Informational event.
    Info,
    /// Warning-level event (non-fatal).
    Warning,
    /// Error-level event (stage failed on bad data).
    Error,
    /// Critical error (network or file system failures).
    Critical,
}

/// Which part of the pipeline produced an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    /// Loading the users payload.
    FetchUsers,
    /// Reverse geocoding every record.
    Geocode,
    /// Writing an output file.
    Export(ExportFormat),
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FetchUsers => f.write_str("fetch"),
            Self::Geocode => f.write_str("geocode"),
            Self::Export(format) => write!(f, "export:{format}"),
        }
    }
}

/// Context about a stage run.
#[derive(Debug, Clone)]
pub struct PipelineContext {
    pub stage: PipelineStage,
    /// URL or file path the stage worked against.
    pub target: String,
}

impl PipelineContext {
    pub fn new(stage: PipelineStage, target: impl Into<String>) -> Self {
        Self {
            stage,
            target: target.into(),
        }
    }
}

/// Stats reported on success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineStats {
    /// Number of records loaded, enriched or written.
    pub records: usize,
}

/// Observer interface for stage outcomes.
pub trait PipelineObserver: Send + Sync {
    /// Called when a stage succeeds.
    fn on_success(&self, _ctx: &PipelineContext, _stats: PipelineStats) {}

    /// Called when a stage fails.
    fn on_failure(
        &self,
        _ctx: &PipelineContext,
        _severity: PipelineSeverity,
        _error: &PeopleError,
    ) {
    }

    /// Called when a failure meets the alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_failure`].
    fn on_alert(&self, ctx: &PipelineContext, severity: PipelineSeverity, error: &PeopleError) {
        self.on_failure(ctx, severity, error)
    }
}

/// Observer configuration shared by the fetch and geocode stages.
#[derive(Clone)]
pub struct ObserverOptions {
    pub observer: Option<Arc<dyn PipelineObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: PipelineSeverity,
}

impl fmt::Debug for ObserverOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserverOptions")
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for ObserverOptions {
    fn default() -> Self {
        Self {
            observer: None,
            alert_at_or_above: PipelineSeverity::Critical,
        }
    }
}

impl ObserverOptions {
    pub fn with_observer(observer: Arc<dyn PipelineObserver>) -> Self {
        Self {
            observer: Some(observer),
            ..Default::default()
        }
    }

    pub(crate) fn report(&self, ctx: &PipelineContext, outcome: Result<usize, &PeopleError>) {
        report_outcome(self.observer.as_deref(), self.alert_at_or_above, ctx, outcome);
    }
}

pub(crate) fn report_outcome(
    observer: Option<&dyn PipelineObserver>,
    alert_at_or_above: PipelineSeverity,
    ctx: &PipelineContext,
    outcome: Result<usize, &PeopleError>,
) {
    let Some(obs) = observer else {
        return;
    };
    match outcome {
        Ok(records) => obs.on_success(ctx, PipelineStats { records }),
        Err(e) => {
            let sev = severity_for_error(e);
            obs.on_failure(ctx, sev, e);
            if sev >= alert_at_or_above {
                obs.on_alert(ctx, sev, e);
            }
        }
    }
}

/// Severity of a failed stage: infrastructure failures are `Critical`, bad data is `Error`.
pub fn severity_for_error(e: &PeopleError) -> PipelineSeverity {
    match e {
        PeopleError::Io(_) | PeopleError::Http(_) => PipelineSeverity::Critical,
        #[cfg(feature = "excel")]
        PeopleError::Xlsx(err) => {
            // The writer wraps file system failures; surface those as Critical.
            if error_chain_contains_io(err) {
                PipelineSeverity::Critical
            } else {
                PipelineSeverity::Error
            }
        }
        PeopleError::Json(_)
        | PeopleError::KeyNotFound { .. }
        | PeopleError::InvalidInput { .. } => PipelineSeverity::Error,
    }
}

#[cfg(feature = "excel")]
fn error_chain_contains_io(e: &(dyn StdError + 'static)) -> bool {
    let mut cur: Option<&(dyn StdError + 'static)> = Some(e);
    while let Some(err) = cur {
        if err.is::<std::io::Error>() {
            return true;
        }
        cur = err.source();
    }
    false
}

/// Forwards every callback to each wrapped observer, in insertion order.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn PipelineObserver>>,
}

impl CompositeObserver {
    pub fn new(observers: Vec<Arc<dyn PipelineObserver>>) -> Self {
        Self { observers }
    }

    /// Append `observer` when present; `None` leaves the composite unchanged.
    pub fn with(mut self, observer: Option<Arc<dyn PipelineObserver>>) -> Self {
        self.observers.extend(observer);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    /// Collapse into a single observer: `None` when empty, the sole member when there is one.
    pub fn into_observer(mut self) -> Option<Arc<dyn PipelineObserver>> {
        match self.observers.len() {
            0 => None,
            1 => self.observers.pop(),
            _ => Some(Arc::new(self)),
        }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl PipelineObserver for CompositeObserver {
    fn on_success(&self, ctx: &PipelineContext, stats: PipelineStats) {
        self.observers.iter().for_each(|o| o.on_success(ctx, stats));
    }

    fn on_failure(&self, ctx: &PipelineContext, severity: PipelineSeverity, error: &PeopleError) {
        self.observers.iter().for_each(|o| o.on_failure(ctx, severity, error));
    }

    fn on_alert(&self, ctx: &PipelineContext, severity: PipelineSeverity, error: &PeopleError) {
        self.observers.iter().for_each(|o| o.on_alert(ctx, severity, error));
    }
}

/// One observer callback, rendered identically by the built-in sinks.
#[derive(Debug, Clone, Copy)]
enum Event<'a> {
    Ok(PipelineStats),
    Failed(PipelineSeverity, &'a PeopleError),
    Alert(PipelineSeverity, &'a PeopleError),
}

impl Event<'_> {
    fn line(&self, ctx: &PipelineContext) -> String {
        let PipelineContext { stage, target } = ctx;
        match self {
            Event::Ok(stats) => {
                format!("ok stage={stage} target={target} records={}", stats.records)
            }
            Event::Failed(severity, err) => {
                format!("fail severity={severity:?} stage={stage} target={target} err={err}")
            }
            Event::Alert(severity, err) => {
                format!("ALERT severity={severity:?} stage={stage} target={target} err={err}")
            }
        }
    }
}

/// Writes stage events to stderr, one line each.
#[derive(Debug, Default)]
pub struct StdErrObserver;

impl StdErrObserver {
    fn emit(&self, ctx: &PipelineContext, event: Event<'_>) {
        eprintln!("placeholder-people: {}", event.line(ctx));
    }
}

impl PipelineObserver for StdErrObserver {
    fn on_success(&self, ctx: &PipelineContext, stats: PipelineStats) {
        self.emit(ctx, Event::Ok(stats));
    }

    fn on_failure(&self, ctx: &PipelineContext, severity: PipelineSeverity, error: &PeopleError) {
        self.emit(ctx, Event::Failed(severity, error));
    }

    fn on_alert(&self, ctx: &PipelineContext, severity: PipelineSeverity, error: &PeopleError) {
        self.emit(ctx, Event::Alert(severity, error));
    }
}

/// Appends timestamped stage events to a log file.
///
/// The file is opened on the first event and kept open afterwards. Logging never fails a stage:
/// if the file cannot be opened or written, the event is dropped.
#[derive(Debug)]
pub struct FileObserver {
    path: PathBuf,
    file: Mutex<Option<File>>,
}

impl FileObserver {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            file: Mutex::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn emit(&self, ctx: &PipelineContext, event: Event<'_>) {
        let Ok(mut slot) = self.file.lock() else {
            return;
        };
        if slot.is_none() {
            *slot = OpenOptions::new().create(true).append(true).open(&self.path).ok();
        }
        if let Some(file) = slot.as_mut() {
            let secs = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or_default();
            let _ = writeln!(file, "{secs} {}", event.line(ctx));
        }
    }
}

impl PipelineObserver for FileObserver {
    fn on_success(&self, ctx: &PipelineContext, stats: PipelineStats) {
        self.emit(ctx, Event::Ok(stats));
    }

    fn on_failure(&self, ctx: &PipelineContext, severity: PipelineSeverity, error: &PeopleError) {
        self.emit(ctx, Event::Failed(severity, error));
    }

    fn on_alert(&self, ctx: &PipelineContext, severity: PipelineSeverity, error: &PeopleError) {
        self.emit(ctx, Event::Alert(severity, error));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severities_are_ordered() {
        assert!(PipelineSeverity::Info < PipelineSeverity::Warning);
        assert!(PipelineSeverity::Error < PipelineSeverity::Critical);
    }

    #[test]
    fn io_is_critical_and_bad_data_is_error() {
        let io = PeopleError::Io(std::io::Error::other("disk full"));
        assert_eq!(severity_for_error(&io), PipelineSeverity::Critical);

        let missing = PeopleError::KeyNotFound {
            path: "a.b".to_string(),
            segment: "b".to_string(),
        };
        assert_eq!(severity_for_error(&missing), PipelineSeverity::Error);
        assert_eq!(
            severity_for_error(&PeopleError::InvalidInput { message: "x".to_string() }),
            PipelineSeverity::Error
        );
    }

    #[test]
    fn stage_display() {
        assert_eq!(PipelineStage::FetchUsers.to_string(), "fetch");
        assert_eq!(PipelineStage::Export(ExportFormat::Json).to_string(), "export:json");
    }

    #[test]
    fn file_observer_appends_lines() {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let path = std::env::temp_dir().join(format!("placeholder-people-events-{nanos}.log"));
        let obs = FileObserver::new(&path);
        let ctx = PipelineContext::new(PipelineStage::Geocode, "https://example.invalid");

        obs.on_success(&ctx, PipelineStats { records: 3 });
        obs.on_alert(
            &ctx,
            PipelineSeverity::Critical,
            &PeopleError::Io(std::io::Error::other("boom")),
        );

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("ok stage=geocode target=https://example.invalid records=3"));
        assert!(lines[1].contains("ALERT severity=Critical stage=geocode"));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn composite_collapses_to_its_members() {
        assert!(CompositeObserver::default().into_observer().is_none());

        let single = CompositeObserver::default()
            .with(Some(Arc::new(StdErrObserver)))
            .with(None);
        assert!(!single.is_empty());
        assert!(single.into_observer().is_some());
    }

    #[test]
    fn failure_lines_carry_severity_and_error() {
        let ctx = PipelineContext::new(PipelineStage::FetchUsers, "users.json");
        let err = PeopleError::InvalidInput { message: "not an array".to_string() };
        assert_eq!(
            Event::Failed(PipelineSeverity::Error, &err).line(&ctx),
            "fail severity=Error stage=fetch target=users.json err=invalid input: not an array"
        );
    }
}
