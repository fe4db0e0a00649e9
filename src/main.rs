use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use placeholder_people::export::console::to_pretty_json;
use placeholder_people::export::{ExportFormat, ExportOptions, export_to_path};
use placeholder_people::observability::{
    CompositeObserver, FileObserver, ObserverOptions, PipelineObserver, PipelineSeverity,
    StdErrObserver,
};
use placeholder_people::source::{
    GEOAPIFY_REVERSE_URL, ReverseGeocoder, USERS_URL, fetch_users_with_options,
    read_users_from_path,
};
use placeholder_people::{DEFAULT_FIELDS, GeoLocation, People};

/// Built-in Geoapify key, used when neither `--geoapify-api-key` nor `GEOAPIFY_API_KEY` is set.
const DEFAULT_GEOAPIFY_KEY: &str = "4c0d2f6d926a4989b11ec3f03d98f641";
const DEFAULT_JSON_FILE: &str = "people.json";
const DEFAULT_XLSX_FILE: &str = "people.xlsx";

#[derive(Parser, Debug)]
#[command(
    name = "placeholder-people",
    version,
    about = "Sample {JSON} Placeholder user API exerciser"
)]
struct Cli {
    #[arg(
        long,
        env = "GEOAPIFY_API_KEY",
        default_value = DEFAULT_GEOAPIFY_KEY,
        hide_default_value = true,
        hide_env_values = true,
        help = "Geoapify API key"
    )]
    geoapify_api_key: String,
    #[arg(long, default_value = GEOAPIFY_REVERSE_URL, help = "Reverse geocoding endpoint")]
    geoapify_url: String,
    #[arg(
        long,
        value_name = "FILE",
        num_args = 0..=1,
        default_missing_value = DEFAULT_JSON_FILE,
        help = "Write full (unfiltered) records as JSON [bare flag: people.json]"
    )]
    json: Option<PathBuf>,
    #[arg(
        long,
        value_name = "FILE",
        num_args = 0..=1,
        default_missing_value = DEFAULT_XLSX_FILE,
        help = "Write filtered records as an Excel workbook [bare flag: people.xlsx]"
    )]
    xls: Option<PathBuf>,
    #[arg(long, value_delimiter = ',', help = "Data filters (comma-separated field paths)")]
    data_filter: Vec<String>,
    #[arg(short, long, default_value_t = false, help = "No verbose output")]
    silent: bool,
    #[arg(long, default_value = USERS_URL, help = "Users endpoint")]
    users_url: String,
    #[arg(
        long,
        value_name = "FILE",
        conflicts_with = "users_url",
        help = "Read users from a local JSON file"
    )]
    input: Option<PathBuf>,
    #[arg(
        long,
        default_value_t = false,
        help = "Skip reverse geocoding (location/timezone stay empty)"
    )]
    offline: bool,
    #[arg(long, default_value_t = false, help = "Print the unmodified users payload and exit")]
    raw: bool,
    #[arg(short, long, default_value_t = false, help = "Log stage outcomes to stderr")]
    verbose: bool,
    #[arg(long, value_name = "FILE", help = "Append stage outcomes to a log file")]
    log_file: Option<PathBuf>,
}

impl Cli {
    /// Requested field paths; blank entries are ignored and an empty list means the defaults.
    fn fields(&self) -> Vec<String> {
        let requested: Vec<String> = self
            .data_filter
            .iter()
            .map(|f| f.trim())
            .filter(|f| !f.is_empty())
            .map(str::to_string)
            .collect();
        if requested.is_empty() {
            DEFAULT_FIELDS.iter().map(|f| f.to_string()).collect()
        } else {
            requested
        }
    }

    fn observer(&self) -> Option<Arc<dyn PipelineObserver>> {
        let stderr = self
            .verbose
            .then(|| Arc::new(StdErrObserver) as Arc<dyn PipelineObserver>);
        let file = self
            .log_file
            .as_ref()
            .map(|path| Arc::new(FileObserver::new(path)) as Arc<dyn PipelineObserver>);
        CompositeObserver::default()
            .with(stderr)
            .with(file)
            .into_observer()
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let observer = cli.observer();
    let observed = ObserverOptions {
        observer: observer.clone(),
        alert_at_or_above: PipelineSeverity::Critical,
    };

    let users = match &cli.input {
        Some(path) => read_users_from_path(path)
            .with_context(|| format!("failed to read users from {}", path.display()))?,
        None => fetch_users_with_options(&cli.users_url, &observed)
            .with_context(|| format!("failed to fetch users from {}", cli.users_url))?,
    };

    if cli.raw {
        println!("{}", to_pretty_json(&users)?);
        return Ok(());
    }

    let mut people = People::from_values(users)?;

    if cli.offline {
        people.update_location(|_, _| Ok(GeoLocation::default()))?;
    } else {
        let geocoder = ReverseGeocoder::new(cli.geoapify_api_key.as_str())?
            .with_endpoint(cli.geoapify_url.as_str());
        people
            .update_location_with_options(geocoder.endpoint(), &observed, |lat, lon| {
                geocoder.reverse_geocode(lat, lon)
            })
            .context("reverse geocoding failed")?;
    }

    let fields = cli.fields();
    if !cli.silent {
        people.print(&fields)?;
    }

    if let Some(path) = &cli.json {
        let options = ExportOptions {
            format: Some(ExportFormat::Json),
            observer: observer.clone(),
            ..Default::default()
        };
        export_to_path(&people.filter::<&str>(&[])?, path, &options)
            .with_context(|| format!("failed to write {}", path.display()))?;
    }

    if let Some(path) = &cli.xls {
        let options = ExportOptions {
            format: Some(ExportFormat::Excel),
            observer,
            ..Default::default()
        };
        export_to_path(&people.filter(&fields)?, path, &options)
            .with_context(|| format!("failed to write {}", path.display()))?;
    }

    Ok(())
}
