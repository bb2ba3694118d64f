use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

use torrent_list_csv::config::{is_text_file, read_error_message, OutputTarget, RunConfig};
use torrent_list_csv::enrich::enrich;
use torrent_list_csv::error_log::{IncompleteLog, DEFAULT_ERROR_LOG};
use torrent_list_csv::imdb::ImdbClient;
use torrent_list_csv::lookup::{DelayRange, Resolver, ThreadSleep};
use torrent_list_csv::models::LinkStyle;
use torrent_list_csv::normalize::normalize_list;
use torrent_list_csv::output::{copy_to_clipboard, delivery_message, to_csv, HOLDS_SELECTION};
use torrent_list_csv::progress::{format_duration, ConsoleProgress};

#[derive(Parser)]
#[command(name = "torrent-list-csv")]
#[command(about = "Parse a list of p2p movie release names into CSV with IMDb links")]
struct Args {
    /// Text file with one release name per line (.txt)
    #[arg(value_parser = parse_text_file)]
    text_file: PathBuf,

    /// Appending: omit the CSV header row
    #[arg(short, long)]
    append: bool,

    /// Hyperlink style for the IMDB column; "excel" fixes links when importing the CSV
    #[arg(short = 'l', long, value_enum, default_value_t = LinkStyle::Bare)]
    link_style: LinkStyle,

    /// File that collects titles no search strategy could resolve
    #[arg(long, default_value = DEFAULT_ERROR_LOG)]
    error_log: PathBuf,

    /// Minimum courtesy delay before each search, in seconds
    #[arg(long, default_value_t = DelayRange::DEFAULT_MIN_SECS)]
    min_delay: f64,

    /// Maximum courtesy delay before each search, in seconds
    #[arg(long, default_value_t = DelayRange::DEFAULT_MAX_SECS)]
    max_delay: f64,

    /// Print the CSV to stdout instead of the clipboard
    #[arg(long)]
    stdout: bool,

    /// Plain progress lines instead of a progress bar
    #[arg(long)]
    log_only: bool,
}

fn parse_text_file(s: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(s);
    if is_text_file(&path) {
        Ok(path)
    } else {
        Err(format!("Cannot parse filename '{}': expected a .txt file", s))
    }
}

impl Args {
    fn into_config(self) -> RunConfig {
        let Some(delay) = DelayRange::from_secs(self.min_delay, self.max_delay) else {
            Args::command()
                .error(
                    ErrorKind::ValueValidation,
                    format!(
                        "invalid delay range {}..{}: bounds must be non-negative and min <= max",
                        self.min_delay, self.max_delay
                    ),
                )
                .exit();
        };

        RunConfig {
            text_file: self.text_file,
            include_header: !self.append,
            link_style: self.link_style,
            error_log: self.error_log,
            delay,
            output: if self.stdout {
                OutputTarget::Stdout
            } else {
                OutputTarget::Clipboard
            },
            log_only: self.log_only,
        }
    }
}

fn run(config: &RunConfig, text: &str) -> Result<()> {
    let start = Instant::now();

    let records = normalize_list(text);
    eprintln!("Parsed {} releases from {:?}", records.len(), config.text_file);

    let client = ImdbClient::new().context("Failed to build IMDb HTTP client")?;
    let mut resolver = Resolver::new(
        client,
        rand::thread_rng(),
        ThreadSleep,
        config.delay,
        IncompleteLog::new(&config.error_log),
    );
    let mut progress = ConsoleProgress::new(records.len(), config.log_only);

    let (enriched, state) = enrich(records, &mut resolver, config.link_style, &mut progress);
    progress.finish();

    let csv = to_csv(&enriched, config.include_header)?;
    let unresolved = enriched.len() - state.processed;

    match config.output {
        OutputTarget::Clipboard => {
            // The Linux clipboard write blocks, so report before it
            copy_to_clipboard(&csv, || {
                print_summary(config, state.processed, state.total, unresolved, start);
                println!("\n{}", delivery_message(HOLDS_SELECTION));
            })?;
        }
        OutputTarget::Stdout => {
            print!("{}", csv);
            print_summary(config, state.processed, state.total, unresolved, start);
        }
    }

    Ok(())
}

fn print_summary(config: &RunConfig, processed: usize, total: usize, unresolved: usize, start: Instant) {
    eprintln!(
        "Resolved {}/{} links in {}",
        processed,
        total,
        format_duration(start.elapsed())
    );
    if unresolved > 0 {
        eprintln!(
            "{} titles without a link were appended to {:?}",
            unresolved, config.error_log
        );
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Args::parse().into_config();

    let text = match std::fs::read_to_string(&config.text_file) {
        Ok(text) => text,
        Err(e) => {
            tracing::debug!(error = %e, "failed to read input list");
            Args::command()
                .error(ErrorKind::Io, read_error_message(&config.text_file, &e))
                .exit();
        }
    };

    run(&config, &text)
}
