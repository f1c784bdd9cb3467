//! Command-line surface of `page-loader`.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use log::LevelFilter;
use page_loader_engine::{LoaderConfig, PageLoader};

use crate::logging::LogDestination;

#[derive(Debug, Parser)]
#[command(name = "page-loader", version)]
#[command(about = "Download a web page and its same-origin assets", long_about = None)]
pub struct Cli {
    /// Absolute URL of the page to download.
    pub url: String,

    /// Directory to save into; defaults to the current directory.
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Raise log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Also write logs to ./page-loader.log.
    #[arg(long)]
    pub log_file: bool,

    /// Per-request timeout in seconds.
    #[arg(long, value_name = "SECS", default_value_t = 30)]
    pub timeout: u64,
}

impl Cli {
    pub fn log_level(&self) -> LevelFilter {
        loader_logging::level_for_verbosity(self.verbose)
    }

    pub fn log_destination(&self) -> LogDestination {
        if self.log_file {
            LogDestination::Both
        } else {
            LogDestination::Terminal
        }
    }

    pub fn config(&self) -> Result<LoaderConfig> {
        let output_dir = match &self.output {
            Some(dir) => dir.clone(),
            None => std::env::current_dir().context("cannot resolve current directory")?,
        };
        let mut config = LoaderConfig::default_with_output(output_dir);
        config.fetch.request_timeout = Duration::from_secs(self.timeout);
        Ok(config)
    }

    /// Fatal errors are returned; resource failures are listed on stderr only.
    pub async fn run(&self) -> Result<()> {
        let loader = PageLoader::new(self.config()?)?;
        let summary = loader
            .load(&self.url)
            .await
            .with_context(|| format!("failed to load {}", self.url))?;

        println!("{}", summary.html_path.display());
        let report = &summary.report;
        if !report.is_complete() {
            for (url, err) in report.failures() {
                eprintln!("  {url}: {err}");
            }
            eprintln!(
                "{} of {} resources could not be downloaded",
                report.failed(),
                report.outcomes.len()
            );
        }
        Ok(())
    }
}
