//! i18n-check - Translation consistency report for the marketing site.
//!
//! Prints a human-readable report to stdout. Exits with 1 only when the
//! translation table cannot be found or read; content gaps are reported
//! but never fail the run.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use i18n_check::{extract_embedded, validate, Checks, Report, TranslationTable};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "i18n-check", about = "Check translation keys against the site HTML")]
struct Args {
    /// Page whose data-i18n attributes and section ids are checked
    #[arg(long, default_value = "index.html")]
    html: PathBuf,

    /// JSON translation table; read from the page's embedded I18N literal when omitted
    #[arg(long)]
    translations: Option<PathBuf>,
}

fn run(args: &Args) -> Result<Report> {
    let html = fs::read_to_string(&args.html)
        .with_context(|| format!("reading {}", args.html.display()))?;

    let table = match &args.translations {
        Some(path) => {
            debug!(path = %path.display(), "loading translation file");
            let json = fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            TranslationTable::from_json_str(&json)?
        }
        None => extract_embedded(&html)?,
    };

    Ok(validate(&html, &table, &Checks::default()))
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(report) => {
            print!("{}", report);
            ExitCode::SUCCESS
        }
        Err(e) => {
            println!("ERROR: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
