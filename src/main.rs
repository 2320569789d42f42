//! The `folio` command line.
//!
//! Three subcommands cover the whole pipeline: `serve` runs the conversion
//! service, `convert` snapshots a live resume page and delivers it as a PDF,
//! and `render` writes the parameterized HTML without involving a browser.

use clap::{Parser, Subcommand};
use folio_client::{DeliveryOptions, PdfClient, PdfProgress};
use folio_config::Config;
use folio_params::{ResumeParams, SectionKey};
use folio_resume::{Profile, ResumeRenderer, ThemeVariables};
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;
use tracing_subscriber::EnvFilter;
use url::Url;

#[derive(Parser)]
#[command(name = "folio", version, about = "Resume composition and PDF export toolkit")]
struct Cli {
    /// Configuration file, overriding platform discovery.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTML-to-PDF conversion service.
    Serve {
        /// Listen address, overriding the configured one.
        #[arg(long)]
        listen: Option<String>,
    },
    /// Snapshot a live resume page and save it as a PDF.
    Convert {
        /// URL of the resume page to snapshot.
        source_url: Url,
        /// Directory the PDF is saved into.
        #[arg(long)]
        output: Option<PathBuf>,
        /// Download filename, without extension.
        #[arg(long)]
        filename: Option<String>,
        /// Open the saved PDF with the platform opener.
        #[arg(long)]
        open: bool,
    },
    /// Render the configured profile to parameterized HTML.
    Render {
        /// Section order, comma separated (e.g. `summary,projects`).
        #[arg(long)]
        order: Option<String>,
        /// Sections rendered in their compact variant, comma separated.
        #[arg(long)]
        compact: Option<String>,
        /// CSS theme variable, repeatable (e.g. `--theme accent=#0a6`).
        #[arg(long = "theme", value_name = "KEY=VALUE")]
        theme: Vec<String>,
        /// Write to this file instead of stdout.
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    match cli.command {
        Command::Serve { listen } => {
            if let Some(listen) = listen {
                config.service.listen = listen;
            }
            folio_service::serve(&config).await?;
        }
        Command::Convert { source_url, output, filename, open } => {
            let options = DeliveryOptions { filename, output_dir: output, open_after_save: open };
            let client = PdfClient::new(config.client.clone());
            let path = client
                .download_resume_as_pdf(&source_url, &options, &|milestone: PdfProgress| {
                    println!("{milestone}");
                })
                .await?;
            println!("{}", path.display());
        }
        Command::Render { order, compact, theme, output } => {
            let params = build_params(order.as_deref(), compact.as_deref())?;
            let profile = match &config.service.profile {
                Some(path) => Profile::from_file(path)?,
                None => Profile::sample()?,
            };
            let mut html = ResumeRenderer::new()?.render(&profile, &params)?;
            if !theme.is_empty() {
                html = parse_theme(&theme)?.apply(&html);
            }
            match output {
                Some(path) => std::fs::write(path, html)?,
                None => println!("{html}"),
            }
        }
    }
    Ok(())
}

fn build_params(
    order: Option<&str>,
    compact: Option<&str>,
) -> Result<ResumeParams, Box<dyn std::error::Error>> {
    let mut params = ResumeParams::default();
    if let Some(order) = order {
        params.order = parse_sections(order)?;
    }
    for key in compact.map(parse_sections).transpose()?.unwrap_or_default() {
        params.set_compact(key, true);
    }
    Ok(params)
}

fn parse_sections(list: &str) -> Result<Vec<SectionKey>, Box<dyn std::error::Error>> {
    list.split(',')
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .map(|key| SectionKey::from_str(key).map_err(Into::into))
        .collect()
}

fn parse_theme(pairs: &[String]) -> Result<ThemeVariables, Box<dyn std::error::Error>> {
    pairs
        .iter()
        .map(|pair| match pair.split_once('=') {
            Some((key, value)) => Ok((key.trim(), value.trim())),
            None => Err(format!("theme variable `{pair}` is not KEY=VALUE").into()),
        })
        .collect()
}
