//! `chadabaz` — command-line client for a chadabaz server.
//!
//! # Usage
//!
//! ```text
//! chadabaz --url http://localhost:8080 list
//! chadabaz search karim --party "Party A"
//! chadabaz --user admin --password secret reports --status pending
//! chadabaz --config ~/.config/chadabaz/config.toml approve <report-id>
//! ```

mod client;
mod render;

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use chadabaz_core::report::ReportStatus;
use clap::{Parser, Subcommand};
use client::{ApiClient, ApiConfig, ReportForm};
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "chadabaz", about = "Command-line client for the chadabaz report server")]
struct Args {
  /// Path to a TOML config file (url, username, password).
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Base URL of the chadabaz server (default: http://localhost:8080).
  #[arg(long, env = "CHADABAZ_URL")]
  url: Option<String>,

  /// Admin username.
  #[arg(long, env = "CHADABAZ_USER")]
  user: Option<String>,

  /// Admin password (plaintext).
  #[arg(long, env = "CHADABAZ_PASSWORD")]
  password: Option<String>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Subjects with approved reports, most reported first.
  List,
  /// Filter the public listing by name or area.
  Search {
    query: String,
    /// Exact party name; `all` disables the filter.
    #[arg(long)]
    party: Option<String>,
  },
  /// A subject and its approved reports.
  Profile { id: Uuid },
  /// Every known party.
  Parties,
  /// Approved reports and members per party.
  Stats,
  /// File a new report.
  Submit {
    #[arg(long)]
    name:        String,
    #[arg(long)]
    area:        String,
    #[arg(long)]
    party:       String,
    #[arg(long)]
    body:        String,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    submitter:   Option<String>,
    /// Evidence files, uploaded in the order given.
    #[arg(long = "media", value_name = "FILE")]
    media:       Vec<PathBuf>,
  },
  /// Reports awaiting or past moderation (admin).
  Reports {
    #[arg(long)]
    status: Option<ReportStatus>,
  },
  /// Report counts per status (admin).
  Summary,
  /// Approve a report (admin).
  Approve { id: Uuid },
  /// Reject a report (admin).
  Reject { id: Uuid },
  /// Permanently delete a report (admin).
  Delete { id: Uuid },
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url:      String,
  #[serde(default)]
  username: String,
  #[serde(default)]
  password: String,
}

fn pick(flag: Option<String>, file: &str) -> Option<String> {
  flag.or_else(|| (!file.is_empty()).then(|| file.to_owned()))
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .init();

  let args = Args::parse();

  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  // CLI flags override config file, which overrides defaults.
  let api_config = ApiConfig {
    base_url: pick(args.url, &file_cfg.url)
      .unwrap_or_else(|| "http://localhost:8080".to_string()),
    username: pick(args.user, &file_cfg.username).unwrap_or_default(),
    password: pick(args.password, &file_cfg.password).unwrap_or_default(),
  };
  tracing::debug!(base_url = %api_config.base_url, "using server");

  let client = ApiClient::new(api_config)?;
  let output = run(&client, args.command).await?;
  print!("{output}");
  Ok(())
}

async fn run(client: &ApiClient, command: Command) -> Result<String> {
  let text = match command {
    Command::List => render::subjects(&client.list_subjects().await?),
    Command::Search { query, party } => {
      render::subjects(&client.search_subjects(&query, party.as_deref()).await?)
    }
    Command::Profile { id } => render::profile(&client.subject_profile(id).await?),
    Command::Parties => render::parties(&client.list_parties().await?),
    Command::Stats => render::statistics(&client.party_statistics().await?),
    Command::Submit { name, area, party, body, description, submitter, media } => {
      let form = ReportForm { name, area, party, body, description, submitter, media };
      finished(client.submit_report(form).await?)?
    }
    Command::Reports { status } => render::reports(&client.list_reports(status).await?),
    Command::Summary => render::summary(&client.moderation_summary().await?),
    Command::Approve { id } => finished(client.approve(id).await?)?,
    Command::Reject { id } => finished(client.reject(id).await?)?,
    Command::Delete { id } => finished(client.delete(id).await?)?,
  };
  Ok(text)
}

/// Render a mutation outcome, turning `success: false` into an error.
fn finished(outcome: chadabaz_core::outcome::Outcome) -> Result<String> {
  if !outcome.success {
    bail!("{}", outcome.message);
  }
  Ok(render::outcome(&outcome))
}
