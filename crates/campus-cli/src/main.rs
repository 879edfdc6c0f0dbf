//! `campus`: command-line lead desk for the campus contact API.
//!
//! # Usage
//!
//! ```text
//! campus --url http://localhost:5000 --user admin --password secret list
//! campus --config ~/.config/campus/config.toml analytics --subject fee
//! campus export --format xlsx --out ~/Downloads --start-date 2026-01-01
//! ```

mod client;
mod output;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use client::{ApiClient, ApiConfig, LeadQuery};
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "campus", about = "Manage leads from the campus contact form")]
struct Args {
  /// Path to a TOML config file (url, username, password).
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Base URL of the campus server (default: http://localhost:5000).
  #[arg(long, env = "CAMPUS_URL")]
  url: Option<String>,

  /// Admin username.
  #[arg(long, env = "CAMPUS_USER")]
  user: Option<String>,

  /// Admin password (plaintext).
  #[arg(long, env = "CAMPUS_PASSWORD")]
  password: Option<String>,

  #[command(subcommand)]
  command: Command,
}

/// Filters shared by `list`, `analytics` and `export`.
#[derive(ClapArgs, Debug, Default)]
struct FilterArgs {
  /// Earliest submission date (YYYY-MM-DD or RFC 3339).
  #[arg(long)]
  start_date: Option<String>,
  /// Latest submission date; a bare date covers the whole day.
  #[arg(long)]
  end_date:   Option<String>,
  /// Case-insensitive subject substring.
  #[arg(long)]
  subject:    Option<String>,
  /// new, read, replied or archived.
  #[arg(long)]
  status:     Option<String>,
}

impl From<FilterArgs> for LeadQuery {
  fn from(f: FilterArgs) -> Self {
    LeadQuery {
      start_date: f.start_date,
      end_date:   f.end_date,
      subject:    f.subject,
      status:     f.status,
    }
  }
}

#[derive(Subcommand, Debug)]
enum Command {
  /// List submissions, newest first.
  List {
    #[arg(long, default_value_t = 1)]
    page:    usize,
    #[arg(long, default_value_t = 10)]
    limit:   usize,
    #[command(flatten)]
    filters: FilterArgs,
  },
  /// Show one submission (marks it read).
  Show { id: Uuid },
  /// Set a submission's status.
  Status { id: Uuid, status: String },
  /// Replace admin notes; omit the text to clear them.
  Notes { id: Uuid, notes: Option<String> },
  /// Record a reply to a submission.
  Reply { id: Uuid, message: String },
  /// Delete a submission.
  Delete { id: Uuid },
  /// Print lead analytics.
  Analytics {
    #[command(flatten)]
    filters: FilterArgs,
  },
  /// Download a lead report.
  Export {
    /// csv, xlsx or pdf.
    #[arg(long, default_value = "csv")]
    format:  String,
    /// Directory to write the report into.
    #[arg(long, default_value = ".")]
    out:     PathBuf,
    #[command(flatten)]
    filters: FilterArgs,
  },
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
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
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
      .unwrap_or_else(|| "http://localhost:5000".to_string()),
    username: pick(args.user, &file_cfg.username).unwrap_or_default(),
    password: pick(args.password, &file_cfg.password).unwrap_or_default(),
  };

  let client = ApiClient::new(api_config)?;

  match args.command {
    Command::List { page, limit, filters } => {
      let page = client.list(page, limit, &filters.into()).await?;
      print!("{}", output::contact_page(&page));
    }
    Command::Show { id } => {
      print!("{}", output::contact(&client.get(id).await?));
    }
    Command::Status { id, status } => {
      let c = client.set_status(id, &status).await?;
      println!("{} is now {}", c.id, c.status);
    }
    Command::Notes { id, notes } => {
      let c = client.set_notes(id, notes.as_deref().unwrap_or("")).await?;
      match c.admin_notes {
        Some(n) => println!("notes for {}: {n}", c.id),
        None => println!("notes for {} cleared", c.id),
      }
    }
    Command::Reply { id, message } => {
      let c = client.reply(id, &message).await?;
      println!("reply to {} recorded", c.email);
    }
    Command::Delete { id } => {
      client.delete(id).await?;
      println!("deleted {id}");
    }
    Command::Analytics { filters } => {
      let report = client.analytics(&filters.into()).await?;
      print!("{}", output::analytics(&report));
    }
    Command::Export { format, out, filters } => {
      let path = client.export(&format, &filters.into(), &out).await?;
      println!("{}", path.display());
    }
  }

  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn cli_definition_is_consistent() {
    use clap::CommandFactory;
    Args::command().debug_assert();
  }

  #[test]
  fn export_parses_filters() {
    let args = Args::parse_from([
      "campus", "export", "--format", "pdf", "--subject", "fee", "--start-date", "2026-01-01",
    ]);
    match args.command {
      Command::Export { format, out, filters } => {
        assert_eq!(format, "pdf");
        assert_eq!(out, PathBuf::from("."));
        assert_eq!(filters.subject.as_deref(), Some("fee"));
        assert_eq!(filters.start_date.as_deref(), Some("2026-01-01"));
      }
      other => panic!("unexpected command {other:?}"),
    }
  }

  #[test]
  fn flags_override_config_file() {
    assert_eq!(pick(Some("a".into()), "b").as_deref(), Some("a"));
    assert_eq!(pick(None, "b").as_deref(), Some("b"));
    assert_eq!(pick(None, ""), None);
  }
}
