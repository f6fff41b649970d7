//! # crond CLI
//!
//! Previews when crontab schedules fire next. Commands are never executed.
//!
//! Usage:
//!   crond next "5 0 * * *"                  # Next 5 runs of a time specification
//!   crond next "*/15 9-17 * * 1-5" -n 10    # Custom count
//!   crond list --crontab ./crontab          # Next run of every entry
//!   crond check --at 2026-01-05T12:00:00Z   # Validate, then show entries due that minute

use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crond_core::CrondConfig;
use crond_scheduler::{Crontab, Schedule};

#[derive(Parser)]
#[command(name = "crond", version, about = "⏰ crond — next run times for crontab schedules")]
struct Cli {
    /// Config file (default: ~/.crond/config.toml)
    #[arg(long, global = true)]
    config: Option<String>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show upcoming runs of a five-field time specification
    Next {
        /// e.g. "5 0 * * *"
        spec: String,

        /// Start time, RFC 3339 (default: now)
        #[arg(long)]
        from: Option<String>,

        /// Number of runs to show (default: preview.count from config)
        #[arg(short = 'n', long)]
        count: Option<usize>,

        /// Emit JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the next run of every crontab entry
    List {
        /// Crontab file (default: crontab from config)
        #[arg(long)]
        crontab: Option<String>,

        /// Start time, RFC 3339 (default: now)
        #[arg(long)]
        from: Option<String>,

        /// Emit JSON
        #[arg(long)]
        json: bool,
    },
    /// Validate a crontab file
    Check {
        /// Crontab file (default: crontab from config)
        #[arg(long)]
        crontab: Option<String>,

        /// Also list the entries due in this minute, RFC 3339
        #[arg(long)]
        at: Option<String>,
    },
}

fn expand_path(p: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(p).as_ref())
}

fn load_config(path: Option<&str>) -> Result<CrondConfig> {
    let config = match path {
        Some(p) => CrondConfig::load_from(&expand_path(p))?,
        None => CrondConfig::load()?,
    };
    Ok(config)
}

fn init_logging(config: &CrondConfig, verbose: bool) {
    let default = if verbose {
        "crond=debug,crond_scheduler=debug,crond_core=debug".to_string()
    } else {
        config.log.level.clone()
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if config.log.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// `--from` if given, else now in the configured offset.
fn start_time(from: Option<&str>, config: &CrondConfig) -> Result<DateTime<FixedOffset>> {
    match from {
        Some(text) => DateTime::parse_from_rfc3339(text)
            .with_context(|| format!("'{text}' is not an RFC 3339 timestamp")),
        None => {
            let offset = config
                .utc_offset()
                .context("utc_offset_minutes is out of range")?;
            Ok(Utc::now().with_timezone(&offset))
        }
    }
}

fn crontab_path(arg: Option<&str>, config: &CrondConfig) -> PathBuf {
    match arg {
        Some(p) => expand_path(p),
        None => config.crontab_path(),
    }
}

fn run_next(spec: &str, from: DateTime<FixedOffset>, count: usize, json: bool) -> Result<()> {
    if count == 0 {
        anyhow::bail!("count must be at least 1");
    }
    let schedule = Schedule::parse(spec)?;
    tracing::debug!("parsed '{spec}' as '{schedule}'");
    let runs: Vec<_> = schedule.upcoming(from).take(count).collect();
    if runs.is_empty() {
        // Surface the underlying reason.
        schedule.next_execution(&from)?;
    }

    if json {
        let out = serde_json::json!({
            "schedule": schedule.to_string(),
            "from": from.to_rfc3339(),
            "runs": runs.iter().map(|r| r.to_rfc3339()).collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("⏰ {schedule}  (from {})", from.to_rfc3339());
        for run in &runs {
            println!("   {}", run.format("%Y-%m-%d %H:%M %:z (%a)"));
        }
    }
    Ok(())
}

fn run_list(path: &std::path::Path, from: DateTime<FixedOffset>, json: bool) -> Result<()> {
    let tab = Crontab::load(path).with_context(|| format!("loading {}", path.display()))?;
    tracing::info!("📅 {} entries in {}", tab.len(), path.display());

    let mut rows = Vec::new();
    for line in tab.lines() {
        let next = match line.entry.next_execution(&from) {
            Ok(at) => Some(at),
            Err(e) => {
                tracing::warn!("⚠️ line {}: {e}", line.line);
                None
            }
        };
        rows.push((line, next));
    }

    if json {
        let out: Vec<_> = rows
            .iter()
            .map(|(line, next)| {
                serde_json::json!({
                    "line": line.line,
                    "schedule": line.entry.schedule.to_string(),
                    "command": line.entry.command,
                    "next": next.as_ref().map(|t| t.to_rfc3339()),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    for (line, next) in &rows {
        let when = match next {
            Some(t) => t.format("%Y-%m-%d %H:%M %:z").to_string(),
            None => "never".to_string(),
        };
        println!("{:>4}  {when}  {}  {}", line.line, line.entry.schedule, line.entry.command);
    }
    if let Some((at, line)) = tab.next_due(&from) {
        println!("\n🔔 next: line {} at {}", line.line, at.to_rfc3339());
    }
    Ok(())
}

fn run_check(path: &std::path::Path, at: Option<DateTime<FixedOffset>>) -> Result<()> {
    let tab = Crontab::load(path).with_context(|| format!("checking {}", path.display()))?;
    println!("✅ {}: {} valid entries", path.display(), tab.len());

    if let Some(at) = at {
        let due = tab.due_at(&at);
        println!("   due at {}: {}", at.format("%Y-%m-%d %H:%M %:z"), due.len());
        for line in due {
            println!("   {:>4}  {}", line.line, line.entry.command);
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    init_logging(&config, cli.verbose);

    match cli.command {
        Command::Next {
            spec,
            from,
            count,
            json,
        } => {
            let from = start_time(from.as_deref(), &config)?;
            run_next(&spec, from, count.unwrap_or(config.preview.count), json)
        }
        Command::List {
            crontab,
            from,
            json,
        } => {
            let from = start_time(from.as_deref(), &config)?;
            run_list(&crontab_path(crontab.as_deref(), &config), from, json)
        }
        Command::Check { crontab, at } => {
            let at = match at {
                Some(text) => Some(start_time(Some(&text), &config)?),
                None => None,
            };
            run_check(&crontab_path(crontab.as_deref(), &config), at)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_next_args() {
        let cli = Cli::try_parse_from(["crond", "next", "5 0 * * *", "-n", "3", "--json"]).unwrap();
        match cli.command {
            Command::Next { spec, count, json, .. } => {
                assert_eq!(spec, "5 0 * * *");
                assert_eq!(count, Some(3));
                assert!(json);
            }
            _ => panic!("expected next"),
        }
    }

    #[test]
    fn test_start_time_from_rfc3339() {
        let config = CrondConfig::default();
        let t = start_time(Some("2019-12-01T00:05:00+02:00"), &config).unwrap();
        assert_eq!(t.offset().local_minus_utc(), 7200);
        assert!(start_time(Some("yesterday"), &config).is_err());
    }

    #[test]
    fn test_start_time_uses_configured_offset() {
        let config = CrondConfig {
            utc_offset_minutes: -480,
            ..CrondConfig::default()
        };
        let t = start_time(None, &config).unwrap();
        assert_eq!(t.offset().local_minus_utc(), -480 * 60);
    }

    #[test]
    fn test_run_next_errors() {
        let from = DateTime::parse_from_rfc3339("2019-12-01T00:00:00Z").unwrap();
        assert!(run_next("5 0 * *", from, 3, false).is_err());
        assert!(run_next("0 0 30 2 *", from, 3, true).is_err());
        assert!(run_next("5 0 * * *", from, 3, true).is_ok());
    }

    #[test]
    fn test_run_next_rejects_zero_count() {
        let from = DateTime::parse_from_rfc3339("2019-12-01T00:00:00Z").unwrap();
        let err = run_next("5 0 * * *", from, 0, false).unwrap_err();
        assert!(err.to_string().contains("at least 1"));
    }
}
