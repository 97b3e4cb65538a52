//! Core logic behind the binary entry points:
//! - `calendrift-month`: month grid for an offset from the current month
//! - `calendrift-entries`: entries in chronological order with day keys

use std::convert::Infallible;
use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use calendrift_core::bootstrap::BootstrapOutcome;
use calendrift_core::date::{day_key, month_name, parse_entry_date, weekday_labels};
use calendrift_core::storage::MemoryStore;
use calendrift_core::{CalendarConfig, Calendrift, ConfigError, MonthGrid};
use chrono::{Datelike, NaiveDate};
use thiserror::Error;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "CALENDRIFT_LOG";

// ── Errors ────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("input is not JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("input must be a JSON array of entries")]
    NotAnEntryList,
}

/// Install a stderr subscriber filtered by `CALENDRIFT_LOG` (default `warn`).
pub fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    // A second install (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

// ── Arguments ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonthArgs {
    pub offset: i64,
    pub monday: bool,
    pub config: Option<PathBuf>,
}

/// Parse `[offset] [--monday] [--config <path>]` (program name excluded).
pub fn parse_month_args(args: &[String]) -> Result<MonthArgs, CliError> {
    let mut parsed = MonthArgs::default();
    let mut offset_seen = false;
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--monday" => parsed.monday = true,
            "--config" => {
                let path = iter
                    .next()
                    .ok_or_else(|| CliError::Usage("--config needs a path".into()))?;
                parsed.config = Some(PathBuf::from(path));
            }
            other if !offset_seen => {
                parsed.offset = other
                    .parse()
                    .map_err(|_| CliError::Usage(format!("offset must be an integer, got {other:?}")))?;
                offset_seen = true;
            }
            other => return Err(CliError::Usage(format!("unexpected argument {other:?}"))),
        }
    }
    Ok(parsed)
}

pub fn load_config(path: Option<&Path>) -> Result<CalendarConfig, CliError> {
    let Some(path) = path else {
        return Ok(CalendarConfig::default());
    };
    let json = fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(CalendarConfig::from_json(&json)?)
}

// ── Session ───────────────────────────────────────────────────────────────

/// Open an in-memory session and load the entry list in `input`. Blank input
/// means no entries; entries that do not decode are skipped by the engine.
pub fn session_from_input(
    input: &str,
    config: CalendarConfig,
    today: NaiveDate,
) -> Result<Calendrift<MemoryStore>, CliError> {
    let mut app = Calendrift::open(MemoryStore::new(), config, today);
    if input.trim().is_empty() {
        return Ok(app);
    }
    // Surface syntax errors here; the engine would swallow them.
    let payload: serde_json::Value = serde_json::from_str(input)?;
    if !payload.is_array() {
        return Err(CliError::NotAnEntryList);
    }
    match app.bootstrap(|_| Ok::<_, Infallible>(input.to_string())) {
        BootstrapOutcome::Loaded(n) => debug!(entries = n, "entries read from input"),
        outcome => debug!(?outcome, "no entries loaded"),
    }
    Ok(app)
}

// ── calendrift-month ──────────────────────────────────────────────────────

const CELL_WIDTH: usize = 6;

/// Render `grid` as a text calendar followed by the entry chips of each day.
///
/// Cells show the day number, `*` for today and `+n` for days with entries.
/// Days outside the month are shown as `.`.
pub fn render_month(app: &Calendrift<MemoryStore>, grid: &MonthGrid, today: NaiveDate) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} {}", month_name(grid.month_index), grid.year);
    for label in weekday_labels(app.view().week_start()) {
        let _ = write!(out, "{label:<width$}", width = CELL_WIDTH);
    }
    out.truncate(out.trim_end().len());
    out.push('\n');

    let previews = app.day_previews(grid, today);
    for row in previews.chunks(7) {
        let mut line = String::new();
        for cell in row {
            let text = if !cell.in_month {
                ".".to_string()
            } else {
                let mut text = cell.date.day().to_string();
                if cell.is_today {
                    text.push('*');
                }
                if cell.total() > 0 {
                    let _ = write!(text, "+{}", cell.total());
                }
                text
            };
            let _ = write!(line, "{text:<width$}", width = CELL_WIDTH);
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }

    for cell in previews.iter().filter(|c| c.in_month && c.total() > 0) {
        let chips: Vec<String> = cell.chips.iter().map(|e| e.chip_label()).collect();
        let _ = write!(out, "\n{}: {}", cell.day_key, chips.join(", "));
        if cell.more > 0 {
            let _ = write!(out, " (+{} more)", cell.more);
        }
    }
    if !out.ends_with('\n') {
        out.push('\n');
    }
    out
}

/// Run `calendrift-month` against `input`.
pub fn month_command(args: &MonthArgs, input: &str, today: NaiveDate) -> Result<String, CliError> {
    let mut config = load_config(args.config.as_deref())?;
    if args.monday {
        config.week_start = 1;
    }
    let app = session_from_input(input, config, today)?;
    let grid = app.view().month_grid(args.offset);
    Ok(render_month(&app, &grid, today))
}

// ── calendrift-entries ────────────────────────────────────────────────────

/// One line per entry, oldest first: day key, rating, categories, description.
pub fn entries_command(input: &str, today: NaiveDate) -> Result<String, CliError> {
    let app = session_from_input(input, CalendarConfig::default(), today)?;
    let mut out = String::new();
    for entry in app.journal().sorted() {
        let day = parse_entry_date(&entry.date).map(day_key).unwrap_or_default();
        let _ = writeln!(
            out,
            "{day}\t{}\t{}\t{}",
            entry.rating,
            entry.categories.join(","),
            entry.description
        );
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn month_args() {
        assert_eq!(parse_month_args(&[]).unwrap(), MonthArgs::default());
        let parsed = parse_month_args(&args(&["-3", "--monday", "--config", "c.json"])).unwrap();
        assert_eq!(parsed.offset, -3);
        assert!(parsed.monday);
        assert_eq!(parsed.config, Some(PathBuf::from("c.json")));
        assert!(matches!(parse_month_args(&args(&["x"])), Err(CliError::Usage(_))));
        assert!(matches!(parse_month_args(&args(&["1", "2"])), Err(CliError::Usage(_))));
        assert!(matches!(parse_month_args(&args(&["--config"])), Err(CliError::Usage(_))));
    }

    #[test]
    fn rejects_non_list_input() {
        let today = NaiveDate::from_ymd_opt(2025, 9, 14).unwrap();
        assert!(matches!(
            session_from_input("{\"a\":1}", CalendarConfig::default(), today),
            Err(CliError::NotAnEntryList)
        ));
        assert!(matches!(
            session_from_input("[", CalendarConfig::default(), today),
            Err(CliError::Json(_))
        ));
        assert!(session_from_input("  ", CalendarConfig::default(), today).is_ok());
    }
}
