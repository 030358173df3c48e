use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::state::{ensure_quickcal_home, quickcal_home};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub calendars: CalendarsSection,
    pub sink: SinkSection,
    pub log: LogSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarsSection {
    /// Known calendar names, in match priority order. The first is the default.
    pub names: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SinkSection {
    /// IANA zone the parsed wall-clock times are in.
    pub timezone: String,
    pub default_duration_minutes: i64,
    pub default_action: SinkAction,
    /// Where `default_action = "ics"` writes to.
    pub ics_path: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SinkAction {
    /// Print the ICS text to stdout
    Print,
    /// Write the ICS text to `ics_path`
    Ics,
    /// Pipe the ICS text into `gcalcli import`
    Gcalcli,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSection {
    /// `tracing_subscriber::EnvFilter` directives, used when RUST_LOG is unset.
    pub filter: String,
}

impl Default for CalendarsSection {
    fn default() -> Self {
        Self {
            names: vec!["Home".to_string(), "Work".to_string()],
        }
    }
}

impl Default for SinkSection {
    fn default() -> Self {
        Self {
            timezone: "America/Chicago".to_string(),
            default_duration_minutes: 60,
            default_action: SinkAction::Print,
            ics_path: PathBuf::from("event.ics"),
        }
    }
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            filter: "warn".to_string(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(quickcal_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    let p = config_path()?;
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    parse_config(&s).with_context(|| format!("parse {}", p.display()))
}

pub fn parse_config(s: &str) -> Result<Config> {
    Ok(toml::from_str(s)?)
}

pub fn save_config(cfg: &Config) -> Result<PathBuf> {
    let p = ensure_quickcal_home()?.join("config.toml");
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(p)
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    let p = save_config(&Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}

/// Calendar names from `--calendar` flags if any were given, else from config.
pub fn known_calendar_names(overrides: &[String], cfg: &Config) -> Vec<String> {
    if overrides.is_empty() {
        cfg.calendars.names.clone()
    } else {
        overrides.to_vec()
    }
}
