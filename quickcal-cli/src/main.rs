use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use quickcal_core::ParsedEvent;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod config;
mod prompt;
mod sink;
mod state;

use config::{Config, known_calendar_names, load_config};
use prompt::Confirm;
use sink::{Delivery, EventDraft};

#[derive(Parser, Debug)]
#[command(
    name = "quickcal",
    version,
    long_version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("QUICKCAL_BUILD_SHA"), ")"),
    about = "Create calendar events from plain sentences"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a sentence and print the event it describes (no side effects)
    Parse {
        #[command(flatten)]
        input: InputArgs,

        /// Print the parsed event as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Parse, confirm, then hand the event to the calendar sink
    Add {
        #[command(flatten)]
        input: InputArgs,

        /// Skip the confirmation prompt
        #[arg(long, short = 'y', default_value_t = false)]
        yes: bool,

        /// Write the event to this ICS file
        #[arg(long)]
        ics: Option<PathBuf>,

        /// Import the event with gcalcli
        #[arg(long, default_value_t = false)]
        import: bool,
    },

    /// List the known calendar names, default first
    Calendars,

    /// Config file helpers
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Args, Debug)]
struct InputArgs {
    /// Event description, e.g. "Dinner with Andre March 23rd at 9pm alert 15 minutes before"
    text: Vec<String>,

    /// Treat this date as today (YYYY-MM-DD)
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Known calendar name; repeat to give several (overrides config)
    #[arg(long = "calendar")]
    calendars: Vec<String>,
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default config.toml if none exists
    Init,
    /// Print the effective config
    Show,
    /// Print the config file path
    Path,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = load_config()?;
    init_tracing(&cfg.log.filter);

    match cli.command {
        Command::Parse { input, json } => {
            let text = sentence(&input.text)?;
            let event = parse_input(&text, &input, &cfg)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&event)?);
            } else {
                print!("{event}");
            }
        }

        Command::Add {
            input,
            yes,
            ics,
            import,
        } => {
            if let Some(event) = run_add(&input, yes, &cfg)? {
                deliver(&event, ics, import, &cfg)?;
            }
        }

        Command::Calendars => {
            let names = known_calendar_names(&[], &cfg);
            if names.is_empty() {
                println!("(no calendars configured; add [calendars] names to config.toml)");
            }
            for (i, name) in names.iter().enumerate() {
                let marker = if i == 0 { " (default)" } else { "" };
                println!("- {name}{marker}");
            }
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => {
                print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
            }
            ConfigCommand::Path => println!("{}", config::config_path()?.display()),
        },
    }

    Ok(())
}

fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// The event sentence from positional words; blank is an error.
fn sentence(words: &[String]) -> Result<String> {
    let text = words.join(" ");
    if text.trim().is_empty() {
        bail!("no event text given, e.g. quickcal parse Dinner tomorrow at 9pm");
    }
    Ok(text)
}

fn reference_date(input: &InputArgs) -> NaiveDate {
    input
        .date
        .unwrap_or_else(|| chrono::Local::now().date_naive())
}

fn parse_input(text: &str, input: &InputArgs, cfg: &Config) -> Result<ParsedEvent> {
    let names = known_calendar_names(&input.calendars, cfg);
    quickcal_core::parse(text, reference_date(input), &names)
        .with_context(|| format!("parsing {text:?}"))
}

/// Prompt/confirm loop. `None` means the user cancelled.
fn run_add(input: &InputArgs, yes: bool, cfg: &Config) -> Result<Option<ParsedEvent>> {
    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let mut out = io::stdout();

    let mut text = if input.text.is_empty() {
        match prompt::read_event_text(&mut reader, &mut out, None)? {
            Some(t) => t,
            None => {
                println!("Cancelled.");
                return Ok(None);
            }
        }
    } else {
        input.text.join(" ")
    };

    loop {
        match parse_input(&text, input, cfg) {
            Ok(event) if yes => return Ok(Some(event)),
            Ok(event) => match prompt::confirm(&mut reader, &mut out, &event)? {
                Confirm::Yes => return Ok(Some(event)),
                Confirm::No => {
                    println!("Cancelled.");
                    return Ok(None);
                }
                Confirm::Edit => tracing::debug!(%text, "re-editing event text"),
            },
            Err(e) if yes => return Err(e),
            Err(e) => println!("Could not parse: {e:#}"),
        }

        match prompt::read_event_text(&mut reader, &mut out, Some(&text))? {
            Some(t) => text = t,
            None => {
                println!("Cancelled.");
                return Ok(None);
            }
        }
    }
}

fn deliver(event: &ParsedEvent, ics: Option<PathBuf>, import: bool, cfg: &Config) -> Result<()> {
    let tz = sink::parse_timezone(&cfg.sink.timezone)?;
    let draft = EventDraft::from_event(event, cfg.sink.default_duration_minutes)?;
    let rendered = sink::render_ics(&[draft], tz)?;

    let (ics, import) = match sink::choose_delivery(ics, import, &cfg.sink) {
        Delivery::Print => {
            print!("{rendered}");
            return Ok(());
        }
        Delivery::Targets { ics, import } => (ics, import),
    };

    if let Some(path) = ics {
        sink::write_ics(&rendered, &path)?;
    }
    if import {
        sink::import_with_gcalcli(&rendered, event.calendar_name.as_deref())?;
        println!(
            "Imported \"{}\" into {}",
            event.title,
            event.calendar_name.as_deref().unwrap_or("the default calendar")
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(text: &str) -> Vec<String> {
        text.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn test_sentence_joins_words() {
        assert_eq!(sentence(&words("Dinner tomorrow 9pm")).unwrap(), "Dinner tomorrow 9pm");
    }

    #[test]
    fn test_blank_sentence_is_rejected() {
        assert!(sentence(&[]).is_err());
        assert!(sentence(&["  ".to_string()]).is_err());
    }

    #[test]
    fn test_cli_parses_add_flags() {
        let cli = Cli::try_parse_from([
            "quickcal", "add", "--yes", "--ics", "out.ics", "--calendar", "Work", "Dinner", "9pm",
        ])
        .unwrap();
        let Command::Add { input, yes, ics, import } = cli.command else {
            panic!("expected add");
        };
        assert!(yes);
        assert!(!import);
        assert_eq!(ics, Some(PathBuf::from("out.ics")));
        assert_eq!(input.calendars, vec!["Work".to_string()]);
        assert_eq!(input.text, words("Dinner 9pm"));
    }
}
