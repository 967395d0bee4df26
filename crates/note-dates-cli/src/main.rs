//! `notedate`: normalize free-form note dates and times from the command line.

use std::io::{self, Read};

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use note_dates::{
    extract_date_from_text, extract_time_from_text, normalize_date, normalize_time,
    parse_event_date, parse_start_time, resolve_schedule, LlmNoteFields, Schedule,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "notedate", version, about = "Normalize free-form note dates and times")]
struct Cli {
    /// Reference date for relative expressions (defaults to the local date)
    #[arg(long, global = true, env = "NOTEDATE_TODAY", value_name = "YYYY-MM-DD")]
    today: Option<NaiveDate>,

    /// Verbosity level (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize a date field to YYYY-MM-DD (free-form text passes through)
    Date {
        /// Date expression, e.g. "tmr", "next friday", "周三", "on 20 Oct"
        input: String,
    },
    /// Normalize a time field to HH:MM (free-form text passes through)
    Time {
        /// Time expression, e.g. "5pm", "7:30 p.m.", "1730"
        input: String,
    },
    /// Find a date and time inside a sentence and print them as JSON
    Extract {
        /// Free-form text, e.g. "Badminton tmr 5pm @polyu"
        text: String,
    },
    /// Resolve a generated note's date and time from its prompt and LLM fields
    Schedule {
        /// The user's original prompt
        #[arg(short, long)]
        prompt: String,

        /// LLM extraction output as JSON, or "-" to read it from stdin
        #[arg(short, long, default_value = "-")]
        fields: String,
    },
    /// Strictly parse an ISO 8601 event date
    StrictDate {
        input: String,
    },
    /// Strictly parse an HH:MM start time
    StrictTime {
        input: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let today = cli.today.unwrap_or_else(|| Local::now().date_naive());
    debug!(today = %today, "reference date");

    match cli.command {
        Commands::Date { input } => print_field(normalize_date(input.as_str(), today)),
        Commands::Time { input } => print_field(normalize_time(input.as_str())),
        Commands::Extract { text } => {
            let found = Schedule {
                date: extract_date_from_text(text.as_str(), today),
                time: extract_time_from_text(text.as_str()),
            };
            print_json(&found)?;
        }
        Commands::Schedule { prompt, fields } => {
            let payload = read_fields(&fields)?;
            let fields = LlmNoteFields::from_json(&payload)?;
            print_json(&resolve_schedule(&prompt, &fields, today))?;
        }
        Commands::StrictDate { input } => {
            let date = parse_event_date(&input)?;
            println!("{}", date.format("%Y-%m-%d"));
        }
        Commands::StrictTime { input } => {
            let time = parse_start_time(&input)?;
            println!("{}", time.format("%H:%M"));
        }
    }

    Ok(())
}

/// Logs go to stderr so stdout stays machine-readable.
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn print_field(value: Option<String>) {
    println!("{}", value.as_deref().unwrap_or("null"));
}

fn print_json(value: &Schedule) -> Result<()> {
    let json = serde_json::to_string(value).context("failed to serialize output")?;
    println!("{json}");
    Ok(())
}

fn read_fields(arg: &str) -> Result<String> {
    if arg != "-" {
        return Ok(arg.to_string());
    }
    let mut payload = String::new();
    io::stdin()
        .read_to_string(&mut payload)
        .context("failed to read LLM fields from stdin")?;
    Ok(payload)
}
