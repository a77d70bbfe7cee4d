mod form;
mod logging;
mod models;
mod submit;
mod tui;
mod validate;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use form::FormState;
use models::{ApplicationRecord, Submission};
use simplelog::LevelFilter;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use submit::SubmissionHandler;
use validate::validate;

#[derive(Parser)]
#[command(name = "apply")]
#[command(about = "Job application form - fill in, validate, and submit an application")]
struct Cli {
    /// Log file path (defaults to the user data directory)
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Log level
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Fill in the application interactively (default)
    Form {
        /// Start from a JSON record instead of an empty form
        #[arg(short, long)]
        prefill: Option<PathBuf>,

        /// Also write each accepted submission to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate a JSON record without opening the form
    Check {
        /// JSON file to read (stdin when omitted)
        file: Option<PathBuf>,
    },

    /// Print an empty record as JSON
    Template,
}

fn read_record(path: Option<&Path>) -> Result<ApplicationRecord> {
    let raw = match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read record file: {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read record from stdin")?;
            buf
        }
    };
    serde_json::from_str(&raw).context("Failed to parse application record")
}

fn check_record(record: ApplicationRecord) -> Result<(bool, String)> {
    let errors = validate(&record);
    if errors.is_empty() {
        let json = Submission::new(record).to_pretty_json()?;
        return Ok((true, json));
    }

    let mut out = String::new();
    out.push_str(&format!("{:<24} {}\n", "FIELD", "ERROR"));
    out.push_str(&format!("{}\n", "-".repeat(70)));
    for error in errors.iter() {
        out.push_str(&format!("{:<24} {}\n", error.field.wire_name(), error.message));
    }
    out.push_str(&format!("\n{} field(s) failed validation", errors.len()));
    Ok((false, out))
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let log_path = cli.log_file.unwrap_or_else(logging::default_log_path);
    if let Err(e) = logging::init(&log_path, cli.log_level.into()) {
        eprintln!("Warning: logging disabled: {:#}", e);
    }

    match cli.command.unwrap_or(Commands::Form {
        prefill: None,
        output: None,
    }) {
        Commands::Form { prefill, output } => {
            let form = match &prefill {
                Some(path) => {
                    let record = read_record(Some(path.as_path()))?;
                    log::info!("Prefilled form from {}", path.display());
                    FormState::with_record(record)
                }
                None => FormState::new(),
            };
            log::info!("Form session started");

            let accepted = tui::run_form(form, SubmissionHandler::new(output))?;
            log::info!("Form session ended");

            if let Some(submission) = accepted {
                println!("{}", submission.to_pretty_json()?);
            }
        }

        Commands::Check { file } => {
            let record = read_record(file.as_deref())?;
            let (accepted, report) = check_record(record)?;
            println!("{}", report);
            if !accepted {
                return Ok(ExitCode::FAILURE);
            }
        }

        Commands::Template => {
            println!("{}", serde_json::to_string_pretty(&ApplicationRecord::default())?);
        }
    }

    Ok(ExitCode::SUCCESS)
}
