//! Spinlog CLI - Command-line interface for the telemetry transformation engine
//!
//! Commands:
//! - transform: Process a captured log file into typed records (batch mode)
//! - run: Process streaming log lines from stdin (streaming mode)

use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, BufRead, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use spinlog::pipeline::{Output, SessionProcessor};
use spinlog::streak::StreakConfig;
use spinlog::{TransformError, SPINLOG_VERSION};

/// Spinlog - transformation engine for exercise-bike telemetry log lines
#[derive(Parser)]
#[command(name = "spinlog")]
#[command(version = SPINLOG_VERSION)]
#[command(about = "Transform bike telemetry logs into typed records", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process a captured log file into typed records (batch mode)
    Transform {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path (use - for stdout)
        #[arg(short, long)]
        output: PathBuf,

        /// Output format
        #[arg(long, default_value = "ndjson")]
        output_format: OutputFormat,

        /// Consecutive abnormal readings required to alert
        #[arg(long, default_value = "3")]
        threshold: usize,

        /// Ride warm-up in seconds during which streaks never alert
        #[arg(long, default_value = "30")]
        warmup_secs: i64,

        /// Load streak-tracker state from file
        #[arg(long)]
        load_state: Option<PathBuf>,

        /// Save streak-tracker state to file after processing
        #[arg(long)]
        save_state: Option<PathBuf>,
    },

    /// Process streaming log lines from stdin (streaming mode)
    Run {
        /// Consecutive abnormal readings required to alert
        #[arg(long, default_value = "3")]
        threshold: usize,

        /// Ride warm-up in seconds during which streaks never alert
        #[arg(long, default_value = "30")]
        warmup_secs: i64,

        /// Load streak-tracker state from file
        #[arg(long)]
        load_state: Option<PathBuf>,

        /// Save streak-tracker state to file on exit
        #[arg(long)]
        save_state: Option<PathBuf>,

        /// Flush output after each record
        #[arg(long, default_value = "true")]
        flush: bool,
    },
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Newline-delimited JSON (one record or alert per line)
    Ndjson,
    /// JSON array of records and alerts
    Json,
    /// Pretty-printed JSON array
    JsonPretty,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{0}")]
    Transform(#[from] TransformError),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("spinlog: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Transform {
            input,
            output,
            output_format,
            threshold,
            warmup_secs,
            load_state,
            save_state,
        } => cmd_transform(
            &input,
            &output,
            output_format,
            StreakConfig {
                threshold,
                warmup_secs,
            },
            load_state.as_deref(),
            save_state.as_deref(),
        ),

        Commands::Run {
            threshold,
            warmup_secs,
            load_state,
            save_state,
            flush,
        } => cmd_run(
            StreakConfig {
                threshold,
                warmup_secs,
            },
            load_state.as_deref(),
            save_state.as_deref(),
            flush,
        ),
    }
}

fn make_processor(
    config: StreakConfig,
    load_state: Option<&Path>,
) -> Result<SessionProcessor, CliError> {
    let mut processor = SessionProcessor::with_config(config);
    if let Some(state_path) = load_state {
        let state_json = fs::read_to_string(state_path)?;
        processor.load_tracker_state(&state_json)?;
    }
    Ok(processor)
}

fn cmd_transform(
    input: &PathBuf,
    output: &PathBuf,
    output_format: OutputFormat,
    config: StreakConfig,
    load_state: Option<&Path>,
    save_state: Option<&Path>,
) -> Result<(), CliError> {
    let input_data = if input.to_string_lossy() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        fs::read_to_string(input)?
    };

    let mut processor = make_processor(config, load_state)?;

    let mut outputs: Vec<Output> = Vec::new();
    for line in input_data.lines() {
        outputs.extend(processor.process_line(line));
    }
    outputs.extend(processor.finish());

    if let Some(state_path) = save_state {
        fs::write(state_path, processor.save_tracker_state()?)?;
    }

    let output_data = format_outputs(&outputs, &output_format)?;

    if output.to_string_lossy() == "-" {
        print!("{output_data}");
    } else {
        fs::write(output, output_data)?;
    }

    Ok(())
}

fn cmd_run(
    config: StreakConfig,
    load_state: Option<&Path>,
    save_state: Option<&Path>,
    flush: bool,
) -> Result<(), CliError> {
    if atty::is(atty::Stream::Stdin) {
        eprintln!("spinlog: reading log lines from terminal; pipe a log feed or press Ctrl-D");
    }

    let mut processor = make_processor(config, load_state)?;

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = line?;
        for item in processor.process_line(&line) {
            writeln!(stdout, "{}", serde_json::to_string(&item)?)?;
        }
        if flush {
            stdout.flush()?;
        }
    }

    for item in processor.finish() {
        writeln!(stdout, "{}", serde_json::to_string(&item)?)?;
    }
    stdout.flush()?;

    if let Some(state_path) = save_state {
        fs::write(state_path, processor.save_tracker_state()?)?;
    }

    Ok(())
}

fn format_outputs(outputs: &[Output], format: &OutputFormat) -> Result<String, CliError> {
    let formatted = match format {
        OutputFormat::Ndjson => {
            let mut lines = String::new();
            for item in outputs {
                lines.push_str(&serde_json::to_string(item)?);
                lines.push('\n');
            }
            lines
        }
        OutputFormat::Json => serde_json::to_string(outputs)?,
        OutputFormat::JsonPretty => serde_json::to_string_pretty(outputs)?,
    };
    Ok(formatted)
}
