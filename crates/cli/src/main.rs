// packmatch CLI - check packing-list values against shipping document text

mod compare;
mod exit_codes;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use exit_codes::{EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "packmatch")]
#[command(about = "Check which packing-list values appear in a shipping PDF")]
#[command(long_version = long_version())]
#[command(version)]
#[command(subcommand_required = false)]
struct Cli {
    /// Log progress to stderr (RUST_LOG overrides)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Match spreadsheet columns against the text of a PDF
    #[command(after_help = "\
Examples:
  packmatch compare packing.xlsx customs.pdf
  packmatch compare packing.xlsx customs.pdf --fields \"Part No, NW(KG)\"
  packmatch compare packing.xlsx customs.pdf -o result.xlsx --json")]
    Compare {
        /// Packing-list spreadsheet (xlsx, xls, xlsb, ods)
        spreadsheet: PathBuf,

        /// Shipping / customs PDF
        document: PathBuf,

        /// Columns to check, separated by ',' or '，' (default from config)
        #[arg(long, short = 'f')]
        fields: Option<String>,

        /// Result workbook path (default: derived from the input names)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// TOML config file
        #[arg(long, env = "PACKMATCH_CONFIG")]
        config: Option<PathBuf>,

        /// Print the run report as JSON on stdout
        #[arg(long)]
        json: bool,

        /// Suppress the summary; print only the output path
        #[arg(long, short = 'q')]
        quiet: bool,
    },

    /// List the labels found on the configured header row
    #[command(after_help = "\
Examples:
  packmatch columns packing.xlsx
  packmatch columns packing.xlsx --json")]
    Columns {
        /// Packing-list spreadsheet
        spreadsheet: PathBuf,

        /// TOML config file
        #[arg(long, env = "PACKMATCH_CONFIG")]
        config: Option<PathBuf>,

        /// Print labels as a JSON array
        #[arg(long)]
        json: bool,
    },

    /// Print the effective configuration as TOML
    Config {
        /// TOML config file to validate and print
        #[arg(long, env = "PACKMATCH_CONFIG")]
        config: Option<PathBuf>,
    },
}

fn long_version() -> &'static str {
    if cfg!(debug_assertions) {
        concat!(
            env!("CARGO_PKG_VERSION"),
            " (", env!("GIT_COMMIT_HASH"), ")",
            "\nengine:  packmatch-recon ", env!("CARGO_PKG_VERSION"),
            "\nbuild:   debug",
            "\ntarget:  ", env!("TARGET"),
        )
    } else {
        concat!(
            env!("CARGO_PKG_VERSION"),
            " (", env!("GIT_COMMIT_HASH"), ")",
            "\nengine:  packmatch-recon ", env!("CARGO_PKG_VERSION"),
            "\nbuild:   release",
            "\ntarget:  ", env!("TARGET"),
        )
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    // A second init (tests embedding main) is harmless
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        None => {
            // No subcommand = show usage
            eprintln!("Usage: packmatch <command> [options]");
            eprintln!("       packmatch --help for more information");
            Ok(())
        }
        Some(Commands::Compare { spreadsheet, document, fields, output, config, json, quiet }) => {
            compare::cmd_compare(spreadsheet, document, fields, output, config, json, quiet)
        }
        Some(Commands::Columns { spreadsheet, config, json }) => {
            compare::cmd_columns(spreadsheet, config, json)
        }
        Some(Commands::Config { config }) => compare::cmd_config(config),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn general(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }

    /// Error already reported on stderr; only the exit code remains.
    pub fn silent(code: u8) -> Self {
        Self { code, message: String::new(), hint: None }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
