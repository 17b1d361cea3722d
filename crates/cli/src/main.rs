mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// Cross-boundary thunk generator.
#[derive(Parser)]
#[command(
    name = "thunkgen",
    version,
    about = "Generate managed export tables and native wrappers from a thunk IDL file"
)]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    /// Log parser and emitter activity to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse an IDL file and write the managed and native artifacts
    Generate {
        /// Path to the thunk IDL input file
        input: PathBuf,
        /// Path of the managed export-table artifact to write
        managed_out: PathBuf,
        /// Path of the native wrapper artifact to write
        native_out: PathBuf,
        /// TOML file overriding generated identifiers
        #[arg(long)]
        config: Option<PathBuf>,
        /// Fail without writing anything if any line was rejected
        #[arg(long)]
        strict: bool,
    },

    /// Parse an IDL file and report rejected lines
    Check {
        /// Path to the thunk IDL input file
        input: PathBuf,
    },

    /// Print the resolved function model as JSON
    Parse {
        /// Path to the thunk IDL input file
        input: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Generate {
            input,
            managed_out,
            native_out,
            config,
            strict,
        } => {
            commands::generate::cmd_generate(
                commands::generate::GenerateOptions {
                    input: &input,
                    managed_out: &managed_out,
                    native_out: &native_out,
                    config: config.as_deref(),
                    strict,
                },
                cli.output,
                cli.quiet,
            );
        }
        Commands::Check { input } => {
            commands::check::cmd_check(&input, cli.output, cli.quiet);
        }
        Commands::Parse { input } => {
            commands::parse::cmd_parse(&input, cli.output, cli.quiet);
        }
    }
}

/// Install the stderr subscriber. `RUST_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_level = if verbose { "debug" } else { "error" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = fmt::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init();
}

pub(crate) fn report_error(msg: &str, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => eprintln!("{}", msg),
        OutputFormat::Json => {
            eprintln!("{}", serde_json::json!({ "error": msg }));
        }
    }
}
