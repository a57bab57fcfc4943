mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use namespacer_lsp::config::DEFAULT_PREFIX;

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// Environment variable read when `--log-level` is absent.
const LOG_ENV: &str = "NAMESPACER_LOG";

/// Move Solidity state variables into ERC-7201 namespaced storage.
#[derive(Parser)]
#[command(
    name = "namespacer",
    version,
    about = "Move Solidity state variables into ERC-7201 namespaced storage"
)]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    /// Log filter written to stderr, e.g. `debug` or `namespacer_refactor=trace`
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the state variables of each contract that can be migrated
    Check {
        /// Path to the .sol source file
        file: PathBuf,
    },

    /// Move state variables into namespaced storage
    Migrate {
        /// Path to the .sol source file
        file: PathBuf,
        /// Only migrate this contract (default: every contract with candidates)
        #[arg(long)]
        contract: Option<String>,
        /// Namespace id prefix, as in `<prefix>.storage.<Contract>`
        #[arg(long, default_value = DEFAULT_PREFIX)]
        prefix: String,
        /// Write the result back to the file instead of printing it
        #[arg(long)]
        write: bool,
    },

    /// Start the Language Server Protocol server over stdio
    Lsp,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref());

    match cli.command {
        Commands::Check { file } => {
            commands::check::cmd_check(&file, cli.output, cli.quiet);
        }
        Commands::Migrate {
            file,
            contract,
            prefix,
            write,
        } => {
            commands::migrate::cmd_migrate(commands::migrate::MigrateOptions {
                file: &file,
                contract: contract.as_deref(),
                prefix: &prefix,
                write,
                output: cli.output,
                quiet: cli.quiet,
            });
        }
        Commands::Lsp => {
            if let Err(e) = namespacer_lsp::run() {
                eprintln!("LSP server error: {}", e);
                process::exit(1);
            }
        }
    }
}

/// Install the stderr log subscriber. stdout stays clean for command output
/// and the LSP transport.
fn init_tracing(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::try_new(level).unwrap_or_else(|e| {
            eprintln!("warning: invalid --log-level '{}': {}", level, e);
            EnvFilter::new("warn")
        }),
        None => EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
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
