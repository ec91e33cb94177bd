use anyhow::Result;
use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use std::ffi::OsString;
use std::io::Write;
use std::path::PathBuf;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use vpm::commands;
use vpm::core::config::{Config, CONFIG_FILE_NAME};
use vpm::core::package::FileNaming;

const USAGE: &str = "Usage: vpm [init|install <name|url>]";

#[derive(Parser)]
#[clap(name = "vpm")]
#[clap(about = "Fetch V# libraries into a local directory")]
#[clap(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Configuration file holding the libs path
    #[clap(long, global = true, default_value = CONFIG_FILE_NAME)]
    config: PathBuf,

    /// Print debug logs to stderr
    #[clap(short, long, global = true)]
    verbose: bool,

    #[clap(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the configuration file, prompting for the libs directory
    Init,
    /// Download a library by name or URL into the libs directory
    Install {
        /// Library name, or a URL starting with http
        package: String,
        /// Name the file after the URL's last path segment instead of the whole identifier
        #[clap(long)]
        url_file_name: bool,
    },
}

/// What a command line asks for
enum Invocation {
    Run(Cli, Commands),
    Print(String),
}

fn parse_invocation<I, T>(args: I) -> Invocation
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match Cli::try_parse_from(args) {
        Ok(mut cli) => match cli.command.take() {
            Some(command) => Invocation::Run(cli, command),
            None => Invocation::Print(USAGE.to_string()),
        },
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                Invocation::Print(e.render().to_string().trim_end().to_string())
            }
            _ => Invocation::Print(format!(
                "Unknown command or insufficient arguments. {USAGE}"
            )),
        },
    }
}

fn init_logging(verbose: bool) {
    let default_directive = if verbose { "vpm=debug" } else { "vpm=warn" };

    // Already installed when run twice in one process
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Parse `args` and run the command. Usage and help text go to `out`;
/// every outcome, including failures, ends in `Ok`.
fn run<I, T, W>(args: I, out: &mut W) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
    W: Write,
{
    let (cli, command) = match parse_invocation(args) {
        Invocation::Run(cli, command) => (cli, command),
        Invocation::Print(message) => {
            writeln!(out, "{message}")?;
            return Ok(());
        }
    };

    init_logging(cli.verbose);

    // Loaded once; commands receive it explicitly
    let config = Config::load(&cli.config).unwrap_or_else(|e| {
        warn!("Ignoring {}: {e}", cli.config.display());
        None
    });

    match command {
        Commands::Init => commands::init::init_config(&cli.config, std::io::stdin().lock())?,
        Commands::Install {
            package,
            url_file_name,
        } => {
            let options = commands::install::InstallOptions {
                naming: if url_file_name {
                    FileNaming::UrlSegment
                } else {
                    FileNaming::Identifier
                },
                ..Default::default()
            };
            commands::install::install(config.as_ref(), &cli.config, &package, &options)?
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    run(std::env::args_os(), &mut std::io::stdout())
}
