use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use depgate::{
    check::run_check,
    config::{running_in_ci, Config, Overrides},
    output::{print_report, OutputFormat},
    source::{CommandSource, PackageManagerKind},
};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Exit codes for the commit hook
mod exit_codes {
    pub const ALLOWED: u8 = 0;
    pub const BLOCKED: u8 = 1;
}

#[derive(Parser)]
#[command(name = "depgate")]
#[command(
    author,
    version,
    about = "Block commits on stale or vulnerable dependencies"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check dependency freshness and audit results (default)
    Check(CheckArgs),

    /// Show or create config file
    Config {
        /// Generate default config file
        #[arg(long)]
        init: bool,

        /// Show config file path
        #[arg(long)]
        path: bool,
    },
}

#[derive(Args, Default)]
struct CheckArgs {
    /// Output format (text, json)
    #[arg(short, long)]
    format: Option<String>,

    /// Package manager to query (npm, pnpm)
    #[arg(short = 'm', long)]
    package_manager: Option<String>,

    /// Seconds to wait for each registry query
    #[arg(short, long)]
    timeout: Option<u64>,

    /// Block the commit when the registry cannot be reached
    #[arg(long, conflicts_with = "allow_network_failure")]
    strict: bool,

    /// Let the commit through when the registry cannot be reached
    #[arg(long)]
    allow_network_failure: bool,

    /// Project directory (defaults to the current directory)
    #[arg(short = 'C', long)]
    project: Option<PathBuf>,

    /// Show the outdated table and query notes
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only show the verdict
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(exit_codes::BLOCKED)
        }
    }
}

async fn run() -> Result<u8> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Check(CheckArgs::default())) {
        Commands::Check(args) => run_gate(args).await,
        Commands::Config { init, path } => {
            handle_config(init, path)?;
            Ok(exit_codes::ALLOWED)
        }
    }
}

async fn run_gate(args: CheckArgs) -> Result<u8> {
    let project_dir = args.project.unwrap_or_else(|| PathBuf::from("."));

    let package_manager = args
        .package_manager
        .as_deref()
        .map(PackageManagerKind::from_str)
        .transpose()
        .map_err(|e| anyhow::anyhow!(e))?;

    let allow_network_failure = if args.strict {
        Some(false)
    } else if args.allow_network_failure {
        Some(true)
    } else {
        None
    };

    let verbose = if args.verbose {
        Some(true)
    } else if args.quiet {
        Some(false)
    } else {
        None
    };

    let config = Config::load(&project_dir)?.with_overrides(Overrides {
        package_manager,
        query_timeout_secs: args.timeout,
        allow_network_failure,
        verbose,
    });
    let verbose = config.is_verbose();
    init_tracing(verbose);

    let format_str = args.format.unwrap_or_else(|| config.default_format.clone());
    let format = OutputFormat::from_str(&format_str).map_err(|e| anyhow::anyhow!(e))?;
    let is_interactive = format == OutputFormat::Text && verbose && !running_in_ci();

    tracing::debug!(?config, dir = %project_dir.display(), "starting dependency check");

    let progress = if is_interactive {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            pb.set_style(style);
        }
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message(format!(
            "Querying {} for outdated packages and advisories...",
            config.package_manager
        ));
        Some(pb)
    } else {
        None
    };

    let source = CommandSource::new(config.package_manager, &project_dir);
    let report = run_check(&source, &config).await;

    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    print_report(&report, format, verbose)?;

    Ok(if report.verdict.passed() {
        exit_codes::ALLOWED
    } else {
        exit_codes::BLOCKED
    })
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "depgate=info" } else { "depgate=warn" };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn handle_config(init: bool, show_path: bool) -> Result<()> {
    let config_path = Config::config_path();

    if show_path {
        println!("{}", config_path.display());
        return Ok(());
    }

    if init {
        if config_path.exists() {
            println!("Config file already exists at: {}", config_path.display());
            return Ok(());
        }

        let config = Config::default();
        config.save()?;
        println!("Created config file at: {}", config_path.display());
        println!();
        println!("Default configuration:");
        println!("{}", Config::generate_default_config());
        return Ok(());
    }

    if config_path.exists() {
        let content = std::fs::read_to_string(&config_path)?;
        println!("Config file: {}", config_path.display());
        println!();
        println!("{}", content);
    } else {
        println!("No config file found.");
        println!("Run 'depgate config --init' to create one.");
        println!();
        println!("Config path: {}", config_path.display());
    }

    Ok(())
}
