//! # Command Line Interface
//!
//! Provides the `probe`, `sign`, and `plans` commands for the smoke-test
//! harness, plus the shared flag resolution and logging setup.

pub mod output;
pub mod probe;
pub mod sign;

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::probe::{ProbePlan, SecretPolicy};

#[derive(Parser)]
#[command(name = "tradeprobe")]
#[command(about = "Signed smoke-test prober for trading executor APIs")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Base URL of the probed API
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Shared signing secret
    #[arg(long, global = true)]
    pub secret: Option<String>,

    /// Path to file containing the shared signing secret
    #[arg(long, global = true)]
    pub secret_file: Option<std::path::PathBuf>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a probe plan against a target
    Probe(probe::ProbeArgs),

    /// Compute the signature headers for a request body
    Sign(sign::SignArgs),

    /// List the available probe plans and their cases
    Plans,
}

/// Run CLI commands
pub async fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    initialise_logging(cli.verbose)?;

    match cli.command {
        Commands::Probe(args) => {
            probe::handle_probe_command(args, cli.base_url, cli.secret, cli.secret_file, cli.timeout)
                .await?
        }
        Commands::Sign(args) => {
            sign::handle_sign_command(args, cli.secret, cli.secret_file).await?
        }
        Commands::Plans => print_plans()?,
    }

    Ok(())
}

fn initialise_logging(verbose: bool) -> anyhow::Result<()> {
    let default_level = if verbose { "debug" } else { "info" };
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", default_level);
    }

    if tracing::subscriber::set_global_default(
        FmtSubscriber::builder().with_env_filter(EnvFilter::from_default_env()).finish(),
    )
    .is_err()
    {
        // Subscriber already set elsewhere (e.g. integration tests); ignore.
    }
    Ok(())
}

/// Print every plan's case table
fn print_plans() -> anyhow::Result<()> {
    for name in ProbePlan::names() {
        let plan = ProbePlan::by_name(name, "AAPL")?;
        let secret = match plan.secret_policy {
            SecretPolicy::Optional => "optional",
            SecretPolicy::Required => "required",
        };

        println!();
        println!("{} - {}", plan.name, plan.summary);
        println!("secret: {} (from {})", secret, plan.secret_env.join(", "));

        output::print_table_header(&[("Case", 10), ("Method", 6), ("Path", 12), ("Auth", 20)]);
        for case in &plan.cases {
            println!(
                "{:<10} {:<6} {:<12} {:<20}",
                case.name,
                case.method.as_str(),
                case.path,
                format!("{:?}", case.auth)
            );
        }
    }

    Ok(())
}
