//! `probe` subcommand: run one named plan against a target.

use clap::Args;

use crate::cli::output;
use crate::config;
use crate::probe::{ProbePlan, ProbeRunner, RunnerConfig};

#[derive(Args, Debug)]
pub struct ProbeArgs {
    /// Base URL of the probed API (overrides --base-url, config, and env)
    #[arg(value_name = "BASE_URL")]
    pub target: Option<String>,

    /// Probe plan to run
    #[arg(long, default_value = "legacy")]
    pub plan: String,

    /// Symbol used in data queries and the intent body
    #[arg(long, default_value = "AAPL")]
    pub symbol: String,
}

pub async fn handle_probe_command(
    args: ProbeArgs,
    base_url_flag: Option<String>,
    secret_flag: Option<String>,
    secret_file_flag: Option<std::path::PathBuf>,
    timeout_flag: Option<u64>,
) -> anyhow::Result<()> {
    let plan = ProbePlan::by_name(&args.plan, &args.symbol)?;

    // The positional argument wins over the global flag, matching the
    // "first argument or default" convention of the original probes.
    let base_url = config::resolve_base_url(args.target.or(base_url_flag))?;
    let secret = config::resolve_secret(secret_flag, secret_file_flag, plan.secret_env)?;
    let timeout = config::resolve_timeout(timeout_flag);

    let runner = ProbeRunner::new(RunnerConfig { base_url, secret, timeout })?;

    println!("Probing {} (plan: {})", runner.base_url(), plan.name);
    let reports = runner.run_plan(&plan, output::print_report).await?;
    output::print_summary(&reports);

    Ok(())
}
