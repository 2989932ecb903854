//! # tradeprobe
//!
//! Signed smoke-test prober for HMAC-authenticated trading executor APIs.
//!
//! The harness executes a fixed, ordered sequence of probe cases against a
//! deployed executor: liveness endpoints, data reads, and a dry-run order
//! intent whose body is authenticated with `X-Signature:
//! hex(HMAC-SHA256(secret, raw_body))`. Each case prints one PASS/FAIL/SKIP
//! line as it completes; verdicts are informational and do not affect the
//! exit code.
//!
//! The probed backend exists in several revisions with diverging endpoint
//! sets, so the harness ships three named plans (`legacy`, `executor`,
//! `guarded`) rather than one merged case table.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use tradeprobe::probe::{ProbePlan, ProbeRunner, RunnerConfig};
//!
//! #[tokio::main]
//! async fn main() -> tradeprobe::Result<()> {
//!     let plan = ProbePlan::legacy("AAPL")?;
//!     let runner = ProbeRunner::new(RunnerConfig::default())?;
//!     let reports = runner.run_plan(&plan, |r| println!("{:?}", r.verdict)).await?;
//!     assert_eq!(reports.len(), plan.cases.len());
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod errors;
pub mod probe;
pub mod signing;

// Re-export commonly used types
pub use errors::{Error, Result};

/// Application version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name from Cargo.toml
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
