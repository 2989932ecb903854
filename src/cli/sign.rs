//! `sign` subcommand: compute the signature for a request body.
//!
//! Useful for crafting manual requests with curl and for verifying what a
//! deployed prober would send for a given body.

use clap::Args;

use crate::config;
use crate::signing;

#[derive(Args, Debug)]
pub struct SignArgs {
    /// Literal JSON body to sign
    #[arg(long, conflicts_with = "body_file")]
    pub body: Option<String>,

    /// Read the body from a file instead (signed byte-for-byte, including
    /// any trailing newline)
    #[arg(long)]
    pub body_file: Option<std::path::PathBuf>,

    /// Also compute the v2 digest over "<timestamp>.<body>"
    #[arg(long)]
    pub timestamp: Option<i64>,
}

pub async fn handle_sign_command(
    args: SignArgs,
    secret_flag: Option<String>,
    secret_file_flag: Option<std::path::PathBuf>,
) -> anyhow::Result<()> {
    let body = match (args.body, &args.body_file) {
        (Some(body), _) => body,
        (None, Some(path)) => std::fs::read_to_string(path)?,
        (None, None) => anyhow::bail!("provide a body via --body or --body-file"),
    };

    let secret = config::resolve_secret(secret_flag, secret_file_flag, &["SHARED_SECRET", "BARRY_SHARED_SECRET"])?
        .ok_or_else(|| anyhow::anyhow!("no secret configured; pass --secret or set SHARED_SECRET"))?;

    println!("X-Signature: {}", signing::signature_hex(&secret, body.as_bytes())?);

    if let Some(ts) = args.timestamp {
        println!("X-Signature-V2: {}", signing::timestamped_signature_hex(&secret, ts, &body)?);
        println!("X-Signature-Ts: {}", ts);
    }

    Ok(())
}
