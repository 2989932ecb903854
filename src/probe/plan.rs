//! Named probe plans.
//!
//! The probed backend exists in several revisions with diverging endpoint
//! sets and field names (`/healthz` vs `/health` with an `ok` field, `tf`
//! vs `timeframe` query parameters, different intent body shapes). No
//! revision is authoritative, so each is modeled as its own explicitly
//! ordered case table rather than one merged list. The order here is the
//! report order.

use uuid::Uuid;

use crate::errors::{Error, Result};
use crate::probe::case::{CaseAuth, Expect, IntentBody, ProbeCase};

/// How a plan treats an unconfigured shared secret
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretPolicy {
    /// Signed cases are skipped and reported as SKIP; the run still exits 0
    Optional,
    /// The run aborts with a configuration error before any request is sent
    Required,
}

/// An ordered table of probe cases plus the secret policy that governs it
#[derive(Debug, Clone)]
pub struct ProbePlan {
    pub name: &'static str,
    pub summary: &'static str,
    /// Environment variables consulted for the shared secret, in order
    pub secret_env: &'static [&'static str],
    pub secret_policy: SecretPolicy,
    pub cases: Vec<ProbeCase>,
}

impl ProbePlan {
    /// Deployment-level probes against the gateway revision: liveness
    /// endpoints, data reads, and one v1-signed dry-run intent. The secret
    /// is optional; without it the signed case is skipped.
    pub fn legacy(symbol: &str) -> Result<Self> {
        let intent = IntentBody::market_qty(symbol, 1, probe_client_id());
        Ok(Self {
            name: "legacy",
            summary: "liveness + data endpoints, optional v1-signed intent",
            secret_env: &["SHARED_SECRET", "BARRY_SHARED_SECRET"],
            secret_policy: SecretPolicy::Optional,
            cases: vec![
                ProbeCase::get("ROOT", "/"),
                ProbeCase::get("HEALTHZ", "/healthz"),
                ProbeCase::get("ACCOUNT", "/account"),
                ProbeCase::get("BARS", "/bars").with_query(vec![
                    ("symbol", symbol.to_string()),
                    ("timeframe", "15m".to_string()),
                    ("limit", "50".to_string()),
                ]),
                ProbeCase::get("SNAPSHOT", "/snapshot")
                    .with_query(vec![("symbol", symbol.to_string())]),
                ProbeCase::post("INTENT", "/intent", intent.to_literal()?, CaseAuth::SignedBody),
            ],
        })
    }

    /// Probes against the executor worker revision: `/health` returns a JSON
    /// body whose `ok` field is the health verdict, and the secret is
    /// mandatory because every deployment of this revision signs intents.
    pub fn executor(symbol: &str) -> Result<Self> {
        let intent = IntentBody::market_qty(symbol, 1, probe_client_id());
        Ok(Self {
            name: "executor",
            summary: "worker revision: ok-field health, tf bars, mandatory secret",
            secret_env: &["BARRY_SHARED_SECRET"],
            secret_policy: SecretPolicy::Required,
            cases: vec![
                ProbeCase::get("HEALTH", "/health").with_expect(Expect::OkField),
                ProbeCase::get("STATUS", "/status"),
                ProbeCase::get("BARS", "/bars").with_query(vec![
                    ("symbol", symbol.to_string()),
                    ("tf", "15m".to_string()),
                    ("limit", "50".to_string()),
                ]),
                ProbeCase::get("SNAPSHOT", "/snapshot")
                    .with_query(vec![("symbol", symbol.to_string())]),
                ProbeCase::post("INTENT", "/intent", intent.to_literal()?, CaseAuth::SignedBody),
            ],
        })
    }

    /// Probes against the intent-guard revision: timestamped v2 signatures
    /// with replay protection, plus the validate/limits surface that takes
    /// the secret verbatim in `X-Exec-Secret`.
    pub fn guarded(symbol: &str) -> Result<Self> {
        let intent = IntentBody::notional(symbol, 25.0, probe_client_id());
        let intent_literal = intent.to_literal()?;
        Ok(Self {
            name: "guarded",
            summary: "guard revision: v2 timestamped signature, validate/limits",
            secret_env: &["SHARED_SECRET"],
            secret_policy: SecretPolicy::Required,
            cases: vec![
                ProbeCase::get("HEALTHZ", "/healthz"),
                ProbeCase::post(
                    "INTENT",
                    "/intent",
                    intent_literal.clone(),
                    CaseAuth::SignedBodyV2,
                ),
                ProbeCase::post(
                    "VALIDATE",
                    "/validate",
                    intent_literal,
                    CaseAuth::SecretHeader("X-Exec-Secret"),
                ),
                ProbeCase::get("LIMITS", "/limits")
                    .with_auth(CaseAuth::SecretHeader("X-Exec-Secret")),
            ],
        })
    }

    /// Look up a plan by name
    pub fn by_name(name: &str, symbol: &str) -> Result<Self> {
        match name {
            "legacy" => Self::legacy(symbol),
            "executor" => Self::executor(symbol),
            "guarded" => Self::guarded(symbol),
            other => Err(Error::config(format!(
                "Unknown plan '{}'. Available plans: {}",
                other,
                Self::names().join(", ")
            ))),
        }
    }

    /// Names of all available plans, in listing order
    pub fn names() -> Vec<&'static str> {
        vec!["legacy", "executor", "guarded"]
    }
}

fn probe_client_id() -> String {
    format!("probe-{}", Uuid::new_v4().simple())
}
