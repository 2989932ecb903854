//! Probe execution.
//!
//! Runs a plan's cases strictly sequentially in table order, one blocking
//! request per case, classifying each outcome as it completes. There are no
//! retries; a case failure never stops the sequence. The only aborts are a
//! missing mandatory secret (before any request) and a non-JSON body on a
//! case that must parse one.

use std::time::Duration;

use chrono::Utc;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};
use tracing::{debug, trace};
use uuid::Uuid;

use crate::errors::{Error, Result};
use crate::probe::case::{CaseAuth, Expect, ProbeCase, ProbeReport};
use crate::probe::plan::{ProbePlan, SecretPolicy};
use crate::signing;

/// Probe target configuration
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Base URL of the probed API, without a trailing slash
    pub base_url: String,

    /// Shared signing secret, if configured
    pub secret: Option<String>,

    /// Request timeout in seconds
    pub timeout: u64,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            base_url: crate::config::DEFAULT_BASE_URL.to_string(),
            secret: None,
            timeout: 30,
        }
    }
}

/// Executes probe cases against a single target
#[derive(Debug, Clone)]
pub struct ProbeRunner {
    client: Client,
    config: RunnerConfig,
}

impl ProbeRunner {
    /// Create a new runner with the given configuration
    pub fn new(config: RunnerConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()
            .map_err(|e| Error::transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Enforce the plan's secret policy before any request is sent
    pub fn check_secret(&self, plan: &ProbePlan) -> Result<()> {
        if plan.secret_policy == SecretPolicy::Required && self.config.secret.is_none() {
            return Err(Error::config(format!(
                "plan '{}' requires a shared secret; set {} or pass --secret",
                plan.name,
                plan.secret_env.join(" or ")
            )));
        }
        Ok(())
    }

    /// Run every case of a plan in order, invoking `on_report` immediately
    /// after each case so results scroll as they complete.
    pub async fn run_plan<F>(&self, plan: &ProbePlan, mut on_report: F) -> Result<Vec<ProbeReport>>
    where
        F: FnMut(&ProbeReport),
    {
        self.check_secret(plan)?;

        let mut reports = Vec::with_capacity(plan.cases.len());
        for case in &plan.cases {
            let report = self.run_case(case).await?;
            on_report(&report);
            reports.push(report);
        }
        Ok(reports)
    }

    /// Execute one case and classify the outcome.
    ///
    /// Cases whose auth needs a secret are skipped (not failed) when none is
    /// configured; callers relying on a mandatory secret go through
    /// [`ProbeRunner::check_secret`] first.
    pub async fn run_case(&self, case: &ProbeCase) -> Result<ProbeReport> {
        if case.auth.requires_secret() && self.config.secret.is_none() {
            debug!(case = case.name, "no secret configured, skipping");
            return Ok(ProbeReport::skipped(case.name, "no secret configured"));
        }

        let url = format!("{}{}", self.config.base_url, case.path);
        debug!(case = case.name, "{} {}", case.method, url);

        let mut request = self.client.request(case.method.clone(), &url);
        if !case.query.is_empty() {
            request = request.query(&case.query);
        }

        // The signature covers the exact bytes transmitted below, so the
        // literal body string is signed here and attached unchanged.
        let body = case.body.as_deref().unwrap_or("");
        match &case.auth {
            CaseAuth::None => {}
            CaseAuth::SignedBody => {
                let signature = signing::signature_hex(self.secret()?, body.as_bytes())?;
                request = request.header("X-Signature", signature);
            }
            CaseAuth::SignedBodyV2 => {
                let secret = self.secret()?;
                let ts = Utc::now().timestamp();
                let v1 = signing::signature_hex(secret, body.as_bytes())?;
                let v2 = signing::timestamped_signature_hex(secret, ts, body)?;
                request = request
                    .header("X-Signature", v1)
                    .header("X-Signature-V2", v2)
                    .header("X-Signature-Ts", ts.to_string())
                    .header("Idempotency-Key", Uuid::new_v4().to_string())
                    .header("X-Correlation-Id", Uuid::new_v4().simple().to_string());
            }
            CaseAuth::SecretHeader(header) => {
                request = request.header(*header, self.secret()?);
            }
        }

        if let Some(body) = &case.body {
            trace!(case = case.name, "request body: {}", body);
            request = request.header(CONTENT_TYPE, "application/json").body(body.clone());
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                debug!(case = case.name, error = %e, "request did not complete");
                return Ok(ProbeReport::unreachable(case.name, e.to_string()));
            }
        };

        let status = response.status();
        debug!(case = case.name, "response status: {}", status);

        match case.expect {
            Expect::StatusOk => {
                if status == StatusCode::OK {
                    Ok(ProbeReport::passed(case.name))
                } else {
                    Ok(ProbeReport::failed(case.name, status.as_u16()))
                }
            }
            Expect::OkField => {
                let raw = response.text().await.map_err(|e| {
                    Error::transport(format!("Failed to read {} response body: {}", case.name, e))
                })?;
                trace!(case = case.name, "response body: {}", raw);

                let value: serde_json::Value = serde_json::from_str(&raw).map_err(|_| {
                    Error::invalid_response(format!("{} {}", case.method, case.path), &raw)
                })?;

                if value.get("ok").is_some_and(truthy) {
                    Ok(ProbeReport::passed(case.name).with_detail(value))
                } else {
                    Ok(ProbeReport::failed(case.name, status.as_u16()).with_detail(value))
                }
            }
        }
    }

    fn secret(&self) -> Result<&str> {
        self.config
            .secret
            .as_deref()
            .ok_or_else(|| Error::config("secret required but not configured"))
    }
}

/// Truthiness of a JSON value, matching what the probed backends report:
/// `false`, `null`, `0`, `""`, `[]` and `{}` are all falsy.
fn truthy(value: &serde_json::Value) -> bool {
    use serde_json::Value;
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::case::Verdict;
    use serde_json::json;

    #[test]
    fn test_runner_config_default() {
        let config = RunnerConfig::default();
        assert_eq!(config.base_url, "http://localhost:8000");
        assert!(config.secret.is_none());
        assert_eq!(config.timeout, 30);
    }

    #[test]
    fn test_runner_creation() {
        let config = RunnerConfig {
            base_url: "http://example.com".to_string(),
            secret: Some("testsecret".to_string()),
            timeout: 10,
        };
        let runner = ProbeRunner::new(config).unwrap();
        assert_eq!(runner.base_url(), "http://example.com");
    }

    #[test]
    fn test_check_secret_required_without_secret() {
        let runner = ProbeRunner::new(RunnerConfig::default()).unwrap();
        let plan = ProbePlan::executor("AAPL").unwrap();
        let err = runner.check_secret(&plan).unwrap_err();
        assert!(err.to_string().contains("BARRY_SHARED_SECRET"));
    }

    #[test]
    fn test_check_secret_optional_without_secret() {
        let runner = ProbeRunner::new(RunnerConfig::default()).unwrap();
        let plan = ProbePlan::legacy("AAPL").unwrap();
        assert!(runner.check_secret(&plan).is_ok());
    }

    #[tokio::test]
    async fn test_signed_case_skipped_without_secret() {
        let runner = ProbeRunner::new(RunnerConfig::default()).unwrap();
        let plan = ProbePlan::legacy("AAPL").unwrap();
        let intent = plan.cases.iter().find(|c| c.name == "INTENT").unwrap();

        // No request is sent: the skip happens before any network I/O, so
        // this passes with no server listening.
        let report = runner.run_case(intent).await.unwrap();
        assert_eq!(report.verdict, Verdict::Skip("no secret configured".to_string()));
    }

    #[test]
    fn test_truthy() {
        assert!(truthy(&json!(true)));
        assert!(truthy(&json!(1)));
        assert!(truthy(&json!("up")));
        assert!(!truthy(&json!(false)));
        assert!(!truthy(&json!(null)));
        assert!(!truthy(&json!(0)));
        assert!(!truthy(&json!("")));
        assert!(!truthy(&json!({})));
    }
}
