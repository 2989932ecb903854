//! Probe case data model.
//!
//! A probe case is one outbound verification request plus the predicate
//! that classifies its outcome. Cases are immutable descriptions; running
//! one yields exactly one [`ProbeReport`].

use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};

/// Authentication attached to a probe case
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaseAuth {
    /// No client-side credentials
    None,

    /// `X-Signature: hex(HMAC-SHA256(secret, raw_body))`
    SignedBody,

    /// Timestamped v2 signature (`X-Signature-V2` / `X-Signature-Ts`) with
    /// the legacy `X-Signature` attached alongside, plus `Idempotency-Key`
    /// and `X-Correlation-Id` headers for the guard middleware.
    SignedBodyV2,

    /// Shared secret sent verbatim in the named header (e.g. `X-Exec-Secret`)
    SecretHeader(&'static str),
}

impl CaseAuth {
    /// Whether running this case needs the shared secret to be configured
    pub fn requires_secret(&self) -> bool {
        !matches!(self, CaseAuth::None)
    }
}

/// Expected-success predicate for a probe case
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expect {
    /// PASS iff the HTTP status is 200; the body is not inspected
    StatusOk,

    /// Parse the response body as JSON and PASS iff the `ok` field is
    /// truthy. A body that is not valid JSON is a hard error, not a FAIL.
    OkField,
}

/// One outbound verification request
#[derive(Debug, Clone)]
pub struct ProbeCase {
    /// Case name as printed in the report (e.g. `BARS`)
    pub name: &'static str,
    pub method: Method,
    /// Path relative to the base URL, without query parameters
    pub path: &'static str,
    pub query: Vec<(&'static str, String)>,
    /// Literal JSON body; the same string is signed and transmitted
    pub body: Option<String>,
    pub auth: CaseAuth,
    pub expect: Expect,
}

impl ProbeCase {
    /// Unauthenticated GET expecting a 200
    pub fn get(name: &'static str, path: &'static str) -> Self {
        Self {
            name,
            method: Method::GET,
            path,
            query: Vec::new(),
            body: None,
            auth: CaseAuth::None,
            expect: Expect::StatusOk,
        }
    }

    pub fn with_query(mut self, query: Vec<(&'static str, String)>) -> Self {
        self.query = query;
        self
    }

    pub fn with_expect(mut self, expect: Expect) -> Self {
        self.expect = expect;
        self
    }

    pub fn with_auth(mut self, auth: CaseAuth) -> Self {
        self.auth = auth;
        self
    }

    /// POST with a literal JSON body
    pub fn post(name: &'static str, path: &'static str, body: String, auth: CaseAuth) -> Self {
        Self {
            name,
            method: Method::POST,
            path,
            query: Vec::new(),
            body: Some(body),
            auth,
            expect: Expect::StatusOk,
        }
    }
}

/// Outcome classification for one executed case
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Pass,
    /// Non-200 status (or falsy `ok` field), with the observed status code
    Fail(u16),
    /// The request never produced an HTTP status (connect error, timeout)
    Unreachable(String),
    /// Case not sent, with the reason (e.g. no secret configured)
    Skip(String),
}

impl Verdict {
    pub fn is_pass(&self) -> bool {
        matches!(self, Verdict::Pass)
    }

    pub fn is_skip(&self) -> bool {
        matches!(self, Verdict::Skip(_))
    }
}

/// Result of running one probe case, immutable once computed
#[derive(Debug, Clone)]
pub struct ProbeReport {
    pub name: &'static str,
    pub verdict: Verdict,
    /// Parsed response payload, populated for `OkField` cases
    pub detail: Option<serde_json::Value>,
}

impl ProbeReport {
    pub fn passed(name: &'static str) -> Self {
        Self { name, verdict: Verdict::Pass, detail: None }
    }

    pub fn failed(name: &'static str, status: u16) -> Self {
        Self { name, verdict: Verdict::Fail(status), detail: None }
    }

    pub fn unreachable(name: &'static str, reason: String) -> Self {
        Self { name, verdict: Verdict::Unreachable(reason), detail: None }
    }

    pub fn skipped(name: &'static str, reason: &str) -> Self {
        Self { name, verdict: Verdict::Skip(reason.to_string()), detail: None }
    }

    pub fn with_detail(mut self, detail: serde_json::Value) -> Self {
        self.detail = Some(detail);
        self
    }
}

/// Order-intent request body.
///
/// Serialized exactly once via [`IntentBody::to_literal`]; the resulting
/// string is what gets signed and transmitted. `dry_run` is always true for
/// probing so the backend validates without executing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentBody {
    pub symbol: String,
    pub side: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qty: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notional: Option<f64>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub order_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit_price: Option<f64>,
    pub time_in_force: String,
    pub dry_run: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    pub meta: serde_json::Value,
}

impl IntentBody {
    /// Market buy for a fixed share quantity
    pub fn market_qty(symbol: &str, qty: i64, client_id: String) -> Self {
        Self {
            symbol: symbol.to_string(),
            side: "buy".to_string(),
            qty: Some(qty),
            notional: None,
            order_type: Some("market".to_string()),
            limit_price: None,
            time_in_force: "day".to_string(),
            dry_run: true,
            client_id: Some(client_id),
            meta: serde_json::json!({ "source": "tradeprobe" }),
        }
    }

    /// Implicit market buy sized by notional value
    pub fn notional(symbol: &str, notional: f64, client_id: String) -> Self {
        Self {
            symbol: symbol.to_string(),
            side: "buy".to_string(),
            qty: None,
            notional: Some(notional),
            order_type: None,
            limit_price: None,
            time_in_force: "day".to_string(),
            dry_run: true,
            client_id: Some(client_id),
            meta: serde_json::json!({ "source": "tradeprobe" }),
        }
    }

    /// Serialize into the literal body string used for signing and sending
    pub fn to_literal(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| Error::serialization(e, "intent body".to_string()))
    }
}
