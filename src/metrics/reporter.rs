//! Remote metric reporting.
//!
//! One synchronous POST per round to the aggregator. The call is
//! best-effort: by the time it runs, the snapshot and history are already
//! durable, so every transport failure is folded into an explicit
//! `ReportOutcome` for the caller to log and assert on - it never rolls
//! back local state and never aborts the round.

use serde::Serialize;

use super::MetricsRecord;

/// Wire payload for the aggregator.
#[derive(Debug, Clone, Serialize)]
pub struct ReportPayload {
    pub client_id: String,
    pub round: u64,
    pub accuracy: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auc: Option<f64>,
    pub model: String,
}

/// Explicit result of one report attempt.
#[derive(Debug, Clone)]
pub struct ReportOutcome {
    pub delivered: bool,
    /// HTTP status when the server answered at all.
    pub status: Option<u16>,
    /// Response body on success, error description otherwise.
    pub detail: String,
}

/// Sends one round's metrics. Never returns an error; the outcome says
/// what happened.
pub fn post_metrics(url: &str, client_id: &str, record: &MetricsRecord) -> ReportOutcome {
    let payload = ReportPayload {
        client_id: client_id.to_string(),
        round: record.round,
        accuracy: record.accuracy,
        auc: record.auc,
        model: record.model_kind.clone(),
    };

    let body = match serde_json::to_string(&payload) {
        Ok(b) => b,
        Err(e) => {
            // Serializing a plain struct of numbers cannot realistically
            // fail, but the outcome contract still holds if it does.
            return ReportOutcome {
                delivered: false,
                status: None,
                detail: format!("payload serialization failed: {}", e),
            };
        }
    };

    let response = ureq::post(url)
        .set("Content-Type", "application/json")
        .send_string(&body);

    match response {
        Ok(resp) => {
            let status = resp.status();
            let text = resp.into_string().unwrap_or_default();
            log::info!("Report POST: status {}, body: {}", status, text);
            ReportOutcome {
                delivered: true,
                status: Some(status),
                detail: text,
            }
        }
        Err(ureq::Error::Status(code, resp)) => {
            let text = resp.into_string().unwrap_or_default();
            log::warn!("Report rejected: status {}, body: {}", code, text);
            ReportOutcome {
                delivered: false,
                status: Some(code),
                detail: text,
            }
        }
        Err(e) => {
            log::warn!("Report POST failed: {}", e);
            ReportOutcome {
                delivered: false,
                status: None,
                detail: e.to_string(),
            }
        }
    }
}
