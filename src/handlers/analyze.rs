//! Analysis handlers
//!
//! The relay's coordination core. One classifier call per request; on
//! success the result fans out three ways - reply to the requester,
//! broadcast to subscribed popups, best-effort write into the scan store.
//! The three are independent side effects, not a transaction.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::logic::classifier::ClassifierResponse;
use crate::logic::{deep_link, extract, fallback, verdict};
use crate::logic::extract::PageCapture;
use crate::models::Scan;
use crate::{AppError, AppResult, AppState};
use super::events::ScanEvent;

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageAnalyzeRequest {
    pub capture: PageCapture,
    /// Allow the capped full-body text as a last resort.
    #[serde(default)]
    pub allow_body_fallback: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<ClassifierResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scan: Option<Scan>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail_url: Option<String>,
}

impl AnalyzeResponse {
    fn failed(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(error.into()),
            message: None,
            scan: None,
            detail_url: None,
        }
    }
}

/// Analyze text submitted by a content script or the popup.
pub async fn analyze(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeRequest>,
) -> Json<AnalyzeResponse> {
    Json(run_analysis(&state, req.message).await)
}

/// Forced analysis of a page capture: run the extraction policy first,
/// then the normal analysis path. No usable text means no classifier call.
pub async fn analyze_page(
    State(state): State<AppState>,
    Json(req): Json<PageAnalyzeRequest>,
) -> Json<AnalyzeResponse> {
    let text = if req.allow_body_fallback {
        extract::extract_forced(&req.capture)
    } else {
        extract::extract(&req.capture)
    };

    match text {
        Some(text) => Json(run_analysis(&state, text).await),
        None => {
            tracing::debug!("no usable text found in page capture from {}", req.capture.host);
            Json(AnalyzeResponse::failed("no_text_found"))
        }
    }
}

/// Manual analysis from the dashboard. Classifier first; when it is
/// unreachable the local keyword rules produce the scan instead. Either
/// way the scan is persisted and returned.
pub async fn analyze_manual(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeRequest>,
) -> AppResult<Json<Scan>> {
    let message = req.message.trim();
    if message.is_empty() {
        return Err(AppError::ValidationError(
            "missing 'message' in request body".to_string(),
        ));
    }

    let scan = match state.classifier.classify(message).await {
        Ok(data) => verdict::scan_from_manual(message, &data),
        Err(e) => {
            tracing::warn!("classifier unreachable, falling back to keyword rules: {}", e);
            fallback::analyze_with_rules(message, &state.rules)
        }
    };

    state.store.add(scan.clone())?;

    Ok(Json(scan))
}

/// Single-flight analysis: exactly one classifier call per request.
pub(crate) async fn run_analysis(state: &AppState, message: String) -> AnalyzeResponse {
    tracing::debug!("analyze request received (len={})", message.len());

    let data = match state.classifier.classify(&message).await {
        Ok(data) => data,
        Err(e) => {
            tracing::warn!("classification failed: {}", e);
            return AnalyzeResponse::failed(e.to_string());
        }
    };

    let scan = verdict::scan_from_classifier(&message, &data);
    let detail_url = deep_link::detail_url(&state.config.dashboard_url, &scan);

    // Broadcast so an open popup can render the same result. No
    // subscribers is the common case and not an error.
    let event = ScanEvent {
        result: data.clone(),
        message: message.clone(),
        scan: scan.clone(),
        detail_url: detail_url.clone(),
    };
    if state.events.send(event).is_err() {
        tracing::debug!("no subscribers for result broadcast");
    }

    // Best-effort store write: logged, never surfaced, never retried.
    if let Err(e) = state.store.add(scan.clone()) {
        tracing::warn!("scan store write failed: {}", e);
    }

    AnalyzeResponse {
        ok: true,
        data: Some(data),
        error: None,
        message: Some(message),
        scan: Some(scan),
        detail_url,
    }
}
