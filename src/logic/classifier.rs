//! Classifier API client
//!
//! HTTP client for the external classification service. One network call
//! per analysis: no retry, no backoff. Any network failure, non-2xx status
//! or malformed body is a `ClassifierError` surfaced to the requester.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Classifier endpoint configuration
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
}

/// Classifier API client
pub struct ClassifierClient {
    config: ClassifierConfig,
    http_client: reqwest::Client,
}

// Request/Response types

#[derive(Debug, Serialize)]
struct AnalyzeMessageRequest<'a> {
    message: &'a str,
}

/// Raw classifier response. `analysis` arrives either as a structured
/// report or as a bare narrative string depending on the remote agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierResponse {
    #[serde(default)]
    pub model_prediction: String,
    #[serde(default)]
    pub analysis: Option<Analysis>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Analysis {
    Text(String),
    Structured(AnalysisReport),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    #[serde(default)]
    pub classification: String,
    #[serde(default)]
    pub analysis_findings: String,
    #[serde(default)]
    pub recommended_action: String,
}

impl ClassifierResponse {
    /// The label the verdict is derived from: the structured
    /// classification when present, else the bare model prediction.
    pub fn label(&self) -> &str {
        match &self.analysis {
            Some(Analysis::Structured(report)) if !report.classification.is_empty() => {
                &report.classification
            }
            _ => &self.model_prediction,
        }
    }

    /// Narrative findings, whichever shape they arrived in.
    pub fn findings(&self) -> &str {
        match &self.analysis {
            Some(Analysis::Text(text)) => text,
            Some(Analysis::Structured(report)) => &report.analysis_findings,
            None => "",
        }
    }

    /// Advisory text; a bare-string analysis carries none.
    pub fn recommended_action(&self) -> &str {
        match &self.analysis {
            Some(Analysis::Structured(report)) => &report.recommended_action,
            _ => "",
        }
    }
}

/// Classifier client errors
#[derive(Debug, Clone, Error)]
pub enum ClassifierError {
    #[error("network error: {0}")]
    Network(String),
    #[error("classifier returned status {0}")]
    Server(u16),
    #[error("parse error: {0}")]
    Parse(String),
}

impl ClassifierClient {
    /// Create new classifier client
    pub fn new(config: ClassifierConfig) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            config,
            http_client,
        }
    }

    /// Submit one message for classification. Exactly one attempt.
    pub async fn classify(&self, message: &str) -> Result<ClassifierResponse, ClassifierError> {
        let url = format!("{}/analyze_message", self.config.base_url);

        let response = self
            .http_client
            .post(&url)
            .json(&AnalyzeMessageRequest { message })
            .send()
            .await
            .map_err(|e| ClassifierError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ClassifierError::Server(response.status().as_u16()));
        }

        response
            .json()
            .await
            .map_err(|e| ClassifierError::Parse(e.to_string()))
    }
}
