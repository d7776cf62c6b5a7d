//! Verdict normalization
//!
//! Maps the classifier's free-text label onto the risk enum and builds the
//! canonical scan record from a classifier response. The label mapping is a
//! substring heuristic over the remote system's own label; it lives in one
//! place so it can be swapped for a closed enum contract if the classifier
//! ever grows one.

use crate::logic::classifier::ClassifierResponse;
use crate::models::{self, RiskLevel, Scan};

/// Derive a risk level from a free-text classifier label.
/// Precedence: "spam" > "not" > default medium, case-insensitive.
pub fn risk_from_label(label: &str) -> RiskLevel {
    let label = label.to_lowercase();
    if label.contains("spam") {
        RiskLevel::High
    } else if label.contains("not") {
        RiskLevel::Safe
    } else {
        RiskLevel::Medium
    }
}

/// Confidence for a remote-classified scan, on the canonical 0-100 scale.
pub fn confidence_for(risk: RiskLevel) -> u8 {
    match risk {
        RiskLevel::High => 90,
        RiskLevel::Medium => 70,
        RiskLevel::Safe => 95,
    }
}

/// Build the scan record for an extension-originated analysis.
pub fn scan_from_classifier(message: &str, response: &ClassifierResponse) -> Scan {
    let risk = risk_from_label(response.label());
    let findings = response.findings();
    let recommended = response.recommended_action();

    Scan {
        id: models::new_scan_id(),
        sender: "extension".to_string(),
        sender_name: "PhishLens Extension".to_string(),
        subject: models::derive_subject(message),
        risk_level: risk,
        confidence: confidence_for(risk),
        timestamp: models::now_timestamp(),
        body: message.to_string(),
        dangerous_phrases: vec![],
        reasons: vec![],
        techniques: vec![],
        links: vec![],
        recommendation: recommended.to_string(),
        llm_analysis: (!findings.is_empty()).then(|| findings.to_string()),
    }
}

/// Build the scan record for a manual dashboard analysis. Unlike the
/// extension producer, this one extracts a sender address from the text and
/// splits the narrative findings into individual reasons.
pub fn scan_from_manual(message: &str, response: &ClassifierResponse) -> Scan {
    let risk = risk_from_label(response.label());
    let findings = response.findings();

    let reasons: Vec<String> = findings
        .split(['.', '\n'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    Scan {
        id: models::new_scan_id(),
        sender: models::sender_from_text(message),
        sender_name: "Remote Analysis".to_string(),
        subject: models::derive_subject(message),
        risk_level: risk,
        confidence: confidence_for(risk),
        timestamp: models::now_timestamp(),
        body: message.to_string(),
        dangerous_phrases: vec![],
        reasons,
        techniques: vec![],
        links: vec![],
        recommendation: response.recommended_action().to_string(),
        llm_analysis: (!findings.is_empty()).then(|| findings.to_string()),
    }
}
