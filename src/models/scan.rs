//! Scan model
//!
//! The one persistent entity: a single analyzed piece of text and its
//! verdict. Field names serialize exactly as the dashboard stores them, so
//! existing scan history remains readable.

use chrono::{SecondsFormat, Utc};
use once_cell::sync::Lazy;
use rand::{distributions::Alphanumeric, Rng};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Subject is the first line of the source text, truncated past this length.
const SUBJECT_MAX: usize = 60;

/// Risk verdict levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    High,
    Medium,
    Safe,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::High => "high",
            RiskLevel::Medium => "medium",
            RiskLevel::Safe => "safe",
        }
    }

}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A keyword flagged by the fallback heuristic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DangerousPhrase {
    pub text: String,
    pub reason: String,
}

/// Per-link analysis (unused by the remote classifier path)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkAnalysis {
    pub display_text: String,
    pub actual_url: String,
    pub risk_level: RiskLevel,
    pub reason: String,
}

/// One persisted scan record. Created exactly once when a classification
/// response (or fallback result) is received; never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scan {
    pub id: String,
    pub sender: String,
    pub sender_name: String,
    pub subject: String,
    pub risk_level: RiskLevel,
    /// Canonical 0-100 scale; every producer converts at its boundary.
    pub confidence: u8,
    pub timestamp: String,
    pub body: String,
    #[serde(default)]
    pub dangerous_phrases: Vec<DangerousPhrase>,
    #[serde(default)]
    pub reasons: Vec<String>,
    #[serde(default)]
    pub techniques: Vec<String>,
    #[serde(default)]
    pub links: Vec<LinkAnalysis>,
    pub recommendation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub llm_analysis: Option<String>,
}

/// Generate a scan id: millisecond timestamp plus a random alphanumeric
/// suffix. Unique within the store for human-paced producers.
pub fn new_scan_id() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(6)
        .map(char::from)
        .collect();
    format!("{}{}", Utc::now().timestamp_millis(), suffix.to_lowercase())
}

/// ISO-8601 creation timestamp, millisecond precision.
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Derive a subject from the first line of the source text.
/// Lines longer than 60 characters are cut to 57 plus an ellipsis.
pub fn derive_subject(text: &str) -> String {
    let first_line = text
        .lines()
        .next()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .unwrap_or("Scanned content");

    if first_line.chars().count() > SUBJECT_MAX {
        let cut: String = first_line.chars().take(SUBJECT_MAX - 3).collect();
        format!("{}...", cut)
    } else {
        first_line.to_string()
    }
}

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\w.\-]+@[\w.\-]+\.\w+").expect("email regex"));

/// First email address found in the text, else the manual-entry placeholder.
pub fn sender_from_text(text: &str) -> String {
    EMAIL_RE
        .find(text)
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| "unknown@manual-entry.com".to_string())
}
