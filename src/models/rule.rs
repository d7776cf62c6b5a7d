//! Analysis rule model
//!
//! Static keyword rules for the local fallback heuristic, loaded from a side
//! file. Only consulted when the remote classifier is unreachable.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::scan::RiskLevel;

/// One keyword rule: substring match against the lowercased message text.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRule {
    pub keyword: String,
    pub risk_level: RiskLevel,
    /// 0-100, same canonical scale as scans.
    pub confidence: u8,
    #[serde(default)]
    pub reasons: Vec<String>,
    #[serde(default)]
    pub techniques: Vec<String>,
    #[serde(default)]
    pub recommendation: String,
}

/// Load the rule set from disk. A missing or unreadable file degrades to an
/// empty set, so analysis still works (everything classifies safe with the
/// default message).
pub fn load_rules(path: &Path) -> Vec<AnalysisRule> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            tracing::warn!("analysis rules not loaded from {}: {}", path.display(), e);
            return Vec::new();
        }
    };

    match serde_json::from_str::<Vec<AnalysisRule>>(&content) {
        Ok(rules) => {
            tracing::info!("Loaded {} analysis rules from {}", rules.len(), path.display());
            rules
        }
        Err(e) => {
            tracing::warn!("analysis rules file {} is malformed: {}", path.display(), e);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_rules_parse() {
        let rules: Vec<AnalysisRule> =
            serde_json::from_str(include_str!("../../data/analysis-rules.json")).unwrap();
        assert!(!rules.is_empty());
        assert!(rules.iter().all(|r| r.confidence <= 100));
        assert!(rules.iter().all(|r| !r.keyword.is_empty()));
    }

    #[test]
    fn test_missing_rules_file_degrades_to_empty() {
        let rules = load_rules(Path::new("no/such/file.json"));
        assert!(rules.is_empty());
    }
}
