//! Local fallback heuristic
//!
//! Keyword-rule analysis used only when the remote classifier is
//! unreachable. Substring matching against the lowercased text; matched
//! rules merge into one scan with risk precedence high > medium > safe.

use crate::models::{self, AnalysisRule, DangerousPhrase, RiskLevel, Scan};

/// Confidence assigned when no rule matches (0-100 scale).
const NO_MATCH_CONFIDENCE: u8 = 85;

/// Reason recorded when nothing matched.
const NO_MATCH_REASON: &str = "No known phishing patterns detected in the content.";

/// Analyze text against the static rule set and build a complete scan.
pub fn analyze_with_rules(text: &str, rules: &[AnalysisRule]) -> Scan {
    let lower = text.to_lowercase();
    let matched: Vec<&AnalysisRule> = rules
        .iter()
        .filter(|rule| lower.contains(&rule.keyword.to_lowercase()))
        .collect();

    let mut risk_level = RiskLevel::Safe;
    let confidence: u8;
    let mut reasons: Vec<String> = Vec::new();
    let mut techniques: Vec<String> = Vec::new();
    let mut dangerous_phrases: Vec<DangerousPhrase> = Vec::new();

    if !matched.is_empty() {
        if matched.iter().any(|r| r.risk_level == RiskLevel::High) {
            risk_level = RiskLevel::High;
        } else if matched.iter().any(|r| r.risk_level == RiskLevel::Medium) {
            risk_level = RiskLevel::Medium;
        }

        let max_rule_confidence = matched.iter().map(|r| r.confidence).max().unwrap_or(0);
        let boost = (matched.len() as u32) * 5;
        confidence = (max_rule_confidence as u32 + boost).min(99) as u8;

        for rule in &matched {
            for technique in &rule.techniques {
                if !techniques.contains(technique) {
                    techniques.push(technique.clone());
                }
            }
            for reason in &rule.reasons {
                if !reasons.contains(reason) {
                    reasons.push(reason.clone());
                }
            }
            dangerous_phrases.push(DangerousPhrase {
                text: rule.keyword.clone(),
                reason: rule
                    .reasons
                    .first()
                    .cloned()
                    .unwrap_or_else(|| "Suspicious pattern detected".to_string()),
            });
        }
    } else {
        reasons.push(NO_MATCH_REASON.to_string());
        confidence = NO_MATCH_CONFIDENCE;
    }

    Scan {
        id: models::new_scan_id(),
        sender: models::sender_from_text(text),
        sender_name: "Manual Entry".to_string(),
        subject: models::derive_subject(text),
        risk_level,
        confidence,
        timestamp: models::now_timestamp(),
        body: text.to_string(),
        dangerous_phrases,
        reasons,
        techniques,
        links: vec![],
        recommendation: recommendation_for(risk_level).to_string(),
        llm_analysis: None,
    }
}

fn recommendation_for(risk: RiskLevel) -> &'static str {
    match risk {
        RiskLevel::High => {
            "This content contains high-risk phishing patterns. Do not interact \
             with any links or provide personal information."
        }
        RiskLevel::Medium => {
            "This content contains some suspicious patterns. Verify the sender \
             before taking any action."
        }
        RiskLevel::Safe => "No significant phishing indicators found. Exercise normal caution.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bundled_rules() -> Vec<AnalysisRule> {
        serde_json::from_str(include_str!("../../data/analysis-rules.json")).unwrap()
    }

    #[test]
    fn test_suspension_threat_is_high_risk() {
        let scan = analyze_with_rules(
            "Your account will be suspended, verify immediately",
            &bundled_rules(),
        );

        assert_eq!(scan.risk_level, RiskLevel::High);
        assert!(!scan.reasons.is_empty());
        assert!(scan.reasons.iter().any(|r| {
            let r = r.to_lowercase();
            r.contains("urgen") || r.contains("suspension") || r.contains("threat")
        }));
        assert!(!scan.dangerous_phrases.is_empty());
        assert!(scan.techniques.iter().any(|t| t == "urgency"));
        assert!(scan.confidence > 80);
    }

    #[test]
    fn test_benign_text_is_safe_with_default_reason() {
        let scan = analyze_with_rules("Meeting moved to 3pm", &bundled_rules());

        assert_eq!(scan.risk_level, RiskLevel::Safe);
        assert_eq!(scan.reasons, vec![NO_MATCH_REASON.to_string()]);
        assert_eq!(scan.confidence, NO_MATCH_CONFIDENCE);
        assert!(scan.dangerous_phrases.is_empty());
        assert!(scan.techniques.is_empty());
    }

    #[test]
    fn test_medium_rules_without_high_stay_medium() {
        let rules = vec![AnalysisRule {
            keyword: "click here".to_string(),
            risk_level: RiskLevel::Medium,
            confidence: 58,
            reasons: vec!["Generic call-to-action link".to_string()],
            techniques: vec!["link manipulation".to_string()],
            recommendation: String::new(),
        }];

        let scan = analyze_with_rules("Please click here to continue", &rules);
        assert_eq!(scan.risk_level, RiskLevel::Medium);
        assert_eq!(scan.confidence, 63);
    }

    #[test]
    fn test_confidence_caps_at_99() {
        let rules: Vec<AnalysisRule> = (0..10)
            .map(|i| AnalysisRule {
                keyword: format!("word{}", i),
                risk_level: RiskLevel::High,
                confidence: 90,
                reasons: vec![format!("reason {}", i)],
                techniques: vec![],
                recommendation: String::new(),
            })
            .collect();

        let text = (0..10).map(|i| format!("word{}", i)).collect::<Vec<_>>().join(" ");
        let scan = analyze_with_rules(&text, &rules);
        assert_eq!(scan.confidence, 99);
    }

    #[test]
    fn test_merged_reasons_and_techniques_are_deduplicated() {
        let rules = vec![
            AnalysisRule {
                keyword: "urgent".to_string(),
                risk_level: RiskLevel::High,
                confidence: 80,
                reasons: vec!["Pressure tactic".to_string()],
                techniques: vec!["urgency".to_string()],
                recommendation: String::new(),
            },
            AnalysisRule {
                keyword: "immediately".to_string(),
                risk_level: RiskLevel::Medium,
                confidence: 60,
                reasons: vec!["Pressure tactic".to_string()],
                techniques: vec!["urgency".to_string()],
                recommendation: String::new(),
            },
        ];

        let scan = analyze_with_rules("Act urgent and immediately", &rules);
        assert_eq!(scan.reasons, vec!["Pressure tactic".to_string()]);
        assert_eq!(scan.techniques, vec!["urgency".to_string()]);
        assert_eq!(scan.dangerous_phrases.len(), 2);
    }

    #[test]
    fn test_empty_rule_set_classifies_safe() {
        let scan = analyze_with_rules("verify your account immediately", &[]);
        assert_eq!(scan.risk_level, RiskLevel::Safe);
        assert_eq!(scan.reasons, vec![NO_MATCH_REASON.to_string()]);
    }
}
