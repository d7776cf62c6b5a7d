//! Page text extraction policy
//!
//! Pure policy over a `PageCapture` snapshot shipped by the content script
//! with a forced-analysis request. Extraction never fails and has no side
//! effects; analysis only ever happens on an explicit user request, so
//! there is no automatic or periodic extraction path.

use serde::{Deserialize, Serialize};

/// Hosts whose mail-container regions are searched before anything else.
pub const WEBMAIL_HOSTS: &[&str] = &["mail.google.com"];

/// Minimum usable length for a webmail container region.
const MIN_REGION_CHARS: usize = 30;

/// Minimum usable length for a selection or focused input value.
const MIN_SNIPPET_CHARS: usize = 10;

/// Cap on the last-resort full-body extraction, to bound payload size.
const BODY_CAP_CHARS: usize = 15_000;

/// Snapshot of the candidate text sources on a page, in the order the
/// content script found them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageCapture {
    pub host: String,
    /// Candidate mail-container regions, in selector priority order.
    #[serde(default)]
    pub mail_regions: Vec<MailRegion>,
    #[serde(default)]
    pub selection: Option<String>,
    #[serde(default)]
    pub focused_input: Option<String>,
    #[serde(default)]
    pub body_text: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MailRegion {
    #[serde(default = "default_visible")]
    pub visible: bool,
    pub text: String,
}

fn default_visible() -> bool {
    true
}

fn is_webmail_host(host: &str) -> bool {
    WEBMAIL_HOSTS.iter().any(|known| host.contains(known))
}

fn usable(text: &str, min_chars: usize) -> Option<&str> {
    let trimmed = text.trim();
    (trimmed.chars().count() > min_chars).then_some(trimmed)
}

fn cap_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Extract the best text from a capture. Priority: webmail container,
/// then selection, then focused input. Returns `None` when nothing usable
/// is present.
pub fn extract(capture: &PageCapture) -> Option<String> {
    if is_webmail_host(&capture.host) {
        let region_text = capture
            .mail_regions
            .iter()
            .filter(|region| region.visible)
            .find_map(|region| usable(&region.text, MIN_REGION_CHARS));
        if let Some(text) = region_text {
            return Some(text.to_string());
        }
    }

    if let Some(text) = capture.selection.as_deref().and_then(|s| usable(s, MIN_SNIPPET_CHARS)) {
        return Some(text.to_string());
    }

    capture
        .focused_input
        .as_deref()
        .and_then(|s| usable(s, MIN_SNIPPET_CHARS))
        .map(str::to_string)
}

/// Forced extraction: the normal policy, then the page's full visible body
/// text as a last resort, capped to bound the classifier payload.
pub fn extract_forced(capture: &PageCapture) -> Option<String> {
    if let Some(text) = extract(capture) {
        return Some(text);
    }

    capture
        .body_text
        .as_deref()
        .map(str::trim)
        .filter(|body| !body.is_empty())
        .map(|body| cap_chars(body, BODY_CAP_CHARS).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gmail_capture(region_text: &str) -> PageCapture {
        PageCapture {
            host: "mail.google.com".to_string(),
            mail_regions: vec![MailRegion {
                visible: true,
                text: region_text.to_string(),
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_webmail_region_wins_over_selection() {
        let mut capture = gmail_capture(
            "Dear customer, your invoice is attached to this message today.",
        );
        capture.selection = Some("some shorter selected text".to_string());

        let text = extract(&capture).unwrap();
        assert!(text.starts_with("Dear customer"));
    }

    #[test]
    fn test_hidden_or_short_regions_are_skipped() {
        let capture = PageCapture {
            host: "mail.google.com".to_string(),
            mail_regions: vec![
                MailRegion {
                    visible: false,
                    text: "hidden but plenty long enough to pass the length check".to_string(),
                },
                MailRegion {
                    visible: true,
                    text: "too short".to_string(),
                },
            ],
            selection: Some("this selection is long enough".to_string()),
            ..Default::default()
        };

        assert_eq!(
            extract(&capture).unwrap(),
            "this selection is long enough"
        );
    }

    #[test]
    fn test_selection_minimum_length() {
        let capture = PageCapture {
            host: "example.com".to_string(),
            selection: Some("ten chars!".to_string()),
            ..Default::default()
        };
        // Exactly 10 chars does not pass the strictly-greater check.
        assert!(extract(&capture).is_none());

        let capture = PageCapture {
            selection: Some("eleven chars".to_string()),
            ..Default::default()
        };
        assert_eq!(extract(&capture).unwrap(), "eleven chars");
    }

    #[test]
    fn test_focused_input_is_last_non_forced_source() {
        let capture = PageCapture {
            host: "example.com".to_string(),
            focused_input: Some("  a draft reply typed into a textarea  ".to_string()),
            ..Default::default()
        };

        assert_eq!(
            extract(&capture).unwrap(),
            "a draft reply typed into a textarea"
        );
    }

    #[test]
    fn test_empty_capture_yields_nothing() {
        // Scenario: empty selection, no focused input, non-webmail host,
        // forced body fallback not requested.
        let capture = PageCapture {
            host: "example.com".to_string(),
            ..Default::default()
        };

        assert!(extract(&capture).is_none());
    }

    #[test]
    fn test_forced_extraction_caps_body_text() {
        let capture = PageCapture {
            host: "example.com".to_string(),
            body_text: Some("x".repeat(20_000)),
            ..Default::default()
        };

        let text = extract_forced(&capture).unwrap();
        assert_eq!(text.chars().count(), 15_000);
    }

    #[test]
    fn test_forced_extraction_prefers_normal_policy() {
        let capture = PageCapture {
            host: "example.com".to_string(),
            selection: Some("a perfectly good selection".to_string()),
            body_text: Some("body text that should not be used".to_string()),
            ..Default::default()
        };

        assert_eq!(
            extract_forced(&capture).unwrap(),
            "a perfectly good selection"
        );
    }
}
