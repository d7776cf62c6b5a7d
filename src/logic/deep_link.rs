//! Dashboard deep links
//!
//! Hands a scan off to the dashboard detail route without relying on store
//! synchronization: the scan JSON travels base64-encoded (over UTF-8 bytes)
//! and percent-encoded in a query parameter.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};

use crate::models::Scan;

/// Encode a scan for the `?scan=` query parameter.
pub fn encode_scan(scan: &Scan) -> Result<String, serde_json::Error> {
    let json = serde_json::to_string(scan)?;
    let b64 = BASE64.encode(json.as_bytes());
    Ok(urlencoding::encode(&b64).into_owned())
}

/// Decode a `?scan=` query parameter back into a scan.
pub fn decode_scan(param: &str) -> Option<Scan> {
    let b64 = urlencoding::decode(param).ok()?;
    let bytes = BASE64.decode(b64.as_bytes()).ok()?;
    serde_json::from_slice(&bytes).ok()
}

/// Full detail URL for a scan on the dashboard.
pub fn detail_url(dashboard_url: &str, scan: &Scan) -> Option<String> {
    match encode_scan(scan) {
        Ok(encoded) => Some(format!(
            "{}/scans?scan={}",
            dashboard_url.trim_end_matches('/'),
            encoded
        )),
        Err(e) => {
            tracing::warn!("failed to encode scan for deep link: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{self, RiskLevel};

    fn sample_scan() -> Scan {
        Scan {
            id: models::new_scan_id(),
            sender: "extension".to_string(),
            sender_name: "PhishLens Extension".to_string(),
            subject: "Überfällige Rechnung...".to_string(),
            risk_level: RiskLevel::High,
            confidence: 90,
            timestamp: models::now_timestamp(),
            body: "Non-ASCII body: über, ça, 電子メール".to_string(),
            dangerous_phrases: vec![],
            reasons: vec!["Urgent tone".to_string()],
            techniques: vec!["urgency".to_string()],
            links: vec![],
            recommendation: "Do not click".to_string(),
            llm_analysis: Some("**bold** finding".to_string()),
        }
    }

    #[test]
    fn test_deep_link_round_trip() {
        let scan = sample_scan();
        let encoded = encode_scan(&scan).unwrap();
        let decoded = decode_scan(&encoded).unwrap();
        assert_eq!(decoded, scan);
    }

    #[test]
    fn test_detail_url_shape() {
        let url = detail_url("http://localhost:8080/", &sample_scan()).unwrap();
        assert!(url.starts_with("http://localhost:8080/scans?scan="));
        // The parameter must survive URL embedding: no raw '+' or '/'.
        let param = url.split("scan=").nth(1).unwrap();
        assert!(!param.contains('+'));
        assert!(!param.contains('/'));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode_scan("not-base64-json").is_none());
        assert!(decode_scan("").is_none());
    }
}
