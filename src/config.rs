//! Configuration module

use std::env;
use std::path::PathBuf;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Relay listen port
    pub port: u16,

    /// Base URL of the remote classification service
    pub classifier_url: String,

    /// Timeout for a single classification call, in seconds
    pub classifier_timeout_seconds: u64,

    /// Base URL of the dashboard web app (for deep links)
    pub dashboard_url: String,

    /// Path of the persisted scan store document
    pub store_path: PathBuf,

    /// Path of the fallback analysis rules file
    pub rules_path: PathBuf,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(7300),

            classifier_url: env::var("CLASSIFIER_URL")
                .unwrap_or_else(|_| "http://localhost:5000".to_string()),

            classifier_timeout_seconds: env::var("CLASSIFIER_TIMEOUT_SECS")
                .ok()
                .and_then(|t| t.parse().ok())
                .unwrap_or(30),

            dashboard_url: env::var("DASHBOARD_URL")
                .unwrap_or_else(|_| "http://localhost:8080".to_string()),

            store_path: env::var("STORE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("phishlens-store.json")),

            rules_path: env::var("RULES_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data/analysis-rules.json")),
        }
    }
}
