//! Relay logic
//!
//! The non-HTTP parts of the scan pipeline: classifier client, verdict
//! normalization, page text extraction, the keyword fallback and dashboard
//! deep links.

pub mod classifier;
pub mod verdict;
pub mod extract;
pub mod fallback;
pub mod deep_link;
