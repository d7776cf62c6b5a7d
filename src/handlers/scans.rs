//! Scan store handlers

use axum::{extract::{Path, State}, Json};
use chrono::{DateTime, Local};
use serde::Serialize;

use crate::models::{RiskLevel, Scan};
use crate::{AppError, AppResult, AppState};

#[derive(Debug, Serialize)]
pub struct ScanStats {
    pub total: usize,
    pub high: usize,
    pub medium: usize,
    pub safe: usize,
    pub today: usize,
}

#[derive(Debug, Serialize)]
pub struct ClearResponse {
    pub cleared: bool,
}

/// List all scans, newest first
pub async fn list(State(state): State<AppState>) -> Json<Vec<Scan>> {
    Json(state.store.all())
}

/// Get single scan
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Scan>> {
    state
        .store
        .get(&id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Scan not found".to_string()))
}

/// Clear the whole store (there is no per-item deletion)
pub async fn clear(State(state): State<AppState>) -> AppResult<Json<ClearResponse>> {
    state.store.clear()?;
    tracing::info!("scan store cleared");
    Ok(Json(ClearResponse { cleared: true }))
}

/// Dashboard stats: totals per risk level plus scans from today
pub async fn stats(State(state): State<AppState>) -> Json<ScanStats> {
    let scans = state.store.all();
    let today = Local::now().date_naive();

    let count_level =
        |level: RiskLevel| scans.iter().filter(|s| s.risk_level == level).count();

    let today_count = scans
        .iter()
        .filter(|s| {
            DateTime::parse_from_rfc3339(&s.timestamp)
                .map(|ts| ts.with_timezone(&Local).date_naive() == today)
                .unwrap_or(false)
        })
        .count();

    Json(ScanStats {
        total: scans.len(),
        high: count_level(RiskLevel::High),
        medium: count_level(RiskLevel::Medium),
        safe: count_level(RiskLevel::Safe),
        today: today_count,
    })
}
