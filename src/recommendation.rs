//! Output shapes for the ranking engine: priority tiers, ranked entries and
//! the full result returned by the API. This is the shape the
//! `/api/recommendations` endpoint serializes.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::TierBoundaries;
use crate::notify::SmsAlert;
use crate::scoring::ScoreBreakdown;

/// Human-facing classification derived from the final numeric score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

impl Priority {
    /// Deterministic, non-overlapping partition of [0,100]. Boundary values
    /// map to the higher tier.
    pub fn from_score(score: f64, tiers: &TierBoundaries) -> Self {
        if score >= tiers.critical {
            Priority::Critical
        } else if score >= tiers.high {
            Priority::High
        } else if score >= tiers.medium {
            Priority::Medium
        } else {
            Priority::Low
        }
    }
}

/// One service with its computed score, tier and justification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedService {
    pub service_id: i64,
    pub service_name: String,
    pub days_left: i64,
    pub final_score: f64,
    pub priority: Priority,
    /// Ordered, human-readable justification. Empty when no threshold rule
    /// fires; that is a valid state, not an error.
    pub reasons: Vec<String>,
    pub breakdown: ScoreBreakdown,
}

/// Per-tier counts over the whole scored set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PriorityCounts {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

/// Statistical summary over all scored services (pre-truncation).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub total_services: usize,
    pub urgent_services: usize,
    pub priority_breakdown: PriorityCounts,
    pub average_score: f64,
}

/// Full response body for one ranking request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationResult {
    pub status: &'static str,
    pub user_id: i64,
    pub user_name: String,
    pub total_services: usize,
    /// Descending by final_score, stable by input order, truncated to top_n.
    pub recommendations: Vec<RankedService>,
    /// First ranked entry; absent when the input service list is empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_recommendation: Option<RankedService>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sms_alerts: Vec<SmsAlert>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<Summary>,
    pub generated_at: DateTime<Utc>,
}
