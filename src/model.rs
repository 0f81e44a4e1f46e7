//! Input model for a single ranking request, plus boundary validation.
//!
//! The scoring core assumes every structure here has already passed
//! `RecommendationRequest::validate`; it only keeps numeric clamping as
//! defense-in-depth. Unknown enum values and missing fields never get past
//! serde, so the core never branches on malformed input.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default number of recommendations when the caller omits `top_n`.
pub const DEFAULT_TOP_N: usize = 5;

/// Coarse engagement signal from the user profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Low,
    Medium,
    High,
}

/// Whether the service is currently in a period of elevated demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Seasonality {
    InSeason,
    OffSeason,
}

/// User profile. Immutable input for one request, no lifecycle beyond it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub activity_level: ActivityLevel,
    /// Contact phone; presence is required, format is checked loosely only at
    /// the SMS payload layer.
    pub phone: String,
}

/// One pending government service obligation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    #[serde(rename = "service_id")]
    pub id: i64,
    pub name: String,
    /// Days until expiry; zero or negative means overdue.
    pub days_left: i64,
    pub seasonality: Seasonality,
    /// Pre-assigned weight of the service category, expected in [0,1].
    pub category_importance: f64,
}

/// Request body for `POST /api/recommendations`.
#[derive(Debug, Clone, Deserialize)]
pub struct RecommendationRequest {
    pub user: User,
    #[serde(default)]
    pub services: Vec<Service>,
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

fn default_top_n() -> usize {
    DEFAULT_TOP_N
}

/// Everything that can be wrong with an otherwise well-formed request body.
/// Raised at the boundary; the core never sees these states.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("top_n must be at least 1")]
    NonPositiveTopN,
    #[error("user name must not be blank")]
    BlankUserName,
    #[error("user phone must be present")]
    MissingPhone,
    #[error("service {0} has a blank name")]
    BlankServiceName(i64),
    #[error("service {0} has a non-finite category_importance")]
    NonFiniteImportance(i64),
}

impl RecommendationRequest {
    /// Boundary check. Out-of-range `category_importance` is NOT an error here;
    /// the calculator clamps it (validated schema upstream, cheap to guard).
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.top_n < 1 {
            return Err(ValidationError::NonPositiveTopN);
        }
        if self.user.name.trim().is_empty() {
            return Err(ValidationError::BlankUserName);
        }
        if self.user.phone.trim().is_empty() {
            return Err(ValidationError::MissingPhone);
        }
        for s in &self.services {
            if s.name.trim().is_empty() {
                return Err(ValidationError::BlankServiceName(s.id));
            }
            if !s.category_importance.is_finite() {
                return Err(ValidationError::NonFiniteImportance(s.id));
            }
        }
        Ok(())
    }
}
