//! Scoring configuration: weights, thresholds, tier boundaries and the urgency
//! curve as explicit constants rather than literals scattered through logic.
//!
//! Defaults live in code; `config/scoring.toml` (or `SCORING_CONFIG_PATH`)
//! overrides them for tuning. A dev-gated polling watcher hot-reloads the file
//! on mtime change, same mechanism as the rest of our runtime-calibrated
//! configs.

use std::{
    fs,
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
    thread,
    time::{Duration, SystemTime},
};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

pub const DEFAULT_SCORING_CONFIG_PATH: &str = "config/scoring.toml";
pub const ENV_SCORING_CONFIG_PATH: &str = "SCORING_CONFIG_PATH";
pub const ENV_SCORING_HOT_RELOAD: &str = "SCORING_HOT_RELOAD";

/// Relative weight of each score component. Expected to sum to 1.0; the
/// calculator normalizes by the actual total so a tuned file that drifts a
/// little stays in range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    pub urgency: f64,
    pub seasonality: f64,
    pub category: f64,
    pub activity: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            urgency: 0.40,
            seasonality: 0.25,
            category: 0.20,
            activity: 0.15,
        }
    }
}

impl Weights {
    pub fn total(&self) -> f64 {
        self.urgency + self.seasonality + self.category + self.activity
    }
}

/// One linear band of the urgency curve: for `days_left` up to `max_days`,
/// score = base + (max_days - days_left) * per_day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UrgencyBand {
    pub max_days: i64,
    pub base: f64,
    pub per_day: f64,
}

/// Piecewise urgency curve. Bands must be sorted by `max_days` ascending;
/// past the last band the score decays exponentially from that band's base,
/// so the curve stays monotone non-increasing out to any horizon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrgencyCurve {
    pub bands: Vec<UrgencyBand>,
    pub decay_tau_days: f64,
}

impl Default for UrgencyCurve {
    fn default() -> Self {
        Self {
            bands: vec![
                UrgencyBand { max_days: 7, base: 95.0, per_day: 1.0 },
                UrgencyBand { max_days: 14, base: 85.0, per_day: 0.7 },
                UrgencyBand { max_days: 30, base: 70.0, per_day: 0.5 },
                UrgencyBand { max_days: 60, base: 50.0, per_day: 0.33 },
                UrgencyBand { max_days: 90, base: 30.0, per_day: 0.33 },
            ],
            decay_tau_days: 90.0,
        }
    }
}

/// Fixed scores for the two seasonality states.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeasonalityScores {
    pub in_season: f64,
    pub off_season: f64,
}

impl Default for SeasonalityScores {
    fn default() -> Self {
        Self {
            in_season: 100.0,
            off_season: 45.0,
        }
    }
}

/// Ordinal mapping for user activity, low < medium < high.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActivityScores {
    pub low: f64,
    pub medium: f64,
    pub high: f64,
}

impl Default for ActivityScores {
    fn default() -> Self {
        Self {
            low: 40.0,
            medium: 70.0,
            high: 100.0,
        }
    }
}

/// Lower bounds of the priority tiers. Scores at or above `critical` are
/// Critical, at or above `high` are High, at or above `medium` are Medium,
/// everything below is Low.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierBoundaries {
    pub critical: f64,
    pub high: f64,
    pub medium: f64,
}

impl Default for TierBoundaries {
    fn default() -> Self {
        Self {
            critical: 80.0,
            high: 65.0,
            medium: 50.0,
        }
    }
}

/// Thresholds driving the human-readable reason strings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReasonThresholds {
    pub expires_soon_days: i64,
    pub important_category: f64,
}

impl Default for ReasonThresholds {
    fn default() -> Self {
        Self {
            expires_soon_days: 30,
            important_category: 0.7,
        }
    }
}

/// SMS payload settings: the deep-link template and the fallback phone used
/// when the user's number fails the loose shape check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmsConfig {
    pub action_link_base: String,
    pub default_phone: String,
}

impl Default for SmsConfig {
    fn default() -> Self {
        Self {
            action_link_base: "https://services.gov.example/service".to_string(),
            default_phone: "+966500000000".to_string(),
        }
    }
}

/// Full scoring configuration. Every section is optional in the TOML file and
/// falls back to the in-code default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    #[serde(default)]
    pub weights: Weights,
    #[serde(default)]
    pub urgency: UrgencyCurve,
    #[serde(default)]
    pub seasonality: SeasonalityScores,
    #[serde(default)]
    pub activity: ActivityScores,
    #[serde(default)]
    pub tiers: TierBoundaries,
    #[serde(default)]
    pub reasons: ReasonThresholds,
    #[serde(default)]
    pub sms: SmsConfig,
}

impl ScoringConfig {
    /// Resolve the config path from `SCORING_CONFIG_PATH` (default
    /// `config/scoring.toml`) and load it. A missing file is not an error:
    /// the in-code defaults apply, same behavior as our other hot-reloaded
    /// configs.
    pub fn load() -> anyhow::Result<Self> {
        let path = config_path();
        Self::load_from_path(&path)
    }

    pub fn load_from_path(path: &Path) -> anyhow::Result<Self> {
        match fs::read_to_string(path) {
            Ok(content) => {
                let cfg = Self::from_toml_str(&content)?;
                info!(path = %path.display(), "scoring config loaded");
                Ok(cfg)
            }
            Err(_) => {
                info!(path = %path.display(), "scoring config not found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Parse and sanity-check a TOML string.
    pub fn from_toml_str(toml_str: &str) -> anyhow::Result<Self> {
        let cfg: Self = toml::from_str(toml_str)?;
        cfg.check()?;
        Ok(cfg)
    }

    /// Harden against a hand-edited file that would push scores out of range.
    fn check(&self) -> anyhow::Result<()> {
        let w = &self.weights;
        for (name, v) in [
            ("urgency", w.urgency),
            ("seasonality", w.seasonality),
            ("category", w.category),
            ("activity", w.activity),
        ] {
            if !v.is_finite() || v < 0.0 {
                anyhow::bail!("weight `{name}` must be a non-negative finite number, got {v}");
            }
        }
        if w.total() <= 0.0 {
            anyhow::bail!("weights must not all be zero");
        }
        if !(self.tiers.medium < self.tiers.high && self.tiers.high < self.tiers.critical) {
            anyhow::bail!(
                "tier boundaries must be strictly ordered medium < high < critical, got {} / {} / {}",
                self.tiers.medium,
                self.tiers.high,
                self.tiers.critical
            );
        }
        if self.urgency.bands.is_empty() {
            anyhow::bail!("urgency curve needs at least one band");
        }
        if self
            .urgency
            .bands
            .windows(2)
            .any(|p| p[0].max_days >= p[1].max_days)
        {
            anyhow::bail!("urgency bands must be sorted by max_days ascending");
        }
        if !self.urgency.decay_tau_days.is_finite() || self.urgency.decay_tau_days <= 0.0 {
            anyhow::bail!("urgency decay_tau_days must be positive");
        }
        Ok(())
    }
}

pub fn config_path() -> PathBuf {
    std::env::var(ENV_SCORING_CONFIG_PATH)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_SCORING_CONFIG_PATH))
}

/* ----------------------------
Thread-safe handle + hot reload
---------------------------- */

/// A threadsafe handle so HTTP handlers always see the latest config.
/// - Enable hot reload by setting SCORING_HOT_RELOAD=1
/// - Dev-gated: active only if cfg!(debug_assertions) OR SHUTTLE_ENV is
///   "local"/"development"/"dev".
#[derive(Clone)]
pub struct ScoringHandle {
    inner: Arc<RwLock<ScoringConfig>>,
}

impl ScoringHandle {
    pub fn new(cfg: ScoringConfig) -> Self {
        Self {
            inner: Arc::new(RwLock::new(cfg)),
        }
    }

    /// Snapshot of the current config. The struct is small; cloning keeps
    /// handlers free of lock lifetimes.
    pub fn current(&self) -> ScoringConfig {
        self.inner
            .read()
            .map(|g| g.clone())
            .unwrap_or_default()
    }

    pub fn replace(&self, cfg: ScoringConfig) {
        if let Ok(mut guard) = self.inner.write() {
            *guard = cfg;
        }
    }
}

fn hot_reload_enabled() -> bool {
    let want = std::env::var(ENV_SCORING_HOT_RELOAD)
        .ok()
        .map(|v| v == "1")
        .unwrap_or(false);
    if !want {
        return false;
    }
    if cfg!(debug_assertions) {
        return true;
    }
    matches!(
        std::env::var("SHUTTLE_ENV")
            .unwrap_or_default()
            .to_ascii_lowercase()
            .as_str(),
        "local" | "development" | "dev"
    )
}

/// Start a simple polling watcher on `path` to hot-reload into `handle`.
/// Polls mtime every 2s. Uses only std, no external deps.
pub fn start_hot_reload_thread(handle: ScoringHandle, path: PathBuf) {
    if !hot_reload_enabled() {
        return;
    }

    thread::spawn(move || {
        let poll = Duration::from_secs(2);
        let mut last_mtime: Option<SystemTime> = None;

        loop {
            match fs::metadata(&path).and_then(|m| m.modified()) {
                Ok(mtime) => {
                    let changed = match last_mtime {
                        None => {
                            last_mtime = Some(mtime);
                            false
                        }
                        Some(prev) => mtime > prev,
                    };
                    if changed {
                        match fs::read_to_string(&path)
                            .map_err(anyhow::Error::from)
                            .and_then(|c| ScoringConfig::from_toml_str(&c))
                        {
                            Ok(cfg) => {
                                handle.replace(cfg);
                                info!(path = %path.display(), "scoring config hot-reloaded");
                            }
                            Err(e) => {
                                // Keep serving the previous config.
                                warn!(path = %path.display(), error = %e, "scoring config reload failed");
                            }
                        }
                        last_mtime = Some(mtime);
                    }
                }
                Err(_) => {
                    // File missing or unreadable; keep trying.
                }
            }
            thread::sleep(poll);
        }
    });
}
