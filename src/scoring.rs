//! Score calculator: pure functions mapping one (user, service) pair to four
//! normalized sub-scores and a weighted final score.
//!
//! Every component is clamped into [0,100] before weighting, and the weighted
//! sum is normalized by the weight total, so `final_score` stays in [0,100]
//! for any input the boundary lets through. No side effects, no shared state;
//! safe to call concurrently for independent inputs.

use serde::Serialize;

use crate::config::{ActivityScores, ScoringConfig, SeasonalityScores, UrgencyCurve};
use crate::model::{ActivityLevel, Seasonality, Service, User};

/// The four component scores plus the weighted result.
/// `final_score` is rounded to the nearest integer for presentation; the
/// ordering contract downstream uses only this rounded value plus input order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub urgency: f64,
    pub seasonality: f64,
    pub category: f64,
    pub activity: f64,
    pub final_score: f64,
}

fn clamp100(x: f64) -> f64 {
    x.clamp(0.0, 100.0)
}

/// Urgency as a monotone non-increasing function of days remaining.
/// Zero or negative days (overdue) is max urgency; past the last configured
/// band the score decays exponentially toward zero.
pub fn urgency_score(days_left: i64, curve: &UrgencyCurve) -> f64 {
    if days_left <= 0 {
        return 100.0;
    }
    for band in &curve.bands {
        if days_left <= band.max_days {
            let s = band.base + (band.max_days - days_left) as f64 * band.per_day;
            return clamp100(s);
        }
    }
    match curve.bands.last() {
        Some(last) => {
            let over = (days_left - last.max_days) as f64;
            clamp100(last.base * (-over / curve.decay_tau_days).exp())
        }
        None => 0.0,
    }
}

/// Fixed score per seasonality state. The boundary guarantees only the two
/// defined enum values reach this function.
pub fn seasonality_score(seasonality: Seasonality, scores: &SeasonalityScores) -> f64 {
    match seasonality {
        Seasonality::InSeason => clamp100(scores.in_season),
        Seasonality::OffSeason => clamp100(scores.off_season),
    }
}

/// Linear rescale of category importance from [0,1] to [0,100]. Out-of-range
/// callers are clamped, not rejected.
pub fn category_score(category_importance: f64) -> f64 {
    if !category_importance.is_finite() {
        return 0.0;
    }
    category_importance.clamp(0.0, 1.0) * 100.0
}

/// Ordinal activity mapping, low < medium < high.
pub fn activity_score(level: ActivityLevel, scores: &ActivityScores) -> f64 {
    match level {
        ActivityLevel::Low => clamp100(scores.low),
        ActivityLevel::Medium => clamp100(scores.medium),
        ActivityLevel::High => clamp100(scores.high),
    }
}

/// Compute the full breakdown for one (user, service) pair.
pub fn compute(user: &User, service: &Service, cfg: &ScoringConfig) -> ScoreBreakdown {
    let urgency = urgency_score(service.days_left, &cfg.urgency);
    let seasonality = seasonality_score(service.seasonality, &cfg.seasonality);
    let category = category_score(service.category_importance);
    let activity = activity_score(user.activity_level, &cfg.activity);

    let w = &cfg.weights;
    let raw = urgency * w.urgency
        + seasonality * w.seasonality
        + category * w.category
        + activity * w.activity;

    // Light normalization: divide by the weight total, then clamp and round.
    let denom = w.total().max(1e-9);
    let final_score = clamp100(raw / denom).round();

    ScoreBreakdown {
        urgency,
        seasonality,
        category,
        activity,
        final_score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Weights;

    fn user(level: ActivityLevel) -> User {
        User {
            id: 1,
            name: "Sara".to_string(),
            activity_level: level,
            phone: "+966500000001".to_string(),
        }
    }

    fn service(days_left: i64, seasonality: Seasonality, importance: f64) -> Service {
        Service {
            id: 10,
            name: "Passport renewal".to_string(),
            days_left,
            seasonality,
            category_importance: importance,
        }
    }

    #[test]
    fn overdue_and_today_are_max_urgency() {
        let curve = UrgencyCurve::default();
        assert_eq!(urgency_score(-5, &curve), 100.0);
        assert_eq!(urgency_score(0, &curve), 100.0);
    }

    #[test]
    fn urgency_is_monotone_non_increasing() {
        let curve = UrgencyCurve::default();
        let mut prev = urgency_score(0, &curve);
        for d in 1..=400 {
            let s = urgency_score(d, &curve);
            assert!(
                s <= prev + 1e-9,
                "urgency rose from {prev} to {s} at day {d}"
            );
            assert!((0.0..=100.0).contains(&s));
            prev = s;
        }
    }

    #[test]
    fn urgency_fades_past_the_horizon() {
        let curve = UrgencyCurve::default();
        assert!(urgency_score(365, &curve) < 5.0);
        assert!(urgency_score(1000, &curve) < 0.01);
    }

    #[test]
    fn category_is_clamped_then_rescaled() {
        assert_eq!(category_score(0.0), 0.0);
        assert_eq!(category_score(1.0), 100.0);
        assert_eq!(category_score(1.5), 100.0);
        assert_eq!(category_score(-0.3), 0.0);
        assert_eq!(category_score(f64::NAN), 0.0);
    }

    #[test]
    fn activity_is_ordinal() {
        let a = ActivityScores::default();
        assert!(activity_score(ActivityLevel::Low, &a) < activity_score(ActivityLevel::Medium, &a));
        assert!(
            activity_score(ActivityLevel::Medium, &a) < activity_score(ActivityLevel::High, &a)
        );
    }

    #[test]
    fn final_score_stays_in_range_on_extremes() {
        let cfg = ScoringConfig::default();
        for days in [-5_i64, 0, 1, 1000] {
            for importance in [0.0, 1.0, 1.5] {
                let b = compute(
                    &user(ActivityLevel::High),
                    &service(days, Seasonality::InSeason, importance),
                    &cfg,
                );
                assert!(
                    (0.0..=100.0).contains(&b.final_score),
                    "out of range for days={days} importance={importance}: {}",
                    b.final_score
                );
            }
        }
    }

    #[test]
    fn urgent_in_season_service_for_active_user_lands_critical_range() {
        let cfg = ScoringConfig::default();
        let b = compute(
            &user(ActivityLevel::High),
            &service(28, Seasonality::InSeason, 0.9),
            &cfg,
        );
        // urgency 71, seasonality 100, category 90, activity 100 -> 86.4 -> 86
        assert_eq!(b.seasonality, 100.0);
        assert_eq!(b.category, 90.0);
        assert_eq!(b.activity, 100.0);
        assert_eq!(b.final_score, 86.0);
    }

    #[test]
    fn distant_off_season_service_for_quiet_user_scores_low() {
        let cfg = ScoringConfig::default();
        let b = compute(
            &user(ActivityLevel::Low),
            &service(365, Seasonality::OffSeason, 0.1),
            &cfg,
        );
        assert!(b.final_score < 50.0, "got {}", b.final_score);
    }

    #[test]
    fn drifted_weight_total_is_normalized_back_into_range() {
        let mut cfg = ScoringConfig::default();
        cfg.weights = Weights {
            urgency: 0.8,
            seasonality: 0.5,
            category: 0.4,
            activity: 0.3,
        };
        let b = compute(
            &user(ActivityLevel::High),
            &service(0, Seasonality::InSeason, 1.0),
            &cfg,
        );
        assert_eq!(b.final_score, 100.0);
    }

    #[test]
    fn randomized_inputs_never_leave_range() {
        use rand::Rng;
        let cfg = ScoringConfig::default();
        let mut rng = rand::rng();
        for _ in 0..500 {
            let days = rng.random_range(-30_i64..2000);
            let importance = rng.random_range(-0.5_f64..1.5);
            let seasonality = if rng.random_bool(0.5) {
                Seasonality::InSeason
            } else {
                Seasonality::OffSeason
            };
            let b = compute(
                &user(ActivityLevel::Medium),
                &service(days, seasonality, importance),
                &cfg,
            );
            assert!((0.0..=100.0).contains(&b.final_score));
        }
    }
}
