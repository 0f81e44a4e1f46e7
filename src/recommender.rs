//! # Recommendation Engine
//! Pure, testable logic that maps `(user, services, top_n)` → ranked result.
//! No I/O, suitable for unit tests and offline evaluation.
//!
//! Policy: score every service, sort descending by final score (stable, so
//! equal scores keep their input order), truncate to top_n, and surface the
//! first entry as the single top recommendation. Alerts and the summary are
//! derived views over the same scored set.

use chrono::Utc;

use crate::config::ScoringConfig;
use crate::model::{ActivityLevel, Seasonality, Service, User};
use crate::notify;
use crate::recommendation::{
    Priority, PriorityCounts, RankedService, RecommendationResult, Summary,
};
use crate::scoring;

/// Analyze and rank all services for one user. `top_n` must be >= 1; larger
/// than the service count simply returns everything ranked.
pub fn rank(
    user: &User,
    services: &[Service],
    top_n: usize,
    cfg: &ScoringConfig,
) -> RecommendationResult {
    if services.is_empty() {
        // Valid empty-result state, not an error.
        return RecommendationResult {
            status: "no_services",
            user_id: user.id,
            user_name: user.name.clone(),
            total_services: 0,
            recommendations: Vec::new(),
            top_recommendation: None,
            sms_alerts: Vec::new(),
            summary: None,
            generated_at: Utc::now(),
        };
    }

    let mut scored: Vec<RankedService> = services
        .iter()
        .map(|service| score_one(user, service, cfg))
        .collect();

    // Stable sort: equal scores keep their original input position.
    scored.sort_by(|a, b| b.final_score.total_cmp(&a.final_score));

    let summary = summarize(&scored, cfg);

    scored.truncate(top_n);
    let top_recommendation = scored.first().cloned();
    let sms_alerts = notify::build_sms_alerts(&scored, user, cfg);

    RecommendationResult {
        status: "success",
        user_id: user.id,
        user_name: user.name.clone(),
        total_services: services.len(),
        recommendations: scored,
        top_recommendation,
        sms_alerts,
        summary: Some(summary),
        generated_at: Utc::now(),
    }
}

fn score_one(user: &User, service: &Service, cfg: &ScoringConfig) -> RankedService {
    let breakdown = scoring::compute(user, service, cfg);
    let priority = Priority::from_score(breakdown.final_score, &cfg.tiers);
    let reasons = build_reasons(user, service, cfg);

    RankedService {
        service_id: service.id,
        service_name: service.name.clone(),
        days_left: service.days_left,
        final_score: breakdown.final_score,
        priority,
        reasons,
        breakdown,
    }
}

/// Threshold-driven justification strings, in a fixed order: urgency first,
/// then seasonality, category, activity. Unmet thresholds are omitted.
fn build_reasons(user: &User, service: &Service, cfg: &ScoringConfig) -> Vec<String> {
    let mut reasons = Vec::new();

    if service.days_left <= 0 {
        reasons.push("Overdue: immediate action required".to_string());
    } else if service.days_left <= cfg.reasons.expires_soon_days {
        reasons.push(format!("Expires soon: {} days left", service.days_left));
    }

    if service.seasonality == Seasonality::InSeason {
        reasons.push("High-demand season".to_string());
    }

    if service.category_importance >= cfg.reasons.important_category {
        reasons.push("Frequently used category".to_string());
    }

    if user.activity_level == ActivityLevel::High {
        reasons.push("Frequent user".to_string());
    }

    reasons
}

/// Summary statistics over the full scored set (before truncation).
fn summarize(scored: &[RankedService], cfg: &ScoringConfig) -> Summary {
    let mut counts = PriorityCounts::default();
    for s in scored {
        match s.priority {
            Priority::Critical => counts.critical += 1,
            Priority::High => counts.high += 1,
            Priority::Medium => counts.medium += 1,
            Priority::Low => counts.low += 1,
        }
    }

    let urgent_services = scored
        .iter()
        .filter(|s| s.days_left <= cfg.reasons.expires_soon_days)
        .count();

    let avg = scored.iter().map(|s| s.final_score).sum::<f64>() / scored.len() as f64;

    Summary {
        total_services: scored.len(),
        urgent_services,
        priority_breakdown: counts,
        average_score: (avg * 100.0).round() / 100.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(level: ActivityLevel) -> User {
        User {
            id: 42,
            name: "Sara".to_string(),
            activity_level: level,
            phone: "+966500000001".to_string(),
        }
    }

    fn service(id: i64, days_left: i64, seasonality: Seasonality, importance: f64) -> Service {
        Service {
            id,
            name: format!("Service {id}"),
            days_left,
            seasonality,
            category_importance: importance,
        }
    }

    #[test]
    fn empty_services_is_a_valid_state() {
        let cfg = ScoringConfig::default();
        let result = rank(&user(ActivityLevel::Medium), &[], 5, &cfg);
        assert_eq!(result.status, "no_services");
        assert!(result.recommendations.is_empty());
        assert!(result.top_recommendation.is_none());
        assert!(result.sms_alerts.is_empty());
        assert!(result.summary.is_none());
    }

    #[test]
    fn ranks_descending_and_picks_the_top() {
        let cfg = ScoringConfig::default();
        let services = vec![
            service(1, 365, Seasonality::OffSeason, 0.1),
            service(2, 3, Seasonality::InSeason, 0.9),
            service(3, 45, Seasonality::OffSeason, 0.5),
        ];
        let result = rank(&user(ActivityLevel::High), &services, 5, &cfg);

        assert_eq!(result.status, "success");
        assert_eq!(result.total_services, 3);
        let ids: Vec<i64> = result.recommendations.iter().map(|r| r.service_id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
        assert_eq!(result.top_recommendation.unwrap().service_id, 2);

        let scores: Vec<f64> = result.recommendations.iter().map(|r| r.final_score).collect();
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn equal_scores_keep_input_order() {
        let cfg = ScoringConfig::default();
        // Identical attributes -> identical final scores.
        let services = vec![
            service(11, 20, Seasonality::InSeason, 0.8),
            service(22, 20, Seasonality::InSeason, 0.8),
            service(33, 20, Seasonality::InSeason, 0.8),
        ];
        let result = rank(&user(ActivityLevel::Medium), &services, 5, &cfg);
        let ids: Vec<i64> = result.recommendations.iter().map(|r| r.service_id).collect();
        assert_eq!(ids, vec![11, 22, 33]);
    }

    #[test]
    fn top_n_larger_than_input_returns_everything() {
        let cfg = ScoringConfig::default();
        let services = vec![
            service(1, 10, Seasonality::InSeason, 0.5),
            service(2, 40, Seasonality::OffSeason, 0.5),
        ];
        let result = rank(&user(ActivityLevel::Low), &services, 10, &cfg);
        assert_eq!(result.recommendations.len(), 2);
    }

    #[test]
    fn top_n_truncates_but_summary_covers_everything() {
        let cfg = ScoringConfig::default();
        let services: Vec<Service> = (1..=6)
            .map(|i| service(i, i * 10, Seasonality::OffSeason, 0.5))
            .collect();
        let result = rank(&user(ActivityLevel::Medium), &services, 2, &cfg);
        assert_eq!(result.recommendations.len(), 2);
        let summary = result.summary.unwrap();
        assert_eq!(summary.total_services, 6);
        let c = summary.priority_breakdown;
        assert_eq!(c.critical + c.high + c.medium + c.low, 6);
    }

    #[test]
    fn rank_is_idempotent() {
        let cfg = ScoringConfig::default();
        let services = vec![
            service(1, 5, Seasonality::InSeason, 0.9),
            service(2, 80, Seasonality::OffSeason, 0.3),
        ];
        let u = user(ActivityLevel::High);
        let a = rank(&u, &services, 5, &cfg);
        let b = rank(&u, &services, 5, &cfg);
        assert_eq!(a.recommendations, b.recommendations);
        assert_eq!(a.top_recommendation, b.top_recommendation);
        assert_eq!(a.sms_alerts, b.sms_alerts);
        assert_eq!(a.summary, b.summary);
    }

    #[test]
    fn urgent_in_season_service_is_critical_with_expected_reasons() {
        let cfg = ScoringConfig::default();
        let services = vec![service(10, 28, Seasonality::InSeason, 0.9)];
        let result = rank(&user(ActivityLevel::High), &services, 5, &cfg);

        let top = result.top_recommendation.unwrap();
        assert_eq!(top.priority, Priority::Critical);
        assert_eq!(top.final_score, 86.0);
        assert_eq!(
            top.reasons,
            vec![
                "Expires soon: 28 days left".to_string(),
                "High-demand season".to_string(),
                "Frequently used category".to_string(),
                "Frequent user".to_string(),
            ]
        );
        assert_eq!(result.sms_alerts.len(), 1);
    }

    #[test]
    fn distant_unimportant_service_is_low_with_no_reasons() {
        let cfg = ScoringConfig::default();
        let services = vec![service(9, 365, Seasonality::OffSeason, 0.1)];
        let result = rank(&user(ActivityLevel::Low), &services, 5, &cfg);

        let top = result.top_recommendation.unwrap();
        assert_eq!(top.priority, Priority::Low);
        assert!(top.reasons.is_empty());
        assert!(result.sms_alerts.is_empty());
    }

    #[test]
    fn overdue_service_reports_overdue_reason() {
        let cfg = ScoringConfig::default();
        let services = vec![service(5, -3, Seasonality::OffSeason, 0.2)];
        let result = rank(&user(ActivityLevel::Medium), &services, 1, &cfg);
        let top = result.top_recommendation.unwrap();
        assert_eq!(top.breakdown.urgency, 100.0);
        assert_eq!(top.reasons[0], "Overdue: immediate action required");
    }
}
