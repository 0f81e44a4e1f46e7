//! Builds SMS alert payloads for Critical/High ranked services.
//!
//! The user's phone only has to be present; we run a loose shape check here
//! and fall back to the configured default number when it fails. Raw phone
//! numbers are never logged, only a short hash.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

use super::SmsAlert;
use crate::config::ScoringConfig;
use crate::model::User;
use crate::recommendation::{Priority, RankedService};

/// Loose E.164-ish shape: optional '+', 8 to 15 digits.
static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\+?[0-9]{8,15}$").expect("phone regex")
});

/// Build alert payloads for every Critical or High entry, in ranked order.
/// Medium/Low entries produce nothing; an empty result is a valid state.
pub fn build_sms_alerts(
    ranked: &[RankedService],
    user: &User,
    cfg: &ScoringConfig,
) -> Vec<SmsAlert> {
    let phone = sanitize_phone(&user.phone, cfg);

    let mut alerts = Vec::new();
    for rec in ranked {
        let urgency_tag = match rec.priority {
            Priority::Critical => "URGENT",
            Priority::High => "Important",
            Priority::Medium | Priority::Low => continue,
        };

        let action_link = format!("{}/{}", cfg.sms.action_link_base, rec.service_id);
        let first_reason = rec
            .reasons
            .first()
            .map(String::as_str)
            .unwrap_or("Needs action");

        let message = format!(
            "{urgency_tag}: {}\n{first_reason}\nComplete it now: {action_link}",
            rec.service_name
        );

        alerts.push(SmsAlert {
            service_id: rec.service_id,
            service_name: rec.service_name.clone(),
            priority: rec.priority,
            message,
            action_link,
            phone: phone.clone(),
        });
    }
    alerts
}

/// Strip separators and check the loose phone shape; fall back to the
/// configured default on failure.
fn sanitize_phone(raw: &str, cfg: &ScoringConfig) -> String {
    let compact: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-' && *c != '(' && *c != ')')
        .collect();
    if PHONE_RE.is_match(&compact) {
        compact
    } else {
        // Never log the raw number. Only hashed id.
        warn!(
            phone_id = %anon_hash(raw),
            "phone failed shape check, using default recipient"
        );
        cfg.sms.default_phone.clone()
    }
}

/// Short anonymized identifier for log correlation.
fn anon_hash(text: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    let digest = hasher.finalize();
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}
