//! SLA Clock
//!
//! Pure deadline arithmetic for the claim and contact windows. No side
//! effects, no wall-clock reads: every function takes its reference time
//! as an argument, which keeps the whole module trivially testable.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Window durations for the two sequential SLAs.
///
/// Configuration, not constants: the server loads these from secrets and
/// a round-robin record may override the claim window per language.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlaConfig {
    /// Minutes an assigned agent has to acknowledge a lead.
    pub claim_window_minutes: i64,
    /// Minutes a claiming agent has to make first verified contact.
    pub contact_window_minutes: i64,
}

impl Default for SlaConfig {
    fn default() -> Self {
        Self {
            claim_window_minutes: 5,
            contact_window_minutes: 240,
        }
    }
}

/// Deadline for claiming a lead assigned at `assigned_at`.
pub fn claim_deadline(assigned_at: DateTime<Utc>, window_minutes: i64) -> DateTime<Utc> {
    assigned_at + Duration::minutes(window_minutes)
}

/// Deadline for first contact on a lead claimed at `claimed_at`.
pub fn contact_deadline(claimed_at: DateTime<Utc>, window_minutes: i64) -> DateTime<Utc> {
    claimed_at + Duration::minutes(window_minutes)
}

/// A deadline is breached strictly after it passes. `now == deadline`
/// is still inside the window.
pub fn is_breached(deadline: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now > deadline
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_claim_deadline_default_window() {
        let deadline = claim_deadline(t0(), SlaConfig::default().claim_window_minutes);
        assert_eq!(deadline, t0() + Duration::minutes(5));
    }

    #[test]
    fn test_deadline_not_breached_at_boundary() {
        let deadline = claim_deadline(t0(), 5);
        assert!(!is_breached(deadline, deadline));
        assert!(!is_breached(deadline, deadline - Duration::seconds(1)));
    }

    #[test]
    fn test_deadline_breached_after_boundary() {
        let deadline = claim_deadline(t0(), 5);
        assert!(is_breached(deadline, deadline + Duration::seconds(1)));
    }

    #[test]
    fn test_contact_deadline_uses_configured_window() {
        let config = SlaConfig {
            claim_window_minutes: 5,
            contact_window_minutes: 90,
        };
        let deadline = contact_deadline(t0(), config.contact_window_minutes);
        assert_eq!(deadline, t0() + Duration::minutes(90));
    }
}
