//! Phone Matcher
//!
//! Matches an inbound call's number against open leads using the
//! trailing-digits heuristic from [`crate::domain::value_objects::phone`].
//! No match is not an error: call ingestion proceeds without a lead
//! reference and the call log is still written.

use crate::domain::entities::Lead;
use crate::domain::value_objects::phone::{self, NormalizedPhone};

/// Pick the lead a call most plausibly belongs to.
///
/// Candidates are filtered to non-archived leads whose stored number
/// contains the suffix key; when several match, the most recently
/// created lead wins. An empty phone matches nothing.
pub fn best_match(candidates: &[Lead], key: &NormalizedPhone) -> Option<Lead> {
    if key.is_empty() {
        return None;
    }
    candidates
        .iter()
        .filter(|lead| !lead.archived && phone::matches(&lead.phone_number, key))
        .max_by_key(|lead| lead.created_at)
        .cloned()
}
