use crate::models::{Assignment, Participant};
use std::collections::HashSet;

/// Check that the assignments form a complete bijection over the roster:
/// every participant appears exactly once as giver and exactly once as
/// recipient
///
/// Structural post-condition check for callers persisting a result; the
/// engine's retry loop does not depend on it.
pub fn is_complete_bijection(assignments: &[Assignment], participants: &[Participant]) -> bool {
    if assignments.len() != participants.len() {
        return false;
    }

    let giver_ids: HashSet<&str> = assignments.iter().map(|a| a.giver_id.as_str()).collect();
    let recipient_ids: HashSet<&str> = assignments
        .iter()
        .map(|a| a.recipient_id.as_str())
        .collect();

    // Set sizes shrink on duplicate givers or recipients
    if giver_ids.len() != assignments.len() || recipient_ids.len() != assignments.len() {
        return false;
    }

    participants
        .iter()
        .all(|p| giver_ids.contains(p.id.as_str()) && recipient_ids.contains(p.id.as_str()))
}
