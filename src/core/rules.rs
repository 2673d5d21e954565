use crate::models::{ExclusionPair, MatchConstraints, Participant, YearData};

/// Check whether an exclusion pair forbids the giver -> recipient edge
///
/// Unidirectional pairs (imported historical pairings) match only the exact
/// direction participant1 -> participant2; bidirectional pairs (manual
/// exclusions) match either order.
#[inline]
pub fn is_excluded_pair(
    giver_id: &str,
    recipient_id: &str,
    exclusion_pairs: &[ExclusionPair],
) -> bool {
    exclusion_pairs.iter().any(|pair| {
        if pair.is_unidirectional {
            pair.participant1_id == giver_id && pair.participant2_id == recipient_id
        } else {
            (pair.participant1_id == giver_id && pair.participant2_id == recipient_id)
                || (pair.participant1_id == recipient_id && pair.participant2_id == giver_id)
        }
    })
}

/// Check whether the giver was assigned to this recipient within the last
/// `years_to_avoid` years
///
/// A year record counts only when `0 < current_year - year <= years_to_avoid`;
/// older records and records at or after the current year are ignored.
#[inline]
pub fn has_recent_match(
    giver_id: &str,
    recipient_id: &str,
    historical_data: &[YearData],
    current_year: i32,
    years_to_avoid: i32,
) -> bool {
    historical_data
        .iter()
        .filter(|data| current_year - data.year <= years_to_avoid && data.year < current_year)
        .any(|data| {
            data.assignments.iter().any(|assignment| {
                assignment.giver_id == giver_id && assignment.recipient_id == recipient_id
            })
        })
}

/// Check whether a giver -> recipient edge is eligible under all rules
///
/// Self-assignment is rejected first, then manual/imported exclusions, then
/// the recent-repeat history window.
#[inline]
pub fn is_valid_assignment(
    giver: &Participant,
    recipient: &Participant,
    constraints: &MatchConstraints<'_>,
    years_to_avoid: i32,
) -> bool {
    if giver.id == recipient.id {
        return false;
    }

    if is_excluded_pair(&giver.id, &recipient.id, constraints.exclusion_pairs) {
        return false;
    }

    if has_recent_match(
        &giver.id,
        &recipient.id,
        constraints.historical_data,
        constraints.current_year,
        years_to_avoid,
    ) {
        return false;
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Assignment;
    use chrono::Utc;

    fn year_record(year: i32, giver: &str, recipient: &str) -> YearData {
        let giver_p = Participant::new(giver, giver, giver);
        let recipient_p = Participant::new(recipient, recipient, recipient);
        YearData {
            year,
            assignments: vec![Assignment::from_pair(&giver_p, &recipient_p)],
            saved_at: Utc::now(),
        }
    }

    #[test]
    fn test_bidirectional_blocks_both_directions() {
        let pairs = vec![ExclusionPair::bidirectional("a", "b")];

        assert!(is_excluded_pair("a", "b", &pairs));
        assert!(is_excluded_pair("b", "a", &pairs));
        assert!(!is_excluded_pair("a", "c", &pairs));
    }

    #[test]
    fn test_unidirectional_blocks_exact_direction_only() {
        let pairs = vec![ExclusionPair::unidirectional("a", "b")];

        assert!(is_excluded_pair("a", "b", &pairs));
        assert!(!is_excluded_pair("b", "a", &pairs));
    }

    #[test]
    fn test_recent_match_within_window() {
        let history = vec![year_record(2023, "a", "b")];

        assert!(has_recent_match("a", "b", &history, 2024, 2));
        assert!(has_recent_match("a", "b", &history, 2025, 2));
        // Reverse direction was never assigned
        assert!(!has_recent_match("b", "a", &history, 2024, 2));
    }

    #[test]
    fn test_recent_match_outside_window() {
        let history = vec![year_record(2021, "a", "b")];

        // 2021 is three years back from 2024, outside the 2-year window
        assert!(!has_recent_match("a", "b", &history, 2024, 2));
        assert!(has_recent_match("a", "b", &history, 2023, 2));
    }

    #[test]
    fn test_current_and_future_years_ignored() {
        let history = vec![year_record(2024, "a", "b"), year_record(2025, "a", "b")];

        assert!(!has_recent_match("a", "b", &history, 2024, 2));
    }

    #[test]
    fn test_valid_assignment_rejects_self() {
        let alice = Participant::new("a", "Alice", "a");
        let constraints = MatchConstraints {
            participants: &[],
            exclusion_pairs: &[],
            historical_data: &[],
            current_year: 2024,
        };

        assert!(!is_valid_assignment(&alice, &alice, &constraints, 2));
    }

    #[test]
    fn test_valid_assignment_composes_all_rules() {
        let alice = Participant::new("a", "Alice", "a");
        let bob = Participant::new("b", "Bob", "b");
        let carol = Participant::new("c", "Carol", "c");

        let pairs = vec![ExclusionPair::bidirectional("a", "b")];
        let history = vec![year_record(2023, "a", "c")];
        let constraints = MatchConstraints {
            participants: &[],
            exclusion_pairs: &pairs,
            historical_data: &history,
            current_year: 2024,
        };

        assert!(!is_valid_assignment(&alice, &bob, &constraints, 2));
        assert!(!is_valid_assignment(&alice, &carol, &constraints, 2));
        assert!(is_valid_assignment(&carol, &bob, &constraints, 2));
    }
}
