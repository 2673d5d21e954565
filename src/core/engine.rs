use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;

use crate::core::rules::is_valid_assignment;
use crate::models::{Assignment, MatchConstraints};
use std::collections::HashSet;

/// Default attempt budget before the constraint set is declared infeasible
pub const DEFAULT_MAX_ATTEMPTS: u32 = 1000;

/// Default number of past years in which a pairing may not repeat
pub const DEFAULT_YEARS_TO_AVOID: i32 = 2;

/// Errors from a generation run
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("need at least 2 participants to generate assignments (got {count})")]
    InsufficientParticipants { count: usize },

    #[error(
        "could not generate valid assignments after {attempts} attempts; \
         try removing some exclusion pairs or checking historical data constraints"
    )]
    Infeasible { attempts: u32 },
}

/// Constrained random matching engine
///
/// Produces a giver -> recipient bijection over the participant set with no
/// self-assignments, respecting exclusion pairs and the recent-repeat history
/// window. The search is a bounded randomized retry, not backtracking: each
/// attempt shuffles a recipient pool, assigns givers greedily in input order,
/// and restarts from scratch if any giver runs out of candidates.
#[derive(Debug, Clone, Copy)]
pub struct Engine {
    max_attempts: u32,
    years_to_avoid: i32,
}

impl Engine {
    pub fn new(max_attempts: u32, years_to_avoid: i32) -> Self {
        Self {
            max_attempts,
            years_to_avoid,
        }
    }

    pub fn with_defaults() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            years_to_avoid: DEFAULT_YEARS_TO_AVOID,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn years_to_avoid(&self) -> i32 {
        self.years_to_avoid
    }

    /// Generate assignments using system entropy
    ///
    /// Two calls with identical inputs may return different valid matchings;
    /// use [`Engine::generate_with_rng`] with a seeded source when a
    /// reproducible result is needed.
    pub fn generate(
        &self,
        constraints: &MatchConstraints<'_>,
    ) -> Result<Vec<Assignment>, EngineError> {
        self.generate_with_rng(constraints, &mut rand::thread_rng())
    }

    /// Generate assignments drawing permutations from the supplied source
    pub fn generate_with_rng<R: Rng + ?Sized>(
        &self,
        constraints: &MatchConstraints<'_>,
        rng: &mut R,
    ) -> Result<Vec<Assignment>, EngineError> {
        let count = constraints.participants.len();
        if count < 2 {
            return Err(EngineError::InsufficientParticipants { count });
        }

        for _ in 0..self.max_attempts {
            if let Some(assignments) = self.try_generate(constraints, rng) {
                return Ok(assignments);
            }
        }

        Err(EngineError::Infeasible {
            attempts: self.max_attempts,
        })
    }

    /// One shuffle-and-scan pass; None means this attempt got stuck
    fn try_generate<R: Rng + ?Sized>(
        &self,
        constraints: &MatchConstraints<'_>,
        rng: &mut R,
    ) -> Option<Vec<Assignment>> {
        // Fisher-Yates shuffle of the candidate recipient pool
        let mut recipients: Vec<_> = constraints.participants.iter().collect();
        recipients.shuffle(rng);

        let mut assignments = Vec::with_capacity(constraints.participants.len());
        let mut used_recipients: HashSet<&str> = HashSet::new();

        // Givers keep their stable input order; each takes the first
        // eligible recipient from the shuffled pool
        for giver in constraints.participants {
            let chosen = recipients.iter().copied().find(|&recipient| {
                !used_recipients.contains(recipient.id.as_str())
                    && is_valid_assignment(giver, recipient, constraints, self.years_to_avoid)
            })?;

            used_recipients.insert(chosen.id.as_str());
            assignments.push(Assignment::from_pair(giver, chosen));
        }

        Some(assignments)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::with_defaults()
    }
}
