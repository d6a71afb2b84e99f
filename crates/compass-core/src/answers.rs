//! # Answer Sheet
//!
//! The partially-filled response set collected on the questionnaire page.
//!
//! The sheet is the only place where "not answered yet" exists. Scoring
//! takes `[Likert; QUESTION_COUNT]`, so the completeness check happens
//! exactly once, in [`AnswerSheet::finalize`], and the engine's precondition
//! is enforced by the type system past that point.

use crate::primitives::QUESTION_COUNT;
use crate::types::{CompassError, Likert};
use serde::{Deserialize, Serialize};

/// Responses keyed by 1-based question position, possibly incomplete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerSheet {
    slots: [Option<Likert>; QUESTION_COUNT],
}

impl Default for AnswerSheet {
    fn default() -> Self {
        Self {
            slots: [None; QUESTION_COUNT],
        }
    }
}

impl AnswerSheet {
    /// Create an empty sheet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an answer at a 1-based position.
    pub fn set(&mut self, position: usize, answer: Likert) -> Result<(), CompassError> {
        let slot = position
            .checked_sub(1)
            .and_then(|idx| self.slots.get_mut(idx))
            .ok_or_else(|| {
                CompassError::Validation(format!("No question at position {}", position))
            })?;
        *slot = Some(answer);
        Ok(())
    }

    /// The answer recorded at a 1-based position, if any.
    #[must_use]
    pub fn get(&self, position: usize) -> Option<Likert> {
        position
            .checked_sub(1)
            .and_then(|idx| self.slots.get(idx))
            .copied()
            .flatten()
    }

    /// Number of answered positions.
    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Number of unanswered positions.
    #[must_use]
    pub fn missing_count(&self) -> usize {
        QUESTION_COUNT - self.answered_count()
    }

    /// True when every position has an answer.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.missing_count() == 0
    }

    /// Convert into the complete, ordered response array the scoring engine
    /// takes. Fails with `IncompleteInput` when any position is unanswered.
    pub fn finalize(&self) -> Result<[Likert; QUESTION_COUNT], CompassError> {
        let missing = self.missing_count();
        if missing > 0 {
            return Err(CompassError::IncompleteInput { missing });
        }

        let mut responses = [Likert::Never; QUESTION_COUNT];
        for (out, slot) in responses.iter_mut().zip(self.slots.iter()) {
            if let Some(answer) = slot {
                *out = *answer;
            }
        }
        Ok(responses)
    }
}

// =============================================================================
// TESTS
// =============================================================================
