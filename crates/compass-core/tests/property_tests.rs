//! # Property-Based Tests
//!
//! Verification tests using proptest.
//!
//! These tests pin the scoring invariants: reversal is an involution,
//! scoring is deterministic and idempotent, means stay within the scale,
//! and banding is total and monotone.

use compass_core::primitives::QUESTION_COUNT;
use compass_core::{AnswerSheet, Level, Likert, Section, band, score_responses};
use proptest::collection::vec;
use proptest::prelude::*;

// =============================================================================
// STRATEGIES
// =============================================================================

fn likert_strategy() -> impl Strategy<Value = Likert> {
    prop::sample::select(Likert::ALL.to_vec())
}

fn responses_strategy() -> impl Strategy<Value = [Likert; QUESTION_COUNT]> {
    vec(likert_strategy(), QUESTION_COUNT).prop_map(|answers| {
        let mut responses = [Likert::Never; QUESTION_COUNT];
        for (slot, answer) in responses.iter_mut().zip(answers) {
            *slot = answer;
        }
        responses
    })
}

// =============================================================================
// PROPERTY TESTS
// =============================================================================

proptest! {
    /// Reversing twice returns the original score: 6 - (6 - s) = s.
    #[test]
    fn double_reversal_is_identity(answer in likert_strategy()) {
        let once = answer.reversed_score();
        prop_assert_eq!(6 - once, answer.score());
    }

    /// Identical input produces bit-identical reports.
    #[test]
    fn scoring_is_idempotent(responses in responses_strategy()) {
        let first = score_responses(&responses);
        let second = score_responses(&responses);
        prop_assert_eq!(first, second);
    }

    /// Every report covers all three sections and every average stays on
    /// the 1..=5 scale.
    #[test]
    fn averages_stay_on_scale(responses in responses_strategy()) {
        let report = score_responses(&responses);
        prop_assert_eq!(report.len(), Section::ALL.len());

        for (_, result) in report.iter() {
            prop_assert!(result.average >= 1.0);
            prop_assert!(result.average <= 5.0);
        }
    }

    /// The stored level/color pair always agrees with the banding function
    /// applied to the section mean recomputed from first principles.
    #[test]
    fn report_levels_agree_with_banding(responses in responses_strategy()) {
        let report = score_responses(&responses);

        for section in Section::ALL {
            let (sum, count) = compass_core::bank::section_questions(section).fold(
                (0u32, 0u32),
                |(sum, count), q| {
                    let answer = responses[q.position - 1];
                    let score = if q.reversed {
                        answer.reversed_score()
                    } else {
                        answer.score()
                    };
                    (sum + u32::from(score), count + 1)
                },
            );
            let mean = f64::from(sum) / f64::from(count);

            let result = report.section(section).expect("scored");
            prop_assert_eq!(result.level, band(mean));
            prop_assert_eq!(result.color, result.level.color());
        }
    }

    /// Banding is monotone in the mean.
    #[test]
    fn banding_is_monotone(a in 1.0f64..=5.0, b in 1.0f64..=5.0) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(band(lo) <= band(hi));
    }

    /// Banding is total over the scale and hits the documented boundaries.
    #[test]
    fn banding_is_total(mean in 1.0f64..=5.0) {
        let level = band(mean);
        let expected = if mean < 2.0 {
            Level::VeryLow
        } else if mean < 3.0 {
            Level::Low
        } else if mean < 4.0 {
            Level::Medium
        } else if mean < 4.5 {
            Level::High
        } else {
            Level::VeryHigh
        };
        prop_assert_eq!(level, expected);
    }

    /// A sheet with any unanswered position never finalizes.
    #[test]
    fn incomplete_sheets_never_finalize(
        answers in vec(likert_strategy(), QUESTION_COUNT),
        hole in 1usize..=QUESTION_COUNT,
    ) {
        let mut sheet = AnswerSheet::new();
        for (idx, answer) in answers.into_iter().enumerate() {
            let position = idx + 1;
            if position != hole {
                sheet.set(position, answer).expect("in range");
            }
        }

        prop_assert!(!sheet.is_complete());
        prop_assert!(sheet.finalize().is_err());
    }
}
