//! # Scoring Engine
//!
//! Pure function from 26 ordered Likert responses to three labeled section
//! results.
//!
//! The pipeline: ordinal score per item, reverse-coding where the bank flags
//! it, per-section arithmetic mean, banding of the unrounded mean into a
//! level/color pair, rounding to two decimals for display.
//!
//! No side effects, no hidden state; identical input produces bit-identical
//! output.

use crate::answers::AnswerSheet;
use crate::bank::{QUESTIONS, Question, section_questions};
use crate::primitives::QUESTION_COUNT;
use crate::types::{CompassError, Level, Likert, ScoreReport, Section, SectionResult};
use std::collections::BTreeMap;

// =============================================================================
// BAND BOUNDARIES
// =============================================================================
//
// Half-open on the real line: lower bound inclusive, upper exclusive, with
// the final band closed at 5. A mean of exactly 2.0 is Low, exactly 4.5 is
// Very High.

/// Means below this are Very Low.
pub const BAND_LOW: f64 = 2.0;

/// Means below this (and at least `BAND_LOW`) are Low.
pub const BAND_MEDIUM: f64 = 3.0;

/// Means below this (and at least `BAND_MEDIUM`) are Medium.
pub const BAND_HIGH: f64 = 4.0;

/// Means below this (and at least `BAND_HIGH`) are High; at or above, Very High.
pub const BAND_VERY_HIGH: f64 = 4.5;

// =============================================================================
// ITEM SCORING
// =============================================================================

/// The processed 1..=5 score for one item: the ordinal value, reverse-coded
/// when the bank flags the question.
#[must_use]
pub fn item_score(question: &Question, answer: Likert) -> u8 {
    if question.reversed {
        answer.reversed_score()
    } else {
        answer.score()
    }
}

// =============================================================================
// BANDING
// =============================================================================

/// Band a section mean into its qualitative level.
///
/// Callers must pass the unrounded mean; rounding first can move a value
/// across a boundary.
#[must_use]
pub fn band(mean: f64) -> Level {
    if mean < BAND_LOW {
        Level::VeryLow
    } else if mean < BAND_MEDIUM {
        Level::Low
    } else if mean < BAND_HIGH {
        Level::Medium
    } else if mean < BAND_VERY_HIGH {
        Level::High
    } else {
        Level::VeryHigh
    }
}

/// Round a mean to the displayed precision (two decimals).
#[must_use]
pub fn round_for_display(mean: f64) -> f64 {
    let factor = 10f64.powi(crate::primitives::SCORE_DECIMALS as i32);
    (mean * factor).round() / factor
}

// =============================================================================
// THE ENGINE
// =============================================================================

/// Score a complete, ordered response set.
///
/// Input completeness is enforced by the array type; use
/// [`AnswerSheet::finalize`] to get here from interactively collected
/// answers. Output is one [`SectionResult`] per section, in canonical
/// section order.
#[must_use]
pub fn score_responses(responses: &[Likert; QUESTION_COUNT]) -> ScoreReport {
    let mut sections = BTreeMap::new();

    for section in Section::ALL {
        let mut sum = 0u32;
        let mut count = 0u32;
        for question in section_questions(section) {
            let answer = responses[question.position - 1];
            sum += u32::from(item_score(question, answer));
            count += 1;
        }

        // Sections are never empty (bank invariant), so count >= 1.
        let mean = f64::from(sum) / f64::from(count.max(1));
        let level = band(mean);

        sections.insert(
            section,
            SectionResult {
                average: round_for_display(mean),
                level,
                color: level.color(),
            },
        );
    }

    ScoreReport::new(sections)
}

/// Score an interactively collected sheet, checking completeness first.
pub fn score_sheet(sheet: &AnswerSheet) -> Result<ScoreReport, CompassError> {
    let responses = sheet.finalize()?;
    Ok(score_responses(&responses))
}

/// The processed scores for a complete response set, in position order.
///
/// A diagnostic view: the report itself only carries section aggregates.
#[must_use]
pub fn processed_scores(responses: &[Likert; QUESTION_COUNT]) -> [u8; QUESTION_COUNT] {
    let mut scores = [0u8; QUESTION_COUNT];
    for (slot, question) in scores.iter_mut().zip(QUESTIONS.iter()) {
        *slot = item_score(question, responses[question.position - 1]);
    }
    scores
}

// =============================================================================
// TESTS
// =============================================================================
