//! # Core Type Definitions
//!
//! This module contains all core types for the Compass survey engine:
//! - The Likert scale (`Likert`)
//! - Section identity and banding (`Section`, `Level`, `Color`)
//! - Scoring output (`SectionResult`, `ScoreReport`)
//! - Respondent identity (`Identity`)
//! - Error types (`CompassError`)
//!
//! ## Determinism Guarantees
//!
//! All enums in this module implement `Ord` so that `BTreeMap`-keyed output
//! iterates in the fixed, canonical order (sections one to three, scale
//! labels never to almost-always).

use crate::primitives::{MAX_IDENTITY_LENGTH, REVERSAL_PIVOT, SECTION_COUNT};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::RangeInclusive;
use thiserror::Error;

// =============================================================================
// LIKERT SCALE
// =============================================================================

/// One of the five ordinal self-report categories.
///
/// Declaration order is the canonical option order shown to respondents and
/// doubles as the ordinal score: `Never` = 1 up to `AlmostAlways` = 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Likert {
    Never,
    Rarely,
    Sometimes,
    Often,
    AlmostAlways,
}

impl Likert {
    /// All options in canonical order.
    pub const ALL: [Likert; 5] = [
        Likert::Never,
        Likert::Rarely,
        Likert::Sometimes,
        Likert::Often,
        Likert::AlmostAlways,
    ];

    /// The ordinal score of this option (1..=5).
    #[must_use]
    pub const fn score(self) -> u8 {
        match self {
            Likert::Never => 1,
            Likert::Rarely => 2,
            Likert::Sometimes => 3,
            Likert::Often => 4,
            Likert::AlmostAlways => 5,
        }
    }

    /// The ordinal score after reverse-coding (`6 - score`).
    #[must_use]
    pub const fn reversed_score(self) -> u8 {
        REVERSAL_PIVOT - self.score()
    }

    /// The display label, exactly as rendered and as stored in the row log.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Likert::Never => "Never",
            Likert::Rarely => "Rarely",
            Likert::Sometimes => "Sometimes",
            Likert::Often => "Often",
            Likert::AlmostAlways => "Almost Always",
        }
    }

    /// Parse a display label back into an option.
    ///
    /// Returns `None` for anything that is not one of the five labels;
    /// callers at the form boundary turn that into a validation warning.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        Likert::ALL.into_iter().find(|l| l.label() == label)
    }
}

impl std::fmt::Display for Likert {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// SECTIONS
// =============================================================================

/// One of the three fixed question groupings.
///
/// Declaration order is the canonical section order; each section covers a
/// fixed, contiguous, non-overlapping range of 1-based question positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Section {
    SelfKindness,
    CommonHumanity,
    Mindfulness,
}

impl Section {
    /// All sections in canonical order.
    pub const ALL: [Section; SECTION_COUNT] = [
        Section::SelfKindness,
        Section::CommonHumanity,
        Section::Mindfulness,
    ];

    /// Display label used on the results page and in the row log.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Section::SelfKindness => "Section 1",
            Section::CommonHumanity => "Section 2",
            Section::Mindfulness => "Section 3",
        }
    }

    /// The bipolar construct this section measures.
    #[must_use]
    pub const fn construct(self) -> &'static str {
        match self {
            Section::SelfKindness => "Self-Kindness vs. Self-Judgment",
            Section::CommonHumanity => "Common Humanity vs. Isolation",
            Section::Mindfulness => "Mindfulness vs. Over-Identification",
        }
    }

    /// The 1-based question positions belonging to this section.
    #[must_use]
    pub const fn positions(self) -> RangeInclusive<usize> {
        match self {
            Section::SelfKindness => 1..=10,
            Section::CommonHumanity => 11..=18,
            Section::Mindfulness => 19..=26,
        }
    }
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// BANDING
// =============================================================================

/// Qualitative level a section average bands into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Level {
    VeryLow,
    Low,
    Medium,
    High,
    VeryHigh,
}

impl Level {
    /// Display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Level::VeryLow => "Very Low",
            Level::Low => "Low",
            Level::Medium => "Medium",
            Level::High => "High",
            Level::VeryHigh => "Very High",
        }
    }

    /// The display color paired with this level.
    #[must_use]
    pub const fn color(self) -> Color {
        match self {
            Level::VeryLow => Color::Yellow,
            Level::Low => Color::Blue,
            Level::Medium => Color::Pink,
            Level::High => Color::Green,
            Level::VeryHigh => Color::Orange,
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Display color for a banded level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Color {
    Yellow,
    Blue,
    Pink,
    Green,
    Orange,
}

impl Color {
    /// Display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Color::Yellow => "Yellow",
            Color::Blue => "Blue",
            Color::Pink => "Pink",
            Color::Green => "Green",
            Color::Orange => "Orange",
        }
    }

    /// The hex value the results page paints the card with.
    #[must_use]
    pub const fn hex(self) -> &'static str {
        match self {
            Color::Yellow => "#FFE35A",
            Color::Blue => "#96C9DC",
            Color::Pink => "#FCD3DE",
            Color::Green => "#C8EDC7",
            Color::Orange => "#FFA845",
        }
    }
}

// =============================================================================
// SCORING OUTPUT
// =============================================================================

/// The scored outcome for one section.
///
/// `average` is rounded to two decimals for display and storage; the banding
/// that produced `level` used the unrounded mean.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionResult {
    pub average: f64,
    pub level: Level,
    pub color: Color,
}

/// Scored results for all sections, in canonical section order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ScoreReport {
    sections: BTreeMap<Section, SectionResult>,
}

impl ScoreReport {
    /// Build a report from per-section results.
    #[must_use]
    pub fn new(sections: BTreeMap<Section, SectionResult>) -> Self {
        Self { sections }
    }

    /// Get the result for one section.
    #[must_use]
    pub fn section(&self, section: Section) -> Option<&SectionResult> {
        self.sections.get(&section)
    }

    /// Iterate results in canonical section order.
    pub fn iter(&self) -> impl Iterator<Item = (Section, &SectionResult)> {
        self.sections.iter().map(|(s, r)| (*s, r))
    }

    /// Number of scored sections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// True if no sections have been scored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

// =============================================================================
// IDENTITY
// =============================================================================

/// Respondent identity collected on the intake page.
///
/// Both fields are trimmed and must be non-empty; construction is the
/// validation guard for the `Intake -> Questionnaire` transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub name: String,
    pub affiliation: String,
}

impl Identity {
    /// Validate and build an identity from raw form input.
    pub fn new(name: &str, affiliation: &str) -> Result<Self, CompassError> {
        let name = name.trim();
        let affiliation = affiliation.trim();

        if name.is_empty() || affiliation.is_empty() {
            return Err(CompassError::Validation(
                "Please fill in all fields before starting.".to_string(),
            ));
        }
        if name.len() > MAX_IDENTITY_LENGTH || affiliation.len() > MAX_IDENTITY_LENGTH {
            return Err(CompassError::Validation(format!(
                "Name and affiliation must each be at most {} bytes",
                MAX_IDENTITY_LENGTH
            )));
        }

        Ok(Self {
            name: name.to_string(),
            affiliation: affiliation.to_string(),
        })
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the Compass system.
///
/// - No silent failures
/// - Use `Result<T, CompassError>` for fallible operations
/// - The CORE should never panic; all errors must be recoverable
#[derive(Debug, Error)]
pub enum CompassError {
    /// A state-transition guard failed; the session stays on its page and
    /// the message is shown as a warning, never as a crash.
    #[error("{0}")]
    Validation(String),

    /// The scoring engine's completeness precondition was violated.
    /// The state machine converts this into `Validation` at the guard, so a
    /// correct caller never surfaces it.
    #[error("Incomplete responses: {missing} question(s) unanswered")]
    IncompleteInput { missing: usize },

    /// The external row log rejected or failed an append. Caught at the
    /// submit boundary and reported as a non-fatal warning.
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// A serialization or deserialization error occurred.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(String),
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn likert_scores_are_ordinal() {
        let scores: Vec<u8> = Likert::ALL.into_iter().map(Likert::score).collect();
        assert_eq!(scores, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn likert_label_roundtrip() {
        for likert in Likert::ALL {
            assert_eq!(Likert::from_label(likert.label()), Some(likert));
        }
        assert_eq!(Likert::from_label("Always"), None);
        assert_eq!(Likert::from_label(""), None);
    }

    #[test]
    fn reversal_is_an_involution() {
        for likert in Likert::ALL {
            let once = likert.reversed_score();
            assert_eq!(REVERSAL_PIVOT - once, likert.score());
        }
    }

    #[test]
    fn sections_partition_all_positions() {
        let mut covered = Vec::new();
        for section in Section::ALL {
            covered.extend(section.positions());
        }
        assert_eq!(covered, (1..=26).collect::<Vec<_>>());
    }

    #[test]
    fn section_order_is_canonical() {
        assert!(Section::SelfKindness < Section::CommonHumanity);
        assert!(Section::CommonHumanity < Section::Mindfulness);
    }

    #[test]
    fn level_color_pairing() {
        assert_eq!(Level::VeryLow.color(), Color::Yellow);
        assert_eq!(Level::Low.color(), Color::Blue);
        assert_eq!(Level::Medium.color(), Color::Pink);
        assert_eq!(Level::High.color(), Color::Green);
        assert_eq!(Level::VeryHigh.color(), Color::Orange);
    }

    #[test]
    fn identity_requires_both_fields() {
        assert!(Identity::new("Ada", "MIT").is_ok());
        assert!(Identity::new("", "MIT").is_err());
        assert!(Identity::new("Ada", "").is_err());
        assert!(Identity::new("   ", "MIT").is_err());
    }

    #[test]
    fn identity_trims_whitespace() {
        let identity = Identity::new("  Ada ", " MIT  ").expect("valid");
        assert_eq!(identity.name, "Ada");
        assert_eq!(identity.affiliation, "MIT");
    }
}
