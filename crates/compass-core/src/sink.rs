//! # Row-Log Port
//!
//! The persistence boundary: one append-only operation against an external
//! spreadsheet-like store.
//!
//! # Extension Point
//!
//! [`RowSink`] is intentionally defined without in-crate implementations.
//! Backends (a CSV file, a hosted sheet API, a recording fake in tests) live
//! in the app layer and are injected, so the scoring and state-machine core
//! is testable without credentials or I/O.

use crate::primitives::QUESTION_COUNT;
use crate::types::{CompassError, Identity, Likert};

// =============================================================================
// SHEET ROW
// =============================================================================

/// The raw record appended once per completed questionnaire: identity plus
/// the 26 selected labels in canonical order, exactly as chosen
/// (reverse-coding never touches the stored row).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRow {
    pub name: String,
    pub affiliation: String,
    pub labels: [&'static str; QUESTION_COUNT],
}

impl SheetRow {
    /// Build the row for a completed response set.
    #[must_use]
    pub fn new(identity: &Identity, responses: &[Likert; QUESTION_COUNT]) -> Self {
        let mut labels = [""; QUESTION_COUNT];
        for (slot, answer) in labels.iter_mut().zip(responses.iter()) {
            *slot = answer.label();
        }
        Self {
            name: identity.name.clone(),
            affiliation: identity.affiliation.clone(),
            labels,
        }
    }

    /// All fields in storage order: name, affiliation, then the 26 labels.
    #[must_use]
    pub fn fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str(), self.affiliation.as_str()];
        for label in self.labels {
            fields.push(label);
        }
        fields
    }
}

// =============================================================================
// ROW SINK
// =============================================================================

/// Append-only store for completed submissions.
///
/// A single fallible operation; each append is one atomic row from the
/// store's perspective. No retry policy — failures surface to the caller,
/// which reports them as a non-fatal warning.
pub trait RowSink: Send + Sync {
    /// Append one row. Fire-and-forget semantics: the caller proceeds to the
    /// results page whether or not this succeeds.
    fn append_row(&self, row: &SheetRow) -> Result<(), CompassError>;
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_fields_are_ordered() {
        let identity = Identity::new("Ada", "MIT").expect("valid");
        let responses = [Likert::Often; QUESTION_COUNT];
        let row = SheetRow::new(&identity, &responses);

        let fields = row.fields();
        assert_eq!(fields.len(), 2 + QUESTION_COUNT);
        assert_eq!(fields[0], "Ada");
        assert_eq!(fields[1], "MIT");
        assert!(fields[2..].iter().all(|f| *f == "Often"));
    }

    #[test]
    fn row_stores_raw_labels() {
        let identity = Identity::new("Ada", "MIT").expect("valid");
        let mut responses = [Likert::Never; QUESTION_COUNT];
        responses[5] = Likert::AlmostAlways; // position 6 is reverse-scored

        let row = SheetRow::new(&identity, &responses);
        // The stored label is the raw selection, not the processed score.
        assert_eq!(row.labels[5], "Almost Always");
    }
}
