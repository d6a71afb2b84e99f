//! # API Request/Response Types
//!
//! Form payloads posted by the survey pages and the JSON structures served
//! by the programmatic endpoints.

use compass_core::primitives::{MAX_IDENTITY_LENGTH, QUESTION_COUNT};
use compass_core::{AnswerSheet, CompassError, Likert, ScoreReport};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// =============================================================================
// HEALTH RESPONSE
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

// =============================================================================
// INTAKE FORM
// =============================================================================

/// Page 1 form payload.
///
/// Length is capped here at the boundary; emptiness is the state machine's
/// guard, so the warning text comes from one place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntakeForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub affiliation: String,
}

impl IntakeForm {
    /// Reject oversized fields before they reach the session.
    pub fn validate_lengths(&self) -> Result<(), CompassError> {
        if self.name.len() > MAX_IDENTITY_LENGTH || self.affiliation.len() > MAX_IDENTITY_LENGTH {
            return Err(CompassError::Validation(format!(
                "Name and affiliation must each be at most {} bytes.",
                MAX_IDENTITY_LENGTH
            )));
        }
        Ok(())
    }
}

// =============================================================================
// QUESTIONNAIRE FORM
// =============================================================================

/// Parse the page 2 form fields (`q1`..`q26`, each a Likert label) into an
/// answer sheet.
///
/// Unanswered radios are simply absent from the form body and stay
/// unanswered on the sheet — completeness is the transition guard's job. A
/// present-but-unrecognized label means a tampered form and is rejected.
pub fn sheet_from_form(fields: &BTreeMap<String, String>) -> Result<AnswerSheet, CompassError> {
    let mut sheet = AnswerSheet::new();

    for position in 1..=QUESTION_COUNT {
        let key = format!("q{}", position);
        let Some(raw) = fields.get(&key) else {
            continue;
        };
        let answer = Likert::from_label(raw).ok_or_else(|| {
            CompassError::Validation(format!("Unrecognized response for question {}.", position))
        })?;
        sheet.set(position, answer)?;
    }

    Ok(sheet)
}

// =============================================================================
// REPORT RESPONSE
// =============================================================================

/// One section's scored outcome, as served over JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionJson {
    pub construct: String,
    pub average: f64,
    pub level: String,
    pub color: String,
    pub hex: String,
}

/// The full report keyed by section label, in canonical order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportResponse {
    pub sections: BTreeMap<String, SectionJson>,
}

impl ReportResponse {
    /// Build the JSON view of a computed report.
    #[must_use]
    pub fn from_report(report: &ScoreReport) -> Self {
        let sections = report
            .iter()
            .map(|(section, result)| {
                (
                    section.label().to_string(),
                    SectionJson {
                        construct: section.construct().to_string(),
                        average: result.average,
                        level: result.level.label().to_string(),
                        color: result.color.label().to_string(),
                        hex: result.color.hex().to_string(),
                    },
                )
            })
            .collect();
        Self { sections }
    }
}

/// Error payload for the JSON endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
}

impl ApiError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self { error: msg.into() }
    }
}

// =============================================================================
// TESTS
// =============================================================================
