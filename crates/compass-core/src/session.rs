//! # Session State Machine
//!
//! One respondent's pass through the survey: `Intake` (page 1) ->
//! `Questionnaire` (page 2) -> `Results` (page 3) -> manual reset.
//!
//! Transitions are guarded; a failed guard leaves the state untouched and
//! returns a `Validation` error for the caller to render as a warning. The
//! `Questionnaire -> Results` transition is the only one with an external
//! effect: it returns a one-shot [`Submission`] carrying the row to append,
//! so persistence is tied to the transition event itself — re-rendering the
//! results page can never produce another row.

use crate::answers::AnswerSheet;
use crate::scoring::score_responses;
use crate::sink::SheetRow;
use crate::types::{CompassError, Identity, ScoreReport};
use serde::{Deserialize, Serialize};

// =============================================================================
// PAGE
// =============================================================================

/// The three pages of the survey flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum Page {
    #[default]
    Intake,
    Questionnaire,
    Results,
}

impl Page {
    /// 1-based page number, as shown to the respondent.
    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            Page::Intake => 1,
            Page::Questionnaire => 2,
            Page::Results => 3,
        }
    }
}

// =============================================================================
// SUBMISSION
// =============================================================================

/// The outcome of a successful `Questionnaire -> Results` transition.
///
/// Produced at most once per completed questionnaire. The caller appends
/// `row` to the row sink; `report` is what the results page renders.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub row: SheetRow,
    pub report: ScoreReport,
}

// =============================================================================
// SESSION STATE
// =============================================================================

/// Everything one session has collected so far.
///
/// Serializable so the app layer can round-trip it through the session
/// store between page loads. Owns no I/O.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SessionState {
    page: Page,
    identity: Option<Identity>,
    answers: AnswerSheet,
    report: Option<ScoreReport>,
}

impl SessionState {
    /// A fresh session on the intake page.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The page this session is on.
    #[must_use]
    pub fn page(&self) -> Page {
        self.page
    }

    /// The collected identity, once intake has passed.
    #[must_use]
    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    /// The answers collected so far (possibly partial).
    #[must_use]
    pub fn answers(&self) -> &AnswerSheet {
        &self.answers
    }

    /// The computed report, once in `Results`.
    #[must_use]
    pub fn report(&self) -> Option<&ScoreReport> {
        self.report.as_ref()
    }

    // =========================================================================
    // TRANSITIONS
    // =========================================================================

    /// `Intake -> Questionnaire`.
    ///
    /// Guarded on both identity fields being non-empty after trimming. On
    /// failure the session stays on the intake page and the error message is
    /// the user-facing warning.
    pub fn begin_questionnaire(
        &mut self,
        name: &str,
        affiliation: &str,
    ) -> Result<(), CompassError> {
        if self.page != Page::Intake {
            return Err(CompassError::Validation(
                "The questionnaire has already been started.".to_string(),
            ));
        }

        let identity = Identity::new(name, affiliation)?;
        self.identity = Some(identity);
        self.page = Page::Questionnaire;
        Ok(())
    }

    /// `Questionnaire -> Results`.
    ///
    /// Stores the submitted sheet either way (so a re-rendered form keeps
    /// the respondent's selections), then requires completeness. On success
    /// the scoring engine runs, the report is stored, and the one-shot
    /// [`Submission`] is returned for the caller to persist.
    pub fn submit_questionnaire(
        &mut self,
        sheet: AnswerSheet,
    ) -> Result<Submission, CompassError> {
        if self.page != Page::Questionnaire {
            return Err(CompassError::Validation(
                "There is no questionnaire in progress.".to_string(),
            ));
        }

        self.answers = sheet;

        let responses = match self.answers.finalize() {
            Ok(responses) => responses,
            Err(CompassError::IncompleteInput { missing }) => {
                return Err(CompassError::Validation(format!(
                    "Please answer all questions before submitting ({} remaining).",
                    missing
                )));
            }
            Err(other) => return Err(other),
        };

        let identity = self.identity.clone().ok_or_else(|| {
            CompassError::Validation("Please fill in your details first.".to_string())
        })?;

        let report = score_responses(&responses);
        let row = SheetRow::new(&identity, &responses);

        self.report = Some(report.clone());
        self.page = Page::Results;

        Ok(Submission { row, report })
    }

    /// `Results -> Intake` (and from anywhere, defensively): discard all
    /// collected data and return to page 1. Unconditional.
    pub fn restart(&mut self) {
        *self = Self::new();
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::QUESTION_COUNT;
    use crate::types::{Level, Likert};

    fn complete_sheet(answer: Likert) -> AnswerSheet {
        let mut sheet = AnswerSheet::new();
        for position in 1..=QUESTION_COUNT {
            sheet.set(position, answer).expect("set");
        }
        sheet
    }

    #[test]
    fn fresh_session_starts_on_intake() {
        let session = SessionState::new();
        assert_eq!(session.page(), Page::Intake);
        assert_eq!(session.page().number(), 1);
        assert!(session.identity().is_none());
        assert!(session.report().is_none());
    }

    #[test]
    fn incomplete_identity_stays_on_intake() {
        let mut session = SessionState::new();
        assert!(session.begin_questionnaire("", "MIT").is_err());
        assert!(session.begin_questionnaire("Ada", "  ").is_err());

        assert_eq!(session.page(), Page::Intake);
        assert!(session.identity().is_none());
    }

    #[test]
    fn valid_identity_advances_to_questionnaire() {
        let mut session = SessionState::new();
        session.begin_questionnaire("Ada", "MIT").expect("advance");

        assert_eq!(session.page(), Page::Questionnaire);
        assert_eq!(session.identity().map(|i| i.name.as_str()), Some("Ada"));
    }

    #[test]
    fn intake_cannot_run_twice() {
        let mut session = SessionState::new();
        session.begin_questionnaire("Ada", "MIT").expect("advance");
        assert!(session.begin_questionnaire("Grace", "Yale").is_err());
        assert_eq!(session.identity().map(|i| i.name.as_str()), Some("Ada"));
    }

    #[test]
    fn incomplete_answers_stay_on_questionnaire() {
        let mut session = SessionState::new();
        session.begin_questionnaire("Ada", "MIT").expect("advance");

        let mut sheet = AnswerSheet::new();
        sheet.set(1, Likert::Often).expect("set");
        let result = session.submit_questionnaire(sheet);

        assert!(matches!(result, Err(CompassError::Validation(_))));
        assert_eq!(session.page(), Page::Questionnaire);
        assert!(session.report().is_none());
        // The partial selection survives for re-rendering.
        assert_eq!(session.answers().get(1), Some(Likert::Often));
    }

    #[test]
    fn complete_answers_reach_results_with_one_submission() {
        let mut session = SessionState::new();
        session.begin_questionnaire("Ada", "MIT").expect("advance");

        let submission = session
            .submit_questionnaire(complete_sheet(Likert::Sometimes))
            .expect("submit");

        assert_eq!(session.page(), Page::Results);
        assert_eq!(submission.row.name, "Ada");
        assert_eq!(submission.row.affiliation, "MIT");
        assert!(submission.row.labels.iter().all(|l| *l == "Sometimes"));

        let report = session.report().expect("stored");
        assert_eq!(report, &submission.report);
        for (_, result) in report.iter() {
            assert_eq!(result.level, Level::Medium);
        }

        // Being in Results never yields another submission.
        let replay = session.submit_questionnaire(complete_sheet(Likert::Sometimes));
        assert!(matches!(replay, Err(CompassError::Validation(_))));
        assert_eq!(session.page(), Page::Results);
    }

    #[test]
    fn submitting_before_intake_is_rejected() {
        let mut session = SessionState::new();
        let result = session.submit_questionnaire(complete_sheet(Likert::Never));
        assert!(matches!(result, Err(CompassError::Validation(_))));
        assert_eq!(session.page(), Page::Intake);
    }

    #[test]
    fn restart_discards_everything() {
        let mut session = SessionState::new();
        session.begin_questionnaire("Ada", "MIT").expect("advance");
        session
            .submit_questionnaire(complete_sheet(Likert::Often))
            .expect("submit");

        session.restart();

        assert_eq!(session.page(), Page::Intake);
        assert!(session.identity().is_none());
        assert!(session.report().is_none());
        assert_eq!(session.answers().answered_count(), 0);
    }

    #[test]
    fn state_roundtrips_through_serde() {
        let mut session = SessionState::new();
        session.begin_questionnaire("Ada", "MIT").expect("advance");

        let encoded = postcard::to_stdvec(&session).expect("encode");
        let decoded: SessionState = postcard::from_bytes(&encoded).expect("decode");
        assert_eq!(session, decoded);
    }
}
