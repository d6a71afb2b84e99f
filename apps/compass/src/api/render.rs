//! # Page Rendering
//!
//! The three survey pages as server-rendered HTML. Small `format!`-based
//! builders; user-provided strings always pass through [`escape`].
//!
//! The renderer sees question text and the Likert option set, never the
//! reverse-scored flags — those stay internal to scoring.

use super::types::IntakeForm;
use compass_core::{AnswerSheet, Likert, QUESTIONS, ScoreReport};

// =============================================================================
// HELPERS
// =============================================================================

/// Escape a string for interpolation into HTML text or attribute values.
fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Wrap page content in the shared document shell.
fn shell(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<style>
  body {{ font-family: sans-serif; max-width: 720px; margin: 2rem auto; padding: 0 1rem; color: #333; }}
  h1 {{ font-size: 1.6rem; }}
  fieldset {{ border: none; border-bottom: 1px solid #eee; margin: 0; padding: 1rem 0; }}
  legend {{ font-weight: bold; padding: 0; }}
  label {{ margin-right: 1rem; white-space: nowrap; }}
  input[type=text] {{ display: block; width: 100%; padding: 0.5rem; margin: 0.25rem 0 1rem; box-sizing: border-box; }}
  button {{ padding: 0.6rem 1.2rem; font-size: 1rem; cursor: pointer; }}
  .warning {{ background: #FFF3CD; border: 1px solid #FFE69C; padding: 0.75rem; border-radius: 6px; margin: 1rem 0; }}
  .card {{ padding: 20px; border-radius: 10px; text-align: center; margin-bottom: 20px; }}
  .card h3 {{ margin: 0; color: #333; font-weight: bold; }}
  .card .score {{ margin: 10px 0 0 0; color: #333; font-size: 2em; font-weight: bold; }}
  .card .level {{ margin: 0; color: #555; }}
</style>
</head>
<body>
{body}
</body>
</html>
"#,
        title = escape(title),
        body = body,
    )
}

/// Render the shared warning banner, if any.
fn warning_banner(warning: Option<&str>) -> String {
    match warning {
        Some(message) => format!(r#"<div class="warning">{}</div>"#, escape(message)),
        None => String::new(),
    }
}

// =============================================================================
// PAGE 1: INTAKE
// =============================================================================

/// The welcome page with the identity form.
#[must_use]
pub fn intake_page(
    session_path: &str,
    prefill: Option<&IntakeForm>,
    warning: Option<&str>,
) -> String {
    let name = prefill.map(|f| f.name.as_str()).unwrap_or_default();
    let affiliation = prefill.map(|f| f.affiliation.as_str()).unwrap_or_default();

    let body = format!(
        r#"<h1>Welcome to the Self-Compassion Test</h1>
<p>This questionnaire measures the different ways you might act towards yourself in difficult times. Please read each statement carefully and select the option that best describes you.</p>
{warning}
<form method="post" action="{path}/intake">
  <label for="name">Enter your name</label>
  <input type="text" id="name" name="name" value="{name}">
  <label for="affiliation">Enter your School/University</label>
  <input type="text" id="affiliation" name="affiliation" value="{affiliation}">
  <button type="submit">Start Questionnaire</button>
</form>"#,
        warning = warning_banner(warning),
        path = session_path,
        name = escape(name),
        affiliation = escape(affiliation),
    );

    shell("Self-Compassion Test", &body)
}

// =============================================================================
// PAGE 2: QUESTIONNAIRE
// =============================================================================

/// The 26-item questionnaire with one radio group per question. Previously
/// selected answers stay selected when the page re-renders after a
/// validation warning.
#[must_use]
pub fn questionnaire_page(
    session_path: &str,
    answers: &AnswerSheet,
    warning: Option<&str>,
) -> String {
    let mut items = String::new();
    for question in &QUESTIONS {
        let mut options = String::new();
        for option in Likert::ALL {
            let checked = if answers.get(question.position) == Some(option) {
                " checked"
            } else {
                ""
            };
            options.push_str(&format!(
                r#"<label><input type="radio" name="q{pos}" value="{label}"{checked}> {label}</label>"#,
                pos = question.position,
                label = option.label(),
                checked = checked,
            ));
        }

        items.push_str(&format!(
            r#"<fieldset>
  <legend>Q{pos}. {text}</legend>
  {options}
</fieldset>
"#,
            pos = question.position,
            text = escape(question.text),
            options = options,
        ));
    }

    let body = format!(
        r#"<h1>Self-Compassion Questionnaire</h1>
{warning}
<form method="post" action="{path}/questionnaire">
{items}
  <button type="submit">Submit &amp; See Your Results</button>
</form>"#,
        warning = warning_banner(warning),
        path = session_path,
        items = items,
    );

    shell("Self-Compassion Questionnaire", &body)
}

// =============================================================================
// PAGE 3: RESULTS
// =============================================================================

/// The color-coded profile with one card per section and the restart
/// button. `saved` being false adds the non-fatal storage warning.
#[must_use]
pub fn results_page(session_path: &str, report: &ScoreReport, saved: bool) -> String {
    let storage_warning = if saved {
        None
    } else {
        Some("Your responses could not be saved to the results sheet. Your scores below are unaffected.")
    };

    let mut cards = String::new();
    for (section, result) in report.iter() {
        cards.push_str(&format!(
            r#"<div class="card" style="background-color:{hex};">
  <h3>{label}</h3>
  <p class="score">{average:.2}</p>
  <p class="level">Level: {level}</p>
</div>
"#,
            hex = result.color.hex(),
            label = section.label(),
            average = result.average,
            level = result.level.label(),
        ));
    }

    let body = format!(
        r#"<h1>Thank You for Completing the Test!</h1>
<h2>Your Self-Compassion Profile</h2>
<p>Below are your scores for the three core components of self-compassion. A higher score indicates a greater tendency towards being self-compassionate in that area.</p>
{warning}
{cards}
<form method="post" action="{path}/restart">
  <button type="submit">Take the Test Again</button>
</form>"#,
        warning = warning_banner(storage_warning),
        cards = cards,
        path = session_path,
    );

    shell("Your Self-Compassion Profile", &body)
}

// =============================================================================
// ERROR PAGES
// =============================================================================

/// Unknown session id.
#[must_use]
pub fn not_found_page() -> String {
    let body = r#"<h1>Session not found</h1>
<p>This survey session does not exist or has expired.</p>
<form method="get" action="/">
  <button type="submit">Start a new survey</button>
</form>"#;
    shell("Session not found", body)
}

/// Internal failure while handling a request.
#[must_use]
pub fn error_page(message: &str) -> String {
    let body = format!(
        r#"<h1>Something went wrong</h1>
<p>{}</p>
<form method="get" action="/">
  <button type="submit">Start a new survey</button>
</form>"#,
        escape(message)
    );
    shell("Something went wrong", &body)
}

// =============================================================================
// TESTS
// =============================================================================
