//! # CLI Command Implementations

use crate::api;
use crate::config::AppConfig;
use crate::sheet::CsvSheet;
use compass_core::primitives::QUESTION_COUNT;
use compass_core::{AnswerSheet, CompassError, Likert, QUESTIONS, SessionStore, score_sheet};
use std::path::Path;
use std::sync::Arc;

// =============================================================================
// SERVE
// =============================================================================

/// Start the HTTP server with the resolved configuration.
pub async fn cmd_serve(
    config: &AppConfig,
    host: Option<String>,
    port: Option<u16>,
) -> Result<(), CompassError> {
    let host = host.unwrap_or_else(|| config.server.host.clone());
    let port = port.unwrap_or(config.server.port);

    let store = match &config.sessions.database {
        Some(path) => {
            tracing::info!("Session store: persistent at {:?}", path);
            SessionStore::persistent(path)?
        }
        None => {
            tracing::info!("Session store: in-memory (sessions do not survive restart)");
            SessionStore::in_memory()
        }
    };

    tracing::info!("Row log: {:?}", config.sheet.path);
    let sink = Arc::new(CsvSheet::new(config.sheet.path.clone()));

    let addr = format!("{}:{}", host, port);
    api::run_server(&addr, store, sink).await
}

// =============================================================================
// BANK
// =============================================================================

/// Print the question bank. The operator view — the only place reverse
/// flags are ever shown.
pub fn cmd_bank(json_mode: bool) -> Result<(), CompassError> {
    if json_mode {
        let bank: Vec<serde_json::Value> = QUESTIONS
            .iter()
            .map(|q| {
                serde_json::json!({
                    "position": q.position,
                    "section": q.section.label(),
                    "construct": q.section.construct(),
                    "reversed": q.reversed,
                    "text": q.text,
                })
            })
            .collect();
        let rendered = serde_json::to_string_pretty(&bank)
            .map_err(|e| CompassError::Serialization(e.to_string()))?;
        println!("{}", rendered);
        return Ok(());
    }

    for q in &QUESTIONS {
        let flag = if q.reversed { "R" } else { " " };
        println!("Q{:>2} {} [{}] {}", q.position, flag, q.section.label(), q.text);
    }
    println!();
    println!(
        "{} questions, {} reverse-scored. Options: {}",
        QUESTIONS.len(),
        QUESTIONS.iter().filter(|q| q.reversed).count(),
        Likert::ALL.map(|l| l.label()).join(", "),
    );
    Ok(())
}

// =============================================================================
// SCORE
// =============================================================================

/// Score a JSON file holding an array of 26 Likert labels and print the
/// section results. Exercises the engine without the server.
pub fn cmd_score(file: &Path, json_mode: bool) -> Result<(), CompassError> {
    let raw = std::fs::read_to_string(file)
        .map_err(|e| CompassError::Io(format!("read {:?}: {}", file, e)))?;
    let labels: Vec<String> = serde_json::from_str(&raw)
        .map_err(|e| CompassError::Serialization(format!("parse {:?}: {}", file, e)))?;

    if labels.len() != QUESTION_COUNT {
        return Err(CompassError::Validation(format!(
            "Expected {} responses, found {}",
            QUESTION_COUNT,
            labels.len()
        )));
    }

    let mut sheet = AnswerSheet::new();
    for (idx, label) in labels.iter().enumerate() {
        let answer = Likert::from_label(label).ok_or_else(|| {
            CompassError::Validation(format!(
                "Unrecognized response {:?} at position {}",
                label,
                idx + 1
            ))
        })?;
        sheet.set(idx + 1, answer)?;
    }

    let report = score_sheet(&sheet)?;

    if json_mode {
        let response = api::ReportResponse::from_report(&report);
        let rendered = serde_json::to_string_pretty(&response)
            .map_err(|e| CompassError::Serialization(e.to_string()))?;
        println!("{}", rendered);
        return Ok(());
    }

    for (section, result) in report.iter() {
        println!(
            "{}  {:.2}  {} ({})  -  {}",
            section.label(),
            result.average,
            result.level.label(),
            result.color.label(),
            section.construct(),
        );
    }
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================
