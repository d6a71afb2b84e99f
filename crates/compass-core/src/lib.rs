//! # compass-core
//!
//! The deterministic survey engine for Compass - THE LOGIC.
//!
//! This crate implements the core of the three-page self-compassion survey:
//! the fixed 26-item question bank, the Likert scale, the reverse-scoring
//! and banding engine, the session state machine, and the session-store
//! plumbing.
//!
//! ## Architectural Constraints
//!
//! The CORE:
//! - Is pure and synchronous: no async, no network dependencies
//! - Is deterministic: fixed tables, `BTreeMap` ordering, no randomness
//! - Owns no presentation: rendering and transport live in the app layer
//! - Defines the persistence port (`RowSink`); backends are injected

// =============================================================================
// MODULES
// =============================================================================

pub mod answers;
pub mod bank;
pub mod formats;
pub mod primitives;
pub mod scoring;
pub mod session;
pub mod sink;
pub mod storage;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{
    Color, CompassError, Identity, Level, Likert, ScoreReport, Section, SectionResult,
};

// =============================================================================
// RE-EXPORTS: Survey Engine
// =============================================================================

pub use answers::AnswerSheet;
pub use bank::{QUESTIONS, Question};
pub use scoring::{band, score_responses, score_sheet};
pub use session::{Page, SessionState, Submission};
pub use sink::{RowSink, SheetRow};

// =============================================================================
// RE-EXPORTS: Formats & Storage
// =============================================================================

pub use formats::{state_from_bytes, state_to_bytes};
pub use storage::{RedbSessions, SessionStore, StoreBackend};
