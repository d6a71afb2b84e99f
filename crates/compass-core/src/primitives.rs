//! # Innate Primitives
//!
//! Hardcoded runtime constants for the Compass CORE.
//!
//! Compass starts with a fixed question bank and fixed scoring logic.
//! These values are compiled into the binary and are immutable at runtime.

/// Number of questions in the bank.
///
/// The scoring engine takes exactly this many responses; the type system
/// enforces it via `[Likert; QUESTION_COUNT]`.
pub const QUESTION_COUNT: usize = 26;

/// Number of scored sections.
pub const SECTION_COUNT: usize = 3;

/// Pivot used to reverse-score an item: `s -> REVERSAL_PIVOT - s`.
///
/// With ordinal scores in 1..=5 this maps 1<->5, 2<->4 and fixes 3.
pub const REVERSAL_PIVOT: u8 = 6;

/// Decimal places kept when a section average is stored for display.
///
/// Banding always happens on the unrounded mean; rounding is presentation.
pub const SCORE_DECIMALS: u32 = 2;

/// Magic bytes for the Compass session-state format header.
///
/// - File Header = Magic Bytes ("CMPS") + Version (u8) before payload.
pub const MAGIC_BYTES: &[u8; 4] = b"CMPS";

/// Current serialization format version.
///
/// Increment this when making breaking changes to the session-state format.
pub const FORMAT_VERSION: u8 = 1;

// =============================================================================
// INPUT VALIDATION LIMITS
// =============================================================================

/// Maximum length for the name and affiliation fields.
///
/// Longer values are rejected at the API boundary before they reach the
/// session state machine.
pub const MAX_IDENTITY_LENGTH: usize = 256;

/// Maximum allowed payload size for a serialized session state.
///
/// A session holds an identity, 26 answers, and three section results;
/// anything near this bound is corrupt or hostile. Validated BEFORE
/// deserialization.
pub const MAX_STATE_PAYLOAD_SIZE: usize = 64 * 1024;
