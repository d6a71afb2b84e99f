//! # Persistence Format
//!
//! Binary serialization for session state.
//!
//! Format: Header (5 bytes) + postcard-serialized session payload.
//! - 4 bytes: Magic ("CMPS")
//! - 1 byte: Version
//!
//! Pre-deserialization validation keeps corrupt or hostile store contents
//! from reaching the payload parser:
//! - Maximum payload size limit (`MAX_STATE_PAYLOAD_SIZE`)
//! - Header validation before payload parsing
//! - Graceful error handling for truncated data

use crate::primitives::{self, MAX_STATE_PAYLOAD_SIZE};
use crate::session::SessionState;
use crate::types::CompassError;

/// Minimum valid payload size (header only).
const MIN_PAYLOAD_SIZE: usize = 5;

// =============================================================================
// HEADER
// =============================================================================

/// The persistence header precedes every serialized session state.
#[derive(Debug, Clone, Copy)]
pub struct PersistenceHeader {
    pub magic: [u8; 4],
    pub version: u8,
}

impl PersistenceHeader {
    /// Create a new header with the current format version.
    #[must_use]
    pub fn new() -> Self {
        Self {
            magic: *primitives::MAGIC_BYTES,
            version: primitives::FORMAT_VERSION,
        }
    }

    /// Validate the header.
    pub fn validate(&self) -> Result<(), CompassError> {
        if &self.magic != primitives::MAGIC_BYTES {
            return Err(CompassError::Serialization(
                "Invalid magic bytes".to_string(),
            ));
        }
        if self.version != primitives::FORMAT_VERSION {
            return Err(CompassError::Serialization(format!(
                "Unsupported version: {} (expected {})",
                self.version,
                primitives::FORMAT_VERSION
            )));
        }
        Ok(())
    }

    /// Write header to bytes.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; 5] {
        let mut bytes = [0u8; 5];
        bytes[0..4].copy_from_slice(&self.magic);
        bytes[4] = self.version;
        bytes
    }

    /// Read header from bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CompassError> {
        if bytes.len() < MIN_PAYLOAD_SIZE {
            return Err(CompassError::Serialization("Header too short".to_string()));
        }
        let mut magic = [0u8; 4];
        magic.copy_from_slice(&bytes[0..4]);
        Ok(Self {
            magic,
            version: bytes[4],
        })
    }
}

impl Default for PersistenceHeader {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// SERIALIZATION FUNCTIONS
// =============================================================================

/// Serialize a session state to bytes (header + payload).
pub fn state_to_bytes(state: &SessionState) -> Result<Vec<u8>, CompassError> {
    let header = PersistenceHeader::new();

    let payload =
        postcard::to_stdvec(state).map_err(|e| CompassError::Serialization(e.to_string()))?;

    let mut result = Vec::with_capacity(MIN_PAYLOAD_SIZE + payload.len());
    result.extend_from_slice(&header.to_bytes());
    result.extend_from_slice(&payload);

    Ok(result)
}

/// Deserialize a session state from bytes.
///
/// Size and header are validated BEFORE the payload is parsed.
pub fn state_from_bytes(bytes: &[u8]) -> Result<SessionState, CompassError> {
    if bytes.len() < MIN_PAYLOAD_SIZE {
        return Err(CompassError::Serialization(
            "Data too short: minimum 5 bytes required".to_string(),
        ));
    }

    if bytes.len() > MAX_STATE_PAYLOAD_SIZE {
        return Err(CompassError::Serialization(format!(
            "Data size {} bytes exceeds maximum allowed {} bytes",
            bytes.len(),
            MAX_STATE_PAYLOAD_SIZE
        )));
    }

    let header = PersistenceHeader::from_bytes(bytes)?;
    header.validate()?;

    let payload = &bytes[MIN_PAYLOAD_SIZE..];
    postcard::from_bytes(payload).map_err(|e| {
        CompassError::Serialization(format!("Failed to deserialize session state: {}", e))
    })
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_roundtrip() {
        let header = PersistenceHeader::new();
        let bytes = header.to_bytes();
        let restored = PersistenceHeader::from_bytes(&bytes).expect("parse header");

        assert_eq!(restored.magic, *primitives::MAGIC_BYTES);
        assert_eq!(restored.version, primitives::FORMAT_VERSION);
    }

    #[test]
    fn state_roundtrip_bit_exact() {
        let mut state = SessionState::new();
        state.begin_questionnaire("Ada", "MIT").expect("advance");

        let bytes1 = state_to_bytes(&state).expect("first serialize");
        let restored = state_from_bytes(&bytes1).expect("deserialize");
        let bytes2 = state_to_bytes(&restored).expect("second serialize");

        assert_eq!(
            bytes1, bytes2,
            "save -> load -> save must produce identical bytes"
        );
        assert_eq!(state, restored);
    }

    #[test]
    fn invalid_magic_rejected() {
        let mut bytes = vec![0u8; 10];
        bytes[0..4].copy_from_slice(b"XXXX");

        assert!(state_from_bytes(&bytes).is_err());
    }

    #[test]
    fn wrong_version_rejected() {
        let state = SessionState::new();
        let mut bytes = state_to_bytes(&state).expect("serialize");
        bytes[4] = primitives::FORMAT_VERSION + 1;

        assert!(state_from_bytes(&bytes).is_err());
    }

    #[test]
    fn truncated_data_rejected() {
        assert!(state_from_bytes(&[]).is_err());
        assert!(state_from_bytes(b"CMP").is_err());
    }
}
