//! Independent round audit.
//!
//! Re-checks a [`RoundTranscript`] without trusting whoever produced it: the
//! revealed key and value must reproduce the published tag, both
//! contributions must lie in range, and the outcome must be their modular
//! sum.

use thiserror::Error;

use super::combine::combine;
use super::transcript::{RoundTranscript, TRANSCRIPT_VERSION};
use crate::core::mac::{SecretKey, KEY_LEN, TAG_LEN};

/// Reasons a transcript fails its audit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuditError {
    /// Transcript version mismatch.
    #[error("version mismatch: expected {expected}, got {got}")]
    VersionMismatch {
        /// Supported version.
        expected: u8,
        /// Version in the transcript.
        got: u8,
    },

    /// A hex field did not decode.
    #[error("field '{field}' is not valid hex")]
    MalformedHex {
        /// Field name.
        field: &'static str,
    },

    /// A decoded field has the wrong length.
    #[error("field '{field}' has {got} bytes, expected {expected}")]
    WrongLength {
        /// Field name.
        field: &'static str,
        /// Required byte length.
        expected: usize,
        /// Actual byte length.
        got: usize,
    },

    /// Zero range, or a contribution outside `[0, range)`.
    #[error("value {value} of '{field}' is outside [0, {range})")]
    OutOfRange {
        /// Field name.
        field: &'static str,
        /// Offending value.
        value: u64,
        /// Range.
        range: u64,
    },

    /// The revealed key and value do not reproduce the tag.
    #[error("revealed key and value do not match the published tag")]
    TagMismatch,

    /// The outcome is not `(committed + counterpart) mod range`.
    #[error("outcome {got} does not match combined value {expected}")]
    OutcomeMismatch {
        /// Recomputed outcome.
        expected: u64,
        /// Outcome in the transcript.
        got: u64,
    },
}

/// Audit a round transcript.
pub fn audit_transcript(transcript: &RoundTranscript) -> Result<(), AuditError> {
    if transcript.version != TRANSCRIPT_VERSION {
        return Err(AuditError::VersionMismatch {
            expected: TRANSCRIPT_VERSION,
            got: transcript.version,
        });
    }

    let tag = decode_field("tag", &transcript.tag, TAG_LEN)?;
    let key_bytes = decode_field("secret_key", &transcript.secret_key, KEY_LEN)?;
    let secret_key = SecretKey::from_slice(&key_bytes).ok_or(AuditError::WrongLength {
        field: "secret_key",
        expected: KEY_LEN,
        got: key_bytes.len(),
    })?;

    let range = transcript.range;
    for (field, value) in [
        ("committed_value", transcript.committed_value),
        ("counterpart_value", transcript.counterpart_value),
        ("outcome", transcript.outcome),
    ] {
        if value >= range {
            return Err(AuditError::OutOfRange { field, value, range });
        }
    }

    if !transcript
        .algorithm
        .verify(&secret_key, transcript.committed_value, &tag)
    {
        return Err(AuditError::TagMismatch);
    }

    let expected = combine(transcript.committed_value, transcript.counterpart_value, range)
        .map_err(|_| AuditError::OutOfRange {
            field: "range",
            value: range,
            range,
        })?;
    if expected != transcript.outcome {
        return Err(AuditError::OutcomeMismatch {
            expected,
            got: transcript.outcome,
        });
    }

    Ok(())
}

fn decode_field(field: &'static str, value: &str, expected: usize) -> Result<Vec<u8>, AuditError> {
    let bytes = hex::decode(value).map_err(|_| AuditError::MalformedHex { field })?;
    if bytes.len() != expected {
        return Err(AuditError::WrongLength {
            field,
            expected,
            got: bytes.len(),
        });
    }
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::mac::HashAlgorithm;
    use crate::protocol::commitment::CommitmentScheme;
    use crate::protocol::round::Round;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn combined_transcript(algorithm: HashAlgorithm) -> RoundTranscript {
        let mut rng = StdRng::seed_from_u64(42);
        let commitment = CommitmentScheme::new(algorithm).commit(&mut rng, 3, 6).unwrap();
        Round::new("audit", commitment)
            .attach_counterpart(4)
            .unwrap()
            .reveal()
            .unwrap()
            .combine()
            .unwrap()
            .transcript()
            .unwrap()
    }

    #[test]
    fn test_valid_transcript_passes() {
        for algorithm in [HashAlgorithm::Sha3_256, HashAlgorithm::Sha256] {
            assert_eq!(audit_transcript(&combined_transcript(algorithm)), Ok(()));
        }
    }

    #[test]
    fn test_swapped_value_detected() {
        let mut transcript = combined_transcript(HashAlgorithm::Sha3_256);
        transcript.committed_value = 2;
        transcript.outcome = 0;
        assert_eq!(audit_transcript(&transcript), Err(AuditError::TagMismatch));
    }

    #[test]
    fn test_wrong_algorithm_detected() {
        let mut transcript = combined_transcript(HashAlgorithm::Sha3_256);
        transcript.algorithm = HashAlgorithm::Sha256;
        assert_eq!(audit_transcript(&transcript), Err(AuditError::TagMismatch));
    }

    #[test]
    fn test_wrong_outcome_detected() {
        let mut transcript = combined_transcript(HashAlgorithm::Sha3_256);
        transcript.outcome = (transcript.outcome + 1) % transcript.range;
        assert!(matches!(
            audit_transcript(&transcript),
            Err(AuditError::OutcomeMismatch { .. })
        ));
    }

    #[test]
    fn test_malformed_fields_detected() {
        let mut transcript = combined_transcript(HashAlgorithm::Sha3_256);
        transcript.tag = "zz".into();
        assert_eq!(
            audit_transcript(&transcript),
            Err(AuditError::MalformedHex { field: "tag" })
        );

        let mut transcript = combined_transcript(HashAlgorithm::Sha3_256);
        transcript.secret_key = "00".repeat(16);
        assert!(matches!(
            audit_transcript(&transcript),
            Err(AuditError::WrongLength { field: "secret_key", expected: 32, got: 16 })
        ));
    }

    #[test]
    fn test_out_of_range_detected() {
        let mut transcript = combined_transcript(HashAlgorithm::Sha3_256);
        transcript.counterpart_value = 6;
        assert!(matches!(
            audit_transcript(&transcript),
            Err(AuditError::OutOfRange { field: "counterpart_value", .. })
        ));
    }

    #[test]
    fn test_version_mismatch_detected() {
        let mut transcript = combined_transcript(HashAlgorithm::Sha3_256);
        transcript.version = 99;
        assert!(matches!(
            audit_transcript(&transcript),
            Err(AuditError::VersionMismatch { got: 99, .. })
        ));
    }
}
