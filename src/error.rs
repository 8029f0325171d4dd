//! Decode failure taxonomy.
//!
//! Every failure is terminal for the call that produced it; the caller
//! retries with a fresh capture, never with the same row. Variants carry the
//! raw observations that led to the reject so they can be logged, but
//! nothing downstream depends on them.

use std::fmt;

/// Reasons a candidate transmission fails to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// Row bit length outside the accepted capture window; likely noise or
    /// an unrelated transmission.
    LengthOutOfRange {
        /// Observed bit length.
        bits: usize,
    },

    /// Sync pattern not found, or found too close to the end of the row to
    /// be followed by a complete frame.
    FrameTruncated {
        /// Bit offset where the frame would have started.
        bit_offset: usize,
    },

    /// Frame's family byte is not the WH55 constant; the sync pattern
    /// matched noise or another device family.
    FamilyMismatch {
        /// Observed family byte.
        family: u8,
    },

    /// CRC or additive checksum mismatch; the frame bits are not
    /// trustworthy and no fields were decoded.
    IntegrityCheckFailed {
        /// Computed CRC-8 over the payload.
        crc: u8,
        /// Computed additive checksum.
        checksum: u8,
    },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LengthOutOfRange { bits } => {
                write!(f, "bit length {bits} outside accepted window")
            }
            Self::FrameTruncated { bit_offset } => {
                write!(f, "short package at bit offset {bit_offset}")
            }
            Self::FamilyMismatch { family } => {
                write!(f, "family byte {family:#04x} is not a WH55 frame")
            }
            Self::IntegrityCheckFailed { crc, checksum } => {
                write!(f, "integrity check failed: crc {crc:02x} chk {checksum:02x}")
            }
        }
    }
}

impl std::error::Error for DecodeError {}
