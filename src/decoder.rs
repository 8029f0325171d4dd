//! WH55 packet decoder.
//!
//! Decodes one candidate transmission from a captured bit row:
//!
//! 1. Length gate (cheap reject before any search cost)
//! 2. Sync-pattern search, any bit alignment
//! 3. 10-byte frame extraction at the matched offset
//! 4. Family byte check
//! 5. CRC-8 + additive checksum validation
//! 6. Field decode
//!
//! ## Packet layout
//!
//! ```text
//! 0  1  2 3  4  5  6  7  8  9
//! 55 3 107a4 05 01 94 fe 60 29
//! YY C IIIII 0B 0A UU UU XX CC
//!
//! Y: 8 bit fixed sensor type 0x55
//! C: 4 bit channel (setting - 1)
//! I: 20 bit device ID
//! B: 4 bit battery bars (0-5, 6 = external power on some revisions)
//! A: leakage alarm in bit 1 (0: alarm, 1: no alarm)
//! U: unknown data
//! X: CRC-8 over bytes 0-7, poly 0x31, init 0x00
//! C: sum of bytes 0-8 modulo 256
//! ```
//!
//! The decoder is a pure function: no state survives a call, and
//! independent rows may be decoded concurrently without synchronization.

use tracing::debug;

use crate::bitrow::BitRow;
use crate::checksum::{add_bytes, crc8};
use crate::error::DecodeError;

/// Preamble tail and sync word; the frame begins immediately after.
pub const SYNC_PATTERN: [u8; 3] = [0xAA, 0x2D, 0xD4];

/// Bits in the sync pattern.
pub const SYNC_BITS: usize = 24;

/// Shortest accepted capture, in bits.
pub const MIN_ROW_BITS: usize = 150;

/// Longest accepted capture, in bits. The window is wide because the
/// capture may include a variable-length leading preamble run.
pub const MAX_ROW_BITS: usize = 220;

/// Frame size in bytes.
pub const FRAME_BYTES: usize = 10;

/// Fixed sensor family byte.
pub const FAMILY_WH55: u8 = 0x55;

/// CRC-8 generator polynomial.
pub const CRC_POLYNOMIAL: u8 = 0x31;

/// CRC-8 initial value.
pub const CRC_INIT: u8 = 0x00;

/// FSK PCM pulse width in microseconds. Consumed by the radio front-end
/// that produces the bit rows, not by the decoder itself.
pub const PULSE_WIDTH_US: u32 = 58;

/// Inter-frame reset gap in microseconds, same consumer as above.
pub const RESET_LIMIT_US: u32 = 2500;

/// One validated sensor reading.
///
/// Only constructed after both the CRC and the additive checksum verify;
/// there is no partially-decoded form.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Reading {
    /// 20-bit device identifier.
    pub id: u32,
    /// Channel setting, 1-based.
    pub channel: u8,
    /// Raw battery bars, 0-5 (6 = external power on some firmware).
    pub battery_bars: u8,
    /// Battery bars normalized by 0.2. Deliberately unclamped: bars 6
    /// yields 1.2.
    pub battery_ok: f32,
    /// Leak alarm active.
    pub alarm: bool,
    /// Opaque diagnostic field, bytes 4-5.
    pub unknown1: u16,
    /// Opaque diagnostic field, bytes 6-7.
    pub unknown2: u16,
}

/// Extracted frame bytes.
type Frame = [u8; FRAME_BYTES];

/// 20-bit device ID: low nibble of byte 1 over bytes 2-3.
fn device_id(b: &Frame) -> u32 {
    (u32::from(b[1] & 0x0F) << 16) | (u32::from(b[2]) << 8) | u32::from(b[3])
}

/// 1-based channel from the zero-based stored setting in the high nibble
/// of byte 1.
fn channel(b: &Frame) -> u8 {
    (b[1] >> 4) + 1
}

/// Battery bars from the low nibble of byte 4.
fn battery_bars(b: &Frame) -> u8 {
    b[4] & 0x0F
}

/// Leak alarm from bit 1 of byte 5. The sensor signals an alarm with a
/// CLEARED bit; the inversion is a hardware quirk, not a decoding bug.
fn alarm_active(b: &Frame) -> bool {
    b[5] & 0x02 == 0
}

/// Decode one candidate transmission.
///
/// # Arguments
/// * `row` - Captured bit row; read-only, never retained
///
/// # Returns
/// A validated [`Reading`], or the [`DecodeError`] that terminated the
/// attempt. Every failure is terminal: the decoder reports one candidate
/// per call and any retry-at-later-offset policy belongs to the caller.
pub fn decode(row: &BitRow) -> Result<Reading, DecodeError> {
    // Step 1: length gate
    let bits = row.len();
    if !(MIN_ROW_BITS..=MAX_ROW_BITS).contains(&bits) {
        debug!(bits, "row length out of range [{MIN_ROW_BITS}..{MAX_ROW_BITS}]");
        return Err(DecodeError::LengthOutOfRange { bits });
    }

    // Step 2: sync search. A miss returns row.len(), so the truncation
    // guard below also covers "no sync found".
    let bit_offset = row.search(0, &SYNC_PATTERN, SYNC_BITS) + SYNC_BITS;
    if bit_offset + FRAME_BYTES * 8 > bits {
        debug!(bit_offset, "short package");
        return Err(DecodeError::FrameTruncated { bit_offset });
    }

    // Step 3: frame extraction at arbitrary bit alignment
    let mut b: Frame = [0; FRAME_BYTES];
    row.extract_bytes(bit_offset, &mut b);

    // Step 4: family check
    if b[0] != FAMILY_WH55 {
        debug!(family = b[0], "family byte mismatch");
        return Err(DecodeError::FamilyMismatch { family: b[0] });
    }

    // Step 5: integrity validation, both checks must pass
    let crc = crc8(&b[..8], CRC_POLYNOMIAL, CRC_INIT);
    let checksum = add_bytes(&b[..9]);
    if crc != b[8] || checksum != b[9] {
        debug!(
            computed_crc = crc,
            expected_crc = b[8],
            computed_chk = checksum,
            expected_chk = b[9],
            "checksum error"
        );
        return Err(DecodeError::IntegrityCheckFailed { crc, checksum });
    }

    // Step 6: field decode
    let bars = battery_bars(&b);
    Ok(Reading {
        id: device_id(&b),
        channel: channel(&b),
        battery_bars: bars,
        battery_ok: f32::from(bars) * 0.2,
        alarm: alarm_active(&b),
        unknown1: (u16::from(b[4]) << 8) | u16::from(b[5]),
        unknown2: (u16::from(b[6]) << 8) | u16::from(b[7]),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    // Captured channel-1 frame, id 0x107a4, 5 bars, no alarm
    const FRAME_CH1: Frame = [0x55, 0x01, 0x07, 0xA4, 0x05, 0x02, 0xDF, 0xBE, 0xA4, 0x49];

    /// Build a row: `lead_bits` zero bits, sync pattern, frame, zero padding
    /// up to `total_bits`.
    fn row_with_frame(lead_bits: usize, frame: &Frame, total_bits: usize) -> BitRow {
        fn push(data: &[u8], nbits: usize, bytes: &mut [u8], pos: &mut usize) {
            for i in 0..nbits {
                let bit = (data[i >> 3] >> (7 - (i & 7))) & 1;
                bytes[*pos >> 3] |= bit << (7 - (*pos & 7));
                *pos += 1;
            }
        }

        let mut bytes = vec![0u8; (total_bits + 7) / 8];
        let mut pos = lead_bits;
        push(&SYNC_PATTERN, SYNC_BITS, &mut bytes, &mut pos);
        push(frame, FRAME_BYTES * 8, &mut bytes, &mut pos);
        assert!(pos <= total_bits);
        BitRow::from_bytes(&bytes, total_bits)
    }

    #[test]
    fn test_device_id() {
        assert_eq!(device_id(&FRAME_CH1), 0x107A4);
    }

    #[test]
    fn test_channel_is_one_based() {
        assert_eq!(channel(&FRAME_CH1), 1);
        let mut b = FRAME_CH1;
        b[1] = 0x31;
        assert_eq!(channel(&b), 4);
    }

    #[test]
    fn test_battery_bars() {
        assert_eq!(battery_bars(&FRAME_CH1), 5);
    }

    #[test]
    fn test_alarm_bit_inverted() {
        // Bit 0x02 set means no alarm
        assert!(!alarm_active(&FRAME_CH1));
        let mut b = FRAME_CH1;
        b[5] = 0x00;
        assert!(alarm_active(&b));
    }

    #[test]
    fn test_decode_byte_aligned() {
        let row = row_with_frame(48, &FRAME_CH1, 180);
        let reading = decode(&row).unwrap();
        assert_eq!(reading.id, 0x107A4);
        assert_eq!(reading.channel, 1);
        assert_eq!(reading.battery_bars, 5);
        assert!(!reading.alarm);
        assert_eq!(reading.unknown1, 0x0502);
        assert_eq!(reading.unknown2, 0xDFBE);
    }

    #[test]
    fn test_decode_every_alignment() {
        // The sync match may land on any bit boundary
        for lead in 40..48 {
            let row = row_with_frame(lead, &FRAME_CH1, 180);
            let reading = decode(&row).unwrap();
            assert_eq!(reading.id, 0x107A4, "lead {lead}");
        }
    }

    #[test]
    fn test_length_gate() {
        let short = BitRow::from_bytes(&[0u8; 19], 149);
        assert_eq!(
            decode(&short),
            Err(DecodeError::LengthOutOfRange { bits: 149 })
        );

        let long = BitRow::from_bytes(&[0u8; 28], 221);
        assert_eq!(
            decode(&long),
            Err(DecodeError::LengthOutOfRange { bits: 221 })
        );
    }

    #[test]
    fn test_no_sync_is_truncated() {
        // In-range length, no sync pattern anywhere: search returns the row
        // length and the truncation guard fires
        let row = BitRow::from_bytes(&[0u8; 23], 180);
        assert_eq!(
            decode(&row),
            Err(DecodeError::FrameTruncated { bit_offset: 180 + 24 })
        );
    }

    #[test]
    fn test_sync_too_late_is_truncated() {
        // Sync at bit 120 of a 180-bit row leaves only 36 bits of frame
        let mut bytes = vec![0u8; 23];
        bytes[15] = 0xAA;
        bytes[16] = 0x2D;
        bytes[17] = 0xD4;
        let row = BitRow::from_bytes(&bytes, 180);
        assert_eq!(
            decode(&row),
            Err(DecodeError::FrameTruncated { bit_offset: 144 })
        );
    }

    #[test]
    fn test_family_mismatch() {
        let mut frame = FRAME_CH1;
        frame[0] = 0x45;
        let row = row_with_frame(48, &frame, 180);
        assert_eq!(
            decode(&row),
            Err(DecodeError::FamilyMismatch { family: 0x45 })
        );
    }

    #[test]
    fn test_corrupt_crc_byte() {
        let mut frame = FRAME_CH1;
        frame[8] ^= 0x01;
        let row = row_with_frame(48, &frame, 180);
        assert!(matches!(
            decode(&row),
            Err(DecodeError::IntegrityCheckFailed { .. })
        ));
    }

    #[test]
    fn test_idempotent() {
        let row = row_with_frame(48, &FRAME_CH1, 180);
        assert_eq!(decode(&row).unwrap(), decode(&row).unwrap());
    }
}
