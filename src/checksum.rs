//! Frame integrity primitives.
//!
//! The WH55 frame carries two independent integrity fields: a CRC-8 over the
//! payload bytes and an additive checksum that also covers the CRC byte.
//! Both are computed here; the decoder compares them against the received
//! values.
//!
//! The CRC is bitwise MSB-first with no input/output reflection and no final
//! XOR, matching the sensor firmware.

/// Compute a CRC-8 over a byte range.
///
/// # Arguments
/// * `data` - Bytes to cover
/// * `polynomial` - Generator polynomial (x^8 term implicit)
/// * `init` - Initial register value
///
/// # Returns
/// The 8-bit CRC value.
pub fn crc8(data: &[u8], polynomial: u8, init: u8) -> u8 {
    let mut remainder = init;

    for &byte in data {
        remainder ^= byte;
        for _ in 0..8 {
            if remainder & 0x80 != 0 {
                remainder = (remainder << 1) ^ polynomial;
            } else {
                remainder <<= 1;
            }
        }
    }

    remainder
}

/// Sum of bytes modulo 256.
pub fn add_bytes(data: &[u8]) -> u8 {
    data.iter().fold(0u8, |acc, &b| acc.wrapping_add(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crc8_empty_is_init() {
        assert_eq!(crc8(&[], 0x31, 0x00), 0x00);
        assert_eq!(crc8(&[], 0x31, 0xFF), 0xFF);
    }

    #[test]
    fn test_crc8_known_vector() {
        // First 8 bytes of a captured WH55 frame; CRC byte on air was 0xA4
        let frame = [0x55, 0x01, 0x07, 0xA4, 0x05, 0x02, 0xDF, 0xBE];
        assert_eq!(crc8(&frame, 0x31, 0x00), 0xA4);
    }

    #[test]
    fn test_crc8_detects_single_bit_errors() {
        let frame = [0x55, 0x01, 0x07, 0xA4, 0x05, 0x02, 0xDF, 0xBE];
        let good = crc8(&frame, 0x31, 0x00);

        for byte in 0..frame.len() {
            for bit in 0..8 {
                let mut corrupt = frame;
                corrupt[byte] ^= 1 << bit;
                assert_ne!(
                    crc8(&corrupt, 0x31, 0x00),
                    good,
                    "missed flip at byte {byte} bit {bit}"
                );
            }
        }
    }

    #[test]
    fn test_add_bytes() {
        assert_eq!(add_bytes(&[]), 0);
        assert_eq!(add_bytes(&[0x01, 0x02, 0x03]), 0x06);
        // Wraps modulo 256
        assert_eq!(add_bytes(&[0xFF, 0x02]), 0x01);
    }

    #[test]
    fn test_add_bytes_known_vector() {
        // First 9 bytes of a captured WH55 frame; checksum byte on air was 0x49
        let frame = [0x55, 0x01, 0x07, 0xA4, 0x05, 0x02, 0xDF, 0xBE, 0xA4];
        assert_eq!(add_bytes(&frame), 0x49);
    }
}
