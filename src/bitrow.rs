//! Bit-addressable capture row.
//!
//! This module provides the read-only bit buffer a demodulator hands to the
//! packet decoder: one row of raw bits with a known bit length, not
//! necessarily a whole number of bytes and not necessarily aligned to
//! anything.
//!
//! ## Bit Ordering
//! Bits are addressed MSB-first within each byte:
//! - Bit position 0 in a byte is bit 7 (MSB, received first)
//! - Bit position 7 in a byte is bit 0 (LSB)

#![allow(clippy::cast_possible_truncation)]

/// One row of captured bits.
///
/// Owns its byte storage; the valid bit count may end mid-byte, in which
/// case the trailing bits of the last byte are ignored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BitRow {
    /// Byte storage, MSB-first.
    data: Vec<u8>,
    /// Number of valid bits.
    num_bits: usize,
}

impl BitRow {
    /// Create a row from raw bytes.
    ///
    /// # Arguments
    /// * `bytes` - Source bytes, MSB-first
    /// * `num_bits` - Number of valid bits
    ///
    /// # Panics
    /// Panics if `bytes` is too short to hold `num_bits` bits.
    pub fn from_bytes(bytes: &[u8], num_bits: usize) -> Self {
        assert!(bytes.len() * 8 >= num_bits);

        Self {
            data: bytes.to_vec(),
            num_bits,
        }
    }

    /// Get the row length in bits.
    #[inline]
    pub fn len(&self) -> usize {
        self.num_bits
    }

    /// Check if the row is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.num_bits == 0
    }

    /// Get the bit value at a position.
    ///
    /// # Returns
    /// The bit value (0 or 1).
    ///
    /// # Panics
    /// Panics if `pos` is past the end of the row.
    #[inline]
    pub fn bit(&self, pos: usize) -> u8 {
        assert!(pos < self.num_bits);

        let byte_index = pos >> 3; // / 8
        let bit_index = pos & 7; // % 8

        // MSB-first: bit 0 of the row is bit 7 of the byte
        (self.data[byte_index] >> (7 - bit_index)) & 1
    }

    /// Search for the first occurrence of a bit pattern.
    ///
    /// The pattern is compared at every bit offset from `start` onward; it
    /// may match at any alignment, not just byte boundaries.
    ///
    /// # Arguments
    /// * `start` - Bit offset to begin searching from
    /// * `pattern` - Pattern bytes, MSB-first
    /// * `pattern_bits` - Number of significant bits in the pattern
    ///
    /// # Returns
    /// The bit offset of the first match, or `len()` if the pattern does not
    /// occur. Returning the row length lets a caller fold "not found" into
    /// its "not enough bits remain" guard.
    pub fn search(&self, start: usize, pattern: &[u8], pattern_bits: usize) -> usize {
        assert!(pattern.len() * 8 >= pattern_bits);

        if pattern_bits == 0 || start + pattern_bits > self.num_bits {
            return self.num_bits;
        }

        let last = self.num_bits - pattern_bits;
        for offset in start..=last {
            let mut matched = true;
            for i in 0..pattern_bits {
                let pat_bit = (pattern[i >> 3] >> (7 - (i & 7))) & 1;
                if self.bit(offset + i) != pat_bit {
                    matched = false;
                    break;
                }
            }
            if matched {
                return offset;
            }
        }

        self.num_bits
    }

    /// Extract bytes starting at an arbitrary bit offset.
    ///
    /// Repacks `out.len()` bytes' worth of bits into `out`, shifting across
    /// byte boundaries as needed when `bit_offset` is not a multiple of 8.
    ///
    /// # Arguments
    /// * `bit_offset` - Bit position of the first bit to copy
    /// * `out` - Destination buffer; filled completely
    ///
    /// # Panics
    /// Panics if the requested range runs past the end of the row.
    pub fn extract_bytes(&self, bit_offset: usize, out: &mut [u8]) {
        assert!(bit_offset + out.len() * 8 <= self.num_bits);

        let byte_index = bit_offset >> 3;
        let shift = bit_offset & 7;

        if shift == 0 {
            out.copy_from_slice(&self.data[byte_index..byte_index + out.len()]);
            return;
        }

        // Unaligned: each output byte spans two source bytes
        for (i, slot) in out.iter_mut().enumerate() {
            let hi = self.data[byte_index + i] << shift;
            let lo = self.data[byte_index + i + 1] >> (8 - shift);
            *slot = hi | lo;
        }
    }
}
