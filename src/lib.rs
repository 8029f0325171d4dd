//! # WH55 Packet Decoder
//!
//! Decoder for the Fine Offset Electronics WH55 (also sold as Ecowitt WH55)
//! water leak sensor. The sensor transmits FSK PCM packets at 868.3 MHz with
//! a 58 µs pulse width; after demodulation one transmission arrives as a row
//! of 150-220 raw bits containing an `aaaa aaaa` preamble, the `2dd4` sync
//! word, and a 10-byte frame at an arbitrary bit alignment.
//!
//! ## Design
//!
//! - **Stateless** - One decode call per candidate transmission, no memory
//!   of prior calls, safe to invoke concurrently over independent rows
//! - **All-or-nothing** - A [`Reading`] is only built after both the CRC-8
//!   and the additive checksum verify; failures are typed, terminal, and
//!   carry their diagnostics
//! - **Safe Rust** - `#![forbid(unsafe_code)]`
//!
//! ## API Overview
//!
//! - [`decode()`] - Decode one captured bit row
//! - [`BitRow`] - Bit-addressable capture row (search, bit-offset extraction)
//! - [`Reading`] - Validated sensor reading
//! - [`Report`] - Stable output record for the reporting sink
//! - [`crc8`] / [`add_bytes`] - Frame integrity primitives
//!
//! ## Usage
//!
//! ```rust,ignore
//! use wh55::{decode, BitRow, Report};
//!
//! let row = BitRow::from_bytes(&captured, 180);
//! match decode(&row) {
//!     Ok(reading) => println!("{}", Report::from(&reading).to_json()),
//!     Err(err) => eprintln!("reject: {err}"),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

mod bitrow;
mod checksum;
mod decoder;
mod error;
mod report;

pub use bitrow::BitRow;
pub use checksum::{add_bytes, crc8};
pub use decoder::{
    decode, Reading, CRC_INIT, CRC_POLYNOMIAL, FAMILY_WH55, FRAME_BYTES, MAX_ROW_BITS,
    MIN_ROW_BITS, PULSE_WIDTH_US, RESET_LIMIT_US, SYNC_BITS, SYNC_PATTERN,
};
pub use error::DecodeError;
pub use report::{Report, MIC, MODEL};
