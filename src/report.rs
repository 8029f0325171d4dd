//! Output record schema for the reporting sink.
//!
//! Field names, formatting, and ordering are a stable contract with
//! downstream consumers; changing any of them is a breaking change even when
//! the decoder itself is untouched.

use serde::Serialize;

use crate::decoder::Reading;

/// Model identifier reported with every record.
pub const MODEL: &str = "Fineoffset-wh55";

/// Integrity mechanism label; this decoder only emits CRC-validated records.
pub const MIC: &str = "CRC";

/// One decoded record, ready for serialization.
///
/// Hex fields are pre-formatted strings so every sink sees the same
/// canonical text regardless of its own integer formatting.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Report {
    /// Constant model identifier.
    pub model: &'static str,
    /// 20-bit device ID, zero-padded 6-digit hex.
    pub id: String,
    /// Channel, 1-based.
    pub channel: u8,
    /// Battery level, 0.2 per bar, one decimal of display precision.
    /// May exceed 1.0 (external power).
    pub battery_ok: f32,
    /// Leak alarm as 0/1.
    pub alarm: u8,
    /// Opaque diagnostic field, 4-digit hex.
    pub unknown1: String,
    /// Opaque diagnostic field, 4-digit hex.
    pub unknown2: String,
    /// Constant integrity mechanism label.
    pub mic: &'static str,
}

impl From<&Reading> for Report {
    fn from(reading: &Reading) -> Self {
        Self {
            model: MODEL,
            id: format!("{:06x}", reading.id),
            channel: reading.channel,
            battery_ok: (reading.battery_ok * 10.0).round() / 10.0,
            alarm: u8::from(reading.alarm),
            unknown1: format!("{:04x}", reading.unknown1),
            unknown2: format!("{:04x}", reading.unknown2),
            mic: MIC,
        }
    }
}

impl Report {
    /// Serialize to a single-line JSON record.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("report serialization is infallible")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading() -> Reading {
        Reading {
            id: 0x107A4,
            channel: 1,
            battery_bars: 5,
            battery_ok: 1.0,
            alarm: false,
            unknown1: 0x0502,
            unknown2: 0xDFBE,
        }
    }

    #[test]
    fn test_field_formatting() {
        let report = Report::from(&reading());
        // Exact casing the sink keys on
        assert_eq!(report.model, "Fineoffset-wh55");
        assert_eq!(report.id, "0107a4");
        assert_eq!(report.channel, 1);
        assert_eq!(report.alarm, 0);
        assert_eq!(report.unknown1, "0502");
        assert_eq!(report.unknown2, "dfbe");
        assert_eq!(report.mic, "CRC");
    }

    #[test]
    fn test_alarm_as_integer() {
        let mut r = reading();
        r.alarm = true;
        assert_eq!(Report::from(&r).alarm, 1);
    }

    #[test]
    fn test_battery_display_precision() {
        let mut r = reading();
        r.battery_bars = 3;
        r.battery_ok = 3.0 * 0.2;
        let report = Report::from(&r);
        assert!((report.battery_ok - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_json_schema_stable() {
        let json = Report::from(&reading()).to_json();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["model"], "Fineoffset-wh55");
        assert_eq!(value["id"], "0107a4");
        assert_eq!(value["channel"], 1);
        assert_eq!(value["alarm"], 0);
        assert_eq!(value["mic"], "CRC");
    }
}
