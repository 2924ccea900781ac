//! The `RPTC` repeater configuration record.

use std::fmt::Write as _;

use bytes::Bytes;
use dmrlink_frame::signature::REPEATER_CONFIG;

use crate::provider::ConfigProvider;

/// Size of a rendered configuration record.
pub const RECORD_LEN: usize = 306;

/// Software and package identifiers reported to the master.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoftwareInfo {
    pub software_id: String,
    pub package_id: String,
}

impl SoftwareInfo {
    /// `<os>:<name>:<version>` and `<os>:<name>:<version>-<arch>`.
    pub fn new(name: &str, version: &str) -> Self {
        let os = std::env::consts::OS;
        let arch = std::env::consts::ARCH;
        Self {
            software_id: format!("{os}:{name}:{version}"),
            package_id: format!("{os}:{name}:{version}-{arch}"),
        }
    }

    /// Identifiers for this build of dmrlink.
    pub fn current() -> Self {
        Self::new("dmrlink", env!("CARGO_PKG_VERSION"))
    }
}

impl Default for SoftwareInfo {
    fn default() -> Self {
        Self::current()
    }
}

/// Static description of a repeater, sent to the master after login.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RepeaterConfiguration {
    pub callsign: String,
    pub repeater_id: u32,
    /// Receive frequency in Hz.
    pub rx_freq: u32,
    /// Transmit frequency in Hz.
    pub tx_freq: u32,
    /// Transmit power in dBm, clamped to 99.
    pub tx_power: u8,
    /// Color code, clamped to 1..=15.
    pub color_code: u8,
    pub latitude: f64,
    pub longitude: f64,
    /// Antenna height in meters, clamped to 999.
    pub height: u16,
    pub location: String,
    pub description: String,
    pub url: String,
    pub software: SoftwareInfo,
}

impl RepeaterConfiguration {
    /// Render the fixed-width ASCII record.
    pub fn record(&self) -> String {
        let mut out = String::with_capacity(RECORD_LEN);
        out.push_str(&String::from_utf8_lossy(REPEATER_CONFIG));
        push_field(&mut out, &self.callsign, 8);
        let _ = write!(
            out,
            "{:08x}{:09}{:09}{:02}{:02}",
            self.repeater_id,
            self.rx_freq.min(999_999_999),
            self.tx_freq.min(999_999_999),
            self.tx_power.min(99),
            self.color_code.clamp(1, 15),
        );
        push_field(&mut out, &format!("{:.6}", self.latitude), 8);
        push_field(&mut out, &format!("{:.6}", self.longitude), 9);
        let _ = write!(out, "{:03}", self.height.min(999));
        push_field(&mut out, &self.location, 20);
        push_field(&mut out, &self.description, 20);
        push_field(&mut out, &self.url, 124);
        push_field(&mut out, &self.software.software_id, 40);
        push_field(&mut out, &self.software.package_id, 40);
        out
    }

    pub fn to_bytes(&self) -> Bytes {
        Bytes::from(self.record())
    }
}

impl ConfigProvider for RepeaterConfiguration {
    fn configuration(&self) -> Bytes {
        self.to_bytes()
    }
}

/// Append `value` left-aligned in exactly `width` ASCII bytes.
fn push_field(out: &mut String, value: &str, width: usize) {
    let mut written = 0;
    for c in value.chars().take(width) {
        out.push(if c.is_ascii() && !c.is_ascii_control() { c } else { '?' });
        written += 1;
    }
    out.extend(std::iter::repeat(' ').take(width - written));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn software() -> SoftwareInfo {
        SoftwareInfo {
            software_id: "linux:dmrlink:0.1.0".to_string(),
            package_id: "linux:dmrlink:0.1.0-x86_64".to_string(),
        }
    }

    fn sample() -> RepeaterConfiguration {
        RepeaterConfiguration {
            callsign: "PD0ZRY".to_string(),
            repeater_id: 2_043_044,
            rx_freq: 434_500_000,
            tx_freq: 432_100_000,
            tx_power: 25,
            color_code: 1,
            latitude: 52.296786,
            longitude: 4.595454,
            height: 12,
            location: "Hillegom, ZH, NL".to_string(),
            description: "dmrlink test".to_string(),
            url: "https://example.org".to_string(),
            software: software(),
        }
    }

    #[test]
    fn record_layout() {
        let record = sample().record();
        assert_eq!(record.len(), RECORD_LEN);
        assert_eq!(&record[0..4], "RPTC");
        assert_eq!(&record[4..12], "PD0ZRY  ");
        assert_eq!(&record[12..20], "001f2ca4");
        assert_eq!(&record[20..29], "434500000");
        assert_eq!(&record[29..38], "432100000");
        assert_eq!(&record[38..40], "25");
        assert_eq!(&record[40..42], "01");
        assert_eq!(&record[42..50], "52.29678");
        assert_eq!(&record[50..59], "4.595454 ");
        assert_eq!(&record[59..62], "012");
        assert_eq!(record[62..82].trim_end(), "Hillegom, ZH, NL");
        assert_eq!(record[82..102].trim_end(), "dmrlink test");
        assert_eq!(record[102..226].trim_end(), "https://example.org");
        assert_eq!(record[226..266].trim_end(), "linux:dmrlink:0.1.0");
        assert_eq!(record[266..306].trim_end(), "linux:dmrlink:0.1.0-x86_64");
    }

    #[test]
    fn numeric_fields_are_clamped() {
        let config = RepeaterConfiguration {
            tx_power: 120,
            color_code: 0,
            height: 4000,
            rx_freq: u32::MAX,
            ..sample()
        };
        let record = config.record();
        assert_eq!(record.len(), RECORD_LEN);
        assert_eq!(&record[20..29], "999999999");
        assert_eq!(&record[38..40], "99");
        assert_eq!(&record[40..42], "01");
        assert_eq!(&record[59..62], "999");

        let config = RepeaterConfiguration {
            color_code: 200,
            ..sample()
        };
        assert_eq!(&config.record()[40..42], "15");
    }

    #[test]
    fn long_and_odd_text_keeps_record_length() {
        let config = RepeaterConfiguration {
            callsign: "TOOLONGCALLSIGN".to_string(),
            location: "Zürich ✓".to_string(),
            url: "x".repeat(500),
            latitude: -33.868820,
            longitude: -151.209290,
            ..sample()
        };
        let record = config.record();
        assert_eq!(record.len(), RECORD_LEN);
        assert!(record.is_ascii());
        assert_eq!(&record[4..12], "TOOLONGC");
        assert_eq!(&record[42..50], "-33.8688");
        assert_eq!(&record[50..59], "-151.2092");
        assert!(record[62..82].starts_with("Z?rich ?"));
    }

    #[test]
    fn provider_yields_record_bytes() {
        let config = sample();
        let bytes = config.configuration();
        assert_eq!(bytes.len(), RECORD_LEN);
        assert_eq!(&bytes[..4], b"RPTC");
    }

    #[test]
    fn software_info_format() {
        let info = SoftwareInfo::new("dmrlink", "1.2.3");
        let os = std::env::consts::OS;
        assert_eq!(info.software_id, format!("{os}:dmrlink:1.2.3"));
        assert!(info.package_id.starts_with(&info.software_id));
        assert!(info.package_id.ends_with(std::env::consts::ARCH));
    }
}
