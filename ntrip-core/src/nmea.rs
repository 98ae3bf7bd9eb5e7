//! NMEA GGA sentence construction for rover position uplink.

use chrono::{DateTime, Utc};

/// Builds a `$GNGGA` sentence for `lat`/`lon` (WGS84 degrees) timestamped at
/// `now_utc`, terminated with `\r\n` and a checksum.
pub fn build_gga(lat: f64, lon: f64, now_utc: DateTime<Utc>) -> String {
    let fix_time = now_utc.format("%H%M%S.00").to_string();

    let body = format!(
        "GNGGA,{},{:02}{:07.4},{},{:03}{:07.4},{},1,08,1.0,1.5,M,0.0,M,,",
        fix_time,
        lat.abs().trunc() as u32,
        lat.abs().fract() * 60.0,
        if lat >= 0.0 { "N" } else { "S" },
        lon.abs().trunc() as u32,
        lon.abs().fract() * 60.0,
        if lon >= 0.0 { "E" } else { "W" },
    );

    let cs = checksum(&body);
    format!("${}*{:02X}\r\n", body, cs)
}

/// XOR of every byte in `body` (which excludes the leading `$` and trailing
/// `*checksum`).
fn checksum(body: &str) -> u8 {
    body.bytes().fold(0u8, |acc, b| acc ^ b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn builds_expected_gga_sentence() {
        let t = Utc.with_ymd_and_hms(2026, 8, 1, 12, 34, 56).unwrap();
        let sentence = build_gga(52.1234, 5.6789, t);

        assert!(sentence.starts_with("$GNGGA,123456.00,5207."));
        assert!(sentence.contains(",N,00540."));
        assert!(sentence.contains(",E,1,08,1.0,1.5,M,0.0,M,,*"));
        assert!(sentence.ends_with("\r\n"));
    }

    #[test]
    fn checksum_is_consistent_with_manual_xor() {
        let body = "GNGGA,000000.00,0000.0000,N,00000.0000,E,1,08,1.0,1.5,M,0.0,M,,";
        let expected = body.bytes().fold(0u8, |acc, b| acc ^ b);
        assert_eq!(checksum(body), expected);
    }

    #[test]
    fn south_and_west_hemispheres_get_correct_letters() {
        let t = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let sentence = build_gga(-33.5, -70.6, t);
        assert!(sentence.contains(",S,"));
        assert!(sentence.contains(",W,"));
    }
}
