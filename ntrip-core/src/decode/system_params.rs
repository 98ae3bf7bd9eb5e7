//! 1013 system parameters decoder, including MJD-to-calendar-date
//! conversion for display.

use crate::bitreader::get_bits;
use crate::output::OutputSink;
use crate::sink_writeln;

/// Converts a Modified Julian Date into a proleptic Gregorian calendar date
/// using integer arithmetic, matching the conversion the message is meant to
/// support (no floating-point rounding in the date itself).
pub fn mjd_to_calendar(mjd: u32) -> (i32, u32, u32) {
    let jd = mjd as i64 + 2_400_001;
    let l = jd + 68_569;
    let n = 4 * l / 146_097;
    let l = l - (146_097 * n + 3) / 4;
    let i = 4000 * (l + 1) / 1_461_001;
    let l = l - 1461 * i / 4 + 31;
    let j = 80 * l / 2447;
    let day = l - 2447 * j / 80;
    let l = j / 11;
    let month = j + 2 - 12 * l;
    let year = 100 * (n - 49) + i + l;

    (year as i32, month as u32, day as u32)
}

pub struct Announcement {
    pub msg_type: u16,
    pub sync_flag: bool,
    pub interval_s: f64,
}

/// Decodes message 1013: MJD (16b), seconds-of-day (17b), announcement
/// count (5b), then `count` tuples of (12b type, 1b sync, 16b interval at
/// 0.1 s resolution).
pub fn decode_1013(payload: &[u8], sink: &mut dyn OutputSink) -> Option<Vec<Announcement>> {
    if payload.len() * 8 < 12 + 16 + 17 + 5 {
        return None;
    }
    let mjd = get_bits(payload, 12, 16) as u32;
    let seconds_of_day = get_bits(payload, 28, 17);
    let count = get_bits(payload, 45, 5) as usize;

    let (year, month, day) = mjd_to_calendar(mjd);
    sink_writeln!(
        sink,
        "system parameters: {:04}-{:02}-{:02} {:.0}s, {} announcements",
        year,
        month,
        day,
        seconds_of_day as f64,
        count
    );

    let header_bits = 50;
    let entry_bits = 29;
    if payload.len() * 8 < header_bits + count * entry_bits {
        return None;
    }

    let mut announcements = Vec::with_capacity(count);
    for i in 0..count {
        let base = header_bits + i * entry_bits;
        let msg_type = get_bits(payload, base, 12) as u16;
        let sync_flag = get_bits(payload, base + 12, 1) == 1;
        let interval_s = get_bits(payload, base + 13, 16) as f64 * 0.1;
        sink_writeln!(sink, "  type {} sync={} interval={:.1}s", msg_type, sync_flag, interval_s);
        announcements.push(Announcement {
            msg_type,
            sync_flag,
            interval_s,
        });
    }

    Some(announcements)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::CapturedSink;

    fn set_bits(buf: &mut [u8], start_bit: usize, bit_len: u32, value: u64) {
        for i in 0..bit_len as usize {
            let bit_index = start_bit + i;
            let byte = bit_index / 8;
            let bit = 7 - (bit_index % 8);
            let bit_val = (value >> (bit_len as usize - 1 - i)) & 1;
            buf[byte] = (buf[byte] & !(1 << bit)) | ((bit_val as u8) << bit);
        }
    }

    #[test]
    fn converts_known_mjd_to_calendar_date() {
        // MJD 60000 = 2023-02-25
        assert_eq!(mjd_to_calendar(60000), (2023, 2, 25));
    }

    #[test]
    fn decodes_1013_with_two_announcements() {
        let mut buf = vec![0u8; 14];
        set_bits(&mut buf, 0, 12, 1013);
        set_bits(&mut buf, 12, 16, 60000);
        set_bits(&mut buf, 28, 17, 43200);
        set_bits(&mut buf, 45, 5, 2);
        set_bits(&mut buf, 50, 12, 1005);
        set_bits(&mut buf, 62, 1, 1);
        set_bits(&mut buf, 63, 16, 50); // 5.0s
        set_bits(&mut buf, 79, 12, 1077);
        set_bits(&mut buf, 91, 1, 0);
        set_bits(&mut buf, 92, 16, 10); // 1.0s

        let mut sink = CapturedSink::new();
        let announcements = decode_1013(&buf, &mut sink).expect("should decode");
        assert_eq!(announcements.len(), 2);
        assert_eq!(announcements[0].msg_type, 1005);
        assert!(announcements[0].sync_flag);
        assert!((announcements[0].interval_s - 5.0).abs() < 1e-9);
        assert_eq!(announcements[1].msg_type, 1077);
        assert!(!announcements[1].sync_flag);
    }
}
