//! Advisory detection of a mountpoint's stream format, from its sourcetable
//! `format`/`format-details` columns or from a byte-level sync pattern seen
//! at the start of the stream. Only `Rtcm3` is ever framed by this crate;
//! the others are identified so their bytes can be counted without
//! attempting RTCM framing on them.

use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamFormat {
    Rtcm3,
    Ubx,
    SeptentrioSbf,
    TrimbleRt27,
    LeicaLb2,
    Unknown,
}

/// Case-insensitively matches the sourcetable's `format`/`format-details`
/// text against the known format names.
pub fn detect_from_sourcetable_fields(format: &str, format_details: &str) -> StreamFormat {
    let combined = format!("{} {}", format, format_details);

    let patterns: &[(&str, StreamFormat)] = &[
        (r"(?i)rtcm\s*3", StreamFormat::Rtcm3),
        (r"(?i)\bubx\b", StreamFormat::Ubx),
        (r"(?i)septentrio|\bsbf\b", StreamFormat::SeptentrioSbf),
        (r"(?i)trimble|\brt27\b", StreamFormat::TrimbleRt27),
        (r"(?i)leica|\blb2\b", StreamFormat::LeicaLb2),
    ];

    for (pattern, format) in patterns {
        if Regex::new(pattern).unwrap().is_match(&combined) {
            return *format;
        }
    }

    StreamFormat::Unknown
}

/// Supplements sourcetable-based detection with a byte-level sync-pattern
/// check on the first bytes actually received, for casters whose
/// sourcetable entry is missing or ambiguous.
pub fn detect_from_sync_bytes(bytes: &[u8]) -> StreamFormat {
    if bytes.first() == Some(&0xD3) {
        StreamFormat::Rtcm3
    } else if bytes.starts_with(&[0xB5, 0x62]) {
        StreamFormat::Ubx
    } else if bytes.starts_with(b"$@") {
        StreamFormat::SeptentrioSbf
    } else {
        StreamFormat::Unknown
    }
}
