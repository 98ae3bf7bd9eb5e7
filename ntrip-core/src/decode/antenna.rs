//! 1007/1008/1033 antenna and receiver descriptor decoders.
//!
//! All four strings across these types share the same length-prefixed ASCII
//! encoding: an 8-bit length followed by that many bytes.

use crate::bitreader::get_bits;
use crate::output::OutputSink;
use crate::sink_writeln;

/// Reads an 8-bit-length-prefixed ASCII string starting at `start_bit`.
/// Returns the string and the bit offset immediately after it.
fn read_prefixed_string(payload: &[u8], start_bit: usize) -> Option<(String, usize)> {
    if payload.len() * 8 < start_bit + 8 {
        return None;
    }
    let len = get_bits(payload, start_bit, 8) as usize;
    let data_start_bit = start_bit + 8;
    if payload.len() * 8 < data_start_bit + len * 8 {
        return None;
    }

    let mut bytes = Vec::with_capacity(len);
    for i in 0..len {
        bytes.push(get_bits(payload, data_start_bit + i * 8, 8) as u8);
    }
    let s = String::from_utf8_lossy(&bytes).into_owned();
    Some((s, data_start_bit + len * 8))
}

/// Decodes message 1007: station id (12b) + descriptor string.
pub fn decode_1007(payload: &[u8], sink: &mut dyn OutputSink) -> Option<()> {
    if payload.len() * 8 < 24 {
        return None;
    }
    let station_id = get_bits(payload, 12, 12);
    let (descriptor, _) = read_prefixed_string(payload, 24)?;
    sink_writeln!(sink, "antenna descriptor (station {}): {}", station_id, descriptor);
    Some(())
}

/// Decodes message 1008: station id (12b) + descriptor string + serial string.
pub fn decode_1008(payload: &[u8], sink: &mut dyn OutputSink) -> Option<()> {
    if payload.len() * 8 < 24 {
        return None;
    }
    let station_id = get_bits(payload, 12, 12);
    let (descriptor, after_descriptor) = read_prefixed_string(payload, 24)?;
    let (serial, _) = read_prefixed_string(payload, after_descriptor)?;
    sink_writeln!(
        sink,
        "antenna descriptor (station {}): {} / serial {}",
        station_id,
        descriptor,
        serial
    );
    Some(())
}

/// Decodes message 1033: station id (12b) + 4 length-prefixed strings
/// (antenna descriptor, antenna serial, receiver type, receiver serial).
pub fn decode_1033(payload: &[u8], sink: &mut dyn OutputSink) -> Option<()> {
    if payload.len() * 8 < 24 {
        return None;
    }
    let station_id = get_bits(payload, 12, 12);
    let (ant_desc, p1) = read_prefixed_string(payload, 24)?;
    let (ant_serial, p2) = read_prefixed_string(payload, p1)?;
    let (recv_type, p3) = read_prefixed_string(payload, p2)?;
    let (recv_serial, _) = read_prefixed_string(payload, p3)?;

    sink_writeln!(
        sink,
        "receiver+antenna (station {}): antenna {} (s/n {}), receiver {} (s/n {})",
        station_id,
        ant_desc,
        ant_serial,
        recv_type,
        recv_serial
    );
    Some(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::CapturedSink;

    fn build_prefixed_string_payload(station_id: u16, strings: &[&str]) -> Vec<u8> {
        let mut bits: Vec<u8> = Vec::new();
        let push_bits = |bits: &mut Vec<u8>, value: u64, len: usize| {
            for i in (0..len).rev() {
                bits.push(((value >> i) & 1) as u8);
            }
        };
        push_bits(&mut bits, 1007, 12);
        push_bits(&mut bits, station_id as u64, 12);
        for s in strings {
            push_bits(&mut bits, s.len() as u64, 8);
            for &b in s.as_bytes() {
                push_bits(&mut bits, b as u64, 8);
            }
        }
        while bits.len() % 8 != 0 {
            bits.push(0);
        }
        bits.chunks(8)
            .map(|chunk| chunk.iter().fold(0u8, |acc, &b| (acc << 1) | b))
            .collect()
    }

    #[test]
    fn decodes_1007_descriptor() {
        let payload = build_prefixed_string_payload(5, &["TRM59800.00"]);
        let mut sink = CapturedSink::new();
        assert!(decode_1007(&payload, &mut sink).is_some());
        assert!(sink.buffer.contains("TRM59800.00"));
        assert!(sink.buffer.contains("station 5"));
    }

    #[test]
    fn decodes_1008_descriptor_and_serial() {
        let payload = build_prefixed_string_payload(7, &["TRM59800.00", "SN12345"]);
        let mut sink = CapturedSink::new();
        assert!(decode_1008(&payload, &mut sink).is_some());
        assert!(sink.buffer.contains("SN12345"));
    }

    #[test]
    fn decodes_1033_four_strings() {
        let payload = build_prefixed_string_payload(9, &["ANT", "AS1", "RECV", "RS1"]);
        let mut sink = CapturedSink::new();
        assert!(decode_1033(&payload, &mut sink).is_some());
        assert!(sink.buffer.contains("ANT"));
        assert!(sink.buffer.contains("RECV"));
    }

    #[test]
    fn rejects_a_payload_cut_off_mid_string() {
        let mut payload = build_prefixed_string_payload(1, &["TOO SHORT"]);
        payload.truncate(4);
        let mut sink = CapturedSink::new();
        assert!(decode_1007(&payload, &mut sink).is_none());
    }
}
