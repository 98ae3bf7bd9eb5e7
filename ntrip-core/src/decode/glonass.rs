//! 1012 GLONASS L1&L2 observables and 1230 GLONASS code-phase bias decoders.

use crate::bitreader::{get_bits, get_signed};
use crate::output::OutputSink;
use crate::sink_writeln;

const PHASE_RANGE_SCALE: f64 = 0.0001;
const BIAS_SCALE: f64 = 0.01;

/// Decodes message 1012. Unlike the single-satellite decoders, 1012 is
/// variable-length: header (61 bits: msg type 12, station id 12, epoch 27,
/// sync 1, sat count 5, smoothing 1, interval 3) followed by one 125-bit
/// block per satellite: slot(6), L1 code indicator(1), L1 pseudorange(25),
/// L1 phase range(20), L1 lock time(7), L1 integer ambiguity(7), L1 CNR(8),
/// L2 code indicator(2), L2 pseudorange diff(14), L2 phase range diff(20),
/// L2 lock time(7), L2 CNR(8).
pub fn decode_1012(payload: &[u8], sink: &mut dyn OutputSink) -> Option<()> {
    if payload.len() * 8 < 61 {
        return None;
    }
    let station_id = get_bits(payload, 12, 12);
    let sat_count = get_bits(payload, 51, 5) as usize;

    sink_writeln!(sink, "GLONASS L1&L2 (station {}): {} satellites", station_id, sat_count);

    let header_bits = 61;
    let block_bits = 6 + 1 + 25 + 20 + 7 + 7 + 8 + 2 + 14 + 20 + 7 + 8;
    if payload.len() * 8 < header_bits + sat_count * block_bits {
        return None;
    }

    for i in 0..sat_count {
        let base = header_bits + i * block_bits;
        let slot = get_bits(payload, base, 6);
        let l1_code_ind = get_bits(payload, base + 6, 1);
        let l1_pseudorange = get_bits(payload, base + 7, 25);
        let l1_phase_range_diff = get_signed(payload, base + 32, 20) as f64 * PHASE_RANGE_SCALE;
        let l1_lock_time = get_bits(payload, base + 52, 7);
        let l1_ambiguity = get_bits(payload, base + 59, 7);
        let l1_cnr = get_bits(payload, base + 66, 8);
        let l2_code_ind = get_bits(payload, base + 74, 2);
        let l2_pseudorange_diff = get_signed(payload, base + 76, 14);
        let l2_phase_range_diff = get_signed(payload, base + 90, 20);
        let l2_lock_time = get_bits(payload, base + 110, 7);
        let l2_cnr = get_bits(payload, base + 117, 8);

        sink_writeln!(
            sink,
            "  slot {} L1 code_ind={} pr_raw={} phase_diff={:.4} m lock={} ambiguity={} cnr={}",
            slot,
            l1_code_ind,
            l1_pseudorange,
            l1_phase_range_diff,
            l1_lock_time,
            l1_ambiguity,
            l1_cnr
        );
        sink_writeln!(
            sink,
            "    L2 code_ind={} pr_diff={} phase_diff={} lock={} cnr={}",
            l2_code_ind,
            l2_pseudorange_diff,
            l2_phase_range_diff,
            l2_lock_time,
            l2_cnr
        );
    }

    Some(())
}

/// Decodes message 1230: GLONASS code-phase biases. Header: station id
/// (12b) + mode (2b) + ind (3b, 3 reserved bits) + signals mask (4b);
/// followed by one signed 16-bit bias (0.01 ns) per signal flagged in the
/// mask.
pub fn decode_1230(payload: &[u8], sink: &mut dyn OutputSink) -> Option<()> {
    if payload.len() * 8 < 33 {
        return None;
    }
    let station_id = get_bits(payload, 12, 12);
    let signal_mask = get_bits(payload, 29, 4) as u8;
    let num_signals = signal_mask.count_ones() as usize;

    if payload.len() * 8 < 33 + num_signals * 16 {
        return None;
    }

    sink_writeln!(sink, "GLONASS code-phase biases (station {})", station_id);
    for i in 0..num_signals {
        let bias_raw = get_signed(payload, 33 + i * 16, 16);
        sink_writeln!(sink, "  signal {}: bias {:.2} ns", i, bias_raw as f64 * BIAS_SCALE);
    }

    Some(())
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
    fn decodes_1012_header_and_one_satellite() {
        let mut buf = vec![0u8; 28];
        set_bits(&mut buf, 0, 12, 1012);
        set_bits(&mut buf, 12, 12, 55);
        set_bits(&mut buf, 51, 5, 1);
        set_bits(&mut buf, 61, 6, 12); // slot id
        set_bits(&mut buf, 61 + 74, 2, 0b11); // L2 code indicator
        set_bits(&mut buf, 61 + 117, 8, 40); // L2 CNR
        let mut sink = CapturedSink::new();
        assert!(decode_1012(&buf, &mut sink).is_some());
        assert!(sink.buffer.contains("station 55"));
        assert!(sink.buffer.contains("slot 12"));
        assert!(sink.buffer.contains("L2 code_ind=3"));
        assert!(sink.buffer.contains("cnr=40"));
    }

    #[test]
    fn decodes_1230_biases_for_flagged_signals() {
        let mut buf = vec![0u8; 9];
        set_bits(&mut buf, 0, 12, 1230);
        set_bits(&mut buf, 12, 12, 9);
        set_bits(&mut buf, 29, 4, 0b1010); // two signals flagged
        set_bits(&mut buf, 33, 16, (-150i64 as u64) & 0xFFFF);
        set_bits(&mut buf, 49, 16, 300);
        let mut sink = CapturedSink::new();
        assert!(decode_1230(&buf, &mut sink).is_some());
        assert!(sink.buffer.contains("station 9"));
        assert!(sink.buffer.contains("-1.50 ns"));
    }
}
