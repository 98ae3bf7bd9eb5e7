//! MSM4 (1074/1084/1094/1124) and MSM7 (1077/1087/1097/1117/1127/1137)
//! observation decoders, shared across the six GNSS constellations by
//! message-type range rather than duplicated per constellation.

use crate::bitreader::{get_bits, get_signed};
use crate::output::OutputSink;
use crate::sink_writeln;

const MSM4_PR_SCALE: f64 = 0.02;
const MSM4_PH_SCALE: f64 = 0.0005;
const MSM7_FINE_PR_SCALE: f64 = 1.862645149230957e-9; // ms, 2^-29
const MSM7_FINE_PH_SCALE: f64 = 4.656612873077393e-10; // ms, 2^-31
const MSM7_PHRATE_SCALE: f64 = 0.0001; // m/s
const CNR_FINE_SCALE: f64 = 0.0625;
const LIGHT_MS_TO_M: f64 = 299_792.458; // speed of light, km/ms == m per ms-fraction unit used below

pub struct MsmHeader {
    pub station_id: u16,
    pub epoch_ms: u32,
    pub multiple_message: bool,
    pub satellites: Vec<u8>,
    pub signals: Vec<u8>,
    /// `cells[(sat_index, signal_index)]` is true when that combination has
    /// an active observation.
    pub cells: Vec<Vec<bool>>,
}

// msg type(12) + station id(12) + epoch(30) + mm flag(1) + iods(3) +
// reserved(7) + clk steering(2) + ext clock(2) + df smoothing(1) +
// smoothing interval(3) = 73 bits before the satellite/signal masks.
const HEADER_PRELUDE_BITS: usize = 12 + 12 + 30 + 1 + 3 + 7 + 2 + 2 + 1 + 3;

fn parse_header(payload: &[u8]) -> Option<MsmHeader> {
    if payload.len() * 8 < HEADER_PRELUDE_BITS + 64 + 32 {
        return None;
    }
    let station_id = get_bits(payload, 12, 12) as u16;
    let epoch_ms = get_bits(payload, 24, 30) as u32;
    let multiple_message = get_bits(payload, 54, 1) == 1;

    let sat_mask = get_bits(payload, HEADER_PRELUDE_BITS, 64);
    let sig_mask = get_bits(payload, HEADER_PRELUDE_BITS + 64, 32);

    let satellites: Vec<u8> = (0u8..64)
        .filter(|&i| sat_mask & (1u64 << (63 - i)) != 0)
        .map(|i| i + 1)
        .collect();
    let signals: Vec<u8> = (0u8..32)
        .filter(|&i| sig_mask & (1u32 << (31 - i)) as u64 != 0)
        .map(|i| i + 1)
        .collect();

    let cell_mask_start = HEADER_PRELUDE_BITS + 64 + 32;
    let cell_count = satellites.len() * signals.len();
    if payload.len() * 8 < cell_mask_start + cell_count {
        return None;
    }

    let mut cells = vec![vec![false; signals.len()]; satellites.len()];
    let mut bit = cell_mask_start;
    for sat_cells in cells.iter_mut() {
        for cell in sat_cells.iter_mut() {
            *cell = get_bits(payload, bit, 1) == 1;
            bit += 1;
        }
    }

    Some(MsmHeader {
        station_id,
        epoch_ms,
        multiple_message,
        satellites,
        signals,
        cells,
    })
}

/// Decodes an MSM4 message (reduced resolution, no extended satellite info
/// or phase rate).
pub fn decode_msm4(payload: &[u8], msg_type: u16, gnss_name: &str, sink: &mut dyn OutputSink) -> Option<()> {
    let header = parse_header(payload)?;
    let num_sats = header.satellites.len();
    let num_cells = header.cells.iter().map(|row| row.iter().filter(|&&c| c).count()).sum::<usize>();

    sink_writeln!(
        sink,
        "{} MSM4 ({}) station {} epoch {}ms: {} satellites, {} cells",
        gnss_name,
        msg_type,
        header.station_id,
        header.epoch_ms,
        num_sats,
        num_cells
    );

    // satellite block: rough_range_int(8) + ext_info(4) per satellite
    let sat_block_bits = num_sats * (8 + 4);
    let cell_mask_bits = num_sats * header.signals.len();
    let sat_block_start = HEADER_PRELUDE_BITS + 64 + 32 + cell_mask_bits;

    if payload.len() * 8 < sat_block_start + sat_block_bits {
        return None;
    }

    let mut rough_range_int = vec![0u64; num_sats];
    for (i, slot) in rough_range_int.iter_mut().enumerate() {
        *slot = get_bits(payload, sat_block_start + i * 8, 8);
    }

    // cell block: fine_pr(15 signed) + fine_ph(22 signed) + lock(4) + half_cycle(1) + cnr(6), per active cell
    let cell_block_start = sat_block_start + sat_block_bits;
    let cell_bits = 15 + 22 + 4 + 1 + 6;
    let mut bit = cell_block_start;

    for (sat_idx, sat_cells) in header.cells.iter().enumerate() {
        for (sig_idx, &active) in sat_cells.iter().enumerate() {
            if !active {
                continue;
            }
            if payload.len() * 8 < bit + cell_bits {
                return None;
            }
            let fine_pr = get_signed(payload, bit, 15) as f64 * MSM4_PR_SCALE;
            let fine_ph = get_signed(payload, bit + 15, 22) as f64 * MSM4_PH_SCALE;
            let cnr = get_bits(payload, bit + 15 + 22 + 4 + 1, 6) as f64;
            bit += cell_bits;

            let sat_prn = header.satellites[sat_idx];
            let signal_id = header.signals[sig_idx];
            let range_m = rough_range_int[sat_idx] as f64 * 299_792.458;
            sink_writeln!(
                sink,
                "  PRN{} sig{} pr={:.3}m ph={:.4}m cnr={:.1}dBHz (rough {:.1}m)",
                sat_prn,
                signal_id,
                fine_pr,
                fine_ph,
                cnr,
                range_m
            );
        }
    }

    Some(())
}

/// Decodes an MSM7 message (full resolution: extended satellite info, rough
/// phase rate, fine phase rate per cell).
pub fn decode_msm7(payload: &[u8], msg_type: u16, gnss_name: &str, sink: &mut dyn OutputSink) -> Option<()> {
    let header = parse_header(payload)?;
    let num_sats = header.satellites.len();
    let num_cells = header.cells.iter().map(|row| row.iter().filter(|&&c| c).count()).sum::<usize>();

    sink_writeln!(
        sink,
        "{} MSM7 ({}) station {} epoch {}ms: {} satellites, {} signals, {} cells",
        gnss_name,
        msg_type,
        header.station_id,
        header.epoch_ms,
        num_sats,
        header.signals.len(),
        num_cells
    );

    // satellite block: rough_range_int(8), ext_info(4), rough_range_mod(10), rough_phrate(14 signed)
    // each field is traversed in full across all satellites before the next field begins.
    let cell_mask_bits = num_sats * header.signals.len();
    let sat_block_start = HEADER_PRELUDE_BITS + 64 + 32 + cell_mask_bits;
    let sat_block_bits = num_sats * (8 + 4 + 10 + 14);

    if payload.len() * 8 < sat_block_start + sat_block_bits {
        return None;
    }

    let mut rough_range_int = vec![0u64; num_sats];
    let mut rough_range_mod = vec![0u64; num_sats];
    let mut bit = sat_block_start;
    for slot in rough_range_int.iter_mut() {
        *slot = get_bits(payload, bit, 8);
        bit += 8;
    }
    bit += num_sats * 4; // ext_info, not needed for range summary
    for slot in rough_range_mod.iter_mut() {
        *slot = get_bits(payload, bit, 10);
        bit += 10;
    }
    // rough phase rate (14 signed) follows; not retained for the summary line.

    let cell_block_start = sat_block_start + sat_block_bits;
    let cell_bits = 20 + 24 + 10 + 1 + 10 + 15;
    let mut bit = cell_block_start;

    for (sat_idx, sat_cells) in header.cells.iter().enumerate() {
        for (sig_idx, &active) in sat_cells.iter().enumerate() {
            if !active {
                continue;
            }
            if payload.len() * 8 < bit + cell_bits {
                return None;
            }
            let fine_pr_ms = get_signed(payload, bit, 20) as f64 * MSM7_FINE_PR_SCALE;
            let fine_ph_ms = get_signed(payload, bit + 20, 24) as f64 * MSM7_FINE_PH_SCALE;
            let cnr = get_bits(payload, bit + 20 + 24 + 10 + 1, 10) as f64 * CNR_FINE_SCALE;
            let fine_phrate = get_signed(payload, bit + 20 + 24 + 10 + 1 + 10, 15) as f64 * MSM7_PHRATE_SCALE;
            bit += cell_bits;

            let sat_prn = header.satellites[sat_idx];
            let signal_id = header.signals[sig_idx];
            let range_m = rough_range_int[sat_idx] as f64 * 299_792.458
                + rough_range_mod[sat_idx] as f64 / 1024.0 * 299_792.458;
            let fine_pr_m = fine_pr_ms * LIGHT_MS_TO_M;
            let fine_ph_m = fine_ph_ms * LIGHT_MS_TO_M;

            sink_writeln!(
                sink,
                "  PRN{} sig{} pr={:.4}m ph={:.4}m cnr={:.2}dBHz phrate={:.4}m/s (rough {:.1}m)",
                sat_prn,
                signal_id,
                fine_pr_m,
                fine_ph_m,
                cnr,
                fine_phrate,
                range_m
            );
        }
    }

    Some(())
}

/// Maps an MSM4 message type to its GNSS display name.
pub fn msm4_gnss_name(msg_type: u16) -> Option<&'static str> {
    match msg_type {
        1074 => Some("GPS"),
        1084 => Some("GLONASS"),
        1094 => Some("Galileo"),
        1124 => Some("QZSS"),
        _ => None,
    }
}

/// Maps an MSM7 message type to its GNSS display name.
pub fn msm7_gnss_name(msg_type: u16) -> Option<&'static str> {
    match msg_type {
        1077 => Some("GPS"),
        1087 => Some("GLONASS"),
        1097 => Some("Galileo"),
        1117 => Some("QZSS"),
        1127 => Some("BeiDou"),
        1137 => Some("SBAS"),
        _ => None,
    }
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

    fn header_with_masks(sat_mask: u64, sig_mask: u32) -> Vec<u8> {
        let mut buf = vec![0u8; 32];
        set_bits(&mut buf, 0, 12, 1077);
        set_bits(&mut buf, 12, 12, 42);
        set_bits(&mut buf, HEADER_PRELUDE_BITS, 64, sat_mask);
        set_bits(&mut buf, HEADER_PRELUDE_BITS + 64, 32, sig_mask as u64);
        buf
    }

    #[test]
    fn mask_interpretation_reports_expected_sats_signals_cells() {
        let sat_mask = 0x8000_0000_0000_0001u64; // PRN 1 and PRN 64
        let sig_mask = 0x8000_0001u32; // signal 1 and signal 32

        let mut buf = header_with_masks(sat_mask, sig_mask);
        buf.resize(64, 0);
        let cell_mask_start = HEADER_PRELUDE_BITS + 64 + 32;
        // 2 sats x 2 signals = 4 cells, all active
        for i in 0..4 {
            set_bits(&mut buf, cell_mask_start + i, 1, 1);
        }

        let header = parse_header(&buf).expect("header should parse");
        assert_eq!(header.satellites, vec![1, 64]);
        assert_eq!(header.signals, vec![1, 32]);
        let total_cells: usize = header.cells.iter().map(|r| r.iter().filter(|&&c| c).count()).sum();
        assert_eq!(total_cells, 4);
    }

    #[test]
    fn decode_msm7_reports_each_active_cell() {
        let sat_mask = 1u64 << 63; // PRN 1 only
        let sig_mask = 1u32 << 31; // signal 1 only
        let mut buf = header_with_masks(sat_mask, sig_mask);

        let cell_mask_start = HEADER_PRELUDE_BITS + 64 + 32;
        set_bits(&mut buf, cell_mask_start, 1, 1);

        let sat_block_start = cell_mask_start + 1;
        buf.resize(buf.len().max((sat_block_start + 8 + 4 + 10 + 14 + 20 + 24 + 10 + 1 + 10 + 15) / 8 + 1), 0);

        set_bits(&mut buf, sat_block_start, 8, 100); // rough range int
        let cell_block_start = sat_block_start + 8 + 4 + 10 + 14;
        set_bits(&mut buf, cell_block_start, 20, 12345);

        let mut sink = CapturedSink::new();
        let result = decode_msm7(&buf, 1077, "GPS", &mut sink);
        assert!(result.is_some());
        assert!(sink.buffer.contains("PRN1"));
        assert!(sink.buffer.contains("1 satellites"));
    }

    #[test]
    fn gnss_name_mappings_cover_all_msm4_and_msm7_types() {
        assert_eq!(msm4_gnss_name(1074), Some("GPS"));
        assert_eq!(msm4_gnss_name(1124), Some("QZSS"));
        assert_eq!(msm7_gnss_name(1127), Some("BeiDou"));
        assert_eq!(msm7_gnss_name(1137), Some("SBAS"));
        assert_eq!(msm4_gnss_name(9999), None);
    }
}
