//! 1005/1006 stationary reference point (antenna reference point) decoders.

use crate::bitreader::{get_bits, get_signed};
use crate::geodesy::{ecef_to_geodetic, great_circle};
use crate::output::OutputSink;
use crate::sink_writeln;

const ECEF_SCALE: f64 = 0.0001;
const HEIGHT_SCALE: f64 = 0.0001;

pub struct StationCoords {
    pub station_id: u16,
    pub ecef_x: f64,
    pub ecef_y: f64,
    pub ecef_z: f64,
    pub antenna_height: f64,
    pub lat_deg: f64,
    pub lon_deg: f64,
    pub alt_m: f64,
}

fn decode_common(payload: &[u8]) -> (u16, f64, f64, f64) {
    let station_id = get_bits(payload, 12, 12) as u16;
    // itrf_year(6) + gps_ind(1) + glo_ind(1) + gal_ind(1) + ref_ind(1) precede ecef_x
    let ecef_x = get_signed(payload, 34, 38) as f64 * ECEF_SCALE;
    // osc_ind(1) + reserved(1) precede ecef_y
    let ecef_y = get_signed(payload, 74, 38) as f64 * ECEF_SCALE;
    // reserved(2) precedes ecef_z
    let ecef_z = get_signed(payload, 114, 38) as f64 * ECEF_SCALE;
    (station_id, ecef_x, ecef_y, ecef_z)
}

/// Decodes message 1005 (no antenna height).
pub fn decode_1005(payload: &[u8], rover: Option<(f64, f64)>, sink: &mut dyn OutputSink) -> Option<StationCoords> {
    if payload.len() * 8 < 152 {
        return None;
    }
    let (station_id, ecef_x, ecef_y, ecef_z) = decode_common(payload);
    emit(station_id, ecef_x, ecef_y, ecef_z, 0.0, rover, sink)
}

/// Decodes message 1006 (adds a 16-bit antenna height field at 0.0001 m).
pub fn decode_1006(payload: &[u8], rover: Option<(f64, f64)>, sink: &mut dyn OutputSink) -> Option<StationCoords> {
    if payload.len() * 8 < 168 {
        return None;
    }
    let (station_id, ecef_x, ecef_y, ecef_z) = decode_common(payload);
    let antenna_height = get_bits(payload, 152, 16) as f64 * HEIGHT_SCALE;
    emit(station_id, ecef_x, ecef_y, ecef_z, antenna_height, rover, sink)
}

fn emit(
    station_id: u16,
    ecef_x: f64,
    ecef_y: f64,
    ecef_z: f64,
    antenna_height: f64,
    rover: Option<(f64, f64)>,
    sink: &mut dyn OutputSink,
) -> Option<StationCoords> {
    let (lat_deg, lon_deg, alt_m) = ecef_to_geodetic(ecef_x, ecef_y, ecef_z, antenna_height);

    sink_writeln!(sink, "station {} ECEF ({:.4}, {:.4}, {:.4})", station_id, ecef_x, ecef_y, ecef_z);
    sink_writeln!(sink, "  WGS84 lat {:.7} lon {:.7} alt {:.3} m", lat_deg, lon_deg, alt_m);
    sink_writeln!(
        sink,
        "  [Google Maps Link] https://maps.google.com/?q={:.8},{:.8}",
        lat_deg,
        lon_deg
    );

    if let Some((rover_lat, rover_lon)) = rover {
        let (distance_km, bearing_deg) = great_circle(rover_lat, rover_lon, lat_deg, lon_deg);
        sink_writeln!(
            sink,
            "  {:.2} km at bearing {:.1} deg from rover",
            distance_km,
            bearing_deg
        );
    }

    Some(StationCoords {
        station_id,
        ecef_x,
        ecef_y,
        ecef_z,
        antenna_height,
        lat_deg,
        lon_deg,
        alt_m,
    })
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

    fn build_1005_payload(station_id: u16, x_raw: i64, y_raw: i64, z_raw: i64) -> Vec<u8> {
        let mut buf = vec![0u8; 19];
        set_bits(&mut buf, 0, 12, 1005);
        set_bits(&mut buf, 12, 12, station_id as u64);
        set_bits(&mut buf, 34, 38, x_raw as u64 & ((1u64 << 38) - 1));
        set_bits(&mut buf, 74, 38, y_raw as u64 & ((1u64 << 38) - 1));
        set_bits(&mut buf, 114, 38, z_raw as u64 & ((1u64 << 38) - 1));
        buf
    }

    #[test]
    fn decodes_station_id_and_ecef_coordinates() {
        let payload = build_1005_payload(1234, 38_490_000_000, 4_110_000_000, 50_120_000_000);
        let mut sink = CapturedSink::new();
        let coords = decode_1005(&payload, None, &mut sink).expect("should decode");

        assert_eq!(coords.station_id, 1234);
        assert!((coords.ecef_x - 3_849_000.0).abs() < 1e-3);
        assert!((coords.ecef_y - 411_000.0).abs() < 1e-3);
        assert!((coords.ecef_z - 5_012_000.0).abs() < 1e-3);
        assert!(sink.buffer.contains("station 1234"));
    }

    #[test]
    fn rejects_a_truncated_payload() {
        let payload = vec![0u8; 5];
        let mut sink = CapturedSink::new();
        assert!(decode_1005(&payload, None, &mut sink).is_none());
    }

    #[test]
    fn emits_a_google_maps_link_for_the_decoded_position() {
        let payload = build_1005_payload(1, 38_490_000_000, 4_110_000_000, 50_120_000_000);
        let mut sink = CapturedSink::new();
        decode_1005(&payload, None, &mut sink);
        assert!(sink.buffer.contains("[Google Maps Link] https://maps.google.com/?q="));
    }

    #[test]
    fn appends_distance_and_bearing_when_rover_is_known() {
        let payload = build_1005_payload(1, 38_490_000_000, 4_110_000_000, 50_120_000_000);
        let mut sink = CapturedSink::new();
        decode_1005(&payload, Some((52.0, 5.0)), &mut sink);
        assert!(sink.buffer.contains("bearing"));
    }
}
