//! Top-level RTCM 3.x message dispatch.

pub mod antenna;
pub mod ephemeris;
pub mod glonass;
pub mod msm;
pub mod station;
pub mod system_params;

use crate::error::{NtripError, Result};
use crate::frame::RtcmFrame;
use crate::output::OutputSink;
use crate::sink_writeln;

/// Decodes `frame` and writes a textual summary through `sink`. `rover` is
/// the configured rover position, used by the 1005/1006 decoders to append a
/// distance-and-bearing line.
///
/// Returns the frame's message type on success, even for recognized-but-
/// unspecialized types (only the header summary is emitted for those).
pub fn decode(frame: &RtcmFrame, rover: Option<(f64, f64)>, sink: &mut dyn OutputSink) -> Result<u16> {
    if frame.raw.first() != Some(&0xD3) {
        return Err(NtripError::Truncated { have: frame.raw.len(), need: 1 });
    }

    if !frame.crc_valid {
        sink_writeln!(sink, "message {} (CRC mismatch, not decoded)", frame.msg_type);
        return Ok(frame.msg_type);
    }

    let payload = &frame.payload;
    let msg_type = frame.msg_type;

    let decoded = match msg_type {
        1005 => station::decode_1005(payload, rover, sink).is_some(),
        1006 => station::decode_1006(payload, rover, sink).is_some(),
        1007 => antenna::decode_1007(payload, sink).is_some(),
        1008 => antenna::decode_1008(payload, sink).is_some(),
        1012 => glonass::decode_1012(payload, sink).is_some(),
        1013 => system_params::decode_1013(payload, sink).is_some(),
        1019 => ephemeris::decode_1019(payload, sink).is_some(),
        1033 => antenna::decode_1033(payload, sink).is_some(),
        1045 => ephemeris::decode_1045(payload, sink).is_some(),
        1230 => glonass::decode_1230(payload, sink).is_some(),
        _ if msm::msm4_gnss_name(msg_type).is_some() => {
            let name = msm::msm4_gnss_name(msg_type).unwrap();
            msm::decode_msm4(payload, msg_type, name, sink).is_some()
        }
        _ if msm::msm7_gnss_name(msg_type).is_some() => {
            let name = msm::msm7_gnss_name(msg_type).unwrap();
            msm::decode_msm7(payload, msg_type, name, sink).is_some()
        }
        _ => {
            sink_writeln!(sink, "message {} (unrecognized or unsupported type)", msg_type);
            true
        }
    };

    if !decoded {
        return Err(NtripError::PayloadTooShort {
            msg_type,
            have: payload.len(),
            need: 0,
        });
    }

    Ok(msg_type)
}
