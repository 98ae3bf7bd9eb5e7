//! Parses an NTRIP caster's sourcetable response body into structured
//! mountpoint records.

use crate::geodesy::great_circle;
use crate::stream_format::{self, StreamFormat};

/// One `STR;` row of the sourcetable.
#[derive(Debug, Clone, PartialEq)]
pub struct MountpointRecord {
    pub mountpoint: String,
    pub identifier: String,
    pub format: String,
    pub format_details: String,
    pub carrier: String,
    pub nav_systems: String,
    pub network: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Great-circle distance from the configured rover position, in km, when
    /// one is known and the mountpoint carries non-zero coordinates.
    pub distance_km: Option<f64>,
    /// Stream format detected from `format`/`format_details`, advisory only.
    pub detected_format: StreamFormat,
}

/// Parses `body` into mountpoint records. `rover` is `Some((lat, lon))` when
/// a rover position is configured; distances are omitted both when no rover
/// position is known and when the mountpoint itself has no coordinates
/// (both zero).
pub fn parse_sourcetable(body: &str, rover: Option<(f64, f64)>) -> Vec<MountpointRecord> {
    let mut records = Vec::new();

    for line in body.lines() {
        if !line.starts_with("STR;") {
            continue;
        }

        let fields: Vec<&str> = line.split(';').collect();
        if fields.len() < 11 {
            continue;
        }

        let lat: f64 = fields[9].parse().unwrap_or(0.0);
        let lon: f64 = fields[10].parse().unwrap_or(0.0);

        let distance_km = match rover {
            Some((rover_lat, rover_lon)) if lat != 0.0 || lon != 0.0 => {
                Some(great_circle(rover_lat, rover_lon, lat, lon).0)
            }
            _ => None,
        };

        let detected_format = stream_format::detect_from_sourcetable_fields(fields[3], fields[4]);

        records.push(MountpointRecord {
            mountpoint: fields[1].to_string(),
            identifier: fields[2].to_string(),
            format: fields[3].to_string(),
            format_details: fields[4].to_string(),
            carrier: fields[5].to_string(),
            nav_systems: fields[6].to_string(),
            network: fields[7].to_string(),
            country: fields[8].to_string(),
            latitude: lat,
            longitude: lon,
            distance_km,
            detected_format,
        });
    }

    records
}
