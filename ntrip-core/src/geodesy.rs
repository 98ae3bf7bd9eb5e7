//! WGS84 ECEF <-> geodetic conversion and great-circle distance/bearing.

const WGS84_A: f64 = 6_378_137.0;
const WGS84_E2: f64 = 6.694_379_990_14e-3;
const LAT_CONVERGENCE_RAD: f64 = 1e-11;
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Converts an ECEF position (meters) plus an antenna-height offset (meters)
/// into WGS84 geodetic latitude/longitude (degrees) and ellipsoidal height
/// (meters).
///
/// Uses iterative Bowring-style latitude refinement, terminating once
/// successive iterates differ by less than 1e-11 radians.
pub fn ecef_to_geodetic(x: f64, y: f64, z: f64, antenna_height: f64) -> (f64, f64, f64) {
    let lon = y.atan2(x);
    let p = (x * x + y * y).sqrt();

    let mut lat = z.atan2(p * (1.0 - WGS84_E2));
    loop {
        let n = WGS84_A / (1.0 - WGS84_E2 * lat.sin() * lat.sin()).sqrt();
        let next_lat = (z + WGS84_E2 * n * lat.sin()).atan2(p);
        if (next_lat - lat).abs() <= LAT_CONVERGENCE_RAD {
            lat = next_lat;
            break;
        }
        lat = next_lat;
    }

    let n = WGS84_A / (1.0 - WGS84_E2 * lat.sin() * lat.sin()).sqrt();
    let alt = p / lat.cos() - n + antenna_height;

    (lat.to_degrees(), lon.to_degrees(), alt)
}

/// Inverse of [`ecef_to_geodetic`]: geodetic (degrees, meters) to ECEF
/// (meters).
pub fn geodetic_to_ecef(lat_deg: f64, lon_deg: f64, alt_m: f64) -> (f64, f64, f64) {
    let lat = lat_deg.to_radians();
    let lon = lon_deg.to_radians();
    let n = WGS84_A / (1.0 - WGS84_E2 * lat.sin() * lat.sin()).sqrt();

    let x = (n + alt_m) * lat.cos() * lon.cos();
    let y = (n + alt_m) * lat.cos() * lon.sin();
    let z = ((1.0 - WGS84_E2) * n + alt_m) * lat.sin();

    (x, y, z)
}

/// Great-circle distance (km) and initial bearing (degrees, `[0, 360)`)
/// between two WGS84 points via the haversine formula.
pub fn great_circle(lat1_deg: f64, lon1_deg: f64, lat2_deg: f64, lon2_deg: f64) -> (f64, f64) {
    let phi1 = lat1_deg.to_radians();
    let phi2 = lat2_deg.to_radians();
    let d_phi = (lat2_deg - lat1_deg).to_radians();
    let d_lambda = (lon2_deg - lon1_deg).to_radians();

    let a = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();
    let distance_km = EARTH_RADIUS_KM * c;

    let bearing = d_lambda.sin() * phi2.cos();
    let bearing_denom = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * d_lambda.cos();
    let bearing_deg = bearing.atan2(bearing_denom).to_degrees();
    let bearing_deg = (bearing_deg + 360.0) % 360.0;

    (distance_km, bearing_deg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ecef_round_trips_through_geodetic() {
        let cases = [
            (0.0, 0.0, 0.0),
            (45.0, 90.0, 100.0),
            (-33.5, -70.6, 500.0),
            (80.0, 179.9, -50.0),
            (-84.9, -179.9, 9000.0),
        ];

        for (lat, lon, alt) in cases {
            let (x, y, z) = geodetic_to_ecef(lat, lon, alt);
            let (lat2, lon2, alt2) = ecef_to_geodetic(x, y, z, 0.0);
            assert!((lat - lat2).abs() < 1e-6, "lat {} vs {}", lat, lat2);
            assert!((lon - lon2).abs() < 1e-6, "lon {} vs {}", lon, lon2);
            assert!((alt - alt2).abs() < 1e-3, "alt {} vs {}", alt, alt2);
        }
    }

    #[test]
    fn great_circle_matches_expected_distance() {
        let (distance_km, _bearing) = great_circle(52.0, 5.0, 52.5, 5.5);
        assert!((distance_km - 66.1).abs() < 1.0, "distance was {}", distance_km);
    }

    #[test]
    fn bearing_is_normalized_to_0_360() {
        let (_d, bearing) = great_circle(10.0, 10.0, 9.0, 9.0);
        assert!((0.0..360.0).contains(&bearing));
    }
}
