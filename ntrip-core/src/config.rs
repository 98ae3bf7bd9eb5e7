//! Connection parameters for an NTRIP session.
//!
//! `NtripConfig` itself has no opinion on where its values come from — the
//! `ntrip-client` binary's own config loader owns that (a thin TOML reader
//! with environment-variable overrides for credentials).

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct NtripConfig {
    pub host: String,
    pub port: u16,
    pub mountpoint: String,
    pub username: String,
    pub password: String,
    /// Rover position used for GGA uplink and sourcetable distance
    /// calculation. `None` when the client has no fix of its own yet.
    pub rover_lat: Option<f64>,
    pub rover_lon: Option<f64>,
}

impl NtripConfig {
    pub fn new(host: String, port: u16, mountpoint: String, username: String, password: String) -> Self {
        NtripConfig {
            host,
            port,
            mountpoint,
            username,
            password,
            rover_lat: None,
            rover_lon: None,
        }
    }

    /// Precomputed `Basic` auth token, ready to drop into the
    /// `Authorization` header.
    pub fn basic_auth_token(&self) -> String {
        STANDARD.encode(format!("{}:{}", self.username, self.password))
    }

    /// The mountpoint name without a leading slash, however it was supplied.
    pub fn mountpoint_name(&self) -> &str {
        self.mountpoint.strip_prefix('/').unwrap_or(&self.mountpoint)
    }

    pub fn rover_position(&self) -> Option<(f64, f64)> {
        match (self.rover_lat, self.rover_lon) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        }
    }
}
