use std::error::Error;

use ntrip_core::NtripConfig;
use serde::Deserialize;

/// On-disk shape of `ntrip-client.toml`. Credentials are deliberately
/// omittable here so they can come from the environment instead of a
/// committed file.
#[derive(Deserialize)]
struct FileConfig {
    host: String,
    port: u16,
    mountpoint: String,
    username: Option<String>,
    password: Option<String>,
    rover_lat: Option<f64>,
    rover_lon: Option<f64>,
}

/// Loads the NTRIP connection settings from the TOML file at `NTRIP_CONFIG`
/// (default `ntrip-client.toml`), then overrides the username/password from
/// `NTRIP_USERNAME`/`NTRIP_PASSWORD` when those env vars are set.
pub fn load() -> Result<NtripConfig, Box<dyn Error>> {
    let path = std::env::var("NTRIP_CONFIG").unwrap_or_else(|_| "ntrip-client.toml".to_string());
    let raw = std::fs::read_to_string(&path)?;
    let file_config: FileConfig = toml::from_str(&raw)?;

    let username = std::env::var("NTRIP_USERNAME")
        .ok()
        .or(file_config.username)
        .unwrap_or_default();
    let password = std::env::var("NTRIP_PASSWORD")
        .ok()
        .or(file_config.password)
        .unwrap_or_default();

    let mut config = NtripConfig::new(file_config.host, file_config.port, file_config.mountpoint, username, password);
    config.rover_lat = file_config.rover_lat;
    config.rover_lon = file_config.rover_lon;

    Ok(config)
}
