//! Station configuration generated from station.toml

use floodgauge_core::config::{HazardThresholds, MonitorConfig, ScheduleConfig};
use floodgauge_core::StationIdentity;

include!(concat!(env!("OUT_DIR"), "/station_config.rs"));

/// Credentials and upload key baked into this build
pub const STATION_IDENTITY: StationIdentity<'static> = StationIdentity {
    ssid: STATION_SSID,
    password: STATION_PASSWORD,
    api_key: STATION_API_KEY,
};
