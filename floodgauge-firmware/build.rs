//! Build script for floodgauge-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates station.toml at compile time
//! - Generates `station_config.rs` with the validated values

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use floodgauge_core::config::{HazardThresholds, MonitorConfig, ScheduleConfig};
use floodgauge_protocol::http::MAX_API_KEY_LEN;
use floodgauge_protocol::session::{MAX_PASSWORD_LEN, MAX_SSID_LEN};
use serde::Deserialize;

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct StationFile {
    wifi: WifiSection,
    upload: UploadSection,
    #[serde(default)]
    thresholds: HazardThresholds,
    #[serde(default)]
    schedule: ScheduleConfig,
}

#[derive(Deserialize)]
struct WifiSection {
    ssid: String,
    password: String,
}

#[derive(Deserialize)]
struct UploadSection {
    api_key: String,
}

fn main() {
    setup_linker();
    let station = load_station();
    generate_config(&station);
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Read, parse and validate station.toml
fn load_station() -> StationFile {
    println!("cargo:rerun-if-changed=station.toml");

    let config_path = Path::new("station.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: station.toml not found!                                  ║\n\
            ║                                                                  ║\n\
            ║  The firmware requires a station.toml configuration file.        ║\n\
            ║  Please create one in the floodgauge-firmware directory.         ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read station.toml                              ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let station: StationFile = match toml::from_str(&config_content) {
        Ok(station) => station,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid station.toml                                     ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&e.to_string())
            );
        }
    };

    validate_station(&station);

    println!("cargo:warning=station.toml validated successfully");
    station
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Check everything the firmware would otherwise reject at runtime
fn validate_station(station: &StationFile) {
    let mut errors = Vec::new();

    if station.wifi.ssid.is_empty() {
        errors.push("[wifi] ssid cannot be empty".to_string());
    }
    if station.wifi.ssid.len() > MAX_SSID_LEN {
        errors.push(format!("[wifi] ssid longer than {} bytes", MAX_SSID_LEN));
    }
    if station.wifi.password.len() > MAX_PASSWORD_LEN {
        errors.push(format!("[wifi] password longer than {} bytes", MAX_PASSWORD_LEN));
    }
    // Quotes would end the CWJAP argument early
    for (field, value) in [("ssid", &station.wifi.ssid), ("password", &station.wifi.password)] {
        if value.contains('"') || value.contains('\\') {
            errors.push(format!("[wifi] {} cannot contain '\"' or '\\'", field));
        }
    }

    let key = &station.upload.api_key;
    if key.is_empty() || key.len() > MAX_API_KEY_LEN {
        errors.push(format!("[upload] api_key must be 1-{} characters", MAX_API_KEY_LEN));
    }
    if !key.chars().all(|c| c.is_ascii_alphanumeric()) {
        errors.push("[upload] api_key must be alphanumeric".to_string());
    }

    let config = MonitorConfig {
        thresholds: station.thresholds,
        schedule: station.schedule,
    };
    if let Err(e) = config.validate() {
        errors.push(format!("[thresholds]/[schedule] rejected: {:?}", e));
    }

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid station configuration                            ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }
}

/// Write the validated station as Rust constants into OUT_DIR
fn generate_config(station: &StationFile) {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let t = &station.thresholds;
    let s = &station.schedule;

    let source = format!(
        "// Generated from station.toml by build.rs\n\
         \n\
         pub const STATION_SSID: &str = {ssid:?};\n\
         pub const STATION_PASSWORD: &str = {password:?};\n\
         pub const STATION_API_KEY: &str = {api_key:?};\n\
         \n\
         pub const STATION_CONFIG: MonitorConfig = MonitorConfig {{\n\
         \x20   thresholds: HazardThresholds {{\n\
         \x20       evacuate_below_cm: {evacuate},\n\
         \x20       safe_from_cm: {safe},\n\
         \x20       max_plausible_cm: {plausible},\n\
         \x20       confirm_samples: {confirm},\n\
         \x20   }},\n\
         \x20   schedule: ScheduleConfig {{\n\
         \x20       measure_period_ms: {measure},\n\
         \x20       upload_interval_ms: {upload},\n\
         \x20       display_refresh_ms: {refresh},\n\
         \x20       ready_banner_ms: {banner},\n\
         \x20   }},\n\
         }};\n",
        ssid = station.wifi.ssid,
        password = station.wifi.password,
        api_key = station.upload.api_key,
        evacuate = t.evacuate_below_cm,
        safe = t.safe_from_cm,
        plausible = t.max_plausible_cm,
        confirm = t.confirm_samples,
        measure = s.measure_period_ms,
        upload = s.upload_interval_ms,
        refresh = s.display_refresh_ms,
        banner = s.ready_banner_ms,
    );

    fs::write(out_dir.join("station_config.rs"), source).unwrap();
}
