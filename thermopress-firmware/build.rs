//! Build script for thermopress-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates press.toml and compiles it into a `PressConfig` constant

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thermopress_core::PressConfig;

fn main() {
    setup_linker();
    generate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    println!("cargo:rustc-link-search={}", out_dir.display());
    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct PressToml {
    display: DisplaySection,
    input: InputSection,
    cycle: CycleSection,
    sensors: SensorSection,
    safety: SafetySection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct DisplaySection {
    refresh_interval_ms: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct InputSection {
    settle_ms: Option<u32>,
    button_debounce_ms: Option<u32>,
    long_press_ms: Option<u32>,
    double_press_ms: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct CycleSection {
    duration_s: Option<u32>,
    melting_threshold_c: Option<i16>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct SensorSection {
    retries: Option<u8>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct SafetySection {
    overtemp_cutoff_c: Option<i16>,
    max_sensor_faults: Option<u8>,
}

impl PressToml {
    fn into_config(self) -> PressConfig {
        let d = PressConfig::DEFAULT;
        PressConfig {
            refresh_interval_ms: self.display.refresh_interval_ms.unwrap_or(d.refresh_interval_ms),
            settle_ms: self.input.settle_ms.unwrap_or(d.settle_ms),
            cycle_duration_s: self.cycle.duration_s.unwrap_or(d.cycle_duration_s),
            melting_threshold_c: self.cycle.melting_threshold_c.unwrap_or(d.melting_threshold_c),
            sensor_retries: self.sensors.retries.unwrap_or(d.sensor_retries),
            button_debounce_ms: self.input.button_debounce_ms.unwrap_or(d.button_debounce_ms),
            long_press_ms: self.input.long_press_ms.unwrap_or(d.long_press_ms),
            double_press_ms: self.input.double_press_ms.unwrap_or(d.double_press_ms),
            overtemp_cutoff_c: self.safety.overtemp_cutoff_c.or(d.overtemp_cutoff_c),
            max_sensor_faults: self.safety.max_sensor_faults.or(d.max_sensor_faults),
        }
    }
}

/// Parse press.toml, validate it and write press_config.rs into OUT_DIR
fn generate_config() {
    println!("cargo:rerun-if-changed=press.toml");

    let config_path = Path::new("press.toml");

    // A missing file means defaults
    let parsed = if config_path.exists() {
        let content = match fs::read_to_string(config_path) {
            Ok(content) => content,
            Err(e) => fail("Failed to read press.toml", &e.to_string()),
        };
        match toml::from_str::<PressToml>(&content) {
            Ok(parsed) => parsed,
            Err(e) => fail("Invalid press.toml", &e.to_string()),
        }
    } else {
        println!("cargo:warning=press.toml not found, using defaults");
        PressToml::default()
    };

    let config = parsed.into_config();
    if let Err(e) = config.validate() {
        fail("Invalid press configuration", &format!("{:?}", e));
    }

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let generated = format!(
        "/// Press configuration generated from press.toml\n\
         pub const PRESS_CONFIG: PressConfig = PressConfig {{\n\
         \x20   refresh_interval_ms: {},\n\
         \x20   settle_ms: {},\n\
         \x20   cycle_duration_s: {},\n\
         \x20   melting_threshold_c: {},\n\
         \x20   sensor_retries: {},\n\
         \x20   button_debounce_ms: {},\n\
         \x20   long_press_ms: {},\n\
         \x20   double_press_ms: {},\n\
         \x20   overtemp_cutoff_c: {:?},\n\
         \x20   max_sensor_faults: {:?},\n\
         }};\n",
        config.refresh_interval_ms,
        config.settle_ms,
        config.cycle_duration_s,
        config.melting_threshold_c,
        config.sensor_retries,
        config.button_debounce_ms,
        config.long_press_ms,
        config.double_press_ms,
        config.overtemp_cutoff_c,
        config.max_sensor_faults,
    );
    fs::write(out_dir.join("press_config.rs"), generated).unwrap();
}

/// Abort the build with a framed message
fn fail(title: &str, detail: &str) -> ! {
    let body = detail
        .lines()
        .map(|line| format!("║  {:<64} ║", line))
        .collect::<Vec<_>>()
        .join("\n");
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<58} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title, body
    );
}
