// Copyright 2025 Thermoguard Contributors
// SPDX-License-Identifier: Apache-2.0

//! Thermoguard daemon
//!
//! Loads and validates the configuration (fatal on any error), probes the
//! configured sensor, arms the governor against the sysfs backends, and then
//! serves the tunable surface over stdin:
//!
//! ```text
//! get enabled
//! set enabled false
//! quit
//! ```

#[cfg(target_os = "linux")]
fn main() -> anyhow::Result<()> {
    linux::run()
}

#[cfg(not(target_os = "linux"))]
fn main() {
    eprintln!("thermoguardd requires Linux sysfs cpufreq and thermal zones");
    std::process::exit(1);
}

#[cfg(target_os = "linux")]
mod linux {
    use anyhow::{Context, Result};
    use std::io::{self, BufRead, Write};
    use std::path::PathBuf;
    use std::sync::Arc;
    use thermoguard_config::load_config;
    use thermoguard_governor::ThermalGovernor;
    use thermoguard_hal::sysfs::{SysfsCpufreq, SysfsTemperatureSensor};
    use thermoguard_hal::TemperatureSensor;
    use tracing::info;
    use tracing_subscriber::EnvFilter;

    fn parse_args() -> Option<PathBuf> {
        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            if arg == "--config" {
                return args.next().map(PathBuf::from);
            }
        }
        None
    }

    pub fn run() -> Result<()> {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .init();

        let config_path = parse_args();
        let config = load_config(config_path.as_deref(), None)
            .context("failed to load thermoguard configuration")?;

        let sensor = Arc::new(SysfsTemperatureSensor::new());
        let backend = Arc::new(SysfsCpufreq::new());

        // a bad sensor id must abort before the loop is armed
        let temp = sensor
            .read_temp(config.sensor_id)
            .with_context(|| format!("temperature sensor {} unavailable", config.sensor_id))?;
        info!("sensor {} reads {} C", config.sensor_id, temp);

        let enabled = config.enabled;
        let mut governor = ThermalGovernor::new(config, sensor, backend);
        if enabled {
            governor.start()?;
        } else {
            info!("throttling disabled by configuration; loop not armed");
        }

        serve_params(&mut governor)
    }

    /// Minimal control shell over stdin: `get <param>`, `set <param> <value>`, `quit`
    fn serve_params(governor: &mut ThermalGovernor) -> Result<()> {
        let stdin = io::stdin();
        let mut stdout = io::stdout();

        for line in stdin.lock().lines() {
            let line = line?;
            let mut parts = line.split_whitespace();
            let reply = match (parts.next(), parts.next(), parts.next()) {
                (Some("get"), Some(name), None) => match governor.get_param(name) {
                    Ok(value) => format!("{} = {}", name, value),
                    Err(e) => format!("error: {}", e),
                },
                (Some("set"), Some(name), Some(value)) => match governor.set_param(name, value) {
                    Ok(()) => format!("{} = {}", name, value),
                    Err(e) => format!("error: {}", e),
                },
                (Some("quit"), None, None) => break,
                (None, _, _) => continue,
                _ => "error: expected 'get <param>', 'set <param> <value>' or 'quit'".to_string(),
            };
            writeln!(stdout, "{}", reply)?;
        }

        governor.stop();
        Ok(())
    }
}
