use std::path::PathBuf;

use thiserror::Error;

use crate::battery::{BatteryVoltage, ParseVoltageError};

/// Battery drain parameters of a [crate::flashlight::FlashLight]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlashLightConfig {
    /// Period of the drain task
    pub drain_period_ms: u32,
    /// Lux lost per tick while the light is on
    pub lux_step_on: f64,
    /// Lux lost per tick while the light is off
    pub lux_step_idle: f64,
    /// Lux at or below this counts as an empty battery
    pub epsilon: f64,
    /// Makes the drain task fail with a division by zero on every n-th second of
    /// simulated time. Used to exercise the fault path, `None` in normal operation.
    pub fault_every_secs: Option<u32>,
}

pub const DRAIN_PERIOD: u32 = 100;
pub const LUX_STEP_ON: f64 = 2.0;
pub const LUX_STEP_IDLE: f64 = 0.5;
pub const LUX_EPSILON: f64 = 1e-6;

impl Default for FlashLightConfig {
    fn default() -> Self {
        Self {
            drain_period_ms: DRAIN_PERIOD,
            lux_step_on: LUX_STEP_ON,
            lux_step_idle: LUX_STEP_IDLE,
            epsilon: LUX_EPSILON,
            fault_every_secs: None,
        }
    }
}

pub const ENV_VOLTAGE: &str = "LAMP_SIM_VOLTAGE";
pub const ENV_DRAIN_MS: &str = "LAMP_SIM_DRAIN_MS";
pub const ENV_FAULT_EVERY: &str = "LAMP_SIM_FAULT_EVERY";
pub const ENV_LOG: &str = "LAMP_SIM_LOG";

pub const DEFAULT_LOG_FILE: &str = "/tmp/lamp-sim.log";

/// Longest accepted drain period
pub const MAX_DRAIN_PERIOD: u32 = 60_000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key}: {source}")]
    Voltage {
        key: &'static str,
        source: ParseVoltageError,
    },
    #[error("{key}: expected a positive whole number, got `{value}`")]
    NotPositive { key: &'static str, value: String },
    #[error("{key}: {value} is above the limit of {max}")]
    TooLarge {
        key: &'static str,
        value: u32,
        max: u32,
    },
}

/// Settings of the simulator binaries
#[derive(Clone, Debug, PartialEq)]
pub struct SimConfig {
    /// Battery the flashlight starts with
    pub voltage: BatteryVoltage,
    pub flashlight: FlashLightConfig,
    /// Where the console simulator writes its log
    pub log_file: PathBuf,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            voltage: BatteryVoltage::MaxVoltage,
            flashlight: FlashLightConfig::default(),
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

impl SimConfig {
    /// Reads `LAMP_SIM_*` environment variables, unset ones keep their defaults
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = SimConfig::default();

        if let Some(value) = lookup(ENV_VOLTAGE) {
            config.voltage = value.parse().map_err(|source| ConfigError::Voltage {
                key: ENV_VOLTAGE,
                source,
            })?;
        }
        if let Some(value) = lookup(ENV_DRAIN_MS) {
            config.flashlight.drain_period_ms =
                parse_at_most(ENV_DRAIN_MS, value, MAX_DRAIN_PERIOD)?;
        }
        if let Some(value) = lookup(ENV_FAULT_EVERY) {
            config.flashlight.fault_every_secs = Some(parse_positive(ENV_FAULT_EVERY, value)?);
        }
        if let Some(value) = lookup(ENV_LOG) {
            config.log_file = PathBuf::from(value);
        }

        Ok(config)
    }
}

fn parse_positive(key: &'static str, value: String) -> Result<u32, ConfigError> {
    match value.trim().parse::<u32>() {
        Ok(parsed) if parsed > 0 => Ok(parsed),
        _ => Err(ConfigError::NotPositive { key, value }),
    }
}

fn parse_at_most(key: &'static str, value: String, max: u32) -> Result<u32, ConfigError> {
    let parsed = parse_positive(key, value)?;
    if parsed > max {
        return Err(ConfigError::TooLarge {
            key,
            value: parsed,
            max,
        });
    }
    Ok(parsed)
}
