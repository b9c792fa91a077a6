//! Timer and counter presets supplied by the host.
//!
//! Presets are keyed by address. The timer preset at address `n` applies to
//! both `TON n` and `TOF n`; the counter preset at address `n` applies to
//! both `CUP n` and `CDN n`. In JSON, presets are named `T1` to `T32` and
//! `C1` to `C8`:
//!
//! ```json
//! { "timers": { "T1": 30 }, "counters": { "C2": 5 } }
//! ```
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use dsl::core::{COUNTERS, TIMERS};
use dsl::token::Address;

/// Errors that can occur while building a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unable to read presets: {0}")]
    Json(#[from] serde_json::Error),

    #[error("'{0}' is not a timer preset name (expected T1 to T{})", TIMERS)]
    UnknownTimer(String),

    #[error("'{0}' is not a counter preset name (expected C1 to C{})", COUNTERS)]
    UnknownCounter(String),
}

/// The preset file as written by users.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
struct PresetFile {
    timers: BTreeMap<String, u32>,
    counters: BTreeMap<String, i32>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(try_from = "PresetFile", into = "PresetFile")]
pub struct PlcConfig {
    /// Timer presets in ticks, indexed by address - 1.
    timer_presets: [u32; TIMERS],
    /// Counter presets, indexed by address - 1.
    counter_presets: [i32; COUNTERS],
}

impl Default for PlcConfig {
    fn default() -> Self {
        PlcConfig {
            timer_presets: [0; TIMERS],
            counter_presets: [0; COUNTERS],
        }
    }
}

/// Parses a preset name such as `T12` into a 1-based address.
fn parse_name(name: &str, prefix: char, limit: usize) -> Option<Address> {
    let mut chars = name.trim().chars();
    if !chars.next()?.eq_ignore_ascii_case(&prefix) {
        return None;
    }
    let address: Address = chars.as_str().parse().ok()?;
    (address >= 1 && usize::from(address) <= limit).then_some(address)
}

impl PlcConfig {
    /// Reads the configuration from JSON text.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let file: PresetFile = serde_json::from_str(text)?;
        PlcConfig::try_from(file)
    }

    /// Sets a timer preset by name (`T1` to `T32`).
    pub fn set_timer(&mut self, name: &str, ticks: u32) -> Result<(), ConfigError> {
        let address = parse_name(name, 'T', TIMERS)
            .ok_or_else(|| ConfigError::UnknownTimer(name.to_string()))?;
        self.timer_presets[usize::from(address) - 1] = ticks;
        Ok(())
    }

    /// Sets a counter preset by name (`C1` to `C8`).
    pub fn set_counter(&mut self, name: &str, preset: i32) -> Result<(), ConfigError> {
        let address = parse_name(name, 'C', COUNTERS)
            .ok_or_else(|| ConfigError::UnknownCounter(name.to_string()))?;
        self.counter_presets[usize::from(address) - 1] = preset;
        Ok(())
    }

    /// Returns the preset for the timers at the 1-based address.
    pub fn timer_preset(&self, address: Address) -> Option<u32> {
        usize::from(address)
            .checked_sub(1)
            .and_then(|index| self.timer_presets.get(index))
            .copied()
    }

    /// Returns the preset for the counters at the 1-based address.
    pub fn counter_preset(&self, address: Address) -> Option<i32> {
        usize::from(address)
            .checked_sub(1)
            .and_then(|index| self.counter_presets.get(index))
            .copied()
    }
}

impl TryFrom<PresetFile> for PlcConfig {
    type Error = ConfigError;

    fn try_from(file: PresetFile) -> Result<Self, Self::Error> {
        let mut config = PlcConfig::default();
        for (name, ticks) in &file.timers {
            config.set_timer(name, *ticks)?;
        }
        for (name, preset) in &file.counters {
            config.set_counter(name, *preset)?;
        }
        Ok(config)
    }
}

impl From<PlcConfig> for PresetFile {
    fn from(config: PlcConfig) -> Self {
        let timers = config
            .timer_presets
            .iter()
            .enumerate()
            .filter(|(_, ticks)| **ticks != 0)
            .map(|(index, ticks)| (format!("T{}", index + 1), *ticks))
            .collect();
        let counters = config
            .counter_presets
            .iter()
            .enumerate()
            .filter(|(_, preset)| **preset != 0)
            .map(|(index, preset)| (format!("C{}", index + 1), *preset))
            .collect();
        PresetFile { timers, counters }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_json_when_timers_and_counters_then_presets_by_address() {
        let config =
            PlcConfig::from_json(r#"{"timers": {"T1": 30, "t32": 2}, "counters": {"C2": -5}}"#)
                .unwrap();
        assert_eq!(config.timer_preset(1), Some(30));
        assert_eq!(config.timer_preset(32), Some(2));
        assert_eq!(config.timer_preset(2), Some(0));
        assert_eq!(config.counter_preset(2), Some(-5));
    }

    #[test]
    fn from_json_when_empty_object_then_default() {
        assert_eq!(PlcConfig::from_json("{}").unwrap(), PlcConfig::default());
    }

    #[test]
    fn from_json_when_timer_out_of_range_then_err() {
        let result = PlcConfig::from_json(r#"{"timers": {"T33": 1}}"#);
        assert!(matches!(result, Err(ConfigError::UnknownTimer(name)) if name == "T33"));
    }

    #[test]
    fn from_json_when_counter_name_wrong_then_err() {
        let result = PlcConfig::from_json(r#"{"counters": {"X1": 1}}"#);
        assert!(matches!(result, Err(ConfigError::UnknownCounter(_))));
    }

    #[test]
    fn from_json_when_unknown_section_then_err() {
        let result = PlcConfig::from_json(r#"{"memories": {}}"#);
        assert!(matches!(result, Err(ConfigError::Json(_))));
    }

    #[test]
    fn from_json_when_negative_ticks_then_err() {
        let result = PlcConfig::from_json(r#"{"timers": {"T1": -1}}"#);
        assert!(matches!(result, Err(ConfigError::Json(_))));
    }

    #[test]
    fn timer_preset_when_address_zero_then_none() {
        assert_eq!(PlcConfig::default().timer_preset(0), None);
        assert_eq!(PlcConfig::default().counter_preset(9), None);
    }

    #[test]
    fn serialize_when_presets_then_only_non_zero_names() {
        let mut config = PlcConfig::default();
        config.set_timer("T3", 7).unwrap();
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(json, r#"{"timers":{"T3":7},"counters":{}}"#);
    }
}
