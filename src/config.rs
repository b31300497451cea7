use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::parser::UnitTable;

#[derive(Debug, Deserialize)]
pub struct Config {
    /// Unit vocabulary for the duration parser
    #[serde(default)]
    pub locale: UnitTable,
    #[serde(default)]
    pub trigger: TriggerConfig,
    #[serde(default)]
    pub card: CardConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: UnitTable::default(),
            trigger: TriggerConfig::default(),
            card: CardConfig::default(),
        }
    }
}

// ============================================================================
// Trigger Config
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct TriggerConfig {
    /// Gate feed-mode lines on the launch phrase
    #[serde(default = "default_trigger_enabled")]
    pub enabled: bool,
    /// Phrase a recognizer line must lead with to count as a timer request
    #[serde(default = "default_trigger_phrase")]
    pub phrase: String,
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            enabled: default_trigger_enabled(),
            phrase: default_trigger_phrase(),
        }
    }
}

fn default_trigger_enabled() -> bool {
    true
}

fn default_trigger_phrase() -> String {
    "set a timer".into()
}

// ============================================================================
// Card Config
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CardConfig {
    /// Render cadence for the countdown line, in milliseconds
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
    /// Ring the terminal bell when the countdown expires
    #[serde(default = "default_bell")]
    pub bell: bool,
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            tick_ms: default_tick_ms(),
            bell: default_bell(),
        }
    }
}

fn default_tick_ms() -> u64 {
    250
}

fn default_bell() -> bool {
    true
}

impl Config {
    pub fn load() -> Self {
        let path = Path::new("config.toml");
        if !path.exists() {
            return Config::default();
        }
        match fs::read_to_string(path) {
            Ok(s) => toml::from_str(&s).unwrap_or_else(|e| {
                eprintln!("Warning: ignoring malformed config.toml: {}", e);
                Config::default()
            }),
            Err(_) => Config::default(),
        }
    }
}
