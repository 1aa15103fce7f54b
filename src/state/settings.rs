//! Persisted user settings.
//!
//! Stored as a flat JSON object (`source`, `speed`, `nounCount`). Each key is
//! read on its own so that one malformed value only resets that value.

use crate::config::{DEFAULT_NOUN_COUNT, MAX_NOUN_COUNT};
use crate::error::{AppError, Result};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::PathBuf;

/// Named refresh cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Speed {
    Paused,
    Fast,
    #[default]
    Normal,
    Slow,
}

impl Speed {
    pub const ALL: [Speed; 4] = [Speed::Paused, Speed::Fast, Speed::Normal, Speed::Slow];

    /// Label shown in the speed selector and written to disk.
    pub fn label(self) -> &'static str {
        match self {
            Speed::Paused => "Paused",
            Speed::Fast => "Fast",
            Speed::Normal => "Normal",
            Speed::Slow => "Slow",
        }
    }

    /// Parses a label case-insensitively. `"Pause"` is the older spelling.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "paused" | "pause" => Some(Speed::Paused),
            "fast" => Some(Speed::Fast),
            "normal" => Some(Speed::Normal),
            "slow" => Some(Speed::Slow),
            _ => None,
        }
    }

    /// Interval between automatic refreshes in scheduler time units.
    /// `None` means no automatic firing.
    pub fn interval_units(self) -> Option<u32> {
        match self {
            Speed::Paused => None,
            Speed::Fast => Some(60),
            Speed::Normal => Some(5 * 60),
            Speed::Slow => Some(10 * 60),
        }
    }
}

/// User settings that survive restarts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub source: String,
    pub speed: Speed,
    pub noun_count: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            source: String::new(),
            speed: Speed::default(),
            noun_count: DEFAULT_NOUN_COUNT,
        }
    }
}

/// On-disk shape before validation. Unknown keys are ignored.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSettings {
    source: Option<Value>,
    speed: Option<Value>,
    noun_count: Option<Value>,
    nouns: Option<Value>,
}

impl Settings {
    /// Parses settings JSON. Only a document that is not a JSON object fails;
    /// individual missing or malformed keys take their defaults.
    pub fn from_json(text: &str) -> Result<Self> {
        let raw: RawSettings = serde_json::from_str(text)?;
        let defaults = Settings::default();

        let source = match raw.source {
            Some(Value::String(s)) => s,
            Some(other) => {
                debug!("Ignoring non-string source: {}", other);
                defaults.source
            }
            None => defaults.source,
        };

        let speed = match raw.speed {
            Some(Value::String(ref s)) => Speed::from_label(s).unwrap_or_else(|| {
                debug!("Unknown speed {:?}, using {}", s, defaults.speed.label());
                defaults.speed
            }),
            Some(_) | None => defaults.speed,
        };

        let noun_count = raw
            .noun_count
            .or(raw.nouns)
            .and_then(|v| parse_noun_count(&v))
            .unwrap_or(defaults.noun_count);

        Ok(Self {
            source,
            speed,
            noun_count,
        })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Accepts a positive integer given as a JSON number or a numeric string.
/// Values above [`MAX_NOUN_COUNT`] are capped.
fn parse_noun_count(value: &Value) -> Option<u32> {
    let count = match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    }?;
    (count >= 1).then(|| count.min(u64::from(MAX_NOUN_COUNT)) as u32)
}

/// Loads and saves [`Settings`] at a fixed location.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Reads the settings file. Never fails: a missing, unreadable or
    /// unparsable file yields defaults.
    pub fn load(&self) -> Settings {
        if !self.path.exists() {
            info!(
                "No settings file at {}, using defaults",
                self.path.display()
            );
            return Settings::default();
        }

        match self.try_load() {
            Ok(settings) => {
                debug!("Loaded settings from {}: {:?}", self.path.display(), settings);
                settings
            }
            Err(e) => {
                warn!("Failed to load settings, using defaults: {}", e);
                Settings::default()
            }
        }
    }

    fn try_load(&self) -> Result<Settings> {
        let text = fs::read_to_string(&self.path)
            .map_err(|e| AppError::Settings(format!("{}: {}", self.path.display(), e)))?;
        Settings::from_json(&text)
    }

    /// Writes all fields. Failures are logged; the caller's copy stays valid.
    pub fn save(&self, settings: &Settings) {
        if let Err(e) = self.try_save(settings) {
            warn!("Failed to save settings: {}", e);
        }
    }

    fn try_save(&self, settings: &Settings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .map_err(|e| AppError::Settings(format!("{}: {}", parent.display(), e)))?;
            }
        }

        let json = settings.to_json()?;
        fs::write(&self.path, json)
            .map_err(|e| AppError::Settings(format!("{}: {}", self.path.display(), e)))?;
        debug!("Saved settings to {}", self.path.display());
        Ok(())
    }
}
