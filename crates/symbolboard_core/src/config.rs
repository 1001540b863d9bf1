//! Session configuration and runtime settings.
//!
//! # Responsibility
//! - Define the serde-backed session configuration with defaults.
//! - Validate speech/display settings and apply partial setting updates.
//!
//! # Invariants
//! - Every field has a default; an empty JSON object is a valid config.
//! - Invalid settings are rejected before anything is applied.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const SPEECH_RATE_MIN: f32 = 0.1;
const SPEECH_RATE_MAX: f32 = 10.0;
const SPEECH_PITCH_MIN: f32 = 0.0;
const SPEECH_PITCH_MAX: f32 = 2.0;

/// Parameters attached to every speech request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechSettings {
    pub rate: f32,
    pub pitch: f32,
    pub voice: String,
}

impl Default for SpeechSettings {
    fn default() -> Self {
        Self {
            rate: 1.0,
            pitch: 1.0,
            voice: "en-US".to_string(),
        }
    }
}

impl SpeechSettings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(SPEECH_RATE_MIN..=SPEECH_RATE_MAX).contains(&self.rate) {
            return Err(SettingsError::SpeechRateOutOfRange(self.rate));
        }
        if !(SPEECH_PITCH_MIN..=SPEECH_PITCH_MAX).contains(&self.pitch) {
            return Err(SettingsError::SpeechPitchOutOfRange(self.pitch));
        }
        if self.voice.trim().is_empty() {
            return Err(SettingsError::EmptyVoice);
        }
        Ok(())
    }
}

/// Presentation hints carried for the UI layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    /// Symbol card edge length in pixels.
    pub card_size: u32,
    pub auto_scan: bool,
    pub scan_speed_ms: u64,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            card_size: 120,
            auto_scan: false,
            scan_speed_ms: 2000,
        }
    }
}

impl DisplaySettings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.card_size == 0 {
            return Err(SettingsError::ZeroCardSize);
        }
        if self.scan_speed_ms == 0 {
            return Err(SettingsError::ZeroScanSpeed);
        }
        Ok(())
    }
}

/// Asset layout used for image path derivation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    /// Per-volume directory holding full-size images.
    pub full_dir: String,
    /// Per-volume directory holding thumbnails.
    pub thumb_dir: String,
    /// Extension substituted for the original one, without the dot.
    pub extension: String,
    /// Volume-independent path used when an asset cannot be resolved.
    pub fallback: String,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            full_dir: "images-webp".to_string(),
            thumb_dir: "images-thumbs".to_string(),
            extension: "webp".to_string(),
            fallback: "/vite.svg".to_string(),
        }
    }
}

/// Full configuration of one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub speech: SpeechSettings,
    pub display: DisplaySettings,
    /// Maximum archived phrases kept; `0` keeps none.
    pub phrase_history_capacity: usize,
    /// Volumes `1..=volume_count` are loaded by `load_all_volumes`.
    pub volume_count: u32,
    pub assets: AssetConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            speech: SpeechSettings::default(),
            display: DisplaySettings::default(),
            phrase_history_capacity: 100,
            volume_count: 7,
            assets: AssetConfig::default(),
        }
    }
}

impl SessionConfig {
    /// Parses and validates a JSON config document.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON config file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.speech.validate()?;
        self.display.validate()?;
        if self.volume_count == 0 {
            return Err(ConfigError::Invalid {
                field: "volume_count",
                reason: "must be at least 1".to_string(),
            });
        }
        for (field, value) in [
            ("assets.full_dir", &self.assets.full_dir),
            ("assets.thumb_dir", &self.assets.thumb_dir),
            ("assets.extension", &self.assets.extension),
            ("assets.fallback", &self.assets.fallback),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "must not be blank".to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Partial settings update; `None` fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsPatch {
    pub speech_rate: Option<f32>,
    pub speech_pitch: Option<f32>,
    pub speech_voice: Option<String>,
    pub card_size: Option<u32>,
    pub auto_scan: Option<bool>,
    pub scan_speed_ms: Option<u64>,
}

impl SettingsPatch {
    /// Returns patched copies of the given settings, validated.
    pub fn apply_to(
        &self,
        speech: &SpeechSettings,
        display: &DisplaySettings,
    ) -> Result<(SpeechSettings, DisplaySettings), SettingsError> {
        let speech = SpeechSettings {
            rate: self.speech_rate.unwrap_or(speech.rate),
            pitch: self.speech_pitch.unwrap_or(speech.pitch),
            voice: self
                .speech_voice
                .clone()
                .unwrap_or_else(|| speech.voice.clone()),
        };
        let display = DisplaySettings {
            card_size: self.card_size.unwrap_or(display.card_size),
            auto_scan: self.auto_scan.unwrap_or(display.auto_scan),
            scan_speed_ms: self.scan_speed_ms.unwrap_or(display.scan_speed_ms),
        };
        speech.validate()?;
        display.validate()?;
        Ok((speech, display))
    }
}

/// Rejected speech or display setting.
#[derive(Debug, Clone, PartialEq)]
pub enum SettingsError {
    SpeechRateOutOfRange(f32),
    SpeechPitchOutOfRange(f32),
    EmptyVoice,
    ZeroCardSize,
    ZeroScanSpeed,
}

impl Display for SettingsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SpeechRateOutOfRange(rate) => write!(
                f,
                "speech rate {rate} outside {SPEECH_RATE_MIN}..={SPEECH_RATE_MAX}"
            ),
            Self::SpeechPitchOutOfRange(pitch) => write!(
                f,
                "speech pitch {pitch} outside {SPEECH_PITCH_MIN}..={SPEECH_PITCH_MAX}"
            ),
            Self::EmptyVoice => write!(f, "speech voice must not be blank"),
            Self::ZeroCardSize => write!(f, "card size must be positive"),
            Self::ZeroScanSpeed => write!(f, "scan speed must be positive"),
        }
    }
}

impl Error for SettingsError {}

/// Config loading or validation failure.
#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse(serde_json::Error),
    Settings(SettingsError),
    Invalid {
        field: &'static str,
        reason: String,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid config document: {err}"),
            Self::Settings(err) => write!(f, "{err}"),
            Self::Invalid { field, reason } => write!(f, "invalid config `{field}`: {reason}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::Settings(err) => Some(err),
            Self::Invalid { .. } => None,
        }
    }
}

impl From<SettingsError> for ConfigError {
    fn from(value: SettingsError) -> Self {
        Self::Settings(value)
    }
}
