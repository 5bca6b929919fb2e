use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    #[serde(default = "AudioConfig::default_latency_ms")]
    pub latency_ms: f32,
    #[serde(default = "AudioConfig::default_sample_rate")]
    pub sample_rate: u32,
}

impl AudioConfig {
    fn default_latency_ms() -> f32 {
        50.0
    }
    fn default_sample_rate() -> u32 {
        48_000
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            latency_ms: Self::default_latency_ms(),
            sample_rate: Self::default_sample_rate(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlConfig {
    #[serde(default = "ControlConfig::default_frame_hz")]
    pub frame_hz: f32,
    #[serde(default = "ControlConfig::default_output_volume")]
    pub output_volume: f32,
}

impl ControlConfig {
    fn default_frame_hz() -> f32 {
        60.0
    }
    fn default_output_volume() -> f32 {
        0.8
    }
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            frame_hz: Self::default_frame_hz(),
            output_volume: Self::default_output_volume(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SandboxConfig {
    #[serde(default = "SandboxConfig::default_width")]
    pub width: f32,
    #[serde(default = "SandboxConfig::default_height")]
    pub height: f32,
    /// Downward acceleration in sandbox units per second squared.
    #[serde(default = "SandboxConfig::default_gravity")]
    pub gravity: f32,
    #[serde(default = "SandboxConfig::default_restitution")]
    pub default_restitution: f32,
    /// Horizontal travel of the vibrato anchor, from zero offset to full.
    #[serde(default = "SandboxConfig::default_anchor_range")]
    pub anchor_range: f32,
}

impl SandboxConfig {
    fn default_width() -> f32 {
        512.0
    }
    fn default_height() -> f32 {
        768.0
    }
    fn default_gravity() -> f32 {
        600.0
    }
    fn default_restitution() -> f32 {
        0.55
    }
    fn default_anchor_range() -> f32 {
        80.0
    }
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            width: Self::default_width(),
            height: Self::default_height(),
            gravity: Self::default_gravity(),
            default_restitution: Self::default_restitution(),
            anchor_range: Self::default_anchor_range(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MappingConfig {
    /// Brightness body height scales to this many Hz of modulator swing.
    #[serde(default = "MappingConfig::default_brightness_scale_hz")]
    pub brightness_scale_hz: f32,
    #[serde(default = "MappingConfig::default_attack_ms")]
    pub attack_ms: f32,
    #[serde(default = "MappingConfig::default_sustain_level")]
    pub sustain_level: f32,
    #[serde(default = "MappingConfig::default_release_ms")]
    pub release_ms: f32,
    /// Vibrato depth curve: depth = base^offset, offset in [0,1].
    #[serde(default = "MappingConfig::default_depth_base")]
    pub depth_base: f32,
    #[serde(default = "MappingConfig::default_carrier_max_hz")]
    pub carrier_max_hz: f32,
}

impl MappingConfig {
    fn default_brightness_scale_hz() -> f32 {
        2000.0
    }
    fn default_attack_ms() -> f32 {
        50.0
    }
    fn default_sustain_level() -> f32 {
        0.2
    }
    fn default_release_ms() -> f32 {
        500.0
    }
    fn default_depth_base() -> f32 {
        128.0
    }
    fn default_carrier_max_hz() -> f32 {
        20_000.0
    }
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self {
            brightness_scale_hz: Self::default_brightness_scale_hz(),
            attack_ms: Self::default_attack_ms(),
            sustain_level: Self::default_sustain_level(),
            release_ms: Self::default_release_ms(),
            depth_base: Self::default_depth_base(),
            carrier_max_hz: Self::default_carrier_max_hz(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub audio: AudioConfig,
    #[serde(default)]
    pub control: ControlConfig,
    #[serde(default)]
    pub sandbox: SandboxConfig,
    #[serde(default)]
    pub mapping: MappingConfig,
}

impl AppConfig {
    pub fn load_or_default(path: &str) -> Self {
        let path_obj = Path::new(path);
        if path_obj.exists() {
            match fs::read_to_string(path_obj) {
                Ok(contents) => match toml::from_str(&contents) {
                    Ok(cfg) => return cfg,
                    Err(err) => {
                        tracing::warn!("failed to parse config {path}: {err}; using defaults");
                    }
                },
                Err(err) => {
                    tracing::warn!("failed to read config {path}: {err}; using defaults");
                }
            }
            return Self::default();
        }

        // File does not exist: write defaults and return them.
        let default_cfg = Self::default();
        match toml::to_string_pretty(&default_cfg) {
            Ok(text) => {
                if let Err(err) = fs::write(path_obj, text) {
                    tracing::warn!("failed to write default config to {path}: {err}");
                }
            }
            Err(err) => {
                tracing::warn!("failed to serialize default config: {err}");
            }
        }
        default_cfg
    }
}
