use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::buffer::MAX_REPETITIONS;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub carousel: CarouselConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Data directory path (log files live here)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
        }
    }
}

/// Tuning for the centering and seamless-reset state machine.
///
/// Distances are in the host's layout units, the same units the host reports
/// card and viewport centers in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarouselConfig {
    /// How many times the source list is repeated into the buffer
    #[serde(default = "default_repetitions")]
    pub repetitions: usize,
    /// Distance from center at which the zoom effect bottoms out
    #[serde(default = "default_trigger_distance")]
    pub trigger_distance: f64,
    /// Scale applied to cards at or beyond the trigger distance
    #[serde(default = "default_min_scale")]
    pub min_scale: f64,
    /// Only cards closer than this to the center can become centered
    #[serde(default = "default_capture_radius")]
    pub capture_radius: f64,
    /// Frames a candidate must stay closest before it is centered
    #[serde(default = "default_dwell_frames")]
    pub dwell_frames: u32,
    /// Dwell expressed as time; overrides `dwell_frames` when set
    #[serde(default)]
    pub dwell_ms: Option<u64>,
    /// Host refresh rate used to turn `dwell_ms` into frames
    #[serde(default = "default_refresh_hz")]
    pub refresh_hz: u32,
    /// Disappearances of the first element tolerated before a reset is due
    #[serde(default = "default_disappear_threshold")]
    pub disappear_threshold: u32,
    /// Delay between the hidden jump and the surface flip
    #[serde(default = "default_swap_delay_ms")]
    pub swap_delay_ms: u64,
    /// Gesture samples required before a gesture end snaps to a neighbour
    #[serde(default = "default_slow_scroll_min_samples")]
    pub slow_scroll_min_samples: u32,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            repetitions: default_repetitions(),
            trigger_distance: default_trigger_distance(),
            min_scale: default_min_scale(),
            capture_radius: default_capture_radius(),
            dwell_frames: default_dwell_frames(),
            dwell_ms: None,
            refresh_hz: default_refresh_hz(),
            disappear_threshold: default_disappear_threshold(),
            swap_delay_ms: default_swap_delay_ms(),
            slow_scroll_min_samples: default_slow_scroll_min_samples(),
        }
    }
}

impl CarouselConfig {
    /// Effective dwell threshold in frames.
    ///
    /// The tracker counts evaluations, not wall-clock time, so a time-based
    /// dwell only holds if the host evaluates at roughly `refresh_hz`.
    pub fn dwell_threshold(&self) -> u32 {
        match self.dwell_ms {
            Some(ms) => {
                let frames = (ms as f64 * self.refresh_hz as f64 / 1000.0).round();
                (frames as u32).max(1)
            }
            None => self.dwell_frames,
        }
    }

    pub fn swap_delay(&self) -> Duration {
        Duration::from_millis(self.swap_delay_ms)
    }

    /// Reject values the state machine cannot work with
    pub fn validate(&self) -> crate::Result<()> {
        if !(2..=MAX_REPETITIONS).contains(&self.repetitions) {
            return Err(crate::Error::Config(format!(
                "carousel.repetitions must be between 2 and {}, got {}",
                MAX_REPETITIONS, self.repetitions
            )));
        }
        if !(self.trigger_distance > 0.0) {
            return Err(crate::Error::Config(
                "carousel.trigger_distance must be positive".to_string(),
            ));
        }
        if !(self.min_scale > 0.0 && self.min_scale <= 1.0) {
            return Err(crate::Error::Config(format!(
                "carousel.min_scale must be in (0, 1], got {}",
                self.min_scale
            )));
        }
        if !(self.capture_radius > 0.0) {
            return Err(crate::Error::Config(
                "carousel.capture_radius must be positive".to_string(),
            ));
        }
        if self.dwell_ms.is_some() && self.refresh_hz == 0 {
            return Err(crate::Error::Config(
                "carousel.refresh_hz must be non-zero when dwell_ms is set".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Tick rate in milliseconds
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
    /// Card width in layout units
    #[serde(default = "default_card_width")]
    pub card_width: f64,
    /// Gap between cards in layout units (negative overlaps them)
    #[serde(default = "default_card_spacing")]
    pub card_spacing: f64,
    /// Layout units drawn per terminal column
    #[serde(default = "default_units_per_column")]
    pub units_per_column: f64,
    /// Layout units moved per drag key press
    #[serde(default = "default_drag_step")]
    pub drag_step: f64,
    /// Smooth scrolling configuration
    #[serde(default)]
    pub scroll: ScrollConfig,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate(),
            card_width: default_card_width(),
            card_spacing: default_card_spacing(),
            units_per_column: default_units_per_column(),
            drag_step: default_drag_step(),
            scroll: ScrollConfig::default(),
        }
    }
}

/// Easing curve for animated scrolls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EasingType {
    None,
    Linear,
    Cubic,
    Quintic,
    #[default]
    EaseOut,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrollConfig {
    /// Animate scrolls; when false every scroll jumps
    #[serde(default = "default_true")]
    pub smooth_enabled: bool,
    /// Duration of an animated scroll
    #[serde(default = "default_animation_duration")]
    pub animation_duration_ms: u64,
    /// Easing curve
    #[serde(default)]
    pub easing: EasingType,
    /// Frame rate while an animation is running
    #[serde(default = "default_animation_fps")]
    pub animation_fps: u32,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            smooth_enabled: default_true(),
            animation_duration_ms: default_animation_duration(),
            easing: EasingType::default(),
            animation_fps: default_animation_fps(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("loopdeck")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_repetitions() -> usize {
    16
}

fn default_trigger_distance() -> f64 {
    300.0
}

fn default_min_scale() -> f64 {
    0.8
}

fn default_capture_radius() -> f64 {
    200.0
}

fn default_dwell_frames() -> u32 {
    10
}

fn default_refresh_hz() -> u32 {
    60
}

fn default_disappear_threshold() -> u32 {
    5
}

fn default_swap_delay_ms() -> u64 {
    350
}

fn default_slow_scroll_min_samples() -> u32 {
    10
}

fn default_tick_rate() -> u64 {
    100
}

fn default_card_width() -> f64 {
    380.0
}

fn default_card_spacing() -> f64 {
    -8.0
}

fn default_units_per_column() -> f64 {
    16.0
}

fn default_drag_step() -> f64 {
    48.0
}

fn default_animation_duration() -> u64 {
    250
}

fn default_animation_fps() -> u32 {
    60
}

/// Expand tilde (~) in path to user's home directory
fn expand_tilde(path: &std::path::Path) -> PathBuf {
    if let Some(path_str) = path.to_str() {
        if let Some(stripped) = path_str.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(stripped);
            }
        } else if path_str == "~" {
            if let Some(home) = dirs::home_dir() {
                return home;
            }
        }
    }
    path.to_path_buf()
}

impl AppConfig {
    /// Load configuration from file or return defaults
    pub fn load() -> crate::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from an explicit path, falling back to defaults
    /// when the file does not exist
    pub fn load_from(path: &std::path::Path) -> crate::Result<Self> {
        let config = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::from_toml(&content)?
        } else {
            Self::default()
        };
        config.carousel.validate()?;
        Ok(config)
    }

    pub fn from_toml(content: &str) -> crate::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Save configuration to file
    pub fn save(&self) -> crate::Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &std::path::Path) -> crate::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        Ok(())
    }

    /// Get the configuration file path
    /// Always uses ~/.config/loopdeck/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("loopdeck")
            .join("config.toml")
    }

    /// Get the data directory (with tilde expansion)
    pub fn data_dir(&self) -> PathBuf {
        expand_tilde(&self.general.data_dir)
    }

    /// Get the log file path used while the TUI owns the terminal
    pub fn log_path(&self) -> PathBuf {
        self.data_dir().join("loopdeck.log")
    }
}
