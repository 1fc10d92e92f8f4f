use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::interpolate::CurveKind;
use crate::{Error, Result};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub curve: CurveConfig,
    #[serde(default)]
    pub sliders: SlidersConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level, overridden by RUST_LOG
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Log file path
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,
    /// Random seed for control point heights (unset = seeded from entropy)
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_file: default_log_file(),
            seed: None,
        }
    }
}

/// How control points behave
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CurveMode {
    /// Endless curve scrolling across the screen
    #[default]
    Scrolling,
    /// A handful of draggable points
    Fixed,
}

impl CurveMode {
    pub fn label(self) -> &'static str {
        match self {
            CurveMode::Scrolling => "scrolling",
            CurveMode::Fixed => "fixed",
        }
    }
}

impl fmt::Display for CurveMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for CurveMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "scrolling" | "scroll" => Ok(CurveMode::Scrolling),
            "fixed" => Ok(CurveMode::Fixed),
            _ => Err(Error::UnknownVariant {
                kind: "curve mode",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurveConfig {
    #[serde(default)]
    pub mode: CurveMode,
    /// Initial curve kind (unset = linear when scrolling, hermite when fixed)
    #[serde(default)]
    pub kind: Option<CurveKind>,
    /// Sections visible between the viewport edges
    #[serde(default = "default_display_sections")]
    pub display_sections: u32,
    /// Off-screen sections kept on each side
    #[serde(default = "default_margin_sections")]
    pub margin_sections: u32,
    /// Line segments per section for the smooth kinds
    #[serde(default = "default_subdivisions")]
    pub subdivisions: u32,
    /// Seconds for the curve to cross the display
    #[serde(default = "default_scroll_period")]
    pub scroll_period_secs: f64,
    /// 1 scrolls left, -1 right, 0 pauses
    #[serde(default = "default_scroll_direction")]
    pub scroll_direction: f64,
    /// Scroll ticks per second (0 = stopped)
    #[serde(default = "default_tick_rate")]
    pub tick_rate: f64,
    /// Height of the band control points move in (scrolling mode)
    #[serde(default = "default_height")]
    pub height: f64,
    /// Distance from the bottom edge to the band (scrolling mode)
    #[serde(default = "default_y_margin")]
    pub y_margin: f64,
    /// Distance from each side edge to the viewport (scrolling mode)
    #[serde(default = "default_x_margin")]
    pub x_margin: f64,
    /// Number of draggable points (fixed mode)
    #[serde(default = "default_fixed_points")]
    pub fixed_points: usize,
    /// Distance from top and bottom kept free of points (fixed mode)
    #[serde(default = "default_fixed_border")]
    pub fixed_border: f64,
    #[serde(default)]
    pub tension: f64,
    #[serde(default)]
    pub bias: f64,
}

impl Default for CurveConfig {
    fn default() -> Self {
        Self {
            mode: CurveMode::default(),
            kind: None,
            display_sections: default_display_sections(),
            margin_sections: default_margin_sections(),
            subdivisions: default_subdivisions(),
            scroll_period_secs: default_scroll_period(),
            scroll_direction: default_scroll_direction(),
            tick_rate: default_tick_rate(),
            height: default_height(),
            y_margin: default_y_margin(),
            x_margin: default_x_margin(),
            fixed_points: default_fixed_points(),
            fixed_border: default_fixed_border(),
            tension: 0.0,
            bias: 0.0,
        }
    }
}

impl CurveConfig {
    /// Curve kind to start with
    pub fn initial_kind(&self) -> CurveKind {
        self.kind.unwrap_or(match self.mode {
            CurveMode::Scrolling => CurveKind::Linear,
            CurveMode::Fixed => CurveKind::Hermite,
        })
    }

    /// Sections held in the scrolling buffer, margins included
    pub fn sections(&self) -> usize {
        (self.margin_sections * 2 + self.display_sections) as usize
    }

    /// Control points held in the scrolling buffer
    pub fn curve_points(&self) -> usize {
        self.sections() + 1
    }
}

/// Range and step of one slider
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SliderRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl SliderRange {
    pub const fn new(min: f64, max: f64, step: f64) -> Self {
        Self { min, max, step }
    }

    fn validate(&self, name: &str) -> Result<()> {
        if !(self.min.is_finite() && self.max.is_finite()) || self.max <= self.min {
            return Err(Error::InvalidConfiguration(format!(
                "slider '{}' needs min < max, got {}..{}",
                name, self.min, self.max
            )));
        }
        if !(self.step > 0.0) {
            return Err(Error::InvalidConfiguration(format!(
                "slider '{}' needs a positive step, got {}",
                name, self.step
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlidersConfig {
    #[serde(default = "default_shape_range")]
    pub tension: SliderRange,
    #[serde(default = "default_shape_range")]
    pub bias: SliderRange,
    /// Scroll period in seconds
    #[serde(default = "default_speed_range")]
    pub speed: SliderRange,
    #[serde(default = "default_direction_range")]
    pub direction: SliderRange,
    /// Scroll ticks per second
    #[serde(default = "default_updates_range")]
    pub updates: SliderRange,
}

impl Default for SlidersConfig {
    fn default() -> Self {
        Self {
            tension: default_shape_range(),
            bias: default_shape_range(),
            speed: default_speed_range(),
            direction: default_direction_range(),
            updates: default_updates_range(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Logical units per terminal column
    #[serde(default = "default_cell_width")]
    pub cell_width: f64,
    /// Logical units per terminal row
    #[serde(default = "default_cell_height")]
    pub cell_height: f64,
    /// Redraw interval in milliseconds
    #[serde(default = "default_frame_rate")]
    pub frame_rate_ms: u64,
    /// Show the parameter status bar
    #[serde(default = "default_true")]
    pub show_status_bar: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            cell_width: default_cell_width(),
            cell_height: default_cell_height(),
            frame_rate_ms: default_frame_rate(),
            show_status_bar: default_true(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("curveplay")
        .join("curveplay.log")
}

fn default_display_sections() -> u32 {
    6
}

fn default_margin_sections() -> u32 {
    2
}

fn default_subdivisions() -> u32 {
    20
}

fn default_scroll_period() -> f64 {
    3.0
}

fn default_scroll_direction() -> f64 {
    1.0
}

fn default_tick_rate() -> f64 {
    30.0
}

fn default_height() -> f64 {
    40.0
}

fn default_y_margin() -> f64 {
    80.0
}

fn default_x_margin() -> f64 {
    60.0
}

fn default_fixed_points() -> usize {
    6
}

fn default_fixed_border() -> f64 {
    60.0
}

fn default_shape_range() -> SliderRange {
    SliderRange::new(-1.0, 1.0, 0.1)
}

fn default_speed_range() -> SliderRange {
    SliderRange::new(1.0, 5.0, 0.25)
}

fn default_direction_range() -> SliderRange {
    SliderRange::new(-1.0, 1.0, 1.0)
}

fn default_updates_range() -> SliderRange {
    SliderRange::new(0.0, 60.0, 5.0)
}

fn default_cell_width() -> f64 {
    8.0
}

fn default_cell_height() -> f64 {
    16.0
}

fn default_frame_rate() -> u64 {
    33
}

fn default_true() -> bool {
    true
}

/// Expand tilde (~) in path to user's home directory
fn expand_tilde(path: &Path) -> PathBuf {
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

fn invalid(message: impl Into<String>) -> Error {
    Error::InvalidConfiguration(message.into())
}

impl AppConfig {
    /// Load configuration from `path`, or defaults if it does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::from_toml(&content)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    /// Get the configuration file path
    /// Always uses ~/.config/curveplay/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("curveplay")
            .join("config.toml")
    }

    /// Get the log file path (with tilde expansion)
    pub fn log_file(&self) -> PathBuf {
        expand_tilde(&self.general.log_file)
    }

    /// Reject settings the engine cannot run with
    pub fn validate(&self) -> Result<()> {
        let curve = &self.curve;
        if curve.display_sections == 0 {
            return Err(invalid("curve.display_sections must be positive"));
        }
        if curve.margin_sections < 2 {
            return Err(invalid(
                "curve.margin_sections must be at least 2 to cover the scrolled viewport",
            ));
        }
        if curve.subdivisions == 0 {
            return Err(invalid("curve.subdivisions must be positive"));
        }
        if !(curve.scroll_period_secs > 0.0) {
            return Err(invalid("curve.scroll_period_secs must be positive"));
        }
        if !(curve.tick_rate >= 0.0) {
            return Err(invalid("curve.tick_rate must not be negative"));
        }
        if !(curve.height > 0.0) || !(curve.y_margin >= 0.0) || !(curve.x_margin >= 0.0) {
            return Err(invalid("curve band needs a positive height and non-negative margins"));
        }
        if curve.fixed_points == 0 {
            return Err(invalid("curve.fixed_points must be positive"));
        }
        if !(curve.fixed_border >= 0.0) {
            return Err(invalid("curve.fixed_border must not be negative"));
        }

        let sliders = &self.sliders;
        sliders.tension.validate("tension")?;
        sliders.bias.validate("bias")?;
        sliders.speed.validate("speed")?;
        sliders.direction.validate("direction")?;
        sliders.updates.validate("updates")?;

        if !(self.ui.cell_width > 0.0 && self.ui.cell_height > 0.0) {
            return Err(invalid("ui cell size must be positive"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.curve.mode, CurveMode::Scrolling);
        assert_eq!(config.curve.curve_points(), 11);
        assert_eq!(config.curve.initial_kind(), CurveKind::Linear);
        assert_eq!(config.sliders.speed, SliderRange::new(1.0, 5.0, 0.25));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config = AppConfig::from_toml(
            r#"
            [curve]
            mode = "fixed"
            subdivisions = 8

            [sliders.updates]
            min = 0.0
            max = 120.0
            step = 10.0
            "#,
        )
        .unwrap();
        assert_eq!(config.curve.mode, CurveMode::Fixed);
        assert_eq!(config.curve.subdivisions, 8);
        assert_eq!(config.curve.display_sections, 6);
        assert_eq!(config.curve.initial_kind(), CurveKind::Hermite);
        assert_eq!(config.sliders.updates.max, 120.0);
        assert_eq!(config.sliders.tension, SliderRange::new(-1.0, 1.0, 0.1));
        assert_eq!(config.general.log_level, "info");
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = AppConfig::default();
        config.curve.kind = Some(CurveKind::SmoothStep);
        config.general.seed = Some(42);
        let text = config.to_toml().unwrap();
        let back = AppConfig::from_toml(&text).unwrap();
        assert_eq!(back.curve.kind, Some(CurveKind::SmoothStep));
        assert_eq!(back.general.seed, Some(42));
        assert!(text.contains("smooth-step"));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut config = AppConfig::default();
        config.curve.subdivisions = 0;
        assert!(matches!(config.validate(), Err(Error::InvalidConfiguration(_))));

        let mut config = AppConfig::default();
        config.sliders.bias = SliderRange::new(1.0, -1.0, 0.1);
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.sliders.speed.step = 0.0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.curve.margin_sections = 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        assert!(matches!(
            AppConfig::from_toml("[curve]\nmode = 3"),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("fixed".parse::<CurveMode>().unwrap(), CurveMode::Fixed);
        assert_eq!("Scrolling".parse::<CurveMode>().unwrap(), CurveMode::Scrolling);
        assert!("sideways".parse::<CurveMode>().is_err());
    }
}
