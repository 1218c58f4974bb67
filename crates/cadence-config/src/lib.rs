//! Cadence configuration system
//!
//! This crate provides centralized configuration for the Cadence choreography
//! engine, loading settings from `cadence.toml` with environment variable
//! overrides. Every default matches the behavior pages were authored against,
//! so an empty file (or no file at all) yields the reference timings.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Default configuration file name, looked up in the current directory.
pub const DEFAULT_CONFIG_FILE: &str = "cadence.toml";

/// Errors raised while loading or validating configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for this schema.
    #[error("failed to parse config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A value is outside its permitted range.
    #[error("invalid value for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Main configuration structure for Cadence
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct CadenceConfig {
    /// Page classification settings
    pub page: PageConfig,
    /// Stage delays, tween duration and smoothing constants
    pub timing: TimingConfig,
    /// Visibility watcher parameters
    pub observers: ObserverConfig,
    /// Selectors used to discover managed elements in markup
    pub selectors: SelectorConfig,
    /// Class names written to the page
    pub classes: ClassConfig,
}

/// How the page type is decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PageKindSetting {
    /// Detect from the body class named by `classes.secondary_page`.
    #[default]
    Auto,
    /// Landing page: long loader delay, counters enabled.
    Landing,
    /// Secondary (detail) page: short loader delay, no counters.
    Secondary,
}

impl PageKindSetting {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "auto" => Some(Self::Auto),
            "landing" => Some(Self::Landing),
            "secondary" | "project" => Some(Self::Secondary),
            _ => None,
        }
    }
}

/// Page classification configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PageConfig {
    /// Static page type flag (`auto`, `landing`, `secondary`)
    pub kind: PageKindSetting,
}

/// Timing configuration, all durations in milliseconds
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TimingConfig {
    /// Delay between the load signal and lifting the loader on the landing page
    pub loader_delay_landing_ms: u64,
    /// Delay between the load signal and lifting the loader on secondary pages
    pub loader_delay_secondary_ms: u64,
    /// Buffer between lifting the loader and revealing hero content
    pub hero_stage_delay_ms: u64,
    /// Duration of the counter tween
    pub counter_duration_ms: u64,
    /// Exponential smoothing factor of the trailing cursor, in (0, 1)
    pub follower_smoothing: f64,
    /// Peak-to-peak parallax travel in pixels
    pub parallax_scale_px: f64,
    /// Scroll offset above which the navigation bar is styled as scrolled
    pub nav_scrolled_threshold_px: f64,
}

/// Visibility watcher configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ObserverConfig {
    /// Fraction of an element that must be visible to trigger a reveal
    pub reveal_threshold: f64,
    /// Pixels removed from the bottom of the viewport for the reveal watcher
    pub reveal_bottom_inset_px: f64,
    /// Fraction of a counter that must be visible to start its tween
    pub counter_threshold: f64,
}

/// Selector configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SelectorConfig {
    /// Elements that take part in reveal choreography
    pub animatable: String,
    /// Hero container on the landing page
    pub landing_hero: String,
    /// Hero container on secondary pages
    pub secondary_hero: String,
    /// Numeric counters
    pub counter: String,
    /// Inner image elements that receive the parallax offset
    pub parallax_inner: String,
    /// Elements that toggle the cursor hover state
    pub hover_targets: Vec<String>,
    /// Loading overlay
    pub loader: String,
    /// Raw pointer indicator
    pub cursor: String,
    /// Smoothed pointer indicator
    pub follower: String,
    /// Navigation bar
    pub nav: String,
    /// Attribute carrying the reveal delay
    pub delay_attribute: String,
    /// Attribute carrying the counter target
    pub count_attribute: String,
}

/// Class name configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClassConfig {
    /// Added to an element when it is revealed
    pub revealed: String,
    /// Added to the loader when the load gate lifts
    pub loader_done: String,
    /// Added to the navigation bar past the scroll threshold
    pub nav_scrolled: String,
    /// Added to the body while the pointer is over an interactive element
    pub cursor_hover: String,
    /// Body class that marks a secondary page when `page.kind = "auto"`
    pub secondary_page: String,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            kind: PageKindSetting::Auto,
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            loader_delay_landing_ms: 2400,
            loader_delay_secondary_ms: 600,
            hero_stage_delay_ms: 400,
            counter_duration_ms: 2000,
            follower_smoothing: 0.12,
            parallax_scale_px: 20.0,
            nav_scrolled_threshold_px: 50.0,
        }
    }
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self {
            reveal_threshold: 0.1,
            reveal_bottom_inset_px: 30.0,
            counter_threshold: 0.5,
        }
    }
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            animatable: "[data-animate]".to_string(),
            landing_hero: ".hero".to_string(),
            secondary_hero: ".project-hero".to_string(),
            counter: ".stat-number[data-count]".to_string(),
            parallax_inner: ".project-image-inner".to_string(),
            hover_targets: [
                "a",
                "button",
                ".project",
                "input",
                "textarea",
                "select",
                ".service-card",
                ".showcase-tile",
                ".showcase-deliverable",
                ".project-next-link",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            loader: "#loader".to_string(),
            cursor: "#cursor".to_string(),
            follower: "#cursor-follower".to_string(),
            nav: "#nav".to_string(),
            delay_attribute: "data-delay".to_string(),
            count_attribute: "data-count".to_string(),
        }
    }
}

impl Default for ClassConfig {
    fn default() -> Self {
        Self {
            revealed: "animated".to_string(),
            loader_done: "done".to_string(),
            nav_scrolled: "scrolled".to_string(),
            cursor_hover: "cursor-hover".to_string(),
            secondary_page: "is-project-page".to_string(),
        }
    }
}

impl CadenceConfig {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the cadence.toml configuration file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load configuration from the default location (cadence.toml in the current directory)
    /// or return default configuration if the file doesn't exist or can't be parsed
    pub fn load_or_default() -> Self {
        match Self::load_from_file(DEFAULT_CONFIG_FILE) {
            Ok(config) => config,
            Err(ConfigError::Read { .. }) => Self::default(),
            Err(err) => {
                warn!(error = %err, "ignoring unreadable configuration, using defaults");
                Self::default()
            }
        }
    }

    /// Merge configuration with environment variables
    ///
    /// Environment variables take precedence over configuration file values.
    /// Unparseable values are ignored with a warning.
    pub fn merge_with_env(&mut self) {
        if let Ok(val) = std::env::var("CADENCE_PAGE_KIND") {
            match PageKindSetting::parse(&val) {
                Some(kind) => self.page.kind = kind,
                None => warn!(value = %val, "CADENCE_PAGE_KIND: unknown page kind"),
            }
        }

        env_number("CADENCE_LOADER_DELAY_LANDING_MS", &mut self.timing.loader_delay_landing_ms);
        env_number(
            "CADENCE_LOADER_DELAY_SECONDARY_MS",
            &mut self.timing.loader_delay_secondary_ms,
        );
        env_number("CADENCE_HERO_STAGE_DELAY_MS", &mut self.timing.hero_stage_delay_ms);
        env_number("CADENCE_COUNTER_DURATION_MS", &mut self.timing.counter_duration_ms);
        env_number("CADENCE_FOLLOWER_SMOOTHING", &mut self.timing.follower_smoothing);
        env_number("CADENCE_PARALLAX_SCALE_PX", &mut self.timing.parallax_scale_px);
    }

    /// Load configuration with environment variable overrides
    ///
    /// 1. Load from cadence.toml (or use defaults if not found)
    /// 2. Override with environment variables if present
    pub fn load() -> Self {
        let mut config = Self::load_or_default();
        config.merge_with_env();
        config
    }

    /// Check value ranges that the engine relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let smoothing = self.timing.follower_smoothing;
        if !(smoothing > 0.0 && smoothing < 1.0) {
            return Err(ConfigError::Invalid {
                key: "timing.follower_smoothing",
                reason: format!("{smoothing} is not in the open interval (0, 1)"),
            });
        }
        if self.timing.counter_duration_ms == 0 {
            return Err(ConfigError::Invalid {
                key: "timing.counter_duration_ms",
                reason: "must be greater than zero".to_string(),
            });
        }
        for (key, value) in [
            ("observers.reveal_threshold", self.observers.reveal_threshold),
            ("observers.counter_threshold", self.observers.counter_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Invalid {
                    key,
                    reason: format!("{value} is not a fraction in [0, 1]"),
                });
            }
        }
        if self.observers.reveal_bottom_inset_px < 0.0 {
            return Err(ConfigError::Invalid {
                key: "observers.reveal_bottom_inset_px",
                reason: "must not be negative".to_string(),
            });
        }
        Ok(())
    }
}

fn env_number<T: std::str::FromStr>(name: &str, slot: &mut T) {
    if let Ok(val) = std::env::var(name) {
        match val.trim().parse::<T>() {
            Ok(parsed) => *slot = parsed,
            Err(_) => warn!(variable = name, value = %val, "ignoring unparseable override"),
        }
    }
}
