//! Configuration management for bplog.
//!
//! Configuration is loaded with figment from defaults, an optional TOML file
//! and `BPLOG_` environment variables.

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Deserializer, Serialize};

use crate::chart::{ChartOptions, DEFAULT_HEIGHT, DEFAULT_PADDING, DEFAULT_WIDTH};
use crate::error::{Error, Result};
use crate::locale::Locale;
use crate::period::Period;
use crate::store::DEFAULT_KEY;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "bplog";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "readings.db";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `BPLOG_`, sections separated by
///    `__`, e.g. `BPLOG_CHART__PIXEL_RATIO`)
/// 2. TOML config file at `~/.config/bplog/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Chart configuration.
    pub chart: ChartConfig,
    /// Display configuration.
    pub display: DisplayConfig,
}

/// Where readings are kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the database file.
    /// Defaults to `~/.local/share/bplog/readings.db`
    pub database_path: Option<PathBuf>,
    /// Key the reading collection is stored under.
    pub key: String,
}

/// Chart canvas dimensions, in CSS pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Canvas width.
    pub width: f64,
    /// Canvas height.
    pub height: f64,
    /// Margin around the plot area.
    pub padding: f64,
    /// Device pixels per CSS pixel.
    pub pixel_ratio: f64,
}

/// Presentation defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Period used when none is given: `all`, `7`, `30` or `90`.
    #[serde(deserialize_with = "period_text")]
    pub default_period: String,
    /// Label language.
    pub locale: Locale,
}

/// Accept `default_period = 7` as well as `"7"`; the environment provider
/// hands bare numbers over as integers.
fn period_text<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Text {
        Str(String),
        Num(u32),
    }

    Ok(match Text::deserialize(deserializer)? {
        Text::Str(s) => s,
        Text::Num(n) => n.to_string(),
    })
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            key: DEFAULT_KEY.to_string(),
        }
    }
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            padding: DEFAULT_PADDING,
            pixel_ratio: 1.0,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            default_period: Period::All.to_string(),
            locale: Locale::default(),
        }
    }
}

impl Config {
    /// Load configuration from all sources, reading the TOML file at
    /// `config_path` or the default location.
    ///
    /// A missing file is not an error; defaults and the environment still
    /// apply.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading, parsing or validation fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let config: Config = Self::figment(config_file).extract()?;
        config.validate()?;
        Ok(config)
    }

    fn figment(config_file: PathBuf) -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(config_file))
            .merge(Env::prefixed("BPLOG_").split("__"))
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.storage.key.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "storage.key must not be empty".to_string(),
            });
        }

        let chart = &self.chart;
        let dimensions = [
            ("width", chart.width),
            ("height", chart.height),
            ("padding", chart.padding),
        ];
        for (name, value) in dimensions {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::ConfigValidation {
                    message: format!("chart.{name} must be a non-negative number, got {value}"),
                });
            }
        }

        if chart.width - 2.0 * chart.padding <= 0.0 || chart.height - 2.0 * chart.padding <= 0.0 {
            return Err(Error::ConfigValidation {
                message: format!(
                    "chart padding ({}) leaves no plot area in a {}x{} chart",
                    chart.padding, chart.width, chart.height
                ),
            });
        }

        if !chart.pixel_ratio.is_finite() || chart.pixel_ratio <= 0.0 {
            return Err(Error::ConfigValidation {
                message: format!(
                    "chart.pixel_ratio must be greater than 0, got {}",
                    chart.pixel_ratio
                ),
            });
        }

        Ok(())
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }

    /// Chart options built from the chart and display sections.
    #[must_use]
    pub fn chart_options(&self) -> ChartOptions {
        ChartOptions {
            width: self.chart.width,
            height: self.chart.height,
            padding: self.chart.padding,
            pixel_ratio: self.chart.pixel_ratio,
            locale: self.display.locale,
        }
    }

    /// The configured default period. Unrecognized values mean all time.
    #[must_use]
    pub fn default_period(&self) -> Period {
        self.display
            .default_period
            .parse()
            .unwrap_or_default()
    }
}
