use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// The most decimal places a `Decimal` can carry.
pub const MAX_PRECISION: u32 = 28;

/// The root configuration structure for the entire application.
///
/// Every section is optional; a missing file or section falls back to the defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub data: DataSettings,
    pub report: ReportSettings,
    pub logging: LoggingSettings,
}

impl Config {
    /// Checks the values that deserialization alone cannot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.report.precision > MAX_PRECISION {
            return Err(ConfigError::ValidationError(format!(
                "report.precision must be at most {MAX_PRECISION}, got {}",
                self.report.precision
            )));
        }
        if self.data.price_column.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "data.price_column must not be empty".to_string(),
            ));
        }
        if matches!(&self.data.symbol, Some(symbol) if symbol.trim().is_empty()) {
            return Err(ConfigError::ValidationError(
                "data.symbol must not be empty when set".to_string(),
            ));
        }
        Ok(())
    }
}

/// How price rows are turned into day types.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum PriceMode {
    /// Each row is its own period: close compared against open.
    #[default]
    OpenClose,
    /// A single price column: each value compared against the previous one.
    CloseToClose,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// Where prices come from and how they are read.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DataSettings {
    pub mode: PriceMode,
    /// The column read in close-to-close mode.
    pub price_column: String,
    /// Keep only rows for this symbol when the file holds several.
    pub symbol: Option<String>,
}

/// How results are presented.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ReportSettings {
    /// Decimal places shown for ratios, rates and averages.
    pub precision: u32,
    pub format: OutputFormat,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// An `EnvFilter` directive, used when `RUST_LOG` is not set.
    pub level: String,
}

// --- Default Implementations ---
// This allows a user to omit any section from their toml
// and still have it work with sensible defaults.

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            mode: PriceMode::default(),
            price_column: "close".to_string(),
            symbol: None,
        }
    }
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            precision: 2,
            format: OutputFormat::default(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}
