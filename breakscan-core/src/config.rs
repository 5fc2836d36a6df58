//! Screener configuration: indicator spans/windows and breakout thresholds.
//!
//! Every number the indicator library and the breakout rule use lives here.
//! The defaults reproduce the classic GMMA + Bollinger + RSI + volume screen.
//! Configs load from TOML; all fields are optional and fall back to defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::screen::validator::MIN_HISTORY_BARS;

/// Upper bound on `data.lookback_days` (about a century of history).
pub const MAX_LOOKBACK_DAYS: u32 = 36_500;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("serialize config TOML: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Indicator spans and windows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorConfig {
    /// EMA spans averaged into the fast GMMA group.
    pub short_spans: Vec<usize>,
    /// EMA spans averaged into the slow GMMA group.
    pub long_spans: Vec<usize>,
    /// SMA window of the oscillator's trigger line.
    pub trigger_window: usize,
    pub rsi_period: usize,
    pub bollinger_window: usize,
    pub bollinger_multiplier: f64,
    pub volume_window: usize,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            short_spans: vec![3, 5, 8, 10, 12, 15],
            long_spans: vec![30, 35, 40, 45, 50, 60],
            trigger_window: 20,
            rsi_period: 14,
            bollinger_window: 20,
            bollinger_multiplier: 2.0,
            volume_window: 20,
        }
    }
}

impl IndicatorConfig {
    /// Longest lookback any indicator uses.
    pub fn longest_lookback(&self) -> usize {
        let spans = self.short_spans.iter().chain(self.long_spans.iter());
        spans
            .copied()
            .chain([
                self.trigger_window,
                self.rsi_period.saturating_add(1),
                self.bollinger_window,
                self.volume_window,
            ])
            .max()
            .unwrap_or(0)
    }
}

/// Thresholds of the four-condition breakout rule. All comparisons are strict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BreakoutRule {
    /// Latest volume must exceed this multiple of its moving average.
    pub volume_multiplier: f64,
    /// Exclusive lower RSI bound.
    pub rsi_lower: f64,
    /// Exclusive upper RSI bound.
    pub rsi_upper: f64,
}

impl Default for BreakoutRule {
    fn default() -> Self {
        Self {
            volume_multiplier: 1.5,
            rsi_lower: 60.0,
            rsi_upper: 85.0,
        }
    }
}

/// Data-fetch settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Calendar days of history requested per symbol.
    pub lookback_days: u32,
}

impl Default for DataConfig {
    fn default() -> Self {
        // ~3 months of daily bars
        Self { lookback_days: 92 }
    }
}

/// Top-level screener configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenerConfig {
    pub indicators: IndicatorConfig,
    pub rule: BreakoutRule,
    pub data: DataConfig,
}

impl ScreenerConfig {
    /// Load and validate a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let ind = &self.indicators;
        if ind.short_spans.is_empty() || ind.long_spans.is_empty() {
            return Err(ConfigError::Invalid(
                "short_spans and long_spans must be non-empty".into(),
            ));
        }
        if ind.short_spans.iter().chain(&ind.long_spans).any(|&s| s == 0) {
            return Err(ConfigError::Invalid("EMA spans must be >= 1".into()));
        }
        for (name, window) in [
            ("trigger_window", ind.trigger_window),
            ("rsi_period", ind.rsi_period),
            ("bollinger_window", ind.bollinger_window),
            ("volume_window", ind.volume_window),
        ] {
            if window == 0 {
                return Err(ConfigError::Invalid(format!("{name} must be >= 1")));
            }
        }
        if ind.bollinger_multiplier.is_nan() || ind.bollinger_multiplier <= 0.0 {
            return Err(ConfigError::Invalid(
                "bollinger_multiplier must be positive".into(),
            ));
        }
        let rule = &self.rule;
        if rule.volume_multiplier.is_nan() || rule.volume_multiplier <= 0.0 {
            return Err(ConfigError::Invalid(
                "volume_multiplier must be positive".into(),
            ));
        }
        if rule.rsi_lower.is_nan() || rule.rsi_upper.is_nan() || rule.rsi_lower >= rule.rsi_upper {
            return Err(ConfigError::Invalid(format!(
                "rsi_lower ({}) must be below rsi_upper ({})",
                rule.rsi_lower, rule.rsi_upper
            )));
        }
        if !(1..=MAX_LOOKBACK_DAYS).contains(&self.data.lookback_days) {
            return Err(ConfigError::Invalid(format!(
                "lookback_days must be between 1 and {MAX_LOOKBACK_DAYS}, got {}",
                self.data.lookback_days
            )));
        }
        Ok(())
    }

    /// Bars a series needs before the screener will evaluate it.
    ///
    /// Never below [`MIN_HISTORY_BARS`].
    pub fn required_history(&self) -> usize {
        self.indicators.longest_lookback().max(MIN_HISTORY_BARS)
    }

    /// Deterministic BLAKE3 hash of the config, identifying the rule set
    /// a result was produced with.
    pub fn config_hash(&self) -> String {
        // Plain structs of numbers and vectors always serialize.
        let json = serde_json::to_string(self).unwrap_or_default();
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }
}
