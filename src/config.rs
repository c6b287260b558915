//! Grading settings parsed from environment variables.
//!
//! A `GradingConfig` is one layer of optional overrides. Layers are stacked
//! with [`GradingConfig::or`] (command-line flags over environment) and the
//! result is resolved against a question, whose own method, penalty and hint
//! count fill whatever no layer set.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use tracing::info;

use crate::error::ConfigurationError;
use crate::question::{GradeMethod, Question};

pub const ENV_GRADE_METHOD: &str = "DRAWLINES_GRADE_METHOD";
pub const ENV_PENALTY: &str = "DRAWLINES_PENALTY";
pub const ENV_TOTAL_TRIES: &str = "DRAWLINES_TOTAL_TRIES";

/// Optional grading overrides. `None` leaves the setting to the next layer.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GradingConfig {
    pub grade_method: Option<GradeMethod>,
    pub penalty: Option<f64>,
    pub total_tries: Option<usize>,
}

/// Settings for one grading run, after every layer is applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradingSettings {
    pub grade_method: GradeMethod,
    pub penalty: f64,
    pub total_tries: usize,
}

impl GradingConfig {
    /// Build grading overrides from environment variables.
    ///
    /// Optional:
    /// - `DRAWLINES_GRADE_METHOD`: `partial` or `allnone`
    /// - `DRAWLINES_PENALTY`: per-try penalty in `[0, 1]`
    /// - `DRAWLINES_TOTAL_TRIES`: at least 1
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] if a variable is set to an unusable value.
    pub fn from_env() -> Result<Self, ConfigurationError> {
        let config = Self::from_lookup(env_value)?;
        info!(
            grade_method = ?config.grade_method,
            penalty = ?config.penalty,
            total_tries = ?config.total_tries,
            "grading config loaded"
        );
        Ok(config)
    }

    /// Build grading overrides from any key lookup. Blank values count as unset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] if a value is set but unusable.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigurationError> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let grade_method = match get(ENV_GRADE_METHOD) {
            Some(raw) => Some(raw.parse()?),
            None => None,
        };
        let penalty = match get(ENV_PENALTY) {
            Some(raw) => Some(parse_penalty(ENV_PENALTY, raw)?),
            None => None,
        };
        let total_tries = match get(ENV_TOTAL_TRIES) {
            Some(raw) => match raw.parse::<usize>() {
                Ok(n) if n >= 1 => Some(n),
                _ => return Err(invalid(ENV_TOTAL_TRIES, raw)),
            },
            None => None,
        };

        Ok(Self { grade_method, penalty, total_tries })
    }

    /// This layer, with unset fields taken from `fallback`.
    #[must_use]
    pub fn or(self, fallback: Self) -> Self {
        Self {
            grade_method: self.grade_method.or(fallback.grade_method),
            penalty: self.penalty.or(fallback.penalty),
            total_tries: self.total_tries.or(fallback.total_tries),
        }
    }

    /// Fill the remaining gaps from `question`: its method, its penalty, and
    /// one try per hint plus one.
    #[must_use]
    pub fn resolve(self, question: &Question) -> GradingSettings {
        GradingSettings {
            grade_method: self.grade_method.unwrap_or(question.grade_method),
            penalty: self.penalty.unwrap_or(question.penalty),
            total_tries: self.total_tries.unwrap_or_else(|| question.total_tries()),
        }
    }
}

fn parse_penalty(key: &str, raw: String) -> Result<f64, ConfigurationError> {
    match raw.parse::<f64>() {
        Ok(p) if (0.0..=1.0).contains(&p) => Ok(p),
        _ => Err(invalid(key, raw)),
    }
}

fn invalid(key: &str, value: String) -> ConfigurationError {
    ConfigurationError::InvalidSetting { key: key.to_string(), value }
}

fn env_value(key: &str) -> Option<String> {
    match std::env::var(key) {
        Ok(value) => Some(value),
        Err(std::env::VarError::NotPresent) => None,
        Err(std::env::VarError::NotUnicode(raw)) => Some(raw.to_string_lossy().into_owned()),
    }
}
