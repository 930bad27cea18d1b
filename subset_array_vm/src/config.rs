//! Dispatch configuration
//!
//! Loaded from TOML text or from the environment. Every field has a
//! default, so an empty document is a valid configuration.

use std::env;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

const WIDENING_ENV: &str = "SUBSET_ARRAY_VM_WIDENING";
const NARROW_ENV: &str = "SUBSET_ARRAY_VM_NARROW";

/// Which operand is widened first when both single-side candidates
/// have a kernel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WideningOrder {
    #[default]
    LeftFirst,
    RightFirst,
}

impl FromStr for WideningOrder {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left-first" | "left" => Ok(WideningOrder::LeftFirst),
            "right-first" | "right" => Ok(WideningOrder::RightFirst),
            other => Err(ConfigError::InvalidConfig(format!(
                "unknown widening order '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for WideningOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WideningOrder::LeftFirst => f.write_str("left-first"),
            WideningOrder::RightFirst => f.write_str("right-first"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DispatchConfig {
    pub widening: WideningOrder,
    /// When false the resolver only takes the direct path
    pub allow_widening: bool,
    /// Pass results through their type's narrow edge
    pub narrow_results: bool,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            widening: WideningOrder::LeftFirst,
            allow_widening: true,
            narrow_results: false,
        }
    }
}

impl DispatchConfig {
    pub fn from_toml_str(text: &str) -> ConfigResult<Self> {
        toml::from_str(text).map_err(|e| ConfigError::InvalidConfig(e.to_string()))
    }

    /// Defaults overridden by `SUBSET_ARRAY_VM_WIDENING` and
    /// `SUBSET_ARRAY_VM_NARROW`. Unset or blank variables keep the default.
    pub fn from_env() -> ConfigResult<Self> {
        let mut config = Self::default();
        if let Some(val) = non_blank_var(WIDENING_ENV) {
            if val.trim().eq_ignore_ascii_case("none") {
                config.allow_widening = false;
            } else {
                config.widening = val.parse()?;
            }
        }
        if let Some(val) = non_blank_var(NARROW_ENV) {
            config.narrow_results = parse_flag(NARROW_ENV, &val)?;
        }
        Ok(config)
    }

    pub fn to_toml_string(&self) -> ConfigResult<String> {
        toml::to_string(self).map_err(|e| ConfigError::InvalidConfig(e.to_string()))
    }
}

fn non_blank_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_flag(name: &str, raw: &str) -> ConfigResult<bool> {
    match raw.trim() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidConfig(format!(
            "{} must be a boolean flag, got '{}'",
            name, other
        ))),
    }
}
