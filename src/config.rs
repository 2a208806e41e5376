//! Configuration
//!
//! Read from TOML; every key is optional.
//!
//! ```toml
//! [terms]
//! constants = "abcdej"
//! functions = "fgh"
//! variables = "uvwxyz"
//!
//! [log]
//! level = "debug"
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::error::Error;
use crate::lexer::TermClasses;
use crate::Result;

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub terms: TermClasses,
    pub log: LogConfig,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Fallback level when `RUST_LOG` is unset
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Config = toml::from_str(text)?;
        config.terms.validate().map_err(Error::Config)?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn test_partial_terms_table() {
        let config = Config::from_toml_str("[terms]\nconstants = \"abcde\"\n").unwrap();
        assert_eq!(config.terms.constants, "abcde");
        assert_eq!(config.terms.variables, "uvwxyz");
    }

    #[test]
    fn test_overlapping_classes_rejected() {
        let result = Config::from_toml_str("[terms]\nconstants = \"abcx\"\n");
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_unknown_types_rejected() {
        assert!(matches!(Config::from_toml_str("log = 3"), Err(Error::Toml(_))));
    }
}
