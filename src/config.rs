//! Runtime configuration read from the environment.
//!
//! | Variable               | Meaning                              | Default  |
//! |------------------------|--------------------------------------|----------|
//! | `BLOCKFALL_SEED`       | RNG seed (u32)                       | random   |
//! | `BLOCKFALL_TICK_MS`    | Frame/tick interval in milliseconds  | 16       |
//! | `BLOCKFALL_RANDOMIZER` | `uniform` or `bag`                   | uniform  |
//! | `BLOCKFALL_LOG_PATH`   | Log file (logging is off when unset) | unset    |
//!
//! Unparsable values fall back to the default with a warning.

use std::env;
use std::path::PathBuf;

use log::warn;

use crate::core::Randomizer;
use crate::types::TICK_MS;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub seed: u32,
    pub tick_ms: u32,
    pub randomizer: Randomizer,
    pub log_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: rand::random(),
            tick_ms: TICK_MS,
            randomizer: Randomizer::default(),
            log_path: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup (the process environment in [`Config::from_env`]).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| {
            lookup(key)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };
        let mut config = Self::default();

        if let Some(raw) = var("BLOCKFALL_SEED") {
            match raw.parse() {
                Ok(seed) => config.seed = seed,
                Err(_) => warn!("BLOCKFALL_SEED={:?} is not a u32, using random seed", raw),
            }
        }

        if let Some(raw) = var("BLOCKFALL_TICK_MS") {
            match raw.parse::<u32>() {
                Ok(ms) if ms > 0 => config.tick_ms = ms,
                _ => warn!("BLOCKFALL_TICK_MS={:?} is invalid, using {}", raw, TICK_MS),
            }
        }

        if let Some(raw) = var("BLOCKFALL_RANDOMIZER") {
            match Randomizer::from_str(&raw) {
                Some(randomizer) => config.randomizer = randomizer,
                None => warn!("BLOCKFALL_RANDOMIZER={:?} is unknown, using uniform", raw),
            }
        }

        config.log_path = var("BLOCKFALL_LOG_PATH").map(PathBuf::from);
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);
        assert_eq!(config.tick_ms, 16);
        assert_eq!(config.randomizer, Randomizer::Uniform);
        assert_eq!(config.log_path, None);
    }

    #[test]
    fn test_all_values() {
        let config = config_from(&[
            ("BLOCKFALL_SEED", "42"),
            ("BLOCKFALL_TICK_MS", " 33 "),
            ("BLOCKFALL_RANDOMIZER", "bag"),
            ("BLOCKFALL_LOG_PATH", "/tmp/blockfall.log"),
        ]);
        assert_eq!(config.seed, 42);
        assert_eq!(config.tick_ms, 33);
        assert_eq!(config.randomizer, Randomizer::SevenBag);
        assert_eq!(config.log_path, Some(PathBuf::from("/tmp/blockfall.log")));
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = config_from(&[
            ("BLOCKFALL_TICK_MS", "0"),
            ("BLOCKFALL_RANDOMIZER", "tetris"),
            ("BLOCKFALL_LOG_PATH", "   "),
        ]);
        assert_eq!(config.tick_ms, 16);
        assert_eq!(config.randomizer, Randomizer::Uniform);
        assert_eq!(config.log_path, None);

        let config = config_from(&[("BLOCKFALL_TICK_MS", "fast")]);
        assert_eq!(config.tick_ms, 16);
    }

    #[test]
    fn test_from_env_does_not_panic() {
        let _config = Config::from_env();
    }
}
