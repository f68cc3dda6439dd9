//! Simulator settings, read from the environment.

use jaipur_core::{ConfigError, GameError, JaipurParams};
use std::path::PathBuf;
use thiserror::Error;

const DEFAULT_GAMES: u32 = 100;
const DEFAULT_SEED: u64 = 1;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("Invalid value for {var}: {value}")]
    InvalidVar { var: &'static str, value: String },

    #[error("Cannot read rules file {path}: {source}")]
    RulesFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Rules(#[from] ConfigError),

    #[error("Engine rejected a legal action: {0}")]
    Game(#[from] GameError),

    #[error("Player {0} has no legal action")]
    NoLegalAction(u8),

    #[error("Game with seed {0} did not finish")]
    Unfinished(u64),
}

/// Settings for one simulator run
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Number of games to play
    pub games: u32,
    /// Seed of the first game; game `i` uses `seed + i`
    pub seed: u64,
    pub params: JaipurParams,
}

impl SimConfig {
    /// Read `JAIPUR_GAMES`, `JAIPUR_SEED` and `JAIPUR_RULES`
    pub fn from_env() -> Result<Self, SimError> {
        let games = parse_var("JAIPUR_GAMES", DEFAULT_GAMES)?;
        let seed = parse_var("JAIPUR_SEED", DEFAULT_SEED)?;

        let params = match std::env::var_os("JAIPUR_RULES") {
            Some(path) => {
                let path = PathBuf::from(path);
                let json = std::fs::read_to_string(&path)
                    .map_err(|source| SimError::RulesFile { path, source })?;
                JaipurParams::from_json(&json)?
            }
            None => JaipurParams::default(),
        };

        Ok(Self {
            games,
            seed,
            params,
        })
    }
}

fn parse_var<T: std::str::FromStr>(var: &'static str, default: T) -> Result<T, SimError> {
    match std::env::var(var) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| SimError::InvalidVar { var, value }),
        Err(_) => Ok(default),
    }
}
