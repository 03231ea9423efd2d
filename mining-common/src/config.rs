use std::fs;
use std::io::Error;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Tunable knobs for a detection run. Backed by an optional `settings.json`
/// file sitting next to the executable, the same convention the original
/// tool used for its `Configs` structure; CLI flags (see `mining-cli`)
/// override whatever this file supplies.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Config {
    pub verbose_mode: bool,
    /// First band's calendar year. Band `b` (0-based) is year `startyear + b`.
    pub startyear: i32,
    /// Number of worker threads; `0` means "let rayon pick" (all cores).
    pub worker_count: usize,
    /// Pixels per dispatched chunk in the parallel executor.
    pub chunk_size: usize,
    /// Amplitude factor 1 used by the template generator.
    pub p1: f64,
    /// Amplitude factor 2 used by the template generator.
    pub p2: f64,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            verbose_mode: true,
            startyear: 1990,
            worker_count: 0,
            chunk_size: 2000,
            p1: 0.8,
            p2: 0.6,
        }
    }
}

impl Config {
    pub fn new() -> Config {
        Config::default()
    }
}

/// Loads a `settings.json` from `dir` if present, falling back to defaults.
pub fn get_configs(dir: &Path) -> std::result::Result<Config, Error> {
    let config_file = dir.join("settings.json");
    let configs: Config = match fs::read_to_string(&config_file) {
        Ok(contents) => serde_json::from_str(&contents)
            .map_err(|e| Error::new(std::io::ErrorKind::InvalidData, e))?,
        Err(_) => Config::new(),
    };
    Ok(configs)
}

pub fn save_configs(configs: &Config, dir: &Path) -> std::result::Result<(), Error> {
    let configs_json = serde_json::to_string_pretty(configs)
        .map_err(|e| Error::new(std::io::ErrorKind::InvalidData, e))?;
    fs::write(dir.join("settings.json"), configs_json)
}
