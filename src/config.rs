//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/xpcalc/xpcalc.toml`
//! 3. Explicit config file passed with `--config`
//! 4. Environment variables: `XPCALC_*` prefix (`__` nests, lists are comma separated)
//!
//! Every layer REPLACES what it specifies. Cost tables are replaced as a
//! whole, never merged element-wise.

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::rules::{
    DEFAULT_LEVEL_BASE_XP, DEFAULT_MAX_CHARACTER_LEVEL, DEFAULT_PERK_COSTS, DEFAULT_STAT_COSTS,
    DEFAULT_STAT_NAMES, DEFAULT_XP_CEILING, DEFAULT_XP_PER_LEVEL,
};
use crate::domain::Rules;

const ENV_PREFIX: &str = "XPCALC";

/// Upper bound for `initial_perks`.
pub const MAX_INITIAL_PERKS: u32 = 100;

/// Per-kind cost tables.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CostsConfig {
    /// Incremental stat costs by level, first entry 0
    pub stat: Vec<u32>,
    /// Incremental perk costs by level, first entry 0
    pub perk: Vec<u32>,
}

impl Default for CostsConfig {
    fn default() -> Self {
        Self {
            stat: DEFAULT_STAT_COSTS.to_vec(),
            perk: DEFAULT_PERK_COSTS.to_vec(),
        }
    }
}

/// Raw costs for intermediate parsing (`None` means "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawCostsConfig {
    pub stat: Option<Vec<u32>>,
    pub perk: Option<Vec<u32>>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub level_base_xp: Option<u32>,
    pub xp_per_level: Option<u32>,
    pub xp_ceiling: Option<u32>,
    pub max_character_level: Option<u32>,
    pub initial_perks: Option<u32>,
    pub stats: Option<Vec<String>>,
    pub costs: RawCostsConfig,
}

/// Unified configuration for xpcalc.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Points granted at level 0 when sync is on
    pub level_base_xp: u32,
    /// Points granted per character level when sync is on
    pub xp_per_level: u32,
    /// Upper bound of the XP pool
    pub xp_ceiling: u32,
    /// Upper bound of the character level input
    pub max_character_level: u32,
    /// Empty perks a new session starts with
    pub initial_perks: u32,
    /// Stat names, in display order
    pub stats: Vec<String>,
    pub costs: CostsConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            level_base_xp: DEFAULT_LEVEL_BASE_XP,
            xp_per_level: DEFAULT_XP_PER_LEVEL,
            xp_ceiling: DEFAULT_XP_CEILING,
            max_character_level: DEFAULT_MAX_CHARACTER_LEVEL,
            initial_perks: 1,
            stats: DEFAULT_STAT_NAMES.iter().map(|s| s.to_string()).collect(),
            costs: CostsConfig::default(),
        }
    }
}

/// Get the XDG config directory for xpcalc.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "xpcalc").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("xpcalc.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> ApplicationResult<RawSettings> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Overlay wins for every field it specifies.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            level_base_xp: overlay.level_base_xp.unwrap_or(self.level_base_xp),
            xp_per_level: overlay.xp_per_level.unwrap_or(self.xp_per_level),
            xp_ceiling: overlay.xp_ceiling.unwrap_or(self.xp_ceiling),
            max_character_level: overlay
                .max_character_level
                .unwrap_or(self.max_character_level),
            initial_perks: overlay.initial_perks.unwrap_or(self.initial_perks),
            stats: overlay.stats.clone().unwrap_or_else(|| self.stats.clone()),
            costs: CostsConfig {
                stat: overlay
                    .costs
                    .stat
                    .clone()
                    .unwrap_or_else(|| self.costs.stat.clone()),
                perk: overlay
                    .costs
                    .perk
                    .clone()
                    .unwrap_or_else(|| self.costs.perk.clone()),
            },
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `explicit` - Optional config file given on the command line; it must exist
    pub fn load(explicit: Option<&Path>) -> ApplicationResult<Self> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config, if present
        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 3. Explicit config file
        if let Some(path) = explicit {
            current = current.with_file(path)?;
        }

        // 4. Environment variables
        Self::apply_env_overrides(current, Self::env_source())
    }

    /// Overlay a single config file onto these settings.
    pub fn with_file(&self, path: &Path) -> ApplicationResult<Self> {
        if !path.exists() {
            return Err(ApplicationError::ConfigNotFound(path.to_path_buf()));
        }
        let raw = load_raw_settings(path)?;
        Ok(self.merge_with(&raw))
    }

    fn env_source() -> Environment {
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .list_separator(",")
            .with_list_parse_key("stats")
            .with_list_parse_key("costs.stat")
            .with_list_parse_key("costs.perk")
            .try_parsing(true)
    }

    /// Apply XPCALC_* environment variables as explicit overrides.
    pub fn apply_env_overrides(mut settings: Self, env: Environment) -> ApplicationResult<Self> {
        let config = Config::builder()
            .add_source(env)
            .build()
            .map_err(config_err)?;

        if let Some(val) = env_value(&config, "level_base_xp")? {
            settings.level_base_xp = val;
        }
        if let Some(val) = env_value(&config, "xp_per_level")? {
            settings.xp_per_level = val;
        }
        if let Some(val) = env_value(&config, "xp_ceiling")? {
            settings.xp_ceiling = val;
        }
        if let Some(val) = env_value(&config, "max_character_level")? {
            settings.max_character_level = val;
        }
        if let Some(val) = env_value(&config, "initial_perks")? {
            settings.initial_perks = val;
        }
        if let Some(val) = env_value(&config, "stats")? {
            settings.stats = val;
        }
        if let Some(val) = env_value(&config, "costs.stat")? {
            settings.costs.stat = val;
        }
        if let Some(val) = env_value(&config, "costs.perk")? {
            settings.costs.perk = val;
        }

        Ok(settings)
    }

    /// Validate into domain rules.
    pub fn rules(&self) -> ApplicationResult<Rules> {
        if self.initial_perks > MAX_INITIAL_PERKS {
            return Err(ApplicationError::Config {
                message: format!(
                    "initial_perks is {}, at most {MAX_INITIAL_PERKS} allowed",
                    self.initial_perks
                ),
            });
        }
        Ok(Rules::new(
            self.costs.stat.clone(),
            self.costs.perk.clone(),
            self.level_base_xp,
            self.xp_per_level,
            self.xp_ceiling,
            self.max_character_level,
            self.stats.clone(),
        )?)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> ApplicationResult<String> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# xpcalc configuration
#
# Locations (by precedence, lowest to highest):
#   Global:   ~/.config/xpcalc/xpcalc.toml
#   Explicit: xpcalc --config <FILE>
#   Env:      XPCALC_* environment variables, e.g.
#             XPCALC_XP_PER_LEVEL=8
#             XPCALC_COSTS__PERK=0,1,2,3,4,5,6

# Points at level 0 and per level while level sync is on
# level_base_xp = 30
# xp_per_level = 6

# Upper bounds for the XP pool and the character level
# xp_ceiling = 9999
# max_character_level = 99

# Empty perks a new session starts with (at most 100)
# initial_perks = 1

# Stat names in display order (single words)
# stats = ["Strength", "Perception", "Endurance", "Charisma", "Intelligence", "Agility", "Luck"]

[costs]
# Incremental cost of each level; index 0 must be 0 and both tables
# must have the same length (the highest index is the max level)
# stat = [0, 0, 3, 6, 9, 12, 15]
# perk = [0, 1, 2, 4, 6, 8, 10]
"#
        .to_string()
    }
}

fn env_value<T: DeserializeOwned>(config: &Config, key: &str) -> ApplicationResult<Option<T>> {
    match config.get::<T>(key) {
        Ok(val) => Ok(Some(val)),
        Err(ConfigError::NotFound(_)) => Ok(None),
        Err(e) => Err(config_err(e)),
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
