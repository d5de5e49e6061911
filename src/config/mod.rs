//! Configuration management for `rotsit`.
//!
//! Configuration sources and precedence (highest wins):
//! 1. CLI overrides (`--db`, `--actor`, `--json`)
//! 2. Environment variables (`ROTSIT_DB`, `ROTSIT_ACTOR`, ...)
//! 3. Project config (`.rotsit/config.yaml` next to the database)
//! 4. User config (`~/.config/rotsit/config.yaml`)
//! 5. Defaults

use crate::error::{Result, RotsitError};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default database filename.
pub const DEFAULT_DB_FILENAME: &str = "issues.sitdb";

/// Directory holding the project config, next to the database.
pub const PROJECT_CONFIG_DIR: &str = ".rotsit";

const ENV_PREFIX: &str = "ROTSIT_";

/// One configuration source, flattened to `key -> value`.
///
/// Keys are normalized: lowercase, with `_` spelled `-`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigLayer {
    pub values: HashMap<String, String>,
}

impl ConfigLayer {
    /// Merge another layer on top of this one (higher precedence wins).
    pub fn merge_from(&mut self, other: &Self) {
        for (key, value) in &other.values {
            self.values.insert(key.clone(), value.clone());
        }
    }

    /// Merge multiple layers in precedence order (lowest to highest).
    #[must_use]
    pub fn merge_layers(layers: &[Self]) -> Self {
        let mut merged = Self::default();
        for layer in layers {
            merged.merge_from(layer);
        }
        merged
    }

    pub fn insert(&mut self, key: &str, value: impl Into<String>) {
        self.values.insert(normalize_key(key), value.into());
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .get(&normalize_key(key))
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
    }

    /// Build a layer from a YAML file path. Missing files return empty config.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read, and
    /// [`RotsitError::Config`] if it is not a YAML mapping.
    pub fn from_yaml(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)?;
        let config_error = |reason: String| RotsitError::Config {
            path: path.to_path_buf(),
            reason,
        };
        let value: serde_yaml::Value =
            serde_yaml::from_str(&contents).map_err(|err| config_error(err.to_string()))?;
        match value {
            serde_yaml::Value::Mapping(_) | serde_yaml::Value::Null => {}
            _ => return Err(config_error("expected 'key: value' pairs".to_string())),
        }
        debug!(path = %path.display(), "loaded config file");
        Ok(layer_from_yaml_value(&value))
    }

    /// Build a layer from `ROTSIT_*` environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_vars(env::vars())
    }

    fn from_vars(vars: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut layer = Self::default();
        for (key, value) in vars {
            if let Some(stripped) = key.strip_prefix(ENV_PREFIX) {
                layer.insert(stripped, value);
            }
        }
        layer
    }
}

/// CLI overrides for config loading (optional).
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub db: Option<PathBuf>,
    pub actor: Option<String>,
    pub json: Option<bool>,
}

impl CliOverrides {
    #[must_use]
    pub fn as_layer(&self) -> ConfigLayer {
        let mut layer = ConfigLayer::default();

        if let Some(path) = &self.db {
            layer.insert("db", path.to_string_lossy());
        }
        if let Some(actor) = &self.actor {
            layer.insert("actor", actor.clone());
        }
        if let Some(json) = self.json {
            layer.insert("json", json.to_string());
        }

        layer
    }
}

/// Settings every command needs, resolved from the merged layers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub db_path: PathBuf,
    pub actor: String,
    pub json: bool,
    pub editor: Option<String>,
}

impl Config {
    #[must_use]
    pub fn from_layer(layer: &ConfigLayer) -> Self {
        Self {
            db_path: layer
                .get("db")
                .map_or_else(|| PathBuf::from(DEFAULT_DB_FILENAME), PathBuf::from),
            actor: resolve_actor(layer),
            json: layer.get("json").and_then(parse_bool).unwrap_or(false),
            editor: layer.get("editor").map(str::to_string),
        }
    }
}

/// Load user config (~/.config/rotsit/config.yaml).
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_user_config() -> Result<ConfigLayer> {
    let Ok(home) = env::var("HOME") else {
        return Ok(ConfigLayer::default());
    };
    let path = Path::new(&home)
        .join(".config")
        .join("rotsit")
        .join("config.yaml");
    ConfigLayer::from_yaml(&path)
}

/// Load project config (`.rotsit/config.yaml` in `dir`).
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_project_config(dir: &Path) -> Result<ConfigLayer> {
    ConfigLayer::from_yaml(&dir.join(PROJECT_CONFIG_DIR).join("config.yaml"))
}

/// Default config layer (lowest precedence).
#[must_use]
pub fn default_config_layer() -> ConfigLayer {
    let mut layer = ConfigLayer::default();
    layer.insert("db", DEFAULT_DB_FILENAME);
    layer
}

/// Directory whose `.rotsit/config.yaml` applies: the one holding the
/// database named by the CLI or environment, else the current directory.
fn project_dir(early: &ConfigLayer) -> PathBuf {
    early
        .get("db")
        .map(Path::new)
        .and_then(Path::parent)
        .filter(|parent| !parent.as_os_str().is_empty())
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
}

/// Load configuration with the full precedence order.
///
/// # Errors
///
/// Returns an error if any config file cannot be read or parsed.
pub fn load_config(cli: &CliOverrides) -> Result<Config> {
    let env_layer = ConfigLayer::from_env();
    let cli_layer = cli.as_layer();
    let early = ConfigLayer::merge_layers(&[env_layer.clone(), cli_layer.clone()]);

    let layer = ConfigLayer::merge_layers(&[
        default_config_layer(),
        load_user_config()?,
        load_project_config(&project_dir(&early))?,
        env_layer,
        cli_layer,
    ]);
    let config = Config::from_layer(&layer);
    debug!(db = %config.db_path.display(), actor = %config.actor, "resolved config");
    Ok(config)
}

/// Resolve actor with fallback to USER and a safe default.
#[must_use]
pub fn resolve_actor(layer: &ConfigLayer) -> String {
    layer
        .get("actor")
        .map(str::to_string)
        .or_else(|| env::var("USER").ok().map(|value| value.trim().to_string()))
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Editor command for composing messages: configured `editor`, then
/// `$EDITOR`, then `$VISUAL`, then `vi`.
#[must_use]
pub fn resolve_editor(config: &Config) -> String {
    config
        .editor
        .clone()
        .or_else(|| env::var("EDITOR").ok())
        .or_else(|| env::var("VISUAL").ok())
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| "vi".to_string())
}

fn normalize_key(key: &str) -> String {
    key.trim().to_lowercase().replace('_', "-")
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "y" | "on" => Some(true),
        "0" | "false" | "no" | "n" | "off" => Some(false),
        _ => None,
    }
}

fn layer_from_yaml_value(value: &serde_yaml::Value) -> ConfigLayer {
    let mut layer = ConfigLayer::default();
    let mut flat = HashMap::new();
    flatten_yaml(value, "", &mut flat);

    for (key, value) in flat {
        layer.insert(&key, value);
    }

    layer
}

fn flatten_yaml(value: &serde_yaml::Value, prefix: &str, out: &mut HashMap<String, String>) {
    match value {
        serde_yaml::Value::Mapping(map) => {
            for (key, value) in map {
                let Some(key_str) = key.as_str() else {
                    continue;
                };
                let next_prefix = if prefix.is_empty() {
                    key_str.to_string()
                } else {
                    format!("{prefix}.{key_str}")
                };
                flatten_yaml(value, &next_prefix, out);
            }
        }
        serde_yaml::Value::Sequence(values) => {
            let joined = values
                .iter()
                .filter_map(yaml_scalar_to_string)
                .collect::<Vec<_>>()
                .join(",");
            out.insert(prefix.to_string(), joined);
        }
        _ => {
            if let Some(value) = yaml_scalar_to_string(value) {
                out.insert(prefix.to_string(), value);
            }
        }
    }
}

fn yaml_scalar_to_string(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::Bool(v) => Some(v.to_string()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Null
        | serde_yaml::Value::Sequence(_)
        | serde_yaml::Value::Mapping(_) => None,
        serde_yaml::Value::Tagged(tagged) => yaml_scalar_to_string(&tagged.value),
    }
}
