//! Settings file loader and path helpers.
//!
//! Uses Figment to merge `aibackend.toml` + `aibackend.<env>.toml` +
//! `AIBACKEND_*` env vars (`__` separates nested keys, e.g.
//! `AIBACKEND_CHAT__CONFIG__TOKEN_LIMIT=4000`). Provides helpers to expand `~`
//! and `${VAR}` and to resolve relative paths against a known base directory.

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::defaults::ModelDefaultsOverrides;
use crate::error::{ConfigError, Result};
use crate::settings::ConfigSettings;

pub const SETTINGS_FILE: &str = "aibackend.toml";
pub const ENV_PREFIX: &str = "AIBACKEND_";
pub const ENV_SELECTOR: &str = "AIBACKEND_ENV";

/// One configured backend: which implementation to build and its settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendSettings {
    pub class: String,
    #[serde(default)]
    pub config: ConfigSettings,
}

impl BackendSettings {
    pub fn new(class: impl Into<String>, config: ConfigSettings) -> Self {
        Self { class: class.into(), config }
    }
}

/// Everything a settings file may contain.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub chat: Option<BackendSettings>,
    pub embedding: Option<BackendSettings>,
    pub model_defaults: ModelDefaultsOverrides,
}

pub struct SettingsLoader {
    figment: Figment,
}

impl SettingsLoader {
    /// Load from the current directory.
    pub fn load() -> Result<Self> {
        let cwd = env::current_dir().map_err(|e| ConfigError::Load(e.to_string()))?;
        Self::from_dir(&cwd)
    }

    pub fn from_dir(dir: &Path) -> Result<Self> {
        let env_name = env::var(ENV_SELECTOR).unwrap_or_else(|_| "dev".to_string());

        let mut figment = Figment::new().merge(Toml::file(dir.join(SETTINGS_FILE)));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file(dir.join("aibackend.dev.toml"))),
            "prod" | "production" => figment = figment.merge(Toml::file(dir.join("aibackend.prod.toml"))),
            "test" | "testing" => figment = figment.merge(Toml::file(dir.join("aibackend.test.toml"))),
            other => tracing::warn!(env = other, "unrecognised {ENV_SELECTOR}, using base settings only"),
        }
        Ok(Self::from_figment(figment.merge(env_provider())))
    }

    /// Load one explicit file, still honouring env overrides.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(ConfigError::Load(format!("settings file not found: {}", path.display())));
        }
        let figment = Figment::new().merge(Toml::file(path)).merge(env_provider());
        Ok(Self::from_figment(figment))
    }

    pub fn from_figment(figment: Figment) -> Self { Self { figment } }

    pub fn get<T>(&self, key: &str) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| ConfigError::Load(format!("Failed to get '{key}': {e}")))
    }

    pub fn settings(&self) -> Result<Settings> {
        self.figment
            .extract()
            .map_err(|e| ConfigError::Load(e.to_string()))
    }
}

fn env_provider() -> Env {
    Env::prefixed(ENV_PREFIX).ignore(&["env"]).split("__")
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative path against a given base directory after expansion.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() { p } else { base.join(p) }
}
