// Configuration providers: file (YAML / TOML) and environment
use crate::error::{ConfigError, Result};
use figment::providers::{Env, Format, Toml, Yaml};
use figment::Figment;
use std::path::Path;

/// Environment variable prefix; `__` separates nested keys
pub const ENV_PREFIX: &str = "BENEFIT_";

/// Layer a configuration file over `figment`, choosing the format by extension.
pub fn with_file(figment: Figment, path: &Path) -> Result<Figment> {
    if !path.exists() {
        return Err(ConfigError::SourceNotFound(path.display().to_string()));
    }

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "yaml" | "yml" => Ok(figment.merge(Yaml::file(path))),
        "toml" => Ok(figment.merge(Toml::file(path))),
        _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
    }
}

/// Layer `BENEFIT_*` environment variables over `figment`.
pub fn with_env(figment: Figment) -> Figment {
    figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
}
