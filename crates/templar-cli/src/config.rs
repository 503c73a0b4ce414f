//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables (`TEMPLAR_INCLUDE_DIR`, via clap's `env` attr)
//! 3. Config file (TOML, `--config` or the default location)
//! 4. Built-in defaults (always present)

use std::path::PathBuf;

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use templar_core::expand::TemplateStrictness;

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Expansion behaviour.
    pub expansion: ExpansionConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpansionConfig {
    /// Base directory for absolute-mode includes.
    pub include_dir: Option<PathBuf>,
    /// Undefined-template policy: `"strict"` (default) or `"lenient"`.
    pub strictness: TemplateStrictness,
}

impl AppConfig {
    /// Load configuration, starting from defaults.
    ///
    /// With an explicit `--config` path the file must exist and parse; the
    /// default location is optional and silently skipped when absent.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        let path = match config_file {
            Some(explicit) => Some(explicit.clone()),
            None => {
                let default = Self::config_path();
                default.exists().then_some(default)
            }
        };
        match path {
            Some(path) => {
                let text = std::fs::read_to_string(&path)
                    .with_context(|| format!("reading config file {}", path.display()))?;
                toml::from_str(&text)
                    .with_context(|| format!("parsing config file {}", path.display()))
            }
            None => Ok(Self::default()),
        }
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.templar.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("com", "templar", "templar")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".templar.toml"))
    }
}

/// Platform default for the include base directory.
///
/// On Windows this is the simulator's `ModelBehaviorDefs` directory under the
/// user profile; elsewhere there is no sensible default, so a deliberately
/// nonexistent placeholder makes any absolute include fail with a clear
/// not-found error unless `-I` is given.
pub fn default_include_dir() -> PathBuf {
    if cfg!(windows) {
        if let Ok(profile) = std::env::var("USERPROFILE") {
            return PathBuf::from(profile).join(
                "AppData/Local/Packages/Microsoft.FlightSimulator_8wekyb3d8bbwe/LocalCache/Packages/Official/OneStore/fs-base-aircraft-common/ModelBehaviorDefs",
            );
        }
    }
    PathBuf::from("nonexistent")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_strict_with_no_include_dir() {
        let cfg = AppConfig::default();
        assert!(cfg.expansion.include_dir.is_none());
        assert_eq!(cfg.expansion.strictness, TemplateStrictness::Strict);
    }

    #[test]
    fn load_without_file_returns_defaults() {
        let cfg = AppConfig::load(None).unwrap();
        assert_eq!(cfg.expansion.strictness, TemplateStrictness::Strict);
    }

    #[test]
    fn load_parses_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[expansion]\ninclude_dir = \"/defs\"\nstrictness = \"lenient\"\n",
        )
        .unwrap();
        let cfg = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(cfg.expansion.include_dir.as_deref(), Some(std::path::Path::new("/defs")));
        assert_eq!(cfg.expansion.strictness, TemplateStrictness::Lenient);
    }

    #[test]
    fn explicit_missing_config_is_an_error() {
        let missing = PathBuf::from("/definitely/not/here.toml");
        assert!(AppConfig::load(Some(&missing)).is_err());
    }

    #[test]
    fn config_path_is_nonempty() {
        assert!(!AppConfig::config_path().as_os_str().is_empty());
    }
}
