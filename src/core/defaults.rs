use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::package_manager::PackageManager;
use crate::paths;
use crate::utils::io;

/// Root configuration structure for hotpot.json
#[derive(Debug, Clone, Deserialize, Default)]
pub struct HotpotConfig {
    #[serde(default)]
    pub defaults: Defaults,
}

/// All configurable defaults that can be overridden via hotpot.json
#[derive(Debug, Clone, Deserialize)]
pub struct Defaults {
    /// Project name offered when the target directory prompt is left blank
    #[serde(default = "default_target_dir")]
    pub default_target_dir: String,

    /// Package manager used for next-step commands when none is detected
    #[serde(default = "default_package_manager")]
    pub package_manager: PackageManager,

    /// Version written to the generated package.json; `null` keeps the template's
    #[serde(default = "default_manifest_version")]
    pub manifest_version: Option<String>,

    #[serde(default)]
    pub fetch: FetchMethod,

    #[serde(default = "default_base_url")]
    pub archive_base_url: String,

    #[serde(default = "default_base_url")]
    pub git_base_url: String,

    /// Directory whose `template-*` folders shadow the built-in ones
    #[serde(default)]
    pub templates_dir: Option<String>,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            default_target_dir: default_target_dir(),
            package_manager: default_package_manager(),
            manifest_version: default_manifest_version(),
            fetch: FetchMethod::default(),
            archive_base_url: default_base_url(),
            git_base_url: default_base_url(),
            templates_dir: None,
        }
    }
}

/// How remote templates are downloaded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FetchMethod {
    /// Download the repository's zip archive over HTTPS
    #[default]
    Archive,
    /// Shallow `git clone`
    Git,
}

// =============================================================================
// Default value functions
// =============================================================================

fn default_target_dir() -> String {
    "my-hotpot".to_string()
}

fn default_package_manager() -> PackageManager {
    PackageManager::Pnpm
}

fn default_manifest_version() -> Option<String> {
    Some("0.0.1".to_string())
}

fn default_base_url() -> String {
    "https://github.com".to_string()
}

impl Defaults {
    /// Reject values that would only fail later, mid-generation.
    pub fn validate(&self) -> crate::Result<()> {
        if let Some(version) = &self.manifest_version {
            semver::Version::parse(version).map_err(|e| {
                crate::Error::config_invalid_value(
                    "manifest_version",
                    Some(version.clone()),
                    e.to_string(),
                )
            })?;
        }

        let target_dir =
            crate::naming::format_target_dir(Some(&self.default_target_dir)).unwrap_or_default();
        if target_dir.is_empty() {
            return Err(crate::Error::config_invalid_value(
                "default_target_dir",
                Some(self.default_target_dir.clone()),
                "must not be empty",
            ));
        }

        Ok(())
    }

    /// On-disk override for local templates, with `~` expanded.
    pub fn templates_dir(&self) -> Option<PathBuf> {
        self.templates_dir
            .as_deref()
            .map(|dir| PathBuf::from(shellexpand::tilde(dir).into_owned()))
    }
}

// =============================================================================
// Loading functions
// =============================================================================

/// Load defaults, merging file config with built-in defaults.
pub fn load_defaults() -> crate::Result<Defaults> {
    Ok(load_config()?.defaults)
}

/// Load the full hotpot.json config.
///
/// A missing file, or no home directory to look in, yields the built-ins.
/// A file that does not parse or validate is an error.
pub fn load_config() -> crate::Result<HotpotConfig> {
    match paths::hotpot_json() {
        Ok(path) => load_config_from(&path),
        Err(err) => {
            log_status!("config", "Using built-in defaults: {}", err.message);
            Ok(HotpotConfig::default())
        }
    }
}

fn load_config_from(path: &Path) -> crate::Result<HotpotConfig> {
    if !path.exists() {
        return Ok(HotpotConfig::default());
    }

    let content = io::read_file(path, "read config")?;
    parse_config(&content, &path.display().to_string())
}

fn parse_config(content: &str, origin: &str) -> crate::Result<HotpotConfig> {
    let config: HotpotConfig = serde_json::from_str(content)
        .map_err(|e| crate::Error::config_invalid_json(origin, e))?;
    config.defaults.validate()?;
    Ok(config)
}
