//! Package manager detection for the next-step commands printed after generation.
//!
//! `npm init`, `pnpm create`, `yarn create` and `bun create` all export
//! `npm_config_user_agent` (e.g. `pnpm/9.1.0 npm/? node/v20.11.0 darwin arm64`)
//! to the process they spawn; the leading token names the invoking manager.

use serde::Deserialize;

const USER_AGENT_ENV: &str = "npm_config_user_agent";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageManager {
    Pnpm,
    Npm,
    Yarn,
    Bun,
}

impl PackageManager {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "pnpm" => Some(PackageManager::Pnpm),
            "npm" => Some(PackageManager::Npm),
            "yarn" => Some(PackageManager::Yarn),
            "bun" => Some(PackageManager::Bun),
            _ => None,
        }
    }

    /// Parse the leading `name/version` token of an npm user agent string.
    pub fn from_user_agent(user_agent: &str) -> Option<Self> {
        let token = user_agent.split_whitespace().next()?;
        let (name, _version) = token.split_once('/')?;
        Self::from_name(name)
    }

    /// Detect from the environment, falling back to `fallback`.
    pub fn detect(fallback: PackageManager) -> Self {
        std::env::var(USER_AGENT_ENV)
            .ok()
            .and_then(|ua| Self::from_user_agent(&ua))
            .unwrap_or(fallback)
    }

    pub fn install_command(&self) -> &'static str {
        match self {
            PackageManager::Pnpm => "pnpm i",
            PackageManager::Npm => "npm install",
            PackageManager::Yarn => "yarn",
            PackageManager::Bun => "bun install",
        }
    }

    pub fn dev_command(&self) -> &'static str {
        match self {
            PackageManager::Pnpm => "pnpm dev",
            PackageManager::Npm => "npm run dev",
            PackageManager::Yarn => "yarn dev",
            PackageManager::Bun => "bun run dev",
        }
    }
}
