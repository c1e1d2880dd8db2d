use crate::error::{Error, Result};
use std::env;
use std::path::PathBuf;

/// Base hotpot config directory (~/.config/hotpot/, %APPDATA%\hotpot on Windows)
pub fn hotpot() -> Result<PathBuf> {
    #[cfg(windows)]
    {
        let appdata = env::var("APPDATA").map_err(|_| {
            Error::internal_unexpected(
                "APPDATA environment variable not set on Windows".to_string(),
            )
        })?;
        Ok(PathBuf::from(appdata).join("hotpot"))
    }

    #[cfg(not(windows))]
    {
        let home = env::var("HOME").map_err(|_| {
            Error::internal_unexpected(
                "HOME environment variable not set on Unix-like system".to_string(),
            )
        })?;
        Ok(PathBuf::from(home).join(".config").join("hotpot"))
    }
}

/// Global hotpot.json config file path
pub fn hotpot_json() -> Result<PathBuf> {
    Ok(hotpot()?.join("hotpot.json"))
}
