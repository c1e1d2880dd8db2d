use std::path::Path;

use crate::error::{Error, Result};
use crate::utils::command;

/// Clone only the tip of `url` (optionally at branch or tag `reference`) into `target_dir`.
pub fn clone_shallow(url: &str, reference: Option<&str>, target_dir: &Path) -> Result<()> {
    let target = target_dir.to_string_lossy();
    let mut args = vec!["clone", "--depth", "1", "--quiet"];
    if let Some(reference) = reference {
        args.extend(["--branch", reference]);
    }
    args.extend([url, &*target]);

    command::run("git", &args, "git clone").map_err(|e| {
        let detail = e.details["error"].as_str().unwrap_or(&e.message).to_string();
        Error::git_command_failed(detail)
    })?;
    Ok(())
}
