use std::path::{Path, PathBuf};
use std::process::Command;

use color_eyre::{Result, eyre::eyre};
use tracing::debug;

/// Resolves the operator's output name against the template location.
///
/// A bare file name lands next to the template; anything with a directory
/// component is used as given. A missing extension becomes `.docx`.
#[must_use]
pub fn resolve_output_path(template: &Path, output: &Path) -> PathBuf {
    let mut resolved = if output.components().count() > 1 || output.is_absolute() {
        output.to_path_buf()
    } else {
        template.parent().map_or_else(|| output.to_path_buf(), |dir| dir.join(output))
    };

    if resolved.extension().is_none() {
        resolved.set_extension("docx");
    }
    resolved
}

/// Opens the folder containing `path` in the platform file browser.
///
/// # Errors
///
/// Returns an error if the path has no parent or the file browser cannot be launched.
pub fn reveal_in_folder(path: &Path) -> Result<()> {
    let folder = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf);

    if !folder.exists() {
        return Err(eyre!("Folder does not exist: {}", folder.display()));
    }

    debug!("Revealing {} in file browser", folder.display());

    #[cfg(target_os = "macos")]
    Command::new("open")
        .arg("-R")
        .arg(path)
        .spawn()
        .map_err(|e| eyre!("Failed to reveal in Finder: {e}"))?;

    #[cfg(target_os = "windows")]
    Command::new("explorer")
        .arg(format!("/select,{}", path.display()))
        .spawn()
        .map_err(|e| eyre!("Failed to reveal in Explorer: {e}"))?;

    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    Command::new("xdg-open")
        .arg(&folder)
        .spawn()
        .map_err(|e| eyre!("Failed to open file manager: {e}"))?;

    Ok(())
}
