use anyhow::{Context, bail};
use std::path::Path;

/// Rejects paths that cannot be an existing image file.
pub fn check_image(path: &Path) -> anyhow::Result<()> {
    if path.is_dir() {
        bail!(
            "path points to a directory, cannot open it as an image: {}",
            path.display()
        );
    }
    if !path.exists() {
        bail!("image not found: {}", path.display());
    }
    Ok(())
}

/// Creates the parent directory of a new image if needed.
pub fn ensure_parent(path: &Path) -> anyhow::Result<()> {
    if path.is_dir() {
        bail!(
            "path points to a directory, cannot create an image there: {}",
            path.display()
        );
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("cannot create directory '{}'", parent.display()))?;
        }
    }
    Ok(())
}
