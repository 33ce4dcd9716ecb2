use crate::context::Context;
use anyhow::{Context as _, bail};
use std::path::Path;
use tosfs::fuse::{FuseAdapter, MountConfig};

/// mount <IMAGE> <MOUNTPOINT>
///
/// Maps the image, then blocks serving FUSE requests until the mountpoint is unmounted.
pub fn handle(
    image: &Path,
    mountpoint: &Path,
    config: &MountConfig,
    context: &mut Context,
) -> anyhow::Result<()> {
    if !mountpoint.is_dir() {
        bail!("mountpoint is not a directory: {}", mountpoint.display());
    }
    context.open_fs(image)?;
    let fs = context.take_fs()?;
    log::info!(
        "image {} ready ({} free inodes)",
        image.display(),
        fs.stats().free_inodes
    );

    FuseAdapter::new(fs)
        .mount(mountpoint, config)
        .with_context(|| format!("mount at '{}' failed", mountpoint.display()))
}
