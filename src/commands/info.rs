use crate::utils::{file_man, tui};
use anyhow::Context;
use std::path::Path;

/// info <IMAGE>
///
/// Prints the five superblock fields. Fails when the image cannot be opened or the magic
/// number does not match; the geometry itself is printed as found.
pub fn handle(image: &Path) -> anyhow::Result<()> {
    file_man::check_image(image)?;
    let sb = tosfs::read_superblock(image)
        .with_context(|| format!("cannot read '{}'", image.display()))?;

    tui::write_heading("Filesystem Information:");
    tui::write_field("Magic Number", format_args!("{:#x}", sb.magic));
    tui::write_field("Block Size", format_args!("{} bytes", sb.block_size));
    tui::write_field("Total Blocks", sb.blocks);
    tui::write_field("Total Inodes", sb.inodes);
    tui::write_field("Root Inode", sb.root_inode);
    Ok(())
}
