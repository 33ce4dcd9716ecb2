use crate::context::Context;
use crate::utils::tui;
use std::path::Path;

/// statfs <IMAGE>
///
/// Prints block geometry and inode usage. Only the allocatable slots (2 and up) are counted.
pub fn handle(image: &Path, context: &mut Context) -> anyhow::Result<()> {
    context.open_fs(image)?;
    let stats = context.fs()?.stats();

    if let Some(path) = context.fs_path() {
        tui::write_heading(&path.display().to_string());
    }
    tui::write_field("Block size", format_args!("{} B", stats.block_size));
    tui::write_field("Data blocks", stats.blocks);
    tui::write_field(
        "I-nodes",
        format_args!(
            "all={} used={} free={}",
            stats.inodes, stats.used_inodes, stats.free_inodes
        ),
    );
    Ok(())
}
