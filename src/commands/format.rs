//! `format` command implementation.
//!
//! Usage:
//!   format <IMAGE> [--blocks N] [--inodes M] [--add HOST_FILE]...
//!
//! Semantics:
//! - Creates or truncates the image to `(2 + N)` blocks.
//! - Writes the superblock (block 0), a zeroed inode table (block 1) and zeroed data blocks.
//! - Every `--add` file lands in the next inode from 2 up, in the next data block, and is
//!   visible after mounting as `file<inode>`.
//!
//! Files larger than one block are refused, so is a file list that outgrows the inode table
//! or the data region.
use crate::utils::{file_man, tui};
use anyhow::Context;
use std::path::{Path, PathBuf};

pub fn handle(image: &Path, blocks: u32, inodes: u32, files: &[PathBuf]) -> anyhow::Result<()> {
    file_man::ensure_parent(image)?;

    let contents = files
        .iter()
        .map(|f| std::fs::read(f).with_context(|| format!("cannot read '{}'", f.display())))
        .collect::<anyhow::Result<Vec<_>>>()?;

    let sb = tosfs::format_image(image, blocks, inodes, &contents)
        .with_context(|| format!("cannot create image '{}'", image.display()))?;
    log::info!(
        "formatted {}: {} blocks, {} inodes, {} files",
        image.display(),
        sb.blocks,
        sb.inodes,
        contents.len()
    );

    for (i, f) in files.iter().enumerate() {
        println!(
            "{} -> {}",
            f.display(),
            tosfs::name_of(tosfs::FIRST_INODE + i as u32)
        );
    }
    tui::write_ok(format_args!("{} bytes", sb.image_len()));
    Ok(())
}
