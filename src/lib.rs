//! A flat, single-directory filesystem over a fixed-layout disk image.
//!
//! Image layout, in blocks of [`BLOCK_SIZE`] bytes:
//! - block 0: superblock
//! - block 1: inode table
//! - block 2..: data blocks, one per file
//!
//! Files have no stored names; inode `n` is visible in the root directory as `file<n>`.

pub mod error;
pub mod fs;
pub mod fuse;

pub use error::{Error, Result};
pub use fs::consts::*;
pub use fs::filesystem::{Attr, DirEntry, Entry, FileKind, FileSystem, Stats};
pub use fs::io::{Image, format_image, read_superblock};
pub use fs::naming::{inode_of, name_of};
pub use fs::superblock::Superblock;
