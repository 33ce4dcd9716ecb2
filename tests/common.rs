//! Common utilities for tests

#![allow(dead_code)]

use std::fs::OpenOptions;
use std::io::{Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tosfs::fs::layout::Inode;
use tosfs::{BLOCK_SIZE, FileSystem, INODE_BLOCK, INODE_SIZE, Image};

/// A formatted image inside its own temporary directory.
pub struct TestImage {
    _dir: TempDir,
    pub path: PathBuf,
}

impl TestImage {
    pub fn new(blocks: u32, inodes: u32) -> Self {
        Self::with_files(blocks, inodes, &[])
    }

    pub fn with_files(blocks: u32, inodes: u32, files: &[&[u8]]) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fs.img");
        let files: Vec<Vec<u8>> = files.iter().map(|f| f.to_vec()).collect();
        tosfs::format_image(&path, blocks, inodes, &files).unwrap();
        Self { _dir: dir, path }
    }

    pub fn mount(&self) -> FileSystem {
        FileSystem::new(Image::open(&self.path).unwrap())
    }

    /// Overwrites one inode record in the image file, bypassing the driver.
    pub fn poke_inode(&self, ino: u32, inode: Inode) {
        let mut buf = [0u8; INODE_SIZE];
        inode.serialize(&mut buf);
        let offset = INODE_BLOCK * BLOCK_SIZE as u64 + ino as u64 * INODE_SIZE as u64;
        poke(&self.path, offset, &buf);
    }
}

pub fn poke(path: &Path, offset: u64, bytes: &[u8]) {
    let mut f = OpenOptions::new().write(true).open(path).unwrap();
    f.seek(SeekFrom::Start(offset)).unwrap();
    f.write_all(bytes).unwrap();
}

pub fn names(fs: &FileSystem) -> Vec<String> {
    fs.readdir(tosfs::ROOT_INODE, 0)
        .unwrap()
        .into_iter()
        .map(|e| e.name)
        .collect()
}
