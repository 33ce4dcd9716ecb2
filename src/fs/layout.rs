use crate::fs::consts::INODE_SIZE;
use std::fmt;

pub const S_IFMT: u32 = libc::S_IFMT as u32;
pub const S_IFDIR: u32 = libc::S_IFDIR as u32;
pub const S_IFREG: u32 = libc::S_IFREG as u32;

// Structure that represents one inode record - 16 B
#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub struct Inode {
    pub mode: u32,     // 4 (offset 0) | 0 - slot is free
    pub nlink: u32,    // 4 (offset 4)
    pub size: u32,     // 4 (offset 8)
    pub block_no: u32, // 4 (offset 12) | relative to the data region
}

impl Inode {
    pub fn is_free(&self) -> bool {
        self.mode == 0
    }

    pub fn is_dir(&self) -> bool {
        self.mode & S_IFMT == S_IFDIR
    }

    pub fn perm(&self) -> u16 {
        (self.mode & 0o7777) as u16
    }

    pub fn serialize(&self, out: &mut [u8]) {
        debug_assert_eq!(out.len(), INODE_SIZE);
        out[0..4].copy_from_slice(&self.mode.to_le_bytes());
        out[4..8].copy_from_slice(&self.nlink.to_le_bytes());
        out[8..12].copy_from_slice(&self.size.to_le_bytes());
        out[12..16].copy_from_slice(&self.block_no.to_le_bytes());
    }

    pub fn deserialize(inp: &[u8]) -> Self {
        debug_assert_eq!(inp.len(), INODE_SIZE);
        Self {
            mode: u32_at(inp, 0),
            nlink: u32_at(inp, 4),
            size: u32_at(inp, 8),
            block_no: u32_at(inp, 12),
        }
    }
}

impl fmt::Debug for Inode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_free() {
            write!(f, "Inode(<free>)")
        } else {
            write!(
                f,
                "Inode(mode={:o}, nlink={}, size={}, block={})",
                self.mode, self.nlink, self.size, self.block_no
            )
        }
    }
}

/// Reads a little-endian u32 starting at `at`.
pub(crate) fn u32_at(buf: &[u8], at: usize) -> u32 {
    let mut b = [0u8; 4];
    b.copy_from_slice(&buf[at..at + 4]);
    u32::from_le_bytes(b)
}
