use crate::error::{Error, Result};
use crate::fs::consts::{
    BLOCK_SIZE, DATA_BLOCK, FIRST_INODE, FS_MAGIC, INODE_SIZE, MAX_INODES, ROOT_INODE,
    SUPERBLOCK_SIZE,
};
use crate::fs::layout::u32_at;

// Structure that represents the File system's Superblock - 20 B
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Superblock {
    pub magic: u32,      // 4 B (offset 0..3)
    pub block_size: u32, // 4 B (offset 4..7)
    pub blocks: u32,     // 4 B (offset 8..11)
    pub inodes: u32,     // 4 B (offset 12..15)
    pub root_inode: u32, // 4 B (offset 16..19)
}

impl Superblock {
    pub fn new(blocks: u32, inodes: u32) -> Self {
        Self {
            magic: FS_MAGIC,
            block_size: BLOCK_SIZE,
            blocks,
            inodes,
            root_inode: ROOT_INODE,
        }
    }

    pub fn serialize(&self, out: &mut [u8]) {
        out[0..4].copy_from_slice(&self.magic.to_le_bytes());
        out[4..8].copy_from_slice(&self.block_size.to_le_bytes());
        out[8..12].copy_from_slice(&self.blocks.to_le_bytes());
        out[12..16].copy_from_slice(&self.inodes.to_le_bytes());
        out[16..20].copy_from_slice(&self.root_inode.to_le_bytes());
    }

    /// Decodes the raw fields without checking any of them.
    pub fn deserialize(inp: &[u8]) -> Self {
        debug_assert!(inp.len() >= SUPERBLOCK_SIZE);
        Self {
            magic: u32_at(inp, 0),
            block_size: u32_at(inp, 4),
            blocks: u32_at(inp, 8),
            inodes: u32_at(inp, 12),
            root_inode: u32_at(inp, 16),
        }
    }

    pub fn check_magic(&self) -> Result<()> {
        if self.magic != FS_MAGIC {
            return Err(Error::InvalidMagic(self.magic));
        }
        Ok(())
    }

    /// Checks the geometry fields against the fixed layout and the real image length.
    pub fn validate(&self, image_len: u64) -> Result<()> {
        self.check_magic()?;
        if self.block_size != BLOCK_SIZE {
            return Err(Error::BadGeometry(format!(
                "block size {} (expected {BLOCK_SIZE})",
                self.block_size
            )));
        }
        if self.root_inode != ROOT_INODE {
            return Err(Error::BadGeometry(format!(
                "root inode {} (expected {ROOT_INODE})",
                self.root_inode
            )));
        }
        if self.inodes < FIRST_INODE || self.inodes > MAX_INODES {
            return Err(Error::BadGeometry(format!(
                "inode count {} outside {FIRST_INODE}..={MAX_INODES}",
                self.inodes
            )));
        }
        if self.blocks == 0 {
            return Err(Error::BadGeometry("no data blocks".into()));
        }
        let needed = self.image_len();
        if image_len < needed {
            return Err(Error::ImageTooSmall {
                needed,
                actual: image_len,
            });
        }
        Ok(())
    }

    pub fn inode_table_len(&self) -> usize {
        self.inodes as usize * INODE_SIZE
    }

    pub fn data_len(&self) -> usize {
        self.blocks as usize * self.block_size as usize
    }

    /// Minimal image length able to hold every region.
    pub fn image_len(&self) -> u64 {
        (DATA_BLOCK + self.blocks as u64) * BLOCK_SIZE as u64
    }
}
