use std::time::Duration;

pub const FS_MAGIC: u32 = 0x1010_1010;
pub const BLOCK_SIZE: u32 = 4096; // 4 KiB

// Fixed block indices of the three regions
pub const SUPERBLOCK_BLOCK: u64 = 0;
pub const INODE_BLOCK: u64 = 1;
pub const DATA_BLOCK: u64 = 2;

pub const SUPERBLOCK_SIZE: usize = 20; // 5 x u32
pub const INODE_SIZE: usize = 16; // 16 B
pub const MAX_INODES: u32 = ((DATA_BLOCK - INODE_BLOCK) * BLOCK_SIZE as u64 / INODE_SIZE as u64) as u32;

pub const ROOT_INODE: u32 = 1; // FUSE root id, never stored in the table
pub const FIRST_INODE: u32 = 2; // 0 and 1 are reserved

pub const NAME_PREFIX: &str = "file";
pub const MAX_NAME_LEN: usize = 32;

pub const ROOT_PERM: u16 = 0o755;
pub const DEFAULT_FILE_PERM: u16 = 0o644;

pub const ENTRY_TTL: Duration = Duration::from_secs(1);
pub const ATTR_TTL: Duration = Duration::from_secs(1);
