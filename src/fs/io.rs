//! Storage mapper: opens a backing image and maps its three regions.

use crate::error::{Error, Result};
use crate::fs::consts::{
    BLOCK_SIZE, DATA_BLOCK, DEFAULT_FILE_PERM, FIRST_INODE, INODE_BLOCK, INODE_SIZE,
    SUPERBLOCK_BLOCK, SUPERBLOCK_SIZE,
};
use crate::fs::layout::{Inode, S_IFREG};
use crate::fs::superblock::Superblock;
use memmap2::{Mmap, MmapMut, MmapOptions};
use std::fs::{File, OpenOptions};
use std::io::{Seek, SeekFrom, Write};
use std::path::Path;

/// The three live mappings of a mounted image plus its decoded superblock.
pub struct Image {
    pub superblock: Superblock,
    pub(crate) sb_map: MmapMut,
    pub(crate) inode_map: MmapMut,
    pub(crate) data_map: MmapMut,
}

impl Image {
    /// Maps superblock, inode table and data region, in that order.
    ///
    /// The geometry is validated against the real file length before the inode table or the
    /// data region are mapped. On failure every mapping made so far is dropped again.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|source| Error::ImageOpen {
                path: path.to_path_buf(),
                source,
            })?;
        let image_len = image_len(&file, path)?;

        let sb_map = map_region(&file, "superblock", SUPERBLOCK_BLOCK, BLOCK_SIZE as usize)?;
        let superblock = Superblock::deserialize(&sb_map[..SUPERBLOCK_SIZE]);
        superblock.validate(image_len)?;

        let inode_map = map_region(&file, "inode table", INODE_BLOCK, superblock.inode_table_len())?;
        let data_map = map_region(&file, "data", DATA_BLOCK, superblock.data_len())?;
        log::debug!(
            "mapped {}: {} inodes, {} data blocks",
            path.display(),
            superblock.inodes,
            superblock.blocks
        );

        Ok(Self {
            superblock,
            sb_map,
            inode_map,
            data_map,
        })
    }
}

fn image_len(file: &File, path: &Path) -> Result<u64> {
    let len = file
        .metadata()
        .map_err(|source| Error::ImageOpen {
            path: path.to_path_buf(),
            source,
        })?
        .len();
    if len < BLOCK_SIZE as u64 {
        return Err(Error::ImageTooSmall {
            needed: BLOCK_SIZE as u64,
            actual: len,
        });
    }
    Ok(len)
}

fn map_region(file: &File, region: &'static str, block: u64, len: usize) -> Result<MmapMut> {
    // SAFETY: the image is validated to cover [offset, offset + len); concurrent truncation of
    // the backing file by another process is outside what the driver can guard against.
    unsafe {
        MmapOptions::new()
            .offset(block * BLOCK_SIZE as u64)
            .len(len)
            .map_mut(file)
    }
    .map_err(|source| Error::Mapping { region, source })
}

/// Reads the superblock at block 0 without mapping anything else.
///
/// Only the magic number is checked, the geometry is reported as found.
pub fn read_superblock<P: AsRef<Path>>(path: P) -> Result<Superblock> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| Error::ImageOpen {
        path: path.to_path_buf(),
        source,
    })?;
    let len = file.metadata()?.len();
    if len < SUPERBLOCK_SIZE as u64 {
        return Err(Error::ImageTooSmall {
            needed: SUPERBLOCK_SIZE as u64,
            actual: len,
        });
    }
    // SAFETY: the mapping is read-only and covers only bytes known to exist.
    let map: Mmap = unsafe {
        MmapOptions::new()
            .offset(SUPERBLOCK_BLOCK * BLOCK_SIZE as u64)
            .len(SUPERBLOCK_SIZE)
            .map(&file)
    }
    .map_err(|source| Error::Mapping {
        region: "superblock",
        source,
    })?;
    let sb = Superblock::deserialize(&map);
    sb.check_magic()?;
    Ok(sb)
}

pub fn write_block(f: &mut File, block_index: u64, buf: &[u8]) -> std::io::Result<()> {
    debug_assert!(buf.len() <= BLOCK_SIZE as usize);
    f.seek(SeekFrom::Start(block_index * BLOCK_SIZE as u64))?;
    f.write_all(buf)?;
    Ok(())
}

/// Writes a fresh image: superblock, zeroed inode table and zeroed data region.
///
/// Each entry of `files` becomes an occupied inode starting at slot 2, holding its bytes in
/// the next data block. Returns the superblock that was written.
pub fn format_image<P: AsRef<Path>>(
    path: P,
    blocks: u32,
    inodes: u32,
    files: &[Vec<u8>],
) -> Result<Superblock> {
    let path = path.as_ref();
    let sb = Superblock::new(blocks, inodes);
    sb.validate(sb.image_len())?;

    let allocatable = (inodes - FIRST_INODE).min(blocks) as usize;
    if files.len() > allocatable {
        return Err(Error::NoSpace);
    }
    if let Some(big) = files.iter().find(|f| f.len() > BLOCK_SIZE as usize) {
        return Err(Error::BadGeometry(format!(
            "file of {} bytes does not fit one {BLOCK_SIZE} byte block",
            big.len()
        )));
    }

    let mut file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .map_err(|source| Error::ImageOpen {
            path: path.to_path_buf(),
            source,
        })?;
    // set_len zero-fills, which leaves every inode slot free
    file.set_len(sb.image_len())?;

    let mut block0 = vec![0u8; SUPERBLOCK_SIZE];
    sb.serialize(&mut block0);
    write_block(&mut file, SUPERBLOCK_BLOCK, &block0)?;

    let mut table = vec![0u8; sb.inode_table_len()];
    for (i, data) in files.iter().enumerate() {
        let ino = FIRST_INODE as usize + i;
        let record = Inode {
            mode: S_IFREG | DEFAULT_FILE_PERM as u32,
            nlink: 1,
            size: data.len() as u32,
            block_no: i as u32,
        };
        record.serialize(&mut table[ino * INODE_SIZE..(ino + 1) * INODE_SIZE]);
        write_block(&mut file, DATA_BLOCK + i as u64, data)?;
    }
    file.seek(SeekFrom::Start(INODE_BLOCK * BLOCK_SIZE as u64))?;
    file.write_all(&table)?;
    file.sync_all()?;
    Ok(sb)
}
