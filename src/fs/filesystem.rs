use crate::error::{Error, Result};
use crate::fs::consts::{ATTR_TTL, ENTRY_TTL, FIRST_INODE, ROOT_INODE, ROOT_PERM};
use crate::fs::inode_table::InodeTable;
use crate::fs::io::Image;
use crate::fs::layout::{Inode, S_IFMT, S_IFREG};
use crate::fs::naming::{inode_of, name_of};
use crate::fs::superblock::Superblock;
use memmap2::MmapMut;
use parking_lot::Mutex;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Directory,
    RegularFile,
}

/// Attributes reported for one inode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attr {
    pub ino: u32,
    pub kind: FileKind,
    pub perm: u16,
    pub nlink: u32,
    pub size: u64,
    pub blocks: u64,
    pub blksize: u32,
}

/// Result of a lookup or create, with the cache lifetimes the kernel may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entry {
    pub ino: u32,
    pub attr: Attr,
    pub entry_ttl: Duration,
    pub attr_ttl: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub ino: u32,
    /// Position of the entry after this one, used as a resume cookie.
    pub next: u64,
    pub kind: FileKind,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    pub block_size: u32,
    pub blocks: u32,
    pub inodes: u32,
    pub used_inodes: u32,
    pub free_inodes: u32,
}

/// A mounted image: the superblock copy, the shared inode table and the data region.
pub struct FileSystem {
    sb: Superblock,
    table: Mutex<InodeTable>,
    data: MmapMut,
    sb_map: MmapMut,
}

impl FileSystem {
    pub fn new(image: Image) -> Self {
        let Image {
            superblock,
            sb_map,
            inode_map,
            data_map,
        } = image;
        Self {
            sb: superblock,
            table: Mutex::new(InodeTable::new(inode_map, superblock.inodes)),
            data: data_map,
            sb_map,
        }
    }

    pub fn superblock(&self) -> &Superblock {
        &self.sb
    }

    fn attr_from(&self, ino: u32, inode: &Inode) -> Attr {
        let kind = if inode.is_dir() {
            FileKind::Directory
        } else {
            FileKind::RegularFile
        };
        Attr {
            ino,
            kind,
            perm: inode.perm(),
            nlink: inode.nlink,
            size: inode.size as u64,
            blocks: u64::from(inode.size).div_ceil(512),
            blksize: self.sb.block_size,
        }
    }

    fn root_attr(&self) -> Attr {
        Attr {
            ino: ROOT_INODE,
            kind: FileKind::Directory,
            perm: ROOT_PERM,
            nlink: 2,
            size: 0,
            blocks: 0,
            blksize: self.sb.block_size,
        }
    }

    /// Free slots report `NotFound`, as do numbers outside the table.
    pub fn getattr(&self, ino: u32) -> Result<Attr> {
        if ino == ROOT_INODE {
            return Ok(self.root_attr());
        }
        let inode = self
            .table
            .lock()
            .get(ino)
            .filter(|i| !i.is_free())
            .ok_or(Error::NotFound)?;
        Ok(self.attr_from(ino, &inode))
    }

    pub fn lookup(&self, parent: u32, name: &str) -> Result<Entry> {
        if parent != ROOT_INODE {
            return Err(Error::NotFound);
        }
        let ino = inode_of(name).ok_or(Error::NotFound)?;
        let inode = self.table.lock().get_occupied(ino).ok_or(Error::NotFound)?;
        Ok(self.entry(ino, &inode))
    }

    fn entry(&self, ino: u32, inode: &Inode) -> Entry {
        Entry {
            ino,
            attr: self.attr_from(ino, inode),
            entry_ttl: ENTRY_TTL,
            attr_ttl: ATTR_TTL,
        }
    }

    /// Lists the root directory, skipping the first `offset` entries.
    ///
    /// `.` and `..` come first, then one `file<n>` entry per occupied slot in ascending order.
    pub fn readdir(&self, dir: u32, offset: u64) -> Result<Vec<DirEntry>> {
        if dir != ROOT_INODE {
            return Err(Error::NotDirectory);
        }
        let table = self.table.lock();
        let dots = [".", ".."]
            .into_iter()
            .map(|name| (ROOT_INODE, FileKind::Directory, name.to_string()));
        let files = table.occupied().map(|(ino, inode)| {
            let kind = self.attr_from(ino, &inode).kind;
            (ino, kind, name_of(ino))
        });
        Ok(dots
            .chain(files)
            .enumerate()
            .skip(offset as usize)
            .map(|(pos, (ino, kind, name))| DirEntry {
                ino,
                next: pos as u64 + 1,
                kind,
                name,
            })
            .collect())
    }

    /// Reads at most `len` bytes of `ino` starting at `offset`. Reading at or past the end
    /// returns an empty buffer.
    pub fn read(&self, ino: u32, offset: u64, len: u32) -> Result<Vec<u8>> {
        let inode = self.table.lock().get_occupied(ino).ok_or(Error::NotFound)?;
        let size = inode.size as u64;
        if offset >= size {
            return Ok(Vec::new());
        }
        let block_size = self.sb.block_size as u64;
        // the record may claim more than one block holds
        let end = size.min(block_size).max(offset);
        let count = (len as u64).min(end - offset) as usize;
        if count == 0 {
            return Ok(Vec::new());
        }
        if inode.block_no >= self.sb.blocks {
            return Err(Error::Corrupted(ino));
        }
        let start = (inode.block_no as u64 * block_size + offset) as usize;

        let mut buf = Vec::new();
        buf.try_reserve_exact(count).map_err(|_| Error::OutOfMemory)?;
        buf.extend_from_slice(&self.data[start..start + count]);
        Ok(buf)
    }

    /// Claims the lowest free inode slot for a new file in the root directory.
    ///
    /// The name is not stored; the new file is visible as `file<n>`. No data block is
    /// assigned, so the file stays empty.
    pub fn create(&self, parent: u32, _name: &str, mode: u32) -> Result<Entry> {
        if parent != ROOT_INODE {
            return Err(Error::NotFound);
        }
        let mode = if mode & S_IFMT == 0 { mode | S_IFREG } else { mode };
        let inode = Inode {
            mode,
            nlink: 1,
            size: 0,
            block_no: 0,
        };
        let ino = self.table.lock().claim(inode).ok_or(Error::NoSpace)?;
        Ok(self.entry(ino, &inode))
    }

    pub fn stats(&self) -> Stats {
        let table = self.table.lock();
        let allocatable = table.capacity().saturating_sub(FIRST_INODE);
        Stats {
            block_size: self.sb.block_size,
            blocks: self.sb.blocks,
            inodes: allocatable,
            used_inodes: allocatable - table.free_count(),
            free_inodes: table.free_count(),
        }
    }

    /// Flushes all three mappings back to the image file.
    pub fn flush(&self) -> Result<()> {
        self.table.lock().flush()?;
        self.data.flush()?;
        self.sb_map.flush()?;
        Ok(())
    }
}
