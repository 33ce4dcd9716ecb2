//! Kernel-facing adapter: answers FUSE requests with the filesystem operations.

use crate::error::Error;
use crate::fs::consts::{ATTR_TTL, MAX_NAME_LEN};
use crate::fs::filesystem::{Attr, FileKind, FileSystem};
use fuser::{
    FileAttr, FileType, Filesystem, KernelConfig, MountOption, ReplyAttr, ReplyCreate, ReplyData,
    ReplyDirectory, ReplyEntry, ReplyStatfs, Request,
};
use libc::c_int;
use log::{debug, info, trace, warn};
use std::ffi::OsStr;
use std::path::Path;
use std::time::UNIX_EPOCH;

#[derive(Debug, Clone)]
pub struct MountConfig {
    pub fsname: String,
    pub read_only: bool,
    pub allow_other: bool,
    pub auto_unmount: bool,
}

impl Default for MountConfig {
    fn default() -> Self {
        Self {
            fsname: "tosfs".to_string(),
            read_only: false,
            allow_other: false,
            auto_unmount: false,
        }
    }
}

impl MountConfig {
    pub fn options(&self) -> Vec<MountOption> {
        let mut opts = vec![
            MountOption::FSName(self.fsname.clone()),
            MountOption::Subtype("tosfs".to_string()),
            MountOption::NoExec,
        ];
        opts.push(if self.read_only {
            MountOption::RO
        } else {
            MountOption::RW
        });
        if self.allow_other {
            opts.push(MountOption::AllowOther);
        }
        if self.auto_unmount {
            opts.push(MountOption::AutoUnmount);
        }
        opts
    }
}

pub struct FuseAdapter {
    fs: FileSystem,
}

impl FuseAdapter {
    pub fn new(fs: FileSystem) -> Self {
        Self { fs }
    }

    /// Mounts at `mountpoint` and serves requests until the filesystem is unmounted.
    pub fn mount<P: AsRef<Path>>(self, mountpoint: P, config: &MountConfig) -> std::io::Result<()> {
        info!("mounting at {}", mountpoint.as_ref().display());
        fuser::mount2(self, mountpoint, &config.options())
    }
}

fn file_attr(attr: &Attr, req: &Request<'_>) -> FileAttr {
    FileAttr {
        ino: attr.ino as u64,
        size: attr.size,
        blocks: attr.blocks,
        atime: UNIX_EPOCH,
        mtime: UNIX_EPOCH,
        ctime: UNIX_EPOCH,
        crtime: UNIX_EPOCH,
        kind: file_type(attr.kind),
        perm: attr.perm,
        nlink: attr.nlink,
        uid: req.uid(),
        gid: req.gid(),
        rdev: 0,
        blksize: attr.blksize,
        flags: 0,
    }
}

fn file_type(kind: FileKind) -> FileType {
    match kind {
        FileKind::Directory => FileType::Directory,
        FileKind::RegularFile => FileType::RegularFile,
    }
}

// Inode numbers above u32::MAX cannot exist in the table
fn ino32(ino: u64) -> Result<u32, Error> {
    u32::try_from(ino).map_err(|_| Error::NotFound)
}

impl Filesystem for FuseAdapter {
    fn init(&mut self, _req: &Request<'_>, _config: &mut KernelConfig) -> Result<(), c_int> {
        let sb = self.fs.superblock();
        info!("session started: {} inodes, {} blocks", sb.inodes, sb.blocks);
        Ok(())
    }

    fn destroy(&mut self) {
        if let Err(e) = self.fs.flush() {
            warn!("flush on unmount failed: {e}");
        }
        info!("session ended");
    }

    fn lookup(&mut self, req: &Request<'_>, parent: u64, name: &OsStr, reply: ReplyEntry) {
        trace!("lookup parent={parent} name={name:?}");
        let result = ino32(parent).and_then(|parent| {
            let name = name.to_str().ok_or(Error::NotFound)?;
            self.fs.lookup(parent, name)
        });
        match result {
            Ok(entry) => reply.entry(&entry.entry_ttl, &file_attr(&entry.attr, req), 0),
            Err(e) => reply.error(e.errno()),
        }
    }

    fn getattr(&mut self, req: &Request<'_>, ino: u64, _fh: Option<u64>, reply: ReplyAttr) {
        trace!("getattr ino={ino}");
        match ino32(ino).and_then(|ino| self.fs.getattr(ino)) {
            Ok(attr) => reply.attr(&ATTR_TTL, &file_attr(&attr, req)),
            Err(e) => reply.error(e.errno()),
        }
    }

    fn read(
        &mut self,
        _req: &Request<'_>,
        ino: u64,
        _fh: u64,
        offset: i64,
        size: u32,
        _flags: i32,
        _lock_owner: Option<u64>,
        reply: ReplyData,
    ) {
        trace!("read ino={ino} offset={offset} size={size}");
        let Ok(offset) = u64::try_from(offset) else {
            reply.error(libc::EINVAL);
            return;
        };
        match ino32(ino).and_then(|ino| self.fs.read(ino, offset, size)) {
            Ok(data) => reply.data(&data),
            Err(e) => {
                debug!("read ino={ino} failed: {e}");
                reply.error(e.errno());
            }
        }
    }

    fn readdir(
        &mut self,
        _req: &Request<'_>,
        ino: u64,
        _fh: u64,
        offset: i64,
        mut reply: ReplyDirectory,
    ) {
        trace!("readdir ino={ino} offset={offset}");
        let entries = ino32(ino).and_then(|ino| self.fs.readdir(ino, offset.max(0) as u64));
        match entries {
            Ok(entries) => {
                for e in entries {
                    // buffer full, the kernel asks again from e.next
                    if reply.add(e.ino as u64, e.next as i64, file_type(e.kind), &e.name) {
                        break;
                    }
                }
                reply.ok();
            }
            Err(e) => reply.error(e.errno()),
        }
    }

    fn create(
        &mut self,
        req: &Request<'_>,
        parent: u64,
        name: &OsStr,
        mode: u32,
        umask: u32,
        _flags: i32,
        reply: ReplyCreate,
    ) {
        debug!("create parent={parent} name={name:?} mode={mode:o}");
        let name = name.to_string_lossy();
        match ino32(parent).and_then(|parent| self.fs.create(parent, &name, mode & !umask)) {
            Ok(entry) => {
                debug!("created inode {}", entry.ino);
                reply.created(&entry.entry_ttl, &file_attr(&entry.attr, req), 0, 0, 0);
            }
            Err(e) => {
                debug!("create failed: {e}");
                reply.error(e.errno());
            }
        }
    }

    fn statfs(&mut self, _req: &Request<'_>, _ino: u64, reply: ReplyStatfs) {
        let stats = self.fs.stats();
        reply.statfs(
            stats.blocks as u64,
            0,
            0,
            stats.inodes as u64,
            stats.free_inodes as u64,
            stats.block_size,
            MAX_NAME_LEN as u32,
            stats.block_size,
        );
    }
}
