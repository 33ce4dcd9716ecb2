use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("cannot open image {path}: {source}")]
    ImageOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot map {region} region: {source}")]
    Mapping {
        region: &'static str,
        #[source]
        source: io::Error,
    },
    #[error("invalid filesystem: wrong magic number {0:#x}")]
    InvalidMagic(u32),
    #[error("invalid filesystem geometry: {0}")]
    BadGeometry(String),
    #[error("image too small: need {needed} bytes, have {actual}")]
    ImageTooSmall { needed: u64, actual: u64 },
    #[error("no such inode")]
    NotFound,
    #[error("not a directory")]
    NotDirectory,
    #[error("inode table is full")]
    NoSpace,
    #[error("out of memory")]
    OutOfMemory,
    #[error("inode {0} points outside the data region")]
    Corrupted(u32),
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl Error {
    /// Errno reported to the kernel for this error.
    pub fn errno(&self) -> libc::c_int {
        match self {
            Error::NotFound => libc::ENOENT,
            Error::NotDirectory => libc::ENOTDIR,
            Error::NoSpace => libc::ENOSPC,
            Error::OutOfMemory => libc::ENOMEM,
            Error::InvalidMagic(_) | Error::BadGeometry(_) | Error::ImageTooSmall { .. } => {
                libc::EINVAL
            }
            Error::Io(e) => e.raw_os_error().unwrap_or(libc::EIO),
            Error::ImageOpen { .. } | Error::Mapping { .. } | Error::Corrupted(_) => libc::EIO,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
