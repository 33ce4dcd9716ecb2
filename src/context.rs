use crate::utils::file_man;
use anyhow::{Context as _, anyhow};
use std::path::{Path, PathBuf};
use tosfs::{FileSystem, Image};

/// The image a command works on, mapped once and shared by the command.
pub struct Context {
    fs: Option<FileSystem>,
    fs_path: Option<PathBuf>,
}

impl Context {
    pub fn new() -> Self {
        Self {
            fs: None,
            fs_path: None,
        }
    }

    pub fn open_fs<P: AsRef<Path>>(&mut self, path: P) -> anyhow::Result<()> {
        let path = path.as_ref();
        file_man::check_image(path)?;
        let image = Image::open(path)
            .with_context(|| format!("cannot mount image '{}'", path.display()))?;

        self.fs_path = Some(path.to_path_buf());
        self.fs = Some(FileSystem::new(image));
        Ok(())
    }

    pub fn fs(&self) -> anyhow::Result<&FileSystem> {
        self.fs
            .as_ref()
            .ok_or_else(|| anyhow!("filesystem image is not opened"))
    }

    /// Hands the opened filesystem over to a long-running owner, such as a mount session.
    pub fn take_fs(&mut self) -> anyhow::Result<FileSystem> {
        self.fs
            .take()
            .ok_or_else(|| anyhow!("filesystem image is not opened"))
    }

    pub fn fs_path(&self) -> Option<&Path> {
        self.fs_path.as_deref()
    }
}
