use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "tosfs", version, about = "Flat single-directory filesystem over a disk image")]
pub struct Cli {
    /// More log output (-v info, -vv debug, -vvv trace). RUST_LOG takes precedence.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Mount an image and serve it until unmounted
    Mount {
        image: PathBuf,
        mountpoint: PathBuf,
        #[arg(long)]
        read_only: bool,
        #[arg(long)]
        allow_other: bool,
        #[arg(long)]
        auto_unmount: bool,
        #[arg(long, default_value = "tosfs")]
        fsname: String,
    },
    /// Print the superblock fields of an image
    Info { image: PathBuf },
    /// Print inode usage of an image
    Statfs { image: PathBuf },
    /// Write a fresh image
    Format {
        image: PathBuf,
        /// Number of data blocks
        #[arg(long, default_value_t = 64)]
        blocks: u32,
        /// Inode table capacity, including the two reserved slots
        #[arg(long, default_value_t = 64)]
        inodes: u32,
        /// Host file to place in the image (at most one block), repeatable
        #[arg(long = "add", value_name = "HOST_FILE")]
        files: Vec<PathBuf>,
    },
}

impl Cli {
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
