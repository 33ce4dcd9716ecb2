use crate::context::Context;
use crate::utils::arg_man::Command;

pub mod format;
pub mod info;
pub mod mount;
pub mod statfs;

pub fn dispatch(command: Command, context: &mut Context) -> anyhow::Result<()> {
    match command {
        Command::Mount {
            image,
            mountpoint,
            read_only,
            allow_other,
            auto_unmount,
            fsname,
        } => {
            let config = tosfs::fuse::MountConfig {
                fsname,
                read_only,
                allow_other,
                auto_unmount,
            };
            mount::handle(&image, &mountpoint, &config, context)
        }
        Command::Info { image } => info::handle(&image),
        Command::Statfs { image } => statfs::handle(&image, context),
        Command::Format {
            image,
            blocks,
            inodes,
            files,
        } => format::handle(&image, blocks, inodes, &files),
    }
}
