pub mod consts;
pub mod filesystem;
pub mod inode_table;
pub mod io;
pub mod layout;
pub mod naming;
pub mod superblock;
