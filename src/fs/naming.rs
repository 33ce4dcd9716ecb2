//! Maps inode numbers to the names visible in the root directory and back.
//!
//! Every occupied slot `n` shows up as `file<n>`. Nothing is stored on disk for names, so the
//! mapping lives here alone and the rest of the crate goes through these two functions.

use crate::fs::consts::NAME_PREFIX;

pub fn name_of(ino: u32) -> String {
    format!("{NAME_PREFIX}{ino}")
}

/// Decodes a `file<n>` name. Range and occupancy checks are left to the caller.
pub fn inode_of(name: &str) -> Option<u32> {
    let digits = name.strip_prefix(NAME_PREFIX)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    // non-canonical spellings ("file007") would break the bijection
    if digits.len() > 1 && digits.starts_with('0') {
        return None;
    }
    digits.parse().ok()
}
