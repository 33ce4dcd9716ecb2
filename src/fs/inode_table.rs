use crate::fs::consts::{FIRST_INODE, INODE_SIZE};
use crate::fs::layout::Inode;
use memmap2::MmapMut;
use std::collections::BTreeSet;

/// Fixed-capacity inode array living directly in the mapped image.
///
/// Free allocatable slots are tracked in an ordered set so that claiming the lowest free slot
/// is a single step for whoever holds `&mut self`.
pub struct InodeTable {
    map: MmapMut,
    count: u32,
    free: BTreeSet<u32>,
}

impl InodeTable {
    pub fn new(map: MmapMut, count: u32) -> Self {
        debug_assert!(map.len() >= count as usize * INODE_SIZE);
        let mut table = Self {
            map,
            count,
            free: BTreeSet::new(),
        };
        table.free = (FIRST_INODE..count)
            .filter(|&ino| table.read(ino).is_free())
            .collect();
        table
    }

    pub fn capacity(&self) -> u32 {
        self.count
    }

    pub fn free_count(&self) -> u32 {
        self.free
            .iter()
            .filter(|&&ino| self.read(ino).is_free())
            .count() as u32
    }

    fn slot(&self, ino: u32) -> std::ops::Range<usize> {
        let start = ino as usize * INODE_SIZE;
        start..start + INODE_SIZE
    }

    fn read(&self, ino: u32) -> Inode {
        Inode::deserialize(&self.map[self.slot(ino)])
    }

    /// Returns the record at `ino`, free or not, for any `ino` in `[0, len)`.
    pub fn get(&self, ino: u32) -> Option<Inode> {
        (ino < self.count).then(|| self.read(ino))
    }

    /// Returns the record at `ino` only if it is allocatable and occupied.
    pub fn get_occupied(&self, ino: u32) -> Option<Inode> {
        if ino < FIRST_INODE {
            return None;
        }
        self.get(ino).filter(|i| !i.is_free())
    }

    /// Occupied allocatable slots in ascending order.
    pub fn occupied(&self) -> impl Iterator<Item = (u32, Inode)> + '_ {
        (FIRST_INODE..self.count)
            .map(|ino| (ino, self.read(ino)))
            .filter(|(_, i)| !i.is_free())
    }

    /// Takes the lowest free slot and writes `inode` into it. `inode.mode` must be non-zero.
    ///
    /// Slots filled behind our back through the shared mapping are dropped from the free set
    /// instead of being handed out.
    pub fn claim(&mut self, inode: Inode) -> Option<u32> {
        debug_assert!(!inode.is_free());
        let ino = loop {
            let ino = self.free.pop_first()?;
            if self.read(ino).is_free() {
                break ino;
            }
        };
        let slot = self.slot(ino);
        inode.serialize(&mut self.map[slot]);
        Some(ino)
    }

    pub fn flush(&self) -> std::io::Result<()> {
        self.map.flush()
    }
}
