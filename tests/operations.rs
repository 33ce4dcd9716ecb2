mod common;

use std::sync::Arc;

use common::{TestImage, names};
use tosfs::fs::layout::{Inode, S_IFREG};
use tosfs::{Error, FileKind, ROOT_INODE, name_of};

#[test]
fn create_fills_slots_in_order() {
    let img = TestImage::new(8, 8);
    let fs = img.mount();

    let first = fs.create(ROOT_INODE, "a.txt", 0o644).unwrap();
    assert_eq!(first.ino, 2);
    assert_eq!(first.attr.perm, 0o644);
    assert_eq!(first.attr.size, 0);
    assert_eq!(first.attr.nlink, 1);
    assert_eq!(first.attr.kind, FileKind::RegularFile);

    let second = fs.create(ROOT_INODE, "b.txt", 0o644).unwrap();
    assert_eq!(second.ino, 3);

    assert_eq!(names(&fs), [".", "..", "file2", "file3"]);
}

#[test]
fn read_of_created_file_is_empty() {
    let img = TestImage::new(8, 8);
    let fs = img.mount();
    let entry = fs.create(ROOT_INODE, "x", 0o644).unwrap();
    assert_eq!(fs.read(entry.ino, 0, 100).unwrap(), Vec::<u8>::new());
}

#[test]
fn create_on_full_table_fails_without_changes() {
    let img = TestImage::new(8, 4);
    let fs = img.mount();
    assert_eq!(fs.create(ROOT_INODE, "a", 0o644).unwrap().ino, 2);
    assert_eq!(fs.create(ROOT_INODE, "b", 0o644).unwrap().ino, 3);

    let before = fs.readdir(ROOT_INODE, 0).unwrap();
    assert!(matches!(fs.create(ROOT_INODE, "c", 0o644), Err(Error::NoSpace)));
    assert!(matches!(fs.create(ROOT_INODE, "c", 0o644), Err(Error::NoSpace)));
    assert_eq!(fs.readdir(ROOT_INODE, 0).unwrap(), before);
    assert_eq!(fs.stats().free_inodes, 0);
}

#[test]
fn free_slots_are_invisible() {
    let img = TestImage::new(8, 8);
    let fs = img.mount();
    fs.create(ROOT_INODE, "a", 0o644).unwrap();

    for ino in 3..8 {
        assert!(matches!(fs.getattr(ino), Err(Error::NotFound)), "getattr {ino}");
        assert!(
            matches!(fs.lookup(ROOT_INODE, &name_of(ino)), Err(Error::NotFound)),
            "lookup {ino}"
        );
        for offset in [0, 1, 4096] {
            assert!(matches!(fs.read(ino, offset, 10), Err(Error::NotFound)));
        }
    }
    assert!(matches!(fs.getattr(0), Err(Error::NotFound)));
}

#[test]
fn lookup_finds_every_occupied_slot() {
    let img = TestImage::with_files(8, 8, &[b"one", b"two", b"three"]);
    let fs = img.mount();
    fs.create(ROOT_INODE, "new", 0o600).unwrap();

    for ino in 2..6 {
        let entry = fs.lookup(ROOT_INODE, &name_of(ino)).unwrap();
        assert_eq!(entry.ino, ino);
        assert_eq!(entry.attr, fs.getattr(ino).unwrap());
        assert_eq!(entry.entry_ttl, tosfs::ENTRY_TTL);
    }
    assert_eq!(fs.lookup(ROOT_INODE, "file5").unwrap().attr.perm, 0o600);
}

#[test]
fn lookup_rejects_bad_names_and_parents() {
    let img = TestImage::with_files(8, 8, &[b"data"]);
    let fs = img.mount();

    for name in ["file0", "file1", "file8", "file100", "file", "foo", "file02", "abcd2"] {
        assert!(
            matches!(fs.lookup(ROOT_INODE, name), Err(Error::NotFound)),
            "{name}"
        );
    }
    assert!(matches!(fs.lookup(2, "file2"), Err(Error::NotFound)));
    assert!(matches!(fs.lookup(0, "file2"), Err(Error::NotFound)));
}

#[test]
fn root_attributes_are_synthetic() {
    let img = TestImage::new(8, 8);
    let fs = img.mount();
    let attr = fs.getattr(ROOT_INODE).unwrap();
    assert_eq!(attr.kind, FileKind::Directory);
    assert_eq!(attr.perm, 0o755);
    assert_eq!(attr.nlink, 2);
    assert_eq!(attr.blocks, 0);
    assert!(matches!(fs.getattr(8), Err(Error::NotFound)));
    assert!(matches!(fs.getattr(u32::MAX), Err(Error::NotFound)));
}

#[test]
fn readdir_lists_dots_then_ascending_slots() {
    let img = TestImage::with_files(8, 16, &[b"a", b"b", b"c"]);
    // free slot 3 in the middle of the table
    img.poke_inode(3, Inode::default());
    let fs = img.mount();

    let entries = fs.readdir(ROOT_INODE, 0).unwrap();
    assert_eq!(entries.len(), 2 + 2);
    assert_eq!(entries[0].name, ".");
    assert_eq!(entries[1].name, "..");
    assert_eq!(entries[0].ino, ROOT_INODE);
    assert_eq!(entries[2].name, "file2");
    assert_eq!(entries[3].name, "file4");
    assert!(entries.windows(2).skip(1).all(|w| w[0].ino < w[1].ino));
    assert_eq!(
        entries.iter().map(|e| e.next).collect::<Vec<_>>(),
        [1, 2, 3, 4]
    );

    // a reused slot keeps the order stable
    assert_eq!(fs.create(ROOT_INODE, "z", 0o644).unwrap().ino, 3);
    assert_eq!(names(&fs), [".", "..", "file2", "file3", "file4"]);
}

#[test]
fn readdir_resumes_from_offset() {
    let img = TestImage::with_files(8, 8, &[b"a", b"b"]);
    let fs = img.mount();

    let rest = fs.readdir(ROOT_INODE, 2).unwrap();
    assert_eq!(
        rest.iter().map(|e| e.name.as_str()).collect::<Vec<_>>(),
        ["file2", "file3"]
    );
    assert_eq!(rest[0].next, 3);
    assert!(fs.readdir(ROOT_INODE, 4).unwrap().is_empty());
    assert!(fs.readdir(ROOT_INODE, 100).unwrap().is_empty());
}

#[test]
fn readdir_outside_root_is_not_a_directory() {
    let img = TestImage::with_files(8, 8, &[b"a"]);
    let fs = img.mount();
    assert!(matches!(fs.readdir(2, 0), Err(Error::NotDirectory)));
    assert!(matches!(fs.readdir(0, 0), Err(Error::NotDirectory)));
}

#[test]
fn read_returns_file_bytes_within_size() {
    let img = TestImage::with_files(8, 8, &[b"first", b"hello world"]);
    let fs = img.mount();

    assert_eq!(fs.read(2, 0, 100).unwrap(), b"first");
    assert_eq!(fs.read(3, 0, 100).unwrap(), b"hello world");
    assert_eq!(fs.read(3, 6, 3).unwrap(), b"wor");
    assert_eq!(fs.read(3, 6, 0).unwrap(), b"");
    // exactly at the end is EOF, not an error
    assert_eq!(fs.read(3, 11, 10).unwrap(), b"");
    assert_eq!(fs.read(3, 5000, 10).unwrap(), b"");
}

#[test]
fn read_never_leaves_the_file_block() {
    let img = TestImage::with_files(4, 8, &[b"abc"]);
    img.poke_inode(
        2,
        Inode {
            mode: S_IFREG | 0o644,
            nlink: 1,
            size: 3 * tosfs::BLOCK_SIZE,
            block_no: 3,
        },
    );
    img.poke_inode(
        3,
        Inode {
            mode: S_IFREG | 0o644,
            nlink: 1,
            size: 10,
            block_no: 99,
        },
    );
    let fs = img.mount();

    let data = fs.read(2, 0, u32::MAX).unwrap();
    assert_eq!(data.len(), tosfs::BLOCK_SIZE as usize);
    assert!(fs.read(2, tosfs::BLOCK_SIZE as u64, 10).unwrap().is_empty());
    assert!(matches!(fs.read(3, 0, 10), Err(Error::Corrupted(3))));
}

#[test]
fn create_skips_slot_filled_by_another_writer() {
    let img = TestImage::new(8, 8);
    let fs = img.mount();
    img.poke_inode(
        2,
        Inode {
            mode: S_IFREG | 0o600,
            nlink: 1,
            size: 5,
            block_no: 0,
        },
    );
    assert_eq!(fs.getattr(2).unwrap().perm, 0o600);

    assert_eq!(fs.create(ROOT_INODE, "x", 0o644).unwrap().ino, 3);
    let attr = fs.getattr(2).unwrap();
    assert_eq!(attr.perm, 0o600);
    assert_eq!(attr.size, 5);
}

#[test]
fn create_outside_root_is_refused() {
    let img = TestImage::new(8, 8);
    let fs = img.mount();
    assert!(matches!(fs.create(2, "x", 0o644), Err(Error::NotFound)));
    assert_eq!(fs.stats().used_inodes, 0);
}

#[test]
fn create_with_bare_mode_still_occupies_the_slot() {
    let img = TestImage::new(8, 8);
    let fs = img.mount();
    let entry = fs.create(ROOT_INODE, "x", 0).unwrap();
    assert_eq!(entry.attr.kind, FileKind::RegularFile);
    assert_eq!(entry.attr.perm, 0);
    assert!(fs.lookup(ROOT_INODE, "file2").is_ok());
    assert_eq!(fs.create(ROOT_INODE, "y", 0).unwrap().ino, 3);
}

#[test]
fn created_files_persist_in_the_image() {
    let img = TestImage::new(8, 8);
    {
        let fs = img.mount();
        fs.create(ROOT_INODE, "a", 0o640).unwrap();
        fs.create(ROOT_INODE, "b", 0o640).unwrap();
        fs.flush().unwrap();
    }
    let fs = img.mount();
    assert_eq!(names(&fs), [".", "..", "file2", "file3"]);
    assert_eq!(fs.getattr(3).unwrap().perm, 0o640);
    assert_eq!(fs.create(ROOT_INODE, "c", 0o640).unwrap().ino, 4);
}

#[test]
fn concurrent_creates_hand_out_distinct_slots() {
    let img = TestImage::new(8, 64);
    let fs = Arc::new(img.mount());

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let fs = Arc::clone(&fs);
            std::thread::spawn(move || {
                (0..10)
                    .map(|_| fs.create(ROOT_INODE, "f", 0o644).unwrap().ino)
                    .collect::<Vec<_>>()
            })
        })
        .collect();
    let mut inos: Vec<u32> = handles
        .into_iter()
        .flat_map(|h| h.join().unwrap())
        .collect();
    inos.sort_unstable();
    assert_eq!(inos, (2..42).collect::<Vec<_>>());
    assert_eq!(fs.readdir(ROOT_INODE, 0).unwrap().len(), 2 + 40);
}

#[test]
fn stats_count_allocatable_slots() {
    let img = TestImage::with_files(8, 10, &[b"a"]);
    let fs = img.mount();
    let stats = fs.stats();
    assert_eq!(stats.inodes, 8);
    assert_eq!(stats.used_inodes, 1);
    assert_eq!(stats.free_inodes, 7);
    assert_eq!(stats.blocks, 8);
}
