#![no_main]
use cartridge_embed::source::MemorySource;
use cartridge_embed::{EmbeddedFs, SnapshotBuilder};
use libfuzzer_sys::fuzz_target;
use std::io::Read;
use std::sync::OnceLock;

fn fixture() -> &'static EmbeddedFs {
    static FS: OnceLock<EmbeddedFs> = OnceLock::new();
    FS.get_or_init(|| {
        let source = MemorySource::new()
            .with_file("/index.html", b"<p>fuzz</p>".repeat(200))
            .with_file("/a/b/c.txt", b"c".to_vec())
            .with_dir("/empty");
        EmbeddedFs::new(SnapshotBuilder::new().build(&source).unwrap())
    })
}

// Arbitrary paths must either resolve to a record or report NotFound, never panic
fuzz_target!(|path: &str| {
    let fs = fixture();
    match fs.open(path) {
        Ok(mut handle) => {
            if handle.is_dir() {
                let _ = handle.read_children(0);
            } else {
                let mut out = Vec::new();
                handle.read_to_end(&mut out).unwrap();
                assert_eq!(out.len() as u64, handle.stat().size);
            }
        }
        Err(e) => assert!(e.is_not_found()),
    }
});
