//! Property-based tests for storage selection
//!
//! Whatever the content, a file is stored compressed only when that is strictly
//! smaller, and reading it back always yields the original bytes.

use cartridge_embed::source::MemorySource;
use cartridge_embed::{CompressionConfig, EmbeddedFs, SnapshotBuilder, Storage};
use proptest::prelude::*;

fn content_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop_oneof![
        prop::collection::vec(any::<u8>(), 0..4096),
        (prop::collection::vec(any::<u8>(), 1..16), 1usize..400)
            .prop_map(|(unit, times)| unit.repeat(times)),
    ]
}

fn config_strategy() -> impl Strategy<Value = CompressionConfig> {
    prop_oneof![
        Just(CompressionConfig::lz4()),
        (1i32..=9).prop_map(|level| CompressionConfig::zstd().with_level(level)),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_compressed_only_when_smaller(
        files in prop::collection::vec(content_strategy(), 1..8),
        config in config_strategy()
    ) {
        let mut source = MemorySource::new();
        for (i, data) in files.iter().enumerate() {
            source.add_file(&format!("/dir{}/file{}.bin", i % 3, i), data.clone(), None);
        }

        let snapshot = SnapshotBuilder::new().compression(config.clone()).build(&source).unwrap();

        let mut any_compressed = false;
        let mut any_raw = false;
        for record in snapshot.files() {
            match &record.storage {
                Storage::Compressed { method, content } => {
                    prop_assert_eq!(*method, config.method);
                    prop_assert!((content.len() as u64) < record.uncompressed_size);
                    any_compressed = true;
                }
                Storage::Raw { content } => {
                    prop_assert_eq!(content.len() as u64, record.uncompressed_size);
                    any_raw = true;
                }
            }
            if record.uncompressed_size == 0 {
                prop_assert!(!record.storage.is_compressed());
            }
        }
        prop_assert_eq!(snapshot.has_compressed_file(), any_compressed);
        prop_assert_eq!(snapshot.has_file(), any_raw);

        let fs = EmbeddedFs::new(snapshot);
        for (i, data) in files.iter().enumerate() {
            let read = fs.read(&format!("dir{}/./file{}.bin", i % 3, i)).unwrap();
            prop_assert_eq!(&read, data);
        }
    }

    #[test]
    fn prop_stats_account_for_every_file(
        files in prop::collection::vec(content_strategy(), 0..8)
    ) {
        let mut source = MemorySource::new();
        for (i, data) in files.iter().enumerate() {
            source.add_file(&format!("/f{}", i), data.clone(), None);
        }
        let snapshot = SnapshotBuilder::new().build(&source).unwrap();
        let stats = snapshot.stats();

        prop_assert_eq!(stats.raw_files + stats.compressed_files, files.len());
        prop_assert_eq!(stats.directories, 1);
        prop_assert_eq!(
            stats.total_bytes,
            files.iter().map(|f| f.len() as u64).sum::<u64>()
        );
        prop_assert!(stats.stored_bytes <= stats.total_bytes);
    }
}
