//! Benchmarks for snapshot building and random access on compressed files

use cartridge_embed::source::MemorySource;
use cartridge_embed::{CompressionConfig, EmbeddedFs, SnapshotBuilder};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::RngCore;
use std::io::{Read, Seek, SeekFrom};

const FILE_SIZE: usize = 1024 * 1024;

fn sample_content() -> Vec<u8> {
    let line = b"<tr><td>cartridge</td><td>embedded</td><td>0123456789</td></tr>\n";
    line.iter().copied().cycle().take(FILE_SIZE).collect()
}

fn embedded(config: CompressionConfig) -> EmbeddedFs {
    let source = MemorySource::new().with_file("/table.html", sample_content());
    EmbeddedFs::new(SnapshotBuilder::new().compression(config).build(&source).unwrap())
}

fn configs() -> [(&'static str, CompressionConfig); 2] {
    [("zstd", CompressionConfig::zstd()), ("lz4", CompressionConfig::lz4())]
}

fn benchmark_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("snapshot_build");
    group.throughput(Throughput::Bytes(FILE_SIZE as u64));
    group.sample_size(20);

    let source = MemorySource::new().with_file("/table.html", sample_content());
    for (name, config) in configs() {
        group.bench_with_input(BenchmarkId::from_parameter(name), &config, |b, config| {
            b.iter(|| {
                let builder = SnapshotBuilder::new().compression(config.clone());
                black_box(builder.build(&source).unwrap());
            });
        });
    }

    group.finish();
}

fn benchmark_sequential_read(c: &mut Criterion) {
    let mut group = c.benchmark_group("sequential_read");
    group.throughput(Throughput::Bytes(FILE_SIZE as u64));

    for (name, config) in configs() {
        let fs = embedded(config);
        group.bench_function(BenchmarkId::from_parameter(name), |b| {
            b.iter(|| {
                let mut out = Vec::with_capacity(FILE_SIZE);
                fs.open("/table.html").unwrap().read_to_end(&mut out).unwrap();
                black_box(out);
            });
        });
    }

    group.finish();
}

fn benchmark_forward_seek(c: &mut Criterion) {
    let mut group = c.benchmark_group("forward_seek");

    for offset in [4 * 1024u64, 64 * 1024, 512 * 1024].iter() {
        let fs = embedded(CompressionConfig::zstd());
        group.bench_with_input(BenchmarkId::from_parameter(offset), offset, |b, &offset| {
            let mut buf = [0u8; 64];
            b.iter(|| {
                let mut handle = fs.open("/table.html").unwrap();
                handle.seek(SeekFrom::Start(black_box(offset))).unwrap();
                handle.read_exact(&mut buf).unwrap();
            });
        });
    }

    group.finish();
}

fn benchmark_backward_seek(c: &mut Criterion) {
    let mut group = c.benchmark_group("backward_seek");

    for offset in [4 * 1024u64, 64 * 1024, 512 * 1024].iter() {
        let fs = embedded(CompressionConfig::zstd());
        let mut handle = fs.open("/table.html").unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(offset), offset, |b, &offset| {
            let mut buf = [0u8; 64];
            b.iter(|| {
                // Decoder sits past `offset`, forcing a rewind on each read
                handle.seek(SeekFrom::Start(offset + 4096)).unwrap();
                handle.read_exact(&mut buf).unwrap();
                handle.seek(SeekFrom::Start(black_box(offset))).unwrap();
                handle.read_exact(&mut buf).unwrap();
            });
        });
    }

    group.finish();
}

fn benchmark_raw_random_access(c: &mut Criterion) {
    let mut noise = vec![0u8; FILE_SIZE];
    rand::thread_rng().fill_bytes(&mut noise);
    let source = MemorySource::new().with_file("/noise.bin", noise);
    let fs = EmbeddedFs::new(SnapshotBuilder::new().build(&source).unwrap());
    let mut handle = fs.open("/noise.bin").unwrap();

    c.bench_function("raw_random_access", |b| {
        let mut buf = [0u8; 64];
        let mut offset = 0u64;
        b.iter(|| {
            offset = (offset + 7919 * 64) % (FILE_SIZE as u64 - 64);
            handle.seek(SeekFrom::Start(offset)).unwrap();
            handle.read_exact(&mut buf).unwrap();
            black_box(&buf);
        });
    });
}

criterion_group!(
    benches,
    benchmark_build,
    benchmark_sequential_read,
    benchmark_forward_seek,
    benchmark_backward_seek,
    benchmark_raw_random_access
);
criterion_main!(benches);
