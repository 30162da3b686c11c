#![no_main]
use arbitrary::Arbitrary;
use cartridge_embed::source::MemorySource;
use cartridge_embed::{CompressionConfig, EmbeddedFs, SnapshotBuilder};
use libfuzzer_sys::fuzz_target;
use std::io::{Cursor, Read, Seek, SeekFrom};

#[derive(Arbitrary, Debug)]
enum Op {
    Start(u16),
    Current(i16),
    End(i16),
    Read(u16),
}

#[derive(Arbitrary, Debug)]
struct Input {
    lz4: bool,
    content: Vec<u8>,
    ops: Vec<Op>,
}

fn apply<R: Read + Seek>(target: &mut R, op: &Op) -> Result<Vec<u8>, std::io::ErrorKind> {
    let result = match *op {
        Op::Start(n) => target.seek(SeekFrom::Start(n as u64)).map(|p| p.to_le_bytes().to_vec()),
        Op::Current(n) => target.seek(SeekFrom::Current(n as i64)).map(|p| p.to_le_bytes().to_vec()),
        Op::End(n) => target.seek(SeekFrom::End(n as i64)).map(|p| p.to_le_bytes().to_vec()),
        Op::Read(n) => {
            let mut buf = Vec::new();
            target.take(n as u64).read_to_end(&mut buf).map(|_| buf)
        }
    };
    result.map_err(|e| e.kind())
}

// Embedded handles must behave exactly like a cursor over the original bytes
fuzz_target!(|input: Input| {
    let config = if input.lz4 {
        CompressionConfig::lz4()
    } else {
        CompressionConfig::zstd()
    };
    let source = MemorySource::new().with_file("/f", input.content.clone());
    let fs = EmbeddedFs::new(SnapshotBuilder::new().compression(config).build(&source).unwrap());

    let mut handle = fs.open("/f").unwrap();
    let mut oracle = Cursor::new(input.content);
    for op in &input.ops {
        assert_eq!(apply(&mut handle, op), apply(&mut oracle, op), "{:?}", op);
    }
});
