use criterion::{Criterion, criterion_group, criterion_main};
use olelib::OleFile;
use std::io::Cursor;

#[allow(dead_code, clippy::all)]
#[path = "../tests/common/mod.rs"]
mod common;

#[allow(clippy::expect_used)]
fn bench_olefile_parsing(c: &mut Criterion) {
    let payload: Vec<u8> = (0..1024 * 1024).map(|i: u32| (i % 251) as u8).collect();
    let mut builder = common::CompoundFileBuilder::new().stream("Big", &payload);
    for i in 0..200 {
        builder = builder.stream(&format!("Storage{}/Small{i}", i % 10), &payload[..1000]);
    }
    let bytes = builder.build();

    c.bench_function("olefile_parse_1mb", |b| {
        b.iter(|| {
            let ole = OleFile::from_reader(Cursor::new(std::hint::black_box(bytes.as_slice())))
                .expect("Failed to parse compound file");
            std::hint::black_box(ole);
        });
    });

    c.bench_function("olefile_read_large_stream", |b| {
        let mut ole = OleFile::from_reader(Cursor::new(bytes.as_slice()))
            .expect("Failed to parse compound file");
        b.iter(|| {
            let data = ole.read_stream(&["Big"]).expect("Failed to read stream");
            std::hint::black_box(data);
        });
    });

    c.bench_function("olefile_read_mini_streams", |b| {
        let mut ole = OleFile::from_reader(Cursor::new(bytes.as_slice()))
            .expect("Failed to parse compound file");
        let streams = ole.list_streams();
        b.iter(|| {
            for path in &streams {
                let parts: Vec<&str> = path.iter().map(String::as_str).collect();
                std::hint::black_box(ole.read_stream(&parts).expect("Failed to read stream"));
            }
        });
    });
}

criterion_group!(
    name = olelib_benches;
    config = Criterion::default().sample_size(20);
    targets = bench_olefile_parsing
);
criterion_main!(olelib_benches);
