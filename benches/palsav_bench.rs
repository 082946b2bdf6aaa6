use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use palsav::archive::{ArchiveWriter, Guid};
use palsav::rawdata::{decode_record, Decoded, ItemContainerSlot, ItemId};
use palsav::{FormatTag, RawData, RawDataKind, SaveCodec};

fn payload(size: usize) -> Vec<u8> {
    // property archives are repetitive, but not a single run
    (0..size).map(|i| (i % 251) as u8 ^ (i / 4096) as u8).collect()
}

pub fn zlib_benchmark(c: &mut Criterion) {
    let codec = SaveCodec::new();
    let mut group = c.benchmark_group("zlib");
    for size in [1024, 64 * 1024, 1024 * 1024].iter() {
        let data = payload(*size);
        let file = codec.compress(&data, FormatTag::Zlib).unwrap();
        group.throughput(Throughput::Bytes(*size as u64));
        group.bench_with_input(BenchmarkId::new("compress", size), size, |b, &_size| {
            b.iter(|| codec.compress(black_box(&data), FormatTag::Zlib).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("decompress", size), size, |b, &_size| {
            b.iter(|| codec.decompress(black_box(&file)).unwrap())
        });
    }
    group.finish();
}

pub fn rawdata_benchmark(c: &mut Criterion) {
    let slot = ItemContainerSlot {
        slot_index: 3,
        count: 40,
        item: ItemId {
            static_id: "PalSphere_Legend".into(),
            ..Default::default()
        },
        ..Default::default()
    };
    let slot_bytes = Decoded::Record(slot).encode();

    let mut writer = ArchiveWriter::new();
    writer.guid(&Guid::from_bytes([7; 16]));
    writer.fstring("EPalGroupType::Guild");
    writer.u32(0);
    let truncated_group = writer.into_bytes();

    let mut group = c.benchmark_group("rawdata");
    group.throughput(Throughput::Bytes(slot_bytes.len() as u64));
    group.bench_function("item-slot", |b| {
        b.iter(|| decode_record::<ItemContainerSlot>("", black_box(&slot_bytes)).unwrap())
    });
    group.bench_function("fallback", |b| {
        b.iter(|| {
            RawData::decode(
                RawDataKind::Group,
                "EPalGroupType::Guild",
                black_box(&truncated_group),
            )
            .unwrap()
        })
    });
    group.finish();
}

criterion_group!(benches, zlib_benchmark, rawdata_benchmark);

criterion_main!(benches);
