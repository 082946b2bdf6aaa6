use flate2::{write::ZlibEncoder, Compression};
use palsav::compression::{OodleCompressor, OodleLevel, OodleLibrary};
use palsav::envelope::{build_envelope, EnvelopeErrorKind, LengthField};
use palsav::{compress_from_payload, decompress_to_payload, FormatTag, SaveCodec, SaveHeader};
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn deflate(data: &[u8]) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

/// Stores payloads reversed so a mixed up buffer is noticed
#[derive(Debug, Default, Clone)]
struct ReversingLibrary {
    calls: Arc<AtomicUsize>,
}

impl OodleLibrary for ReversingLibrary {
    fn compress(
        &self,
        _compressor: OodleCompressor,
        src: &[u8],
        dst: &mut [u8],
        _level: OodleLevel,
    ) -> i64 {
        self.calls.fetch_add(1, Ordering::SeqCst);
        for (d, s) in dst.iter_mut().zip(src.iter().rev()) {
            *d = *s;
        }
        src.len() as i64
    }

    fn decompress(&self, src: &[u8], dst: &mut [u8], expected_len: usize) -> i64 {
        self.calls.fetch_add(1, Ordering::SeqCst);
        for (d, s) in dst.iter_mut().zip(src.iter().rev()) {
            *d = *s;
        }
        src.len().min(expected_len) as i64
    }
}

#[test]
fn test_ten_byte_zlib_save() {
    let payload = b"0123456789";
    let first = deflate(payload);
    let second = deflate(&first);
    let data = build_envelope(&second, 10, first.len() as u32, b"PlZ", 0x32);

    let (decompressed, format) = decompress_to_payload(&data).unwrap();
    assert_eq!(decompressed, payload);
    assert_eq!(format, FormatTag::Zlib);
}

#[test]
fn test_chunk_tagged_zlib_inflates_once() {
    let payload = b"chunked payload!";
    let stored = deflate(payload);

    let mut data = Vec::new();
    data.extend_from_slice(&16u32.to_le_bytes());
    data.extend_from_slice(&(stored.len() as u32).to_le_bytes());
    data.extend_from_slice(b"CNK\x30");
    data.extend_from_slice(&build_envelope(&stored, 16, stored.len() as u32, b"PlZ", 0x30));

    let (decompressed, format) = decompress_to_payload(&data).unwrap();
    assert_eq!(decompressed, payload);
    assert_eq!(format, FormatTag::Chunked);

    let (_, header) = SaveCodec::new().decompress_with_header(&data).unwrap();
    assert!(header.is_chunked());
    assert_eq!(header.to_bytes(), &data[..24]);
}

#[test]
fn test_compressed_len_is_first_pass() {
    let payload = vec![b'a'; 4096];
    let data = compress_from_payload(&payload, FormatTag::Zlib).unwrap();
    let header = SaveHeader::from_slice(&data).unwrap();
    assert_eq!(header.uncompressed_len(), 4096);
    assert_eq!(header.compressed_len() as usize, deflate(&payload).len());
    assert_ne!(header.compressed_len() as usize, data.len() - 12);
}

#[test]
fn test_zlib_length_mismatch() {
    let payload = b"0123456789";
    let first = deflate(payload);
    let second = deflate(&first);
    let data = build_envelope(&second, 11, first.len() as u32, b"PlZ", 0x32);

    let err = decompress_to_payload(&data).unwrap_err();
    match err.kind() {
        EnvelopeErrorKind::LengthMismatch {
            field,
            expected,
            actual,
        } => {
            assert_eq!(*field, LengthField::Uncompressed);
            assert_eq!(*expected, 11);
            assert_eq!(*actual, 10);
        }
        x => panic!("unexpected error: {:?}", x),
    }
}

#[test]
fn test_truncated_chunked_oodle_skips_native_call() {
    let lib = ReversingLibrary::default();
    let calls = lib.calls.clone();
    let codec = SaveCodec::builder().oodle(lib).build();

    let mut data = Vec::new();
    data.extend_from_slice(&200u32.to_le_bytes());
    data.extend_from_slice(&100u32.to_le_bytes());
    data.extend_from_slice(b"CNK0");
    data.extend_from_slice(&200u32.to_le_bytes());
    data.extend_from_slice(&100u32.to_le_bytes());
    data.extend_from_slice(b"PlM1");
    data.extend_from_slice(&[0xaa; 10]);

    let err = codec.decompress(&data).unwrap_err();
    assert!(matches!(err.kind(), EnvelopeErrorKind::Truncated { .. }));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_oodle_roundtrip() {
    let lib = ReversingLibrary::default();
    let calls = lib.calls.clone();
    let codec = SaveCodec::builder()
        .oodle(lib)
        .oodle_compressor(OodleCompressor::Kraken)
        .oodle_level(OodleLevel::Optimal2)
        .build();

    let payload = b"GVAS\x03\0\0\0property archive";
    let data = codec.compress(payload, FormatTag::Oodle).unwrap();
    assert_eq!(&data[8..12], b"PlM1");

    let (decompressed, format) = codec.decompress(&data).unwrap();
    assert_eq!(decompressed, payload);
    assert_eq!(format, FormatTag::Oodle);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_oodle_without_library() {
    let data = build_envelope(&[0; 16], 4, 16, b"PlM", 0x31);
    let err = decompress_to_payload(&data).unwrap_err();
    assert!(matches!(err.kind(), EnvelopeErrorKind::OodleUnavailable));

    let err = compress_from_payload(b"abc", FormatTag::Oodle).unwrap_err();
    assert!(matches!(err.kind(), EnvelopeErrorKind::OodleUnavailable));
}

#[test]
fn test_empty_oodle_input() {
    let codec = SaveCodec::builder()
        .oodle(ReversingLibrary::default())
        .build();
    let err = codec.compress(&[], FormatTag::Oodle).unwrap_err();
    assert!(matches!(err.kind(), EnvelopeErrorKind::EmptyInput));
}

#[test]
fn test_unknown_magic_reported() {
    let data = build_envelope(&[0; 16], 4, 16, b"ABC", 0x32);
    let err = decompress_to_payload(&data).unwrap_err();
    assert!(matches!(err.kind(), EnvelopeErrorKind::UnknownFormat(0x32)));
}
