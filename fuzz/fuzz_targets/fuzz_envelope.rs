#![no_main]
use libfuzzer_sys::fuzz_target;
use palsav::{envelope::check_sav_format, SaveCodec, SaveHeader};

fuzz_target!(|data: &[u8]| {
    let _ = check_sav_format(data);

    // a parsed header always writes back to the bytes it came from
    if let Ok(header) = SaveHeader::from_slice(data) {
        let bytes = header.to_bytes();
        assert_eq!(&data[..header.data_offset()], &bytes[..]);
    }

    let codec = SaveCodec::new();
    if let Ok((payload, _)) = codec.decompress(data) {
        let _ = codec.compress(&payload, palsav::FormatTag::Zlib);
    }
});
