/*!

A codec for [Palworld](https://en.wikipedia.org/wiki/Palworld) `.sav` files
and the binary records embedded in their property archives.

A save is a small header wrapped around a compressed property archive. The
header's magic picks one of two compression backends:

- `PlZ`: zlib applied twice
- `PlM`: oodle, through a native library supplied at runtime
- `CNK`: a chunk wrapper around one of the two

Inside the archive, several properties hold opaque byte arrays whose layout
depends on a type tag stored elsewhere in the tree. The [`rawdata`] module
decodes those into typed records, and the encoder writes them back byte for
byte. Anything it does not understand is kept as raw bytes.

## Quick Start

Round trip a payload through a zlib container:

```rust
use palsav::{FormatTag, SaveCodec};

let codec = SaveCodec::new();
let payload = b"GVAS property archive";
let file = codec.compress(payload, FormatTag::Zlib)?;
assert_eq!(&file[8..12], b"PlZ\x32");

let (decompressed, format) = codec.decompress(&file)?;
assert_eq!(decompressed, payload);
assert_eq!(format, FormatTag::Zlib);
# Ok::<(), palsav::Error>(())
```

Oodle saves need the native library, loaded once and handed to the codec:

```rust,no_run
# #[cfg(feature = "ooz")] {
use palsav::{compression::OozLibrary, SaveCodec};

let lib = OozLibrary::load("lib")?;
let codec = SaveCodec::builder().oodle(lib).build();
let data = std::fs::read("Level.sav").map_err(palsav::envelope::EnvelopeError::from)?;
let (payload, _format) = codec.decompress(&data)?;
# }
# Ok::<(), palsav::Error>(())
```

## Raw Records

Once the archive has been parsed into a [`Property`] tree, the
[`rawdata::RawDataRules`] table swaps the known byte arrays for records and
converts them back before the archive is written:

```rust
use palsav::{rawdata::RawDataRules, Property};

let rules = RawDataRules::default();
let mut tree = Property::Struct(vec![]);
let summary = rules.decode_tree(&mut tree)?;
assert_eq!(summary.total(), 0);
rules.encode_tree(&mut tree);
# Ok::<(), palsav::Error>(())
```

Decoding never aborts on unfamiliar data, a failed or unknown record is
logged through the [`log`](https://docs.rs/log) facade and kept verbatim.

## Features

- `ooz` (default): load the native oodle codec with
  [`compression::OozLibrary`]
- `serde`: derive `Serialize` and `Deserialize` for records and the
  property tree

*/

pub mod archive;
pub mod compression;
pub mod envelope;
mod errors;
mod property;
pub mod rawdata;
pub(crate) mod util;

pub use self::envelope::{
    compress_from_payload, decompress_to_payload, FormatTag, SaveCodec, SaveCodecBuilder,
    SaveHeader,
};
pub use self::errors::*;
pub use self::property::Property;
pub use self::rawdata::{RawData, RawDataKind, RawDataRules};
