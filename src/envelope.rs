//! The compressed container around a save's property archive.
//!
//! Every save starts with a 12 byte header: the payload's uncompressed
//! length, a compressed length, a three byte magic and a format byte. The
//! magic and format byte must agree.
//!
//! | Magic | Format | Payload |
//! |-------|--------|---------|
//! | `PlZ` | `0x32` | zlib applied twice |
//! | `PlM` | `0x31` | oodle |
//! | `CNK` | `0x30` | a second header at offset 12, then its payload |
//!
//! ```text
//! SaveCodec
//! ├── check_sav_format() → FormatTag (magic only)
//! ├── SaveHeader::from_slice() → validated lengths, tag, chunk wrapper
//! └── backend by tag
//!     ├── ZlibBackend  (PlZ, CNK)
//!     └── OodleBackend (PlM, needs an OodleLibrary)
//! ```

mod codec;
mod errors;
mod header;

pub use codec::*;
pub use errors::*;
pub use header::*;
