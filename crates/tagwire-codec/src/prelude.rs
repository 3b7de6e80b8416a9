//! Prelude module - commonly used types for convenient import.
//!
//! Use `use tagwire_codec::prelude::*;` to import all essential types.

// Errors
pub use crate::{CodecError, CodecResult};

// Encoding and decoding
pub use crate::{decode, decode_slice, encode, encode_empty, encode_to_vec, encoded_len};

// Byte streams
pub use crate::{WireReader, WireSink, WireSource, WireWriter};
