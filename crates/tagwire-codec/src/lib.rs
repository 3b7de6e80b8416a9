//! Tagwire Codec - wire encoding of tag sets.
//!
//! A tag block is appended right after a record the host has already
//! serialized. Its layout follows the two levels of a
//! [`TagSet`](tagwire_core::TagSet):
//!
//! ```text
//! tag_data      := header_byte (chunk_body){popcount(header_byte)}
//! header_byte   := bit i set iff chunk i is present
//! chunk_body    := mask_bytes payload_bytes
//! mask_bytes    := 1..4 bytes, prefix-coded 18-bit slot mask
//! payload_bytes := one byte per set mask bit, ascending slot order
//! ```
//!
//! A record without tags costs exactly one `0x00` byte.
//!
//! The slot mask is split into groups of 6, 5, 4 and 3 bits, low group
//! first. Every mask byte carries a fixed prefix in bits 6 and down that
//! identifies its position (`0`, `10`, `110`, `1110`) and a terminator flag
//! in bit 7 on the last byte. A chunk whose highest slot is below 6 pays a
//! single mask byte.
//!
//! # Example
//!
//! ```rust
//! use tagwire_codec::{decode_slice, encode_to_vec};
//! use tagwire_core::{TagId, TagSet};
//!
//! let tags: TagSet = [0, 2].into_iter().filter_map(TagId::new).collect();
//! let bytes = encode_to_vec(&tags);
//! assert_eq!(bytes, [0x01, 0x81, 0x05]);
//! assert_eq!(decode_slice(&bytes).unwrap(), tags);
//!
//! assert_eq!(encode_to_vec(&TagSet::new()), [0x00]);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod codec;
mod error;
mod mask;
mod wire;

pub use codec::{decode, decode_slice, encode, encode_empty, encode_to_vec, encoded_len};
pub use error::{CodecError, CodecResult};
pub use mask::{MAX_MASK_BYTES, TERMINATOR, mask_len};
pub use wire::{WireReader, WireSink, WireSource, WireWriter};
