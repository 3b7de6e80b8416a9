//! Codec error types.

use thiserror::Error;

/// Errors raised while reading or writing wire data.
///
/// Every decode error invalidates the whole tag block of the record being
/// read. The codec never tries to resynchronize.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// The stream ended before the tag header byte.
    #[error("tag block is missing its header byte")]
    MissingHeader,

    /// The stream ended inside a chunk.
    #[error("tag block ended inside chunk {section} while reading {context}")]
    UnexpectedEof {
        /// Chunk being decoded.
        section: u8,
        /// What was being read.
        context: &'static str,
    },

    /// A mask byte's fixed prefix does not match its position.
    #[error(
        "malformed slot mask in chunk {section}: byte {position} is {byte:#04x}, prefix does not match"
    )]
    MalformedContinuation {
        /// Chunk being decoded.
        section: u8,
        /// Index of the offending byte within the mask (0..4).
        position: usize,
        /// The offending byte.
        byte: u8,
    },

    /// The fourth mask byte does not carry the terminator flag.
    #[error("slot mask in chunk {section} is not terminated after four bytes")]
    UnterminatedMask {
        /// Chunk being decoded.
        section: u8,
    },

    /// A fixed-width read ran past the end of the buffer.
    #[error("truncated input: needed {needed} bytes, {remaining} remaining")]
    Truncated {
        /// Bytes the read required.
        needed: usize,
        /// Bytes left in the buffer.
        remaining: usize,
    },

    /// Bytes were left over after a complete decode.
    #[error("{count} trailing bytes after decode")]
    TrailingBytes {
        /// Number of unread bytes.
        count: usize,
    },

    /// A length prefix does not fit in 32 bits.
    #[error("length {len} exceeds the u32 length prefix")]
    LengthOverflow {
        /// The rejected length.
        len: usize,
    },
}

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;
