//! Tag block encoder and decoder.

use tagwire_core::{SECTIONS, SLOTS_PER_SECTION, TagSet};
use tracing::trace;

use crate::error::{CodecError, CodecResult};
use crate::mask::{decode_mask, encode_mask, mask_len};
use crate::wire::{WireReader, WireSink, WireSource, WireWriter};

/// Append the tag block for `tags` to `sink`.
///
/// Chunks go out in ascending section order, payload bytes in ascending slot
/// order. The output is deterministic: equal sets always produce equal bytes.
pub fn encode<S: WireSink + ?Sized>(tags: &TagSet, sink: &mut S) {
    sink.put_u8(tags.header());
    for (_, chunk) in tags.chunks() {
        encode_mask(chunk.mask(), sink);
        sink.put_slice(chunk.slots());
    }
}

/// Append the block for a record that has no tags: a single zero header.
pub fn encode_empty<S: WireSink + ?Sized>(sink: &mut S) {
    sink.put_u8(0);
}

/// Encode `tags` into a fresh buffer sized with [`encoded_len`].
#[must_use]
pub fn encode_to_vec(tags: &TagSet) -> Vec<u8> {
    let mut writer = WireWriter::with_capacity(encoded_len(tags));
    encode(tags, &mut writer);
    writer.into_bytes()
}

/// Exact number of bytes [`encode`] writes for `tags`.
#[must_use]
pub fn encoded_len(tags: &TagSet) -> usize {
    tags.chunks().fold(1usize, |total, (_, chunk)| {
        total
            .saturating_add(mask_len(chunk.mask()))
            .saturating_add(chunk.slots().len())
    })
}

/// Read one tag block from `source`.
///
/// Reading stops right after the block, so the caller can keep consuming the
/// same source. Zero payload bytes and chunks whose mask is empty are legal on
/// the wire but leave no trace in the returned set.
///
/// # Errors
///
/// Returns an error if the source ends early or a mask byte is malformed.
/// The partially decoded set is discarded.
pub fn decode<S: WireSource + ?Sized>(source: &mut S) -> CodecResult<TagSet> {
    let header = source.take_u8().ok_or(CodecError::MissingHeader)?;
    let mut tags = TagSet::new();

    for section in (0..SECTIONS).filter(|s| header & 1u8.wrapping_shl(u32::from(*s)) != 0) {
        let mask = decode_mask(source, section)?;
        for slot in (0..SLOTS_PER_SECTION).filter(|s| mask & 1u32.wrapping_shl(u32::from(*s)) != 0) {
            let bits = source.take_u8().ok_or(CodecError::UnexpectedEof {
                section,
                context: "slot payload",
            })?;
            tags.merge_slot(section, slot, bits);
        }
    }

    trace!(header, tags = tags.len(), "Decoded tag block");
    Ok(tags)
}

/// Decode a buffer that holds exactly one tag block.
///
/// # Errors
///
/// Returns any [`decode`] error, or [`CodecError::TrailingBytes`] if input is
/// left after the block.
pub fn decode_slice(bytes: &[u8]) -> CodecResult<TagSet> {
    let mut reader = WireReader::new(bytes);
    let tags = decode(&mut reader)?;
    reader.ensure_fully_consumed()?;
    Ok(tags)
}
