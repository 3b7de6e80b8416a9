//! Prefix-coded slot occupancy mask.
//!
//! | Byte | Data bits | Prefix (bits 6..) | Prefix value |
//! |------|-----------|-------------------|--------------|
//! | 0    | 6 (0..=5) | `0`               | `0x00`       |
//! | 1    | 5 (6..=10) | `10`             | `0x40`       |
//! | 2    | 4 (11..=14) | `110`           | `0x60`       |
//! | 3    | 3 (15..=17) | `1110`          | `0x70`       |
//!
//! Bit 7 is the terminator flag and is set on the last byte only.

use crate::error::{CodecError, CodecResult};
use crate::wire::{WireSink, WireSource};

/// Terminator flag carried by the last mask byte.
pub const TERMINATOR: u8 = 0x80;

/// Upper bound on the number of mask bytes per chunk.
pub const MAX_MASK_BYTES: usize = 4;

/// Placement of one mask group inside the 18-bit mask and its byte.
struct Group {
    /// First mask bit carried by this byte.
    shift: u8,
    /// Data bits of the byte.
    data: u8,
    /// Bits 0..=6 that form the fixed prefix.
    prefix_mask: u8,
    /// Required value of those bits.
    prefix: u8,
}

const GROUPS: [Group; MAX_MASK_BYTES] = [
    Group {
        shift: 0,
        data: 0x3F,
        prefix_mask: 0x40,
        prefix: 0x00,
    },
    Group {
        shift: 6,
        data: 0x1F,
        prefix_mask: 0x60,
        prefix: 0x40,
    },
    Group {
        shift: 11,
        data: 0x0F,
        prefix_mask: 0x70,
        prefix: 0x60,
    },
    Group {
        shift: 15,
        data: 0x07,
        prefix_mask: 0x78,
        prefix: 0x70,
    },
];

/// Minimal number of bytes that encode `mask`.
///
/// One byte covers slots 0–5, two cover 6–10, three cover 11–14 and four
/// cover 15–17. An empty mask still takes one byte.
#[must_use]
pub fn mask_len(mask: u32) -> usize {
    match mask {
        0..0x40 => 1,
        0x40..0x800 => 2,
        0x800..0x8000 => 3,
        _ => MAX_MASK_BYTES,
    }
}

#[allow(clippy::cast_possible_truncation)]
fn group_byte(group: &Group, mask: u32) -> u8 {
    // Safety: the value is masked down to at most 6 bits before the cast
    let data = (mask.wrapping_shr(u32::from(group.shift)) & u32::from(group.data)) as u8;
    group.prefix | data
}

/// Write `mask` using the minimal number of bytes.
pub(crate) fn encode_mask<S: WireSink + ?Sized>(mask: u32, sink: &mut S) {
    let groups = GROUPS.get(..mask_len(mask)).unwrap_or(&GROUPS);
    let Some((last, leading)) = groups.split_last() else {
        return;
    };
    for group in leading {
        sink.put_u8(group_byte(group, mask));
    }
    sink.put_u8(group_byte(last, mask) | TERMINATOR);
}

/// Read a mask for chunk `section`, validating each byte's prefix.
pub(crate) fn decode_mask<S: WireSource + ?Sized>(source: &mut S, section: u8) -> CodecResult<u32> {
    let mut mask = 0u32;
    for (position, group) in GROUPS.iter().enumerate() {
        let byte = source.take_u8().ok_or(CodecError::UnexpectedEof {
            section,
            context: "slot mask",
        })?;
        if byte & group.prefix_mask != group.prefix {
            return Err(CodecError::MalformedContinuation {
                section,
                position,
                byte,
            });
        }
        mask |= u32::from(byte & group.data).wrapping_shl(u32::from(group.shift));
        if byte & TERMINATOR != 0 {
            return Ok(mask);
        }
    }
    Err(CodecError::UnterminatedMask { section })
}
