//! Fixed bit layout of the tag identifier space.
//!
//! The identifier space is split into [`SECTIONS`] coarse chunks of
//! [`SLOTS_PER_SECTION`] fine slots, each slot holding [`BITS_PER_SLOT`]
//! tags. The wire format depends on these exact numbers: one header byte
//! carries a presence bit per section and the slot occupancy mask is an
//! 18-bit value split across at most four bytes. Peers that disagree on any
//! of them cannot talk to each other, so none of them is configurable.

/// Number of coarse chunks. One header bit each.
pub const SECTIONS: u8 = 8;

/// Number of fine slots per coarse chunk.
pub const SLOTS_PER_SECTION: u8 = 18;

/// Number of tags per fine slot. One payload byte each.
pub const BITS_PER_SLOT: u8 = 8;

/// Number of consecutive tag ids covered by one coarse chunk.
#[allow(clippy::arithmetic_side_effects)]
pub const TAGS_PER_SECTION: u16 = SLOTS_PER_SECTION as u16 * BITS_PER_SLOT as u16;

/// Total number of tag ids that can ever be reserved.
#[allow(clippy::arithmetic_side_effects)]
pub const CAPACITY: u16 = SECTIONS as u16 * TAGS_PER_SECTION;

/// Bits of a slot occupancy mask that may ever be set.
#[allow(clippy::arithmetic_side_effects)]
pub const SLOT_MASK_BITS: u32 = (1u32 << SLOTS_PER_SECTION) - 1;

// The header is a single byte and occupancy masks live in a `u32`.
const _: () = assert!(SECTIONS <= 8);
const _: () = assert!(SLOTS_PER_SECTION <= 32);
const _: () = assert!(BITS_PER_SLOT == 8);
const _: () = assert!(CAPACITY == 1152);
