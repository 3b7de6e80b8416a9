//! Tag identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TagError;
use crate::layout::{BITS_PER_SLOT, CAPACITY, SECTIONS, SLOTS_PER_SECTION, TAGS_PER_SECTION};

/// Identifier of one extension-defined boolean tag.
///
/// Ids are 0-based and handed out sequentially by a `TagRegistry`. A
/// `TagId` value is always inside the layout capacity, but only ids below a
/// registry's reserved count are valid for that registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct TagId(u16);

impl TagId {
    /// Create a tag id from its raw value, if it lies inside the capacity.
    #[must_use]
    pub const fn new(raw: u16) -> Option<Self> {
        if raw < CAPACITY { Some(Self(raw)) } else { None }
    }

    /// Create a tag id from its coarse chunk, fine slot and bit position.
    #[must_use]
    pub fn from_parts(section: u8, slot: u8, bit: u8) -> Option<Self> {
        if section >= SECTIONS || slot >= SLOTS_PER_SECTION || bit >= BITS_PER_SLOT {
            return None;
        }
        Some(Self::from_parts_unchecked(section, slot, bit))
    }

    /// Compose an id from parts already known to be in range.
    // Safety: section < 8, slot < 18, bit < 8 keeps the sum below 1152
    #[allow(clippy::arithmetic_side_effects)]
    pub(crate) fn from_parts_unchecked(section: u8, slot: u8, bit: u8) -> Self {
        Self(
            u16::from(section) * TAGS_PER_SECTION
                + u16::from(slot) * u16::from(BITS_PER_SLOT)
                + u16::from(bit),
        )
    }

    /// The raw integer value.
    #[must_use]
    pub const fn get(self) -> u16 {
        self.0
    }

    /// The raw value as an index.
    #[must_use]
    pub fn index(self) -> usize {
        usize::from(self.0)
    }

    /// Coarse chunk this id belongs to, in `0..SECTIONS`.
    #[must_use]
    #[allow(clippy::arithmetic_side_effects, clippy::cast_possible_truncation)]
    pub const fn section(self) -> u8 {
        // Safety: the id is below CAPACITY, so the quotient is below 8
        (self.0 / TAGS_PER_SECTION) as u8
    }

    /// Fine slot inside the coarse chunk, in `0..SLOTS_PER_SECTION`.
    #[must_use]
    #[allow(clippy::arithmetic_side_effects, clippy::cast_possible_truncation)]
    pub const fn slot(self) -> u8 {
        // Safety: constant non-zero divisors; the result is below 18
        ((self.0 % TAGS_PER_SECTION) / BITS_PER_SLOT as u16) as u8
    }

    /// Bit position inside the fine slot byte, in `0..BITS_PER_SLOT`.
    #[must_use]
    #[allow(clippy::arithmetic_side_effects, clippy::cast_possible_truncation)]
    pub const fn bit(self) -> u8 {
        // Safety: constant non-zero divisor; the result is below 8
        (self.0 % BITS_PER_SLOT as u16) as u8
    }
}

impl TryFrom<u16> for TagId {
    type Error = TagError;

    fn try_from(raw: u16) -> Result<Self, Self::Error> {
        Self::new(raw).ok_or(TagError::OutOfRange {
            raw,
            capacity: CAPACITY,
        })
    }
}

impl From<TagId> for u16 {
    fn from(id: TagId) -> Self {
        id.0
    }
}

impl fmt::Display for TagId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tag#{}", self.0)
    }
}
