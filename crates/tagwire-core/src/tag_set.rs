//! Sparse two-level tag bitmap.
//!
//! A [`TagSet`] mirrors the wire layout: an 8-bit header marks which coarse
//! chunks are present, and each present [`Chunk`] carries an 18-bit slot
//! occupancy mask plus one byte per occupied slot. Both levels are stored
//! packed in ascending order and indexed by rank (the popcount of the lower
//! mask bits), so memory grows with the number of active tags, never with
//! the capacity.
//!
//! The representation is canonical: a slot byte of zero or a chunk with an
//! empty mask is never kept. Derived equality is therefore set equality.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::layout::{SECTIONS, SLOTS_PER_SECTION};
use crate::tag::TagId;

/// Single-bit mask for a slot, section or bit position below 32.
fn bit(position: u8) -> u32 {
    1u32.wrapping_shl(u32::from(position))
}

/// Number of set bits in `mask` strictly below `position`.
fn rank(mask: u32, position: u8) -> usize {
    (mask & bit(position).wrapping_sub(1)).count_ones() as usize
}

/// One coarse chunk: the occupied fine slots of 144 consecutive ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Chunk {
    /// Bit `s` set iff slot `s` holds at least one tag.
    mask: u32,
    /// One byte per set mask bit, ascending slot order.
    slots: Vec<u8>,
}

impl Chunk {
    /// Slot occupancy mask. Only the low 18 bits are ever set.
    #[must_use]
    pub fn mask(&self) -> u32 {
        self.mask
    }

    /// Membership bytes of the occupied slots, ascending slot order.
    #[must_use]
    pub fn slots(&self) -> &[u8] {
        &self.slots
    }

    /// Membership byte of one slot, if occupied.
    #[must_use]
    pub fn slot(&self, slot: u8) -> Option<u8> {
        if slot >= SLOTS_PER_SECTION || self.mask & bit(slot) == 0 {
            return None;
        }
        self.slots.get(rank(self.mask, slot)).copied()
    }

    /// Highest occupied slot index.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn highest_slot(&self) -> Option<u8> {
        // Safety: mask != 0 so leading_zeros() < 32
        (self.mask != 0).then(|| (31u32.wrapping_sub(self.mask.leading_zeros())) as u8)
    }

    /// Occupied slots paired with their membership byte.
    pub fn iter(&self) -> impl Iterator<Item = (u8, u8)> + '_ {
        (0..SLOTS_PER_SECTION)
            .filter(|slot| self.mask & bit(*slot) != 0)
            .zip(self.slots.iter().copied())
    }

    /// Number of tags in this chunk.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.iter().map(|b| b.count_ones() as usize).sum()
    }

    /// Whether no slot is occupied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mask == 0
    }

    /// OR `bits` into a slot, materializing it if needed. Returns the bits
    /// that were not already set.
    fn set_bits(&mut self, slot: u8, bits: u8) -> u8 {
        if bits == 0 {
            return 0;
        }
        let index = rank(self.mask, slot);
        if self.mask & bit(slot) == 0 {
            self.mask |= bit(slot);
            self.slots.insert(index, bits);
            return bits;
        }
        match self.slots.get_mut(index) {
            Some(byte) => {
                let added = bits & !*byte;
                *byte |= bits;
                added
            },
            None => 0,
        }
    }

    /// Clear `bits` in a slot, dropping the slot once it is empty. Returns
    /// the bits that were actually cleared.
    fn clear_bits(&mut self, slot: u8, bits: u8) -> u8 {
        if self.mask & bit(slot) == 0 {
            return 0;
        }
        let index = rank(self.mask, slot);
        let Some(byte) = self.slots.get_mut(index) else {
            return 0;
        };
        let removed = *byte & bits;
        *byte &= !bits;
        if *byte == 0 {
            self.slots.remove(index);
            self.mask &= !bit(slot);
        }
        removed
    }
}

/// The sparse set of active tags for one record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "Vec<TagId>", from = "Vec<TagId>")]
pub struct TagSet {
    /// Bit `i` set iff chunk `i` is present.
    header: u8,
    /// One chunk per set header bit, ascending section order.
    chunks: Vec<Chunk>,
}

impl TagSet {
    /// Create an empty set. Does not allocate.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            header: 0,
            chunks: Vec::new(),
        }
    }

    /// Section presence byte, as written on the wire.
    #[must_use]
    pub fn header(&self) -> u8 {
        self.header
    }

    /// Whether the set holds no tags.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.header == 0
    }

    /// Number of tags in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.chunks.iter().map(Chunk::len).sum()
    }

    /// The chunk for a section, if any of its tags are set.
    #[must_use]
    pub fn chunk(&self, section: u8) -> Option<&Chunk> {
        if section >= SECTIONS || u32::from(self.header) & bit(section) == 0 {
            return None;
        }
        self.chunks.get(rank(u32::from(self.header), section))
    }

    /// Present chunks paired with their section index, ascending.
    pub fn chunks(&self) -> impl Iterator<Item = (u8, &Chunk)> + '_ {
        (0..SECTIONS)
            .filter(|section| u32::from(self.header) & bit(*section) != 0)
            .zip(self.chunks.iter())
    }

    /// Whether a tag is in the set.
    #[must_use]
    pub fn contains(&self, id: TagId) -> bool {
        self.chunk(id.section())
            .and_then(|chunk| chunk.slot(id.slot()))
            .is_some_and(|byte| u32::from(byte) & bit(id.bit()) != 0)
    }

    /// Add a tag. Returns `true` if it was not already present.
    #[allow(clippy::cast_possible_truncation)]
    pub fn insert(&mut self, id: TagId) -> bool {
        // Safety: bit() < 8 so the mask fits in a byte
        self.merge_slot(id.section(), id.slot(), bit(id.bit()) as u8) != 0
    }

    /// Remove a tag. Returns `true` if it was present.
    #[allow(clippy::cast_possible_truncation)]
    pub fn remove(&mut self, id: TagId) -> bool {
        let section = id.section();
        if u32::from(self.header) & bit(section) == 0 {
            return false;
        }
        let index = rank(u32::from(self.header), section);
        let Some(chunk) = self.chunks.get_mut(index) else {
            return false;
        };
        // Safety: bit() < 8 so the mask fits in a byte
        let removed = chunk.clear_bits(id.slot(), bit(id.bit()) as u8) != 0;
        if chunk.is_empty() {
            self.chunks.remove(index);
            self.header &= !(bit(section) as u8);
        }
        removed
    }

    /// OR a whole membership byte into one slot. Returns the bits that were
    /// newly set.
    ///
    /// A zero byte or an out-of-range section or slot changes nothing, so
    /// the set stays canonical whatever the input.
    #[allow(clippy::cast_possible_truncation)]
    pub fn merge_slot(&mut self, section: u8, slot: u8, bits: u8) -> u8 {
        if bits == 0 || section >= SECTIONS || slot >= SLOTS_PER_SECTION {
            return 0;
        }
        let index = rank(u32::from(self.header), section);
        if u32::from(self.header) & bit(section) == 0 {
            // Safety: section < 8 so the mask fits in a byte
            self.header |= bit(section) as u8;
            self.chunks.insert(index, Chunk::default());
        }
        self.chunks
            .get_mut(index)
            .map_or(0, |chunk| chunk.set_bits(slot, bits))
    }

    /// Remove every tag.
    pub fn clear(&mut self) {
        self.header = 0;
        self.chunks.clear();
    }

    /// Tags in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = TagId> + '_ {
        self.chunks().flat_map(|(section, chunk)| {
            chunk.iter().flat_map(move |(slot, byte)| {
                (0..8u8)
                    .filter(move |b| u32::from(byte) & bit(*b) != 0)
                    .map(move |b| TagId::from_parts_unchecked(section, slot, b))
            })
        })
    }
}

impl FromIterator<TagId> for TagSet {
    fn from_iter<I: IntoIterator<Item = TagId>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl Extend<TagId> for TagSet {
    fn extend<I: IntoIterator<Item = TagId>>(&mut self, iter: I) {
        for id in iter {
            self.insert(id);
        }
    }
}

impl From<Vec<TagId>> for TagSet {
    fn from(ids: Vec<TagId>) -> Self {
        ids.into_iter().collect()
    }
}

impl From<TagSet> for Vec<TagId> {
    fn from(set: TagSet) -> Self {
        set.iter().collect()
    }
}

impl fmt::Display for TagSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, id) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{id}")?;
        }
        f.write_str("}")
    }
}
