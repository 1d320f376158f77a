use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// State bits stored in the low three bits of a [`Cell`].
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
    pub struct CellFlags: u8 {
        const MINE = 0b0000_0001;
        const REVEALED = 0b0000_0010;
        const FLAGGED = 0b0000_0100;
    }
}

const NEIGHBOR_SHIFT: u8 = 3;
const NEIGHBOR_MASK: u8 = 0x0F << NEIGHBOR_SHIFT;

/// A single board tile packed into one byte.
///
/// Layout: bit 0 mine, bit 1 revealed, bit 2 flagged, bits 3-6 neighbor mine
/// count, bit 7 reserved.
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cell(u8);

impl Cell {
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub fn flags(self) -> CellFlags {
        CellFlags::from_bits_truncate(self.0)
    }

    pub fn is_mine(self) -> bool {
        self.flags().contains(CellFlags::MINE)
    }

    pub fn is_revealed(self) -> bool {
        self.flags().contains(CellFlags::REVEALED)
    }

    pub fn is_flagged(self) -> bool {
        self.flags().contains(CellFlags::FLAGGED)
    }

    /// Neither revealed nor flagged.
    pub fn is_hidden(self) -> bool {
        !self
            .flags()
            .intersects(CellFlags::REVEALED | CellFlags::FLAGGED)
    }

    pub const fn neighbor_mines(self) -> u8 {
        (self.0 & NEIGHBOR_MASK) >> NEIGHBOR_SHIFT
    }

    pub(crate) fn set(&mut self, flag: CellFlags, value: bool) {
        let mut flags = self.flags();
        flags.set(flag, value);
        self.0 = (self.0 & !CellFlags::all().bits()) | flags.bits();
    }

    pub(crate) fn set_neighbor_mines(&mut self, count: u8) {
        debug_assert!(count <= 8, "a tile has at most eight neighbors");
        self.0 = (self.0 & !NEIGHBOR_MASK) | ((count & 0x0F) << NEIGHBOR_SHIFT);
    }
}

impl core::fmt::Debug for Cell {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Cell")
            .field("mine", &self.is_mine())
            .field("revealed", &self.is_revealed())
            .field("flagged", &self.is_flagged())
            .field("neighbor_mines", &self.neighbor_mines())
            .finish()
    }
}
