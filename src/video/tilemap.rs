use crate::error::{ensure_size, InvalidMapBankSnafu, PaintError};
use crate::video::registers::AddressingMode;
use crate::video::{BACKGROUND_MAP_SIZE, BACKGROUND_MAP_WIDTH};
use log::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapBank {
    Low,
    High,
}

impl MapBank {
    pub fn from_index(bank: u8) -> Result<MapBank, PaintError> {
        match bank {
            0 => Ok(MapBank::Low),
            1 => Ok(MapBank::High),
            _ => InvalidMapBankSnafu { bank }.fail(),
        }
    }

    pub fn index(self) -> usize {
        match self {
            MapBank::Low => 0,
            MapBank::High => 1,
        }
    }
}

/// Re-bases a raw map entry onto the atlas. Under signed addressing tiles
/// 0..128 come from the block at `$9000`, which is atlas tile 256 onwards.
#[inline]
pub fn correct_index(raw: u8, mode: AddressingMode) -> u16 {
    match mode {
        AddressingMode::Signed if raw < 128 => raw as u16 + 256,
        _ => raw as u16,
    }
}

/// Both 32x32 tile index maps. Entries are stored raw.
pub struct TileMaps {
    banks: [[u8; BACKGROUND_MAP_SIZE]; 2],
}

impl TileMaps {
    pub fn new() -> TileMaps {
        TileMaps {
            banks: [[0; BACKGROUND_MAP_SIZE]; 2],
        }
    }

    pub fn load(&mut self, bank: MapBank, bytes: &[u8]) -> Result<(), PaintError> {
        ensure_size("tile map", BACKGROUND_MAP_SIZE, bytes.len())?;
        self.banks[bank.index()].copy_from_slice(bytes);
        trace!("Uploaded tile map {:?}", bank);
        Ok(())
    }

    /// Raw tile index of the cell covering map-space pixel (`x`, `y`), both in 0..256.
    #[inline]
    pub fn cell(&self, bank: MapBank, x: usize, y: usize) -> u8 {
        self.banks[bank.index()][(y / 8) * BACKGROUND_MAP_WIDTH + (x / 8)]
    }

    pub fn bank(&self, bank: MapBank) -> &[u8; BACKGROUND_MAP_SIZE] {
        &self.banks[bank.index()]
    }
}

impl Default for TileMaps {
    fn default() -> TileMaps {
        TileMaps::new()
    }
}
