use crate::error::{ensure_size, PaintError};
use crate::video::{ATLAS_SIZE, ATLAS_TILE_COUNT, TILE_BYTES, TILE_SIZE};
use log::trace;

/// Decodes one pixel of a tile row. `low` and `high` are the two bitplane
/// bytes of the row; column 0 is the most significant bit.
#[inline]
pub fn decode_pixel(low: u8, high: u8, col: u8) -> u8 {
    let shift = 7 - col;
    let lsb_bit = (low >> shift) & 0b0000_0001;
    let msb_bit = (high >> shift) & 0b0000_0001;
    (msb_bit << 1) | lsb_bit
}

/// The 384 tiles of both tile data blocks, kept in their packed bitplane
/// form and decoded when sampled.
pub struct TileAtlas {
    data: Box<[u8; ATLAS_SIZE]>,
}

impl TileAtlas {
    pub fn new() -> TileAtlas {
        TileAtlas {
            data: Box::new([0; ATLAS_SIZE]),
        }
    }

    /// Replaces the whole atlas. Nothing is kept from the previous upload.
    pub fn load(&mut self, bytes: &[u8]) -> Result<(), PaintError> {
        ensure_size("tile atlas", ATLAS_SIZE, bytes.len())?;
        self.data.copy_from_slice(bytes);
        trace!("Uploaded tile atlas ({} tiles)", ATLAS_TILE_COUNT);
        Ok(())
    }

    /// Color index (0-3) of `tile` at `col`, `row`.
    #[inline]
    pub fn sample(&self, tile: u16, col: u8, row: u8) -> u8 {
        debug_assert!((tile as usize) < ATLAS_TILE_COUNT, "tile {} outside atlas", tile);
        debug_assert!(col < 8 && row < 8);

        let offset = tile as usize * TILE_BYTES + row as usize * 2;
        decode_pixel(self.data[offset], self.data[offset + 1], col)
    }

    pub fn decode_tile(&self, tile: u16) -> [[u8; TILE_SIZE]; TILE_SIZE] {
        let mut pixels = [[0u8; TILE_SIZE]; TILE_SIZE];

        for (y, row) in pixels.iter_mut().enumerate() {
            for (x, pixel) in row.iter_mut().enumerate() {
                *pixel = self.sample(tile, x as u8, y as u8);
            }
        }

        pixels
    }
}

impl Default for TileAtlas {
    fn default() -> TileAtlas {
        TileAtlas::new()
    }
}
