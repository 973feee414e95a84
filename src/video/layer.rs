use crate::video::palette::PaletteTable;
use crate::video::registers::{AddressingMode, FrameConfig};
use crate::video::target::RenderTarget;
use crate::video::tile::TileAtlas;
use crate::video::tilemap::{correct_index, MapBank, TileMaps};
use crate::video::{BACKGROUND_HEIGHT, BACKGROUND_WIDTH, SCREEN_HEIGHT, SCREEN_WIDTH, TILE_SIZE};
use log::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placement {
    /// The 256x256 map wraps around and is scrolled under the screen.
    Scrolled { x: u8, y: u8 },
    /// The map's top-left corner sits at this screen position, without wrapping.
    Positioned { x: i16, y: i16 },
}

/// A tile-map backed layer: the background or the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileLayer {
    bank: MapBank,
    addressing: AddressingMode,
    placement: Placement,
}

impl TileLayer {
    pub fn background(frame: &FrameConfig) -> TileLayer {
        TileLayer {
            bank: frame.background_map,
            addressing: frame.addressing,
            placement: Placement::Scrolled {
                x: frame.scroll_x,
                y: frame.scroll_y,
            },
        }
    }

    pub fn window(frame: &FrameConfig) -> TileLayer {
        TileLayer {
            bank: frame.window_map,
            addressing: frame.addressing,
            placement: Placement::Positioned {
                x: frame.window_x,
                y: frame.window_y,
            },
        }
    }

    /// Map-space pixel shown at screen pixel (`x`, `y`), if the layer covers it.
    #[inline]
    fn map_position(&self, x: usize, y: usize) -> Option<(usize, usize)> {
        match self.placement {
            Placement::Scrolled { x: scx, y: scy } => Some((
                (x + scx as usize) % BACKGROUND_WIDTH,
                (y + scy as usize) % BACKGROUND_HEIGHT,
            )),
            Placement::Positioned { x: wx, y: wy } => {
                let map_x = x as i16 - wx;
                let map_y = y as i16 - wy;
                if map_x < 0 || map_y < 0 || map_x >= BACKGROUND_WIDTH as i16 || map_y >= BACKGROUND_HEIGHT as i16 {
                    None
                } else {
                    Some((map_x as usize, map_y as usize))
                }
            }
        }
    }

    /// Color index at map-space pixel (`map_x`, `map_y`).
    #[inline]
    pub fn texel(&self, atlas: &TileAtlas, maps: &TileMaps, map_x: usize, map_y: usize) -> u8 {
        let tile = correct_index(maps.cell(self.bank, map_x, map_y), self.addressing);
        atlas.sample(tile, (map_x % TILE_SIZE) as u8, (map_y % TILE_SIZE) as u8)
    }

    pub fn draw(&self, target: &mut RenderTarget, atlas: &TileAtlas, maps: &TileMaps, palette: &PaletteTable) {
        trace!("Drawing tile layer from map {:?} ({:?})", self.bank, self.placement);

        for y in 0..SCREEN_HEIGHT {
            for x in 0..SCREEN_WIDTH {
                if let Some((map_x, map_y)) = self.map_position(x, y) {
                    let color_index = self.texel(atlas, maps, map_x, map_y);
                    target.write_background(x, y, color_index, palette.lookup(color_index));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::video::palette::ShadeTable;
    use crate::video::registers::Registers;
    use crate::video::{ATLAS_SIZE, BACKGROUND_MAP_SIZE, TILE_BYTES};

    /// Atlas where every tile is a solid fill of the color given by `color_of`.
    fn solid_atlas(color_of: impl Fn(usize) -> u8) -> TileAtlas {
        let mut bytes = vec![0u8; ATLAS_SIZE];
        for tile in 0..ATLAS_SIZE / TILE_BYTES {
            let color = color_of(tile);
            for row in 0..8 {
                bytes[tile * TILE_BYTES + row * 2] = if color & 1 != 0 { 0xff } else { 0x00 };
                bytes[tile * TILE_BYTES + row * 2 + 1] = if color & 2 != 0 { 0xff } else { 0x00 };
            }
        }
        let mut atlas = TileAtlas::new();
        atlas.load(&bytes).unwrap();
        atlas
    }

    fn identity_palette() -> PaletteTable {
        let shades = ShadeTable::grey();
        let mut palette = PaletteTable::background(&shades);
        palette.resolve_background(0xe4, &shades);
        palette
    }

    #[test]
    fn signed_addressing_reads_upper_block() {
        // tile 5 is color 1, tile 261 (5 + 256) is color 2
        let atlas = solid_atlas(|tile| match tile {
            5 => 1,
            261 => 2,
            _ => 0,
        });
        let mut maps = TileMaps::new();
        maps.load(MapBank::Low, &[5u8; BACKGROUND_MAP_SIZE]).unwrap();

        let signed = TileLayer::background(&FrameConfig::decode(&Registers {
            lcdc: 0x81,
            ..Default::default()
        }));
        let unsigned = TileLayer::background(&FrameConfig::decode(&Registers {
            lcdc: 0x91,
            ..Default::default()
        }));

        assert_eq!(signed.texel(&atlas, &maps, 0, 0), 2);
        assert_eq!(unsigned.texel(&atlas, &maps, 0, 0), 1);
    }

    #[test]
    fn background_scroll_wraps() {
        // the map's first column of cells points to tile 1, everything else tile 0
        let atlas = solid_atlas(|tile| if tile == 1 { 3 } else { 0 });
        let mut map = [0u8; BACKGROUND_MAP_SIZE];
        for row in 0..32 {
            map[row * 32] = 1;
        }
        let mut maps = TileMaps::new();
        maps.load(MapBank::Low, &map).unwrap();

        let layer = TileLayer::background(&FrameConfig::decode(&Registers {
            lcdc: 0x91,
            scx: 252,
            ..Default::default()
        }));
        let mut target = RenderTarget::new();
        target.clear([0, 0, 0, 0]);
        layer.draw(&mut target, &atlas, &maps, &identity_palette());

        // screen x 0..4 shows map x 252..256, screen x 4..12 wraps onto map x 0..8
        assert_eq!(target.background_index(3, 0), 0);
        assert_eq!(target.background_index(4, 0), 3);
        assert_eq!(target.background_index(11, 143), 3);
        assert_eq!(target.background_index(12, 0), 0);
        assert_eq!(target.pixel(4, 0), [0, 0, 0, 255]);
    }

    #[test]
    fn window_covers_only_its_rectangle() {
        let atlas = solid_atlas(|tile| if tile == 2 { 2 } else { 0 });
        let mut maps = TileMaps::new();
        maps.load(MapBank::High, &[2u8; BACKGROUND_MAP_SIZE]).unwrap();

        let layer = TileLayer::window(&FrameConfig::decode(&Registers {
            lcdc: 0xf1,
            wx: 7 + 80,
            wy: 100,
            ..Default::default()
        }));
        let mut target = RenderTarget::new();
        target.clear([1, 2, 3, 4]);
        layer.draw(&mut target, &atlas, &maps, &identity_palette());

        assert_eq!(target.pixel(79, 120), [1, 2, 3, 4]);
        assert_eq!(target.pixel(80, 99), [1, 2, 3, 4]);
        assert_eq!(target.pixel(80, 100), [0x55, 0x55, 0x55, 0xff]);
        assert_eq!(target.background_index(159, 143), 2);
    }

    #[test]
    fn window_does_not_wrap_past_its_map() {
        let layer = TileLayer::window(&FrameConfig::decode(&Registers {
            lcdc: 0xe1,
            wx: 0,
            wy: 0,
            ..Default::default()
        }));

        // WX=0 puts the map's left edge 7 pixels off-screen
        assert_eq!(layer.map_position(0, 0), Some((7, 0)));
        let far = TileLayer {
            placement: Placement::Positioned { x: -250, y: 0 },
            ..layer
        };
        assert_eq!(far.map_position(5, 0), Some((255, 0)));
        assert_eq!(far.map_position(6, 0), None);
    }
}
