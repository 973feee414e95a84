use crate::error::{ensure_size, PaintError};
use crate::video::palette::Palettes;
use crate::video::registers::FrameConfig;
use crate::video::target::RenderTarget;
use crate::video::tile::TileAtlas;
use crate::video::{SCREEN_HEIGHT, SCREEN_WIDTH, SPRITE_COUNT, SPRITE_ENTRY_SIZE, SPRITE_TABLE_SIZE, TILE_SIZE};
use bitflags::bitflags;
use log::trace;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct SpriteFlags: u8 {
        const PALETTE           = 0b0001_0000;
        const FLIP_X            = 0b0010_0000;
        const FLIP_Y            = 0b0100_0000;
        const BEHIND_BACKGROUND = 0b1000_0000;
    }
}

/// How overlapping sprites are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpriteOrder {
    /// Painted in table order, so later entries cover earlier ones.
    #[default]
    Table,
    /// Hardware priority: lowest X wins, ties go to the lowest table index.
    Coordinate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Sprite {
    pub y: u8,
    pub x: u8,
    pub tile_index: u8,
    pub flags: SpriteFlags,
}

impl Sprite {
    pub fn from_bytes(bytes: &[u8]) -> Sprite {
        Sprite {
            y: bytes[0],
            x: bytes[1],
            tile_index: bytes[2],
            flags: SpriteFlags::from_bits_truncate(bytes[3]),
        }
    }

    /// Zero in either coordinate means the entry was never placed.
    pub fn is_placed(&self) -> bool {
        self.x != 0 && self.y != 0
    }

    /// Screen position of the top-left corner.
    pub fn origin(&self) -> (i16, i16) {
        (self.x as i16 - 8, self.y as i16 - 16)
    }

    /// Atlas tile and tile row sampled for `row` of the sprite, flips applied.
    /// A flipped 8x16 sprite swaps its halves as well as mirroring each of them.
    pub fn tile_row(&self, row: usize, height: usize) -> (u16, u8) {
        let row = match self.flags.contains(SpriteFlags::FLIP_Y) {
            true => height - 1 - row,
            false => row,
        };

        match height {
            16 => {
                let top = (self.tile_index & 0xfe) as u16;
                (top + (row / TILE_SIZE) as u16, (row % TILE_SIZE) as u8)
            }
            _ => (self.tile_index as u16, row as u8),
        }
    }

    pub fn tile_column(&self, col: usize) -> u8 {
        match self.flags.contains(SpriteFlags::FLIP_X) {
            true => (TILE_SIZE - 1 - col) as u8,
            false => col as u8,
        }
    }
}

pub struct SpriteTable {
    sprites: [Sprite; SPRITE_COUNT],
}

impl SpriteTable {
    pub fn new() -> SpriteTable {
        SpriteTable {
            sprites: [Sprite::default(); SPRITE_COUNT],
        }
    }

    pub fn load(&mut self, bytes: &[u8]) -> Result<(), PaintError> {
        ensure_size("sprite table", SPRITE_TABLE_SIZE, bytes.len())?;

        for (sprite, entry) in self.sprites.iter_mut().zip(bytes.chunks_exact(SPRITE_ENTRY_SIZE)) {
            *sprite = Sprite::from_bytes(entry);
        }

        trace!("Uploaded sprite table ({} placed)", self.placed().count());
        Ok(())
    }

    pub fn sprites(&self) -> &[Sprite; SPRITE_COUNT] {
        &self.sprites
    }

    /// Table indices of placed sprites, in table order.
    pub fn placed(&self) -> impl Iterator<Item = usize> + '_ {
        self.sprites.iter().enumerate().filter(|(_, s)| s.is_placed()).map(|(i, _)| i)
    }

    /// Table indices of placed sprites in the order they must be painted,
    /// the winning sprite last.
    pub fn paint_order(&self, order: SpriteOrder) -> Vec<usize> {
        let mut indices: Vec<usize> = self.placed().collect();

        if order == SpriteOrder::Coordinate {
            // stable, so equal X keeps ascending index; reversed so priority 0 lands on top
            indices.sort_by_key(|&i| self.sprites[i].x);
            indices.reverse();
        }

        indices
    }
}

impl Default for SpriteTable {
    fn default() -> SpriteTable {
        SpriteTable::new()
    }
}

pub fn draw_sprites(
    target: &mut RenderTarget, atlas: &TileAtlas, table: &SpriteTable, palettes: &Palettes, frame: &FrameConfig,
    order: SpriteOrder,
) {
    let height = frame.sprite_height();
    let paint_order = table.paint_order(order);
    trace!("Drawing {} sprites ({:?} order, height {})", paint_order.len(), order, height);

    for index in paint_order {
        draw_sprite(target, atlas, &table.sprites[index], palettes, height);
    }
}

fn draw_sprite(target: &mut RenderTarget, atlas: &TileAtlas, sprite: &Sprite, palettes: &Palettes, height: usize) {
    let (left, top) = sprite.origin();
    let palette = match sprite.flags.contains(SpriteFlags::PALETTE) {
        true => &palettes.object1,
        false => &palettes.object0,
    };
    let behind = sprite.flags.contains(SpriteFlags::BEHIND_BACKGROUND);

    for row in 0..height {
        let y = top + row as i16;
        if y < 0 || y >= SCREEN_HEIGHT as i16 {
            continue;
        }
        let (tile, tile_row) = sprite.tile_row(row, height);

        for col in 0..TILE_SIZE {
            let x = left + col as i16;
            if x < 0 || x >= SCREEN_WIDTH as i16 {
                continue;
            }
            let (x, y) = (x as usize, y as usize);

            let color_index = atlas.sample(tile, sprite.tile_column(col), tile_row);
            if color_index == 0 {
                continue;
            }
            if behind && target.background_index(x, y) != 0 {
                continue;
            }

            target.blend(x, y, palette.lookup(color_index));
        }
    }
}
