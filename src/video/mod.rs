pub mod compositor;
pub mod layer;
pub mod palette;
pub mod registers;
pub mod sprite;
pub mod target;
pub mod tile;
pub mod tilemap;

pub const SCREEN_WIDTH: usize = 160;
pub const SCREEN_HEIGHT: usize = 144;

pub const BACKGROUND_WIDTH: usize = 256;
pub const BACKGROUND_HEIGHT: usize = 256;

pub const TILE_SIZE: usize = 8;
pub const TILE_BYTES: usize = 16;
pub const ATLAS_TILE_COUNT: usize = 384;
pub const ATLAS_SIZE: usize = ATLAS_TILE_COUNT * TILE_BYTES;

pub const BACKGROUND_MAP_WIDTH: usize = 32;
pub const BACKGROUND_MAP_SIZE: usize = 32 * 32;

pub const SPRITE_COUNT: usize = 40;
pub const SPRITE_ENTRY_SIZE: usize = 4;
pub const SPRITE_TABLE_SIZE: usize = SPRITE_COUNT * SPRITE_ENTRY_SIZE;

pub const VRAM_ADDRESS: u16 = 0x8000;
pub const VRAM_SIZE: usize = 0x2000;
pub const TILESET_0_ADDRESS: u16 = 0x8000;
pub const TILEMAP_0_ADDRESS: u16 = 0x9800;
pub const TILEMAP_1_ADDRESS: u16 = 0x9c00;

pub const IO_PAGE_ADDRESS: u16 = 0xff00;
pub const IO_PAGE_SIZE: usize = 0x100;

pub const LCD_CONTROL_REGISTER: u16 = 0xff40;
pub const SCROLL_Y_REGISTER: u16 = 0xff42;
pub const SCROLL_X_REGISTER: u16 = 0xff43;
pub const BG_PALETTE_REGISTER: u16 = 0xff47;
pub const OBJ0_PALETTE_REGISTER: u16 = 0xff48;
pub const OBJ1_PALETTE_REGISTER: u16 = 0xff49;
pub const WINDOW_Y_REGISTER: u16 = 0xff4a;
pub const WINDOW_X_REGISTER: u16 = 0xff4b;

/// Straight (non-premultiplied) RGBA8 texel.
pub type Rgba = [u8; 4];
