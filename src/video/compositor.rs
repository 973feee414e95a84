use crate::error::PaintError;
use crate::video::layer::TileLayer;
use crate::video::palette::{Palettes, Shade, ShadeTable};
use crate::video::registers::{FrameConfig, Registers};
use crate::video::sprite::{draw_sprites, SpriteOrder, SpriteTable};
use crate::video::target::RenderTarget;
use crate::video::tile::TileAtlas;
use crate::video::tilemap::{MapBank, TileMaps};
use crate::video::Rgba;
use bitflags::bitflags;
use log::{info, trace};

bitflags! {
    /// Layers the host allows to be drawn, on top of what LCDC enables.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct LayerMask: u8 {
        const BACKGROUND = 0b001;
        const WINDOW     = 0b010;
        const SPRITES    = 0b100;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompositorConfig {
    pub shades: ShadeTable,
    pub sprite_order: SpriteOrder,
}

impl CompositorConfig {
    /// Color of a blank frame: the lightest shade, as on a powered-off screen.
    pub fn clear_color(&self) -> Rgba {
        self.shades.rgba(Shade::White)
    }
}

impl Default for CompositorConfig {
    fn default() -> CompositorConfig {
        CompositorConfig {
            shades: ShadeTable::classic(),
            sprite_order: SpriteOrder::Table,
        }
    }
}

/// Owns the uploaded atlas, maps and sprite table and turns them into a frame.
pub struct Compositor {
    config: CompositorConfig,
    layers: LayerMask,
    atlas: TileAtlas,
    maps: TileMaps,
    sprites: SpriteTable,
    palettes: Palettes,
    target: RenderTarget,
}

impl Compositor {
    pub fn new(config: CompositorConfig) -> Compositor {
        info!(
            "Creating compositor ({:?} sprite order, clear color {:02x?})",
            config.sprite_order,
            config.clear_color()
        );

        let mut target = RenderTarget::new();
        target.clear(config.clear_color());

        Compositor {
            config,
            layers: LayerMask::all(),
            atlas: TileAtlas::new(),
            maps: TileMaps::new(),
            sprites: SpriteTable::new(),
            palettes: Palettes::new(&config.shades),
            target,
        }
    }

    pub fn refresh_atlas(&mut self, bytes: &[u8]) -> Result<(), PaintError> {
        self.atlas.load(bytes)
    }

    pub fn refresh_map(&mut self, bank: u8, bytes: &[u8]) -> Result<(), PaintError> {
        self.maps.load(MapBank::from_index(bank)?, bytes)
    }

    pub fn refresh_sprite_table(&mut self, bytes: &[u8]) -> Result<(), PaintError> {
        self.sprites.load(bytes)
    }

    /// Composites one complete frame from the last uploads and `registers`.
    pub fn draw(&mut self, registers: &Registers) -> &RenderTarget {
        let frame = FrameConfig::decode(registers);
        self.palettes
            .update(registers.bgp, registers.obp0, registers.obp1, &self.config.shades);

        self.target.clear(self.config.clear_color());

        if !frame.lcd_on {
            trace!("LCD is off, presenting a blank frame");
            return &self.target;
        }

        if frame.background_on && self.layers.contains(LayerMask::BACKGROUND) {
            TileLayer::background(&frame).draw(&mut self.target, &self.atlas, &self.maps, &self.palettes.background);
        }

        if frame.window_on && self.layers.contains(LayerMask::WINDOW) {
            TileLayer::window(&frame).draw(&mut self.target, &self.atlas, &self.maps, &self.palettes.background);
        }

        if frame.sprites_on && self.layers.contains(LayerMask::SPRITES) {
            draw_sprites(
                &mut self.target,
                &self.atlas,
                &self.sprites,
                &self.palettes,
                &frame,
                self.config.sprite_order,
            );
        }

        &self.target
    }

    pub fn config(&self) -> &CompositorConfig {
        &self.config
    }

    pub fn layers(&self) -> LayerMask {
        self.layers
    }

    pub fn set_layers(&mut self, layers: LayerMask) {
        self.layers = layers;
    }

    pub fn set_sprite_order(&mut self, order: SpriteOrder) {
        self.config.sprite_order = order;
    }

    pub fn atlas(&self) -> &TileAtlas {
        &self.atlas
    }

    pub fn palettes(&self) -> &Palettes {
        &self.palettes
    }

    pub fn sprites(&self) -> &SpriteTable {
        &self.sprites
    }
}
