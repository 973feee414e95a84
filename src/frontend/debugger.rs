use crate::video::compositor::{Compositor, LayerMask};
use crate::video::palette::PaletteTable;
use crate::video::registers::{LcdControl, Registers};
use crate::video::sprite::SpriteOrder;
use crate::video::{ATLAS_TILE_COUNT, TILE_SIZE};
use eframe::egui::{
    self, vec2, CollapsingHeader, Color32, ColorImage, Context, DragValue, Grid, Image, Sense, TextureHandle,
    TextureOptions, Ui,
};

const ATLAS_COLUMNS: usize = 16;
const ATLAS_ROWS: usize = ATLAS_TILE_COUNT / ATLAS_COLUMNS;

const CONTROL_FLAGS: [(LcdControl, &str); 8] = [
    (LcdControl::LCD_DISPLAY, "LCD on"),
    (LcdControl::WINDOW_TILE_MAP, "Window map $9c00"),
    (LcdControl::WINDOW_DISPLAY, "Window on"),
    (LcdControl::BG_TILE_DATA, "Unsigned tile data ($8000)"),
    (LcdControl::BG_TILE_MAP, "BG map $9c00"),
    (LcdControl::OBJ_SIZE, "8x16 sprites"),
    (LcdControl::OBJ_DISPLAY, "Sprites on"),
    (LcdControl::BG_DISPLAY, "BG on"),
];

pub struct Debugger {
    pub window_open: bool,
    atlas_texture: Option<TextureHandle>,
}

impl Debugger {
    pub fn new() -> Self {
        Self {
            window_open: false,
            atlas_texture: None,
        }
    }

    pub fn update_ui(&mut self, ctx: &Context, registers: &mut Registers, compositor: &mut Compositor) {
        let mut open = self.window_open;

        egui::Window::new("Debugger").open(&mut open).show(ctx, |ui| {
            CollapsingHeader::new("Registers").default_open(true).show(ui, |ui| {
                Self::registers_ui(ui, registers);
            });
            CollapsingHeader::new("Palettes").default_open(true).show(ui, |ui| {
                let palettes = compositor.palettes();
                Self::palette_row(ui, "BGP", &palettes.background);
                Self::palette_row(ui, "OBP0", &palettes.object0);
                Self::palette_row(ui, "OBP1", &palettes.object1);
            });
            CollapsingHeader::new("Layers").default_open(true).show(ui, |ui| {
                Self::layers_ui(ui, compositor);
            });
            CollapsingHeader::new("Tile atlas").show(ui, |ui| {
                self.atlas_ui(ui, compositor);
            });
        });

        self.window_open = open;
    }

    pub fn toggle_window(&mut self) {
        self.window_open = !self.window_open;
    }

    fn registers_ui(ui: &mut Ui, registers: &mut Registers) {
        let mut control = registers.control();
        for (flag, label) in CONTROL_FLAGS {
            let mut on = control.contains(flag);
            if ui.checkbox(&mut on, label).changed() {
                control.set(flag, on);
            }
        }
        registers.lcdc = control.bits();

        Grid::new("scroll_registers").show(ui, |ui| {
            ui.add(DragValue::new(&mut registers.scx).prefix("SCX "));
            ui.add(DragValue::new(&mut registers.scy).prefix("SCY "));
            ui.end_row();
            ui.add(DragValue::new(&mut registers.wx).prefix("WX "));
            ui.add(DragValue::new(&mut registers.wy).prefix("WY "));
            ui.end_row();
        });

        ui.monospace(format!("{}", registers));
    }

    fn palette_row(ui: &mut Ui, name: &str, palette: &PaletteTable) {
        ui.horizontal(|ui| {
            ui.monospace(format!("{:<4}", name));
            for [r, g, b, a] in palette.entries {
                let (rect, _) = ui.allocate_exact_size(vec2(16.0, 16.0), Sense::hover());
                ui.painter().rect_filled(rect, 2.0, Color32::from_rgba_unmultiplied(r, g, b, a));
            }
        });
    }

    fn layers_ui(ui: &mut Ui, compositor: &mut Compositor) {
        let mut layers = compositor.layers();
        for (layer, label) in [
            (LayerMask::BACKGROUND, "Background"),
            (LayerMask::WINDOW, "Window"),
            (LayerMask::SPRITES, "Sprites"),
        ] {
            let mut on = layers.contains(layer);
            if ui.checkbox(&mut on, label).changed() {
                layers.set(layer, on);
            }
        }
        compositor.set_layers(layers);

        let mut order = compositor.config().sprite_order;
        ui.horizontal(|ui| {
            ui.label("Sprite order");
            ui.radio_value(&mut order, SpriteOrder::Table, "Table");
            ui.radio_value(&mut order, SpriteOrder::Coordinate, "Coordinate");
        });
        compositor.set_sprite_order(order);

        ui.label(format!("{} sprites placed", compositor.sprites().placed().count()));
    }

    fn atlas_ui(&mut self, ui: &mut Ui, compositor: &Compositor) {
        let width = ATLAS_COLUMNS * TILE_SIZE;
        let height = ATLAS_ROWS * TILE_SIZE;
        let palette = &compositor.palettes().background;
        let mut pixels = vec![Color32::BLACK; width * height];

        for tile in 0..ATLAS_TILE_COUNT {
            let origin_x = (tile % ATLAS_COLUMNS) * TILE_SIZE;
            let origin_y = (tile / ATLAS_COLUMNS) * TILE_SIZE;

            for (y, row) in compositor.atlas().decode_tile(tile as u16).iter().enumerate() {
                for (x, &color_index) in row.iter().enumerate() {
                    let [r, g, b, a] = palette.lookup(color_index);
                    pixels[(origin_y + y) * width + origin_x + x] = Color32::from_rgba_unmultiplied(r, g, b, a);
                }
            }
        }

        let image = ColorImage {
            size: [width, height],
            pixels,
        };
        let texture = self.atlas_texture.get_or_insert_with(|| {
            ui.ctx()
                .load_texture("atlas_texture", ColorImage::new([width, height], Color32::BLACK), TextureOptions::NEAREST)
        });
        texture.set(image, TextureOptions::NEAREST);

        ui.add(Image::new(&*texture).fit_to_exact_size(vec2((width * 2) as f32, (height * 2) as f32)));
    }
}
