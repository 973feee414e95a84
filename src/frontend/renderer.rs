use crate::error::{FrontendSnafu, PaintError};
use crate::frontend::debugger::Debugger;
use crate::memory::vram::VideoMemory;
use crate::snapshot::Snapshot;
use crate::video::compositor::Compositor;
use crate::video::registers::Registers;
use crate::video::target::RenderTarget;
use crate::video::{SCREEN_HEIGHT, SCREEN_WIDTH};
use eframe::egui::{
    CentralPanel, Color32, ColorImage, Context, Image, Key, TextureHandle, TextureOptions, ViewportBuilder, Visuals,
};
use eframe::{App, CreationContext, Frame, NativeOptions};
use log::{error, info};

pub struct Renderer {
    debugger: Debugger,
    screen_texture: TextureHandle,
    compositor: Compositor,
    vram: VideoMemory,
    snapshot: Snapshot,
    registers: Registers,
    reload: bool,
}

impl Renderer {
    pub fn new(cc: &CreationContext, compositor: Compositor, vram: VideoMemory, snapshot: Snapshot) -> Renderer {
        match dark_light::detect() {
            dark_light::Mode::Dark => cc.egui_ctx.set_visuals(Visuals::dark()),
            dark_light::Mode::Light => cc.egui_ctx.set_visuals(Visuals::light()),
            dark_light::Mode::Default => {}
        }

        let screen_texture = cc.egui_ctx.load_texture(
            "screen_texture",
            ColorImage::new([SCREEN_WIDTH, SCREEN_HEIGHT], Color32::BLACK),
            TextureOptions::NEAREST,
        );

        Renderer {
            debugger: Debugger::new(),
            screen_texture,
            compositor,
            vram,
            registers: snapshot.registers,
            snapshot,
            reload: false,
        }
    }

    pub fn handle_input(&mut self, ctx: &Context) {
        if ctx.input(|i| i.key_pressed(Key::F1)) {
            self.debugger.toggle_window();
        }

        ctx.input(|i| {
            if i.key_down(Key::ArrowLeft) {
                self.registers.scx = self.registers.scx.wrapping_sub(1);
            }
            if i.key_down(Key::ArrowRight) {
                self.registers.scx = self.registers.scx.wrapping_add(1);
            }
            if i.key_down(Key::ArrowUp) {
                self.registers.scy = self.registers.scy.wrapping_sub(1);
            }
            if i.key_down(Key::ArrowDown) {
                self.registers.scy = self.registers.scy.wrapping_add(1);
            }
            if i.key_pressed(Key::R) {
                self.reload = true;
            }
        });
    }

    /// One emulated frame: refresh hooks first, then the draw that consumes them.
    fn render_frame(&mut self) -> Result<(), PaintError> {
        if self.reload {
            self.reload = false;
            self.registers = self.snapshot.registers;
            self.vram.load(&self.snapshot.vram)?;
        }

        self.vram.flush(&mut self.compositor)?;
        self.compositor.refresh_sprite_table(&self.snapshot.oam)?;
        let target = self.compositor.draw(&self.registers);
        update_screen(&mut self.screen_texture, target);
        Ok(())
    }
}

impl App for Renderer {
    fn update(&mut self, ctx: &Context, _frame: &mut Frame) {
        self.handle_input(ctx);

        if let Err(e) = self.render_frame() {
            error!("Failed to render frame: {}", e);
        }

        CentralPanel::default().show(ctx, |ui| {
            let image = Image::new(&self.screen_texture);
            image.paint_at(ui, ui.ctx().screen_rect());
        });

        self.debugger.update_ui(ctx, &mut self.registers, &mut self.compositor);

        ctx.request_repaint();
    }
}

fn update_screen(texture: &mut TextureHandle, target: &RenderTarget) {
    let mut pixels = vec![Color32::BLACK; SCREEN_WIDTH * SCREEN_HEIGHT];

    for (pixel, &[r, g, b, a]) in pixels.iter_mut().zip(target.pixels()) {
        *pixel = Color32::from_rgba_unmultiplied(r, g, b, a);
    }

    let image = ColorImage {
        size: [SCREEN_WIDTH, SCREEN_HEIGHT],
        pixels,
    };

    texture.set(image, TextureOptions::NEAREST);
}

pub fn run(compositor: Compositor, vram: VideoMemory, snapshot: Snapshot, scale: usize) -> Result<(), PaintError> {
    let options = NativeOptions {
        viewport: ViewportBuilder::default()
            .with_title("dmgpaint")
            .with_inner_size([(SCREEN_WIDTH * scale) as f32, (SCREEN_HEIGHT * scale) as f32]),
        ..Default::default()
    };

    info!("Opening {}x{} window", SCREEN_WIDTH * scale, SCREEN_HEIGHT * scale);
    eframe::run_native(
        "dmgpaint",
        options,
        Box::new(move |cc| Box::new(Renderer::new(cc, compositor, vram, snapshot))),
    )
    .map_err(|e| FrontendSnafu { message: e.to_string() }.build())
}
