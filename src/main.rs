use crate::error::PaintError;
use crate::memory::vram::VideoMemory;
use crate::snapshot::Snapshot;
use crate::video::compositor::{Compositor, CompositorConfig};
use crate::video::palette::ShadeTable;
use crate::video::sprite::SpriteOrder;
use clap::{Parser, ValueEnum};
use log::{error, LevelFilter};
use std::path::PathBuf;

mod error;
mod frontend;
mod memory;
mod snapshot;
#[cfg(test)]
mod tests;
mod video;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Shades {
    /// Green tones of the original LCD
    Green,
    Grey,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Order {
    /// Later table entries cover earlier ones
    Table,
    /// Lowest X wins, ties go to the lowest table index
    Coordinate,
}

#[derive(Parser, Debug)]
#[command(name = "dmgpaint", version, about = "Composites captured Game Boy video memory into a frame")]
struct Args {
    /// Snapshot directory or .zip holding vram.bin, oam.bin and io.bin
    snapshot: PathBuf,

    #[arg(long, value_enum, default_value_t = Shades::Green)]
    shades: Shades,

    #[arg(long, value_enum, default_value_t = Order::Table)]
    sprite_order: Order,

    /// Integer window scale
    #[arg(long, default_value_t = 4)]
    scale: usize,

    #[arg(long, default_value_t = LevelFilter::Info)]
    log_level: LevelFilter,
}

fn setup_logging(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    fern::Dispatch::new()
        .format(|out, message, record| out.finish(format_args!("[{} {}] {}", record.level(), record.target(), message)))
        .level(level)
        .level_for("eframe", LevelFilter::Warn)
        .level_for("egui_glow", LevelFilter::Warn)
        .level_for("winit", LevelFilter::Warn)
        .chain(std::io::stderr())
        .apply()
}

fn run(args: Args) -> Result<(), PaintError> {
    let config = CompositorConfig {
        shades: match args.shades {
            Shades::Green => ShadeTable::classic(),
            Shades::Grey => ShadeTable::grey(),
        },
        sprite_order: match args.sprite_order {
            Order::Table => SpriteOrder::Table,
            Order::Coordinate => SpriteOrder::Coordinate,
        },
    };

    let snapshot = Snapshot::load(&args.snapshot)?;
    let mut compositor = Compositor::new(config);
    let mut vram = VideoMemory::new();
    snapshot.upload(&mut vram, &mut compositor)?;

    frontend::renderer::run(compositor, vram, snapshot, args.scale.max(1))
}

fn main() {
    let args = Args::parse();

    if let Err(e) = setup_logging(args.log_level) {
        eprintln!("Failed to set up logging: {}", e);
    }

    if let Err(e) = run(args) {
        error!("{}", e);
        std::process::exit(1);
    }
}
