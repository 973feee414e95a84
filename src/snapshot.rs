use crate::error::{ensure_size, MissingSnapshotEntrySnafu, PaintError, SnapshotArchiveSnafu, SnapshotIoSnafu};
use crate::memory::vram::VideoMemory;
use crate::video::compositor::Compositor;
use crate::video::registers::Registers;
use crate::video::{IO_PAGE_SIZE, SPRITE_TABLE_SIZE, VRAM_SIZE};
use log::{debug, info};
use snafu::ResultExt;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use zip::result::ZipError;
use zip::ZipArchive;

pub const VRAM_ENTRY: &str = "vram.bin";
pub const OAM_ENTRY: &str = "oam.bin";
pub const IO_ENTRY: &str = "io.bin";

/// The memory a captured frame was drawn from: video memory, the sprite
/// table and the `$ff00` I/O page.
#[derive(Clone)]
pub struct Snapshot {
    pub vram: Vec<u8>,
    pub oam: Vec<u8>,
    pub registers: Registers,
}

impl Snapshot {
    pub fn from_parts(vram: Vec<u8>, oam: Vec<u8>, io: &[u8]) -> Result<Snapshot, PaintError> {
        ensure_size("video memory", VRAM_SIZE, vram.len())?;
        ensure_size("sprite table", SPRITE_TABLE_SIZE, oam.len())?;

        Ok(Snapshot {
            vram,
            oam,
            registers: Registers::from_io_page(io)?,
        })
    }

    /// Loads a snapshot from a directory or a `.zip` archive.
    pub fn load(path: &Path) -> Result<Snapshot, PaintError> {
        let snapshot = if path.is_dir() {
            Self::load_dir(path)?
        } else {
            Self::load_zip(path)?
        };

        info!("Loaded snapshot {} ({})", path.display(), snapshot.registers);
        Ok(snapshot)
    }

    fn load_dir(path: &Path) -> Result<Snapshot, PaintError> {
        let read = |name: &str| -> Result<Vec<u8>, PaintError> {
            let file = path.join(name);
            if !file.exists() {
                return MissingSnapshotEntrySnafu { name }.fail();
            }
            debug!("Reading {}", file.display());
            std::fs::read(&file).context(SnapshotIoSnafu { path: file })
        };

        Self::from_parts(read(VRAM_ENTRY)?, read(OAM_ENTRY)?, &read(IO_ENTRY)?)
    }

    fn load_zip(path: &Path) -> Result<Snapshot, PaintError> {
        let file = File::open(path).context(SnapshotIoSnafu { path })?;
        let mut archive = ZipArchive::new(file).context(SnapshotArchiveSnafu { path })?;

        let mut read = |name: &str| -> Result<Vec<u8>, PaintError> {
            let mut entry = match archive.by_name(name) {
                Ok(entry) => entry,
                Err(ZipError::FileNotFound) => return MissingSnapshotEntrySnafu { name }.fail(),
                Err(e) => return Err(e).context(SnapshotArchiveSnafu { path }),
            };
            debug!("Reading {} from archive ({} bytes)", name, entry.size());

            let mut data = Vec::with_capacity(entry.size() as usize);
            entry
                .read_to_end(&mut data)
                .context(SnapshotIoSnafu { path: PathBuf::from(path).join(name) })?;
            Ok(data)
        };

        let vram = read(VRAM_ENTRY)?;
        let oam = read(OAM_ENTRY)?;
        let io = read(IO_ENTRY)?;
        Self::from_parts(vram, oam, &io)
    }

    /// Pushes the snapshot through the same path the engine uses at the end
    /// of a frame: video memory regions, then the sprite table.
    pub fn upload(&self, vram: &mut VideoMemory, compositor: &mut Compositor) -> Result<(), PaintError> {
        vram.load(&self.vram)?;
        vram.flush(compositor)?;
        compositor.refresh_sprite_table(&self.oam)
    }
}
