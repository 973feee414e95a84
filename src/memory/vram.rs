use crate::error::{ensure_size, PaintError, VideoMemoryOutOfRangeSnafu};
use crate::video::compositor::Compositor;
use crate::video::{
    ATLAS_SIZE, BACKGROUND_MAP_SIZE, TILEMAP_0_ADDRESS, TILEMAP_1_ADDRESS, TILESET_0_ADDRESS, VRAM_ADDRESS, VRAM_SIZE,
};
use bitflags::bitflags;
use log::debug;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct DirtyRegions: u8 {
        const TILE_DATA = 0b001;
        const TILE_MAP_0 = 0b010;
        const TILE_MAP_1 = 0b100;
    }
}

/// Host-side mirror of `$8000-$9fff` that remembers which regions changed
/// since they were last pushed to the compositor.
pub struct VideoMemory {
    memory: Box<[u8; VRAM_SIZE]>,
    dirty: DirtyRegions,
}

impl VideoMemory {
    pub fn new() -> VideoMemory {
        VideoMemory {
            memory: Box::new([0; VRAM_SIZE]),
            dirty: DirtyRegions::all(),
        }
    }

    pub fn read(&self, addr: u16) -> Result<u8, PaintError> {
        Ok(self.memory[Self::offset(addr)?])
    }

    pub fn write(&mut self, addr: u16, data: u8) -> Result<(), PaintError> {
        self.memory[Self::offset(addr)?] = data;
        self.dirty |= Self::region(addr);
        Ok(())
    }

    /// Replaces all of video memory at once.
    pub fn load(&mut self, bytes: &[u8]) -> Result<(), PaintError> {
        ensure_size("video memory", VRAM_SIZE, bytes.len())?;
        self.memory.copy_from_slice(bytes);
        self.dirty = DirtyRegions::all();
        Ok(())
    }

    pub fn dirty(&self) -> DirtyRegions {
        self.dirty
    }

    /// Uploads every dirty region, tile data first, and returns what was sent.
    pub fn flush(&mut self, compositor: &mut Compositor) -> Result<DirtyRegions, PaintError> {
        let flushed = self.dirty;

        if flushed.contains(DirtyRegions::TILE_DATA) {
            compositor.refresh_atlas(self.slice(TILESET_0_ADDRESS, ATLAS_SIZE))?;
        }
        if flushed.contains(DirtyRegions::TILE_MAP_0) {
            compositor.refresh_map(0, self.slice(TILEMAP_0_ADDRESS, BACKGROUND_MAP_SIZE))?;
        }
        if flushed.contains(DirtyRegions::TILE_MAP_1) {
            compositor.refresh_map(1, self.slice(TILEMAP_1_ADDRESS, BACKGROUND_MAP_SIZE))?;
        }

        if !flushed.is_empty() {
            debug!("Flushed video memory regions: {:?}", flushed);
        }
        self.dirty = DirtyRegions::empty();
        Ok(flushed)
    }

    fn slice(&self, addr: u16, len: usize) -> &[u8] {
        let start = (addr - VRAM_ADDRESS) as usize;
        &self.memory[start..start + len]
    }

    fn offset(addr: u16) -> Result<usize, PaintError> {
        match addr {
            0x8000..=0x9fff => Ok((addr - VRAM_ADDRESS) as usize),
            _ => VideoMemoryOutOfRangeSnafu { address: addr }.fail(),
        }
    }

    fn region(addr: u16) -> DirtyRegions {
        match addr {
            a if a < TILEMAP_0_ADDRESS => DirtyRegions::TILE_DATA,
            a if a < TILEMAP_1_ADDRESS => DirtyRegions::TILE_MAP_0,
            _ => DirtyRegions::TILE_MAP_1,
        }
    }
}

impl Default for VideoMemory {
    fn default() -> VideoMemory {
        VideoMemory::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::video::compositor::CompositorConfig;
    use crate::video::registers::Registers;

    #[test]
    fn starts_fully_dirty() {
        let mut vram = VideoMemory::new();
        let mut compositor = Compositor::new(CompositorConfig::default());

        assert_eq!(vram.flush(&mut compositor).unwrap(), DirtyRegions::all());
        assert_eq!(vram.flush(&mut compositor).unwrap(), DirtyRegions::empty());
    }

    #[test]
    fn writes_mark_their_region() {
        let mut vram = VideoMemory::new();
        let mut compositor = Compositor::new(CompositorConfig::default());
        vram.flush(&mut compositor).unwrap();

        vram.write(0x97ff, 1).unwrap();
        assert_eq!(vram.dirty(), DirtyRegions::TILE_DATA);
        vram.write(0x9800, 1).unwrap();
        vram.write(0x9c00, 1).unwrap();
        assert_eq!(vram.dirty(), DirtyRegions::all());

        vram.flush(&mut compositor).unwrap();
        vram.write(0x9bff, 2).unwrap();
        assert_eq!(vram.flush(&mut compositor).unwrap(), DirtyRegions::TILE_MAP_0);
        assert_eq!(vram.read(0x9bff).unwrap(), 2);
    }

    #[test]
    fn rejects_addresses_outside_vram() {
        let mut vram = VideoMemory::new();
        assert!(matches!(
            vram.write(0xa000, 0),
            Err(PaintError::VideoMemoryOutOfRange { address: 0xa000 })
        ));
        assert!(vram.read(0x7fff).is_err());
    }

    #[test]
    fn flushed_tiles_reach_the_compositor() {
        let mut vram = VideoMemory::new();
        let mut compositor = Compositor::new(CompositorConfig::default());

        // tile 0 row 0 fully color 3, map 0 all tile 0
        vram.write(0x8000, 0xff).unwrap();
        vram.write(0x8001, 0xff).unwrap();
        vram.flush(&mut compositor).unwrap();

        let target = compositor.draw(&Registers {
            lcdc: 0x91,
            bgp: 0xe4,
            ..Default::default()
        });
        let black = CompositorConfig::default().shades.rgba(crate::video::palette::Shade::Black);
        assert_eq!(target.pixel(0, 0), black);
        assert_eq!(target.pixel(7, 8), black);
        assert_ne!(target.pixel(0, 1), black);
    }
}
