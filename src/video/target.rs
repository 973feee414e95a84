use crate::video::{Rgba, SCREEN_HEIGHT, SCREEN_WIDTH};

/// Source-over blending of straight-alpha colors.
pub fn blend_over(dst: Rgba, src: Rgba) -> Rgba {
    let alpha = src[3] as u16;
    match alpha {
        0xff => src,
        0 => dst,
        _ => {
            let inverse = 0xff - alpha;
            let mix = |s: u8, d: u8| ((s as u16 * alpha + d as u16 * inverse + 127) / 255) as u8;
            [
                mix(src[0], dst[0]),
                mix(src[1], dst[1]),
                mix(src[2], dst[2]),
                (alpha + (dst[3] as u16 * inverse + 127) / 255) as u8,
            ]
        }
    }
}

/// The off-screen color target a frame is composited into. Alongside the
/// colors it keeps the color index the background or window left at each
/// pixel, which the sprite pass reads back for behind-background sprites.
pub struct RenderTarget {
    pixels: Vec<Rgba>,
    background_indices: Vec<u8>,
}

impl RenderTarget {
    pub fn new() -> RenderTarget {
        RenderTarget {
            pixels: vec![[0, 0, 0, 0]; SCREEN_WIDTH * SCREEN_HEIGHT],
            background_indices: vec![0; SCREEN_WIDTH * SCREEN_HEIGHT],
        }
    }

    pub fn clear(&mut self, color: Rgba) {
        self.pixels.fill(color);
        self.background_indices.fill(0);
    }

    /// Background and window texels are always opaque and overwrite what is there.
    #[inline]
    pub fn write_background(&mut self, x: usize, y: usize, color_index: u8, color: Rgba) {
        let offset = y * SCREEN_WIDTH + x;
        self.pixels[offset] = color;
        self.background_indices[offset] = color_index;
    }

    #[inline]
    pub fn blend(&mut self, x: usize, y: usize, color: Rgba) {
        let offset = y * SCREEN_WIDTH + x;
        self.pixels[offset] = blend_over(self.pixels[offset], color);
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> Rgba {
        self.pixels[y * SCREEN_WIDTH + x]
    }

    #[inline]
    pub fn background_index(&self, x: usize, y: usize) -> u8 {
        self.background_indices[y * SCREEN_WIDTH + x]
    }

    /// Row-major pixels, ready to be sampled by a presentation layer.
    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }
}

impl Default for RenderTarget {
    fn default() -> RenderTarget {
        RenderTarget::new()
    }
}
