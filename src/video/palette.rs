use crate::video::Rgba;

pub type Color = [u8; 3];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shade {
    White,
    LightGray,
    DarkGray,
    Black,
}

impl Shade {
    pub fn from_bits(bits: u8) -> Shade {
        match bits & 0b11 {
            0b00 => Shade::White,
            0b01 => Shade::LightGray,
            0b10 => Shade::DarkGray,
            0b11 => Shade::Black,
            _ => unreachable!(),
        }
    }

    /// Shade a palette register assigns to color index `slot`.
    pub fn from_palette(palette: u8, slot: u8) -> Shade {
        Shade::from_bits(palette >> (slot * 2))
    }

    pub fn index(self) -> usize {
        match self {
            Shade::White => 0,
            Shade::LightGray => 1,
            Shade::DarkGray => 2,
            Shade::Black => 3,
        }
    }
}

impl Default for Shade {
    fn default() -> Shade {
        Shade::White
    }
}

/// The four fixed output tones, lightest to darkest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShadeTable {
    colors: [Color; 4],
}

impl ShadeTable {
    /// The green LCD tones of the original handheld.
    pub fn classic() -> ShadeTable {
        ShadeTable {
            colors: [[0x9b, 0xbc, 0x0f], [0x8b, 0xac, 0x0f], [0x30, 0x62, 0x30], [0x0f, 0x38, 0x0f]],
        }
    }

    pub fn grey() -> ShadeTable {
        ShadeTable {
            colors: [[0xff, 0xff, 0xff], [0xaa, 0xaa, 0xaa], [0x55, 0x55, 0x55], [0x00, 0x00, 0x00]],
        }
    }

    pub fn color(&self, shade: Shade) -> Color {
        self.colors[shade.index()]
    }

    pub fn rgba(&self, shade: Shade) -> Rgba {
        let [r, g, b] = self.color(shade);
        [r, g, b, 0xff]
    }
}

impl Default for ShadeTable {
    fn default() -> ShadeTable {
        ShadeTable::classic()
    }
}

/// A palette register resolved into concrete colors, indexed by color index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaletteTable {
    pub entries: [Rgba; 4],
}

impl PaletteTable {
    pub fn background(shades: &ShadeTable) -> PaletteTable {
        PaletteTable {
            entries: [shades.rgba(Shade::White); 4],
        }
    }

    /// Object tables start with a transparent slot 0, which resolving never overwrites.
    pub fn object(shades: &ShadeTable) -> PaletteTable {
        let mut entries = [shades.rgba(Shade::White); 4];
        entries[0] = [0, 0, 0, 0];
        PaletteTable { entries }
    }

    pub fn resolve_background(&mut self, palette: u8, shades: &ShadeTable) {
        self.resolve_from(0, palette, shades);
    }

    pub fn resolve_object(&mut self, palette: u8, shades: &ShadeTable) {
        self.resolve_from(1, palette, shades);
    }

    fn resolve_from(&mut self, first_slot: u8, palette: u8, shades: &ShadeTable) {
        for slot in first_slot..4 {
            self.entries[slot as usize] = shades.rgba(Shade::from_palette(palette, slot));
        }
    }

    #[inline]
    pub fn lookup(&self, color_index: u8) -> Rgba {
        self.entries[color_index as usize & 0b11]
    }
}

/// Background, object 0 and object 1 tables as they stand for the current frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palettes {
    pub background: PaletteTable,
    pub object0: PaletteTable,
    pub object1: PaletteTable,
}

impl Palettes {
    pub fn new(shades: &ShadeTable) -> Palettes {
        Palettes {
            background: PaletteTable::background(shades),
            object0: PaletteTable::object(shades),
            object1: PaletteTable::object(shades),
        }
    }

    pub fn update(&mut self, bgp: u8, obp0: u8, obp1: u8, shades: &ShadeTable) {
        self.background.resolve_background(bgp, shades);
        self.object0.resolve_object(obp0, shades);
        self.object1.resolve_object(obp1, shades);
    }
}
