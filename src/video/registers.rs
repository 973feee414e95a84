use crate::error::{ensure_size, PaintError};
use crate::video::tilemap::MapBank;
use crate::video::{
    BG_PALETTE_REGISTER, IO_PAGE_ADDRESS, IO_PAGE_SIZE, LCD_CONTROL_REGISTER, OBJ0_PALETTE_REGISTER,
    OBJ1_PALETTE_REGISTER, SCROLL_X_REGISTER, SCROLL_Y_REGISTER, WINDOW_X_REGISTER, WINDOW_Y_REGISTER,
};
use bitflags::bitflags;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct LcdControl: u8 {
        const BG_DISPLAY = 0b0000_0001;
        const OBJ_DISPLAY = 0b0000_0010;
        const OBJ_SIZE = 0b0000_0100;
        const BG_TILE_MAP = 0b0000_1000;
        const BG_TILE_DATA = 0b0001_0000;
        const WINDOW_DISPLAY = 0b0010_0000;
        const WINDOW_TILE_MAP = 0b0100_0000;
        const LCD_DISPLAY = 0b1000_0000;
    }
}

impl From<u8> for LcdControl {
    fn from(byte: u8) -> Self {
        Self::from_bits_truncate(byte)
    }
}

/// How background and window tile indices address the atlas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressingMode {
    /// Indices 0..128 live in the upper block of the atlas (tile 256 onwards).
    Signed,
    Unsigned,
}

/// Raw register values published by the emulation engine for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Registers {
    pub lcdc: u8,
    pub scy: u8,
    pub scx: u8,
    pub bgp: u8,
    pub obp0: u8,
    pub obp1: u8,
    pub wy: u8,
    pub wx: u8,
}

impl Registers {
    /// Reads the register bank out of the `$ff00` I/O page.
    pub fn from_io_page(page: &[u8]) -> Result<Registers, PaintError> {
        ensure_size("I/O page", IO_PAGE_SIZE, page.len())?;

        let read = |addr: u16| page[(addr - IO_PAGE_ADDRESS) as usize];

        Ok(Registers {
            lcdc: read(LCD_CONTROL_REGISTER),
            scy: read(SCROLL_Y_REGISTER),
            scx: read(SCROLL_X_REGISTER),
            bgp: read(BG_PALETTE_REGISTER),
            obp0: read(OBJ0_PALETTE_REGISTER),
            obp1: read(OBJ1_PALETTE_REGISTER),
            wy: read(WINDOW_Y_REGISTER),
            wx: read(WINDOW_X_REGISTER),
        })
    }

    pub fn control(&self) -> LcdControl {
        LcdControl::from(self.lcdc)
    }
}

/// Everything the render passes need from the registers, decoded once per draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameConfig {
    pub lcd_on: bool,
    pub background_on: bool,
    pub window_on: bool,
    pub sprites_on: bool,
    pub tall_sprites: bool,
    pub background_map: MapBank,
    pub window_map: MapBank,
    pub addressing: AddressingMode,
    pub scroll_x: u8,
    pub scroll_y: u8,
    pub window_x: i16,
    pub window_y: i16,
}

impl FrameConfig {
    pub fn decode(registers: &Registers) -> FrameConfig {
        let control = registers.control();

        let bank = |flag: LcdControl| {
            if control.contains(flag) {
                MapBank::High
            } else {
                MapBank::Low
            }
        };

        FrameConfig {
            lcd_on: control.contains(LcdControl::LCD_DISPLAY),
            background_on: control.contains(LcdControl::BG_DISPLAY),
            window_on: control.contains(LcdControl::WINDOW_DISPLAY),
            sprites_on: control.contains(LcdControl::OBJ_DISPLAY),
            tall_sprites: control.contains(LcdControl::OBJ_SIZE),
            background_map: bank(LcdControl::BG_TILE_MAP),
            window_map: bank(LcdControl::WINDOW_TILE_MAP),
            addressing: match control.contains(LcdControl::BG_TILE_DATA) {
                true => AddressingMode::Unsigned,
                false => AddressingMode::Signed,
            },
            scroll_x: registers.scx,
            scroll_y: registers.scy,
            // WX is offset by 7 on hardware, so WX=7 puts the window at the left edge
            window_x: registers.wx as i16 - 7,
            window_y: registers.wy as i16,
        }
    }

    pub fn sprite_height(&self) -> usize {
        match self.tall_sprites {
            true => 16,
            false => 8,
        }
    }
}

impl std::fmt::Display for Registers {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "LCDC: {:08b}  SCY: ${:02x}  SCX: ${:02x}  BGP: ${:02x}  OBP0: ${:02x}  OBP1: ${:02x}  WY: ${:02x}  WX: ${:02x}",
            self.lcdc, self.scy, self.scx, self.bgp, self.obp0, self.obp1, self.wy, self.wx
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_registers_from_io_page() {
        let mut page = vec![0u8; IO_PAGE_SIZE];
        page[0x40] = 0x91;
        page[0x42] = 0x10;
        page[0x43] = 0x20;
        page[0x47] = 0xe4;
        page[0x48] = 0xd2;
        page[0x49] = 0x1b;
        page[0x4a] = 0x30;
        page[0x4b] = 0x47;

        let registers = Registers::from_io_page(&page).unwrap();
        assert_eq!(
            registers,
            Registers {
                lcdc: 0x91,
                scy: 0x10,
                scx: 0x20,
                bgp: 0xe4,
                obp0: 0xd2,
                obp1: 0x1b,
                wy: 0x30,
                wx: 0x47,
            }
        );
    }

    #[test]
    fn rejects_short_io_page() {
        let result = Registers::from_io_page(&[0u8; 0x4c]);
        assert!(matches!(
            result,
            Err(PaintError::InvalidBufferSize {
                expected: IO_PAGE_SIZE,
                actual: 0x4c,
                ..
            })
        ));
    }

    #[test]
    fn decodes_control_flags() {
        let registers = Registers {
            lcdc: 0b1110_0011,
            wx: 7,
            wy: 40,
            ..Default::default()
        };
        let frame = FrameConfig::decode(&registers);

        assert!(frame.lcd_on);
        assert!(frame.background_on);
        assert!(frame.sprites_on);
        assert!(frame.window_on);
        assert!(!frame.tall_sprites);
        assert_eq!(frame.background_map, MapBank::Low);
        assert_eq!(frame.window_map, MapBank::High);
        assert_eq!(frame.addressing, AddressingMode::Signed);
        assert_eq!(frame.window_x, 0);
        assert_eq!(frame.window_y, 40);
        assert_eq!(frame.sprite_height(), 8);
    }

    #[test]
    fn tile_data_bit_selects_unsigned_addressing() {
        let registers = Registers {
            lcdc: 0b1001_1100,
            ..Default::default()
        };
        let frame = FrameConfig::decode(&registers);

        assert_eq!(frame.addressing, AddressingMode::Unsigned);
        assert_eq!(frame.background_map, MapBank::High);
        assert_eq!(frame.sprite_height(), 16);
        assert_eq!(frame.window_x, -7);
    }
}
