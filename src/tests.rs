#[cfg(test)]
mod tests {
    use crate::memory::vram::VideoMemory;
    use crate::video::compositor::{Compositor, CompositorConfig};
    use crate::video::palette::{Shade, ShadeTable};
    use crate::video::registers::Registers;
    use crate::video::sprite::SpriteOrder;
    use crate::video::{
        BACKGROUND_MAP_SIZE, SCREEN_HEIGHT, SCREEN_WIDTH, SPRITE_TABLE_SIZE, TILEMAP_0_ADDRESS, TILESET_0_ADDRESS,
        TILE_BYTES, TILE_SIZE,
    };
    use serde_json::{Map, Value};

    const SCENARIOS: &str = include_str!("../external/scenarios.json");

    fn byte(value: &Value) -> u8 {
        value.as_u64().unwrap() as u8
    }

    fn register(registers: &Map<String, Value>, name: &str) -> u8 {
        registers.get(name).map(byte).unwrap_or(0)
    }

    fn write_tiles(vram: &mut VideoMemory, tiles: &[Value]) {
        for tile in tiles {
            let tile = tile.as_object().unwrap();
            let index = tile.get("index").unwrap().as_u64().unwrap() as u16;
            let base = TILESET_0_ADDRESS + index * TILE_BYTES as u16;

            let rows: Vec<(u8, u8)> = match tile.get("fill") {
                Some(fill) => {
                    let color = byte(fill);
                    let low = if color & 1 != 0 { 0xff } else { 0x00 };
                    let high = if color & 2 != 0 { 0xff } else { 0x00 };
                    vec![(low, high); TILE_SIZE]
                }
                None => tile
                    .get("rows")
                    .unwrap()
                    .as_array()
                    .unwrap()
                    .iter()
                    .map(|row| {
                        let row = row.as_array().unwrap();
                        (byte(&row[0]), byte(&row[1]))
                    })
                    .collect(),
            };

            for (row, (low, high)) in rows.into_iter().enumerate() {
                vram.write(base + row as u16 * 2, low).unwrap();
                vram.write(base + row as u16 * 2 + 1, high).unwrap();
            }
        }
    }

    fn write_maps(vram: &mut VideoMemory, maps: &[Value]) {
        for map in maps {
            let map = map.as_object().unwrap();
            let base = TILEMAP_0_ADDRESS + map.get("bank").unwrap().as_u64().unwrap() as u16 * BACKGROUND_MAP_SIZE as u16;

            if let Some(fill) = map.get("fill") {
                for cell in 0..BACKGROUND_MAP_SIZE as u16 {
                    vram.write(base + cell, byte(fill)).unwrap();
                }
            }
            for cell in map.get("cells").and_then(Value::as_array).into_iter().flatten() {
                let cell = cell.as_array().unwrap();
                vram.write(base + cell[0].as_u64().unwrap() as u16, byte(&cell[1])).unwrap();
            }
        }
    }

    fn sprite_table(sprites: &[Value]) -> Vec<u8> {
        let mut oam = vec![0u8; SPRITE_TABLE_SIZE];
        for (entry, sprite) in oam.chunks_mut(4).zip(sprites) {
            for (slot, value) in entry.iter_mut().zip(sprite.as_array().unwrap()) {
                *slot = byte(value);
            }
        }
        oam
    }

    fn run_scenario(scenario: &Map<String, Value>) {
        let name = scenario.get("name").unwrap().as_str().unwrap();
        let order = match scenario.get("order").and_then(Value::as_str) {
            Some("coordinate") => SpriteOrder::Coordinate,
            _ => SpriteOrder::Table,
        };
        let config = CompositorConfig {
            shades: ShadeTable::grey(),
            sprite_order: order,
        };

        let mut vram = VideoMemory::new();
        let mut compositor = Compositor::new(config);
        let empty = Vec::new();

        write_tiles(&mut vram, scenario.get("tiles").and_then(Value::as_array).unwrap_or(&empty));
        write_maps(&mut vram, scenario.get("maps").and_then(Value::as_array).unwrap_or(&empty));
        vram.flush(&mut compositor).unwrap();

        let oam = sprite_table(scenario.get("sprites").and_then(Value::as_array).unwrap_or(&empty));
        compositor.refresh_sprite_table(&oam).unwrap();

        let io = scenario.get("registers").unwrap().as_object().unwrap();
        let registers = Registers {
            lcdc: register(io, "lcdc"),
            scy: register(io, "scy"),
            scx: register(io, "scx"),
            bgp: register(io, "bgp"),
            obp0: register(io, "obp0"),
            obp1: register(io, "obp1"),
            wy: register(io, "wy"),
            wx: register(io, "wx"),
        };

        let target = compositor.draw(&registers);

        if let Some(fill) = scenario.get("expect_fill") {
            let expected = config.shades.rgba(Shade::from_bits(byte(fill)));
            for y in 0..SCREEN_HEIGHT {
                for x in 0..SCREEN_WIDTH {
                    assert_eq!(target.pixel(x, y), expected, "{}: pixel ({}, {})", name, x, y);
                }
            }
        }

        for expect in scenario.get("expect").and_then(Value::as_array).unwrap_or(&empty) {
            let expect = expect.as_object().unwrap();
            let x = expect.get("x").unwrap().as_u64().unwrap() as usize;
            let y = expect.get("y").unwrap().as_u64().unwrap() as usize;
            let expected = config.shades.rgba(Shade::from_bits(byte(expect.get("shade").unwrap())));

            assert_eq!(target.pixel(x, y), expected, "{}: pixel ({}, {})", name, x, y);
        }
    }

    #[test]
    fn test_scenarios() {
        let scenarios: Value = serde_json::from_str(SCENARIOS).unwrap();

        for scenario in scenarios.as_array().unwrap() {
            run_scenario(scenario.as_object().unwrap());
        }
    }

    #[test]
    fn test_frames_are_independent() {
        let scenarios: Value = serde_json::from_str(SCENARIOS).unwrap();
        let scenarios = scenarios.as_array().unwrap();

        // a second pass over the same inputs must not see state from the first
        for scenario in scenarios.iter().chain(scenarios.iter().rev()) {
            run_scenario(scenario.as_object().unwrap());
        }
    }
}
