//! Parker Bros 8K cartridge (SPEC_FULL.md §4.6: "0xFE0..0xFF7 grouped by
//! segment | 8 × 1K banks; last segment fixed to bank 7"). The 4K window is
//! split into four 1K segments; the first three independently select one of
//! 8 ROM banks, the last is hard-wired to bank 7 (which holds the reset
//! vector, so reset needs no special-casing).

use super::Cartridge;
use crate::core::bus::BusContext;

const SEGMENT_SIZE: u16 = 0x400;
const NUM_BANKS: usize = 8;

pub struct ParkerBros {
    rom: Vec<u8>,
    segment_bank: [usize; 3],
}

impl ParkerBros {
    pub fn new(rom: Vec<u8>) -> Self {
        Self { rom, segment_bank: [0; 3] }
    }

    fn bank_byte(&self, bank: usize, offset: u16) -> u8 {
        let addr = bank * SEGMENT_SIZE as usize + offset as usize;
        self.rom.get(addr).copied().unwrap_or(0)
    }

    /// Hotspot access side effect: `0xFE0..0xFE7` selects segment 0's bank,
    /// `0xFE8..0xFEF` segment 1's, `0xFF0..0xFF7` segment 2's.
    fn maybe_select(&mut self, addr: u16) {
        let a = addr & 0x0FFF;
        if (0xFE0..0xFF8).contains(&a) {
            let group = ((a - 0xFE0) / 8) as usize;
            let bank = ((a - 0xFE0) % 8) as usize;
            if group < 3 {
                self.segment_bank[group] = bank;
            }
        }
    }
}

impl Cartridge for ParkerBros {
    fn read(&mut self, _ctx: BusContext, addr: u16) -> u8 {
        self.maybe_select(addr);
        let a = addr & 0x0FFF;
        let segment = (a / SEGMENT_SIZE) as usize;
        let offset = a % SEGMENT_SIZE;
        let bank = if segment < 3 { self.segment_bank[segment] } else { NUM_BANKS - 1 };
        self.bank_byte(bank, offset)
    }

    fn write(&mut self, _ctx: BusContext, addr: u16, _data: u8) {
        self.maybe_select(addr);
    }

    fn reset(&mut self) {
        self.segment_bank = [0; 3];
    }

    fn snapshot(&self) -> Vec<u8> {
        self.segment_bank.iter().map(|&b| b as u8).collect()
    }

    fn restore(&mut self, data: &[u8]) -> bool {
        if data.len() != 3 {
            return false;
        }
        for i in 0..3 {
            self.segment_bank[i] = data[i] as usize;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_segment_fixed_to_bank_7() {
        let mut rom = vec![0u8; SEGMENT_SIZE as usize * NUM_BANKS];
        rom[7 * SEGMENT_SIZE as usize] = 0x42;
        let mut cart = ParkerBros::new(rom);
        let ctx = BusContext::default();
        assert_eq!(cart.read(ctx, 0xC00), 0x42);
    }

    #[test]
    fn hotspot_selects_segment_zero_bank() {
        let mut rom = vec![0u8; SEGMENT_SIZE as usize * NUM_BANKS];
        rom[3 * SEGMENT_SIZE as usize] = 0x77;
        let mut cart = ParkerBros::new(rom);
        let ctx = BusContext::default();
        let _ = cart.read(ctx, 0xFE3);
        assert_eq!(cart.read(ctx, 0x000), 0x77);
    }
}
