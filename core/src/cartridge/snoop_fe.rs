//! Bus-snoop "FE" cartridge (SPEC_FULL.md §4.6: "bus addr 0x01FE | D5 of bus
//! value = bank select; requires snooper"). The real mechanism is the PCH
//! byte landing on the data bus during the `JSR`/`RTS` that straddles
//! 0x01FE; the composer forwards every bus write here regardless of which
//! device the address actually belongs to (`Cartridge::wants_snoop`).

use super::Cartridge;
use crate::core::bus::BusContext;

const BANK_SIZE: usize = 0x1000;

pub struct SnoopFe {
    rom: Vec<u8>,
    bank: usize,
}

impl SnoopFe {
    pub fn new(rom: Vec<u8>) -> Self {
        Self { rom, bank: 1 }
    }

    fn rom_byte(&self, addr: u16) -> u8 {
        let offset = self.bank * BANK_SIZE + (addr as usize % BANK_SIZE);
        self.rom.get(offset).copied().unwrap_or(0)
    }
}

impl Cartridge for SnoopFe {
    fn read(&mut self, _ctx: BusContext, addr: u16) -> u8 {
        self.rom_byte(addr)
    }

    fn write(&mut self, _ctx: BusContext, addr: u16, data: u8) {
        if addr == 0x01FE {
            self.bank = usize::from(data & 0x20 != 0);
        }
    }

    fn reset(&mut self) {
        self.bank = 1;
    }

    fn wants_snoop(&self) -> bool {
        true
    }

    fn snapshot(&self) -> Vec<u8> {
        vec![self.bank as u8]
    }

    fn restore(&mut self, data: &[u8]) -> bool {
        if data.len() != 1 {
            return false;
        }
        self.bank = data[0] as usize;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stack_push_to_01fe_selects_bank_from_data_bit_5() {
        let mut rom = vec![0u8; 2 * BANK_SIZE];
        rom[0x000] = 0x11;
        rom[0x1000] = 0x22;
        let mut cart = SnoopFe::new(rom);
        let ctx = BusContext::default();
        assert_eq!(cart.read(ctx, 0x000), 0x22);
        cart.write(ctx, 0x01FE, 0x00);
        assert_eq!(cart.read(ctx, 0x000), 0x11);
        cart.write(ctx, 0x01FE, 0x20);
        assert_eq!(cart.read(ctx, 0x000), 0x22);
    }
}
