//! Tigervision "3F" cartridge (SPEC_FULL.md §4.6: "bus write to 0x003F |
//! low bits of value = bank for lower half; requires snooper"). The cart
//! window's upper half is always fixed to the last bank.

use super::Cartridge;
use crate::core::bus::BusContext;

const BANK_SIZE: usize = 0x800;

pub struct Tigervision {
    rom: Vec<u8>,
    num_banks: usize,
    bank: usize,
}

impl Tigervision {
    pub fn new(rom: Vec<u8>) -> Self {
        let num_banks = (rom.len() / BANK_SIZE).max(1);
        Self { rom, num_banks, bank: 0 }
    }

    fn bank_byte(&self, bank: usize, addr: u16) -> u8 {
        let offset = bank * BANK_SIZE + (addr as usize % BANK_SIZE);
        self.rom.get(offset).copied().unwrap_or(0)
    }
}

impl Cartridge for Tigervision {
    fn read(&mut self, _ctx: BusContext, addr: u16) -> u8 {
        let a = addr & 0x0FFF;
        if a < BANK_SIZE as u16 {
            self.bank_byte(self.bank, a)
        } else {
            self.bank_byte(self.num_banks - 1, a - BANK_SIZE as u16)
        }
    }

    fn write(&mut self, _ctx: BusContext, addr: u16, data: u8) {
        if addr == 0x003F {
            self.bank = data as usize % self.num_banks;
        }
    }

    fn reset(&mut self) {
        self.bank = 0;
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
