//! System-B banked-window cartridge: the generic shape behind Absolute-64K,
//! Activision-128K, SuperGame-128K (+ POKEY/RAM variants) and the
//! BankswitchBoard family (SPEC_FULL.md §4.6, Family B). All of these are a
//! switchable low window plus a fixed high region, optionally with a RAM
//! overlay gated by a bank-value bit and/or an embedded POKEY at a fixed
//! offset — the System-B analogue of [`super::bankswitch::BankSwitched`].
//!
//! The exact register-level behavior of Activision-128K's "low region =
//! bank - 2" wiring and of POKEY placement at 0x0450 are reconstructed from
//! the spec table rather than independently hardware-verified; see
//! DESIGN.md.

use super::bankswitch::{CartRamWindow, HotspotKind, Trigger};
use super::Cartridge;
use crate::core::bus::BusContext;
use crate::device::Pokey;

pub struct BankedWindowScheme {
    pub window_base: u16,
    pub window_size: usize,
    pub bank_size: usize,
    pub num_banks: usize,
    pub hotspot: HotspotKind,
    pub reset_bank: usize,
    /// Fixed region occupying the rest of the cart window, hard-wired to
    /// one ROM bank index (e.g. Activision's "low region = bank - 2").
    pub fixed_bank: Option<usize>,
    pub ram: Option<CartRamWindow>,
    /// RAM overlay is gated by bit 4 of the bank-select value, as on
    /// SuperGame's +16K-RAM-overlay variant.
    pub ram_gated: bool,
    /// Bus offset of an embedded POKEY (0x4000 or 0x0450), if any.
    pub pokey_offset: Option<u16>,
}

pub struct BankedWindow {
    rom: Vec<u8>,
    scheme: BankedWindowScheme,
    bank: usize,
    ram: Vec<u8>,
    ram_enabled: bool,
    pokey: Option<Pokey>,
}

impl BankedWindow {
    pub fn new(rom: Vec<u8>, scheme: BankedWindowScheme, pokey_sample_rate: u32) -> Self {
        let ram_size = scheme.ram.map(|w| w.size as usize).unwrap_or(0);
        let bank = scheme.reset_bank;
        let pokey = scheme.pokey_offset.map(|_| Pokey::new(pokey_sample_rate));
        Self { rom, scheme, bank, ram: vec![0; ram_size], ram_enabled: !scheme.ram_gated, pokey }
    }

    fn bank_byte(&self, bank: usize, offset: usize) -> u8 {
        self.rom.get(bank * self.scheme.bank_size + offset).copied().unwrap_or(0)
    }

    fn select(&mut self, addr: u16, value: u8) {
        if let HotspotKind::PerBankAddress { base, trigger } = self.scheme.hotspot {
            if matches!(trigger, Trigger::Write | Trigger::ReadOrWrite) && addr >= base {
                let n = (addr - base) as usize;
                if n < self.scheme.num_banks {
                    self.bank = n;
                }
            }
            return;
        }
        if let HotspotKind::ValueSelected { range, shift, mask } = self.scheme.hotspot {
            if addr >= range.0 && addr <= range.1 {
                let n = ((value >> shift) & mask) as usize;
                if n < self.scheme.num_banks {
                    self.bank = n;
                }
                if self.scheme.ram_gated {
                    self.ram_enabled = value & 0x10 != 0;
                }
            }
        }
    }

    fn pokey_window(&self, addr: u16) -> Option<u8> {
        self.scheme.pokey_offset.and_then(|base| {
            let rel = addr.checked_sub(base)?;
            (rel < 0x10).then_some(rel as u8)
        })
    }
}

impl Cartridge for BankedWindow {
    fn read(&mut self, _ctx: BusContext, addr: u16) -> u8 {
        if let Some(offset) = self.pokey_window(addr) {
            if let Some(pokey) = self.pokey.as_mut() {
                return pokey.read(offset);
            }
        }
        if let Some(w) = self.scheme.ram {
            if self.ram_enabled && addr >= w.read_base && addr < w.read_base + w.size {
                return self.ram[(addr - w.read_base) as usize];
            }
        }
        let window_end = self.scheme.window_base as usize + self.scheme.window_size;
        if (self.scheme.window_base as usize..window_end).contains(&(addr as usize)) {
            let offset = addr as usize - self.scheme.window_base as usize;
            return self.bank_byte(self.bank, offset % self.scheme.bank_size);
        }
        if let Some(fixed_bank) = self.scheme.fixed_bank {
            // The fixed region may span more than one bank's worth of bytes
            // (e.g. Absolute-64K's two fixed 16K banks); read it as one
            // contiguous slice starting at `fixed_bank` rather than wrapping
            // every `bank_size` bytes.
            let offset = addr as usize - window_end;
            return self.rom.get(fixed_bank * self.scheme.bank_size + offset).copied().unwrap_or(0);
        }
        0
    }

    fn write(&mut self, _ctx: BusContext, addr: u16, data: u8) {
        if let Some(offset) = self.pokey_window(addr) {
            if let Some(pokey) = self.pokey.as_mut() {
                pokey.write(offset, data);
                return;
            }
        }
        if let Some(w) = self.scheme.ram {
            if self.ram_enabled && addr >= w.write_base && addr < w.write_base + w.size {
                self.ram[(addr - w.write_base) as usize] = data;
                return;
            }
        }
        self.select(addr, data);
    }

    fn reset(&mut self) {
        self.bank = self.scheme.reset_bank;
        self.ram_enabled = !self.scheme.ram_gated;
    }

    fn frame_begin(&mut self) {
        if let Some(pokey) = self.pokey.as_mut() {
            pokey.tick();
        }
    }

    fn snapshot(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(2 + self.ram.len());
        out.push(self.bank as u8);
        out.push(self.ram_enabled as u8);
        out.extend_from_slice(&self.ram);
        out
    }

    fn restore(&mut self, data: &[u8]) -> bool {
        if data.len() != 2 + self.ram.len() {
            return false;
        }
        self.bank = data[0] as usize;
        self.ram_enabled = data[1] != 0;
        self.ram.copy_from_slice(&data[2..]);
        true
    }
}
