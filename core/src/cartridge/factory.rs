//! Cart-type tag to device construction (SPEC_FULL.md §6: the core receives
//! a raw ROM byte sequence plus a pre-decided [`CartType`] tag; header
//! sniffing and file parsing are an external collaborator's job, never this
//! crate's).
//!
//! SuperGame/BankswitchBoard-family sizing (bank counts, which bank is
//! fixed, where POKEY lands when a RAM overlay already claims 0x4000) is
//! reconstructed from SPEC_FULL.md §4.6's compressed table rather than an
//! exhaustive per-cart reference; see DESIGN.md Open Questions.

use super::banked_b::{BankedWindow, BankedWindowScheme};
use super::bankswitch::{BankSwitchScheme, BankSwitched, CartRamWindow, HotspotKind, Trigger};
use super::flat::FlatRom;
use super::mnetwork::MNetwork;
use super::parker::ParkerBros;
use super::snoop_fe::SnoopFe;
use super::tigervision::Tigervision;
use super::{CartError, Cartridge};
use crate::types::CartType;

const POKEY_SAMPLE_RATE: u32 = 44_100;

fn check_size(rom: &[u8], expected_at_least: usize) -> Result<(), CartError> {
    if rom.len() < expected_at_least {
        return Err(CartError::RomTooSmall { expected_at_least, actual: rom.len() });
    }
    Ok(())
}

/// F8/F6/F4 family: `num_banks` 4 KB banks, selected by address
/// `hotspot_base..hotspot_base + num_banks`, optionally shadowed by an
/// on-cart RAM window (the "SC" variants).
fn bankswitch_4k(
    rom: Vec<u8>,
    num_banks: usize,
    hotspot_base: u16,
    ram: Option<CartRamWindow>,
) -> BankSwitched {
    let scheme = BankSwitchScheme {
        bank_size: 0x1000,
        num_banks,
        hotspot: HotspotKind::PerBankAddress { base: hotspot_base, trigger: Trigger::ReadOrWrite },
        reset_bank: num_banks - 1,
        ram,
    };
    BankSwitched::new(rom, scheme)
}

const SC_RAM: CartRamWindow = CartRamWindow { write_base: 0x000, read_base: 0x080, size: 128 };

/// SuperGame/BankswitchBoard/Activision shape: a switchable 16 KB window at
/// 0x8000 with the remaining 16 KB (0xC000-0xFFFF) fixed to one bank.
fn sixteen_k_window(
    rom: Vec<u8>,
    num_banks: usize,
    hotspot: HotspotKind,
    fixed_bank: usize,
    ram: Option<CartRamWindow>,
    ram_gated: bool,
    pokey_offset: Option<u16>,
) -> BankedWindow {
    let scheme = BankedWindowScheme {
        window_base: 0x8000,
        window_size: 0x4000,
        bank_size: 0x4000,
        num_banks,
        hotspot,
        reset_bank: 0,
        fixed_bank: Some(fixed_bank),
        ram,
        ram_gated,
        pokey_offset,
    };
    BankedWindow::new(rom, scheme, POKEY_SAMPLE_RATE)
}

pub fn create(cart_type: CartType, rom: Vec<u8>) -> Result<Box<dyn Cartridge>, CartError> {
    use CartType::*;
    Ok(match cart_type {
        A2K | A4K => Box::new(FlatRom::new(rom, 0x1000)),
        A8K => {
            check_size(&rom, 0x2000)?;
            Box::new(bankswitch_4k(rom, 2, 0xFF8, None))
        }
        A8KR => {
            check_size(&rom, 0x2000)?;
            Box::new(bankswitch_4k(rom, 2, 0xFF8, Some(SC_RAM)))
        }
        A16K => {
            check_size(&rom, 0x4000)?;
            Box::new(bankswitch_4k(rom, 4, 0xFF6, None))
        }
        A16KR => {
            check_size(&rom, 0x4000)?;
            Box::new(bankswitch_4k(rom, 4, 0xFF6, Some(SC_RAM)))
        }
        A32K => {
            check_size(&rom, 0x8000)?;
            Box::new(bankswitch_4k(rom, 8, 0xFF4, None))
        }
        A32KR => {
            check_size(&rom, 0x8000)?;
            Box::new(bankswitch_4k(rom, 8, 0xFF4, Some(SC_RAM)))
        }
        Dc8K => {
            check_size(&rom, 0x2000)?;
            Box::new(SnoopFe::new(rom))
        }
        ParkerBros8K => {
            check_size(&rom, 0x2000)?;
            Box::new(ParkerBros::new(rom))
        }
        Tigervision8K => {
            check_size(&rom, 0x2000)?;
            Box::new(Tigervision::new(rom))
        }
        Cbs12K => {
            check_size(&rom, 0x3000)?;
            let scheme = BankSwitchScheme {
                bank_size: 0x1000,
                num_banks: 3,
                hotspot: HotspotKind::PerBankAddress { base: 0xFF8, trigger: Trigger::ReadOrWrite },
                reset_bank: 2,
                ram: Some(CartRamWindow { write_base: 0x000, read_base: 0x000, size: 256 }),
            };
            Box::new(BankSwitched::new(rom, scheme))
        }
        MNetwork16K => {
            check_size(&rom, 0x4000)?;
            Box::new(MNetwork::new(rom))
        }
        Dpc => Box::new(super::dpc::Dpc::new(rom)?),
        M32N12K => {
            // No corroborating reference for this tag beyond its name;
            // treated as a generic value-selected 4K-window multicart
            // (see DESIGN.md Open Questions).
            check_size(&rom, 0x1000)?;
            let num_banks = (rom.len() / 0x1000).max(1);
            let mask = (num_banks.next_power_of_two() - 1) as u8;
            let scheme = BankSwitchScheme {
                bank_size: 0x1000,
                num_banks,
                hotspot: HotspotKind::ValueSelected { range: (0x1000, 0x1FFF), shift: 0, mask },
                reset_bank: 0,
                ram: None,
            };
            Box::new(BankSwitched::new(rom, scheme))
        }

        B8K => {
            check_size(&rom, 0x2000)?;
            Box::new(FlatRom::new(rom, 0x4000))
        }
        B16K => {
            check_size(&rom, 0x4000)?;
            Box::new(FlatRom::new(rom, 0x4000))
        }
        B32K => {
            check_size(&rom, 0x8000)?;
            Box::new(FlatRom::new(rom, 0x4000))
        }
        B48K => {
            check_size(&rom, 0xC000)?;
            Box::new(FlatRom::new(rom, 0x4000))
        }
        B32KSuperGame => {
            check_size(&rom, 0x8000)?;
            let hotspot = HotspotKind::ValueSelected { range: (0x8000, 0xBFFF), shift: 0, mask: 0x01 };
            Box::new(sixteen_k_window(rom, 2, hotspot, 1, None, false, None))
        }
        B32KSuperGamePoke => {
            check_size(&rom, 0x8000)?;
            let hotspot = HotspotKind::ValueSelected { range: (0x8000, 0xBFFF), shift: 0, mask: 0x01 };
            Box::new(sixteen_k_window(rom, 2, hotspot, 1, None, false, Some(0x4000)))
        }
        B32KSuperGameRam => {
            check_size(&rom, 0x8000)?;
            let hotspot = HotspotKind::ValueSelected { range: (0x8000, 0xBFFF), shift: 0, mask: 0x01 };
            let ram = CartRamWindow { write_base: 0x4000, read_base: 0x4000, size: 0x4000 };
            Box::new(sixteen_k_window(rom, 2, hotspot, 1, Some(ram), true, None))
        }
        B48KSuperGame => {
            check_size(&rom, 0xC000)?;
            let hotspot = HotspotKind::ValueSelected { range: (0x8000, 0xBFFF), shift: 0, mask: 0x03 };
            Box::new(sixteen_k_window(rom, 3, hotspot, 2, None, false, None))
        }
        B52K => {
            check_size(&rom, 0xC000)?;
            let hotspot = HotspotKind::ValueSelected { range: (0x8000, 0xBFFF), shift: 0, mask: 0x03 };
            Box::new(sixteen_k_window(rom, 3, hotspot, 2, None, false, None))
        }
        B52KSuperGame => {
            check_size(&rom, 0xC000)?;
            let hotspot = HotspotKind::ValueSelected { range: (0x8000, 0xBFFF), shift: 0, mask: 0x03 };
            Box::new(sixteen_k_window(rom, 3, hotspot, 2, None, false, Some(0x4000)))
        }
        B128K => {
            check_size(&rom, 0x20000)?;
            let hotspot = HotspotKind::ValueSelected { range: (0x8000, 0xBFFF), shift: 0, mask: 0x07 };
            Box::new(sixteen_k_window(rom, 8, hotspot, 7, None, false, None))
        }
        B128KRam => {
            check_size(&rom, 0x20000)?;
            let hotspot = HotspotKind::ValueSelected { range: (0x8000, 0xBFFF), shift: 0, mask: 0x07 };
            let ram = CartRamWindow { write_base: 0x4000, read_base: 0x4000, size: 0x4000 };
            Box::new(sixteen_k_window(rom, 8, hotspot, 7, Some(ram), true, None))
        }
        B128KPoke => {
            check_size(&rom, 0x20000)?;
            let hotspot = HotspotKind::ValueSelected { range: (0x8000, 0xBFFF), shift: 0, mask: 0x07 };
            Box::new(sixteen_k_window(rom, 8, hotspot, 7, None, false, Some(0x4000)))
        }
        B128KRamPoke => {
            check_size(&rom, 0x20000)?;
            let hotspot = HotspotKind::ValueSelected { range: (0x8000, 0xBFFF), shift: 0, mask: 0x07 };
            let ram = CartRamWindow { write_base: 0x4000, read_base: 0x4000, size: 0x4000 };
            // POKEY moves to 0x0450 because RAM already claims 0x4000.
            Box::new(sixteen_k_window(rom, 8, hotspot, 7, Some(ram), true, Some(0x0450)))
        }
        BAbsolute64K => {
            check_size(&rom, 0x10000)?;
            let scheme = BankedWindowScheme {
                window_base: 0x4000,
                window_size: 0x4000,
                bank_size: 0x4000,
                num_banks: 2,
                hotspot: HotspotKind::ValueSelected {
                    range: (0x8000, 0xBFFF),
                    shift: 1,
                    mask: 0x01,
                },
                reset_bank: 0,
                fixed_bank: Some(2),
                ram: None,
                ram_gated: false,
                pokey_offset: None,
            };
            Box::new(BankedWindow::new(rom, scheme, POKEY_SAMPLE_RATE))
        }
        BActivision128K => {
            check_size(&rom, 0x20000)?;
            let hotspot = HotspotKind::PerBankAddress { base: 0xFF80, trigger: Trigger::Write };
            Box::new(sixteen_k_window(rom, 8, hotspot, 6, None, false, None))
        }
    })
}
