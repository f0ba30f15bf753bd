//! Cartridge mapper contract (C8).
//!
//! Every cartridge — flat ROM, bank-switched ROM, or one of the hand-special-
//! cased schemes (DPC, Parker, CBS, M-Network, bus-snooping) — implements
//! [`Cartridge`]. The composer owns a `Box<dyn Cartridge>` per machine and
//! never matches on cart-type tags itself; all scheme-specific behavior is
//! behind this one interface, per the "polymorphic devices" design note.

pub mod banked_b;
pub mod bankswitch;
pub mod dpc;
pub mod factory;
pub mod flat;
pub mod mnetwork;
pub mod parker;
pub mod snoop_fe;
pub mod tigervision;

use crate::core::bus::BusContext;

/// Configuration error raised at machine construction (SPEC_FULL.md §7.1).
/// No external error crate — matches this lineage's hand-written
/// `RomLoadError` convention (`Display` + `std::error::Error`, no `thiserror`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartError {
    UnknownCartType(String),
    RomTooSmall { expected_at_least: usize, actual: usize },
    BadBiosSize(usize),
}

impl std::fmt::Display for CartError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CartError::UnknownCartType(tag) => write!(f, "unknown cart-type tag: {tag}"),
            CartError::RomTooSmall { expected_at_least, actual } => write!(
                f,
                "ROM too small for declared mapper: expected at least {expected_at_least} bytes, got {actual}"
            ),
            CartError::BadBiosSize(size) => {
                write!(f, "BIOS size {size} is not one of 4096, 16384")
            }
        }
    }
}

impl std::error::Error for CartError {}

/// The cartridge device contract (SPEC_FULL.md §4.6).
pub trait Cartridge {
    fn read(&mut self, ctx: BusContext, addr: u16) -> u8;
    fn write(&mut self, ctx: BusContext, addr: u16, data: u8);
    fn reset(&mut self);

    fn frame_begin(&mut self) {}
    fn frame_end(&mut self) {}

    /// Advises the composer this cart needs to see every bus transaction
    /// (data-bus-snooping mappers: Bus-Snoop FE, Tigervision 3F).
    fn wants_snoop(&self) -> bool {
        false
    }

    /// Canonical bank/RAM state for the save-state ledger (SPEC_FULL.md §6).
    /// Empty for carts with no mutable state (e.g. a flat, unbanked ROM).
    fn snapshot(&self) -> Vec<u8> {
        Vec::new()
    }

    /// Restore from bytes produced by `snapshot`. Returns false (no partial
    /// application) on length mismatch.
    fn restore(&mut self, data: &[u8]) -> bool {
        data.is_empty()
    }
}
