//! Cartridge construction and ROM loading glue between a raw ROM file and a
//! runnable [`Machine`].

pub mod rom_loader;

pub use rom_loader::{RomLoadError, guess_cart_type, load_file};

use phosphor_core::cartridge::{CartError, factory};
use phosphor_core::core::machine::Machine;
use phosphor_core::system::{SystemABoard, SystemBBoard};
use phosphor_core::types::{CartType, MachineConfig};

/// Build a runnable machine from a [`MachineConfig`] (console/timing, BIOS,
/// controller ports), a cart-type tag, and ROM bytes.
pub fn build_machine(
    config: MachineConfig,
    cart_type: CartType,
    rom: Vec<u8>,
) -> Result<Box<dyn Machine>, CartError> {
    let cart = factory::create(cart_type, rom)?;
    Ok(if config.kind.is_system_b() {
        Box::new(SystemBBoard::new(config, cart))
    } else {
        Box::new(SystemABoard::new(config, cart))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use phosphor_core::types::SystemKind;

    #[test]
    fn builds_system_a_machine_from_flat_rom() {
        let rom = vec![0u8; 0x800];
        let config = MachineConfig::new(SystemKind::SystemANtsc);
        let machine = build_machine(config, CartType::A2K, rom).unwrap();
        assert_eq!(machine.display_pitch(), 160);
    }

    #[test]
    fn builds_system_b_machine_from_flat_rom() {
        let rom = vec![0u8; 0x2000];
        let config = MachineConfig::new(SystemKind::SystemBNtsc);
        let machine = build_machine(config, CartType::B8K, rom).unwrap();
        assert_eq!(machine.display_pitch(), 320);
    }
}
