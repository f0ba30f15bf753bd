//! ROM and BIOS file resolution for the command line: load the cartridge
//! image, strip its header if present, and fall back to a size-based
//! cart-type guess when the caller didn't pass `--cart-type`.

use std::path::Path;

use phosphor_carts::{RomLoadError, guess_cart_type, load_file};
use phosphor_core::types::CartType;

pub fn load_cart_rom(path: &Path) -> Result<Vec<u8>, RomLoadError> {
    load_file(path)
}

pub fn load_bios(path: &Path) -> std::io::Result<Vec<u8>> {
    std::fs::read(path)
}

pub fn resolve_cart_type(explicit: Option<CartType>, is_system_b: bool, rom_len: usize) -> CartType {
    explicit.unwrap_or_else(|| guess_cart_type(is_system_b, rom_len))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_cart_type_wins_over_guess() {
        let resolved = resolve_cart_type(Some(CartType::A4K), false, 0x2000);
        assert_eq!(resolved, CartType::A4K);
    }

    #[test]
    fn falls_back_to_size_guess() {
        let resolved = resolve_cart_type(None, false, 0x800);
        assert_eq!(resolved, CartType::A2K);
    }
}
