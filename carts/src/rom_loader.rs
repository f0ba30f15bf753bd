//! ROM file loading for the Atari-style cartridges this workspace emulates.
//!
//! Per SPEC_FULL.md §6, header/cart-type detection is an external
//! collaborator's job; the core crate only ever consumes a raw ROM byte
//! sequence plus a pre-decided [`CartType`]. This module is that thin
//! external layer: read a file from disk, strip the optional 128-byte
//! "ATARI7800" header if present, and return the bare cartridge bytes.

use std::path::Path;

use phosphor_core::types::CartType;

#[derive(Debug)]
pub enum RomLoadError {
    Io(std::io::Error),
    Empty,
}

impl std::fmt::Display for RomLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Empty => write!(f, "ROM file is empty"),
        }
    }
}

impl std::error::Error for RomLoadError {}

impl From<std::io::Error> for RomLoadError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

const HEADER_LEN: usize = 128;
const HEADER_SIGNATURE: &[u8] = b"ATARI7800";
const HEADER_SIGNATURE_OFFSET: usize = 1;

/// Strip the optional 128-byte header, if its signature is present.
fn strip_header(bytes: &[u8]) -> &[u8] {
    if bytes.len() > HEADER_LEN {
        let sig_end = HEADER_SIGNATURE_OFFSET + HEADER_SIGNATURE.len();
        if sig_end <= HEADER_LEN
            && bytes[HEADER_SIGNATURE_OFFSET..sig_end] == *HEADER_SIGNATURE
        {
            return &bytes[HEADER_LEN..];
        }
    }
    bytes
}

/// Read a cartridge image from disk, stripping the header if present.
pub fn load_file(path: &Path) -> Result<Vec<u8>, RomLoadError> {
    let raw = std::fs::read(path)?;
    if raw.is_empty() {
        return Err(RomLoadError::Empty);
    }
    Ok(strip_header(&raw).to_vec())
}

/// Infer a [`CartType`] from size alone, per SPEC_FULL.md §6's "if no
/// header: infer from size" fallback. Callers with header or file-extension
/// information should prefer that over this guess.
pub fn guess_cart_type(is_system_b: bool, size: usize) -> CartType {
    if is_system_b {
        match size {
            0..=0x2000 => CartType::B8K,
            0x2001..=0x4000 => CartType::B16K,
            0x4001..=0x8000 => CartType::B32K,
            0x8001..=0xC000 => CartType::B48K,
            _ => CartType::B128K,
        }
    } else {
        match size {
            0..=0x0800 => CartType::A2K,
            0x0801..=0x1000 => CartType::A4K,
            0x1001..=0x2000 => CartType::A8K,
            0x2001..=0x3000 => CartType::Cbs12K,
            0x3001..=0x4000 => CartType::A16K,
            _ => CartType::A32K,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_header_when_signature_present() {
        let mut raw = vec![0u8; HEADER_LEN + 16];
        raw[1..10].copy_from_slice(HEADER_SIGNATURE);
        raw[HEADER_LEN] = 0x42;
        let stripped = strip_header(&raw);
        assert_eq!(stripped.len(), 16);
        assert_eq!(stripped[0], 0x42);
    }

    #[test]
    fn leaves_headerless_rom_untouched() {
        let raw = vec![0x11u8, 0x22, 0x33];
        assert_eq!(strip_header(&raw), &raw[..]);
    }

    #[test]
    fn guesses_8k_for_system_a() {
        assert_eq!(guess_cart_type(false, 0x2000), CartType::A8K);
    }
}
