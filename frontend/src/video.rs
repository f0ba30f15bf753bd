//! Video buffer export. No windowing toolkit here, so "present" means
//! writing the palette-indexed frame buffer to disk as a grayscale PGM —
//! each palette index is used directly as luma, since this crate doesn't
//! own an NTSC/PAL color-decoder lookup table.

use std::io::Write;
use std::path::Path;

pub fn write_pgm(path: &Path, buffer: &[u8], width: usize, height: usize) -> std::io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    write!(file, "P5\n{width} {height}\n255\n")?;
    file.write_all(&buffer[..width * height])?;
    Ok(())
}
