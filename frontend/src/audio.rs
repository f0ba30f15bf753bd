//! Audio buffer export: the frame buffer's one-16-bit-sample-per-scanline
//! stream, dumped as headerless raw PCM (mono, little-endian). No playback
//! device here — this frontend is headless.

use std::io::Write;
use std::path::Path;

pub fn write_pcm(path: &Path, buffer: &[u8]) -> std::io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    file.write_all(buffer)
}

/// Append one frame's audio to an already-open output file.
pub fn append_pcm(file: &mut std::fs::File, buffer: &[u8]) -> std::io::Result<()> {
    file.write_all(buffer)
}
