use crate::types::InputTag;

/// Machine-agnostic interface exposed by both the System-A and System-B
/// composers. The frontend is a pure consumer: it never touches a PIA, VSC,
/// or DPU register directly.
pub trait Machine {
    /// Palette-indexed video row pitch in bytes (160 for System A, 320 for
    /// System B double-width modes notwithstanding — the DPU always writes
    /// full 320-byte lines and halves are used for 160-pixel modes).
    fn display_pitch(&self) -> usize;

    /// Number of scanlines in the frame buffer (NTSC/PAL dependent).
    fn total_scanlines(&self) -> usize;

    /// Advance emulation by exactly one video frame. No inputs beyond
    /// machine state; writes into the frame buffer returned by
    /// [`Machine::video_buffer`] / [`Machine::audio_buffer`].
    fn compute_next_frame(&mut self);

    /// Palette-indexed video bytes for the frame just computed. Length is
    /// always `display_pitch() * total_scanlines()`.
    fn video_buffer(&self) -> &[u8];

    /// One little-endian 16-bit PCM sample per scanline for the frame just
    /// computed. Length is always `2 * total_scanlines()`.
    fn audio_buffer(&self) -> &[u8];

    /// Host-side input injection: writes to the staging array, captured at
    /// the next `compute_next_frame`.
    fn raise_input(&mut self, player: usize, tag: InputTag, down: bool);

    /// Paddle position in ohms (0..=1_000_000), staged like `raise_input`.
    fn set_ohms(&mut self, player: usize, ohms: u16);

    /// Light-gun sample point, staged like `raise_input`.
    fn set_light_gun(&mut self, player: usize, scanline: u16, hpos: u16);

    /// Reset the machine to its initial power-on state, clearing `jammed`
    /// and `halted`.
    fn reset(&mut self);

    /// True once the CPU has executed a KIL opcode; frame steps are no-ops
    /// until `reset`.
    fn jammed(&self) -> bool;

    /// True once the composer has latched an internal invariant violation;
    /// frame steps are no-ops until `reset`.
    fn halted(&self) -> bool;

    /// Serialize canonical device state in the documented order (see
    /// SPEC_FULL.md §6, "Snapshot").
    fn snapshot(&self) -> Vec<u8>;

    /// Restore from a snapshot produced by `snapshot`. Rejects (returns
    /// false, no partial application) on any length mismatch.
    fn restore(&mut self, data: &[u8]) -> bool;
}
