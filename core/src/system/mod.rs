//! System composer (C11): wires the address space (C2), CPU (C3), I/O timer
//! (C4), VSC-A or DPU-B (C5/C6), POKEY (C7, certain System-B carts), cart
//! (C8), frame buffer (C9), and input state (C10) into one [`Machine`].
//!
//! Split into one module per console family because the two differ in
//! address width, DMA model, and what's wired at all (System-A has no DPU;
//! System-B's cart family may or may not carry a POKEY) — the shared parts
//! (CPU stepping, input capture, snapshot concatenation order) are
//! duplicated rather than abstracted behind a trait, matching the teacher's
//! preference for one composer struct per concrete machine over a generic
//! one.

pub mod system_a;
pub mod system_b;

pub use system_a::SystemABoard;
pub use system_b::SystemBBoard;
