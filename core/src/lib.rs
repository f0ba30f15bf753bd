pub mod cartridge;
pub mod core;
pub mod cpu;
pub mod device;
pub mod dpu;
pub mod system;
pub mod types;
pub mod vsc;

pub mod prelude {
    pub use crate::cartridge::{CartError, Cartridge};
    pub use crate::core::machine::Machine;
    pub use crate::core::{
        Bus, BusMaster, BusMasterComponent, Component, FrameBuffer, InputState, bus::InterruptState,
    };
    pub use crate::cpu::Cpu;
    pub use crate::types::{
        CartType, CollisionMask, CollisionPairMask, ConsoleSwitch, ControllerKind, InputTag,
        SystemKind,
    };
}
