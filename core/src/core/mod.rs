pub mod address_space;
pub mod bus;
pub mod component;
pub mod frame_buffer;
pub mod input_state;
pub mod machine;

pub use address_space::AddressSpace;
pub use bus::{Bus, BusContext, BusMaster, InterruptState};
pub use component::{BusMasterComponent, Component};
pub use frame_buffer::FrameBuffer;
pub use input_state::InputState;
pub use machine::Machine;
