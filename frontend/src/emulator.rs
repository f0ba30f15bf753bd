//! The frame-stepping loop itself. Headless: no window, no event pump —
//! just drive `Machine::compute_next_frame` for the requested frame count,
//! applying an optional input script along the way.

use log::info;
use phosphor_core::core::machine::Machine;

use crate::input::InputScript;

pub struct RunStats {
    pub frames_run: u32,
    pub jammed: bool,
    pub halted: bool,
}

pub fn run_frames(machine: &mut dyn Machine, frames: u32, script: Option<&InputScript>) -> RunStats {
    let mut frames_run = 0;
    for frame in 0..frames {
        if machine.jammed() || machine.halted() {
            info!(
                "stopped after {frames_run} frames (jammed={}, halted={})",
                machine.jammed(),
                machine.halted()
            );
            break;
        }
        if let Some(script) = script {
            script.apply(machine, frame as usize);
        }
        machine.compute_next_frame();
        frames_run += 1;
    }
    RunStats { frames_run, jammed: machine.jammed(), halted: machine.halted() }
}
