use super::bus::BusMaster;

/// A clock-domain participant that advances one step per call.
pub trait Component {
    /// Advance by one tick. Returns true at a natural boundary (e.g. the CPU
    /// returns true between instructions, at `Fetch`).
    fn tick(&mut self) -> bool;

    /// Number of base clocks this component consumes per `tick`. 1 unless
    /// the component runs at a divided rate of the master clock.
    fn clock_divider(&self) -> u64 {
        1
    }
}

/// A [`Component`] that needs bus access to advance (the CPU, chiefly).
pub trait BusMasterComponent: Component {
    type Bus: super::bus::Bus + ?Sized;

    fn tick_with_bus(&mut self, bus: &mut Self::Bus, master: BusMaster) -> bool;
}
