/// Identifies who is accessing the bus: the CPU's own fetch/execute stream,
/// or the display processor's DMA pass (which reads graphics data directly,
/// interleaved with but distinct from CPU execution).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BusMaster {
    Cpu,
    Dma,
}

/// Generic bus interface supporting halt/arbitration.
pub trait Bus {
    type Address: Copy + Into<u64>;
    type Data;

    fn read(&mut self, master: BusMaster, addr: Self::Address) -> Self::Data;
    fn write(&mut self, master: BusMaster, addr: Self::Address, data: Self::Data);

    /// True if `master` must pause before its next bus cycle. Unused by this
    /// engine's CPU (DMA cost is billed to the CPU's cycle budget rather than
    /// pausing it bus-cycle-by-bus-cycle) but kept for uniformity with the
    /// generic bus contract.
    fn is_halted_for(&self, master: BusMaster) -> bool;

    /// Generic interrupt query, unused by this engine: NMI/IRQ are delivered
    /// to the CPU directly via `nmi_raise`/`irq_assert` by the composer.
    fn check_interrupts(&self, target: BusMaster) -> InterruptState;
}

#[derive(Default, Clone, Copy, Debug)]
pub struct InterruptState {
    pub nmi: bool,
    pub irq: bool,
}

/// Ambient information the owning machine hands a cartridge alongside an
/// address, resolving the cyclic reference a cartridge would otherwise need
/// to the machine (see DESIGN.md, "cyclic device graph").
#[derive(Clone, Copy, Debug, Default)]
pub struct BusContext {
    /// Value last observed on the data bus (read result or write value),
    /// consulted by data-bus-snooping mappers (Bus-Snoop FE, Tigervision 3F).
    pub last_bus_value: u8,

    /// Current PORTB reading of the I/O timer chip, consulted by carts that
    /// multiplex a ProLine second fire button onto a console-switch bit
    /// (SPEC_FULL.md §2.2).
    pub io_port_b: u8,
}
