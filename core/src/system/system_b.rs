//! System-B (7800-ProSystem-like) composer.

use crate::cartridge::Cartridge;
use crate::core::address_space::AddressSpace;
use crate::core::bus::{Bus, BusContext, BusMaster, InterruptState};
use crate::core::machine::Machine;
use crate::core::{FrameBuffer, InputState};
use crate::cpu::M6502;
use crate::device::IoTimerChip;
use crate::types::{ControllerKind, InputTag, LIGHT_GUN_ADJUST, MachineConfig, SystemKind};
use crate::dpu::DpuB;

/// Four-position gray code a driving controller's quadrature wheel cycles
/// through; `Driving0..Driving3` each select one absolute position rather
/// than an increment/decrement, which keeps the host side stateless.
const DRIVING_GRAY_CODE: [u8; 4] = [0b00, 0b01, 0b11, 0b10];

fn driving_bits(input: &InputState, player: usize) -> u8 {
    const TAGS: [InputTag; 4] =
        [InputTag::Driving0, InputTag::Driving1, InputTag::Driving2, InputTag::Driving3];
    for (i, tag) in TAGS.into_iter().enumerate() {
        if input.captured_action(player, tag) {
            return DRIVING_GRAY_CODE[i];
        }
    }
    0
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Tag {
    Dpu,
    IoTimer,
    Ram,
    Cart,
}

/// Nominal dot clocks per scanline (SPEC_FULL.md §4.5's DPU-B DMA accounting
/// plus the GLOSSARY's "1 CPU cycle = 4 DPU clocks"); the real chip's 454
/// clocks alternate 113/114 CPU cycles per line, a fractional-cycle quirk
/// this engine rounds down rather than models exactly (see DESIGN.md).
const DOT_CLOCKS_PER_SCANLINE: i64 = 452;

/// Base address of the RIOT-style I/O timer chip (C4), matching the
/// original lineage's placement; the chip's own bit-9/low-3-bits decode
/// (see `device::io_timer`) is preserved unmodified by mapping it into a
/// 1024-byte window here and subtracting the base before dispatch.
const IO_TIMER_BASE: u16 = 0x0280;

/// Console RAM window (not cart/BIOS memory): 4 KiB, mirrored nowhere else
/// in this simplified memory map.
const RAM_BASE: u16 = 0x1800;
const RAM_SIZE: u32 = 0x1000;

struct PeripheralsB {
    space: AddressSpace<Tag>,
    io: IoTimerChip,
    dpu: DpuB,
    cart: Box<dyn Cartridge>,
    bios: Option<Vec<u8>>,
    bios_base: u16,
    ram: Vec<u8>,
    fb: FrameBuffer,
    input: InputState,
    controllers: [ControllerKind; 2],
    /// Dot-clock position within the current scanline, set by the composer
    /// before each CPU cycle; used only for light-gun sensing.
    dot_clock: i64,
    /// Bridges `DpuB::write`'s WSYNC-triggered `preempt` flag back to the
    /// composer, which doesn't own the CPU from inside this struct's `Bus`
    /// impl (DESIGN.md, "cyclic device graph").
    scanline_preempt: bool,
}

impl PeripheralsB {
    fn bus_context(&self) -> BusContext {
        let mut io_port_b = self.io.port_b_value();
        for (player, bit) in [(0usize, 5u8), (1, 4u8)] {
            if self.controllers[player] == ControllerKind::ProLineJoystick
                && self.input.captured_action(player, InputTag::Fire2)
            {
                io_port_b &= !(1 << bit);
            }
        }
        BusContext { last_bus_value: self.space.bus_value(), io_port_b }
    }

    fn sync_controller_inputs(&mut self) {
        let mut porta = 0xFFu8;
        for (player, bits) in [(0usize, [7u8, 6, 5, 4]), (1, [3, 2, 1, 0])] {
            if self.controllers[player] == ControllerKind::Driving {
                let code = driving_bits(&self.input, player);
                if code & 0b01 != 0 {
                    porta &= !(1 << bits[2]);
                }
                if code & 0b10 != 0 {
                    porta &= !(1 << bits[3]);
                }
                continue;
            }
            for (tag, bit) in
                [InputTag::Right, InputTag::Left, InputTag::Down, InputTag::Up].into_iter().zip(bits)
            {
                if self.input.captured_action(player, tag) {
                    porta &= !(1 << bit);
                }
            }
        }
        self.io.set_port_a_input(porta);
        self.io.set_port_b_input(self.input.console_switches());
    }

    fn dpu_controller_trigger(&self, idx: usize) -> bool {
        match idx {
            0 | 1 => self.light_gun_sensed(idx),
            4 => !self.input.captured_action(0, InputTag::Fire),
            5 => !self.input.captured_action(1, InputTag::Fire),
            _ => true,
        }
    }

    /// Light-gun sensing on the otherwise-idle INPT0/INPT1 paddle lines:
    /// reads high except during the dot-clock window the captured target
    /// position falls in on the current scanline.
    fn light_gun_sensed(&self, player: usize) -> bool {
        if self.controllers[player] != ControllerKind::LightGun {
            return true;
        }
        let (scanline, hpos) = self.input.captured_light_gun(player);
        let target_dot = (hpos as f64 * LIGHT_GUN_ADJUST) as i64;
        self.dpu.scanline() == scanline as usize && (self.dot_clock - target_dot).abs() < 4
    }

    // BIOS window always extends to the top of the address space
    // (SPEC_FULL.md §2.2, "a real address-space remap").
    fn bios_covers(&self, addr: u16) -> bool {
        self.bios.is_some() && self.dpu.bios_mapped() && addr >= self.bios_base
    }
}

impl Bus for PeripheralsB {
    type Address = u16;
    type Data = u8;

    fn read(&mut self, _master: BusMaster, addr: u16) -> u8 {
        if self.bios_covers(addr) {
            let bios = self.bios.as_ref().unwrap();
            let offset = (addr - self.bios_base) as usize % bios.len();
            let value = bios[offset];
            self.space.latch(value);
            return value;
        }

        let tag = self.space.tag_for(addr);
        let value = match tag {
            Some(Tag::Dpu) => self.dpu.read(addr, |idx| self.dpu_controller_trigger(idx)),
            Some(Tag::IoTimer) => {
                self.io.read(addr.wrapping_sub(IO_TIMER_BASE), 0)
            }
            Some(Tag::Ram) => self.ram[(addr - RAM_BASE) as usize],
            Some(Tag::Cart) => {
                let ctx = self.bus_context();
                self.cart.read(ctx, addr)
            }
            None => 0,
        };
        if self.space.snooper() == Some(Tag::Cart) && tag != Some(Tag::Cart) {
            let ctx = self.bus_context();
            let _ = self.cart.read(ctx, addr);
        }
        self.space.latch(value);
        value
    }

    fn write(&mut self, _master: BusMaster, addr: u16, data: u8) {
        if self.bios_covers(addr) {
            // BIOS is a ROM window; writes that land on it are dropped.
            self.space.latch(data);
            return;
        }

        let tag = self.space.tag_for(addr);
        match tag {
            Some(Tag::Dpu) => {
                self.dpu.write(addr, data);
                if self.dpu.preempt {
                    self.scanline_preempt = true;
                }
            }
            Some(Tag::IoTimer) => self.io.write(addr.wrapping_sub(IO_TIMER_BASE), data, 0),
            Some(Tag::Ram) => self.ram[(addr - RAM_BASE) as usize] = data,
            Some(Tag::Cart) => {
                let ctx = self.bus_context();
                self.cart.write(ctx, addr, data);
            }
            None => {}
        }
        if self.space.snooper() == Some(Tag::Cart) && tag != Some(Tag::Cart) {
            let ctx = self.bus_context();
            self.cart.write(ctx, addr, data);
        }
        self.space.latch(data);
    }

    fn is_halted_for(&self, _master: BusMaster) -> bool {
        false
    }

    fn check_interrupts(&self, _target: BusMaster) -> InterruptState {
        InterruptState::default()
    }
}

pub struct SystemBBoard {
    kind: SystemKind,
    cpu: M6502,
    peripherals: PeripheralsB,
    halted: bool,
}

impl SystemBBoard {
    pub fn new(config: MachineConfig, cart: Box<dyn Cartridge>) -> Self {
        let kind = config.kind;
        let bios = config.bios;
        let wants_snoop = cart.wants_snoop();
        // 16-bit address space, 128-byte pages (keeps the I/O timer's RIOT
        // base page-aligned at 0x0280).
        let mut space: AddressSpace<Tag> = AddressSpace::new(16, 7);
        space.map(0x0000, 0x0080, Tag::Dpu);
        space.map(IO_TIMER_BASE, 0x0400, Tag::IoTimer);
        space.map(RAM_BASE, RAM_SIZE, Tag::Ram);
        space.map(0x4000, 0xC000, Tag::Cart);
        if wants_snoop {
            space.install_snooper(Tag::Cart);
        }

        let bios_base = bios.as_ref().map_or(0, |b| (0x10000 - b.len()) as u16);

        let pitch = 320;
        let scanlines = kind.total_scanlines();
        let mut board = Self {
            kind,
            cpu: M6502::with_budget_multiplier(4),
            peripherals: PeripheralsB {
                space,
                io: IoTimerChip::new(),
                dpu: DpuB::new(0, scanlines),
                cart,
                bios,
                bios_base,
                ram: vec![0; RAM_SIZE as usize],
                fb: FrameBuffer::new(pitch, scanlines),
                input: InputState::new(),
                controllers: config.controllers,
                dot_clock: 0,
                scanline_preempt: false,
            },
            halted: false,
        };
        board.reset();
        board
    }

    /// Run one scanline: DMA first (billing clocks into the CPU's budget
    /// for this line, per SPEC_FULL.md §4.5 "Per scanline"), then the CPU
    /// for whatever's left.
    fn run_scanline(&mut self) {
        // DMA reads never target the DPU's own register file or the frame
        // buffer, so `dpu`/`fb` can be split out from the rest of
        // `PeripheralsB` and handed to `step_scanline` while the closure
        // below dispatches through the (disjoint) remaining fields — no
        // raw pointers needed.
        let bios_mapped = self.peripherals.dpu.bios_mapped();
        let (billed, nmi, sample) = {
            let PeripheralsB { dpu, fb, cart, io, space, ram, bios, bios_base, .. } =
                &mut self.peripherals;
            let mut dma_read = |addr: u16| -> u8 {
                if bios_mapped {
                    if let Some(bytes) = bios.as_ref() {
                        if addr >= *bios_base {
                            return bytes[(addr - *bios_base) as usize % bytes.len()];
                        }
                    }
                }
                match space.tag_for(addr) {
                    Some(Tag::IoTimer) => io.read(addr.wrapping_sub(IO_TIMER_BASE), 0),
                    Some(Tag::Ram) => ram[(addr - RAM_BASE) as usize],
                    Some(Tag::Cart) => {
                        let ctx = BusContext {
                            last_bus_value: space.bus_value(),
                            io_port_b: io.port_b_value(),
                        };
                        cart.read(ctx, addr)
                    }
                    _ => 0,
                }
            };
            let (billed, nmi) = dpu.step_scanline(&mut dma_read, fb);
            let sample = dpu.audio.tick();
            (billed, nmi, sample)
        };

        if nmi {
            self.cpu.nmi_raise();
        }

        let scanline = self.peripherals.dpu.scanline().saturating_sub(1) % self.kind.total_scanlines();
        self.peripherals.fb.write_audio_sample(scanline, sample);

        let budget = (DOT_CLOCKS_PER_SCANLINE - i64::from(billed)).max(0) / i64::from(self.cpu.k);
        self.peripherals.scanline_preempt = false;
        let mut remaining = budget;
        while remaining > 0 && !self.peripherals.scanline_preempt && !self.cpu.jammed {
            self.peripherals.dot_clock = i64::from(billed) + (budget - remaining) * i64::from(self.cpu.k);
            self.cpu.execute_cycle(&mut self.peripherals, BusMaster::Cpu);
            self.cpu.clock = self.cpu.clock.wrapping_add(self.cpu.k as i64);
            remaining -= 1;
        }
    }
}

impl Machine for SystemBBoard {
    fn display_pitch(&self) -> usize {
        self.peripherals.fb.pitch()
    }

    fn total_scanlines(&self) -> usize {
        self.peripherals.fb.scanlines()
    }

    fn compute_next_frame(&mut self) {
        if self.halted || self.cpu.jammed {
            return;
        }
        self.peripherals.input.capture();
        self.peripherals.sync_controller_inputs();
        self.peripherals.cart.frame_begin();
        self.peripherals.dpu.frame_begin();

        let total_scanlines = self.kind.total_scanlines();
        while self.peripherals.dpu.scanline() < total_scanlines && !self.cpu.jammed {
            self.run_scanline();
        }
        self.peripherals.cart.frame_end();
    }

    fn video_buffer(&self) -> &[u8] {
        self.peripherals.fb.video()
    }

    fn audio_buffer(&self) -> &[u8] {
        self.peripherals.fb.audio()
    }

    fn raise_input(&mut self, player: usize, tag: InputTag, down: bool) {
        self.peripherals.input.raise_input(player, tag, down);
    }

    fn set_ohms(&mut self, player: usize, ohms: u16) {
        self.peripherals.input.set_ohms(player, ohms);
    }

    fn set_light_gun(&mut self, player: usize, scanline: u16, hpos: u16) {
        self.peripherals.input.set_light_gun(player, scanline, hpos);
    }

    fn reset(&mut self) {
        self.peripherals.io.reset();
        self.peripherals.dpu.reset();
        self.peripherals.cart.reset();
        self.halted = false;
        self.cpu.reset_vector(&mut self.peripherals);
    }

    fn jammed(&self) -> bool {
        self.cpu.jammed
    }

    fn halted(&self) -> bool {
        self.halted
    }

    fn snapshot(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&[
            self.cpu.pc as u8,
            (self.cpu.pc >> 8) as u8,
            self.cpu.a,
            self.cpu.x,
            self.cpu.y,
            self.cpu.sp,
            self.cpu.p,
            0,
        ]);
        out.extend_from_slice(&self.cpu.clock.to_le_bytes());
        out.push(self.peripherals.space.bus_value());
        out.extend_from_slice(&self.peripherals.cart.snapshot());
        out
    }

    fn restore(&mut self, data: &[u8]) -> bool {
        if data.len() < 17 {
            return false;
        }
        self.cpu.pc = u16::from(data[0]) | (u16::from(data[1]) << 8);
        self.cpu.a = data[2];
        self.cpu.x = data[3];
        self.cpu.y = data[4];
        self.cpu.sp = data[5];
        self.cpu.p = data[6];
        self.cpu.clock = i64::from_le_bytes(data[8..16].try_into().unwrap());
        self.peripherals.space.latch(data[16]);
        self.peripherals.cart.restore(&data[17..])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cartridge::flat::FlatRom;

    fn test_peripherals(controllers: [ControllerKind; 2]) -> PeripheralsB {
        let mut space: AddressSpace<Tag> = AddressSpace::new(16, 7);
        space.map(0x0000, 0x0080, Tag::Dpu);
        space.map(IO_TIMER_BASE, 0x0400, Tag::IoTimer);
        space.map(RAM_BASE, RAM_SIZE, Tag::Ram);
        space.map(0x4000, 0xC000, Tag::Cart);
        PeripheralsB {
            space,
            io: IoTimerChip::new(),
            dpu: DpuB::new(0, 262),
            cart: Box::new(FlatRom::new(vec![0u8; 0x2000], 0x4000)),
            bios: None,
            bios_base: 0,
            ram: vec![0; RAM_SIZE as usize],
            fb: FrameBuffer::new(320, 262),
            input: InputState::new(),
            controllers,
            dot_clock: 0,
            scanline_preempt: false,
        }
    }

    #[test]
    fn driving_controller_reports_gray_code_on_porta() {
        let mut p = test_peripherals([ControllerKind::Driving, ControllerKind::Joystick]);
        p.input.raise_input(0, InputTag::Driving2, true);
        p.input.capture();
        p.sync_controller_inputs();
        let porta = p.io.read(IO_TIMER_BASE, 0);
        assert_eq!(porta & 0b0011_0000, 0);
        assert_eq!(porta & 0b1100_0000, 0b1100_0000);
    }

    #[test]
    fn proline_second_fire_button_pulls_unused_portb_bit_low() {
        let mut p = test_peripherals([ControllerKind::ProLineJoystick, ControllerKind::Joystick]);
        p.io.set_port_b_input(0xFF);
        p.input.raise_input(0, InputTag::Fire2, true);
        p.input.capture();
        let ctx = p.bus_context();
        assert_eq!(ctx.io_port_b & (1 << 5), 0);
    }

    #[test]
    fn light_gun_senses_on_the_target_scanline_only() {
        let mut p = test_peripherals([ControllerKind::LightGun, ControllerKind::Joystick]);
        p.input.set_light_gun(0, 3, 10);
        p.input.capture();
        p.dpu.frame_begin();
        for _ in 0..3 {
            p.dpu.step_scanline(&mut |_| 0, &mut p.fb);
        }
        let target_dot = (10f64 * LIGHT_GUN_ADJUST) as i64;
        p.dot_clock = target_dot;
        assert!(p.light_gun_sensed(0));
        p.dot_clock = target_dot + 20;
        assert!(!p.light_gun_sensed(0));
    }
}
