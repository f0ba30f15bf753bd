//! System-A (2600-VCS-like) composer.

use crate::cartridge::Cartridge;
use crate::core::address_space::AddressSpace;
use crate::core::bus::{Bus, BusContext, BusMaster, InterruptState};
use crate::core::machine::Machine;
use crate::core::{FrameBuffer, InputState};
use crate::cpu::M6502;
use crate::device::IoTimerChip;
use crate::types::{ControllerKind, InputTag, LIGHT_GUN_ADJUST, MachineConfig, SystemKind};
use crate::vsc::VscA;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Tag {
    IoTimer,
    Vsc,
    Cart,
}

const COLOR_CLOCKS_PER_CYCLE: i64 = 3;

/// Matches `vsc::HBLANK`/`vsc::SCANLINE_CLOCKS` (kept as a local copy since
/// those are private to the VSC-A module, same as `compute_next_frame`'s own
/// `228` literal below).
const HBLANK_A: i64 = 68;
const SCANLINE_CLOCKS_A: i64 = 228;

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

/// Everything the CPU's bus cycles touch except the CPU itself — split out
/// so `cpu.step_one` can borrow this mutably while `cpu` stays a sibling
/// field on [`SystemABoard`] (see DESIGN.md, "cyclic device graph").
struct PeripheralsA {
    space: AddressSpace<Tag>,
    io: IoTimerChip,
    vsc: VscA,
    cart: Box<dyn Cartridge>,
    fb: FrameBuffer,
    input: InputState,
    controllers: [ControllerKind; 2],
    /// Frame-relative color-clock value at the start of the CPU cycle about
    /// to execute, set by the composer before each `execute_cycle` call.
    color_clock: i64,
    wsync_requested: bool,
}

impl PeripheralsA {
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
        // INPT4/5: fire-button dump lines, open-high (pulled low when pressed).
        self.vsc.set_inpt(4, !self.input.captured_action(0, InputTag::Fire));
        self.vsc.set_inpt(5, !self.input.captured_action(1, InputTag::Fire));
    }

    /// Light-gun sensing: pulses INPT0/INPT1 (otherwise idle paddle lines)
    /// true for the cycle the beam passes the captured target position.
    fn update_light_gun(&mut self) {
        for (player, inpt_line) in [(0usize, 0usize), (1, 1)] {
            if self.controllers[player] != ControllerKind::LightGun {
                continue;
            }
            let (scanline, hpos) = self.input.captured_light_gun(player);
            let target = scanline as i64 * SCANLINE_CLOCKS_A
                + HBLANK_A
                + (hpos as f64 * LIGHT_GUN_ADJUST) as i64;
            let sensed = (self.vsc.clock() - target).abs() < COLOR_CLOCKS_PER_CYCLE;
            self.vsc.set_inpt(inpt_line, sensed);
        }
    }

    /// Paddle pot readout: two paddles share each controller port, landing
    /// on INPT0/INPT1 (port 0) and INPT2/INPT3 (port 1).
    fn update_paddles(&mut self) {
        for player in 0..4usize {
            let port = player / 2;
            if self.controllers[port] != ControllerKind::Paddles {
                continue;
            }
            let ohms = self.input.captured_ohms(player);
            let charged = self.vsc.paddle_charged(ohms);
            self.vsc.set_inpt(player, charged);
        }
    }
}

impl Bus for PeripheralsA {
    type Address = u16;
    type Data = u8;

    fn read(&mut self, _master: BusMaster, addr: u16) -> u8 {
        let tag = self.space.tag_for(addr);
        let value = match tag {
            Some(Tag::IoTimer) => self.io.read(addr, self.color_clock),
            Some(Tag::Vsc) => self.vsc.read(addr, self.color_clock, &mut self.fb),
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
        let tag = self.space.tag_for(addr);
        match tag {
            Some(Tag::IoTimer) => self.io.write(addr, data, self.color_clock),
            Some(Tag::Vsc) => {
                if addr & 0x3F == 0x02 {
                    self.wsync_requested = true;
                }
                self.vsc.write(addr, data, self.color_clock, &mut self.fb);
            }
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

pub struct SystemABoard {
    kind: SystemKind,
    cpu: M6502,
    peripherals: PeripheralsA,
    halted: bool,
}

impl SystemABoard {
    pub fn new(config: MachineConfig, cart: Box<dyn Cartridge>) -> Self {
        let kind = config.kind;
        let wants_snoop = cart.wants_snoop();
        let mut space: AddressSpace<Tag> = AddressSpace::new(13, 6);
        space.map(0x0000, 0x0040, Tag::Vsc);
        space.map(0x0080, 0x0080, Tag::IoTimer);
        space.map(0x0280, 0x0040, Tag::IoTimer);
        space.map(0x1000, 0x1000, Tag::Cart);
        if wants_snoop {
            space.install_snooper(Tag::Cart);
        }

        let pitch = 160;
        let scanlines = kind.total_scanlines();
        let mut board = Self {
            kind,
            cpu: M6502::new(),
            peripherals: PeripheralsA {
                space,
                io: IoTimerChip::new(),
                vsc: VscA::new(),
                cart,
                fb: FrameBuffer::new(pitch, scanlines),
                input: InputState::new(),
                controllers: config.controllers,
                color_clock: 0,
                wsync_requested: false,
            },
            halted: false,
        };
        board.reset();
        board
    }

    fn run_cycle(&mut self) {
        self.peripherals.color_clock = self.cpu.clock * COLOR_CLOCKS_PER_CYCLE;
        self.peripherals.wsync_requested = false;
        self.peripherals.update_light_gun();
        self.peripherals.update_paddles();
        self.cpu.execute_cycle(&mut self.peripherals, BusMaster::Cpu);
        self.cpu.clock = self.cpu.clock.wrapping_add(self.cpu.k as i64);
        if self.peripherals.wsync_requested {
            let stall = self.peripherals.vsc.wsync_color_clocks();
            let stall_cycles = (stall + COLOR_CLOCKS_PER_CYCLE - 1) / COLOR_CLOCKS_PER_CYCLE;
            self.cpu.clock = self.cpu.clock.wrapping_add(stall_cycles);
        }
    }
}

impl Machine for SystemABoard {
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
        self.peripherals.vsc.start_frame();

        let total_color_clocks = self.kind.total_scanlines() as i64 * 228;
        while self.peripherals.vsc.clock() < total_color_clocks && !self.cpu.jammed {
            self.run_cycle();
        }
        self.peripherals.vsc.render_to(total_color_clocks, &mut self.peripherals.fb);
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
        self.peripherals.vsc.reset();
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

    fn test_peripherals(controllers: [ControllerKind; 2]) -> PeripheralsA {
        let mut space: AddressSpace<Tag> = AddressSpace::new(13, 6);
        space.map(0x0000, 0x0040, Tag::Vsc);
        space.map(0x0080, 0x0080, Tag::IoTimer);
        space.map(0x0280, 0x0040, Tag::IoTimer);
        space.map(0x1000, 0x1000, Tag::Cart);
        PeripheralsA {
            space,
            io: IoTimerChip::new(),
            vsc: VscA::new(),
            cart: Box::new(FlatRom::new(vec![0u8; 0x800], 0x1000)),
            fb: FrameBuffer::new(160, 262),
            input: InputState::new(),
            controllers,
            color_clock: 0,
            wsync_requested: false,
        }
    }

    #[test]
    fn driving_controller_reports_gray_code_on_porta() {
        let mut p = test_peripherals([ControllerKind::Driving, ControllerKind::Joystick]);
        p.input.raise_input(0, InputTag::Driving2, true);
        p.input.capture();
        p.sync_controller_inputs();
        // Player 0 uses bits 7..4; gray-code bits land on the down/up pins (5, 4).
        let porta = p.io.read(0x280, 0);
        assert_eq!(porta & 0b0011_0000, 0);
        assert_eq!(porta & 0b1100_0000, 0b1100_0000);
    }

    #[test]
    fn joystick_directions_are_unaffected_by_driving_controller_on_other_port() {
        let mut p = test_peripherals([ControllerKind::Joystick, ControllerKind::Driving]);
        p.input.raise_input(0, InputTag::Up, true);
        p.input.capture();
        p.sync_controller_inputs();
        let porta = p.io.read(0x280, 0);
        // Player 0's Up pin is bit 4; the rest of the nibble stays high.
        assert_eq!(porta & 0b1111_0000, 0b1110_0000);
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
    fn non_proline_port_leaves_portb_unaffected_by_fire2() {
        let mut p = test_peripherals([ControllerKind::Joystick, ControllerKind::Joystick]);
        p.io.set_port_b_input(0xFF);
        p.input.raise_input(0, InputTag::Fire2, true);
        p.input.capture();
        let ctx = p.bus_context();
        assert_eq!(ctx.io_port_b & (1 << 5), 1 << 5);
    }

    #[test]
    fn light_gun_senses_at_the_captured_beam_position() {
        let mut p = test_peripherals([ControllerKind::LightGun, ControllerKind::Joystick]);
        p.input.set_light_gun(0, 0, 0);
        p.input.capture();
        // Advance the beam to frame clock 68 (scanline 0, end of HBLANK) —
        // the target for (scanline=0, hpos=0).
        p.vsc.read(0x00, 68, &mut p.fb);
        p.update_light_gun();
        assert_eq!(p.vsc.read(0x08, 68, &mut p.fb) & 0x80, 0x80);
    }

    #[test]
    fn light_gun_stays_low_away_from_the_captured_position() {
        let mut p = test_peripherals([ControllerKind::LightGun, ControllerKind::Joystick]);
        p.input.set_light_gun(0, 5, 50);
        p.input.capture();
        p.vsc.read(0x00, 68, &mut p.fb);
        p.update_light_gun();
        assert_eq!(p.vsc.read(0x08, 68, &mut p.fb) & 0x80, 0);
    }

    #[test]
    fn paddle_stays_low_while_dump_capacitor_is_grounded() {
        let mut p = test_peripherals([ControllerKind::Paddles, ControllerKind::Joystick]);
        p.input.set_ohms(0, 0);
        p.input.capture();
        p.vsc.read(0x00, 10, &mut p.fb);
        p.update_paddles();
        assert_eq!(p.vsc.read(0x08, 10, &mut p.fb) & 0x80, 0);
    }

    #[test]
    fn paddle_with_low_ohms_charges_quickly_after_release() {
        let mut p = test_peripherals([ControllerKind::Paddles, ControllerKind::Joystick]);
        p.input.set_ohms(0, 0);
        p.input.capture();
        p.vsc.write(0x01, 0x00, 0, &mut p.fb); // clears VBLANK bit 7, releasing the dump cap
        p.vsc.read(0x00, 10, &mut p.fb);
        p.update_paddles();
        assert_eq!(p.vsc.read(0x08, 10, &mut p.fb) & 0x80, 0x80);
    }

    #[test]
    fn paddle_with_high_ohms_has_not_charged_yet_shortly_after_release() {
        let mut p = test_peripherals([ControllerKind::Paddles, ControllerKind::Joystick]);
        p.input.set_ohms(0, 1_000_000);
        p.input.capture();
        p.vsc.write(0x01, 0x00, 0, &mut p.fb);
        p.vsc.read(0x00, 10, &mut p.fb);
        p.update_paddles();
        assert_eq!(p.vsc.read(0x08, 10, &mut p.fb) & 0x80, 0);
    }
}
