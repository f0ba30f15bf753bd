//! NMOS "illegal" opcodes: undocumented but stable combinations of the
//! internal ALU/bus control lines. Only the handful commonly relied upon by
//! cartridge software are implemented (KIL, LAX, SAX, ISB/ISC, RLA, ALR,
//! ANC) — the remaining undocumented encodings fall through to the unknown-
//! opcode path.

use super::M6502;
use crate::core::{Bus, BusMaster};

impl M6502 {
    /// KIL/JAM/HLT: any of the twelve opcodes that lock the address/data
    /// bus permanently. Modeled as an instant jam rather than a bus-lock
    /// simulation since nothing downstream of this engine inspects the
    /// locked bus value.
    pub(crate) fn op_kil(&mut self) {
        self.jammed = true;
        log::debug!("CPU jammed by KIL opcode 0x{:02X} at PC=0x{:04X}", self.opcode, self.pc.wrapping_sub(1));
    }

    // ---- LAX (LDA+LDX combined) ----

    pub(crate) fn op_lax_zp<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        cycle: u8,
        bus: &mut B,
        master: BusMaster,
    ) {
        self.alu_zp(cycle, bus, master, |cpu, op| {
            cpu.a = op;
            cpu.x = op;
            cpu.set_nz(op);
        });
    }

    pub(crate) fn op_lax_zp_y<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        cycle: u8,
        bus: &mut B,
        master: BusMaster,
    ) {
        self.alu_zp_y(cycle, bus, master, |cpu, op| {
            cpu.a = op;
            cpu.x = op;
            cpu.set_nz(op);
        });
    }

    pub(crate) fn op_lax_abs<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        cycle: u8,
        bus: &mut B,
        master: BusMaster,
    ) {
        self.alu_abs(cycle, bus, master, |cpu, op| {
            cpu.a = op;
            cpu.x = op;
            cpu.set_nz(op);
        });
    }

    pub(crate) fn op_lax_abs_y<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        cycle: u8,
        bus: &mut B,
        master: BusMaster,
    ) {
        self.alu_abs_y(cycle, bus, master, |cpu, op| {
            cpu.a = op;
            cpu.x = op;
            cpu.set_nz(op);
        });
    }

    pub(crate) fn op_lax_ind_x<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        cycle: u8,
        bus: &mut B,
        master: BusMaster,
    ) {
        self.alu_ind_x(cycle, bus, master, |cpu, op| {
            cpu.a = op;
            cpu.x = op;
            cpu.set_nz(op);
        });
    }

    pub(crate) fn op_lax_ind_y<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        cycle: u8,
        bus: &mut B,
        master: BusMaster,
    ) {
        self.alu_ind_y(cycle, bus, master, |cpu, op| {
            cpu.a = op;
            cpu.x = op;
            cpu.set_nz(op);
        });
    }

    // ---- SAX (store A & X, no flags) ----

    pub(crate) fn op_sax_zp<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        cycle: u8,
        bus: &mut B,
        master: BusMaster,
    ) {
        let data = self.a & self.x;
        self.store_zp(cycle, bus, master, data);
    }

    pub(crate) fn op_sax_zp_y<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        cycle: u8,
        bus: &mut B,
        master: BusMaster,
    ) {
        let data = self.a & self.x;
        self.store_zp_y(cycle, bus, master, data);
    }

    pub(crate) fn op_sax_abs<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        cycle: u8,
        bus: &mut B,
        master: BusMaster,
    ) {
        let data = self.a & self.x;
        self.store_abs(cycle, bus, master, data);
    }

    pub(crate) fn op_sax_ind_x<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        cycle: u8,
        bus: &mut B,
        master: BusMaster,
    ) {
        let data = self.a & self.x;
        self.store_ind_x(cycle, bus, master, data);
    }

    // ---- RLA (ROL memory, then AND into A) ----

    pub(crate) fn op_rla_zp<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        cycle: u8,
        bus: &mut B,
        master: BusMaster,
    ) {
        self.rmw_zp(cycle, bus, master, |cpu, val| {
            let rotated = cpu.perform_rol(val);
            cpu.perform_and(rotated);
            rotated
        });
    }

    pub(crate) fn op_rla_zp_x<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        cycle: u8,
        bus: &mut B,
        master: BusMaster,
    ) {
        self.rmw_zp_x(cycle, bus, master, |cpu, val| {
            let rotated = cpu.perform_rol(val);
            cpu.perform_and(rotated);
            rotated
        });
    }

    pub(crate) fn op_rla_abs<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        cycle: u8,
        bus: &mut B,
        master: BusMaster,
    ) {
        self.rmw_abs(cycle, bus, master, |cpu, val| {
            let rotated = cpu.perform_rol(val);
            cpu.perform_and(rotated);
            rotated
        });
    }

    pub(crate) fn op_rla_abs_x<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        cycle: u8,
        bus: &mut B,
        master: BusMaster,
    ) {
        self.rmw_abs_x(cycle, bus, master, |cpu, val| {
            let rotated = cpu.perform_rol(val);
            cpu.perform_and(rotated);
            rotated
        });
    }

    // ---- ISB/ISC (INC memory, then SBC from A) ----

    pub(crate) fn op_isb_zp<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        cycle: u8,
        bus: &mut B,
        master: BusMaster,
    ) {
        self.rmw_zp(cycle, bus, master, |cpu, val| {
            let incremented = val.wrapping_add(1);
            cpu.perform_sbc(incremented);
            incremented
        });
    }

    pub(crate) fn op_isb_zp_x<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        cycle: u8,
        bus: &mut B,
        master: BusMaster,
    ) {
        self.rmw_zp_x(cycle, bus, master, |cpu, val| {
            let incremented = val.wrapping_add(1);
            cpu.perform_sbc(incremented);
            incremented
        });
    }

    pub(crate) fn op_isb_abs<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        cycle: u8,
        bus: &mut B,
        master: BusMaster,
    ) {
        self.rmw_abs(cycle, bus, master, |cpu, val| {
            let incremented = val.wrapping_add(1);
            cpu.perform_sbc(incremented);
            incremented
        });
    }

    pub(crate) fn op_isb_abs_x<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        cycle: u8,
        bus: &mut B,
        master: BusMaster,
    ) {
        self.rmw_abs_x(cycle, bus, master, |cpu, val| {
            let incremented = val.wrapping_add(1);
            cpu.perform_sbc(incremented);
            incremented
        });
    }

    // ---- ALR/ASR (AND immediate, then LSR the accumulator) ----

    pub(crate) fn op_alr_imm<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        cycle: u8,
        bus: &mut B,
        master: BusMaster,
    ) {
        self.alu_imm(cycle, bus, master, |cpu, op| {
            cpu.perform_and(op);
            cpu.a = cpu.perform_lsr(cpu.a);
        });
    }

    // ---- ANC (AND immediate, carry = bit 7 of result) ----

    pub(crate) fn op_anc_imm<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        cycle: u8,
        bus: &mut B,
        master: BusMaster,
    ) {
        self.alu_imm(cycle, bus, master, |cpu, op| {
            cpu.perform_and(op);
            cpu.set_flag(super::StatusFlag::C, cpu.a & 0x80 != 0);
        });
    }
}
