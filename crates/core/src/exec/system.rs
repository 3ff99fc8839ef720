//! System instruction semantics.
//!
//! `ecall` and `ebreak` are offered to the handler chains in registration
//! order; the first handler returning true stops propagation, and an
//! unclaimed call records a trap for the run loop to service. CSR
//! semantics implement the read/write suppression rules: `csrrw` with
//! `rd = x0` suppresses the read, `csrrs`/`csrrc` with a zero source
//! suppress the write (and therefore its side effects).

use super::{src_u32, write_dst};
use crate::common::error::Trap;
use crate::isa::decode::{DecodedInst, Operand};
use crate::state::csr::MEPC;
use crate::state::ArchState;

/// ecall: offer to handlers; trap when unclaimed.
pub fn ecall(inst: &DecodedInst, state: &mut ArchState) {
    if !state.dispatch_ecall(inst) {
        state.trap(Trap::EnvironmentCall);
    }
}

/// ebreak: offer to handlers; trap when unclaimed.
pub fn ebreak(inst: &DecodedInst, state: &mut ArchState) {
    if !state.dispatch_ebreak(inst) {
        state.trap(Trap::Breakpoint(inst.address));
    }
}

/// fence: a no-op for a single in-order hart.
pub fn fence(_inst: &DecodedInst, _state: &mut ArchState) {}

/// fence.i: flush the decode cache at the next boundary.
pub fn fence_i(_inst: &DecodedInst, state: &mut ArchState) {
    state.request_fence_i();
}

/// mret: return from the machine trap handler.
pub fn mret(_inst: &DecodedInst, state: &mut ArchState) {
    let epc = state.csrs().raw_read(MEPC);
    state.set_pc(epc);
}

/// wfi: treated as a no-op; with no interrupt sources the program resumes
/// immediately.
pub fn wfi(_inst: &DecodedInst, _state: &mut ArchState) {}

#[inline]
fn csr_addr(inst: &DecodedInst) -> u16 {
    match inst.src[1] {
        Operand::Csr(addr) => addr,
        _ => 0,
    }
}

#[inline]
fn dst_is_live(inst: &DecodedInst, state: &ArchState) -> bool {
    match inst.dst {
        Operand::Reg(id) => !state.is_zero_reg(id),
        _ => false,
    }
}

/// True when the source operand is `x0` or a zero immediate, which
/// suppresses the write half of `csrrs`/`csrrc`.
#[inline]
fn src_is_zero(inst: &DecodedInst, state: &ArchState) -> bool {
    match inst.src[0] {
        Operand::Reg(id) => state.is_zero_reg(id),
        Operand::Imm(imm) => imm == 0,
        _ => true,
    }
}

/// csrrw/csrrwi: swap; the read is suppressed when `rd` is `x0`.
pub fn csrrw(inst: &DecodedInst, state: &mut ArchState) {
    let addr = csr_addr(inst);
    if dst_is_live(inst, state) {
        match state.csr_read(addr) {
            Some(old) => write_dst(inst, state, old),
            None => {
                state.trap(Trap::IllegalInstruction(inst.raw));
                return;
            }
        }
    }
    let val = src_u32(inst, state, 0);
    if state.csr_write(addr, val).is_none() {
        state.trap(Trap::IllegalInstruction(inst.raw));
    }
}

/// csrrs/csrrsi: read, then set the source bits; the write is suppressed
/// when the source is zero.
pub fn csrrs(inst: &DecodedInst, state: &mut ArchState) {
    let addr = csr_addr(inst);
    let old = match state.csr_read(addr) {
        Some(old) => old,
        None => {
            state.trap(Trap::IllegalInstruction(inst.raw));
            return;
        }
    };
    write_dst(inst, state, old);
    if !src_is_zero(inst, state) {
        let val = src_u32(inst, state, 0);
        if state.csr_write(addr, old | val).is_none() {
            state.trap(Trap::IllegalInstruction(inst.raw));
        }
    }
}

/// csrrc/csrrci: read, then clear the source bits; the write is suppressed
/// when the source is zero.
pub fn csrrc(inst: &DecodedInst, state: &mut ArchState) {
    let addr = csr_addr(inst);
    let old = match state.csr_read(addr) {
        Some(old) => old,
        None => {
            state.trap(Trap::IllegalInstruction(inst.raw));
            return;
        }
    };
    write_dst(inst, state, old);
    if !src_is_zero(inst, state) {
        let val = src_u32(inst, state, 0);
        if state.csr_write(addr, old & !val).is_none() {
            state.trap(Trap::IllegalInstruction(inst.raw));
        }
    }
}

/// Fallback semantic for undecodable encodings.
pub fn illegal(inst: &DecodedInst, state: &mut ArchState) {
    state.trap(Trap::IllegalInstruction(inst.raw));
}
