//! Branch and jump semantics.
//!
//! The run loop pre-sets the PC to the next sequential address before a
//! semantic executes, so the link value of `jal`/`jalr` is simply the
//! current PC, and a not-taken branch needs no work at all.

use super::{src_u32, write_dst};
use crate::isa::decode::DecodedInst;
use crate::state::ArchState;

#[inline]
fn branch_on<F: Fn(u32, u32) -> bool>(inst: &DecodedInst, state: &mut ArchState, cond: F) {
    let a = src_u32(inst, state, 0);
    let b = src_u32(inst, state, 1);
    if cond(a, b) {
        let offset = src_u32(inst, state, 2);
        state.set_pc(inst.address.wrapping_add(offset));
    }
}

/// beq.
pub fn beq(inst: &DecodedInst, state: &mut ArchState) {
    branch_on(inst, state, |a, b| a == b);
}

/// bne.
pub fn bne(inst: &DecodedInst, state: &mut ArchState) {
    branch_on(inst, state, |a, b| a != b);
}

/// blt (signed).
pub fn blt(inst: &DecodedInst, state: &mut ArchState) {
    branch_on(inst, state, |a, b| (a as i32) < (b as i32));
}

/// bge (signed).
pub fn bge(inst: &DecodedInst, state: &mut ArchState) {
    branch_on(inst, state, |a, b| (a as i32) >= (b as i32));
}

/// bltu (unsigned).
pub fn bltu(inst: &DecodedInst, state: &mut ArchState) {
    branch_on(inst, state, |a, b| a < b);
}

/// bgeu (unsigned).
pub fn bgeu(inst: &DecodedInst, state: &mut ArchState) {
    branch_on(inst, state, |a, b| a >= b);
}

/// jal: link the next sequential PC, jump PC-relative.
pub fn jal(inst: &DecodedInst, state: &mut ArchState) {
    let link = state.pc();
    write_dst(inst, state, link);
    let offset = src_u32(inst, state, 0);
    state.set_pc(inst.address.wrapping_add(offset));
}

/// jalr: link the next sequential PC, jump register-indirect with the low
/// bit cleared.
pub fn jalr(inst: &DecodedInst, state: &mut ArchState) {
    let base = src_u32(inst, state, 0);
    let offset = src_u32(inst, state, 1);
    let target = base.wrapping_add(offset) & !1;
    let link = state.pc();
    write_dst(inst, state, link);
    state.set_pc(target);
}
