//! Atomic extension semantics.
//!
//! All operations go through the atomic memory wrapper, which owns the
//! reservation and serializes the read-modify-write. The acquire/release
//! ordering hints in the encoding are accepted and ignored; a single hart
//! observes its own accesses in program order.

use super::{src_u32, write_dst};
use crate::isa::decode::DecodedInst;
use crate::mem::atomic::AmoOp;
use crate::state::ArchState;

/// lr.w: load the word and reserve its granule.
pub fn lr_w(inst: &DecodedInst, state: &mut ArchState) {
    let addr = src_u32(inst, state, 0);
    let val = state.load_reserved(addr);
    write_dst(inst, state, val);
}

/// sc.w: store the word if the reservation is intact; rd gets 0 on
/// success, 1 on failure.
pub fn sc_w(inst: &DecodedInst, state: &mut ArchState) {
    let addr = src_u32(inst, state, 0);
    let val = src_u32(inst, state, 1);
    let ok = state.store_conditional(addr, val);
    write_dst(inst, state, !ok as u32);
}

#[inline]
fn amo(inst: &DecodedInst, state: &mut ArchState, op: AmoOp) {
    let addr = src_u32(inst, state, 0);
    let val = src_u32(inst, state, 1);
    let old = state.amo(op, addr, val);
    write_dst(inst, state, old);
}

/// amoswap.w.
pub fn amoswap_w(inst: &DecodedInst, state: &mut ArchState) {
    amo(inst, state, AmoOp::Swap);
}

/// amoadd.w.
pub fn amoadd_w(inst: &DecodedInst, state: &mut ArchState) {
    amo(inst, state, AmoOp::Add);
}

/// amoxor.w.
pub fn amoxor_w(inst: &DecodedInst, state: &mut ArchState) {
    amo(inst, state, AmoOp::Xor);
}

/// amoand.w.
pub fn amoand_w(inst: &DecodedInst, state: &mut ArchState) {
    amo(inst, state, AmoOp::And);
}

/// amoor.w.
pub fn amoor_w(inst: &DecodedInst, state: &mut ArchState) {
    amo(inst, state, AmoOp::Or);
}

/// amomin.w (signed).
pub fn amomin_w(inst: &DecodedInst, state: &mut ArchState) {
    amo(inst, state, AmoOp::Min);
}

/// amomax.w (signed).
pub fn amomax_w(inst: &DecodedInst, state: &mut ArchState) {
    amo(inst, state, AmoOp::Max);
}

/// amominu.w (unsigned).
pub fn amominu_w(inst: &DecodedInst, state: &mut ArchState) {
    amo(inst, state, AmoOp::Minu);
}

/// amomaxu.w (unsigned).
pub fn amomaxu_w(inst: &DecodedInst, state: &mut ArchState) {
    amo(inst, state, AmoOp::Maxu);
}
