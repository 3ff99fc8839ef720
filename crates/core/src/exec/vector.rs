//! Vector semantics: configuration and integer arithmetic.
//!
//! Arithmetic iterates over the active elements `[vstart, vl)` at the
//! configured SEW. Masked-off elements and tail elements are left
//! undisturbed (a legal implementation of both the undisturbed and
//! agnostic policies), and `vstart` is cleared on completion. Executing
//! vector arithmetic under an illegal configuration (`vill`) raises
//! IllegalInstruction.

use super::{src_u32, write_dst};
use crate::common::error::Trap;
use crate::isa::decode::{DecodedInst, Operand};
use crate::isa::rvv;
use crate::state::ArchState;

#[inline]
fn sew_mask(sew_bytes: u32) -> u64 {
    if sew_bytes >= 8 {
        u64::MAX
    } else {
        (1u64 << (8 * sew_bytes)) - 1
    }
}

#[inline]
fn dst_vreg(inst: &DecodedInst) -> usize {
    match inst.dst {
        Operand::Vreg(n) => n as usize,
        _ => 0,
    }
}

fn apply_vtype_and_avl(inst: &DecodedInst, state: &mut ArchState, vtype: u32) {
    let rs1_is_x0 = match inst.src[0] {
        Operand::Reg(id) => state.is_zero_reg(id),
        _ => false,
    };
    let rd_is_x0 = match inst.dst {
        Operand::Reg(id) => state.is_zero_reg(id),
        _ => true,
    };

    if !state.vec.set_vtype(vtype) {
        write_dst(inst, state, 0);
        return;
    }

    let avl = match inst.src[0] {
        Operand::Imm(imm) => imm as u32,
        Operand::Reg(_) if !rs1_is_x0 => src_u32(inst, state, 0),
        // rs1 = x0, rd != x0: request the maximum.
        _ if !rd_is_x0 => u32::MAX,
        // rs1 = rd = x0: keep the current vl.
        _ => state.vec.vl(),
    };
    state.vec.set_vl(avl);
    state.vec.set_vstart(0);
    let vl = state.vec.vl();
    write_dst(inst, state, vl);
}

/// vsetvli: configure from the immediate `vtype`, AVL from rs1.
pub fn vsetvli(inst: &DecodedInst, state: &mut ArchState) {
    let vtype = (inst.raw >> 20) & 0x7ff;
    apply_vtype_and_avl(inst, state, vtype);
}

/// vsetivli: configure from the immediate `vtype`, immediate AVL.
pub fn vsetivli(inst: &DecodedInst, state: &mut ArchState) {
    let vtype = (inst.raw >> 20) & 0x3ff;
    apply_vtype_and_avl(inst, state, vtype);
}

/// vsetvl: configure from a register `vtype`, AVL from rs1.
pub fn vsetvl(inst: &DecodedInst, state: &mut ArchState) {
    let vtype = match inst.src[1] {
        Operand::Reg(id) => state.read_reg(id) as u32,
        _ => 0,
    };
    apply_vtype_and_avl(inst, state, vtype);
}

/// Elementwise integer operation: `vd[i] = op(vs2[i], other[i])` where the
/// other operand is a vector element, the scalar `rs1`, or the 5-bit
/// immediate, as bound by the decoder.
fn int_binary<F: Fn(u64, u64) -> u64>(inst: &DecodedInst, state: &mut ArchState, op: F) {
    if state.vec.vill() {
        state.trap(Trap::IllegalInstruction(inst.raw));
        return;
    }
    let sew = state.vec.sew_bytes();
    let mask = sew_mask(sew);
    let vl = state.vec.vl();
    let vstart = state.vec.vstart();
    let unmasked = rvv::vm(inst.raw);
    let vd = dst_vreg(inst);
    let vs2 = match inst.src[1] {
        Operand::Vreg(n) => n as usize,
        _ => 0,
    };

    for i in vstart..vl {
        if !unmasked && !state.vec.mask_bit(i) {
            continue;
        }
        let other = match inst.src[0] {
            Operand::Vreg(n) => state.vec.read_elem(n as usize, i, sew),
            Operand::Reg(id) => state.read_reg(id) & mask,
            Operand::Imm(imm) => imm as i64 as u64 & mask,
            Operand::None | Operand::Csr(_) => 0,
        };
        let a = state.vec.read_elem(vs2, i, sew);
        state.vec.write_elem(vd, i, sew, op(a, other) & mask);
    }
    state.vec.set_vstart(0);
}

/// vadd (vv/vx/vi).
pub fn vadd(inst: &DecodedInst, state: &mut ArchState) {
    int_binary(inst, state, |a, b| a.wrapping_add(b));
}

/// vsub (vv/vx): `vs2[i] - other`.
pub fn vsub(inst: &DecodedInst, state: &mut ArchState) {
    int_binary(inst, state, |a, b| a.wrapping_sub(b));
}

/// vand (vv/vx).
pub fn vand(inst: &DecodedInst, state: &mut ArchState) {
    int_binary(inst, state, |a, b| a & b);
}

/// vor (vv/vx).
pub fn vor(inst: &DecodedInst, state: &mut ArchState) {
    int_binary(inst, state, |a, b| a | b);
}

/// vxor (vv/vx).
pub fn vxor(inst: &DecodedInst, state: &mut ArchState) {
    int_binary(inst, state, |a, b| a ^ b);
}
