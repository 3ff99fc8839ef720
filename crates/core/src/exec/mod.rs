//! Instruction semantics.
//!
//! Every semantic is a small stateless function of one decoded instruction:
//! it reads operand values through the bindings the decoder established,
//! computes, and writes the destination. PC-relative semantics (branches,
//! jumps) overwrite the PC that the run loop pre-set to the next sequential
//! address; everything else leaves it alone. Traps are recorded into state,
//! never thrown.

/// Integer ALU, shifts, compares, `lui`/`auipc`.
pub mod alu;

/// Atomic extension (LR/SC, AMO).
pub mod amo;

/// Bit-manipulation families (Zba/Zbb/Zbc/Zbs).
pub mod bitmanip;

/// Branches and jumps.
pub mod branch;

/// Floating-point families (F/D).
pub mod fp;

/// Integer loads and stores.
pub mod mem;

/// Multiply/divide (M).
pub mod muldiv;

/// System instructions (`ecall`, `ebreak`, fences, CSR ops, `mret`, `wfi`).
pub mod system;

/// Vector configuration and integer arithmetic (V).
pub mod vector;

use crate::isa::decode::{DecodedInst, Operand};
use crate::state::ArchState;

/// Reads source operand `idx` as a 32-bit integer value.
///
/// Register operands read their cell; immediates yield their two's
/// complement bits. Unbound operands read as zero.
#[inline]
pub(crate) fn src_u32(inst: &DecodedInst, state: &ArchState, idx: usize) -> u32 {
    match inst.src[idx] {
        Operand::Reg(id) => state.read_reg(id) as u32,
        Operand::Imm(imm) => imm as u32,
        _ => 0,
    }
}

/// Reads source operand `idx` as a raw 64-bit value (FP register cells).
#[inline]
pub(crate) fn src_u64(inst: &DecodedInst, state: &ArchState, idx: usize) -> u64 {
    match inst.src[idx] {
        Operand::Reg(id) => state.read_reg(id),
        Operand::Imm(imm) => imm as i64 as u64,
        _ => 0,
    }
}

/// Writes the destination operand (32-bit integer result).
#[inline]
pub(crate) fn write_dst(inst: &DecodedInst, state: &mut ArchState, val: u32) {
    if let Operand::Reg(id) = inst.dst {
        state.write_reg(id, val as u64);
    }
}

/// Writes the destination operand (64-bit FP register result).
#[inline]
pub(crate) fn write_dst_u64(inst: &DecodedInst, state: &mut ArchState, val: u64) {
    if let Operand::Reg(id) = inst.dst {
        state.write_reg(id, val);
    }
}

/// Applies a binary operation over the first two sources into the
/// destination.
#[inline]
pub(crate) fn binary_op<F: Fn(u32, u32) -> u32>(
    inst: &DecodedInst,
    state: &mut ArchState,
    op: F,
) {
    let a = src_u32(inst, state, 0);
    let b = src_u32(inst, state, 1);
    write_dst(inst, state, op(a, b));
}

/// Applies a unary operation over the first source into the destination.
#[inline]
pub(crate) fn unary_op<F: Fn(u32) -> u32>(inst: &DecodedInst, state: &mut ArchState, op: F) {
    let a = src_u32(inst, state, 0);
    write_dst(inst, state, op(a));
}
