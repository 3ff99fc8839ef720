//! Integer load/store semantics.
//!
//! The effective address is `rs1 + imm`. Unaligned accesses are permitted
//! and handled by the memory layer, including page-crossing splits. Loads
//! sign- or zero-extend to 32 bits as the opcode dictates.

use super::{src_u32, write_dst};
use crate::isa::decode::DecodedInst;
use crate::state::ArchState;

#[inline]
fn effective_address(inst: &DecodedInst, state: &ArchState) -> u32 {
    src_u32(inst, state, 0).wrapping_add(src_u32(inst, state, 1))
}

/// lb: load byte, sign-extended.
pub fn lb(inst: &DecodedInst, state: &mut ArchState) {
    let addr = effective_address(inst, state);
    let mut buf = [0u8; 1];
    state.read_memory(addr, &mut buf);
    write_dst(inst, state, buf[0] as i8 as i32 as u32);
}

/// lh: load halfword, sign-extended.
pub fn lh(inst: &DecodedInst, state: &mut ArchState) {
    let addr = effective_address(inst, state);
    let mut buf = [0u8; 2];
    state.read_memory(addr, &mut buf);
    write_dst(inst, state, i16::from_le_bytes(buf) as i32 as u32);
}

/// lw: load word.
pub fn lw(inst: &DecodedInst, state: &mut ArchState) {
    let addr = effective_address(inst, state);
    let mut buf = [0u8; 4];
    state.read_memory(addr, &mut buf);
    write_dst(inst, state, u32::from_le_bytes(buf));
}

/// lbu: load byte, zero-extended.
pub fn lbu(inst: &DecodedInst, state: &mut ArchState) {
    let addr = effective_address(inst, state);
    let mut buf = [0u8; 1];
    state.read_memory(addr, &mut buf);
    write_dst(inst, state, buf[0] as u32);
}

/// lhu: load halfword, zero-extended.
pub fn lhu(inst: &DecodedInst, state: &mut ArchState) {
    let addr = effective_address(inst, state);
    let mut buf = [0u8; 2];
    state.read_memory(addr, &mut buf);
    write_dst(inst, state, u16::from_le_bytes(buf) as u32);
}

/// sb: store byte.
pub fn sb(inst: &DecodedInst, state: &mut ArchState) {
    let addr = effective_address(inst, state);
    let val = src_u32(inst, state, 2) as u8;
    state.write_memory(addr, &[val]);
}

/// sh: store halfword.
pub fn sh(inst: &DecodedInst, state: &mut ArchState) {
    let addr = effective_address(inst, state);
    let val = src_u32(inst, state, 2) as u16;
    state.write_memory(addr, &val.to_le_bytes());
}

/// sw: store word.
pub fn sw(inst: &DecodedInst, state: &mut ArchState) {
    let addr = effective_address(inst, state);
    let val = src_u32(inst, state, 2);
    state.write_memory(addr, &val.to_le_bytes());
}
