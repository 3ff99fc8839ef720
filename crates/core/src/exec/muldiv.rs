//! Multiply/divide semantics.
//!
//! Division by zero and signed overflow do not trap; the results are the
//! architecturally defined ones: `x / 0 = -1` (all ones), `x % 0 = x`,
//! `INT_MIN / -1 = INT_MIN`, `INT_MIN % -1 = 0`.

use super::binary_op;
use crate::isa::decode::DecodedInst;
use crate::state::ArchState;

/// mul: low 32 bits of the product.
pub fn mul(inst: &DecodedInst, state: &mut ArchState) {
    binary_op(inst, state, |a, b| a.wrapping_mul(b));
}

/// mulh: high 32 bits of the signed × signed product.
pub fn mulh(inst: &DecodedInst, state: &mut ArchState) {
    binary_op(inst, state, |a, b| {
        ((a as i32 as i64 * b as i32 as i64) >> 32) as u32
    });
}

/// mulhsu: high 32 bits of the signed × unsigned product.
pub fn mulhsu(inst: &DecodedInst, state: &mut ArchState) {
    binary_op(inst, state, |a, b| {
        ((a as i32 as i64 * b as i64) >> 32) as u32
    });
}

/// mulhu: high 32 bits of the unsigned × unsigned product.
pub fn mulhu(inst: &DecodedInst, state: &mut ArchState) {
    binary_op(inst, state, |a, b| ((a as u64 * b as u64) >> 32) as u32);
}

/// div: signed division.
pub fn div(inst: &DecodedInst, state: &mut ArchState) {
    binary_op(inst, state, |a, b| {
        let (a, b) = (a as i32, b as i32);
        if b == 0 {
            u32::MAX
        } else {
            a.wrapping_div(b) as u32
        }
    });
}

/// divu: unsigned division.
pub fn divu(inst: &DecodedInst, state: &mut ArchState) {
    binary_op(inst, state, |a, b| if b == 0 { u32::MAX } else { a / b });
}

/// rem: signed remainder.
pub fn rem(inst: &DecodedInst, state: &mut ArchState) {
    binary_op(inst, state, |a, b| {
        let (a, b) = (a as i32, b as i32);
        if b == 0 {
            a as u32
        } else {
            a.wrapping_rem(b) as u32
        }
    });
}

/// remu: unsigned remainder.
pub fn remu(inst: &DecodedInst, state: &mut ArchState) {
    binary_op(inst, state, |a, b| if b == 0 { a } else { a % b });
}
