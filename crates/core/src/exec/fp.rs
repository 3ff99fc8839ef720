//! Floating-point semantics (F and D).
//!
//! Single-precision values live NaN-boxed in the 64-bit registers; inputs
//! are unboxed (an improperly boxed value reads as canonical NaN) and every
//! NaN result is canonicalized. Sticky flags accrue into `fcsr.fflags`:
//! invalid operations (NV), division by zero (DZ), and inexact conversions
//! (NX). The rounding-mode field is validated on every operation (a
//! reserved encoding raises IllegalInstruction) and applied to the
//! float-to-integer conversions; arithmetic rounds in the host default
//! mode.

use super::{src_u32, src_u64, write_dst, write_dst_u64};
use crate::common::error::Trap;
use crate::isa::decode::DecodedInst;
use crate::state::fp::{
    box_f32, canonicalize_f32, canonicalize_f64, unbox_f32, FpFlags, RoundingMode,
};
use crate::state::ArchState;

#[inline]
fn is_snan32(f: f32) -> bool {
    f.is_nan() && f.to_bits() & 0x0040_0000 == 0
}

#[inline]
fn is_snan64(f: f64) -> bool {
    f.is_nan() && f.to_bits() & 0x0008_0000_0000_0000 == 0
}

/// Resolves the instruction's rounding-mode field, trapping on reserved
/// encodings. Returns `None` after recording the trap.
fn resolve_rm(inst: &DecodedInst, state: &mut ArchState) -> Option<RoundingMode> {
    let rm = ((inst.raw >> 12) & 0x7) as u8;
    match state.fp.resolve_rm(rm) {
        Some(mode) => Some(mode),
        None => {
            state.trap(Trap::IllegalInstruction(inst.raw));
            None
        }
    }
}

fn round_with_rm(x: f64, rm: RoundingMode) -> f64 {
    match rm {
        RoundingMode::Rne => x.round_ties_even(),
        RoundingMode::Rtz => x.trunc(),
        RoundingMode::Rdn => x.floor(),
        RoundingMode::Rup => x.ceil(),
        RoundingMode::Rmm => x.round(),
    }
}

// ── Loads and stores ──

/// flw: load a word and NaN-box it.
pub fn flw(inst: &DecodedInst, state: &mut ArchState) {
    let addr = src_u32(inst, state, 0).wrapping_add(src_u32(inst, state, 1));
    let mut buf = [0u8; 4];
    state.read_memory(addr, &mut buf);
    write_dst_u64(inst, state, box_f32(f32::from_bits(u32::from_le_bytes(buf))));
}

/// fsw: store the low word of the register.
pub fn fsw(inst: &DecodedInst, state: &mut ArchState) {
    let addr = src_u32(inst, state, 0).wrapping_add(src_u32(inst, state, 1));
    let val = src_u64(inst, state, 2) as u32;
    state.write_memory(addr, &val.to_le_bytes());
}

/// fld: load a doubleword.
pub fn fld(inst: &DecodedInst, state: &mut ArchState) {
    let addr = src_u32(inst, state, 0).wrapping_add(src_u32(inst, state, 1));
    let mut buf = [0u8; 8];
    state.read_memory(addr, &mut buf);
    write_dst_u64(inst, state, u64::from_le_bytes(buf));
}

/// fsd: store the doubleword.
pub fn fsd(inst: &DecodedInst, state: &mut ArchState) {
    let addr = src_u32(inst, state, 0).wrapping_add(src_u32(inst, state, 1));
    let val = src_u64(inst, state, 2);
    state.write_memory(addr, &val.to_le_bytes());
}

// ── Single-precision arithmetic ──

fn binary_s<F: Fn(f32, f32) -> f32>(inst: &DecodedInst, state: &mut ArchState, op: F) {
    if resolve_rm(inst, state).is_none() {
        return;
    }
    let a = unbox_f32(src_u64(inst, state, 0));
    let b = unbox_f32(src_u64(inst, state, 1));
    let result = op(a, b);
    if is_snan32(a) || is_snan32(b) || (result.is_nan() && !a.is_nan() && !b.is_nan()) {
        state.fp.raise(FpFlags::NV);
    }
    write_dst_u64(inst, state, box_f32(canonicalize_f32(result)));
}

/// fadd.s.
pub fn fadd_s(inst: &DecodedInst, state: &mut ArchState) {
    binary_s(inst, state, |a, b| a + b);
}

/// fsub.s.
pub fn fsub_s(inst: &DecodedInst, state: &mut ArchState) {
    binary_s(inst, state, |a, b| a - b);
}

/// fmul.s.
pub fn fmul_s(inst: &DecodedInst, state: &mut ArchState) {
    binary_s(inst, state, |a, b| a * b);
}

/// fdiv.s: raises DZ for a finite nonzero dividend over zero.
pub fn fdiv_s(inst: &DecodedInst, state: &mut ArchState) {
    if resolve_rm(inst, state).is_none() {
        return;
    }
    let a = unbox_f32(src_u64(inst, state, 0));
    let b = unbox_f32(src_u64(inst, state, 1));
    if b == 0.0 && !a.is_nan() && a != 0.0 && !a.is_infinite() {
        state.fp.raise(FpFlags::DZ);
    }
    let result = a / b;
    if is_snan32(a) || is_snan32(b) || (result.is_nan() && !a.is_nan() && !b.is_nan()) {
        state.fp.raise(FpFlags::NV);
    }
    write_dst_u64(inst, state, box_f32(canonicalize_f32(result)));
}

/// fsqrt.s: NV for negative operands.
pub fn fsqrt_s(inst: &DecodedInst, state: &mut ArchState) {
    if resolve_rm(inst, state).is_none() {
        return;
    }
    let a = unbox_f32(src_u64(inst, state, 0));
    if is_snan32(a) || (a < 0.0) {
        state.fp.raise(FpFlags::NV);
    }
    write_dst_u64(inst, state, box_f32(canonicalize_f32(a.sqrt())));
}

fn minmax_s(inst: &DecodedInst, state: &mut ArchState, take_max: bool) {
    let a = unbox_f32(src_u64(inst, state, 0));
    let b = unbox_f32(src_u64(inst, state, 1));
    if is_snan32(a) || is_snan32(b) {
        state.fp.raise(FpFlags::NV);
    }
    let result = match (a.is_nan(), b.is_nan()) {
        (true, true) => f32::from_bits(crate::state::fp::CANONICAL_NAN_F32),
        (true, false) => b,
        (false, true) => a,
        (false, false) => {
            // min(-0.0, +0.0) must pick the negative zero.
            if a == 0.0 && b == 0.0 {
                let negative = f32::from_bits(a.to_bits() | b.to_bits());
                let positive = f32::from_bits(a.to_bits() & b.to_bits());
                if take_max {
                    positive
                } else {
                    negative
                }
            } else if take_max {
                a.max(b)
            } else {
                a.min(b)
            }
        }
    };
    write_dst_u64(inst, state, box_f32(result));
}

/// fmin.s.
pub fn fmin_s(inst: &DecodedInst, state: &mut ArchState) {
    minmax_s(inst, state, false);
}

/// fmax.s.
pub fn fmax_s(inst: &DecodedInst, state: &mut ArchState) {
    minmax_s(inst, state, true);
}

fn sgnj_s<F: Fn(u32, u32) -> u32>(inst: &DecodedInst, state: &mut ArchState, sign: F) {
    let a = unbox_f32(src_u64(inst, state, 0)).to_bits();
    let b = unbox_f32(src_u64(inst, state, 1)).to_bits();
    let result = (a & 0x7fff_ffff) | (sign(a, b) & 0x8000_0000);
    write_dst_u64(inst, state, box_f32(f32::from_bits(result)));
}

/// fsgnj.s: take the sign of rs2.
pub fn fsgnj_s(inst: &DecodedInst, state: &mut ArchState) {
    sgnj_s(inst, state, |_, b| b);
}

/// fsgnjn.s: take the inverted sign of rs2.
pub fn fsgnjn_s(inst: &DecodedInst, state: &mut ArchState) {
    sgnj_s(inst, state, |_, b| !b);
}

/// fsgnjx.s: xor the signs.
pub fn fsgnjx_s(inst: &DecodedInst, state: &mut ArchState) {
    sgnj_s(inst, state, |a, b| a ^ b);
}

fn compare_s<F: Fn(f32, f32) -> bool>(
    inst: &DecodedInst,
    state: &mut ArchState,
    signaling: bool,
    op: F,
) {
    let a = unbox_f32(src_u64(inst, state, 0));
    let b = unbox_f32(src_u64(inst, state, 1));
    let invalid = if signaling {
        a.is_nan() || b.is_nan()
    } else {
        is_snan32(a) || is_snan32(b)
    };
    if invalid {
        state.fp.raise(FpFlags::NV);
    }
    let result = if a.is_nan() || b.is_nan() {
        false
    } else {
        op(a, b)
    };
    write_dst(inst, state, result as u32);
}

/// feq.s: quiet comparison.
pub fn feq_s(inst: &DecodedInst, state: &mut ArchState) {
    compare_s(inst, state, false, |a, b| a == b);
}

/// flt.s: signaling comparison.
pub fn flt_s(inst: &DecodedInst, state: &mut ArchState) {
    compare_s(inst, state, true, |a, b| a < b);
}

/// fle.s: signaling comparison.
pub fn fle_s(inst: &DecodedInst, state: &mut ArchState) {
    compare_s(inst, state, true, |a, b| a <= b);
}

fn classify(sign: bool, is_inf: bool, is_nan: bool, is_snan: bool, is_zero: bool, is_sub: bool) -> u32 {
    if is_nan {
        return if is_snan { 1 << 8 } else { 1 << 9 };
    }
    let positive = !sign;
    match (is_inf, is_zero, is_sub) {
        (true, _, _) => {
            if positive {
                1 << 7
            } else {
                1 << 0
            }
        }
        (_, true, _) => {
            if positive {
                1 << 4
            } else {
                1 << 3
            }
        }
        (_, _, true) => {
            if positive {
                1 << 5
            } else {
                1 << 2
            }
        }
        _ => {
            if positive {
                1 << 6
            } else {
                1 << 1
            }
        }
    }
}

/// fclass.s: 10-bit classification mask.
pub fn fclass_s(inst: &DecodedInst, state: &mut ArchState) {
    let a = unbox_f32(src_u64(inst, state, 0));
    let mask = classify(
        a.is_sign_negative(),
        a.is_infinite(),
        a.is_nan(),
        is_snan32(a),
        a == 0.0,
        a.is_subnormal(),
    );
    write_dst(inst, state, mask);
}

/// fmv.x.w: move the low word bit pattern into an integer register.
pub fn fmv_x_w(inst: &DecodedInst, state: &mut ArchState) {
    let bits = src_u64(inst, state, 0) as u32;
    write_dst(inst, state, bits);
}

/// fmv.w.x: box the integer bit pattern into an FP register.
pub fn fmv_w_x(inst: &DecodedInst, state: &mut ArchState) {
    let bits = src_u32(inst, state, 0);
    write_dst_u64(inst, state, box_f32(f32::from_bits(bits)));
}

fn cvt_to_i32(inst: &DecodedInst, state: &mut ArchState, value: f64, is_nan: bool) {
    let rm = match resolve_rm(inst, state) {
        Some(rm) => rm,
        None => return,
    };
    if is_nan {
        state.fp.raise(FpFlags::NV);
        write_dst(inst, state, i32::MAX as u32);
        return;
    }
    let rounded = round_with_rm(value, rm);
    if rounded > i32::MAX as f64 {
        state.fp.raise(FpFlags::NV);
        write_dst(inst, state, i32::MAX as u32);
    } else if rounded < i32::MIN as f64 {
        state.fp.raise(FpFlags::NV);
        write_dst(inst, state, i32::MIN as u32);
    } else {
        if rounded != value {
            state.fp.raise(FpFlags::NX);
        }
        write_dst(inst, state, rounded as i32 as u32);
    }
}

fn cvt_to_u32(inst: &DecodedInst, state: &mut ArchState, value: f64, is_nan: bool) {
    let rm = match resolve_rm(inst, state) {
        Some(rm) => rm,
        None => return,
    };
    if is_nan {
        state.fp.raise(FpFlags::NV);
        write_dst(inst, state, u32::MAX);
        return;
    }
    let rounded = round_with_rm(value, rm);
    if rounded > u32::MAX as f64 {
        state.fp.raise(FpFlags::NV);
        write_dst(inst, state, u32::MAX);
    } else if rounded < 0.0 {
        state.fp.raise(FpFlags::NV);
        write_dst(inst, state, 0);
    } else {
        if rounded != value {
            state.fp.raise(FpFlags::NX);
        }
        write_dst(inst, state, rounded as u32);
    }
}

/// fcvt.w.s.
pub fn fcvt_w_s(inst: &DecodedInst, state: &mut ArchState) {
    let a = unbox_f32(src_u64(inst, state, 0));
    cvt_to_i32(inst, state, a as f64, a.is_nan());
}

/// fcvt.wu.s.
pub fn fcvt_wu_s(inst: &DecodedInst, state: &mut ArchState) {
    let a = unbox_f32(src_u64(inst, state, 0));
    cvt_to_u32(inst, state, a as f64, a.is_nan());
}

/// fcvt.s.w: signed integer to single.
pub fn fcvt_s_w(inst: &DecodedInst, state: &mut ArchState) {
    if resolve_rm(inst, state).is_none() {
        return;
    }
    let v = src_u32(inst, state, 0) as i32;
    let result = v as f32;
    if result as f64 != v as f64 {
        state.fp.raise(FpFlags::NX);
    }
    write_dst_u64(inst, state, box_f32(result));
}

/// fcvt.s.wu: unsigned integer to single.
pub fn fcvt_s_wu(inst: &DecodedInst, state: &mut ArchState) {
    if resolve_rm(inst, state).is_none() {
        return;
    }
    let v = src_u32(inst, state, 0);
    let result = v as f32;
    if result as f64 != v as f64 {
        state.fp.raise(FpFlags::NX);
    }
    write_dst_u64(inst, state, box_f32(result));
}

fn fma_s(inst: &DecodedInst, state: &mut ArchState, negate_product: bool, negate_c: bool) {
    if resolve_rm(inst, state).is_none() {
        return;
    }
    let a = unbox_f32(src_u64(inst, state, 0));
    let b = unbox_f32(src_u64(inst, state, 1));
    let c = unbox_f32(src_u64(inst, state, 2));
    let (a, c) = (
        if negate_product { -a } else { a },
        if negate_c { -c } else { c },
    );
    let result = a.mul_add(b, c);
    if is_snan32(a) || is_snan32(b) || is_snan32(c)
        || (result.is_nan() && !a.is_nan() && !b.is_nan() && !c.is_nan())
    {
        state.fp.raise(FpFlags::NV);
    }
    write_dst_u64(inst, state, box_f32(canonicalize_f32(result)));
}

/// fmadd.s: `rs1 × rs2 + rs3`.
pub fn fmadd_s(inst: &DecodedInst, state: &mut ArchState) {
    fma_s(inst, state, false, false);
}

/// fmsub.s: `rs1 × rs2 - rs3`.
pub fn fmsub_s(inst: &DecodedInst, state: &mut ArchState) {
    fma_s(inst, state, false, true);
}

/// fnmsub.s: `-(rs1 × rs2) + rs3`.
pub fn fnmsub_s(inst: &DecodedInst, state: &mut ArchState) {
    fma_s(inst, state, true, false);
}

/// fnmadd.s: `-(rs1 × rs2) - rs3`.
pub fn fnmadd_s(inst: &DecodedInst, state: &mut ArchState) {
    fma_s(inst, state, true, true);
}

// ── Double-precision ──

fn binary_d<F: Fn(f64, f64) -> f64>(inst: &DecodedInst, state: &mut ArchState, op: F) {
    if resolve_rm(inst, state).is_none() {
        return;
    }
    let a = f64::from_bits(src_u64(inst, state, 0));
    let b = f64::from_bits(src_u64(inst, state, 1));
    let result = op(a, b);
    if is_snan64(a) || is_snan64(b) || (result.is_nan() && !a.is_nan() && !b.is_nan()) {
        state.fp.raise(FpFlags::NV);
    }
    write_dst_u64(inst, state, canonicalize_f64(result).to_bits());
}

/// fadd.d.
pub fn fadd_d(inst: &DecodedInst, state: &mut ArchState) {
    binary_d(inst, state, |a, b| a + b);
}

/// fsub.d.
pub fn fsub_d(inst: &DecodedInst, state: &mut ArchState) {
    binary_d(inst, state, |a, b| a - b);
}

/// fmul.d.
pub fn fmul_d(inst: &DecodedInst, state: &mut ArchState) {
    binary_d(inst, state, |a, b| a * b);
}

/// fdiv.d: raises DZ for a finite nonzero dividend over zero.
pub fn fdiv_d(inst: &DecodedInst, state: &mut ArchState) {
    if resolve_rm(inst, state).is_none() {
        return;
    }
    let a = f64::from_bits(src_u64(inst, state, 0));
    let b = f64::from_bits(src_u64(inst, state, 1));
    if b == 0.0 && !a.is_nan() && a != 0.0 && !a.is_infinite() {
        state.fp.raise(FpFlags::DZ);
    }
    let result = a / b;
    if is_snan64(a) || is_snan64(b) || (result.is_nan() && !a.is_nan() && !b.is_nan()) {
        state.fp.raise(FpFlags::NV);
    }
    write_dst_u64(inst, state, canonicalize_f64(result).to_bits());
}

/// fsqrt.d: NV for negative operands.
pub fn fsqrt_d(inst: &DecodedInst, state: &mut ArchState) {
    if resolve_rm(inst, state).is_none() {
        return;
    }
    let a = f64::from_bits(src_u64(inst, state, 0));
    if is_snan64(a) || (a < 0.0) {
        state.fp.raise(FpFlags::NV);
    }
    write_dst_u64(inst, state, canonicalize_f64(a.sqrt()).to_bits());
}

fn minmax_d(inst: &DecodedInst, state: &mut ArchState, take_max: bool) {
    let a = f64::from_bits(src_u64(inst, state, 0));
    let b = f64::from_bits(src_u64(inst, state, 1));
    if is_snan64(a) || is_snan64(b) {
        state.fp.raise(FpFlags::NV);
    }
    let result = match (a.is_nan(), b.is_nan()) {
        (true, true) => f64::from_bits(crate::state::fp::CANONICAL_NAN_F64),
        (true, false) => b,
        (false, true) => a,
        (false, false) => {
            if a == 0.0 && b == 0.0 {
                let negative = f64::from_bits(a.to_bits() | b.to_bits());
                let positive = f64::from_bits(a.to_bits() & b.to_bits());
                if take_max {
                    positive
                } else {
                    negative
                }
            } else if take_max {
                a.max(b)
            } else {
                a.min(b)
            }
        }
    };
    write_dst_u64(inst, state, result.to_bits());
}

/// fmin.d.
pub fn fmin_d(inst: &DecodedInst, state: &mut ArchState) {
    minmax_d(inst, state, false);
}

/// fmax.d.
pub fn fmax_d(inst: &DecodedInst, state: &mut ArchState) {
    minmax_d(inst, state, true);
}

fn sgnj_d<F: Fn(u64, u64) -> u64>(inst: &DecodedInst, state: &mut ArchState, sign: F) {
    let a = src_u64(inst, state, 0);
    let b = src_u64(inst, state, 1);
    let result = (a & !(1 << 63)) | (sign(a, b) & (1 << 63));
    write_dst_u64(inst, state, result);
}

/// fsgnj.d.
pub fn fsgnj_d(inst: &DecodedInst, state: &mut ArchState) {
    sgnj_d(inst, state, |_, b| b);
}

/// fsgnjn.d.
pub fn fsgnjn_d(inst: &DecodedInst, state: &mut ArchState) {
    sgnj_d(inst, state, |_, b| !b);
}

/// fsgnjx.d.
pub fn fsgnjx_d(inst: &DecodedInst, state: &mut ArchState) {
    sgnj_d(inst, state, |a, b| a ^ b);
}

fn compare_d<F: Fn(f64, f64) -> bool>(
    inst: &DecodedInst,
    state: &mut ArchState,
    signaling: bool,
    op: F,
) {
    let a = f64::from_bits(src_u64(inst, state, 0));
    let b = f64::from_bits(src_u64(inst, state, 1));
    let invalid = if signaling {
        a.is_nan() || b.is_nan()
    } else {
        is_snan64(a) || is_snan64(b)
    };
    if invalid {
        state.fp.raise(FpFlags::NV);
    }
    let result = if a.is_nan() || b.is_nan() {
        false
    } else {
        op(a, b)
    };
    write_dst(inst, state, result as u32);
}

/// feq.d: quiet comparison.
pub fn feq_d(inst: &DecodedInst, state: &mut ArchState) {
    compare_d(inst, state, false, |a, b| a == b);
}

/// flt.d: signaling comparison.
pub fn flt_d(inst: &DecodedInst, state: &mut ArchState) {
    compare_d(inst, state, true, |a, b| a < b);
}

/// fle.d: signaling comparison.
pub fn fle_d(inst: &DecodedInst, state: &mut ArchState) {
    compare_d(inst, state, true, |a, b| a <= b);
}

/// fclass.d.
pub fn fclass_d(inst: &DecodedInst, state: &mut ArchState) {
    let a = f64::from_bits(src_u64(inst, state, 0));
    let mask = classify(
        a.is_sign_negative(),
        a.is_infinite(),
        a.is_nan(),
        is_snan64(a),
        a == 0.0,
        a.is_subnormal(),
    );
    write_dst(inst, state, mask);
}

/// fcvt.w.d.
pub fn fcvt_w_d(inst: &DecodedInst, state: &mut ArchState) {
    let a = f64::from_bits(src_u64(inst, state, 0));
    cvt_to_i32(inst, state, a, a.is_nan());
}

/// fcvt.wu.d.
pub fn fcvt_wu_d(inst: &DecodedInst, state: &mut ArchState) {
    let a = f64::from_bits(src_u64(inst, state, 0));
    cvt_to_u32(inst, state, a, a.is_nan());
}

/// fcvt.d.w: signed integer to double (always exact).
pub fn fcvt_d_w(inst: &DecodedInst, state: &mut ArchState) {
    if resolve_rm(inst, state).is_none() {
        return;
    }
    let v = src_u32(inst, state, 0) as i32;
    write_dst_u64(inst, state, (v as f64).to_bits());
}

/// fcvt.d.wu: unsigned integer to double (always exact).
pub fn fcvt_d_wu(inst: &DecodedInst, state: &mut ArchState) {
    if resolve_rm(inst, state).is_none() {
        return;
    }
    let v = src_u32(inst, state, 0);
    write_dst_u64(inst, state, (v as f64).to_bits());
}

/// fcvt.s.d: narrow to single; inexact narrows raise NX.
pub fn fcvt_s_d(inst: &DecodedInst, state: &mut ArchState) {
    if resolve_rm(inst, state).is_none() {
        return;
    }
    let a = f64::from_bits(src_u64(inst, state, 0));
    if is_snan64(a) {
        state.fp.raise(FpFlags::NV);
    }
    let result = a as f32;
    if !a.is_nan() && result as f64 != a {
        state.fp.raise(FpFlags::NX);
    }
    write_dst_u64(inst, state, box_f32(canonicalize_f32(result)));
}

/// fcvt.d.s: widen to double (always exact).
pub fn fcvt_d_s(inst: &DecodedInst, state: &mut ArchState) {
    if resolve_rm(inst, state).is_none() {
        return;
    }
    let a = unbox_f32(src_u64(inst, state, 0));
    if is_snan32(a) {
        state.fp.raise(FpFlags::NV);
    }
    write_dst_u64(inst, state, canonicalize_f64(a as f64).to_bits());
}

fn fma_d(inst: &DecodedInst, state: &mut ArchState, negate_product: bool, negate_c: bool) {
    if resolve_rm(inst, state).is_none() {
        return;
    }
    let a = f64::from_bits(src_u64(inst, state, 0));
    let b = f64::from_bits(src_u64(inst, state, 1));
    let c = f64::from_bits(src_u64(inst, state, 2));
    let (a, c) = (
        if negate_product { -a } else { a },
        if negate_c { -c } else { c },
    );
    let result = a.mul_add(b, c);
    if is_snan64(a) || is_snan64(b) || is_snan64(c)
        || (result.is_nan() && !a.is_nan() && !b.is_nan() && !c.is_nan())
    {
        state.fp.raise(FpFlags::NV);
    }
    write_dst_u64(inst, state, canonicalize_f64(result).to_bits());
}

/// fmadd.d.
pub fn fmadd_d(inst: &DecodedInst, state: &mut ArchState) {
    fma_d(inst, state, false, false);
}

/// fmsub.d.
pub fn fmsub_d(inst: &DecodedInst, state: &mut ArchState) {
    fma_d(inst, state, false, true);
}

/// fnmsub.d.
pub fn fnmsub_d(inst: &DecodedInst, state: &mut ArchState) {
    fma_d(inst, state, true, false);
}

/// fnmadd.d.
pub fn fnmadd_d(inst: &DecodedInst, state: &mut ArchState) {
    fma_d(inst, state, true, true);
}
