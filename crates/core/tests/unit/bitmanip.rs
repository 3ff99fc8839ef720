//! Bit-manipulation laws (Zba/Zbb/Zbc/Zbs).
//!
//! The identities here come straight from the extension definitions:
//! rotate inverses, inverted-logic absorption, leading/trailing-zero
//! sums, and single-bit set/clear/extract interactions. Everything drives
//! the real decoder via raw encodings.

use crate::common::encoding::{i_type, r_type};
use crate::common::harness::{exec_inst, exec_rrr, fresh_state};

const OP: u32 = 0b0110011;
const OP_IMM: u32 = 0b0010011;

// Register-form encodings: rd = x3, rs1 = x1, rs2 = x2.
fn sh1add(a: u32, b: u32) -> u32 {
    exec_rrr(r_type(OP, 3, 0b010, 1, 2, 0b0010000), a, b)
}

fn sh2add(a: u32, b: u32) -> u32 {
    exec_rrr(r_type(OP, 3, 0b100, 1, 2, 0b0010000), a, b)
}

fn sh3add(a: u32, b: u32) -> u32 {
    exec_rrr(r_type(OP, 3, 0b110, 1, 2, 0b0010000), a, b)
}

fn andn(a: u32, b: u32) -> u32 {
    exec_rrr(r_type(OP, 3, 0b111, 1, 2, 0b0100000), a, b)
}

fn orn(a: u32, b: u32) -> u32 {
    exec_rrr(r_type(OP, 3, 0b110, 1, 2, 0b0100000), a, b)
}

fn xnor(a: u32, b: u32) -> u32 {
    exec_rrr(r_type(OP, 3, 0b100, 1, 2, 0b0100000), a, b)
}

fn rol(a: u32, b: u32) -> u32 {
    exec_rrr(r_type(OP, 3, 0b001, 1, 2, 0b0110000), a, b)
}

fn ror(a: u32, b: u32) -> u32 {
    exec_rrr(r_type(OP, 3, 0b101, 1, 2, 0b0110000), a, b)
}

fn clmul(a: u32, b: u32) -> u32 {
    exec_rrr(r_type(OP, 3, 0b001, 1, 2, 0b0000101), a, b)
}

fn clmulh(a: u32, b: u32) -> u32 {
    exec_rrr(r_type(OP, 3, 0b011, 1, 2, 0b0000101), a, b)
}

fn clmulr(a: u32, b: u32) -> u32 {
    exec_rrr(r_type(OP, 3, 0b010, 1, 2, 0b0000101), a, b)
}

fn bclr(a: u32, b: u32) -> u32 {
    exec_rrr(r_type(OP, 3, 0b001, 1, 2, 0b0100100), a, b)
}

fn bset(a: u32, b: u32) -> u32 {
    exec_rrr(r_type(OP, 3, 0b001, 1, 2, 0b0010100), a, b)
}

fn binv(a: u32, b: u32) -> u32 {
    exec_rrr(r_type(OP, 3, 0b001, 1, 2, 0b0110100), a, b)
}

fn bext(a: u32, b: u32) -> u32 {
    exec_rrr(r_type(OP, 3, 0b101, 1, 2, 0b0100100), a, b)
}

// Unary Zbb forms (rd = x3, rs1 = x1; the rs2 slot selects the op).
fn unary(selector: u32, a: u32) -> u32 {
    let mut state = fresh_state();
    state.set_xreg(1, a);
    exec_inst(
        &mut state,
        r_type(OP_IMM, 3, 0b001, 1, selector, 0b0110000),
    );
    state.xreg(3)
}

fn clz(a: u32) -> u32 {
    unary(0b00000, a)
}

fn ctz(a: u32) -> u32 {
    unary(0b00001, a)
}

fn cpop(a: u32) -> u32 {
    unary(0b00010, a)
}

fn sext_b(a: u32) -> u32 {
    unary(0b00100, a)
}

fn sext_h(a: u32) -> u32 {
    unary(0b00101, a)
}

fn orc_b(a: u32) -> u32 {
    let mut state = fresh_state();
    state.set_xreg(1, a);
    exec_inst(&mut state, i_type(OP_IMM, 3, 0b101, 1, 0x287));
    state.xreg(3)
}

fn rev8(a: u32) -> u32 {
    let mut state = fresh_state();
    state.set_xreg(1, a);
    exec_inst(&mut state, i_type(OP_IMM, 3, 0b101, 1, 0x698));
    state.xreg(3)
}

const PATTERNS: [u32; 8] = [
    0,
    1,
    0xffff_ffff,
    0x8000_0000,
    0xdead_beef,
    0x0102_0304,
    0x5555_5555,
    0xaaaa_aaaa,
];

#[test]
fn sh_add_shifts_rs1_then_adds_rs2() {
    assert_eq!(sh1add(3, 100), 106);
    assert_eq!(sh2add(3, 100), 112);
    assert_eq!(sh3add(3, 100), 124);
    // Shifted operand wraps.
    assert_eq!(sh3add(0x2000_0000, 1), 1);
}

#[test]
fn inverted_logic_identities() {
    for x in PATTERNS {
        assert_eq!(andn(x, 0), x);
        assert_eq!(andn(x, u32::MAX), 0);
        assert_eq!(orn(x, 0), u32::MAX);
        assert_eq!(xnor(x, x), u32::MAX);
        assert_eq!(xnor(x, !x), 0);
    }
}

#[test]
fn count_identities() {
    assert_eq!(clz(0) + ctz(0), 64);
    assert_eq!(cpop(u32::MAX), 32);
    assert_eq!(cpop(0), 0);
    for k in 0..32 {
        assert_eq!(clz(1 << k), 31 - k);
        assert_eq!(ctz(1 << k), k);
        assert_eq!(cpop(1 << k), 1);
    }
}

#[test]
fn min_max_follow_signedness() {
    let min = |a, b| exec_rrr(r_type(OP, 3, 0b100, 1, 2, 0b0000101), a, b);
    let minu = |a, b| exec_rrr(r_type(OP, 3, 0b101, 1, 2, 0b0000101), a, b);
    let max = |a, b| exec_rrr(r_type(OP, 3, 0b110, 1, 2, 0b0000101), a, b);
    let maxu = |a, b| exec_rrr(r_type(OP, 3, 0b111, 1, 2, 0b0000101), a, b);

    let neg1 = -1i32 as u32;
    assert_eq!(min(neg1, 1), neg1);
    assert_eq!(minu(neg1, 1), 1);
    assert_eq!(max(neg1, 1), 1);
    assert_eq!(maxu(neg1, 1), neg1);
    assert_eq!(min(5, 5), 5);
}

#[test]
fn narrow_then_widen_extensions() {
    assert_eq!(sext_b(0x80), 0xffff_ff80);
    assert_eq!(sext_b(0x7f), 0x7f);
    assert_eq!(sext_b(0xabc_d17f), 0x7f);
    assert_eq!(sext_h(0x8000), 0xffff_8000);
    assert_eq!(sext_h(0x7fff), 0x7fff);
    let zext_h = |a| exec_rrr(r_type(OP, 3, 0b100, 1, 0, 0b0000100), a, 0);
    assert_eq!(zext_h(0xffff_8000), 0x8000);
    assert_eq!(zext_h(0x1234_5678), 0x5678);
}

#[test]
fn rotate_zero_shift_returns_input() {
    for x in PATTERNS {
        assert_eq!(rol(x, 0), x);
        assert_eq!(ror(x, 0), x);
        // Shift amounts are masked mod 32.
        assert_eq!(rol(x, 32), x);
        assert_eq!(ror(x, 64), x);
    }
}

#[test]
fn rol_is_inverse_of_ror() {
    for x in PATTERNS {
        for k in 0..32u32 {
            assert_eq!(rol(x, k), ror(x, (32 - k) % 32));
            assert_eq!(ror(rol(x, k), k), x);
        }
    }
}

#[test]
fn rori_matches_ror() {
    for x in PATTERNS {
        for k in 0..32u32 {
            let mut state = fresh_state();
            state.set_xreg(1, x);
            exec_inst(
                &mut state,
                r_type(OP_IMM, 3, 0b101, 1, k, 0b0110000),
            );
            assert_eq!(state.xreg(3), ror(x, k));
        }
    }
}

#[test]
fn orc_b_saturates_nonzero_bytes() {
    assert_eq!(orc_b(0), 0);
    assert_eq!(orc_b(0x0100_0800), 0xff00_ff00);
    assert_eq!(orc_b(0x0000_0001), 0x0000_00ff);
    assert_eq!(orc_b(0xdead_beef), 0xffff_ffff);
}

#[test]
fn rev8_reverses_bytes_and_is_an_involution() {
    assert_eq!(rev8(0x0102_0304), 0x0403_0201);
    for x in PATTERNS {
        assert_eq!(rev8(rev8(x)), x);
    }
}

#[test]
fn clmul_known_vectors() {
    // Low 32 bits of the polynomial square of all-ones.
    assert_eq!(clmul(0xffff_ffff, 0xffff_ffff), 0x5555_5555);
    assert_eq!(clmul(0, 0xffff_ffff), 0);
    assert_eq!(clmul(1, x_any()), x_any());
    // (x+1)·(x+1) = x² + 1 over GF(2).
    assert_eq!(clmul(0b11, 0b11), 0b101);
}

fn x_any() -> u32 {
    0x1234_5678
}

#[test]
fn clmulh_is_high_half_of_widened_product() {
    for &(a, b) in &[
        (0xffff_ffffu32, 0xffff_ffffu32),
        (0x8000_0001, 0x8000_0001),
        (0xdead_beef, 0x1234_5678),
    ] {
        let wide = clmul_wide(a, b);
        assert_eq!(clmul(a, b), wide as u32);
        assert_eq!(clmulh(a, b), (wide >> 32) as u32);
        assert_eq!(clmulr(a, b), (wide >> 31) as u32);
    }
}

/// 64-bit reference carry-less product.
fn clmul_wide(a: u32, b: u32) -> u64 {
    let mut result = 0u64;
    for i in 0..32 {
        if (b >> i) & 1 != 0 {
            result ^= (a as u64) << i;
        }
    }
    result
}

#[test]
fn single_bit_ops_interact_correctly() {
    for x in PATTERNS {
        for k in 0..32u32 {
            assert_eq!(bext(bset(x, k), k), 1);
            assert_eq!(bext(bclr(x, k), k), 0);
            assert_eq!(bclr(bset(x, k), k), bclr(x, k));
            assert_eq!(binv(binv(x, k), k), x);
        }
    }
    // The bit index is rs2 mod 32.
    assert_eq!(bset(0, 33), 2);
    assert_eq!(bext(0x8000_0000, 31), 1);
}
