//! CSR access semantics.

use crate::common::encoding::csr_op;
use crate::common::harness::{exec_inst, fresh_state};
use gvsim_core::state::fp::FpFlags;

const CSRRW: u32 = 0b001;
const CSRRS: u32 = 0b010;
const CSRRC: u32 = 0b011;
const CSRRWI: u32 = 0b101;
const CSRRSI: u32 = 0b110;

const FFLAGS: u32 = 0x001;
const FRM: u32 = 0x002;
const FCSR: u32 = 0x003;
const MSCRATCH: u32 = 0x340;
const MEPC: u32 = 0x341;
const VL: u32 = 0xc20;
const VLENB: u32 = 0xc22;
const INSTRET: u32 = 0xc02;

#[test]
fn csrrw_swaps_value_and_old_contents() {
    let mut state = fresh_state();
    state.set_xreg(1, 0xabcd);
    exec_inst(&mut state, csr_op(CSRRW, 2, 1, MSCRATCH));
    assert_eq!(state.xreg(2), 0);
    state.set_xreg(1, 0x1111);
    exec_inst(&mut state, csr_op(CSRRW, 2, 1, MSCRATCH));
    assert_eq!(state.xreg(2), 0xabcd);
    assert_eq!(state.csr_read(MSCRATCH as u16), Some(0x1111));
}

#[test]
fn csrrs_sets_bits_and_suppresses_write_on_x0() {
    let mut state = fresh_state();
    state.csr_write(MSCRATCH as u16, 0b0011);
    state.set_xreg(1, 0b0110);
    exec_inst(&mut state, csr_op(CSRRS, 2, 1, MSCRATCH));
    assert_eq!(state.xreg(2), 0b0011);
    assert_eq!(state.csr_read(MSCRATCH as u16), Some(0b0111));

    // rs1 = x0: pure read, no write side effects.
    exec_inst(&mut state, csr_op(CSRRS, 2, 0, VL));
    assert_eq!(state.xreg(2), 0);
    assert!(state.take_trap().is_none());
}

#[test]
fn csrrc_clears_bits() {
    let mut state = fresh_state();
    state.csr_write(MSCRATCH as u16, 0b1111);
    state.set_xreg(1, 0b0101);
    exec_inst(&mut state, csr_op(CSRRC, 2, 1, MSCRATCH));
    assert_eq!(state.xreg(2), 0b1111);
    assert_eq!(state.csr_read(MSCRATCH as u16), Some(0b1010));
}

#[test]
fn csr_immediate_forms_use_the_rs1_field_as_value() {
    let mut state = fresh_state();
    exec_inst(&mut state, csr_op(CSRRWI, 2, 0b10101, MSCRATCH));
    assert_eq!(state.csr_read(MSCRATCH as u16), Some(0b10101));
    exec_inst(&mut state, csr_op(CSRRSI, 2, 0b01010, MSCRATCH));
    assert_eq!(state.csr_read(MSCRATCH as u16), Some(0b11111));
}

#[test]
fn fp_csrs_mirror_fp_state() {
    let mut state = fresh_state();
    state.fp.raise(FpFlags::NV | FpFlags::NX);
    assert_eq!(state.csr_read(FFLAGS as u16), Some(0b10001));

    // Writing frm through the CSR updates the live rounding mode.
    state.set_xreg(1, 0b010);
    exec_inst(&mut state, csr_op(CSRRW, 0, 1, FRM));
    assert_eq!(state.fp.frm(), 0b010);

    // fcsr packs frm above fflags.
    assert_eq!(state.csr_read(FCSR as u16), Some(0b010_10001));
    state.set_xreg(1, 0);
    exec_inst(&mut state, csr_op(CSRRW, 0, 1, FCSR));
    assert_eq!(state.fp.fflags(), FpFlags::NONE);
    assert_eq!(state.fp.frm(), 0);
}

#[test]
fn counter_csrs_view_the_live_counters() {
    let mut state = fresh_state();
    state.retired = 0x1_0000_0002;
    assert_eq!(state.csr_read(INSTRET as u16), Some(2));
    assert_eq!(state.csr_read(0xc82), Some(1)); // instreth
}

#[test]
fn writes_to_read_only_csrs_trap() {
    let mut state = fresh_state();
    assert!(state.csr_write(VL as u16, 1).is_none());
    assert!(state.csr_write(VLENB as u16, 1).is_none());

    state.set_xreg(1, 1);
    exec_inst(&mut state, csr_op(CSRRW, 2, 1, VL));
    assert!(state.take_trap().is_some());
}

#[test]
fn unimplemented_csr_access_traps() {
    let mut state = fresh_state();
    exec_inst(&mut state, csr_op(CSRRS, 2, 0, 0x123));
    assert!(state.take_trap().is_some());
}

#[test]
fn mepc_write_mask_clears_bit_zero() {
    let mut state = fresh_state();
    state.set_xreg(1, 0x1001);
    exec_inst(&mut state, csr_op(CSRRW, 0, 1, MEPC));
    assert_eq!(state.csr_read(MEPC as u16), Some(0x1000));
}
