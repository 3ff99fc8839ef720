//! Register file and architectural state invariants.

use crate::common::encoding::addi;
use crate::common::harness::{exec_inst, fresh_state};
use gvsim_core::state::reg::{RegWidth, RegisterFile};

#[test]
fn x0_reads_zero_after_any_write() {
    let mut state = fresh_state();
    for val in [0u32, 1, 0xffff_ffff, 0x8000_0000, 12345] {
        state.set_xreg(0, val);
        assert_eq!(state.xreg(0), 0);
    }
    // Through the semantic layer too: addi x0, x0, 7.
    exec_inst(&mut state, addi(0, 0, 7));
    assert_eq!(state.xreg(0), 0);
}

#[test]
fn alias_and_canonical_name_share_one_cell() {
    let mut state = fresh_state();
    let regs = state.registers_mut();
    let ra = regs.lookup("ra").unwrap();
    let x1 = regs.lookup("x1").unwrap();
    assert_eq!(ra, x1);

    regs.write(ra, 0x1234);
    assert_eq!(regs.read(x1), 0x1234);
    regs.write(x1, 0x5678);
    assert_eq!(regs.read(ra), 0x5678);
}

#[test]
fn fp_register_aliases_resolve() {
    let state = fresh_state();
    let regs = state.registers();
    assert_eq!(regs.lookup("fa0"), regs.lookup("f10"));
    assert_eq!(regs.lookup("ft11"), regs.lookup("f31"));
    assert_eq!(regs.lookup("fp"), regs.lookup("x8"));
    assert_eq!(regs.lookup("s0"), regs.lookup("x8"));
}

#[test]
fn unknown_name_resolves_to_none() {
    let state = fresh_state();
    assert!(state.registers().lookup("x32").is_none());
    assert!(state.registers().lookup("q0").is_none());
}

#[test]
fn integer_cells_mask_to_32_bits() {
    let mut regs = RegisterFile::new();
    let id = regs.add_register("x1", RegWidth::W32, false);
    regs.write(id, 0x1_2345_6789);
    assert_eq!(regs.read(id), 0x2345_6789);
}

#[test]
fn fp_cells_keep_64_bits() {
    let mut regs = RegisterFile::new();
    let id = regs.add_register("f1", RegWidth::W64, false);
    regs.write(id, 0xffff_ffff_0000_0001);
    assert_eq!(regs.read(id), 0xffff_ffff_0000_0001);
}

#[test]
#[should_panic(expected = "already has a storage cell")]
fn duplicate_register_cell_is_an_invariant_violation() {
    let mut regs = RegisterFile::new();
    regs.add_register("x1", RegWidth::W32, false);
    regs.add_register("x1", RegWidth::W32, false);
}

#[test]
#[should_panic(expected = "already bound")]
fn duplicate_alias_is_an_invariant_violation() {
    let mut regs = RegisterFile::new();
    regs.add_register("x1", RegWidth::W32, false);
    regs.add_register("x2", RegWidth::W32, false);
    regs.add_alias("x1", "ra");
    regs.add_alias("x2", "ra");
}

#[test]
fn store_journal_records_writes_and_drains() {
    let mut state = fresh_state();
    state.write_memory(0x100, &[1, 2, 3]);
    state.write_memory(0x200, &[4]);
    assert_eq!(state.take_store_log(), vec![(0x100, 3), (0x200, 1)]);
    assert!(state.take_store_log().is_empty());
}

#[test]
fn debug_memory_access_bypasses_watches_but_clears_reservation() {
    let mut state = fresh_state();
    state.load_reserved(0x100);
    state.debug_write_memory(0x100, &[1, 2, 3, 4]);
    assert!(!state.store_conditional(0x100, 9));
    let mut buf = [0u8; 4];
    state.debug_read_memory(0x100, &mut buf);
    assert_eq!(buf, [1, 2, 3, 4]);
}
