//! Decoder, RVC expansion, and decode-cache behavior.

use crate::common::encoding::{add, addi, b_type, jal, u_type};
use crate::common::harness::{fresh_state, TestContext, ENTRY};
use gvsim_core::isa::decode::{decode, Operand};
use gvsim_core::isa::opcode::Opcode;
use gvsim_core::HaltReason;

#[test]
fn i_type_immediates_sign_extend() {
    let state = fresh_state();
    let inst = decode(&state, 0, addi(1, 2, -2048));
    assert_eq!(inst.opcode, Opcode::Addi);
    assert_eq!(inst.src[1], Operand::Imm(-2048));
    assert_eq!(inst.size, 4);

    let inst = decode(&state, 0, addi(1, 2, 2047));
    assert_eq!(inst.src[1], Operand::Imm(2047));
}

#[test]
fn branch_and_jump_offsets_reassemble() {
    let state = fresh_state();
    let inst = decode(&state, 0, b_type(0b000, 1, 2, -4096));
    assert_eq!(inst.opcode, Opcode::Beq);
    assert_eq!(inst.src[2], Operand::Imm(-4096));

    let inst = decode(&state, 0, jal(1, -2));
    assert_eq!(inst.opcode, Opcode::Jal);
    assert_eq!(inst.src[0], Operand::Imm(-2));

    let inst = decode(&state, 0, jal(0, 0xff_ffe));
    assert_eq!(inst.src[0], Operand::Imm(0xff_ffe));
}

#[test]
fn u_type_keeps_the_high_twenty_bits() {
    let state = fresh_state();
    let inst = decode(&state, 0, u_type(0b0110111, 5, 0xffff_f000));
    assert_eq!(inst.opcode, Opcode::Lui);
    assert_eq!(inst.src[0], Operand::Imm(0xffff_f000u32 as i32));
}

#[test]
fn register_operands_bind_to_the_named_cells() {
    let state = fresh_state();
    let inst = decode(&state, 0, add(3, 1, 2));
    assert_eq!(inst.dst, Operand::Reg(state.xreg_id(3)));
    assert_eq!(inst.src[0], Operand::Reg(state.xreg_id(1)));
    assert_eq!(inst.src[1], Operand::Reg(state.xreg_id(2)));
}

#[test]
fn unmatched_patterns_decode_to_illegal() {
    let state = fresh_state();
    for raw in [0xffff_ffffu32, 0x0000_0007, 0x8000_0033] {
        let inst = decode(&state, 0, raw);
        assert_eq!(inst.opcode, Opcode::Illegal, "raw {:#010x}", raw);
    }
}

#[test]
fn compressed_expansion_keeps_two_byte_width() {
    let state = fresh_state();
    // c.addi x10, 3 -> 000 0 01010 00011 01.
    let c_addi: u32 = 0b000_0_01010_00011_01;
    let inst = decode(&state, 0, c_addi);
    assert_eq!(inst.opcode, Opcode::Addi);
    assert_eq!(inst.size, 2);
    assert_eq!(inst.dst, Operand::Reg(state.xreg_id(10)));
    assert_eq!(inst.src[1], Operand::Imm(3));

    // c.ebreak = 0x9002.
    let inst = decode(&state, 0, 0x9002);
    assert_eq!(inst.opcode, Opcode::Ebreak);
    assert_eq!(inst.size, 2);

    // c.mv x5, x6 -> add x5, x0, x6.
    let c_mv: u32 = 0b100_0_00101_00110_10;
    let inst = decode(&state, 0, c_mv);
    assert_eq!(inst.opcode, Opcode::Add);
    assert_eq!(inst.size, 2);
    assert_eq!(inst.src[0], Operand::Reg(state.xreg_id(0)));
    assert_eq!(inst.src[1], Operand::Reg(state.xreg_id(6)));

    // c.lw x10, 4(x11) -> rs1' = 3 (x11), rd' = 2 (x10), uimm = 4.
    let c_lw: u32 = 0b010_000_011_10_010_00;
    let inst = decode(&state, 0, c_lw);
    assert_eq!(inst.opcode, Opcode::Lw);
    assert_eq!(inst.size, 2);
    assert_eq!(inst.src[1], Operand::Imm(4));
}

#[test]
fn reserved_compressed_encodings_are_illegal() {
    let state = fresh_state();
    // All-zero halfword is the canonical illegal encoding.
    let inst = decode(&state, 0, 0x0000);
    assert_eq!(inst.opcode, Opcode::Illegal);
    assert_eq!(inst.size, 2);
}

#[test]
fn store_over_cached_instruction_invalidates_the_cache_entry() {
    // Self-modifying program. Slot 0 executes (and is cached) as
    // `addi x5, x0, 7`; the program then stores a replacement encoding
    // over it and jumps back. The re-execution must decode the new bytes.
    //
    //   0: addi x5, x0, 7
    //   1: lw   x1, 0(x4)        (x4 points at the replacement word)
    //   2: sw   x1, 0(x3)        (x3 = ENTRY; overwrite slot 0)
    //   3: jal  x0, -12          (back to slot 0)
    let replacement = addi(5, 0, 99);
    let prog = [
        addi(5, 0, 7),
        crate::common::encoding::lw(1, 4, 0),
        crate::common::encoding::sw(3, 1, 0),
        jal(0, -12),
    ];
    let ctx = TestContext::with_program_and_state(&prog, |state| {
        state.write_memory(0x4000, &replacement.to_le_bytes());
        state.set_xreg(3, ENTRY);
        state.set_xreg(4, 0x4000);
    });
    assert_eq!(ctx.core.step(4).unwrap(), HaltReason::StepComplete);
    assert_eq!(ctx.xreg(5), 7);
    assert_eq!(ctx.pc(), ENTRY);

    // Slot 0 was cached by the first pass and overwritten by the store;
    // the next step must execute the replacement.
    assert_eq!(ctx.core.step(1).unwrap(), HaltReason::StepComplete);
    assert_eq!(ctx.xreg(5), 99);
}

#[test]
fn debug_memory_write_invalidates_cached_decodings() {
    let ctx = TestContext::with_program(&[addi(5, 0, 7), jal(0, -4)]);
    ctx.core.step(2).unwrap();
    assert_eq!(ctx.xreg(5), 7);

    ctx.core
        .write_memory(ENTRY as u64, &addi(5, 0, 42).to_le_bytes())
        .unwrap();
    ctx.core.step(1).unwrap();
    assert_eq!(ctx.xreg(5), 42);
}
