//! Compressed instruction expansion (RV32).
//!
//! Converts a 16-bit compressed encoding into its 32-bit equivalent.
//! A return value of 0 marks a reserved or illegal compressed encoding
//! (0 is not a valid full-width instruction), which the decoder turns into
//! an IllegalInstruction semantic.

use super::constants::{q0, q1, q2, QUADRANT_0, QUADRANT_1, QUADRANT_2};
use crate::common::constants::EBREAK_32;
use crate::isa::rv32fd;
use crate::isa::rv32i::{funct3, funct7, opcodes};

fn sign_extend(val: u32, bits: u32) -> i32 {
    let shift = 32 - bits;
    ((val as i32) << shift) >> shift
}

/// Builds an I-type encoding.
fn i_type(opcode: u32, rd: u32, f3: u32, rs1: u32, imm: i32) -> u32 {
    ((imm as u32 & 0xfff) << 20) | (rs1 << 15) | (f3 << 12) | (rd << 7) | opcode
}

/// Builds an S-type encoding.
fn s_type(opcode: u32, f3: u32, rs1: u32, rs2: u32, imm: i32) -> u32 {
    let v = imm as u32;
    ((v >> 5 & 0x7f) << 25) | (rs2 << 20) | (rs1 << 15) | (f3 << 12) | ((v & 0x1f) << 7) | opcode
}

/// Builds an R-type encoding.
fn r_type(opcode: u32, rd: u32, f3: u32, rs1: u32, rs2: u32, f7: u32) -> u32 {
    (f7 << 25) | (rs2 << 20) | (rs1 << 15) | (f3 << 12) | (rd << 7) | opcode
}

/// Builds a J-type encoding from a byte offset.
fn j_type(rd: u32, offset: i32) -> u32 {
    let v = offset as u32;
    ((v >> 20 & 1) << 31)
        | ((v >> 1 & 0x3ff) << 21)
        | ((v >> 11 & 1) << 20)
        | ((v >> 12 & 0xff) << 12)
        | (rd << 7)
        | opcodes::OP_JAL
}

/// Builds a B-type encoding from a byte offset.
fn b_type(f3: u32, rs1: u32, rs2: u32, offset: i32) -> u32 {
    let v = offset as u32;
    ((v >> 12 & 1) << 31)
        | ((v >> 5 & 0x3f) << 25)
        | (rs2 << 20)
        | (rs1 << 15)
        | (f3 << 12)
        | ((v >> 1 & 0xf) << 8)
        | ((v >> 11 & 1) << 7)
        | opcodes::OP_BRANCH
}

/// C.J / C.JAL offset: an 12-bit even offset scattered over the encoding.
fn cj_offset(inst: u16) -> i32 {
    sign_extend(
        ((inst as u32 >> 3) & 0x7) << 1
            | ((inst as u32 >> 11) & 1) << 4
            | ((inst as u32 >> 2) & 1) << 5
            | ((inst as u32 >> 7) & 1) << 6
            | ((inst as u32 >> 6) & 1) << 7
            | ((inst as u32 >> 9) & 3) << 8
            | ((inst as u32 >> 8) & 1) << 10
            | ((inst as u32 >> 12) & 1) << 11,
        12,
    )
}

/// C.BEQZ / C.BNEZ offset: a 9-bit even offset.
fn cb_offset(inst: u16) -> i32 {
    sign_extend(
        ((inst as u32 >> 3) & 0x3) << 1
            | ((inst as u32 >> 10) & 0x3) << 3
            | ((inst as u32 >> 2) & 1) << 5
            | ((inst as u32 >> 5) & 0x3) << 6
            | ((inst as u32 >> 12) & 1) << 8,
        9,
    )
}

/// Expands a 16-bit RVC instruction into its 32-bit equivalent (RV32 set).
pub fn expand(inst: u16) -> u32 {
    let op = inst & 0x3;
    let row = (inst >> 13) & 0x7;
    let w = inst as u32;

    match op {
        QUADRANT_0 => {
            // Compressed register slots name x8-x15 / f8-f15.
            let rs1 = 8 + ((w >> 7) & 0x7);
            let rd_rs2 = 8 + ((w >> 2) & 0x7);
            match row {
                q0::C_ADDI4SPN => {
                    let imm = ((w >> 6) & 1) << 2
                        | ((w >> 5) & 1) << 3
                        | ((w >> 11) & 0x3) << 4
                        | ((w >> 7) & 0xf) << 6;
                    if imm == 0 {
                        return 0;
                    }
                    i_type(opcodes::OP_IMM, rd_rs2, funct3::ADD_SUB, 2, imm as i32)
                }
                q0::C_FLD => {
                    let imm = ((w >> 10) & 0x7) << 3 | ((w >> 5) & 0x3) << 6;
                    i_type(rv32fd::OP_LOAD_FP, rd_rs2, rv32fd::WIDTH_D, rs1, imm as i32)
                }
                q0::C_LW => {
                    let imm = ((w >> 6) & 1) << 2 | ((w >> 10) & 0x7) << 3 | ((w >> 5) & 1) << 6;
                    i_type(opcodes::OP_LOAD, rd_rs2, funct3::LW, rs1, imm as i32)
                }
                q0::C_FLW => {
                    let imm = ((w >> 6) & 1) << 2 | ((w >> 10) & 0x7) << 3 | ((w >> 5) & 1) << 6;
                    i_type(rv32fd::OP_LOAD_FP, rd_rs2, rv32fd::WIDTH_W, rs1, imm as i32)
                }
                q0::C_FSD => {
                    let imm = ((w >> 10) & 0x7) << 3 | ((w >> 5) & 0x3) << 6;
                    s_type(rv32fd::OP_STORE_FP, rv32fd::WIDTH_D, rs1, rd_rs2, imm as i32)
                }
                q0::C_SW => {
                    let imm = ((w >> 6) & 1) << 2 | ((w >> 10) & 0x7) << 3 | ((w >> 5) & 1) << 6;
                    s_type(opcodes::OP_STORE, funct3::SW, rs1, rd_rs2, imm as i32)
                }
                q0::C_FSW => {
                    let imm = ((w >> 6) & 1) << 2 | ((w >> 10) & 0x7) << 3 | ((w >> 5) & 1) << 6;
                    s_type(rv32fd::OP_STORE_FP, rv32fd::WIDTH_W, rs1, rd_rs2, imm as i32)
                }
                _ => 0,
            }
        }

        QUADRANT_1 => match row {
            q1::C_ADDI => {
                let imm = sign_extend(((w >> 2) & 0x1f) | ((w >> 12) & 1) << 5, 6);
                let rd = (w >> 7) & 0x1f;
                i_type(opcodes::OP_IMM, rd, funct3::ADD_SUB, rd, imm)
            }
            q1::C_JAL => j_type(1, cj_offset(inst)),
            q1::C_LI => {
                let imm = sign_extend(((w >> 2) & 0x1f) | ((w >> 12) & 1) << 5, 6);
                let rd = (w >> 7) & 0x1f;
                i_type(opcodes::OP_IMM, rd, funct3::ADD_SUB, 0, imm)
            }
            q1::C_LUI_ADDI16SP => {
                let rd = (w >> 7) & 0x1f;
                if rd == 2 {
                    let imm = sign_extend(
                        ((w >> 6) & 1) << 4
                            | ((w >> 2) & 1) << 5
                            | ((w >> 5) & 1) << 6
                            | ((w >> 3) & 3) << 7
                            | ((w >> 12) & 1) << 9,
                        10,
                    );
                    if imm == 0 {
                        return 0;
                    }
                    i_type(opcodes::OP_IMM, 2, funct3::ADD_SUB, 2, imm)
                } else {
                    let imm = sign_extend(((w >> 2) & 0x1f) | ((w >> 12) & 1) << 5, 6);
                    if imm == 0 {
                        return 0;
                    }
                    (((imm as u32) & 0xfffff) << 12) | (rd << 7) | opcodes::OP_LUI
                }
            }
            q1::C_MISC_ALU => {
                let bit12 = (w >> 12) & 1;
                let group = (w >> 10) & 0x3;
                let rd = 8 + ((w >> 7) & 0x7);
                match group {
                    0 | 1 => {
                        // RV32: shamt[5] (bit 12) must be zero.
                        if bit12 != 0 {
                            return 0;
                        }
                        let shamt = (w >> 2) & 0x1f;
                        let f7 = if group == 0 { funct7::BASE } else { funct7::ALT };
                        r_type(opcodes::OP_IMM, rd, funct3::SRL_SRA, rd, shamt, f7)
                    }
                    2 => {
                        let imm = sign_extend(((w >> 2) & 0x1f) | bit12 << 5, 6);
                        i_type(opcodes::OP_IMM, rd, funct3::AND, rd, imm)
                    }
                    _ => {
                        // Register-register row; the bit12 = 1 half is RV64.
                        if bit12 != 0 {
                            return 0;
                        }
                        let rs2 = 8 + ((w >> 2) & 0x7);
                        match (w >> 5) & 0x3 {
                            0 => r_type(opcodes::OP_REG, rd, funct3::ADD_SUB, rd, rs2, funct7::ALT),
                            1 => r_type(opcodes::OP_REG, rd, funct3::XOR, rd, rs2, funct7::BASE),
                            2 => r_type(opcodes::OP_REG, rd, funct3::OR, rd, rs2, funct7::BASE),
                            _ => r_type(opcodes::OP_REG, rd, funct3::AND, rd, rs2, funct7::BASE),
                        }
                    }
                }
            }
            q1::C_J => j_type(0, cj_offset(inst)),
            q1::C_BEQZ => b_type(funct3::BEQ, 8 + ((w >> 7) & 0x7), 0, cb_offset(inst)),
            q1::C_BNEZ => b_type(funct3::BNE, 8 + ((w >> 7) & 0x7), 0, cb_offset(inst)),
            _ => 0,
        },

        QUADRANT_2 => {
            let rd = (w >> 7) & 0x1f;
            let rs2 = (w >> 2) & 0x1f;
            match row {
                q2::C_SLLI => {
                    if (w >> 12) & 1 != 0 {
                        return 0;
                    }
                    let shamt = (w >> 2) & 0x1f;
                    r_type(opcodes::OP_IMM, rd, funct3::SLL, rd, shamt, funct7::BASE)
                }
                q2::C_FLDSP => {
                    let imm = ((w >> 12) & 1) << 5 | ((w >> 5) & 0x3) << 3 | ((w >> 2) & 0x7) << 6;
                    i_type(rv32fd::OP_LOAD_FP, rd, rv32fd::WIDTH_D, 2, imm as i32)
                }
                q2::C_LWSP => {
                    if rd == 0 {
                        return 0;
                    }
                    let imm = ((w >> 12) & 1) << 5 | ((w >> 4) & 0x7) << 2 | ((w >> 2) & 0x3) << 6;
                    i_type(opcodes::OP_LOAD, rd, funct3::LW, 2, imm as i32)
                }
                q2::C_FLWSP => {
                    let imm = ((w >> 12) & 1) << 5 | ((w >> 4) & 0x7) << 2 | ((w >> 2) & 0x3) << 6;
                    i_type(rv32fd::OP_LOAD_FP, rd, rv32fd::WIDTH_W, 2, imm as i32)
                }
                q2::C_JR_MV_ADD => {
                    let bit12 = (w >> 12) & 1;
                    match (bit12, rd, rs2) {
                        (0, 0, _) => 0,
                        (0, _, 0) => i_type(opcodes::OP_JALR, 0, 0, rd, 0),
                        (0, _, _) => r_type(opcodes::OP_REG, rd, funct3::ADD_SUB, 0, rs2, 0),
                        (1, 0, 0) => EBREAK_32,
                        (1, _, 0) => i_type(opcodes::OP_JALR, 1, 0, rd, 0),
                        (1, _, _) => r_type(opcodes::OP_REG, rd, funct3::ADD_SUB, rd, rs2, 0),
                        _ => 0,
                    }
                }
                q2::C_FSDSP => {
                    let imm = ((w >> 10) & 0x7) << 3 | ((w >> 7) & 0x7) << 6;
                    s_type(rv32fd::OP_STORE_FP, rv32fd::WIDTH_D, 2, rs2, imm as i32)
                }
                q2::C_SWSP => {
                    let imm = ((w >> 9) & 0xf) << 2 | ((w >> 7) & 0x3) << 6;
                    s_type(opcodes::OP_STORE, funct3::SW, 2, rs2, imm as i32)
                }
                q2::C_FSWSP => {
                    let imm = ((w >> 9) & 0xf) << 2 | ((w >> 7) & 0x3) << 6;
                    s_type(rv32fd::OP_STORE_FP, rv32fd::WIDTH_W, 2, rs2, imm as i32)
                }
                _ => 0,
            }
        }

        _ => 0,
    }
}
