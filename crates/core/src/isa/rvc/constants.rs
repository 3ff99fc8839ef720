//! Compressed (C) extension constants.
//!
//! Compressed instructions are divided into three quadrants by the lowest
//! two bits; within a quadrant, bits 15-13 select the row. The rows here
//! are the RV32 set: `c.jal` occupies the slot RV64 gives to `c.addiw`,
//! and the word-width float loads/stores (`c.flw`/`c.fsw`) occupy the
//! RV64 `c.ld`/`c.sd` slots.

/// Quadrant 0 (bits 1:0 = 00).
pub const QUADRANT_0: u16 = 0b00;
/// Quadrant 1 (bits 1:0 = 01).
pub const QUADRANT_1: u16 = 0b01;
/// Quadrant 2 (bits 1:0 = 10).
pub const QUADRANT_2: u16 = 0b10;

/// Rows in quadrant 0.
pub mod q0 {
    /// Add scaled immediate to stack pointer (C.ADDI4SPN).
    pub const C_ADDI4SPN: u16 = 0b000;
    /// Float load double (C.FLD).
    pub const C_FLD: u16 = 0b001;
    /// Load word (C.LW).
    pub const C_LW: u16 = 0b010;
    /// Float load word (C.FLW, RV32 only).
    pub const C_FLW: u16 = 0b011;
    /// Float store double (C.FSD).
    pub const C_FSD: u16 = 0b101;
    /// Store word (C.SW).
    pub const C_SW: u16 = 0b110;
    /// Float store word (C.FSW, RV32 only).
    pub const C_FSW: u16 = 0b111;
}

/// Rows in quadrant 1.
pub mod q1 {
    /// Add immediate (C.ADDI, C.NOP).
    pub const C_ADDI: u16 = 0b000;
    /// Jump and link (C.JAL, RV32 only).
    pub const C_JAL: u16 = 0b001;
    /// Load immediate (C.LI).
    pub const C_LI: u16 = 0b010;
    /// Load upper immediate / adjust stack pointer (C.LUI / C.ADDI16SP).
    pub const C_LUI_ADDI16SP: u16 = 0b011;
    /// Register ALU row (C.SRLI, C.SRAI, C.ANDI, C.SUB, C.XOR, C.OR, C.AND).
    pub const C_MISC_ALU: u16 = 0b100;
    /// Jump (C.J).
    pub const C_J: u16 = 0b101;
    /// Branch if zero (C.BEQZ).
    pub const C_BEQZ: u16 = 0b110;
    /// Branch if not zero (C.BNEZ).
    pub const C_BNEZ: u16 = 0b111;
}

/// Rows in quadrant 2.
pub mod q2 {
    /// Shift left logical immediate (C.SLLI).
    pub const C_SLLI: u16 = 0b000;
    /// Float load double from stack (C.FLDSP).
    pub const C_FLDSP: u16 = 0b001;
    /// Load word from stack (C.LWSP).
    pub const C_LWSP: u16 = 0b010;
    /// Float load word from stack (C.FLWSP, RV32 only).
    pub const C_FLWSP: u16 = 0b011;
    /// Jump/move/add/ebreak row (C.JR, C.MV, C.EBREAK, C.JALR, C.ADD).
    pub const C_JR_MV_ADD: u16 = 0b100;
    /// Float store double to stack (C.FSDSP).
    pub const C_FSDSP: u16 = 0b101;
    /// Store word to stack (C.SWSP).
    pub const C_SWSP: u16 = 0b110;
    /// Float store word to stack (C.FSWSP, RV32 only).
    pub const C_FSWSP: u16 = 0b111;
}
