//! Base integer major opcodes (bits 6-0).

/// Load instructions (LB, LH, LW, LBU, LHU).
pub const OP_LOAD: u32 = 0b0000011;

/// Memory ordering (FENCE, FENCE.I).
pub const OP_MISC_MEM: u32 = 0b0001111;

/// Immediate arithmetic (ADDI, ANDI, SLLI, ...).
pub const OP_IMM: u32 = 0b0010011;

/// Add upper immediate to PC.
pub const OP_AUIPC: u32 = 0b0010111;

/// Store instructions (SB, SH, SW).
pub const OP_STORE: u32 = 0b0100011;

/// Register-register arithmetic (ADD, SUB, SLL, ...).
pub const OP_REG: u32 = 0b0110011;

/// Load upper immediate.
pub const OP_LUI: u32 = 0b0110111;

/// Conditional branches (BEQ, BNE, ...).
pub const OP_BRANCH: u32 = 0b1100011;

/// Jump and link register.
pub const OP_JALR: u32 = 0b1100111;

/// Jump and link.
pub const OP_JAL: u32 = 0b1101111;

/// System instructions (ECALL, EBREAK, CSR ops, MRET, WFI).
pub const OP_SYSTEM: u32 = 0b1110011;

/// Atomic extension (LR/SC/AMO).
pub const OP_AMO: u32 = 0b0101111;
