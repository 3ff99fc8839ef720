//! Base integer funct7 values (bits 31-25).

/// Default encoding (ADD, SRL, SLL, ...).
pub const BASE: u32 = 0b0000000;

/// Alternate encoding (SUB, SRA).
pub const ALT: u32 = 0b0100000;

/// System funct12 for ECALL.
pub const ECALL_IMM: u32 = 0x000;

/// System funct12 for EBREAK.
pub const EBREAK_IMM: u32 = 0x001;

/// System funct12 for MRET.
pub const MRET_IMM: u32 = 0x302;

/// System funct12 for WFI.
pub const WFI_IMM: u32 = 0x105;
