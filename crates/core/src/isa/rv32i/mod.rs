//! Base integer (I) encoding tables.

/// funct3 values under the base opcodes.
pub mod funct3;

/// funct7 values under `OP` and `OP_IMM`.
pub mod funct7;

/// Major opcodes.
pub mod opcodes;
