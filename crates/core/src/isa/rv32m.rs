//! Multiply/divide (M) extension encoding tables.
//!
//! All M instructions live under `OP_REG` with funct7 `0b0000001`; funct3
//! selects the operation.

/// funct7 marking the M extension under `OP_REG`.
pub const FUNCT7_MULDIV: u32 = 0b0000001;

/// Multiply, low 32 bits.
pub const MUL: u32 = 0b000;
/// Multiply, high 32 bits, signed × signed.
pub const MULH: u32 = 0b001;
/// Multiply, high 32 bits, signed × unsigned.
pub const MULHSU: u32 = 0b010;
/// Multiply, high 32 bits, unsigned × unsigned.
pub const MULHU: u32 = 0b011;
/// Signed division.
pub const DIV: u32 = 0b100;
/// Unsigned division.
pub const DIVU: u32 = 0b101;
/// Signed remainder.
pub const REM: u32 = 0b110;
/// Unsigned remainder.
pub const REMU: u32 = 0b111;
