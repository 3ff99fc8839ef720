//! Bit-manipulation (Zba/Zbb/Zbc/Zbs) encoding tables.
//!
//! The Zb* families reuse the `OP` and `OP_IMM` major opcodes and are
//! distinguished by funct7 (and, for the unary Zbb group, the rs2 field).

// ── funct7 groups under OP ──

/// Zba shift-and-add group (`sh1add`/`sh2add`/`sh3add`, funct3 010/100/110).
///
/// The inverted-logic group (`andn`/`orn`/`xnor`) shares funct7 `0b0100000`
/// with `sub`/`sra` and is decoded under that row.
pub const FUNCT7_SHADD: u32 = 0b0010000;

/// Zbb min/max group and Zbc carry-less multiply group.
pub const FUNCT7_MINMAX_CLMUL: u32 = 0b0000101;

/// Zbb rotate group (`rol`/`ror`) and unary group (`clz` et al under
/// OP_IMM).
pub const FUNCT7_ROT: u32 = 0b0110000;

/// Zbs single-bit clear/extract group (`bclr`/`bext`).
pub const FUNCT7_BCLR_BEXT: u32 = 0b0100100;

/// Zbs single-bit invert group (`binv`), and `rev8`/`orc.b` rows under
/// OP_IMM.
pub const FUNCT7_BINV: u32 = 0b0110100;

/// Zbs single-bit set group (`bset`).
pub const FUNCT7_BSET: u32 = 0b0010100;

/// `zext.h` encoding: funct7 0b0000100 with rs2 = 0 under OP.
pub const FUNCT7_ZEXT_H: u32 = 0b0000100;

// ── funct3 rows ──

/// `sh1add` funct3.
pub const SH1ADD: u32 = 0b010;
/// `sh2add` funct3.
pub const SH2ADD: u32 = 0b100;
/// `sh3add` funct3.
pub const SH3ADD: u32 = 0b110;

/// `andn` funct3.
pub const ANDN: u32 = 0b111;
/// `orn` funct3.
pub const ORN: u32 = 0b110;
/// `xnor` funct3.
pub const XNOR: u32 = 0b100;

/// `clmul` funct3 (low half).
pub const CLMUL: u32 = 0b001;
/// `clmulr` funct3 (reversed).
pub const CLMULR: u32 = 0b010;
/// `clmulh` funct3 (high half).
pub const CLMULH: u32 = 0b011;
/// `min` funct3.
pub const MIN: u32 = 0b100;
/// `minu` funct3.
pub const MINU: u32 = 0b101;
/// `max` funct3.
pub const MAX: u32 = 0b110;
/// `maxu` funct3.
pub const MAXU: u32 = 0b111;

/// `rol` funct3.
pub const ROL: u32 = 0b001;
/// `ror`/`rori` funct3.
pub const ROR: u32 = 0b101;

/// `bclr`/`bset`/`binv` (and immediate forms) funct3.
pub const BSET_CLR_INV: u32 = 0b001;
/// `bext`/`bexti` funct3.
pub const BEXT: u32 = 0b101;

// ── rs2 selectors for the unary Zbb group (funct7 0b0110000, OP_IMM,
//    funct3 001) ──

/// `clz` rs2 selector.
pub const UNARY_CLZ: u32 = 0b00000;
/// `ctz` rs2 selector.
pub const UNARY_CTZ: u32 = 0b00001;
/// `cpop` rs2 selector.
pub const UNARY_CPOP: u32 = 0b00010;
/// `sext.b` rs2 selector.
pub const UNARY_SEXT_B: u32 = 0b00100;
/// `sext.h` rs2 selector.
pub const UNARY_SEXT_H: u32 = 0b00101;

/// `orc.b` immediate (bits 31-20) under OP_IMM funct3 101.
pub const ORC_B_IMM: u32 = 0b0010_1000_0111;

/// `rev8` immediate (bits 31-20) under OP_IMM funct3 101 (RV32 form).
pub const REV8_IMM: u32 = 0b0110_1001_1000;
