//! Instruction set definitions and decoding.
//!
//! This module holds everything between raw instruction bytes and an
//! executable [`DecodedInst`](decode::DecodedInst):
//! 1. **Field extraction:** Bit-slice accessors and immediate assembly for
//!    the R/I/S/B/U/J formats.
//! 2. **Encoding tables:** Major opcodes and function codes per extension
//!    (base integer, M, A, F/D, Zb*, V).
//! 3. **Compressed expansion:** RVC quadrant tables mapping 16-bit encodings
//!    to their 32-bit equivalents.
//! 4. **The decoder and its PC-keyed cache.**

/// PC-keyed decode memoization.
pub mod cache;

/// The table-driven decoder.
pub mod decode;

/// Instruction field extraction and immediate assembly.
pub mod encoding;

/// Opcode identities and counter names.
pub mod opcode;

/// Base integer (I) encoding tables.
pub mod rv32i;

/// Atomic (A) extension encoding tables.
pub mod rv32a;

/// Single/double float (F/D) encoding tables.
pub mod rv32fd;

/// Multiply/divide (M) extension encoding tables.
pub mod rv32m;

/// Compressed (C) instruction expansion.
pub mod rvc;

/// Vector (V) extension encoding tables.
pub mod rvv;

/// Bit-manipulation (Zba/Zbb/Zbc/Zbs) encoding tables.
pub mod zb;

pub use cache::DecodeCache;
pub use decode::{decode, DecodedInst, Operand};
pub use opcode::Opcode;
