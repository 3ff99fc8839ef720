//! Vector (V) extension encoding tables.
//!
//! Vector arithmetic lives under the `OP_V` major opcode; funct3 selects
//! the operand category (vector-vector, vector-scalar, vector-immediate,
//! or configuration), and funct6 (bits 31-26) the operation. Bit 25 is the
//! mask-enable bit `vm` (1 = unmasked).

/// Vector major opcode.
pub const OP_V: u32 = 0b1010111;

/// funct3: integer vector-vector operands.
pub const OPIVV: u32 = 0b000;
/// funct3: integer vector-immediate operands.
pub const OPIVI: u32 = 0b011;
/// funct3: integer vector-scalar operands.
pub const OPIVX: u32 = 0b100;
/// funct3: configuration (vsetvli/vsetivli/vsetvl).
pub const OPCFG: u32 = 0b111;

/// funct6 for vadd.
pub const VADD: u32 = 0b000000;
/// funct6 for vsub.
pub const VSUB: u32 = 0b000010;
/// funct6 for vand.
pub const VAND: u32 = 0b001001;
/// funct6 for vor.
pub const VOR: u32 = 0b001010;
/// funct6 for vxor.
pub const VXOR: u32 = 0b001011;

/// Extracts the funct6 field (bits 31-26).
#[inline]
pub fn funct6(inst: u32) -> u32 {
    inst >> 26
}

/// Extracts the mask-enable bit `vm` (bit 25); set means unmasked.
#[inline]
pub fn vm(inst: u32) -> bool {
    (inst >> 25) & 1 != 0
}
