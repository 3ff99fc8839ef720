//! The instruction decoder.
//!
//! Decoding is deterministic and table-driven: fixed bit patterns select an
//! opcode, operand extractors read the specified bit slices and bind them
//! to register cells (by dense id) or sign-extended immediates, and a
//! semantic function is attached. Compressed encodings are expanded to the
//! 32-bit equivalent first, keeping the 2-byte width so PC advance stays
//! correct. Any unmatched pattern decodes to the IllegalInstruction
//! semantic rather than failing.

use crate::common::constants::{
    COMPRESSED_INSTRUCTION_MASK, INSTRUCTION_SIZE_16, INSTRUCTION_SIZE_32,
};
use crate::exec;
use crate::isa::encoding::{b_imm, i_imm, j_imm, s_imm, u_imm, InstructionBits};
use crate::isa::opcode::Opcode;
use crate::isa::rv32i::{funct3, funct7, opcodes};
use crate::isa::{rv32a, rv32fd, rv32m, rvc, rvv, zb};
use crate::state::reg::RegId;
use crate::state::ArchState;

/// Reference to a semantic function.
pub type SemanticFn = fn(&DecodedInst, &mut ArchState);

/// An operand binding established at decode time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operand {
    /// Unbound slot.
    None,
    /// A register cell (integer, floating-point, or PC).
    Reg(RegId),
    /// A sign-extended immediate.
    Imm(i32),
    /// A CSR address.
    Csr(u16),
    /// A vector register number.
    Vreg(u8),
}

/// A decoded instruction: opcode identity, operand bindings, semantic
/// function, and the original width in bytes.
#[derive(Clone, Debug)]
pub struct DecodedInst {
    /// Opcode identity (for counters and disassembly).
    pub opcode: Opcode,
    /// The (expanded) 32-bit encoding.
    pub raw: u32,
    /// Address the instruction was fetched from.
    pub address: u32,
    /// Original width in bytes: 2 for compressed, 4 otherwise.
    pub size: u32,
    /// Destination operand.
    pub dst: Operand,
    /// Source operands.
    pub src: [Operand; 3],
    /// The semantic function executed for this instruction.
    pub sem: SemanticFn,
}

struct Builder<'a> {
    state: &'a ArchState,
    raw: u32,
    address: u32,
    size: u32,
}

impl Builder<'_> {
    fn x(&self, i: usize) -> Operand {
        Operand::Reg(self.state.xreg_id(i))
    }

    fn f(&self, i: usize) -> Operand {
        Operand::Reg(self.state.freg_id(i))
    }

    fn build(&self, opcode: Opcode, dst: Operand, src: [Operand; 3], sem: SemanticFn) -> DecodedInst {
        DecodedInst {
            opcode,
            raw: self.raw,
            address: self.address,
            size: self.size,
            dst,
            src,
            sem,
        }
    }

    fn illegal(&self) -> DecodedInst {
        self.build(
            Opcode::Illegal,
            Operand::None,
            [Operand::None; 3],
            exec::system::illegal,
        )
    }
}

/// Decodes the instruction fetched at `address`.
///
/// `raw` holds the 32-bit little-endian word at the fetch address; for a
/// compressed encoding only the low halfword is meaningful.
pub fn decode(state: &ArchState, address: u32, raw: u32) -> DecodedInst {
    if raw & COMPRESSED_INSTRUCTION_MASK != COMPRESSED_INSTRUCTION_MASK {
        let expanded = rvc::expand(raw as u16);
        let b = Builder {
            state,
            raw: expanded,
            address,
            size: INSTRUCTION_SIZE_16,
        };
        if expanded == 0 {
            let b = Builder { raw, ..b };
            return b.illegal();
        }
        decode32(&b)
    } else {
        let b = Builder {
            state,
            raw,
            address,
            size: INSTRUCTION_SIZE_32,
        };
        decode32(&b)
    }
}

fn decode32(b: &Builder) -> DecodedInst {
    let inst = b.raw;
    match inst.opcode() {
        opcodes::OP_LUI => b.build(
            Opcode::Lui,
            b.x(inst.rd()),
            [Operand::Imm(u_imm(inst)), Operand::None, Operand::None],
            exec::alu::lui,
        ),
        opcodes::OP_AUIPC => b.build(
            Opcode::Auipc,
            b.x(inst.rd()),
            [Operand::Imm(u_imm(inst)), Operand::None, Operand::None],
            exec::alu::auipc,
        ),
        opcodes::OP_JAL => b.build(
            Opcode::Jal,
            b.x(inst.rd()),
            [Operand::Imm(j_imm(inst)), Operand::None, Operand::None],
            exec::branch::jal,
        ),
        opcodes::OP_JALR if inst.funct3() == 0 => b.build(
            Opcode::Jalr,
            b.x(inst.rd()),
            [b.x(inst.rs1()), Operand::Imm(i_imm(inst)), Operand::None],
            exec::branch::jalr,
        ),
        opcodes::OP_BRANCH => decode_branch(b),
        opcodes::OP_LOAD => decode_load(b),
        opcodes::OP_STORE => decode_store(b),
        opcodes::OP_IMM => decode_op_imm(b),
        opcodes::OP_REG => decode_op_reg(b),
        opcodes::OP_MISC_MEM => match inst.funct3() {
            funct3::FENCE => b.build(
                Opcode::Fence,
                Operand::None,
                [Operand::None; 3],
                exec::system::fence,
            ),
            funct3::FENCE_I => b.build(
                Opcode::FenceI,
                Operand::None,
                [Operand::None; 3],
                exec::system::fence_i,
            ),
            _ => b.illegal(),
        },
        opcodes::OP_SYSTEM => decode_system(b),
        opcodes::OP_AMO => decode_amo(b),
        rv32fd::OP_LOAD_FP => match inst.funct3() {
            rv32fd::WIDTH_W => b.build(
                Opcode::Flw,
                b.f(inst.rd()),
                [b.x(inst.rs1()), Operand::Imm(i_imm(inst)), Operand::None],
                exec::fp::flw,
            ),
            rv32fd::WIDTH_D => b.build(
                Opcode::Fld,
                b.f(inst.rd()),
                [b.x(inst.rs1()), Operand::Imm(i_imm(inst)), Operand::None],
                exec::fp::fld,
            ),
            _ => b.illegal(),
        },
        rv32fd::OP_STORE_FP => match inst.funct3() {
            rv32fd::WIDTH_W => b.build(
                Opcode::Fsw,
                Operand::None,
                [b.x(inst.rs1()), Operand::Imm(s_imm(inst)), b.f(inst.rs2())],
                exec::fp::fsw,
            ),
            rv32fd::WIDTH_D => b.build(
                Opcode::Fsd,
                Operand::None,
                [b.x(inst.rs1()), Operand::Imm(s_imm(inst)), b.f(inst.rs2())],
                exec::fp::fsd,
            ),
            _ => b.illegal(),
        },
        rv32fd::OP_FP => decode_op_fp(b),
        rv32fd::OP_FMADD | rv32fd::OP_FMSUB | rv32fd::OP_FNMSUB | rv32fd::OP_FNMADD => {
            decode_fma(b)
        }
        rvv::OP_V => decode_vector(b),
        _ => b.illegal(),
    }
}

fn decode_branch(b: &Builder) -> DecodedInst {
    let inst = b.raw;
    let src = [
        b.x(inst.rs1()),
        b.x(inst.rs2()),
        Operand::Imm(b_imm(inst)),
    ];
    let (opcode, sem): (Opcode, SemanticFn) = match inst.funct3() {
        funct3::BEQ => (Opcode::Beq, exec::branch::beq),
        funct3::BNE => (Opcode::Bne, exec::branch::bne),
        funct3::BLT => (Opcode::Blt, exec::branch::blt),
        funct3::BGE => (Opcode::Bge, exec::branch::bge),
        funct3::BLTU => (Opcode::Bltu, exec::branch::bltu),
        funct3::BGEU => (Opcode::Bgeu, exec::branch::bgeu),
        _ => return b.illegal(),
    };
    b.build(opcode, Operand::None, src, sem)
}

fn decode_load(b: &Builder) -> DecodedInst {
    let inst = b.raw;
    let dst = b.x(inst.rd());
    let src = [b.x(inst.rs1()), Operand::Imm(i_imm(inst)), Operand::None];
    let (opcode, sem): (Opcode, SemanticFn) = match inst.funct3() {
        funct3::LB => (Opcode::Lb, exec::mem::lb),
        funct3::LH => (Opcode::Lh, exec::mem::lh),
        funct3::LW => (Opcode::Lw, exec::mem::lw),
        funct3::LBU => (Opcode::Lbu, exec::mem::lbu),
        funct3::LHU => (Opcode::Lhu, exec::mem::lhu),
        _ => return b.illegal(),
    };
    b.build(opcode, dst, src, sem)
}

fn decode_store(b: &Builder) -> DecodedInst {
    let inst = b.raw;
    let src = [b.x(inst.rs1()), Operand::Imm(s_imm(inst)), b.x(inst.rs2())];
    let (opcode, sem): (Opcode, SemanticFn) = match inst.funct3() {
        funct3::SB => (Opcode::Sb, exec::mem::sb),
        funct3::SH => (Opcode::Sh, exec::mem::sh),
        funct3::SW => (Opcode::Sw, exec::mem::sw),
        _ => return b.illegal(),
    };
    b.build(opcode, Operand::None, src, sem)
}

fn decode_op_imm(b: &Builder) -> DecodedInst {
    let inst = b.raw;
    let dst = b.x(inst.rd());
    let rs1 = b.x(inst.rs1());
    let imm = Operand::Imm(i_imm(inst));
    let shamt = Operand::Imm(inst.rs2() as i32);

    match inst.funct3() {
        funct3::ADD_SUB => b.build(Opcode::Addi, dst, [rs1, imm, Operand::None], exec::alu::add),
        funct3::SLT => b.build(Opcode::Slti, dst, [rs1, imm, Operand::None], exec::alu::slt),
        funct3::SLTU => b.build(
            Opcode::Sltiu,
            dst,
            [rs1, imm, Operand::None],
            exec::alu::sltu,
        ),
        funct3::XOR => b.build(Opcode::Xori, dst, [rs1, imm, Operand::None], exec::alu::xor),
        funct3::OR => b.build(Opcode::Ori, dst, [rs1, imm, Operand::None], exec::alu::or),
        funct3::AND => b.build(Opcode::Andi, dst, [rs1, imm, Operand::None], exec::alu::and),
        funct3::SLL => match inst.funct7() {
            funct7::BASE => b.build(
                Opcode::Slli,
                dst,
                [rs1, shamt, Operand::None],
                exec::alu::sll,
            ),
            zb::FUNCT7_ROT => {
                // Unary Zbb group: the operation lives in the rs2 slot.
                let (opcode, sem): (Opcode, SemanticFn) = match inst.rs2() as u32 {
                    zb::UNARY_CLZ => (Opcode::Clz, exec::bitmanip::clz),
                    zb::UNARY_CTZ => (Opcode::Ctz, exec::bitmanip::ctz),
                    zb::UNARY_CPOP => (Opcode::Cpop, exec::bitmanip::cpop),
                    zb::UNARY_SEXT_B => (Opcode::SextB, exec::bitmanip::sext_b),
                    zb::UNARY_SEXT_H => (Opcode::SextH, exec::bitmanip::sext_h),
                    _ => return b.illegal(),
                };
                b.build(opcode, dst, [rs1, Operand::None, Operand::None], sem)
            }
            zb::FUNCT7_BCLR_BEXT => b.build(
                Opcode::Bclri,
                dst,
                [rs1, shamt, Operand::None],
                exec::bitmanip::bclr,
            ),
            zb::FUNCT7_BSET => b.build(
                Opcode::Bseti,
                dst,
                [rs1, shamt, Operand::None],
                exec::bitmanip::bset,
            ),
            zb::FUNCT7_BINV => b.build(
                Opcode::Binvi,
                dst,
                [rs1, shamt, Operand::None],
                exec::bitmanip::binv,
            ),
            _ => b.illegal(),
        },
        funct3::SRL_SRA => {
            // Full-imm12 rows first: orc.b and rev8 occupy single points.
            let imm12 = inst.csr();
            if imm12 == zb::ORC_B_IMM {
                return b.build(
                    Opcode::OrcB,
                    dst,
                    [rs1, Operand::None, Operand::None],
                    exec::bitmanip::orc_b,
                );
            }
            if imm12 == zb::REV8_IMM {
                return b.build(
                    Opcode::Rev8,
                    dst,
                    [rs1, Operand::None, Operand::None],
                    exec::bitmanip::rev8,
                );
            }
            match inst.funct7() {
                funct7::BASE => b.build(
                    Opcode::Srli,
                    dst,
                    [rs1, shamt, Operand::None],
                    exec::alu::srl,
                ),
                funct7::ALT => b.build(
                    Opcode::Srai,
                    dst,
                    [rs1, shamt, Operand::None],
                    exec::alu::sra,
                ),
                zb::FUNCT7_ROT => b.build(
                    Opcode::Rori,
                    dst,
                    [rs1, shamt, Operand::None],
                    exec::bitmanip::ror,
                ),
                zb::FUNCT7_BCLR_BEXT => b.build(
                    Opcode::Bexti,
                    dst,
                    [rs1, shamt, Operand::None],
                    exec::bitmanip::bext,
                ),
                _ => b.illegal(),
            }
        }
        _ => b.illegal(),
    }
}

fn decode_op_reg(b: &Builder) -> DecodedInst {
    let inst = b.raw;
    let dst = b.x(inst.rd());
    let src = [b.x(inst.rs1()), b.x(inst.rs2()), Operand::None];
    let f3 = inst.funct3();

    let (opcode, src, sem): (Opcode, [Operand; 3], SemanticFn) = match inst.funct7() {
        funct7::BASE => match f3 {
            funct3::ADD_SUB => (Opcode::Add, src, exec::alu::add),
            funct3::SLL => (Opcode::Sll, src, exec::alu::sll),
            funct3::SLT => (Opcode::Slt, src, exec::alu::slt),
            funct3::SLTU => (Opcode::Sltu, src, exec::alu::sltu),
            funct3::XOR => (Opcode::Xor, src, exec::alu::xor),
            funct3::SRL_SRA => (Opcode::Srl, src, exec::alu::srl),
            funct3::OR => (Opcode::Or, src, exec::alu::or),
            funct3::AND => (Opcode::And, src, exec::alu::and),
            _ => return b.illegal(),
        },
        funct7::ALT => match f3 {
            funct3::ADD_SUB => (Opcode::Sub, src, exec::alu::sub),
            funct3::SRL_SRA => (Opcode::Sra, src, exec::alu::sra),
            zb::ANDN => (Opcode::Andn, src, exec::bitmanip::andn),
            zb::ORN => (Opcode::Orn, src, exec::bitmanip::orn),
            zb::XNOR => (Opcode::Xnor, src, exec::bitmanip::xnor),
            _ => return b.illegal(),
        },
        rv32m::FUNCT7_MULDIV => match f3 {
            rv32m::MUL => (Opcode::Mul, src, exec::muldiv::mul),
            rv32m::MULH => (Opcode::Mulh, src, exec::muldiv::mulh),
            rv32m::MULHSU => (Opcode::Mulhsu, src, exec::muldiv::mulhsu),
            rv32m::MULHU => (Opcode::Mulhu, src, exec::muldiv::mulhu),
            rv32m::DIV => (Opcode::Div, src, exec::muldiv::div),
            rv32m::DIVU => (Opcode::Divu, src, exec::muldiv::divu),
            rv32m::REM => (Opcode::Rem, src, exec::muldiv::rem),
            rv32m::REMU => (Opcode::Remu, src, exec::muldiv::remu),
            _ => return b.illegal(),
        },
        zb::FUNCT7_SHADD => {
            let shift = match f3 {
                zb::SH1ADD => 1,
                zb::SH2ADD => 2,
                zb::SH3ADD => 3,
                _ => return b.illegal(),
            };
            let opcode = match shift {
                1 => Opcode::Sh1add,
                2 => Opcode::Sh2add,
                _ => Opcode::Sh3add,
            };
            (
                opcode,
                [src[0], src[1], Operand::Imm(shift)],
                exec::bitmanip::sh_add,
            )
        }
        zb::FUNCT7_MINMAX_CLMUL => match f3 {
            zb::CLMUL => (Opcode::Clmul, src, exec::bitmanip::clmul),
            zb::CLMULR => (Opcode::Clmulr, src, exec::bitmanip::clmulr),
            zb::CLMULH => (Opcode::Clmulh, src, exec::bitmanip::clmulh),
            zb::MIN => (Opcode::Min, src, exec::bitmanip::min),
            zb::MINU => (Opcode::Minu, src, exec::bitmanip::minu),
            zb::MAX => (Opcode::Max, src, exec::bitmanip::max),
            zb::MAXU => (Opcode::Maxu, src, exec::bitmanip::maxu),
            _ => return b.illegal(),
        },
        zb::FUNCT7_ROT => match f3 {
            zb::ROL => (Opcode::Rol, src, exec::bitmanip::rol),
            zb::ROR => (Opcode::Ror, src, exec::bitmanip::ror),
            _ => return b.illegal(),
        },
        zb::FUNCT7_BCLR_BEXT => match f3 {
            zb::BSET_CLR_INV => (Opcode::Bclr, src, exec::bitmanip::bclr),
            zb::BEXT => (Opcode::Bext, src, exec::bitmanip::bext),
            _ => return b.illegal(),
        },
        zb::FUNCT7_BSET if f3 == zb::BSET_CLR_INV => (Opcode::Bset, src, exec::bitmanip::bset),
        zb::FUNCT7_BINV if f3 == zb::BSET_CLR_INV => (Opcode::Binv, src, exec::bitmanip::binv),
        zb::FUNCT7_ZEXT_H if f3 == 0b100 && inst.rs2() == 0 => (
            Opcode::ZextH,
            [src[0], Operand::None, Operand::None],
            exec::bitmanip::zext_h,
        ),
        _ => return b.illegal(),
    };
    b.build(opcode, dst, src, sem)
}

fn decode_system(b: &Builder) -> DecodedInst {
    let inst = b.raw;
    let f3 = inst.funct3();
    if f3 == funct3::PRIV {
        if inst.rd() != 0 || inst.rs1() != 0 {
            return b.illegal();
        }
        return match inst.csr() {
            funct7::ECALL_IMM => b.build(
                Opcode::Ecall,
                Operand::None,
                [Operand::None; 3],
                exec::system::ecall,
            ),
            funct7::EBREAK_IMM => b.build(
                Opcode::Ebreak,
                Operand::None,
                [Operand::None; 3],
                exec::system::ebreak,
            ),
            funct7::MRET_IMM => b.build(
                Opcode::Mret,
                Operand::None,
                [Operand::None; 3],
                exec::system::mret,
            ),
            funct7::WFI_IMM => b.build(
                Opcode::Wfi,
                Operand::None,
                [Operand::None; 3],
                exec::system::wfi,
            ),
            _ => b.illegal(),
        };
    }

    let dst = b.x(inst.rd());
    let csr = Operand::Csr(inst.csr() as u16);
    let reg_src = [b.x(inst.rs1()), csr, Operand::None];
    let imm_src = [Operand::Imm(inst.rs1() as i32), csr, Operand::None];
    match f3 {
        funct3::CSRRW => b.build(Opcode::Csrrw, dst, reg_src, exec::system::csrrw),
        funct3::CSRRS => b.build(Opcode::Csrrs, dst, reg_src, exec::system::csrrs),
        funct3::CSRRC => b.build(Opcode::Csrrc, dst, reg_src, exec::system::csrrc),
        funct3::CSRRWI => b.build(Opcode::Csrrwi, dst, imm_src, exec::system::csrrw),
        funct3::CSRRSI => b.build(Opcode::Csrrsi, dst, imm_src, exec::system::csrrs),
        funct3::CSRRCI => b.build(Opcode::Csrrci, dst, imm_src, exec::system::csrrc),
        _ => b.illegal(),
    }
}

fn decode_amo(b: &Builder) -> DecodedInst {
    let inst = b.raw;
    if inst.funct3() != rv32a::WIDTH_W {
        return b.illegal();
    }
    let dst = b.x(inst.rd());
    let src = [b.x(inst.rs1()), b.x(inst.rs2()), Operand::None];
    let (opcode, sem): (Opcode, SemanticFn) = match inst.funct5() {
        rv32a::LR if inst.rs2() == 0 => (Opcode::LrW, exec::amo::lr_w),
        rv32a::SC => (Opcode::ScW, exec::amo::sc_w),
        rv32a::AMOSWAP => (Opcode::AmoswapW, exec::amo::amoswap_w),
        rv32a::AMOADD => (Opcode::AmoaddW, exec::amo::amoadd_w),
        rv32a::AMOXOR => (Opcode::AmoxorW, exec::amo::amoxor_w),
        rv32a::AMOAND => (Opcode::AmoandW, exec::amo::amoand_w),
        rv32a::AMOOR => (Opcode::AmoorW, exec::amo::amoor_w),
        rv32a::AMOMIN => (Opcode::AmominW, exec::amo::amomin_w),
        rv32a::AMOMAX => (Opcode::AmomaxW, exec::amo::amomax_w),
        rv32a::AMOMINU => (Opcode::AmominuW, exec::amo::amominu_w),
        rv32a::AMOMAXU => (Opcode::AmomaxuW, exec::amo::amomaxu_w),
        _ => return b.illegal(),
    };
    b.build(opcode, dst, src, sem)
}

fn decode_op_fp(b: &Builder) -> DecodedInst {
    let inst = b.raw;
    let f7 = inst.funct7();
    let is_d = f7 & 0b11 == rv32fd::FMT_D;
    let group = f7 & !0b11;
    let f3 = inst.funct3();
    let xd = b.x(inst.rd());
    let fd = b.f(inst.rd());
    let fsrc = [b.f(inst.rs1()), b.f(inst.rs2()), Operand::None];
    let f1 = [b.f(inst.rs1()), Operand::None, Operand::None];
    let x1 = [b.x(inst.rs1()), Operand::None, Operand::None];

    macro_rules! pick {
        ($s:ident, $d:ident, $sem_s:path, $sem_d:path, $dst:expr, $src:expr) => {
            if is_d {
                b.build(Opcode::$d, $dst, $src, $sem_d)
            } else {
                b.build(Opcode::$s, $dst, $src, $sem_s)
            }
        };
    }

    match group {
        rv32fd::FADD => pick!(FaddS, FaddD, exec::fp::fadd_s, exec::fp::fadd_d, fd, fsrc),
        rv32fd::FSUB => pick!(FsubS, FsubD, exec::fp::fsub_s, exec::fp::fsub_d, fd, fsrc),
        rv32fd::FMUL => pick!(FmulS, FmulD, exec::fp::fmul_s, exec::fp::fmul_d, fd, fsrc),
        rv32fd::FDIV => pick!(FdivS, FdivD, exec::fp::fdiv_s, exec::fp::fdiv_d, fd, fsrc),
        rv32fd::FSQRT if inst.rs2() == 0 => {
            pick!(FsqrtS, FsqrtD, exec::fp::fsqrt_s, exec::fp::fsqrt_d, fd, f1)
        }
        rv32fd::FSGNJ => match f3 {
            rv32fd::SGNJ => pick!(FsgnjS, FsgnjD, exec::fp::fsgnj_s, exec::fp::fsgnj_d, fd, fsrc),
            rv32fd::SGNJN => {
                pick!(FsgnjnS, FsgnjnD, exec::fp::fsgnjn_s, exec::fp::fsgnjn_d, fd, fsrc)
            }
            rv32fd::SGNJX => {
                pick!(FsgnjxS, FsgnjxD, exec::fp::fsgnjx_s, exec::fp::fsgnjx_d, fd, fsrc)
            }
            _ => b.illegal(),
        },
        rv32fd::FMINMAX => match f3 {
            rv32fd::MIN => pick!(FminS, FminD, exec::fp::fmin_s, exec::fp::fmin_d, fd, fsrc),
            rv32fd::MAX => pick!(FmaxS, FmaxD, exec::fp::fmax_s, exec::fp::fmax_d, fd, fsrc),
            _ => b.illegal(),
        },
        rv32fd::FCVT_INT_FROM_FP => match inst.rs2() {
            0 => pick!(FcvtWS, FcvtWD, exec::fp::fcvt_w_s, exec::fp::fcvt_w_d, xd, f1),
            1 => pick!(FcvtWuS, FcvtWuD, exec::fp::fcvt_wu_s, exec::fp::fcvt_wu_d, xd, f1),
            _ => b.illegal(),
        },
        rv32fd::FCVT_FP_FROM_INT => match inst.rs2() {
            0 => pick!(FcvtSW, FcvtDW, exec::fp::fcvt_s_w, exec::fp::fcvt_d_w, fd, x1),
            1 => pick!(FcvtSWu, FcvtDWu, exec::fp::fcvt_s_wu, exec::fp::fcvt_d_wu, fd, x1),
            _ => b.illegal(),
        },
        rv32fd::FCVT_FP_FP => match (is_d, inst.rs2()) {
            // fcvt.s.d: destination single, source double.
            (false, 1) => b.build(Opcode::FcvtSD, fd, f1, exec::fp::fcvt_s_d),
            // fcvt.d.s: destination double, source single.
            (true, 0) => b.build(Opcode::FcvtDS, fd, f1, exec::fp::fcvt_d_s),
            _ => b.illegal(),
        },
        rv32fd::FCMP => match f3 {
            rv32fd::FEQ => pick!(FeqS, FeqD, exec::fp::feq_s, exec::fp::feq_d, xd, fsrc),
            rv32fd::FLT => pick!(FltS, FltD, exec::fp::flt_s, exec::fp::flt_d, xd, fsrc),
            rv32fd::FLE => pick!(FleS, FleD, exec::fp::fle_s, exec::fp::fle_d, xd, fsrc),
            _ => b.illegal(),
        },
        rv32fd::FMV_X_CLASS if inst.rs2() == 0 => match f3 {
            // fmv.x.w exists only for single precision in RV32.
            rv32fd::FMV if !is_d => b.build(Opcode::FmvXW, xd, f1, exec::fp::fmv_x_w),
            rv32fd::FCLASS => pick!(FclassS, FclassD, exec::fp::fclass_s, exec::fp::fclass_d, xd, f1),
            _ => b.illegal(),
        },
        rv32fd::FMV_W_X if !is_d && inst.rs2() == 0 && f3 == 0 => {
            b.build(Opcode::FmvWX, fd, x1, exec::fp::fmv_w_x)
        }
        _ => b.illegal(),
    }
}

fn decode_fma(b: &Builder) -> DecodedInst {
    let inst = b.raw;
    // The fmt field sits in bits 26-25 for the FMA opcodes.
    let fmt = (inst >> 25) & 0b11;
    if fmt > rv32fd::FMT_D {
        return b.illegal();
    }
    let is_d = fmt == rv32fd::FMT_D;
    let dst = b.f(inst.rd());
    let src = [b.f(inst.rs1()), b.f(inst.rs2()), b.f(inst.rs3())];
    let (opcode, sem): (Opcode, SemanticFn) = match (inst.opcode(), is_d) {
        (rv32fd::OP_FMADD, false) => (Opcode::FmaddS, exec::fp::fmadd_s),
        (rv32fd::OP_FMSUB, false) => (Opcode::FmsubS, exec::fp::fmsub_s),
        (rv32fd::OP_FNMSUB, false) => (Opcode::FnmsubS, exec::fp::fnmsub_s),
        (rv32fd::OP_FNMADD, false) => (Opcode::FnmaddS, exec::fp::fnmadd_s),
        (rv32fd::OP_FMADD, true) => (Opcode::FmaddD, exec::fp::fmadd_d),
        (rv32fd::OP_FMSUB, true) => (Opcode::FmsubD, exec::fp::fmsub_d),
        (rv32fd::OP_FNMSUB, true) => (Opcode::FnmsubD, exec::fp::fnmsub_d),
        (rv32fd::OP_FNMADD, true) => (Opcode::FnmaddD, exec::fp::fnmadd_d),
        _ => return b.illegal(),
    };
    b.build(opcode, dst, src, sem)
}

fn decode_vector(b: &Builder) -> DecodedInst {
    let inst = b.raw;
    let f3 = inst.funct3();
    if f3 == rvv::OPCFG {
        let dst = b.x(inst.rd());
        // vsetvli: bit 31 = 0; vsetivli: bits 31-30 = 11; vsetvl: bit 31 = 1
        // with bits 30-25 zero.
        if inst >> 31 == 0 {
            return b.build(
                Opcode::Vsetvli,
                dst,
                [b.x(inst.rs1()), Operand::None, Operand::None],
                exec::vector::vsetvli,
            );
        }
        if inst >> 30 == 0b11 {
            return b.build(
                Opcode::Vsetivli,
                dst,
                [Operand::Imm(inst.rs1() as i32), Operand::None, Operand::None],
                exec::vector::vsetivli,
            );
        }
        if (inst >> 25) & 0x3f == 0 {
            return b.build(
                Opcode::Vsetvl,
                dst,
                [b.x(inst.rs1()), b.x(inst.rs2()), Operand::None],
                exec::vector::vsetvl,
            );
        }
        return b.illegal();
    }

    let vd = Operand::Vreg(inst.rd() as u8);
    let vs2 = Operand::Vreg(inst.rs2() as u8);
    // The "other" operand: vs1, the scalar rs1, or the 5-bit immediate.
    let other = match f3 {
        rvv::OPIVV => Operand::Vreg(inst.rs1() as u8),
        rvv::OPIVX => b.x(inst.rs1()),
        rvv::OPIVI => Operand::Imm(crate::isa::encoding::sign_extend(inst.rs1() as u32, 5)),
        _ => return b.illegal(),
    };
    let src = [other, vs2, Operand::None];
    let (opcode, sem): (Opcode, SemanticFn) = match (rvv::funct6(inst), f3) {
        (rvv::VADD, rvv::OPIVV) => (Opcode::VaddVV, exec::vector::vadd),
        (rvv::VADD, rvv::OPIVX) => (Opcode::VaddVX, exec::vector::vadd),
        (rvv::VADD, rvv::OPIVI) => (Opcode::VaddVI, exec::vector::vadd),
        (rvv::VSUB, rvv::OPIVV) => (Opcode::VsubVV, exec::vector::vsub),
        (rvv::VSUB, rvv::OPIVX) => (Opcode::VsubVX, exec::vector::vsub),
        (rvv::VAND, rvv::OPIVV) => (Opcode::VandVV, exec::vector::vand),
        (rvv::VAND, rvv::OPIVX) => (Opcode::VandVX, exec::vector::vand),
        (rvv::VOR, rvv::OPIVV) => (Opcode::VorVV, exec::vector::vor),
        (rvv::VOR, rvv::OPIVX) => (Opcode::VorVX, exec::vector::vor),
        (rvv::VXOR, rvv::OPIVV) => (Opcode::VxorVV, exec::vector::vxor),
        (rvv::VXOR, rvv::OPIVX) => (Opcode::VxorVX, exec::vector::vxor),
        _ => return b.illegal(),
    };
    b.build(opcode, vd, src, sem)
}
