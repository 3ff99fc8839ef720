//! Trap and error definitions.
//!
//! This module defines the error handling vocabulary of the simulator:
//! 1. **Trap Representation:** Synchronous exception causes raised by the
//!    semantic layer and recorded in architectural state.
//! 2. **Halt Reasons:** Why the core transitioned from Running to Halted.
//! 3. **Structured Errors:** Results returned from the debug surface and the
//!    program loader; the core's state is unchanged when these are returned.

use std::fmt;

use thiserror::Error;

/// Synchronous exception causes.
///
/// Traps are recorded by semantic functions into architectural state and
/// serviced by the run loop at the next instruction boundary. The cause
/// values follow the RISC-V privileged specification `mcause` encoding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Trap {
    /// Instruction fetch from an address that is not 2-byte aligned.
    /// The associated value is the misaligned address.
    InstructionAddressMisaligned(u32),

    /// Invalid or unimplemented instruction encoding.
    /// The associated value is the raw encoding.
    IllegalInstruction(u32),

    /// `ebreak` executed with no handler claiming it.
    /// The associated value is the program counter.
    Breakpoint(u32),

    /// `ecall` executed with no handler claiming it.
    EnvironmentCall,
}

impl Trap {
    /// Returns the `mcause` exception code for this trap.
    pub fn cause(&self) -> u32 {
        match self {
            Trap::InstructionAddressMisaligned(_) => 0,
            Trap::IllegalInstruction(_) => 2,
            Trap::Breakpoint(_) => 3,
            // Machine-mode environment call.
            Trap::EnvironmentCall => 11,
        }
    }

    /// Returns the `mtval` value for this trap (zero when none applies).
    pub fn tval(&self) -> u32 {
        match self {
            Trap::InstructionAddressMisaligned(addr) => *addr,
            Trap::IllegalInstruction(raw) => *raw,
            Trap::Breakpoint(pc) => *pc,
            Trap::EnvironmentCall => 0,
        }
    }
}

impl fmt::Display for Trap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trap::InstructionAddressMisaligned(addr) => {
                write!(f, "InstructionAddressMisaligned({:#x})", addr)
            }
            Trap::IllegalInstruction(raw) => write!(f, "IllegalInstruction({:#010x})", raw),
            Trap::Breakpoint(pc) => write!(f, "Breakpoint({:#x})", pc),
            Trap::EnvironmentCall => write!(f, "EnvironmentCall"),
        }
    }
}

impl std::error::Error for Trap {}

/// Why the core stopped running.
///
/// Returned by [`wait`](crate::top::Core::wait) after the core transitions
/// to Halted, and readable afterwards until the next `run`/`step`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HaltReason {
    /// The core has not halted since the last run request.
    None,
    /// The operator (shell command or SIGINT) requested a halt.
    UserHalt,
    /// A software breakpoint was hit; the PC is left at the breakpoint.
    Breakpoint(u32),
    /// The program executed `ecall` with exit-on-ecall enabled.
    ProgramDone,
    /// A semihosting exit request was serviced.
    SemihostHalt,
    /// An unrecoverable trap; the core stays debuggable but cannot resume
    /// meaningfully.
    FatalTrap(Trap),
    /// A `step(n)` call retired its full budget.
    StepComplete,
}

impl fmt::Display for HaltReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HaltReason::None => write!(f, "none"),
            HaltReason::UserHalt => write!(f, "user halt"),
            HaltReason::Breakpoint(addr) => write!(f, "breakpoint at {:#x}", addr),
            HaltReason::ProgramDone => write!(f, "program done"),
            HaltReason::SemihostHalt => write!(f, "semihost halt"),
            HaltReason::FatalTrap(trap) => write!(f, "fatal trap: {}", trap),
            HaltReason::StepComplete => write!(f, "step complete"),
        }
    }
}

/// Errors returned from the debug surface.
///
/// These are structured results: the core's architectural state is unchanged
/// when one of these is returned.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DebugError {
    /// The named register does not exist in the register file or CSR set.
    #[error("register '{0}' not found")]
    RegisterNotFound(String),

    /// The operation requires the core to be halted.
    #[error("{0}: core must be halted")]
    NotHalted(&'static str),

    /// The core is already running.
    #[error("core is already running")]
    AlreadyRunning,

    /// A step count of zero or less was requested.
    #[error("step count must be > 0")]
    InvalidStepCount,

    /// A breakpoint already exists at the address.
    #[error("breakpoint at {0:#x} already exists")]
    BreakpointExists(u32),

    /// No breakpoint is set at the address.
    #[error("no breakpoint set at {0:#x}")]
    BreakpointNotFound(u32),

    /// The bytes at the address do not form a 16- or 32-bit instruction slot.
    #[error("no valid instruction of size 16 or 32 bits at {0:#x}")]
    InvalidInstructionSlot(u32),

    /// The requested memory range is not representable in the 32-bit space.
    #[error("memory range {addr:#x}+{len} out of range")]
    AddressOutOfRange {
        /// Start of the requested range.
        addr: u64,
        /// Length of the requested range.
        len: u64,
    },
}

/// Errors produced while loading a program image.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be read.
    #[error("could not read '{path}': {source}")]
    Io {
        /// Path of the file.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The file is not a parseable ELF object.
    #[error("malformed ELF: {0}")]
    Parse(String),

    /// The file is an ELF but not a 32-bit RISC-V executable.
    #[error("not a 32-bit RISC-V executable")]
    WrongClass,

    /// The requested symbol is not present in the symbol table.
    #[error("symbol '{0}' not found")]
    SymbolNotFound(String),

    /// The executable carries no GNU_STACK program header.
    #[error("no GNU_STACK segment")]
    NoStackSegment,
}

/// Errors from memory-watcher range registration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WatchError {
    /// The new range overlaps an already registered one.
    #[error("watch range {base:#x}+{len} overlaps an existing range")]
    Overlap {
        /// Base of the rejected range.
        base: u32,
        /// Length of the rejected range.
        len: u32,
    },

    /// Zero-length ranges cannot be watched.
    #[error("watch range must not be empty")]
    Empty,
}
