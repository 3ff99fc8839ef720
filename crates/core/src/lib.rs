//! Functional RV32 simulator library.
//!
//! This crate implements a functional (instruction-at-a-time) simulator
//! for a 32-bit RISC-V hart with the G (IMAFD), V, and Zb* extensions:
//! 1. **Memory:** Flat demand-paged store, watch interposer, atomic wrapper.
//! 2. **State:** Name-keyed register file, CSRs, FP and vector unit state.
//! 3. **ISA:** Table-driven decoder with RVC expansion and a PC-keyed cache.
//! 4. **Execution:** Semantic functions per family, one run loop.
//! 5. **Debug:** Start/step/halt/breakpoint surface for the shell.
//! 6. **Simulation:** ELF loading, stack setup, HTIF/ARM semihosting,
//!    counter export.

/// Common types and constants (errors, traps, halt reasons).
pub mod common;

/// Simulator configuration.
pub mod config;

/// Instruction semantics.
pub mod exec;

/// Instruction set: encodings, decoder, decode cache.
pub mod isa;

/// Memory subsystem.
pub mod mem;

/// Program loading and semihosting.
pub mod sim;

/// Architectural state.
pub mod state;

/// Execution counters and export.
pub mod stats;

/// Core top: run loop, breakpoints, debug surface.
pub mod top;

pub use crate::common::error::{DebugError, HaltReason, LoadError, Trap};
pub use crate::config::Config;
pub use crate::mem::flat::FlatDemandMemory;
pub use crate::sim::loader::ElfLoader;
pub use crate::state::ArchState;
pub use crate::top::{Core, RunStatus};
