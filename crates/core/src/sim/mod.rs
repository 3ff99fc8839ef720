//! Program loading and semihosting.
//!
//! This module owns everything between an ELF file on disk and a core
//! ready to run: segment loading, symbol lookup, stack-pointer
//! initialization, and the two semihosting backends (the HTIF memory
//! rendezvous and the ARM `ebreak` convention).

/// ARM semihosting over the `ebreak` handler chain.
pub mod arm;

/// HTIF semihosting over the memory watcher.
pub mod htif;

/// ELF program loader.
pub mod loader;

pub use loader::ElfLoader;

use crate::common::constants::{DEFAULT_STACK_SIZE, REG_SP};
use crate::state::ArchState;

/// Name of the stack-bottom symbol.
pub const STACK_END_SYMBOL: &str = "__stack_end";

/// Name of the stack-size symbol.
pub const STACK_SIZE_SYMBOL: &str = "__stack_size";

/// Operator overrides for stack initialization.
#[derive(Clone, Copy, Debug, Default)]
pub struct StackOptions {
    /// Stack size; overrides every other source.
    pub stack_size: Option<u64>,
    /// Lowest stack address; overrides the `__stack_end` symbol.
    pub stack_end: Option<u64>,
}

/// Initializes the stack pointer: `sp = stack_end + stack_size`.
///
/// `stack_end` comes from the flag, else the `__stack_end` symbol; with
/// neither, the stack pointer is left untouched (a crt0 must set it) and
/// `None` is returned. `stack_size` comes from the flag, else the
/// `__stack_size` symbol, else the GNU_STACK segment size, else 32 KiB.
/// The two inputs are independent.
pub fn initialize_stack(
    state: &mut ArchState,
    loader: &ElfLoader,
    opts: &StackOptions,
) -> Option<u32> {
    let mut stack_end = loader
        .get_symbol(STACK_END_SYMBOL)
        .ok()
        .map(|(addr, _)| addr as u64);
    if opts.stack_end.is_some() {
        stack_end = opts.stack_end;
    }
    let stack_end = stack_end?;

    let mut stack_size = DEFAULT_STACK_SIZE;
    if let Ok(size) = loader.get_stack_size() {
        stack_size = size;
    }
    if let Ok((size, _)) = loader.get_symbol(STACK_SIZE_SYMBOL) {
        stack_size = size as u64;
    }
    if let Some(size) = opts.stack_size {
        stack_size = size;
    }

    let sp = stack_end.wrapping_add(stack_size) as u32;
    state.set_xreg(REG_SP, sp);
    Some(sp)
}
