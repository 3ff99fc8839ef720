//! Simulator configuration.
//!
//! A small flat structure: the CLI fills it from flags, and it can also be
//! deserialized from a JSON/TOML fragment by embedding tools. Defaults
//! match the bare `gvsim <elf>` invocation.

use serde::Deserialize;

use crate::common::constants::DEFAULT_VLEN_BITS;

/// Which semihosting backend to install, if any.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SemihostMode {
    /// No semihosting.
    #[default]
    None,
    /// HTIF memory rendezvous.
    Htif,
    /// ARM `ebreak` convention.
    Arm,
}

/// Top-level simulator configuration.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Component name used for counters and the export record.
    pub core_name: String,
    /// Vector register width in bits.
    pub vlen_bits: u32,
    /// Halt with `ProgramDone` on the first `ecall`.
    pub exit_on_ecall: bool,
    /// Semihosting backend.
    pub semihost: SemihostMode,
    /// Stack-size override (bytes).
    pub stack_size: Option<u64>,
    /// Stack-end override (lowest stack address).
    pub stack_end: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            core_name: "RiscV32GV".to_string(),
            vlen_bits: DEFAULT_VLEN_BITS,
            exit_on_ecall: false,
            semihost: SemihostMode::None,
            stack_size: None,
            stack_end: None,
        }
    }
}
