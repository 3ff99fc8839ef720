//! Core construction and program-driving helpers.

use gvsim_core::isa::decode::decode;
use gvsim_core::{ArchState, Core, FlatDemandMemory};

/// Default load address for test programs.
pub const ENTRY: u32 = 0x8000_0000;

/// Fresh architectural state over empty memory (VLEN = 128).
pub fn fresh_state() -> ArchState {
    let _ = env_logger::builder().is_test(true).try_init();
    ArchState::new(FlatDemandMemory::new(), 128)
}

/// Decodes and executes one instruction at the current PC, with the PC
/// pre-set to the next sequential address the way the run loop does it.
pub fn exec_inst(state: &mut ArchState, raw: u32) {
    let pc = state.pc();
    let inst = decode(state, pc, raw);
    state.set_pc(pc.wrapping_add(inst.size));
    (inst.sem)(&inst, state);
}

/// Executes `raw` with `rs1 = x1 = a` and `rs2 = x2 = b`, returning `x3`.
/// The encoding is expected to name those registers.
pub fn exec_rrr(raw: u32, a: u32, b: u32) -> u32 {
    let mut state = fresh_state();
    state.set_xreg(1, a);
    state.set_xreg(2, b);
    exec_inst(&mut state, raw);
    state.xreg(3)
}

/// A core with a program loaded at [`ENTRY`] and the PC pointing at it.
pub struct TestContext {
    pub core: Core,
}

impl TestContext {
    /// Builds a halted core over the given instruction words.
    pub fn with_program(instructions: &[u32]) -> Self {
        Self::with_program_and_state(instructions, |_| {})
    }

    /// Builds a core, letting the caller adjust state (handlers, registers)
    /// before the core takes ownership.
    pub fn with_program_and_state(
        instructions: &[u32],
        prepare: impl FnOnce(&mut ArchState),
    ) -> Self {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut memory = FlatDemandMemory::new();
        for (i, inst) in instructions.iter().enumerate() {
            memory.store(ENTRY + 4 * i as u32, &inst.to_le_bytes());
        }
        let mut state = ArchState::new(memory, 128);
        state.set_pc(ENTRY);
        prepare(&mut state);
        Self {
            core: Core::new("test", state),
        }
    }

    /// Reads an integer register through the debug surface.
    pub fn xreg(&self, i: usize) -> u32 {
        self.core
            .read_register(&format!("x{}", i))
            .expect("register read") as u32
    }

    /// Writes an integer register through the debug surface.
    pub fn set_xreg(&self, i: usize, val: u32) {
        self.core
            .write_register(&format!("x{}", i), val as u64)
            .expect("register write");
    }

    /// Current PC.
    pub fn pc(&self) -> u32 {
        self.core.read_register("pc").expect("pc read") as u32
    }
}
