//! The core top: run/step/halt state machine and the execution loop.
//!
//! [`Core`] owns the machine (architectural state, decode cache,
//! breakpoints, counters) behind a mutex, and drives the single
//! fetch → decode → execute → retire loop. `run` executes on a spawned
//! simulation thread so a shell can keep operating; `step` executes
//! synchronously on the caller. The only control-thread operation legal
//! while Running is `halt`, which posts to the lock-free
//! [`HaltControl`](control::HaltControl) cell consumed at instruction
//! boundaries. `wait` blocks on a condition variable signaled at the
//! Running → Halted transition.

/// Software breakpoint management.
pub mod breakpoint;

/// Lock-free halt-request cell.
pub mod control;

/// Debug surface: register/memory access, breakpoints, disassembly.
pub mod debug;

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::thread;

use log::debug;

use crate::common::error::{DebugError, HaltReason, Trap};
use crate::isa::cache::DecodeCache;
use crate::isa::decode::{decode, DecodedInst};
use crate::state::ArchState;
use crate::stats::CounterSet;
use crate::top::breakpoint::BreakpointManager;
use crate::top::control::HaltControl;

/// The run-state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum RunStatus {
    /// Constructed, never run.
    Idle = 0,
    /// The simulation loop is executing.
    Running = 1,
    /// Stopped at an instruction boundary.
    Halted = 2,
}

impl RunStatus {
    fn from_u8(v: u8) -> Self {
        match v {
            1 => RunStatus::Running,
            2 => RunStatus::Halted,
            _ => RunStatus::Idle,
        }
    }
}

/// Everything the simulation loop mutates, guarded by one mutex.
pub(crate) struct Machine {
    pub(crate) state: ArchState,
    pub(crate) cache: DecodeCache,
    pub(crate) breakpoints: BreakpointManager,
    pub(crate) counters: CounterSet,
    pub(crate) need_step_over: bool,
}

impl Machine {
    fn fetch_decode(&mut self, pc: u32) -> Arc<DecodedInst> {
        if let Some(inst) = self.cache.get(pc) {
            return inst;
        }
        let mut buf = [0u8; 4];
        self.state.fetch(pc, &mut buf);
        let inst = Arc::new(decode(&self.state, pc, u32::from_le_bytes(buf)));
        self.cache.insert(pc, Arc::clone(&inst));
        inst
    }

    /// Retire bookkeeping shared by the loop and the step-over path.
    fn retire(&mut self, inst: &DecodedInst) {
        self.counters.retire(inst.opcode);
        self.state.retired += 1;
        self.state.cycles += 1;
        for (addr, len) in self.state.take_store_log() {
            self.cache.invalidate_range(addr, len);
        }
        if self.state.take_fence_i() {
            self.cache.clear();
        }
    }

    /// Services a pending trap. Returns the halt reason when the trap ends
    /// the run, `None` when execution continues (machine trap redirect).
    ///
    /// `pc` is the address of the instruction that trapped.
    fn service_trap(&mut self, trap: Trap, pc: u32) -> Option<HaltReason> {
        if let Trap::Breakpoint(addr) = trap {
            if self.breakpoints.is_active(addr) {
                // Report with the PC left at the breakpoint; resuming steps
                // past it.
                self.state.set_pc(addr);
                self.need_step_over = true;
                return Some(HaltReason::Breakpoint(addr));
            }
        }
        if self.state.mtvec() & !0b11 != 0 {
            debug!("trap {} at {:#x}, entering machine handler", trap, pc);
            self.state.enter_trap(&trap, pc);
            return None;
        }
        self.state.set_pc(pc);
        Some(HaltReason::FatalTrap(trap))
    }

    /// Executes one instruction with any breakpoint at the current PC
    /// disarmed, then re-arms it.
    fn step_past_breakpoint(&mut self) -> Option<HaltReason> {
        let pc = self.state.pc();
        self.breakpoints.disarm(&mut self.state, &mut self.cache, pc);
        let inst = self.fetch_decode(pc);
        self.state.set_pc(pc.wrapping_add(inst.size));
        (inst.sem)(&inst, &mut self.state);
        self.retire(&inst);
        let outcome = match self.state.take_trap() {
            Some(trap) => self.service_trap(trap, pc),
            None => None,
        };
        self.breakpoints.arm(&mut self.state, &mut self.cache, pc);
        outcome
    }

    /// The execution loop: runs until a halt condition, or until `budget`
    /// instructions have retired.
    fn run_loop(&mut self, budget: Option<u64>, control: &HaltControl) -> HaltReason {
        let mut executed: u64 = 0;

        if self.need_step_over {
            self.need_step_over = false;
            if let Some(reason) = self.step_past_breakpoint() {
                return reason;
            }
            executed += 1;
        }

        loop {
            // Boundary checks: asynchronous halt first, then the budget.
            if let Some(reason) = control.take() {
                return reason;
            }
            if let Some(budget) = budget {
                if executed >= budget {
                    return HaltReason::StepComplete;
                }
            }

            let pc = self.state.pc();
            if pc & 1 != 0 {
                return HaltReason::FatalTrap(Trap::InstructionAddressMisaligned(pc));
            }

            let inst = self.fetch_decode(pc);
            // Pre-set the PC to the next sequential address; branch and
            // jump semantics overwrite it.
            self.state.set_pc(pc.wrapping_add(inst.size));
            (inst.sem)(&inst, &mut self.state);
            self.retire(&inst);
            executed += 1;

            if let Some(trap) = self.state.take_trap() {
                if let Some(reason) = self.service_trap(trap, pc) {
                    return reason;
                }
            }
        }
    }
}

struct Shared {
    machine: Mutex<Machine>,
    control: Arc<HaltControl>,
    status: AtomicU8,
    status_lock: Mutex<()>,
    halted_cv: Condvar,
    halt_reason: Mutex<HaltReason>,
}

/// The simulator core: a debug target with start/step/halt/breakpoint
/// semantics hosting the execution loop.
pub struct Core {
    shared: Arc<Shared>,
}

/// Recovers the guard from a poisoned mutex; the machine stays usable for
/// debug inspection even if a semantic panicked.
pub(crate) fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl Core {
    /// Builds a core over fully constructed architectural state.
    pub fn new(name: &str, state: ArchState) -> Self {
        let control = state.halt_control();
        Self {
            shared: Arc::new(Shared {
                machine: Mutex::new(Machine {
                    state,
                    cache: DecodeCache::new(),
                    breakpoints: BreakpointManager::new(),
                    counters: CounterSet::new(name),
                    need_step_over: false,
                }),
                control,
                status: AtomicU8::new(RunStatus::Idle as u8),
                status_lock: Mutex::new(()),
                halted_cv: Condvar::new(),
                halt_reason: Mutex::new(HaltReason::None),
            }),
        }
    }

    /// Current run status.
    pub fn run_status(&self) -> RunStatus {
        RunStatus::from_u8(self.shared.status.load(Ordering::Acquire))
    }

    /// The reason for the most recent halt.
    pub fn last_halt_reason(&self) -> HaltReason {
        lock_unpoisoned(&self.shared.halt_reason).clone()
    }

    /// The shared halt-request cell (for signal handlers).
    pub fn halt_control(&self) -> Arc<HaltControl> {
        Arc::clone(&self.shared.control)
    }

    fn begin_running(&self) -> Result<(), DebugError> {
        let _guard = lock_unpoisoned(&self.shared.status_lock);
        if self.run_status() == RunStatus::Running {
            return Err(DebugError::AlreadyRunning);
        }
        self.shared.control.clear();
        *lock_unpoisoned(&self.shared.halt_reason) = HaltReason::None;
        self.shared
            .status
            .store(RunStatus::Running as u8, Ordering::Release);
        Ok(())
    }

    fn finish_running(shared: &Shared, reason: HaltReason) {
        let _guard = lock_unpoisoned(&shared.status_lock);
        *lock_unpoisoned(&shared.halt_reason) = reason;
        shared
            .status
            .store(RunStatus::Halted as u8, Ordering::Release);
        shared.halted_cv.notify_all();
    }

    /// Transitions to Running and returns immediately; the loop executes on
    /// a spawned simulation thread until a halt condition.
    pub fn run(&self) -> Result<(), DebugError> {
        self.begin_running()?;
        let shared = Arc::clone(&self.shared);
        thread::spawn(move || {
            let reason = {
                let mut machine = lock_unpoisoned(&shared.machine);
                machine.run_loop(None, &shared.control)
            };
            Core::finish_running(&shared, reason);
        });
        Ok(())
    }

    /// Advances exactly `n` retired instructions on the calling thread,
    /// then halts. An earlier halt condition (breakpoint, trap, halt
    /// request) ends the step with its own reason.
    pub fn step(&self, n: u64) -> Result<HaltReason, DebugError> {
        if n == 0 {
            return Err(DebugError::InvalidStepCount);
        }
        self.begin_running()?;
        let reason = {
            let mut machine = lock_unpoisoned(&self.shared.machine);
            machine.run_loop(Some(n), &self.shared.control)
        };
        Core::finish_running(&self.shared, reason.clone());
        Ok(reason)
    }

    /// Requests a halt at the next instruction boundary. Legal from any
    /// thread in any state; idempotent.
    pub fn halt(&self) {
        self.shared
            .control
            .request(control::HaltRequest::UserHalt);
    }

    /// Blocks until the core is Halted; returns the halt reason.
    pub fn wait(&self) -> HaltReason {
        let mut guard = lock_unpoisoned(&self.shared.status_lock);
        while self.run_status() == RunStatus::Running {
            guard = self
                .shared
                .halted_cv
                .wait(guard)
                .unwrap_or_else(|poisoned| poisoned.into_inner());
        }
        drop(guard);
        self.last_halt_reason()
    }

    /// Runs `f` over the counter set; requires Halted.
    pub fn with_counters<R>(&self, f: impl FnOnce(&CounterSet) -> R) -> Result<R, DebugError> {
        let machine = self.machine_halted("with_counters")?;
        Ok(f(&machine.counters))
    }

    /// Records the wall-clock simulation time for counter export.
    pub fn set_simulation_time(&self, seconds: f64) -> Result<(), DebugError> {
        let mut machine = self.machine_halted("set_simulation_time")?;
        machine.counters.simulation_time_sec = seconds;
        Ok(())
    }

    pub(crate) fn machine_halted(
        &self,
        what: &'static str,
    ) -> Result<MutexGuard<'_, Machine>, DebugError> {
        if self.run_status() == RunStatus::Running {
            return Err(DebugError::NotHalted(what));
        }
        Ok(lock_unpoisoned(&self.shared.machine))
    }

    pub(crate) fn halt_reason_slot(&self) -> &Mutex<HaltReason> {
        &self.shared.halt_reason
    }
}

impl Drop for Core {
    /// Transitions through Halted: a still-running loop is asked to halt
    /// and joined via `wait` before teardown.
    fn drop(&mut self) {
        if self.run_status() == RunStatus::Running {
            self.halt();
            self.wait();
        }
    }
}
