//! Asynchronous halt-request plumbing.
//!
//! The halt request is the only control-thread operation that is legal while
//! the core is Running. It is a lock-free cell holding a reason code, an
//! optional payload, and a request flag, so it can be set from the debug
//! shell, from handlers running on the simulation thread, and from a SIGINT
//! handler (every store is a plain atomic). The run loop consumes the
//! request at an instruction boundary, never mid-instruction.

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU8, Ordering};

use crate::common::error::HaltReason;

const CODE_USER: u8 = 1;
const CODE_PROGRAM_DONE: u8 = 2;
const CODE_SEMIHOST: u8 = 3;
const CODE_BREAKPOINT: u8 = 4;

/// A halt reason that can be requested asynchronously.
///
/// Fatal traps are raised synchronously by the run loop itself and never
/// travel through this cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HaltRequest {
    /// Operator interrupt (shell `halt` or SIGINT).
    UserHalt,
    /// `ecall` with exit-on-ecall enabled.
    ProgramDone,
    /// Semihosting exit call.
    SemihostHalt,
    /// Software breakpoint at the given address.
    Breakpoint(u32),
}

/// Lock-free halt-request cell shared by the run loop and all controllers.
#[derive(Default)]
pub struct HaltControl {
    requested: AtomicBool,
    code: AtomicU8,
    value: AtomicU32,
}

impl HaltControl {
    /// Creates a cell with no request pending.
    pub fn new() -> Self {
        Self::default()
    }

    /// Posts a halt request. The reason is written before the flag so the
    /// loop never observes the flag without a valid reason.
    ///
    /// Idempotent: re-posting while a request is pending keeps the newest
    /// reason.
    pub fn request(&self, req: HaltRequest) {
        let (code, value) = match req {
            HaltRequest::UserHalt => (CODE_USER, 0),
            HaltRequest::ProgramDone => (CODE_PROGRAM_DONE, 0),
            HaltRequest::SemihostHalt => (CODE_SEMIHOST, 0),
            HaltRequest::Breakpoint(addr) => (CODE_BREAKPOINT, addr),
        };
        self.value.store(value, Ordering::Relaxed);
        self.code.store(code, Ordering::Release);
        self.requested.store(true, Ordering::Release);
    }

    /// Returns true when a request is pending without consuming it.
    pub fn pending(&self) -> bool {
        self.requested.load(Ordering::Acquire)
    }

    /// Consumes a pending request, if any.
    pub fn take(&self) -> Option<HaltReason> {
        if !self.requested.swap(false, Ordering::AcqRel) {
            return None;
        }
        let code = self.code.load(Ordering::Acquire);
        let value = self.value.load(Ordering::Relaxed);
        Some(match code {
            CODE_PROGRAM_DONE => HaltReason::ProgramDone,
            CODE_SEMIHOST => HaltReason::SemihostHalt,
            CODE_BREAKPOINT => HaltReason::Breakpoint(value),
            _ => HaltReason::UserHalt,
        })
    }

    /// Drops any pending request (entering Running).
    pub fn clear(&self) {
        self.requested.store(false, Ordering::Release);
    }
}
