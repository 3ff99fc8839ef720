//! HTIF semihosting.
//!
//! Four magic addresses from the executable's symbol table form a
//! rendezvous between guest and host. The guest writes a request word to
//! `tohost` (after observing `tohost_ready`); the watcher delivers the
//! write here instead of to memory, the request is serviced, and the host
//! acknowledges through `fromhost`/`fromhost_ready`.
//!
//! Request encoding (riscv-tests convention):
//! * `0`: ignored.
//! * odd: exit request; the exit code is `value >> 1`.
//! * even nonzero: pointer to a syscall block of eight doublewords:
//!   `[number, arg0, arg1, arg2, ...]`; `SYS_WRITE` (64) writes guest
//!   bytes to the host's stdout/stderr, `SYS_EXIT` (93) exits.

use std::io::Write;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use log::{info, warn};

use crate::common::error::WatchError;
use crate::mem::flat::FlatDemandMemory;
use crate::mem::watcher::WatchHandler;
use crate::sim::loader::ElfLoader;
use crate::state::ArchState;
use crate::top::control::{HaltControl, HaltRequest};

/// Syscall number for write.
const SYS_WRITE: u64 = 64;

/// Syscall number for exit.
const SYS_EXIT: u64 = 93;

/// The four rendezvous addresses.
#[derive(Clone, Copy, Debug)]
pub struct HtifAddresses {
    /// Guest request word.
    pub tohost: u32,
    /// Host response word.
    pub fromhost: u32,
    /// Host-ready flag polled by the guest.
    pub tohost_ready: u32,
    /// Response-ready flag.
    pub fromhost_ready: u32,
}

impl HtifAddresses {
    /// Resolves the magic symbols from a loaded executable. All four must
    /// be present for HTIF to engage.
    pub fn from_loader(loader: &ElfLoader) -> Option<Self> {
        Some(Self {
            tohost: loader.get_symbol("tohost").ok()?.0,
            fromhost: loader.get_symbol("fromhost").ok()?.0,
            tohost_ready: loader.get_symbol("tohost_ready").ok()?.0,
            fromhost_ready: loader.get_symbol("fromhost_ready").ok()?.0,
        })
    }
}

struct HtifHandler {
    addrs: HtifAddresses,
    halt: Arc<HaltControl>,
    exit_code: Arc<AtomicU32>,
}

impl HtifHandler {
    fn service(&self, mem: &mut FlatDemandMemory, value: u64) {
        if value == 0 {
            return;
        }
        if value & 1 != 0 {
            let code = (value >> 1) as u32;
            info!("htif exit request, code {}", code);
            self.exit_code.store(code, Ordering::Release);
            self.halt.request(HaltRequest::SemihostHalt);
        } else {
            self.syscall(mem, value as u32);
        }
        // Acknowledge and re-open the rendezvous.
        mem.write_u64(self.addrs.fromhost, 1);
        mem.write_u8(self.addrs.fromhost_ready, 1);
        mem.write_u64(self.addrs.tohost, 0);
        mem.write_u8(self.addrs.tohost_ready, 1);
    }

    fn syscall(&self, mem: &mut FlatDemandMemory, block: u32) {
        let number = mem.read_u64(block);
        match number {
            SYS_WRITE => {
                let fd = mem.read_u64(block.wrapping_add(8));
                let ptr = mem.read_u64(block.wrapping_add(16)) as u32;
                let len = mem.read_u64(block.wrapping_add(24)) as usize;
                let mut buf = vec![0u8; len];
                mem.load(ptr, &mut buf);
                if fd == 2 {
                    let _ = std::io::stderr().write_all(&buf);
                } else {
                    let _ = std::io::stdout().write_all(&buf);
                }
            }
            SYS_EXIT => {
                let code = mem.read_u64(block.wrapping_add(8)) as u32;
                info!("htif syscall exit, code {}", code);
                self.exit_code.store(code, Ordering::Release);
                self.halt.request(HaltRequest::SemihostHalt);
            }
            other => {
                warn!("unhandled htif syscall {}", other);
            }
        }
    }
}

impl WatchHandler for HtifHandler {
    fn on_read(&mut self, mem: &mut FlatDemandMemory, address: u32, buf: &mut [u8]) {
        // Reads of the rendezvous words come straight from backing memory.
        mem.load(address, buf);
    }

    fn on_write(&mut self, mem: &mut FlatDemandMemory, address: u32, data: &[u8]) {
        mem.store(address, data);
        if address == self.addrs.tohost {
            let value = mem.read_u64(self.addrs.tohost);
            self.service(mem, value);
        }
    }
}

/// Installs HTIF semihosting: watches the `tohost` word and primes
/// `tohost_ready`. The shared `exit_code` cell receives the guest's exit
/// code before the core halts with `SemihostHalt`.
pub fn install(
    state: &mut ArchState,
    addrs: HtifAddresses,
    exit_code: Arc<AtomicU32>,
) -> Result<(), WatchError> {
    let handler = HtifHandler {
        addrs,
        halt: state.halt_control(),
        exit_code,
    };
    state.watch(addrs.tohost, 8, Box::new(handler))?;
    state.debug_write_memory(addrs.tohost_ready, &[1]);
    Ok(())
}
