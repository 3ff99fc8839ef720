//! ARM semihosting.
//!
//! An `ebreak` bracketed by the sentinel instruction sequence
//! `slli zero, zero, 0x1f` / `srai zero, zero, 7` is a semihosting call:
//! the call number is in `a0`, the argument block pointer in `a1`. The
//! handler claims such ebreaks from the chain; plain ebreaks fall through
//! to the breakpoint machinery.

use std::io::Write;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use log::warn;

use crate::common::constants::{REG_A0, REG_A1};
use crate::state::ArchState;
use crate::top::control::HaltRequest;

/// Encoding of `slli zero, zero, 0x1f`.
const SENTINEL_BEFORE: u32 = 0x01f0_1013;

/// Encoding of `srai zero, zero, 7`.
const SENTINEL_AFTER: u32 = 0x4070_5013;

/// `SYS_WRITE0`: write a NUL-terminated string.
const SYS_WRITE0: u32 = 0x04;

/// `SYS_WRITE`: write a buffer; block is `[handle, pointer, length]`.
const SYS_WRITE: u32 = 0x05;

/// `SYS_EXIT`: report application exit.
const SYS_EXIT: u32 = 0x18;

/// `ADP_Stopped_ApplicationExit`: the clean-exit reason code.
const APPLICATION_EXIT: u32 = 0x20026;

fn read_u32(state: &ArchState, address: u32) -> u32 {
    let mut buf = [0u8; 4];
    state.debug_read_memory(address, &mut buf);
    u32::from_le_bytes(buf)
}

fn handle_call(state: &mut ArchState, exit_code: &AtomicU32) {
    let op = state.xreg(REG_A0);
    let param = state.xreg(REG_A1);
    match op {
        SYS_WRITE0 => {
            let mut bytes = Vec::new();
            let mut addr = param;
            loop {
                let mut b = [0u8; 1];
                state.read_memory(addr, &mut b);
                if b[0] == 0 {
                    break;
                }
                bytes.push(b[0]);
                addr = addr.wrapping_add(1);
            }
            let _ = std::io::stdout().write_all(&bytes);
            state.set_xreg(REG_A0, 0);
        }
        SYS_WRITE => {
            let handle = read_u32(state, param);
            let ptr = read_u32(state, param.wrapping_add(4));
            let len = read_u32(state, param.wrapping_add(8)) as usize;
            let mut buf = vec![0u8; len];
            state.read_memory(ptr, &mut buf);
            if handle == 2 {
                let _ = std::io::stderr().write_all(&buf);
            } else {
                let _ = std::io::stdout().write_all(&buf);
            }
            // Zero bytes not written.
            state.set_xreg(REG_A0, 0);
        }
        SYS_EXIT => {
            let code = if param == APPLICATION_EXIT { 0 } else { 1 };
            exit_code.store(code, Ordering::Release);
            state.request_halt(HaltRequest::SemihostHalt);
        }
        other => {
            warn!("unhandled arm semihosting call {:#x}", other);
            state.set_xreg(REG_A0, u32::MAX);
        }
    }
}

/// Installs the ARM semihosting `ebreak` handler.
pub fn install(state: &mut ArchState, exit_code: Arc<AtomicU32>) {
    state.add_ebreak_handler(Box::new(move |inst, state| {
        let before = read_u32(state, inst.address.wrapping_sub(4));
        let after = read_u32(state, inst.address.wrapping_add(4));
        if before != SENTINEL_BEFORE || after != SENTINEL_AFTER {
            return false;
        }
        handle_call(state, &exit_code);
        true
    }));
}
