//! Software breakpoints.
//!
//! A breakpoint rewrites the instruction memory at its address with the
//! `ebreak` encoding of matching width (2 or 4 bytes), keeping the original
//! bytes. While a breakpoint is armed, the debug surface still shows the
//! original bytes: reads overlay them, and writes into an armed range land
//! in the stored original so clearing the breakpoint restores what the
//! debugger wrote.

use std::collections::HashMap;

use crate::common::constants::{EBREAK_16, EBREAK_32};
use crate::common::error::DebugError;
use crate::isa::cache::DecodeCache;
use crate::state::ArchState;

struct BreakpointInfo {
    size: u32,
    original: [u8; 4],
    active: bool,
}

/// The breakpoint map and its arm/disarm logic.
#[derive(Default)]
pub struct BreakpointManager {
    map: HashMap<u32, BreakpointInfo>,
}

impl BreakpointManager {
    /// Creates an empty manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// True when a breakpoint (armed or not) exists at `address`.
    pub fn has(&self, address: u32) -> bool {
        self.map.contains_key(&address)
    }

    /// True when an armed breakpoint exists at `address`.
    pub fn is_active(&self, address: u32) -> bool {
        self.map.get(&address).is_some_and(|bp| bp.active)
    }

    /// Addresses of all set breakpoints.
    pub fn addresses(&self) -> Vec<u32> {
        self.map.keys().copied().collect()
    }

    /// Sets and arms a breakpoint at `address`.
    pub fn set(
        &mut self,
        state: &mut ArchState,
        cache: &mut DecodeCache,
        address: u32,
    ) -> Result<(), DebugError> {
        if self.has(address) {
            return Err(DebugError::BreakpointExists(address));
        }
        let mut original = [0u8; 4];
        state.debug_read_memory(address, &mut original);
        // Width from the encoding's low bits: 11 marks a full-width slot.
        let size = if original[0] & 0x3 == 0x3 { 4 } else { 2 };
        self.map.insert(
            address,
            BreakpointInfo {
                size,
                original,
                active: false,
            },
        );
        self.arm(state, cache, address);
        Ok(())
    }

    /// Clears a breakpoint, restoring the original bytes if armed.
    pub fn clear(
        &mut self,
        state: &mut ArchState,
        cache: &mut DecodeCache,
        address: u32,
    ) -> Result<(), DebugError> {
        if !self.has(address) {
            return Err(DebugError::BreakpointNotFound(address));
        }
        self.disarm(state, cache, address);
        self.map.remove(&address);
        Ok(())
    }

    /// Clears all breakpoints.
    pub fn clear_all(&mut self, state: &mut ArchState, cache: &mut DecodeCache) {
        for address in self.addresses() {
            self.disarm(state, cache, address);
        }
        self.map.clear();
    }

    /// Writes the `ebreak` stub at an existing breakpoint.
    pub fn arm(&mut self, state: &mut ArchState, cache: &mut DecodeCache, address: u32) {
        if let Some(bp) = self.map.get_mut(&address) {
            if !bp.active {
                match bp.size {
                    2 => state.debug_write_memory(address, &EBREAK_16.to_le_bytes()),
                    _ => state.debug_write_memory(address, &EBREAK_32.to_le_bytes()),
                }
                bp.active = true;
                cache.invalidate_range(address, bp.size);
            }
        }
    }

    /// Restores the original bytes at an armed breakpoint.
    pub fn disarm(&mut self, state: &mut ArchState, cache: &mut DecodeCache, address: u32) {
        if let Some(bp) = self.map.get_mut(&address) {
            if bp.active {
                state.debug_write_memory(address, &bp.original[..bp.size as usize]);
                bp.active = false;
                cache.invalidate_range(address, bp.size);
            }
        }
    }

    /// Overlays original bytes over armed stubs in a debug-read buffer
    /// covering `[address, address + buf.len())`.
    pub fn overlay_originals(&self, address: u32, buf: &mut [u8]) {
        let len = buf.len() as u64;
        for (&bp_addr, bp) in &self.map {
            if !bp.active {
                continue;
            }
            for i in 0..bp.size as u64 {
                let byte_addr = bp_addr as u64 + i;
                if byte_addr >= address as u64 && byte_addr < address as u64 + len {
                    buf[(byte_addr - address as u64) as usize] = bp.original[i as usize];
                }
            }
        }
    }

    /// Absorbs a debug write overlapping armed breakpoints: overlapping
    /// bytes update the stored originals instead of surviving in memory.
    /// Returns the addresses whose stubs must be rewritten after the write.
    pub fn absorb_write(&mut self, address: u32, data: &[u8]) -> Vec<u32> {
        let mut rearm = Vec::new();
        let len = data.len() as u64;
        for (&bp_addr, bp) in self.map.iter_mut() {
            if !bp.active {
                continue;
            }
            let mut touched = false;
            for i in 0..bp.size as u64 {
                let byte_addr = bp_addr as u64 + i;
                if byte_addr >= address as u64 && byte_addr < address as u64 + len {
                    bp.original[i as usize] = data[(byte_addr - address as u64) as usize];
                    touched = true;
                }
            }
            if touched {
                rearm.push(bp_addr);
            }
        }
        rearm
    }

    /// Rewrites the stub bytes at `address` (after a debug write clobbered
    /// them).
    pub fn rewrite_stub(&self, state: &mut ArchState, address: u32) {
        if let Some(bp) = self.map.get(&address) {
            if bp.active {
                match bp.size {
                    2 => state.debug_write_memory(address, &EBREAK_16.to_le_bytes()),
                    _ => state.debug_write_memory(address, &EBREAK_32.to_le_bytes()),
                }
            }
        }
    }
}
