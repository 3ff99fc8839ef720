//! The debug surface.
//!
//! Synchronous register and memory access, breakpoint management, and
//! disassembly, consumed by the interactive shell and by tests. Every
//! operation except `halt` requires the core to be Halted and returns a
//! structured error otherwise; the core's state is unchanged when an error
//! is returned. Memory reads overlay the original bytes at armed
//! breakpoints, so the debugger never sees the `ebreak` stubs.

use crate::common::error::{DebugError, HaltReason};
use crate::isa::decode::decode;
use crate::top::{lock_unpoisoned, Core};

/// The 32-bit address-space limit for debug memory ranges.
const ADDRESS_SPACE: u64 = 1 << 32;

impl Core {
    /// Reads a register by canonical name or alias, falling back to the
    /// CSR set for CSR names.
    pub fn read_register(&self, name: &str) -> Result<u64, DebugError> {
        let machine = self.machine_halted("read_register")?;
        if let Some(id) = machine.state.registers().lookup(name) {
            return Ok(machine.state.read_reg(id));
        }
        if let Some(addr) = machine.state.csrs().lookup_name(name) {
            if let Some(val) = machine.state.csr_read(addr) {
                return Ok(val as u64);
            }
        }
        Err(DebugError::RegisterNotFound(name.to_string()))
    }

    /// Writes a register by name, with the CSR fallback.
    ///
    /// Moving the PC while halted at a software breakpoint cancels the
    /// pending step-over: the next instruction is no longer the one under
    /// the stub.
    pub fn write_register(&self, name: &str, value: u64) -> Result<(), DebugError> {
        let mut machine = self.machine_halted("write_register")?;
        if name == "pc" {
            let mut reason = lock_unpoisoned(self.halt_reason_slot());
            if matches!(*reason, HaltReason::Breakpoint(_)) {
                *reason = HaltReason::None;
                machine.need_step_over = false;
            }
        }
        if let Some(id) = machine.state.registers().lookup(name) {
            machine.state.write_reg(id, value);
            return Ok(());
        }
        if let Some(addr) = machine.state.csrs().lookup_name(name) {
            if machine.state.csr_write(addr, value as u32).is_some() {
                return Ok(());
            }
        }
        Err(DebugError::RegisterNotFound(name.to_string()))
    }

    /// Reads `len` bytes of memory, bypassing watch ranges. The length is
    /// clamped to the end of the 32-bit space. Armed breakpoints read as
    /// their original bytes.
    pub fn read_memory(&self, address: u64, len: u64) -> Result<Vec<u8>, DebugError> {
        if address >= ADDRESS_SPACE {
            return Err(DebugError::AddressOutOfRange { addr: address, len });
        }
        let len = len.min(ADDRESS_SPACE - address) as usize;
        let machine = self.machine_halted("read_memory")?;
        let mut buf = vec![0u8; len];
        machine.state.debug_read_memory(address as u32, &mut buf);
        machine
            .breakpoints
            .overlay_originals(address as u32, &mut buf);
        Ok(buf)
    }

    /// Writes bytes to memory, bypassing watch ranges. Writes into an armed
    /// breakpoint range update the stored original bytes; the stub stays in
    /// instruction memory until the breakpoint is cleared.
    pub fn write_memory(&self, address: u64, data: &[u8]) -> Result<usize, DebugError> {
        if address >= ADDRESS_SPACE {
            return Err(DebugError::AddressOutOfRange {
                addr: address,
                len: data.len() as u64,
            });
        }
        let len = data.len().min((ADDRESS_SPACE - address) as usize);
        let data = &data[..len];
        let mut machine = self.machine_halted("write_memory")?;
        let machine = &mut *machine;
        let rearm = machine.breakpoints.absorb_write(address as u32, data);
        machine.state.debug_write_memory(address as u32, data);
        for bp_addr in rearm {
            machine.breakpoints.rewrite_stub(&mut machine.state, bp_addr);
        }
        machine.cache.invalidate_range(address as u32, len as u32);
        Ok(len)
    }

    /// Sets and arms a software breakpoint.
    pub fn set_sw_breakpoint(&self, address: u32) -> Result<(), DebugError> {
        let mut machine = self.machine_halted("set_sw_breakpoint")?;
        let machine = &mut *machine;
        machine
            .breakpoints
            .set(&mut machine.state, &mut machine.cache, address)
    }

    /// Clears a software breakpoint, restoring the original instruction.
    pub fn clear_sw_breakpoint(&self, address: u32) -> Result<(), DebugError> {
        let mut machine = self.machine_halted("clear_sw_breakpoint")?;
        let machine = &mut *machine;
        machine
            .breakpoints
            .clear(&mut machine.state, &mut machine.cache, address)
    }

    /// Clears all software breakpoints.
    pub fn clear_all_sw_breakpoints(&self) -> Result<(), DebugError> {
        let mut machine = self.machine_halted("clear_all_sw_breakpoints")?;
        let machine = &mut *machine;
        machine
            .breakpoints
            .clear_all(&mut machine.state, &mut machine.cache);
        Ok(())
    }

    /// True when a breakpoint is set at `address`.
    pub fn has_breakpoint(&self, address: u32) -> Result<bool, DebugError> {
        let machine = self.machine_halted("has_breakpoint")?;
        Ok(machine.breakpoints.has(address))
    }

    /// Disassembles the instruction at `address` (the original one, if a
    /// breakpoint is armed there).
    pub fn disassemble(&self, address: u32) -> Result<String, DebugError> {
        let machine = self.machine_halted("disassemble")?;
        let mut buf = [0u8; 4];
        machine.state.debug_read_memory(address, &mut buf);
        machine.breakpoints.overlay_originals(address, &mut buf);
        let inst = decode(&machine.state, address, u32::from_le_bytes(buf));
        Ok(format!("{:#010x}  {}", inst.raw, inst.opcode.name()))
    }
}
