//! Architectural state.
//!
//! [`ArchState`] owns everything a semantic function can observe or mutate:
//! the register file (integer, floating-point, PC), the CSR file, FP and
//! vector unit state, the memory stack (atomic wrapper over watcher over
//! flat store), the `ecall`/`ebreak` handler chains, the pending-trap slot,
//! and the retired/cycle counters. The run loop drives it; the debug
//! surface reads and writes it while the core is halted.

/// Control and status register file.
pub mod csr;

/// Floating-point rounding, flags, and NaN boxing.
pub mod fp;

/// Name-keyed register file.
pub mod reg;

/// Vector configuration state and register bank.
pub mod vec;

use std::sync::Arc;

use crate::common::constants::{
    FREG_ALIASES, FREG_PREFIX, NUM_FREGS, NUM_XREGS, PC_NAME, XREG_ALIASES, XREG_PREFIX,
};
use crate::common::error::{Trap, WatchError};
use crate::isa::decode::DecodedInst;
use crate::mem::atomic::{AmoOp, AtomicMemory};
use crate::mem::flat::FlatDemandMemory;
use crate::mem::watcher::{MemoryWatcher, WatchHandler};
use crate::top::control::{HaltControl, HaltRequest};

use self::csr::{CsrClass, CsrSet};
use self::fp::{FpFlags, FpState};
use self::reg::{RegId, RegWidth, RegisterFile};
use self::vec::VectorState;

/// Handler offered each `ecall`; returns true when the call was handled.
pub type EcallHandler = Box<dyn FnMut(&DecodedInst, &mut ArchState) -> bool + Send>;

/// Handler offered each `ebreak`; returns true when the break was handled.
pub type EbreakHandler = Box<dyn FnMut(&DecodedInst, &mut ArchState) -> bool + Send>;

/// The complete architectural state of one hart.
pub struct ArchState {
    regs: RegisterFile,
    xreg_ids: [RegId; NUM_XREGS],
    freg_ids: [RegId; NUM_FREGS],
    pc_id: RegId,
    csrs: CsrSet,
    /// Floating-point rounding mode and sticky flags.
    pub fp: FpState,
    /// Vector configuration and register bank.
    pub vec: VectorState,
    mem: AtomicMemory,
    ecall_handlers: Vec<EcallHandler>,
    ebreak_handlers: Vec<EbreakHandler>,
    pending_trap: Option<Trap>,
    store_log: Vec<(u32, u32)>,
    fence_i: bool,
    halt: Arc<HaltControl>,
    /// Retired instruction count (mirrored by `minstret`).
    pub retired: u64,
    /// Cycle count; one per retired instruction in this functional model.
    pub cycles: u64,
}

impl ArchState {
    /// Builds the state: registers from the declarative tables, the CSR
    /// file, FP and vector units, and the memory stack around `memory`.
    pub fn new(memory: FlatDemandMemory, vlen_bits: u32) -> Self {
        let mut regs = RegisterFile::new();

        let mut xreg_ids = [0; NUM_XREGS];
        for (i, ids) in xreg_ids.iter_mut().enumerate() {
            let name = format!("{}{}", XREG_PREFIX, i);
            *ids = regs.add_register(&name, RegWidth::W32, i == 0);
            regs.add_alias(&name, XREG_ALIASES[i]);
        }
        // `s0` doubles as the frame pointer.
        regs.add_alias("x8", "fp");

        let mut freg_ids = [0; NUM_FREGS];
        for (i, ids) in freg_ids.iter_mut().enumerate() {
            let name = format!("{}{}", FREG_PREFIX, i);
            *ids = regs.add_register(&name, RegWidth::W64, false);
            regs.add_alias(&name, FREG_ALIASES[i]);
        }

        let pc_id = regs.add_register(PC_NAME, RegWidth::W32, false);

        let mut state = Self {
            regs,
            xreg_ids,
            freg_ids,
            pc_id,
            csrs: CsrSet::new(),
            fp: FpState::new(),
            vec: VectorState::new(vlen_bits),
            mem: AtomicMemory::new(MemoryWatcher::new(memory)),
            ecall_handlers: Vec::new(),
            ebreak_handlers: Vec::new(),
            pending_trap: None,
            store_log: Vec::new(),
            fence_i: false,
            halt: Arc::new(HaltControl::new()),
            retired: 0,
            cycles: 0,
        };
        state.register_csrs();
        state
    }

    fn register_csrs(&mut self) {
        use self::csr::*;
        let c = &mut self.csrs;
        c.add(FFLAGS, "fflags", 0, 0x1f, CsrClass::Fflags);
        c.add(FRM, "frm", 0, 0x7, CsrClass::Frm);
        c.add(FCSR, "fcsr", 0, 0xff, CsrClass::Fcsr);
        c.add(VSTART, "vstart", 0, u32::MAX, CsrClass::Vstart);
        c.add(VL, "vl", 0, 0, CsrClass::Vl);
        c.add(VTYPE, "vtype", 0, 0, CsrClass::Vtype);
        c.add(VLENB, "vlenb", 0, 0, CsrClass::Vlenb);
        c.add(MSTATUS, "mstatus", 0, 0x0000_19aa, CsrClass::Plain);
        c.add(MISA, "misa", MISA_RV32IMAFDCV, 0, CsrClass::Plain);
        c.add(MTVEC, "mtvec", 0, u32::MAX, CsrClass::Plain);
        c.add(MSCRATCH, "mscratch", 0, u32::MAX, CsrClass::Plain);
        c.add(MEPC, "mepc", 0, !1, CsrClass::Plain);
        c.add(MCAUSE, "mcause", 0, u32::MAX, CsrClass::Plain);
        c.add(MTVAL, "mtval", 0, u32::MAX, CsrClass::Plain);
        c.add(MHARTID, "mhartid", 0, 0, CsrClass::Plain);
        c.add(MCYCLE, "mcycle", 0, u32::MAX, CsrClass::Cycle { high: false });
        c.add(MCYCLEH, "mcycleh", 0, u32::MAX, CsrClass::Cycle { high: true });
        c.add(
            MINSTRET,
            "minstret",
            0,
            u32::MAX,
            CsrClass::Instret { high: false },
        );
        c.add(
            MINSTRETH,
            "minstreth",
            0,
            u32::MAX,
            CsrClass::Instret { high: true },
        );
        c.add(CYCLE, "cycle", 0, 0, CsrClass::Cycle { high: false });
        c.add(CYCLEH, "cycleh", 0, 0, CsrClass::Cycle { high: true });
        c.add(INSTRET, "instret", 0, 0, CsrClass::Instret { high: false });
        c.add(
            INSTRETH,
            "instreth",
            0,
            0,
            CsrClass::Instret { high: true },
        );
    }

    // ─── Registers ───────────────────────────────────────────────

    /// Cell handle of integer register `i`.
    #[inline]
    pub fn xreg_id(&self, i: usize) -> RegId {
        self.xreg_ids[i]
    }

    /// Cell handle of floating-point register `i`.
    #[inline]
    pub fn freg_id(&self, i: usize) -> RegId {
        self.freg_ids[i]
    }

    /// True when `id` is the hard-wired `x0` cell.
    #[inline]
    pub fn is_zero_reg(&self, id: RegId) -> bool {
        id == self.xreg_ids[0]
    }

    /// Reads integer register `i`.
    #[inline]
    pub fn xreg(&self, i: usize) -> u32 {
        self.regs.read(self.xreg_ids[i]) as u32
    }

    /// Writes integer register `i`; writes to `x0` are dropped.
    #[inline]
    pub fn set_xreg(&mut self, i: usize, val: u32) {
        self.regs.write(self.xreg_ids[i], val as u64);
    }

    /// Reads floating-point register `i`.
    #[inline]
    pub fn freg(&self, i: usize) -> u64 {
        self.regs.read(self.freg_ids[i])
    }

    /// Writes floating-point register `i`.
    #[inline]
    pub fn set_freg(&mut self, i: usize, val: u64) {
        self.regs.write(self.freg_ids[i], val);
    }

    /// Reads a register cell by handle.
    #[inline]
    pub fn read_reg(&self, id: RegId) -> u64 {
        self.regs.read(id)
    }

    /// Writes a register cell by handle.
    #[inline]
    pub fn write_reg(&mut self, id: RegId, val: u64) {
        self.regs.write(id, val);
    }

    /// Current program counter.
    #[inline]
    pub fn pc(&self) -> u32 {
        self.regs.read(self.pc_id) as u32
    }

    /// Sets the program counter.
    #[inline]
    pub fn set_pc(&mut self, pc: u32) {
        self.regs.write(self.pc_id, pc as u64);
    }

    /// The register file (debug surface name resolution).
    pub fn registers(&self) -> &RegisterFile {
        &self.regs
    }

    /// The register file, mutable.
    pub fn registers_mut(&mut self) -> &mut RegisterFile {
        &mut self.regs
    }

    // ─── Memory ──────────────────────────────────────────────────

    /// Loads through the watcher (the program's data path).
    pub fn read_memory(&mut self, address: u32, buf: &mut [u8]) {
        self.mem.load(address, buf);
    }

    /// Stores through the watcher and journals the range for decode-cache
    /// invalidation.
    pub fn write_memory(&mut self, address: u32, data: &[u8]) {
        self.mem.store(address, data);
        self.store_log.push((address, data.len() as u32));
    }

    /// Instruction fetch: reads the raw store, bypassing watch ranges.
    pub fn fetch(&self, address: u32, buf: &mut [u8]) {
        self.mem.raw().load(address, buf);
    }

    /// Debug load, bypassing watch ranges.
    pub fn debug_read_memory(&self, address: u32, buf: &mut [u8]) {
        self.mem.raw().load(address, buf);
    }

    /// Debug store, bypassing watch ranges. Counts as an observer store for
    /// LR/SC purposes.
    pub fn debug_write_memory(&mut self, address: u32, data: &[u8]) {
        self.mem.invalidate_reservation(address, data.len() as u32);
        self.mem.raw_mut().store(address, data);
    }

    /// Registers a watch range on the data path.
    pub fn watch(
        &mut self,
        base: u32,
        len: u32,
        handler: Box<dyn WatchHandler>,
    ) -> Result<(), WatchError> {
        self.mem.watcher_mut().watch(base, len, handler)
    }

    /// Load-reserved word.
    pub fn load_reserved(&mut self, address: u32) -> u32 {
        self.mem.load_reserved(address)
    }

    /// Store-conditional word; true on success.
    pub fn store_conditional(&mut self, address: u32, val: u32) -> bool {
        let ok = self.mem.store_conditional(address, val);
        if ok {
            self.store_log.push((address, 4));
        }
        ok
    }

    /// Atomic read-modify-write; returns the original memory value.
    pub fn amo(&mut self, op: AmoOp, address: u32, val: u32) -> u32 {
        let old = self.mem.amo(op, address, val);
        self.store_log.push((address, 4));
        old
    }

    /// Drains the journal of stores since the last drain.
    pub fn take_store_log(&mut self) -> Vec<(u32, u32)> {
        std::mem::take(&mut self.store_log)
    }

    // ─── CSRs ────────────────────────────────────────────────────

    /// The CSR file (debug surface name resolution).
    pub fn csrs(&self) -> &CsrSet {
        &self.csrs
    }

    /// Reads a CSR; `None` when the address is unimplemented.
    pub fn csr_read(&self, addr: u16) -> Option<u32> {
        let class = self.csrs.class(addr)?;
        Some(match class {
            CsrClass::Plain => self.csrs.raw_read(addr),
            CsrClass::Fflags => self.fp.fflags().bits() as u32,
            CsrClass::Frm => self.fp.frm() as u32,
            CsrClass::Fcsr => ((self.fp.frm() as u32) << 5) | self.fp.fflags().bits() as u32,
            CsrClass::Vstart => self.vec.vstart(),
            CsrClass::Vl => self.vec.vl(),
            CsrClass::Vtype => self.vec.vtype(),
            CsrClass::Vlenb => self.vec.vlenb(),
            CsrClass::Cycle { high } => (self.cycles >> if high { 32 } else { 0 }) as u32,
            CsrClass::Instret { high } => (self.retired >> if high { 32 } else { 0 }) as u32,
        })
    }

    /// Writes a CSR, applying its side-effect hook; `None` when the address
    /// is unimplemented or architecturally read-only.
    pub fn csr_write(&mut self, addr: u16, val: u32) -> Option<()> {
        if CsrSet::is_read_only(addr) {
            return None;
        }
        let class = self.csrs.class(addr)?;
        match class {
            CsrClass::Plain => self.csrs.raw_write(addr, val),
            CsrClass::Fflags => self.fp.set_fflags(FpFlags::from_bits(val as u8)),
            CsrClass::Frm => self.fp.set_frm(val as u8),
            CsrClass::Fcsr => {
                self.fp.set_fflags(FpFlags::from_bits(val as u8));
                self.fp.set_frm((val >> 5) as u8);
            }
            CsrClass::Vstart => self.vec.set_vstart(val),
            // vl/vtype/vlenb only change through vset* and are filtered by
            // the read-only address check above.
            CsrClass::Vl | CsrClass::Vtype | CsrClass::Vlenb => return None,
            CsrClass::Cycle { high } => {
                self.cycles = splice_half(self.cycles, val, high);
            }
            CsrClass::Instret { high } => {
                self.retired = splice_half(self.retired, val, high);
            }
        }
        Some(())
    }

    // ─── Handlers, traps, halt ───────────────────────────────────

    /// Appends an `ecall` handler; handlers run in registration order and
    /// the first to return true stops propagation.
    pub fn on_ecall(&mut self, handler: EcallHandler) {
        self.ecall_handlers.push(handler);
    }

    /// Appends an `ebreak` handler.
    pub fn add_ebreak_handler(&mut self, handler: EbreakHandler) {
        self.ebreak_handlers.push(handler);
    }

    /// Offers an `ecall` to the handler chain.
    pub fn dispatch_ecall(&mut self, inst: &DecodedInst) -> bool {
        let mut handlers = std::mem::take(&mut self.ecall_handlers);
        let mut handled = false;
        for h in handlers.iter_mut() {
            if h(inst, self) {
                handled = true;
                break;
            }
        }
        handlers.extend(std::mem::take(&mut self.ecall_handlers));
        self.ecall_handlers = handlers;
        handled
    }

    /// Offers an `ebreak` to the handler chain.
    pub fn dispatch_ebreak(&mut self, inst: &DecodedInst) -> bool {
        let mut handlers = std::mem::take(&mut self.ebreak_handlers);
        let mut handled = false;
        for h in handlers.iter_mut() {
            if h(inst, self) {
                handled = true;
                break;
            }
        }
        handlers.extend(std::mem::take(&mut self.ebreak_handlers));
        self.ebreak_handlers = handlers;
        handled
    }

    /// Records a trap; the run loop services it at the boundary. The first
    /// recorded trap of an instruction wins.
    pub fn trap(&mut self, trap: Trap) {
        if self.pending_trap.is_none() {
            self.pending_trap = Some(trap);
        }
    }

    /// Consumes the pending trap, if any.
    pub fn take_trap(&mut self) -> Option<Trap> {
        self.pending_trap.take()
    }

    /// Redirects to the machine trap vector: writes `mepc`, `mcause`,
    /// `mtval`, and jumps to the `mtvec` base. The caller has checked that
    /// a vector is installed.
    pub fn enter_trap(&mut self, trap: &Trap, epc: u32) {
        self.csrs.raw_write(csr::MEPC, epc);
        self.csrs.raw_write(csr::MCAUSE, trap.cause());
        self.csrs.raw_write(csr::MTVAL, trap.tval());
        let base = self.csrs.raw_read(csr::MTVEC) & !0b11;
        self.set_pc(base);
    }

    /// The installed machine trap vector, zero when none.
    pub fn mtvec(&self) -> u32 {
        self.csrs.raw_read(csr::MTVEC)
    }

    /// Requests a halt at the next instruction boundary.
    pub fn request_halt(&self, req: HaltRequest) {
        self.halt.request(req);
    }

    /// The shared halt-control cell.
    pub fn halt_control(&self) -> Arc<HaltControl> {
        Arc::clone(&self.halt)
    }

    /// Marks that `fence.i` ran; the run loop flushes the decode cache.
    pub fn request_fence_i(&mut self) {
        self.fence_i = true;
    }

    /// Consumes the `fence.i` flag.
    pub fn take_fence_i(&mut self) -> bool {
        std::mem::take(&mut self.fence_i)
    }
}

fn splice_half(full: u64, val: u32, high: bool) -> u64 {
    if high {
        (full & 0xffff_ffff) | ((val as u64) << 32)
    } else {
        (full & !0xffff_ffff) | val as u64
    }
}
