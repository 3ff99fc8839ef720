//! Atomic-extension memory wrapper.
//!
//! Serializes the RISC-V A-extension primitives over the watched store:
//! load-reserved / store-conditional sequences with a natural-word
//! reservation granule, and the standard atomic read-modify-write set.
//! Any store through the wrapper that touches the reserved word invalidates
//! the reservation, so an intervening store makes the matching `sc.w` fail.

use crate::mem::watcher::MemoryWatcher;

/// Atomic read-modify-write operation selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AmoOp {
    /// Swap the register value into memory.
    Swap,
    /// Two's-complement addition.
    Add,
    /// Bitwise exclusive or.
    Xor,
    /// Bitwise and.
    And,
    /// Bitwise or.
    Or,
    /// Signed minimum.
    Min,
    /// Signed maximum.
    Max,
    /// Unsigned minimum.
    Minu,
    /// Unsigned maximum.
    Maxu,
}

/// Reservation granule in bytes (one natural word).
const RESERVATION_GRANULE: u32 = 4;

/// Atomic wrapper over the watched memory stack.
pub struct AtomicMemory {
    inner: MemoryWatcher,
    reservation: Option<u32>,
}

impl AtomicMemory {
    /// Wraps `inner` with no live reservation.
    pub fn new(inner: MemoryWatcher) -> Self {
        Self {
            inner,
            reservation: None,
        }
    }

    #[inline]
    fn granule(addr: u32) -> u32 {
        addr & !(RESERVATION_GRANULE - 1)
    }

    /// Ordinary load through the watch layer.
    pub fn load(&mut self, address: u32, buf: &mut [u8]) {
        self.inner.load(address, buf);
    }

    /// Ordinary store through the watch layer.
    ///
    /// Clears a live reservation whose granule intersects the store, which
    /// makes a later matching `sc.w` fail.
    pub fn store(&mut self, address: u32, data: &[u8]) {
        self.invalidate_reservation(address, data.len() as u32);
        self.inner.store(address, data);
    }

    /// Loads a word and establishes a reservation on its granule.
    pub fn load_reserved(&mut self, address: u32) -> u32 {
        self.reservation = Some(Self::granule(address));
        let mut buf = [0u8; 4];
        self.inner.load(address, &mut buf);
        u32::from_le_bytes(buf)
    }

    /// Attempts a conditional store; returns `true` on success.
    ///
    /// Succeeds only when a reservation is live for the granule containing
    /// `address`. The reservation is consumed either way.
    pub fn store_conditional(&mut self, address: u32, val: u32) -> bool {
        let ok = self.reservation == Some(Self::granule(address));
        self.reservation = None;
        if ok {
            self.inner.store(address, &val.to_le_bytes());
        }
        ok
    }

    /// Cancels any live reservation.
    pub fn cancel_reservation(&mut self) {
        self.reservation = None;
    }

    /// Clears the reservation if the `len`-byte range at `address` touches
    /// the reserved granule. Used by the debug surface, which writes to the
    /// raw store but must still be an observer for LR/SC purposes.
    pub fn invalidate_reservation(&mut self, address: u32, len: u32) {
        if len == 0 {
            return;
        }
        if let Some(reserved) = self.reservation {
            let start = Self::granule(address);
            let end = Self::granule(address.wrapping_add(len - 1));
            if start <= reserved && reserved <= end {
                self.reservation = None;
            }
        }
    }

    /// Performs an atomic read-modify-write and returns the original value.
    pub fn amo(&mut self, op: AmoOp, address: u32, val: u32) -> u32 {
        let mut buf = [0u8; 4];
        self.inner.load(address, &mut buf);
        let old = u32::from_le_bytes(buf);
        let new = match op {
            AmoOp::Swap => val,
            AmoOp::Add => old.wrapping_add(val),
            AmoOp::Xor => old ^ val,
            AmoOp::And => old & val,
            AmoOp::Or => old | val,
            AmoOp::Min => (old as i32).min(val as i32) as u32,
            AmoOp::Max => (old as i32).max(val as i32) as u32,
            AmoOp::Minu => old.min(val),
            AmoOp::Maxu => old.max(val),
        };
        // The RMW counts as a store for reservation purposes.
        self.invalidate_reservation(address, 4);
        self.inner.store(address, &new.to_le_bytes());
        old
    }

    /// Access to the watch layer (for range registration).
    pub fn watcher_mut(&mut self) -> &mut MemoryWatcher {
        &mut self.inner
    }

    /// Direct access to the underlying store, bypassing watches.
    pub fn raw(&self) -> &crate::mem::flat::FlatDemandMemory {
        self.inner.raw()
    }

    /// Mutable direct access to the underlying store, bypassing watches.
    pub fn raw_mut(&mut self) -> &mut crate::mem::flat::FlatDemandMemory {
        self.inner.raw_mut()
    }
}
