//! Address-range watch interposer.
//!
//! The watcher wraps the flat store and maintains a set of non-overlapping
//! address ranges, each bound to a handler. An access that intersects a
//! watched range is delivered to the handler *instead of* the underlying
//! store; non-intersecting accesses pass through unchanged. Overlap between
//! a new and an existing range is rejected at registration time.
//!
//! HTIF semihosting is the primary client: the magic `tohost`/`fromhost`
//! rendezvous words are registered here so the host observes guest writes.

use crate::common::error::WatchError;
use crate::mem::flat::FlatDemandMemory;

/// Callback target for a watched address range.
///
/// Handlers receive the full access and a handle to the underlying store so
/// they can read or update backing memory themselves (e.g. HTIF writes its
/// acknowledgment into `fromhost`).
pub trait WatchHandler: Send {
    /// Invoked for a load intersecting the watched range. The handler is
    /// responsible for filling `buf`.
    fn on_read(&mut self, mem: &mut FlatDemandMemory, address: u32, buf: &mut [u8]);

    /// Invoked for a store intersecting the watched range.
    fn on_write(&mut self, mem: &mut FlatDemandMemory, address: u32, data: &[u8]);
}

struct WatchRange {
    base: u32,
    len: u32,
    handler: Box<dyn WatchHandler>,
}

impl WatchRange {
    fn intersects(&self, address: u32, len: u32) -> bool {
        let end = address as u64 + len as u64;
        let range_end = self.base as u64 + self.len as u64;
        (address as u64) < range_end && (self.base as u64) < end
    }
}

/// Watch interposer over [`FlatDemandMemory`].
#[derive(Default)]
pub struct MemoryWatcher {
    inner: FlatDemandMemory,
    ranges: Vec<WatchRange>,
}

impl MemoryWatcher {
    /// Wraps `inner` with an empty watch set.
    pub fn new(inner: FlatDemandMemory) -> Self {
        Self {
            inner,
            ranges: Vec::new(),
        }
    }

    /// Registers `handler` for the `len`-byte range starting at `base`.
    ///
    /// Fails when the range is empty or overlaps an existing registration.
    pub fn watch(
        &mut self,
        base: u32,
        len: u32,
        handler: Box<dyn WatchHandler>,
    ) -> Result<(), WatchError> {
        if len == 0 {
            return Err(WatchError::Empty);
        }
        if self.ranges.iter().any(|r| r.intersects(base, len)) {
            return Err(WatchError::Overlap { base, len });
        }
        self.ranges.push(WatchRange { base, len, handler });
        Ok(())
    }

    /// Loads through the watch set: a watched access goes to its handler,
    /// anything else to the underlying store.
    pub fn load(&mut self, address: u32, buf: &mut [u8]) {
        let hit = self
            .ranges
            .iter()
            .position(|r| r.intersects(address, buf.len() as u32));
        match hit {
            Some(idx) => {
                // Take the range out so the handler can borrow the store.
                let mut range = self.ranges.swap_remove(idx);
                range.handler.on_read(&mut self.inner, address, buf);
                self.ranges.push(range);
            }
            None => self.inner.load(address, buf),
        }
    }

    /// Stores through the watch set, mirroring [`Self::load`].
    pub fn store(&mut self, address: u32, data: &[u8]) {
        let hit = self
            .ranges
            .iter()
            .position(|r| r.intersects(address, data.len() as u32));
        match hit {
            Some(idx) => {
                let mut range = self.ranges.swap_remove(idx);
                range.handler.on_write(&mut self.inner, address, data);
                self.ranges.push(range);
            }
            None => self.inner.store(address, data),
        }
    }

    /// Direct access to the underlying store, bypassing all watches.
    pub fn raw(&self) -> &FlatDemandMemory {
        &self.inner
    }

    /// Mutable direct access to the underlying store, bypassing all watches.
    pub fn raw_mut(&mut self) -> &mut FlatDemandMemory {
        &mut self.inner
    }
}
