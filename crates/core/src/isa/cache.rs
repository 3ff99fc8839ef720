//! PC-keyed decode cache.
//!
//! Decoded instructions are memoized by fetch address for as long as the
//! underlying bytes are unchanged. The run loop drains the store journal
//! after every retired instruction and evicts any entry whose byte range
//! overlaps a written range, so a cached decoding is never stale at the
//! next fetch. `fence.i` and debug memory writes clear through the same
//! paths.

use std::collections::HashMap;
use std::sync::Arc;

use crate::isa::decode::DecodedInst;

/// Maximum bytes one cached instruction can span (a full-width encoding).
const MAX_INSTRUCTION_BYTES: u32 = 4;

/// Writes larger than this clear the whole cache instead of walking keys.
const FULL_FLUSH_THRESHOLD: u32 = 4096;

/// Decode memoization keyed by fetch address.
#[derive(Default)]
pub struct DecodeCache {
    entries: HashMap<u32, Arc<DecodedInst>>,
}

impl DecodeCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up the cached decoding for `address`.
    pub fn get(&self, address: u32) -> Option<Arc<DecodedInst>> {
        self.entries.get(&address).cloned()
    }

    /// Memoizes a decoding.
    pub fn insert(&mut self, address: u32, inst: Arc<DecodedInst>) {
        self.entries.insert(address, inst);
    }

    /// Evicts every entry whose byte range overlaps `[address, address+len)`.
    ///
    /// An instruction cached at `p` spans at most `[p, p+4)`, so only keys
    /// in `[address-3, address+len)` can overlap.
    pub fn invalidate_range(&mut self, address: u32, len: u32) {
        if len == 0 || self.entries.is_empty() {
            return;
        }
        if len > FULL_FLUSH_THRESHOLD {
            self.entries.clear();
            return;
        }
        let first = address.wrapping_sub(MAX_INSTRUCTION_BYTES - 1);
        let count = len + MAX_INSTRUCTION_BYTES - 1;
        for i in 0..count {
            let key = first.wrapping_add(i);
            if let Some(inst) = self.entries.get(&key) {
                // A 2-byte instruction at address-3 does not reach address.
                if key.wrapping_add(inst.size) > address || key >= address {
                    self.entries.remove(&key);
                }
            }
        }
    }

    /// Clears the entire cache (`fence.i`).
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
