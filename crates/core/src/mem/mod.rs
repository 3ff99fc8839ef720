//! Memory subsystem.
//!
//! The simulated memory is a stack of three layers, owned innermost-out:
//! 1. **Flat demand memory:** A sparse, byte-addressable store over the full
//!    32-bit space, allocated page-by-page on first write.
//! 2. **Watcher:** An interposer that routes accesses to declared address
//!    ranges to callbacks instead of the store (HTIF-style rendezvous).
//! 3. **Atomic wrapper:** Serializes LR/SC reservation sequences and atomic
//!    read-modify-write operations over the watched store.

/// LR/SC reservations and atomic read-modify-write operations.
pub mod atomic;

/// Sparse demand-paged byte store.
pub mod flat;

/// Address-range watch interposer.
pub mod watcher;

pub use atomic::{AmoOp, AtomicMemory};
pub use flat::FlatDemandMemory;
pub use watcher::{MemoryWatcher, WatchHandler};
