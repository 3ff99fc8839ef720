//! Memory subsystem tests.

use gvsim_core::common::error::WatchError;
use gvsim_core::mem::atomic::{AmoOp, AtomicMemory};
use gvsim_core::mem::flat::FlatDemandMemory;
use gvsim_core::mem::watcher::{MemoryWatcher, WatchHandler};

const PAGE: u32 = 4096;

#[test]
fn reads_of_untouched_memory_return_zero() {
    let mem = FlatDemandMemory::new();
    let mut buf = [0xffu8; 16];
    mem.load(0x1234_5678, &mut buf);
    assert_eq!(buf, [0u8; 16]);
    assert_eq!(mem.allocated_pages(), 0);
}

#[test]
fn store_load_roundtrip() {
    let mut mem = FlatDemandMemory::new();
    mem.write_u32(0x100, 0xdead_beef);
    assert_eq!(mem.read_u32(0x100), 0xdead_beef);
    assert_eq!(mem.read_u8(0x100), 0xef);
    assert_eq!(mem.read_u8(0x103), 0xde);
}

#[test]
fn unaligned_load_across_page_boundary_concatenates_little_endian() {
    let mut mem = FlatDemandMemory::new();
    // Two bytes at the end of one page, two at the start of the next.
    mem.store(PAGE - 2, &[0x11, 0x22, 0x33, 0x44]);
    assert_eq!(mem.read_u32(PAGE - 2), 0x4433_2211);
    assert_eq!(mem.allocated_pages(), 2);
}

#[test]
fn store_wraps_at_address_space_end() {
    let mut mem = FlatDemandMemory::new();
    mem.store(u32::MAX, &[0xaa, 0xbb]);
    assert_eq!(mem.read_u8(u32::MAX), 0xaa);
    assert_eq!(mem.read_u8(0), 0xbb);
}

struct Recorder {
    writes: std::sync::mpsc::Sender<(u32, Vec<u8>)>,
}

impl WatchHandler for Recorder {
    fn on_read(&mut self, _mem: &mut FlatDemandMemory, _address: u32, buf: &mut [u8]) {
        buf.fill(0x5a);
    }

    fn on_write(&mut self, _mem: &mut FlatDemandMemory, address: u32, data: &[u8]) {
        let _ = self.writes.send((address, data.to_vec()));
    }
}

#[test]
fn watcher_intercepts_watched_range_instead_of_store() {
    let (tx, rx) = std::sync::mpsc::channel();
    let mut watcher = MemoryWatcher::new(FlatDemandMemory::new());
    watcher
        .watch(0x1000, 8, Box::new(Recorder { writes: tx }))
        .unwrap();

    watcher.store(0x1000, &[1, 2, 3, 4]);
    assert_eq!(rx.try_recv().unwrap(), (0x1000, vec![1, 2, 3, 4]));
    // The store went to the handler, not the backing memory.
    assert_eq!(watcher.raw().read_u32(0x1000), 0);

    let mut buf = [0u8; 4];
    watcher.load(0x1000, &mut buf);
    assert_eq!(buf, [0x5a; 4]);
}

#[test]
fn watcher_passes_through_unwatched_accesses() {
    let (tx, _rx) = std::sync::mpsc::channel();
    let mut watcher = MemoryWatcher::new(FlatDemandMemory::new());
    watcher
        .watch(0x1000, 8, Box::new(Recorder { writes: tx }))
        .unwrap();

    watcher.store(0x2000, &[9, 9]);
    let mut buf = [0u8; 2];
    watcher.load(0x2000, &mut buf);
    assert_eq!(buf, [9, 9]);
}

#[test]
fn watcher_rejects_overlapping_ranges() {
    let (tx, _rx) = std::sync::mpsc::channel();
    let (tx2, _rx2) = std::sync::mpsc::channel();
    let mut watcher = MemoryWatcher::new(FlatDemandMemory::new());
    watcher
        .watch(0x1000, 8, Box::new(Recorder { writes: tx }))
        .unwrap();
    let err = watcher
        .watch(0x1004, 8, Box::new(Recorder { writes: tx2 }))
        .unwrap_err();
    assert_eq!(
        err,
        WatchError::Overlap {
            base: 0x1004,
            len: 8
        }
    );
}

fn atomic_over(values: &[(u32, u32)]) -> AtomicMemory {
    let mut mem = FlatDemandMemory::new();
    for &(addr, val) in values {
        mem.write_u32(addr, val);
    }
    AtomicMemory::new(MemoryWatcher::new(mem))
}

#[test]
fn amo_operations_return_old_value_and_update_memory() {
    let mut mem = atomic_over(&[(0x100, 10)]);
    assert_eq!(mem.amo(AmoOp::Add, 0x100, 5), 10);
    assert_eq!(mem.amo(AmoOp::Swap, 0x100, 99), 15);
    assert_eq!(mem.amo(AmoOp::And, 0x100, 0x0f), 99);
    assert_eq!(mem.amo(AmoOp::Or, 0x100, 0xf0), 99 & 0x0f);

    let mut signed = atomic_over(&[(0x200, -5i32 as u32)]);
    assert_eq!(signed.amo(AmoOp::Min, 0x200, 3), -5i32 as u32);
    assert_eq!(signed.amo(AmoOp::Max, 0x200, 3), -5i32 as u32);
    // After Max, memory holds 3.
    assert_eq!(signed.amo(AmoOp::Minu, 0x200, 2), 3);
    assert_eq!(signed.amo(AmoOp::Maxu, 0x200, u32::MAX), 2);
}

#[test]
fn lr_sc_succeeds_without_intervening_store() {
    let mut mem = atomic_over(&[(0x100, 42)]);
    assert_eq!(mem.load_reserved(0x100), 42);
    assert!(mem.store_conditional(0x100, 43));
    let mut buf = [0u8; 4];
    mem.load(0x100, &mut buf);
    assert_eq!(u32::from_le_bytes(buf), 43);
}

#[test]
fn intervening_store_to_reserved_word_fails_sc() {
    let mut mem = atomic_over(&[(0x100, 42)]);
    mem.load_reserved(0x100);
    mem.store(0x102, &[0]);
    assert!(!mem.store_conditional(0x100, 43));
    let mut buf = [0u8; 4];
    mem.load(0x100, &mut buf);
    assert_ne!(u32::from_le_bytes(buf), 43);
}

#[test]
fn sc_without_reservation_fails() {
    let mut mem = atomic_over(&[]);
    assert!(!mem.store_conditional(0x100, 1));
}

#[test]
fn sc_to_different_granule_fails_and_consumes_reservation() {
    let mut mem = atomic_over(&[]);
    mem.load_reserved(0x100);
    assert!(!mem.store_conditional(0x200, 1));
    assert!(!mem.store_conditional(0x100, 1));
}

#[test]
fn store_outside_reserved_granule_keeps_reservation() {
    let mut mem = atomic_over(&[]);
    mem.load_reserved(0x100);
    mem.store(0x200, &[7]);
    assert!(mem.store_conditional(0x100, 1));
}

#[test]
fn cancel_reservation_fails_matching_sc() {
    let mut mem = atomic_over(&[]);
    mem.load_reserved(0x100);
    mem.cancel_reservation();
    assert!(!mem.store_conditional(0x100, 1));
}
