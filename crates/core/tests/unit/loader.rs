//! ELF loading and stack initialization.

use std::io::Write;

use tempfile::NamedTempFile;

use crate::common::elf::{build_elf, Symbol};
use crate::common::encoding::addi;
use crate::common::harness::fresh_state;
use gvsim_core::sim::{initialize_stack, StackOptions};
use gvsim_core::{ElfLoader, FlatDemandMemory, LoadError};

fn write_temp(image: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(image).unwrap();
    file.flush().unwrap();
    file
}

fn load(image: &[u8]) -> (ElfLoader, FlatDemandMemory) {
    let file = write_temp(image);
    let mut memory = FlatDemandMemory::new();
    let loader = ElfLoader::load(file.path(), &mut memory).unwrap();
    (loader, memory)
}

#[test]
fn load_places_segment_bytes_and_entry() {
    let code: Vec<u8> = [addi(1, 0, 5), addi(2, 1, 1)]
        .iter()
        .flat_map(|i| i.to_le_bytes())
        .collect();
    let image = build_elf(0x8000_0000, 0x8000_0000, &code, 0, &[], None);
    let (loader, memory) = load(&image);

    assert_eq!(loader.entry_point(), 0x8000_0000);
    assert_eq!(memory.read_u32(0x8000_0000), addi(1, 0, 5));
    assert_eq!(memory.read_u32(0x8000_0004), addi(2, 1, 1));
}

#[test]
fn bss_tail_is_zero_filled() {
    let image = build_elf(0x1000, 0x1000, &[0xff; 8], 16, &[], None);
    let (_loader, memory) = load(&image);
    assert_eq!(memory.read_u32(0x1000), 0xffff_ffff);
    assert_eq!(memory.read_u32(0x1008), 0);
    assert_eq!(memory.read_u32(0x1014), 0);
}

#[test]
fn symbols_resolve_with_value_and_size() {
    let image = build_elf(
        0x1000,
        0x1000,
        &[0; 4],
        0,
        &[
            Symbol {
                name: "tohost",
                value: 0x2000,
                size: 8,
            },
            Symbol {
                name: "__stack_end",
                value: 0x0020_0000,
                size: 0,
            },
        ],
        None,
    );
    let (loader, _memory) = load(&image);
    assert_eq!(loader.get_symbol("tohost").unwrap(), (0x2000, 8));
    assert_eq!(loader.get_symbol("__stack_end").unwrap(), (0x0020_0000, 0));
    assert!(matches!(
        loader.get_symbol("missing"),
        Err(LoadError::SymbolNotFound(_))
    ));
}

#[test]
fn gnu_stack_segment_size_is_reported() {
    let image = build_elf(0x1000, 0x1000, &[0; 4], 0, &[], Some(0x4000));
    let (loader, _memory) = load(&image);
    assert_eq!(loader.get_stack_size().unwrap(), 0x4000);

    let image = build_elf(0x1000, 0x1000, &[0; 4], 0, &[], None);
    let (loader, _memory) = load(&image);
    assert!(matches!(
        loader.get_stack_size(),
        Err(LoadError::NoStackSegment)
    ));
}

#[test]
fn unreadable_file_is_an_io_error() {
    let mut memory = FlatDemandMemory::new();
    let err = ElfLoader::load(std::path::Path::new("/nonexistent/prog.elf"), &mut memory)
        .unwrap_err();
    assert!(matches!(err, LoadError::Io { .. }));
}

#[test]
fn truncated_image_is_a_parse_error() {
    let file = write_temp(&[0x7f, b'E', b'L', b'F', 1, 1]);
    let mut memory = FlatDemandMemory::new();
    let err = ElfLoader::load(file.path(), &mut memory).unwrap_err();
    assert!(matches!(err, LoadError::Parse(_)));
}

// ── Stack initialization precedence ──

fn loader_with(symbols: &[Symbol<'_>], gnu_stack: Option<u32>) -> ElfLoader {
    let image = build_elf(0x1000, 0x1000, &[0; 4], 0, symbols, gnu_stack);
    load(&image).0
}

#[test]
fn sp_is_stack_end_plus_stack_size_from_symbols() {
    let loader = loader_with(
        &[
            Symbol {
                name: "__stack_end",
                value: 0x0020_0000,
                size: 0,
            },
            Symbol {
                name: "__stack_size",
                value: 0x8000,
                size: 0,
            },
        ],
        None,
    );
    let mut state = fresh_state();
    let sp = initialize_stack(&mut state, &loader, &StackOptions::default());
    assert_eq!(sp, Some(0x0020_8000));
    assert_eq!(state.xreg(2), 0x0020_8000);
}

#[test]
fn default_stack_size_is_32k() {
    let loader = loader_with(
        &[Symbol {
            name: "__stack_end",
            value: 0x0010_0000,
            size: 0,
        }],
        None,
    );
    let mut state = fresh_state();
    let sp = initialize_stack(&mut state, &loader, &StackOptions::default());
    assert_eq!(sp, Some(0x0010_8000));
}

#[test]
fn without_a_stack_end_source_sp_is_untouched() {
    let loader = loader_with(&[], None);
    let mut state = fresh_state();
    state.set_xreg(2, 0xdead);
    let sp = initialize_stack(&mut state, &loader, &StackOptions::default());
    assert_eq!(sp, None);
    assert_eq!(state.xreg(2), 0xdead);
}

#[test]
fn gnu_stack_overrides_default_but_not_symbol_or_flag() {
    let symbols = [
        Symbol {
            name: "__stack_end",
            value: 0x0010_0000,
            size: 0,
        },
        Symbol {
            name: "__stack_size",
            value: 0x2000,
            size: 0,
        },
    ];

    // GNU_STACK alone beats the default.
    let loader = loader_with(&symbols[..1], Some(0x4000));
    let mut state = fresh_state();
    assert_eq!(
        initialize_stack(&mut state, &loader, &StackOptions::default()),
        Some(0x0010_4000)
    );

    // The __stack_size symbol beats GNU_STACK.
    let loader = loader_with(&symbols, Some(0x4000));
    assert_eq!(
        initialize_stack(&mut state, &loader, &StackOptions::default()),
        Some(0x0010_2000)
    );

    // The flag beats everything.
    let opts = StackOptions {
        stack_size: Some(0x1000),
        stack_end: None,
    };
    assert_eq!(
        initialize_stack(&mut state, &loader, &opts),
        Some(0x0010_1000)
    );
}

#[test]
fn stack_end_flag_overrides_the_symbol() {
    let loader = loader_with(
        &[Symbol {
            name: "__stack_end",
            value: 0x0010_0000,
            size: 0,
        }],
        None,
    );
    let mut state = fresh_state();
    let opts = StackOptions {
        stack_size: Some(0x1000),
        stack_end: Some(0x0040_0000),
    };
    assert_eq!(
        initialize_stack(&mut state, &loader, &opts),
        Some(0x0040_1000)
    );
}

#[test]
fn stack_end_flag_alone_enables_initialization() {
    let loader = loader_with(&[], None);
    let mut state = fresh_state();
    let opts = StackOptions {
        stack_size: None,
        stack_end: Some(0x0030_0000),
    };
    // Flag-provided end with the default size.
    assert_eq!(
        initialize_stack(&mut state, &loader, &opts),
        Some(0x0030_8000)
    );
}
