//! ELF program loader.
//!
//! Loads the PT_LOAD segments of a statically linked 32-bit RISC-V
//! executable into simulated memory and exposes the entry point, the
//! symbol table, and the GNU_STACK segment size.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use goblin::elf::program_header::{PT_GNU_STACK, PT_LOAD};
use goblin::elf::Elf;
use log::info;

use crate::common::error::LoadError;
use crate::mem::flat::FlatDemandMemory;

/// A loaded program image: entry point, symbols, and stack segment info.
#[derive(Debug)]
pub struct ElfLoader {
    entry_point: u32,
    symbols: HashMap<String, (u32, u32)>,
    gnu_stack_size: Option<u64>,
}

impl ElfLoader {
    /// Loads `path` into `memory` and indexes its symbol table.
    pub fn load(path: &Path, memory: &mut FlatDemandMemory) -> Result<Self, LoadError> {
        let data = fs::read(path).map_err(|source| LoadError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let elf = Elf::parse(&data).map_err(|e| LoadError::Parse(e.to_string()))?;
        if elf.is_64 || elf.header.e_machine != goblin::elf::header::EM_RISCV {
            return Err(LoadError::WrongClass);
        }

        let mut gnu_stack_size = None;
        let mut loaded = 0usize;
        for ph in &elf.program_headers {
            match ph.p_type {
                PT_LOAD => {
                    let offset = ph.p_offset as usize;
                    let filesz = ph.p_filesz as usize;
                    let file_bytes = data
                        .get(offset..offset + filesz)
                        .ok_or_else(|| LoadError::Parse("segment beyond file end".to_string()))?;
                    memory.store(ph.p_vaddr as u32, file_bytes);
                    // Zero-fill the bss tail explicitly; the page may have
                    // been written by an earlier overlapping segment.
                    if ph.p_memsz > ph.p_filesz {
                        let zeros = vec![0u8; (ph.p_memsz - ph.p_filesz) as usize];
                        memory.store(ph.p_vaddr.wrapping_add(ph.p_filesz) as u32, &zeros);
                    }
                    loaded += filesz;
                }
                PT_GNU_STACK => {
                    if ph.p_memsz > 0 {
                        gnu_stack_size = Some(ph.p_memsz);
                    }
                }
                _ => {}
            }
        }

        let mut symbols = HashMap::new();
        for sym in elf.syms.iter() {
            if let Some(name) = elf.strtab.get_at(sym.st_name) {
                if !name.is_empty() {
                    symbols.insert(name.to_string(), (sym.st_value as u32, sym.st_size as u32));
                }
            }
        }

        info!(
            "loaded {} segment bytes, {} symbols, entry {:#x}",
            loaded,
            symbols.len(),
            elf.header.e_entry
        );

        Ok(Self {
            entry_point: elf.header.e_entry as u32,
            symbols,
            gnu_stack_size,
        })
    }

    /// The program entry point.
    pub fn entry_point(&self) -> u32 {
        self.entry_point
    }

    /// Looks up a symbol, returning `(address, size)`.
    pub fn get_symbol(&self, name: &str) -> Result<(u32, u32), LoadError> {
        self.symbols
            .get(name)
            .copied()
            .ok_or_else(|| LoadError::SymbolNotFound(name.to_string()))
    }

    /// The GNU_STACK segment size, when the executable carries one.
    pub fn get_stack_size(&self) -> Result<u64, LoadError> {
        self.gnu_stack_size.ok_or(LoadError::NoStackSegment)
    }
}
