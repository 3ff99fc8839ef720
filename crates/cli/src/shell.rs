//! Interactive debug shell.
//!
//! A line-oriented command loop over the core's debug surface. Commands
//! are deliberately small: registers, memory, breakpoints, step/run/halt.
//! `run` returns immediately; `wait` (or a subsequent command requiring a
//! halted core) joins the simulation, and Ctrl-C maps to a halt request
//! through the process signal handler.

use std::io::{self, BufRead, Write};

use gvsim_core::{Core, ElfLoader, RunStatus};

const HELP: &str = "\
commands:
  reg <name>              read a register (x/f/abi/csr names, pc)
  reg <name> <value>      write a register
  mem <addr> [count]      dump memory bytes (default 16)
  set <addr> <word>       write a 32-bit word
  dis <addr>              disassemble one instruction
  break <addr>            set a software breakpoint
  clear <addr>            clear a software breakpoint
  clear-all               clear all breakpoints
  step [n]                execute n instructions (default 1)
  run                     resume execution (returns immediately)
  wait                    block until the core halts
  halt                    request a halt
  sym <name>              look up an ELF symbol
  status                  show run status, halt reason, and pc
  quit                    leave the shell";

fn parse_num(text: &str) -> Option<u64> {
    if let Some(hex) = text.strip_prefix("0x") {
        u64::from_str_radix(hex, 16).ok()
    } else {
        text.parse().ok()
    }
}

fn show_status(core: &Core) {
    let status = match core.run_status() {
        RunStatus::Idle => "idle",
        RunStatus::Running => "running",
        RunStatus::Halted => "halted",
    };
    print!("status: {}", status);
    if core.run_status() != RunStatus::Running {
        print!(", last halt: {}", core.last_halt_reason());
        if let Ok(pc) = core.read_register("pc") {
            print!(", pc = {:#010x}", pc);
        }
    }
    println!();
}

fn dump_memory(core: &Core, addr: u64, count: u64) {
    match core.read_memory(addr, count) {
        Ok(bytes) => {
            for (i, chunk) in bytes.chunks(16).enumerate() {
                print!("{:#010x}: ", addr + i as u64 * 16);
                for byte in chunk {
                    print!("{:02x} ", byte);
                }
                println!();
            }
        }
        Err(e) => println!("error: {}", e),
    }
}

/// Runs the shell until `quit` or end of input.
pub fn run(core: &Core, loader: &ElfLoader) {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("(gvsim) ");
        let _ = io::stdout().flush();
        let line = match lines.next() {
            Some(Ok(line)) => line,
            _ => break,
        };
        let words: Vec<&str> = line.split_whitespace().collect();
        let result = match words.as_slice() {
            [] => continue,
            ["help"] | ["?"] => {
                println!("{}", HELP);
                Ok(())
            }
            ["quit"] | ["exit"] | ["q"] => break,
            ["status"] => {
                show_status(core);
                Ok(())
            }
            ["reg", name] => core.read_register(name).map(|val| {
                println!("{} = {:#010x}", name, val);
            }),
            ["reg", name, value] => match parse_num(value) {
                Some(val) => core.write_register(name, val),
                None => {
                    println!("bad value '{}'", value);
                    Ok(())
                }
            },
            ["mem", addr] => {
                if let Some(addr) = parse_num(addr) {
                    dump_memory(core, addr, 16);
                }
                Ok(())
            }
            ["mem", addr, count] => {
                if let (Some(addr), Some(count)) = (parse_num(addr), parse_num(count)) {
                    dump_memory(core, addr, count);
                }
                Ok(())
            }
            ["set", addr, word] => match (parse_num(addr), parse_num(word)) {
                (Some(addr), Some(word)) => core
                    .write_memory(addr, &(word as u32).to_le_bytes())
                    .map(|_| ()),
                _ => {
                    println!("usage: set <addr> <word>");
                    Ok(())
                }
            },
            ["dis", addr] => match parse_num(addr) {
                Some(addr) => core.disassemble(addr as u32).map(|text| {
                    println!("{:#010x}: {}", addr, text);
                }),
                None => Ok(()),
            },
            ["break", addr] => match parse_num(addr) {
                Some(addr) => core.set_sw_breakpoint(addr as u32),
                None => Ok(()),
            },
            ["clear", addr] => match parse_num(addr) {
                Some(addr) => core.clear_sw_breakpoint(addr as u32),
                None => Ok(()),
            },
            ["clear-all"] => core.clear_all_sw_breakpoints(),
            ["step"] => core.step(1).map(|reason| {
                println!("{}", reason);
            }),
            ["step", n] => match parse_num(n) {
                Some(n) => core.step(n).map(|reason| {
                    println!("{}", reason);
                }),
                None => Ok(()),
            },
            ["run"] => core.run(),
            ["wait"] => {
                let reason = core.wait();
                println!("halted: {}", reason);
                Ok(())
            }
            ["halt"] => {
                core.halt();
                Ok(())
            }
            ["sym", name] => {
                match loader.get_symbol(name) {
                    Ok((addr, size)) => println!("{} = {:#010x} (size {})", name, addr, size),
                    Err(e) => println!("{}", e),
                }
                Ok(())
            }
            _ => {
                println!("unknown command; try 'help'");
                Ok(())
            }
        };
        if let Err(e) = result {
            println!("error: {}", e);
        }
    }
}
