//! RV32 functional simulator CLI.
//!
//! Loads a statically linked ELF, wires up the requested semihosting
//! backend, and either drives the interactive debug shell or runs the
//! program to completion, exporting the counter record afterwards.
//! A SIGINT maps to a halt request at the next instruction boundary.

mod shell;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Instant;

use clap::Parser;
use log::error;

use gvsim_core::config::{Config, SemihostMode};
use gvsim_core::sim::htif::HtifAddresses;
use gvsim_core::sim::{self, StackOptions};
use gvsim_core::top::control::{HaltControl, HaltRequest};
use gvsim_core::{ArchState, Core, ElfLoader, FlatDemandMemory, HaltReason};

#[derive(Parser, Debug)]
#[command(
    name = "gvsim",
    version,
    about = "Functional RV32 G+V simulator",
    long_about = "Load a statically linked RV32 ELF and interpret it to completion.\n\n\
                  Examples:\n  gvsim program.elf\n  gvsim -i program.elf\n  \
                  gvsim --semihost-htif --output-dir out program.elf"
)]
struct Cli {
    /// The ELF executable to simulate.
    elf: PathBuf,

    /// Interactive mode: drop into the debug shell instead of running.
    #[arg(short = 'i', long)]
    interactive: bool,

    /// Directory for the counter export record.
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// HTIF semihosting (requires the tohost/fromhost magic symbols).
    #[arg(long, conflicts_with = "semihost_arm")]
    semihost_htif: bool,

    /// ARM semihosting (ebreak convention).
    #[arg(long)]
    semihost_arm: bool,

    /// Software stack size in bytes (overrides the __stack_size symbol and
    /// the GNU_STACK segment; default 32 KiB).
    #[arg(long)]
    stack_size: Option<u64>,

    /// Lowest stack address; the initial sp is stack_end + stack_size
    /// (overrides the __stack_end symbol).
    #[arg(long)]
    stack_end: Option<u64>,

    /// Halt with ProgramDone on the first ecall.
    #[arg(long)]
    exit_on_ecall: bool,
}

static SIGINT_HALT: OnceLock<Arc<HaltControl>> = OnceLock::new();

extern "C" fn sigint_handler(_signal: libc::c_int) {
    // Only lock-free stores; safe in signal context.
    if let Some(control) = SIGINT_HALT.get() {
        control.request(HaltRequest::UserHalt);
    }
}

fn install_sigint(control: Arc<HaltControl>) {
    let _ = SIGINT_HALT.set(control);
    unsafe {
        let mut sa: libc::sigaction = std::mem::zeroed();
        sa.sa_sigaction = sigint_handler as usize;
        libc::sigemptyset(&mut sa.sa_mask);
        libc::sigaddset(&mut sa.sa_mask, libc::SIGINT);
        sa.sa_flags = 0;
        libc::sigaction(libc::SIGINT, &sa, std::ptr::null_mut());
    }
}

fn export_counters(core: &Core, elf: &Path, output_dir: Option<&Path>) {
    let basename = elf
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "gvsim".to_string());
    let dir = output_dir.unwrap_or_else(|| Path::new("."));
    let path = dir.join(format!("{}.counters", basename));
    let result = core.with_counters(|counters| {
        std::fs::File::create(&path).and_then(|mut file| counters.write_component_data(&mut file))
    });
    match result {
        Ok(Ok(())) => {}
        Ok(Err(e)) => error!("failed to write counter record {}: {}", path.display(), e),
        Err(e) => error!("failed to export counters: {}", e),
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let config = Config {
        exit_on_ecall: cli.exit_on_ecall,
        semihost: if cli.semihost_htif {
            SemihostMode::Htif
        } else if cli.semihost_arm {
            SemihostMode::Arm
        } else {
            SemihostMode::None
        },
        stack_size: cli.stack_size,
        stack_end: cli.stack_end,
        ..Config::default()
    };

    let mut memory = FlatDemandMemory::new();
    let loader = match ElfLoader::load(&cli.elf, &mut memory) {
        Ok(loader) => loader,
        Err(e) => {
            eprintln!("error while loading '{}': {}", cli.elf.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let mut state = ArchState::new(memory, config.vlen_bits);
    state.set_pc(loader.entry_point());
    sim::initialize_stack(
        &mut state,
        &loader,
        &StackOptions {
            stack_size: config.stack_size,
            stack_end: config.stack_end,
        },
    );

    let semihost_exit = Arc::new(AtomicU32::new(0));
    match config.semihost {
        SemihostMode::Htif => match HtifAddresses::from_loader(&loader) {
            Some(addrs) => {
                if let Err(e) =
                    gvsim_core::sim::htif::install(&mut state, addrs, Arc::clone(&semihost_exit))
                {
                    eprintln!("htif setup failed: {}", e);
                    return ExitCode::FAILURE;
                }
            }
            None => eprintln!("htif requested but magic symbols are missing; running without"),
        },
        SemihostMode::Arm => {
            gvsim_core::sim::arm::install(&mut state, Arc::clone(&semihost_exit));
        }
        SemihostMode::None => {}
    }

    if config.exit_on_ecall {
        state.on_ecall(Box::new(|_inst, state| {
            state.request_halt(HaltRequest::ProgramDone);
            true
        }));
    }

    let core = Core::new(&config.core_name, state);
    install_sigint(core.halt_control());

    if cli.interactive {
        shell::run(&core, &loader);
        export_counters(&core, &cli.elf, cli.output_dir.as_deref());
        return ExitCode::SUCCESS;
    }

    eprintln!("Starting simulation");
    let t0 = Instant::now();
    if let Err(e) = core.run() {
        eprintln!("{}", e);
        return ExitCode::FAILURE;
    }
    let reason = core.wait();
    let seconds = t0.elapsed().as_secs_f64();
    let _ = core.set_simulation_time((seconds * 10.0).round() / 10.0);
    eprintln!("Simulation done: {:.1} sec", seconds);

    export_counters(&core, &cli.elf, cli.output_dir.as_deref());
    let _ = core.clear_all_sw_breakpoints();

    match reason {
        HaltReason::ProgramDone | HaltReason::StepComplete | HaltReason::None => ExitCode::SUCCESS,
        HaltReason::SemihostHalt => {
            let code = semihost_exit.load(Ordering::Acquire);
            ExitCode::from(code.min(255) as u8)
        }
        HaltReason::UserHalt => {
            eprintln!("Interrupted");
            ExitCode::from(130)
        }
        HaltReason::Breakpoint(addr) => {
            eprintln!("Stopped at breakpoint {:#x}", addr);
            ExitCode::SUCCESS
        }
        HaltReason::FatalTrap(trap) => {
            eprintln!("Fatal trap: {}", trap);
            ExitCode::FAILURE
        }
    }
}
