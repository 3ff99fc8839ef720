//! Core top tests: the run/step/halt state machine, breakpoints, traps,
//! and the concurrency contract.

use std::time::Duration;

use crate::common::encoding::{add, addi, ebreak, ecall, jal, self_loop};
use crate::common::harness::{TestContext, ENTRY};
use gvsim_core::top::control::HaltRequest;
use gvsim_core::{DebugError, HaltReason, RunStatus, Trap};

#[test]
fn step_budget_halts_with_step_complete() {
    let ctx = TestContext::with_program(&[addi(1, 0, 1), addi(1, 1, 1), addi(1, 1, 1)]);
    assert_eq!(ctx.core.run_status(), RunStatus::Idle);
    assert_eq!(ctx.core.step(2).unwrap(), HaltReason::StepComplete);
    assert_eq!(ctx.core.run_status(), RunStatus::Halted);
    assert_eq!(ctx.xreg(1), 2);
    assert_eq!(ctx.pc(), ENTRY + 8);
}

#[test]
fn step_zero_is_rejected() {
    let ctx = TestContext::with_program(&[addi(1, 0, 1)]);
    assert_eq!(ctx.core.step(0).unwrap_err(), DebugError::InvalidStepCount);
}

#[test]
fn exit_on_ecall_reports_program_done() {
    // Loop incrementing x1 until ecall.
    let prog = [addi(1, 1, 1), addi(1, 1, 1), ecall()];
    let ctx = TestContext::with_program_and_state(&prog, |state| {
        state.on_ecall(Box::new(|_inst, state| {
            state.request_halt(HaltRequest::ProgramDone);
            true
        }));
    });
    ctx.core.run().unwrap();
    assert_eq!(ctx.core.wait(), HaltReason::ProgramDone);
    assert_eq!(ctx.xreg(1), 2);
}

#[test]
fn unhandled_ecall_is_a_fatal_trap_without_a_vector() {
    let ctx = TestContext::with_program(&[ecall()]);
    assert_eq!(
        ctx.core.step(1).unwrap(),
        HaltReason::FatalTrap(Trap::EnvironmentCall)
    );
    // The PC points at the trapping instruction; debug access stays usable.
    assert_eq!(ctx.pc(), ENTRY);
    assert_eq!(ctx.xreg(0), 0);
}

#[test]
fn ecall_redirects_to_the_machine_trap_vector_when_installed() {
    // mtvec = ENTRY + 0x40; the handler loops forever.
    let ctx = TestContext::with_program_and_state(&[ecall()], |state| {
        state.csr_write(0x305, ENTRY + 0x40);
        state.write_memory(ENTRY + 0x40, &self_loop().to_le_bytes());
    });
    assert_eq!(ctx.core.step(2).unwrap(), HaltReason::StepComplete);
    assert_eq!(ctx.pc(), ENTRY + 0x40);
    assert_eq!(ctx.core.read_register("mepc").unwrap(), ENTRY as u64);
    assert_eq!(ctx.core.read_register("mcause").unwrap(), 11);
}

#[test]
fn illegal_instruction_halts_with_fatal_trap() {
    let ctx = TestContext::with_program(&[0xffff_ffff]);
    match ctx.core.step(1).unwrap() {
        HaltReason::FatalTrap(Trap::IllegalInstruction(raw)) => assert_eq!(raw, 0xffff_ffff),
        other => panic!("unexpected halt reason {:?}", other),
    }
}

#[test]
fn misaligned_fetch_halts_with_fatal_trap() {
    let ctx = TestContext::with_program(&[addi(1, 0, 1)]);
    ctx.core.write_register("pc", (ENTRY + 1) as u64).unwrap();
    match ctx.core.step(1).unwrap() {
        HaltReason::FatalTrap(Trap::InstructionAddressMisaligned(addr)) => {
            assert_eq!(addr, ENTRY + 1)
        }
        other => panic!("unexpected halt reason {:?}", other),
    }
}

#[test]
fn breakpoint_reports_and_leaves_pc_at_the_breakpoint() {
    let prog = [addi(1, 0, 1), addi(2, 0, 2), addi(3, 0, 3), self_loop()];
    let ctx = TestContext::with_program(&prog);
    ctx.core.set_sw_breakpoint(ENTRY + 4).unwrap();

    ctx.core.run().unwrap();
    assert_eq!(ctx.core.wait(), HaltReason::Breakpoint(ENTRY + 4));
    assert_eq!(ctx.pc(), ENTRY + 4);
    // The first instruction ran, the one under the breakpoint did not.
    assert_eq!(ctx.xreg(1), 1);
    assert_eq!(ctx.xreg(2), 0);
}

#[test]
fn debug_reads_at_a_breakpoint_see_original_bytes() {
    let prog = [addi(1, 0, 1), addi(2, 0, 2)];
    let ctx = TestContext::with_program(&prog);
    ctx.core.set_sw_breakpoint(ENTRY + 4).unwrap();

    let bytes = ctx.core.read_memory((ENTRY + 4) as u64, 4).unwrap();
    assert_eq!(u32::from_le_bytes(bytes.try_into().unwrap()), addi(2, 0, 2));
    // A read spanning the breakpoint also sees the originals.
    let bytes = ctx.core.read_memory(ENTRY as u64, 8).unwrap();
    assert_eq!(
        u32::from_le_bytes(bytes[4..8].try_into().unwrap()),
        addi(2, 0, 2)
    );
}

#[test]
fn resuming_from_a_breakpoint_steps_past_it() {
    let prog = [addi(1, 0, 1), addi(2, 0, 2), addi(3, 0, 3), self_loop()];
    let ctx = TestContext::with_program(&prog);
    ctx.core.set_sw_breakpoint(ENTRY + 4).unwrap();

    ctx.core.run().unwrap();
    assert_eq!(ctx.core.wait(), HaltReason::Breakpoint(ENTRY + 4));

    // Resume with a step: the breakpointed instruction itself executes.
    assert_eq!(ctx.core.step(1).unwrap(), HaltReason::StepComplete);
    assert_eq!(ctx.xreg(2), 2);
    assert_eq!(ctx.pc(), ENTRY + 8);

    // And the breakpoint is still armed for the next pass.
    ctx.core.write_register("pc", ENTRY as u64).unwrap();
    ctx.core.run().unwrap();
    assert_eq!(ctx.core.wait(), HaltReason::Breakpoint(ENTRY + 4));
}

#[test]
fn clearing_a_breakpoint_restores_the_instruction() {
    let prog = [addi(1, 0, 1), addi(2, 0, 2), self_loop()];
    let ctx = TestContext::with_program(&prog);
    ctx.core.set_sw_breakpoint(ENTRY + 4).unwrap();
    ctx.core.clear_sw_breakpoint(ENTRY + 4).unwrap();

    assert_eq!(ctx.core.step(2).unwrap(), HaltReason::StepComplete);
    assert_eq!(ctx.xreg(2), 2);

    let bytes = ctx.core.read_memory((ENTRY + 4) as u64, 4).unwrap();
    assert_eq!(u32::from_le_bytes(bytes.try_into().unwrap()), addi(2, 0, 2));
}

#[test]
fn breakpoint_bookkeeping_errors() {
    let ctx = TestContext::with_program(&[addi(1, 0, 1)]);
    ctx.core.set_sw_breakpoint(ENTRY).unwrap();
    assert_eq!(
        ctx.core.set_sw_breakpoint(ENTRY).unwrap_err(),
        DebugError::BreakpointExists(ENTRY)
    );
    assert_eq!(
        ctx.core.clear_sw_breakpoint(ENTRY + 4).unwrap_err(),
        DebugError::BreakpointNotFound(ENTRY + 4)
    );
    assert!(ctx.core.has_breakpoint(ENTRY).unwrap());
    ctx.core.clear_all_sw_breakpoints().unwrap();
    assert!(!ctx.core.has_breakpoint(ENTRY).unwrap());
}

#[test]
fn plain_ebreak_without_breakpoint_is_a_fatal_trap() {
    let ctx = TestContext::with_program(&[ebreak()]);
    match ctx.core.step(1).unwrap() {
        HaltReason::FatalTrap(Trap::Breakpoint(pc)) => assert_eq!(pc, ENTRY),
        other => panic!("unexpected halt reason {:?}", other),
    }
}

#[test]
fn halt_from_another_thread_stops_a_running_core() {
    // An infinite increment loop.
    let prog = [addi(1, 1, 1), jal(0, -4)];
    let ctx = TestContext::with_program(&prog);
    ctx.core.run().unwrap();

    std::thread::sleep(Duration::from_millis(20));
    assert_eq!(ctx.core.run_status(), RunStatus::Running);
    ctx.core.halt();
    let reason = ctx.core.wait();
    assert_eq!(reason, HaltReason::UserHalt);

    // Halted at an instruction boundary inside the loop.
    let pc = ctx.pc();
    assert!(pc == ENTRY || pc == ENTRY + 4, "pc = {:#x}", pc);
    assert!(ctx.xreg(1) > 0);
}

#[test]
fn halt_is_idempotent() {
    let prog = [addi(1, 1, 1), jal(0, -4)];
    let ctx = TestContext::with_program(&prog);
    ctx.core.run().unwrap();
    ctx.core.halt();
    ctx.core.halt();
    assert_eq!(ctx.core.wait(), HaltReason::UserHalt);
    ctx.core.halt();
    assert_eq!(ctx.core.run_status(), RunStatus::Halted);
}

#[test]
fn control_operations_require_a_halted_core() {
    let prog = [addi(1, 1, 1), jal(0, -4)];
    let ctx = TestContext::with_program(&prog);
    ctx.core.run().unwrap();

    assert!(matches!(
        ctx.core.read_register("x1").unwrap_err(),
        DebugError::NotHalted(_)
    ));
    assert!(matches!(
        ctx.core.write_register("x1", 0).unwrap_err(),
        DebugError::NotHalted(_)
    ));
    assert!(matches!(
        ctx.core.read_memory(0, 4).unwrap_err(),
        DebugError::NotHalted(_)
    ));
    assert!(matches!(
        ctx.core.set_sw_breakpoint(ENTRY).unwrap_err(),
        DebugError::NotHalted(_)
    ));
    assert_eq!(ctx.core.run().unwrap_err(), DebugError::AlreadyRunning);

    ctx.core.halt();
    ctx.core.wait();
    assert!(ctx.core.read_register("x1").is_ok());
}

#[test]
fn register_not_found_is_a_structured_error() {
    let ctx = TestContext::with_program(&[addi(1, 0, 1)]);
    assert_eq!(
        ctx.core.read_register("x99").unwrap_err(),
        DebugError::RegisterNotFound("x99".to_string())
    );
}

#[test]
fn retired_instruction_counters_accumulate() {
    use gvsim_core::isa::opcode::Opcode;
    let ctx = TestContext::with_program(&[addi(1, 0, 1), add(2, 1, 1), addi(3, 0, 1)]);
    ctx.core.step(3).unwrap();
    ctx.core
        .with_counters(|counters| {
            assert_eq!(counters.num_instructions, 3);
            assert_eq!(counters.opcode_count(Opcode::Addi), 2);
            assert_eq!(counters.opcode_count(Opcode::Add), 1);
        })
        .unwrap();
}

#[test]
fn counter_export_contains_named_values() {
    let ctx = TestContext::with_program(&[addi(1, 0, 1)]);
    ctx.core.step(1).unwrap();
    let text = ctx
        .core
        .with_counters(|counters| {
            let mut buf = Vec::new();
            counters.write_component_data(&mut buf).unwrap();
            String::from_utf8(buf).unwrap()
        })
        .unwrap();
    assert!(text.contains("name: \"test\""));
    assert!(text.contains("counter { name: \"num_instructions\" value: 1 }"));
    assert!(text.contains("counter { name: \"num_addi\" value: 1 }"));
}

#[test]
fn moving_the_pc_cancels_the_pending_step_over() {
    let prog = [addi(1, 0, 1), addi(2, 0, 2), addi(3, 0, 3), self_loop()];
    let ctx = TestContext::with_program(&prog);
    ctx.core.set_sw_breakpoint(ENTRY + 4).unwrap();
    ctx.core.run().unwrap();
    assert_eq!(ctx.core.wait(), HaltReason::Breakpoint(ENTRY + 4));

    // Redirect to slot 2; the breakpointed slot 1 must not execute.
    ctx.core.write_register("pc", (ENTRY + 8) as u64).unwrap();
    ctx.core.step(1).unwrap();
    assert_eq!(ctx.xreg(2), 0);
    assert_eq!(ctx.xreg(3), 3);
}
