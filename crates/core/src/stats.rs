//! Execution counters and counter export.
//!
//! The core maintains a named counter set: total retired instructions,
//! total cycles (one per instruction in this functional model), one counter
//! per opcode, and a wall-clock counter the driver fills in after a run.
//! `write_component_data` emits the textual component-data record consumed
//! by downstream tooling.

use std::io::{self, Write};

use crate::isa::opcode::Opcode;

/// The counter set exported after a run.
pub struct CounterSet {
    name: String,
    /// Total retired instructions.
    pub num_instructions: u64,
    /// Total cycles.
    pub num_cycles: u64,
    /// Wall-clock simulation time in seconds, set by the driver.
    pub simulation_time_sec: f64,
    per_opcode: Vec<u64>,
}

impl CounterSet {
    /// Creates a zeroed counter set for the named component.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            num_instructions: 0,
            num_cycles: 0,
            simulation_time_sec: 0.0,
            per_opcode: vec![0; Opcode::COUNT],
        }
    }

    /// Records one retired instruction.
    #[inline]
    pub fn retire(&mut self, opcode: Opcode) {
        self.num_instructions += 1;
        self.num_cycles += 1;
        self.per_opcode[opcode as usize] += 1;
    }

    /// Retirement count for one opcode.
    pub fn opcode_count(&self, opcode: Opcode) -> u64 {
        self.per_opcode[opcode as usize]
    }

    /// Writes the textual component-data record.
    ///
    /// Per-opcode counters that stayed at zero are included, matching the
    /// fixed shape downstream diffing expects.
    pub fn write_component_data<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "component {{")?;
        writeln!(out, "  name: \"{}\"", self.name)?;
        write_counter(out, "num_instructions", self.num_instructions)?;
        write_counter(out, "num_cycles", self.num_cycles)?;
        writeln!(
            out,
            "  counter {{ name: \"simulation_time_sec\" value: {:.1} }}",
            self.simulation_time_sec
        )?;
        for i in 0..Opcode::COUNT {
            let opcode = opcode_at(i);
            let counter_name = format!("num_{}", opcode.name());
            write_counter(out, &counter_name, self.per_opcode[i])?;
        }
        writeln!(out, "}}")
    }
}

fn write_counter<W: Write>(out: &mut W, name: &str, value: u64) -> io::Result<()> {
    writeln!(out, "  counter {{ name: \"{}\" value: {} }}", name, value)
}

/// Maps a dense index back to its opcode.
///
/// Safe because `Opcode` is a plain `repr(usize)` enumeration covering
/// exactly `0..COUNT`.
fn opcode_at(index: usize) -> Opcode {
    debug_assert!(index < Opcode::COUNT);
    // No variant carries data, so the discriminant is the full value.
    unsafe { std::mem::transmute::<usize, Opcode>(index) }
}
