/*!
 * Console Dumps
 * Human-readable PCB, context and process-table output
 *
 * Everything writes to a `fmt::Write` sink and never panics. Retired
 * blocks print `-1` for their pids; every other pid prints unsigned.
 */

use crate::core::types::{Address, PcbId, Pid, Priority, NO_PID};
use crate::memory::arena::PcbArena;
use crate::process::manager::PcbSubsystem;
use crate::process::table::ProcessTable;
use crate::process::types::{Context, Pcb, StateLabel};
use serde::Serialize;
use std::fmt::{self, Write};
use tracing::warn;

const NULL_MARKER: &str = " NULL???\n";

/// Slot accounting observed while dumping the table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TableReport {
    pub capacity: usize,
    /// Occupied slots counted during the scan
    pub used: usize,
    pub empty: usize,
    /// Occupied-slot count the table itself records
    pub recorded_active: usize,
}

impl TableReport {
    pub fn consistent(&self) -> bool {
        self.used + self.empty == self.capacity && self.used == self.recorded_active
    }
}

/// Pid as printed by the dumps: `-1` for the retired marker
struct PidLabel(Pid);

impl fmt::Display for PidLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            NO_PID => f.write_str("-1"),
            pid => write!(f, "{}", pid),
        }
    }
}

/// Dump one PCB
pub fn write_pcb<W: Write>(out: &mut W, label: &str, pcb: Option<(PcbId, &Pcb)>) -> fmt::Result {
    let Some((id, pcb)) = pcb else {
        write!(out, "{} @ {:08x}: ", label, 0)?;
        return out.write_str(NULL_MARKER);
    };

    write!(out, "{} @ {:08x}: ", label, id.raw())?;
    write!(
        out,
        " pids {}/{} state {}",
        PidLabel(pcb.pid),
        PidLabel(pcb.ppid),
        StateLabel(pcb.state.as_raw())
    )?;
    write!(out, "\n event {} xit {}", pcb.event, pcb.exit_status)?;
    write!(
        out,
        " kids {} prio {} ticks {}",
        pcb.children, pcb.prio, pcb.ticks
    )?;
    writeln!(
        out,
        " context {:08x} stack {:08x}",
        pcb.context.unwrap_or(0),
        pcb.stack.map_or(0, |stack| stack.base)
    )
}

/// Dump a saved register context
pub fn write_context<W: Write>(
    out: &mut W,
    label: &str,
    context: Option<(Address, &Context)>,
) -> fmt::Result {
    let Some((addr, c)) = context else {
        write!(out, "{} @ {:08x}: ", label, 0)?;
        return out.write_str(NULL_MARKER);
    };

    write!(out, "{} @ {:08x}: ", label, addr)?;
    write!(out, "\n    r15 {:016x} r14 {:016x}\n    r13 {:016x} r12 {:016x}\n", c.r15, c.r14, c.r13, c.r12)?;
    write!(out, "    r11 {:016x} r10 {:016x}\n    r9  {:016x} r8  {:016x}\n", c.r11, c.r10, c.r9, c.r8)?;
    write!(out, "    rdx {:016x} rcx {:016x}\n    rbx {:016x} rax {:016x}\n", c.rdx, c.rcx, c.rbx, c.rax)?;
    write!(out, "    rdi {:016x} rsi {:016x}\n    rbp {:016x} rsp {:016x}\n", c.rdi, c.rsi, c.rbp, c.rsp)?;
    write!(out, "    vec {:016x} cod {:016x}\n    rip {:016x}\n", c.vector, c.code, c.rip)?;
    writeln!(out, "    cs {:08x} rfl {:08x} ss {:08x}", c.cs, c.rflags, c.ss)
}

fn write_priority<W: Write>(out: &mut W, prio: Priority, max_priority: Priority) -> fmt::Result {
    if prio <= max_priority {
        write!(out, " pr {}", prio)
    } else {
        write!(out, " pr ?({})", prio)
    }
}

/// Dump the occupied table slots
///
/// Verbose output puts one process per line with its stack; otherwise the
/// entries are comma-separated on a single line.
pub fn write_table<W: Write>(
    out: &mut W,
    label: Option<&str>,
    verbose: bool,
    table: &ProcessTable,
    arena: &PcbArena,
    max_priority: Priority,
) -> Result<TableReport, fmt::Error> {
    if let Some(label) = label {
        writeln!(out, "{}:", label)?;
    }

    let mut used = 0;
    let mut empty = 0;

    for (slot, entry) in table.slots() {
        let Some(id) = entry else {
            empty += 1;
            continue;
        };

        if !verbose && used > 0 {
            out.write_char(',')?;
        }

        match arena.get(id) {
            Some(pcb) => {
                write!(out, " #{}: {}/{}", slot, PidLabel(pcb.pid), PidLabel(pcb.ppid))?;
                write!(out, " {}", StateLabel(pcb.state.as_raw()))?;
                write_priority(out, pcb.prio, max_priority)?;
                if verbose {
                    let (base, len) = pcb.stack.map_or((0, 0), |stack| (stack.base, stack.len));
                    writeln!(out, " stk {:016x} len {}", base, len)?;
                }
            }
            None => {
                write!(out, " #{}: {} ???", slot, id)?;
                if verbose {
                    out.write_char('\n')?;
                }
            }
        }
        used += 1;
    }

    if !verbose {
        out.write_char('\n')?;
    }

    let report = TableReport {
        capacity: table.capacity(),
        used,
        empty,
        recorded_active: table.used(),
    };

    if !report.consistent() {
        if report.used + report.empty != report.capacity {
            writeln!(
                out,
                "Table size {}, used {} + empty {} = {}???",
                report.capacity,
                report.used,
                report.empty,
                report.used + report.empty
            )?;
        }
        if report.used != report.recorded_active {
            writeln!(
                out,
                "Table records {} active, counted {}???",
                report.recorded_active, report.used
            )?;
        }
        warn!(
            capacity = report.capacity,
            used = report.used,
            empty = report.empty,
            recorded = report.recorded_active,
            "process table accounting mismatch"
        );
    }

    Ok(report)
}

impl PcbSubsystem {
    /// Dump one PCB; `None` or a stale handle prints the null marker
    pub fn dump_pcb<W: Write>(&self, out: &mut W, label: &str, id: Option<PcbId>) -> fmt::Result {
        let pcb = id.and_then(|id| self.pcb(id).map(|pcb| (id, pcb)));
        write_pcb(out, label, pcb)
    }

    /// Dump a saved register context
    pub fn dump_context<W: Write>(
        out: &mut W,
        label: &str,
        context: Option<(Address, &Context)>,
    ) -> fmt::Result {
        write_context(out, label, context)
    }

    /// Dump the process table
    pub fn dump_table<W: Write>(
        &self,
        out: &mut W,
        label: Option<&str>,
        verbose: bool,
    ) -> Result<TableReport, fmt::Error> {
        write_table(
            out,
            label,
            verbose,
            self.table(),
            self.arena(),
            self.config().max_priority,
        )
    }
}
