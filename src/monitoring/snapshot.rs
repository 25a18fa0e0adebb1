/*!
 * Table Snapshot
 * Structured, serializable view of the active processes
 */

use crate::core::types::{PcbId, Pid, Priority, StackRef};
use crate::process::manager::{PcbSubsystem, SubsystemStats};
use crate::process::types::ProcessState;
use serde::Serialize;

/// One occupied table slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessEntry {
    pub slot: usize,
    pub id: PcbId,
    pub pid: Pid,
    pub ppid: Pid,
    pub state: ProcessState,
    /// Event being waited on, present while blocked
    pub event: Option<u32>,
    /// Exit status, present once terminated
    pub exit_status: Option<i32>,
    pub prio: Priority,
    pub children: u32,
    pub ticks: u32,
    pub stack: Option<StackRef>,
}

/// Point-in-time copy of the process table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableSnapshot {
    pub stats: SubsystemStats,
    pub init: Option<PcbId>,
    pub processes: Vec<ProcessEntry>,
}

impl TableSnapshot {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl PcbSubsystem {
    pub fn snapshot(&self) -> TableSnapshot {
        let processes = self
            .table()
            .iter()
            .filter_map(|(slot, id)| {
                self.pcb(id).map(|pcb| ProcessEntry {
                    slot,
                    id,
                    pid: pcb.pid,
                    ppid: pcb.ppid,
                    state: pcb.state,
                    event: pcb.state.is_blocked().then_some(pcb.event),
                    exit_status: pcb.state.is_terminal().then_some(pcb.exit_status),
                    prio: pcb.prio,
                    children: pcb.children,
                    ticks: pcb.ticks,
                    stack: pcb.stack,
                })
            })
            .collect();

        TableSnapshot {
            stats: self.stats(),
            init: self.init_process(),
            processes,
        }
    }
}
