/*!
 * End-to-End Scenarios
 * Table capacity, block reuse and empty-table diagnostics
 */

use pcb_kernel::{
    PcbConfig, PcbError, PcbId, PcbSubsystem, ProcessState, TableReport, NO_PID,
};
use pretty_assertions::assert_eq;

fn subsystem() -> PcbSubsystem {
    PcbSubsystem::builder()
        .with_config(PcbConfig::compact())
        .build()
}

#[test]
fn test_full_table_of_four() {
    let mut pcbs = subsystem();
    let mut ids = Vec::new();
    for pid in [10, 11, 12, 13] {
        let id = pcbs.allocate_pcb();
        let pcb = pcbs.pcb_mut(id).unwrap();
        pcb.pid = pid;
        pcb.ppid = pid - 9;
        pcbs.register_pcb(id).unwrap();
        ids.push(id);
    }

    let found = pcbs.find_by_pid(12).unwrap();
    assert_eq!(found, ids[2]);
    assert_eq!(pcbs.pcb(found).unwrap().ppid, 3);

    let extra = pcbs.allocate_pcb();
    pcbs.pcb_mut(extra).unwrap().pid = 14;
    assert_eq!(
        pcbs.register_pcb(extra),
        Err(PcbError::TableFull { capacity: 4 })
    );

    // the caller owns the failed creation and releases the block
    pcbs.release_pcb(extra).unwrap();
    assert_eq!(pcbs.pool_size(), 1);
    assert_eq!(pcbs.active_count(), 4);
}

#[test]
fn test_released_block_comes_back_clean() {
    let mut pcbs = subsystem();
    let id = pcbs.allocate_pcb();
    {
        let pcb = pcbs.pcb_mut(id).unwrap();
        pcb.pid = 42;
        pcb.ppid = 7;
        pcb.state = ProcessState::Zombie;
        pcb.exit_status = 3;
        pcb.ticks = 99;
        pcb.event = 5;
    }

    pcbs.release_pcb(id).unwrap();
    let pooled = pcbs.pcb(id).unwrap();
    assert_eq!(pooled.pid, NO_PID);
    assert_eq!(pooled.ppid, NO_PID);

    let again: PcbId = pcbs.allocate_pcb();
    assert_eq!(again, id);
    let pcb = pcbs.pcb(again).unwrap();
    assert_eq!(pcb.state, ProcessState::New);
    assert_eq!((pcb.pid, pcb.ppid), (0, 0));
    assert_eq!((pcb.exit_status, pcb.ticks, pcb.event), (0, 0, 0));
}

#[test]
fn test_empty_table_dump() {
    let pcbs = subsystem();
    let mut out = String::new();
    let report = pcbs.dump_table(&mut out, None, false).unwrap();

    assert_eq!(
        report,
        TableReport {
            capacity: 4,
            used: 0,
            empty: 4,
            recorded_active: 0
        }
    );
    assert!(report.consistent());
    assert_eq!(out, "\n");
}
