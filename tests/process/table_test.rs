/*!
 * Process Table Tests
 * Registration, lookup and slot accounting through the subsystem
 */

use pcb_kernel::{PcbConfig, PcbError, PcbId, PcbSubsystem, Pid};
use pretty_assertions::assert_eq;

fn subsystem(max_procs: usize) -> PcbSubsystem {
    PcbSubsystem::builder()
        .with_config(PcbConfig::compact().with_max_procs(max_procs))
        .build()
}

fn live(pcbs: &mut PcbSubsystem, pid: Pid, ppid: Pid) -> PcbId {
    let id = pcbs.allocate_pcb();
    let pcb = pcbs.pcb_mut(id).unwrap();
    pcb.pid = pid;
    pcb.ppid = ppid;
    id
}

#[test]
fn test_register_and_find() {
    let mut pcbs = subsystem(4);
    let a = live(&mut pcbs, 10, 1);
    let b = live(&mut pcbs, 11, 10);

    assert_eq!(pcbs.register_pcb(a).unwrap(), 0);
    assert_eq!(pcbs.register_pcb(b).unwrap(), 1);
    assert_eq!(pcbs.active_count(), 2);

    assert_eq!(pcbs.find_by_pid(11), Some(b));
    assert_eq!(pcbs.find_by_ppid(10), Some(b));
    assert_eq!(pcbs.find_by_pid(12), None);
}

#[test]
fn test_unregistered_pcb_is_not_found() {
    let mut pcbs = subsystem(4);
    let a = live(&mut pcbs, 10, 1);
    assert_eq!(pcbs.find_by_pid(10), None);

    pcbs.register_pcb(a).unwrap();
    pcbs.unregister_pcb(a).unwrap();
    assert_eq!(pcbs.find_by_pid(10), None);
    assert_eq!(pcbs.active_count(), 0);
}

#[test]
fn test_unregister_missing_pcb() {
    let mut pcbs = subsystem(4);
    let a = live(&mut pcbs, 10, 1);
    assert_eq!(pcbs.unregister_pcb(a), Err(PcbError::NotRegistered(a)));
}

#[test]
fn test_find_by_ppid_returns_a_single_child() {
    let mut pcbs = subsystem(4);
    let children: Vec<PcbId> = (0..3).map(|n| live(&mut pcbs, 20 + n, 7)).collect();
    for id in &children {
        pcbs.register_pcb(*id).unwrap();
    }

    assert_eq!(pcbs.find_by_ppid(7), Some(children[0]));
    pcbs.unregister_pcb(children[0]).unwrap();
    assert_eq!(pcbs.find_by_ppid(7), Some(children[1]));
}

#[test]
fn test_duplicate_pid_rejected() {
    let mut pcbs = subsystem(4);
    let a = live(&mut pcbs, 10, 1);
    let twin = live(&mut pcbs, 10, 1);
    pcbs.register_pcb(a).unwrap();

    assert_eq!(pcbs.register_pcb(twin), Err(PcbError::DuplicatePid(10)));
    assert_eq!(pcbs.register_pcb(a), Err(PcbError::AlreadyRegistered(a)));
}

#[test]
fn test_slot_reuse_after_unregister() {
    let mut pcbs = subsystem(2);
    let a = live(&mut pcbs, 10, 1);
    let b = live(&mut pcbs, 11, 1);
    let c = live(&mut pcbs, 12, 1);

    pcbs.register_pcb(a).unwrap();
    pcbs.register_pcb(b).unwrap();
    assert_eq!(
        pcbs.register_pcb(c),
        Err(PcbError::TableFull { capacity: 2 })
    );

    pcbs.unregister_pcb(a).unwrap();
    assert_eq!(pcbs.register_pcb(c).unwrap(), 0);
    assert_eq!(pcbs.table().slot_of(b), Some(1));
}
