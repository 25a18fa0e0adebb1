/*!
 * Diagnostics Tests
 * Console dumps through the subsystem
 */

use pcb_kernel::{Context, PcbConfig, PcbId, PcbSubsystem, ProcessState, SpawnRequest};
use pretty_assertions::assert_eq;

fn compact() -> PcbSubsystem {
    PcbSubsystem::builder()
        .with_config(PcbConfig::compact())
        .build()
}

#[test]
fn test_dump_pcb_null_marker() {
    let pcbs = compact();
    let mut out = String::new();
    pcbs.dump_pcb(&mut out, "none", None).unwrap();
    pcbs.dump_pcb(&mut out, "stale", Some(PcbId::new(3))).unwrap();
    assert_eq!(
        out,
        "none @ 00000000:  NULL???\nstale @ 00000000:  NULL???\n"
    );
}

#[test]
fn test_dump_context_null_marker() {
    let mut out = String::new();
    PcbSubsystem::dump_context(&mut out, "ctx", None).unwrap();
    assert_eq!(out, "ctx @ 00000000:  NULL???\n");
}

#[test]
fn test_dump_context_registers() {
    let context = Context {
        r15: 0xf,
        rax: 0xa,
        cs: 0x8,
        ..Context::default()
    };
    let mut out = String::new();
    PcbSubsystem::dump_context(&mut out, "ctx", Some((0x7000, &context))).unwrap();
    assert!(out.contains("r15 000000000000000f"));
    assert!(out.contains("rax 000000000000000a"));
    assert!(out.contains("cs 00000008"));
}

#[test]
fn test_dump_live_pcb() {
    let mut pcbs = compact();
    let id = pcbs.spawn(SpawnRequest::new(1)).unwrap();
    pcbs.pcb_mut(id).unwrap().state = ProcessState::Running;

    let mut out = String::new();
    pcbs.dump_pcb(&mut out, "current", Some(id)).unwrap();
    assert!(out.starts_with("current @ 00000000:  pids 100/1 state RUN\n"));
}

#[test]
fn test_dump_table_one_line_per_process() {
    let mut pcbs = compact();
    pcbs.spawn(SpawnRequest::new(1)).unwrap();
    pcbs.spawn(SpawnRequest::new(100).with_prio(2)).unwrap();

    let mut out = String::new();
    let report = pcbs.dump_table(&mut out, Some("active"), false).unwrap();
    assert_eq!(out, "active:\n #0: 100/1 NEW pr 1, #1: 101/100 NEW pr 2\n");
    assert_eq!(report.used, 2);
    assert_eq!(report.empty, 2);
    assert!(report.consistent());
}

#[test]
fn test_dump_table_out_of_range_priority() {
    let mut pcbs = compact();
    let id = pcbs.spawn(SpawnRequest::new(1)).unwrap();
    pcbs.pcb_mut(id).unwrap().prio = 200;

    let mut out = String::new();
    pcbs.dump_table(&mut out, None, false).unwrap();
    assert_eq!(out, " #0: 100/1 NEW pr ?(200)\n");
}
