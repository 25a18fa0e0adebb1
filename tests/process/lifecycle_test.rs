/*!
 * Lifecycle Tests
 * Spawn, rollback, teardown and shutdown against a mocked stack allocator
 */

use mockall::mock;
use mockall::predicate::eq;
use pcb_kernel::{
    PcbConfig, PcbError, PcbSubsystem, ProcessState, SpawnRequest, StackAllocator, StackRef,
};
use pretty_assertions::assert_eq;

mock! {
    pub Stacks {}
    impl StackAllocator for Stacks {
        fn allocate(&mut self) -> Option<StackRef>;
        fn free(&mut self, stack: StackRef);
        fn prune(&mut self) -> usize;
    }
}

const STACK: StackRef = StackRef::new(0x0020_0000, 0x2000);

fn subsystem(max_procs: usize, stacks: MockStacks) -> PcbSubsystem {
    PcbSubsystem::builder()
        .with_config(PcbConfig::compact().with_max_procs(max_procs))
        .with_stack_allocator(stacks)
        .build()
}

#[test]
fn test_cleanup_frees_stack_exactly_once() {
    let mut stacks = MockStacks::new();
    stacks.expect_allocate().times(1).return_const(Some(STACK));
    stacks.expect_free().with(eq(STACK)).times(1).return_const(());

    let mut pcbs = subsystem(4, stacks);
    let id = pcbs.spawn(SpawnRequest::new(1)).unwrap();
    assert_eq!(pcbs.pcb(id).unwrap().stack, Some(STACK));

    pcbs.cleanup_pcb(id).unwrap();
    assert_eq!(pcbs.pool_size(), 1);
    assert_eq!(pcbs.pcb(id).unwrap().state, ProcessState::Unused);
}

#[test]
fn test_caller_supplied_stack_is_used() {
    let mut stacks = MockStacks::new();
    stacks.expect_allocate().times(0);
    stacks.expect_free().with(eq(STACK)).times(1).return_const(());

    let mut pcbs = subsystem(4, stacks);
    let id = pcbs.spawn(SpawnRequest::new(1).with_stack(STACK)).unwrap();
    assert_eq!(pcbs.pcb(id).unwrap().stack, Some(STACK));
    pcbs.cleanup_pcb(id).unwrap();
}

#[test]
fn test_spawn_rollback_returns_stack_and_block() {
    let mut stacks = MockStacks::new();
    stacks.expect_allocate().times(2).return_const(Some(STACK));
    stacks.expect_free().with(eq(STACK)).times(1).return_const(());

    let mut pcbs = subsystem(1, stacks);
    let first = pcbs.spawn(SpawnRequest::new(1)).unwrap();

    assert_eq!(
        pcbs.spawn(SpawnRequest::new(1)),
        Err(PcbError::TableFull { capacity: 1 })
    );
    assert_eq!(pcbs.active_count(), 1);
    assert_eq!(pcbs.pool_size(), 1);
    assert_eq!(pcbs.find_by_pid(100), Some(first));
    assert_eq!(pcbs.find_by_pid(101), None);
}

#[test]
fn test_spawn_without_stack() {
    let mut stacks = MockStacks::new();
    stacks.expect_allocate().times(1).return_const(None::<StackRef>);

    let mut pcbs = subsystem(4, stacks);
    assert_eq!(pcbs.spawn(SpawnRequest::new(1)), Err(PcbError::NoStack));
    assert_eq!(pcbs.active_count(), 0);
    assert_eq!(pcbs.stats().blocks_held, 0);
}

#[test]
fn test_cleanup_makes_pid_unfindable() {
    let mut pcbs = PcbSubsystem::builder()
        .with_config(PcbConfig::compact())
        .build();
    let id = pcbs.spawn(SpawnRequest::new(1)).unwrap();
    let pid = pcbs.pcb(id).unwrap().pid;

    pcbs.pcb_mut(id).unwrap().state = ProcessState::Zombie;
    pcbs.cleanup_pcb(id).unwrap();
    assert_eq!(pcbs.find_by_pid(pid), None);
}

#[test]
fn test_pids_are_never_reused_after_cleanup() {
    let mut pcbs = PcbSubsystem::builder()
        .with_config(PcbConfig::compact())
        .build();
    let first = pcbs.spawn(SpawnRequest::new(1)).unwrap();
    pcbs.cleanup_pcb(first).unwrap();

    let second = pcbs.spawn(SpawnRequest::new(1)).unwrap();
    assert_eq!(second, first);
    assert_eq!(pcbs.pcb(second).unwrap().pid, 101);
}

#[test]
fn test_reaping_children_brings_parent_back_to_zero() {
    let mut pcbs = PcbSubsystem::builder()
        .with_config(PcbConfig::compact())
        .build();
    let parent = pcbs.spawn(SpawnRequest::new(1)).unwrap();
    let parent_pid = pcbs.pcb(parent).unwrap().pid;
    let a = pcbs.spawn(SpawnRequest::new(parent_pid)).unwrap();
    let b = pcbs.spawn(SpawnRequest::new(parent_pid)).unwrap();
    assert_eq!(pcbs.pcb(parent).unwrap().children, 2);

    pcbs.cleanup_pcb(a).unwrap();
    pcbs.cleanup_pcb(b).unwrap();
    assert_eq!(pcbs.pcb(parent).unwrap().children, 0);

    // the slots are reused by a new child of the same parent
    pcbs.spawn(SpawnRequest::new(parent_pid)).unwrap();
    assert_eq!(pcbs.pcb(parent).unwrap().children, 1);
}

#[test]
fn test_orphan_cleanup_after_parent_is_gone() {
    let mut pcbs = PcbSubsystem::builder()
        .with_config(PcbConfig::compact())
        .build();
    let parent = pcbs.spawn(SpawnRequest::new(1)).unwrap();
    let parent_pid = pcbs.pcb(parent).unwrap().pid;
    let child = pcbs.spawn(SpawnRequest::new(parent_pid)).unwrap();

    pcbs.cleanup_pcb(parent).unwrap();
    let other = pcbs.spawn(SpawnRequest::new(1)).unwrap();
    assert_eq!(other, parent);

    // the recycled block holds a different pid and keeps its own count
    pcbs.cleanup_pcb(child).unwrap();
    assert_eq!(pcbs.pcb(other).unwrap().children, 0);
    assert_eq!(pcbs.active_count(), 1);
}

#[test]
fn test_shutdown_frees_live_stacks() {
    let mut stacks = MockStacks::new();
    stacks.expect_allocate().times(2).return_const(Some(STACK));
    stacks.expect_free().times(2).return_const(());
    stacks.expect_prune().times(1).return_const(0usize);

    let mut pcbs = subsystem(4, stacks);
    pcbs.spawn(SpawnRequest::new(1)).unwrap();
    let doomed = pcbs.spawn(SpawnRequest::new(1)).unwrap();
    pcbs.cleanup_pcb(doomed).unwrap();

    // the released block sits in the pool; the live one is handed back too
    assert_eq!(pcbs.shutdown(), pcb_kernel::core::limits::PCB_BLOCK_SIZE);
}
