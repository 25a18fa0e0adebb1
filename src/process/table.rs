/*!
 * Process Table
 * Fixed-capacity registry of active PCBs
 *
 * Every operation is a linear scan over the slots. Slot position carries
 * no meaning beyond being a bounded place to look.
 */

use crate::core::errors::{PcbError, PcbResult};
use crate::core::types::{PcbId, Pid};
use crate::memory::arena::PcbArena;
use crate::process::types::Pcb;
use tracing::{debug, warn};

/// Active-process table
#[derive(Debug, Clone)]
pub struct ProcessTable {
    slots: Box<[Option<PcbId>]>,
    /// Occupied slot count; must always match the slots themselves
    pub(crate) active: usize,
}

impl ProcessTable {
    /// Create a cleared table
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity].into_boxed_slice(),
            active: 0,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Recorded number of occupied slots
    #[inline]
    pub fn used(&self) -> usize {
        self.active
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.active >= self.capacity()
    }

    /// Empty every slot
    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = None);
        self.active = 0;
    }

    /// Slot holding this exact block, if registered
    pub fn slot_of(&self, id: PcbId) -> Option<usize> {
        self.slots.iter().position(|slot| *slot == Some(id))
    }

    #[inline]
    pub fn contains(&self, id: PcbId) -> bool {
        self.slot_of(id).is_some()
    }

    /// Raw slot contents in slot order
    pub fn slots(&self) -> impl Iterator<Item = (usize, Option<PcbId>)> + '_ {
        self.slots.iter().copied().enumerate()
    }

    /// Occupied slots in slot order
    pub fn iter(&self) -> impl Iterator<Item = (usize, PcbId)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(slot, entry)| entry.map(|id| (slot, id)))
    }

    /// First occupant matching `pred`
    fn find(&self, arena: &PcbArena, pred: impl Fn(&Pcb) -> bool) -> Option<PcbId> {
        self.iter()
            .map(|(_, id)| id)
            .find(|id| arena.get(*id).is_some_and(&pred))
    }

    /// Locate the PCB with this pid
    pub fn find_by_pid(&self, arena: &PcbArena, pid: Pid) -> Option<PcbId> {
        self.find(arena, |pcb| pcb.pid == pid)
    }

    /// Locate any one PCB whose parent is `ppid`
    ///
    /// Only the first match in slot order is returned.
    pub fn find_by_ppid(&self, arena: &PcbArena, ppid: Pid) -> Option<PcbId> {
        self.find(arena, |pcb| pcb.ppid == ppid)
    }

    /// Insert a live PCB into the first empty slot
    pub fn register(&mut self, arena: &PcbArena, id: PcbId) -> PcbResult<usize> {
        let pcb = match arena.get(id) {
            Some(pcb) if pcb.is_live() => pcb,
            _ => return Err(PcbError::InvalidHandle(id)),
        };

        let mut free_slot = None;
        for (slot, entry) in self.slots.iter().enumerate() {
            match entry {
                Some(existing) if *existing == id => {
                    return Err(PcbError::AlreadyRegistered(id));
                }
                Some(existing) => {
                    if arena.get(*existing).is_some_and(|other| other.pid == pcb.pid) {
                        return Err(PcbError::DuplicatePid(pcb.pid));
                    }
                }
                None => {
                    free_slot.get_or_insert(slot);
                }
            }
        }

        let Some(slot) = free_slot else {
            warn!(%id, pid = pcb.pid, capacity = self.capacity(), "process table full");
            return Err(PcbError::TableFull {
                capacity: self.capacity(),
            });
        };

        self.slots[slot] = Some(id);
        self.active += 1;
        debug!(%id, pid = pcb.pid, slot, "registered PCB");
        Ok(slot)
    }

    /// Clear the slot holding this exact block
    pub fn unregister(&mut self, id: PcbId) -> PcbResult<usize> {
        let slot = self.slot_of(id).ok_or(PcbError::NotRegistered(id))?;
        self.slots[slot] = None;
        self.active -= 1;
        debug!(%id, slot, "unregistered PCB");
        Ok(slot)
    }
}
