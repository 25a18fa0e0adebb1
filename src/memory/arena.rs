/*!
 * PCB Arena
 * Index-addressed storage for PCB records
 */

use crate::core::types::PcbId;
use crate::process::types::Pcb;

/// Backing storage for every PCB block the raw allocator has handed out
///
/// A slot is `Some` from the moment its block is allocated until the block
/// goes back to the raw allocator, whether the PCB is live or pooled.
#[derive(Debug, Default)]
pub struct PcbArena {
    slots: Vec<Option<Pcb>>,
}

impl PcbArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Zero the block and mark it `New`, installing it if it was vacant
    pub fn reset(&mut self, id: PcbId) -> &mut Pcb {
        let index = id.index();
        if index >= self.slots.len() {
            self.slots.resize_with(index + 1, || None);
        }
        self.slots[index].insert(Pcb::fresh())
    }

    /// Remove a block that is going back to the raw allocator
    pub fn evict(&mut self, id: PcbId) -> Option<Pcb> {
        self.slots.get_mut(id.index()).and_then(Option::take)
    }

    #[inline]
    pub fn get(&self, id: PcbId) -> Option<&Pcb> {
        self.slots.get(id.index()).and_then(Option::as_ref)
    }

    #[inline]
    pub fn get_mut(&mut self, id: PcbId) -> Option<&mut Pcb> {
        self.slots.get_mut(id.index()).and_then(Option::as_mut)
    }

    #[inline]
    pub fn contains(&self, id: PcbId) -> bool {
        self.get(id).is_some()
    }

    /// Blocks currently held (live or pooled)
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over every held block
    pub fn iter(&self) -> impl Iterator<Item = (PcbId, &Pcb)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|pcb| (PcbId::new(index as u32), pcb)))
    }
}
