//! Object ID generation with generational slot reuse

use crate::types::{ObjectHandle, ObjectId};
use parking_lot::Mutex;

#[derive(Debug, Default)]
struct Slots {
    /// Current generation of every slot ever handed out
    generations: Vec<u32>,
    /// Whether the slot is currently allocated
    live: Vec<bool>,
    /// Released slots waiting for reuse
    free: Vec<u32>,
}

/// Thread-safe generational ID generator
///
/// Releasing a handle bumps its slot generation, so every handle issued
/// before the release compares unequal to handles issued afterwards.
pub struct IdGenerator {
    slots: Mutex<Slots>,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self {
            slots: Mutex::new(Slots::default()),
        }
    }

    /// Allocate a fresh handle, reusing released slots first
    pub fn allocate(&self) -> ObjectHandle {
        let mut slots = self.slots.lock();
        if let Some(index) = slots.free.pop() {
            slots.live[index as usize] = true;
            let generation = slots.generations[index as usize];
            return ObjectHandle::new(ObjectId::new(index), generation);
        }

        let index = slots.generations.len() as u32;
        slots.generations.push(0);
        slots.live.push(true);
        ObjectHandle::new(ObjectId::new(index), 0)
    }

    /// Release a handle. Returns `false` if the handle was already stale.
    pub fn release(&self, handle: ObjectHandle) -> bool {
        let mut slots = self.slots.lock();
        let index = handle.id.get() as usize;
        if !Self::is_current(&slots, handle) {
            return false;
        }

        slots.generations[index] = slots.generations[index].wrapping_add(1);
        slots.live[index] = false;
        slots.free.push(handle.id.get());
        true
    }

    /// Whether the handle still names a live slot
    pub fn is_live(&self, handle: ObjectHandle) -> bool {
        Self::is_current(&self.slots.lock(), handle)
    }

    /// Number of live handles
    pub fn live_count(&self) -> usize {
        self.slots.lock().live.iter().filter(|live| **live).count()
    }

    fn is_current(slots: &Slots, handle: ObjectHandle) -> bool {
        let index = handle.id.get() as usize;
        index < slots.generations.len()
            && slots.live[index]
            && slots.generations[index] == handle.generation
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
