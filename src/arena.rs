//! Slot arena used as node storage for the recency list.
//!
//! Values live in a growable `Vec` of slots and are addressed by [`SlotId`],
//! a slot index paired with the slot's generation. Freed slots go on a free
//! list and are reused by later inserts; every time a slot is vacated its
//! generation is bumped, so an id that referred to the previous occupant no
//! longer resolves.
//!
//! ```text
//!   slots                                   free_list
//!   ┌─────┬─────┬────────────────────┐      ┌───┐
//!   │ idx │ gen │ value              │      │ 1 │
//!   ├─────┼─────┼────────────────────┤      └───┘
//!   │  0  │  0  │ Some(A)            │
//!   │  1  │  1  │ None   (vacated)   │
//!   │  2  │  0  │ Some(C)            │
//!   └─────┴─────┴────────────────────┘
//! ```
//!
//! All operations are O(1) except [`SlotArena::clear`], which is O(slots).

/// Stable handle to a slot in a [`SlotArena`].
///
/// Valid only while the slot it was issued for is still occupied by the same
/// value. Once the value is removed the id goes stale for good, even if the
/// slot is reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotId {
    index: usize,
    generation: u64,
}

impl SlotId {
    /// Returns the slot index this id refers to.
    #[inline]
    pub fn index(self) -> usize {
        self.index
    }

    /// Returns the generation of the slot at the time the id was issued.
    #[inline]
    pub fn generation(self) -> u64 {
        self.generation
    }
}

#[derive(Debug)]
struct Slot<T> {
    generation: u64,
    value: Option<T>,
}

/// Growable slot storage with free-list reuse and generation-checked ids.
#[derive(Debug)]
pub struct SlotArena<T> {
    slots: Vec<Slot<T>>,
    free_list: Vec<usize>,
    len: usize,
}

impl<T> SlotArena<T> {
    /// Creates an empty arena.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_list: Vec::new(),
            len: 0,
        }
    }

    /// Creates an empty arena with room for `capacity` values before the
    /// slot vector reallocates.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free_list: Vec::new(),
            len: 0,
        }
    }

    /// Stores `value` in a free slot (or a new one) and returns its id.
    pub fn insert(&mut self, value: T) -> SlotId {
        if let Some(index) = self.free_list.pop() {
            let slot = &mut self.slots[index];
            debug_assert!(slot.value.is_none(), "free list points at a live slot");
            slot.value = Some(value);
            self.len += 1;
            return SlotId {
                index,
                generation: slot.generation,
            };
        }

        self.slots.push(Slot {
            generation: 0,
            value: Some(value),
        });
        self.len += 1;
        SlotId {
            index: self.slots.len() - 1,
            generation: 0,
        }
    }

    /// Removes and returns the value behind `id`.
    ///
    /// Returns `None` without touching the arena if `id` is stale.
    pub fn remove(&mut self, id: SlotId) -> Option<T> {
        let slot = self.slots.get_mut(id.index)?;
        if slot.generation != id.generation {
            return None;
        }
        let value = slot.value.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free_list.push(id.index);
        self.len -= 1;
        Some(value)
    }

    /// Returns a reference to the value behind `id`, if it is live.
    #[inline]
    pub fn get(&self, id: SlotId) -> Option<&T> {
        self.slots
            .get(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.value.as_ref())
    }

    /// Returns a mutable reference to the value behind `id`, if it is live.
    #[inline]
    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        self.slots
            .get_mut(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.value.as_mut())
    }

    /// Returns `true` if `id` refers to a live value.
    #[inline]
    pub fn contains(&self, id: SlotId) -> bool {
        self.get(id).is_some()
    }

    /// Returns the number of live values.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the arena holds no live values.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of slots the arena can hold without reallocating.
    pub fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    /// Drops every live value and marks all slots free.
    ///
    /// Slot generations survive the reset, so ids issued before the call stay
    /// stale afterwards.
    pub fn clear(&mut self) {
        self.free_list.clear();
        // Reverse order so the lowest indices are handed out first.
        for (index, slot) in self.slots.iter_mut().enumerate().rev() {
            if slot.value.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
            }
            self.free_list.push(index);
        }
        self.len = 0;
    }

    /// Iterates over live `(SlotId, &T)` pairs in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (SlotId, &T)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.value.as_ref().map(|value| {
                (
                    SlotId {
                        index,
                        generation: slot.generation,
                    },
                    value,
                )
            })
        })
    }
}

impl<T> Default for SlotArena<T> {
    fn default() -> Self {
        Self::new()
    }
}
