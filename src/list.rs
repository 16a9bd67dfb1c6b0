//! Recency-ordered doubly linked list backed by a [`SlotArena`].
//!
//! Nodes are stored in the arena and linked by [`SlotId`] instead of by
//! pointer, so `prev`/`next` are plain optional indices and the list contains
//! no `unsafe` code. The front of the list is the most recently used node and
//! the back is the least recently used one.
//!
//! ```text
//!   arena (SlotArena<Node<T>>)
//!   ┌────────┬─────────────────────────────────────────────┐
//!   │ SlotId │ Node { value, prev, next }                  │
//!   ├────────┼─────────────────────────────────────────────┤
//!   │ id_1   │ { value: A, prev: None, next: Some(id_2) }  │
//!   │ id_2   │ { value: B, prev: Some(id_1), next: id_3 }  │
//!   │ id_3   │ { value: C, prev: Some(id_2), next: None }  │
//!   └────────┴─────────────────────────────────────────────┘
//!
//!   head ─► [id_1] ◄──► [id_2] ◄──► [id_3] ◄── tail
//! ```
//!
//! Callers hold [`NodeHandle`]s. A handle remembers which list issued it, so
//! passing a handle to a different list, or reusing one after its node was
//! removed, is rejected instead of corrupting the links.
//!
//! | Operation | Cost |
//! |-----------|------|
//! | `push_front` / `push_back` | O(1) |
//! | `remove` / `pop_back` | O(1) |
//! | `move_to_front` | O(1) |
//! | `iter` / `check_invariants` | O(n) |

use core::sync::atomic::{AtomicUsize, Ordering};

use crate::arena::{SlotArena, SlotId};
use crate::error::InvariantError;

static NEXT_LIST_ID: AtomicUsize = AtomicUsize::new(0);

/// Non-owning handle to a node in a [`List`].
///
/// Handles are `Copy` and cheap to store in an index. They never keep a node
/// alive: once the node is removed the handle stops resolving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeHandle {
    list: usize,
    slot: SlotId,
}

#[derive(Debug)]
struct Node<T> {
    value: T,
    prev: Option<SlotId>,
    next: Option<SlotId>,
}

/// A doubly linked list whose nodes live in a slot arena.
///
/// # Examples
///
/// ```
/// use lru_arena::list::List;
///
/// let mut list = List::new();
/// let a = list.push_front("a");
/// let b = list.push_front("b");
/// assert_eq!(list.front(), Some(b));
/// assert_eq!(list.back(), Some(a));
///
/// list.move_to_front(a);
/// assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec!["a", "b"]);
///
/// assert_eq!(list.remove(b), Some("b"));
/// assert_eq!(list.len(), 1);
/// ```
#[derive(Debug)]
pub struct List<T> {
    id: usize,
    arena: SlotArena<Node<T>>,
    head: Option<SlotId>,
    tail: Option<SlotId>,
}

impl<T> List<T> {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::construct(SlotArena::new())
    }

    /// Creates an empty list with node storage reserved for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::construct(SlotArena::with_capacity(capacity))
    }

    fn construct(arena: SlotArena<Node<T>>) -> Self {
        List {
            id: NEXT_LIST_ID.fetch_add(1, Ordering::Relaxed),
            arena,
            head: None,
            tail: None,
        }
    }

    /// Returns the number of nodes in the list.
    #[inline]
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    /// Returns `true` if the list has no nodes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Returns the handle of the front (most recently used) node.
    #[inline]
    pub fn front(&self) -> Option<NodeHandle> {
        self.head.map(|slot| self.handle(slot))
    }

    /// Returns the handle of the back (least recently used) node.
    #[inline]
    pub fn back(&self) -> Option<NodeHandle> {
        self.tail.map(|slot| self.handle(slot))
    }

    /// Returns `true` if `handle` refers to a live node of this list.
    #[inline]
    pub fn contains(&self, handle: NodeHandle) -> bool {
        self.resolve(handle).is_some()
    }

    /// Returns the value stored in the node, if the handle is live.
    pub fn get(&self, handle: NodeHandle) -> Option<&T> {
        let slot = self.resolve(handle)?;
        self.arena.get(slot).map(|node| &node.value)
    }

    /// Returns a mutable reference to the value stored in the node.
    ///
    /// The node keeps its position; only the value changes.
    pub fn get_mut(&mut self, handle: NodeHandle) -> Option<&mut T> {
        let slot = self.resolve(handle)?;
        self.arena.get_mut(slot).map(|node| &mut node.value)
    }

    /// Inserts `value` as the new front node and returns its handle.
    pub fn push_front(&mut self, value: T) -> NodeHandle {
        let slot = self.arena.insert(Node {
            value,
            prev: None,
            next: self.head,
        });
        match self.head.and_then(|head| self.arena.get_mut(head)) {
            Some(old_head) => old_head.prev = Some(slot),
            None => self.tail = Some(slot),
        }
        self.head = Some(slot);
        self.handle(slot)
    }

    /// Inserts `value` as the new back node and returns its handle.
    pub fn push_back(&mut self, value: T) -> NodeHandle {
        let slot = self.arena.insert(Node {
            value,
            prev: self.tail,
            next: None,
        });
        match self.tail.and_then(|tail| self.arena.get_mut(tail)) {
            Some(old_tail) => old_tail.next = Some(slot),
            None => self.head = Some(slot),
        }
        self.tail = Some(slot);
        self.handle(slot)
    }

    /// Unlinks the node from wherever it sits, frees it and returns its value.
    ///
    /// Returns `None` and leaves the list untouched if the handle was issued
    /// by another list or its node has already been removed.
    pub fn remove(&mut self, handle: NodeHandle) -> Option<T> {
        let slot = self.resolve(handle)?;
        self.detach(slot)?;
        self.arena.remove(slot).map(|node| node.value)
    }

    /// Removes and returns the back (least recently used) value.
    pub fn pop_back(&mut self) -> Option<T> {
        let slot = self.tail?;
        self.detach(slot)?;
        self.arena.remove(slot).map(|node| node.value)
    }

    /// Relinks an existing node at the front, keeping its value and handle.
    ///
    /// Returns `false` if the handle does not refer to a live node of this
    /// list.
    pub fn move_to_front(&mut self, handle: NodeHandle) -> bool {
        let Some(slot) = self.resolve(handle) else {
            return false;
        };
        if self.head == Some(slot) {
            return true;
        }
        self.detach(slot);
        self.attach_front(slot);
        true
    }

    /// Drops every node. Handles issued before the call no longer resolve.
    pub fn clear(&mut self) {
        self.arena.clear();
        self.head = None;
        self.tail = None;
    }

    /// Iterates over values from front to back.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            current: self.head,
            remaining: self.len(),
        }
    }

    /// Walks the list and verifies the link structure.
    ///
    /// Checks that an empty list has neither head nor tail, that every
    /// `prev` link mirrors the `next` link pointing at it, and that following
    /// `next` from the head visits exactly `len()` nodes and ends at the tail.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        let len = self.len();
        match (self.head, self.tail) {
            (None, None) if len == 0 => return Ok(()),
            (None, None) => {
                return Err(InvariantError::new(format!(
                    "list has no head or tail but holds {len} nodes"
                )))
            }
            (Some(_), Some(_)) if len > 0 => {}
            _ => {
                return Err(InvariantError::new(format!(
                    "head/tail presence mismatch for list of {len} nodes"
                )))
            }
        }

        let mut visited = 0usize;
        let mut prev = None;
        let mut current = self.head;
        while let Some(slot) = current {
            visited += 1;
            if visited > len {
                return Err(InvariantError::new(format!(
                    "walk from head exceeded len {len}; links form a cycle"
                )));
            }
            let node = self
                .arena
                .get(slot)
                .ok_or_else(|| InvariantError::new("link points at a vacant slot"))?;
            if node.prev != prev {
                return Err(InvariantError::new(format!(
                    "node at slot {} has a prev link that does not mirror its predecessor",
                    slot.index()
                )));
            }
            prev = Some(slot);
            current = node.next;
        }

        if visited != len {
            return Err(InvariantError::new(format!(
                "walk from head visited {visited} nodes, len is {len}"
            )));
        }
        if prev != self.tail {
            return Err(InvariantError::new("walk from head did not end at tail"));
        }
        Ok(())
    }

    #[inline]
    fn handle(&self, slot: SlotId) -> NodeHandle {
        NodeHandle {
            list: self.id,
            slot,
        }
    }

    #[inline]
    fn resolve(&self, handle: NodeHandle) -> Option<SlotId> {
        (handle.list == self.id && self.arena.contains(handle.slot)).then_some(handle.slot)
    }

    fn detach(&mut self, slot: SlotId) -> Option<()> {
        let (prev, next) = {
            let node = self.arena.get(slot)?;
            (node.prev, node.next)
        };

        match prev.and_then(|prev| self.arena.get_mut(prev)) {
            Some(prev_node) => prev_node.next = next,
            None => self.head = next,
        }
        match next.and_then(|next| self.arena.get_mut(next)) {
            Some(next_node) => next_node.prev = prev,
            None => self.tail = prev,
        }

        let node = self.arena.get_mut(slot)?;
        node.prev = None;
        node.next = None;
        Some(())
    }

    fn attach_front(&mut self, slot: SlotId) -> Option<()> {
        let old_head = self.head;
        let node = self.arena.get_mut(slot)?;
        node.prev = None;
        node.next = old_head;

        match old_head.and_then(|head| self.arena.get_mut(head)) {
            Some(head_node) => head_node.prev = Some(slot),
            None => self.tail = Some(slot),
        }
        self.head = Some(slot);
        Some(())
    }
}

impl<T> Default for List<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Front-to-back iterator over the values of a [`List`].
#[derive(Debug)]
pub struct Iter<'a, T> {
    list: &'a List<T>,
    current: Option<SlotId>,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let slot = self.current?;
        let node = self.list.arena.get(slot)?;
        self.current = node.next;
        self.remaining = self.remaining.saturating_sub(1);
        Some(&node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> IntoIterator for &'a List<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
