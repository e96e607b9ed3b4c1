//! A min-priority queue over hashable keys with decrease-key support.
//!
//! `BinaryHeap` has no decrease-key, so re-prioritizing a key pushes a fresh
//! heap entry and records its generation in an auxiliary map. Entries whose
//! generation no longer matches the map are stale and skipped on pop.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};
use std::fmt::Debug;
use std::hash::Hash;

/// Heap entry. `order` is fixed when the key is first inserted and breaks
/// priority ties first-in first-out.
#[derive(Debug, Clone)]
struct Entry<K> {
    priority: f64,
    order: u64,
    generation: u64,
    key: K,
}

impl<K> PartialEq for Entry<K> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<K> Eq for Entry<K> {}

impl<K> Ord for Entry<K> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap
        other
            .priority
            .partial_cmp(&self.priority)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.order.cmp(&self.order))
    }
}

impl<K> PartialOrd for Entry<K> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug, Clone, Copy)]
struct Tracked {
    priority: f64,
    order: u64,
    generation: u64,
}

/// Pops the key with the smallest priority first.
#[derive(Debug, Clone)]
pub struct PriorityQueue<K: Eq + Hash + Clone> {
    heap: BinaryHeap<Entry<K>>,
    tracked: HashMap<K, Tracked>,
    next_order: u64,
    next_generation: u64,
}

impl<K: Eq + Hash + Clone + Debug> Default for PriorityQueue<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq + Hash + Clone + Debug> PriorityQueue<K> {
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            tracked: HashMap::new(),
            next_order: 0,
            next_generation: 0,
        }
    }

    /// Inserts `key` if absent, or lowers its priority if `priority` is
    /// strictly smaller than the stored one. Otherwise does nothing.
    ///
    /// Returns whether the queue changed.
    pub fn update(&mut self, key: K, priority: f64) -> bool {
        let order = match self.tracked.get(&key) {
            Some(tracked) if tracked.priority <= priority => return false,
            Some(tracked) => tracked.order,
            None => self.take_order(),
        };
        self.enqueue(key, priority, order);
        true
    }

    /// Removes and returns the key with the smallest priority.
    pub fn pop(&mut self) -> Option<K> {
        self.pop_with_priority().map(|(key, _)| key)
    }

    /// Like [`pop`](Self::pop), also returning the priority the key held.
    pub fn pop_with_priority(&mut self) -> Option<(K, f64)> {
        while let Some(entry) = self.heap.pop() {
            let live = matches!(
                self.tracked.get(&entry.key),
                Some(tracked) if tracked.generation == entry.generation
            );
            if live {
                self.tracked.remove(&entry.key);
                return Some((entry.key, entry.priority));
            }
        }
        None
    }

    /// Current priority of `key`, if it is pending.
    pub fn priority(&self, key: &K) -> Option<f64> {
        self.tracked.get(key).map(|tracked| tracked.priority)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.tracked.contains_key(key)
    }

    /// Number of pending keys (stale heap entries are not counted).
    pub fn len(&self) -> usize {
        self.tracked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracked.is_empty()
    }

    fn take_order(&mut self) -> u64 {
        let order = self.next_order;
        self.next_order += 1;
        order
    }

    fn enqueue(&mut self, key: K, priority: f64, order: u64) {
        let generation = self.next_generation;
        self.next_generation += 1;
        self.tracked.insert(
            key.clone(),
            Tracked {
                priority,
                order,
                generation,
            },
        );
        self.heap.push(Entry {
            priority,
            order,
            generation,
            key,
        });

        if self.heap.len() > 2 * self.tracked.len() + 32 {
            self.compact();
        }
    }

    /// Drops stale heap entries.
    fn compact(&mut self) {
        let tracked = &self.tracked;
        self.heap.retain(|entry| {
            matches!(
                tracked.get(&entry.key),
                Some(t) if t.generation == entry.generation
            )
        });
    }
}
