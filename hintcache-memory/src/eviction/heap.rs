// Copyright 2025 hintcache Project Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! An index-tracking binary min-heap ordered by access frequency.
//!
//! Entries live in a slot arena and remember their position in the heap, so bumping the frequency of one entry
//! re-heapifies it in `O(log n)` without a search. Ties on frequency are broken by the logical time of the last
//! touch, the least recently touched entry sorts first.

use std::sync::Arc;

/// Stable reference to an entry of a [`FrequencyHeap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token(usize);

#[derive(Debug)]
struct Slot {
    key: Arc<str>,
    frequency: u64,
    touched: u64,
    position: usize,
}

impl Slot {
    fn rank(&self) -> (u64, u64) {
        (self.frequency, self.touched)
    }
}

#[derive(Debug, Default)]
pub struct FrequencyHeap {
    /// Slot indices laid out as a binary heap.
    heap: Vec<usize>,
    slots: Vec<Option<Slot>>,
    free: Vec<usize>,

    /// Logical clock, ticks on every push and bump.
    clock: u64,
}

impl FrequencyHeap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Insert `key` with frequency `1`.
    pub fn push(&mut self, key: Arc<str>) -> Token {
        let touched = self.tick();
        let slot = Slot {
            key,
            frequency: 1,
            touched,
            position: self.heap.len(),
        };
        let index = match self.free.pop() {
            Some(index) => {
                debug_assert!(self.slots[index].is_none());
                self.slots[index] = Some(slot);
                index
            }
            None => {
                self.slots.push(Some(slot));
                self.slots.len() - 1
            }
        };

        self.heap.push(index);
        self.sift_up(self.heap.len() - 1);

        Token(index)
    }

    /// Increase the frequency of the entry by one and restore heap order.
    pub fn bump(&mut self, token: Token) {
        let touched = self.tick();
        let slot = self.slot_mut(token.0);
        slot.frequency += 1;
        slot.touched = touched;
        let position = slot.position;
        self.fix(position);
    }

    /// Remove and return the key with the minimum frequency.
    pub fn pop(&mut self) -> Option<Arc<str>> {
        let index = *self.heap.first()?;
        Some(self.release(index))
    }

    #[cfg_attr(not(test), expect(dead_code))]
    pub fn frequency(&self, token: Token) -> Option<u64> {
        self.slots.get(token.0)?.as_ref().map(|slot| slot.frequency)
    }

    /// All keys sorted by eviction order.
    pub fn sorted(&self) -> Vec<Arc<str>> {
        let mut slots = self.heap.iter().map(|&index| self.slot(index)).collect::<Vec<_>>();
        slots.sort_by_key(|slot| slot.rank());
        slots.into_iter().map(|slot| slot.key.clone()).collect()
    }

    fn release(&mut self, index: usize) -> Arc<str> {
        let position = self.slot(index).position;
        let last = self.heap.len() - 1;
        self.swap(position, last);
        self.heap.pop();
        if position < self.heap.len() {
            self.fix(position);
        }

        self.free.push(index);
        match self.slots[index].take() {
            Some(slot) => slot.key,
            None => unreachable!("released slot {index} must be occupied"),
        }
    }

    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    /// Restore heap order around `position` after its rank changed.
    fn fix(&mut self, position: usize) {
        if !self.sift_up(position) {
            self.sift_down(position);
        }
    }

    /// Returns `true` if the entry moved.
    fn sift_up(&mut self, mut position: usize) -> bool {
        let start = position;
        while position > 0 {
            let parent = (position - 1) / 2;
            if !self.less(position, parent) {
                break;
            }
            self.swap(position, parent);
            position = parent;
        }
        position != start
    }

    fn sift_down(&mut self, mut position: usize) {
        let len = self.heap.len();
        loop {
            let left = 2 * position + 1;
            let right = left + 1;
            let mut smallest = position;
            if left < len && self.less(left, smallest) {
                smallest = left;
            }
            if right < len && self.less(right, smallest) {
                smallest = right;
            }
            if smallest == position {
                break;
            }
            self.swap(position, smallest);
            position = smallest;
        }
    }

    fn less(&self, a: usize, b: usize) -> bool {
        self.slot(self.heap[a]).rank() < self.slot(self.heap[b]).rank()
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.heap.swap(a, b);
        let (ia, ib) = (self.heap[a], self.heap[b]);
        self.slot_mut(ia).position = a;
        self.slot_mut(ib).position = b;
    }

    fn slot(&self, index: usize) -> &Slot {
        match self.slots[index].as_ref() {
            Some(slot) => slot,
            None => unreachable!("heap slot {index} must be occupied"),
        }
    }

    fn slot_mut(&mut self, index: usize) -> &mut Slot {
        match self.slots[index].as_mut() {
            Some(slot) => slot,
            None => unreachable!("heap slot {index} must be occupied"),
        }
    }
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;
    use rand::{rngs::SmallRng, Rng, SeedableRng};

    use super::*;

    fn keys(heap: &FrequencyHeap) -> Vec<String> {
        heap.sorted().iter().map(|key| key.to_string()).collect_vec()
    }

    #[test]
    fn test_frequency_heap_order() {
        let mut heap = FrequencyHeap::new();
        let a = heap.push("a".into());
        let b = heap.push("b".into());
        let c = heap.push("c".into());

        heap.bump(a);
        heap.bump(a);
        heap.bump(c);
        assert_eq!(heap.frequency(a), Some(3));
        assert_eq!(heap.frequency(b), Some(1));
        assert_eq!(keys(&heap), vec!["b", "c", "a"]);

        assert_eq!(heap.pop().as_deref(), Some("b"));
        assert_eq!(heap.frequency(b), None);
        assert_eq!(heap.pop().as_deref(), Some("c"));
        assert_eq!(heap.pop().as_deref(), Some("a"));
        assert_eq!(heap.pop(), None);
    }

    #[test]
    fn test_frequency_heap_ties_by_last_touch() {
        let mut heap = FrequencyHeap::new();
        let a = heap.push("a".into());
        let b = heap.push("b".into());
        heap.bump(b);
        heap.bump(a);
        // both have frequency 2, `b` was touched first
        assert_eq!(keys(&heap), vec!["b", "a"]);
    }

    #[test]
    fn test_frequency_heap_slot_reuse() {
        let mut heap = FrequencyHeap::new();
        let tokens = (0..8).map(|i| heap.push(i.to_string().into())).collect_vec();
        for (i, token) in tokens.iter().enumerate().rev() {
            for _ in 0..i {
                heap.bump(*token);
            }
        }

        assert_eq!(heap.pop().as_deref(), Some("0"));
        assert_eq!(heap.pop().as_deref(), Some("1"));
        assert_eq!(heap.frequency(tokens[0]), None);

        // freed slots are recycled, the new entries start over at frequency 1
        let x = heap.push("x".into());
        let y = heap.push("y".into());
        assert_eq!(heap.frequency(x), Some(1));
        assert!([tokens[0], tokens[1]].contains(&x));
        assert!([tokens[0], tokens[1]].contains(&y));
        heap.bump(y);
        heap.bump(y);
        heap.bump(y);
        assert_eq!(heap.len(), 8);
        assert_eq!(keys(&heap), vec!["x", "2", "3", "y", "4", "5", "6", "7"]);
    }

    #[test]
    fn test_frequency_heap_random_bumps() {
        let mut rng = SmallRng::seed_from_u64(114514);
        let mut heap = FrequencyHeap::new();
        let tokens = (0..64).map(|i| heap.push(i.to_string().into())).collect_vec();
        let mut frequencies = vec![1u64; tokens.len()];

        for _ in 0..1024 {
            let i = rng.random_range(0..tokens.len());
            heap.bump(tokens[i]);
            frequencies[i] += 1;
        }

        let mut last = 0;
        while let Some(key) = heap.pop() {
            let frequency = frequencies[key.parse::<usize>().unwrap()];
            assert!(frequency >= last);
            last = frequency;
        }
    }
}
