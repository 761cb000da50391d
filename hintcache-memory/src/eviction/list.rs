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

//! An index-linked doubly linked list.
//!
//! Nodes live in a slot arena and link to each other by slot index, so a [`Token`] stays valid while other nodes
//! come and go. Freed slots are recycled by later pushes.

/// Stable reference to a node of a [`Dlist`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token(usize);

#[derive(Debug)]
struct Node<T> {
    value: T,
    prev: Option<usize>,
    next: Option<usize>,
}

#[derive(Debug)]
pub struct Dlist<T> {
    slots: Vec<Option<Node<T>>>,
    free: Vec<usize>,

    head: Option<usize>,
    tail: Option<usize>,

    len: usize,
}

impl<T> Default for Dlist<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Dlist<T> {
    pub fn new() -> Self {
        Self {
            slots: vec![],
            free: vec![],
            head: None,
            tail: None,
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Append `value` at the back and return its token.
    pub fn push_back(&mut self, value: T) -> Token {
        let node = Node {
            value,
            prev: self.tail,
            next: None,
        };
        let index = match self.free.pop() {
            Some(index) => {
                debug_assert!(self.slots[index].is_none());
                self.slots[index] = Some(node);
                index
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        };

        match self.tail {
            Some(tail) => self.node_mut(tail).next = Some(index),
            None => self.head = Some(index),
        }
        self.tail = Some(index);
        self.len += 1;

        Token(index)
    }

    /// Remove and return the front value.
    pub fn pop_front(&mut self) -> Option<T> {
        let head = self.head?;
        Some(self.release(head))
    }

    /// Move the node referenced by `token` to the back.
    pub fn move_to_back(&mut self, token: Token) {
        let index = token.0;
        if self.tail == Some(index) {
            return;
        }
        self.unlink(index);

        let tail = self.tail;
        let node = self.node_mut(index);
        node.prev = tail;
        node.next = None;
        match tail {
            Some(tail) => self.node_mut(tail).next = Some(index),
            None => self.head = Some(index),
        }
        self.tail = Some(index);
    }

    /// Iterate from front to back.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            next: self.head,
        }
    }

    fn release(&mut self, index: usize) -> T {
        self.unlink(index);
        self.len -= 1;
        self.free.push(index);
        match self.slots[index].take() {
            Some(node) => node.value,
            None => unreachable!("released slot {index} must be occupied"),
        }
    }

    fn unlink(&mut self, index: usize) {
        let (prev, next) = {
            let node = self.node(index);
            (node.prev, node.next)
        };
        match prev {
            Some(prev) => self.node_mut(prev).next = next,
            None => self.head = next,
        }
        match next {
            Some(next) => self.node_mut(next).prev = prev,
            None => self.tail = prev,
        }
    }

    fn node(&self, index: usize) -> &Node<T> {
        match self.slots[index].as_ref() {
            Some(node) => node,
            None => unreachable!("linked slot {index} must be occupied"),
        }
    }

    fn node_mut(&mut self, index: usize) -> &mut Node<T> {
        match self.slots[index].as_mut() {
            Some(node) => node,
            None => unreachable!("linked slot {index} must be occupied"),
        }
    }
}

pub struct Iter<'a, T> {
    list: &'a Dlist<T>,
    next: Option<usize>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.list.node(self.next?);
        self.next = node.next;
        Some(&node.value)
    }
}
