//! Array-backed binary min-heap over (key, priority) pairs.
//! There is no decrease-key: a key whose priority improves is simply pushed again,
//! and consumers drop the stale copies when they surface (lazy deletion).
use std::fmt;

use crate::Weight;

#[derive(Clone, Debug)]
struct Entry<K> {
    key: K,
    priority: Weight,
}

#[derive(Clone, Debug)]
pub struct MinHeap<K = String> {
    nodes: Vec<Entry<K>>,
}

impl<K> Default for MinHeap<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> MinHeap<K> {
    pub fn new() -> Self { Self { nodes: Vec::new() } }
    pub fn with_capacity(n: usize) -> Self { Self { nodes: Vec::with_capacity(n) } }
    pub fn len(&self) -> usize { self.nodes.len() }
    pub fn is_empty(&self) -> bool { self.nodes.is_empty() }
    pub fn clear(&mut self) { self.nodes.clear() }

    pub fn peek(&self) -> Option<(&K, Weight)> {
        self.nodes.first().map(|e| (&e.key, e.priority))
    }

    /// Duplicate keys are allowed.
    pub fn push(&mut self, key: K, priority: Weight) {
        self.nodes.push(Entry { key, priority });
        self.sift_up(self.nodes.len() - 1);
    }

    /// Removes the entry with the smallest priority, `None` when empty.
    pub fn pop_min(&mut self) -> Option<(K, Weight)> {
        if self.nodes.is_empty() {
            return None;
        }
        let root = self.nodes.swap_remove(0);
        if self.nodes.len() > 1 {
            self.sift_down(0);
        }
        Some((root.key, root.priority))
    }

    fn sift_up(&mut self, mut i: usize) {
        while i > 0 {
            let parent = (i - 1) / 2;
            if self.nodes[i].priority < self.nodes[parent].priority {
                self.nodes.swap(i, parent);
                i = parent;
            } else {
                break;
            }
        }
    }

    // With two children the strictly smaller one wins and a tie goes left.
    fn sift_down(&mut self, mut i: usize) {
        let n = self.nodes.len();
        loop {
            let (left, right) = (2 * i + 1, 2 * i + 2);
            if left >= n {
                break;
            }
            let cur = self.nodes[i].priority;
            let lp = self.nodes[left].priority;
            let child = if right < n {
                let rp = self.nodes[right].priority;
                if rp < lp { right } else { left }
            } else {
                left
            };
            if cur > self.nodes[child].priority {
                self.nodes.swap(i, child);
                i = child;
            } else {
                break;
            }
        }
    }
}

impl<K: fmt::Display> fmt::Display for MinHeap<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[ ")?;
        for (i, e) in self.nodes.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{} : {}", e.key, e.priority)?;
        }
        write!(f, " ]")
    }
}
