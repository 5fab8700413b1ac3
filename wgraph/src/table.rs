//! Open-addressing hash table keyed by strings.
//!
//! Collisions are resolved with quadratic probing over a prime capacity:
//! the `j`-th probe for a key lands on `(hash(key) + j * j) % capacity`.
//! Deleted entries leave a tombstone that keeps its key, so later keys on the
//! same probe path stay reachable and a re-added key resurrects its old slot.
//! The load factor is checked before every insertion and the table grows to the
//! next prime above twice its capacity once it reaches one half.
use std::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::{Error, Result};
use crate::hash::{hash_key, is_prime, next_prime};

const DEFAULT_CAPACITY: usize = 5;
const MAX_LOAD: f64 = 0.5;
/// Largest slot count a table will allocate: the largest prime below 2^26.
pub const MAX_CAPACITY: usize = 67_108_859;

#[derive(Clone, Debug)]
enum Slot<T> {
    Empty,
    Occupied { key: String, value: T },
    Tombstone { key: String },
}

impl<T> Slot<T> {
    fn live_key(&self) -> Option<&str> {
        match self {
            Slot::Occupied { key, .. } => Some(key),
            _ => None,
        }
    }

    fn live_value(&self) -> Option<&T> {
        match self {
            Slot::Occupied { value, .. } => Some(value),
            _ => None,
        }
    }

    fn live_value_mut(&mut self) -> Option<&mut T> {
        match self {
            Slot::Occupied { value, .. } => Some(value),
            _ => None,
        }
    }
}

/// Where a probe for a key stopped.
enum Probe {
    Live(usize),
    Dead(usize),
    Vacant(usize),
    Exhausted,
}

#[derive(Clone, Debug)]
pub struct OpenAddressTable<T> {
    slots: Vec<Slot<T>>,
    count: usize,
    /// Slot indices of live entries, in first-insertion order.
    order: Vec<usize>,
}

impl<T> Default for OpenAddressTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> OpenAddressTable<T> {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Capacity is rounded up to a prime (never below 2); requests above
    /// [`MAX_CAPACITY`] are clamped to it.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = prime_capacity(capacity.min(MAX_CAPACITY)).unwrap_or(DEFAULT_CAPACITY);
        Self { slots: empty_slots(capacity), count: 0, order: Vec::new() }
    }

    /// Like [`with_capacity`](Self::with_capacity) but rejects requests above [`MAX_CAPACITY`].
    pub fn try_with_capacity(capacity: usize) -> Result<Self> {
        let capacity = prime_capacity(capacity)?;
        Ok(Self { slots: empty_slots(capacity), count: 0, order: Vec::new() })
    }

    pub fn len(&self) -> usize { self.count }
    pub fn is_empty(&self) -> bool { self.count == 0 }
    pub fn capacity(&self) -> usize { self.slots.len() }

    pub fn load_factor(&self) -> f64 {
        self.count as f64 / self.slots.len() as f64
    }

    /// Slots that never held an entry since the last resize or clear.
    pub fn empty_slots(&self) -> usize {
        self.slots.iter().filter(|s| matches!(s, Slot::Empty)).count()
    }

    fn probe(&self, key: &str) -> Probe {
        let cap = self.slots.len();
        let home = hash_key(key) as usize % cap;
        for j in 0..cap {
            let idx = (home + j * j) % cap;
            match &self.slots[idx] {
                Slot::Empty => return Probe::Vacant(idx),
                Slot::Occupied { key: k, .. } if k == key => return Probe::Live(idx),
                Slot::Tombstone { key: k } if k == key => return Probe::Dead(idx),
                _ => {}
            }
        }
        Probe::Exhausted
    }

    fn live_index(&self, key: &str) -> Option<usize> {
        if self.count == 0 {
            return None;
        }
        match self.probe(key) {
            Probe::Live(idx) => Some(idx),
            _ => None,
        }
    }

    /// Inserts or overwrites `key`. Returns the previous value of a live entry.
    pub fn add(&mut self, key: &str, value: T) -> Result<Option<T>> {
        if self.load_factor() >= MAX_LOAD {
            self.resize(self.capacity() * 2)?;
        }
        let probe = match self.probe(key) {
            Probe::Exhausted => {
                // Tombstones can crowd every slot on the probe path; a rehash clears them.
                tracing::warn!(key, capacity = self.capacity(), "probe exhausted, rehashing");
                self.resize(self.capacity())?;
                self.probe(key)
            }
            p => p,
        };
        match probe {
            Probe::Live(idx) | Probe::Dead(idx) => {
                match std::mem::replace(&mut self.slots[idx], Slot::Empty) {
                    Slot::Occupied { key, value: prev } => {
                        self.slots[idx] = Slot::Occupied { key, value };
                        Ok(Some(prev))
                    }
                    Slot::Tombstone { key } => {
                        self.slots[idx] = Slot::Occupied { key, value };
                        self.count += 1;
                        self.order.push(idx);
                        Ok(None)
                    }
                    Slot::Empty => Err(self.corruption(key)),
                }
            }
            Probe::Vacant(idx) => {
                self.slots[idx] = Slot::Occupied { key: key.to_owned(), value };
                self.count += 1;
                self.order.push(idx);
                Ok(None)
            }
            Probe::Exhausted => Err(self.corruption(key)),
        }
    }

    /// Places a key known to be absent; used while rehashing.
    fn place(&mut self, key: String, value: T) -> Result<()> {
        match self.probe(&key) {
            Probe::Vacant(idx) => {
                self.slots[idx] = Slot::Occupied { key, value };
                self.count += 1;
                self.order.push(idx);
                Ok(())
            }
            _ => Err(self.corruption(&key)),
        }
    }

    fn corruption(&self, key: &str) -> Error {
        Error::TableCorruption { key: key.to_owned(), capacity: self.capacity() }
    }

    pub fn get(&self, key: &str) -> Result<&T> {
        self.find(key).ok_or_else(|| Error::not_found(key))
    }

    pub fn get_mut(&mut self, key: &str) -> Result<&mut T> {
        match self.live_index(key) {
            Some(idx) => self.slots[idx].live_value_mut().ok_or_else(|| Error::not_found(key)),
            None => Err(Error::not_found(key)),
        }
    }

    /// Like [`get`](Self::get) but without building an error for a miss.
    pub fn find(&self, key: &str) -> Option<&T> {
        self.live_index(key).and_then(|idx| self.slots[idx].live_value())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.live_index(key).is_some()
    }

    /// Tombstones the live entry for `key` and hands back its value.
    pub fn remove(&mut self, key: &str) -> Option<T> {
        let idx = self.live_index(key)?;
        let tomb = Slot::Tombstone { key: key.to_owned() };
        match std::mem::replace(&mut self.slots[idx], tomb) {
            Slot::Occupied { value, .. } => {
                self.count -= 1;
                if let Some(pos) = self.order.iter().position(|&i| i == idx) {
                    self.order.remove(pos);
                }
                Some(value)
            }
            other => {
                self.slots[idx] = other;
                None
            }
        }
    }

    /// Rehashes into a fresh slot array. Requests below the live count are ignored;
    /// otherwise the capacity becomes a prime of at least `new_capacity` that keeps the
    /// load under one half. Live entries keep their insertion order, tombstones are dropped.
    /// A target above [`MAX_CAPACITY`] fails with [`Error::Capacity`] and leaves the table as is.
    pub fn resize(&mut self, new_capacity: usize) -> Result<()> {
        if new_capacity < self.count {
            return Ok(());
        }
        let wanted = new_capacity.max(2 * self.count + 1);
        let target = prime_capacity(wanted)?;
        let previous = self.capacity();

        let mut old_slots = std::mem::replace(&mut self.slots, empty_slots(target));
        let old_order = std::mem::take(&mut self.order);
        self.count = 0;
        for idx in old_order {
            if let Slot::Occupied { key, value } = std::mem::replace(&mut old_slots[idx], Slot::Empty) {
                self.place(key, value)?;
            }
        }
        tracing::debug!(from = previous, to = target, live = self.count, "resized table");
        Ok(())
    }

    pub fn clear(&mut self) {
        self.slots = empty_slots(self.capacity());
        self.order.clear();
        self.count = 0;
    }

    /// Live keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.order.iter().filter_map(|&i| self.slots[i].live_key())
    }

    /// Live entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> + '_ {
        self.order.iter().filter_map(|&i| match &self.slots[i] {
            Slot::Occupied { key, value } => Some((key.as_str(), value)),
            _ => None,
        })
    }

    /// Live entries in slot order, i.e. the order a bucket scan sees them.
    pub fn iter_slots(&self) -> impl Iterator<Item = (&str, &T)> + '_ {
        self.slots.iter().filter_map(|s| match s {
            Slot::Occupied { key, value } => Some((key.as_str(), value)),
            _ => None,
        })
    }

    /// Slot currently holding the live entry for `key`.
    pub fn slot_index(&self, key: &str) -> Option<usize> {
        self.live_index(key)
    }
}

fn prime_capacity(requested: usize) -> Result<usize> {
    if requested > MAX_CAPACITY {
        return Err(Error::capacity(requested));
    }
    if is_prime(requested) {
        return Ok(requested);
    }
    next_prime(requested).ok_or_else(|| Error::capacity(requested))
}

fn empty_slots<T>(n: usize) -> Vec<Slot<T>> {
    std::iter::repeat_with(|| Slot::Empty).take(n).collect()
}

impl<T: fmt::Display> fmt::Display for OpenAddressTable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{ ")?;
        for (i, (key, value)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{key} : {value}")?;
        }
        write!(f, " }}")
    }
}

impl<T: Serialize> Serialize for OpenAddressTable<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.count))?;
        for (key, value) in self.iter() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
