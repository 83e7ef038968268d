//! Segmented LRU cache: a probation segment for first-time entries and a
//! protected segment for entries that have been read again since insertion.
//!
//! Both segments are intrusive doubly-linked lists threaded through a slot
//! arena, indexed by an `FxHashMap`, so every operation is O(1).
//!
//! Not thread-safe; share it behind a lock.

use std::borrow::Borrow;
use std::hash::Hash;

use crate::errors::ConfigError;
use crate::types::collections::FxHashMap;

/// Which tier an entry currently lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Segment {
    Probation,
    Protected,
}

#[derive(Debug)]
struct Entry<K, V> {
    key: K,
    value: V,
    segment: Segment,
    prev: Option<usize>,
    next: Option<usize>,
}

/// Head is most recently used, tail least recently used.
#[derive(Debug, Default, Clone, Copy)]
struct SegmentList {
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
}

/// Bounded key/value store with frequency-aware eviction.
#[derive(Debug)]
pub struct SegmentedLruCache<K, V> {
    index: FxHashMap<K, usize>,
    slots: Vec<Option<Entry<K, V>>>,
    free: Vec<usize>,
    probation: SegmentList,
    protected: SegmentList,
    capacity: usize,
    probation_capacity: usize,
    protected_capacity: usize,
}

impl<K, V> SegmentedLruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Create a cache holding at most `capacity` entries, of which
    /// `max(1, floor(capacity * probation_ratio))` are probation slots.
    ///
    /// # Panics
    /// If `capacity` is 0 or `probation_ratio` is outside `(0, 1]`.
    pub fn new(capacity: usize, probation_ratio: f64) -> Self {
        match Self::try_new(capacity, probation_ratio) {
            Ok(cache) => cache,
            Err(e) => panic!("{e}"),
        }
    }

    /// Fallible variant of [`SegmentedLruCache::new`].
    pub fn try_new(capacity: usize, probation_ratio: f64) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::InvalidValue {
                field: "capacity".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if !(probation_ratio > 0.0 && probation_ratio <= 1.0) {
            return Err(ConfigError::InvalidValue {
                field: "probation_ratio".to_string(),
                message: format!("{probation_ratio} is outside (0, 1]"),
            });
        }
        let probation_capacity = ((capacity as f64 * probation_ratio).floor() as usize)
            .max(1)
            .min(capacity);
        Ok(Self {
            index: FxHashMap::default(),
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            probation: SegmentList::default(),
            protected: SegmentList::default(),
            capacity,
            probation_capacity,
            protected_capacity: capacity - probation_capacity,
        })
    }

    /// Insert or overwrite. Overwriting counts as an access.
    pub fn set(&mut self, key: K, value: V) {
        if let Some(&idx) = self.index.get(&key) {
            if let Some(entry) = self.slots[idx].as_mut() {
                entry.value = value;
            }
            self.touch(idx);
            return;
        }

        if self.probation.len >= self.probation_capacity {
            self.evict_probation_tail();
        }

        let entry = Entry {
            key: key.clone(),
            value,
            segment: Segment::Probation,
            prev: None,
            next: None,
        };
        let idx = match self.free.pop() {
            Some(idx) => {
                self.slots[idx] = Some(entry);
                idx
            }
            None => {
                self.slots.push(Some(entry));
                self.slots.len() - 1
            }
        };
        self.link_front(idx, Segment::Probation);
        self.index.insert(key, idx);
    }

    /// Look up `key`, promoting a probation hit to protected and refreshing
    /// a protected hit.
    pub fn try_get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        let idx = *self.index.get(key)?;
        self.touch(idx);
        self.slots[idx].as_ref().map(|e| &e.value)
    }

    /// True if `key` is cached. Does not count as an access.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.index.contains_key(key)
    }

    /// Segment currently holding `key`, without counting as an access.
    pub fn segment_of<Q>(&self, key: &Q) -> Option<Segment>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        let idx = *self.index.get(key)?;
        self.slots[idx].as_ref().map(|e| e.segment)
    }

    /// Remove `key`, returning its value.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        let idx = self.index.remove(key)?;
        self.unlink(idx);
        let entry = self.slots[idx].take()?;
        self.free.push(idx);
        Some(entry.value)
    }

    pub fn clear(&mut self) {
        self.index.clear();
        self.slots.clear();
        self.free.clear();
        self.probation = SegmentList::default();
        self.protected = SegmentList::default();
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn probation_capacity(&self) -> usize {
        self.probation_capacity
    }

    pub fn protected_capacity(&self) -> usize {
        self.protected_capacity
    }

    /// Apply the access rule to an existing entry.
    fn touch(&mut self, idx: usize) {
        let Some(segment) = self.slots[idx].as_ref().map(|e| e.segment) else {
            return;
        };
        match segment {
            Segment::Protected => {
                self.unlink(idx);
                self.link_front(idx, Segment::Protected);
            }
            // No protected tier to promote into: refresh in place.
            Segment::Probation if self.protected_capacity == 0 => {
                self.unlink(idx);
                self.link_front(idx, Segment::Probation);
            }
            Segment::Probation => {
                self.unlink(idx);
                if self.protected.len >= self.protected_capacity {
                    self.demote_protected_tail();
                }
                self.link_front(idx, Segment::Protected);
            }
        }
    }

    /// Move the least recently used protected entry to the head of probation.
    fn demote_protected_tail(&mut self) {
        let Some(tail) = self.protected.tail else {
            return;
        };
        self.unlink(tail);
        while self.probation.len >= self.probation_capacity {
            self.evict_probation_tail();
        }
        self.link_front(tail, Segment::Probation);
    }

    fn evict_probation_tail(&mut self) {
        let Some(tail) = self.probation.tail else {
            return;
        };
        self.unlink(tail);
        if let Some(entry) = self.slots[tail].take() {
            self.index.remove(&entry.key);
            tracing::trace!(slot = tail, "evicted probation entry");
        }
        self.free.push(tail);
    }

    fn list_mut(&mut self, segment: Segment) -> &mut SegmentList {
        match segment {
            Segment::Probation => &mut self.probation,
            Segment::Protected => &mut self.protected,
        }
    }

    fn link_front(&mut self, idx: usize, segment: Segment) {
        let old_head = self.list_mut(segment).head;
        if let Some(entry) = self.slots[idx].as_mut() {
            entry.segment = segment;
            entry.prev = None;
            entry.next = old_head;
        }
        if let Some(head) = old_head {
            if let Some(entry) = self.slots[head].as_mut() {
                entry.prev = Some(idx);
            }
        }
        let list = self.list_mut(segment);
        list.head = Some(idx);
        if list.tail.is_none() {
            list.tail = Some(idx);
        }
        list.len += 1;
    }

    fn unlink(&mut self, idx: usize) {
        let Some((segment, prev, next)) = self.slots[idx]
            .as_mut()
            .map(|e| (e.segment, e.prev.take(), e.next.take()))
        else {
            return;
        };
        match prev {
            Some(p) => {
                if let Some(entry) = self.slots[p].as_mut() {
                    entry.next = next;
                }
            }
            None => self.list_mut(segment).head = next,
        }
        match next {
            Some(n) => {
                if let Some(entry) = self.slots[n].as_mut() {
                    entry.prev = prev;
                }
            }
            None => self.list_mut(segment).tail = prev,
        }
        self.list_mut(segment).len -= 1;
    }
}
