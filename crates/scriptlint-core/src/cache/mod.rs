//! Bounded caches used for expensive per-name lookups.

pub mod segmented_lru;

pub use segmented_lru::{Segment, SegmentedLruCache};
