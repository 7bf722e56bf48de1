//! Compile-time configuration for the layout engine.
//!
//! Capacities are fixed so every buffer can live in a `heapless` collection.
//! Raise them here if a container legitimately needs more slots.

/// Maximum number of children a single container can hold.
pub const MAX_CHILDREN: usize = 32;

/// Depth of the driver's event queue.
///
/// When the queue is full further events collapse into a single
/// `ChildrenChanged`, which re-resolves everything anyway.
pub const EVENT_QUEUE_DEPTH: usize = 16;

/// Percentages are stored in hundredths so that sums compare exactly.
pub const HUNDREDTHS_PER_PERCENT: u32 = 100;

/// 100% expressed in hundredths of a percent.
pub const FULL_PERCENT: u32 = 100 * HUNDREDTHS_PER_PERCENT;
