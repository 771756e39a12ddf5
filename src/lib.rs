//! Implementation of an interval tree ([`interval_tree::IntervalTree`]) over closed
//! intervals `[start, end]`. It is based on the augmented tree described in Cormen et al.
//! (2009, Section 14.3: Interval trees, pp. 348–354), kept balanced as a
//! left-leaning red-black tree (Sedgewick, 2008). It provides methods for
//! "stabbing queries" (as in "which intervals contain point `p`?"), overlap
//! queries against a probe interval, and a query returning an interval that
//! overlaps the largest number of stored intervals.
//!
//! The tree is keyed by the start of each interval: at most one interval is
//! stored per start. Inserting an interval whose start is already present
//! extends the stored end if the new end is larger, and is a no-op otherwise.
//!
//! Note that any type satisfying the [`Ord`] and [`Copy`] traits can be used as
//! an end-point.

/// The closed interval value type and its construction error.
pub mod interval;
/// An interval tree implemented with a left-leaning red-black tree.
pub mod interval_tree;
mod node;

pub use interval::{Interval, IntervalError};
pub use interval_tree::IntervalTree;
