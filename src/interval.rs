use std::fmt;

use thiserror::Error;

/// Errors produced when building an [`Interval`].
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum IntervalError<K> {
    /// The start of the interval lies after its end.
    #[error("invalid interval: start {start:?} cannot be greater than end {end:?}")]
    InvalidInterval { start: K, end: K },
}

/// A closed interval `[start, end]` with `start <= end`.
///
/// Both bounds are inclusive: `[1, 5]` and `[5, 9]` overlap on `5`.
///
/// ```
/// use llrb_interval_tree::Interval;
///
/// let interval = Interval::new(1, 5).unwrap();
/// assert!(interval.contains(5));
/// assert!(interval.overlaps(&Interval::new(5, 9).unwrap()));
/// assert!(Interval::new(5, 1).is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Interval<K> {
    start: K,
    end: K,
}

impl<K> Interval<K>
where
    K: Ord + Copy,
{
    /// Builds `[start, end]`, failing if `start > end`.
    pub fn new(start: K, end: K) -> Result<Self, IntervalError<K>> {
        if start > end {
            return Err(IntervalError::InvalidInterval { start, end });
        }

        Ok(Interval { start, end })
    }

    pub fn start(&self) -> K {
        self.start
    }

    pub fn end(&self) -> K {
        self.end
    }

    /// Returns whether `self` and `other` share at least one point.
    pub fn overlaps(&self, other: &Interval<K>) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// Returns whether `point` lies within `self`, bounds included.
    pub fn contains(&self, point: K) -> bool {
        self.start <= point && point <= self.end
    }

    /// Same start, larger end. Only ever called with `end >= self.end`.
    pub(crate) fn with_end(self, end: K) -> Self {
        debug_assert!(end >= self.end);
        Interval {
            start: self.start,
            end,
        }
    }
}

impl<K> fmt::Display for Interval<K>
where
    K: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_reversed_bounds() {
        assert_eq!(
            Interval::new(10, 1),
            Err(IntervalError::InvalidInterval { start: 10, end: 1 })
        );
        assert!(Interval::new(3, 3).is_ok());
    }

    #[test]
    fn error_message_names_both_bounds() {
        let err = Interval::new(7, 2).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid interval: start 7 cannot be greater than end 2"
        );
    }

    #[test]
    fn overlaps_is_closed_on_both_ends() {
        let a = Interval::new(1, 5).unwrap();

        assert!(a.overlaps(&Interval::new(5, 10).unwrap()));
        assert!(a.overlaps(&Interval::new(-3, 1).unwrap()));
        assert!(a.overlaps(&Interval::new(2, 3).unwrap()));
        assert!(a.overlaps(&Interval::new(0, 8).unwrap()));
        assert!(!a.overlaps(&Interval::new(6, 10).unwrap()));
        assert!(!a.overlaps(&Interval::new(-3, 0).unwrap()));
    }

    #[test]
    fn contains_point() {
        let a = Interval::new(-2, 4).unwrap();

        assert!(a.contains(-2));
        assert!(a.contains(0));
        assert!(a.contains(4));
        assert!(!a.contains(5));
        assert!(!a.contains(-3));
    }

    #[test]
    fn display() {
        assert_eq!(Interval::new(3, 7).unwrap().to_string(), "[3, 7]");
    }
}
