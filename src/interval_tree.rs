use std::fmt;
use std::io;

use log::{trace, warn};

use crate::interval::{Interval, IntervalError};
use crate::node::{self, Color, Link, Node};

/// An interval tree is a data structure which is used to store closed
/// intervals `[start, end]` and to quickly find every stored interval
/// overlapping a probe interval or containing a probe point.
///
/// Each node stores the largest end-point of its subtree, which lets queries
/// skip subtrees that cannot possibly reach the probe. The tree is kept
/// balanced as a left-leaning red-black tree, so every query and mutation
/// descends `O(log n)` levels.
///
/// Intervals are keyed by their start: at most one interval is stored per
/// start value.
///
/// ```
/// use llrb_interval_tree::IntervalTree;
///
/// let mut tree = IntervalTree::new();
/// tree.insert(1, 5).unwrap();
/// tree.insert(3, 7).unwrap();
/// tree.insert(10, 15).unwrap();
///
/// assert_eq!(tree.find_overlapping(4, 11).unwrap().len(), 3);
///
/// let containing: Vec<_> = tree.find_containing(6).into_iter().map(|i| (i.start(), i.end())).collect();
/// assert_eq!(containing, vec![(3, 7)]);
///
/// tree.remove(3, 7).unwrap();
/// assert!(tree.find_containing(6).is_empty());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct IntervalTree<K> {
    root: Link<K>,
}

impl<K> Default for IntervalTree<K> {
    fn default() -> IntervalTree<K> {
        IntervalTree { root: None }
    }
}

impl<K> fmt::Display for IntervalTree<K>
where
    K: fmt::Display,
{
    /// Right subtree first, one node per line, indented by depth.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fn go<K: fmt::Display>(
            f: &mut fmt::Formatter,
            link: &Link<K>,
            level: usize,
        ) -> fmt::Result {
            let Some(node) = link else {
                return Ok(());
            };
            go(f, &node.right, level + 1)?;
            writeln!(f, "{:width$}{}", "", node, width = level * 4)?;
            go(f, &node.left, level + 1)
        }

        go(f, &self.root, 0)
    }
}

impl<K> IntervalTree<K>
where
    K: Ord + Copy,
{
    pub fn new() -> IntervalTree<K> {
        IntervalTree::default()
    }

    /// Returns the number of intervals in the tree.
    pub fn len(&self) -> usize {
        node::size_of(&self.root)
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn clear(&mut self) {
        self.root = None;
    }

    /// Returns the interval stored under `start`, if any.
    pub fn get(&self, start: K) -> Option<&Interval<K>> {
        let mut curr = &self.root;

        while let Some(node) = curr {
            if start < node.interval.start() {
                curr = &node.left;
            } else if start > node.interval.start() {
                curr = &node.right;
            } else {
                return Some(&node.interval);
            }
        }

        None
    }

    /// Returns whether exactly `[start, end]` is stored.
    pub fn contains(&self, start: K, end: K) -> bool {
        self.get(start).is_some_and(|interval| interval.end() == end)
    }

    /// Returns every stored interval containing `point`, in no particular
    /// order.
    pub fn find_containing(&self, point: K) -> Vec<&Interval<K>> {
        let mut result = vec![];
        find_containing(&self.root, point, &mut result);

        result
    }

    /// Returns an interval overlapping the largest number of stored
    /// intervals (itself included), or `None` if the tree is empty.
    ///
    /// Ties go to the first such interval in pre-order. Each candidate is
    /// scored with a pruned overlap count over the whole tree, so this is
    /// quadratic in the worst case.
    ///
    /// ```
    /// use llrb_interval_tree::IntervalTree;
    ///
    /// let mut tree = IntervalTree::new();
    /// assert!(tree.find_max_overlapping().is_none());
    ///
    /// tree.insert(1, 3).unwrap();
    /// tree.insert(2, 10).unwrap();
    /// tree.insert(5, 6).unwrap();
    /// tree.insert(12, 13).unwrap();
    /// assert_eq!(tree.find_max_overlapping().map(|i| i.start()), Some(2));
    /// ```
    pub fn find_max_overlapping(&self) -> Option<&Interval<K>> {
        let root = self.root.as_deref()?;

        self.max_overlapping(root, 0).map(|(interval, _)| interval)
    }

    /// Best `(interval, overlap count)` in the subtree of `node` whose count
    /// beats `threshold`.
    fn max_overlapping<'a>(
        &'a self,
        node: &'a Node<K>,
        mut threshold: usize,
    ) -> Option<(&'a Interval<K>, usize)> {
        let overlaps = count_overlaps(&self.root, &node.interval);
        let mut best = None;
        if overlaps > threshold {
            best = Some((&node.interval, overlaps));
            threshold = overlaps;
        }

        for child in [&node.left, &node.right].into_iter().flatten() {
            if let Some((interval, count)) = self.max_overlapping(child, threshold) {
                best = Some((interval, count));
                threshold = count;
            }
        }

        best
    }

    /// Writes the debugging dump of [`fmt::Display`] to `out`.
    pub fn print_tree<W: io::Write>(&self, out: &mut W) -> io::Result<()>
    where
        K: fmt::Display,
    {
        write!(out, "{}", self)
    }

    /// Returns an iterator over the stored intervals in ascending start order.
    pub fn iter(&self) -> Iter<'_, K> {
        let mut iter = Iter {
            stack: vec![],
            remaining: self.len(),
        };
        iter.push_left_spine(&self.root);

        iter
    }
}

impl<K> IntervalTree<K>
where
    K: Ord + Copy + fmt::Debug,
{
    /// Inserts the interval `[start, end]`.
    ///
    /// If an interval with the same start is already stored, its end is
    /// extended to `end` when `end` is larger; otherwise nothing changes.
    /// Two intervals sharing a start are never both retained.
    ///
    /// Fails with [`IntervalError::InvalidInterval`] if `start > end`, in
    /// which case the tree is left untouched.
    ///
    /// ```
    /// use llrb_interval_tree::IntervalTree;
    ///
    /// let mut tree = IntervalTree::new();
    /// tree.insert(5, 10).unwrap();
    /// tree.insert(5, 7).unwrap();
    /// assert_eq!(tree.get(5).map(|i| i.end()), Some(10));
    /// assert!(tree.insert(5, 3).is_err());
    /// assert_eq!(tree.get(5).map(|i| i.end()), Some(10));
    ///
    /// tree.insert(5, 20).unwrap();
    /// assert_eq!(tree.get(5).map(|i| i.end()), Some(20));
    /// assert_eq!(tree.len(), 1);
    ///
    /// assert!(tree.insert(10, 1).is_err());
    /// assert_eq!(tree.len(), 1);
    /// ```
    pub fn insert(&mut self, start: K, end: K) -> Result<(), IntervalError<K>> {
        let interval = Interval::new(start, end).inspect_err(|err| {
            warn!("Error inserting interval: {}", err);
        })?;

        match self.get(start) {
            Some(stored) if stored.end() >= end => {
                trace!("interval [{:?}, {:?}] already covered by {:?}", start, end, stored);
            }
            Some(stored) => trace!("extending {:?} to end {:?}", stored, end),
            None => trace!("inserting interval [{:?}, {:?}]", start, end),
        }
        let mut root = node::insert(self.root.take(), interval);
        root.color = Color::Black;
        self.root = Some(root);

        #[cfg(test)]
        debug_assert!(is_balanced(&self.root), "unbalanced tree after insert");

        Ok(())
    }

    /// Removes the interval `[start, end]`.
    ///
    /// Removing a valid interval that is not stored (including one whose start
    /// is stored with a different end) is a no-op.
    ///
    /// Fails with [`IntervalError::InvalidInterval`] if `start > end`, in
    /// which case the tree is left untouched.
    ///
    /// ```
    /// use llrb_interval_tree::IntervalTree;
    ///
    /// let mut tree = IntervalTree::new();
    /// tree.insert(1, 5).unwrap();
    /// tree.insert(3, 7).unwrap();
    ///
    /// tree.remove(3, 6).unwrap();
    /// assert_eq!(tree.len(), 2);
    ///
    /// tree.remove(3, 7).unwrap();
    /// assert_eq!(tree.len(), 1);
    /// assert!(!tree.contains(3, 7));
    /// ```
    pub fn remove(&mut self, start: K, end: K) -> Result<(), IntervalError<K>> {
        Interval::new(start, end).inspect_err(|err| {
            warn!("Error deleting interval: {}", err);
        })?;

        if !self.contains(start, end) {
            trace!("interval [{:?}, {:?}] is not stored", start, end);
            return Ok(());
        }

        trace!("removing interval [{:?}, {:?}]", start, end);
        // Keys are unique, so matching the start from here on removes this exact interval.
        debug_assert_eq!(self.get(start).map(|stored| stored.end()), Some(end));
        if let Some(mut root) = self.root.take() {
            if !node::is_red(&root.left) && !node::is_red(&root.right) {
                root.color = Color::Red;
            }

            self.root = node::remove(root, start);
            if let Some(root) = self.root.as_mut() {
                root.color = Color::Black;
            }
        }

        #[cfg(test)]
        debug_assert!(is_balanced(&self.root), "unbalanced tree after remove");

        Ok(())
    }

    /// Returns every stored interval overlapping `[start, end]`, in no
    /// particular order.
    ///
    /// Fails with [`IntervalError::InvalidInterval`] if `start > end`.
    ///
    /// ```
    /// use llrb_interval_tree::IntervalTree;
    ///
    /// let mut tree = IntervalTree::new();
    /// tree.insert(1, 5).unwrap();
    /// tree.insert(6, 8).unwrap();
    /// tree.insert(20, 30).unwrap();
    ///
    /// let mut found: Vec<_> = tree
    ///     .find_overlapping(5, 6)
    ///     .unwrap()
    ///     .into_iter()
    ///     .map(|i| (i.start(), i.end()))
    ///     .collect();
    /// found.sort();
    /// assert_eq!(found, vec![(1, 5), (6, 8)]);
    /// ```
    pub fn find_overlapping(
        &self,
        start: K,
        end: K,
    ) -> Result<Vec<&Interval<K>>, IntervalError<K>> {
        let query = Interval::new(start, end).inspect_err(|err| {
            warn!("Error finding overlapping intervals: {}", err);
        })?;

        let mut result = vec![];
        find_overlapping(&self.root, &query, &mut result);

        Ok(result)
    }
}

fn find_overlapping<'a, K: Ord + Copy>(
    link: &'a Link<K>,
    query: &Interval<K>,
    result: &mut Vec<&'a Interval<K>>,
) {
    let Some(node) = link else {
        return;
    };

    if query.overlaps(&node.interval) {
        result.push(&node.interval);
    }
    // Nothing on the left can reach the query if their max end-point is before it.
    if node::max_of(&node.left).is_some_and(|max| max >= query.start()) {
        find_overlapping(&node.left, query, result);
    }
    // Everything on the right starts after this node does.
    if node.interval.start() <= query.end() {
        find_overlapping(&node.right, query, result);
    }
}

fn find_containing<'a, K: Ord + Copy>(
    link: &'a Link<K>,
    point: K,
    result: &mut Vec<&'a Interval<K>>,
) {
    let Some(node) = link else {
        return;
    };

    if node.interval.contains(point) {
        result.push(&node.interval);
    }
    if node::max_of(&node.left).is_some_and(|max| max >= point) {
        find_containing(&node.left, point, result);
    }
    if node.interval.start() <= point {
        find_containing(&node.right, point, result);
    }
}

fn count_overlaps<K: Ord + Copy>(link: &Link<K>, query: &Interval<K>) -> usize {
    let Some(node) = link else {
        return 0;
    };

    let mut count = usize::from(query.overlaps(&node.interval));
    if node::max_of(&node.left).is_some_and(|max| max >= query.start()) {
        count += count_overlaps(&node.left, query);
    }
    if node.interval.start() <= query.end() {
        count += count_overlaps(&node.right, query);
    }

    count
}

/// An in-order iterator over the intervals of an [`IntervalTree`].
pub struct Iter<'a, K> {
    stack: Vec<&'a Node<K>>,
    remaining: usize,
}

impl<'a, K> Iter<'a, K> {
    fn push_left_spine(&mut self, mut link: &'a Link<K>) {
        while let Some(node) = link {
            self.stack.push(node);
            link = &node.left;
        }
    }
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = &'a Interval<K>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_spine(&node.right);
        self.remaining -= 1;

        Some(&node.interval)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K> ExactSizeIterator for Iter<'_, K> {}

impl<'a, K> IntoIterator for &'a IntervalTree<K>
where
    K: Ord + Copy,
{
    type Item = &'a Interval<K>;
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Iter<'a, K> {
        self.iter()
    }
}

/// Checks the left-leaning coloring and black balance of the tree.
#[cfg(test)]
fn is_balanced<K>(root: &Link<K>) -> bool {
    fn go<K>(link: &Link<K>, mut num_black: usize) -> bool {
        let Some(node) = link else {
            return num_black == 0;
        };
        if node.color == Color::Black {
            if num_black == 0 {
                return false;
            }
            num_black -= 1;
        } else if node::is_red(&node.left) {
            return false;
        }
        if node::is_red(&node.right) {
            return false;
        }

        go(&node.left, num_black) && go(&node.right, num_black)
    }

    if node::is_red(root) {
        return false;
    }

    let mut num_black = 0;
    let mut x = root;
    while let Some(node) = x {
        if node.color == Color::Black {
            num_black += 1;
        }
        x = &node.left;
    }

    go(root, num_black)
}
