use std::cmp;
use std::fmt;

use crate::interval::Interval;

pub(crate) type Link<K> = Option<Box<Node<K>>>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Color {
    Red,
    Black,
}

impl Color {
    fn flip(self) -> Self {
        match self {
            Color::Red => Color::Black,
            Color::Black => Color::Red,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Color::Red => f.write_str("RED"),
            Color::Black => f.write_str("BLACK"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Node<K> {
    pub interval: Interval<K>,
    pub max: K, // Max end-point of the subtree.
    pub count: usize, // Number of nodes in the subtree.
    pub color: Color,
    pub left: Link<K>,
    pub right: Link<K>,
}

impl<K> fmt::Display for Node<K>
where
    K: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} (max: {}, color: {})",
            self.interval, self.max, self.color
        )
    }
}

impl<K> Node<K>
where
    K: Ord + Copy,
{
    pub fn new(interval: Interval<K>) -> Node<K> {
        Node {
            max: interval.end(),
            interval,
            count: 1,
            color: Color::Red,
            left: None,
            right: None,
        }
    }

    /// Recomputes `max` and `count` from the interval and the direct children.
    pub fn update(&mut self) {
        let end = self.interval.end();
        self.max = cmp::max(max_of(&self.left), max_of(&self.right))
            .map_or(end, |children| cmp::max(end, children));
        self.count = 1 + size_of(&self.left) + size_of(&self.right);
    }
}

/// `None` for an absent subtree, which orders below any end-point.
pub(crate) fn max_of<K: Copy>(link: &Link<K>) -> Option<K> {
    link.as_ref().map(|node| node.max)
}

pub(crate) fn size_of<K>(link: &Link<K>) -> usize {
    link.as_ref().map_or(0, |node| node.count)
}

pub(crate) fn is_red<K>(link: &Link<K>) -> bool {
    matches!(link, Some(node) if node.color == Color::Red)
}

fn is_left_red<K>(link: &Link<K>) -> bool {
    link.as_ref().is_some_and(|node| is_red(&node.left))
}

/// Make a right-leaning red link lean to the left.
fn rotate_left<K: Ord + Copy>(mut h: Box<Node<K>>) -> Box<Node<K>> {
    debug_assert!(is_red(&h.right));

    let mut x = h
        .right
        .take()
        .expect("rotate_left requires a right child");
    h.right = x.left.take();
    x.color = h.color;
    h.color = Color::Red;
    h.update();
    x.left = Some(h);
    x.update();

    x
}

/// Make a left-leaning red link lean to the right.
fn rotate_right<K: Ord + Copy>(mut h: Box<Node<K>>) -> Box<Node<K>> {
    debug_assert!(is_red(&h.left));

    let mut x = h.left.take().expect("rotate_right requires a left child");
    h.left = x.right.take();
    x.color = h.color;
    h.color = Color::Red;
    h.update();
    x.right = Some(h);
    x.update();

    x
}

fn flip_colors<K>(h: &mut Node<K>) {
    h.color = h.color.flip();
    for child in [&mut h.left, &mut h.right].into_iter().flatten() {
        child.color = child.color.flip();
    }
}

/// Restores the left-leaning shape on the way back up from an insertion.
pub(crate) fn fix_up<K: Ord + Copy>(mut h: Box<Node<K>>) -> Box<Node<K>> {
    if is_red(&h.right) && !is_red(&h.left) {
        h = rotate_left(h);
    }
    if is_red(&h.left) && is_left_red(&h.left) {
        h = rotate_right(h);
    }
    if is_red(&h.left) && is_red(&h.right) {
        flip_colors(&mut h);
    }
    h.update();

    h
}

/// Restores the left-leaning shape on the way back up from a deletion.
pub(crate) fn balance<K: Ord + Copy>(mut h: Box<Node<K>>) -> Box<Node<K>> {
    if is_red(&h.right) {
        h = rotate_left(h);
    }
    if is_red(&h.left) && is_left_red(&h.left) {
        h = rotate_right(h);
    }
    if is_red(&h.left) && is_red(&h.right) {
        flip_colors(&mut h);
    }
    h.update();

    h
}

/// Assuming `h` is red and both `h.left` and `h.left.left` are black, make
/// `h.left` or one of its children red.
fn move_red_left<K: Ord + Copy>(mut h: Box<Node<K>>) -> Box<Node<K>> {
    flip_colors(&mut h);
    if is_left_red(&h.right) {
        h.right = h.right.take().map(rotate_right);
        h = rotate_left(h);
        flip_colors(&mut h);
    }

    h
}

/// Assuming `h` is red and both `h.right` and `h.right.left` are black, make
/// `h.right` or one of its children red.
fn move_red_right<K: Ord + Copy>(mut h: Box<Node<K>>) -> Box<Node<K>> {
    flip_colors(&mut h);
    if is_left_red(&h.left) {
        h = rotate_right(h);
        flip_colors(&mut h);
    }

    h
}

/// Inserts `interval` into the subtree rooted at `link` and returns the new root.
///
/// An interval whose start is already present only ever grows the stored end.
pub(crate) fn insert<K: Ord + Copy>(link: Link<K>, interval: Interval<K>) -> Box<Node<K>> {
    let Some(mut h) = link else {
        return Box::new(Node::new(interval));
    };

    match interval.start().cmp(&h.interval.start()) {
        cmp::Ordering::Less => h.left = Some(insert(h.left.take(), interval)),
        cmp::Ordering::Greater => h.right = Some(insert(h.right.take(), interval)),
        cmp::Ordering::Equal => {
            if interval.end() > h.interval.end() {
                h.interval = h.interval.with_end(interval.end());
            }
        }
    }

    fix_up(h)
}

/// Removes the interval keyed at `start` from the subtree rooted at `h`.
///
/// The caller guarantees the key is present in the subtree.
pub(crate) fn remove<K: Ord + Copy>(mut h: Box<Node<K>>, start: K) -> Link<K> {
    if start < h.interval.start() {
        if !is_red(&h.left) && !is_left_red(&h.left) {
            h = move_red_left(h);
        }
        h.left = h.left.take().and_then(|left| remove(left, start));
    } else {
        if is_red(&h.left) {
            h = rotate_right(h);
        }
        if start == h.interval.start() && h.right.is_none() {
            debug_assert!(h.left.is_none());
            return None;
        }
        if !is_red(&h.right) && !is_left_red(&h.right) {
            h = move_red_right(h);
        }
        if start == h.interval.start() {
            if let Some(right) = h.right.take() {
                let (right, successor) = remove_min(right);
                h.interval = successor;
                h.right = right;
            }
        } else {
            h.right = h.right.take().and_then(|right| remove(right, start));
        }
    }

    Some(balance(h))
}

/// Removes the leftmost node of the subtree, returning the new root and the
/// removed interval.
pub(crate) fn remove_min<K: Ord + Copy>(mut h: Box<Node<K>>) -> (Link<K>, Interval<K>) {
    if h.left.is_some() && !is_red(&h.left) && !is_left_red(&h.left) {
        h = move_red_left(h);
    }

    match h.left.take() {
        None => {
            debug_assert!(h.right.is_none());
            (h.right.take(), h.interval)
        }
        Some(left) => {
            let (left, min) = remove_min(left);
            h.left = left;
            (Some(balance(h)), min)
        }
    }
}
