//! Ordered containers, backed by a splay tree
#![warn(missing_docs)]

extern crate alloc;

use compact_str::CompactString;
use core::{borrow::Borrow, cmp::Ordering, fmt::Debug, iter::FusedIterator};

use crate::util::Tree;

//-----------------------------------------------------------------------------------------------//

/// An ordered container of values, implemented using a splay tree.
///
/// Values that compare equal are all kept. Lookups find the first equal value met on the way down
/// from the root, so later duplicates may be unreachable by `has` and `remove` until the earlier
/// ones are removed.
#[derive(Clone)]
pub struct SplayTree<T>
where
    T: Ord,
{
    tree: Tree<T>,
}

impl<T> SplayTree<T>
where
    T: Ord,
{
    /// Constructor
    pub fn new() -> SplayTree<T> {
        SplayTree { tree: Tree::new() }
    }

    /// Constructor
    pub fn with_capacity(capacity: usize) -> SplayTree<T> {
        SplayTree {
            tree: Tree::with_capacity(capacity),
        }
    }

    /// Get the number of values in the `SplayTree`
    #[inline]
    pub fn count(&self) -> usize {
        self.tree.count()
    }

    /// Check if there are any values in the `SplayTree`
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Remove all values from the `SplayTree`
    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// Reserves capacity for at least `additional` more values
    pub fn reserve(&mut self, additional: usize) {
        self.tree.reserve(additional);
    }

    /// Insert a value.
    ///
    /// The new value always becomes the root of the tree.
    pub fn insert(&mut self, value: T) {
        self.tree.insert_by(value, Ord::cmp);
    }

    /// Check if a value is in the tree.
    ///
    /// If it is, the matching value is promoted to the root, so this changes the shape of the tree.
    pub fn has<Q>(&mut self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let leaf = self.tree.find_by(value, |v, x: &T| v.cmp(x.borrow()));
        if !leaf == 0 {
            return false;
        }

        self.tree.splay(leaf);
        true
    }

    /// Remove a value.
    ///
    /// Returns `false`, leaving the tree untouched, if the value was not found.
    pub fn remove<Q>(&mut self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.take(value).is_some()
    }

    /// Remove a value, handing it back to the caller.
    pub fn take<Q>(&mut self, value: &Q) -> Option<T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let leaf = self.tree.find_by(value, |v, x: &T| v.cmp(x.borrow()));
        if !leaf == 0 {
            return None;
        }

        Some(self.tree.remove(leaf))
    }

    /// Visit the values in order, together with their depth below the root.
    ///
    /// Returning `false` from `visit` stops the walk.
    pub fn traverse<F>(&self, visit: F)
    where
        F: FnMut(&T, usize) -> bool,
    {
        self.tree.traverse(visit);
    }

    /// Get the first value in the tree, without reorganising it
    pub fn first(&self) -> Option<&T> {
        let leaf = self.tree.first();
        if !leaf == 0 {
            None
        } else {
            Some(self.tree.value(leaf))
        }
    }

    /// Get the last value in the tree, without reorganising it
    pub fn last(&self) -> Option<&T> {
        let leaf = self.tree.last();
        if !leaf == 0 {
            None
        } else {
            Some(self.tree.value(leaf))
        }
    }

    /// Iterate over the values in the `SplayTree`
    pub fn iter(&self) -> SplayTreeIterator<'_, T> {
        SplayTreeIterator {
            tree: &self.tree,
            leaf: self.tree.first(),
            count: self.tree.count(),
        }
    }
}

impl<T> Default for SplayTree<T>
where
    T: Ord,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Debug for SplayTree<T>
where
    T: Ord + Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        Debug::fmt(&self.tree, f)
    }
}

impl<'a, T> IntoIterator for &'a SplayTree<T>
where
    T: Ord,
{
    type Item = &'a T;
    type IntoIter = SplayTreeIterator<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

//-----------------------------------------------------------------------------------------------//

/// Iterator over a `SplayTree` or `SplayTreeBy`
pub struct SplayTreeIterator<'a, T> {
    tree: &'a Tree<T>,
    leaf: usize,
    count: usize,
}

impl<'a, T> Iterator for SplayTreeIterator<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if !self.leaf == 0 {
            return None;
        }

        let leaf = self.leaf;
        self.leaf = self.tree.next(self.leaf);
        self.count -= 1;

        Some(self.tree.value(leaf))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.count, Some(self.count))
    }
}

impl<T> ExactSizeIterator for SplayTreeIterator<'_, T> {}

impl<T> FusedIterator for SplayTreeIterator<'_, T> {}

//-----------------------------------------------------------------------------------------------//

/// An ordered container of values, implemented using a splay tree and sorted by a custom
/// function.
///
/// `compare(a, b)` should return `Less` when `a` sorts before `b`, and must be a consistent total
/// order for the tree to stay sorted.
#[derive(Clone)]
pub struct SplayTreeBy<T, F>
where
    F: Fn(&T, &T) -> Ordering,
{
    tree: Tree<T>,
    compare: F,
}

impl<T, F> SplayTreeBy<T, F>
where
    F: Fn(&T, &T) -> Ordering,
{
    /// Constructor
    pub fn new(compare: F) -> SplayTreeBy<T, F> {
        SplayTreeBy {
            tree: Tree::new(),
            compare,
        }
    }

    /// Constructor
    pub fn with_capacity(capacity: usize, compare: F) -> SplayTreeBy<T, F> {
        SplayTreeBy {
            tree: Tree::with_capacity(capacity),
            compare,
        }
    }

    /// Get the number of values in the `SplayTreeBy`
    #[inline]
    pub fn count(&self) -> usize {
        self.tree.count()
    }

    /// Check if there are any values in the `SplayTreeBy`
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Remove all values from the `SplayTreeBy`
    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// Reserves capacity for at least `additional` more values
    pub fn reserve(&mut self, additional: usize) {
        self.tree.reserve(additional);
    }

    /// Insert a value.
    ///
    /// The new value always becomes the root of the tree.
    pub fn insert(&mut self, value: T) {
        self.tree.insert_by(value, &self.compare);
    }

    /// Check if a value is in the tree, promoting it to the root if it is.
    pub fn has(&mut self, value: &T) -> bool {
        let leaf = self.tree.find_by(value, &self.compare);
        if !leaf == 0 {
            return false;
        }

        self.tree.splay(leaf);
        true
    }

    /// Remove a value.
    ///
    /// Returns `false`, leaving the tree untouched, if the value was not found.
    pub fn remove(&mut self, value: &T) -> bool {
        self.take(value).is_some()
    }

    /// Remove a value, handing it back to the caller.
    pub fn take(&mut self, value: &T) -> Option<T> {
        let leaf = self.tree.find_by(value, &self.compare);
        if !leaf == 0 {
            return None;
        }

        Some(self.tree.remove(leaf))
    }

    /// Visit the values in order, together with their depth below the root.
    ///
    /// Returning `false` from `visit` stops the walk.
    pub fn traverse<V>(&self, visit: V)
    where
        V: FnMut(&T, usize) -> bool,
    {
        self.tree.traverse(visit);
    }

    /// Get the first value in the tree, without reorganising it
    pub fn first(&self) -> Option<&T> {
        let leaf = self.tree.first();
        if !leaf == 0 {
            None
        } else {
            Some(self.tree.value(leaf))
        }
    }

    /// Get the last value in the tree, without reorganising it
    pub fn last(&self) -> Option<&T> {
        let leaf = self.tree.last();
        if !leaf == 0 {
            None
        } else {
            Some(self.tree.value(leaf))
        }
    }

    /// Iterate over the values in the `SplayTreeBy`
    pub fn iter(&self) -> SplayTreeIterator<'_, T> {
        SplayTreeIterator {
            tree: &self.tree,
            leaf: self.tree.first(),
            count: self.tree.count(),
        }
    }
}

impl<T, F> Debug for SplayTreeBy<T, F>
where
    T: Debug,
    F: Fn(&T, &T) -> Ordering,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        Debug::fmt(&self.tree, f)
    }
}

impl<'a, T, F> IntoIterator for &'a SplayTreeBy<T, F>
where
    F: Fn(&T, &T) -> Ordering,
{
    type Item = &'a T;
    type IntoIter = SplayTreeIterator<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

//-----------------------------------------------------------------------------------------------//

/// An ordered container of strings, implemented using a splay tree.
///
/// This is specialised version of `SplayTree` that stores values as a compact string.
#[derive(Clone)]
pub struct StringSplayTree {
    tree: Tree<CompactString>,
}

impl StringSplayTree {
    /// Constructor
    pub fn new() -> StringSplayTree {
        StringSplayTree { tree: Tree::new() }
    }

    /// Constructor
    pub fn with_capacity(capacity: usize) -> StringSplayTree {
        StringSplayTree {
            tree: Tree::with_capacity(capacity),
        }
    }

    /// Get the number of strings in the `StringSplayTree`
    #[inline]
    pub fn count(&self) -> usize {
        self.tree.count()
    }

    /// Check if there are any strings in the `StringSplayTree`
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Remove all strings from the `StringSplayTree`
    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// Reserves capacity for at least `additional` more strings
    pub fn reserve(&mut self, additional: usize) {
        self.tree.reserve(additional);
    }

    /// Insert a string.
    ///
    /// The new string always becomes the root of the tree.
    pub fn insert(&mut self, value: &str) {
        self.tree.insert_by(CompactString::new(value), Ord::cmp);
    }

    /// Check if a string is in the tree, promoting it to the root if it is.
    pub fn has(&mut self, value: &str) -> bool {
        let leaf = self.tree.find_by(value, compare_str);
        if !leaf == 0 {
            return false;
        }

        self.tree.splay(leaf);
        true
    }

    /// Remove a string.
    ///
    /// Returns `false`, leaving the tree untouched, if the string was not found.
    pub fn remove(&mut self, value: &str) -> bool {
        self.take(value).is_some()
    }

    /// Remove a string, handing it back to the caller.
    pub fn take(&mut self, value: &str) -> Option<CompactString> {
        let leaf = self.tree.find_by(value, compare_str);
        if !leaf == 0 {
            return None;
        }

        Some(self.tree.remove(leaf))
    }

    /// Visit the strings in order, together with their depth below the root.
    ///
    /// Returning `false` from `visit` stops the walk.
    pub fn traverse<F>(&self, mut visit: F)
    where
        F: FnMut(&str, usize) -> bool,
    {
        self.tree.traverse(|value, depth| visit(value.as_str(), depth));
    }

    /// Get the first string in the tree, without reorganising it
    pub fn first(&self) -> Option<&str> {
        let leaf = self.tree.first();
        if !leaf == 0 {
            None
        } else {
            Some(self.tree.value(leaf).as_str())
        }
    }

    /// Get the last string in the tree, without reorganising it
    pub fn last(&self) -> Option<&str> {
        let leaf = self.tree.last();
        if !leaf == 0 {
            None
        } else {
            Some(self.tree.value(leaf).as_str())
        }
    }

    /// Iterate over the strings in the `StringSplayTree`
    pub fn iter(&self) -> StringSplayTreeIterator<'_> {
        StringSplayTreeIterator {
            tree: &self.tree,
            leaf: self.tree.first(),
            count: self.tree.count(),
        }
    }
}

impl Default for StringSplayTree {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for StringSplayTree {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        Debug::fmt(&self.tree, f)
    }
}

impl<'a> IntoIterator for &'a StringSplayTree {
    type Item = &'a str;
    type IntoIter = StringSplayTreeIterator<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// Compare a borrowed string against a stored one
fn compare_str(value: &str, x: &CompactString) -> Ordering {
    value.cmp(x.as_str())
}

//-----------------------------------------------------------------------------------------------//

/// Iterator over a `StringSplayTree`
pub struct StringSplayTreeIterator<'a> {
    tree: &'a Tree<CompactString>,
    leaf: usize,
    count: usize,
}

impl<'a> Iterator for StringSplayTreeIterator<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        if !self.leaf == 0 {
            return None;
        }

        let leaf = self.leaf;
        self.leaf = self.tree.next(self.leaf);
        self.count -= 1;

        Some(self.tree.value(leaf).as_str())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.count, Some(self.count))
    }
}

impl ExactSizeIterator for StringSplayTreeIterator<'_> {}

impl FusedIterator for StringSplayTreeIterator<'_> {}

//-----------------------------------------------------------------------------------------------//

#[cfg(test)]
fn walk<T: Ord + Copy>(tree: &SplayTree<T>) -> alloc::vec::Vec<(T, usize)> {
    let mut v = alloc::vec::Vec::new();
    tree.traverse(|value, depth| {
        v.push((*value, depth));
        true
    });
    v
}

#[test]
// The reference walk of inserts, lookups and removals, checking every depth
fn test_splay_tree_0() {
    let mut tree = SplayTree::new();

    for s in ["A", "B", "C", "D", "E"] {
        tree.insert(s);
    }
    assert_eq!(walk(&tree), [("A", 4), ("B", 3), ("C", 2), ("D", 1), ("E", 0)]);

    assert!(tree.has("A"));
    assert_eq!(walk(&tree), [("A", 0), ("B", 2), ("C", 3), ("D", 1), ("E", 2)]);

    assert!(tree.has("C"));
    assert_eq!(walk(&tree), [("A", 1), ("B", 2), ("C", 0), ("D", 1), ("E", 2)]);

    tree.insert("F");
    assert_eq!(
        walk(&tree),
        [("A", 2), ("B", 3), ("C", 1), ("D", 3), ("E", 2), ("F", 0)]
    );

    tree.insert("G");
    assert_eq!(
        walk(&tree),
        [("A", 3), ("B", 4), ("C", 2), ("D", 4), ("E", 3), ("F", 1), ("G", 0)]
    );

    assert!(tree.has("D"));
    assert_eq!(
        walk(&tree),
        [("A", 2), ("B", 3), ("C", 1), ("D", 0), ("E", 2), ("F", 1), ("G", 2)]
    );

    assert!(tree.has("B"));
    assert_eq!(
        walk(&tree),
        [("A", 1), ("B", 0), ("C", 2), ("D", 1), ("E", 3), ("F", 2), ("G", 3)]
    );

    // Two children, so the predecessor "C" takes its place as root
    assert!(tree.remove("D"));
    assert_eq!(
        walk(&tree),
        [("A", 2), ("B", 1), ("C", 0), ("E", 2), ("F", 1), ("G", 2)]
    );

    assert!(tree.remove("B"));
    assert_eq!(walk(&tree), [("A", 1), ("C", 0), ("E", 2), ("F", 1), ("G", 2)]);

    assert!(tree.remove("E"));
    assert_eq!(walk(&tree), [("A", 1), ("C", 0), ("F", 1), ("G", 2)]);

    assert!(tree.remove("F"));
    assert_eq!(walk(&tree), [("A", 1), ("C", 0), ("G", 1)]);

    tree.insert("B");
    assert_eq!(walk(&tree), [("A", 1), ("B", 0), ("C", 1), ("G", 2)]);

    assert!(tree.remove("A"));
    assert_eq!(walk(&tree), [("B", 0), ("C", 1), ("G", 2)]);

    tree.insert("A");
    assert_eq!(walk(&tree), [("A", 0), ("B", 1), ("C", 2), ("G", 3)]);

    assert!(tree.has("G"));
    assert_eq!(walk(&tree), [("A", 1), ("B", 3), ("C", 2), ("G", 0)]);

    assert!(tree.remove("G"));
    assert_eq!(walk(&tree), [("A", 0), ("B", 2), ("C", 1)]);

    assert!(!tree.has("G"));
    assert_eq!(walk(&tree), [("A", 0), ("B", 2), ("C", 1)]);

    assert!(!tree.remove("G"));
    assert_eq!(walk(&tree), [("A", 0), ("B", 2), ("C", 1)]);

    assert!(tree.remove("C"));
    assert_eq!(walk(&tree), [("A", 0), ("B", 1)]);

    tree.tree.check_by(Ord::cmp);
}

#[test]
// Duplicates are kept, and only the first one met is found
fn test_splay_tree_1() {
    use alloc::vec::Vec;

    let mut tree = SplayTree::new();

    tree.insert(5);
    tree.insert(3);
    tree.insert(5);
    tree.insert(7);

    assert_eq!(tree.count(), 4);
    assert_eq!(tree.iter().copied().collect::<Vec<_>>(), [3, 5, 5, 7]);

    assert!(tree.remove(&5));
    assert_eq!(tree.count(), 3);
    assert!(tree.has(&5));

    assert!(tree.remove(&5));
    assert!(!tree.has(&5));
    assert_eq!(tree.iter().copied().collect::<Vec<_>>(), [3, 7]);
    tree.tree.check_by(Ord::cmp);
}

#[test]
// Early exit from a traversal stops all pending visits
fn test_splay_tree_2() {
    use alloc::vec::Vec;

    let mut tree = SplayTree::new();
    for v in [4, 2, 6, 1, 3, 5, 7] {
        tree.insert(v);
    }

    let mut seen = Vec::new();
    tree.traverse(|v, _| {
        seen.push(*v);
        *v != 3
    });
    assert_eq!(seen, [1, 2, 3]);

    // Traversal does not change the shape
    let before = walk(&tree);
    tree.traverse(|_, _| true);
    assert_eq!(walk(&tree), before);

    assert_eq!(tree.first(), Some(&1));
    assert_eq!(tree.last(), Some(&7));
    assert_eq!(walk(&tree), before);
}

#[test]
// Sorted inserts build a deep chain, which traversal must walk without recursion
fn test_splay_tree_3() {
    const COUNT: usize = 100000;

    let mut tree = SplayTree::with_capacity(COUNT);
    for v in 0..COUNT {
        tree.insert(v);
    }

    let mut deepest = 0usize;
    let mut count = 0;
    tree.traverse(|_, depth| {
        deepest = deepest.max(depth);
        count += 1;
        true
    });
    assert_eq!(count, COUNT);
    assert_eq!(deepest, COUNT - 1);

    assert!(tree.has(&0));
    assert_eq!(walk(&tree)[0], (0, 0));
    assert_eq!(tree.iter().len(), COUNT);
}

#[test]
// A stress test of size conservation, ordering and parent/child links
fn test_splay_tree_4() {
    use rand::prelude::*;

    const COUNT: usize = 20000;

    let mut rng = SmallRng::seed_from_u64(1234567890);
    let mut tree = SplayTree::new();
    let mut count = 0;

    for i in 0..COUNT {
        let value = rng.random_range(0..1000u32);
        match rng.random_range(0..3) {
            0 => {
                tree.insert(value);
                count += 1;
                assert_eq!(walk(&tree).iter().find(|(_, d)| *d == 0), Some(&(value, 0)));
            }
            1 => {
                if tree.has(&value) {
                    assert_eq!(tree.tree.value(tree.tree.root()), &value);
                } else {
                    let before = walk(&tree);
                    assert!(!tree.remove(&value));
                    assert_eq!(walk(&tree), before);
                }
            }
            _ => {
                if tree.remove(&value) {
                    count -= 1;
                }
            }
        }

        assert_eq!(tree.count(), count);
        if i % 100 == 0 {
            tree.tree.check_by(Ord::cmp);
        }
    }

    tree.tree.check_by(Ord::cmp);
}

#[test]
// A stress test with inserting and removing everything
fn test_splay_tree_5() {
    use rand::prelude::*;

    const COUNT: usize = 1000000;

    let mut rng = SmallRng::seed_from_u64(5678901234);

    let mut tree = SplayTree::new();
    for _ in 0..COUNT {
        let value = rng.random_range(0..usize::MAX);
        tree.insert(value);
    }

    assert_eq!(tree.count(), COUNT);

    let mut rng = SmallRng::seed_from_u64(5678901234);

    for _ in 0..COUNT {
        let value = rng.random_range(0..usize::MAX);
        assert!(tree.remove(&value));
    }

    assert!(tree.is_empty());
}

#[test]
// A custom order, sorting in reverse
fn test_splay_tree_by_0() {
    use alloc::vec::Vec;

    let mut tree = SplayTreeBy::new(|a: &i32, b: &i32| b.cmp(a));

    for v in [1, 5, 3, 9] {
        tree.insert(v);
    }

    assert_eq!(tree.iter().copied().collect::<Vec<_>>(), [9, 5, 3, 1]);
    assert!(tree.has(&3));
    assert!(!tree.has(&4));
    assert_eq!(tree.take(&5), Some(5));
    assert!(!tree.remove(&5));
    assert_eq!(tree.first(), Some(&9));
    assert_eq!(tree.last(), Some(&1));
    assert_eq!(tree.count(), 3);
    tree.tree.check_by(|a, b| b.cmp(a));
}

#[test]
// Strings, with lookups by `&str`
fn test_string_splay_tree_0() {
    use alloc::vec::Vec;

    let mut tree = StringSplayTree::new();

    tree.insert("Five");
    tree.insert("One");
    tree.insert("Nine");

    assert!(tree.has("Five"));
    assert!(!tree.has("Seven"));

    let mut top = None;
    tree.traverse(|s, depth| {
        if depth == 0 {
            top = Some(CompactString::new(s));
        }
        true
    });
    assert_eq!(top.as_deref(), Some("Five"));

    assert_eq!(tree.iter().collect::<Vec<_>>(), ["Five", "Nine", "One"]);
    assert_eq!(tree.take("One").as_deref(), Some("One"));
    assert!(!tree.remove("One"));
    assert_eq!(tree.count(), 2);

    tree.clear();
    assert!(tree.is_empty());
    assert_eq!(tree.first(), None);
}
