//! Utility types to support self balancing binary splay trees

#![warn(missing_docs)]

extern crate alloc;
use alloc::vec::Vec;

use core::{
    cmp::Ordering,
    fmt::{Debug, Display},
};

//-----------------------------------------------------------------------------------------------//

// A node in a splay tree
#[derive(Clone)]
struct Node<T> {
    value: T,
    parent: usize,
    left: usize,
    right: usize,
}

//-----------------------------------------------------------------------------------------------//

/// A splay tree of values, stored in a contiguous arena
///
/// Nodes refer to their parent and children by index into the arena, with `usize::MAX` (`!0`)
/// meaning "none". The tree never looks inside a value, all ordering decisions are made by the
/// comparison function supplied to `insert_by` and `find_by`. Supplying different comparison
/// functions to the same tree gives undefined (but memory safe) results.
#[derive(Clone)]
pub struct Tree<T> {
    node: Vec<Node<T>>,
    root: usize,
}

impl<T> Tree<T> {
    /// Construct an empty tree
    pub fn new() -> Tree<T> {
        Tree {
            node: Vec::new(),
            root: !0,
        }
    }

    /// Construct an empty tree, pre-allocating a given capacity
    pub fn with_capacity(capacity: usize) -> Tree<T> {
        Tree {
            node: Vec::with_capacity(capacity),
            root: !0,
        }
    }

    /// Get the number of nodes in the tree
    #[inline]
    pub fn count(&self) -> usize {
        self.node.len()
    }

    /// Check if the tree has no nodes
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.node.is_empty()
    }

    /// Remove all nodes from the tree
    pub fn clear(&mut self) {
        self.node.clear();
        self.root = !0;
    }

    /// Reserves capacity for at least `additional` more nodes
    pub fn reserve(&mut self, additional: usize) {
        self.node.reserve(additional);
    }

    /// Get the root node, or `usize::MAX` if the tree is empty
    #[inline]
    pub fn root(&self) -> usize {
        self.root
    }

    /// Get the value held by a node
    #[inline]
    pub fn value(&self, leaf: usize) -> &T {
        &self.node[leaf].value
    }

    /// Get the parent of a node, or `usize::MAX` for the root
    #[inline]
    pub fn parent(&self, leaf: usize) -> usize {
        self.node[leaf].parent
    }

    /// Get the left child of a node, or `usize::MAX` if there is none
    #[inline]
    pub fn left(&self, leaf: usize) -> usize {
        self.node[leaf].left
    }

    /// Get the right child of a node, or `usize::MAX` if there is none
    #[inline]
    pub fn right(&self, leaf: usize) -> usize {
        self.node[leaf].right
    }

    /// Get the number of edges between a node and the root
    pub fn depth(&self, mut leaf: usize) -> usize {
        let mut depth = 0;
        loop {
            let y = self.node[leaf].parent;
            if !y == 0 {
                return depth;
            }
            depth += 1;
            leaf = y;
        }
    }

    /// Find a node by value
    ///
    /// This is a plain binary search descent from the root, it does not change the shape of the
    /// tree. `compare` is called as `compare(value, node_value)`. The first node encountered that
    /// compares equal is returned, or `usize::MAX` if there is none.
    pub fn find_by<Q, F>(&self, value: &Q, compare: F) -> usize
    where
        Q: ?Sized,
        F: Fn(&Q, &T) -> Ordering,
    {
        let mut x = self.root;

        // `x` should be a root
        debug_assert!(!x == 0 || self.node[x].parent == !0);

        loop {
            if !x == 0 {
                return !0;
            }

            match compare(value, &self.node[x].value) {
                Ordering::Equal => return x,
                Ordering::Less => x = self.node[x].left,
                Ordering::Greater => x = self.node[x].right,
            }
        }
    }

    /// Insert a value
    ///
    /// The value is attached below the last node visited by a binary search descent, going left
    /// when it compares less than a node and right otherwise, so equal values always go right and
    /// duplicates are kept. The new node is then splayed to the root and its index returned.
    pub fn insert_by<F>(&mut self, value: T, compare: F) -> usize
    where
        F: Fn(&T, &T) -> Ordering,
    {
        let leaf = self.node.len();

        // First node is a special case
        if !self.root == 0 {
            self.node.push(Node {
                value,
                parent: !0,
                left: !0,
                right: !0,
            });
            self.root = leaf;
            return leaf;
        }

        let mut x = self.root;
        let (parent, left) = loop {
            let left = compare(&value, &self.node[x].value) == Ordering::Less;
            let y = if left {
                self.node[x].left
            } else {
                self.node[x].right
            };
            if !y == 0 {
                break (x, left);
            }
            x = y;
        };

        self.node.push(Node {
            value,
            parent,
            left: !0,
            right: !0,
        });

        if left {
            self.node[parent].left = leaf;
        } else {
            self.node[parent].right = leaf;
        }

        self.splay(leaf);
        leaf
    }

    /// Remove a node, returning its value
    ///
    /// A node with at most one child is replaced by that child. A node with two children is first
    /// splayed to the root, then the largest node of its left subtree is spliced into its place and
    /// becomes the new root.
    ///
    /// The arena slot is reclaimed straight away by moving the last node of the arena into it, so
    /// the index of that node changes. Any indices held by the caller should be treated as stale.
    pub fn remove(&mut self, leaf: usize) -> T {
        debug_assert!(!leaf != 0);

        let a = self.node[leaf].left;
        let b = self.node[leaf].right;

        if !a == 0 {
            self.transplant(leaf, b);
        } else if !b == 0 {
            self.transplant(leaf, a);
        } else {
            self.splay(leaf);
            debug_assert_eq!(self.root, leaf);

            let a = self.node[leaf].left;
            let b = self.node[leaf].right;
            debug_assert!(!a != 0 && !b != 0);

            // Detach the predecessor, keeping its left subtree in place
            let s = self.max(a);
            let c = self.node[s].left;
            self.transplant(s, c);

            let a = self.node[leaf].left;
            self.node[s].left = a;
            if !a != 0 {
                self.node[a].parent = s;
            }
            self.node[s].right = b;
            self.node[b].parent = s;
            self.node[s].parent = !0;
            self.root = s;
        }

        self.release(leaf)
    }

    /// Promote a node to be the root
    ///
    /// The order of the nodes is unchanged. Each step looks at the node's parent and grandparent:
    /// with no grandparent a single rotation finishes (zig), when node and parent lean the same way
    /// the grandparent is rotated then the parent (zig-zig), otherwise the parent is rotated then
    /// the grandparent (zig-zag). Repeated application gives amortised log(N) access.
    pub fn splay(&mut self, x: usize) {
        loop {
            let p = self.node[x].parent;
            if !p == 0 {
                return;
            }

            let x_left = self.node[p].left == x;
            debug_assert!(x_left || self.node[p].right == x);

            let g = self.node[p].parent;
            if !g == 0 {
                // Zig
                if x_left {
                    self.rotate_right(p);
                } else {
                    self.rotate_left(p);
                }
                return;
            }

            let p_left = self.node[g].left == p;
            debug_assert!(p_left || self.node[g].right == p);

            match (x_left, p_left) {
                // Zig-zig
                (true, true) => {
                    self.rotate_right(g);
                    self.rotate_right(p);
                }
                (false, false) => {
                    self.rotate_left(g);
                    self.rotate_left(p);
                }
                // Zig-zag
                (false, true) => {
                    self.rotate_left(p);
                    self.rotate_right(g);
                }
                (true, false) => {
                    self.rotate_right(p);
                    self.rotate_left(g);
                }
            }
        }
    }

    /// Rotate a node down to the left, promoting its right child into its place
    ///
    /// The right child must exist. Its left subtree becomes the right subtree of `n`. The promoted
    /// node is returned.
    pub fn rotate_left(&mut self, n: usize) -> usize {
        let t = self.node[n].right;
        debug_assert!(!t != 0);

        let p = self.node[n].parent;
        let b = self.node[t].left;

        self.node[t].parent = p;
        self.node[n].right = b;
        if !b != 0 {
            self.node[b].parent = n;
        }
        self.node[t].left = n;
        self.node[n].parent = t;
        self.replace_child(p, n, t);

        t
    }

    /// Rotate a node down to the right, promoting its left child into its place
    ///
    /// The left child must exist. Its right subtree becomes the left subtree of `n`. The promoted
    /// node is returned.
    pub fn rotate_right(&mut self, n: usize) -> usize {
        let t = self.node[n].left;
        debug_assert!(!t != 0);

        let p = self.node[n].parent;
        let b = self.node[t].right;

        self.node[t].parent = p;
        self.node[n].left = b;
        if !b != 0 {
            self.node[b].parent = n;
        }
        self.node[t].right = n;
        self.node[n].parent = t;
        self.replace_child(p, n, t);

        t
    }

    /// Visit every node in order, with its depth below the root
    ///
    /// The walk stops as soon as `visit` returns `false`. The tree is not changed.
    pub fn traverse<F>(&self, mut visit: F)
    where
        F: FnMut(&T, usize) -> bool,
    {
        let mut x = self.root;
        if !x == 0 {
            return;
        }

        let mut depth = 0;
        loop {
            let y = self.node[x].left;
            if !y == 0 {
                break;
            }
            x = y;
            depth += 1;
        }

        loop {
            if !visit(&self.node[x].value, depth) {
                return;
            }

            let y = self.node[x].right;
            if !y != 0 {
                x = y;
                depth += 1;
                loop {
                    let z = self.node[x].left;
                    if !z == 0 {
                        break;
                    }
                    x = z;
                    depth += 1;
                }
                continue;
            }

            loop {
                let y = self.node[x].parent;
                if !y == 0 {
                    return;
                }
                depth -= 1;
                if self.node[y].left == x {
                    x = y;
                    break;
                }
                debug_assert_eq!(self.node[y].right, x);
                x = y;
            }
        }
    }

    /// Get the first node in the tree
    #[inline]
    pub fn first(&self) -> usize {
        first(&self.node, self.root)
    }

    /// Get the last node in the tree
    #[inline]
    pub fn last(&self) -> usize {
        last(&self.node, self.root)
    }

    /// Get the previous node in the tree
    #[inline]
    pub fn prev(&self, leaf: usize) -> usize {
        prev(&self.node, leaf)
    }

    /// Get the next node in the tree
    #[inline]
    pub fn next(&self, leaf: usize) -> usize {
        next(&self.node, leaf)
    }

    // Point whichever slot of `p` held `old` at `new`, or the root if `p` is none
    fn replace_child(&mut self, p: usize, old: usize, new: usize) {
        if !p == 0 {
            self.root = new;
        } else if self.node[p].left == old {
            self.node[p].left = new;
        } else {
            debug_assert_eq!(self.node[p].right, old);
            self.node[p].right = new;
        }
    }

    // Put `y` (possibly none) in the place of `x`
    fn transplant(&mut self, x: usize, y: usize) {
        let p = self.node[x].parent;
        self.replace_child(p, x, y);
        if !y != 0 {
            self.node[y].parent = p;
        }
    }

    // Get the right-most node below `x`
    fn max(&self, mut x: usize) -> usize {
        loop {
            let y = self.node[x].right;
            if !y == 0 {
                return x;
            }
            x = y;
        }
    }

    // Free the slot of a detached node, moving the last node of the arena into it
    fn release(&mut self, x: usize) -> T {
        let last = self.node.len() - 1;

        if x != last {
            let moved = &self.node[last];
            let (parent, left, right) = (moved.parent, moved.left, moved.right);

            if !parent == 0 {
                debug_assert_eq!(self.root, last);
                self.root = x;
            } else if self.node[parent].left == last {
                self.node[parent].left = x;
            } else {
                debug_assert_eq!(self.node[parent].right, last);
                self.node[parent].right = x;
            }

            if !left != 0 {
                self.node[left].parent = x;
            }
            if !right != 0 {
                self.node[right].parent = x;
            }
        }

        self.node.swap_remove(x).value
    }

    // TEST : Check the parent/child links, the node count and the order of values
    #[cfg(test)]
    pub(crate) fn check_by<F>(&self, compare: F)
    where
        F: Fn(&T, &T) -> Ordering,
    {
        assert!(!self.root == 0 || self.node[self.root].parent == !0);

        let mut count = 0;
        let mut x = self.first();
        let mut y = !0;

        while !x != 0 {
            let l = self.node[x].left;
            let r = self.node[x].right;

            if !l != 0 {
                assert_eq!(self.node[l].parent, x);
            }
            if !r != 0 {
                assert_eq!(self.node[r].parent, x);
            }

            if !y != 0 {
                assert_ne!(compare(&self.node[y].value, &self.node[x].value), Ordering::Greater);
            }

            count += 1;
            y = x;
            x = self.next(x);
        }

        assert_eq!(count, self.node.len());
    }
}

impl<T> Default for Tree<T> {
    fn default() -> Self {
        Tree::new()
    }
}

impl<T: Display> Display for Tree<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "[ ")?;
        let mut leaf = self.first();
        while !leaf != 0 {
            write!(f, "{} ", self.node[leaf].value)?;
            leaf = self.next(leaf);
        }
        write!(f, "]")?;
        Ok(())
    }
}

impl<T: Debug> Debug for Tree<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut list = f.debug_list();
        let mut leaf = self.first();
        while !leaf != 0 {
            list.entry(&self.node[leaf].value);
            leaf = self.next(leaf);
        }
        list.finish()
    }
}

//-----------------------------------------------------------------------------------------------//

// Get the first node (the left-most)
fn first<T>(node: &[Node<T>], mut x: usize) -> usize {
    // `x` should be a root
    debug_assert!(!x == 0 || node[x].parent == !0);

    if !x == 0 {
        return !0;
    }

    loop {
        let y = node[x].left;
        if !y == 0 {
            return x;
        }
        x = y;
    }
}

// Get the last node (the right-most)
fn last<T>(node: &[Node<T>], mut x: usize) -> usize {
    // `x` should be a root
    debug_assert!(!x == 0 || node[x].parent == !0);

    if !x == 0 {
        return !0;
    }

    loop {
        let y = node[x].right;
        if !y == 0 {
            return x;
        }
        x = y;
    }
}

// Get the logical predecessor to a node
fn prev<T>(node: &[Node<T>], mut x: usize) -> usize {
    let mut y = node[x].left;
    if !y != 0 {
        loop {
            let z = node[y].right;
            if !z == 0 {
                return y;
            }
            y = z;
        }
    }

    loop {
        let y = node[x].parent;
        if !y == 0 {
            return !0;
        }
        if node[y].right == x {
            return y;
        }
        debug_assert_eq!(node[y].left, x);
        x = y;
    }
}

// Get the logical successor to a node
fn next<T>(node: &[Node<T>], mut x: usize) -> usize {
    let mut y = node[x].right;
    if !y != 0 {
        loop {
            let z = node[y].left;
            if !z == 0 {
                return y;
            }
            y = z;
        }
    }

    loop {
        let y = node[x].parent;
        if !y == 0 {
            return !0;
        }
        if node[y].left == x {
            return y;
        }
        debug_assert_eq!(node[y].right, x);
        x = y;
    }
}

//-----------------------------------------------------------------------------------------------//

#[test]
// Rotations swap a node with a child and keep the order
fn test_tree_rotate() {
    let mut tree = Tree::new();
    let cmp = |a: &i32, b: &i32| a.cmp(b);

    // Sorted inserts leave a left leaning chain 3 -> 2 -> 1
    tree.insert_by(1, cmp);
    tree.insert_by(2, cmp);
    let c = tree.insert_by(3, cmp);
    assert_eq!(tree.root(), c);

    let b = tree.rotate_right(c);
    assert_eq!(tree.root(), b);
    assert_eq!(*tree.value(b), 2);
    assert_eq!(tree.right(b), c);
    assert_eq!(tree.parent(c), b);
    assert_eq!(*tree.value(tree.left(b)), 1);
    tree.check_by(cmp);

    let c = tree.rotate_left(b);
    assert_eq!(tree.root(), c);
    assert_eq!(tree.left(c), b);
    assert_eq!(tree.depth(tree.left(b)), 2);
    tree.check_by(cmp);
}

#[test]
// Removing a node moves the last node of the arena into the freed slot
fn test_tree_remove_relocates() {
    let mut tree = Tree::new();
    let cmp = |a: &i32, b: &i32| a.cmp(b);

    for v in [5, 3, 8, 1, 4, 7, 9] {
        tree.insert_by(v, cmp);
    }
    tree.check_by(cmp);

    let leaf = tree.find_by(&5, cmp);
    assert_eq!(tree.remove(leaf), 5);
    assert_eq!(tree.count(), 6);
    tree.check_by(cmp);

    // The node that used to be last is now at the freed index
    assert!(!tree.find_by(&9, cmp) != 0);
    assert_eq!(tree.find_by(&5, cmp), !0);

    while !tree.is_empty() {
        let root = tree.root();
        tree.remove(root);
        tree.check_by(cmp);
    }
    assert_eq!(tree.root(), !0);
}

#[test]
// Traversal reports depths and honours early exit
fn test_tree_traverse() {
    use alloc::vec;

    let mut tree = Tree::new();
    let cmp = |a: &i32, b: &i32| a.cmp(b);

    for v in [2, 1, 3] {
        tree.insert_by(v, cmp);
    }

    let mut seen = Vec::new();
    tree.traverse(|v, depth| {
        seen.push((*v, depth));
        true
    });
    assert_eq!(seen, vec![(1, 2), (2, 1), (3, 0)]);

    let mut seen = Vec::new();
    tree.traverse(|v, _| {
        seen.push(*v);
        *v < 2
    });
    assert_eq!(seen, vec![1, 2]);
}
