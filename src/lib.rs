//! ## Introduction
//!
//! This crate implements an ordered container based on a splay tree. Splay trees are binary search
//! trees that reorganise themselves on every access: an inserted or found value is moved to the
//! root by a sequence of rotations, so recently used values are cheap to reach again and every
//! operation runs in amortised logarithmic time.
//!
//! Note that looking a value up with `has` changes the shape of the tree. Walking the tree with
//! `traverse` or `iter` does not.
//!
//! ## Contents
//!
//! <center>
//!
//! | Type              | Stores | Sorts By | Iterator                   |
//! |:------------------|:-------|:---------|----------------------------|
//! | `SplayTree`       | Value  | Ord      | `SplayTreeIterator`        |
//! | `SplayTreeBy`     | Value  | Function | `SplayTreeIterator`        |
//! | `StringSplayTree` | String | Ord      | `StringSplayTreeIterator`  |
//!
//! </center>
//!
//! Values that compare equal are all kept, they are not merged.
//!
//! The crate exposes an additional type `util::Tree` that provides the foundation of the other
//! types. It owns its values in a single vector and links them by index, and exposes the rotation
//! and splay primitives directly.
//!
//! ```
//! use splaytree::SplayTree;
//!
//! let mut tree = SplayTree::new();
//! for c in ["A", "B", "C", "D", "E"] {
//!     tree.insert(c);
//! }
//!
//! // Looking up "A" splays it to the root
//! assert!(tree.has("A"));
//! tree.traverse(|value, depth| {
//!     if *value == "A" {
//!         assert_eq!(depth, 0);
//!     }
//!     true
//! });
//!
//! assert!(tree.remove("D"));
//! assert!(!tree.remove("D"));
//! assert_eq!(tree.iter().copied().collect::<Vec<_>>(), ["A", "B", "C", "E"]);
//! ```

#![no_std]
#![warn(missing_docs)]

mod tree;
pub mod util;

pub use tree::*;
