//! This crate exposes a red-black tree: a Binary Search Tree that keeps itself balanced while
//! elements are inserted.
//!
//! ## Binary Search Tree
//!
//! A Binary Search Tree is a data structure supporting operations to
//! insert and find stored records. BSTs are typically defined
//! recursively using the notion of a `Node`. A `Node` will typically store
//! some sort of value (the value that was inserted, for example) and will
//! sometimes have child `Node`s. The most important invariants of a BST are:
//!
//! 1. For every `Node` in a BST, all the `Node`s in its left subtree have a
//!    value less than its own value.
//! 2. For every `Node` in a BST, all the `Node`s in its right subtree have a
//!    value greater than its own value.
//!
//! Searching for values in the tree takes `O(height)` (where `height` is defined as the longest
//! path from the root `Node` to a leaf `Node`). BSTs also naturally support sorted iteration by
//! visiting the left subtree, then the subtree root, then the right subtree.
//!
//! ## Red-black trees
//!
//! Inserting sorted data into a plain BST produces a chain as tall as the number of elements. A
//! red-black tree avoids this by painting every `Node` red or black and keeping three more
//! invariants:
//!
//! 3. The root is black.
//! 4. A red `Node` never has a red child.
//! 5. Every path from a `Node` down to a missing child passes through the same number of black
//!    `Node`s (its "black-height").
//!
//! Together these limit the height to `2 * lg(N + 1)` for `N` elements. New elements start out
//! red; whenever that breaks invariant 3 or 4 the tree is repaired by recoloring and rotating
//! `Node`s around the insertion point.
//!
//! ```
//! use rbtree::Tree;
//!
//! let mut tree = Tree::default();
//! tree.extend(1..=7);
//!
//! assert_eq!(tree.iter().copied().collect::<Vec<_>>(), [1, 2, 3, 4, 5, 6, 7]);
//! tree.assert_valid();
//! ```

#![deny(missing_docs, clippy::clone_on_ref_ptr)]

mod error;
mod node;
mod rebalance;
pub mod tree;
mod util;

pub use error::InsertError;
pub use tree::{Iter, Tree};
