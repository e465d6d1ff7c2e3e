use std::ptr::NonNull;

use crate::node::{Node, Side};

/// Where an element belongs in a tree, as found by descending from the root.
pub(crate) enum Placement<T> {
    /// A node holding an element that compares equal is already in the tree.
    Occupied(NonNull<Node<T>>),
    /// The tree is empty and the element would become the root.
    Root,
    /// The element would become the `Side` child of the given node, which is currently empty.
    Vacant(NonNull<Node<T>>, Side),
}
