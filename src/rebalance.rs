//! Restoring the red-black invariants after an insertion.
//!
//! A freshly attached node is red, so the only rule an insertion can break is "no red node has
//! a red parent" (plus "the root is black" when the new node is the root). [`repair`] walks up
//! from the new node and fixes the violation with the classical cases:
//!
//! 1. The node is the root: paint it black.
//! 2. The parent is black: nothing to do.
//! 3. The parent and the uncle are red: paint both black, paint the grandparent red and continue
//!    from the grandparent, which may now clash with its own parent.
//! 4. The parent is red and the uncle is black (or missing): one rotation when the node is an
//!    outer grandchild, two when it is an inner one. This always finishes the repair.
//!
//! Rotations are split into the structural move ([`promote`]) and the color change that follows
//! it ([`recolor_promoted`]).

use std::ptr::NonNull;

use crate::node::{Color, Link, Node};

/// Re-establishes the red-black invariants after `node` was attached as a red leaf below the
/// root held in `root`.
///
/// # Safety
///
/// `node` must be part of the tree rooted at `root`, all links in that tree must be consistent
/// and no references into the tree may be alive for the duration of the call.
pub(crate) unsafe fn repair<T>(root: &mut Link<T>, mut node: NonNull<Node<T>>) {
    loop {
        let Some(mut parent) = node.as_ref().parent.0 else {
            log::trace!("repair: reached the root, painting it black");
            node.as_mut().color = Color::Black;
            return;
        };
        if !parent.as_ref().is_red() {
            log::trace!("repair: parent is black, nothing to fix");
            return;
        }

        // The root is always black so a red parent always has a parent of its own.
        let mut grandparent = parent
            .as_ref()
            .parent
            .0
            .expect("A red node is never the root");
        let parent_side = grandparent.as_ref().side_of(parent);
        let mut uncle = grandparent.as_ref().child(parent_side.opposite());

        match uncle.node_mut() {
            Some(uncle) if uncle.is_red() => {
                log::trace!("repair: red uncle, recoloring and moving up to the grandparent");
                parent.as_mut().color = Color::Black;
                uncle.color = Color::Black;
                grandparent.as_mut().color = Color::Red;
                node = grandparent;
            }
            _ => {
                let node_side = parent.as_ref().side_of(node);
                if node_side == parent_side {
                    log::trace!("repair: black uncle, outer grandchild, rotating once");
                    rotate_up(root, parent);
                } else {
                    log::trace!("repair: black uncle, inner grandchild, rotating twice");
                    rotate_up(root, node);
                    rotate_up(root, node);
                }
                return;
            }
        }
    }
}

/// A full rotation as used by the repair: `node` takes its parent's place, after which the
/// promoted node is black and the demoted one red.
unsafe fn rotate_up<T>(root: &mut Link<T>, node: NonNull<Node<T>>) {
    let demoted = promote(root, node);
    recolor_promoted(node, demoted);
}

/// Paints the node a rotation moved up black and the node it moved down red.
///
/// # Safety
///
/// Both pointers must be live nodes and no references to them may be alive.
pub(crate) unsafe fn recolor_promoted<T>(
    mut promoted: NonNull<Node<T>>,
    mut demoted: NonNull<Node<T>>,
) {
    promoted.as_mut().color = Color::Black;
    demoted.as_mut().color = Color::Red;
}

/// Rotates `node` above its parent and returns the old parent. This is the purely structural
/// half of a rotation: colors are left untouched.
///
/// ## Panics
///
/// When `node` has no parent.
///
/// # Diagram
///
/// Promoting `node` when it is a left child (a right rotation). The mirror image applies when it
/// is a right child.
///
/// ```text
///      Option<grandparent>           Option<grandparent>
///        /                             /
///     parent                         node
///     /    \                        /    \
///   node    z      promote ->      x    parent
///   /  \                                 /  \
///  x    y                               y    z
/// ```
///
/// `y`, the child of `node` facing the rotation, is handed over to `parent` in the slot `node`
/// used to occupy.
///
/// # Safety
///
/// `node` must be part of the tree rooted at `root`, all links in that tree must be consistent
/// and no references into the tree may be alive for the duration of the call.
pub(crate) unsafe fn promote<T>(
    root: &mut Link<T>,
    mut node: NonNull<Node<T>>,
) -> NonNull<Node<T>> {
    let mut parent = node
        .as_ref()
        .parent
        .0
        .expect("Promoting a node requires a parent");
    let side = parent.as_ref().side_of(node);
    let grandparent = parent.as_ref().parent;

    // Hand the inner child of `node` over to `parent`.
    let inner = node.as_ref().child(side.opposite());
    parent.as_mut().set_child(side, inner);
    if let Some(mut inner) = inner.0 {
        inner.as_mut().parent = Link::to(parent);
    }

    // `parent` moves below `node`.
    node.as_mut().set_child(side.opposite(), Link::to(parent));
    parent.as_mut().parent = Link::to(node);

    // `node` takes over `parent`'s slot in the grandparent, or the root.
    node.as_mut().parent = grandparent;
    match grandparent.0 {
        Some(mut grandparent) => {
            let parent_side = grandparent.as_ref().side_of(parent);
            grandparent.as_mut().set_child(parent_side, Link::to(node));
        }
        None => *root = Link::to(node),
    }

    parent
}
