//! The nodes a [`Tree`][crate::Tree] is built from and the links between them.
//!
//! Every node is allocated on the heap and referenced through a [`Link`]. Links are plain
//! copyable pointers; ownership is a matter of convention rather than of types:
//!
//! - a parent's `left` and `right` links own the children they point to,
//! - a child's `parent` link never owns anything and is only used to walk upwards while
//!   repairing the tree after an insertion.
//!
//! Nodes are only ever freed by the tree as a whole (see [`Tree`'s `Drop`][crate::Tree]).

use std::alloc::{self, Layout};
use std::fmt;
use std::ptr::NonNull;

/// The color tag of a red-black node.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Color {
    Red,
    Black,
}

/// Which child slot of a parent a node occupies.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Side {
    Left,
    Right,
}

impl Side {
    pub(crate) fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

pub(crate) struct Link<T>(pub(crate) Option<NonNull<Node<T>>>);

impl<T> Clone for Link<T> {
    fn clone(&self) -> Self {
        Self(self.0)
    }
}
impl<T> Copy for Link<T> {}

impl<T> PartialEq for Link<T> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<T> Link<T> {
    pub(crate) const fn empty() -> Self {
        Link(None)
    }

    pub(crate) fn to(node: NonNull<Node<T>>) -> Self {
        Link(Some(node))
    }

    pub(crate) fn node(&self) -> Option<&Node<T>> {
        // SAFETY: A non-empty link always points at a live node owned by the tree. Because we take
        // `&self` here the returned reference can only alias with other shared references handed
        // out by the tree, or with a raw-pointer mutation which is the caller's responsibility to
        // keep disjoint (as with `ManuallyDrop::drop`).
        unsafe { self.0.as_ref().map(|ptr| ptr.as_ref()) }
    }

    pub(crate) fn node_mut(&mut self) -> Option<&mut Node<T>> {
        // SAFETY: See `Link::node`. Mutable access additionally requires that no other reference
        // to the same node is alive, which the tree guarantees by only holding `&mut Tree` while
        // restructuring.
        unsafe { self.0.as_mut().map(|ptr| ptr.as_mut()) }
    }

    pub(crate) fn take(&mut self) -> Self {
        Link(self.0.take())
    }

    /// The color of the node behind this link. Missing children count as black.
    pub(crate) fn color(&self) -> Color {
        self.node().map_or(Color::Black, |n| n.color)
    }
}

impl<T> fmt::Debug for Link<T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.node(), f)
    }
}

pub(crate) struct Node<T> {
    pub(crate) element: T,
    pub(crate) color: Color,
    pub(crate) parent: Link<T>,
    pub(crate) left: Link<T>,
    pub(crate) right: Link<T>,
}

impl<T> fmt::Debug for Node<T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("element", &self.element)
            .field("color", &self.color)
            .field("left", &self.left)
            .field("right", &self.right)
            .finish()
    }
}

impl<T> Node<T> {
    /// Allocates a new red node holding `element` whose parent is `parent`. The returned pointer
    /// is owned by the caller until it is linked into a tree.
    ///
    /// Allocation failure hands `element` back instead of aborting the process.
    pub(crate) fn try_new_leaked(element: T, parent: Link<T>) -> Result<NonNull<Self>, T> {
        let layout = Layout::new::<Self>();
        // SAFETY: `Node` holds three pointers so its layout never has a size of zero.
        let ptr = unsafe { alloc::alloc(layout) }.cast::<Self>();
        let Some(ptr) = NonNull::new(ptr) else {
            return Err(element);
        };

        // SAFETY: `ptr` was just allocated with the layout of `Self` and nothing else can see it.
        // Memory obtained from the global allocator with `Layout::new::<Self>()` is exactly what
        // `Box::from_raw` expects, which is how the node is eventually freed.
        unsafe {
            ptr.as_ptr().write(Node {
                element,
                color: Color::Red,
                parent,
                left: Link::empty(),
                right: Link::empty(),
            })
        };
        Ok(ptr)
    }

    pub(crate) fn left(&self) -> Option<&Self> {
        self.left.node()
    }

    pub(crate) fn right(&self) -> Option<&Self> {
        self.right.node()
    }

    pub(crate) fn child(&self, side: Side) -> Link<T> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    pub(crate) fn set_child(&mut self, side: Side, child: Link<T>) {
        match side {
            Side::Left => self.left = child,
            Side::Right => self.right = child,
        }
    }

    /// Which of `self`'s slots holds `child`.
    ///
    /// ## Panics
    ///
    /// In debug builds, when `child` is not a child of `self` at all.
    pub(crate) fn side_of(&self, child: NonNull<Self>) -> Side {
        if self.left.0 == Some(child) {
            Side::Left
        } else {
            debug_assert_eq!(self.right.0, Some(child), "node is not a child of its parent");
            Side::Right
        }
    }

    pub(crate) fn is_red(&self) -> bool {
        self.color == Color::Red
    }

    /// Points the parent links of both children back at `self`. Needed whenever a node moves in
    /// memory, as when cloning a tree.
    pub(crate) fn fix_children_parents(&mut self) {
        let self_ptr = NonNull::from(&*self);
        if let Some(left) = self.left.node_mut() {
            left.parent = Link::to(self_ptr);
        }
        if let Some(right) = self.right.node_mut() {
            right.parent = Link::to(self_ptr);
        }
    }
}

impl<T> Clone for Node<T>
where
    T: Clone,
{
    fn clone(&self) -> Self {
        let copy_child = |child: Option<&Self>| {
            child.map(|child| {
                let new_child = Box::leak(Box::new(child.clone()));
                new_child.fix_children_parents();
                NonNull::from(new_child)
            })
        };
        Self {
            element: self.element.clone(),
            color: self.color,
            left: Link(copy_child(self.left())),
            right: Link(copy_child(self.right())),
            // Rewired by whoever places the copy.
            parent: self.parent,
        }
    }
}
