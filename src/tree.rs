//! A red-black tree owning its elements, ordered by a caller supplied comparator.
//!
//! # Examples
//!
//! ```
//! use rbtree::Tree;
//!
//! let mut tree = Tree::default();
//!
//! // Nothing in here yet.
//! assert!(!tree.contains(&1));
//!
//! assert!(tree.insert(1));
//! assert!(tree.contains(&1));
//!
//! // Inserting an element that is already present is refused.
//! assert!(!tree.insert(1));
//! assert_eq!(tree.len(), 1);
//!
//! // Visiting happens in ascending order and stops as soon as the visitor says so.
//! tree.extend([5, 3, 4]);
//! let mut seen = Vec::new();
//! assert!(!tree.for_each(|&x| {
//!     seen.push(x);
//!     x < 3
//! }));
//! assert_eq!(seen, [1, 3]);
//! ```
//!
//! Elements can be ordered by anything and can have their own clean-up, which runs exactly once
//! per stored element when the tree is dropped:
//!
//! ```
//! use rbtree::Tree;
//!
//! let mut released = Vec::new();
//! {
//!     let mut tree = Tree::new(|a: &&str, b: &&str| b.cmp(a), |s| released.push(s));
//!     tree.extend(["a", "c", "b"]);
//!     assert_eq!(tree.iter().copied().collect::<Vec<_>>(), ["c", "b", "a"]);
//! }
//! assert_eq!(released.len(), 3);
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::iter::FusedIterator;
use std::marker::PhantomData;
use std::ptr::NonNull;

use crate::error::InsertError;
use crate::node::{Color, Link, Node, Side};
use crate::rebalance;
use crate::util::Placement;

/// A self-balancing Binary Search Tree (specifically, a red-black tree). Elements are kept in
/// the order given by the comparator `C`, and every element still stored when the tree goes
/// away is handed to the destructor `D`.
///
/// The default parameters describe the tree built by [`Tree::default`]: natural order and plain
/// [`drop`].
pub struct Tree<T, C = fn(&T, &T) -> Ordering, D = fn(T)>
where
    D: FnMut(T),
{
    // This is a `Link` instead of an `Option<Node>` so that it can be moved around with the `Tree`
    // without the children's parent pointers breaking.
    root: Link<T>,
    len: usize,
    comparator: C,
    destructor: D,
    marker: PhantomData<Box<Node<T>>>,
}

// SAFETY: The tree exclusively owns every node, so moving it to another thread moves the
// elements along with it. Nothing in it is shared with other values.
unsafe impl<T, C, D> Send for Tree<T, C, D>
where
    T: Send,
    C: Send,
    D: Send + FnMut(T),
{
}

// SAFETY: Through `&Tree` nodes are only ever read and the comparator is only called via `&C`.
unsafe impl<T, C, D> Sync for Tree<T, C, D>
where
    T: Sync,
    C: Sync,
    D: Sync + FnMut(T),
{
}

impl<T> Default for Tree<T>
where
    T: Ord,
{
    fn default() -> Self {
        Self::new(T::cmp, drop)
    }
}

impl<T, C, D> Drop for Tree<T, C, D>
where
    D: FnMut(T),
{
    /// Frees every node in post-order (left subtree, right subtree, then the node itself) and
    /// hands each element to the destructor. Walks the parent links instead of recursing, so
    /// the stack does not grow with the height of the tree.
    fn drop(&mut self) {
        let mut cursor = self.root.take().0;
        while let Some(mut current) = cursor {
            // SAFETY: `current` is a live node of this tree. Nodes are only freed below once they
            // have no children left, and the parent forgets them before they are freed, so every
            // pointer followed here is still valid.
            let node = unsafe { current.as_mut() };
            if let Some(left) = node.left.0 {
                cursor = Some(left);
                continue;
            }
            if let Some(right) = node.right.0 {
                cursor = Some(right);
                continue;
            }

            cursor = node.parent.0;
            if let Some(mut parent) = cursor {
                // SAFETY: see above; `node` is not used past this point.
                let parent = unsafe { parent.as_mut() };
                let side = parent.side_of(current);
                parent.set_child(side, Link::empty());
            }

            // SAFETY: The node was allocated in `Node::try_new_leaked` (or boxed in `Clone`) and
            // nothing references it anymore.
            let node = unsafe { Box::from_raw(current.as_ptr()) };
            (self.destructor)(node.element);
        }
        self.len = 0;
    }
}

impl<T, C, D> Clone for Tree<T, C, D>
where
    T: Clone,
    C: Clone,
    D: Clone + FnMut(T),
{
    fn clone(&self) -> Self {
        let root = self.root().map(|root| {
            let new_root = Box::leak(Box::new(root.clone()));
            new_root.fix_children_parents();
            NonNull::from(new_root)
        });
        Self {
            root: Link(root),
            len: self.len,
            comparator: self.comparator.clone(),
            destructor: self.destructor.clone(),
            marker: PhantomData,
        }
    }
}

impl<T, C, D> fmt::Debug for Tree<T, C, D>
where
    T: fmt::Debug,
    D: FnMut(T),
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T, C, D> Tree<T, C, D>
where
    D: FnMut(T),
{
    /// The number of elements in the tree.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the tree holds no elements at all.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// An iterator over the elements in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree::Tree;
    ///
    /// let mut tree = Tree::default();
    /// tree.extend([3, 1, 2]);
    ///
    /// assert_eq!(tree.iter().collect::<Vec<_>>(), [&1, &2, &3]);
    /// ```
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self.root(), self.len)
    }

    /// Destroys the tree, handing every element to the destructor exactly once. This is the same
    /// as dropping the tree.
    pub fn destroy(self) {
        drop(self)
    }

    fn root(&self) -> Option<&Node<T>> {
        // `&self` rules out a live `&mut self`, which is the only way nodes get mutated.
        self.root.node()
    }
}

impl<T, C, D> Tree<T, C, D>
where
    C: Fn(&T, &T) -> Ordering,
    D: FnMut(T),
{
    /// Creates an empty tree ordering its elements with `comparator` and releasing them with
    /// `destructor`.
    ///
    /// The comparator must be a total order: negative (`Less`) when its first argument sorts
    /// first, `Equal` for elements that may not be stored side by side, and it must answer the
    /// same way every time. The destructor is called once for every element stored when the tree
    /// is dropped, and never otherwise.
    pub fn new(comparator: C, destructor: D) -> Self {
        Self {
            root: Link::empty(),
            len: 0,
            comparator,
            destructor,
            marker: PhantomData,
        }
    }

    /// Inserts `element`, returning whether it was added. Nothing changes (and `false` is
    /// returned) when an equal element is already stored or when no memory is available for the
    /// new node. A refused element is dropped normally, not handed to the tree's destructor.
    ///
    /// Use [`Tree::try_insert`] to tell the two failures apart.
    pub fn insert(&mut self, element: T) -> bool {
        self.try_insert(element).is_ok()
    }

    /// Inserts `element`, or gives it back together with the reason it was refused.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree::{InsertError, Tree};
    ///
    /// let mut tree = Tree::default();
    ///
    /// assert_eq!(tree.try_insert(10), Ok(()));
    /// assert_eq!(tree.try_insert(10), Err(InsertError::Duplicate(10)));
    /// assert_eq!(tree.len(), 1);
    /// ```
    pub fn try_insert(&mut self, element: T) -> Result<(), InsertError<T>> {
        let slot = match self.find_place(&element) {
            Placement::Occupied(_) => return Err(InsertError::Duplicate(element)),
            Placement::Root => None,
            Placement::Vacant(parent, side) => Some((parent, side)),
        };

        let parent = Link(slot.map(|(parent, _)| parent));
        let mut node =
            Node::try_new_leaked(element, parent).map_err(InsertError::AllocationFailed)?;

        match slot {
            // SAFETY: `node` was just allocated and `parent` is a live node of this tree whose
            // `side` slot is empty. `&mut self` guarantees no other references into the tree.
            Some((mut parent, side)) => unsafe {
                parent.as_mut().set_child(side, Link::to(node));
                rebalance::repair(&mut self.root, node);
            },
            None => {
                // SAFETY: `node` was just allocated and nothing else can see it yet.
                unsafe { node.as_mut().color = Color::Black };
                self.root = Link::to(node);
            }
        }
        self.len += 1;

        if cfg!(debug_assertions) {
            assert_eq!(self.root.color(), Color::Black);
        }
        Ok(())
    }

    /// Whether an element comparing equal to `element` is stored in the tree.
    pub fn contains(&self, element: &T) -> bool {
        matches!(self.find_place(element), Placement::Occupied(_))
    }

    /// The stored element comparing equal to `element`, if there is one.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree::Tree;
    ///
    /// let mut tree = Tree::new(|a: &(i32, &str), b: &(i32, &str)| a.0.cmp(&b.0), drop);
    /// tree.insert((1, "one"));
    ///
    /// assert_eq!(tree.get(&(1, "")), Some(&(1, "one")));
    /// assert_eq!(tree.get(&(2, "")), None);
    /// ```
    pub fn get(&self, element: &T) -> Option<&T> {
        match self.find_place(element) {
            // SAFETY: The node belongs to this tree, which cannot change while `&self` is held.
            Placement::Occupied(node) => Some(unsafe { &node.as_ref().element }),
            Placement::Root | Placement::Vacant(..) => None,
        }
    }

    /// Visits every element in ascending order until `visitor` returns `false`.
    ///
    /// Returns `true` only when every element was visited and the visitor never asked to stop.
    /// An empty tree returns `false`: with nothing to visit, the traversal does not count as
    /// successful.
    pub fn for_each<F>(&self, mut visitor: F) -> bool
    where
        F: FnMut(&T) -> bool,
    {
        self.for_each_with(&mut (), |element, _| visitor(element))
    }

    /// Like [`Tree::for_each`], but threads a mutable `context` through every call of the
    /// visitor.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree::Tree;
    ///
    /// let mut tree = Tree::default();
    /// tree.extend([2, 8, 4]);
    ///
    /// let mut sum = 0;
    /// assert!(tree.for_each_with(&mut sum, |x, sum| {
    ///     *sum += x;
    ///     true
    /// }));
    /// assert_eq!(sum, 14);
    /// ```
    pub fn for_each_with<X, F>(&self, context: &mut X, mut visitor: F) -> bool
    where
        F: FnMut(&T, &mut X) -> bool,
    {
        if self.is_empty() {
            return false;
        }
        self.iter().all(|element| visitor(element, &mut *context))
    }

    /// Checks every red-black and search tree invariant, panicking on the first violation, and
    /// returns the black-height of the tree: the number of black nodes on any path from the
    /// root down to a missing child, the root included.
    ///
    /// The checks are:
    ///
    /// 1. Parent and child links agree with each other.
    /// 2. Elements are strictly ascending in order.
    /// 3. The root is black.
    /// 4. No red node has a red child.
    /// 5. Every path from the root to a missing child passes the same number of black nodes.
    /// 6. The tree holds exactly [`Tree::len`] nodes.
    #[track_caller]
    pub fn assert_valid(&self) -> usize {
        let Some(root) = self.root() else {
            assert_eq!(self.len, 0, "empty tree with a non-zero length");
            return 0;
        };

        assert!(root.parent.0.is_none(), "root has a parent");
        assert_eq!(root.color, Color::Black, "root is red");

        let mut count = 0;
        let black_height = self.assert_valid_inner(root, &mut count);
        assert_eq!(count, self.len, "node count does not match the tree's length");

        let mut elements = self.iter();
        if let Some(mut previous) = elements.next() {
            for element in elements {
                assert_eq!(
                    (self.comparator)(previous, element),
                    Ordering::Less,
                    "elements are not strictly ascending"
                );
                previous = element;
            }
        }

        black_height
    }

    /// Returns the black-height of the subtree at `node`, counting `node` itself when black.
    fn assert_valid_inner(&self, node: &Node<T>, count: &mut usize) -> usize {
        *count += 1;
        let node_ptr = NonNull::from(node);

        let mut heights = [0; 2];
        for (height, child) in heights.iter_mut().zip([node.left(), node.right()]) {
            let Some(child) = child else {
                continue;
            };

            assert_eq!(child.parent.0, Some(node_ptr), "child does not point back to parent");
            assert!(!(node.is_red() && child.is_red()), "red node has a red child");
            *height = self.assert_valid_inner(child, count);
        }

        assert_eq!(heights[0], heights[1], "subtrees have different black-heights");
        heights[0] + usize::from(node.color == Color::Black)
    }

    /// Descends from the root to where `element` is or would be.
    fn find_place(&self, element: &T) -> Placement<T> {
        let Some(mut current) = self.root.0 else {
            return Placement::Root;
        };
        loop {
            // SAFETY: Every link reachable from the root points at a live node, and `&self`
            // rules out concurrent restructuring.
            let node = unsafe { current.as_ref() };
            let side = match (self.comparator)(element, &node.element) {
                Ordering::Less => Side::Left,
                Ordering::Equal => return Placement::Occupied(current),
                Ordering::Greater => Side::Right,
            };
            match node.child(side).0 {
                Some(child) => current = child,
                None => return Placement::Vacant(current, side),
            }
        }
    }
}

impl<T, C, D> Extend<T> for Tree<T, C, D>
where
    C: Fn(&T, &T) -> Ordering,
    D: FnMut(T),
{
    /// Inserts every element, skipping those comparing equal to one already stored.
    fn extend<I: IntoIterator<Item = T>>(&mut self, elements: I) {
        for element in elements {
            self.insert(element);
        }
    }
}

impl<'a, T, C, D> IntoIterator for &'a Tree<T, C, D>
where
    D: FnMut(T),
{
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An in-order iterator over the elements of a [`Tree`], created by [`Tree::iter`].
///
/// It keeps the path of not yet visited ancestors on an explicit stack rather than recursing.
pub struct Iter<'a, T> {
    stack: Vec<&'a Node<T>>,
    remaining: usize,
}

impl<'a, T> Iter<'a, T> {
    fn new(root: Option<&'a Node<T>>, len: usize) -> Self {
        let mut iter = Self {
            stack: Vec::new(),
            remaining: len,
        };
        iter.push_left_spine(root);
        iter
    }

    /// Pushes `node` and all of its leftmost descendants, so the smallest ends up on top.
    fn push_left_spine(&mut self, mut node: Option<&'a Node<T>>) {
        while let Some(n) = node {
            self.stack.push(n);
            node = n.left();
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_spine(node.right());
        self.remaining -= 1;
        Some(&node.element)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            stack: self.stack.clone(),
            remaining: self.remaining,
        }
    }
}
