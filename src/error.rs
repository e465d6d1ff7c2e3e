use thiserror::Error;

/// Why [`Tree::try_insert`][crate::Tree::try_insert] refused an element. The rejected element
/// is handed back in either case and the tree is left exactly as it was.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum InsertError<T> {
    /// An element comparing equal to this one is already stored.
    #[error("an equal element is already stored in the tree")]
    Duplicate(T),
    /// The node for this element could not be allocated.
    #[error("failed to allocate a tree node")]
    AllocationFailed(T),
}

impl<T> InsertError<T> {
    /// Returns the element that was not inserted.
    pub fn into_inner(self) -> T {
        match self {
            Self::Duplicate(element) | Self::AllocationFailed(element) => element,
        }
    }
}
