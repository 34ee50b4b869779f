use std::fmt;
use std::marker::PhantomData;
use std::ptr::NonNull;

use super::control_block::ControlBlock;
use super::{RefCountedPtr, Swap};

/// [`WeakRef`] observes an instance owned by [`RefCountedPtr`] without keeping it alive.
///
/// A [`WeakRef`] cannot be dereferenced; it has to be promoted to a [`RefCountedPtr`] through
/// [`WeakRef::lock`], which fails once the last [`RefCountedPtr`] has been dropped. A [`WeakRef`]
/// keeps the control block alive, but not the instance.
pub struct WeakRef<T> {
    block: Option<NonNull<ControlBlock<T>>>,
    _phantom: PhantomData<T>,
}

impl<T> WeakRef<T> {
    /// Creates a null [`WeakRef`].
    ///
    /// A null [`WeakRef`] is always expired.
    ///
    /// # Examples
    ///
    /// ```
    /// use ptrkit::WeakRef;
    ///
    /// let weak: WeakRef<usize> = WeakRef::new();
    /// assert!(weak.expired());
    /// assert!(weak.lock().is_null());
    /// ```
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            block: None,
            _phantom: PhantomData,
        }
    }

    /// Tries to promote `self` into a [`RefCountedPtr`].
    ///
    /// Returns a null [`RefCountedPtr`] if the instance has already been dropped.
    ///
    /// # Examples
    ///
    /// ```
    /// use ptrkit::{RefCountedPtr, WeakRef};
    ///
    /// let mut shared = RefCountedPtr::new(String::from("observed"));
    /// let weak = WeakRef::from(&shared);
    ///
    /// assert_eq!(*weak.lock(), "observed");
    ///
    /// shared.reset();
    /// assert!(weak.lock().is_null());
    /// assert!(weak.expired());
    /// ```
    #[inline]
    #[must_use]
    pub fn lock(&self) -> RefCountedPtr<T> {
        RefCountedPtr::from_weak(self)
    }

    /// Returns `true` if `self` is null or the instance has already been dropped.
    #[inline]
    #[must_use]
    pub fn expired(&self) -> bool {
        self.use_count() == 0
    }

    /// Returns the number of [`RefCountedPtr`] sharing the instance.
    #[inline]
    #[must_use]
    pub fn use_count(&self) -> usize {
        self.block_ref().map_or(0, ControlBlock::strong_count)
    }

    /// Returns the number of [`WeakRef`] observing the instance, or `0` if `self` is null.
    #[inline]
    #[must_use]
    pub fn weak_count(&self) -> usize {
        self.block_ref().map_or(0, ControlBlock::weak_count)
    }

    /// Returns `true` if both observe the same control block, or if both are null.
    #[inline]
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.block == other.block
    }

    /// Makes `self` observe the instance owned by `strong`.
    ///
    /// The weak count of the new control block is incremented before the one of the previously
    /// observed control block is decremented.
    #[inline]
    pub fn assign(&mut self, strong: &RefCountedPtr<T>) {
        let mut replacement = strong.downgrade();
        self.swap(&mut replacement);
    }

    /// Drops the weak reference held by `self`, leaving it null.
    #[inline]
    pub fn reset(&mut self) {
        let mut previous = Self::new();
        self.swap(&mut previous);
    }

    /// Moves the state out of `self`, leaving it null.
    #[inline]
    #[must_use]
    pub fn take(&mut self) -> Self {
        let mut taken = Self::new();
        self.swap(&mut taken);
        taken
    }

    /// Exchanges the state of `self` and `other`.
    #[inline]
    pub fn swap(&mut self, other: &mut Self) {
        std::mem::swap(&mut self.block, &mut other.block);
    }

    /// Creates a new [`WeakRef`] observing `block`, adding a weak reference to it.
    #[inline]
    pub(super) fn from_block(block: Option<NonNull<ControlBlock<T>>>) -> Self {
        let weak = Self {
            block,
            _phantom: PhantomData,
        };
        if let Some(block) = weak.block_ref() {
            block.add_weak();
        }
        weak
    }

    /// Returns the observed control block.
    #[inline]
    pub(super) const fn block(&self) -> Option<NonNull<ControlBlock<T>>> {
        self.block
    }

    #[inline]
    fn block_ref(&self) -> Option<&ControlBlock<T>> {
        // A non-null weak reference keeps the block alive.
        self.block.map(|block| unsafe { block.as_ref() })
    }
}

impl<T> Clone for WeakRef<T> {
    #[inline]
    fn clone(&self) -> Self {
        Self::from_block(self.block)
    }

    /// The weak count of `source` is incremented before the one of `self` is decremented.
    #[inline]
    fn clone_from(&mut self, source: &Self) {
        let mut replacement = source.clone();
        self.swap(&mut replacement);
    }
}

impl<T> Default for WeakRef<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for WeakRef<T> {
    #[inline]
    fn drop(&mut self) {
        if let Some(block) = self.block.take() {
            unsafe {
                ControlBlock::release_weak(block);
            }
        }
    }
}

impl<T> From<&RefCountedPtr<T>> for WeakRef<T> {
    #[inline]
    fn from(strong: &RefCountedPtr<T>) -> Self {
        strong.downgrade()
    }
}

impl<T> Swap for WeakRef<T> {
    #[inline]
    fn swap(&mut self, other: &mut Self) {
        Self::swap(self, other);
    }
}

impl<T> fmt::Debug for WeakRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakRef")
            .field("use_count", &self.use_count())
            .field("weak_count", &self.weak_count())
            .finish()
    }
}
