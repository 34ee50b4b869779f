use std::fmt;
use std::marker::PhantomData;
use std::ops::Deref;
use std::ptr::{self, NonNull};

use super::control_block::ControlBlock;
use super::{PreconditionViolation, Swap, WeakRef};

/// [`RefCountedPtr`] shares the ownership of an instance of type `T` with every clone of it.
///
/// All the clones of a [`RefCountedPtr`] and all the [`WeakRef`] derived from them refer to a
/// single control block holding the instance along with a strong and a weak reference count. The
/// instance is dropped as soon as the last [`RefCountedPtr`] is dropped, and the control block is
/// deallocated once the last [`WeakRef`] is gone as well.
///
/// A [`RefCountedPtr`] may be null, in which case it owns nothing and reports a use count of `0`.
///
/// The reference counts are not atomic; [`RefCountedPtr`] is neither [`Send`] nor [`Sync`].
pub struct RefCountedPtr<T> {
    block: Option<NonNull<ControlBlock<T>>>,
    _phantom: PhantomData<T>,
}

impl<T> RefCountedPtr<T> {
    /// Creates a new [`RefCountedPtr`] owning `instance`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ptrkit::RefCountedPtr;
    ///
    /// let shared = RefCountedPtr::new(String::from("shared"));
    /// let clone = shared.clone();
    ///
    /// assert_eq!(shared.use_count(), 2);
    /// assert_eq!(*clone, "shared");
    /// ```
    #[inline]
    #[must_use]
    pub fn new(instance: T) -> Self {
        Self::from_block(Some(ControlBlock::new(instance)))
    }

    /// Creates a null [`RefCountedPtr`].
    ///
    /// # Examples
    ///
    /// ```
    /// use ptrkit::RefCountedPtr;
    ///
    /// let null: RefCountedPtr<usize> = RefCountedPtr::null();
    /// assert!(null.is_null());
    /// assert_eq!(null.use_count(), 0);
    /// ```
    #[inline]
    #[must_use]
    pub const fn null() -> Self {
        Self::from_block(None)
    }

    /// Promotes a [`WeakRef`] into a [`RefCountedPtr`].
    ///
    /// Returns a null [`RefCountedPtr`] if the instance has already been dropped, or if `weak` is
    /// null.
    ///
    /// # Examples
    ///
    /// ```
    /// use ptrkit::{RefCountedPtr, WeakRef};
    ///
    /// let mut shared = RefCountedPtr::new(11);
    /// let weak = shared.downgrade();
    ///
    /// assert_eq!(*RefCountedPtr::from_weak(&weak), 11);
    ///
    /// shared.reset();
    /// assert!(RefCountedPtr::from_weak(&weak).is_null());
    /// ```
    #[inline]
    #[must_use]
    pub fn from_weak(weak: &WeakRef<T>) -> Self {
        // The weak reference keeps the block alive.
        let block = weak
            .block()
            .filter(|block| unsafe { block.as_ref() }.try_add_strong());
        Self::from_block(block)
    }

    /// Creates a new [`WeakRef`] observing the instance.
    ///
    /// The [`WeakRef`] is null if `self` is null.
    #[inline]
    #[must_use]
    pub fn downgrade(&self) -> WeakRef<T> {
        WeakRef::from_block(self.block)
    }

    /// Returns a reference to the instance, or `None` if `self` is null.
    #[inline]
    #[must_use]
    pub fn get(&self) -> Option<&T> {
        self.block_ref().and_then(ControlBlock::instance)
    }

    /// Returns a reference to the instance.
    ///
    /// # Errors
    ///
    /// Returns [`PreconditionViolation::EmptyPointer`] if `self` is null.
    #[inline]
    pub fn try_get(&self) -> Result<&T, PreconditionViolation> {
        self.get().ok_or(PreconditionViolation::EmptyPointer)
    }

    /// Returns a raw pointer to the instance, or a null pointer if `self` is null.
    #[inline]
    #[must_use]
    pub fn as_ptr(&self) -> *const T {
        self.block_ref()
            .map_or(ptr::null(), ControlBlock::instance_ptr)
    }

    /// Returns the number of [`RefCountedPtr`] sharing the instance, or `0` if `self` is null.
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

    /// Returns `true` if `self` is null.
    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        self.block.is_none()
    }

    /// Returns `true` if both point to the same control block, or if both are null.
    #[inline]
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.block == other.block
    }

    /// Drops the strong reference held by `self`, leaving it null.
    ///
    /// # Examples
    ///
    /// ```
    /// use ptrkit::RefCountedPtr;
    ///
    /// let mut shared = RefCountedPtr::new(1);
    /// let clone = shared.clone();
    ///
    /// shared.reset();
    /// assert!(shared.is_null());
    /// assert_eq!(clone.use_count(), 1);
    /// ```
    #[inline]
    pub fn reset(&mut self) {
        let mut previous = Self::null();
        self.swap(&mut previous);
    }

    /// Drops the strong reference held by `self`, and takes the ownership of `instance`.
    #[inline]
    pub fn reset_with(&mut self, instance: T) {
        let mut previous = Self::new(instance);
        self.swap(&mut previous);
    }

    /// Moves the state out of `self`, leaving it null.
    ///
    /// The reference counts are left untouched.
    #[inline]
    #[must_use]
    pub fn take(&mut self) -> Self {
        let mut taken = Self::null();
        self.swap(&mut taken);
        taken
    }

    /// Exchanges the state of `self` and `other`.
    #[inline]
    pub fn swap(&mut self, other: &mut Self) {
        std::mem::swap(&mut self.block, &mut other.block);
    }

    #[inline]
    const fn from_block(block: Option<NonNull<ControlBlock<T>>>) -> Self {
        Self {
            block,
            _phantom: PhantomData,
        }
    }

    #[inline]
    fn block_ref(&self) -> Option<&ControlBlock<T>> {
        // A non-null strong reference keeps the block alive.
        self.block.map(|block| unsafe { block.as_ref() })
    }
}

impl<T> Clone for RefCountedPtr<T> {
    #[inline]
    fn clone(&self) -> Self {
        if let Some(block) = self.block_ref() {
            block.add_strong();
        }
        Self::from_block(self.block)
    }

    /// The strong count of `source` is incremented before the one of `self` is decremented.
    #[inline]
    fn clone_from(&mut self, source: &Self) {
        let mut replacement = source.clone();
        self.swap(&mut replacement);
    }
}

impl<T> Default for RefCountedPtr<T> {
    #[inline]
    fn default() -> Self {
        Self::null()
    }
}

impl<T> Deref for RefCountedPtr<T> {
    type Target = T;

    /// # Panics
    ///
    /// Panics if `self` is null.
    #[inline]
    fn deref(&self) -> &Self::Target {
        match self.try_get() {
            Ok(instance) => instance,
            Err(error) => panic!("{error}"),
        }
    }
}

impl<T> Drop for RefCountedPtr<T> {
    #[inline]
    fn drop(&mut self) {
        if let Some(block) = self.block.take() {
            unsafe {
                ControlBlock::release_strong(block);
            }
        }
    }
}

impl<T> From<T> for RefCountedPtr<T> {
    #[inline]
    fn from(instance: T) -> Self {
        Self::new(instance)
    }
}

impl<T> Swap for RefCountedPtr<T> {
    #[inline]
    fn swap(&mut self, other: &mut Self) {
        Self::swap(self, other);
    }
}

impl<T: fmt::Debug> fmt::Debug for RefCountedPtr<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefCountedPtr")
            .field("instance", &self.get())
            .field("use_count", &self.use_count())
            .field("weak_count", &self.weak_count())
            .finish()
    }
}

impl<T: fmt::Display> fmt::Display for RefCountedPtr<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.get() {
            Some(instance) => fmt::Display::fmt(instance, f),
            None => f.write_str("null"),
        }
    }
}
