use std::fmt;
use std::marker::PhantomData;
use std::ops::{Deref, DerefMut};
use std::ptr::{self, NonNull};

use super::{PreconditionViolation, Swap};

/// [`ExclusivePtr`] is the sole owner of a heap-allocated instance of type `T`.
///
/// It cannot be cloned: the ownership of the instance can only be transferred, either by moving
/// the [`ExclusivePtr`] itself, or through [`ExclusivePtr::take`] and [`ExclusivePtr::release`].
/// The instance is dropped along with the [`ExclusivePtr`], or when it is [reset](Self::reset).
///
/// An [`ExclusivePtr`] may be null, in which case it owns nothing.
pub struct ExclusivePtr<T> {
    instance: Option<NonNull<T>>,
    _phantom: PhantomData<T>,
}

impl<T> ExclusivePtr<T> {
    /// Creates a new [`ExclusivePtr`] owning `instance`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ptrkit::ExclusivePtr;
    ///
    /// let mut owned = ExclusivePtr::new(String::from("owned"));
    /// owned.push('!');
    ///
    /// assert_eq!(*owned, "owned!");
    /// ```
    #[inline]
    #[must_use]
    pub fn new(instance: T) -> Self {
        Self::from_box(Box::new(instance))
    }

    /// Creates a null [`ExclusivePtr`].
    #[inline]
    #[must_use]
    pub const fn null() -> Self {
        Self {
            instance: None,
            _phantom: PhantomData,
        }
    }

    /// Creates a new [`ExclusivePtr`] taking the ownership of a boxed instance.
    #[inline]
    #[must_use]
    pub fn from_box(boxed: Box<T>) -> Self {
        Self {
            instance: Some(NonNull::from(Box::leak(boxed))),
            _phantom: PhantomData,
        }
    }

    /// Creates a new [`ExclusivePtr`] from a raw pointer.
    ///
    /// A null `ptr` yields a null [`ExclusivePtr`].
    ///
    /// # Safety
    ///
    /// `ptr` must be null, or it must have been obtained from [`Box::into_raw`] or
    /// [`ExclusivePtr::into_raw`] and must not be owned by anything else.
    #[inline]
    #[must_use]
    pub unsafe fn from_raw(ptr: *mut T) -> Self {
        Self {
            instance: NonNull::new(ptr),
            _phantom: PhantomData,
        }
    }

    /// Consumes `self`, returning the raw pointer to the instance without dropping it.
    ///
    /// The returned pointer is null if `self` was null. The caller is responsible for the
    /// instance; it can be given back to an [`ExclusivePtr`] with [`ExclusivePtr::from_raw`].
    #[inline]
    #[must_use]
    pub fn into_raw(mut self) -> *mut T {
        self.release().map_or(ptr::null_mut(), Box::into_raw)
    }

    /// Returns a reference to the instance, or `None` if `self` is null.
    #[inline]
    #[must_use]
    pub fn get(&self) -> Option<&T> {
        // `self` exclusively owns the instance.
        self.instance.map(|instance| unsafe { instance.as_ref() })
    }

    /// Returns a mutable reference to the instance, or `None` if `self` is null.
    #[inline]
    pub fn get_mut(&mut self) -> Option<&mut T> {
        self.instance.map(|mut instance| unsafe { instance.as_mut() })
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
        self.instance
            .map_or(ptr::null(), |instance| instance.as_ptr().cast_const())
    }

    /// Returns `true` if `self` is null.
    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        self.instance.is_none()
    }

    /// Gives up the ownership of the instance without dropping it, leaving `self` null.
    ///
    /// # Examples
    ///
    /// ```
    /// use ptrkit::ExclusivePtr;
    ///
    /// let mut owned = ExclusivePtr::new(7);
    /// let released = owned.release();
    ///
    /// assert!(owned.is_null());
    /// assert_eq!(released.as_deref(), Some(&7));
    /// ```
    #[inline]
    pub fn release(&mut self) -> Option<Box<T>> {
        self.instance
            .take()
            .map(|instance| unsafe { Box::from_raw(instance.as_ptr()) })
    }

    /// Drops the instance if any, and takes the ownership of `instance`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ptrkit::ExclusivePtr;
    ///
    /// let mut owned = ExclusivePtr::new(1);
    ///
    /// owned.reset(Some(Box::new(2)));
    /// assert_eq!(*owned, 2);
    ///
    /// owned.reset(None);
    /// assert!(owned.is_null());
    /// ```
    #[inline]
    pub fn reset(&mut self, instance: Option<Box<T>>) {
        drop(self.release());
        self.instance = instance.map(|boxed| NonNull::from(Box::leak(boxed)));
    }

    /// Moves the instance out of `self` into a new [`ExclusivePtr`], leaving `self` null.
    #[inline]
    #[must_use]
    pub fn take(&mut self) -> Self {
        Self {
            instance: self.instance.take(),
            _phantom: PhantomData,
        }
    }

    /// Exchanges the instances owned by `self` and `other`.
    #[inline]
    pub fn swap(&mut self, other: &mut Self) {
        std::mem::swap(&mut self.instance, &mut other.instance);
    }
}

impl<T> Default for ExclusivePtr<T> {
    #[inline]
    fn default() -> Self {
        Self::null()
    }
}

impl<T> Deref for ExclusivePtr<T> {
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

impl<T> DerefMut for ExclusivePtr<T> {
    /// # Panics
    ///
    /// Panics if `self` is null.
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        match self.get_mut() {
            Some(instance) => instance,
            None => panic!("{}", PreconditionViolation::EmptyPointer),
        }
    }
}

impl<T> Drop for ExclusivePtr<T> {
    #[inline]
    fn drop(&mut self) {
        drop(self.release());
    }
}

impl<T> From<Box<T>> for ExclusivePtr<T> {
    #[inline]
    fn from(boxed: Box<T>) -> Self {
        Self::from_box(boxed)
    }
}

impl<T> Swap for ExclusivePtr<T> {
    #[inline]
    fn swap(&mut self, other: &mut Self) {
        Self::swap(self, other);
    }
}

impl<T: fmt::Debug> fmt::Debug for ExclusivePtr<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ExclusivePtr").field(&self.get()).finish()
    }
}

// `ExclusivePtr` owns its instance as `Box` does.
unsafe impl<T: Send> Send for ExclusivePtr<T> {}

unsafe impl<T: Sync> Sync for ExclusivePtr<T> {}
