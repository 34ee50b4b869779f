/// [`Swap`] exchanges the state of two instances in O(1) without moving the owned values.
pub trait Swap {
    /// Exchanges the state of `self` and `other`.
    fn swap(&mut self, other: &mut Self);
}

/// Exchanges the state of `lhs` and `rhs`.
///
/// This is the free-standing counterpart of [`Swap::swap`].
///
/// # Examples
///
/// ```
/// use ptrkit::{swap, ExclusivePtr};
///
/// let mut a = ExclusivePtr::new(1);
/// let mut b = ExclusivePtr::null();
///
/// swap(&mut a, &mut b);
///
/// assert!(a.is_null());
/// assert_eq!(*b, 1);
/// ```
#[inline]
pub fn swap<S: Swap + ?Sized>(lhs: &mut S, rhs: &mut S) {
    lhs.swap(rhs);
}
