//! [`OwningList`] and its iterators.

use std::fmt;
use std::iter::FusedIterator;
use std::marker::PhantomData;
use std::ptr::NonNull;

use log::trace;

use super::{PreconditionViolation, Swap};

/// [`OwningList`] is a doubly-linked list owning its values.
///
/// Values can be pushed and popped at both ends in O(1). Every node is individually allocated and
/// linked to its neighbors; the list only keeps track of both ends and of the number of nodes.
///
/// # Examples
///
/// ```
/// use ptrkit::OwningList;
///
/// let mut list = OwningList::new();
/// list.push_back("a");
/// list.push_front("b");
/// list.pop_back();
///
/// assert_eq!(list.len(), 1);
/// assert_eq!(list.front(), Some(&"b"));
/// ```
pub struct OwningList<T> {
    head: Option<NonNull<Node<T>>>,
    tail: Option<NonNull<Node<T>>>,
    len: usize,
    _phantom: PhantomData<Box<Node<T>>>,
}

/// Iterator over the values of an [`OwningList`].
pub struct Iter<'l, T> {
    head: Option<NonNull<Node<T>>>,
    tail: Option<NonNull<Node<T>>>,
    len: usize,
    _phantom: PhantomData<&'l Node<T>>,
}

/// Iterator over mutable references to the values of an [`OwningList`].
pub struct IterMut<'l, T> {
    head: Option<NonNull<Node<T>>>,
    tail: Option<NonNull<Node<T>>>,
    len: usize,
    _phantom: PhantomData<&'l mut Node<T>>,
}

/// Owning iterator over the values of an [`OwningList`].
pub struct IntoIter<T> {
    list: OwningList<T>,
}

struct Node<T> {
    value: T,
    prev: Option<NonNull<Node<T>>>,
    next: Option<NonNull<Node<T>>>,
}

impl<T> OwningList<T> {
    /// Creates an empty [`OwningList`].
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            head: None,
            tail: None,
            len: 0,
            _phantom: PhantomData,
        }
    }

    /// Returns the number of values in the list.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the list holds no value.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Appends `value` to the back of the list.
    #[inline]
    pub fn push_back(&mut self, value: T) {
        self.link_before(value, None);
    }

    /// Prepends `value` to the front of the list.
    #[inline]
    pub fn push_front(&mut self, value: T) {
        self.link_before(value, self.head);
    }

    /// Removes the last value and returns it, or `None` if the list is empty.
    #[inline]
    pub fn pop_back(&mut self) -> Option<T> {
        let tail = self.tail?;
        Some(unsafe { self.unlink(tail) })
    }

    /// Removes the first value and returns it, or `None` if the list is empty.
    #[inline]
    pub fn pop_front(&mut self) -> Option<T> {
        let head = self.head?;
        Some(unsafe { self.unlink(head) })
    }

    /// Returns a reference to the first value, or `None` if the list is empty.
    #[inline]
    #[must_use]
    pub fn front(&self) -> Option<&T> {
        self.head.map(|node| unsafe { &(*node.as_ptr()).value })
    }

    /// Returns a mutable reference to the first value, or `None` if the list is empty.
    #[inline]
    pub fn front_mut(&mut self) -> Option<&mut T> {
        self.head.map(|node| unsafe { &mut (*node.as_ptr()).value })
    }

    /// Returns a reference to the last value, or `None` if the list is empty.
    #[inline]
    #[must_use]
    pub fn back(&self) -> Option<&T> {
        self.tail.map(|node| unsafe { &(*node.as_ptr()).value })
    }

    /// Returns a mutable reference to the last value, or `None` if the list is empty.
    #[inline]
    pub fn back_mut(&mut self) -> Option<&mut T> {
        self.tail.map(|node| unsafe { &mut (*node.as_ptr()).value })
    }

    /// Returns a reference to the first value.
    ///
    /// # Errors
    ///
    /// Returns [`PreconditionViolation::EmptyList`] if the list is empty.
    #[inline]
    pub fn try_front(&self) -> Result<&T, PreconditionViolation> {
        self.front().ok_or(PreconditionViolation::EmptyList)
    }

    /// Returns a reference to the last value.
    ///
    /// # Errors
    ///
    /// Returns [`PreconditionViolation::EmptyList`] if the list is empty.
    #[inline]
    pub fn try_back(&self) -> Result<&T, PreconditionViolation> {
        self.back().ok_or(PreconditionViolation::EmptyList)
    }

    /// Drops every value in the list.
    pub fn clear(&mut self) {
        if self.is_empty() {
            return;
        }
        trace!("clearing {} node(s)", self.len);
        while self.pop_front().is_some() {}
    }

    /// Moves every value out of `self` into a new [`OwningList`] in O(1), leaving `self` empty.
    #[inline]
    #[must_use]
    pub fn take(&mut self) -> Self {
        let mut taken = Self::new();
        self.swap(&mut taken);
        taken
    }

    /// Exchanges the contents of `self` and `other` in O(1).
    #[inline]
    pub fn swap(&mut self, other: &mut Self) {
        std::mem::swap(&mut self.head, &mut other.head);
        std::mem::swap(&mut self.tail, &mut other.tail);
        std::mem::swap(&mut self.len, &mut other.len);
    }

    /// Returns an iterator over the values, from front to back.
    #[inline]
    #[must_use]
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            head: self.head,
            tail: self.tail,
            len: self.len,
            _phantom: PhantomData,
        }
    }

    /// Returns an iterator over mutable references to the values, from front to back.
    #[inline]
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        IterMut {
            head: self.head,
            tail: self.tail,
            len: self.len,
            _phantom: PhantomData,
        }
    }

    /// Allocates a node owning `value` and links it in front of `before`, or at the back of the
    /// list if `before` is `None`.
    fn link_before(&mut self, value: T, before: Option<NonNull<Node<T>>>) {
        let prev = match before {
            Some(before) => unsafe { (*before.as_ptr()).prev },
            None => self.tail,
        };
        let node = NonNull::from(Box::leak(Box::new(Node {
            value,
            prev,
            next: before,
        })));

        match prev {
            Some(prev) => unsafe { (*prev.as_ptr()).next = Some(node) },
            None => self.head = Some(node),
        }
        match before {
            Some(before) => unsafe { (*before.as_ptr()).prev = Some(node) },
            None => self.tail = Some(node),
        }

        self.len += 1;
    }

    /// Unlinks `node`, deallocates it, and returns its value.
    ///
    /// # Safety
    ///
    /// `node` must be linked in `self`.
    unsafe fn unlink(&mut self, node: NonNull<Node<T>>) -> T {
        let Node { value, prev, next } = *unsafe { Box::from_raw(node.as_ptr()) };

        match prev {
            Some(prev) => unsafe { (*prev.as_ptr()).next = next },
            None => self.head = next,
        }
        match next {
            Some(next) => unsafe { (*next.as_ptr()).prev = prev },
            None => self.tail = prev,
        }

        debug_assert_ne!(self.len, 0);
        self.len -= 1;
        value
    }
}

impl<T: Clone> Clone for OwningList<T> {
    #[inline]
    fn clone(&self) -> Self {
        self.iter().cloned().collect()
    }

    /// The copy is built aside before being exchanged with `self`.
    #[inline]
    fn clone_from(&mut self, source: &Self) {
        let mut replacement = source.clone();
        self.swap(&mut replacement);
    }
}

impl<T> Default for OwningList<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for OwningList<T> {
    #[inline]
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T> Extend<T> for OwningList<T> {
    #[inline]
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push_back(value);
        }
    }
}

impl<T> FromIterator<T> for OwningList<T> {
    #[inline]
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = Self::new();
        list.extend(iter);
        list
    }
}

impl<T> IntoIterator for OwningList<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        IntoIter { list: self }
    }
}

impl<'l, T> IntoIterator for &'l OwningList<T> {
    type Item = &'l T;
    type IntoIter = Iter<'l, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'l, T> IntoIterator for &'l mut OwningList<T> {
    type Item = &'l mut T;
    type IntoIter = IterMut<'l, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<T: PartialEq> PartialEq for OwningList<T> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for OwningList<T> {}

impl<T> Swap for OwningList<T> {
    #[inline]
    fn swap(&mut self, other: &mut Self) {
        Self::swap(self, other);
    }
}

impl<T: fmt::Debug> fmt::Debug for OwningList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

// `OwningList` owns its values as `Box` does.
unsafe impl<T: Send> Send for OwningList<T> {}

unsafe impl<T: Sync> Sync for OwningList<T> {}

// `Iter` and `IterMut` behave as `&T` and `&mut T`.
unsafe impl<T: Sync> Send for Iter<'_, T> {}

unsafe impl<T: Sync> Sync for Iter<'_, T> {}

unsafe impl<T: Send> Send for IterMut<'_, T> {}

unsafe impl<T: Sync> Sync for IterMut<'_, T> {}

impl<'l, T> Iterator for Iter<'l, T> {
    type Item = &'l T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        self.head.map(|node| {
            // The list is borrowed for `'l`, and `len` stops the iterator before it crosses `tail`.
            let node = unsafe { &*node.as_ptr() };
            self.len -= 1;
            self.head = node.next;
            &node.value
        })
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        self.tail.map(|node| {
            let node = unsafe { &*node.as_ptr() };
            self.len -= 1;
            self.tail = node.prev;
            &node.value
        })
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            head: self.head,
            tail: self.tail,
            len: self.len,
            _phantom: PhantomData,
        }
    }
}

impl<'l, T> Iterator for IterMut<'l, T> {
    type Item = &'l mut T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        self.head.map(|node| {
            // Each node is handed out at most once since `len` bounds both ends.
            let node = unsafe { &mut *node.as_ptr() };
            self.len -= 1;
            self.head = node.next;
            &mut node.value
        })
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<T> DoubleEndedIterator for IterMut<'_, T> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        self.tail.map(|node| {
            let node = unsafe { &mut *node.as_ptr() };
            self.len -= 1;
            self.tail = node.prev;
            &mut node.value
        })
    }
}

impl<T> ExactSizeIterator for IterMut<'_, T> {}

impl<T> FusedIterator for IterMut<'_, T> {}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.list.pop_front()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.list.len, Some(self.list.len))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.list.pop_back()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}
