use std::cell::{Cell, UnsafeCell};
use std::ptr::{self, NonNull};

use log::trace;

/// [`ControlBlock`] stores an instance of type `T` along with a strong and a weak reference count.
///
/// The instance is dropped when the strong count reaches `0`, and the block itself is deallocated
/// once both counts are `0`. A block whose instance was dropped while weak references remain keeps
/// an empty slot until the last weak reference is gone.
pub(super) struct ControlBlock<T> {
    instance: UnsafeCell<Option<T>>,
    strong: Cell<usize>,
    weak: Cell<usize>,
}

impl<T> ControlBlock<T> {
    /// Creates a new [`ControlBlock`] owned by a single strong reference.
    #[inline]
    pub(super) fn new(instance: T) -> NonNull<ControlBlock<T>> {
        let boxed = Box::new(Self {
            instance: UnsafeCell::new(Some(instance)),
            strong: Cell::new(1),
            weak: Cell::new(0),
        });
        NonNull::from(Box::leak(boxed))
    }

    /// Returns the number of strong references.
    #[inline]
    pub(super) fn strong_count(&self) -> usize {
        self.strong.get()
    }

    /// Returns the number of weak references.
    #[inline]
    pub(super) fn weak_count(&self) -> usize {
        self.weak.get()
    }

    /// Returns a reference to the instance, or `None` if it has already been dropped.
    #[inline]
    pub(super) fn instance(&self) -> Option<&T> {
        // The slot is only written when the strong count reaches `0`, and no strong reference can
        // hand out a borrow past that point.
        unsafe { (*self.instance.get()).as_ref() }
    }

    /// Returns a raw pointer to the instance, or a null pointer if it has already been dropped.
    #[inline]
    pub(super) fn instance_ptr(&self) -> *const T {
        self.instance().map_or(ptr::null(), ptr::from_ref)
    }

    /// Adds a strong reference to a live instance.
    #[inline]
    pub(super) fn add_strong(&self) {
        let current = self.strong.get();
        debug_assert_ne!(current, 0, "strong count resurrected from zero");
        debug_assert!(current < usize::MAX, "reference count overflow");
        self.strong.set(current + 1);
    }

    /// Tries to add a strong reference to the instance.
    ///
    /// Returns `false` without touching the count if the instance has already been dropped.
    #[inline]
    pub(super) fn try_add_strong(&self) -> bool {
        let current = self.strong.get();
        if current == 0 {
            return false;
        }
        debug_assert!(current < usize::MAX, "reference count overflow");
        self.strong.set(current + 1);
        true
    }

    /// Adds a weak reference.
    #[inline]
    pub(super) fn add_weak(&self) {
        let current = self.weak.get();
        debug_assert!(current < usize::MAX, "reference count overflow");
        self.weak.set(current + 1);
    }

    /// Drops a strong reference.
    ///
    /// The instance is dropped if it was the last strong reference, and the block is deallocated
    /// if no weak reference remains either.
    ///
    /// # Safety
    ///
    /// `this` must point to a live block, and the caller must give up the strong reference it
    /// owns; `this` must not be used by the caller afterwards.
    pub(super) unsafe fn release_strong(this: NonNull<Self>) {
        {
            let block = unsafe { this.as_ref() };
            debug_assert_ne!(block.strong.get(), 0);
            let strong = block.strong.get() - 1;
            block.strong.set(strong);
            if strong != 0 {
                return;
            }

            // The block holds a weak reference to itself while the instance is being dropped so
            // that a destructor releasing the last outside weak reference cannot free it.
            block.add_weak();
        }

        let instance = unsafe { (*this.as_ref().instance.get()).take() };
        drop(instance);

        let observers = unsafe { this.as_ref() }.weak.get() - 1;
        trace!("control block {this:p}: instance dropped, {observers} weak reference(s) left");

        unsafe {
            Self::release_weak(this);
        }
    }

    /// Drops a weak reference.
    ///
    /// The block is deallocated if it was the last weak reference and the instance has already
    /// been dropped.
    ///
    /// # Safety
    ///
    /// `this` must point to a live block, and the caller must give up the weak reference it owns;
    /// `this` must not be used by the caller afterwards.
    pub(super) unsafe fn release_weak(this: NonNull<Self>) {
        let block = unsafe { this.as_ref() };
        debug_assert_ne!(block.weak.get(), 0);
        let weak = block.weak.get() - 1;
        block.weak.set(weak);
        if weak != 0 || block.strong.get() != 0 {
            return;
        }

        trace!("control block {this:p}: deallocated");
        drop(unsafe { Box::from_raw(this.as_ptr()) });
    }
}
