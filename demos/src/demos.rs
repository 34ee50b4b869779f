//! End-to-end usage of the `ptrkit` primitives.

use ptrkit::{swap, ExclusivePtr, OwningList, RefCountedPtr, WeakRef};
use std::cell::RefCell;
use std::rc::Rc;

/// A cache entry observing a shared document without keeping it alive.
pub struct Bookmark {
    name: String,
    target: WeakRef<String>,
}

impl Bookmark {
    /// Creates a new [`Bookmark`] observing `target`.
    #[must_use]
    pub fn new(name: &str, target: &RefCountedPtr<String>) -> Self {
        Self {
            name: name.to_owned(),
            target: WeakRef::from(target),
        }
    }

    /// Returns the bookmark name and the document if it is still alive.
    #[must_use]
    pub fn resolve(&self) -> (&str, Option<String>) {
        let target = self.target.lock();
        (self.name.as_str(), target.get().cloned())
    }
}

/// Keeps the `capacity` most recently pushed documents alive, and drops the oldest ones.
#[must_use]
pub fn recent(documents: &[RefCountedPtr<String>], capacity: usize) -> OwningList<RefCountedPtr<String>> {
    let mut list = OwningList::new();
    for document in documents {
        list.push_front(document.clone());
        if list.len() > capacity {
            list.pop_back();
        }
    }
    list
}
