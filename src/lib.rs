#![deny(missing_docs, clippy::all, clippy::pedantic)]
#![doc = include_str!("../README.md")]

mod control_block;

mod error;
pub use error::PreconditionViolation;

mod exclusive_ptr;
pub use exclusive_ptr::ExclusivePtr;

pub mod owning_list;
pub use owning_list::OwningList;

mod ref_counted_ptr;
pub use ref_counted_ptr::RefCountedPtr;

mod swap;
pub use swap::{swap, Swap};

mod weak_ref;
pub use weak_ref::WeakRef;

#[cfg(test)]
mod tests;
