use thiserror::Error;

/// [`PreconditionViolation`] reports an access that requires a non-empty container or pointer.
///
/// The unchecked accessors either return [`None`] or, for [`Deref`](std::ops::Deref), panic with
/// the message of the corresponding variant. The checked accessors return it as an error.
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub enum PreconditionViolation {
    /// A null [`ExclusivePtr`](super::ExclusivePtr) or [`RefCountedPtr`](super::RefCountedPtr)
    /// was dereferenced.
    #[error("dereferenced a null pointer")]
    EmptyPointer,
    /// The front or back of an empty [`OwningList`](super::OwningList) was accessed.
    #[error("accessed an end of an empty list")]
    EmptyList,
}
