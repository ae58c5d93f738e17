//! Exclusively owned, fixed-size heap storage for the `simvec` containers.
//!
//! [`OwningBuffer`] holds at most one contiguous allocation of `T` slots and
//! releases it on drop. It tracks memory only: whether a slot holds a live
//! value is the business of the container built on top of it.

pub mod owning_buffer;
mod raw;

pub use owning_buffer::OwningBuffer;
