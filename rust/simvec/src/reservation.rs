//! Capacity-only construction request.
//!
//! `DynamicArray::from(reserve(n))` allocates `n` slots and creates no
//! elements, while `DynamicArray::with_len(n)` creates `n` default elements.
//! The wrapper type keeps the two apart where a bare integer would not.

use crate::DynamicArray;

/// A request to construct a container with `capacity` slots and no elements.
///
/// Created by [`reserve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CapacityReservation {
    capacity: usize,
}

impl CapacityReservation {
    /// Creates a reservation for `capacity` slots.
    pub const fn new(capacity: usize) -> CapacityReservation {
        CapacityReservation { capacity }
    }

    /// Returns the number of slots to reserve.
    #[inline]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Returns a reservation for `capacity` slots.
///
/// # Examples
///
/// ```
/// use simvec::{DynamicArray, reserve};
///
/// let v = DynamicArray::<String>::from(reserve(8));
/// assert_eq!(v.len(), 0);
/// assert_eq!(v.capacity(), 8);
/// ```
pub const fn reserve(capacity: usize) -> CapacityReservation {
    CapacityReservation::new(capacity)
}

impl<T> From<CapacityReservation> for DynamicArray<T> {
    fn from(reservation: CapacityReservation) -> Self {
        DynamicArray::with_capacity(reservation.capacity())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reservation_allocates_without_elements() {
        let v: DynamicArray<u32> = reserve(5).into();
        assert!(v.is_empty());
        assert_eq!(v.capacity(), 5);
    }

    #[test]
    fn test_reservation_differs_from_sized_construction() {
        let reserved = DynamicArray::<u32>::from(reserve(3));
        let sized = DynamicArray::<u32>::with_len(3);
        assert_eq!(reserved.capacity(), sized.capacity());
        assert_eq!(reserved.len(), 0);
        assert_eq!(sized.len(), 3);
    }

    #[test]
    fn test_zero_reservation() {
        let v = DynamicArray::<u8>::from(CapacityReservation::new(0));
        assert_eq!(v.capacity(), 0);
        assert_eq!(reserve(0).capacity(), 0);
    }
}
