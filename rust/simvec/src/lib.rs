//! A growable array over manually managed, exclusively owned heap storage.
//!
//! [`DynamicArray`] keeps its elements in one [`OwningBuffer`] and tracks the
//! number of live elements separately from the number of allocated slots.
//! Growth always allocates a new buffer and moves the elements over; the
//! capacity doubles when a push or insert finds the array full.
//!
//! Two access tiers are provided. [`DynamicArray::get_unchecked`] has a
//! documented precondition and performs no check, while [`DynamicArray::at`]
//! reports an out-of-range index as an [`Error`]. The other contract
//! violations (popping or erasing from an empty array, inserting past the end)
//! panic.
//!
//! ```
//! use simvec::{DynamicArray, reserve, simvec};
//!
//! let mut v = DynamicArray::from(reserve(2));
//! v.push("a");
//! v.push("b");
//! v.push("c");
//! assert_eq!(v.capacity(), 4);
//!
//! let w = v.clone();
//! v.erase(0);
//! assert_eq!(w, simvec!["a", "b", "c"]);
//! assert_eq!(v, simvec!["b", "c"]);
//! ```

pub mod array;
pub mod cmp;
pub mod error;
pub mod into_iter;
pub mod reservation;

pub use array::DynamicArray;
pub use error::{Error, ErrorKind, Result};
pub use into_iter::IntoIter;
pub use reservation::{CapacityReservation, reserve};
pub use simvec_buffer::OwningBuffer;

/// Creates a [`DynamicArray`] from a list of elements or a repeated value.
///
/// - `simvec![a, b, c]` allocates exactly as many slots as there are elements.
/// - `simvec![value; n]` holds `n` clones of `value`.
///
/// ```
/// use simvec::simvec;
///
/// let v = simvec![10, 20, 30];
/// assert_eq!(v.len(), 3);
/// assert_eq!(v.capacity(), 3);
///
/// let zeros = simvec![0u8; 4];
/// assert_eq!(zeros.as_slice(), &[0, 0, 0, 0]);
/// ```
#[macro_export]
macro_rules! simvec {
    () => {
        $crate::DynamicArray::new()
    };
    ($elem:expr; $n:expr) => {
        $crate::DynamicArray::from_elem($n, $elem)
    };
    ($($x:expr),+ $(,)?) => {
        $crate::DynamicArray::from([$($x),+])
    };
}
