use std::alloc::{Layout, alloc, dealloc, handle_alloc_error};
use std::ptr::NonNull;

/// Returns the layout of an array of `len` elements of type `T`.
///
/// # Panics
///
/// Panics if the total size in bytes would exceed `isize::MAX`.
#[inline]
pub(crate) fn array_layout<T>(len: usize) -> Layout {
    Layout::array::<T>(len).expect("capacity overflow")
}

/// Allocates uninitialized storage for `len` elements of type `T`.
///
/// Requests of zero bytes (either `len == 0` or a zero-sized `T`) do not reach
/// the allocator and yield a dangling, well-aligned pointer.
///
/// Allocation failure is reported through [`handle_alloc_error`].
pub(crate) fn allocate<T>(len: usize) -> NonNull<T> {
    let layout = array_layout::<T>(len);
    if layout.size() == 0 {
        return NonNull::dangling();
    }

    // SAFETY: the layout has a non-zero size.
    let ptr = unsafe { alloc(layout) };
    match NonNull::new(ptr.cast::<T>()) {
        Some(p) => p,
        None => handle_alloc_error(layout),
    }
}

/// Frees storage obtained from [`allocate`].
///
/// # Safety
///
/// `ptr` must have been returned by `allocate::<T>(len)` with the same `len`
/// and must not be used after this call.
pub(crate) unsafe fn free<T>(ptr: NonNull<T>, len: usize) {
    let layout = array_layout::<T>(len);
    if layout.size() != 0 {
        unsafe {
            dealloc(ptr.as_ptr().cast::<u8>(), layout);
        }
    }
}
