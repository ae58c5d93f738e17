//! Move-only owner of a single heap allocation of `T` slots.
//!
//! `OwningBuffer` is the storage layer of `simvec::DynamicArray`. It either
//! owns exactly one allocation of `len` slots, or owns nothing. There is no
//! shared ownership: the buffer is not `Clone`, and ownership leaves it only by
//! moving the buffer itself or through [`OwningBuffer::release`].
//!
//! # Safety
//!
//! Slots are exposed as [`MaybeUninit<T>`]. The buffer never reads, drops or
//! initializes the values stored in them. Dropping the buffer frees the memory
//! and nothing else, so a container that placed live values into the slots
//! must drop them first.

use std::marker::PhantomData;
use std::mem::MaybeUninit;
use std::ptr::{self, NonNull};

use crate::raw;

/// Exclusively owned heap storage for a fixed number of `T` slots.
///
/// An empty buffer (created by [`OwningBuffer::new`], or by
/// [`OwningBuffer::allocate`] with a zero count) holds no allocation at all.
///
/// Copying a buffer is not possible; duplication goes through the owning
/// container, which allocates a new buffer and clones the live elements into
/// it:
///
/// ```compile_fail
/// use simvec_buffer::OwningBuffer;
///
/// let a = OwningBuffer::<u32>::allocate(4);
/// let b = a.clone();
/// ```
///
/// # Examples
///
/// ```
/// use simvec_buffer::OwningBuffer;
///
/// let mut buf = OwningBuffer::<u64>::allocate(3);
/// assert!(buf.is_allocated());
/// assert_eq!(buf.len(), 3);
///
/// buf[1].write(42);
/// assert_eq!(unsafe { buf[1].assume_init() }, 42);
///
/// let moved = std::mem::take(&mut buf);
/// assert!(!buf.is_allocated());
/// assert_eq!(moved.len(), 3);
/// ```
pub struct OwningBuffer<T> {
    /// Start of the allocation, dangling when nothing is owned.
    ptr: NonNull<T>,
    /// Number of slots in the allocation, zero when nothing is owned.
    len: usize,
    _marker: PhantomData<T>,
}

impl<T> OwningBuffer<T> {
    /// Creates an empty buffer that owns no allocation.
    pub const fn new() -> OwningBuffer<T> {
        OwningBuffer {
            ptr: NonNull::dangling(),
            len: 0,
            _marker: PhantomData,
        }
    }

    /// Allocates a buffer of `len` uninitialized slots.
    ///
    /// A zero `len` is the same as [`OwningBuffer::new`]: nothing is
    /// allocated.
    ///
    /// # Panics
    ///
    /// Panics with `"capacity overflow"` if `len` slots of `T` exceed
    /// `isize::MAX` bytes. Allocation failure aborts through
    /// [`std::alloc::handle_alloc_error`].
    pub fn allocate(len: usize) -> OwningBuffer<T> {
        if len == 0 {
            return Self::new();
        }
        OwningBuffer {
            ptr: raw::allocate::<T>(len),
            len,
            _marker: PhantomData,
        }
    }

    /// Takes ownership of an existing allocation of `len` slots.
    ///
    /// A null `ptr` or a zero `len` produces an empty buffer.
    ///
    /// # Safety
    ///
    /// Unless the buffer is empty per the rule above, `ptr` must come from
    /// [`OwningBuffer::release`] with the same `len`, or from the global
    /// allocator with `Layout::array::<T>(len)`. The caller must not use or
    /// free the allocation after this call.
    pub unsafe fn from_raw_parts(ptr: *mut T, len: usize) -> OwningBuffer<T> {
        match NonNull::new(ptr) {
            Some(ptr) if len != 0 => {
                log::debug!("adopting allocation of {len} slots at {ptr:p}");
                OwningBuffer {
                    ptr,
                    len,
                    _marker: PhantomData,
                }
            }
            _ => Self::new(),
        }
    }

    /// Gives up ownership of the allocation and returns it with its slot count.
    ///
    /// The buffer is left empty. For an empty buffer the result is
    /// `(null, 0)`. The caller becomes responsible for freeing the allocation,
    /// usually by handing it back to [`OwningBuffer::from_raw_parts`].
    #[must_use = "the released allocation leaks unless it is adopted again"]
    pub fn release(&mut self) -> (*mut T, usize) {
        if !self.is_allocated() {
            return (ptr::null_mut(), 0);
        }
        let ptr = std::mem::replace(&mut self.ptr, NonNull::dangling());
        let len = std::mem::take(&mut self.len);
        log::debug!("releasing allocation of {len} slots at {ptr:p}");
        (ptr.as_ptr(), len)
    }

    /// Returns `true` if the buffer currently owns an allocation.
    #[inline]
    pub fn is_allocated(&self) -> bool {
        self.len != 0
    }

    /// Returns the number of slots in the owned allocation.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the buffer owns no slots.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns a pointer to the first slot.
    ///
    /// For an empty buffer the pointer is dangling but well aligned.
    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.ptr.as_ptr()
    }

    /// Returns a mutable pointer to the first slot.
    ///
    /// For an empty buffer the pointer is dangling but well aligned.
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.ptr.as_ptr()
    }

    /// Returns the slots of the buffer.
    #[inline]
    pub fn as_slots(&self) -> &[MaybeUninit<T>] {
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr().cast(), self.len) }
    }

    /// Returns the slots of the buffer for writing.
    #[inline]
    pub fn as_slots_mut(&mut self) -> &mut [MaybeUninit<T>] {
        unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr().cast(), self.len) }
    }

    /// Returns the slot at `index` without bounds checking.
    ///
    /// # Safety
    ///
    /// `index` must be less than [`OwningBuffer::len`].
    #[inline]
    pub unsafe fn get_unchecked(&self, index: usize) -> &MaybeUninit<T> {
        debug_assert!(index < self.len);
        unsafe { &*self.ptr.as_ptr().add(index).cast::<MaybeUninit<T>>() }
    }

    /// Returns the slot at `index` for writing, without bounds checking.
    ///
    /// # Safety
    ///
    /// `index` must be less than [`OwningBuffer::len`].
    #[inline]
    pub unsafe fn get_unchecked_mut(&mut self, index: usize) -> &mut MaybeUninit<T> {
        debug_assert!(index < self.len);
        unsafe { &mut *self.ptr.as_ptr().add(index).cast::<MaybeUninit<T>>() }
    }

    /// Exchanges the allocations owned by `self` and `other`.
    ///
    /// No slot contents are moved.
    #[inline]
    pub fn swap(&mut self, other: &mut OwningBuffer<T>) {
        std::mem::swap(&mut self.ptr, &mut other.ptr);
        std::mem::swap(&mut self.len, &mut other.len);
    }
}

impl<T> std::ops::Deref for OwningBuffer<T> {
    type Target = [MaybeUninit<T>];

    #[inline]
    fn deref(&self) -> &Self::Target {
        self.as_slots()
    }
}

impl<T> std::ops::DerefMut for OwningBuffer<T> {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.as_slots_mut()
    }
}

impl<T> Default for OwningBuffer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for OwningBuffer<T> {
    /// Frees the allocation. Values left in the slots are not dropped.
    fn drop(&mut self) {
        if self.is_allocated() {
            unsafe { raw::free(self.ptr, self.len) };
        }
    }
}

// SAFETY: the buffer exclusively owns its allocation, so sending it moves the
// only handle to the stored `T` values.
unsafe impl<T: Send> Send for OwningBuffer<T> {}

// SAFETY: shared access only hands out shared references to the slots.
unsafe impl<T: Sync> Sync for OwningBuffer<T> {}

impl<T> std::fmt::Debug for OwningBuffer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OwningBuffer")
            .field("ptr", &self.ptr)
            .field("len", &self.len)
            .finish()
    }
}
