use std::mem::ManuallyDrop;
use std::ptr;

use simvec_buffer::OwningBuffer;

use crate::error::{self, Result};

/// A growable array built on a single exclusively owned [`OwningBuffer`].
///
/// The first `len` slots of the buffer hold live elements; the remaining
/// `capacity - len` slots are allocated but uninitialized. Only the live range
/// is visible through indexing, iteration and comparison.
///
/// Growth never extends an allocation in place: a larger buffer is allocated,
/// the live elements are moved into it, and the old buffer is released. Any
/// growth therefore invalidates every pointer into the old storage.
///
/// # Growth policy
///
/// When a push or insert finds the array full, the capacity becomes
/// `max(1, 2 * capacity)`.
///
/// # Examples
///
/// ```
/// use simvec::{DynamicArray, simvec};
///
/// let mut v = DynamicArray::new();
/// v.push(1);
/// v.push(2);
/// v.push(3);
/// assert_eq!(v.capacity(), 4);
///
/// v.insert(0, 0);
/// assert_eq!(v, simvec![0, 1, 2, 3]);
///
/// assert!(v.at(4).is_err());
/// ```
pub struct DynamicArray<T> {
    /// Backing storage; its slot count is the capacity.
    buffer: OwningBuffer<T>,
    /// Number of initialized elements at the start of `buffer`.
    len: usize,
}

impl<T> DynamicArray<T> {
    /// Capacity multiplier applied when a full array needs another slot.
    pub const GROWTH_FACTOR: usize = 2;

    /// Capacity of the first allocation made by growing an empty array.
    pub const MIN_NON_ZERO_CAPACITY: usize = 1;

    /// Creates an empty array without allocating.
    pub const fn new() -> DynamicArray<T> {
        DynamicArray {
            buffer: OwningBuffer::new(),
            len: 0,
        }
    }

    /// Creates an empty array with room for exactly `capacity` elements.
    pub fn with_capacity(capacity: usize) -> DynamicArray<T> {
        DynamicArray {
            buffer: OwningBuffer::allocate(capacity),
            len: 0,
        }
    }

    /// Creates an array of `len` default elements, with capacity `len`.
    pub fn with_len(len: usize) -> DynamicArray<T>
    where
        T: Default,
    {
        let mut array = DynamicArray::with_capacity(len);
        array.extend_with(len, T::default);
        array
    }

    /// Creates an array of `len` copies of `value`, with capacity `len`.
    pub fn from_elem(len: usize, value: T) -> DynamicArray<T>
    where
        T: Clone,
    {
        let mut array = DynamicArray::with_capacity(len);
        if len != 0 {
            array.extend_with(len - 1, || value.clone());
            unsafe { array.write_next(value) };
        }
        array
    }

    /// Returns the number of live elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns the number of allocated slots.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Returns `true` if the array holds no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the live elements as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        unsafe { std::slice::from_raw_parts(self.buffer.as_ptr(), self.len) }
    }

    /// Returns the live elements as a mutable slice.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        unsafe { std::slice::from_raw_parts_mut(self.buffer.as_mut_ptr(), self.len) }
    }

    /// Returns a reference to the element at `index`, or `None` if out of range.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.as_slice().get(index)
    }

    /// Returns a mutable reference to the element at `index`, or `None` if out
    /// of range.
    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.as_mut_slice().get_mut(index)
    }

    /// Returns a reference to the element at `index` without bounds checking.
    ///
    /// # Safety
    ///
    /// `index` must be less than [`DynamicArray::len`].
    #[inline]
    pub unsafe fn get_unchecked(&self, index: usize) -> &T {
        debug_assert!(index < self.len);
        unsafe { &*self.buffer.as_ptr().add(index) }
    }

    /// Returns a mutable reference to the element at `index` without bounds
    /// checking.
    ///
    /// # Safety
    ///
    /// `index` must be less than [`DynamicArray::len`].
    #[inline]
    pub unsafe fn get_unchecked_mut(&mut self, index: usize) -> &mut T {
        debug_assert!(index < self.len);
        unsafe { &mut *self.buffer.as_mut_ptr().add(index) }
    }

    /// Returns a reference to the element at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::OutOfRange`](crate::ErrorKind::OutOfRange) if
    /// `index >= len`.
    pub fn at(&self, index: usize) -> Result<&T> {
        if index < self.len {
            Ok(unsafe { self.get_unchecked(index) })
        } else {
            error::out_of_range(index, self.len)
        }
    }

    /// Returns a mutable reference to the element at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::OutOfRange`](crate::ErrorKind::OutOfRange) if
    /// `index >= len`.
    pub fn at_mut(&mut self, index: usize) -> Result<&mut T> {
        if index < self.len {
            Ok(unsafe { self.get_unchecked_mut(index) })
        } else {
            error::out_of_range(index, self.len)
        }
    }

    /// Returns an iterator over the live elements.
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    /// Returns an iterator that allows modifying each live element.
    #[inline]
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.as_mut_slice().iter_mut()
    }

    /// Appends `value` to the end of the array, doubling the capacity when full.
    pub fn push(&mut self, value: T) {
        if self.len == self.capacity() {
            self.grow();
        }
        unsafe { self.write_next(value) };
    }

    /// Removes the last element and returns it, or `None` if the array is empty.
    pub fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        Some(unsafe { ptr::read(self.buffer.as_ptr().add(self.len)) })
    }

    /// Removes and drops the last element.
    ///
    /// # Panics
    ///
    /// Panics if the array is empty.
    pub fn pop_back(&mut self) {
        assert!(!self.is_empty(), "pop_back on an empty array");
        self.pop();
    }

    /// Inserts `value` before position `index` and returns a reference to it.
    ///
    /// Elements from `index` onwards shift one slot to the right. A full array
    /// grows with the same policy as [`DynamicArray::push`] first.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    pub fn insert(&mut self, index: usize, value: T) -> &mut T {
        let len = self.len;
        assert!(
            index <= len,
            "insertion index (is {index}) should be <= len (is {len})"
        );

        if len == self.capacity() {
            self.grow();
        }

        unsafe {
            let p = self.buffer.as_mut_ptr().add(index);
            // Overlapping shift of [index, len) into [index + 1, len + 1).
            ptr::copy(p, p.add(1), len - index);
            p.write(value);
            self.len = len + 1;
            &mut *p
        }
    }

    /// Removes the element at `index` and returns a reference to the element
    /// that took its place, or `None` if the removed element was the last one.
    ///
    /// The remaining elements are moved into a freshly allocated buffer of
    /// exactly `len - 1` slots, so the capacity shrinks to the new length.
    ///
    /// # Panics
    ///
    /// Panics if the array is empty or `index >= len`.
    pub fn erase(&mut self, index: usize) -> Option<&mut T> {
        drop(self.remove(index));
        self.get_mut(index)
    }

    /// Removes the element at `index` and returns it.
    ///
    /// Compacts into a new buffer the same way as [`DynamicArray::erase`].
    ///
    /// # Panics
    ///
    /// Panics if the array is empty or `index >= len`.
    pub fn remove(&mut self, index: usize) -> T {
        let len = self.len;
        assert!(len != 0, "erase on an empty array");
        assert!(
            index < len,
            "removal index (is {index}) should be < len (is {len})"
        );

        log::trace!("compacting buffer from {} to {} slots", self.capacity(), len - 1);
        let mut compacted = OwningBuffer::<T>::allocate(len - 1);
        unsafe {
            let src = self.buffer.as_ptr();
            let dst = compacted.as_mut_ptr();
            let removed = ptr::read(src.add(index));
            ptr::copy_nonoverlapping(src, dst, index);
            ptr::copy_nonoverlapping(src.add(index + 1), dst.add(index), len - index - 1);
            self.buffer.swap(&mut compacted);
            self.len = len - 1;
            removed
        }
    }

    /// Drops every element. The capacity and the allocation are kept.
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Shortens the array to `new_len`, dropping the trailing elements.
    ///
    /// Has no effect if `new_len >= len`. The capacity is unchanged.
    pub fn truncate(&mut self, new_len: usize) {
        if new_len >= self.len {
            return;
        }
        let tail_len = self.len - new_len;
        unsafe {
            let tail = ptr::slice_from_raw_parts_mut(
                self.buffer.as_mut_ptr().add(new_len),
                tail_len,
            );
            // Shrink before dropping: a panicking destructor must not leave
            // the tail reachable.
            self.len = new_len;
            ptr::drop_in_place(tail);
        }
    }

    /// Resizes the array to `new_len` elements.
    ///
    /// - Beyond the capacity, the buffer is reallocated to exactly `new_len`
    ///   slots and the live elements are moved over.
    /// - Within the capacity, new elements are written in place.
    /// - Shrinking drops the trailing elements and keeps the capacity.
    ///
    /// New elements are `T::default()`.
    pub fn resize(&mut self, new_len: usize)
    where
        T: Default,
    {
        self.resize_with_fn(new_len, T::default);
    }

    /// Resizes the array to `new_len` elements, filling new slots with clones
    /// of `value`.
    ///
    /// Capacity changes follow [`DynamicArray::resize`].
    pub fn resize_with_value(&mut self, new_len: usize, value: T)
    where
        T: Clone,
    {
        self.resize_with_fn(new_len, || value.clone());
    }

    /// Ensures the capacity is at least `new_capacity`.
    ///
    /// A larger request reallocates to exactly `new_capacity` slots and moves
    /// the live elements over; smaller requests do nothing. The length never
    /// changes.
    pub fn reserve(&mut self, new_capacity: usize) {
        if new_capacity > self.capacity() {
            self.reallocate(new_capacity);
        }
    }

    /// Exchanges the contents of two arrays without moving any element.
    #[inline]
    pub fn swap(&mut self, other: &mut DynamicArray<T>) {
        self.buffer.swap(&mut other.buffer);
        std::mem::swap(&mut self.len, &mut other.len);
    }

    /// Moves the contents out, leaving `self` empty with no allocation.
    #[inline]
    pub fn take(&mut self) -> DynamicArray<T> {
        std::mem::take(self)
    }

    /// Clones and appends every element of `items`.
    pub fn extend_from_slice(&mut self, items: &[T])
    where
        T: Clone,
    {
        self.reserve_additional(items.len());
        for item in items {
            unsafe { self.write_next(item.clone()) };
        }
    }

    /// Consumes the array, returning its storage and the number of live
    /// elements at the start of it.
    pub(crate) fn into_raw_parts(self) -> (OwningBuffer<T>, usize) {
        let mut this = ManuallyDrop::new(self);
        (std::mem::take(&mut this.buffer), this.len)
    }
}

impl<T> DynamicArray<T> {
    /// Writes `value` into slot `len` and bumps the length.
    ///
    /// # Safety
    ///
    /// `len` must be less than the capacity.
    #[inline]
    unsafe fn write_next(&mut self, value: T) {
        debug_assert!(self.len < self.capacity());
        unsafe { self.buffer.as_mut_ptr().add(self.len).write(value) };
        self.len += 1;
    }

    /// Appends `count` values produced by `f` into already reserved slots.
    ///
    /// The length is bumped after every write, so a panic inside `f` leaves
    /// the array consistent.
    fn extend_with(&mut self, count: usize, mut f: impl FnMut() -> T) {
        assert!(count <= self.capacity() - self.len);
        for _ in 0..count {
            let value = f();
            unsafe { self.write_next(value) };
        }
    }

    fn resize_with_fn(&mut self, new_len: usize, f: impl FnMut() -> T) {
        if new_len <= self.len {
            self.truncate(new_len);
            return;
        }
        if new_len > self.capacity() {
            self.reallocate(new_len);
        }
        self.extend_with(new_len - self.len, f);
    }

    /// Makes room for `additional` more elements, at least doubling the
    /// capacity when it has to grow.
    pub(crate) fn reserve_additional(&mut self, additional: usize) {
        let required = self.len.checked_add(additional).expect("capacity overflow");
        if required > self.capacity() {
            let doubled = self.capacity().saturating_mul(Self::GROWTH_FACTOR);
            self.reallocate(required.max(doubled));
        }
    }

    /// Grows a full array by the growth factor.
    #[cold]
    fn grow(&mut self) {
        let new_capacity = self
            .capacity()
            .checked_mul(Self::GROWTH_FACTOR)
            .expect("capacity overflow")
            .max(Self::MIN_NON_ZERO_CAPACITY);
        self.reallocate(new_capacity);
    }

    /// Moves the live elements into a new buffer of `new_capacity` slots.
    ///
    /// The new buffer is fully populated before it replaces the old one, and
    /// the old allocation is released only afterwards.
    fn reallocate(&mut self, new_capacity: usize) {
        debug_assert!(new_capacity >= self.len);
        log::trace!(
            "reallocating buffer from {} to {} slots ({} live)",
            self.capacity(),
            new_capacity,
            self.len
        );

        let mut fresh = OwningBuffer::<T>::allocate(new_capacity);
        unsafe {
            ptr::copy_nonoverlapping(self.buffer.as_ptr(), fresh.as_mut_ptr(), self.len);
        }
        self.buffer.swap(&mut fresh);
    }
}

impl<T> Drop for DynamicArray<T> {
    fn drop(&mut self) {
        unsafe {
            ptr::drop_in_place(self.as_mut_slice() as *mut [T]);
        }
    }
}

impl<T: Clone> Clone for DynamicArray<T> {
    /// Deep-copies the live elements into a new buffer with capacity equal to
    /// the source length.
    fn clone(&self) -> DynamicArray<T> {
        let mut copy = DynamicArray::with_capacity(self.len);
        copy.extend_from_slice(self.as_slice());
        copy
    }
}

impl<T> Default for DynamicArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::ops::Deref for DynamicArray<T> {
    type Target = [T];

    #[inline]
    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> std::ops::DerefMut for DynamicArray<T> {
    #[inline]
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T, I: std::slice::SliceIndex<[T]>> std::ops::Index<I> for DynamicArray<T> {
    type Output = I::Output;

    #[inline]
    fn index(&self, index: I) -> &Self::Output {
        std::ops::Index::index(self.as_slice(), index)
    }
}

impl<T, I: std::slice::SliceIndex<[T]>> std::ops::IndexMut<I> for DynamicArray<T> {
    #[inline]
    fn index_mut(&mut self, index: I) -> &mut Self::Output {
        std::ops::IndexMut::index_mut(self.as_mut_slice(), index)
    }
}

impl<T> AsRef<[T]> for DynamicArray<T> {
    fn as_ref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> AsMut<[T]> for DynamicArray<T> {
    fn as_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T> std::borrow::Borrow<[T]> for DynamicArray<T> {
    fn borrow(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> std::borrow::BorrowMut<[T]> for DynamicArray<T> {
    fn borrow_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for DynamicArray<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynamicArray")
            .field("values", &self.as_slice())
            .field("len", &self.len)
            .field("cap", &self.capacity())
            .finish()
    }
}

impl<T, const N: usize> From<[T; N]> for DynamicArray<T> {
    fn from(items: [T; N]) -> Self {
        let mut array = DynamicArray::with_capacity(N);
        for item in items {
            unsafe { array.write_next(item) };
        }
        array
    }
}

impl<T: Clone> From<&[T]> for DynamicArray<T> {
    fn from(items: &[T]) -> Self {
        let mut array = DynamicArray::with_capacity(items.len());
        array.extend_from_slice(items);
        array
    }
}

impl<T> From<Vec<T>> for DynamicArray<T> {
    fn from(items: Vec<T>) -> Self {
        let mut array = DynamicArray::with_capacity(items.len());
        for item in items {
            unsafe { array.write_next(item) };
        }
        array
    }
}

impl<T> Extend<T> for DynamicArray<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        self.reserve_additional(iter.size_hint().0);
        for item in iter {
            self.push(item);
        }
    }
}

impl<'a, T: Copy + 'a> Extend<&'a T> for DynamicArray<T> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

impl<T> FromIterator<T> for DynamicArray<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut array = DynamicArray::new();
        array.extend(iter);
        array
    }
}

impl<'a, T> IntoIterator for &'a DynamicArray<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut DynamicArray<T> {
    type Item = &'a mut T;
    type IntoIter = std::slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}
