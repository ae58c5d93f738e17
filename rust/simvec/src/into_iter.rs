use std::iter::FusedIterator;
use std::ptr;

use simvec_buffer::OwningBuffer;

use crate::DynamicArray;

/// By-value iterator over the elements of a [`DynamicArray`].
///
/// Owns the array's buffer. Elements that were not yielded are dropped
/// together with the iterator.
pub struct IntoIter<T> {
    buffer: OwningBuffer<T>,
    /// Index of the next element yielded from the front.
    start: usize,
    /// One past the next element yielded from the back.
    end: usize,
}

impl<T> IntoIter<T> {
    /// Returns the remaining elements as a slice.
    pub fn as_slice(&self) -> &[T] {
        unsafe {
            std::slice::from_raw_parts(self.buffer.as_ptr().add(self.start), self.end - self.start)
        }
    }
}

impl<T> IntoIterator for DynamicArray<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        let (buffer, len) = self.into_raw_parts();
        IntoIter {
            buffer,
            start: 0,
            end: len,
        }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.start == self.end {
            return None;
        }
        let item = unsafe { ptr::read(self.buffer.as_ptr().add(self.start)) };
        self.start += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end - self.start;
        (remaining, Some(remaining))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        if self.start == self.end {
            return None;
        }
        self.end -= 1;
        Some(unsafe { ptr::read(self.buffer.as_ptr().add(self.end)) })
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}

impl<T> Drop for IntoIter<T> {
    fn drop(&mut self) {
        let remaining = self.end - self.start;
        unsafe {
            let rest = ptr::slice_from_raw_parts_mut(
                self.buffer.as_mut_ptr().add(self.start),
                remaining,
            );
            self.start = self.end;
            ptr::drop_in_place(rest);
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for IntoIter<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("IntoIter").field(&self.as_slice()).finish()
    }
}
