use std::alloc::Layout;
use std::marker::PhantomData;
use std::mem::ManuallyDrop;
use std::ptr::{self, NonNull};
use std::{fmt, slice};

use crate::allocator::{AllocError, Allocator, Heap};
use crate::bump::BumpArena;

/// Contiguous, append-only storage that doubles its capacity when full.
///
/// Growth copies the elements into a fresh block and hands the old block back
/// to the allocator. Slots returned by [`Array::push`] borrow the array
/// mutably, so none of them can outlive the next push.
pub struct Array<T, A: Allocator = Heap> {
    ptr: NonNull<T>,
    len: usize,
    capacity: usize,
    allocator: A,
    _marker: PhantomData<T>,
}

impl<T> Array<T> {
    pub fn with_capacity(capacity: usize) -> Result<Self, AllocError> {
        Self::with_capacity_in(capacity, Heap)
    }
}

impl<T, A: Allocator> Array<T, A> {
    pub fn with_capacity_in(capacity: usize, allocator: A) -> Result<Self, AllocError> {
        let capacity = capacity.max(1);
        let ptr = allocator.allocate(Self::layout(capacity)?)?.cast();
        Ok(Self { ptr, len: 0, capacity, allocator, _marker: PhantomData })
    }

    fn layout(capacity: usize) -> Result<Layout, AllocError> {
        Layout::array::<T>(capacity).or(Err(AllocError::CapacityOverflow))
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Appends `value` and returns its slot.
    pub fn push(&mut self, value: T) -> Result<&mut T, AllocError> {
        if self.len == self.capacity {
            self.grow()?;
        }

        unsafe {
            let slot = self.ptr.add(self.len);
            slot.write(value);
            self.len += 1;
            Ok(&mut *slot.as_ptr())
        }
    }

    fn grow(&mut self) -> Result<(), AllocError> {
        let capacity = self.capacity.checked_mul(2).ok_or(AllocError::CapacityOverflow)?;
        let old_layout = Self::layout(self.capacity)?;
        let ptr = self.allocator.allocate(Self::layout(capacity)?)?.cast::<T>();

        unsafe {
            ptr.copy_from_nonoverlapping(self.ptr, self.len);
            self.allocator.release(self.ptr.cast(), old_layout);
        }

        self.ptr = ptr;
        self.capacity = capacity;
        tracing::debug!(capacity, "resized array");
        Ok(())
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.as_slice().get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.as_mut_slice().get_mut(index)
    }

    pub fn as_slice(&self) -> &[T] {
        unsafe { slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        unsafe { slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }

    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.as_slice().iter()
    }
}

impl<'a, T: Copy> Array<T, &'a BumpArena> {
    /// Freezes the elements in place. The arena never reuses the block, so the
    /// slice stays valid for as long as the arena is borrowed.
    pub fn into_arena_slice(self) -> &'a [T] {
        let this = ManuallyDrop::new(self);
        unsafe { slice::from_raw_parts(this.ptr.as_ptr(), this.len) }
    }
}

impl<T, A: Allocator> Drop for Array<T, A> {
    fn drop(&mut self) {
        unsafe {
            ptr::drop_in_place(self.as_mut_slice());
            if let Ok(layout) = Self::layout(self.capacity) {
                self.allocator.release(self.ptr.cast(), layout);
            }
        }
    }
}

impl<'s, T, A: Allocator> IntoIterator for &'s Array<T, A> {
    type Item = &'s T;
    type IntoIter = slice::Iter<'s, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: fmt::Debug, A: Allocator> fmt::Debug for Array<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
