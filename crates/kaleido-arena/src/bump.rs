use std::alloc::{self, Layout};
use std::cell::Cell;
use std::ptr::NonNull;
use std::{fmt, slice, str};

use crate::allocator::{AllocError, Allocator, dangling};

const BLOCK_ALIGN: usize = 16;

/// A bump allocator over one block reserved up front.
///
/// Allocation advances an offset; [`Allocator::release`] is a no-op and the
/// block is returned to the heap only when the arena is dropped. A request that
/// does not fit fails with [`AllocError::Exhausted`], there is no second block.
pub struct BumpArena {
    block: NonNull<u8>,
    capacity: usize,
    offset: Cell<usize>,
}

impl BumpArena {
    pub fn with_capacity(capacity: usize) -> Result<Self, AllocError> {
        let layout = Self::block_layout(capacity)?;
        let block = if capacity == 0 {
            dangling(layout)
        } else {
            let ptr = unsafe { alloc::alloc(layout) };
            NonNull::new(ptr).ok_or(AllocError::OutOfMemory { size: capacity })?
        };

        Ok(Self { block, capacity, offset: Cell::new(0) })
    }

    fn block_layout(capacity: usize) -> Result<Layout, AllocError> {
        Layout::from_size_align(capacity, BLOCK_ALIGN).or(Err(AllocError::CapacityOverflow))
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn used(&self) -> usize {
        self.offset.get()
    }

    pub fn remaining(&self) -> usize {
        self.capacity - self.offset.get()
    }

    /// Copies `text` into the arena.
    pub fn alloc_str(&self, text: &str) -> Result<&str, AllocError> {
        let bytes = self.alloc_slice_copy(text.as_bytes())?;
        Ok(unsafe { str::from_utf8_unchecked(bytes) })
    }

    pub fn alloc_slice_copy<T: Copy>(&self, items: &[T]) -> Result<&[T], AllocError> {
        let layout = Layout::for_value(items);
        let ptr = self.allocate(layout)?.cast::<T>();

        unsafe {
            ptr.as_ptr().copy_from_nonoverlapping(items.as_ptr(), items.len());
            Ok(slice::from_raw_parts(ptr.as_ptr(), items.len()))
        }
    }

    /// Forgets every allocation. Requires exclusive access, so nothing handed
    /// out earlier can still be borrowed.
    pub fn reset(&mut self) {
        self.offset.set(0);
    }
}

impl Allocator for BumpArena {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        let base = self.block.as_ptr() as usize;
        let offset = self.offset.get();
        let exhausted = || AllocError::Exhausted {
            requested: layout.size(),
            remaining: self.capacity - offset,
            capacity: self.capacity,
        };

        let address = base.checked_add(offset).ok_or_else(exhausted)?;
        let padding = address.next_multiple_of(layout.align()) - address;
        let start = offset.checked_add(padding).ok_or_else(exhausted)?;
        let end = start.checked_add(layout.size()).ok_or_else(exhausted)?;

        if end > self.capacity {
            return Err(exhausted());
        }

        self.offset.set(end);
        Ok(unsafe { self.block.add(start) })
    }

    unsafe fn release(&self, _ptr: NonNull<u8>, _layout: Layout) {}
}

impl Drop for BumpArena {
    fn drop(&mut self) {
        if self.capacity != 0 {
            // Validated in `with_capacity`.
            unsafe {
                let layout = Layout::from_size_align_unchecked(self.capacity, BLOCK_ALIGN);
                alloc::dealloc(self.block.as_ptr(), layout);
            }
        }
    }
}

impl fmt::Debug for BumpArena {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BumpArena")
            .field("capacity", &self.capacity)
            .field("used", &self.offset.get())
            .finish()
    }
}
