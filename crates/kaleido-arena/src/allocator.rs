use std::alloc::{self, Layout};
use std::ptr::{self, NonNull};

use thiserror::Error;

#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum AllocError {
    #[error(
        "arena exhausted: requested {requested} bytes with {remaining} of {capacity} bytes remaining"
    )]
    Exhausted { requested: usize, remaining: usize, capacity: usize },

    #[error("allocation of {size} bytes failed")]
    OutOfMemory { size: usize },

    #[error("capacity overflow")]
    CapacityOverflow,
}

/// Source of raw memory for the containers in this crate.
///
/// Implementations hand out blocks that satisfy the size and alignment of the
/// requested layout and take them back through [`Allocator::release`].
pub trait Allocator {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError>;

    /// # Safety
    ///
    /// `ptr` must have been returned by [`Allocator::allocate`] on this
    /// allocator with the same `layout`, and must not be used afterwards.
    unsafe fn release(&self, ptr: NonNull<u8>, layout: Layout);
}

impl<A: Allocator + ?Sized> Allocator for &A {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        (**self).allocate(layout)
    }

    unsafe fn release(&self, ptr: NonNull<u8>, layout: Layout) {
        unsafe { (**self).release(ptr, layout) }
    }
}

/// The process heap, via the global allocator.
#[derive(Clone, Copy, Debug, Default)]
pub struct Heap;

impl Allocator for Heap {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        if layout.size() == 0 {
            return Ok(dangling(layout));
        }

        let ptr = unsafe { alloc::alloc(layout) };
        NonNull::new(ptr).ok_or(AllocError::OutOfMemory { size: layout.size() })
    }

    unsafe fn release(&self, ptr: NonNull<u8>, layout: Layout) {
        if layout.size() != 0 {
            unsafe { alloc::dealloc(ptr.as_ptr(), layout) }
        }
    }
}

pub(crate) fn dangling(layout: Layout) -> NonNull<u8> {
    // Alignment is never zero.
    let ptr = ptr::without_provenance_mut::<u8>(layout.align());
    unsafe { NonNull::new_unchecked(ptr) }
}
