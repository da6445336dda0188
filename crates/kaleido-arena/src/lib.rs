//! Memory for the front end: an [`Allocator`] capability, a bump-allocated
//! [`BumpArena`] carved from one reserved block, and the append-only
//! [`Array`] that stores AST nodes and argument lists.

mod allocator;
mod array;
mod bump;

pub use allocator::{AllocError, Allocator, Heap};
pub use array::Array;
pub use bump::BumpArena;
