//! The single source of truth for block layouts.
//!
//! Allocation, reallocation and deallocation must all agree on the layout of
//! a block. Funnelling every layout computation through [`block_layout`]
//! guarantees that they do.

use core::alloc::Layout;

use crate::failure::{AllocFailure, AllocOperation, FailureReason};

/// The alignment of every non-empty [`RawBlock`](crate::RawBlock).
///
/// Two machine words, which matches the minimum alignment a C `malloc`
/// guarantees on mainstream 32-bit and 64-bit targets.
pub const BLOCK_ALIGN: usize = 2 * core::mem::size_of::<usize>();

/// Computes the layout of a block of `size` bytes.
///
/// Fails with [`FailureReason::CapacityOverflow`] when `size` rounded up to
/// [`BLOCK_ALIGN`] does not fit in an `isize`.
#[inline]
pub(super) fn block_layout(
    size: usize,
    operation: AllocOperation,
) -> Result<Layout, AllocFailure> {
    Layout::from_size_align(size, BLOCK_ALIGN)
        .map_err(|_| AllocFailure::new(operation, size, FailureReason::CapacityOverflow))
}
