//! Owned heap block pointer type.
//!
//! This module encapsulates the `ptr` and `len` fields of [`RawBlock`],
//! ensuring they are only visible within this module. This visibility
//! restriction guarantees the safety invariant: **a non-empty block's pointer
//! always comes from the global allocator, with the layout computed by
//! [`block_layout`] for its current length**.
//!
//! # Safety Invariant
//!
//! The fields can only be set by [`RawBlock::allocate`], [`RawBlock::empty`]
//! and [`RawBlock::resize`]. Each of them either stores a pointer freshly
//! returned by `alloc`/`realloc` together with the length it was requested
//! for, or stores a dangling pointer together with a length of zero.
//!
//! The [`RawBlock::drop`] implementation relies on this invariant to
//! reconstruct the layout and hand the memory back to the allocator.
//!
//! # Empty Blocks
//!
//! Zero-sized requests never reach the allocator (doing so would be undefined
//! behavior). They produce a block with a non-null, [`BLOCK_ALIGN`]-aligned
//! dangling pointer and a length of zero, mirroring how `Vec` treats empty
//! buffers.

use core::{alloc::Layout, mem::MaybeUninit, ptr::NonNull};

use crate::{
    block::layout::{BLOCK_ALIGN, block_layout},
    failure::{AllocFailure, AllocOperation, FailureReason},
};

/// An owned, untyped region of heap memory.
///
/// The region is `len` bytes long, aligned to [`BLOCK_ALIGN`], and its
/// contents start out uninitialized. Dropping the block returns the memory
/// to the global allocator.
///
/// This is the moral equivalent of a `Box<[MaybeUninit<u8>]>` whose length
/// can be changed in place with [`RawBlock::resize`].
pub struct RawBlock {
    /// Pointer to the first byte of the region
    ///
    /// # Safety
    ///
    /// The following safety invariants are guaranteed to be upheld as long as
    /// this struct exists:
    ///
    /// 1. If `len == 0`, the pointer is the dangling pointer returned by
    ///    [`dangling`] and does not belong to any allocation.
    /// 2. If `len > 0`, the pointer was returned by
    ///    [`alloc::alloc::alloc`] or [`alloc::alloc::realloc`] for the layout
    ///    `block_layout(len)`, and has not been deallocated.
    /// 3. The pointer is valid for reads and writes of `len` bytes for the
    ///    entire lifetime of this object, except during the execution of the
    ///    `Drop` implementation.
    ptr: NonNull<u8>,
    /// Length of the region in bytes
    ///
    /// # Safety
    ///
    /// `block_layout(len)` succeeds, i.e. `len` rounded up to
    /// [`BLOCK_ALIGN`] does not exceed `isize::MAX`.
    len: usize,
}

// SAFETY: A `RawBlock` uniquely owns its region, exactly like a
// `Box<[MaybeUninit<u8>]>`, so moving it to another thread is sound.
unsafe impl Send for RawBlock {}

// SAFETY: Shared access to a `RawBlock` only hands out shared slices of
// `MaybeUninit<u8>`, which are safe to read from several threads.
unsafe impl Sync for RawBlock {}

/// Returns the non-null, [`BLOCK_ALIGN`]-aligned pointer used by empty blocks.
#[inline]
const fn dangling() -> NonNull<u8> {
    let ptr: *mut u8 = core::ptr::without_provenance_mut(BLOCK_ALIGN);

    // SAFETY: `BLOCK_ALIGN` is a non-zero power of two, so the pointer is
    // non-null.
    unsafe { NonNull::new_unchecked(ptr) }
}

impl RawBlock {
    /// Creates a block of length zero without touching the allocator.
    #[inline]
    pub const fn empty() -> Self {
        Self {
            // SAFETY:
            // 1. The length is zero and the pointer comes from `dangling`.
            // 2. Not applicable, the length is zero.
            // 3. A dangling pointer is valid for zero-sized reads and writes.
            ptr: dangling(),
            len: 0,
        }
    }

    /// Allocates a block of exactly `len` uninitialized bytes.
    ///
    /// A `len` of zero produces an [empty](Self::empty) block.
    ///
    /// # Errors
    ///
    /// Returns an [`AllocFailure`] with [`AllocOperation::Allocate`] if `len`
    /// is too large to describe as a layout or if the global allocator
    /// returns a null pointer.
    #[inline]
    pub fn allocate(len: usize) -> Result<Self, AllocFailure> {
        let ptr = allocate_region(len, AllocOperation::Allocate)?;
        Ok(Self {
            // SAFETY:
            // 1./2. `allocate_region` returns the dangling pointer for a zero
            //       length and a fresh allocation for `block_layout(len)`
            //       otherwise.
            // 3. A fresh allocation of `len` bytes is valid for `len` bytes.
            ptr,
            len,
        })
    }

    /// Changes the length of the block to `new_len` bytes.
    ///
    /// The first `min(self.len(), new_len)` bytes keep their contents; any
    /// bytes past the old length are uninitialized. The block may move to a
    /// new address, in which case the old region has already been released
    /// by the allocator when this returns.
    ///
    /// Resizing to zero releases the region and leaves an empty block;
    /// resizing an empty block performs a fresh allocation.
    ///
    /// # Errors
    ///
    /// Returns an [`AllocFailure`] with [`AllocOperation::Reallocate`] if
    /// `new_len` is too large to describe as a layout or if the allocator
    /// returns a null pointer. On error the block is left exactly as it was.
    pub fn resize(&mut self, new_len: usize) -> Result<(), AllocFailure> {
        if new_len == self.len {
            return Ok(());
        }

        let Some(old_layout) = self.layout() else {
            self.ptr = allocate_region(new_len, AllocOperation::Reallocate)?;
            // SAFETY: The pointer was just returned by `allocate_region` for
            // `new_len` bytes, upholding the invariants of both fields.
            self.len = new_len;
            return Ok(());
        };

        if new_len == 0 {
            // SAFETY:
            // 1. The pointer was allocated by the global allocator with
            //    `old_layout`, guaranteed by invariant 2 of `ptr`.
            // 2. The pointer is replaced right below, so it is never used
            //    again.
            unsafe { alloc::alloc::dealloc(self.ptr.as_ptr(), old_layout) };
            // SAFETY: The length becomes zero together with the pointer
            // becoming dangling, upholding invariant 1 of `ptr`.
            self.ptr = dangling();
            self.len = 0;
            return Ok(());
        }

        block_layout(new_len, AllocOperation::Reallocate)?;

        // SAFETY:
        // 1. The pointer was allocated by the global allocator with
        //    `old_layout`, guaranteed by invariant 2 of `ptr`.
        // 2. `new_len` is non-zero.
        // 3. `new_len` rounded up to `BLOCK_ALIGN` does not overflow `isize`,
        //    as checked by `block_layout` above.
        let new_ptr = unsafe { alloc::alloc::realloc(self.ptr.as_ptr(), old_layout, new_len) };

        // A null return means the original block is untouched and still
        // owned by us. Only null signals failure: an unchanged address is a
        // perfectly valid in-place resize.
        let new_ptr = NonNull::new(new_ptr).ok_or(AllocFailure::new(
            AllocOperation::Reallocate,
            new_len,
            FailureReason::OutOfMemory,
        ))?;

        self.ptr = new_ptr;
        // SAFETY: `realloc` returned a pointer valid for `new_len` bytes with
        // layout `block_layout(new_len)`.
        self.len = new_len;
        Ok(())
    }

    /// The length of the block in bytes.
    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the block has a length of zero.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the pointer to the start of the block.
    ///
    /// The pointer is never null. For empty blocks it is dangling.
    #[inline]
    pub const fn as_non_null(&self) -> NonNull<u8> {
        self.ptr
    }

    /// Returns a raw pointer to the start of the block.
    #[inline]
    pub const fn as_ptr(&self) -> *const u8 {
        self.ptr.as_ptr().cast_const()
    }

    /// Returns a raw mutable pointer to the start of the block.
    #[inline]
    pub const fn as_mut_ptr(&mut self) -> *mut u8 {
        self.ptr.as_ptr()
    }

    /// Views the block as a slice of possibly uninitialized bytes.
    #[inline]
    pub const fn as_uninit_slice(&self) -> &[MaybeUninit<u8>] {
        let ptr = self.ptr.as_ptr().cast_const().cast::<MaybeUninit<u8>>();

        // SAFETY:
        // 1. The pointer is valid for reads of `len` bytes, guaranteed by
        //    invariant 3 of `ptr`, and `MaybeUninit<u8>` has alignment 1.
        // 2. `MaybeUninit<u8>` imposes no initialization requirement.
        // 3. `len` does not exceed `isize::MAX`, guaranteed by the invariant
        //    of `len`.
        // 4. The slice borrows `self` immutably, so no mutable access can
        //    happen while it is alive.
        unsafe { core::slice::from_raw_parts(ptr, self.len) }
    }

    /// Views the block as a mutable slice of possibly uninitialized bytes.
    #[inline]
    pub const fn as_uninit_slice_mut(&mut self) -> &mut [MaybeUninit<u8>] {
        let ptr = self.ptr.as_ptr().cast::<MaybeUninit<u8>>();

        // SAFETY:
        // 1. The pointer is valid for reads and writes of `len` bytes,
        //    guaranteed by invariant 3 of `ptr`, and `MaybeUninit<u8>` has
        //    alignment 1.
        // 2. `MaybeUninit<u8>` imposes no initialization requirement.
        // 3. `len` does not exceed `isize::MAX`, guaranteed by the invariant
        //    of `len`.
        // 4. The slice borrows `self` mutably, so it is the only access path
        //    to the region while it is alive.
        unsafe { core::slice::from_raw_parts_mut(ptr, self.len) }
    }

    /// The layout the block was allocated with, or `None` for empty blocks.
    #[inline]
    fn layout(&self) -> Option<Layout> {
        if self.len == 0 {
            return None;
        }

        // SAFETY: `block_layout(len)` is guaranteed to succeed by the
        // invariant of `len`, which is exactly the precondition of
        // `from_size_align_unchecked` with `BLOCK_ALIGN`.
        Some(unsafe { Layout::from_size_align_unchecked(self.len, BLOCK_ALIGN) })
    }
}

impl core::ops::Drop for RawBlock {
    #[inline]
    fn drop(&mut self) {
        if let Some(layout) = self.layout() {
            // SAFETY:
            // 1. The pointer was allocated by the global allocator with
            //    `layout`, guaranteed by invariant 2 of `ptr`.
            // 2. The pointer is not used after this call (we're in the drop
            //    function).
            unsafe { alloc::alloc::dealloc(self.ptr.as_ptr(), layout) };
        }
    }
}

impl core::fmt::Debug for RawBlock {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RawBlock")
            .field("ptr", &self.ptr)
            .field("len", &self.len)
            .finish()
    }
}

/// Obtains a region of `len` bytes from the global allocator.
///
/// Returns the dangling pointer for a zero length.
#[inline]
fn allocate_region(len: usize, operation: AllocOperation) -> Result<NonNull<u8>, AllocFailure> {
    if len == 0 {
        return Ok(dangling());
    }

    let layout = block_layout(len, operation)?;

    // SAFETY: `layout` has a non-zero size, since `len` is non-zero.
    let ptr = unsafe { alloc::alloc::alloc(layout) };

    NonNull::new(ptr).ok_or(AllocFailure::new(
        operation,
        len,
        FailureReason::OutOfMemory,
    ))
}
