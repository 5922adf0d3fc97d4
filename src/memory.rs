//! The allocation guard.
//!
//! [`allocate`] and [`reallocate`] either succeed or end the process: an
//! allocator failure prints a one-line diagnostic to stderr and aborts.
//! Callers never handle an out-of-memory value.
//!
//! The unsafe part, owning a region from the global allocator, lives in
//! [`xutils_internals::RawBlock`]. This module adds the null state and the
//! abort policy on top of it.

use core::mem::MaybeUninit;
use std::io::Write;

use xutils_internals::{AllocFailure, AllocOperation, RawBlock};

use crate::{LIBRARY_TAG, terminate};

/// An owned block of heap memory obtained from [`allocate`].
///
/// A block is either *live*, owning `len()` bytes, or *null* after
/// [`release`]. The memory is returned to the allocator when the block is
/// released or dropped, whichever comes first, so a block can never be freed
/// twice.
///
/// Blocks are aligned to twice the pointer width, which is enough for any
/// primitive type.
///
/// # Examples
///
/// ```
/// use xutils::{allocate, reallocate, release};
///
/// let mut block = allocate(4);
/// block.write_at(0, b"abcd");
///
/// let mut block = reallocate(block, 8);
/// block.write_at(4, b"efgh");
/// // SAFETY: all eight bytes were written above.
/// assert_eq!(unsafe { block.assume_init_ref() }, b"abcdefgh");
///
/// release(&mut block);
/// assert!(block.is_null());
/// ```
#[derive(Debug, Default)]
pub struct Block {
    /// `None` once released
    raw: Option<RawBlock>,
}

impl Block {
    /// A null block, owning nothing.
    #[inline]
    pub const fn null() -> Self {
        Self { raw: None }
    }

    /// Returns `true` if the block has been released.
    #[inline]
    pub const fn is_null(&self) -> bool {
        self.raw.is_none()
    }

    /// The size of the block in bytes, zero for null blocks.
    #[inline]
    pub fn len(&self) -> usize {
        self.raw.as_ref().map_or(0, RawBlock::len)
    }

    /// Returns `true` if the block has no usable bytes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// A pointer to the first byte.
    ///
    /// Null for null blocks. For live blocks of size zero it is non-null but
    /// dangling.
    #[inline]
    pub fn as_ptr(&self) -> *const u8 {
        self.raw
            .as_ref()
            .map_or(core::ptr::null(), RawBlock::as_ptr)
    }

    /// A mutable pointer to the first byte. See [`Block::as_ptr`].
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut u8 {
        self.raw
            .as_mut()
            .map_or(core::ptr::null_mut(), RawBlock::as_mut_ptr)
    }

    /// The block's bytes, which may be uninitialized.
    #[inline]
    pub fn as_uninit_slice(&self) -> &[MaybeUninit<u8>] {
        match &self.raw {
            Some(raw) => raw.as_uninit_slice(),
            None => &[],
        }
    }

    /// The block's bytes, mutably.
    #[inline]
    pub fn as_uninit_slice_mut(&mut self) -> &mut [MaybeUninit<u8>] {
        match &mut self.raw {
            Some(raw) => raw.as_uninit_slice_mut(),
            None => &mut [],
        }
    }

    /// Copies `bytes` into the block starting at `offset`.
    ///
    /// # Panics
    ///
    /// Panics if `offset + bytes.len()` exceeds [`Block::len`].
    #[track_caller]
    pub fn write_at(&mut self, offset: usize, bytes: &[u8]) {
        let len = self.len();
        let target = offset
            .checked_add(bytes.len())
            .and_then(|end| self.as_uninit_slice_mut().get_mut(offset..end));
        let Some(target) = target else {
            panic!(
                "write of {} bytes at offset {offset} is out of range for a block of {len} bytes",
                bytes.len()
            );
        };

        for (slot, &byte) in target.iter_mut().zip(bytes) {
            slot.write(byte);
        }
    }

    /// Sets every byte of the block to `byte`.
    pub fn fill(&mut self, byte: u8) {
        self.as_uninit_slice_mut().fill(MaybeUninit::new(byte));
    }

    /// The block's bytes as initialized data.
    ///
    /// # Safety
    ///
    /// Every byte of the block must have been written, e.g. through
    /// [`Block::fill`] or [`Block::write_at`]. Bytes past the old size after
    /// a growing [`reallocate`] are uninitialized.
    #[inline]
    pub unsafe fn assume_init_ref(&self) -> &[u8] {
        let slice = self.as_uninit_slice();

        // SAFETY: The caller guarantees that all bytes are initialized, and
        // `MaybeUninit<u8>` has the same layout as `u8`.
        unsafe { &*(core::ptr::from_ref(slice) as *const [u8]) }
    }

    /// The block's bytes as initialized, mutable data.
    ///
    /// # Safety
    ///
    /// Same as [`Block::assume_init_ref`].
    #[inline]
    pub unsafe fn assume_init_mut(&mut self) -> &mut [u8] {
        let slice = self.as_uninit_slice_mut();

        // SAFETY: The caller guarantees that all bytes are initialized, and
        // `MaybeUninit<u8>` has the same layout as `u8`.
        unsafe { &mut *(core::ptr::from_mut(slice) as *mut [u8]) }
    }
}

/// Allocates a block of exactly `size` uninitialized bytes.
///
/// A `size` of zero yields a live, empty block without calling the
/// allocator.
///
/// If the allocator cannot satisfy the request, prints
/// ` ** xutils: FATAL: memory allocation failed!` with the requested size to
/// stderr and aborts the process.
pub fn allocate(size: usize) -> Block {
    match RawBlock::allocate(size) {
        Ok(raw) => {
            tracing::trace!(size, ptr = ?raw.as_non_null(), "allocated block");
            Block { raw: Some(raw) }
        }
        Err(failure) => out_of_memory(failure),
    }
}

/// Resizes `block` to exactly `new_size` bytes, possibly moving it.
///
/// The first `min(old size, new_size)` bytes are preserved. A null block is
/// treated like a block of size zero, so this allocates afresh.
///
/// Only an allocator failure counts as failure; getting the same address
/// back is a successful in-place resize. On failure, prints
/// ` ** xutils: FATAL: memory reallocation failed!` with the requested size
/// to stderr and aborts the process.
pub fn reallocate(block: Block, new_size: usize) -> Block {
    let mut raw = block.raw.unwrap_or_else(RawBlock::empty);
    let old_size = raw.len();

    match raw.resize(new_size) {
        Ok(()) => {
            tracing::trace!(old_size, new_size, ptr = ?raw.as_non_null(), "resized block");
            Block { raw: Some(raw) }
        }
        Err(failure) => out_of_memory(failure),
    }
}

/// Frees the block and sets it to null.
///
/// Releasing a null block does nothing, so calling this twice is harmless.
pub fn release(block: &mut Block) {
    if let Some(raw) = block.raw.take() {
        tracing::trace!(size = raw.len(), ptr = ?raw.as_non_null(), "released block");
        drop(raw);
    }
}

/// Prints the allocation failure diagnostic and aborts.
#[cold]
#[inline(never)]
fn out_of_memory(failure: AllocFailure) -> ! {
    let operation = match failure.operation() {
        AllocOperation::Allocate => "allocation",
        AllocOperation::Reallocate => "reallocation",
    };

    // Stderr is unbuffered, so this does not allocate. No tracing event here:
    // a subscriber may allocate.
    let _ = writeln!(
        std::io::stderr().lock(),
        "{LIBRARY_TAG} FATAL: memory {operation} failed! ({} bytes requested)",
        failure.size()
    );

    terminate::abort()
}
