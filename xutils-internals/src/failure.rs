//! Descriptions of allocator failures.
//!
//! An [`AllocFailure`] is returned by the fallible operations on
//! [`RawBlock`](crate::RawBlock). It is plain data: it carries enough
//! information to print a useful diagnostic, but it owns no memory.

use core::fmt;

/// The operation that was being performed when the allocator failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocOperation {
    /// A fresh allocation.
    Allocate,
    /// A resize of an existing block.
    Reallocate,
}

/// Why an allocation request could not be satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    /// The requested size cannot be described by a valid
    /// [`Layout`](core::alloc::Layout), i.e. it exceeds `isize::MAX` once
    /// rounded up to the block alignment.
    CapacityOverflow,
    /// The global allocator returned a null pointer.
    OutOfMemory,
}

/// Error returned when the global allocator cannot satisfy a request.
///
/// For resizes the block that was being resized is left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocFailure {
    /// The failed operation
    operation: AllocOperation,
    /// The number of bytes that were requested
    size: usize,
    /// The cause of the failure
    reason: FailureReason,
}

impl AllocFailure {
    /// Creates a new [`AllocFailure`].
    #[inline]
    pub const fn new(operation: AllocOperation, size: usize, reason: FailureReason) -> Self {
        Self {
            operation,
            size,
            reason,
        }
    }

    /// The operation that failed.
    #[inline]
    pub const fn operation(&self) -> AllocOperation {
        self.operation
    }

    /// The number of bytes that were requested.
    #[inline]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Why the request failed.
    #[inline]
    pub const fn reason(&self) -> FailureReason {
        self.reason
    }
}

impl fmt::Display for AllocFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let operation = match self.operation {
            AllocOperation::Allocate => "allocation",
            AllocOperation::Reallocate => "reallocation",
        };
        match self.reason {
            FailureReason::CapacityOverflow => write!(
                f,
                "memory {operation} of {} bytes exceeds the maximum block size",
                self.size
            ),
            FailureReason::OutOfMemory => {
                write!(f, "memory {operation} of {} bytes failed", self.size)
            }
        }
    }
}

impl core::error::Error for AllocFailure {}
