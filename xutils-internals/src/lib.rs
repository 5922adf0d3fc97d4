#![no_std]
#![forbid(
    missing_docs,
    clippy::alloc_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::std_instead_of_core,
    clippy::missing_safety_doc,
    clippy::missing_docs_in_private_items,
    clippy::undocumented_unsafe_blocks,
    clippy::multiple_unsafe_ops_per_block,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::broken_intra_doc_links,
    missing_copy_implementations,
    unused_doc_comments
)]
#![allow(rustdoc::private_intra_doc_links)]
//! Internal implementation crate for [`xutils`].
//!
//! # Overview
//!
//! This crate contains the low-level heap block type and the unsafe
//! operations that power the allocation guard of the [`xutils`] crate. It is
//! the only place in the workspace that talks to the global allocator
//! directly.
//!
//! **This crate is an implementation detail.** No semantic versioning guarantees
//! are provided. Users should depend on the [`xutils`] crate, not this one.
//!
//! # Architecture
//!
//! - **[`block`]**: Owned, untyped heap regions
//!   - [`RawBlock`]: Owned region of `len` bytes allocated with [`BLOCK_ALIGN`]
//!     alignment
//!   - [`BLOCK_ALIGN`]: The alignment every block is allocated with
//!
//! - **[`failure`]**: Recoverable description of an allocator failure
//!   - [`AllocFailure`]: Which operation failed, for how many bytes, and why
//!
//! Nothing in this crate terminates the process. Turning an [`AllocFailure`]
//! into an abort is the job of the [`xutils`] crate.
//!
//! # Safety Strategy
//!
//! - **Module-based encapsulation**: the pointer and length of a [`RawBlock`]
//!   are private to a single file, so the invariant "the pointer was produced
//!   by the global allocator for exactly this layout, or is dangling when the
//!   length is zero" is verifiable locally.
//! - **One layout function**: every allocation, reallocation and
//!   deallocation derives its [`Layout`] from the same helper, so the layout
//!   passed to `dealloc` always matches the one used to allocate.
//!
//! [`xutils`]: https://docs.rs/xutils/latest/xutils/
//! [`Layout`]: core::alloc::Layout

extern crate alloc;

pub mod block;
pub mod failure;

pub use block::{BLOCK_ALIGN, RawBlock};
pub use failure::{AllocFailure, AllocOperation, FailureReason};
