//! Commonly used items for convenient importing.
//!
//! The prelude re-exports the reporting macros and the allocation guard, so a
//! program can pull in everything it usually needs with one `use` statement.
//!
//! # Usage
//!
//! ```rust
//! use xutils::prelude::*;
//!
//! fn checksum(data: &[u8]) -> u8 {
//!     let mut scratch = allocate(data.len());
//!     scratch.write_at(0, data);
//!     // SAFETY: every byte was written above.
//!     let sum = unsafe { scratch.assume_init_ref() }
//!         .iter()
//!         .fold(0u8, |acc, &byte| acc.wrapping_add(byte));
//!     release(&mut scratch);
//!
//!     info!("checksum of {} bytes is {sum}", data.len());
//!     sum
//! }
//!
//! assert_eq!(checksum(&[1, 2, 3]), 6);
//! ```
//!
//! # What's Included
//!
//! - **[`info!`]**, **[`warn!`]**, **[`warning!`]**, **[`warn_noack!`]**,
//!   **[`warn_ack!`]**, **[`error!`]** and **[`output!`]**: the reporting
//!   macros
//! - **[`Severity`]**: for use with [`output!`]
//! - **[`allocate`]**, **[`reallocate`]**, **[`release`]** and **[`Block`]**:
//!   the allocation guard

pub use crate::{
    Block, Severity, allocate, error, info, output, reallocate, release, warn, warn_ack,
    warn_noack, warning,
};
