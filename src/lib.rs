#![deny(
    missing_docs,
    clippy::missing_safety_doc,
    clippy::undocumented_unsafe_blocks,
    clippy::multiple_unsafe_ops_per_block,
    clippy::as_ptr_cast_mut,
    clippy::ptr_as_ptr,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::broken_intra_doc_links,
    missing_copy_implementations,
    unused_doc_comments
)]
// Make docs.rs generate better docs
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Abort-on-OOM allocation and leveled, location-annotated console reporting.
//!
//! ## Overview
//!
//! This crate is a small runtime-support dependency for programs that treat
//! resource exhaustion and fatal errors as unrecoverable. It has two
//! independent halves:
//!
//! - The **allocation guard** ([`allocate`], [`reallocate`], [`release`])
//!   hands out owned heap [`Block`]s and terminates the process if the
//!   allocator cannot satisfy a request. Callers never see a failure value.
//! - The **leveled reporter** ([`info!`], [`warn!`], [`warn_ack!`],
//!   [`error!`]) prints a message tagged with its severity and the file,
//!   function and line it was issued from. One severity blocks on a yes/no
//!   confirmation; another aborts the process.
//!
//! ## Quick Example
//!
//! ```no_run
//! use xutils::prelude::*;
//!
//! fn load(path: &str) {
//!     info!("loading {path}");
//!
//!     let mut buffer = allocate(4096);
//!     buffer.fill(0);
//!
//!     if path.ends_with(".bak") {
//!         // Blocks until the user answers; exits with status 255 on "no".
//!         warn_ack!("{path} looks like a backup file");
//!     }
//!
//!     release(&mut buffer);
//!     assert!(buffer.is_null());
//! }
//! ```
//!
//! which prints
//!
//! ```text
//!  ** xutils: In load (src/main.rs:4) INFO: loading data.bak
//!  ** xutils: In load (src/main.rs:10) WARN: data.bak looks like a backup file
//!  -> Continue? [y/N]
//! ```
//!
//! ## Severities
//!
//! | Macro | [`Severity`] | Stream | After printing |
//! |-------|--------------|--------|----------------|
//! | [`info!`] | [`Info`](Severity::Info) | stdout | returns |
//! | [`warn!`], [`warning!`], [`warn_noack!`] | [`WarnNoAck`](Severity::WarnNoAck) | stdout | returns |
//! | [`warn_ack!`] | [`WarnAck`](Severity::WarnAck) | stdout | asks `[y/N]`; exits on no |
//! | [`error!`] | [`Error`](Severity::Error) | stderr | aborts |
//!
//! ## Testing Code That Reports
//!
//! The macros always talk to the real console. For tests, build a
//! [`Reporter`] over a [`MemoryConsole`] instead: it renders exactly the same
//! text, reads confirmation answers from a byte buffer, and returns an
//! [`Outcome`] rather than terminating the process.
//!
//! ```
//! use xutils::{CallSite, MemoryConsole, Outcome, Reporter, ReporterConfig, Severity};
//!
//! let config = ReporterConfig::default();
//! let mut reporter = Reporter::new(&config, MemoryConsole::with_input("x\ny\n"));
//! let site = CallSite::new("a.rs", "main", 42);
//!
//! let outcome = reporter.report(Severity::WarnAck, &site, format_args!("low disk"));
//! assert_eq!(outcome, Outcome::Continue);
//! assert!(reporter.console().stdout_text().contains("Please answer [y]es or [N]o."));
//! ```
//!
//! ## Configuration
//!
//! The header tag and the exit status used when a confirmation is declined
//! live in a [`ReporterConfig`]. The macros use the globally installed
//! configuration, see [`ReporterConfig::install`].
//!
//! ## Threads
//!
//! Nothing here synchronizes console access. Hosts that report from several
//! threads must serialize calls themselves.
//!
//! For the unsafe building blocks of the allocation guard, see the
//! [`xutils-internals`] crate.
//!
//! [`xutils-internals`]: xutils_internals

#[macro_use]
mod macros;

mod config;
mod confirm;
mod console;
mod location;
mod memory;
pub mod prelude;
mod reporter;
mod severity;
mod terminate;

pub use self::{
    config::{
        ConfigAlreadyInstalledError, DEFAULT_DECLINED_EXIT_CODE, ReporterConfig,
        ReporterConfigBuilder,
    },
    confirm::{Answer, ConfirmAction, ConfirmState, Confirmation},
    console::{Console, MemoryConsole, StdConsole},
    location::{CallSite, UNKNOWN_FUNCTION},
    memory::{Block, allocate, reallocate, release},
    reporter::{Outcome, Reporter, report},
    severity::{Severity, Stream},
};

/// The tag printed at the start of every line this crate writes, unless a
/// [`ReporterConfig`] overrides it for reports.
pub const LIBRARY_TAG: &str = " ** xutils:";

// Not public API. Referenced by macro-generated code.
#[doc(hidden)]
pub mod __private {
    #[doc(hidden)]
    pub use core::format_args;

    #[doc(hidden)]
    pub use crate::{
        location::{function_name, type_name_of},
        reporter::{fail, output},
    };
}
