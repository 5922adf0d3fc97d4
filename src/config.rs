//! Reporter configuration.
//!
//! A [`ReporterConfig`] is an immutable value holding everything about the
//! console protocol that is not fixed by the severity: the tag printed at the
//! start of each header and the exit status used when the user declines a
//! confirmation.
//!
//! # Global Configuration
//!
//! The reporting macros read the globally installed configuration through
//! [`ReporterConfig::current`]. Until one is installed they use
//! [`ReporterConfig::DEFAULT`].
//!
//! ```rust
//! use xutils::ReporterConfig;
//!
//! ReporterConfig::builder()
//!     .tag(" ** backup-tool:")
//!     .declined_exit_code(3)
//!     .build()
//!     .install()
//!     .expect("failed to install reporter configuration");
//!
//! assert_eq!(ReporterConfig::current().tag(), " ** backup-tool:");
//! ```
//!
//! # Memory Management
//!
//! Installed configurations are leaked and remain for the lifetime of the
//! program, even after being replaced. This keeps every `&'static` reference
//! handed out by [`ReporterConfig::current`] valid.

use std::{
    borrow::Cow,
    ptr::NonNull,
    sync::atomic::{AtomicPtr, Ordering},
};

use crate::LIBRARY_TAG;

/// The exit status used when the user declines a confirmation, unless
/// configured otherwise.
pub const DEFAULT_DECLINED_EXIT_CODE: i32 = 255;

/// Immutable configuration of the console protocol.
///
/// Build one with [`ReporterConfig::builder`], then either pass it to a
/// [`Reporter`](crate::Reporter) or install it globally for the macros.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReporterConfig {
    /// Text printed before ` In <function>` in every header.
    tag: Cow<'static, str>,
    /// Exit status of a declined confirmation.
    declined_exit_code: i32,
}

/// Error returned when attempting to install a configuration when one is
/// already installed.
///
/// Contains the configuration that was attempted to be installed.
#[derive(Debug, thiserror::Error)]
#[error("a reporter configuration is already installed globally")]
pub struct ConfigAlreadyInstalledError(pub ReporterConfig);

impl ReporterConfig {
    /// The built-in configuration: tag ` ** xutils:` and exit code 255.
    pub const DEFAULT: ReporterConfig = ReporterConfig {
        tag: Cow::Borrowed(LIBRARY_TAG),
        declined_exit_code: DEFAULT_DECLINED_EXIT_CODE,
    };

    /// Starts building a configuration from [`ReporterConfig::DEFAULT`].
    pub fn builder() -> ReporterConfigBuilder {
        ReporterConfigBuilder {
            config: Self::DEFAULT,
        }
    }

    /// The header tag.
    #[inline]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// The exit status of a declined confirmation.
    #[inline]
    pub const fn declined_exit_code(&self) -> i32 {
        self.declined_exit_code
    }

    /// Returns the globally installed configuration, or
    /// [`ReporterConfig::DEFAULT`] if none is installed.
    pub fn current() -> &'static ReporterConfig {
        static DEFAULT: ReporterConfig = ReporterConfig::DEFAULT;

        match CONFIG.fetch() {
            // SAFETY: Pointers stored in `CONFIG` come from `Box::into_raw`
            // and are never freed, so they are valid for `'static`.
            Some(ptr) => unsafe { ptr.as_ref() },
            None => &DEFAULT,
        }
    }

    /// Installs the configuration globally.
    ///
    /// # Errors
    ///
    /// If a configuration is already installed, returns a
    /// [`ConfigAlreadyInstalledError`] containing `self`.
    ///
    /// See also [`replace`](Self::replace), which replaces any existing
    /// configuration without erroring.
    pub fn install(self) -> Result<(), ConfigAlreadyInstalledError> {
        let boxed = Box::into_raw(Box::new(self));

        if CONFIG.install(boxed) {
            tracing::debug!("installed reporter configuration");
            return Ok(());
        }

        // SAFETY: Installation failed, so the pointer obtained from
        // `Box::into_raw` above is still exclusively ours.
        let config = unsafe { Box::from_raw(boxed) };
        Err(ConfigAlreadyInstalledError(*config))
    }

    /// Installs the configuration globally, replacing any existing one.
    ///
    /// Returns the previously installed configuration, if any. It stays
    /// valid forever, since installed configurations are leaked.
    pub fn replace(self) -> Option<&'static ReporterConfig> {
        let new = NonNull::from(Box::leak(Box::new(self)));
        let previous = CONFIG.replace(new)?;
        tracing::debug!("replaced reporter configuration");

        // SAFETY: `previous` was installed from a leaked `Box` and is never
        // freed.
        Some(unsafe { previous.as_ref() })
    }
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Builder for [`ReporterConfig`].
#[derive(Debug, Clone)]
pub struct ReporterConfigBuilder {
    /// The configuration being built
    config: ReporterConfig,
}

impl ReporterConfigBuilder {
    /// Sets the header tag.
    ///
    /// The tag is printed verbatim, followed by ` In <function>`.
    pub fn tag(mut self, tag: impl Into<Cow<'static, str>>) -> Self {
        self.config.tag = tag.into();
        self
    }

    /// Sets the exit status used when the user declines a confirmation.
    pub fn declined_exit_code(mut self, code: i32) -> Self {
        self.config.declined_exit_code = code;
        self
    }

    /// Finishes the configuration.
    pub fn build(self) -> ReporterConfig {
        self.config
    }
}

/// The global configuration slot.
struct GlobalConfig {
    /// # Safety
    ///
    /// 1. This pointer is either null, or points to a valid `ReporterConfig`
    ///    created using `Box::into_raw` (or `Box::leak`).
    /// 2. Once stored, a pointer is never freed, so it remains valid for the
    ///    lifetime of the program even after being replaced.
    /// 3. All writes use release semantics and all reads use acquire
    ///    semantics.
    ptr: AtomicPtr<ReporterConfig>,
}

impl GlobalConfig {
    /// Creates an empty slot.
    const fn new() -> Self {
        Self {
            ptr: AtomicPtr::new(std::ptr::null_mut()),
        }
    }

    /// Fetches the installed configuration, if any.
    fn fetch(&self) -> Option<NonNull<ReporterConfig>> {
        NonNull::new(self.ptr.load(Ordering::Acquire))
    }

    /// Stores `new` if the slot is empty. Returns `false` if it was not, in
    /// which case ownership of `new` stays with the caller.
    fn install(&self, new: *mut ReporterConfig) -> bool {
        self.ptr
            .compare_exchange(
                std::ptr::null_mut(),
                new,
                Ordering::Release,
                Ordering::Relaxed,
            )
            .is_ok()
    }

    /// Stores `new` unconditionally, returning the previous pointer.
    fn replace(&self, new: NonNull<ReporterConfig>) -> Option<NonNull<ReporterConfig>> {
        NonNull::new(self.ptr.swap(new.as_ptr(), Ordering::AcqRel))
    }
}

/// The installed configuration.
static CONFIG: GlobalConfig = GlobalConfig::new();

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let config = ReporterConfig::default();
        assert_eq!(config.tag(), " ** xutils:");
        assert_eq!(config.declined_exit_code(), 255);
        assert_eq!(config, ReporterConfig::DEFAULT);
    }

    #[test]
    fn test_builder() {
        let config = ReporterConfig::builder()
            .tag(String::from(" ** tool:"))
            .declined_exit_code(9)
            .build();
        assert_eq!(config.tag(), " ** tool:");
        assert_eq!(config.declined_exit_code(), 9);

        let only_tag = ReporterConfig::builder().tag("[x]").build();
        assert_eq!(only_tag.declined_exit_code(), DEFAULT_DECLINED_EXIT_CODE);
    }

    #[test]
    fn test_error_message() {
        let error = ConfigAlreadyInstalledError(ReporterConfig::DEFAULT);
        assert_eq!(
            error.to_string(),
            "a reporter configuration is already installed globally"
        );
    }

    #[test]
    fn test_send_sync() {
        static_assertions::assert_impl_all!(ReporterConfig: Send, Sync, Clone);
        static_assertions::assert_impl_all!(ConfigAlreadyInstalledError: std::error::Error);
    }
}
