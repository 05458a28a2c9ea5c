//! # git-where-core
//!
//! A library for locating executables on `PATH` and describing the Git
//! installations present on a machine.
//!
//! ## Features
//!
//! - **`which`-style lookup** honouring `PATH` order and, on Windows, `PATHEXT`
//! - **Installation descriptions** for Git for Windows (1.x, 2.x 32/64-bit)
//!   and Unix prefixes, with every well-known sub-path derived from the root
//! - **Validation** of an installation's minimum structure before it is trusted
//! - **Discovery sweep** over `PATH`, default install locations and hints
//! - **Injectable execution context** so all of the above can run against an
//!   in-memory filesystem
//!
//! ## Quick Start
//!
//! ```no_run
//! use git_where_core::Where;
//!
//! let finder = Where::system();
//!
//! if let Some(git) = finder.find_app("git")? {
//!     println!("git on PATH: {}", git.display());
//! }
//!
//! for install in finder.find_git_installations()? {
//!     println!("{} [{}]", install.path().display(), install.distribution());
//! }
//! # Ok::<(), git_where_core::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`context`] - The filesystem/environment seam and its implementations
//! - [`locator`] - `PATH` lookup ([`Where::find_app`])
//! - [`distribution`] - Known layouts and their path table
//! - [`installation`] - Installation descriptions, normalization, validation
//! - [`discovery`] - The discovery sweep
//! - [`models`] - Serializable configuration and result types
//! - [`paths`] - Platform-aware path helpers
//! - [`error`] - Custom error types
//! - [`l10n`] - Localization utilities
//!
//! ## CLI Binary
//!
//! This crate also provides a `git-where` binary for command-line usage.
//! See the binary's `--help` output for details.

// Module declarations
pub mod context;
pub mod discovery;
pub mod distribution;
pub mod error;
pub mod installation;
pub mod l10n;
pub mod locator;
pub mod models;
pub mod paths;

// Re-export commonly used types for convenience
pub use context::{Platform, RuntimeContext};
pub use distribution::{Distribution, DistributionPaths, PathTable};
pub use error::{Error, Result};
pub use installation::Installation;
pub use locator::Where;
pub use models::{DiscoveryConfig, LocatedApp};
pub use paths::{normalize, normalize_for};

/// Library version, derived from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
        assert_eq!(NAME, "git-where-core");
    }
}
