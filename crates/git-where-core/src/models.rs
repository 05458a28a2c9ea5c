//! Plain data types shared by the library and the CLI.
//!
//! All types in this module are JSON-serializable.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Controls which sources the Git discovery sweep consults.
///
/// # Example
///
/// ```
/// # use git_where_core::DiscoveryConfig;
/// # use std::path::PathBuf;
/// let config = DiscoveryConfig {
///     use_search_path: false,
///     extra_roots: vec![PathBuf::from("/opt/git-2.45")],
///     ..DiscoveryConfig::default()
/// };
/// assert!(config.use_well_known_roots);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Look up `git` on `PATH` and classify the installation it belongs to.
    pub use_search_path: bool,

    /// Check the platform's default install locations
    /// (`%ProgramFiles%\Git`, `/usr`, ...).
    pub use_well_known_roots: bool,

    /// Honour the `GIT_INSTALL_ROOT` environment variable.
    pub use_environment_hints: bool,

    /// Additional roots to check, after everything else.
    ///
    /// Each may be an installation root or the path of its Git binary.
    pub extra_roots: Vec<PathBuf>,
}

impl Default for DiscoveryConfig {
    /// Every source enabled, no extra roots.
    fn default() -> Self {
        Self {
            use_search_path: true,
            use_well_known_roots: true,
            use_environment_hints: true,
            extra_roots: Vec::new(),
        }
    }
}

/// Result of looking up one executable name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LocatedApp {
    /// The name that was searched for.
    pub name: String,

    /// Where it was found; `None` if it is not on `PATH`.
    pub path: Option<PathBuf>,
}
