//! Discovery of Git installations.
//!
//! The sweep gathers candidate roots from several sources, pairs each with
//! the distributions of the context's platform, and keeps the ones that
//! validate. Sources, in priority order:
//!
//! 1. the `git` found on `PATH` (first distribution that validates wins),
//! 2. the platform's default install locations,
//! 3. the `GIT_INSTALL_ROOT` environment variable,
//! 4. caller-supplied extra roots.
//!
//! Results keep first-discovery order and contain no two equal
//! installations.

use crate::context::Platform;
use crate::distribution::Distribution;
use crate::error::Result;
use crate::installation::Installation;
use crate::locator::Where;
use crate::models::DiscoveryConfig;
use crate::paths::{self, normalize_for};
use std::path::Path;
use tracing::debug;

/// Environment variable naming an extra installation root to check.
pub const GIT_INSTALL_ROOT_VAR: &str = "GIT_INSTALL_ROOT";

const WINDOWS_64: &[Distribution] = &[Distribution::GitForWindows64v2];
const WINDOWS_32: &[Distribution] = &[
    Distribution::GitForWindows32v2,
    Distribution::GitForWindows32v1,
];

/// Windows default locations: environment variable, path below it, and the
/// layouts that can live there.
const WINDOWS_DEFAULT_ROOTS: &[(&str, &str, Option<&[Distribution]>)] = &[
    ("ProgramW6432", "Git", Some(WINDOWS_64)),
    ("ProgramFiles(x86)", "Git", Some(WINDOWS_32)),
    ("ProgramFiles", "Git", None),
    ("LOCALAPPDATA", "Programs/Git", None),
];

/// Unix prefixes Git is commonly installed under.
const UNIX_DEFAULT_ROOTS: &[&str] = &["/usr/local", "/usr", "/opt/homebrew", "/opt/local"];

impl Where {
    /// Finds every valid Git installation using the default configuration.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use git_where_core::Where;
    ///
    /// for install in Where::system().find_git_installations()? {
    ///     println!("{} ({})", install.git().display(), install.distribution());
    /// }
    /// # Ok::<(), git_where_core::Error>(())
    /// ```
    pub fn find_git_installations(&self) -> Result<Vec<Installation>> {
        self.find_git_installations_with(&DiscoveryConfig::default())
    }

    /// Finds every valid Git installation from the sources enabled in
    /// `config`.
    ///
    /// Nothing found is an empty `Vec`, not an error.
    ///
    /// # Errors
    ///
    /// - [`crate::Error::InvalidArgument`] for a blank entry in
    ///   `config.extra_roots`.
    /// - [`crate::Error::Io`] for filesystem faults other than "not found".
    pub fn find_git_installations_with(
        &self,
        config: &DiscoveryConfig,
    ) -> Result<Vec<Installation>> {
        let platform = self.context().platform();
        let distributions = Distribution::for_platform(platform);
        let mut found = Vec::new();

        if config.use_search_path {
            if let Some(git) = self.find_app("git")? {
                match git.to_str() {
                    Some(git_str) => {
                        let root = normalize_for(platform, git_str);
                        debug!(git = %git_str, root = %root, "classifying git from PATH");

                        for &distribution in distributions {
                            if let Some(install) = self.find_git_installation(&root, distribution)? {
                                push_unique(&mut found, install);
                                break;
                            }
                        }
                    }
                    None => debug!(git = %git.display(), "skipping non-UTF-8 git from PATH"),
                }
            }
        }

        if config.use_well_known_roots {
            for (root, candidates) in self.default_roots() {
                self.collect_valid(&root, candidates, &mut found)?;
            }
        }

        if config.use_environment_hints {
            if let Some(root) = self.context().var(GIT_INSTALL_ROOT_VAR) {
                debug!(root = %root, "checking {}", GIT_INSTALL_ROOT_VAR);
                self.collect_valid(&root, distributions, &mut found)?;
            }
        }

        for root in &config.extra_roots {
            match root.to_str() {
                Some(root) => self.collect_valid(root, distributions, &mut found)?,
                None => debug!(root = %root.display(), "skipping non-UTF-8 extra root"),
            }
        }

        debug!(count = found.len(), "git discovery finished");
        Ok(found)
    }

    /// Resolves `path` as a `distribution` installation and validates it.
    ///
    /// Returns `Ok(None)` when the installation is not (completely) on disk.
    ///
    /// # Errors
    ///
    /// [`crate::Error::InvalidArgument`] for a blank path or a distribution
    /// without a path table entry; [`crate::Error::Io`] for filesystem
    /// faults.
    pub fn find_git_installation(
        &self,
        path: impl AsRef<Path>,
        distribution: Distribution,
    ) -> Result<Option<Installation>> {
        let install = Installation::resolve(Some(self.context()), path, distribution)?;
        Ok(install.is_valid()?.then_some(install))
    }

    /// Default install locations for the context's platform, each with the
    /// distributions worth checking there.
    fn default_roots(&self) -> Vec<(String, &'static [Distribution])> {
        let platform = self.context().platform();
        let all = Distribution::for_platform(platform);

        match platform {
            Platform::Windows => WINDOWS_DEFAULT_ROOTS
                .iter()
                .filter_map(|(var, below, candidates)| {
                    let base = self.context().var(var)?;
                    Some((paths::join_for(platform, &base, below), candidates.unwrap_or(all)))
                })
                .collect(),
            Platform::Unix => UNIX_DEFAULT_ROOTS
                .iter()
                .map(|root| (root.to_string(), all))
                .collect(),
        }
    }

    fn collect_valid(
        &self,
        root: &str,
        candidates: &[Distribution],
        found: &mut Vec<Installation>,
    ) -> Result<()> {
        for &distribution in candidates {
            if let Some(install) = self.find_git_installation(root, distribution)? {
                push_unique(found, install);
            }
        }
        Ok(())
    }
}

fn push_unique(found: &mut Vec<Installation>, install: Installation) {
    if found.contains(&install) {
        return;
    }
    debug!(root = %install, distribution = %install.distribution(), "found git installation");
    found.push(install);
}
