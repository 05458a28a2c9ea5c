//! Executable lookup over the `PATH` environment variable.
//!
//! The main entry point is [`Where`], which answers "which file would the
//! shell run for this name?" through a [`RuntimeContext`]. The discovery
//! sweep for Git installations lives on the same type, in
//! [`crate::discovery`].

use crate::context::{Platform, RuntimeContext};
use crate::error::{Error, Result};
use crate::paths;
use std::ffi::OsString;
use std::path::PathBuf;
use tracing::{debug, trace};

/// Extensions tried on Windows when `PATHEXT` is missing or empty.
pub const DEFAULT_PATHEXT: &[&str] = &[".COM", ".EXE", ".BAT", ".CMD"];

/// Locates executables and Git installations.
///
/// `Where` holds no state besides its context: every call re-reads the
/// environment and the filesystem, so results always reflect the moment of
/// the call.
///
/// # Example
///
/// ```no_run
/// use git_where_core::Where;
///
/// let finder = Where::system();
/// match finder.find_app("git")? {
///     Some(path) => println!("git is {}", path.display()),
///     None => println!("git is not on PATH"),
/// }
/// # Ok::<(), git_where_core::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Where {
    context: RuntimeContext,
}

impl Where {
    pub fn new(context: RuntimeContext) -> Self {
        Self { context }
    }

    /// A locator for the real machine.
    pub fn system() -> Self {
        Self::new(RuntimeContext::system())
    }

    pub fn context(&self) -> &RuntimeContext {
        &self.context
    }

    /// Finds the first file on `PATH` that the shell would run for `name`.
    ///
    /// Directories are searched in `PATH` order. On Windows every directory
    /// is tried with each `PATHEXT` extension in turn before moving to the
    /// next directory. Directories that don't exist are skipped; a missing
    /// or empty `PATH` simply finds nothing.
    ///
    /// Returns `Ok(None)` when nothing matches, including for a blank `name`.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidArgument`] if `name` contains a path separator of
    ///   the context's platform.
    /// - [`Error::Io`] if the filesystem refuses a lookup (e.g. permission
    ///   denied).
    pub fn find_app(&self, name: &str) -> Result<Option<PathBuf>> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(None);
        }
        let platform = self.context.platform();
        if name.contains(|c: char| platform.is_path_separator(c)) {
            return Err(Error::invalid_argument(
                "name",
                format!("expected a bare program name, got `{}`", name),
            ));
        }

        let file_names = self.candidate_file_names(name);
        let fs = self.context.file_system();

        for dir in self.search_dirs() {
            for file_name in &file_names {
                let candidate = PathBuf::from(paths::join_os(platform, &dir, file_name));
                trace!(candidate = %candidate.display(), "checking");
                if fs.file_exists(&candidate)? {
                    debug!(name, path = %candidate.display(), "found executable");
                    return Ok(Some(candidate));
                }
            }
        }

        debug!(name, "executable not found on PATH");
        Ok(None)
    }

    /// The directories listed in `PATH`, in order, with blank entries removed.
    ///
    /// Entries are kept as OS strings, so a directory whose name is not valid
    /// UTF-8 is still searched.
    pub fn search_dirs(&self) -> Vec<OsString> {
        let platform = self.context.platform();
        let Some(raw) = self.context.var_os("PATH") else {
            return Vec::new();
        };

        paths::split_list(&raw, platform.path_list_separator())
            .into_iter()
            .map(|entry| {
                // cmd.exe tolerates quoted entries like "C:\Program Files\Git\cmd"
                if platform == Platform::Windows {
                    if let Some(text) = entry.to_str() {
                        return OsString::from(text.trim().trim_matches('"').trim());
                    }
                }
                entry
            })
            .filter(|entry| !entry.to_string_lossy().trim().is_empty())
            .collect()
    }

    /// Executable extensions to try, in `PATHEXT` order.
    ///
    /// Empty on platforms that don't resolve executables by extension.
    pub fn executable_extensions(&self) -> Vec<String> {
        if !self.context.platform().uses_executable_extensions() {
            return Vec::new();
        }

        let parsed: Vec<String> = self
            .context
            .var("PATHEXT")
            .map(|raw| {
                raw.split(';')
                    .map(str::trim)
                    .filter(|ext| !ext.is_empty())
                    .map(|ext| {
                        if ext.starts_with('.') {
                            ext.to_string()
                        } else {
                            format!(".{}", ext)
                        }
                    })
                    .collect()
            })
            .unwrap_or_default();

        if parsed.is_empty() {
            DEFAULT_PATHEXT.iter().map(|ext| ext.to_string()).collect()
        } else {
            parsed
        }
    }

    /// File names to try in each directory for `name`.
    fn candidate_file_names(&self, name: &str) -> Vec<String> {
        let extensions = self.executable_extensions();
        if extensions.is_empty() {
            return vec![name.to_string()];
        }

        let mut names = Vec::with_capacity(extensions.len() + 1);
        let lower = name.to_lowercase();
        if extensions
            .iter()
            .any(|ext| lower.ends_with(&ext.to_lowercase()))
        {
            // `git.exe` asked for explicitly
            names.push(name.to_string());
        }
        names.extend(extensions.iter().map(|ext| format!("{}{}", name, ext)));
        names
    }
}
