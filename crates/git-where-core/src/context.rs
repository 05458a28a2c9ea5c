//! The execution context: the only door to the filesystem and environment.
//!
//! Everything in this crate that needs to know whether a file exists or what
//! `PATH` contains asks a [`RuntimeContext`]. Production code uses
//! [`RuntimeContext::system`]; tests build one from a [`MemoryFileSystem`]
//! and a [`MapEnvironment`] so that Windows layouts can be exercised on any
//! host.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::ffi::OsString;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// The operating-system family whose lookup rules apply.
///
/// The platform decides how `PATH` is split, whether executable extensions
/// (`PATHEXT`) are tried, and which distributions and default roots the
/// discovery sweep considers. It is part of the context rather than a
/// compile-time switch so a Windows layout can be tested on Linux.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Windows: `;`-separated `PATH`, extension-based executables.
    Windows,
    /// Unix-like: `:`-separated `PATH`, no extensions.
    Unix,
}

impl Platform {
    /// The platform this binary was compiled for.
    pub const fn current() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else {
            Platform::Unix
        }
    }

    /// Separator between entries of `PATH`.
    pub const fn path_list_separator(self) -> char {
        match self {
            Platform::Windows => ';',
            Platform::Unix => ':',
        }
    }

    /// Separator used when joining path components.
    pub const fn path_separator(self) -> char {
        match self {
            Platform::Windows => '\\',
            Platform::Unix => '/',
        }
    }

    /// Whether `c` separates path components. Windows accepts both slashes;
    /// on Unix a backslash is an ordinary file-name character.
    pub const fn is_path_separator(self, c: char) -> bool {
        match self {
            Platform::Windows => c == '\\' || c == '/',
            Platform::Unix => c == '/',
        }
    }

    /// Whether executables are resolved by trying `PATHEXT` extensions.
    pub const fn uses_executable_extensions(self) -> bool {
        matches!(self, Platform::Windows)
    }
}

/// Filesystem queries needed by discovery.
///
/// Both methods answer `Ok(false)` for paths that do not exist (including
/// paths whose parent is a regular file). Any other failure, such as a
/// permission error, is returned unchanged.
pub trait FileSystem: Send + Sync {
    /// Whether `path` exists and is a regular file.
    fn file_exists(&self, path: &Path) -> io::Result<bool>;

    /// Whether `path` exists and is a directory.
    fn directory_exists(&self, path: &Path) -> io::Result<bool>;
}

/// Environment variable access (injectable for testing).
pub trait Environment: Send + Sync {
    /// Get an environment variable.
    fn var(&self, key: &str) -> Option<OsString>;
}

/// Production filesystem backed by `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemFileSystem;

impl SystemFileSystem {
    fn metadata(path: &Path) -> io::Result<Option<fs::Metadata>> {
        match fs::metadata(path) {
            Ok(meta) => Ok(Some(meta)),
            Err(e)
                if matches!(
                    e.kind(),
                    io::ErrorKind::NotFound
                        | io::ErrorKind::NotADirectory
                        | io::ErrorKind::InvalidInput
                ) =>
            {
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

impl FileSystem for SystemFileSystem {
    fn file_exists(&self, path: &Path) -> io::Result<bool> {
        Ok(Self::metadata(path)?.is_some_and(|m| m.is_file()))
    }

    fn directory_exists(&self, path: &Path) -> io::Result<bool> {
        Ok(Self::metadata(path)?.is_some_and(|m| m.is_dir()))
    }
}

/// Production environment that reads from the actual process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemEnvironment;

impl Environment for SystemEnvironment {
    fn var(&self, key: &str) -> Option<OsString> {
        std::env::var_os(key)
    }
}

/// An in-memory filesystem made of explicitly registered files and
/// directories.
///
/// Nothing is implied: registering `C:\Git\cmd\git.exe` does not create
/// `C:\Git\cmd`. That makes it possible to describe half-broken layouts.
///
/// # Example
///
/// ```
/// use git_where_core::context::{FileSystem, MemoryFileSystem};
/// use std::path::Path;
///
/// let fs = MemoryFileSystem::new()
///     .with_dir("/usr")
///     .with_file("/usr/bin/git");
///
/// assert!(fs.directory_exists(Path::new("/usr")).unwrap());
/// assert!(fs.file_exists(Path::new("/usr/bin/git")).unwrap());
/// assert!(!fs.directory_exists(Path::new("/usr/bin")).unwrap());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryFileSystem {
    files: HashSet<PathBuf>,
    dirs: HashSet<PathBuf>,
    denied: HashSet<PathBuf>,
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a regular file.
    #[must_use]
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.files.insert(path.into());
        self
    }

    /// Registers a directory.
    #[must_use]
    pub fn with_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.dirs.insert(path.into());
        self
    }

    /// Makes every query for `path` fail with `PermissionDenied`.
    #[must_use]
    pub fn with_denied(mut self, path: impl Into<PathBuf>) -> Self {
        self.denied.insert(path.into());
        self
    }

    fn check_denied(&self, path: &Path) -> io::Result<()> {
        if self.denied.contains(path) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("permission denied: {}", path.display()),
            ));
        }
        Ok(())
    }
}

impl FileSystem for MemoryFileSystem {
    fn file_exists(&self, path: &Path) -> io::Result<bool> {
        self.check_denied(path)?;
        Ok(self.files.contains(path))
    }

    fn directory_exists(&self, path: &Path) -> io::Result<bool> {
        self.check_denied(path)?;
        Ok(self.dirs.contains(path))
    }
}

/// An environment with predefined variables.
#[derive(Debug, Clone, Default)]
pub struct MapEnvironment {
    vars: HashMap<String, OsString>,
}

impl MapEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_var(mut self, key: impl Into<String>, value: impl Into<OsString>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }
}

impl Environment for MapEnvironment {
    fn var(&self, key: &str) -> Option<OsString> {
        self.vars.get(key).cloned()
    }
}

/// Bundles the platform rules with filesystem and environment access.
///
/// Cloning is cheap; the filesystem and environment are shared.
#[derive(Clone)]
pub struct RuntimeContext {
    platform: Platform,
    fs: Arc<dyn FileSystem>,
    env: Arc<dyn Environment>,
}

impl RuntimeContext {
    /// Creates a context from explicit parts.
    pub fn new(
        platform: Platform,
        fs: impl FileSystem + 'static,
        env: impl Environment + 'static,
    ) -> Self {
        Self {
            platform,
            fs: Arc::new(fs),
            env: Arc::new(env),
        }
    }

    /// The real machine: host platform, `std::fs` and the process environment.
    pub fn system() -> Self {
        Self::new(Platform::current(), SystemFileSystem, SystemEnvironment)
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn file_system(&self) -> &dyn FileSystem {
        self.fs.as_ref()
    }

    pub fn environment(&self) -> &dyn Environment {
        self.env.as_ref()
    }

    /// Reads a variable as an OS string, treating an empty or
    /// whitespace-only value as unset.
    pub fn var_os(&self, key: &str) -> Option<OsString> {
        self.env
            .var(key)
            .filter(|v| !v.to_string_lossy().trim().is_empty())
    }

    /// Reads a variable as UTF-8, treating an empty or whitespace-only value
    /// as unset.
    ///
    /// A value that is not valid UTF-8 is reported as unset rather than
    /// rewritten; use [`RuntimeContext::var_os`] to see it.
    pub fn var(&self, key: &str) -> Option<String> {
        match self.var_os(key)?.into_string() {
            Ok(value) => Some(value),
            Err(raw) => {
                debug!(key, value = ?raw, "ignoring non-UTF-8 environment variable");
                None
            }
        }
    }
}

impl Default for RuntimeContext {
    fn default() -> Self {
        Self::system()
    }
}

impl fmt::Debug for RuntimeContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuntimeContext")
            .field("platform", &self.platform)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_platform_rules() {
        assert_eq!(Platform::Windows.path_list_separator(), ';');
        assert_eq!(Platform::Unix.path_list_separator(), ':');
        assert!(Platform::Windows.uses_executable_extensions());
        assert!(!Platform::Unix.uses_executable_extensions());
    }

    #[test]
    fn test_platform_serialization() {
        let json = serde_json::to_string(&Platform::Windows).unwrap();
        assert_eq!(json, "\"windows\"");
    }

    #[test]
    fn test_system_fs_distinguishes_files_and_dirs() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("tool");
        fs::write(&file, "#!/bin/sh\n").unwrap();

        let sys = SystemFileSystem;
        assert!(sys.file_exists(&file).unwrap());
        assert!(!sys.directory_exists(&file).unwrap());
        assert!(sys.directory_exists(temp.path()).unwrap());
        assert!(!sys.file_exists(temp.path()).unwrap());
    }

    #[test]
    fn test_system_fs_missing_paths_are_false() {
        let temp = TempDir::new().unwrap();
        let sys = SystemFileSystem;

        let missing = temp.path().join("nope");
        assert!(!sys.file_exists(&missing).unwrap());
        assert!(!sys.directory_exists(&missing).unwrap());

        // Parent is a regular file.
        let file = temp.path().join("plain");
        fs::write(&file, "").unwrap();
        assert!(!sys.file_exists(&file.join("child")).unwrap());
    }

    #[test]
    fn test_memory_fs_denied_propagates() {
        let fs = MemoryFileSystem::new().with_denied("/secret");
        let err = fs.directory_exists(Path::new("/secret")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::PermissionDenied);
    }

    #[test]
    fn test_context_var_ignores_blank_values() {
        let ctx = RuntimeContext::new(
            Platform::Unix,
            MemoryFileSystem::new(),
            MapEnvironment::new()
                .with_var("EMPTY", "")
                .with_var("SPACES", "   ")
                .with_var("HOME", "/home/user"),
        );

        assert_eq!(ctx.var("EMPTY"), None);
        assert_eq!(ctx.var("SPACES"), None);
        assert_eq!(ctx.var("UNSET"), None);
        assert_eq!(ctx.var("HOME").as_deref(), Some("/home/user"));
    }

    #[test]
    fn test_platform_path_separators() {
        assert_eq!(Platform::Windows.path_separator(), '\\');
        assert_eq!(Platform::Unix.path_separator(), '/');
        assert!(Platform::Windows.is_path_separator('/'));
        assert!(Platform::Windows.is_path_separator('\\'));
        assert!(Platform::Unix.is_path_separator('/'));
        assert!(!Platform::Unix.is_path_separator('\\'));
    }

    #[cfg(unix)]
    #[test]
    fn test_context_var_keeps_non_utf8_values_intact() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let raw = OsStr::from_bytes(b"/opt/t\xFF").to_os_string();
        let ctx = RuntimeContext::new(
            Platform::Unix,
            MemoryFileSystem::new(),
            MapEnvironment::new().with_var("PATH", raw.clone()),
        );

        assert_eq!(ctx.var_os("PATH"), Some(raw));
        assert_eq!(ctx.var("PATH"), None);
    }

    #[test]
    fn test_system_environment_reads_process_env() {
        temp_env::with_var("GIT_WHERE_TEST_VAR", Some("value"), || {
            assert_eq!(
                SystemEnvironment.var("GIT_WHERE_TEST_VAR"),
                Some(OsString::from("value"))
            );
        });
        temp_env::with_var_unset("GIT_WHERE_TEST_VAR", || {
            assert_eq!(SystemEnvironment.var("GIT_WHERE_TEST_VAR"), None);
        });
    }

    #[test]
    fn test_context_debug_hides_seams() {
        let ctx = RuntimeContext::new(Platform::Unix, MemoryFileSystem::new(), MapEnvironment::new());
        assert_eq!(format!("{:?}", ctx), "RuntimeContext { platform: Unix, .. }");
    }
}
