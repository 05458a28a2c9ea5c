//! Structured description of one Git installation on disk.

use crate::context::RuntimeContext;
use crate::distribution::{Distribution, PathTable};
use crate::error::{Error, Result};
use crate::paths::{self, normalize_for};
use serde::Serialize;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::Path;
use tracing::trace;

/// A Git installation: a normalized root plus the [`Distribution`] that
/// describes its layout.
///
/// Two installations are equal when their distributions match and their
/// roots match ignoring case. The derived paths and the context play no part
/// in identity, so `C:\Git`, `C:\Git\cmd\git.exe` and `C:\Git\bin\git.exe`
/// all produce the same installation.
///
/// # Example
///
/// ```
/// use git_where_core::context::{MapEnvironment, MemoryFileSystem};
/// use git_where_core::{Distribution, Installation, Platform, RuntimeContext};
/// use std::path::Path;
///
/// let ctx = RuntimeContext::new(Platform::Windows, MemoryFileSystem::new(), MapEnvironment::new());
/// let git = Installation::resolve(
///     Some(&ctx),
///     r"C:\Program Files\Git\cmd\git.exe",
///     Distribution::GitForWindows64v2,
/// )?;
///
/// assert_eq!(git.path(), Path::new(r"C:\Program Files\Git"));
/// assert_eq!(
///     git.libexec(),
///     Path::new(r"C:\Program Files\Git\mingw64\libexec\git-core")
/// );
/// # Ok::<(), git_where_core::Error>(())
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct Installation {
    #[serde(skip)]
    context: RuntimeContext,

    #[serde(rename = "root")]
    path: String,
    distribution: Distribution,

    cmd: String,
    git: String,
    libexec: String,
    sh: String,
    config: String,
    doc: String,
}

impl Installation {
    /// Builds an installation from a raw path using the built-in path table.
    ///
    /// `path` may be the installation root or the path of its Git binary;
    /// see [`normalize_for`] for the accepted shapes. The context's platform
    /// decides which characters separate components and which separator the
    /// derived paths use.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] if `context` is `None`, `path` is blank or
    /// not valid UTF-8, or `distribution` has no path table entry.
    pub fn resolve(
        context: Option<&RuntimeContext>,
        path: impl AsRef<Path>,
        distribution: Distribution,
    ) -> Result<Self> {
        Self::resolve_with_table(context, path, distribution, PathTable::builtin())
    }

    /// Like [`Installation::resolve`], with an explicit path table.
    pub fn resolve_with_table(
        context: Option<&RuntimeContext>,
        path: impl AsRef<Path>,
        distribution: Distribution,
        table: &PathTable<'_>,
    ) -> Result<Self> {
        let context = context
            .ok_or_else(|| Error::invalid_argument("context", "an execution context is required"))?;

        let path = path.as_ref();
        let raw = path.to_str().ok_or_else(|| {
            Error::invalid_argument(
                "path",
                format!("`{}` is not valid UTF-8", path.display()),
            )
        })?;
        if raw.trim().is_empty() {
            return Err(Error::invalid_argument("path", "must not be blank"));
        }

        let layout = table.get(distribution)?;
        let platform = context.platform();
        let root = normalize_for(platform, raw);
        let join = |relative: &str| paths::join_for(platform, &root, relative);

        Ok(Self {
            context: context.clone(),
            cmd: join(layout.cmd),
            git: join(layout.git),
            libexec: join(layout.libexec),
            sh: join(layout.sh),
            config: join(layout.config),
            doc: join(layout.doc),
            path: root,
            distribution,
        })
    }

    /// Checks that the installation is structurally complete.
    ///
    /// The root directory, the libexec directory and the Git binary must all
    /// exist. Checks go through the installation's context and stop at the
    /// first missing piece.
    ///
    /// # Errors
    ///
    /// Filesystem faults other than "not found" (e.g. permission denied).
    pub fn is_valid(&self) -> Result<bool> {
        let fs = self.context.file_system();

        let valid = fs.directory_exists(self.path())?
            && fs.directory_exists(self.libexec())?
            && fs.file_exists(self.git())?;

        trace!(root = %self.path, distribution = %self.distribution, valid, "validated installation");
        Ok(valid)
    }

    /// The installation root.
    pub fn path(&self) -> &Path {
        Path::new(&self.path)
    }

    pub fn distribution(&self) -> Distribution {
        self.distribution
    }

    /// Directory the installer puts on `PATH`.
    pub fn cmd(&self) -> &Path {
        Path::new(&self.cmd)
    }

    /// The Git binary.
    pub fn git(&self) -> &Path {
        Path::new(&self.git)
    }

    /// Directory holding Git's helper programs.
    pub fn libexec(&self) -> &Path {
        Path::new(&self.libexec)
    }

    pub fn sh(&self) -> &Path {
        Path::new(&self.sh)
    }

    /// System-level gitconfig.
    pub fn config(&self) -> &Path {
        Path::new(&self.config)
    }

    pub fn doc(&self) -> &Path {
        Path::new(&self.doc)
    }

    pub fn context(&self) -> &RuntimeContext {
        &self.context
    }
}

impl PartialEq for Installation {
    fn eq(&self, other: &Self) -> bool {
        self.distribution == other.distribution && paths::eq_ignore_case(&self.path, &other.path)
    }
}

impl Eq for Installation {}

impl Hash for Installation {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.path.to_lowercase().hash(state);
        self.distribution.hash(state);
    }
}

impl fmt::Display for Installation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{MapEnvironment, MemoryFileSystem, Platform};
    use crate::distribution::DistributionPaths;
    use std::collections::HashSet;
    use std::io;

    const ROOT: &str = r"C:\Git";
    const LIBEXEC: &str = r"C:\Git\mingw64\libexec\git-core";
    const GIT: &str = r"C:\Git\cmd\git.exe";

    fn windows_context(fs: MemoryFileSystem) -> RuntimeContext {
        RuntimeContext::new(Platform::Windows, fs, MapEnvironment::new())
    }

    fn empty_context() -> RuntimeContext {
        windows_context(MemoryFileSystem::new())
    }

    fn git64(ctx: &RuntimeContext, path: &str) -> Installation {
        Installation::resolve(Some(ctx), path, Distribution::GitForWindows64v2).unwrap()
    }

    #[test]
    fn test_derived_paths_64v2() {
        let ctx = empty_context();
        let install = git64(&ctx, ROOT);

        assert_eq!(install.path(), Path::new(ROOT));
        assert_eq!(install.cmd(), Path::new(r"C:\Git\cmd"));
        assert_eq!(install.git(), Path::new(GIT));
        assert_eq!(install.libexec(), Path::new(LIBEXEC));
        assert_eq!(install.sh(), Path::new(r"C:\Git\bin\sh.exe"));
        assert_eq!(install.config(), Path::new(r"C:\Git\mingw64\etc\gitconfig"));
        assert_eq!(install.doc(), Path::new(r"C:\Git\mingw64\share\doc\git-doc"));
    }

    #[test]
    fn test_derived_paths_posix() {
        let ctx = RuntimeContext::new(Platform::Unix, MemoryFileSystem::new(), MapEnvironment::new());
        let install = Installation::resolve(Some(&ctx), "/usr/bin/git", Distribution::PosixLib).unwrap();

        assert_eq!(install.path(), Path::new("/usr"));
        assert_eq!(install.git(), Path::new("/usr/bin/git"));
        assert_eq!(install.libexec(), Path::new("/usr/lib/git-core"));
        assert_eq!(install.config(), Path::new("/usr/etc/gitconfig"));
    }

    #[test]
    fn test_windows_root_under_bin_is_kept() {
        let ctx = empty_context();
        let install = git64(&ctx, r"D:\bin\Git");

        assert_eq!(install.path(), Path::new(r"D:\bin\Git"));
        assert_eq!(install.git(), Path::new(r"D:\bin\Git\cmd\git.exe"));
        assert_eq!(git64(&ctx, r"D:\bin\Git\cmd\git.exe"), install);
    }

    #[test]
    fn test_unix_root_with_backslash_in_name() {
        let ctx = RuntimeContext::new(Platform::Unix, MemoryFileSystem::new(), MapEnvironment::new());
        let install =
            Installation::resolve(Some(&ctx), r"/home/u/we\ird/bin/git", Distribution::Posix).unwrap();

        assert_eq!(install.path(), Path::new(r"/home/u/we\ird"));
        assert_eq!(install.git(), Path::new(r"/home/u/we\ird/bin/git"));
        assert_eq!(install.libexec(), Path::new(r"/home/u/we\ird/libexec/git-core"));
    }

    #[cfg(unix)]
    #[test]
    fn test_resolve_non_utf8_path_is_invalid() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let ctx = RuntimeContext::new(Platform::Unix, MemoryFileSystem::new(), MapEnvironment::new());
        let raw = Path::new(OsStr::from_bytes(b"/opt/t\xFF"));
        let err = Installation::resolve(Some(&ctx), raw, Distribution::Posix).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { name: "path", .. }));
    }

    #[test]
    fn test_binary_paths_resolve_to_the_same_installation() {
        let ctx = empty_context();
        let root = git64(&ctx, r"C:\Git");
        let cmd = git64(&ctx, r"C:\Git\cmd\git.exe");
        let bin = git64(&ctx, r"C:\Git\bin\git.exe");

        assert_eq!(root, cmd);
        assert_eq!(root, bin);
        assert_eq!(cmd, bin);
        assert_eq!(bin.path(), Path::new(ROOT));
    }

    #[test]
    fn test_unix_binary_path_resolves_to_prefix() {
        let ctx = RuntimeContext::new(Platform::Unix, MemoryFileSystem::new(), MapEnvironment::new());
        let a = Installation::resolve(Some(&ctx), "/usr", Distribution::Posix).unwrap();
        let b = Installation::resolve(Some(&ctx), "/usr/bin/git", Distribution::Posix).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_root_never_ends_with_separator() {
        let ctx = empty_context();
        let install = git64(&ctx, r"C:\Git\\");
        assert_eq!(install.to_string(), ROOT);
    }

    #[test]
    fn test_equality_ignores_case_but_not_distribution() {
        let ctx = empty_context();
        let upper = git64(&ctx, r"C:\PROGRAM FILES\GIT");
        let lower = git64(&ctx, r"c:\program files\git");
        assert_eq!(upper, lower);

        let other = Installation::resolve(Some(&ctx), ROOT, Distribution::GitForWindows32v2).unwrap();
        assert_ne!(git64(&ctx, ROOT), other);
    }

    #[test]
    fn test_equality_ignores_context() {
        let a = git64(&empty_context(), ROOT);
        let b = git64(
            &windows_context(MemoryFileSystem::new().with_dir(ROOT)),
            ROOT,
        );
        assert_eq!(a, b);
    }

    #[test]
    fn test_hash_agrees_with_equality() {
        let ctx = empty_context();
        let mut set = HashSet::new();
        set.insert(git64(&ctx, r"C:\Git"));
        set.insert(git64(&ctx, r"c:\git\cmd\git.exe"));
        set.insert(git64(&ctx, r"C:\GIT\bin\git.exe"));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_resolve_without_context_is_invalid() {
        let err = Installation::resolve(None, ROOT, Distribution::GitForWindows64v2).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { name: "context", .. }));
    }

    #[test]
    fn test_resolve_blank_path_is_invalid() {
        let ctx = empty_context();
        for blank in ["", "   ", "\t"] {
            let err =
                Installation::resolve(Some(&ctx), blank, Distribution::GitForWindows64v2).unwrap_err();
            assert!(matches!(err, Error::InvalidArgument { name: "path", .. }));
        }
    }

    #[test]
    fn test_resolve_with_missing_table_entry_is_invalid() {
        let ctx = empty_context();
        let only_posix = [(
            Distribution::Posix,
            DistributionPaths {
                cmd: "bin",
                git: "bin/git",
                libexec: "libexec/git-core",
                sh: "bin/sh",
                config: "etc/gitconfig",
                doc: "share/doc/git",
            },
        )];
        let table = PathTable::new(&only_posix);

        let err = Installation::resolve_with_table(
            Some(&ctx),
            ROOT,
            Distribution::GitForWindows64v2,
            &table,
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { name: "distribution", .. }));

        assert!(Installation::resolve_with_table(Some(&ctx), "/usr", Distribution::Posix, &table).is_ok());
    }

    #[test]
    fn test_is_valid_all_present() {
        let ctx = windows_context(
            MemoryFileSystem::new()
                .with_dir(ROOT)
                .with_dir(LIBEXEC)
                .with_file(GIT),
        );
        assert!(git64(&ctx, ROOT).is_valid().unwrap());
    }

    #[test]
    fn test_is_valid_without_root() {
        let ctx = windows_context(MemoryFileSystem::new().with_dir(LIBEXEC).with_file(GIT));
        assert!(!git64(&ctx, ROOT).is_valid().unwrap());
    }

    #[test]
    fn test_is_valid_without_libexec() {
        let ctx = windows_context(MemoryFileSystem::new().with_dir(ROOT).with_file(GIT));
        assert!(!git64(&ctx, ROOT).is_valid().unwrap());
    }

    #[test]
    fn test_is_valid_without_git_binary() {
        let ctx = windows_context(MemoryFileSystem::new().with_dir(ROOT).with_dir(LIBEXEC));
        assert!(!git64(&ctx, ROOT).is_valid().unwrap());
    }

    #[test]
    fn test_is_valid_requires_binary_to_be_a_file() {
        let ctx = windows_context(
            MemoryFileSystem::new()
                .with_dir(ROOT)
                .with_dir(LIBEXEC)
                .with_dir(GIT),
        );
        assert!(!git64(&ctx, ROOT).is_valid().unwrap());
    }

    #[test]
    fn test_is_valid_propagates_seam_faults() {
        let ctx = windows_context(MemoryFileSystem::new().with_dir(ROOT).with_denied(LIBEXEC));
        let err = git64(&ctx, ROOT).is_valid().unwrap_err();
        match err {
            Error::Io(e) => assert_eq!(e.kind(), io::ErrorKind::PermissionDenied),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_serialization_skips_context() {
        let ctx = empty_context();
        let json = serde_json::to_value(git64(&ctx, ROOT)).unwrap();

        assert_eq!(json["root"], ROOT);
        assert_eq!(json["distribution"], "GitForWindows64v2");
        assert_eq!(json["git"], GIT);
        assert!(json.get("context").is_none());
    }
}
