//! Known Git distributions and where each keeps its files.
//!
//! A [`Distribution`] names one packaging layout of Git. The [`PathTable`]
//! maps every distribution to a [`DistributionPaths`] record listing the
//! relative location of the command directory, the Git binary, the libexec
//! directory, the shell, the system config file and the HTML docs.

use crate::context::Platform;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A known packaging layout of the Git toolchain.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Distribution {
    /// 32-bit Git for Windows 1.x (msysgit), everything directly under the root.
    GitForWindows32v1,
    /// 32-bit Git for Windows 2.x, payload under `mingw32\`.
    GitForWindows32v2,
    /// 64-bit Git for Windows 2.x, payload under `mingw64\`.
    GitForWindows64v2,
    /// A Unix prefix with helpers in `libexec/git-core` (Fedora, macOS, source builds).
    Posix,
    /// A Unix prefix with helpers in `lib/git-core` (Debian and derivatives).
    PosixLib,
}

impl Distribution {
    /// Every distribution, in declaration order.
    pub const ALL: [Distribution; 5] = [
        Distribution::GitForWindows32v1,
        Distribution::GitForWindows32v2,
        Distribution::GitForWindows64v2,
        Distribution::Posix,
        Distribution::PosixLib,
    ];

    const WINDOWS_PREFERENCE: [Distribution; 3] = [
        Distribution::GitForWindows64v2,
        Distribution::GitForWindows32v2,
        Distribution::GitForWindows32v1,
    ];

    const UNIX_PREFERENCE: [Distribution; 2] = [Distribution::Posix, Distribution::PosixLib];

    /// Stable identifier, also accepted by [`FromStr`].
    pub const fn name(self) -> &'static str {
        match self {
            Distribution::GitForWindows32v1 => "GitForWindows32v1",
            Distribution::GitForWindows32v2 => "GitForWindows32v2",
            Distribution::GitForWindows64v2 => "GitForWindows64v2",
            Distribution::Posix => "Posix",
            Distribution::PosixLib => "PosixLib",
        }
    }

    /// The platform this layout is found on.
    pub const fn platform(self) -> Platform {
        match self {
            Distribution::GitForWindows32v1
            | Distribution::GitForWindows32v2
            | Distribution::GitForWindows64v2 => Platform::Windows,
            Distribution::Posix | Distribution::PosixLib => Platform::Unix,
        }
    }

    /// Distributions of `platform`, most preferred first.
    ///
    /// Newer layouts come first so that an ambiguous root resolves to the
    /// modern distribution.
    pub fn for_platform(platform: Platform) -> &'static [Distribution] {
        match platform {
            Platform::Windows => &Self::WINDOWS_PREFERENCE,
            Platform::Unix => &Self::UNIX_PREFERENCE,
        }
    }

    /// Relative paths for this distribution.
    ///
    /// Every variant has a layout here, so the built-in [`PathTable`] built
    /// from this function is complete.
    pub const fn paths(self) -> &'static DistributionPaths {
        match self {
            Distribution::GitForWindows32v1 => &GIT_FOR_WINDOWS_32_V1,
            Distribution::GitForWindows32v2 => &GIT_FOR_WINDOWS_32_V2,
            Distribution::GitForWindows64v2 => &GIT_FOR_WINDOWS_64_V2,
            Distribution::Posix => &POSIX,
            Distribution::PosixLib => &POSIX_LIB,
        }
    }
}

impl fmt::Display for Distribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Distribution {
    type Err = Error;

    /// Parses a distribution identifier, ignoring ASCII case.
    ///
    /// ```
    /// use git_where_core::Distribution;
    ///
    /// let d: Distribution = "gitforwindows64v2".parse().unwrap();
    /// assert_eq!(d, Distribution::GitForWindows64v2);
    /// assert!("Cygwin".parse::<Distribution>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|d| d.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                Error::invalid_argument("distribution", format!("unknown identifier `{}`", s))
            })
    }
}

/// Relative locations of the well-known parts of one distribution.
///
/// All paths use `/` and are joined onto the installation root with the
/// separator of the context's platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DistributionPaths {
    /// Directory placed on `PATH` by the installer.
    pub cmd: &'static str,
    /// The Git binary.
    pub git: &'static str,
    /// Directory of Git's internal helper programs.
    pub libexec: &'static str,
    /// The POSIX shell bundled with (or used by) the distribution.
    pub sh: &'static str,
    /// System-level gitconfig.
    pub config: &'static str,
    /// HTML documentation.
    pub doc: &'static str,
}

const GIT_FOR_WINDOWS_32_V1: DistributionPaths = DistributionPaths {
    cmd: "cmd",
    git: "cmd/git.exe",
    libexec: "libexec/git-core",
    sh: "bin/sh.exe",
    config: "etc/gitconfig",
    doc: "doc/git/html",
};

const GIT_FOR_WINDOWS_32_V2: DistributionPaths = DistributionPaths {
    cmd: "cmd",
    git: "cmd/git.exe",
    libexec: "mingw32/libexec/git-core",
    sh: "bin/sh.exe",
    config: "mingw32/etc/gitconfig",
    doc: "mingw32/share/doc/git-doc",
};

const GIT_FOR_WINDOWS_64_V2: DistributionPaths = DistributionPaths {
    cmd: "cmd",
    git: "cmd/git.exe",
    libexec: "mingw64/libexec/git-core",
    sh: "bin/sh.exe",
    config: "mingw64/etc/gitconfig",
    doc: "mingw64/share/doc/git-doc",
};

const POSIX: DistributionPaths = DistributionPaths {
    cmd: "bin",
    git: "bin/git",
    libexec: "libexec/git-core",
    sh: "bin/sh",
    config: "etc/gitconfig",
    doc: "share/doc/git",
};

const POSIX_LIB: DistributionPaths = DistributionPaths {
    libexec: "lib/git-core",
    ..POSIX
};

const BUILTIN_LEN: usize = Distribution::ALL.len();

/// One entry per [`Distribution::ALL`] member, in that order.
const fn builtin_entries() -> [(Distribution, DistributionPaths); BUILTIN_LEN] {
    let mut entries = [(Distribution::Posix, POSIX); BUILTIN_LEN];
    let mut i = 0;
    while i < BUILTIN_LEN {
        let distribution = Distribution::ALL[i];
        entries[i] = (distribution, *distribution.paths());
        i += 1;
    }
    entries
}

static BUILTIN_ENTRIES: [(Distribution, DistributionPaths); BUILTIN_LEN] = builtin_entries();

static BUILTIN: PathTable<'static> = PathTable::new(&BUILTIN_ENTRIES);

/// Lookup table from [`Distribution`] to its [`DistributionPaths`].
///
/// The crate ships one complete table ([`PathTable::builtin`]). Custom tables
/// exist so callers can describe layouts the crate doesn't know about; any
/// lookup of a distribution missing from a table is an
/// [`Error::InvalidArgument`].
#[derive(Debug, Clone, Copy)]
pub struct PathTable<'a> {
    entries: &'a [(Distribution, DistributionPaths)],
}

impl<'a> PathTable<'a> {
    pub const fn new(entries: &'a [(Distribution, DistributionPaths)]) -> Self {
        Self { entries }
    }

    /// The table covering every [`Distribution`].
    pub fn builtin() -> &'static PathTable<'static> {
        &BUILTIN
    }

    /// Paths for `distribution`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] if the table has no entry for it.
    pub fn get(&self, distribution: Distribution) -> Result<&'a DistributionPaths> {
        self.entries
            .iter()
            .find(|(d, _)| *d == distribution)
            .map(|(_, paths)| paths)
            .ok_or_else(|| {
                Error::invalid_argument(
                    "distribution",
                    format!("no path table entry for {}", distribution),
                )
            })
    }

    /// Distributions with no entry in this table.
    pub fn missing(&self) -> Vec<Distribution> {
        Distribution::ALL
            .into_iter()
            .filter(|d| self.get(*d).is_err())
            .collect()
    }
}
