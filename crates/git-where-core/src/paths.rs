//! String-level path handling shared by the locator and the resolver.
//!
//! Installation roots are kept as strings rather than `Path`s because they
//! may describe a layout from another platform: a `C:\Git` root has to
//! normalize and compare the same way whether this code runs on Windows or
//! on Linux. The rules therefore come from a [`Platform`] value, not from
//! the host: Windows accepts both `\` and `/`, Unix only `/`. Helpers without
//! a platform argument guess it from the path's shape.

use crate::context::Platform;
use std::ffi::{OsStr, OsString};

/// File name of the Git binary in Git for Windows layouts.
pub const GIT_EXE_NAME: &str = "git.exe";

/// Suffixes that point at a Git binary inside a Windows installation root,
/// as component lists. Checked in order; the bare `git.exe` entry comes last
/// so the longer `cmd\git.exe` / `bin\git.exe` shapes win.
///
/// `bin\git` is missing: on Windows that is a directory (`D:\bin\Git`), not
/// a binary.
const WINDOWS_BINARY_SUFFIXES: &[&[&str]] = &[
    &["cmd", GIT_EXE_NAME],
    &["bin", GIT_EXE_NAME],
    &[GIT_EXE_NAME],
];

/// Unix roots additionally accept the extension-less binary. A bare `git`
/// component is still missing: `/opt/git` is a perfectly good root.
const UNIX_BINARY_SUFFIXES: &[&[&str]] = &[
    &["cmd", GIT_EXE_NAME],
    &["bin", GIT_EXE_NAME],
    &["cmd", "git"],
    &["bin", "git"],
    &[GIT_EXE_NAME],
];

fn binary_suffixes(platform: Platform) -> &'static [&'static [&'static str]] {
    match platform {
        Platform::Windows => WINDOWS_BINARY_SUFFIXES,
        Platform::Unix => UNIX_BINARY_SUFFIXES,
    }
}

/// Whether `c` separates components on any supported platform.
pub(crate) fn is_separator(c: char) -> bool {
    c == '\\' || c == '/'
}

/// Removes trailing separators, but never reduces a path to nothing:
/// `/` stays `/`.
fn trim_trailing_separators(platform: Platform, path: &str) -> &str {
    let trimmed = path.trim_end_matches(|c: char| platform.is_path_separator(c));
    if trimmed.is_empty() && !path.is_empty() {
        &path[..1]
    } else {
        trimmed
    }
}

/// Whether a path looks like it came from Windows (`C:` prefix or any
/// backslash).
pub(crate) fn is_windows_shaped(path: &str) -> bool {
    let bytes = path.as_bytes();
    let has_drive = bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':';
    has_drive || path.contains('\\')
}

/// The platform whose rules a path with no known origin most likely
/// follows.
pub(crate) fn guess_platform(path: &str) -> Platform {
    if is_windows_shaped(path) {
        Platform::Windows
    } else {
        Platform::Unix
    }
}

/// Joins a `/`-separated relative path onto `base`, guessing the separator
/// from the shape of `base`.
///
/// Use [`join_for`] when the platform is known.
///
/// ```
/// # use git_where_core::paths::join;
/// assert_eq!(join(r"C:\Git", "cmd/git.exe"), r"C:\Git\cmd\git.exe");
/// assert_eq!(join("/usr", "libexec/git-core"), "/usr/libexec/git-core");
/// assert_eq!(join("/", "bin/git"), "/bin/git");
/// ```
pub fn join(base: &str, relative: &str) -> String {
    join_for(guess_platform(base), base, relative)
}

/// Joins a `/`-separated relative path onto `base` with the separator of
/// `platform`.
///
/// ```
/// # use git_where_core::{paths::join_for, Platform};
/// assert_eq!(join_for(Platform::Unix, r"/home/u/we\ird", "bin/git"), r"/home/u/we\ird/bin/git");
/// assert_eq!(join_for(Platform::Windows, "D:", "cmd/git.exe"), r"D:\cmd\git.exe");
/// ```
pub fn join_for(platform: Platform, base: &str, relative: &str) -> String {
    let sep = platform.path_separator();
    let relative = relative.trim_matches(is_separator);

    let mut out = String::with_capacity(base.len() + relative.len() + 1);
    out.push_str(base);
    if !relative.is_empty() {
        if !out.ends_with(|c: char| platform.is_path_separator(c)) {
            out.push(sep);
        }
        out.extend(relative.chars().map(|c| if is_separator(c) { sep } else { c }));
    }
    out
}

/// Appends a single file name to a directory taken verbatim from the
/// environment. The directory may not be valid UTF-8.
pub(crate) fn join_os(platform: Platform, dir: &OsStr, file_name: &str) -> OsString {
    let mut out = dir.to_os_string();
    let has_trailing_separator = dir
        .to_string_lossy()
        .ends_with(|c: char| platform.is_path_separator(c));
    if !dir.is_empty() && !has_trailing_separator {
        out.push(platform.path_separator().to_string());
    }
    out.push(file_name);
    out
}

/// Splits a list-valued variable such as `PATH` on an ASCII separator
/// without decoding it.
#[cfg(unix)]
pub(crate) fn split_list(value: &OsStr, sep: char) -> Vec<OsString> {
    use std::os::unix::ffi::OsStrExt;

    value
        .as_bytes()
        .split(|&b| char::from(b) == sep)
        .map(|part| OsStr::from_bytes(part).to_os_string())
        .collect()
}

#[cfg(windows)]
pub(crate) fn split_list(value: &OsStr, sep: char) -> Vec<OsString> {
    use std::os::windows::ffi::{OsStrExt, OsStringExt};

    let wide: Vec<u16> = value.encode_wide().collect();
    wide.split(|&unit| u32::from(unit) == u32::from(sep))
        .map(OsString::from_wide)
        .collect()
}

#[cfg(not(any(unix, windows)))]
pub(crate) fn split_list(value: &OsStr, sep: char) -> Vec<OsString> {
    value
        .to_string_lossy()
        .split(sep)
        .map(OsString::from)
        .collect()
}

/// Strips `suffix` from the end of `path` if its trailing components match,
/// ignoring ASCII case.
///
/// Returns `None` when the components don't match, or when stripping would
/// leave nothing of a relative path.
fn strip_component_suffix<'a>(platform: Platform, path: &'a str, suffix: &[&str]) -> Option<&'a str> {
    let is_sep = |c: char| platform.is_path_separator(c);
    let mut rest = path;

    for expected in suffix.iter().rev() {
        rest = rest.trim_end_matches(is_sep);
        let (head, component) = match rest.rfind(is_sep) {
            Some(idx) => (&rest[..idx], &rest[idx + 1..]),
            None => ("", rest),
        };
        if !component.eq_ignore_ascii_case(expected) {
            return None;
        }
        rest = head;
    }

    if rest.trim_end_matches(is_sep).is_empty() {
        // `/bin/git` names the filesystem root; `bin/git` names nothing.
        return path.starts_with(is_sep).then(|| &path[..1]);
    }
    Some(rest)
}

/// One stripping step; `None` once `path` is stable.
fn normalize_step(platform: Platform, path: &str) -> Option<&str> {
    binary_suffixes(platform)
        .iter()
        .find_map(|suffix| strip_component_suffix(platform, path, suffix))
        .map(|stripped| trim_trailing_separators(platform, stripped))
        .filter(|next| *next != path)
}

/// Normalizes a raw path into an installation root.
///
/// Trailing separators are trimmed, then any known path to the Git binary
/// (`cmd\git.exe`, `bin\git.exe`, a lone `git.exe`, and on Unix also
/// `bin/git`) is removed from the end, and separators are trimmed again.
/// This repeats until nothing changes, so normalizing a root a second time is
/// a no-op.
///
/// The platform is guessed from each intermediate path's shape; see
/// [`normalize_for`] to apply one platform's rules.
///
/// # Examples
///
/// ```
/// use git_where_core::normalize;
///
/// assert_eq!(normalize(r"C:\Git\"), r"C:\Git");
/// assert_eq!(normalize(r"C:\Git\cmd\git.exe"), r"C:\Git");
/// assert_eq!(normalize(r"C:\Git\bin\GIT.EXE"), r"C:\Git");
/// assert_eq!(normalize(r"D:\bin\Git"), r"D:\bin\Git");
/// assert_eq!(normalize("/usr/bin/git"), "/usr");
/// assert_eq!(normalize("/opt/git"), "/opt/git");
/// ```
pub fn normalize(raw: &str) -> String {
    let mut current = trim_trailing_separators(guess_platform(raw), raw);
    while let Some(next) = normalize_step(guess_platform(current), current) {
        current = next;
    }
    current.to_string()
}

/// Normalizes a raw path with the rules of `platform`.
///
/// On Unix only `/` separates components, so a backslash inside a directory
/// name is left alone.
///
/// ```
/// use git_where_core::{paths::normalize_for, Platform};
///
/// assert_eq!(normalize_for(Platform::Unix, r"/home/u/we\ird/bin/git"), r"/home/u/we\ird");
/// assert_eq!(normalize_for(Platform::Windows, r"D:\bin\git"), r"D:\bin\git");
/// ```
pub fn normalize_for(platform: Platform, raw: &str) -> String {
    let mut current = trim_trailing_separators(platform, raw);
    while let Some(next) = normalize_step(platform, current) {
        current = next;
    }
    current.to_string()
}

/// Case-insensitive path comparison used for installation identity.
pub(crate) fn eq_ignore_case(a: &str, b: &str) -> bool {
    a == b || a.to_lowercase() == b.to_lowercase()
}
