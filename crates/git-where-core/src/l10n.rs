//! Localization support using Project Fluent.
//!
//! This module provides the translated messages used by the `git-where`
//! CLI. Catalogs are compiled into the binary; a `locales/{locale}/main.ftl`
//! file in the working directory takes precedence, which makes it easy to
//! try out a translation without rebuilding.
//!
//! # Supported Locales
//!
//! Currently supported languages:
//! - English (en) - Default fallback
//! - German (de)
//!
//! # Example
//!
//! ```
//! use git_where_core::l10n::Localizer;
//!
//! let localizer = Localizer::new("en").unwrap();
//! let message = localizer.get("discovery-complete", Some(&[("count", "2")]));
//! assert!(message.contains('2'));
//! ```

use crate::context::{Environment, SystemEnvironment};
use crate::error::{Error, Result};
use fluent::{FluentBundle, FluentResource};
use std::fs;
use std::path::PathBuf;
use tracing::warn;
use unic_langid::LanguageIdentifier;

/// The default locale used when no locale is specified or loading fails.
pub const DEFAULT_LOCALE: &str = "en";

/// Manages localization resources and message formatting.
pub struct Localizer {
    /// The Fluent bundle containing loaded translations.
    bundle: FluentBundle<FluentResource>,
    /// The current locale identifier.
    locale: LanguageIdentifier,
}

impl Localizer {
    /// Creates a new Localizer for the specified locale.
    ///
    /// Falls back to English if the requested locale has no catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The locale identifier is invalid
    /// - FTL syntax is invalid
    ///
    /// # Example
    ///
    /// ```
    /// use git_where_core::l10n::Localizer;
    ///
    /// let localizer = Localizer::new("de").unwrap();
    /// assert_eq!(localizer.locale(), "de");
    /// ```
    pub fn new(locale_str: &str) -> Result<Self> {
        let locale: LanguageIdentifier = locale_str
            .parse()
            .map_err(|_| Error::l10n(format!("Invalid locale: {}", locale_str)))?;

        let (bundle, actual_locale) = Self::load_locale(&locale).or_else(|err| {
            if locale.language.as_str() == DEFAULT_LOCALE {
                return Err(err);
            }
            let default: LanguageIdentifier = DEFAULT_LOCALE
                .parse()
                .map_err(|_| Error::l10n("Invalid default locale"))?;
            Self::load_locale(&default)
        })?;

        Ok(Self {
            bundle,
            locale: actual_locale,
        })
    }

    /// Creates a Localizer for the locale named by `LC_ALL`, `LC_MESSAGES`
    /// or `LANG` in the process environment.
    pub fn from_system() -> Result<Self> {
        Self::from_environment(&SystemEnvironment)
    }

    /// Creates a Localizer for the locale named by the given environment.
    pub fn from_environment(env: &dyn Environment) -> Result<Self> {
        Self::new(&detect_locale(env))
    }

    /// Loads translation resources for a specific locale.
    ///
    /// Searches for the catalog in these locations (in order):
    /// 1. `./locales/{locale}/main.ftl` (current directory)
    /// 2. `./crates/git-where-core/locales/{locale}/main.ftl` (workspace structure)
    /// 3. The catalogs embedded at compile time
    fn load_locale(
        locale: &LanguageIdentifier,
    ) -> Result<(FluentBundle<FluentResource>, LanguageIdentifier)> {
        let locale_code = locale.to_string();

        let possible_paths = [
            PathBuf::from(format!("locales/{}/main.ftl", locale_code)),
            PathBuf::from(format!(
                "crates/git-where-core/locales/{}/main.ftl",
                locale_code
            )),
        ];

        let ftl_content = possible_paths
            .iter()
            .find_map(|path| fs::read_to_string(path).ok())
            .or_else(|| embedded_catalog(locale.language.as_str()).map(str::to_string))
            .ok_or_else(|| {
                Error::l10n(format!("Could not find locale file for '{}'", locale_code))
            })?;

        let resource = FluentResource::try_new(ftl_content)
            .map_err(|(_, errors)| Error::l10n(format!("Failed to parse FTL: {:?}", errors)))?;

        let mut bundle = FluentBundle::new(vec![locale.clone()]);
        // Keep terminal output free of bidi isolation marks.
        bundle.set_use_isolating(false);
        bundle
            .add_resource(resource)
            .map_err(|e| Error::l10n(format!("Failed to add resource: {:?}", e)))?;

        Ok((bundle, locale.clone()))
    }

    /// Retrieves a translated message by its identifier.
    ///
    /// Returns the message ID in brackets if the translation is not found.
    ///
    /// # Example
    ///
    /// ```
    /// # use git_where_core::l10n::Localizer;
    /// # let localizer = Localizer::new("en").unwrap();
    /// let msg = localizer.get("discovery-none", None);
    /// assert_eq!(msg, "No Git installations found.");
    ///
    /// let msg = localizer.get("app-not-found", Some(&[("name", "svn")]));
    /// assert_eq!(msg, "svn: not found on PATH");
    /// ```
    pub fn get(&self, msg_id: &str, args: Option<&[(&str, &str)]>) -> String {
        let Some(pattern) = self.bundle.get_message(msg_id).and_then(|m| m.value()) else {
            return format!("[{}]", msg_id);
        };

        let mut errors = vec![];
        let formatted = if let Some(args) = args {
            let mut fluent_args = fluent::FluentArgs::new();
            for (key, value) in args {
                fluent_args.set(*key, value.to_string());
            }
            self.bundle
                .format_pattern(pattern, Some(&fluent_args), &mut errors)
        } else {
            self.bundle.format_pattern(pattern, None, &mut errors)
        };

        if !errors.is_empty() {
            warn!(msg_id, ?errors, "fluent formatting errors");
        }

        formatted.to_string()
    }

    /// Gets the current locale identifier.
    pub fn locale(&self) -> String {
        self.locale.to_string()
    }
}

/// Detects the locale from `LC_ALL`, `LC_MESSAGES` and `LANG`, in that order.
///
/// Returns the language code (the part before `_` or `.`), or `"en"` if
/// nothing usable is set. The POSIX `C` locale counts as unset.
///
/// # Example
///
/// ```
/// use git_where_core::context::MapEnvironment;
/// use git_where_core::l10n::detect_locale;
///
/// let env = MapEnvironment::new().with_var("LANG", "de_DE.UTF-8");
/// assert_eq!(detect_locale(&env), "de");
/// ```
pub fn detect_locale(env: &dyn Environment) -> String {
    ["LC_ALL", "LC_MESSAGES", "LANG"]
        .iter()
        .filter_map(|key| env.var(key))
        .map(|value| value.to_string_lossy().into_owned())
        .find(|value| !value.trim().is_empty())
        .and_then(|locale| {
            locale
                .split(['_', '.'])
                .next()
                .map(|s| s.trim().to_lowercase())
        })
        .filter(|lang| !lang.is_empty() && lang != "c" && lang != "posix")
        .unwrap_or_else(|| DEFAULT_LOCALE.to_string())
}

/// Catalogs compiled into the binary, by language code.
fn embedded_catalog(language: &str) -> Option<&'static str> {
    match language {
        "en" => Some(include_str!("../locales/en/main.ftl")),
        "de" => Some(include_str!("../locales/de/main.ftl")),
        _ => None,
    }
}
