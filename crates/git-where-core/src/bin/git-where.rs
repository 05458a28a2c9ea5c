//! Command-line interface for git-where.
//!
//! This binary answers two questions from the shell: where does `PATH`
//! resolve a program to, and which Git installations are on this machine.
//!
//! Exit status: `0` when the query found something, `1` when it found
//! nothing, `2` on errors.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use git_where_core::{
    l10n::{Localizer, DEFAULT_LOCALE},
    normalize, normalize_for, DiscoveryConfig, Distribution, Installation, LocatedApp, Where,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::warn;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// git-where - Find executables and Git installations
#[derive(Parser, Debug)]
#[command(
    name = "git-where",
    version,
    about = "Locate executables on PATH and describe Git installations",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Output as JSON instead of text
    #[arg(short = 'j', long = "json", global = true, help = "Output as JSON")]
    json: bool,

    /// Show discovery progress on stderr
    #[arg(short = 'v', long = "verbose", global = true, help = "Show verbose output")]
    verbose: bool,

    /// Locale for messages (e.g., en, de)
    #[arg(
        short = 'l',
        long = "locale",
        value_name = "LOCALE",
        global = true,
        help = "Locale for messages (e.g., en, de)"
    )]
    locale: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Find programs on PATH, like `which`
    App {
        /// Program names without directory (and, on Windows, without extension)
        #[arg(required = true, value_name = "NAME")]
        names: Vec<String>,
    },

    /// List every valid Git installation
    List {
        /// Extra installation roots to check (can be specified multiple times)
        #[arg(short = 'r', long = "root", value_name = "PATH")]
        roots: Vec<PathBuf>,

        /// Don't look up git on PATH
        #[arg(long = "no-path")]
        no_path: bool,

        /// Skip default install locations
        #[arg(long = "no-defaults")]
        no_defaults: bool,

        /// Ignore the GIT_INSTALL_ROOT environment variable
        #[arg(long = "no-hints")]
        no_hints: bool,

        /// Sorting profile for results
        #[arg(short = 's', long = "sort", value_enum, default_value_t = SortProfile::Discovery)]
        sort: SortProfile,
    },

    /// Check that ROOT holds a complete installation of DISTRIBUTION
    Check {
        /// Installation root, or the path of its git binary
        root: PathBuf,

        /// One of GitForWindows32v1, GitForWindows32v2, GitForWindows64v2, Posix, PosixLib
        #[arg(value_parser = parse_distribution)]
        distribution: Distribution,
    },

    /// Print the installation root a path normalizes to
    Normalize {
        /// A root or git binary path
        path: String,
    },
}

/// Sorting profiles for listed installations
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SortProfile {
    /// Keep discovery order (most preferred first)
    Discovery,
    /// Sort alphabetically by root, ignoring case
    Root,
    /// Group by distribution
    Distribution,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::from(2)
        }
    }
}

/// Sends library logs to stderr; `--verbose` forces debug level, otherwise
/// `RUST_LOG` decides.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("git_where_core=debug,git_where=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();
}

/// Runs the selected command. `Ok(false)` means "nothing found".
fn run(cli: &Cli) -> Result<bool> {
    let localizer = match &cli.locale {
        Some(locale) => {
            Localizer::new(locale).with_context(|| format!("Failed to load locale: {}", locale))?
        }
        None => Localizer::from_system()
            .or_else(|_| Localizer::new(DEFAULT_LOCALE))
            .context("Failed to load default locale")?,
    };

    let finder = Where::system();

    match &cli.command {
        Command::App { names } => {
            let located = names
                .iter()
                .map(|name| {
                    let path = finder
                        .find_app(name)
                        .with_context(|| format!("Failed to look up `{}`", name))?;
                    Ok(LocatedApp {
                        name: name.clone(),
                        path,
                    })
                })
                .collect::<Result<Vec<_>>>()?;

            if cli.json {
                output_json(&located)?;
            } else {
                output_apps(&located, &localizer);
            }
            Ok(located.iter().all(|app| app.path.is_some()))
        }

        Command::List {
            roots,
            no_path,
            no_defaults,
            no_hints,
            sort,
        } => {
            let config = build_discovery_config(roots, *no_path, *no_defaults, *no_hints);

            if !cli.json && cli.verbose {
                eprintln!("{}", localizer.get("discovery-started", None));
            }

            let mut installs = finder
                .find_git_installations_with(&config)
                .context("Failed to search for Git installations")?;
            sort_installations(&mut installs, *sort);

            if cli.json {
                output_json(&installs)?;
            } else {
                output_table(&installs, &localizer);
            }
            Ok(!installs.is_empty())
        }

        Command::Check { root, distribution } => {
            let install = finder
                .find_git_installation(root, *distribution)
                .with_context(|| format!("Failed to check {}", root.display()))?;

            if cli.json {
                output_json(&install)?;
            } else {
                let root_str = match &install {
                    Some(found) => found.to_string(),
                    None => normalize_for(finder.context().platform(), &root.to_string_lossy()),
                };
                let dist = distribution.to_string();
                let args = [("root", root_str.as_str()), ("distribution", dist.as_str())];
                let msg_id = if install.is_some() {
                    "check-valid"
                } else {
                    "check-invalid"
                };
                println!("{}", localizer.get(msg_id, Some(&args)));
            }
            Ok(install.is_some())
        }

        Command::Normalize { path } => {
            let root = normalize(path);
            if cli.json {
                output_json(&root)?;
            } else {
                println!("{}", root);
            }
            Ok(true)
        }
    }
}

fn parse_distribution(s: &str) -> std::result::Result<Distribution, String> {
    s.parse::<Distribution>().map_err(|e| e.to_string())
}

/// Builds a DiscoveryConfig from CLI arguments
fn build_discovery_config(
    roots: &[PathBuf],
    no_path: bool,
    no_defaults: bool,
    no_hints: bool,
) -> DiscoveryConfig {
    for root in roots {
        if !root.exists() {
            warn!(root = %root.display(), "extra root does not exist");
        }
    }

    DiscoveryConfig {
        use_search_path: !no_path,
        use_well_known_roots: !no_defaults,
        use_environment_hints: !no_hints,
        extra_roots: roots.to_vec(),
    }
}

/// Sorts installations according to the specified profile
fn sort_installations(installs: &mut [Installation], profile: SortProfile) {
    match profile {
        SortProfile::Discovery => {}
        SortProfile::Root => {
            installs.sort_by_cached_key(|i| i.to_string().to_lowercase());
        }
        SortProfile::Distribution => {
            // Stable sort keeps discovery order within a distribution.
            installs.sort_by_key(|i| i.distribution().name());
        }
    }
}

/// Outputs any serializable value as pretty JSON to stdout
fn output_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize to JSON")?;
    println!("{}", json);
    Ok(())
}

fn output_apps(located: &[LocatedApp], localizer: &Localizer) {
    for app in located {
        match &app.path {
            Some(path) => {
                let path = path.display().to_string();
                println!(
                    "{}",
                    localizer.get("app-found", Some(&[("name", app.name.as_str()), ("path", path.as_str())]))
                );
            }
            None => {
                eprintln!(
                    "{}",
                    localizer.get("app-not-found", Some(&[("name", app.name.as_str())]))
                );
            }
        }
    }
}

/// Outputs installations as a formatted table to stdout
fn output_table(installs: &[Installation], localizer: &Localizer) {
    if installs.is_empty() {
        println!("{}", localizer.get("discovery-none", None));
        return;
    }

    let header_root = localizer.get("header-root", None);
    let header_dist = localizer.get("header-distribution", None);
    let header_git = localizer.get("header-git", None);

    let root_width = installs
        .iter()
        .map(|i| i.to_string().chars().count())
        .max()
        .unwrap_or(20)
        .max(header_root.chars().count())
        .min(60); // Cap at 60 chars for readability

    let dist_width = installs
        .iter()
        .map(|i| i.distribution().name().len())
        .max()
        .unwrap_or(10)
        .max(header_dist.chars().count());

    println!(
        "{:<root_width$}  {:<dist_width$}  {}",
        header_root,
        header_dist,
        header_git,
        root_width = root_width,
        dist_width = dist_width,
    );
    println!("{}", "=".repeat(root_width + dist_width + 4 + 40));

    for install in installs {
        println!(
            "{:<root_width$}  {:<dist_width$}  {}",
            truncate(&install.to_string(), root_width),
            install.distribution().name(),
            install.git().display(),
            root_width = root_width,
            dist_width = dist_width,
        );
    }

    println!();
    let count = installs.len().to_string();
    println!(
        "{}",
        localizer.get("discovery-complete", Some(&[("count", count.as_str())]))
    );
}

/// Truncates a string to a maximum width, adding "..." if truncated
/// Unicode-safe version that respects character boundaries
fn truncate(s: &str, max_width: usize) -> String {
    let char_count = s.chars().count();

    if char_count <= max_width {
        s.to_string()
    } else if max_width <= 3 {
        "...".to_string()
    } else {
        s.chars().take(max_width - 3).collect::<String>() + "..."
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use git_where_core::RuntimeContext;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_check_command() {
        let cli = Cli::try_parse_from([
            "git-where",
            "check",
            r"C:\Git\cmd\git.exe",
            "gitforwindows64v2",
            "--json",
        ])
        .unwrap();

        assert!(cli.json);
        match cli.command {
            Command::Check { root, distribution } => {
                assert_eq!(root, PathBuf::from(r"C:\Git\cmd\git.exe"));
                assert_eq!(distribution, Distribution::GitForWindows64v2);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_check_rejects_unknown_distribution() {
        let result = Cli::try_parse_from(["git-where", "check", "/usr", "Cygwin"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_app_requires_a_name() {
        assert!(Cli::try_parse_from(["git-where", "app"]).is_err());
    }

    #[test]
    fn test_build_discovery_config() {
        let roots = vec![PathBuf::from("/opt/git")];
        let config = build_discovery_config(&roots, true, false, true);

        assert!(!config.use_search_path);
        assert!(config.use_well_known_roots);
        assert!(!config.use_environment_hints);
        assert_eq!(config.extra_roots, roots);

        assert_eq!(
            build_discovery_config(&[], false, false, false),
            DiscoveryConfig::default()
        );
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world", 8), "hello...");
        assert_eq!(truncate("hi", 2), "hi");
        assert_eq!(truncate(r"C:\Programme\Größe", 10), r"C:\Prog...");
    }

    fn install(root: &str, distribution: Distribution) -> Installation {
        Installation::resolve(Some(&RuntimeContext::system()), root, distribution).unwrap()
    }

    #[test]
    fn test_sort_by_root() {
        let mut installs = vec![
            install(r"D:\git", Distribution::GitForWindows64v2),
            install(r"c:\tools\git", Distribution::GitForWindows64v2),
            install(r"C:\Program Files\Git", Distribution::GitForWindows64v2),
        ];

        sort_installations(&mut installs, SortProfile::Root);

        let roots: Vec<String> = installs.iter().map(|i| i.to_string()).collect();
        assert_eq!(roots, vec![r"C:\Program Files\Git", r"c:\tools\git", r"D:\git"]);
    }

    #[test]
    fn test_sort_by_distribution_is_stable() {
        let mut installs = vec![
            install("/usr", Distribution::PosixLib),
            install("/opt/a", Distribution::Posix),
            install("/opt/b", Distribution::PosixLib),
            install("/opt/c", Distribution::Posix),
        ];

        sort_installations(&mut installs, SortProfile::Distribution);

        let roots: Vec<String> = installs.iter().map(|i| i.to_string()).collect();
        assert_eq!(roots, vec!["/opt/a", "/opt/c", "/usr", "/opt/b"]);
    }

    #[test]
    fn test_sort_discovery_keeps_order() {
        let mut installs = vec![
            install("/usr/local", Distribution::Posix),
            install("/usr", Distribution::PosixLib),
        ];
        sort_installations(&mut installs, SortProfile::Discovery);
        assert_eq!(installs[0].to_string(), "/usr/local");
    }
}
