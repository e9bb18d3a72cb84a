//! Search dispatch
//!
//! Turns the toolchain and dependencies of an EasyConfig into queries and
//! runs the external search tool once per query, in order. The tool's own
//! output goes straight to the terminal.

use std::io::Write;
use std::process::Command;

use colored::Colorize;

use crate::config::SearchConfig;
use crate::easyconfig::EasyConfig;
use crate::error::{EcdepsError, Result};
use crate::package::{Dependency, Toolchain};

/// A single search to run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    /// Text passed to `--search`
    pub text: String,

    /// What the query was derived from ("toolchain", "dependency", ...)
    pub label: String,
}

impl SearchQuery {
    fn from_parts(name: &str, version: &str, name_only: bool, label: String) -> Self {
        let text = if name_only || version.is_empty() {
            name.to_string()
        } else {
            format!("{}-{}", name, version)
        };
        Self { text, label }
    }

    pub fn for_toolchain(toolchain: &Toolchain, name_only: bool) -> Self {
        Self::from_parts(
            &toolchain.name,
            &toolchain.version,
            name_only,
            "toolchain".to_string(),
        )
    }

    pub fn for_dependency(dependency: &Dependency, name_only: bool) -> Self {
        Self::from_parts(
            &dependency.name,
            &dependency.version,
            name_only,
            dependency.dep_type.to_string(),
        )
    }
}

impl std::fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.label, self.text)
    }
}

/// Something that can run a search query
pub trait Searcher {
    /// Run one query.
    ///
    /// Returns `SearchFailed` when the search ran but reported failure, and
    /// `ExecutableNotFound` when it could not be started at all.
    fn search(&mut self, query: &SearchQuery) -> Result<()>;
}

/// Runs EasyBuild's `eb --search` as a subprocess
#[derive(Debug, Clone)]
pub struct EbSearcher {
    config: SearchConfig,
    dry_run: bool,
}

impl EbSearcher {
    pub fn new(config: SearchConfig) -> Self {
        Self {
            config,
            dry_run: false,
        }
    }

    /// Print commands instead of running them
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Arguments passed to the search executable for `query`
    pub fn args(&self, query: &SearchQuery) -> Vec<String> {
        let mut args = vec!["--search".to_string(), query.text.clone()];

        if !self.config.robot_paths.is_empty() {
            let paths: Vec<String> = self
                .config
                .robot_paths
                .iter()
                .map(|p| p.display().to_string())
                .collect();
            args.push(format!("--robot-paths={}", paths.join(":")));
        }

        args.extend(self.config.extra_args.iter().cloned());
        args
    }
}

impl Searcher for EbSearcher {
    fn search(&mut self, query: &SearchQuery) -> Result<()> {
        let args = self.args(query);

        if self.dry_run {
            println!("  {} {}", self.config.command, args.join(" "));
            return Ok(());
        }

        tracing::debug!("Running {} {:?}", self.config.command, args);

        // Keep our header ahead of the child's output
        std::io::stdout().flush()?;

        let status = Command::new(&self.config.command)
            .args(&args)
            .status()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => {
                    EcdepsError::ExecutableNotFound(self.config.command.clone())
                }
                _ => EcdepsError::Io(e),
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(EcdepsError::SearchFailed {
                query: query.text.clone(),
                status: status.to_string(),
            })
        }
    }
}

/// Outcome of a dispatch run
#[derive(Debug, Default)]
pub struct DispatchReport {
    /// Queries that completed
    pub succeeded: Vec<SearchQuery>,
    /// Queries that failed, with the reason
    pub failed: Vec<(SearchQuery, String)>,
}

impl DispatchReport {
    pub fn all_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }
}

/// Issues one search per toolchain/dependency
pub struct SearchDispatcher<S: Searcher> {
    searcher: S,
    name_only: bool,
}

impl<S: Searcher> SearchDispatcher<S> {
    pub fn new(searcher: S, name_only: bool) -> Self {
        Self {
            searcher,
            name_only,
        }
    }

    /// Queries for `config`: the toolchain first, then each dependency in file order
    pub fn queries(&self, config: &EasyConfig) -> Vec<SearchQuery> {
        let toolchain = config
            .toolchain
            .as_ref()
            .filter(|tc| !tc.is_system())
            .map(|tc| SearchQuery::for_toolchain(tc, self.name_only));

        toolchain
            .into_iter()
            .chain(
                config
                    .dependencies
                    .iter()
                    .map(|dep| SearchQuery::for_dependency(dep, self.name_only)),
            )
            .collect()
    }

    /// Run every query in order.
    ///
    /// A failed search is reported and the next one is attempted. A missing
    /// search executable aborts the run.
    pub fn dispatch(&mut self, config: &EasyConfig) -> Result<DispatchReport> {
        let mut report = DispatchReport::default();

        for query in self.queries(config) {
            println!();
            println!(
                "{} {} {}",
                "==>".cyan().bold(),
                format!("[{}]", query.label).dimmed(),
                query.text.bold()
            );

            match self.searcher.search(&query) {
                Ok(()) => report.succeeded.push(query),
                Err(e) if !e.is_fatal() => {
                    tracing::debug!("Search failed for {}: {}", query, e);
                    eprintln!("  {} {}: {}", "✗".red(), query.to_string().bold(), e);
                    let reason = e.to_string();
                    report.failed.push((query, reason));
                }
                Err(e) => return Err(e),
            }
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::package::DependencyType;
    use std::path::PathBuf;

    /// Records queries; fails those whose text is listed in `fail`
    #[derive(Default)]
    struct RecordingSearcher {
        seen: Vec<String>,
        fail: Vec<String>,
        missing: bool,
    }

    impl Searcher for RecordingSearcher {
        fn search(&mut self, query: &SearchQuery) -> Result<()> {
            if self.missing {
                return Err(EcdepsError::ExecutableNotFound("eb".to_string()));
            }
            self.seen.push(query.text.clone());
            if self.fail.contains(&query.text) {
                return Err(EcdepsError::SearchFailed {
                    query: query.text.clone(),
                    status: "exit status: 1".to_string(),
                });
            }
            Ok(())
        }
    }

    fn dep(name: &str, version: &str, dep_type: DependencyType) -> Dependency {
        Dependency {
            name: name.to_string(),
            version: version.to_string(),
            versionsuffix: None,
            dep_type,
        }
    }

    fn easyconfig(toolchain: Option<Toolchain>, dependencies: Vec<Dependency>) -> EasyConfig {
        EasyConfig {
            path: PathBuf::from("test.eb"),
            toolchain,
            dep_type: DependencyType::Runtime,
            dependencies,
        }
    }

    #[test]
    fn test_toolchain_searched_before_dependencies() {
        let config = easyconfig(
            Some(Toolchain::new("GCC", "12.3.0")),
            vec![
                dep("foo", "1.2", DependencyType::Runtime),
                dep("bar", "3.4", DependencyType::Runtime),
            ],
        );
        let mut dispatcher = SearchDispatcher::new(RecordingSearcher::default(), false);
        let report = dispatcher.dispatch(&config).unwrap();

        assert_eq!(
            dispatcher.searcher.seen,
            vec!["GCC-12.3.0", "foo-1.2", "bar-3.4"]
        );
        assert_eq!(report.total(), 3);
        assert!(report.all_success());
    }

    #[test]
    fn test_system_toolchain_not_searched() {
        let config = easyconfig(
            Some(Toolchain::system()),
            vec![dep("zlib", "1.2.13", DependencyType::Runtime)],
        );
        let dispatcher = SearchDispatcher::new(RecordingSearcher::default(), false);
        let queries = dispatcher.queries(&config);
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].label, "dependency");
    }

    #[test]
    fn test_name_only_and_empty_version() {
        let foo = dep("foo", "1.2", DependencyType::Build);
        assert_eq!(SearchQuery::for_dependency(&foo, true).text, "foo");
        assert_eq!(SearchQuery::for_dependency(&foo, false).label, "builddependency");

        let bare = dep("bar", "", DependencyType::Runtime);
        assert_eq!(SearchQuery::for_dependency(&bare, false).text, "bar");
    }

    #[test]
    fn test_failed_search_does_not_stop_run() {
        let config = easyconfig(
            None,
            vec![
                dep("foo", "1.2", DependencyType::Runtime),
                dep("bar", "3.4", DependencyType::Runtime),
            ],
        );
        let searcher = RecordingSearcher {
            fail: vec!["foo-1.2".to_string()],
            ..Default::default()
        };
        let mut dispatcher = SearchDispatcher::new(searcher, false);
        let report = dispatcher.dispatch(&config).unwrap();

        assert_eq!(dispatcher.searcher.seen, vec!["foo-1.2", "bar-3.4"]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0.text, "foo-1.2");
        assert_eq!(report.succeeded.len(), 1);
    }

    #[test]
    fn test_missing_executable_aborts() {
        let config = easyconfig(None, vec![dep("foo", "1.2", DependencyType::Runtime)]);
        let searcher = RecordingSearcher {
            missing: true,
            ..Default::default()
        };
        let mut dispatcher = SearchDispatcher::new(searcher, false);
        let err = dispatcher.dispatch(&config).unwrap_err();
        assert!(matches!(err, EcdepsError::ExecutableNotFound(_)));
    }

    #[test]
    fn test_eb_args_include_robot_paths_and_extras() {
        let searcher = EbSearcher::new(SearchConfig {
            command: "eb".to_string(),
            extra_args: vec!["--terse".to_string()],
            robot_paths: vec![PathBuf::from("/a"), PathBuf::from("/b")],
            name_only: false,
        });
        let query = SearchQuery {
            text: "zlib-1.2.13".to_string(),
            label: "dependency".to_string(),
        };
        assert_eq!(
            searcher.args(&query),
            vec!["--search", "zlib-1.2.13", "--robot-paths=/a:/b", "--terse"]
        );
    }

    #[test]
    fn test_eb_searcher_missing_executable() {
        let mut searcher = EbSearcher::new(SearchConfig {
            command: "ecdeps-no-such-search-tool".to_string(),
            ..Default::default()
        });
        let query = SearchQuery {
            text: "zlib".to_string(),
            label: "dependency".to_string(),
        };
        let err = searcher.search(&query).unwrap_err();
        assert!(matches!(err, EcdepsError::ExecutableNotFound(_)));
    }
}
