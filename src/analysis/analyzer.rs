//! Analysis orchestration: load, scan, detect, measure.

use std::collections::BTreeMap;
use std::path::Path;

use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::{Config, Heuristics};
use crate::detect::{Runner, TypeGraph};
use crate::metrics::{abstractness_ratio, derive, FileMetrics};

use super::extract::scan_file;
use super::facts::{SourceFile, TypeDeclaration};
use super::loader::{ContentLoader, LoadError};
use super::result::{AnalysisResult, SkippedFile, TypeReport};

/// Errors that abort an analysis run.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("none of the {attempted} candidate files could be read; first failure: {first}")]
    NoReadableFiles {
        attempted: usize,
        #[source]
        first: LoadError,
    },
}

/// Runs the full pipeline over a list of files.
#[derive(Debug, Clone)]
pub struct Analyzer {
    extensions: Vec<String>,
    heuristics: Heuristics,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self {
            extensions: vec!["java".to_string()],
            heuristics: Heuristics::default(),
        }
    }
}

impl Analyzer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an analyzer from a config file's extensions and heuristics.
    pub fn from_config(config: &Config) -> Self {
        Self {
            extensions: config.extensions.clone(),
            heuristics: config.heuristics.clone(),
        }
    }

    /// Set which file extensions are analyzed.
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    /// Set the scanner windows and limits.
    pub fn with_heuristics(mut self, heuristics: Heuristics) -> Self {
        self.heuristics = heuristics;
        self
    }

    fn is_candidate(&self, path: &str) -> bool {
        let ext = Path::new(path)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("");
        self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext))
    }

    /// Analyze `paths`, fetching each candidate through `loader`.
    ///
    /// Files that fail to load are skipped and listed in the result. Having
    /// no candidate files is not an error and yields an empty result; having
    /// candidates that all fail to load is.
    pub fn analyze<S, L>(&self, paths: &[S], loader: &L) -> Result<AnalysisResult, AnalysisError>
    where
        S: AsRef<str>,
        L: ContentLoader + ?Sized,
    {
        let file_paths: Vec<String> = paths.iter().map(|p| p.as_ref().to_string()).collect();
        let candidates: Vec<&str> = file_paths
            .iter()
            .map(String::as_str)
            .filter(|p| self.is_candidate(p))
            .collect();

        if candidates.is_empty() {
            debug!(paths = file_paths.len(), "no candidate files");
            return Ok(AnalysisResult::empty(file_paths));
        }

        let mut sources = Vec::with_capacity(candidates.len());
        let mut skipped = Vec::new();
        let mut first_error = None;
        for path in &candidates {
            match loader.load(path) {
                Ok(raw) => sources.push(SourceFile::new(*path, raw)),
                Err(e) => {
                    warn!(path = %path, error = %e, "skipping unreadable file");
                    skipped.push(SkippedFile {
                        path: path.to_string(),
                        reason: e.to_string(),
                    });
                    first_error.get_or_insert(e);
                }
            }
        }

        if sources.is_empty() {
            if let Some(first) = first_error {
                return Err(AnalysisError::NoReadableFiles {
                    attempted: candidates.len(),
                    first,
                });
            }
        }

        let files: BTreeMap<String, FileMetrics> = sources
            .iter()
            .map(|f| (f.name.clone(), FileMetrics::measure_sanitized(&f.raw, &f.sanitized)))
            .collect();

        let declarations: Vec<TypeDeclaration> = sources
            .par_iter()
            .flat_map_iter(|f| scan_file(f, &self.heuristics))
            .collect();
        debug!(declarations = declarations.len(), "declarations extracted");

        let mut graph = TypeGraph::new(declarations);
        Runner::new(self.heuristics.clone()).run(&mut graph);

        let abstractness = abstractness_ratio(graph.entries().map(|(_, e)| e.kind));
        let types: BTreeMap<String, TypeReport> = graph
            .into_entries()
            .into_iter()
            .map(|(name, e)| {
                let metrics = derive(e.kind, &e.coupling, abstractness);
                let report = TypeReport {
                    kind: e.kind,
                    file: e.file,
                    relations: e.relations,
                    coupling: e.coupling,
                    metrics,
                };
                (name, report)
            })
            .collect();

        info!(
            files = files.len(),
            skipped = skipped.len(),
            types = types.len(),
            "analysis complete"
        );

        Ok(AnalysisResult {
            files,
            types,
            abstractness,
            file_paths,
            skipped,
        })
    }
}

/// Analyze `paths` with default settings.
pub fn analyze<S, L>(paths: &[S], loader: &L) -> Result<AnalysisResult, AnalysisError>
where
    S: AsRef<str>,
    L: ContentLoader + ?Sized,
{
    Analyzer::default().analyze(paths, loader)
}
