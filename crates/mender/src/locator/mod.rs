//! Keyword- and range-based code location.
//!
//! The [`Locator`] turns a [`LocateRequest`] into a numbered excerpt. Line
//! numbers in every excerpt are absolute, so a caller can feed them straight
//! into an edit request. Keyword matches expand to the innermost enclosing
//! function or class, or to a fixed window when no structure contains them.

mod error;
mod request;
mod result;

use std::path::Path;
use std::sync::Arc;

use mender_config::Config;
use mender_syntax::CodeStructureIndex;
use tracing::{debug, info};

use crate::line_index::LineIndex;
use crate::workspace::Workspace;

pub use error::LocateError;
pub use request::LocateRequest;
pub use result::{
    ExpandedRange, Excerpt, Hit, KeywordMatches, LocateResult, Located, NOTHING_FOUND_MESSAGE,
    RangeExcerpt, RangeOrigin,
};

/// Tracing target for locator activity.
const LOCATOR_TARGET: &str = "mender::locator";

/// Source of structural ranges for a file snapshot.
pub trait StructureSource: Send + Sync {
    /// Computes the ranges for `source`, the content of `path`.
    ///
    /// Implementations degrade to an empty index instead of failing.
    fn index(&self, path: &Path, source: &str) -> CodeStructureIndex;
}

/// Structure source backed by the bundled tree-sitter grammars.
#[derive(Debug, Default, Clone, Copy)]
pub struct TreeSitterStructure;

impl StructureSource for TreeSitterStructure {
    fn index(&self, path: &Path, source: &str) -> CodeStructureIndex {
        CodeStructureIndex::for_path(path, source)
    }
}

/// Limits and defaults applied to locate requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocatorSettings {
    /// Widest explicit range, measured as `end - start`.
    pub max_window_lines: usize,
    /// Leading lines shown before keyword results.
    pub leading_context_lines: usize,
    /// Window half-width when a request sets none.
    pub default_preview_size: usize,
    /// Per-keyword match limit when a request sets none.
    pub default_max_results: usize,
}

impl Default for LocatorSettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for LocatorSettings {
    fn from(config: &Config) -> Self {
        Self {
            max_window_lines: config.max_window_lines(),
            leading_context_lines: config.leading_context_lines(),
            default_preview_size: config.default_preview_size(),
            default_max_results: config.default_max_results(),
        }
    }
}

/// Read-only view over a repository for locate calls.
#[derive(Clone)]
pub struct Locator {
    workspace: Workspace,
    settings: LocatorSettings,
    structure: Arc<dyn StructureSource>,
}

impl std::fmt::Debug for Locator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Locator")
            .field("workspace", &self.workspace)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl Locator {
    /// Creates a locator using tree-sitter structure ranges.
    #[must_use]
    pub fn new(workspace: Workspace, settings: LocatorSettings) -> Self {
        Self {
            workspace,
            settings,
            structure: Arc::new(TreeSitterStructure),
        }
    }

    /// Replaces the structure source.
    #[must_use]
    pub fn with_structure_source(mut self, structure: Arc<dyn StructureSource>) -> Self {
        self.structure = structure;
        self
    }

    /// Settings in effect.
    #[must_use]
    pub const fn settings(&self) -> &LocatorSettings {
        &self.settings
    }

    /// Resolves a locate request.
    ///
    /// An explicit range takes precedence over keywords.
    ///
    /// # Errors
    ///
    /// Returns [`LocateError`] for malformed queries, out-of-range bounds,
    /// and unreadable or missing files.
    pub fn locate(&self, request: &LocateRequest) -> Result<Located, LocateError> {
        let has_keywords = request.effective_keywords().next().is_some();
        match (request.start_line, request.end_line) {
            (Some(start), Some(end)) => self.locate_range(request, start, end),
            (None, None) if !has_keywords => Err(LocateError::MissingQuery),
            (Some(_), None) | (None, Some(_)) if !has_keywords => {
                Err(LocateError::IncompleteRange)
            }
            _ => self.locate_keywords(request),
        }
    }

    fn load(&self, request: &LocateRequest) -> Result<LineIndex, LocateError> {
        let absolute = self.workspace.resolve(&request.relative_file_path)?;
        LineIndex::load(absolute.as_std_path()).map_err(|source| LocateError::Read {
            path: request.relative_file_path.clone(),
            source: Arc::new(source),
        })
    }

    fn locate_range(
        &self,
        request: &LocateRequest,
        start: usize,
        end: usize,
    ) -> Result<Located, LocateError> {
        // A missing file outranks any complaint about the bounds.
        let index = self.load(request)?;
        if start > end {
            return Err(LocateError::InvertedRange { start, end });
        }
        let width = end - start;
        if width > self.settings.max_window_lines {
            return Err(LocateError::WindowTooWide {
                start,
                end,
                width,
                max: self.settings.max_window_lines,
            });
        }

        let (requested_start, requested_end) = (start, end);
        let start = start.max(1);
        let end = end.min(index.len());
        if start > index.len() {
            return Err(LocateError::StartBeyondEnd {
                start,
                line_count: index.len(),
            });
        }
        if start > end {
            return Err(LocateError::EmptyRange {
                start: requested_start,
                end: requested_end,
            });
        }

        info!(
            target: LOCATOR_TARGET,
            path = %request.relative_file_path,
            start,
            end,
            "range located"
        );
        Ok(Located::Excerpt(Excerpt::Range(RangeExcerpt {
            path: request.relative_file_path.clone(),
            start_line: start,
            end_line: end,
            text: index.numbered_slice(start, end),
        })))
    }

    fn locate_keywords(&self, request: &LocateRequest) -> Result<Located, LocateError> {
        let index = self.load(request)?;
        let preview = request
            .preview_size
            .unwrap_or(self.settings.default_preview_size);
        let limit = request
            .max_num_result
            .unwrap_or(self.settings.default_max_results);

        // One structure snapshot per call.
        let text = index.text();
        let structure = self
            .structure
            .index(request.relative_file_path.as_std_path(), &text);

        let matches: Vec<KeywordMatches> = request
            .effective_keywords()
            .map(|keyword| KeywordMatches {
                keyword: keyword.to_owned(),
                hits: find_hits(&index, &structure, keyword, preview, limit),
            })
            .collect();

        let total: usize = matches.iter().map(|m| m.hits.len()).sum();
        debug!(
            target: LOCATOR_TARGET,
            path = %request.relative_file_path,
            keywords = matches.len(),
            hits = total,
            structures = structure.ranges().len(),
            "keyword search finished"
        );
        if total == 0 {
            return Ok(Located::NothingFound {
                path: request.relative_file_path.clone(),
                keywords: matches.into_iter().map(|m| m.keyword).collect(),
            });
        }

        Ok(Located::Excerpt(Excerpt::Keywords(LocateResult {
            path: request.relative_file_path.clone(),
            leading: index.numbered_slice(1, self.settings.leading_context_lines),
            matches,
        })))
    }
}

fn find_hits(
    index: &LineIndex,
    structure: &CodeStructureIndex,
    keyword: &str,
    preview: usize,
    limit: usize,
) -> Vec<Hit> {
    index
        .lines()
        .iter()
        .enumerate()
        .filter(|(_, line)| line.contains(keyword))
        .take(limit)
        .map(|(anchor, _)| {
            let range = expand(anchor, index.len(), structure, preview);
            Hit {
                anchor_line: anchor + 1,
                range,
                excerpt: index.numbered_slice(range.start_line, range.end_line),
            }
        })
        .collect()
}

/// Expands a 0-indexed anchor into a 1-indexed inclusive range.
fn expand(
    anchor: usize,
    line_count: usize,
    structure: &CodeStructureIndex,
    preview: usize,
) -> ExpandedRange {
    if let Some(range) = structure.innermost_containing(anchor) {
        return ExpandedRange {
            start_line: range.start_line + 1,
            end_line: (range.end_line + 1).min(line_count),
            origin: RangeOrigin::Structure(range.kind),
        };
    }
    let last = line_count.saturating_sub(1);
    ExpandedRange {
        start_line: anchor.saturating_sub(preview) + 1,
        end_line: anchor.saturating_add(preview).min(last) + 1,
        origin: RangeOrigin::Window,
    }
}
