//! Locate results and their plain-text rendering.

use std::fmt;

use camino::Utf8PathBuf;
use mender_syntax::StructureKind;

/// Why an expanded range has the bounds it has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RangeOrigin {
    /// The match lies inside a function or class.
    Structure(StructureKind),
    /// Fixed-width window around the match.
    Window,
}

/// Lines shown for one match, 1-indexed and inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExpandedRange {
    /// First line.
    pub start_line: usize,
    /// Last line.
    pub end_line: usize,
    /// How the bounds were chosen.
    pub origin: RangeOrigin,
}

/// One keyword occurrence and the excerpt around it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hit {
    /// Line containing the keyword (1-indexed).
    pub anchor_line: usize,
    /// Lines shown for the match.
    pub range: ExpandedRange,
    /// Numbered text of `range`.
    pub excerpt: String,
}

/// Matches for one keyword in ascending line order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordMatches {
    /// The keyword.
    pub keyword: String,
    /// Kept matches.
    pub hits: Vec<Hit>,
}

/// Keyword search result for one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocateResult {
    /// Repository-relative path.
    pub path: Utf8PathBuf,
    /// Numbered leading lines of the file.
    pub leading: String,
    /// Matches per keyword, in request order.
    pub matches: Vec<KeywordMatches>,
}

/// Explicit line range of a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeExcerpt {
    /// Repository-relative path.
    pub path: Utf8PathBuf,
    /// First line shown after clamping.
    pub start_line: usize,
    /// Last line shown after clamping.
    pub end_line: usize,
    /// Numbered text.
    pub text: String,
}

/// What a locate call found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Excerpt {
    /// An explicit line range.
    Range(RangeExcerpt),
    /// Keyword matches.
    Keywords(LocateResult),
}

/// Outcome of a locate call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Located {
    /// Lines to show the caller.
    Excerpt(Excerpt),
    /// No keyword occurs in the file.
    NothingFound {
        /// Repository-relative path.
        path: Utf8PathBuf,
        /// Keywords searched for.
        keywords: Vec<String>,
    },
}

impl Located {
    /// Returns whether the call found nothing.
    #[must_use]
    pub const fn is_nothing_found(&self) -> bool {
        matches!(self, Self::NothingFound { .. })
    }
}

/// Text returned when no keyword matched.
pub const NOTHING_FOUND_MESSAGE: &str =
    "No keyword found in the file, please check the keyword again or use the start and end line instead";

fn write_block(f: &mut fmt::Formatter<'_>, text: &str) -> fmt::Result {
    f.write_str(text)?;
    if !text.is_empty() && !text.ends_with('\n') {
        f.write_str("\n")?;
    }
    Ok(())
}

impl fmt::Display for RangeExcerpt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "The content of {} from line {} to {} is:",
            self.path, self.start_line, self.end_line
        )?;
        write_block(f, &self.text)
    }
}

impl fmt::Display for LocateResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "The content of {} is:", self.path)?;
        write_block(f, &self.leading)?;
        for keyword in &self.matches {
            writeln!(f)?;
            if keyword.hits.is_empty() {
                writeln!(f, "No matches for keyword: {}", keyword.keyword)?;
                continue;
            }
            writeln!(f, "Results for keyword: {}", keyword.keyword)?;
            let mut shown: Vec<ExpandedRange> = Vec::new();
            for hit in &keyword.hits {
                if shown.contains(&hit.range) {
                    continue;
                }
                shown.push(hit.range);
                writeln!(f, "...")?;
                write_block(f, &hit.excerpt)?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for Located {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Excerpt(Excerpt::Range(range)) => range.fmt(f),
            Self::Excerpt(Excerpt::Keywords(result)) => result.fmt(f),
            Self::NothingFound { .. } => f.write_str(NOTHING_FOUND_MESSAGE),
        }
    }
}
