//! Structural ranges (functions and classes) of a source snapshot.
//!
//! A [`CodeStructureIndex`] is computed once per text snapshot. Any parse
//! problem degrades to an empty index, so callers can always fall back to
//! plain line windows.

use std::path::Path;

use crate::language::SourceLanguage;
use crate::parser::{SourceParser, advance_past};

/// Kind of structural unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StructureKind {
    /// A function or method.
    Function,
    /// A class or class-like container (impl, trait, interface, ...).
    Class,
}

impl StructureKind {
    /// Lower-case label for messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Function => "function",
            Self::Class => "class",
        }
    }
}

/// Line span of one structural unit, zero-based and inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StructuralRange {
    /// What kind of unit the range covers.
    pub kind: StructureKind,
    /// First line (zero-based).
    pub start_line: usize,
    /// Last line (zero-based, inclusive).
    pub end_line: usize,
    /// Declared name, when the grammar exposes one.
    pub name: Option<String>,
}

impl StructuralRange {
    /// Returns whether `line` (zero-based) falls inside the range.
    #[must_use]
    pub const fn contains(&self, line: usize) -> bool {
        self.start_line <= line && line <= self.end_line
    }

    /// Number of lines spanned.
    #[must_use]
    pub const fn span(&self) -> usize {
        self.end_line - self.start_line + 1
    }
}

/// Every structural range found in one source snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeStructureIndex {
    ranges: Vec<StructuralRange>,
}

impl CodeStructureIndex {
    /// Builds the index for `source` written in `language`.
    ///
    /// Parser failures and trees with syntax errors yield an empty index.
    #[must_use]
    pub fn build(source: &str, language: SourceLanguage) -> Self {
        Self {
            ranges: structural_ranges(source, language),
        }
    }

    /// Builds the index using the language implied by `path`.
    ///
    /// Unknown extensions yield an empty index.
    #[must_use]
    pub fn for_path(path: &Path, source: &str) -> Self {
        SourceLanguage::from_path(path)
            .map(|language| Self::build(source, language))
            .unwrap_or_default()
    }

    /// Ranges in document order.
    #[must_use]
    pub fn ranges(&self) -> &[StructuralRange] {
        &self.ranges
    }

    /// Returns whether no ranges were found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Returns the narrowest range containing `line` (zero-based).
    ///
    /// Ties on span go to functions.
    #[must_use]
    pub fn innermost_containing(&self, line: usize) -> Option<&StructuralRange> {
        self.ranges
            .iter()
            .filter(|range| range.contains(line))
            .min_by_key(|range| (range.span(), range.kind))
    }
}

/// Computes the structural ranges of `source`.
///
/// Returns an empty list when the source cannot be parsed cleanly.
#[must_use]
pub fn structural_ranges(source: &str, language: SourceLanguage) -> Vec<StructuralRange> {
    let Ok(mut parser) = SourceParser::new(language) else {
        return Vec::new();
    };
    let Ok(parsed) = parser.parse(source) else {
        return Vec::new();
    };
    if parsed.has_errors() {
        return Vec::new();
    }

    let mut ranges = Vec::new();
    let mut cursor = parsed.tree().walk();
    loop {
        let node = cursor.node();
        if let Some(range) = range_for(node, language, source) {
            ranges.push(range);
        }
        if !cursor.goto_first_child() && !advance_past(&mut cursor) {
            break;
        }
    }
    ranges
}

fn range_for(
    node: tree_sitter::Node<'_>,
    language: SourceLanguage,
    source: &str,
) -> Option<StructuralRange> {
    let (kind, named) = if language == SourceLanguage::Python && node.kind() == "decorated_definition"
    {
        let definition = node.child_by_field_name("definition")?;
        (language.structure_kind(definition.kind())?, definition)
    } else {
        // The decorated wrapper already covers this definition.
        if node
            .parent()
            .is_some_and(|parent| parent.kind() == "decorated_definition")
        {
            return None;
        }
        (language.structure_kind(node.kind())?, node)
    };

    let start_line = node.start_position().row;
    let end = node.end_position();
    let end_line = if end.column == 0 && end.row > start_line {
        end.row - 1
    } else {
        end.row
    };

    Some(StructuralRange {
        kind,
        start_line,
        end_line,
        name: declared_name(named, source),
    })
}

fn declared_name(node: tree_sitter::Node<'_>, source: &str) -> Option<String> {
    node.child_by_field_name("name")
        .or_else(|| node.child_by_field_name("type"))
        .and_then(|name| source.get(name.byte_range()))
        .map(str::to_owned)
}
