//! Tree-sitter parsing wrapper.
//!
//! Tree-sitter is error tolerant: a [`ParsedSource`] always carries a tree,
//! and syntax problems show up as `ERROR` or missing nodes inside it.

use crate::error::SyntaxError;
use crate::language::SourceLanguage;

/// Result of parsing one source text.
#[derive(Debug)]
pub struct ParsedSource {
    tree: tree_sitter::Tree,
    source: String,
    language: SourceLanguage,
}

impl ParsedSource {
    /// Returns the parsed syntax tree.
    #[must_use]
    pub const fn tree(&self) -> &tree_sitter::Tree {
        &self.tree
    }

    /// Returns the source that was parsed.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns the language of the parsed source.
    #[must_use]
    pub const fn language(&self) -> SourceLanguage {
        self.language
    }

    /// Returns the root node of the tree.
    #[must_use]
    pub fn root_node(&self) -> tree_sitter::Node<'_> {
        self.tree.root_node()
    }

    /// Returns whether the tree contains any error or missing nodes.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.tree.root_node().has_error()
    }

    /// Collects every error or missing node in document order.
    #[must_use]
    pub fn errors(&self) -> Vec<SyntaxDiagnostic> {
        let mut errors = Vec::new();
        let mut cursor = self.tree.walk();
        loop {
            let node = cursor.node();
            if node.is_error() || node.is_missing() {
                errors.push(SyntaxDiagnostic::from_node(node, &self.source));
            }
            // Error subtrees are reported once, at their outermost node.
            let descend = node.has_error() && !node.is_error();
            if descend && cursor.goto_first_child() {
                continue;
            }
            if !advance_past(&mut cursor) {
                break;
            }
        }
        errors
    }
}

/// Moves the cursor to the next sibling, climbing as needed.
///
/// Returns `false` once the walk has returned to the root.
pub(crate) fn advance_past(cursor: &mut tree_sitter::TreeCursor<'_>) -> bool {
    loop {
        if cursor.goto_next_sibling() {
            return true;
        }
        if !cursor.goto_parent() {
            return false;
        }
    }
}

/// A syntax problem found in a parse tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxDiagnostic {
    /// Line number (one-based) where the problem starts.
    pub line: usize,
    /// Column number (one-based) where the problem starts.
    pub column: usize,
    /// Human-readable description.
    pub message: String,
    /// Snippet of the offending source, truncated when long.
    pub context: String,
}

impl SyntaxDiagnostic {
    fn from_node(node: tree_sitter::Node<'_>, source: &str) -> Self {
        let start = node.start_position();
        let context = source
            .get(node.byte_range())
            .map(|text| {
                if text.chars().count() > 50 {
                    let truncated: String = text.chars().take(47).collect();
                    format!("{truncated}...")
                } else {
                    text.to_owned()
                }
            })
            .unwrap_or_default();

        let message = if node.is_missing() {
            format!("missing {}", node.kind())
        } else {
            "invalid syntax".to_owned()
        };

        Self {
            line: start.row.saturating_add(1),
            column: start.column.saturating_add(1),
            message,
            context,
        }
    }
}

/// Tree-sitter parser configured for one language.
pub struct SourceParser {
    inner: tree_sitter::Parser,
    language: SourceLanguage,
}

impl SourceParser {
    /// Creates a parser for the given language.
    ///
    /// # Errors
    ///
    /// Returns an error if the grammar cannot be loaded into the parser.
    pub fn new(language: SourceLanguage) -> Result<Self, SyntaxError> {
        let mut inner = tree_sitter::Parser::new();
        inner
            .set_language(&language.grammar())
            .map_err(|e| SyntaxError::parser_init(language, e.to_string()))?;
        Ok(Self { inner, language })
    }

    /// Returns the language this parser handles.
    #[must_use]
    pub const fn language(&self) -> SourceLanguage {
        self.language
    }

    /// Parses source text.
    ///
    /// # Errors
    ///
    /// Returns an error if Tree-sitter fails to produce a tree at all.
    pub fn parse(&mut self, source: &str) -> Result<ParsedSource, SyntaxError> {
        let tree = self
            .inner
            .parse(source, None)
            .ok_or_else(|| SyntaxError::parse(self.language, "parsing failed"))?;
        Ok(ParsedSource {
            tree,
            source: source.to_owned(),
            language: self.language,
        })
    }
}

impl std::fmt::Debug for SourceParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceParser")
            .field("language", &self.language)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(SourceLanguage::Rust, "fn main() {}")]
    #[case(SourceLanguage::Python, "def hello():\n    pass\n")]
    #[case(SourceLanguage::TypeScript, "function hello(): string { return 'hi'; }")]
    fn parses_valid_source(#[case] language: SourceLanguage, #[case] source: &str) {
        let mut parser = SourceParser::new(language).expect("parser init");
        let parsed = parser.parse(source).expect("parse");

        assert!(!parsed.has_errors());
        assert!(parsed.errors().is_empty());
        assert_eq!(parsed.language(), language);
    }

    #[rstest]
    #[case(SourceLanguage::Rust, "fn broken() {")]
    #[case(SourceLanguage::Python, "def broken(:\n    pass\n")]
    #[case(SourceLanguage::TypeScript, "function broken( {")]
    fn reports_syntax_errors(#[case] language: SourceLanguage, #[case] source: &str) {
        let mut parser = SourceParser::new(language).expect("parser init");
        let parsed = parser.parse(source).expect("parse");

        assert!(parsed.has_errors());
        assert!(!parsed.errors().is_empty());
    }

    #[test]
    fn diagnostics_use_one_based_positions() {
        let mut parser = SourceParser::new(SourceLanguage::Rust).expect("parser init");
        let parsed = parser.parse("fn test() {\n    let x = \n}").expect("parse");

        let first = parsed.errors().into_iter().next().expect("has error");
        assert!(first.line >= 1);
        assert!(first.column >= 1);
    }
}
