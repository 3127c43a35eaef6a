//! Recursive-descent parser for the SGF record text format.
//!
//! The parser only builds the abstract node/property tree; interpreting the
//! properties as moves, setup stones and markup is done by [`crate::load`].
//!
//! ```text
//! Collection := GameTree+
//! GameTree   := '(' Sequence GameTree* ')'
//! Sequence   := Node+
//! Node       := ';' Property*
//! Property   := UPPERCASE-ID Value+
//! Value      := '[' Text ']'
//! ```

use thiserror::Error;

/// A structural error in record text. Parsing stops at the first one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at offset {offset}")]
pub struct ParseError {
    pub message: String,
    /// Character (not byte) offset of the offending character.
    pub offset: usize,
}

/// A property id with its values, as read from the text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Property {
    pub id: String,
    pub values: Vec<String>,
}

impl Property {
    /// All values joined with commas and trimmed.
    pub fn joined(&self) -> String {
        self.values.join(",").trim().to_string()
    }
}

/// A parsed node: its properties in text order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SgfNode {
    pub props: Vec<Property>,
}

impl SgfNode {
    /// First property with the given id, if any.
    pub fn prop(&self, id: &str) -> Option<&Property> {
        self.props.iter().find(|p| p.id == id)
    }
}

/// A parenthesized game tree: a sequence of nodes, then its variations.
///
/// The sequence is stored flat, so nesting grows only with parentheses,
/// never with the length of a line of play. Each variation continues from
/// the last node of the sequence. The parser never produces an empty
/// sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SgfTree {
    pub nodes: Vec<SgfNode>,
    pub variations: Vec<SgfTree>,
}

impl SgfTree {
    /// The first node of the sequence.
    pub fn root(&self) -> Option<&SgfNode> {
        self.nodes.first()
    }
}

/// Parse the first game tree found in `text`.
///
/// Text before the first `(` is skipped, as is anything after the closing
/// parenthesis of that tree.
pub fn parse(text: &str) -> Result<SgfTree, ParseError> {
    let mut parser = Parser::new(text);
    parser.find_open_paren();
    parser.parse_tree()
}

/// Parse every game tree of a collection. At least one tree is required.
pub fn parse_collection(text: &str) -> Result<Vec<SgfTree>, ParseError> {
    let mut parser = Parser::new(text);
    parser.find_open_paren();
    let mut trees = vec![parser.parse_tree()?];
    parser.skip_white();
    while parser.peek() == Some('(') {
        trees.push(parser.parse_tree()?);
        parser.skip_white();
    }
    Ok(trees)
}

struct Parser {
    text: Vec<char>,
    at: usize,
}

impl Parser {
    fn new(text: &str) -> Self {
        Self {
            text: text.chars().collect(),
            at: 0,
        }
    }

    #[inline]
    fn peek(&self) -> Option<char> {
        self.text.get(self.at).copied()
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError {
            message: message.into(),
            offset: self.at,
        }
    }

    /// Consume `want`, or fail if the current character is anything else.
    fn expect(&mut self, want: char) -> Result<(), ParseError> {
        match self.peek() {
            Some(c) if c == want => {
                self.at += 1;
                Ok(())
            }
            Some(c) => Err(self.error(format!("expected '{want}' instead of '{c}'"))),
            None => Err(self.error(format!("expected '{want}' instead of end of input"))),
        }
    }

    fn skip_white(&mut self) {
        while matches!(self.peek(), Some(c) if c <= ' ') {
            self.at += 1;
        }
    }

    fn find_open_paren(&mut self) {
        while matches!(self.peek(), Some(c) if c != '(') {
            self.at += 1;
        }
    }

    /// Check for a line break (LF, CR, CRLF or LFCR) at the cursor.
    ///
    /// For two-character breaks the cursor is left on the second character,
    /// so the caller's single advance consumes the whole break.
    fn line_break(&mut self) -> bool {
        let next = self.text.get(self.at + 1).copied();
        match self.peek() {
            Some('\n') => {
                if next == Some('\r') {
                    self.at += 1;
                }
                true
            }
            Some('\r') => {
                if next == Some('\n') {
                    self.at += 1;
                }
                true
            }
            _ => false,
        }
    }

    fn parse_tree(&mut self) -> Result<SgfTree, ParseError> {
        self.expect('(')?;
        self.skip_white();
        if self.peek() != Some(';') {
            return Err(self.error("sub-tree missing root"));
        }

        let mut tree = SgfTree::default();
        while self.peek() == Some(';') {
            tree.nodes.push(self.parse_node()?);
            self.skip_white();
        }
        while self.peek() == Some('(') {
            tree.variations.push(self.parse_tree()?);
            self.skip_white();
        }
        self.expect(')')?;
        Ok(tree)
    }

    fn parse_node(&mut self) -> Result<SgfNode, ParseError> {
        self.expect(';')?;
        self.skip_white();
        let mut node = SgfNode::default();
        while matches!(self.peek(), Some(c) if c != ';' && c != '(' && c != ')') {
            node.props.push(self.parse_property()?);
            self.skip_white();
        }
        Ok(node)
    }

    fn parse_property(&mut self) -> Result<Property, ParseError> {
        let mut property = Property::default();

        // Lowercase letters are tolerated inside ids but not kept.
        while let Some(c) = self.peek().filter(char::is_ascii_alphabetic) {
            if c.is_ascii_uppercase() {
                property.id.push(c);
            }
            self.at += 1;
        }
        if property.id.is_empty() {
            return Err(self.error("missing property id"));
        }

        self.skip_white();
        while self.peek() == Some('[') {
            property.values.push(self.parse_value()?);
            self.skip_white();
        }
        if property.values.is_empty() {
            return Err(self.error("missing property values"));
        }
        Ok(property)
    }

    fn parse_value(&mut self) -> Result<String, ParseError> {
        self.expect('[')?;
        let mut value = String::new();

        while let Some(c) = self.peek() {
            if c == ']' {
                break;
            }
            if c == '\\' {
                self.at += 1;
                if self.line_break() {
                    // Soft line break: removed entirely.
                } else {
                    match self.peek() {
                        Some(e) if e <= ' ' => value.push(' '),
                        Some(e) => value.push(e),
                        None => break,
                    }
                }
            } else if self.line_break() {
                value.push('\n');
            } else if c <= ' ' {
                value.push(' ');
            } else {
                value.push(c);
            }
            self.at += 1;
        }
        self.expect(']')?;
        Ok(value)
    }
}
