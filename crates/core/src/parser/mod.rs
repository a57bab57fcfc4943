//! Recursive-descent parser producing a full-fidelity [`SyntaxTree`].
//!
//! The parser only recovers the structure the refactoring tools need:
//! contracts and their members, declared names, parameter lists and the
//! brace structure of bodies. Statements and expressions stay flat token
//! runs inside `FunctionBody`/`Block` nodes.
//!
//! Leading trivia is attached outside the node that follows it, so a
//! node's range starts at its first significant token.

use crate::error::ParseError;
use crate::kinds::{NonterminalKind, TerminalKind};
use crate::lexer::{lex, Token};
use crate::text::TextRange;
use crate::tree::{SyntaxTree, TreeBuilder};

mod members;
mod source_unit;

/// What the input text is expected to contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseKind {
    /// A whole file.
    SourceUnit,
    /// Exactly one `contract` (optionally `abstract`) and nothing else but
    /// trivia. The tree root is still a `SourceUnit` wrapping it.
    ContractDefinition,
}

#[derive(Debug, Clone)]
pub struct ParseOutput {
    pub tree: SyntaxTree,
    pub errors: Vec<ParseError>,
}

impl ParseOutput {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

pub fn parse(kind: ParseKind, text: &str) -> ParseOutput {
    let (tokens, lex_errors) = lex(text);
    let mut parser = Parser::new(text, &tokens);
    parser.errors.extend(lex_errors);

    parser.builder.start_node(NonterminalKind::SourceUnit);
    match kind {
        ParseKind::SourceUnit => parser.source_unit(),
        ParseKind::ContractDefinition => parser.single_contract(),
    }
    parser.bump_trivia();
    parser.builder.finish_node();

    let mut errors = parser.errors;
    errors.sort_by_key(|e| e.range.start);
    ParseOutput {
        tree: parser.builder.finish(),
        errors,
    }
}

// ──────────────────────────────────────────────
// Parser
// ──────────────────────────────────────────────

pub(crate) struct Parser<'a> {
    text: &'a str,
    tokens: &'a [Token],
    /// Index of the next token not yet handed to the builder.
    pos: usize,
    builder: TreeBuilder,
    errors: Vec<ParseError>,
}

/// A significant token found by lookahead, with its bracket depth relative
/// to where the scan started.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Scanned {
    pub(crate) index: usize,
    pub(crate) depth: u32,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str, tokens: &'a [Token]) -> Self {
        Parser {
            text,
            tokens,
            pos: 0,
            builder: TreeBuilder::new(text),
            errors: Vec::new(),
        }
    }

    /// Index of the `n`th significant token at or after `pos`.
    fn nth_index(&self, n: usize) -> Option<usize> {
        (self.pos..self.tokens.len())
            .filter(|&i| !self.tokens[i].kind.is_trivia())
            .nth(n)
    }

    fn nth(&self, n: usize) -> Option<Token> {
        self.nth_index(n).map(|i| self.tokens[i])
    }

    fn peek(&self) -> Option<TerminalKind> {
        self.nth(0).map(|t| t.kind)
    }

    fn token_text(&self, token: Token) -> &'a str {
        token.range.slice(self.text)
    }

    fn at(&self, kind: TerminalKind) -> bool {
        self.peek() == Some(kind)
    }

    fn at_eof(&self) -> bool {
        self.peek().is_none()
    }

    /// True if the next significant token is `word` (keyword or contextual
    /// identifier).
    fn at_word(&self, word: &str) -> bool {
        self.nth_word(0, word)
    }

    fn nth_word(&self, n: usize, word: &str) -> bool {
        self.nth(n).is_some_and(|t| {
            matches!(t.kind, TerminalKind::Keyword | TerminalKind::Identifier)
                && self.token_text(t) == word
        })
    }

    fn nth_kind(&self, n: usize) -> Option<TerminalKind> {
        self.nth(n).map(|t| t.kind)
    }

    /// Hand pending trivia to the builder.
    fn bump_trivia(&mut self) {
        while self.pos < self.tokens.len() && self.tokens[self.pos].kind.is_trivia() {
            let token = self.tokens[self.pos];
            self.builder.token(token.kind, token.range);
            self.pos += 1;
        }
    }

    /// Hand pending trivia and the next significant token to the builder.
    fn bump(&mut self) {
        self.bump_trivia();
        if self.pos < self.tokens.len() {
            let token = self.tokens[self.pos];
            self.builder.token(token.kind, token.range);
            self.pos += 1;
        }
    }

    /// Bump significant tokens until the next one is the token at `index`.
    fn bump_until(&mut self, index: usize) {
        while self.nth_index(0).is_some_and(|next| next < index) {
            self.bump();
        }
    }

    fn start(&mut self, kind: NonterminalKind) {
        self.bump_trivia();
        self.builder.start_node(kind);
    }

    fn finish(&mut self) {
        self.builder.finish_node();
    }

    fn expect(&mut self, kind: TerminalKind, what: &str) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            self.error(format!("expected {what}"));
            false
        }
    }

    fn error(&mut self, message: impl Into<String>) {
        let range = match self.nth(0) {
            Some(token) => token.range,
            None => TextRange::empty(self.text.len()),
        };
        let message = message.into();
        let found = match self.nth(0) {
            Some(token) => format!("{message}, found '{}'", self.token_text(token)),
            None => format!("{message}, found end of input"),
        };
        self.errors.push(ParseError::parse(range, found));
    }

    /// Record an error and wrap the offending token in a `Skipped` node so
    /// the parse always makes progress.
    fn error_and_skip(&mut self, message: impl Into<String>) {
        self.error(message);
        self.start(NonterminalKind::Skipped);
        self.bump();
        self.finish();
    }

    /// Wrap the next token in a `Name` node if it is an identifier.
    fn name(&mut self, what: &str) -> bool {
        if self.at(TerminalKind::Identifier) {
            self.start(NonterminalKind::Name);
            self.bump();
            self.finish();
            true
        } else {
            self.error(format!("expected {what} name"));
            false
        }
    }

    /// Look ahead over significant tokens until `stop` matches a token at
    /// bracket depth zero, or an unmatched closing bracket, or the end of
    /// input. Returns the tokens passed over and the index of the stopping
    /// token, if any.
    fn scan_until(&self, stop: impl Fn(TerminalKind) -> bool) -> (Vec<Scanned>, Option<usize>) {
        let mut passed = Vec::new();
        let mut depth = 0u32;
        for index in self.pos..self.tokens.len() {
            let kind = self.tokens[index].kind;
            if kind.is_trivia() {
                continue;
            }
            if depth == 0 && stop(kind) {
                return (passed, Some(index));
            }
            match kind {
                TerminalKind::OpenParen | TerminalKind::OpenBracket | TerminalKind::OpenBrace => {
                    passed.push(Scanned { index, depth });
                    depth += 1;
                }
                TerminalKind::CloseParen
                | TerminalKind::CloseBracket
                | TerminalKind::CloseBrace => {
                    if depth == 0 {
                        return (passed, Some(index));
                    }
                    depth -= 1;
                    passed.push(Scanned { index, depth });
                }
                _ => passed.push(Scanned { index, depth }),
            }
        }
        (passed, None)
    }

    /// Consume tokens up to a depth-zero `stop` token (not consumed).
    fn bump_balanced_until(&mut self, stop: impl Fn(TerminalKind) -> bool) {
        let (passed, _) = self.scan_until(stop);
        if let Some(last) = passed.last() {
            self.bump_until(last.index + 1);
        }
    }

    pub(crate) fn kind_of(&self, index: usize) -> TerminalKind {
        self.tokens[index].kind
    }

    pub(crate) fn text_of(&self, index: usize) -> &'a str {
        self.tokens[index].range.slice(self.text)
    }
}

#[cfg(test)]
mod tests;
