use crate::error::ParseError;
use crate::kinds::{is_keyword, TerminalKind};
use crate::text::TextRange;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TerminalKind,
    pub range: TextRange,
}

const OPERATOR_CHARS: &[u8] = b"+-*/%<>=!&|^~?:";

/// Multi-character operators, longest first so the first prefix match wins.
const OPERATORS: &[&str] = &[
    ">>>=", ">>>", "<<=", ">>=", "**", "==", "!=", "<=", ">=", "&&", "||", "++", "--", "+=",
    "-=", "*=", "/=", "%=", "&=", "|=", "^=", "=>", ":=", "=:", "->", "<<", ">>",
];

/// Split `src` into tokens covering every byte. Problems (unterminated
/// strings or comments, stray characters) are reported next to the tokens
/// instead of aborting, so callers always get a complete token stream.
pub fn lex(src: &str) -> (Vec<Token>, Vec<ParseError>) {
    let bytes = src.as_bytes();
    let mut tokens = Vec::new();
    let mut errors = Vec::new();
    let mut pos = 0usize;

    while pos < bytes.len() {
        let start = pos;
        let c = bytes[pos];
        let next = bytes.get(pos + 1).copied();

        let kind = match c {
            b'\n' => {
                pos += 1;
                TerminalKind::EndOfLine
            }
            b'\r' => {
                pos += 1;
                if bytes.get(pos) == Some(&b'\n') {
                    pos += 1;
                }
                TerminalKind::EndOfLine
            }
            b' ' | b'\t' => {
                while pos < bytes.len() && matches!(bytes[pos], b' ' | b'\t') {
                    pos += 1;
                }
                TerminalKind::Whitespace
            }
            b'/' if next == Some(b'/') => {
                let natspec = bytes.get(pos + 2) == Some(&b'/') && bytes.get(pos + 3) != Some(&b'/');
                while pos < bytes.len() && !matches!(bytes[pos], b'\n' | b'\r') {
                    pos += 1;
                }
                if natspec {
                    TerminalKind::SingleLineNatSpecComment
                } else {
                    TerminalKind::SingleLineComment
                }
            }
            b'/' if next == Some(b'*') => {
                // `/**/` is an empty plain comment, not NatSpec
                let natspec = bytes.get(pos + 2) == Some(&b'*') && bytes.get(pos + 3) != Some(&b'/');
                pos += 2;
                loop {
                    if pos >= bytes.len() {
                        errors.push(ParseError::lex(
                            TextRange::new(start, pos),
                            "unterminated block comment",
                        ));
                        break;
                    }
                    if bytes[pos] == b'*' && bytes.get(pos + 1) == Some(&b'/') {
                        pos += 2;
                        break;
                    }
                    pos += 1;
                }
                if natspec {
                    TerminalKind::MultiLineNatSpecComment
                } else {
                    TerminalKind::MultiLineComment
                }
            }
            b'"' | b'\'' => {
                let quote = c;
                pos += 1;
                loop {
                    if pos >= bytes.len() || matches!(bytes[pos], b'\n' | b'\r') {
                        errors.push(ParseError::lex(
                            TextRange::new(start, pos),
                            "unterminated string literal",
                        ));
                        break;
                    }
                    if bytes[pos] == b'\\' {
                        pos = (pos + 2).min(bytes.len());
                        continue;
                    }
                    pos += 1;
                    if bytes[pos - 1] == quote {
                        break;
                    }
                }
                TerminalKind::StringLiteral
            }
            b'0'..=b'9' => {
                while pos < bytes.len() && (bytes[pos].is_ascii_alphanumeric() || bytes[pos] == b'_')
                {
                    pos += 1;
                }
                // fractional part, but not a member access such as `1.field`
                if pos + 1 < bytes.len() && bytes[pos] == b'.' && bytes[pos + 1].is_ascii_digit() {
                    pos += 1;
                    while pos < bytes.len()
                        && (bytes[pos].is_ascii_alphanumeric() || bytes[pos] == b'_')
                    {
                        pos += 1;
                    }
                }
                TerminalKind::NumberLiteral
            }
            b'{' => single(&mut pos, TerminalKind::OpenBrace),
            b'}' => single(&mut pos, TerminalKind::CloseBrace),
            b'(' => single(&mut pos, TerminalKind::OpenParen),
            b')' => single(&mut pos, TerminalKind::CloseParen),
            b'[' => single(&mut pos, TerminalKind::OpenBracket),
            b']' => single(&mut pos, TerminalKind::CloseBracket),
            b';' => single(&mut pos, TerminalKind::Semicolon),
            b',' => single(&mut pos, TerminalKind::Comma),
            b'.' => single(&mut pos, TerminalKind::Period),
            c if OPERATOR_CHARS.contains(&c) => {
                let width = OPERATORS
                    .iter()
                    .find(|op| src[pos..].starts_with(*op))
                    .map(|op| op.len())
                    .unwrap_or(1);
                pos += width;
                if width == 1 && c == b'=' {
                    TerminalKind::Equal
                } else {
                    TerminalKind::Operator
                }
            }
            c if c.is_ascii_alphabetic() || c == b'_' || c == b'$' => {
                while pos < bytes.len()
                    && (bytes[pos].is_ascii_alphanumeric() || bytes[pos] == b'_' || bytes[pos] == b'$')
                {
                    pos += 1;
                }
                if is_keyword(&src[start..pos]) {
                    TerminalKind::Keyword
                } else {
                    TerminalKind::Identifier
                }
            }
            _ => {
                let width = src[pos..].chars().next().map(char::len_utf8).unwrap_or(1);
                pos += width;
                errors.push(ParseError::lex(
                    TextRange::new(start, pos),
                    format!("unexpected character '{}'", &src[start..pos]),
                ));
                TerminalKind::Unrecognized
            }
        };

        tokens.push(Token {
            kind,
            range: TextRange::new(start, pos),
        });
    }

    (tokens, errors)
}

fn single(pos: &mut usize, kind: TerminalKind) -> TerminalKind {
    *pos += 1;
    kind
}
