//! Node kinds of the Solidity syntax tree.

use serde::{Deserialize, Serialize};

/// Leaf kinds. Trivia (whitespace, newlines, comments) are leaves too, so
/// concatenating every leaf reproduces the source byte for byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerminalKind {
    Whitespace,
    EndOfLine,
    SingleLineComment,
    SingleLineNatSpecComment,
    MultiLineComment,
    MultiLineNatSpecComment,
    Identifier,
    Keyword,
    NumberLiteral,
    StringLiteral,
    OpenBrace,
    CloseBrace,
    OpenParen,
    CloseParen,
    OpenBracket,
    CloseBracket,
    Semicolon,
    Comma,
    Period,
    /// A lone `=`; `==`, `=>` and friends are [`TerminalKind::Operator`].
    Equal,
    Operator,
    Unrecognized,
}

impl TerminalKind {
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            TerminalKind::Whitespace
                | TerminalKind::EndOfLine
                | TerminalKind::SingleLineComment
                | TerminalKind::SingleLineNatSpecComment
                | TerminalKind::MultiLineComment
                | TerminalKind::MultiLineNatSpecComment
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NonterminalKind {
    SourceUnit,
    PragmaDirective,
    ImportDirective,
    ContractDefinition,
    InterfaceDefinition,
    LibraryDefinition,
    InheritanceSpecifier,
    StateVariableDefinition,
    TypeName,
    StateVariableAttributes,
    StateVariableInitializer,
    StructDefinition,
    StructMember,
    EnumDefinition,
    EventDefinition,
    ErrorDefinition,
    UsingDirective,
    UserDefinedValueType,
    FunctionDefinition,
    ConstructorDefinition,
    ModifierDefinition,
    FallbackFunctionDefinition,
    ReceiveFunctionDefinition,
    Parameters,
    Parameter,
    FunctionAttributes,
    /// The outermost braces of a function-like definition.
    FunctionBody,
    /// Any brace-delimited region nested inside a body.
    Block,
    /// The identifier a declaration introduces.
    Name,
    /// Tokens the parser could not place; always accompanied by an error.
    Skipped,
}

impl NonterminalKind {
    /// Kinds whose node may own a [`NonterminalKind::FunctionBody`].
    pub fn is_function_like(self) -> bool {
        matches!(
            self,
            NonterminalKind::FunctionDefinition
                | NonterminalKind::ConstructorDefinition
                | NonterminalKind::ModifierDefinition
                | NonterminalKind::FallbackFunctionDefinition
                | NonterminalKind::ReceiveFunctionDefinition
        )
    }
}

/// Either side of the tree, for reading a node without caring which it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    Nonterminal(NonterminalKind),
    Terminal(TerminalKind),
}

const RESERVED: &[&str] = &[
    "abstract", "address", "anonymous", "as", "assembly", "bool", "break", "byte",
    "calldata", "catch", "constant", "constructor", "continue", "contract", "delete", "do",
    "else", "emit", "enum", "event", "external", "fallback", "false", "fixed", "for",
    "function", "hex", "if", "immutable", "import", "indexed", "interface", "internal", "is",
    "library", "mapping", "memory", "modifier", "new", "override", "payable", "pragma",
    "private", "public", "pure", "receive", "return", "returns", "storage", "string",
    "struct", "true", "try", "type", "ufixed", "unchecked", "unicode", "using", "view",
    "virtual", "while", "bytes", "int", "uint",
];

/// Reserved words, including the sized elementary types (`uint8`..`uint256`,
/// `int8`..`int256`, `bytes1`..`bytes32`). Contextual words such as `error`,
/// `transient` or `from` stay identifiers.
pub fn is_keyword(word: &str) -> bool {
    if RESERVED.contains(&word) {
        return true;
    }
    sized(word, "uint", |n| n % 8 == 0 && (8..=256).contains(&n))
        || sized(word, "int", |n| n % 8 == 0 && (8..=256).contains(&n))
        || sized(word, "bytes", |n| (1..=32).contains(&n))
}

fn sized(word: &str, prefix: &str, valid: impl Fn(u32) -> bool) -> bool {
    word.strip_prefix(prefix)
        .filter(|digits| !digits.is_empty() && !digits.starts_with('0'))
        .and_then(|digits| digits.parse::<u32>().ok())
        .is_some_and(valid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sized_types_are_keywords() {
        assert!(is_keyword("uint256"));
        assert!(is_keyword("int8"));
        assert!(is_keyword("bytes32"));
        assert!(!is_keyword("uint7"));
        assert!(!is_keyword("bytes33"));
        assert!(!is_keyword("uint0256"));
    }

    #[test]
    fn contextual_words_are_identifiers() {
        assert!(!is_keyword("error"));
        assert!(!is_keyword("transient"));
        assert!(!is_keyword("balances"));
        assert!(is_keyword("mapping"));
    }
}
