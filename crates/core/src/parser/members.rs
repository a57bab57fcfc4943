use super::{Parser, Scanned};
use crate::kinds::{NonterminalKind, TerminalKind};

/// Words that end a state variable's type and start its attribute list.
const STATE_VARIABLE_ATTRIBUTES: &[&str] = &[
    "public",
    "private",
    "internal",
    "external",
    "constant",
    "immutable",
    "transient",
    "override",
];

impl<'a> Parser<'a> {
    /// One member of a contract, or a file-level declaration.
    pub(super) fn member(&mut self) {
        let next_is_paren = self.nth_kind(1) == Some(TerminalKind::OpenParen);

        if self.at(TerminalKind::Semicolon)
            || self.at(TerminalKind::CloseParen)
            || self.at(TerminalKind::CloseBracket)
            || self.at(TerminalKind::OpenBrace)
        {
            self.error_and_skip("expected contract member");
        } else if self.at_word("function") && !next_is_paren {
            self.function_like(NonterminalKind::FunctionDefinition);
        } else if self.at_word("constructor") {
            self.function_like(NonterminalKind::ConstructorDefinition);
        } else if self.at_word("modifier") {
            self.function_like(NonterminalKind::ModifierDefinition);
        } else if self.at_word("fallback") && next_is_paren {
            self.function_like(NonterminalKind::FallbackFunctionDefinition);
        } else if self.at_word("receive") && next_is_paren {
            self.function_like(NonterminalKind::ReceiveFunctionDefinition);
        } else if self.at_word("struct") {
            self.struct_definition();
        } else if self.at_word("enum") {
            self.enum_definition();
        } else if self.at_word("event") {
            self.terminated(NonterminalKind::EventDefinition);
        } else if self.at_word("error")
            && self.nth_kind(1) == Some(TerminalKind::Identifier)
            && self.nth_kind(2) == Some(TerminalKind::OpenParen)
        {
            self.terminated(NonterminalKind::ErrorDefinition);
        } else if self.at_word("using") {
            self.terminated(NonterminalKind::UsingDirective);
        } else if self.at_word("type")
            && self.nth_kind(1) == Some(TerminalKind::Identifier)
            && self.nth_word(2, "is")
        {
            self.terminated(NonterminalKind::UserDefinedValueType);
        } else {
            self.state_variable();
        }
    }

    /// `<type> [attributes] Name [= initializer];`
    fn state_variable(&mut self) {
        let (passed, stop) = self.scan_until(|k| k == TerminalKind::Semicolon);
        let Some(last) = passed.last().copied() else {
            self.error_and_skip("expected contract member");
            return;
        };

        let equal = passed
            .iter()
            .position(|s| s.depth == 0 && self.kind_of(s.index) == TerminalKind::Equal);
        let head = &passed[..equal.unwrap_or(passed.len())];
        let name = self.declared_name(head);
        let attributes = head
            .iter()
            .filter(|s| s.depth == 0)
            .skip(1)
            .map(|s| s.index)
            .take_while(|&index| Some(index) != name)
            .find(|&index| STATE_VARIABLE_ATTRIBUTES.contains(&self.text_of(index)));

        self.start(NonterminalKind::StateVariableDefinition);

        self.start(NonterminalKind::TypeName);
        match (attributes, name) {
            (Some(end), _) | (None, Some(end)) => self.bump_until(end),
            (None, None) => {
                if let Some(end) = head.last() {
                    self.bump_until(end.index + 1);
                }
            }
        }
        self.finish();

        if let (Some(_), Some(name)) = (attributes, name) {
            self.start(NonterminalKind::StateVariableAttributes);
            self.bump_until(name);
            self.finish();
        }

        if name.is_some() {
            self.name("state variable");
        } else {
            self.error("expected state variable name");
        }

        if let Some(equal) = equal {
            self.bump_until(passed[equal].index);
            self.start(NonterminalKind::StateVariableInitializer);
            self.bump_until(last.index + 1);
            self.finish();
        } else {
            self.bump_until(last.index + 1);
        }

        match stop {
            Some(index) if self.kind_of(index) == TerminalKind::Semicolon => self.bump(),
            _ => self.error("expected ';'"),
        }
        self.finish();
    }

    /// The identifier a typed declaration introduces: the last depth-zero
    /// token, provided something precedes it and it is not the tail of a
    /// qualified type name such as `Lib.Kind`.
    fn declared_name(&self, tokens: &[Scanned]) -> Option<usize> {
        let top: Vec<usize> = tokens
            .iter()
            .filter(|s| s.depth == 0)
            .map(|s| s.index)
            .collect();
        match top.as_slice() {
            [.., before, last]
                if self.kind_of(*last) == TerminalKind::Identifier
                    && self.kind_of(*before) != TerminalKind::Period =>
            {
                Some(*last)
            }
            _ => None,
        }
    }

    /// Functions, constructors, modifiers, `fallback` and `receive`.
    fn function_like(&mut self, kind: NonterminalKind) {
        self.start(kind);
        self.bump();

        if self.at(TerminalKind::Identifier) {
            self.name("function");
        } else if matches!(
            kind,
            NonterminalKind::FunctionDefinition | NonterminalKind::ModifierDefinition
        ) {
            self.error("expected function name");
        }

        if self.at(TerminalKind::OpenParen) {
            self.parameters();
        } else if kind != NonterminalKind::ModifierDefinition {
            self.error("expected '('");
        }

        self.start(NonterminalKind::FunctionAttributes);
        loop {
            match self.peek() {
                None
                | Some(TerminalKind::OpenBrace)
                | Some(TerminalKind::Semicolon)
                | Some(TerminalKind::CloseBrace) => break,
                Some(TerminalKind::OpenParen) => {
                    // arguments of a modifier invocation or `override(...)`
                    self.bump();
                    self.bump_balanced_until(|k| k == TerminalKind::CloseParen);
                    self.expect(TerminalKind::CloseParen, "')'");
                }
                Some(_) if self.at_word("returns") => {
                    self.bump();
                    if self.at(TerminalKind::OpenParen) {
                        self.parameters();
                    } else {
                        self.error("expected '(' after 'returns'");
                    }
                }
                Some(_) => self.bump(),
            }
        }
        self.finish();

        if self.at(TerminalKind::OpenBrace) {
            self.function_body();
        } else if self.at(TerminalKind::Semicolon) {
            self.bump();
        } else {
            self.error("expected function body or ';'");
        }
        self.finish();
    }

    /// `( Parameter, ... )`
    fn parameters(&mut self) {
        self.start(NonterminalKind::Parameters);
        self.bump();
        while !self.at_eof() && !self.at(TerminalKind::CloseParen) {
            let (passed, _) =
                self.scan_until(|k| k == TerminalKind::Comma || k == TerminalKind::CloseParen);
            if passed.is_empty() {
                if self.at(TerminalKind::Comma) {
                    self.error_and_skip("expected parameter");
                    continue;
                }
                break;
            }
            self.parameter(&passed);
            if self.at(TerminalKind::Comma) {
                self.bump();
            } else if !self.at(TerminalKind::CloseParen) {
                break;
            }
        }
        self.expect(TerminalKind::CloseParen, "')'");
        self.finish();
    }

    fn parameter(&mut self, tokens: &[Scanned]) {
        let name = self.declared_name(tokens);
        self.start(NonterminalKind::Parameter);
        if let Some(name) = name {
            self.bump_until(name);
            self.name("parameter");
        }
        if let Some(last) = tokens.last() {
            self.bump_until(last.index + 1);
        }
        self.finish();
    }

    fn function_body(&mut self) {
        self.start(NonterminalKind::FunctionBody);
        self.bump();
        self.block_contents();
        self.expect(TerminalKind::CloseBrace, "'}'");
        self.finish();
    }

    fn block_contents(&mut self) {
        while let Some(kind) = self.peek() {
            match kind {
                TerminalKind::CloseBrace => break,
                TerminalKind::OpenBrace => {
                    self.start(NonterminalKind::Block);
                    self.bump();
                    self.block_contents();
                    self.expect(TerminalKind::CloseBrace, "'}'");
                    self.finish();
                }
                _ => self.bump(),
            }
        }
    }

    fn struct_definition(&mut self) {
        self.start(NonterminalKind::StructDefinition);
        self.bump();
        self.name("struct");
        if self.expect(TerminalKind::OpenBrace, "'{'") {
            while !self.at_eof() && !self.at(TerminalKind::CloseBrace) {
                let (passed, _) = self.scan_until(|k| k == TerminalKind::Semicolon);
                let Some(last) = passed.last().copied() else {
                    self.error_and_skip("expected struct member");
                    continue;
                };
                self.start(NonterminalKind::StructMember);
                self.bump_until(last.index + 1);
                self.expect(TerminalKind::Semicolon, "';'");
                self.finish();
            }
            self.expect(TerminalKind::CloseBrace, "'}' to close the struct");
        }
        self.finish();
    }

    fn enum_definition(&mut self) {
        self.start(NonterminalKind::EnumDefinition);
        self.bump();
        self.name("enum");
        if self.expect(TerminalKind::OpenBrace, "'{'") {
            self.bump_balanced_until(|k| k == TerminalKind::CloseBrace);
            self.expect(TerminalKind::CloseBrace, "'}'");
        }
        self.finish();
    }
}
