use super::Parser;
use crate::kinds::{NonterminalKind, TerminalKind};

impl<'a> Parser<'a> {
    pub(super) fn source_unit(&mut self) {
        while !self.at_eof() {
            self.source_unit_member();
        }
    }

    pub(super) fn single_contract(&mut self) {
        if self.at_word("contract") || (self.at_word("abstract") && self.nth_word(1, "contract"))
        {
            self.contract_like();
        } else {
            self.error("expected contract definition");
        }
        while !self.at_eof() {
            self.error_and_skip("unexpected tokens after contract definition");
        }
    }

    fn source_unit_member(&mut self) {
        if self.at_word("pragma") {
            self.terminated(NonterminalKind::PragmaDirective);
        } else if self.at_word("import") {
            self.terminated(NonterminalKind::ImportDirective);
        } else if self.at_word("abstract")
            || self.at_word("contract")
            || self.at_word("interface")
            || self.at_word("library")
        {
            self.contract_like();
        } else if self.at(TerminalKind::CloseBrace)
            || self.at(TerminalKind::CloseParen)
            || self.at(TerminalKind::CloseBracket)
            || self.at(TerminalKind::Semicolon)
        {
            self.error_and_skip("unexpected token at file level");
        } else {
            // file-level structs, enums, free functions, constants, ...
            self.member();
        }
    }

    /// `[abstract] (contract | interface | library) Name [is ...] { members }`
    pub(super) fn contract_like(&mut self) {
        let keyword_at = if self.at_word("abstract") { 1 } else { 0 };
        let kind = if self.nth_word(keyword_at, "interface") {
            NonterminalKind::InterfaceDefinition
        } else if self.nth_word(keyword_at, "library") {
            NonterminalKind::LibraryDefinition
        } else {
            NonterminalKind::ContractDefinition
        };

        self.start(kind);
        for _ in 0..=keyword_at {
            self.bump();
        }
        self.name("contract");

        if self.at_word("is") {
            self.start(NonterminalKind::InheritanceSpecifier);
            self.bump();
            self.bump_balanced_until(|k| k == TerminalKind::OpenBrace);
            self.finish();
        }

        if self.expect(TerminalKind::OpenBrace, "'{'") {
            while !self.at_eof() && !self.at(TerminalKind::CloseBrace) {
                self.member();
            }
            self.expect(TerminalKind::CloseBrace, "'}' to close the contract");
        }
        self.finish();
    }

    /// A node made of everything up to and including the next depth-zero `;`.
    pub(super) fn terminated(&mut self, kind: NonterminalKind) {
        self.start(kind);
        self.bump();
        self.bump_balanced_until(|k| k == TerminalKind::Semicolon);
        self.expect(TerminalKind::Semicolon, "';'");
        self.finish();
    }
}
