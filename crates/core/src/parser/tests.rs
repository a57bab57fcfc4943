use super::*;
use crate::kinds::NodeKind;
use crate::tree::NodeRef;

const VAULT: &str = r#"// SPDX-License-Identifier: MIT
pragma solidity ^0.8.20;

import {Initializable} from "./Initializable.sol";

/// @title Vault
abstract contract Vault is Initializable, Ownable(msg.sender) {
    uint256 public total;
    mapping(address => uint256) private balances;
    address[] holders;
    uint256 public constant LIMIT = 10;
    Lib.Kind kind;

    struct Entry {
        uint256 amount;
        address owner;
    }

    event Deposited(address indexed who, uint256 amount);
    error TooLarge(uint256 amount);

    modifier onlyHolder {
        require(balances[msg.sender] > 0, "no balance");
        _;
    }

    constructor(address owner_) {
        holders.push(owner_);
    }

    function deposit(uint256 amount) external onlyHolder returns (uint256 newTotal) {
        if (amount > LIMIT) {
            revert TooLarge(amount);
        }
        total += amount;
        return total;
    }

    function peek() external view virtual returns (uint256);

    receive() external payable {}
}
"#;

fn nodes_of_kind<'t>(root: NodeRef<'t>, kind: NonterminalKind) -> Vec<NodeRef<'t>> {
    let mut cursor = root.cursor();
    let mut found = Vec::new();
    while cursor.go_to_next_nonterminal_with_kind(kind) {
        found.push(cursor.node());
    }
    found
}

#[test]
fn parses_realistic_contract_without_errors() {
    let output = parse(ParseKind::SourceUnit, VAULT);
    assert!(output.is_valid(), "errors: {:?}", output.errors);
    assert_eq!(output.tree.root().text(), VAULT);
    assert_eq!(output.tree.root().range(), TextRange::new(0, VAULT.len()));
}

#[test]
fn contract_range_starts_at_first_keyword() {
    let output = parse(ParseKind::SourceUnit, VAULT);
    let contracts = nodes_of_kind(output.tree.root(), NonterminalKind::ContractDefinition);
    assert_eq!(contracts.len(), 1);
    let contract = contracts[0];
    assert_eq!(contract.name(), Some("Vault"));
    assert!(contract.text().starts_with("abstract contract Vault"));
    assert!(contract.text().ends_with('}'));
}

#[test]
fn state_variable_names_and_types() {
    let output = parse(ParseKind::SourceUnit, VAULT);
    let vars = nodes_of_kind(output.tree.root(), NonterminalKind::StateVariableDefinition);
    let names: Vec<_> = vars.iter().map(|v| v.name().unwrap_or("?")).collect();
    assert_eq!(names, vec!["total", "balances", "holders", "LIMIT", "kind"]);

    let types: Vec<_> = vars
        .iter()
        .map(|v| {
            v.child_with_kind(NonterminalKind::TypeName)
                .map(|t| t.text().trim())
                .unwrap_or("")
        })
        .collect();
    assert_eq!(
        types,
        vec![
            "uint256",
            "mapping(address => uint256)",
            "address[]",
            "uint256",
            "Lib.Kind"
        ]
    );

    let limit = vars[3];
    assert_eq!(
        limit
            .child_with_kind(NonterminalKind::StateVariableAttributes)
            .map(|a| a.text()),
        Some("public constant")
    );
    assert!(limit
        .child_with_kind(NonterminalKind::StateVariableInitializer)
        .is_some());
}

#[test]
fn struct_members_are_not_state_variables() {
    let output = parse(ParseKind::SourceUnit, VAULT);
    let structs = nodes_of_kind(output.tree.root(), NonterminalKind::StructDefinition);
    assert_eq!(structs.len(), 1);
    assert_eq!(structs[0].name(), Some("Entry"));
    let members = nodes_of_kind(structs[0], NonterminalKind::StructMember);
    assert_eq!(members.len(), 2);
}

#[test]
fn function_like_definitions_and_bodies() {
    let output = parse(ParseKind::SourceUnit, VAULT);
    let root = output.tree.root();
    assert_eq!(nodes_of_kind(root, NonterminalKind::FunctionDefinition).len(), 2);
    assert_eq!(nodes_of_kind(root, NonterminalKind::ModifierDefinition).len(), 1);
    assert_eq!(nodes_of_kind(root, NonterminalKind::ConstructorDefinition).len(), 1);
    assert_eq!(nodes_of_kind(root, NonterminalKind::ReceiveFunctionDefinition).len(), 1);
    // peek() has no body
    assert_eq!(nodes_of_kind(root, NonterminalKind::FunctionBody).len(), 4);
    // the `if` block inside deposit
    assert_eq!(nodes_of_kind(root, NonterminalKind::Block).len(), 1);
}

#[test]
fn parameter_names() {
    let output = parse(ParseKind::SourceUnit, VAULT);
    let params = nodes_of_kind(output.tree.root(), NonterminalKind::Parameter);
    let names: Vec<_> = params.iter().filter_map(|p| p.name()).collect();
    assert_eq!(names, vec!["owner_", "amount", "newTotal"]);
    // `uint256` in `returns (uint256)` has no name
    assert_eq!(params.len(), 4);
}

#[test]
fn unnamed_and_qualified_parameters() {
    let src = "contract C { function f(address payable, Lib.T, bytes calldata data) external {} }";
    let output = parse(ParseKind::SourceUnit, src);
    assert!(output.is_valid(), "errors: {:?}", output.errors);
    let params = nodes_of_kind(output.tree.root(), NonterminalKind::Parameter);
    let names: Vec<_> = params.iter().map(|p| p.name()).collect();
    assert_eq!(names, vec![None, None, Some("data")]);
}

#[test]
fn contract_fragment_must_be_a_single_contract() {
    let ok = parse(ParseKind::ContractDefinition, "contract A { uint256 x; }");
    assert!(ok.is_valid());

    let abstract_ok = parse(ParseKind::ContractDefinition, "abstract contract A {}");
    assert!(abstract_ok.is_valid());

    let trailing = parse(ParseKind::ContractDefinition, "contract A {} contract B {}");
    assert!(!trailing.is_valid());

    let interface = parse(ParseKind::ContractDefinition, "interface I {}");
    assert!(!interface.is_valid());
}

#[test]
fn unbalanced_body_is_reported() {
    let src = "contract A { function f() public { if (x) { } }";
    let output = parse(ParseKind::ContractDefinition, src);
    assert!(!output.is_valid());
    assert!(output.errors.iter().any(|e| e.message.contains("'}'")));
    // the tree still covers the whole input
    assert_eq!(output.tree.root().text(), src);
}

#[test]
fn recovers_from_stray_tokens() {
    let src = "contract A { ; uint256 x; } ) contract B { uint256 y; }";
    let output = parse(ParseKind::SourceUnit, src);
    assert_eq!(output.errors.len(), 2);
    let contracts = nodes_of_kind(output.tree.root(), NonterminalKind::ContractDefinition);
    let names: Vec<_> = contracts.iter().filter_map(|c| c.name()).collect();
    assert_eq!(names, vec!["A", "B"]);
    assert_eq!(output.tree.root().text(), src);
}

#[test]
fn missing_semicolon_is_an_error() {
    let output = parse(ParseKind::SourceUnit, "contract A { uint256 x }");
    assert!(!output.is_valid());
    assert!(output.errors[0].message.starts_with("expected ';'"));
}

#[test]
fn natspec_comment_precedes_struct_node() {
    let src = "contract A {\n    /// @custom:storage-location erc7201:a.storage.A\n    struct AStorage {\n        uint256 x;\n    }\n}";
    let output = parse(ParseKind::SourceUnit, src);
    assert!(output.is_valid());
    let mut cursor = output.tree.cursor();
    assert!(cursor.go_to_next_terminal_with_kind(TerminalKind::SingleLineNatSpecComment));
    let comment_end = cursor.text_range().end;
    assert!(cursor.go_to_next_nonterminal_with_kind(NonterminalKind::StructDefinition));
    assert!(cursor.text_range().start > comment_end);
    assert_eq!(cursor.node().kind(), NodeKind::Nonterminal(NonterminalKind::StructDefinition));
}
