//! Routing variable references in function bodies through the accessor.

use std::collections::HashSet;

use namespacer_core::text::{indentation_at, line_ending};
use namespacer_core::{Cursor, NodeRef, NonterminalKind, TerminalKind};
use tracing::debug;

use crate::catalog::accessor_binding;
use crate::error::RefactorError;
use crate::locate::expect_contract;
use crate::model::{EditOperation, Variable};

/// One edit per function body of the contract that references a migrated
/// variable, in source order.
///
/// Only identifier leaves that read or write a variable are rewritten, so
/// strings, comments and member accesses such as `other.total` never
/// change. A parameter or return parameter with a variable's name shadows
/// it for that whole function; a local declaration shadows it from the
/// declaration to the end of its block. Inline assembly is left as is.
pub fn rewrite_function_bodies(
    contract: &Cursor<'_>,
    contract_name: &str,
    variables: &[Variable],
    text: &str,
) -> Result<Vec<EditOperation>, RefactorError> {
    expect_contract(contract)?;
    let binding = accessor_binding(contract_name);
    let eol = line_ending(text);
    let names: HashSet<&str> = variables.iter().map(|v| v.name.as_str()).collect();

    let mut edits = Vec::new();
    let mut cursor = contract.spawn();
    while cursor.go_to_next_nonterminal_with_kind(NonterminalKind::FunctionBody) {
        let body = cursor.node();
        let shadowed = body.parent().map(parameter_names).unwrap_or_default();
        let targets: HashSet<&str> = names.difference(&shadowed).copied().collect();
        if targets.is_empty() {
            continue;
        }

        let Some(mut rewritten) = rewrite_references(body, &targets) else {
            continue;
        };
        if !rewritten.contains(&binding) {
            let indent = deeper(indentation_at(text, body.range().start));
            rewritten = insert_binding(&rewritten, &binding, &indent, eol);
        }
        if rewritten != body.text() {
            debug!(start = body.range().start, "rewriting function body");
            edits.push(EditOperation::replace(body.range(), rewritten));
        }
    }
    Ok(edits)
}

/// Names bound by the parameters and return parameters of `function`.
fn parameter_names<'t>(function: NodeRef<'t>) -> HashSet<&'t str> {
    let mut names = HashSet::new();
    let mut cursor = function.cursor();
    while cursor.go_to_next_nonterminal_with_kind(NonterminalKind::Parameter) {
        if let Some(name) = cursor.node().name() {
            names.insert(name);
        }
    }
    names
}

type Leaf<'t> = (TerminalKind, &'t str);

/// The body's text with every reference to `targets` prefixed by `$.`,
/// or `None` when nothing was referenced.
fn rewrite_references(body: NodeRef<'_>, targets: &HashSet<&str>) -> Option<String> {
    let leaves: Vec<Leaf<'_>> = body
        .terminals()
        .filter_map(|leaf| Some((leaf.terminal_kind()?, leaf.text())))
        .collect();
    let references = find_references(&leaves, targets);
    if references.is_empty() {
        return None;
    }

    let mut out = String::with_capacity(body.text().len() + 2 * references.len());
    let mut next = references.iter().peekable();
    for (i, (_, text)) in leaves.iter().enumerate() {
        if next.next_if(|&&at| at == i).is_some() {
            out.push_str("$.");
        }
        out.push_str(text);
    }
    Some(out)
}

/// Indices into `leaves` of the identifiers that refer to a target, in
/// ascending order.
///
/// Scopes follow braces. Declarations inside a `for`, `try ... returns` or
/// `catch` header belong to the block that follows the header.
fn find_references(leaves: &[Leaf<'_>], targets: &HashSet<&str>) -> Vec<usize> {
    let significant: Vec<usize> = (0..leaves.len())
        .filter(|&i| !leaves[i].0.is_trivia())
        .collect();

    let mut scopes: Vec<Vec<&str>> = Vec::new();
    let mut pending: Vec<&str> = Vec::new();
    let mut in_header = false;
    let mut parens = 0usize;
    let mut assembly_next = false;
    // scope depth the current assembly block was opened at
    let mut assembly: Option<usize> = None;
    let mut found = Vec::new();

    for (n, &i) in significant.iter().enumerate() {
        let (kind, text) = leaves[i];
        let before = n.checked_sub(1).map(|p| leaves[significant[p]]);
        let after = significant.get(n + 1).map(|&j| leaves[j]);

        match kind {
            TerminalKind::OpenBrace => {
                if assembly_next && assembly.is_none() {
                    assembly = Some(scopes.len());
                }
                assembly_next = false;
                let mut scope = Vec::new();
                if parens == 0 {
                    in_header = false;
                    scope.append(&mut pending);
                }
                scopes.push(scope);
            }
            TerminalKind::CloseBrace => {
                scopes.pop();
                if assembly == Some(scopes.len()) {
                    assembly = None;
                }
            }
            TerminalKind::OpenParen => parens += 1,
            TerminalKind::CloseParen => parens = parens.saturating_sub(1),
            TerminalKind::Semicolon if parens == 0 => {
                // an unbraced loop body ends here
                pending.clear();
                in_header = false;
            }
            TerminalKind::Keyword => match text {
                "assembly" => assembly_next = true,
                "for" | "catch" | "returns" => in_header = true,
                _ => {}
            },
            TerminalKind::Identifier if assembly.is_none() && targets.contains(text) => {
                if declares(before, after) {
                    if in_header && parens > 0 {
                        pending.push(text);
                    } else if let Some(scope) = scopes.last_mut() {
                        scope.push(text);
                    }
                    continue;
                }
                let shadowed =
                    pending.contains(&text) || scopes.iter().flatten().any(|name| *name == text);
                let member = matches!(before, Some((TerminalKind::Period, _)));
                if !(shadowed || member || is_named_key(before, after)) {
                    found.push(i);
                }
            }
            _ => {}
        }
    }
    found
}

/// An identifier between a type and `=`, `;`, `,` or `)` is the name a
/// local declaration introduces: `uint256 a = 5;`, `P memory p;`,
/// `(uint256 a, ) = f();`.
fn declares(before: Option<Leaf<'_>>, after: Option<Leaf<'_>>) -> bool {
    let ends_type = match before {
        Some((TerminalKind::Identifier | TerminalKind::CloseBracket, _)) => true,
        Some((TerminalKind::Keyword, word)) => is_type_word(word),
        _ => false,
    };
    ends_type
        && matches!(
            after,
            Some((
                TerminalKind::Equal
                    | TerminalKind::Semicolon
                    | TerminalKind::Comma
                    | TerminalKind::CloseParen,
                _
            ))
        )
}

fn is_type_word(word: &str) -> bool {
    const TYPE_WORDS: &[&str] = &[
        "address", "bool", "string", "bytes", "int", "uint", "byte", "fixed", "ufixed",
        "payable", "memory", "storage", "calldata",
    ];
    TYPE_WORDS.contains(&word)
        || ["uint", "int", "bytes"].iter().any(|prefix| {
            word.strip_prefix(prefix)
                .is_some_and(|bits| !bits.is_empty() && bits.bytes().all(|b| b.is_ascii_digit()))
        })
}

/// Keys of named arguments and call options: `P({a: 1})`, `f{value: v}()`.
fn is_named_key(before: Option<Leaf<'_>>, after: Option<Leaf<'_>>) -> bool {
    matches!(after, Some((TerminalKind::Operator, ":")))
        && matches!(before, Some((TerminalKind::OpenBrace | TerminalKind::Comma, _)))
}

/// Put `binding` on its own line right after the body's opening `{`.
fn insert_binding(body: &str, binding: &str, indent: &str, eol: &str) -> String {
    let Some(rest) = body.strip_prefix('{') else {
        return body.to_owned();
    };
    let same_line = rest.trim_start_matches([' ', '\t']);
    if same_line.starts_with('\n') || same_line.starts_with("\r\n") {
        format!("{{{eol}{indent}{binding}{rest}")
    } else {
        format!("{{{eol}{indent}{binding}{eol}{indent}{}", rest.trim_start())
    }
}

fn deeper(indent: &str) -> String {
    let unit = if indent.starts_with('\t') { "\t" } else { "    " };
    format!("{indent}{unit}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locate::locate_contract;
    use namespacer_core::{parse, ParseKind, TextRange};

    fn variables(names: &[&str]) -> Vec<Variable> {
        names
            .iter()
            .map(|name| Variable {
                name: name.to_string(),
                content: format!("uint256 {name};"),
                range: TextRange::empty(0),
            })
            .collect()
    }

    fn rewrite(src: &str, names: &[&str]) -> Vec<EditOperation> {
        let output = parse(ParseKind::SourceUnit, src);
        let contract = locate_contract(&output.tree, "Box").unwrap().unwrap();
        rewrite_function_bodies(&contract, "Box", &variables(names), src).unwrap()
    }

    #[test]
    fn prefixes_references_and_adds_binding_once() {
        let src = "\
contract Box {
    uint256 a;

    function bump() public {
        a = a + 1;
        if (a > 10) {
            a = 0;
        }
    }
}
";
        let edits = rewrite(src, &["a"]);
        assert_eq!(edits.len(), 1);
        assert_eq!(
            edits[0].replacement,
            "{
        BoxStorage storage $ = _getBoxStorage();
        $.a = $.a + 1;
        if ($.a > 10) {
            $.a = 0;
        }
    }"
        );
        assert!(edits[0].range.slice(src).starts_with("{\n        a = a + 1;"));
    }

    #[test]
    fn untouched_bodies_get_no_edit() {
        let src = "contract Box { uint256 a; function f() public pure returns (uint256) { return 1; } }";
        assert!(rewrite(src, &["a"]).is_empty());
    }

    #[test]
    fn whole_identifiers_only() {
        let src = "contract Box { uint256 x; function f() public { xs = x; x_1 = 2; } }";
        let edits = rewrite(src, &["x"]);
        assert_eq!(edits.len(), 1);
        assert!(edits[0].replacement.contains("xs = $.x; x_1 = 2;"));
    }

    #[test]
    fn strings_comments_and_members_are_left_alone() {
        let src = "contract Box {
    uint256 total;
    function f(Box other) public {
        // total is updated below
        emit Log(\"total\", other.total);
        total = 1;
    }
}
";
        let edits = rewrite(src, &["total"]);
        assert_eq!(edits.len(), 1);
        let body = &edits[0].replacement;
        assert!(body.contains("// total is updated below"));
        assert!(body.contains("emit Log(\"total\", other.total);"));
        assert!(body.contains("$.total = 1;"));
    }

    #[test]
    fn parameters_shadow_variables() {
        let src = "contract Box {
    uint256 a;
    uint256 b;
    function f(uint256 a) public returns (uint256 b) { b = a; }
    function g() public { a = b; }
}";
        let edits = rewrite(src, &["a", "b"]);
        assert_eq!(edits.len(), 1);
        assert!(edits[0].replacement.contains("$.a = $.b;"));
    }

    #[test]
    fn local_declaration_shadows_for_the_rest_of_its_block() {
        let src = "contract Box {
    uint256 a;
    function f() public {
        a = 1;
        {
            uint256 a = 5;
            a += 1;
        }
        a += 2;
    }
    function g() public pure returns (uint256) {
        uint256 a = 5;
        a += 1;
        return a;
    }
}";
        let edits = rewrite(src, &["a"]);
        assert_eq!(edits.len(), 1);
        let body = &edits[0].replacement;
        assert!(body.contains("$.a = 1;"));
        assert!(body.contains("uint256 a = 5;\n            a += 1;\n        }"));
        assert!(body.contains("$.a += 2;"));
    }

    #[test]
    fn declarations_of_every_shape_are_not_references() {
        let src = "contract Box {
    uint256 a;
    uint256[] b;
    P c;
    function f() public {
        (uint256 a, ) = pair();
        uint256[] memory b = new uint256[](1);
        P storage c = items[0];
        use(a, b, c);
    }
}";
        assert!(rewrite(src, &["a", "b", "c"]).is_empty());
    }

    #[test]
    fn loop_variable_is_scoped_to_the_loop() {
        let src = "contract Box {
    uint256 i;
    uint256 total;
    function f() public {
        for (uint256 i = 0; i < 3; i++) {
            total += i;
        }
        i = total;
    }
}";
        let edits = rewrite(src, &["i", "total"]);
        let body = &edits[0].replacement;
        assert!(body.contains("for (uint256 i = 0; i < 3; i++) {\n            $.total += i;"));
        assert!(body.contains("$.i = $.total;"));
    }

    #[test]
    fn named_argument_keys_are_not_references() {
        let src = "contract Box {
    uint256 a;
    uint256 value;
    struct P { uint256 a; uint256 value; }
    function f(address to) public {
        P memory p = P({a: a, value: value});
        to.call{value: a}(\"\");
    }
}";
        let edits = rewrite(src, &["a", "value"]);
        let body = &edits[0].replacement;
        assert!(body.contains("P memory p = P({a: $.a, value: $.value});"));
        assert!(body.contains("to.call{value: $.a}(\"\");"));
    }

    #[test]
    fn assembly_blocks_are_left_alone() {
        let src = "contract Box {
    uint256 a;
    function f() public view returns (uint256 s) {
        assembly (\"memory-safe\") {
            s := sload(a.slot)
        }
        s += a;
    }
}";
        let edits = rewrite(src, &["a"]);
        let body = &edits[0].replacement;
        assert!(body.contains("s := sload(a.slot)"));
        assert!(body.contains("s += $.a;"));
    }

    #[test]
    fn binding_follows_crlf_line_endings() {
        let src = "contract Box {\r\n    uint256 a;\r\n    function f() public {\r\n        a = 1;\r\n    }\r\n    function g() public { a = 2; }\r\n}\r\n";
        let edits = rewrite(src, &["a"]);
        assert_eq!(
            edits[0].replacement,
            "{\r\n        BoxStorage storage $ = _getBoxStorage();\r\n        $.a = 1;\r\n    }"
        );
        assert_eq!(
            edits[1].replacement,
            "{\r\n        BoxStorage storage $ = _getBoxStorage();\r\n        $.a = 2; }"
        );
    }

    #[test]
    fn single_line_body_is_split() {
        let src = "contract Box {\n    uint256 a;\n    function f() public { a = 1; }\n}";
        let edits = rewrite(src, &["a"]);
        assert_eq!(
            edits[0].replacement,
            "{\n        BoxStorage storage $ = _getBoxStorage();\n        $.a = 1; }"
        );
    }

    #[test]
    fn existing_binding_is_not_duplicated() {
        let src = "contract Box {
    uint256 b;
    function f() public {
        BoxStorage storage $ = _getBoxStorage();
        $.a = 1;
        b = 2;
    }
}";
        let edits = rewrite(src, &["b"]);
        assert_eq!(edits.len(), 1);
        assert_eq!(
            edits[0].replacement.matches("BoxStorage storage $").count(),
            1
        );
        assert!(edits[0].replacement.contains("$.b = 2;"));
    }

    #[test]
    fn already_rewritten_body_is_stable() {
        let src = "contract Box {
    function f() public {
        BoxStorage storage $ = _getBoxStorage();
        $.a = $.a + 1;
    }
}";
        assert!(rewrite(src, &["a"]).is_empty());
    }

    #[test]
    fn modifiers_constructors_and_receive_are_bodies_too() {
        let src = "contract Box {
    uint256 a;
    modifier positive() { require(a > 0); _; }
    constructor() { a = 1; }
    receive() external payable { a += msg.value; }
}";
        assert_eq!(rewrite(src, &["a"]).len(), 3);
    }
}
