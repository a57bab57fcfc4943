use std::path::Path;

use namespacer_core::{parse, LineIndex, ParseKind};
use namespacer_refactor::collect_candidates;
use serde::Serialize;

use super::read_source;
use crate::OutputFormat;

#[derive(Serialize)]
struct CheckReport {
    file: String,
    contracts: Vec<ContractReport>,
    syntax_errors: usize,
}

#[derive(Serialize)]
struct ContractReport {
    contract: String,
    variables: Vec<VariableReport>,
}

#[derive(Serialize)]
struct VariableReport {
    name: String,
    declaration: String,
    /// 1-based
    line: u32,
    /// 1-based
    column: u32,
}

pub(crate) fn cmd_check(file: &Path, output: OutputFormat, quiet: bool) {
    let source = read_source(file, output, quiet);
    let parsed = parse(ParseKind::SourceUnit, &source);
    let index = LineIndex::new(&source);

    let contracts: Vec<ContractReport> = collect_candidates(&parsed.tree)
        .into_iter()
        .map(|candidates| ContractReport {
            contract: candidates.contract_name,
            variables: candidates
                .variables
                .into_iter()
                .map(|variable| {
                    let text = variable.range.slice(&source);
                    let indent = text.len() - text.trim_start().len();
                    let position = index.position(variable.range.start + indent);
                    VariableReport {
                        name: variable.name,
                        declaration: variable.content,
                        line: position.line + 1,
                        column: position.character + 1,
                    }
                })
                .collect(),
        })
        .collect();

    let report = CheckReport {
        file: file.display().to_string(),
        contracts,
        syntax_errors: parsed.errors.len(),
    };

    match output {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&report)
                .unwrap_or_else(|e| format!("{{\"error\": \"serialization: {}\"}}", e));
            println!("{}", json);
        }
        OutputFormat::Text => {
            if quiet {
                return;
            }
            if report.contracts.is_empty() {
                println!("{}: no variables to migrate", report.file);
            }
            for contract in &report.contracts {
                println!(
                    "{} ({} variable{})",
                    contract.contract,
                    contract.variables.len(),
                    if contract.variables.len() == 1 { "" } else { "s" }
                );
                for variable in &contract.variables {
                    println!(
                        "  {}:{}:{}  {}",
                        report.file, variable.line, variable.column, variable.declaration
                    );
                }
            }
            if report.syntax_errors > 0 {
                eprintln!(
                    "warning: {} syntax error(s); contracts that do not parse cannot be migrated",
                    report.syntax_errors
                );
            }
        }
    }
}
