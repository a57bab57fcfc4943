use std::path::Path;
use std::process;

use namespacer_core::{parse, ParseKind};
use namespacer_refactor::{collect_candidates, DocumentSnapshot, NamespaceFix};
use tracing::info;

use super::read_source;
use crate::{report_error, OutputFormat};

pub(crate) struct MigrateOptions<'a> {
    pub file: &'a Path,
    pub contract: Option<&'a str>,
    pub prefix: &'a str,
    pub write: bool,
    pub output: OutputFormat,
    pub quiet: bool,
}

pub(crate) fn cmd_migrate(opts: MigrateOptions<'_>) {
    let MigrateOptions {
        file,
        contract,
        prefix,
        write,
        output,
        quiet,
    } = opts;
    let original = read_source(file, output, quiet);
    let document_id = file.display().to_string();

    // Each contract is migrated against the text left by the previous one,
    // so every fix is computed on a fresh parse.
    let targets: Vec<String> = match contract {
        Some(name) => vec![name.to_owned()],
        None => collect_candidates(&parse(ParseKind::SourceUnit, &original).tree)
            .into_iter()
            .map(|c| c.contract_name)
            .fold(Vec::new(), |mut names, name| {
                if !names.contains(&name) {
                    names.push(name);
                }
                names
            }),
    };

    let fixer = NamespaceFix::erc7201();
    let mut text = original.clone();
    let mut migrated = Vec::new();
    for name in &targets {
        let snapshot = DocumentSnapshot {
            id: &document_id,
            text: &text,
        };
        match fixer.migrate(snapshot, prefix, name) {
            Ok(Some(next)) => {
                info!(contract = %name, "migrated");
                text = next;
                migrated.push(name.clone());
            }
            Ok(None) => {}
            Err(e) => {
                let msg = format!("cannot migrate contract {} in '{}': {}", name, file.display(), e);
                report_error(&msg, output, quiet);
                process::exit(1);
            }
        }
    }

    let changed = text != original;
    if write && changed {
        if let Err(e) = std::fs::write(file, &text) {
            let msg = format!("error writing file '{}': {}", file.display(), e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    }

    match output {
        OutputFormat::Json => {
            let mut report = serde_json::json!({
                "file": document_id,
                "migrated": migrated,
                "written": write && changed,
            });
            if !write {
                report["source"] = serde_json::Value::String(text);
            }
            let json = serde_json::to_string_pretty(&report)
                .unwrap_or_else(|e| format!("{{\"error\": \"serialization: {}\"}}", e));
            println!("{}", json);
        }
        OutputFormat::Text => {
            if !write {
                print!("{}", text);
            } else if !quiet {
                if migrated.is_empty() {
                    println!("{}: nothing to migrate", document_id);
                } else {
                    println!("{}: migrated {}", document_id, migrated.join(", "));
                }
            }
            if !write && migrated.is_empty() && !quiet {
                eprintln!("{}: nothing to migrate", document_id);
            }
        }
    }
}
