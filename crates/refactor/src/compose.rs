//! Container edits and their merge with body edits into one fix.

use std::collections::BTreeMap;

use namespacer_core::text::{indentation_at, line_ending, line_start};
use namespacer_core::TextRange;

use crate::catalog::NamespaceCatalog;
use crate::model::{EditOperation, Fix, Namespace};

/// Edits that move the namespace's variables into a container.
///
/// Without an existing container, the first declaration is replaced by the
/// printed template and the others are deleted. With one, every declaration
/// is deleted and the fields are inserted together, in order, right before
/// the container's closing brace at `existing`. Inserted lines use the
/// document's line ending.
pub fn container_edits(
    namespace: &Namespace,
    existing: Option<TextRange>,
    catalog: &dyn NamespaceCatalog,
    text: &str,
) -> Vec<EditOperation> {
    let Some((first, rest)) = namespace.variables.split_first() else {
        return Vec::new();
    };
    let eol = line_ending(text);

    let mut edits = Vec::with_capacity(namespace.variables.len() + 1);
    match existing {
        None => {
            let mut template = catalog.print_template(namespace);
            if eol != "\n" {
                template = template.replace('\n', eol);
            }
            let mut replacement = fit_to_range(&template, first.range, text).to_owned();
            if needs_blank_line(namespace, text) {
                replacement.push_str(eol);
            }
            edits.push(EditOperation::replace(first.range, replacement));
            edits.extend(rest.iter().map(|v| EditOperation::delete(v.range)));
        }
        Some(closing) => {
            edits.extend(
                namespace
                    .variables
                    .iter()
                    .map(|v| EditOperation::delete(v.range)),
            );
            edits.push(field_insertion(namespace, closing, text, eol));
        }
    }
    edits
}

/// The template is laid out in whole lines; trim it when the range it
/// replaces does not start or end on a line boundary.
fn fit_to_range<'a>(template: &'a str, range: TextRange, text: &str) -> &'a str {
    let mut fitted = template;
    if line_start(text, range.start) != range.start {
        fitted = fitted.trim_start();
    }
    if !text[..range.end].ends_with('\n') {
        fitted = fitted.trim_end_matches(['\r', '\n']);
    }
    fitted
}

/// True when the template ends a line and the first line left after it,
/// once the other declarations are deleted, is code rather than a blank
/// line or the contract's closing brace.
fn needs_blank_line(namespace: &Namespace, text: &str) -> bool {
    let Some(first) = namespace.variables.first() else {
        return false;
    };
    if !text[..first.range.end].ends_with('\n') {
        return false;
    }
    let mut after = first.range.end;
    while let Some(next) = namespace
        .variables
        .iter()
        .find(|v| v.range.start == after && !v.range.is_empty())
    {
        after = next.range.end;
    }
    let next_line = text[after..].lines().next().unwrap_or("").trim();
    !(next_line.is_empty() || next_line.starts_with('}'))
}

/// Puts every field on its own line, one level deeper than the closing
/// brace, with the brace back on its own line at its original indentation.
fn field_insertion(
    namespace: &Namespace,
    closing: TextRange,
    text: &str,
    eol: &str,
) -> EditOperation {
    let brace_indent = indentation_at(text, closing.start);
    let before_brace = &text[line_start(text, closing.start)..closing.start];

    let mut out = String::new();
    if before_brace.trim().is_empty() {
        for variable in &namespace.variables {
            out.push_str(&format!("    {}{eol}{brace_indent}", variable.content));
        }
        return EditOperation::insert(closing.start, out);
    }

    let kept = text[..closing.start].trim_end_matches([' ', '\t']).len();
    for variable in &namespace.variables {
        out.push_str(&format!("{eol}{brace_indent}    {}", variable.content));
    }
    out.push_str(eol);
    out.push_str(brace_indent);
    EditOperation::replace(TextRange::new(kept, closing.start), out)
}

/// One atomic fix for `document_id`: container edits first, then body
/// edits, each computed against the same original text.
pub fn compose_fix<D>(
    title: String,
    diagnostics: Vec<D>,
    document_id: &str,
    container: Vec<EditOperation>,
    bodies: Vec<EditOperation>,
) -> Fix<D> {
    let mut operations = container;
    operations.extend(bodies);
    let mut edits = BTreeMap::new();
    edits.insert(document_id.to_owned(), operations);
    Fix {
        title,
        edits,
        diagnostics,
    }
}
