pub(crate) mod check;
pub(crate) mod migrate;

use std::path::Path;
use std::process;

use crate::{report_error, OutputFormat};

/// Read a source file or exit with status 1.
pub(crate) fn read_source(file: &Path, output: OutputFormat, quiet: bool) -> String {
    match std::fs::read_to_string(file) {
        Ok(s) => s,
        Err(e) => {
            let msg = format!("error reading file '{}': {}", file.display(), e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    }
}
