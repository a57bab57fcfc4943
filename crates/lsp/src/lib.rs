//! Language server for the namespaced-storage migration.
//!
//! Publishes a warning on every contract state variable that still lives
//! in unstructured storage and offers a quick fix that moves the
//! contract's variables into an ERC-7201 container. Connects to editors
//! via the `namespacer lsp` CLI subcommand over stdio.

pub mod code_action;
pub mod config;
pub mod diagnostics;
pub mod document;
pub mod server;

/// Run the LSP server over stdio. This is the public entry point
/// called by `namespacer lsp`.
pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    server::run()
}
