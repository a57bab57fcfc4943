//! namespacer-refactor: moves contract state variables into ERC-7201
//! namespaced storage.
//!
//! Given a document, a contract name and the variables to move, the engine
//! produces one atomic [`Fix`]: either a fresh container (struct, slot
//! constant and accessor) replacing the first declaration, or field
//! insertions into the container the contract already declares, plus a
//! rewrite of every function body that touches a moved variable.
//!
//! All edits are computed against one parsed snapshot and never depend on
//! each other's offsets. Applying the fix and running the engine again on
//! the result changes nothing.

pub mod apply;
pub mod candidates;
pub mod catalog;
pub mod compose;
pub mod detect;
pub mod engine;
pub mod error;
pub mod locate;
pub mod model;
pub mod rewrite;

// ── Convenience re-exports ───────────────────────────────────────────

pub use apply::apply_edits;
pub use candidates::{candidates_for, collect_candidates, ContractCandidates};
pub use catalog::{Erc7201Catalog, NamespaceCatalog};
pub use engine::{NamespaceFix, FIX_TITLE};
pub use error::RefactorError;
pub use model::{DocumentSnapshot, EditOperation, Fix, FixRequest, Namespace, Variable};
