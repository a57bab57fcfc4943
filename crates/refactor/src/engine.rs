//! Orchestration: one request in, at most one fix out.

use namespacer_core::{parse, ParseKind};
use tracing::{debug, info_span};

use crate::apply::{apply_edits, check_range};
use crate::candidates::candidates_for;
use crate::catalog::{Erc7201Catalog, NamespaceCatalog};
use crate::compose::{compose_fix, container_edits};
use crate::detect::detect_existing_container;
use crate::error::RefactorError;
use crate::locate::locate_contract;
use crate::model::{DocumentSnapshot, Fix, FixRequest, Namespace};
use crate::rewrite::rewrite_function_bodies;

/// Title the fix is offered under.
pub const FIX_TITLE: &str = "Move variables to namespaced storage";

/// The namespaced-storage migration, bound to a catalog.
#[derive(Debug, Clone, Default)]
pub struct NamespaceFix<C = Erc7201Catalog> {
    catalog: C,
}

impl NamespaceFix<Erc7201Catalog> {
    pub fn erc7201() -> Self {
        NamespaceFix::new(Erc7201Catalog)
    }
}

impl<C: NamespaceCatalog> NamespaceFix<C> {
    pub fn new(catalog: C) -> Self {
        NamespaceFix { catalog }
    }

    /// Compute every edit that moves `request.variables` into the contract's
    /// namespace container. `Ok(None)` means there is nothing to change.
    pub fn compute_fix<D>(
        &self,
        request: FixRequest<'_, D>,
    ) -> Result<Option<Fix<D>>, RefactorError> {
        let FixRequest {
            diagnostics,
            title,
            prefix,
            contract_name,
            variables,
            document,
        } = request;
        let _span = info_span!("compute_fix", contract = contract_name, document = document.id)
            .entered();

        if variables.is_empty() {
            debug!("no variables to migrate");
            return Ok(None);
        }
        for variable in &variables {
            check_range(document.text, variable.range)?;
        }

        let output = parse(ParseKind::SourceUnit, document.text);
        let Some(contract) = locate_contract(&output.tree, contract_name)? else {
            debug!("contract not found");
            return Ok(None);
        };

        let existing =
            detect_existing_container(&contract, prefix, contract_name, &self.catalog)?;
        let bodies = rewrite_function_bodies(&contract, contract_name, &variables, document.text)?;

        let namespace = Namespace {
            contract_name: contract_name.to_owned(),
            prefix: prefix.to_owned(),
            variables,
        };
        let container = container_edits(&namespace, existing, &self.catalog, document.text);
        debug!(
            container_edits = container.len(),
            body_edits = bodies.len(),
            existing = existing.is_some(),
            "composed fix"
        );
        Ok(Some(compose_fix(
            title,
            diagnostics,
            document.id,
            container,
            bodies,
        )))
    }

    /// Collect the contract's candidates from `document`, compute the fix
    /// and apply it. `Ok(None)` when the contract has nothing to migrate.
    pub fn migrate(
        &self,
        document: DocumentSnapshot<'_>,
        prefix: &str,
        contract_name: &str,
    ) -> Result<Option<String>, RefactorError> {
        let output = parse(ParseKind::SourceUnit, document.text);
        let variables = candidates_for(&output.tree, contract_name);
        let request = FixRequest::<()> {
            diagnostics: Vec::new(),
            title: FIX_TITLE.to_owned(),
            prefix,
            contract_name,
            variables,
            document,
        };
        match self.compute_fix(request)? {
            Some(fix) => apply_edits(document.text, fix.edits_for(document.id)).map(Some),
            None => Ok(None),
        }
    }
}
