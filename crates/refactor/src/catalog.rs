//! Namespace identifiers and the generated container source.

use sha3::{Digest, Keccak256};

use crate::model::Namespace;

/// Names namespaces and prints their container source.
pub trait NamespaceCatalog {
    fn namespace_id(&self, prefix: &str, contract_name: &str) -> String;

    /// Source text for the container struct plus its accessor function,
    /// each line indented one level and newline-terminated.
    fn print_template(&self, namespace: &Namespace) -> String;
}

/// ERC-7201 namespaced storage layout.
#[derive(Debug, Clone, Copy, Default)]
pub struct Erc7201Catalog;

impl NamespaceCatalog for Erc7201Catalog {
    fn namespace_id(&self, prefix: &str, contract_name: &str) -> String {
        format!("{prefix}.storage.{contract_name}")
    }

    fn print_template(&self, namespace: &Namespace) -> String {
        let id = self.namespace_id(&namespace.prefix, &namespace.contract_name);
        let name = &namespace.contract_name;
        let slot = storage_slot(&id);

        let mut out = String::new();
        out.push_str(&format!("    {}\n", storage_tag(&id)));
        out.push_str(&format!("    struct {name}Storage {{\n"));
        for variable in &namespace.variables {
            out.push_str(&format!("        {}\n", variable.content));
        }
        out.push_str("    }\n");
        out.push('\n');
        out.push_str(&format!(
            "    // keccak256(abi.encode(uint256(keccak256(\"{id}\")) - 1)) & ~bytes32(uint256(0xff))\n"
        ));
        out.push_str(&format!(
            "    bytes32 private constant {name}StorageLocation = {slot};\n"
        ));
        out.push('\n');
        out.push_str(&format!(
            "    function _get{name}Storage() private pure returns ({name}Storage storage $) {{\n"
        ));
        out.push_str("        assembly {\n");
        out.push_str(&format!("            $.slot := {name}StorageLocation\n"));
        out.push_str("        }\n");
        out.push_str("    }\n");
        out
    }
}

/// The NatSpec line marking a struct as the container for `id`.
pub fn storage_tag(id: &str) -> String {
    format!("/// @custom:storage-location erc7201:{id}")
}

/// `keccak256(abi.encode(uint256(keccak256(id)) - 1)) & ~bytes32(uint256(0xff))`
/// as `0x` followed by 64 lowercase hex digits.
pub fn storage_slot(id: &str) -> String {
    let mut inner: [u8; 32] = Keccak256::digest(id.as_bytes()).into();

    // big-endian decrement
    for byte in inner.iter_mut().rev() {
        let (value, borrow) = byte.overflowing_sub(1);
        *byte = value;
        if !borrow {
            break;
        }
    }

    let mut slot: [u8; 32] = Keccak256::digest(inner).into();
    slot[31] = 0;

    let hex: String = slot.iter().map(|b| format!("{b:02x}")).collect();
    format!("0x{hex}")
}

/// The local declaration every rewritten body needs.
pub fn accessor_binding(contract_name: &str) -> String {
    format!("{contract_name}Storage storage $ = _get{contract_name}Storage();")
}
