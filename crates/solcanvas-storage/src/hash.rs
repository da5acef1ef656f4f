//! Contract encoding and blake3 content hashing.
//!
//! Contracts are stored as their `serde_json` text. The JSON form is
//! deterministic (member arrays are `Vec`s and layout positions an
//! `IndexMap`), so hashing the encoded bytes gives a stable content hash:
//! saving a contract whose hash matches the stored one is a no-op.

use solcanvas_core::EthereumContract;

use crate::error::StorageError;

/// A contract ready to be written: its JSON body and content hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedContract {
    pub name: String,
    pub body: String,
    /// Lowercase hex of the blake3 digest of `body`.
    pub hash: String,
}

/// Encodes a contract for storage.
///
/// Rejects contracts with an empty name, since the name is the storage key.
pub fn encode_contract(contract: &EthereumContract) -> Result<EncodedContract, StorageError> {
    let name = contract.name().trim();
    if name.is_empty() {
        return Err(StorageError::InvalidName {
            reason: "contract name must not be empty".to_string(),
        });
    }
    let body = serde_json::to_string(contract)?;
    let hash = blake3::hash(body.as_bytes()).to_hex().to_string();
    Ok(EncodedContract {
        name: contract.name().to_string(),
        body,
        hash,
    })
}

/// Decodes a stored contract body.
pub fn decode_contract(body: &str) -> Result<EthereumContract, StorageError> {
    serde_json::from_str(body).map_err(|e| StorageError::IntegrityError {
        reason: format!("stored contract does not decode: {}", e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use solcanvas_core::{ComponentData, ContractMetadata};
    use solcanvas_core::component::EnumComponent;

    fn contract(name: &str) -> EthereumContract {
        EthereumContract::new(ContractMetadata::new(name))
    }

    #[test]
    fn hash_is_deterministic() {
        let a = contract("Token");
        let b = contract("Token");
        assert_eq!(encode_contract(&a).unwrap(), encode_contract(&b).unwrap());
    }

    #[test]
    fn hash_changes_with_content() {
        let a = contract("Token");
        let mut b = contract("Token");
        b.push(
            "enum-1".into(),
            ComponentData::Enum(EnumComponent {
                name: "Status".into(),
                values: vec!["Open".into()],
            }),
        );
        assert_ne!(
            encode_contract(&a).unwrap().hash,
            encode_contract(&b).unwrap().hash
        );
    }

    #[test]
    fn encoded_hash_matches_body() {
        let encoded = encode_contract(&contract("Token")).unwrap();
        assert_eq!(encoded.hash.len(), 64);
        assert_eq!(encoded.hash, blake3::hash(encoded.body.as_bytes()).to_hex().to_string());
        assert_eq!(decode_contract(&encoded.body).unwrap(), contract("Token"));
    }

    #[test]
    fn empty_name_rejected() {
        assert!(matches!(
            encode_contract(&contract("  ")),
            Err(StorageError::InvalidName { .. })
        ));
        assert!(matches!(
            decode_contract("{\"not\": \"a contract\"}"),
            Err(StorageError::IntegrityError { .. })
        ));
    }
}
