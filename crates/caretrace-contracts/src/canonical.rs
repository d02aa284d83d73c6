//! Canonical serialization and SHA-256 hashing.
//!
//! Every hash in the Caretrace core — snapshot hashes, profile hashes,
//! evaluation hashes, why-hashes, provenance hashes, ledger payload and event
//! hashes — is computed over the RFC 8785 (JSON Canonicalization Scheme)
//! serialization of a closed, serializable value structure. JCS sorts object
//! keys and uses a fixed number/string encoding, so the same value always
//! produces the same bytes regardless of field declaration order or map
//! iteration order.
//!
//! This module is the sole construction path for hash-input bytes. Nothing
//! else in the workspace feeds data into SHA-256 directly, which keeps "same
//! content, different hash" defects structurally impossible.

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::error::{CoreError, CoreResult};

/// Serialize `value` in JCS-canonical form (RFC 8785).
///
/// Object keys are sorted lexicographically and separators are compact, so
/// two values with identical content canonicalize to identical strings even
/// when their fields were populated in different orders.
///
/// Returns `CoreError::Canonicalization` if the value cannot be represented
/// in canonical JSON (e.g. a non-finite float or a map with non-string keys).
pub fn canonical_json(value: &impl Serialize) -> CoreResult<String> {
    serde_jcs::to_string(value).map_err(|e| CoreError::Canonicalization {
        reason: e.to_string(),
    })
}

/// SHA-256 of a canonical string, as a lowercase 64-character hex string.
pub fn sha256_hex(canonical: &str) -> String {
    hex::encode(Sha256::digest(canonical.as_bytes()))
}

/// Canonicalize `value` and hash it in one step.
///
/// This is the fingerprint function used across the workspace: lowercase
/// 64-character hex of `SHA-256(JCS(value))`.
pub fn content_hash(value: &impl Serialize) -> CoreResult<String> {
    Ok(sha256_hex(&canonical_json(value)?))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn canonical_json_sorts_keys() {
        let value = serde_json::json!({"zeta": 1, "alpha": 2, "mid": 3});
        let s = canonical_json(&value).unwrap();
        assert_eq!(s, r#"{"alpha":2,"mid":3,"zeta":1}"#);
    }

    #[test]
    fn canonical_json_nested_objects_sorted() {
        let value = serde_json::json!({
            "outer": {"b": 2, "a": 1},
            "list": [3, 2, 1]
        });
        let s = canonical_json(&value).unwrap();
        // Arrays keep their order; only object keys are sorted.
        assert_eq!(s, r#"{"list":[3,2,1],"outer":{"a":1,"b":2}}"#);
    }

    #[test]
    fn content_hash_is_order_independent_for_maps() {
        let mut forward = BTreeMap::new();
        forward.insert("impact", 80);
        forward.insert("likelihood", 70);

        // Same entries inserted in the opposite order.
        let mut reverse = BTreeMap::new();
        reverse.insert("likelihood", 70);
        reverse.insert("impact", 80);

        assert_eq!(
            content_hash(&forward).unwrap(),
            content_hash(&reverse).unwrap()
        );
    }

    #[test]
    fn content_hash_known_vector() {
        // SHA-256 of the two-byte string "{}".
        let empty = serde_json::json!({});
        assert_eq!(
            content_hash(&empty).unwrap(),
            "44136fa355b3678a1146ad16f7e8649e94fb4fc21fe77e8310c060f61caaff8a"
        );
    }

    #[test]
    fn content_hash_differs_for_different_content() {
        let a = serde_json::json!({"state": "special-measures"});
        let b = serde_json::json!({"state": "routine-compliance"});
        assert_ne!(content_hash(&a).unwrap(), content_hash(&b).unwrap());
    }

    #[test]
    fn non_finite_float_is_rejected() {
        #[derive(serde::Serialize)]
        struct Bad {
            multiplier: f64,
        }
        let result = canonical_json(&Bad {
            multiplier: f64::NAN,
        });
        assert!(result.is_err(), "NaN must not canonicalize");
    }
}
