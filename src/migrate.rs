//! Version-dispatched schema migration.
//!
//! Raw document bytes are first probed for their `version` tag with a
//! minimal partial decode, then fully decoded as the matching historical
//! generation and upgraded one step at a time to the current layout. No
//! partial or mixed-generation result is ever returned.

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{StoreError, StoreResult};
use crate::schema::{self, v1, v2, Data};

/// Partial decode restricted to the version tag.
///
/// The tag is signed so that out-of-range values like `-1` still probe
/// successfully and take the unknown-version fallback instead of becoming a
/// decode error.
#[derive(Debug, Default, Deserialize)]
struct VersionProbe {
    #[serde(default)]
    version: i64,
}

/// Decode raw bytes of any known generation into a current-generation
/// document.
///
/// Decode failures and rejected upgrade steps abort the whole migration. An
/// unknown version tag yields a default current-generation document instead
/// of an error.
// TODO: turn the unknown-version fallback into a hard error; today an
// unreadable document is silently replaced by defaults.
pub fn migrate(raw: &[u8]) -> StoreResult<Data> {
    let probe: VersionProbe =
        serde_json::from_slice(raw).map_err(|e| StoreError::format(raw, e))?;

    match probe.version {
        1 => {
            debug!(from = 1, "migrating configuration document");
            let old: v1::Data =
                serde_json::from_slice(raw).map_err(|e| StoreError::format(raw, e))?;
            let mid = v2::upgrade_from_v1(&old)?;
            schema::upgrade_from_v2(&mid)
        }
        2 => {
            debug!(from = 2, "migrating configuration document");
            let old: v2::Data =
                serde_json::from_slice(raw).map_err(|e| StoreError::format(raw, e))?;
            schema::upgrade_from_v2(&old)
        }
        v if v == schema::VERSION as i64 => {
            serde_json::from_slice(raw).map_err(|e| StoreError::format(raw, e))
        }
        other => {
            warn!(
                version = other,
                "unknown configuration version, falling back to defaults"
            );
            Ok(Data::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_migrate_v1_runs_full_upgrade_chain() {
        let raw = br#"{
            "version": 1,
            "name": "x",
            "address": "10.0.0.1:9000",
            "storage": { "max_size_mbytes": 2 }
        }"#;

        let data = migrate(raw).expect("migration should succeed");

        assert_eq!(data.version, schema::VERSION);
        assert_eq!(data.name, "x");
        assert_eq!(data.host, "10.0.0.1");
        assert_eq!(data.port, 9000);
        assert_eq!(data.storage.max_size_bytes, 2 * 1024 * 1024);
        assert!(data.update_check);
    }

    #[test]
    fn test_migrate_v1_matches_manual_upgrade_chain() {
        let old = v1::Data {
            name: "chained".to_string(),
            ..v1::Data::default()
        };
        let raw = serde_json::to_vec(&old).expect("serialize");

        let via_migrate = migrate(&raw).expect("migrate");
        let via_steps =
            schema::upgrade_from_v2(&v2::upgrade_from_v1(&old).expect("v1 to v2")).expect("v2 to v3");

        assert_eq!(via_migrate, via_steps);
    }

    #[test]
    fn test_migrate_v2_runs_single_step() {
        let raw = br#"{
            "version": 2,
            "name": "y",
            "address": "127.0.0.1:8080",
            "update_check": false,
            "storage": { "max_size_bytes": 512 }
        }"#;

        let data = migrate(raw).expect("migration should succeed");

        assert_eq!(data.version, schema::VERSION);
        assert_eq!(data.name, "y");
        assert_eq!(data.storage.max_size_bytes, 512);
        assert!(!data.update_check);
    }

    #[test]
    fn test_migrate_current_generation_is_identity() {
        let original = Data {
            name: "z".to_string(),
            port: 9999,
            ..Data::default()
        };
        let raw = serde_json::to_vec(&original).expect("serialize");

        let decoded = migrate(&raw).expect("migration should succeed");

        assert_eq!(decoded, original);
    }

    #[test]
    fn test_migrate_unknown_version_falls_back_to_defaults() {
        let data = migrate(br#"{"version": 99, "name": "ignored"}"#).expect("fallback");

        assert_eq!(data.version, schema::VERSION);
        // The permissive fallback discards the document's content.
        assert_eq!(data.name, "");
    }

    #[test]
    fn test_migrate_negative_version_falls_back_to_defaults() {
        let data = migrate(br#"{"version": -1, "name": "ignored"}"#).expect("fallback");

        assert_eq!(data.version, schema::VERSION);
        assert_eq!(data.name, "");
    }

    #[test]
    fn test_migrate_missing_version_falls_back_to_defaults() {
        let data = migrate(br#"{"name": "ignored"}"#).expect("fallback");
        assert_eq!(data.version, schema::VERSION);
    }

    #[test]
    fn test_migrate_malformed_bytes_is_a_format_error() {
        let err = migrate(b"{ not json").unwrap_err();
        assert!(matches!(err, StoreError::Format { .. }));
    }

    #[test]
    fn test_migrate_v1_with_bad_field_type_is_a_format_error() {
        // The probe succeeds, the full generation 1 decode must not.
        let err = migrate(br#"{"version": 1, "log": {"max_lines": "many"}}"#).unwrap_err();
        assert!(matches!(err, StoreError::Format { .. }));
    }

    #[test]
    fn test_migrate_propagates_upgrade_step_failure() {
        let raw = br#"{"version": 2, "address": "not-an-address"}"#;
        let err = migrate(raw).unwrap_err();
        assert!(matches!(err, StoreError::Upgrade { from: 2, .. }));
    }
}
