//! Record naming for transients and their timeout markers
//!
//! A transient materializes as two separate records sharing a logical key
//! name: a value record and a timeout marker holding the expiry timestamp.
//! Markers are found by prefix match and the logical key is recovered by
//! stripping that prefix.

use crate::store::Scope;

/// Prefix for local-scope value records
pub const LOCAL_VALUE_PREFIX: &str = "transient:";
/// Prefix for local-scope timeout markers
pub const LOCAL_TIMEOUT_PREFIX: &str = "transient:timeout:";
/// Prefix for shared-scope value records
pub const SHARED_VALUE_PREFIX: &str = "shared:transient:";
/// Prefix for shared-scope timeout markers
pub const SHARED_TIMEOUT_PREFIX: &str = "shared:transient:timeout:";

/// Record name of the value half of a transient
pub fn value_record(scope: Scope, key: &str) -> String {
    match scope {
        Scope::Local => format!("{LOCAL_VALUE_PREFIX}{key}"),
        Scope::Shared => format!("{SHARED_VALUE_PREFIX}{key}"),
    }
}

/// Record name of the timeout marker half of a transient
pub fn timeout_record(scope: Scope, key: &str) -> String {
    match scope {
        Scope::Local => format!("{LOCAL_TIMEOUT_PREFIX}{key}"),
        Scope::Shared => format!("{SHARED_TIMEOUT_PREFIX}{key}"),
    }
}

/// The marker prefix reserved for a scope
pub fn timeout_prefix(scope: Scope) -> &'static str {
    match scope {
        Scope::Local => LOCAL_TIMEOUT_PREFIX,
        Scope::Shared => SHARED_TIMEOUT_PREFIX,
    }
}

/// Recover the logical key from a marker record name, if it belongs to `scope`
pub fn strip_timeout_prefix(scope: Scope, record_name: &str) -> Option<&str> {
    record_name.strip_prefix(timeout_prefix(scope))
}
