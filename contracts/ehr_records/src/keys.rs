use alloc::string::String;

/// Ledger key prefixes. Existing deployments depend on these exact values.
pub const RECORD_PREFIX: &str = "RECORD-";
pub const CONSENT_PREFIX: &str = "CONSENT-";

pub fn record_key(subject_id: &str) -> String {
    prefixed(RECORD_PREFIX, subject_id)
}

pub fn consent_key(subject_id: &str) -> String {
    prefixed(CONSENT_PREFIX, subject_id)
}

fn prefixed(prefix: &str, subject_id: &str) -> String {
    let mut key = String::with_capacity(prefix.len() + subject_id.len());
    key.push_str(prefix);
    key.push_str(subject_id);
    key
}
