use soroban_sdk::{contracttype, symbol_short, Env, Symbol};

const POLICY: Symbol = symbol_short!("POLICY");

/// Admin-tunable access rules. By default consent management is open to any
/// caller, and update checks existence before consent.
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct AccessPolicy {
    /// Grant/revoke require the caller to be the subject or an already
    /// authorized provider.
    pub gate_consent_management: bool,
    /// Update checks consent before existence, like read and delete do.
    pub authorize_update_first: bool,
}

pub fn get_policy(env: &Env) -> AccessPolicy {
    env.storage().instance().get(&POLICY).unwrap_or_default()
}

pub fn set_policy(env: &Env, policy: &AccessPolicy) {
    env.storage().instance().set(&POLICY, policy);
}
