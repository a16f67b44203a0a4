//! Enrollment registry: the trust anchor's record of which claims each
//! authenticated address carries.
//!
//! The admin enrolls a member address once; from then on a call signed by that
//! address resolves to the enrolled claims. Soroban checks the signature
//! (`require_auth`), this module only maps a verified address to its claims.

use alloc::string::String as StdString;

use ehr_common::{ClaimSource, IdentityError, ENROLLMENT_ID_CLAIM};
use soroban_sdk::{contracttype, symbol_short, Address, Env, Map, String, Symbol};

use crate::convert::to_std_string;
use crate::ledger::{TTL_EXTEND_TO, TTL_THRESHOLD};

/// Claim name under which the member's organization is exposed.
pub const ORGANIZATION_CLAIM: &str = "hf.Affiliation";

const CREDENTIAL: Symbol = symbol_short!("CRED");

/// Claims issued to one member address.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Credential {
    pub enrollment_id: String,
    pub organization_id: String,
    /// Custom attributes, looked up by exact name.
    pub attributes: Map<String, String>,
    pub enrolled_at: u64,
}

fn credential_key(member: &Address) -> (Symbol, Address) {
    (CREDENTIAL, member.clone())
}

pub fn set_credential(env: &Env, member: &Address, credential: &Credential) {
    let key = credential_key(member);
    env.storage().persistent().set(&key, credential);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

pub fn get_credential(env: &Env, member: &Address) -> Option<Credential> {
    env.storage().persistent().get(&credential_key(member))
}

/// Returns `false` when nothing was enrolled for `member`.
pub fn remove_credential(env: &Env, member: &Address) -> bool {
    let key = credential_key(member);
    if !env.storage().persistent().has(&key) {
        return false;
    }
    env.storage().persistent().remove(&key);
    true
}

/// [`ClaimSource`] for an address that has already passed `require_auth`.
pub struct EnrolledIdentity<'a> {
    env: &'a Env,
    member: Address,
}

impl<'a> EnrolledIdentity<'a> {
    pub fn new(env: &'a Env, member: Address) -> Self {
        Self { env, member }
    }
}

impl ClaimSource for EnrolledIdentity<'_> {
    fn lookup_claim(&self, name: &str) -> Result<Option<StdString>, IdentityError> {
        let Some(credential) = get_credential(self.env, &self.member) else {
            return Ok(None);
        };

        let value = if name == ENROLLMENT_ID_CLAIM {
            Some(credential.enrollment_id)
        } else if name == ORGANIZATION_CLAIM {
            Some(credential.organization_id)
        } else {
            credential.attributes.get(String::from_str(self.env, name))
        };

        value
            .map(|v| {
                to_std_string(&v).map_err(|_| IdentityError::Lookup {
                    claim: StdString::from(name),
                    reason: StdString::from("claim value is not valid UTF-8"),
                })
            })
            .transpose()
    }
}

/// [`ClaimSource`] for entry points that take no caller. Every lookup comes
/// back empty, so anything that needs an identity fails with `MissingClaim`.
pub struct Unauthenticated;

impl ClaimSource for Unauthenticated {
    fn lookup_claim(&self, _name: &str) -> Result<Option<StdString>, IdentityError> {
        Ok(None)
    }
}
