#![no_std]
//! Consent-gated electronic health records on Soroban.
//!
//! Records and consent lists are JSON documents stored under
//! `RECORD-<subjectID>` and `CONSENT-<subjectID>`. Reading, updating or
//! deleting a record requires the caller's enrollment id to appear in the
//! subject's consent list. Enrollment ids come from credentials the contract
//! admin issues to member addresses.

extern crate alloc;

pub mod authorization;
pub mod consent;
pub mod convert;
pub mod credential;
pub mod errors;
pub mod events;
pub mod keys;
pub mod ledger;
pub mod models;
pub mod policy;
pub mod raw;
pub mod record;

use alloc::string::String as StdString;

use ehr_common::TransactionContext;
use soroban_sdk::{contract, contractimpl, symbol_short, Address, Env, Map, String, Symbol};

pub use credential::{Credential, EnrolledIdentity, Unauthenticated};
pub use errors::{report, ContractError, EhrError, ErrorCategory, ErrorKind, ErrorSeverity, Operation};
pub use ledger::ContractLedger;
pub use models::{ClinicalPayload, ConsentEntry, Record};
pub use policy::AccessPolicy;

/// Storage keys for the contract
const ADMIN: Symbol = symbol_short!("ADMIN");
const INITIALIZED: Symbol = symbol_short!("INIT");

const CONTRACT_VERSION: u32 = 1;

type CallerContext<'a> = TransactionContext<ContractLedger<'a>, EnrolledIdentity<'a>>;
type AnonymousContext<'a> = TransactionContext<ContractLedger<'a>, Unauthenticated>;

fn caller_context(env: &Env, caller: Address) -> CallerContext<'_> {
    TransactionContext::new(ContractLedger::new(env), EnrolledIdentity::new(env, caller))
}

fn anonymous_context(env: &Env) -> AnonymousContext<'_> {
    TransactionContext::new(ContractLedger::new(env), Unauthenticated)
}

/// Copies a contract argument into guest memory. Non-UTF-8 input is a parse
/// failure of the operation that received it.
fn text(env: &Env, op: Operation, value: &String) -> Result<StdString, ContractError> {
    convert::to_std_string(value).map_err(|e| report(env, EhrError::parse(op, "", e)))
}

fn to_json<T: serde::Serialize>(
    env: &Env,
    op: Operation,
    subject_id: &str,
    value: &T,
) -> Result<String, ContractError> {
    let json = serde_json::to_string(value).map_err(|e| report(env, EhrError::parse(op, subject_id, e)))?;
    Ok(String::from_str(env, &json))
}

#[contract]
pub struct EhrRecordsContract;

#[contractimpl]
impl EhrRecordsContract {
    fn require_admin(env: &Env, caller: &Address) -> Result<(), ContractError> {
        caller.require_auth();
        let admin = Self::get_admin(env.clone())?;
        if *caller != admin {
            return Err(ContractError::Unauthorized);
        }
        Ok(())
    }

    /// Initialize the contract with an admin address
    pub fn initialize(env: Env, admin: Address) -> Result<(), ContractError> {
        if env.storage().instance().has(&INITIALIZED) {
            return Err(ContractError::AlreadyInitialized);
        }

        admin.require_auth();

        env.storage().instance().set(&ADMIN, &admin);
        env.storage().instance().set(&INITIALIZED, &true);
        policy::set_policy(&env, &AccessPolicy::default());

        events::publish_initialized(&env, admin);

        Ok(())
    }

    /// Get the admin address
    pub fn get_admin(env: Env) -> Result<Address, ContractError> {
        env.storage()
            .instance()
            .get(&ADMIN)
            .ok_or(ContractError::NotInitialized)
    }

    /// Check if the contract is initialized
    pub fn is_initialized(env: Env) -> bool {
        env.storage().instance().has(&INITIALIZED)
    }

    /// Contract version
    pub fn version() -> u32 {
        CONTRACT_VERSION
    }

    // ======================== Enrollment ========================

    /// Issues (or replaces) the credential for `member`.
    pub fn enroll(
        env: Env,
        admin: Address,
        member: Address,
        enrollment_id: String,
        organization_id: String,
        attributes: Map<String, String>,
    ) -> Result<(), ContractError> {
        Self::require_admin(&env, &admin)?;

        if enrollment_id.len() == 0 {
            return Err(ContractError::InvalidInput);
        }

        let credential = Credential {
            enrollment_id: enrollment_id.clone(),
            organization_id: organization_id.clone(),
            attributes,
            enrolled_at: env.ledger().timestamp(),
        };
        credential::set_credential(&env, &member, &credential);

        events::publish_enrolled(&env, member, enrollment_id, organization_id);

        Ok(())
    }

    pub fn revoke_enrollment(env: Env, admin: Address, member: Address) -> Result<(), ContractError> {
        Self::require_admin(&env, &admin)?;

        if !credential::remove_credential(&env, &member) {
            return Err(ContractError::CredentialNotFound);
        }

        events::publish_enrollment_revoked(&env, member);

        Ok(())
    }

    pub fn get_credential(env: Env, member: Address) -> Result<Credential, ContractError> {
        credential::get_credential(&env, &member).ok_or(ContractError::CredentialNotFound)
    }

    // ======================== Policy ========================

    pub fn set_policy(env: Env, admin: Address, policy: AccessPolicy) -> Result<(), ContractError> {
        Self::require_admin(&env, &admin)?;

        policy::set_policy(&env, &policy);
        events::publish_policy_updated(&env, admin, policy);

        Ok(())
    }

    pub fn get_policy(env: Env) -> AccessPolicy {
        policy::get_policy(&env)
    }

    // ======================== Records ========================

    /// Stores a new record from its JSON document. Not consent-gated; the
    /// stored `createdBy` is the caller's enrollment id.
    pub fn create_record(env: Env, caller: Address, record_json: String) -> Result<(), ContractError> {
        caller.require_auth();
        let json = text(&env, Operation::CreateRecord, &record_json)?;

        let mut ctx = caller_context(&env, caller.clone());
        let stored = record::create(&mut ctx, &json).map_err(|e| report(&env, e))?;

        events::publish_record_created(&env, String::from_str(&env, &stored.subject_id), caller);

        Ok(())
    }

    /// Returns the record as JSON if the caller holds consent. Unauthorized
    /// callers learn nothing about whether the record exists.
    pub fn read_record(env: Env, caller: Address, subject_id: String) -> Result<String, ContractError> {
        caller.require_auth();
        let subject = text(&env, Operation::ReadRecord, &subject_id)?;

        let ctx = caller_context(&env, caller);
        let stored = record::read(&ctx, &subject).map_err(|e| report(&env, e))?;

        to_json(&env, Operation::ReadRecord, &subject, &stored)
    }

    pub fn update_record(env: Env, caller: Address, record_json: String) -> Result<(), ContractError> {
        caller.require_auth();
        let json = text(&env, Operation::UpdateRecord, &record_json)?;

        let policy = policy::get_policy(&env);
        let mut ctx = caller_context(&env, caller.clone());
        let stored = record::update(&mut ctx, &policy, &json).map_err(|e| report(&env, e))?;

        events::publish_record_updated(&env, String::from_str(&env, &stored.subject_id), caller);

        Ok(())
    }

    pub fn delete_record(env: Env, caller: Address, subject_id: String) -> Result<(), ContractError> {
        caller.require_auth();
        let subject = text(&env, Operation::DeleteRecord, &subject_id)?;

        let mut ctx = caller_context(&env, caller.clone());
        record::delete(&mut ctx, &subject).map_err(|e| report(&env, e))?;

        events::publish_record_deleted(&env, subject_id, caller);

        Ok(())
    }

    // ======================== Consent ========================

    /// Replaces the consent list for `subject_id` with the JSON array of
    /// enrollment ids in `providers_json`.
    pub fn grant_consent(
        env: Env,
        caller: Address,
        subject_id: String,
        providers_json: String,
    ) -> Result<(), ContractError> {
        caller.require_auth();
        let subject = text(&env, Operation::GrantConsent, &subject_id)?;
        let providers = text(&env, Operation::GrantConsent, &providers_json)?;

        let policy = policy::get_policy(&env);
        let mut ctx = caller_context(&env, caller.clone());
        let entry =
            consent::grant(&mut ctx, &policy, &subject, &providers).map_err(|e| report(&env, e))?;

        let provider_count = u32::try_from(entry.authorized_providers.len()).unwrap_or(u32::MAX);
        events::publish_consent_granted(&env, subject_id, caller, provider_count);

        Ok(())
    }

    /// Removes the consent list. Revoking a subject without one succeeds.
    pub fn revoke_consent(env: Env, caller: Address, subject_id: String) -> Result<(), ContractError> {
        caller.require_auth();
        let subject = text(&env, Operation::RevokeConsent, &subject_id)?;

        let policy = policy::get_policy(&env);
        let mut ctx = caller_context(&env, caller.clone());
        consent::revoke(&mut ctx, &policy, &subject).map_err(|e| report(&env, e))?;

        events::publish_consent_revoked(&env, subject_id, caller);

        Ok(())
    }

    pub fn read_consent(env: Env, subject_id: String) -> Result<String, ContractError> {
        let subject = text(&env, Operation::ReadConsent, &subject_id)?;

        let ctx = anonymous_context(&env);
        let entry = consent::read(&ctx, &subject).map_err(|e| report(&env, e))?;

        to_json(&env, Operation::ReadConsent, &subject, &entry)
    }

    /// Whether `caller`'s enrollment id is on the consent list for
    /// `subject_id`.
    pub fn check_authorization(
        env: Env,
        caller: Address,
        subject_id: String,
    ) -> Result<bool, ContractError> {
        caller.require_auth();
        let subject = text(&env, Operation::CheckAuthorization, &subject_id)?;

        let ctx = caller_context(&env, caller);
        authorization::is_authorized(&ctx, Operation::CheckAuthorization, &subject)
            .map_err(|e| report(&env, e))
    }

    // ======================== Raw access ========================

    /// Stored text under any document key, e.g. `RECORD-P001`. Not gated.
    pub fn get_raw(env: Env, key: String) -> Result<String, ContractError> {
        let key = text(&env, Operation::GetRaw, &key)?;

        let ctx = anonymous_context(&env);
        let value = raw::get_raw(&ctx, &key).map_err(|e| report(&env, e))?;

        Ok(String::from_str(&env, &value))
    }
}

#[cfg(test)]
mod test_consent;
#[cfg(test)]
mod test_policy;
