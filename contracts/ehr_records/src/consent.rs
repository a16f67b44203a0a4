//! Consent registry: grant, revoke and read a subject's provider list.

use alloc::string::String;
use alloc::vec::Vec;

use ehr_common::{ClaimSource, Ledger, TransactionContext};

use crate::authorization::{consent_permits, resolve_caller};
use crate::errors::{EhrError, Entity, Operation};
use crate::keys::consent_key;
use crate::models::ConsentEntry;
use crate::policy::AccessPolicy;

/// Replaces the subject's provider list with `providers_json` (a JSON array
/// of caller ids). Any previous list is discarded, not merged.
pub fn grant<L, C>(
    ctx: &mut TransactionContext<L, C>,
    policy: &AccessPolicy,
    subject_id: &str,
    providers_json: &str,
) -> Result<ConsentEntry, EhrError>
where
    L: Ledger,
    C: ClaimSource,
{
    const OP: Operation = Operation::GrantConsent;

    if policy.gate_consent_management {
        require_consent_manager(ctx, OP, subject_id)?;
    }

    let authorized_providers: Vec<String> =
        serde_json::from_str(providers_json).map_err(|e| EhrError::parse(OP, subject_id, e))?;

    let entry = ConsentEntry {
        subject_id: String::from(subject_id),
        authorized_providers,
    };
    let bytes = serde_json::to_vec(&entry).map_err(|e| EhrError::parse(OP, subject_id, e))?;

    ctx.ledger_mut()
        .put(&consent_key(subject_id), &bytes)
        .map_err(|source| EhrError::storage(OP, subject_id, source))?;

    Ok(entry)
}

/// Drops the subject's consent entry. Revoking an absent entry succeeds.
pub fn revoke<L, C>(
    ctx: &mut TransactionContext<L, C>,
    policy: &AccessPolicy,
    subject_id: &str,
) -> Result<(), EhrError>
where
    L: Ledger,
    C: ClaimSource,
{
    const OP: Operation = Operation::RevokeConsent;

    if policy.gate_consent_management {
        require_consent_manager(ctx, OP, subject_id)?;
    }

    ctx.ledger_mut()
        .delete(&consent_key(subject_id))
        .map_err(|source| EhrError::storage(OP, subject_id, source))
}

/// Reads the subject's consent entry. Unlike revoke, absence is an error.
pub fn read<L, C>(ctx: &TransactionContext<L, C>, subject_id: &str) -> Result<ConsentEntry, EhrError>
where
    L: Ledger,
    C: ClaimSource,
{
    const OP: Operation = Operation::ReadConsent;

    let bytes = ctx
        .ledger()
        .get(&consent_key(subject_id))
        .map_err(|source| EhrError::storage(OP, subject_id, source))?
        .ok_or_else(|| EhrError::not_found(OP, subject_id, Entity::Consent))?;

    serde_json::from_slice(&bytes).map_err(|e| EhrError::parse(OP, subject_id, e))
}

/// Under a gated policy only the subject itself, or a provider the subject
/// already authorized, may change the list.
fn require_consent_manager<L, C>(
    ctx: &TransactionContext<L, C>,
    op: Operation,
    subject_id: &str,
) -> Result<(), EhrError>
where
    L: Ledger,
    C: ClaimSource,
{
    let caller = resolve_caller(ctx, op, subject_id)?;
    if caller == *subject_id || consent_permits(ctx, op, subject_id, &caller)? {
        return Ok(());
    }
    Err(EhrError::Unauthorized {
        op,
        subject: String::from(subject_id),
        caller: caller.into_inner(),
    })
}
