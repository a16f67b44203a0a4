//! Consent lookup: is the calling provider listed for a subject?

use alloc::string::String;

use ehr_common::{CallerId, ClaimSource, Ledger, TransactionContext};

use crate::errors::{EhrError, Operation};
use crate::keys::consent_key;
use crate::models::ConsentEntry;

/// Resolves the caller, labelling any identity failure with `op`.
pub fn resolve_caller<L, C>(
    ctx: &TransactionContext<L, C>,
    op: Operation,
    subject_id: &str,
) -> Result<CallerId, EhrError>
where
    L: Ledger,
    C: ClaimSource,
{
    ctx.caller()
        .map_err(|source| EhrError::identity(op, subject_id, source))
}

/// Whether the current caller appears in the subject's consent list.
///
/// A subject without a consent entry denies everyone; that is an answer, not
/// an error.
pub fn is_authorized<L, C>(
    ctx: &TransactionContext<L, C>,
    op: Operation,
    subject_id: &str,
) -> Result<bool, EhrError>
where
    L: Ledger,
    C: ClaimSource,
{
    let caller = resolve_caller(ctx, op, subject_id)?;
    consent_permits(ctx, op, subject_id, &caller)
}

/// Like [`is_authorized`], but turns a denial into [`EhrError::Unauthorized`].
pub fn require_authorized<L, C>(
    ctx: &TransactionContext<L, C>,
    op: Operation,
    subject_id: &str,
) -> Result<CallerId, EhrError>
where
    L: Ledger,
    C: ClaimSource,
{
    let caller = resolve_caller(ctx, op, subject_id)?;
    if consent_permits(ctx, op, subject_id, &caller)? {
        Ok(caller)
    } else {
        Err(EhrError::Unauthorized {
            op,
            subject: String::from(subject_id),
            caller: caller.into_inner(),
        })
    }
}

pub(crate) fn consent_permits<L, C>(
    ctx: &TransactionContext<L, C>,
    op: Operation,
    subject_id: &str,
    caller: &CallerId,
) -> Result<bool, EhrError>
where
    L: Ledger,
    C: ClaimSource,
{
    let stored = ctx
        .ledger()
        .get(&consent_key(subject_id))
        .map_err(|source| EhrError::storage(op, subject_id, source))?;

    let Some(bytes) = stored else {
        return Ok(false);
    };

    let entry: ConsentEntry =
        serde_json::from_slice(&bytes).map_err(|e| EhrError::parse(op, subject_id, e))?;

    Ok(entry.permits(caller.as_str()))
}
