//! Record service: consent-gated CRUD over `RECORD-<subject>` entries.
//!
//! The order of the existence and consent checks differs per operation and is
//! part of the contract:
//!
//! | operation | first       | then        |
//! |-----------|-------------|-------------|
//! | create    | existence   | (no consent check) |
//! | read      | consent     | existence   |
//! | update    | existence   | consent     |
//! | delete    | consent     | existence   |
//!
//! Read never tells an unauthorized caller whether a record exists. Update
//! does, unless [`AccessPolicy::authorize_update_first`] is set.

use alloc::vec::Vec;

use ehr_common::{ClaimSource, Ledger, TransactionContext};

use crate::authorization::{require_authorized, resolve_caller};
use crate::errors::{EhrError, Entity, Operation};
use crate::keys::record_key;
use crate::models::Record;
use crate::policy::AccessPolicy;

/// Stores a new record. `createdBy` is set to the caller's enrollment id.
pub fn create<L, C>(ctx: &mut TransactionContext<L, C>, record_json: &str) -> Result<Record, EhrError>
where
    L: Ledger,
    C: ClaimSource,
{
    const OP: Operation = Operation::CreateRecord;

    let mut record = parse_record(OP, record_json)?;
    let subject_id = record.subject_id.clone();

    if load(ctx, OP, &subject_id)?.is_some() {
        return Err(EhrError::Conflict {
            op: OP,
            subject: subject_id,
        });
    }

    record.created_by = resolve_caller(ctx, OP, &subject_id)?.into_inner();
    store(ctx, OP, &record)?;

    Ok(record)
}

/// Returns the record if the caller holds consent for the subject.
pub fn read<L, C>(ctx: &TransactionContext<L, C>, subject_id: &str) -> Result<Record, EhrError>
where
    L: Ledger,
    C: ClaimSource,
{
    const OP: Operation = Operation::ReadRecord;

    require_authorized(ctx, OP, subject_id)?;

    let bytes = load(ctx, OP, subject_id)?
        .ok_or_else(|| EhrError::not_found(OP, subject_id, Entity::Record))?;

    decode(OP, subject_id, &bytes)
}

/// Overwrites an existing record. `createdBy` is carried over from the stored
/// version whatever the input says.
pub fn update<L, C>(
    ctx: &mut TransactionContext<L, C>,
    policy: &AccessPolicy,
    record_json: &str,
) -> Result<Record, EhrError>
where
    L: Ledger,
    C: ClaimSource,
{
    const OP: Operation = Operation::UpdateRecord;

    let mut record = parse_record(OP, record_json)?;
    let subject_id = record.subject_id.clone();

    let existing = if policy.authorize_update_first {
        require_authorized(ctx, OP, &subject_id)?;
        require_present(ctx, OP, &subject_id)?
    } else {
        let existing = require_present(ctx, OP, &subject_id)?;
        require_authorized(ctx, OP, &subject_id)?;
        existing
    };

    record.created_by = decode(OP, &subject_id, &existing)?.created_by;
    store(ctx, OP, &record)?;

    Ok(record)
}

/// Removes the record. Consent is checked before existence.
pub fn delete<L, C>(ctx: &mut TransactionContext<L, C>, subject_id: &str) -> Result<(), EhrError>
where
    L: Ledger,
    C: ClaimSource,
{
    const OP: Operation = Operation::DeleteRecord;

    require_authorized(ctx, OP, subject_id)?;

    let present = ctx
        .ledger()
        .exists(&record_key(subject_id))
        .map_err(|source| EhrError::storage(OP, subject_id, source))?;
    if !present {
        return Err(EhrError::not_found(OP, subject_id, Entity::Record));
    }

    ctx.ledger_mut()
        .delete(&record_key(subject_id))
        .map_err(|source| EhrError::storage(OP, subject_id, source))
}

fn parse_record(op: Operation, record_json: &str) -> Result<Record, EhrError> {
    let record: Record =
        serde_json::from_str(record_json).map_err(|e| EhrError::parse(op, "", e))?;
    if record.subject_id.is_empty() {
        return Err(EhrError::parse(op, "", "subjectID must not be empty"));
    }
    Ok(record)
}

fn load<L, C>(
    ctx: &TransactionContext<L, C>,
    op: Operation,
    subject_id: &str,
) -> Result<Option<Vec<u8>>, EhrError>
where
    L: Ledger,
    C: ClaimSource,
{
    ctx.ledger()
        .get(&record_key(subject_id))
        .map_err(|source| EhrError::storage(op, subject_id, source))
}

fn require_present<L, C>(
    ctx: &TransactionContext<L, C>,
    op: Operation,
    subject_id: &str,
) -> Result<Vec<u8>, EhrError>
where
    L: Ledger,
    C: ClaimSource,
{
    load(ctx, op, subject_id)?.ok_or_else(|| EhrError::not_found(op, subject_id, Entity::Record))
}

fn store<L, C>(ctx: &mut TransactionContext<L, C>, op: Operation, record: &Record) -> Result<(), EhrError>
where
    L: Ledger,
    C: ClaimSource,
{
    let bytes = serde_json::to_vec(record).map_err(|e| EhrError::parse(op, &record.subject_id, e))?;
    ctx.ledger_mut()
        .put(&record_key(&record.subject_id), &bytes)
        .map_err(|source| EhrError::storage(op, &record.subject_id, source))
}

fn decode(op: Operation, subject_id: &str, bytes: &[u8]) -> Result<Record, EhrError> {
    serde_json::from_slice(bytes).map_err(|e| EhrError::parse(op, subject_id, e))
}
