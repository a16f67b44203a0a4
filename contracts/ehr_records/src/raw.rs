//! Unfiltered reads of the document namespace.

use alloc::string::String;

use ehr_common::{ClaimSource, Ledger, TransactionContext};

use crate::errors::{EhrError, Entity, Operation};

/// Returns whatever is stored under `key` as text. No consent check.
pub fn get_raw<L, C>(ctx: &TransactionContext<L, C>, key: &str) -> Result<String, EhrError>
where
    L: Ledger,
    C: ClaimSource,
{
    const OP: Operation = Operation::GetRaw;

    let bytes = ctx
        .ledger()
        .get(key)
        .map_err(|source| EhrError::storage(OP, key, source))?
        .ok_or_else(|| EhrError::not_found(OP, key, Entity::LedgerKey))?;

    String::from_utf8(bytes).map_err(|e| EhrError::parse(OP, key, e))
}
