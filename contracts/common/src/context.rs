use crate::identity::{resolve_caller_identity, CallerId, ClaimSource, IdentityError};
use crate::ledger::Ledger;
use crate::ENROLLMENT_ID_CLAIM;

/// Everything a service operation may touch during one unit of work: the
/// ledger and the caller's verified claims. Built fresh per invocation.
pub struct TransactionContext<L, C> {
    ledger: L,
    claims: C,
}

impl<L: Ledger, C: ClaimSource> TransactionContext<L, C> {
    pub fn new(ledger: L, claims: C) -> Self {
        Self { ledger, claims }
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut L {
        &mut self.ledger
    }

    pub fn claims(&self) -> &C {
        &self.claims
    }

    /// Resolves the caller from the enrollment claim. Not cached.
    pub fn caller(&self) -> Result<CallerId, IdentityError> {
        resolve_caller_identity(&self.claims, ENROLLMENT_ID_CLAIM)
    }

    pub fn into_parts(self) -> (L, C) {
        (self.ledger, self.claims)
    }
}
