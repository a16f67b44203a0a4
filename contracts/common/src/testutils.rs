//! Host-side doubles for the collaborator traits.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::Cell;

use crate::identity::{ClaimSource, IdentityError, ENROLLMENT_ID_CLAIM};
use crate::ledger::{Ledger, LedgerError};

/// Ledger backed by an ordered map.
#[derive(Clone, Debug, Default)]
pub struct MemoryLedger {
    entries: BTreeMap<String, Vec<u8>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes bytes without going through any service, e.g. to plant a
    /// malformed entry.
    pub fn insert_raw(&mut self, key: &str, value: &[u8]) {
        self.entries.insert(String::from(key), value.to_vec());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl Ledger for MemoryLedger {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError> {
        Ok(self.entries.get(key).cloned())
    }

    fn put(&mut self, key: &str, value: &[u8]) -> Result<(), LedgerError> {
        self.entries.insert(String::from(key), value.to_vec());
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<(), LedgerError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Which ledger operations a [`FailingLedger`] rejects.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FailOn {
    Everything,
    Writes,
}

/// Ledger that wraps a [`MemoryLedger`] and rejects some operations with
/// [`LedgerError::Unavailable`].
#[derive(Clone, Debug)]
pub struct FailingLedger {
    inner: MemoryLedger,
    fail_on: FailOn,
}

impl FailingLedger {
    pub fn new(fail_on: FailOn) -> Self {
        Self::wrap(MemoryLedger::new(), fail_on)
    }

    pub fn wrap(inner: MemoryLedger, fail_on: FailOn) -> Self {
        Self { inner, fail_on }
    }

    fn unavailable() -> LedgerError {
        LedgerError::Unavailable(String::from("peer connection reset"))
    }
}

impl Ledger for FailingLedger {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError> {
        match self.fail_on {
            FailOn::Everything => Err(Self::unavailable()),
            FailOn::Writes => self.inner.get(key),
        }
    }

    fn put(&mut self, _key: &str, _value: &[u8]) -> Result<(), LedgerError> {
        Err(Self::unavailable())
    }

    fn delete(&mut self, _key: &str) -> Result<(), LedgerError> {
        Err(Self::unavailable())
    }
}

/// Fixed claim set, optionally failing every lookup. Counts lookups so tests
/// can assert that identity is never cached.
#[derive(Clone, Debug, Default)]
pub struct StaticClaims {
    claims: BTreeMap<String, String>,
    failure: Option<String>,
    lookups: Cell<usize>,
}

impl StaticClaims {
    /// A credential with no claims at all.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// A credential whose enrollment claim is `enrollment_id`.
    pub fn enrolled(enrollment_id: &str) -> Self {
        Self::anonymous().with_claim(ENROLLMENT_ID_CLAIM, enrollment_id)
    }

    /// A credential subsystem that errors on every lookup.
    pub fn broken(reason: &str) -> Self {
        Self {
            failure: Some(String::from(reason)),
            ..Self::default()
        }
    }

    pub fn with_claim(mut self, name: &str, value: &str) -> Self {
        self.claims.insert(String::from(name), String::from(value));
        self
    }

    pub fn lookups(&self) -> usize {
        self.lookups.get()
    }
}

impl ClaimSource for StaticClaims {
    fn lookup_claim(&self, name: &str) -> Result<Option<String>, IdentityError> {
        self.lookups.set(self.lookups.get() + 1);
        if let Some(reason) = &self.failure {
            return Err(IdentityError::Lookup {
                claim: String::from(name),
                reason: reason.clone(),
            });
        }
        Ok(self.claims.get(name).cloned())
    }
}
