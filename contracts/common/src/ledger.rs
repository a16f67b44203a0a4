//! The ledger collaborator: flat get/put/delete over string keys and opaque
//! byte values. No queries, no transactions, no cascading deletes; the host
//! environment owns atomicity of the unit of work.

use alloc::string::String;
use alloc::vec::Vec;
use thiserror::Error;

/// Failure reported by a ledger backend.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum LedgerError {
    /// The backend could not be reached or refused the operation.
    #[error("ledger unavailable: {0}")]
    Unavailable(String),
}

/// Byte-oriented key-value store.
///
/// `delete` on an absent key is not an error; backends that do report it must
/// swallow it before returning.
pub trait Ledger {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError>;

    fn put(&mut self, key: &str, value: &[u8]) -> Result<(), LedgerError>;

    fn delete(&mut self, key: &str) -> Result<(), LedgerError>;

    /// Existence is a plain `get`: the store has no separate index.
    fn exists(&self, key: &str) -> Result<bool, LedgerError> {
        Ok(self.get(key)?.is_some())
    }
}

impl<L: Ledger + ?Sized> Ledger for &mut L {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError> {
        (**self).get(key)
    }

    fn put(&mut self, key: &str, value: &[u8]) -> Result<(), LedgerError> {
        (**self).put(key, value)
    }

    fn delete(&mut self, key: &str) -> Result<(), LedgerError> {
        (**self).delete(key)
    }
}
