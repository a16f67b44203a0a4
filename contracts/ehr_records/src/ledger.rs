use alloc::vec::Vec;

use ehr_common::{Ledger, LedgerError};
use soroban_sdk::{Bytes, Env};

use crate::convert::to_vec;

pub(crate) const TTL_THRESHOLD: u32 = 518_400;
pub(crate) const TTL_EXTEND_TO: u32 = 3_110_400;

/// [`Ledger`] over the contract's persistent storage. Keys and values are
/// stored as raw `Bytes`, so the string keys written here are exactly the
/// ones other clients of the same namespace see.
///
/// Host storage failures trap and roll back the whole invocation, so every
/// method here returns `Ok`.
pub struct ContractLedger<'a> {
    env: &'a Env,
}

impl<'a> ContractLedger<'a> {
    pub fn new(env: &'a Env) -> Self {
        Self { env }
    }

    fn key(&self, key: &str) -> Bytes {
        Bytes::from_slice(self.env, key.as_bytes())
    }
}

impl Ledger for ContractLedger<'_> {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError> {
        let value: Option<Bytes> = self.env.storage().persistent().get(&self.key(key));
        Ok(value.map(|bytes| to_vec(&bytes)))
    }

    fn put(&mut self, key: &str, value: &[u8]) -> Result<(), LedgerError> {
        let key = self.key(key);
        let storage = self.env.storage().persistent();
        storage.set(&key, &Bytes::from_slice(self.env, value));
        storage.extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<(), LedgerError> {
        self.env.storage().persistent().remove(&self.key(key));
        Ok(())
    }

    fn exists(&self, key: &str) -> Result<bool, LedgerError> {
        Ok(self.env.storage().persistent().has(&self.key(key)))
    }
}
