//! Collaborator interfaces shared by the EHR contract suite.
//!
//! This crate provides:
//! - [`Ledger`]: the byte-oriented key-value store the services persist into.
//! - [`ClaimSource`]: trusted claim lookup over a verified caller credential,
//!   and [`resolve_caller_identity`] on top of it.
//! - [`TransactionContext`]: the handle a service operation receives; its only
//!   capabilities are ledger access and claim lookup.
//!
//! Nothing here depends on the Soroban host, so the services built on these
//! traits can be exercised with the doubles in [`testutils`] (enable the
//! `testutils` feature).

#![no_std]

extern crate alloc;

// ── Modules ──────────────────────────────────────────────────────────────────

pub mod context;
pub mod identity;
pub mod ledger;
#[cfg(any(test, feature = "testutils"))]
pub mod testutils;

pub use context::*;
pub use identity::*;
pub use ledger::*;
