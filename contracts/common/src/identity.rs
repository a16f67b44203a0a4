//! Caller identity resolution over a verified credential.
//!
//! The credential subsystem itself (certificate parsing, signature checks,
//! enrollment) lives outside this crate. What reaches us is a [`ClaimSource`]:
//! a lookup over claims that have already been verified.

use alloc::string::String;
use core::fmt;
use thiserror::Error;

/// Claim carrying the caller's enrollment identifier.
pub const ENROLLMENT_ID_CLAIM: &str = "hf.EnrollmentID";

#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum IdentityError {
    /// The credential subsystem failed while extracting the claim.
    #[error("error reading '{claim}': {reason}")]
    Lookup { claim: String, reason: String },
    /// The claim is absent or empty.
    #[error("no valid '{claim}' found in the caller credential")]
    MissingClaim { claim: String },
}

/// Trusted claim lookup for the current caller.
///
/// `Ok(None)` means the credential verified but does not carry the claim.
pub trait ClaimSource {
    fn lookup_claim(&self, name: &str) -> Result<Option<String>, IdentityError>;
}

impl<C: ClaimSource + ?Sized> ClaimSource for &C {
    fn lookup_claim(&self, name: &str) -> Result<Option<String>, IdentityError> {
        (**self).lookup_claim(name)
    }
}

/// Verified identifier of the calling party.
#[derive(Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct CallerId(String);

impl CallerId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for CallerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for CallerId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<String> for CallerId {
    fn eq(&self, other: &String) -> bool {
        &self.0 == other
    }
}

/// Resolves the caller's identity from the named claim.
///
/// Re-run on every call; nothing is memoized.
pub fn resolve_caller_identity<C>(claims: &C, claim: &str) -> Result<CallerId, IdentityError>
where
    C: ClaimSource + ?Sized,
{
    match claims.lookup_claim(claim)? {
        Some(value) if !value.is_empty() => Ok(CallerId(value)),
        _ => Err(IdentityError::MissingClaim {
            claim: String::from(claim),
        }),
    }
}
