use alloc::string::{String, ToString};
use core::fmt;

use ehr_common::{IdentityError, LedgerError};
use soroban_sdk::{log, Env, Symbol};
use thiserror::Error;

/// Externally callable operations, used to label error context.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Operation {
    CreateRecord,
    ReadRecord,
    UpdateRecord,
    DeleteRecord,
    GrantConsent,
    RevokeConsent,
    ReadConsent,
    GetRaw,
    CheckAuthorization,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::CreateRecord => "create_record",
            Operation::ReadRecord => "read_record",
            Operation::UpdateRecord => "update_record",
            Operation::DeleteRecord => "delete_record",
            Operation::GrantConsent => "grant_consent",
            Operation::RevokeConsent => "revoke_consent",
            Operation::ReadConsent => "read_consent",
            Operation::GetRaw => "get_raw",
            Operation::CheckAuthorization => "check_authorization",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a `NotFound` error was looking for.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Entity {
    Record,
    Consent,
    LedgerKey,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Entity::Record => "EHR",
            Entity::Consent => "consent record",
            Entity::LedgerKey => "ledger entry",
        })
    }
}

/// Stable failure categories callers branch on.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    Parse,
    Conflict,
    NotFound,
    Authorization,
    Storage,
    Identity,
}

/// Service-level failure. Every variant names the operation and the subject
/// (or ledger key) it was working on.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum EhrError {
    #[error("{op}: failed to parse input for '{subject}': {reason}")]
    Parse {
        op: Operation,
        subject: String,
        reason: String,
    },
    #[error("{op}: EHR for subject '{subject}' already exists")]
    Conflict { op: Operation, subject: String },
    #[error("{op}: no {entity} found for '{subject}'")]
    NotFound {
        op: Operation,
        subject: String,
        entity: Entity,
    },
    #[error("{op}: provider '{caller}' is not authorized for subject '{subject}'")]
    Unauthorized {
        op: Operation,
        subject: String,
        caller: String,
    },
    #[error("{op}: ledger access failed for '{subject}'")]
    Storage {
        op: Operation,
        subject: String,
        #[source]
        source: LedgerError,
    },
    #[error("{op}: caller identity unavailable while handling '{subject}'")]
    Identity {
        op: Operation,
        subject: String,
        #[source]
        source: IdentityError,
    },
}

impl EhrError {
    pub fn parse(op: Operation, subject: &str, reason: impl ToString) -> Self {
        EhrError::Parse {
            op,
            subject: String::from(subject),
            reason: reason.to_string(),
        }
    }

    pub fn storage(op: Operation, subject: &str, source: LedgerError) -> Self {
        EhrError::Storage {
            op,
            subject: String::from(subject),
            source,
        }
    }

    pub fn identity(op: Operation, subject: &str, source: IdentityError) -> Self {
        EhrError::Identity {
            op,
            subject: String::from(subject),
            source,
        }
    }

    pub fn not_found(op: Operation, subject: &str, entity: Entity) -> Self {
        EhrError::NotFound {
            op,
            subject: String::from(subject),
            entity,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            EhrError::Parse { .. } => ErrorKind::Parse,
            EhrError::Conflict { .. } => ErrorKind::Conflict,
            EhrError::NotFound { .. } => ErrorKind::NotFound,
            EhrError::Unauthorized { .. } => ErrorKind::Authorization,
            EhrError::Storage { .. } => ErrorKind::Storage,
            EhrError::Identity { .. } => ErrorKind::Identity,
        }
    }

    pub fn operation(&self) -> Operation {
        match self {
            EhrError::Parse { op, .. }
            | EhrError::Conflict { op, .. }
            | EhrError::NotFound { op, .. }
            | EhrError::Unauthorized { op, .. }
            | EhrError::Storage { op, .. }
            | EhrError::Identity { op, .. } => *op,
        }
    }

    pub fn subject(&self) -> &str {
        match self {
            EhrError::Parse { subject, .. }
            | EhrError::Conflict { subject, .. }
            | EhrError::NotFound { subject, .. }
            | EhrError::Unauthorized { subject, .. }
            | EhrError::Storage { subject, .. }
            | EhrError::Identity { subject, .. } => subject,
        }
    }

    /// Message including the underlying cause, for diagnostics.
    pub fn detail(&self) -> String {
        match self {
            EhrError::Storage { source, .. } => alloc::format!("{self}: {source}"),
            EhrError::Identity { source, .. } => alloc::format!("{self}: {source}"),
            _ => self.to_string(),
        }
    }
}

/// Error categories for classifying different types of errors
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ErrorCategory {
    /// Validation errors: malformed input or stored documents
    Validation = 1,
    /// Authorization errors: consent or admin checks failed
    Authorization = 2,
    /// Not found errors: resource lookup failures
    NotFound = 3,
    /// State conflict errors: duplicate creation, repeated initialization
    StateConflict = 4,
    /// Storage errors: ledger operation failures
    Storage = 5,
    /// Identity errors: the caller credential could not be resolved
    Identity = 6,
}

/// Error severity levels indicating the impact and urgency of errors
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ErrorSeverity {
    Low = 1,
    Medium = 2,
    High = 3,
}

#[soroban_sdk::contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ContractError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    Unauthorized = 3,
    InvalidInput = 4,
    CredentialNotFound = 5,
    ParseError = 10,
    ConflictError = 11,
    NotFoundError = 12,
    AuthorizationError = 13,
    StorageError = 14,
    IdentityError = 15,
}

impl ContractError {
    /// Returns the error category for this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            ContractError::InvalidInput | ContractError::ParseError => ErrorCategory::Validation,
            ContractError::Unauthorized | ContractError::AuthorizationError => {
                ErrorCategory::Authorization
            }
            ContractError::NotInitialized
            | ContractError::CredentialNotFound
            | ContractError::NotFoundError => ErrorCategory::NotFound,
            ContractError::AlreadyInitialized | ContractError::ConflictError => {
                ErrorCategory::StateConflict
            }
            ContractError::StorageError => ErrorCategory::Storage,
            ContractError::IdentityError => ErrorCategory::Identity,
        }
    }

    /// Returns the severity level for this error.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ContractError::InvalidInput
            | ContractError::ParseError
            | ContractError::NotFoundError
            | ContractError::CredentialNotFound
            | ContractError::ConflictError
            | ContractError::AlreadyInitialized => ErrorSeverity::Low,
            ContractError::Unauthorized
            | ContractError::AuthorizationError
            | ContractError::IdentityError
            | ContractError::NotInitialized => ErrorSeverity::Medium,
            ContractError::StorageError => ErrorSeverity::High,
        }
    }

    /// Only ledger failures are worth retrying unchanged.
    pub fn retryable(&self) -> bool {
        matches!(self, ContractError::StorageError)
    }

    pub fn message(&self) -> &'static str {
        match self {
            ContractError::NotInitialized => "Contract has not been initialized",
            ContractError::AlreadyInitialized => "Contract is already initialized",
            ContractError::Unauthorized => "Caller is not the contract admin",
            ContractError::InvalidInput => "Invalid input parameters provided",
            ContractError::CredentialNotFound => "No credential enrolled for this address",
            ContractError::ParseError => "Malformed JSON document",
            ContractError::ConflictError => "EHR already exists for this subject",
            ContractError::NotFoundError => "Requested entry does not exist",
            ContractError::AuthorizationError => "Provider is not authorized for this subject",
            ContractError::StorageError => "Ledger operation failed",
            ContractError::IdentityError => "Caller identity could not be resolved",
        }
    }
}

impl From<&EhrError> for ContractError {
    fn from(err: &EhrError) -> Self {
        match err.kind() {
            ErrorKind::Parse => ContractError::ParseError,
            ErrorKind::Conflict => ContractError::ConflictError,
            ErrorKind::NotFound => ContractError::NotFoundError,
            ErrorKind::Authorization => ContractError::AuthorizationError,
            ErrorKind::Storage => ContractError::StorageError,
            ErrorKind::Identity => ContractError::IdentityError,
        }
    }
}

impl From<EhrError> for ContractError {
    fn from(err: EhrError) -> Self {
        ContractError::from(&err)
    }
}

/// Emits the full failure context to the diagnostic log and returns the
/// contract error code for it.
pub fn report(env: &Env, err: EhrError) -> ContractError {
    let code = ContractError::from(&err);
    let op = Symbol::new(env, err.operation().as_str());
    let detail = soroban_sdk::String::from_str(env, &err.detail());
    log!(env, "{} failed ({}): {}", op, code as u32, detail);
    code
}
