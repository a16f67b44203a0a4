use soroban_sdk::{symbol_short, Address, Env, String};

use crate::policy::AccessPolicy;

/// Event published when the contract is initialized.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub admin: Address,
    pub timestamp: u64,
}

/// Event published when a member address is enrolled or re-enrolled.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EnrolledEvent {
    pub member: Address,
    pub enrollment_id: String,
    pub organization_id: String,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EnrollmentRevokedEvent {
    pub member: Address,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PolicyUpdatedEvent {
    pub admin: Address,
    pub policy: AccessPolicy,
    pub timestamp: u64,
}

/// Event published when a record is written or removed. The record body is
/// never part of an event.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RecordEvent {
    pub subject_id: String,
    pub actor: Address,
    pub timestamp: u64,
}

/// Event published when a consent list is replaced.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConsentGrantedEvent {
    pub subject_id: String,
    pub granted_by: Address,
    pub provider_count: u32,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConsentRevokedEvent {
    pub subject_id: String,
    pub revoked_by: Address,
    pub timestamp: u64,
}

pub fn publish_initialized(env: &Env, admin: Address) {
    let topics = (symbol_short!("INIT"),);
    let data = InitializedEvent {
        admin,
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish(topics, data);
}

pub fn publish_enrolled(
    env: &Env,
    member: Address,
    enrollment_id: String,
    organization_id: String,
) {
    let topics = (symbol_short!("ENROLL"), member.clone());
    let data = EnrolledEvent {
        member,
        enrollment_id,
        organization_id,
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish(topics, data);
}

pub fn publish_enrollment_revoked(env: &Env, member: Address) {
    let topics = (symbol_short!("UNENROLL"), member.clone());
    let data = EnrollmentRevokedEvent {
        member,
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish(topics, data);
}

pub fn publish_policy_updated(env: &Env, admin: Address, policy: AccessPolicy) {
    let topics = (symbol_short!("POLICY"),);
    let data = PolicyUpdatedEvent {
        admin,
        policy,
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish(topics, data);
}

/// Publishes a record lifecycle event. Topics carry the subject so indexers
/// can follow one record without decoding payloads.
fn publish_record(env: &Env, topic: soroban_sdk::Symbol, subject_id: String, actor: Address) {
    let topics = (topic, subject_id.clone());
    let data = RecordEvent {
        subject_id,
        actor,
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish(topics, data);
}

pub fn publish_record_created(env: &Env, subject_id: String, actor: Address) {
    publish_record(env, symbol_short!("REC_NEW"), subject_id, actor);
}

pub fn publish_record_updated(env: &Env, subject_id: String, actor: Address) {
    publish_record(env, symbol_short!("REC_UPD"), subject_id, actor);
}

pub fn publish_record_deleted(env: &Env, subject_id: String, actor: Address) {
    publish_record(env, symbol_short!("REC_DEL"), subject_id, actor);
}

pub fn publish_consent_granted(
    env: &Env,
    subject_id: String,
    granted_by: Address,
    provider_count: u32,
) {
    let topics = (symbol_short!("CNS_GRT"), subject_id.clone());
    let data = ConsentGrantedEvent {
        subject_id,
        granted_by,
        provider_count,
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish(topics, data);
}

pub fn publish_consent_revoked(env: &Env, subject_id: String, revoked_by: Address) {
    let topics = (symbol_short!("CNS_REV"), subject_id.clone());
    let data = ConsentRevokedEvent {
        subject_id,
        revoked_by,
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish(topics, data);
}
