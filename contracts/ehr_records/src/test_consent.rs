#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use crate::test::all_events;
use soroban_sdk::testutils::Address as _;
use soroban_sdk::{symbol_short, Env, IntoVal, TryIntoVal};

fn setup() -> (Env, EhrRecordsContractClient<'static>, Address) {
    let env = Env::default();
    env.mock_all_auths();

    let contract_id = env.register(EhrRecordsContract, ());
    let client = EhrRecordsContractClient::new(&env, &contract_id);

    let admin = Address::generate(&env);
    client.initialize(&admin);

    (env, client, admin)
}

fn enroll(env: &Env, client: &EhrRecordsContractClient, admin: &Address, id: &str) -> Address {
    let member = Address::generate(env);
    client.enroll(
        admin,
        &member,
        &String::from_str(env, id),
        &String::from_str(env, "Org1MSP"),
        &Map::new(env),
    );
    member
}

fn consent_of(env: &Env, client: &EhrRecordsContractClient, subject: &str) -> ConsentEntry {
    let json = client.read_consent(&String::from_str(env, subject));
    serde_json::from_str(&convert::to_std_string(&json).unwrap()).unwrap()
}

#[test]
fn test_grant_consent_publishes_event() {
    let (env, client, admin) = setup();
    let patient = enroll(&env, &client, &admin, "P001");
    let subject = String::from_str(&env, "P001");

    client.grant_consent(&patient, &subject, &String::from_str(&env, r#"["ProviderA","ProviderB"]"#));

    let events = all_events(&env);
    let event = events.get(events.len() - 1).unwrap();
    assert_eq!(event.1, (symbol_short!("CNS_GRT"), subject.clone()).into_val(&env));
    let payload: events::ConsentGrantedEvent = event.2.try_into_val(&env).unwrap();
    assert_eq!(payload.granted_by, patient);
    assert_eq!(payload.provider_count, 2);

    let entry = consent_of(&env, &client, "P001");
    assert_eq!(entry.subject_id, "P001");
    assert_eq!(entry.authorized_providers, ["ProviderA", "ProviderB"]);
}

#[test]
fn test_default_deny_without_consent() {
    let (env, client, admin) = setup();
    let doctor = enroll(&env, &client, &admin, "dr-house");
    assert!(!client.check_authorization(&doctor, &String::from_str(&env, "P001")));
}

#[test]
fn test_grant_replaces_rather_than_merges() {
    let (env, client, admin) = setup();
    let a = enroll(&env, &client, &admin, "dr-a");
    let b = enroll(&env, &client, &admin, "dr-b");
    let subject = String::from_str(&env, "P001");

    client.grant_consent(&a, &subject, &String::from_str(&env, r#"["dr-a"]"#));
    assert!(client.check_authorization(&a, &subject));

    client.grant_consent(&a, &subject, &String::from_str(&env, r#"["dr-b"]"#));
    assert!(!client.check_authorization(&a, &subject));
    assert!(client.check_authorization(&b, &subject));
}

#[test]
fn test_provider_match_is_exact() {
    let (env, client, admin) = setup();
    let doctor = enroll(&env, &client, &admin, "dr-house");
    let subject = String::from_str(&env, "P001");

    client.grant_consent(&doctor, &subject, &String::from_str(&env, r#"["DR-HOUSE","dr-house "]"#));
    assert!(!client.check_authorization(&doctor, &subject));
}

#[test]
fn test_revoke_is_idempotent() {
    let (env, client, admin) = setup();
    let doctor = enroll(&env, &client, &admin, "dr-house");
    let subject = String::from_str(&env, "P001");

    client.revoke_consent(&doctor, &subject);

    client.grant_consent(&doctor, &subject, &String::from_str(&env, r#"["dr-house"]"#));
    client.revoke_consent(&doctor, &subject);
    client.revoke_consent(&doctor, &subject);

    let events = all_events(&env);
    let event = events.get(events.len() - 1).unwrap();
    assert_eq!(event.1, (symbol_short!("CNS_REV"), subject.clone()).into_val(&env));

    assert!(!client.check_authorization(&doctor, &subject));
    assert_eq!(
        client.try_read_consent(&subject),
        Err(Ok(ContractError::NotFoundError))
    );
}

#[test]
fn test_grant_rejects_malformed_provider_list() {
    let (env, client, admin) = setup();
    let doctor = enroll(&env, &client, &admin, "dr-house");
    let subject = String::from_str(&env, "P001");

    for bad in ["", "[", r#""dr-house""#, r#"[1]"#, r#"{"providers":[]}"#] {
        let result = client.try_grant_consent(&doctor, &subject, &String::from_str(&env, bad));
        assert_eq!(result, Err(Ok(ContractError::ParseError)), "input {bad}");
    }
    assert_eq!(
        client.try_read_consent(&subject),
        Err(Ok(ContractError::NotFoundError))
    );
}

#[test]
fn test_empty_provider_list_denies_everyone() {
    let (env, client, admin) = setup();
    let doctor = enroll(&env, &client, &admin, "dr-house");
    let subject = String::from_str(&env, "P001");

    client.grant_consent(&doctor, &subject, &String::from_str(&env, "[]"));
    assert!(consent_of(&env, &client, "P001").authorized_providers.is_empty());
    assert!(!client.check_authorization(&doctor, &subject));
}

#[test]
fn test_open_policy_lets_unenrolled_callers_manage_consent() {
    let (env, client, _admin) = setup();
    let anyone = Address::generate(&env);
    let subject = String::from_str(&env, "P001");

    client.grant_consent(&anyone, &subject, &String::from_str(&env, r#"["dr-x"]"#));
    assert_eq!(consent_of(&env, &client, "P001").authorized_providers, ["dr-x"]);
    client.revoke_consent(&anyone, &subject);
}

#[test]
fn test_check_authorization_requires_enrollment() {
    let (env, client, _admin) = setup();
    let stranger = Address::generate(&env);
    assert_eq!(
        client.try_check_authorization(&stranger, &String::from_str(&env, "P001")),
        Err(Ok(ContractError::IdentityError))
    );
}

#[test]
fn test_consent_is_per_subject() {
    let (env, client, admin) = setup();
    let doctor = enroll(&env, &client, &admin, "dr-house");

    client.grant_consent(
        &doctor,
        &String::from_str(&env, "P001"),
        &String::from_str(&env, r#"["dr-house"]"#),
    );
    assert!(client.check_authorization(&doctor, &String::from_str(&env, "P001")));
    assert!(!client.check_authorization(&doctor, &String::from_str(&env, "P002")));
}
