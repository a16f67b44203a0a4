#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use crate::test::all_events;
use soroban_sdk::testutils::Address as _;
use soroban_sdk::{symbol_short, Env, IntoVal, TryIntoVal};

const P001: &str = r#"{"subjectID":"P001","ownerName":"John Doe","payload":{"contentType":"text/plain","raw":"BP 120/80"},"lastUpdated":"2025-01-01"}"#;

struct Fixture {
    env: Env,
    client: EhrRecordsContractClient<'static>,
    admin: Address,
}

impl Fixture {
    fn new() -> Self {
        let env = Env::default();
        env.mock_all_auths();

        let contract_id = env.register(EhrRecordsContract, ());
        let client = EhrRecordsContractClient::new(&env, &contract_id);

        let admin = Address::generate(&env);
        client.initialize(&admin);

        Self { env, client, admin }
    }

    fn member(&self, id: &str) -> Address {
        let member = Address::generate(&self.env);
        self.client.enroll(
            &self.admin,
            &member,
            &self.s(id),
            &self.s("Org1MSP"),
            &Map::new(&self.env),
        );
        member
    }

    fn s(&self, value: &str) -> String {
        String::from_str(&self.env, value)
    }

    fn set(&self, policy: AccessPolicy) {
        self.client.set_policy(&self.admin, &policy);
    }
}

#[test]
fn test_set_policy_requires_admin() {
    let f = Fixture::new();
    let intruder = Address::generate(&f.env);
    let policy = AccessPolicy {
        gate_consent_management: true,
        authorize_update_first: true,
    };

    assert_eq!(
        f.client.try_set_policy(&intruder, &policy),
        Err(Ok(ContractError::Unauthorized))
    );
    assert_eq!(f.client.get_policy(), AccessPolicy::default());

    f.set(policy.clone());
    let events = all_events(&f.env);
    assert_eq!(f.client.get_policy(), policy);

    let event = events.get(events.len() - 1).unwrap();
    assert_eq!(event.1, (symbol_short!("POLICY"),).into_val(&f.env));
    let payload: events::PolicyUpdatedEvent = event.2.try_into_val(&f.env).unwrap();
    assert_eq!(payload.policy, policy);
}

#[test]
fn test_set_policy_before_initialize_fails() {
    let env = Env::default();
    env.mock_all_auths();
    let contract_id = env.register(EhrRecordsContract, ());
    let client = EhrRecordsContractClient::new(&env, &contract_id);
    let someone = Address::generate(&env);

    assert_eq!(
        client.try_set_policy(&someone, &AccessPolicy::default()),
        Err(Ok(ContractError::NotInitialized))
    );
}

#[test]
fn test_authorize_update_first_hides_existence() {
    let f = Fixture::new();
    let stranger = f.member("nobody");

    assert_eq!(
        f.client.try_update_record(&stranger, &f.s(P001)),
        Err(Ok(ContractError::NotFoundError))
    );

    f.set(AccessPolicy {
        authorize_update_first: true,
        ..AccessPolicy::default()
    });
    assert_eq!(
        f.client.try_update_record(&stranger, &f.s(P001)),
        Err(Ok(ContractError::AuthorizationError))
    );
}

#[test]
fn test_authorize_update_first_still_updates_for_consented_callers() {
    let f = Fixture::new();
    let doctor = f.member("dr-house");
    f.set(AccessPolicy {
        authorize_update_first: true,
        ..AccessPolicy::default()
    });

    f.client.create_record(&doctor, &f.s(P001));
    f.client.grant_consent(&doctor, &f.s("P001"), &f.s(r#"["dr-house"]"#));
    f.client.update_record(&doctor, &f.s(&P001.replace("BP 120/80", "BP 118/76")));

    let raw = convert::to_std_string(&f.client.get_raw(&f.s("RECORD-P001"))).unwrap();
    assert!(raw.contains("BP 118/76"));
}

#[test]
fn test_gated_consent_allows_the_subject_itself() {
    let f = Fixture::new();
    let patient = f.member("P001");
    let doctor = f.member("dr-house");
    f.set(AccessPolicy {
        gate_consent_management: true,
        ..AccessPolicy::default()
    });

    f.client.grant_consent(&patient, &f.s("P001"), &f.s(r#"["dr-house"]"#));
    assert!(f.client.check_authorization(&doctor, &f.s("P001")));
}

#[test]
fn test_gated_consent_allows_authorized_providers() {
    let f = Fixture::new();
    let patient = f.member("P001");
    let house = f.member("dr-house");
    let wilson = f.member("dr-wilson");
    f.set(AccessPolicy {
        gate_consent_management: true,
        ..AccessPolicy::default()
    });

    f.client.grant_consent(&patient, &f.s("P001"), &f.s(r#"["dr-house"]"#));
    f.client.grant_consent(&house, &f.s("P001"), &f.s(r#"["dr-house","dr-wilson"]"#));
    assert!(f.client.check_authorization(&wilson, &f.s("P001")));
}

#[test]
fn test_gated_consent_rejects_outsiders() {
    let f = Fixture::new();
    let patient = f.member("P001");
    let outsider = f.member("dr-evil");
    f.set(AccessPolicy {
        gate_consent_management: true,
        ..AccessPolicy::default()
    });

    f.client.grant_consent(&patient, &f.s("P001"), &f.s(r#"["dr-house"]"#));

    assert_eq!(
        f.client.try_grant_consent(&outsider, &f.s("P001"), &f.s(r#"["dr-evil"]"#)),
        Err(Ok(ContractError::AuthorizationError))
    );
    assert_eq!(
        f.client.try_revoke_consent(&outsider, &f.s("P001")),
        Err(Ok(ContractError::AuthorizationError))
    );
    assert!(!f.client.check_authorization(&outsider, &f.s("P001")));
}

#[test]
fn test_gated_consent_needs_an_enrolled_caller() {
    let f = Fixture::new();
    let anonymous = Address::generate(&f.env);
    f.set(AccessPolicy {
        gate_consent_management: true,
        ..AccessPolicy::default()
    });

    assert_eq!(
        f.client.try_grant_consent(&anonymous, &f.s("P001"), &f.s("[]")),
        Err(Ok(ContractError::IdentityError))
    );
}
