#![allow(dead_code)]

use ehr_records::{EhrRecordsContract, EhrRecordsContractClient, Record};
use soroban_sdk::{testutils::Address as _, Address, Env, Map, String};

pub struct TestContext {
    pub env: Env,
    pub client: EhrRecordsContractClient<'static>,
    pub admin: Address,
}

/// Creates a mocked Soroban environment, deploys the contract, and initializes admin.
pub fn setup_test_env() -> TestContext {
    let env = Env::default();
    env.mock_all_auths();

    let contract_id = env.register(EhrRecordsContract, ());
    let client = EhrRecordsContractClient::new(&env, &contract_id);

    let admin = Address::generate(&env);
    client.initialize(&admin);

    TestContext { env, client, admin }
}

impl TestContext {
    pub fn s(&self, value: &str) -> String {
        String::from_str(&self.env, value)
    }
}

/// Enrolls a fresh address under `enrollment_id` and returns it.
pub fn enroll_member(ctx: &TestContext, enrollment_id: &str) -> Address {
    let member = Address::generate(&ctx.env);
    ctx.client.enroll(
        &ctx.admin,
        &member,
        &ctx.s(enrollment_id),
        &ctx.s("Org1MSP"),
        &Map::new(&ctx.env),
    );
    member
}

/// A minimal valid record document for `subject_id`.
pub fn record_json(subject_id: &str, owner_name: &str, raw: &str, last_updated: &str) -> std::string::String {
    serde_json::json!({
        "subjectID": subject_id,
        "ownerName": owner_name,
        "payload": {
            "contentType": "text/plain",
            "schemaVersion": 1,
            "raw": raw,
        },
        "lastUpdated": last_updated,
    })
    .to_string()
}

pub fn to_text(value: &String) -> std::string::String {
    let mut buf = vec![0u8; value.len() as usize];
    value.copy_into_slice(&mut buf);
    std::string::String::from_utf8(buf).unwrap()
}

pub fn parse_record(value: &String) -> Record {
    serde_json::from_str(&to_text(value)).unwrap()
}
