#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use soroban_sdk::{testutils::Address as _, Address, Env, Map, String};
use ehr_records::{AccessPolicy, EhrRecordsContract, EhrRecordsContractClient};

const SUBJECTS: [&str; 3] = ["P001", "P002", "P003"];

#[derive(Arbitrary, Debug)]
pub enum FuzzAction {
    Create { caller: u8, json: Vec<u8> },
    CreateWellFormed { caller: u8, subject: u8, owner: String8 },
    Read { caller: u8, subject: Vec<u8> },
    Update { caller: u8, json: Vec<u8> },
    Delete { caller: u8, subject: u8 },
    Grant { caller: u8, subject: u8, providers: Vec<u8> },
    GrantMembers { caller: u8, subject: u8, members: Vec<u8> },
    Revoke { caller: u8, subject: u8 },
    GetRaw { key: Vec<u8> },
    SetPolicy { gate: bool, update_first: bool },
}

/// Short printable text for names.
#[derive(Arbitrary, Debug)]
pub struct String8([u8; 8]);

impl String8 {
    fn as_text(&self) -> std::string::String {
        self.0.iter().map(|b| char::from(b'a' + b % 26)).collect()
    }
}

fuzz_target!(|actions: Vec<FuzzAction>| {
    let env = Env::default();
    env.mock_all_auths();
    let admin = Address::generate(&env);

    let contract_id = env.register(EhrRecordsContract, ());
    let client = EhrRecordsContractClient::new(&env, &contract_id);
    let _ = client.try_initialize(&admin);

    // Members 0..4 are enrolled, the last one is not.
    let mut members = vec![];
    for i in 0..5 {
        let member = Address::generate(&env);
        if i < 4 {
            let id = format!("member-{i}");
            client.enroll(
                &admin,
                &member,
                &String::from_str(&env, &id),
                &String::from_str(&env, "Org1MSP"),
                &Map::new(&env),
            );
        }
        members.push(member);
    }

    let text = |s: &str| String::from_str(&env, s);
    let bytes = |b: &[u8]| String::from_bytes(&env, b);
    let member = |i: u8| &members[usize::from(i) % members.len()];
    let subject = |i: u8| SUBJECTS[usize::from(i) % SUBJECTS.len()];

    // Every call either succeeds or returns a contract error; a host panic is
    // a finding.
    for action in actions {
        match action {
            FuzzAction::Create { caller, json } => {
                let _ = client.try_create_record(member(caller), &bytes(&json));
            }
            FuzzAction::CreateWellFormed { caller, subject: s, owner } => {
                let doc = format!(
                    r#"{{"subjectID":"{}","ownerName":"{}","payload":{{"contentType":"text/plain","raw":"x"}},"lastUpdated":"d"}}"#,
                    subject(s),
                    owner.as_text()
                );
                let _ = client.try_create_record(member(caller), &text(&doc));
            }
            FuzzAction::Read { caller, subject: s } => {
                let _ = client.try_read_record(member(caller), &bytes(&s));
            }
            FuzzAction::Update { caller, json } => {
                let _ = client.try_update_record(member(caller), &bytes(&json));
            }
            FuzzAction::Delete { caller, subject: s } => {
                let _ = client.try_delete_record(member(caller), &text(subject(s)));
            }
            FuzzAction::Grant { caller, subject: s, providers } => {
                let _ = client.try_grant_consent(member(caller), &text(subject(s)), &bytes(&providers));
            }
            FuzzAction::GrantMembers { caller, subject: s, members: picked } => {
                let names: Vec<std::string::String> =
                    picked.iter().map(|i| format!("member-{}", i % 5)).collect();
                let list = format!("[{}]", names.iter().map(|n| format!("\"{n}\"")).collect::<Vec<_>>().join(","));
                let _ = client.try_grant_consent(member(caller), &text(subject(s)), &text(&list));
            }
            FuzzAction::Revoke { caller, subject: s } => {
                let _ = client.try_revoke_consent(member(caller), &text(subject(s)));
            }
            FuzzAction::GetRaw { key } => {
                let _ = client.try_get_raw(&bytes(&key));
            }
            FuzzAction::SetPolicy { gate, update_first } => {
                let policy = AccessPolicy {
                    gate_consent_management: gate,
                    authorize_update_first: update_first,
                };
                client.set_policy(&admin, &policy);
            }
        }
    }
});
