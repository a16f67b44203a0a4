//! JSON documents persisted under the `RECORD-` and `CONSENT-` keys.
//!
//! Field names follow the wire format (`subjectID`, `ownerName`, ...). The
//! older `patientID` / `patientName` spellings are accepted on input so that
//! documents written by earlier clients still parse.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

/// A subject's electronic health record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    #[serde(rename = "subjectID", alias = "patientID")]
    pub subject_id: String,
    #[serde(alias = "patientName")]
    pub owner_name: String,
    /// Enrollment id of the creator. Overwritten at create time, carried
    /// forward on update.
    #[serde(default)]
    pub created_by: String,
    pub payload: ClinicalPayload,
    /// Caller-supplied; stored verbatim.
    pub last_updated: String,
}

/// Clinical content of a record.
///
/// `raw` and `metrics` are not checked against each other; keeping them in
/// sync is the writer's job.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClinicalPayload {
    /// Media type of `raw`, e.g. `application/fhir+json`.
    pub content_type: String,
    #[serde(default)]
    pub schema_version: u32,
    /// The document as the writer serialized it.
    pub raw: String,
    /// Numeric observations extracted from `raw` for direct access.
    #[serde(default)]
    pub metrics: BTreeMap<String, f64>,
}

/// The providers allowed to act on one subject's record.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsentEntry {
    #[serde(rename = "subjectID", alias = "patientID")]
    pub subject_id: String,
    /// Order and duplicates are preserved as granted.
    pub authorized_providers: Vec<String>,
}

impl ConsentEntry {
    /// Exact, case-sensitive membership; first match wins.
    pub fn permits(&self, caller: &str) -> bool {
        self.authorized_providers.iter().any(|p| p == caller)
    }
}
