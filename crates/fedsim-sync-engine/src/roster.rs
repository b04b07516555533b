//! Roster feeds: global model info, participating clients, datasets.
//!
//! These are display-only payloads polled on the slow cadence; each field of
//! [`RosterState`] is replaced whole when its feed answers.

use serde::{Deserialize, Serialize};

/// Version info of the aggregated global model.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub weights_url: Option<String>,
}

/// One participating edge device.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientInfo {
    #[serde(alias = "client_id")]
    pub id: String,
    #[serde(default)]
    pub status: String,
    #[serde(default, alias = "lastActive")]
    pub last_active: String,
    /// Number of updates this client contributed to the ledger.
    #[serde(default)]
    pub contribution: u64,
}

/// Preview of one training-data partition. The backend truncates `preview`
/// to the first 2000 characters.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DatasetPreview {
    #[serde(default)]
    pub dataset: String,
    #[serde(default)]
    pub total_size: u64,
    #[serde(default)]
    pub preview: String,
}

impl DatasetPreview {
    /// Size label in whole kilobytes, mirroring what the backend reports.
    pub fn size_kib(&self) -> u64 {
        self.total_size / 1024
    }
}

/// Latest roster snapshot consumed by the Clients / Datasets / Models pages.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RosterState {
    pub model: Option<ModelInfo>,
    pub clients: Vec<ClientInfo>,
    pub datasets: Vec<String>,
    /// Loaded on demand when the operator selects a dataset.
    pub dataset_preview: Option<DatasetPreview>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_info_accepts_both_id_spellings() {
        let a: ClientInfo = serde_json::from_str(r#"{"id": "client_01"}"#).unwrap();
        assert_eq!(a.id, "client_01");

        let b: ClientInfo = serde_json::from_str(r#"{"client_id": "client_02"}"#).unwrap();
        assert_eq!(b.id, "client_02");
    }

    #[test]
    fn test_dataset_preview_size_label() {
        let preview = DatasetPreview {
            dataset: "client_1.txt".to_string(),
            total_size: 10_240,
            preview: String::new(),
        };
        assert_eq!(preview.size_kib(), 10);
    }
}
