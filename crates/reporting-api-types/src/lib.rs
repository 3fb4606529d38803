//! Request and response shapes shared by the reporting server and its CLI.
//!
//! Report definitions themselves cross the wire as untyped JSON: the server
//! validates them, so clients only need the envelopes defined here.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Prefix under which every reporting route is mounted.
pub const API_PREFIX: &str = "/api/reporting";

/// Default number of definitions returned by a list call.
pub const DEFAULT_LIST_SIZE: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// Query string accepted by `GET /reportConfigs`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportConfigListQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_direction: Option<SortDirection>,
}

/// A stored report definition: its identifier plus the persisted document,
/// which includes the server-assigned `time_created` and `last_updated`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportConfigHit {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_source")]
    pub source: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportConfigListResponse {
    pub total: u64,
    pub data: Vec<ReportConfigHit>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub error: ApiErrorMessage,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorMessage {
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

pub mod codes {
    pub const BAD_REQUEST: &str = "bad_request";
    pub const INVALID_INPUT: &str = "invalid_input";
    pub const NOT_FOUND: &str = "not_found";
    pub const STORE: &str = "store_error";
    pub const STORE_UNAVAILABLE: &str = "store_unavailable";
    pub const INTERNAL: &str = "internal_error";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_query_uses_camel_case_keys() {
        let query = ReportConfigListQuery {
            size: Some(10),
            sort_field: Some("last_updated".to_string()),
            sort_direction: Some(SortDirection::Desc),
        };
        let value = serde_json::to_value(&query).expect("serialize");
        assert_eq!(value["sortField"], "last_updated");
        assert_eq!(value["sortDirection"], "desc");
    }

    #[test]
    fn hit_keeps_store_field_names() {
        let hit: ReportConfigHit =
            serde_json::from_str(r#"{"_id":"abc","_source":{"report_name":"Daily"}}"#)
                .expect("deserialize");
        assert_eq!(hit.id, "abc");
        assert_eq!(hit.source["report_name"], "Daily");
    }
}
