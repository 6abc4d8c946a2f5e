//! Request, result and record types shared by the scanner, storage and the
//! HTTP surface.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error_handling::ScanError;
use crate::security::{classify, SummaryItem};

/// A request to scan one URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanRequest {
    pub url: String,
}

impl ScanRequest {
    pub fn new(url: impl Into<String>) -> Self {
        ScanRequest { url: url.into() }
    }

    /// Parses a request body.
    ///
    /// A body that is not JSON, lacks `url`, or whose `url` is not a string is
    /// `InvalidInput`. Emptiness and syntax are checked later by validation.
    pub fn from_json(body: &[u8]) -> Result<Self, ScanError> {
        let value: serde_json::Value =
            serde_json::from_slice(body).map_err(|_| ScanError::InvalidInput)?;
        match value.get("url") {
            Some(serde_json::Value::String(url)) => Ok(ScanRequest::new(url.clone())),
            _ => Err(ScanError::InvalidInput),
        }
    }
}

/// Outcome of one scan, as returned to the caller and stored in history.
///
/// Successful results carry `https` and `headers`; failed results carry only
/// `error`. Header names are lower-case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub https: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ScanResult {
    pub fn succeeded(https: bool, headers: BTreeMap<String, String>) -> Self {
        ScanResult {
            success: true,
            https: Some(https),
            headers: Some(headers),
            error: None,
        }
    }

    pub fn failed(error: &ScanError) -> Self {
        ScanResult {
            success: false,
            https: None,
            headers: None,
            error: Some(error.to_string()),
        }
    }

    /// Classified summary of this result; empty for failed scans.
    pub fn summary(&self) -> Vec<SummaryItem> {
        if !self.success {
            return Vec::new();
        }
        let empty = BTreeMap::new();
        classify(
            self.https.unwrap_or(false),
            self.headers.as_ref().unwrap_or(&empty),
        )
    }
}

/// A scan persisted in the history of its owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanRecord {
    pub id: String,
    pub owner_id: String,
    pub url: String,
    /// Serialized `ScanResult` JSON
    pub result: String,
    pub created_at: DateTime<Utc>,
    pub notes: Option<String>,
}

impl ScanRecord {
    /// Deserializes the stored result.
    pub fn scan_result(&self) -> Result<ScanResult, serde_json::Error> {
        serde_json::from_str(&self.result)
    }
}

/// The authenticated caller of a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::security::Level;

    #[test]
    fn test_request_from_json() {
        let req = ScanRequest::from_json(br#"{"url":"https://example.com"}"#).unwrap();
        assert_eq!(req.url, "https://example.com");
    }

    #[test]
    fn test_request_rejects_missing_or_non_string_url() {
        let bodies: [&[u8]; 6] = [
            br#"{}"#,
            br#"{"url":null}"#,
            br#"{"url":42}"#,
            br#"{"url":["https://example.com"]}"#,
            br#"not json"#,
            br#""#,
        ];
        for body in bodies {
            assert_eq!(
                ScanRequest::from_json(body),
                Err(ScanError::InvalidInput),
                "{}",
                String::from_utf8_lossy(body)
            );
        }
    }

    #[test]
    fn test_successful_result_wire_format() {
        let mut headers = BTreeMap::new();
        headers.insert("x-frame-options".to_string(), "DENY".to_string());
        let json = serde_json::to_value(ScanResult::succeeded(true, headers)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "success": true,
                "https": true,
                "headers": {"x-frame-options": "DENY"}
            })
        );
    }

    #[test]
    fn test_failed_result_wire_format() {
        let json = serde_json::to_value(ScanResult::failed(&ScanError::Timeout)).unwrap();
        assert_eq!(json["success"], false);
        assert!(json.get("https").is_none());
        assert!(json.get("headers").is_none());
        assert!(json["error"].as_str().unwrap().starts_with("Scan timed out"));
    }

    #[test]
    fn test_failed_result_has_empty_summary() {
        assert!(ScanResult::failed(&ScanError::MalformedUrl)
            .summary()
            .is_empty());
    }

    #[test]
    fn test_stored_result_recomputes_summary() {
        let record = ScanRecord {
            id: "r1".into(),
            owner_id: "u1".into(),
            url: "http://example.com".into(),
            result: r#"{"success":true,"https":false,"headers":{"content-security-policy":"default-src 'self'"}}"#.into(),
            created_at: Utc::now(),
            notes: None,
        };
        let summary = record.scan_result().unwrap().summary();
        assert_eq!(summary.len(), 4);
        assert_eq!(summary[0].level, Level::Issue);
        assert_eq!(summary[1].level, Level::Pass);
    }

    #[test]
    fn test_record_serializes_camel_case() {
        let record = ScanRecord {
            id: "r1".into(),
            owner_id: "u1".into(),
            url: "https://example.com".into(),
            result: "{}".into(),
            created_at: Utc::now(),
            notes: Some("check again".into()),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("ownerId").is_some());
        assert!(json.get("createdAt").is_some());
        assert_eq!(json["notes"], "check again");
    }
}
