//! Request/response envelope of the analysis endpoint.
//!
//! One endpoint drives both the dashboard and the chat; the two differ only
//! in the query text.

use super::model::AggregatedReport;
use super::null_as_default;
use crate::selection::{Language, Selection};
use serde::{Deserialize, Serialize};

/// Body of `POST /api/chat` (also the real-time channel's outbound frame).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub query: String,
    pub language: Language,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crop: Option<String>,
}

impl AnalysisRequest {
    /// A free-text question scoped to the current selection.
    pub fn for_selection(query: impl Into<String>, selection: &Selection) -> Self {
        Self {
            query: query.into(),
            language: selection.language,
            state: Some(selection.region.clone()),
            crop: Some(selection.crop.clone()),
        }
    }

    /// The request a dashboard refresh issues for `selection`.
    pub fn dashboard(selection: &Selection) -> Self {
        Self::for_selection(
            format!(
                "Crop analysis for {} in {}",
                selection.crop, selection.region
            ),
            selection,
        )
    }

    /// Returns true if this request targets the given region and crop.
    pub fn targets(&self, state: Option<&str>, crop: Option<&str>) -> bool {
        self.state.as_deref() == state && self.crop.as_deref() == crop
    }

    /// Returns true if `response` answers this request: same region and
    /// crop, and the same language when the response reports one.
    pub fn answered_by(&self, response: &AnalysisResponse) -> bool {
        let same_language = match response.language.as_deref() {
            Some(code) => Language::parse(code).is_ok_and(|language| language == self.language),
            None => true,
        };
        same_language && self.targets(response.state.as_deref(), response.crop.as_deref())
    }
}

/// Response metadata reported by the backend pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseMetadata {
    pub execution_time_seconds: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub agents_used: Vec<String>,
    pub timestamp: Option<String>,
    pub response_time_ms: Option<u64>,
}

/// Response of `POST /api/chat` and of the real-time channel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub success: bool,
    pub query: Option<String>,
    pub state: Option<String>,
    pub crop: Option<String>,
    pub language: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub response: AggregatedReport,
    pub raw_data: Option<serde_json::Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub metadata: ResponseMetadata,
    /// Failure reason when `success` is false.
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selection() -> Selection {
        Selection {
            region: "Punjab".to_string(),
            crop: "Wheat".to_string(),
            language: Language::Hi,
        }
    }

    #[test]
    fn test_request_wire_shape() {
        let request = AnalysisRequest::for_selection("Will it rain?", &selection());
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "query": "Will it rain?",
                "language": "hi",
                "state": "Punjab",
                "crop": "Wheat"
            })
        );
    }

    #[test]
    fn test_optional_fields_are_omitted() {
        let request = AnalysisRequest {
            query: "hello".into(),
            language: Language::En,
            state: None,
            crop: None,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert!(value.get("state").is_none());
        assert!(value.get("crop").is_none());
    }

    #[test]
    fn test_dashboard_request_targets_selection() {
        let request = AnalysisRequest::dashboard(&selection());
        assert!(request.targets(Some("Punjab"), Some("Wheat")));
        assert!(!request.targets(Some("Punjab"), Some("Rice")));
    }

    #[test]
    fn test_answered_by_checks_language() {
        let request = AnalysisRequest::dashboard(&selection());
        let mut response: AnalysisResponse = serde_json::from_value(serde_json::json!({
            "success": true, "state": "Punjab", "crop": "Wheat", "language": "hi"
        }))
        .unwrap();
        assert!(request.answered_by(&response));

        response.language = Some("en".into());
        assert!(!request.answered_by(&response));

        response.language = None;
        assert!(request.answered_by(&response));

        response.crop = Some("Rice".into());
        assert!(!request.answered_by(&response));
    }

    #[test]
    fn test_response_decodes_with_metadata() {
        let json = r#"{
            "success": true, "query": "q", "state": "Punjab", "crop": "Wheat", "language": "en",
            "response": {"summary": {"text": "ok"}},
            "raw_data": {"weather": {}},
            "metadata": {"execution_time_seconds": 1.25, "agents_used": ["weather", "soil"],
                         "timestamp": "2024-06-01T10:00:00", "response_time_ms": 1250}
        }"#;
        let response: AnalysisResponse = serde_json::from_str(json).unwrap();
        assert!(response.success);
        assert_eq!(response.response.summary_text(), Some("ok"));
        assert_eq!(response.metadata.agents_used, vec!["weather", "soil"]);
        assert_eq!(response.metadata.response_time_ms, Some(1250));
    }

    #[test]
    fn test_failure_response_decodes() {
        let json = r#"{"success": false, "error": "pipeline crashed", "query": "q"}"#;
        let response: AnalysisResponse = serde_json::from_str(json).unwrap();
        assert!(!response.success);
        assert_eq!(response.error.as_deref(), Some("pipeline crashed"));
        assert_eq!(response.response, AggregatedReport::default());
    }
}
