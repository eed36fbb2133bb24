//! OpenAI Responses API types.
//!
//! Wire structures for `POST /responses`. They are NOT the generic inference
//! types from chatstudio-types, which stay provider-agnostic.

use serde::{Deserialize, Serialize};

/// Request body for the Responses API.
#[derive(Debug, Clone, Serialize)]
pub struct ResponsesRequest {
    pub model: String,
    pub input: String,
    pub temperature: f64,
    pub reasoning: ReasoningConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReasoningConfig {
    pub effort: String,
}

/// Response body from the Responses API.
///
/// Some deployments return the aggregated `output_text` directly; otherwise
/// the text lives in `output[].content[]` items of type `output_text`.
#[derive(Debug, Clone, Deserialize)]
pub struct ResponsesResponse {
    #[serde(default)]
    pub output_text: Option<String>,
    #[serde(default)]
    pub output: Vec<OutputItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputItem {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub content: Vec<OutputContent>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputContent {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub text: Option<String>,
}

/// Error envelope returned with non-2xx statuses.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

impl ResponsesResponse {
    /// Collect the reply text.
    pub fn text(&self) -> Option<String> {
        if let Some(text) = &self.output_text {
            return Some(text.clone());
        }

        let parts: Vec<&str> = self
            .output
            .iter()
            .filter(|item| item.kind == "message")
            .flat_map(|item| item.content.iter())
            .filter(|c| c.kind == "output_text")
            .filter_map(|c| c.text.as_deref())
            .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(""))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serialization() {
        let req = ResponsesRequest {
            model: "gpt-5".to_string(),
            input: "SYSTEM:\nBe brief\n\nUSER:\nhi".to_string(),
            temperature: 0.2,
            reasoning: ReasoningConfig {
                effort: "medium".to_string(),
            },
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "model": "gpt-5",
                "input": "SYSTEM:\nBe brief\n\nUSER:\nhi",
                "temperature": 0.2,
                "reasoning": {"effort": "medium"}
            })
        );
    }

    #[test]
    fn test_text_from_output_text_field() {
        let resp: ResponsesResponse =
            serde_json::from_str(r#"{"id":"resp_1","output_text":"Hello!"}"#).unwrap();
        assert_eq!(resp.text().as_deref(), Some("Hello!"));
    }

    #[test]
    fn test_text_from_output_items() {
        let resp: ResponsesResponse = serde_json::from_str(
            r#"{
                "id": "resp_2",
                "output": [
                    {"type": "reasoning", "summary": []},
                    {"type": "message", "role": "assistant", "content": [
                        {"type": "output_text", "text": "Hola, "},
                        {"type": "output_text", "text": "¿qué tal?"}
                    ]}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(resp.text().as_deref(), Some("Hola, ¿qué tal?"));
    }

    #[test]
    fn test_text_missing() {
        let resp: ResponsesResponse = serde_json::from_str(r#"{"output": []}"#).unwrap();
        assert!(resp.text().is_none());
    }

    #[test]
    fn test_error_envelope() {
        let env: ErrorEnvelope =
            serde_json::from_str(r#"{"error":{"message":"bad model","type":"invalid_request_error"}}"#)
                .unwrap();
        assert_eq!(env.error.message, "bad model");
    }
}
