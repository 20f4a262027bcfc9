use serde_json::{json, Value};
use tracing::info;

use crate::config::SummarizerConfig;
use crate::error::{NotesError, Result};

/// Remote text-generation model that produces a summary for a transcript.
#[async_trait::async_trait]
pub trait SummaryModel: Send + Sync {
    async fn summarize(&self, text: &str) -> Result<String>;
}

/// Request body for the inference endpoint. Shared by the direct client and
/// the `/api/summarize` proxy so both speak the same wire format.
pub fn inference_request_body(text: &str, max_length: u32, min_length: u32) -> Value {
    json!({
        "inputs": text,
        "parameters": {
            "max_length": max_length,
            "min_length": min_length,
            "do_sample": false,
        },
        "options": { "wait_for_model": true },
    })
}

/// Hugging Face Inference API client.
pub struct HuggingFaceClient {
    http: reqwest::Client,
    endpoint: String,
    token: String,
    max_length: u32,
    min_length: u32,
}

impl HuggingFaceClient {
    pub fn new(http: reqwest::Client, config: &SummarizerConfig, token: String) -> Self {
        Self {
            http,
            endpoint: config.endpoint.clone(),
            token,
            max_length: config.max_length,
            min_length: config.min_length,
        }
    }
}

#[async_trait::async_trait]
impl SummaryModel for HuggingFaceClient {
    async fn summarize(&self, text: &str) -> Result<String> {
        let body = inference_request_body(text, self.max_length, self.min_length);

        info!("Requesting summary from {}", self.endpoint);

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let payload: Value = response
            .json()
            .await
            .map_err(|e| NotesError::Remote(format!("invalid response body: {e}")))?;

        if !status.is_success() {
            return Err(NotesError::Remote(format!("HTTP {status}: {payload}")));
        }

        extract_summary_text(&payload)
            .ok_or_else(|| NotesError::Remote("response contained no generated text".to_string()))
    }
}

/// The inference API answers `[{"summary_text": ...}]` for summarization
/// models and `[{"generated_text": ...}]` for generation models.
fn extract_summary_text(payload: &Value) -> Option<String> {
    let first = payload.as_array()?.first()?;
    first
        .get("summary_text")
        .or_else(|| first.get("generated_text"))?
        .as_str()
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_shape() {
        let body = inference_request_body("some text", 130, 30);

        assert_eq!(body["inputs"], "some text");
        assert_eq!(body["parameters"]["max_length"], 130);
        assert_eq!(body["parameters"]["min_length"], 30);
        assert_eq!(body["parameters"]["do_sample"], false);
        assert_eq!(body["options"]["wait_for_model"], true);
    }

    #[test]
    fn test_extract_summary_text() {
        let payload = json!([{"summary_text": "A short recap."}]);
        assert_eq!(
            extract_summary_text(&payload),
            Some("A short recap.".to_string())
        );

        let generated = json!([{"generated_text": "Recap."}]);
        assert_eq!(extract_summary_text(&generated), Some("Recap.".to_string()));

        let error_payload = json!({"error": "model loading"});
        assert_eq!(extract_summary_text(&error_payload), None);

        assert_eq!(extract_summary_text(&json!([])), None);
    }
}
