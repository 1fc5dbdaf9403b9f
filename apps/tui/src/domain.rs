use serde::{Deserialize, Serialize};

/// Body of `POST /api/generate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerateRequest {
    pub prompt: String,
}

impl GenerateRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
        }
    }
}

/// Reply from the generation backend. Every field is optional on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refined_prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GenerateResponse {
    // Empty strings count as absent, the backend sends `""` for "nothing".
    pub fn refined_prompt(&self) -> Option<&str> {
        non_empty(self.refined_prompt.as_deref())
    }

    pub fn image(&self) -> Option<&str> {
        non_empty(self.image.as_deref())
    }

    pub fn error(&self) -> Option<&str> {
        non_empty(self.error.as_deref())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_prompt_only() -> Result<(), serde_json::Error> {
        let body = serde_json::to_value(GenerateRequest::new("cyberpunk samurai"))?;
        assert_eq!(body, serde_json::json!({ "prompt": "cyberpunk samurai" }));
        Ok(())
    }

    #[test]
    fn response_accepts_missing_and_null_fields() -> Result<(), serde_json::Error> {
        let response: GenerateResponse =
            serde_json::from_str(r#"{"refinedPrompt":"A neon dragon","image":null}"#)?;
        assert_eq!(response.refined_prompt(), Some("A neon dragon"));
        assert_eq!(response.image(), None);
        assert_eq!(response.error(), None);

        let empty: GenerateResponse = serde_json::from_str("{}")?;
        assert_eq!(empty, GenerateResponse::default());
        Ok(())
    }

    #[test]
    fn empty_strings_are_treated_as_absent() -> Result<(), serde_json::Error> {
        let response: GenerateResponse =
            serde_json::from_str(r#"{"refinedPrompt":"","image":"","error":""}"#)?;
        assert_eq!(response.refined_prompt(), None);
        assert_eq!(response.image(), None);
        assert_eq!(response.error(), None);
        Ok(())
    }

    #[test]
    fn non_string_image_is_rejected() {
        let parsed = serde_json::from_str::<GenerateResponse>(r#"{"image":42}"#);
        assert!(parsed.is_err());
    }
}
