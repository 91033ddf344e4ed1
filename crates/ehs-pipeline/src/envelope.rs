use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Which of the three ways an action ended.
///
/// `InvalidInput` means no model call was made and the caller should fix the form;
/// `Failed` means the call was made and a retry may help.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Succeeded,
    InvalidInput,
    Failed,
}

/// What an action hands back to its caller, success or not.
///
/// The payload is flattened so the rule builder reports `data` and video analysis
/// reports `analysis` at the top level.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ResultEnvelope<P> {
    pub outcome: Outcome,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issues: Option<Vec<String>>,
    /// Submitted form values echoed back on validation failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Map<String, Value>>,
    #[serde(flatten)]
    pub payload: Option<P>,
}

impl<P> ResultEnvelope<P> {
    pub fn success(message: impl Into<String>, payload: P) -> Self {
        Self {
            outcome: Outcome::Succeeded,
            message: message.into(),
            issues: None,
            fields: None,
            payload: Some(payload),
        }
    }

    pub fn invalid(
        message: impl Into<String>,
        issues: Vec<String>,
        fields: Option<Map<String, Value>>,
    ) -> Self {
        Self {
            outcome: Outcome::InvalidInput,
            message: message.into(),
            issues: Some(issues),
            fields,
            payload: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            outcome: Outcome::Failed,
            message: message.into(),
            issues: None,
            fields: None,
            payload: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome == Outcome::Succeeded
    }

    pub fn payload(&self) -> Option<&P> {
        self.payload.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
    struct Summary {
        analysis: String,
    }

    #[test]
    fn test_success_flattens_payload() {
        let envelope = ResultEnvelope::success(
            "Video analyzed successfully.",
            Summary {
                analysis: "All clear.".to_string(),
            },
        );

        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({
                "outcome": "succeeded",
                "message": "Video analyzed successfully.",
                "analysis": "All clear."
            })
        );
    }

    #[test]
    fn test_failure_shapes_omit_payload() {
        let invalid: ResultEnvelope<Summary> =
            ResultEnvelope::invalid("Invalid form data", vec!["Please upload a video file.".to_string()], None);
        assert_eq!(
            serde_json::to_value(&invalid).unwrap(),
            json!({
                "outcome": "invalid_input",
                "message": "Invalid form data",
                "issues": ["Please upload a video file."]
            })
        );

        let failed: ResultEnvelope<Summary> = ResultEnvelope::failure("Failed to analyze video.");
        let value = serde_json::to_value(&failed).unwrap();
        assert_eq!(value, json!({"outcome": "failed", "message": "Failed to analyze video."}));
        assert!(!failed.is_success());
        assert!(failed.payload().is_none());
    }
}
