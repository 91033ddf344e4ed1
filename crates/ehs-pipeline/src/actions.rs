//! Caller-facing entry points. These never return an error: every outcome, including
//! bad input and model failures, comes back as a [`ResultEnvelope`].

use ehs_llm::GenerationProvider;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::envelope::ResultEnvelope;
use crate::error::PipelineError;
use crate::flows::{rule_builder, video_analysis};
use crate::lifecycle::{ActionStage, Lifecycle};
use crate::schema::rule::{RuleBuilderInput, RuleBuilderOutput, RULE_INPUT_SCHEMA};
use crate::schema::video::{VideoAnalysisInput, VideoAnalysisOutput, VIDEO_INPUT_SCHEMA};

/// Submitted form values, keyed by field name.
pub type FormInput = Map<String, Value>;

pub const INVALID_FORM_MESSAGE: &str = "Invalid form data";

pub const RULE_SUCCESS_MESSAGE: &str = "Rule generated successfully.";
pub const RULE_FAILURE_MESSAGE: &str = "Failed to generate rule. An unexpected error occurred.";

pub const VIDEO_SUCCESS_MESSAGE: &str = "Video analyzed successfully.";
pub const VIDEO_FAILURE_MESSAGE: &str = "Failed to analyze video. An unexpected error occurred.";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RulePayload {
    pub data: RuleBuilderOutput,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct VideoPayload {
    pub analysis: VideoAnalysisOutput,
}

pub type RuleEnvelope = ResultEnvelope<RulePayload>;
pub type VideoEnvelope = ResultEnvelope<VideoPayload>;

pub async fn generate_rule_from_ai(
    provider: &dyn GenerationProvider,
    form: &FormInput,
) -> RuleEnvelope {
    let mut lifecycle = Lifecycle::new("generateRuleFromAI");
    lifecycle.advance(ActionStage::Validating);

    let input: RuleBuilderInput = match RULE_INPUT_SCHEMA.parse(form) {
        Ok(input) => input,
        Err(e) => {
            lifecycle.advance(ActionStage::Failed);
            log::debug!("rule form rejected: {}", e);
            return ResultEnvelope::invalid(INVALID_FORM_MESSAGE, e.messages(), Some(echo_fields(form)));
        }
    };

    match rule_builder::run(provider, &input, &mut lifecycle).await {
        Ok(rule) => ResultEnvelope::success(RULE_SUCCESS_MESSAGE, RulePayload { data: rule }),
        Err(e) => failure_envelope(e, RULE_FAILURE_MESSAGE, Some(form)),
    }
}

pub async fn analyze_video_action(
    provider: &dyn GenerationProvider,
    form: &FormInput,
) -> VideoEnvelope {
    let mut lifecycle = Lifecycle::new("analyzeVideoAction");
    lifecycle.advance(ActionStage::Validating);

    let input: VideoAnalysisInput = match VIDEO_INPUT_SCHEMA.parse(form) {
        Ok(input) => input,
        Err(e) => {
            lifecycle.advance(ActionStage::Failed);
            log::debug!("video form rejected: {}", e);
            return ResultEnvelope::invalid(INVALID_FORM_MESSAGE, e.messages(), None);
        }
    };

    match video_analysis::run(provider, &input, &mut lifecycle).await {
        Ok(analysis) => ResultEnvelope::success(VIDEO_SUCCESS_MESSAGE, VideoPayload { analysis }),
        Err(e) => failure_envelope(e, VIDEO_FAILURE_MESSAGE, None),
    }
}

fn failure_envelope<P>(
    error: PipelineError,
    unexpected: &str,
    form: Option<&FormInput>,
) -> ResultEnvelope<P> {
    match error {
        PipelineError::Validation(e) => {
            ResultEnvelope::invalid(INVALID_FORM_MESSAGE, e.messages(), form.map(echo_fields))
        }
        PipelineError::Invocation(e) => {
            log::error!("{}: {}", unexpected, e);
            ResultEnvelope::failure(unexpected)
        }
        PipelineError::OutputParse(e) => {
            log::error!("{} ({})", e, e.reason);
            ResultEnvelope::failure(e.to_string())
        }
    }
}

/// String-valued form entries, so a rejected form can be shown again as submitted.
fn echo_fields(form: &FormInput) -> Map<String, Value> {
    form.iter()
        .filter(|(_, value)| value.is_string())
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_echo_fields_keeps_strings_only() {
        let form = json!({"zoneName": "Dock", "siteName": 7, "naturalLanguageRule": null});
        let echoed = echo_fields(form.as_object().unwrap());

        assert_eq!(Value::Object(echoed), json!({"zoneName": "Dock"}));
    }

    #[test]
    fn test_unexpected_failure_hides_cause() {
        let error = PipelineError::Invocation(ehs_llm::ModelInvocationError::Api(
            "HTTP 500: upstream exploded".to_string(),
        ));
        let envelope: VideoEnvelope = failure_envelope(error, VIDEO_FAILURE_MESSAGE, None);

        assert_eq!(envelope.message, VIDEO_FAILURE_MESSAGE);
        assert!(envelope.payload.is_none());
        assert!(envelope.issues.is_none());
    }
}
