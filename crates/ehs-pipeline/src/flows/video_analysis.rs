//! Uploaded video → safety and ergonomic risk assessment.
//!
//! The clip itself is never inspected here; the data URI travels to the model as an
//! inline media part next to the rendered prompt.

use ehs_llm::{GenerationProvider, MediaPart};

use super::{run_flow, FlowDefinition};
use crate::error::PipelineError;
use crate::lifecycle::Lifecycle;
use crate::prompt::PromptBuilder;
use crate::schema::video::{
    VideoAnalysisInput, VideoAnalysisOutput, ACTION_PRIORITY_VALUES, RISK_LEVEL_VALUES,
    VIDEO_INPUT_SCHEMA, VIDEO_OUTPUT_SCHEMA,
};

pub const FACE_BLUR_CLAUSE: &str = "IMPORTANT: Before providing the analysis, ensure all faces \
in the video are blurred to protect privacy. Acknowledge this step in your analysis.";

pub const TRAINING_CONSENT_CLAUSE: &str =
    "The user has consented for this video to be used for training purposes.";

pub const TRAINING_REFUSAL_CLAUSE: &str = "The user has NOT consented for this video to be used \
for training. Do not store or use it beyond this analysis.";

pub const ATTACHMENT_LINE: &str = "Video to analyze is attached.";

const ROLE: &str = "You are an expert workplace safety and ergonomics analyst. Analyze the \
attached video from an industrial site and produce a risk assessment of what it shows.";

static VIDEO_ANALYSIS_FLOW: FlowDefinition<VideoAnalysisInput> = FlowDefinition {
    name: "analyzeVideoFlow",
    subject: "Analysis",
    input_schema: &VIDEO_INPUT_SCHEMA,
    output_schema: &VIDEO_OUTPUT_SCHEMA,
    prompt: video_prompt,
    media: |input| Some(MediaPart::new(input.video_data_uri.clone())),
};

pub fn video_prompt() -> PromptBuilder<VideoAnalysisInput> {
    PromptBuilder::new()
        .fixed("role", ROLE)
        .clause("procedure", |_| Some(procedure()))
        .clause("face_blur", |input: &VideoAnalysisInput| {
            input.blurs_faces().then(|| FACE_BLUR_CLAUSE.to_string())
        })
        .clause("training_consent", |input: &VideoAnalysisInput| {
            let clause = if input.training_allowed() {
                TRAINING_CONSENT_CLAUSE
            } else {
                TRAINING_REFUSAL_CLAUSE
            };
            Some(clause.to_string())
        })
        .fixed("attachment", ATTACHMENT_LINE)
}

pub fn compose_video_prompt(input: &VideoAnalysisInput) -> String {
    video_prompt().render(input)
}

fn procedure() -> String {
    format!(
        "Instructions:\n\n\
         1. Describe the events in the video and identify any general safety hazards.\n\
         2. Assess the ergonomic risks, commenting on posture, lifting techniques and \
         repetitive strain.\n\
         3. Assign an overall riskLevel, exactly one of ({}).\n\
         4. List suggested corrective actions, most important first. Each priority must be \
         exactly one of ({}).\n\
         5. Output a single JSON object with the fields analysis, ergonomicAssessment, \
         riskLevel and suggestedActions.",
        RISK_LEVEL_VALUES.join(", "),
        ACTION_PRIORITY_VALUES.join(", ")
    )
}

/// Assess an uploaded clip. Exactly one model call is made per successful validation.
pub async fn analyze_video(
    provider: &dyn GenerationProvider,
    input: &VideoAnalysisInput,
) -> Result<VideoAnalysisOutput, PipelineError> {
    let mut lifecycle = Lifecycle::new(VIDEO_ANALYSIS_FLOW.name);
    run(provider, input, &mut lifecycle).await
}

pub(crate) async fn run(
    provider: &dyn GenerationProvider,
    input: &VideoAnalysisInput,
    lifecycle: &mut Lifecycle,
) -> Result<VideoAnalysisOutput, PipelineError> {
    run_flow(&VIDEO_ANALYSIS_FLOW, provider, input, lifecycle).await
}
