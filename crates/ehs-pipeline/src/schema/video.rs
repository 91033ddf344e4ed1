//! Shapes for video risk analysis.
//!
//! The output started as a bare `{ analysis }` summary and grew ergonomic assessment,
//! risk level and suggested actions. New fields are only ever added, so callers that
//! read a subset keep working.

use serde::{Deserialize, Serialize};

use super::{Field, FieldKind, ObjectSchema, StringFormat};

pub const RISK_LEVEL_VALUES: &[&str] = &["Low", "Medium", "High", "Critical"];

pub const ACTION_PRIORITY_VALUES: &[&str] = &["Low", "Medium", "High"];

pub const MISSING_VIDEO_MESSAGE: &str = "Please upload a video file.";

pub const MALFORMED_VIDEO_MESSAGE: &str =
    "Video must be a data URI of the form 'data:<mimetype>;base64,<encoded_data>'.";

pub static VIDEO_INPUT_SCHEMA: ObjectSchema = ObjectSchema {
    fields: &[
        Field::string(
            "videoDataUri",
            "A video file, as a data URI that must include a MIME type and use Base64 \
             encoding. Expected format: 'data:<mimetype>;base64,<encoded_data>'.",
        )
        .min_len(1, MISSING_VIDEO_MESSAGE)
        .format(StringFormat::DataUri {
            message: MALFORMED_VIDEO_MESSAGE,
        }),
        Field::boolean("blurFaces", "Whether to blur faces in the video for privacy.").optional(),
        Field::boolean(
            "allowTraining",
            "Whether the video can be used for training purposes.",
        )
        .optional(),
    ],
};

pub static SUGGESTED_ACTION_SCHEMA: ObjectSchema = ObjectSchema {
    fields: &[
        Field::string("action", "A brief, actionable suggestion."),
        Field::one_of(
            "priority",
            ACTION_PRIORITY_VALUES,
            "The priority of the suggested action.",
        ),
    ],
};

static SUGGESTED_ACTION_ITEMS: FieldKind = FieldKind::Object(&SUGGESTED_ACTION_SCHEMA);

pub static VIDEO_OUTPUT_SCHEMA: ObjectSchema = ObjectSchema {
    fields: &[
        Field::string(
            "analysis",
            "A detailed analysis of the video content, including potential general safety \
             hazards identified.",
        ),
        Field::string(
            "ergonomicAssessment",
            "A detailed analysis of the ergonomic risks, commenting on posture, lifting \
             techniques, and repetitive strain.",
        ),
        Field::one_of(
            "riskLevel",
            RISK_LEVEL_VALUES,
            "The overall risk level assessed from the video.",
        ),
        Field::list(
            "suggestedActions",
            &SUGGESTED_ACTION_ITEMS,
            "A list of suggested corrective actions to mitigate identified risks.",
        ),
    ],
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoAnalysisInput {
    pub video_data_uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blur_faces: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_training: Option<bool>,
}

impl VideoAnalysisInput {
    pub fn new(video_data_uri: impl Into<String>) -> Self {
        Self {
            video_data_uri: video_data_uri.into(),
            blur_faces: None,
            allow_training: None,
        }
    }

    pub fn blurs_faces(&self) -> bool {
        self.blur_faces.unwrap_or(false)
    }

    pub fn training_allowed(&self) -> bool {
        self.allow_training.unwrap_or(false)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionPriority {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestedAction {
    pub action: String,
    pub priority: ActionPriority,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoAnalysisOutput {
    pub analysis: String,
    pub ergonomic_assessment: String,
    pub risk_level: RiskLevel,
    pub suggested_actions: Vec<SuggestedAction>,
}
