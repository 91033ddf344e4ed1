//! Request pipelines for the Vision EHS assistant: turning a plain-language safety rule
//! into a structured rule, and producing a risk assessment for an uploaded video.
//!
//! Each pipeline runs schema validation, prompt composition, one model call and output
//! normalization, and is exposed through an action function that always returns a
//! [`ResultEnvelope`].

pub mod actions;
pub mod envelope;
pub mod error;
pub mod flows;
pub mod lifecycle;
pub mod normalizer;
pub mod prompt;
pub mod schema;

pub use actions::{analyze_video_action, generate_rule_from_ai, FormInput, RuleEnvelope, VideoEnvelope};
pub use envelope::{Outcome, ResultEnvelope};
pub use error::{FieldIssue, OutputParseError, ParseFailure, PipelineError, ValidationError};
pub use flows::rule_builder::ai_safety_rule_builder;
pub use flows::video_analysis::analyze_video;
pub use lifecycle::{ActionStage, Lifecycle};
pub use schema::rule::{RuleBuilderInput, RuleBuilderOutput, RuleType, Severity};
pub use schema::video::{
    ActionPriority, RiskLevel, SuggestedAction, VideoAnalysisInput, VideoAnalysisOutput,
};
