use std::fmt;

use ehs_llm::ModelInvocationError;
use thiserror::Error;

/// One offending field and what is wrong with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    /// Dotted path, e.g. `suggestedActions[1].priority`.
    pub field: String,
    pub message: String,
}

impl FieldIssue {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Input or output did not satisfy its schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub issues: Vec<FieldIssue>,
}

impl ValidationError {
    pub fn new(issues: Vec<FieldIssue>) -> Self {
        Self { issues }
    }

    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(vec![FieldIssue::new(field, message)])
    }

    /// Messages only, in field order. This is what callers show next to a form.
    pub fn messages(&self) -> Vec<String> {
        self.issues.iter().map(|issue| issue.message.clone()).collect()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "validation failed: {}", self.messages().join("; "))
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, Error)]
pub enum ParseFailure {
    #[error("the model returned no structured output")]
    NoOutput,

    #[error("output does not match the expected schema: {0}")]
    SchemaMismatch(#[from] ValidationError),

    #[error("output could not be decoded: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// The model answered, but not with something the output schema accepts.
///
/// Display is the user-facing sentence; the cause is kept in `reason`.
#[derive(Debug, Error)]
#[error("{subject} failed to produce an output.")]
pub struct OutputParseError {
    pub subject: &'static str,
    #[source]
    pub reason: ParseFailure,
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Model invocation failed: {0}")]
    Invocation(#[from] ModelInvocationError),

    #[error(transparent)]
    OutputParse(#[from] OutputParseError),
}

impl PipelineError {
    /// True when the caller has to change the input; false when retrying may help.
    pub fn is_caller_error(&self) -> bool {
        matches!(self, PipelineError::Validation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_messages_keep_order() {
        let error = ValidationError::new(vec![
            FieldIssue::new("zoneName", "zoneName is required"),
            FieldIssue::new("naturalLanguageRule", "Please describe the rule in more detail."),
        ]);

        assert_eq!(
            error.messages(),
            vec![
                "zoneName is required".to_string(),
                "Please describe the rule in more detail.".to_string()
            ]
        );
        assert_eq!(
            error.to_string(),
            "validation failed: zoneName is required; Please describe the rule in more detail."
        );
    }

    #[test]
    fn test_output_parse_error_display_is_user_sentence() {
        let error = OutputParseError {
            subject: "Analysis",
            reason: ParseFailure::NoOutput,
        };
        assert_eq!(error.to_string(), "Analysis failed to produce an output.");

        let wrapped = PipelineError::from(error);
        assert_eq!(wrapped.to_string(), "Analysis failed to produce an output.");
        assert!(!wrapped.is_caller_error());
    }

    #[test]
    fn test_invocation_error_is_not_caller_error() {
        let error = PipelineError::from(ModelInvocationError::Api("HTTP 503".to_string()));
        assert!(!error.is_caller_error());
        assert!(PipelineError::from(ValidationError::single("a", "b")).is_caller_error());
    }
}
