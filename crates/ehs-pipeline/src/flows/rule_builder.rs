//! Natural-language rule → structured safety rule.

use ehs_llm::GenerationProvider;

use super::{run_flow, FlowDefinition};
use crate::error::PipelineError;
use crate::lifecycle::Lifecycle;
use crate::prompt::PromptBuilder;
use crate::schema::rule::{
    RuleBuilderInput, RuleBuilderOutput, RuleType, Severity, RULE_INPUT_SCHEMA,
    RULE_OUTPUT_SCHEMA, RULE_TYPE_VALUES, SEVERITY_VALUES,
};

const ROLE: &str = "You are an AI-powered safety rule builder. Your purpose is to translate a \
user-provided natural language description of a safety rule into a structured format that can \
be used by a safety monitoring system.";

static RULE_BUILDER_FLOW: FlowDefinition<RuleBuilderInput> = FlowDefinition {
    name: "aiSafetyRuleBuilderFlow",
    subject: "Rule generation",
    input_schema: &RULE_INPUT_SCHEMA,
    output_schema: &RULE_OUTPUT_SCHEMA,
    prompt: rule_prompt,
    media: |_| None,
};

pub fn rule_prompt() -> PromptBuilder<RuleBuilderInput> {
    PromptBuilder::new()
        .fixed("role", ROLE)
        .clause("procedure", |_| Some(procedure()))
        .clause("output_fields", |_| {
            Some(format!(
                "Output fields:\n\n{}",
                RULE_OUTPUT_SCHEMA.describe_fields()
            ))
        })
        .clause("example", |_| worked_example_section())
        .clause("request", |input| {
            Some(format!(
                "Now, generate the safety rule based on the following input:\n\n{}",
                request_block(input)
            ))
        })
}

pub fn compose_rule_prompt(input: &RuleBuilderInput) -> String {
    rule_prompt().render(input)
}

/// The one literal input/output pair embedded in every prompt.
pub fn worked_example() -> (RuleBuilderInput, RuleBuilderOutput) {
    let input = RuleBuilderInput {
        zone_name: "Loading Dock".to_string(),
        site_name: "Main Warehouse".to_string(),
        natural_language_rule: "Create a rule to detect pedestrians within 3 meters of a \
            forklift for more than 5 seconds in the Loading Dock zone. The severity should be \
            High, and EHS managers should be notified. Escalate to the site supervisor if not \
            acknowledged within 10 minutes."
            .to_string(),
    };
    let output = RuleBuilderOutput {
        rule_name: "Pedestrian-Forklift Proximity (Loading Dock)".to_string(),
        rule_type: RuleType::PedestrianForkliftProximity,
        applies_to_zone_ids: vec!["Loading Dock".to_string()],
        severity: Severity::High,
        thresholds: r#"{"distanceMeters": 3, "durationSeconds": 5}"#.to_string(),
        schedule: None,
        notification_targets: vec!["EHS Manager".to_string()],
        escalation: Some("10 minutes to site supervisor".to_string()),
    };
    (input, output)
}

fn procedure() -> String {
    format!(
        "Instructions:\n\n\
         1. Understand the User's Intent: Carefully analyze the provided natural language rule \
         description to understand the desired safety rule and its specific requirements.\n\
         2. Extract Key Information: Identify the type of rule, the conditions under which it \
         should be triggered, the severity of the violation, and any relevant thresholds, \
         schedules, notification targets and escalation policies.\n\
         3. Use the Allowed Values Only: ruleType MUST be exactly one of ({}) and severity MUST \
         be exactly one of ({}). Do not invent new categories.\n\
         4. Format Thresholds as JSON: Convert any identified thresholds (e.g. distanceMeters, \
         durationSeconds, confidenceMin) into a JSON object serialized as a string. If no \
         thresholds are specified, use {{}}.\n\
         5. Output Structured Rule: Output the extracted information as a single JSON object \
         with the fields listed below.",
        RULE_TYPE_VALUES.join(", "),
        SEVERITY_VALUES.join(", ")
    )
}

fn worked_example_section() -> Option<String> {
    let (input, output) = worked_example();
    let output = serde_json::to_string_pretty(&output).ok()?;
    Some(format!(
        "Example:\n\nInput:\n\n{}\n\nOutput:\n\n{}",
        request_block(&input),
        output
    ))
}

fn request_block(input: &RuleBuilderInput) -> String {
    format!(
        "zoneName: {}\nsiteName: {}\nnaturalLanguageRule: {}",
        input.zone_name, input.site_name, input.natural_language_rule
    )
}

/// Turn a natural-language rule description into a structured rule.
pub async fn ai_safety_rule_builder(
    provider: &dyn GenerationProvider,
    input: &RuleBuilderInput,
) -> Result<RuleBuilderOutput, PipelineError> {
    let mut lifecycle = Lifecycle::new(RULE_BUILDER_FLOW.name);
    run(provider, input, &mut lifecycle).await
}

pub(crate) async fn run(
    provider: &dyn GenerationProvider,
    input: &RuleBuilderInput,
    lifecycle: &mut Lifecycle,
) -> Result<RuleBuilderOutput, PipelineError> {
    run_flow(&RULE_BUILDER_FLOW, provider, input, lifecycle).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn sample_input() -> RuleBuilderInput {
        RuleBuilderInput {
            zone_name: "Assembly Line 1".to_string(),
            site_name: "Plant North".to_string(),
            natural_language_rule: "Everyone must wear a hard hat and hi-vis vest.".to_string(),
        }
    }

    #[test]
    fn test_prompt_is_deterministic() {
        let input = sample_input();
        assert_eq!(compose_rule_prompt(&input), compose_rule_prompt(&input.clone()));
    }

    #[test]
    fn test_prompt_section_order() {
        assert_eq!(
            rule_prompt().active_sections(&sample_input()),
            vec!["role", "procedure", "output_fields", "example", "request"]
        );
    }

    #[test]
    fn test_prompt_ends_with_interpolated_request() {
        let prompt = compose_rule_prompt(&sample_input());

        assert!(prompt.starts_with("You are an AI-powered safety rule builder."));
        assert!(prompt.ends_with(
            "Now, generate the safety rule based on the following input:\n\n\
             zoneName: Assembly Line 1\n\
             siteName: Plant North\n\
             naturalLanguageRule: Everyone must wear a hard hat and hi-vis vest."
        ));
        assert!(prompt.contains(
            "ruleType MUST be exactly one of (PPE compliance, Person in restricted zone, \
             Pedestrian-forklift proximity, Blocked egress)"
        ));
        assert!(prompt.contains("severity MUST be exactly one of (Low, Med, High, Critical)"));
        assert!(prompt.contains("use {}."));
    }

    #[test]
    fn test_worked_example_conforms_to_output_schema() {
        let (input, output) = worked_example();

        let value = serde_json::to_value(&input).unwrap();
        assert!(RULE_INPUT_SCHEMA.validate_value(&value).is_ok());

        let value = serde_json::to_value(&output).unwrap();
        assert!(RULE_OUTPUT_SCHEMA.validate_value(&value).is_ok());

        let prompt = compose_rule_prompt(&sample_input());
        assert!(prompt.contains("\"ruleType\": \"Pedestrian-forklift proximity\""));
        assert!(prompt.contains("zoneName: Loading Dock\nsiteName: Main Warehouse"));
    }

    #[test]
    fn test_prompt_documents_every_output_field() {
        let prompt = compose_rule_prompt(&sample_input());
        for field in RULE_OUTPUT_SCHEMA.fields {
            assert!(prompt.contains(&format!("- {} (", field.name)), "missing {}", field.name);
        }
        let thresholds: Value = serde_json::from_str(&worked_example().1.thresholds).unwrap();
        assert!(thresholds.is_object());
    }
}
