//! Shapes for the safety rule builder.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{Field, ObjectSchema, StringFormat, STRING_ITEMS};

pub const RULE_TYPE_VALUES: &[&str] = &[
    "PPE compliance",
    "Person in restricted zone",
    "Pedestrian-forklift proximity",
    "Blocked egress",
];

pub const SEVERITY_VALUES: &[&str] = &["Low", "Med", "High", "Critical"];

pub const MIN_RULE_DESCRIPTION_CHARS: usize = 10;

pub static RULE_INPUT_SCHEMA: ObjectSchema = ObjectSchema {
    fields: &[
        Field::string(
            "zoneName",
            "The name of the zone for which the rule is being created.",
        ),
        Field::string(
            "siteName",
            "The name of the site where the zone is located.",
        ),
        Field::string(
            "naturalLanguageRule",
            "A description of the desired safety rule in natural language. Be as specific as \
             possible, including details like thresholds (distance in meters, duration in \
             seconds), objects (PPE compliance: hi-vis vest, hard hat, safety glasses), \
             notification targets (roles/users), and escalation policies (if not acknowledged \
             within X minutes).",
        )
        .min_len(
            MIN_RULE_DESCRIPTION_CHARS,
            "Please describe the rule in more detail.",
        ),
    ],
};

pub static RULE_OUTPUT_SCHEMA: ObjectSchema = ObjectSchema {
    fields: &[
        Field::string("ruleName", "A concise name for the safety rule."),
        Field::one_of(
            "ruleType",
            RULE_TYPE_VALUES,
            "The type of safety rule. Return only the literal string, nothing else.",
        ),
        Field::list(
            "appliesToZoneIds",
            STRING_ITEMS,
            "The zone IDs this rule applies to. Should include the zone of interest.",
        ),
        Field::one_of(
            "severity",
            SEVERITY_VALUES,
            "The severity of the rule violation. Return only the literal string, nothing else.",
        ),
        Field::string(
            "thresholds",
            "A JSON string containing the thresholds for the rule, such as distance in meters, \
             duration in seconds, and minimum confidence level. If no thresholds are \
             specified, return an empty JSON object {}.",
        )
        .format(StringFormat::JsonObject),
        Field::string(
            "schedule",
            "The schedule for the rule. If not specified, omit this field.",
        )
        .optional(),
        Field::list(
            "notificationTargets",
            STRING_ITEMS,
            "The roles/users to notify when the rule is violated.",
        ),
        Field::string(
            "escalation",
            "Escalation policy if the event is not acknowledged within X minutes. If not \
             specified, omit this field.",
        )
        .optional(),
    ],
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleBuilderInput {
    pub zone_name: String,
    pub site_name: String,
    pub natural_language_rule: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RuleType {
    #[serde(rename = "PPE compliance")]
    PpeCompliance,
    #[serde(rename = "Person in restricted zone")]
    PersonInRestrictedZone,
    #[serde(rename = "Pedestrian-forklift proximity")]
    PedestrianForkliftProximity,
    #[serde(rename = "Blocked egress")]
    BlockedEgress,
}

impl RuleType {
    pub const ALL: [RuleType; 4] = [
        RuleType::PpeCompliance,
        RuleType::PersonInRestrictedZone,
        RuleType::PedestrianForkliftProximity,
        RuleType::BlockedEgress,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            RuleType::PpeCompliance => "PPE compliance",
            RuleType::PersonInRestrictedZone => "Person in restricted zone",
            RuleType::PedestrianForkliftProximity => "Pedestrian-forklift proximity",
            RuleType::BlockedEgress => "Blocked egress",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    Low,
    Med,
    High,
    Critical,
}

impl Severity {
    pub const ALL: [Severity; 4] = [Severity::Low, Severity::Med, Severity::High, Severity::Critical];

    pub const fn as_str(self) -> &'static str {
        match self {
            Severity::Low => "Low",
            Severity::Med => "Med",
            Severity::High => "High",
            Severity::Critical => "Critical",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleBuilderOutput {
    pub rule_name: String,
    pub rule_type: RuleType,
    pub applies_to_zone_ids: Vec<String>,
    pub severity: Severity,
    /// Serialized JSON object, e.g. `{"distanceMeters": 3, "durationSeconds": 5}`.
    pub thresholds: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<String>,
    pub notification_targets: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub escalation: Option<String>,
}

impl RuleBuilderOutput {
    /// The thresholds as a JSON object.
    pub fn threshold_map(&self) -> serde_json::Result<Map<String, Value>> {
        serde_json::from_str(&self.thresholds)
    }
}
