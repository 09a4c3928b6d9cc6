use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;

/// Rule categories understood by the downstream allocator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RuleType {
    CoRun,
    SlotRestriction,
    LoadLimit,
    PhaseWindow,
    PatternMatch,
    Precedence,
    Custom,
}

impl RuleType {
    pub const fn label(self) -> &'static str {
        match self {
            Self::CoRun => "coRun",
            Self::SlotRestriction => "slotRestriction",
            Self::LoadLimit => "loadLimit",
            Self::PhaseWindow => "phaseWindow",
            Self::PatternMatch => "patternMatch",
            Self::Precedence => "precedence",
            Self::Custom => "custom",
        }
    }
}

/// Typed parameter shape per rule category. `Custom` remains the free-form
/// escape hatch for generated rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum RuleParams {
    CoRun {
        #[serde(rename = "taskIds")]
        task_ids: Vec<String>,
    },
    SlotRestriction {
        group: String,
        #[serde(rename = "minCommonSlots")]
        min_common_slots: u32,
    },
    LoadLimit {
        #[serde(rename = "workerGroup")]
        worker_group: String,
        #[serde(rename = "maxSlotsPerPhase")]
        max_slots_per_phase: u32,
    },
    PhaseWindow {
        #[serde(rename = "taskId")]
        task_id: String,
        phases: Vec<i64>,
    },
    PatternMatch {
        pattern: String,
        template: String,
    },
    Precedence {
        #[serde(rename = "orderedRuleIds")]
        ordered_rule_ids: Vec<String>,
    },
    Custom {
        payload: BTreeMap<String, serde_json::Value>,
    },
}

impl RuleParams {
    pub const fn rule_type(&self) -> RuleType {
        match self {
            Self::CoRun { .. } => RuleType::CoRun,
            Self::SlotRestriction { .. } => RuleType::SlotRestriction,
            Self::LoadLimit { .. } => RuleType::LoadLimit,
            Self::PhaseWindow { .. } => RuleType::PhaseWindow,
            Self::PatternMatch { .. } => RuleType::PatternMatch,
            Self::Precedence { .. } => RuleType::Precedence,
            Self::Custom { .. } => RuleType::Custom,
        }
    }
}

/// A user-defined allocation rule. Not validated by the engine beyond its
/// typed parameter shape; the rule optimizer only reads counts and
/// confidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub id: String,
    pub name: String,
    pub description: String,
    pub params: RuleParams,
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl Rule {
    pub fn rule_type(&self) -> RuleType {
        self.params.rule_type()
    }
}

/// One prioritization weight consumed by the downstream allocator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Priority {
    pub id: String,
    pub name: String,
    pub weight: f64,
    pub description: String,
}

/// The stock prioritization criteria and their default weights.
pub fn default_priorities() -> Vec<Priority> {
    let stock = [
        ("priority-level", "Priority Level", 0.3, "Client priority importance"),
        ("task-fulfillment", "Task Fulfillment", 0.25, "Requested task completion"),
        ("fairness", "Fairness", 0.2, "Equal distribution across workers"),
        ("efficiency", "Efficiency", 0.15, "Resource utilization optimization"),
        ("timeline", "Timeline", 0.1, "Schedule adherence"),
    ];

    stock
        .into_iter()
        .map(|(id, name, weight, description)| Priority {
            id: id.to_string(),
            name: name.to_string(),
            weight,
            description: description.to_string(),
        })
        .collect()
}

/// A rule category detected in free-text, with the classifier's confidence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleSignal {
    #[serde(rename = "type")]
    pub rule_type: RuleType,
    pub confidence: f64,
}

/// Keyword classifier over a free-text rule description.
///
/// Deliberately a transparent keyword table rather than an opaque model; a
/// real model could replace this without changing the returned shape.
pub fn classify_rule_text(text: &str) -> Vec<RuleSignal> {
    let lower = text.to_lowercase();
    let mut signals = Vec::new();

    if lower.contains("together") || lower.contains("co-run") || lower.contains("same time") {
        signals.push(RuleSignal {
            rule_type: RuleType::CoRun,
            confidence: 0.9,
        });
    }

    if lower.contains("not more than") || lower.contains("limit") || lower.contains("maximum") {
        signals.push(RuleSignal {
            rule_type: RuleType::LoadLimit,
            confidence: 0.8,
        });
    }

    if lower.contains("phase")
        && (lower.contains("window") || lower.contains("only") || lower.contains("during"))
    {
        signals.push(RuleSignal {
            rule_type: RuleType::PhaseWindow,
            confidence: 0.85,
        });
    }

    if lower.contains("priority") || lower.contains("preference") || lower.contains("first") {
        signals.push(RuleSignal {
            rule_type: RuleType::Precedence,
            confidence: 0.75,
        });
    }

    signals
}

fn suggested_actions(text: &str) -> Vec<&'static str> {
    let lower = text.to_lowercase();
    let mut actions = Vec::new();

    if lower.contains("together") {
        actions.push("Group specified tasks for simultaneous execution");
    }
    if lower.contains("limit") {
        actions.push("Apply workload restrictions to specified workers/groups");
    }
    if lower.contains("priority") {
        actions.push("Adjust scheduling priority for specified entities");
    }

    actions
}

/// Build a custom rule from a plain-language description. Returns `None`
/// when the text is blank; otherwise the rule carries the detected signals
/// and suggested actions in its payload.
pub fn rule_from_description(id: String, text: &str) -> Option<Rule> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    let signals = classify_rule_text(trimmed);
    let mut payload = BTreeMap::new();
    payload.insert("originalQuery".to_string(), json!(trimmed));
    payload.insert(
        "conditions".to_string(),
        serde_json::to_value(&signals).unwrap_or_default(),
    );
    payload.insert(
        "suggestedActions".to_string(),
        json!(suggested_actions(trimmed)),
    );

    let mut name = trimmed.chars().take(30).collect::<String>();
    if trimmed.chars().count() > 30 {
        name.push_str("...");
    }

    Some(Rule {
        id,
        name: format!("Generated Rule: {name}"),
        description: format!("Generated from: \"{trimmed}\""),
        params: RuleParams::Custom { payload },
        enabled: true,
        confidence: Some(0.85),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifier_detects_corun_and_precedence() {
        let signals = classify_rule_text("Tasks T001 and T002 should always run together first");
        let types: Vec<RuleType> = signals.iter().map(|signal| signal.rule_type).collect();
        assert_eq!(types, vec![RuleType::CoRun, RuleType::Precedence]);
        assert_eq!(signals[0].confidence, 0.9);
    }

    #[test]
    fn classifier_detects_phase_window() {
        let signals = classify_rule_text("Run T003 only during phase 2");
        assert!(signals
            .iter()
            .any(|signal| signal.rule_type == RuleType::PhaseWindow));
    }

    #[test]
    fn description_builds_custom_rule_with_payload() {
        let rule = rule_from_description(
            "rule-1".to_string(),
            "Sales workers should not work more than 3 phases",
        )
        .expect("non-empty text yields a rule");

        assert_eq!(rule.rule_type(), RuleType::Custom);
        assert_eq!(rule.confidence, Some(0.85));
        match &rule.params {
            RuleParams::Custom { payload } => {
                assert!(payload.contains_key("originalQuery"));
                assert!(payload.contains_key("conditions"));
            }
            other => panic!("expected custom params, got {other:?}"),
        }
    }

    #[test]
    fn blank_description_yields_no_rule() {
        assert!(rule_from_description("rule-2".to_string(), "   ").is_none());
    }

    #[test]
    fn default_priorities_sum_to_one() {
        let total: f64 = default_priorities().iter().map(|p| p.weight).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }
}
