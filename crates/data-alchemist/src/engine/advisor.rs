use super::domain::DataSet;
use super::rules::{Rule, RuleParams, RuleType};
use serde::Serialize;

/// Utilization thresholds bucketing the timeline risk.
const RISK_HIGH: f64 = 0.9;
const RISK_MEDIUM: f64 = 0.7;

/// Enabled co-run rules beyond this count suggest consolidation.
const CORUN_BUDGET: usize = 3;

/// Teams above this size warrant an explicit load-limit rule.
const LOAD_LIMIT_TEAM_SIZE: usize = 5;

/// Generated rules below this confidence deserve review.
const LOW_CONFIDENCE: f64 = 0.7;

/// Advisory free-text suggestions over the current rule set.
pub fn optimize_rules(rules: &[Rule], data: &DataSet) -> Vec<String> {
    let mut suggestions = Vec::new();

    let enabled = |rule_type: RuleType| {
        rules
            .iter()
            .filter(move |rule| rule.enabled && rule.rule_type() == rule_type)
    };

    if enabled(RuleType::CoRun).count() > CORUN_BUDGET {
        suggestions.push("Consider consolidating co-run rules to reduce complexity".to_string());
    }

    if enabled(RuleType::LoadLimit).count() == 0 && data.workers.len() > LOAD_LIMIT_TEAM_SIZE {
        suggestions
            .push("Add load limit rules to prevent worker overload in larger teams".to_string());
    }

    let low_confidence = enabled(RuleType::Custom)
        .filter(|rule| rule.confidence.unwrap_or(0.0) < LOW_CONFIDENCE)
        .count();
    if low_confidence > 0 {
        suggestions.push(format!(
            "Review {low_confidence} low-confidence generated rules"
        ));
    }

    suggestions
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TimelineRisk {
    Low,
    Medium,
    High,
}

impl TimelineRisk {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// Capacity-utilization forecast for the current dataset.
#[derive(Debug, Clone, Serialize)]
pub struct ResourceForecast {
    #[serde(rename = "recommendedWorkers")]
    pub recommended_workers: usize,
    #[serde(rename = "capacityUtilization")]
    pub capacity_utilization: f64,
    #[serde(rename = "timelineRisk")]
    pub timeline_risk: TimelineRisk,
    pub recommendations: Vec<String>,
}

/// Forecast worker needs and timeline risk from raw counts and capacity.
pub fn predict_resource_needs(data: &DataSet) -> ResourceForecast {
    let recommended_workers = data.tasks.len().div_ceil(3);

    let capacity = data.total_capacity();
    let utilization = if capacity > 0 {
        data.total_demand() as f64 / capacity as f64
    } else {
        0.0
    };

    let mut recommendations = Vec::new();
    let timeline_risk = if utilization > RISK_HIGH {
        recommendations.push("Consider extending timeline or adding resources".to_string());
        TimelineRisk::High
    } else if utilization > RISK_MEDIUM {
        recommendations.push("Monitor resource allocation closely".to_string());
        TimelineRisk::Medium
    } else {
        TimelineRisk::Low
    };

    ResourceForecast {
        recommended_workers,
        capacity_utilization: utilization,
        timeline_risk,
        recommendations,
    }
}

/// A data-driven rule the user may want to adopt.
#[derive(Debug, Clone, Serialize)]
pub struct RuleRecommendation {
    pub suggestion: String,
    pub description: String,
    pub rule: Rule,
}

/// Suggest rules from observed data patterns: shared task requests, tight
/// worker capacity, and uncovered skills. Capped at five, deterministic
/// order.
pub fn recommend_rules(data: &DataSet) -> Vec<RuleRecommendation> {
    let mut recommendations = Vec::new();

    for task in &data.tasks {
        if task.task_id.is_empty() {
            continue;
        }
        let requesters = data
            .clients
            .iter()
            .filter(|client| client.requested_task_ids.contains(&task.task_id))
            .count();
        if requesters > 1 {
            recommendations.push(RuleRecommendation {
                suggestion: format!("Tasks often requested together: {}", task.task_id),
                description: format!("{requesters} clients request this task"),
                rule: Rule {
                    id: format!("corun-{}", task.task_id),
                    name: format!("Co-run Tasks: {}", task.task_id),
                    description: format!("Task {} must run with its co-requested set", task.task_id),
                    params: RuleParams::CoRun {
                        task_ids: vec![task.task_id.clone()],
                    },
                    enabled: true,
                    confidence: None,
                },
            });
        }
    }

    for worker in &data.workers {
        let slots = worker.available_slots.len() as i64;
        let max_load = worker.max_load_per_phase;
        if slots > 0 && max_load > 0 && slots < max_load * 2 {
            let cap = ((max_load as f64) * 0.8).floor() as u32;
            recommendations.push(RuleRecommendation {
                suggestion: format!("Worker {} may be overloaded", worker.worker_name),
                description: format!("Only {slots} available slots vs {max_load} max load"),
                rule: Rule {
                    id: format!("loadlimit-{}", worker.worker_group),
                    name: format!("Load Limit: {}", worker.worker_group),
                    description: format!(
                        "Limit {} workers to {cap} slots per phase",
                        worker.worker_group
                    ),
                    params: RuleParams::LoadLimit {
                        worker_group: worker.worker_group.clone(),
                        max_slots_per_phase: cap,
                    },
                    enabled: true,
                    confidence: None,
                },
            });
        }
    }

    let offered = data.offered_skills();
    let missing: Vec<String> = data
        .required_skills()
        .into_iter()
        .filter(|skill| !offered.contains(skill))
        .map(str::to_string)
        .collect();
    if !missing.is_empty() {
        let mut payload = std::collections::BTreeMap::new();
        payload.insert(
            "missingSkills".to_string(),
            serde_json::to_value(&missing).unwrap_or_default(),
        );
        payload.insert(
            "alertType".to_string(),
            serde_json::Value::String("skill_gap".to_string()),
        );
        recommendations.push(RuleRecommendation {
            suggestion: format!(
                "Missing skills detected: {}",
                missing.iter().take(3).cloned().collect::<Vec<_>>().join(", ")
            ),
            description: format!(
                "{} required skills not available in worker pool",
                missing.len()
            ),
            rule: Rule {
                id: "skillgap-alert".to_string(),
                name: format!(
                    "Skill Gap Alert: {}",
                    missing.iter().take(2).cloned().collect::<Vec<_>>().join(", ")
                ),
                description: format!("Alert for missing skills: {}", missing.join(", ")),
                params: RuleParams::Custom { payload },
                enabled: true,
                confidence: None,
            },
        });
    }

    recommendations.truncate(5);
    recommendations
}
