use super::domain::DataSet;
use serde::Serialize;

/// Demand above this share of capacity trips the capacity alert.
const CAPACITY_PRESSURE: f64 = 0.8;

/// Deviation from the mean load, as a share of the mean, that counts as
/// imbalanced.
const IMBALANCE_SPREAD: f64 = 0.3;

/// Share of clients at priority 4-5 beyond which priorities look inflated.
const INFLATION_SHARE: f64 = 0.6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightType {
    Optimization,
    Warning,
    Recommendation,
    Pattern,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    High,
    Medium,
    Low,
}

impl Impact {
    pub const fn label(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

/// A derived, non-blocking observation about the dataset. Independent of the
/// validator and its findings.
#[derive(Debug, Clone, Serialize)]
pub struct Insight {
    pub id: &'static str,
    #[serde(rename = "type")]
    pub insight_type: InsightType,
    pub title: String,
    pub description: String,
    pub impact: Impact,
    pub confidence: f64,
    pub actionable: bool,
    #[serde(rename = "suggestedAction", skip_serializing_if = "Option::is_none")]
    pub suggested_action: Option<String>,
}

/// Evaluate every insight rule and rank the results by impact, then
/// confidence. Rules whose preconditions fail are skipped rather than
/// emitted with degenerate numbers.
pub fn generate_insights(data: &DataSet) -> Vec<Insight> {
    let mut insights = Vec::new();

    capacity_pressure(data, &mut insights);
    skill_gap(data, &mut insights);
    workload_imbalance(data, &mut insights);
    priority_inflation(data, &mut insights);

    insights.sort_by(|a, b| {
        a.impact
            .cmp(&b.impact)
            .then(b.confidence.total_cmp(&a.confidence))
    });
    insights
}

fn capacity_pressure(data: &DataSet, insights: &mut Vec<Insight>) {
    let capacity = data.total_capacity();
    let demand = data.total_demand();

    if demand as f64 > capacity as f64 * CAPACITY_PRESSURE {
        insights.push(Insight {
            id: "capacity-warning",
            insight_type: InsightType::Warning,
            title: "Resource Capacity Alert".to_string(),
            description: format!(
                "Task demand ({demand}) is approaching worker capacity ({capacity})"
            ),
            impact: Impact::High,
            confidence: 0.9,
            actionable: true,
            suggested_action: Some(
                "Consider hiring additional workers or extending the project timeline".to_string(),
            ),
        });
    }
}

fn skill_gap(data: &DataSet, insights: &mut Vec<Insight>) {
    let offered = data.offered_skills();
    let missing: Vec<&str> = data
        .required_skills()
        .into_iter()
        .filter(|skill| !offered.contains(skill))
        .collect();

    if !missing.is_empty() {
        insights.push(Insight {
            id: "skill-gap",
            insight_type: InsightType::Recommendation,
            title: "Skill Gap Identified".to_string(),
            description: format!("Missing skills: {}", missing.join(", ")),
            impact: Impact::High,
            confidence: 0.95,
            actionable: true,
            suggested_action: Some("Implement a training program or hire specialists".to_string()),
        });
    }
}

fn workload_imbalance(data: &DataSet, insights: &mut Vec<Insight>) {
    // No workers means no mean load to deviate from.
    if data.workers.is_empty() {
        return;
    }

    let loads: Vec<f64> = data
        .workers
        .iter()
        .map(|worker| worker.capacity() as f64)
        .collect();
    let mean = loads.iter().sum::<f64>() / loads.len() as f64;
    let imbalanced = loads
        .iter()
        .filter(|load| (**load - mean).abs() > mean * IMBALANCE_SPREAD)
        .count();

    if imbalanced > 0 {
        insights.push(Insight {
            id: "workload-imbalance",
            insight_type: InsightType::Optimization,
            title: "Workload Imbalance Detected".to_string(),
            description: format!("{imbalanced} workers have significantly different workloads"),
            impact: Impact::Medium,
            confidence: 0.8,
            actionable: true,
            suggested_action: Some(
                "Redistribute tasks to balance workload across the team".to_string(),
            ),
        });
    }
}

fn priority_inflation(data: &DataSet, insights: &mut Vec<Insight>) {
    if data.clients.is_empty() {
        return;
    }

    let high_priority = data
        .clients
        .iter()
        .filter(|client| client.priority_level >= 4 && client.priority_level <= 5)
        .count();
    let share = high_priority as f64 / data.clients.len() as f64;

    if share > INFLATION_SHARE {
        insights.push(Insight {
            id: "priority-inflation",
            insight_type: InsightType::Pattern,
            title: "Priority Inflation Detected".to_string(),
            description: format!(
                "{}% of clients have high priority",
                (share * 100.0).round() as i64
            ),
            impact: Impact::Medium,
            confidence: 0.7,
            actionable: true,
            suggested_action: Some(
                "Review and rebalance client priorities for better resource allocation".to_string(),
            ),
        });
    }
}
