//! Core engine: validation, scoring, auto-fix, insights, and the advisory
//! heuristics layered on the same aggregate statistics.
//!
//! Every function here is synchronous, side-effect free, and total over
//! malformed input: absent or zero fields degrade to findings, never to
//! panics or errors. Callers own the commit-and-revalidate sequencing (see
//! [`crate::workspace`]).

pub mod advisor;
pub mod autofix;
pub mod domain;
pub mod insights;
pub mod rules;
pub mod scoring;
pub mod search;
pub mod validation;

#[cfg(test)]
mod tests;

pub use advisor::{optimize_rules, predict_resource_needs, recommend_rules, ResourceForecast};
pub use autofix::{auto_fix, FixOutcome};
pub use domain::{
    Client, DataSet, EntityKind, Finding, FindingKind, ProposedValue, Severity, Task, Worker,
};
pub use insights::{generate_insights, Impact, Insight, InsightType};
pub use rules::{
    classify_rule_text, default_priorities, rule_from_description, Priority, Rule, RuleParams,
    RuleSignal, RuleType,
};
pub use scoring::quality_score;
pub use search::{KeywordSearch, SearchResults, SearchStrategy};
pub use validation::validate;
