use clap::Args;
use data_alchemist::config::ScoringConfig;
use data_alchemist::engine::domain::{EntityKind, Finding};
use data_alchemist::error::AppError;
use data_alchemist::export;
use data_alchemist::ingest;
use data_alchemist::workspace::Workspace;
use std::fs::File;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct AuditArgs {
    /// Path to the clients CSV
    #[arg(long)]
    pub(crate) clients: Option<PathBuf>,
    /// Path to the workers CSV
    #[arg(long)]
    pub(crate) workers: Option<PathBuf>,
    /// Path to the tasks CSV
    #[arg(long)]
    pub(crate) tasks: Option<PathBuf>,
    /// Apply auto-fixes before reporting
    #[arg(long)]
    pub(crate) fix: bool,
    /// Record count treated as a fully loaded dataset by the quality score
    #[arg(long, default_value_t = 50)]
    pub(crate) target_records: usize,
    /// Emit the full validation report as JSON instead of a text summary
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_audit(args: AuditArgs) -> Result<(), AppError> {
    let AuditArgs {
        clients,
        workers,
        tasks,
        fix,
        target_records,
        json,
    } = args;

    let mut workspace = Workspace::new(ScoringConfig { target_records });

    if let Some(path) = clients {
        workspace.replace_clients(ingest::read_clients(File::open(path)?)?);
    }
    if let Some(path) = workers {
        workspace.replace_workers(ingest::read_workers(File::open(path)?)?);
    }
    if let Some(path) = tasks {
        workspace.replace_tasks(ingest::read_tasks(File::open(path)?)?);
    }

    let applied = if fix { workspace.apply_fixes() } else { Vec::new() };

    if json {
        let report = export::validation_report(workspace.findings(), chrono::Utc::now());
        println!(
            "{}",
            serde_json::to_string_pretty(&report).unwrap_or_else(|_| "{}".to_string())
        );
        return Ok(());
    }

    render_audit(&workspace, &applied);
    Ok(())
}

fn render_audit(workspace: &Workspace, applied: &[String]) {
    let data = workspace.data();
    println!("Data quality audit");
    println!(
        "Records: {} clients, {} workers, {} tasks",
        data.clients.len(),
        data.workers.len(),
        data.tasks.len()
    );
    println!("Quality score: {:.1}", workspace.quality_score());

    if !applied.is_empty() {
        println!("\nAuto-fixes applied: {}", applied.len());
        for id in applied {
            println!("  - {id}");
        }
    }

    let findings = workspace.findings();
    if findings.is_empty() {
        println!("\nValidation: clean, ready to export");
    } else {
        println!("\nValidation findings");
        for entity in [EntityKind::Clients, EntityKind::Workers, EntityKind::Tasks] {
            let for_entity: Vec<&Finding> =
                findings.iter().filter(|f| f.entity == entity).collect();
            if for_entity.is_empty() {
                continue;
            }
            println!("  {}:", entity.label());
            for finding in for_entity {
                println!(
                    "    [{}] row {}: {} ({})",
                    finding.kind.label(),
                    finding.row_index + 1,
                    finding.message,
                    finding.field
                );
            }
        }
    }

    let insights = workspace.insights();
    if !insights.is_empty() {
        println!("\nInsights");
        for insight in insights {
            println!(
                "  [{}] {}: {}",
                insight.impact.label(),
                insight.title,
                insight.description
            );
        }
    }

    let forecast = workspace.resource_forecast();
    println!(
        "\nForecast: {} workers recommended, {:.0}% capacity utilization, timeline risk {}",
        forecast.recommended_workers,
        forecast.capacity_utilization * 100.0,
        forecast.timeline_risk.label()
    );
    for recommendation in &forecast.recommendations {
        println!("  - {recommendation}");
    }
}
