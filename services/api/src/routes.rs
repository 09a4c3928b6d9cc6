use crate::infra::AppState;
use axum::extract::Path;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post, put};
use axum::{Extension, Json, Router};
use chrono::Utc;
use data_alchemist::engine::domain::{EntityKind, Finding};
use data_alchemist::engine::insights::Insight;
use data_alchemist::engine::rules::{rule_from_description, Rule};
use data_alchemist::error::AppError;
use data_alchemist::export;
use data_alchemist::ingest;
use serde::{Deserialize, Serialize};
use serde_json::json;

pub(crate) fn router() -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/data/:entity", put(upload_endpoint))
        .route("/api/v1/data/:entity/:index", put(edit_row_endpoint))
        .route("/api/v1/validation", get(validation_endpoint))
        .route("/api/v1/validation/fix", post(fix_endpoint))
        .route("/api/v1/insights", get(insights_endpoint))
        .route("/api/v1/forecast", get(forecast_endpoint))
        .route("/api/v1/rules", get(list_rules_endpoint).post(add_rule_endpoint))
        .route("/api/v1/rules/:id", axum::routing::delete(remove_rule_endpoint))
        .route("/api/v1/rules/parse", post(parse_rule_endpoint))
        .route(
            "/api/v1/rules/recommendations",
            get(rule_recommendations_endpoint),
        )
        .route("/api/v1/rules/suggestions", get(rule_suggestions_endpoint))
        .route("/api/v1/priorities/:id", put(priority_endpoint))
        .route("/api/v1/search", post(search_endpoint))
        .route("/api/v1/export/rules-config", get(rules_config_endpoint))
        .route("/api/v1/export/report", get(report_endpoint))
        .route("/api/v1/export/package", get(package_endpoint))
        .route("/api/v1/export/data/:entity", get(data_export_endpoint))
}

fn parse_entity(raw: &str) -> Result<EntityKind, AppError> {
    match raw {
        "clients" => Ok(EntityKind::Clients),
        "workers" => Ok(EntityKind::Workers),
        "tasks" => Ok(EntityKind::Tasks),
        other => Err(AppError::Ingest(ingest::IngestError::UnknownEntity {
            name: other.to_string(),
        })),
    }
}

async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[derive(Debug, Deserialize)]
struct UploadRequest {
    csv: String,
}

#[derive(Debug, Serialize)]
struct ValidationResponse {
    findings: Vec<Finding>,
    score: f64,
}

async fn upload_endpoint(
    Path(entity): Path<String>,
    Extension(state): Extension<AppState>,
    Json(payload): Json<UploadRequest>,
) -> Result<Json<ValidationResponse>, AppError> {
    let entity = parse_entity(&entity)?;
    let reader = payload.csv.as_bytes();

    let mut workspace = state.workspace();
    match entity {
        EntityKind::Clients => workspace.replace_clients(ingest::read_clients(reader)?),
        EntityKind::Workers => workspace.replace_workers(ingest::read_workers(reader)?),
        EntityKind::Tasks => workspace.replace_tasks(ingest::read_tasks(reader)?),
    }

    Ok(Json(ValidationResponse {
        findings: workspace.findings().to_vec(),
        score: workspace.quality_score(),
    }))
}

async fn edit_row_endpoint(
    Path((entity, index)): Path<(String, usize)>,
    Extension(state): Extension<AppState>,
    Json(row): Json<serde_json::Value>,
) -> Result<axum::response::Response, AppError> {
    let entity = parse_entity(&entity)?;
    let mut workspace = state.workspace();

    let edited = match entity {
        EntityKind::Clients => match serde_json::from_value(row) {
            Ok(client) => workspace.edit_client(index, |slot| *slot = client),
            Err(err) => return Ok(bad_row(err)),
        },
        EntityKind::Workers => match serde_json::from_value(row) {
            Ok(worker) => workspace.edit_worker(index, |slot| *slot = worker),
            Err(err) => return Ok(bad_row(err)),
        },
        EntityKind::Tasks => match serde_json::from_value(row) {
            Ok(task) => workspace.edit_task(index, |slot| *slot = task),
            Err(err) => return Ok(bad_row(err)),
        },
    };

    if !edited {
        return Ok((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": format!("no {} row at index {index}", entity.label()) })),
        )
            .into_response());
    }

    Ok(Json(ValidationResponse {
        findings: workspace.findings().to_vec(),
        score: workspace.quality_score(),
    })
    .into_response())
}

fn bad_row(err: serde_json::Error) -> axum::response::Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": format!("invalid row payload: {err}") })),
    )
        .into_response()
}

async fn validation_endpoint(
    Extension(state): Extension<AppState>,
) -> Json<ValidationResponse> {
    let workspace = state.workspace();
    Json(ValidationResponse {
        findings: workspace.findings().to_vec(),
        score: workspace.quality_score(),
    })
}

#[derive(Debug, Serialize)]
struct FixResponse {
    applied: Vec<String>,
    findings: Vec<Finding>,
    score: f64,
}

async fn fix_endpoint(Extension(state): Extension<AppState>) -> Json<FixResponse> {
    let mut workspace = state.workspace();
    let applied = workspace.apply_fixes();
    Json(FixResponse {
        applied,
        findings: workspace.findings().to_vec(),
        score: workspace.quality_score(),
    })
}

async fn insights_endpoint(Extension(state): Extension<AppState>) -> Json<Vec<Insight>> {
    Json(state.workspace().insights())
}

async fn forecast_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    Json(state.workspace().resource_forecast())
}

async fn list_rules_endpoint(Extension(state): Extension<AppState>) -> Json<Vec<Rule>> {
    Json(state.workspace().rules().to_vec())
}

async fn add_rule_endpoint(
    Extension(state): Extension<AppState>,
    Json(rule): Json<Rule>,
) -> (StatusCode, Json<Rule>) {
    let mut workspace = state.workspace();
    workspace.add_rule(rule.clone());
    (StatusCode::CREATED, Json(rule))
}

async fn remove_rule_endpoint(
    Path(id): Path<String>,
    Extension(state): Extension<AppState>,
) -> StatusCode {
    if state.workspace().remove_rule(&id) {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

#[derive(Debug, Deserialize)]
struct ParseRuleRequest {
    description: String,
}

async fn parse_rule_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<ParseRuleRequest>,
) -> impl IntoResponse {
    let id = format!("rule-{}", Utc::now().timestamp_millis());
    match rule_from_description(id, &payload.description) {
        Some(rule) => {
            let mut workspace = state.workspace();
            workspace.add_rule(rule.clone());
            (StatusCode::CREATED, Json(json!({ "rule": rule }))).into_response()
        }
        None => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "error": "rule description is empty" })),
        )
            .into_response(),
    }
}

async fn rule_recommendations_endpoint(
    Extension(state): Extension<AppState>,
) -> impl IntoResponse {
    Json(state.workspace().rule_recommendations())
}

async fn rule_suggestions_endpoint(Extension(state): Extension<AppState>) -> Json<Vec<String>> {
    Json(state.workspace().rule_suggestions())
}

#[derive(Debug, Deserialize)]
struct PriorityRequest {
    weight: f64,
}

async fn priority_endpoint(
    Path(id): Path<String>,
    Extension(state): Extension<AppState>,
    Json(payload): Json<PriorityRequest>,
) -> impl IntoResponse {
    let mut workspace = state.workspace();
    if workspace.set_priority_weight(&id, payload.weight) {
        Json(workspace.priorities().to_vec()).into_response()
    } else {
        (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": format!("unknown priority: {id}") })),
        )
            .into_response()
    }
}

#[derive(Debug, Deserialize)]
struct SearchRequest {
    query: String,
}

async fn search_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<SearchRequest>,
) -> impl IntoResponse {
    Json(state.workspace().search(&payload.query))
}

async fn rules_config_endpoint(
    Extension(state): Extension<AppState>,
) -> Result<Json<export::RulesConfig>, AppError> {
    let workspace = state.workspace();
    let config = export::rules_config(
        workspace.data(),
        workspace.rules(),
        workspace.priorities(),
        workspace.findings(),
        Utc::now(),
    )?;
    Ok(Json(config))
}

async fn report_endpoint(
    Extension(state): Extension<AppState>,
) -> Json<export::ValidationReport> {
    let workspace = state.workspace();
    Json(export::validation_report(workspace.findings(), Utc::now()))
}

async fn package_endpoint(
    Extension(state): Extension<AppState>,
) -> Result<Json<export::ExportPackage>, AppError> {
    let workspace = state.workspace();
    let package = export::export_package(
        workspace.data(),
        workspace.rules(),
        workspace.priorities(),
        workspace.findings(),
        Utc::now(),
    )?;
    Ok(Json(package))
}

async fn data_export_endpoint(
    Path(entity): Path<String>,
    Extension(state): Extension<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let entity = parse_entity(&entity)?;
    let workspace = state.workspace();

    let mut buffer = Vec::new();
    export::write_entity_csv(&mut buffer, workspace.data(), entity, workspace.findings())?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/csv")],
        buffer,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use axum_prometheus::PrometheusMetricLayer;
    use data_alchemist::workspace::Workspace;
    use std::sync::atomic::AtomicBool;
    use std::sync::{Arc, Mutex};
    use tower::ServiceExt;

    fn test_app() -> Router {
        // The prometheus recorder is process-global; `pair()` panics if it is
        // installed twice, so share one handle across every test.
        static HANDLE: std::sync::OnceLock<metrics_exporter_prometheus::PrometheusHandle> =
            std::sync::OnceLock::new();
        let handle = HANDLE
            .get_or_init(|| PrometheusMetricLayer::pair().1)
            .clone();
        let state = AppState {
            workspace: Arc::new(Mutex::new(Workspace::default())),
            readiness: Arc::new(AtomicBool::new(true)),
            metrics: Arc::new(handle),
        };
        router().layer(Extension(state))
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body reads");
        serde_json::from_slice(&bytes).expect("body is json")
    }

    fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request builds")
    }

    const MESSY_CLIENTS: &str =
        "ClientID,ClientName,PriorityLevel,RequestedTaskIDs\nC001,Acme,9,T404\n,Globex,3,\n";

    #[tokio::test]
    async fn healthcheck_reports_ok() {
        let response = test_app()
            .oneshot(Request::get("/health").body(Body::empty()).expect("request"))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn upload_validates_and_scores() {
        let app = test_app();
        let response = app
            .oneshot(json_request(
                "PUT",
                "/api/v1/data/clients",
                json!({ "csv": MESSY_CLIENTS }),
            ))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        let findings = body["findings"].as_array().expect("findings array");
        assert!(findings
            .iter()
            .any(|finding| finding["field"] == "PriorityLevel"));
        assert!(findings.iter().any(|finding| finding["field"] == "ClientID"));
        assert!(body["score"].as_f64().expect("score") >= 0.0);
    }

    #[tokio::test]
    async fn unknown_entity_is_rejected() {
        let response = test_app()
            .oneshot(json_request(
                "PUT",
                "/api/v1/data/vendors",
                json!({ "csv": "" }),
            ))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn export_is_blocked_then_unblocked_by_fixes() {
        let app = test_app();

        let upload = app
            .clone()
            .oneshot(json_request(
                "PUT",
                "/api/v1/data/clients",
                json!({ "csv": "ClientID,PriorityLevel\n,3\n" }),
            ))
            .await
            .expect("upload response");
        assert_eq!(upload.status(), StatusCode::OK);

        let blocked = app
            .clone()
            .oneshot(
                Request::get("/api/v1/export/data/clients")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("export response");
        assert_eq!(blocked.status(), StatusCode::CONFLICT);

        let fix = app
            .clone()
            .oneshot(json_request("POST", "/api/v1/validation/fix", json!({})))
            .await
            .expect("fix response");
        assert_eq!(fix.status(), StatusCode::OK);
        let fix_body = body_json(fix).await;
        assert!(!fix_body["applied"].as_array().expect("applied").is_empty());

        let unblocked = app
            .oneshot(
                Request::get("/api/v1/export/data/clients")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("export response");
        assert_eq!(unblocked.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn parsed_rules_join_the_rule_set() {
        let app = test_app();

        let created = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/v1/rules/parse",
                json!({ "description": "Tasks T001 and T002 must run together" }),
            ))
            .await
            .expect("parse response");
        assert_eq!(created.status(), StatusCode::CREATED);
        let body = body_json(created).await;
        assert_eq!(body["rule"]["enabled"], true);

        let listed = app
            .oneshot(
                Request::get("/api/v1/rules")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("list response");
        let rules = body_json(listed).await;
        assert_eq!(rules.as_array().expect("rules array").len(), 1);
    }

    #[tokio::test]
    async fn blank_rule_text_is_unprocessable() {
        let response = test_app()
            .oneshot(json_request(
                "POST",
                "/api/v1/rules/parse",
                json!({ "description": "   " }),
            ))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn priority_weights_are_updated_in_place() {
        let response = test_app()
            .oneshot(json_request(
                "PUT",
                "/api/v1/priorities/fairness",
                json!({ "weight": 0.4 }),
            ))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let priorities = body_json(response).await;
        let fairness = priorities
            .as_array()
            .expect("priorities array")
            .iter()
            .find(|priority| priority["id"] == "fairness")
            .expect("fairness entry")
            .clone();
        assert_eq!(fairness["weight"], 0.4);
    }

    #[tokio::test]
    async fn row_edits_revalidate_immediately() {
        let app = test_app();

        app.clone()
            .oneshot(json_request(
                "PUT",
                "/api/v1/data/clients",
                json!({ "csv": "ClientID,PriorityLevel\nC001,9\n" }),
            ))
            .await
            .expect("upload response");

        let edited = app
            .clone()
            .oneshot(json_request(
                "PUT",
                "/api/v1/data/clients/0",
                json!({ "ClientID": "C001", "PriorityLevel": 3 }),
            ))
            .await
            .expect("edit response");
        assert_eq!(edited.status(), StatusCode::OK);
        let body = body_json(edited).await;
        assert!(body["findings"].as_array().expect("findings").is_empty());

        let missing = app
            .oneshot(json_request(
                "PUT",
                "/api/v1/data/clients/9",
                json!({ "ClientID": "C010" }),
            ))
            .await
            .expect("edit response");
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn search_returns_matching_collections() {
        let app = test_app();

        app.clone()
            .oneshot(json_request(
                "PUT",
                "/api/v1/data/clients",
                json!({ "csv": "ClientID,ClientName,PriorityLevel\nC001,Acme,5\nC002,Globex,1\n" }),
            ))
            .await
            .expect("upload response");

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/v1/search",
                json!({ "query": "high priority clients" }),
            ))
            .await
            .expect("search response");

        let body = body_json(response).await;
        let clients = body["clients"].as_array().expect("clients array");
        assert_eq!(clients.len(), 1);
        assert_eq!(clients[0]["ClientID"], "C001");
    }
}
