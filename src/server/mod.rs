//! HTTP endpoint layer.
//!
//! Maps five JSON operations onto [`TaskService`] calls:
//!
//! | Method   | Path          | Operation      |
//! |----------|---------------|----------------|
//! | `POST`   | `/tasks`      | create         |
//! | `GET`    | `/tasks`      | list / filter  |
//! | `GET`    | `/tasks/{id}` | get by id      |
//! | `PATCH`  | `/tasks/{id}` | partial update |
//! | `DELETE` | `/tasks/{id}` | remove         |
//!
//! Validation failures surface as `400` with a structured violation list,
//! a missing record as `404`, an expired request as `504`, and storage
//! failures as `500`. SQLite work runs on the blocking thread pool, bounded
//! by the configured request timeout; on expiry the in-flight work is
//! abandoned best-effort and the caller gets a timeout response.

use crate::libs::config::Config;
use crate::libs::service::{TaskError, TaskService};
use crate::libs::validation::{self, FieldViolation, ViolationKind};
use actix_web::error::{InternalError, JsonPayloadError};
use actix_web::{delete, get, patch, post, rt, web, App, HttpRequest, HttpResponse, HttpServer, Responder};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::time::Duration;

/// Shared per-worker state: the configuration loaded at startup.
pub struct ServerState {
    pub config: Config,
}

/// Optional equality filters for the list endpoint.
#[derive(Debug, Deserialize)]
struct ListParams {
    status: Option<String>,
    priority: Option<String>,
}

/// Runs one service operation on the blocking pool, bounded by the
/// configured request timeout.
///
/// A fresh service (and connection) is opened per request; every call is a
/// single round-trip, so there is no pooled state to manage. When the
/// timeout fires the blocking task keeps running to completion on its
/// thread, but its result is discarded.
async fn execute<T, F>(state: &web::Data<ServerState>, op: F) -> Result<T, TaskError>
where
    F: FnOnce(&mut TaskService) -> Result<T, TaskError> + Send + 'static,
    T: Send + 'static,
{
    let config = state.config.clone();
    let timeout = Duration::from_secs(state.config.server().request_timeout_secs);

    let job = web::block(move || {
        let mut service = TaskService::new(&config)?;
        op(&mut service)
    });

    match rt::time::timeout(timeout, job).await {
        Ok(Ok(outcome)) => outcome,
        Ok(Err(canceled)) => Err(TaskError::Storage(anyhow::anyhow!("worker canceled: {canceled}"))),
        Err(_elapsed) => Err(TaskError::Timeout),
    }
}

/// Answers a body the JSON extractor could not parse into an object with
/// the same structured violation shape as validation failures, instead of
/// actix's default plain-text `400`.
fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    tracing::debug!(error = %err, "rejected malformed request body");
    let response = HttpResponse::BadRequest().json(json!({
        "error": "VALIDATION_FAILED",
        "violations": [FieldViolation::new("payload", ViolationKind::MalformedPayload)],
    }));
    InternalError::from_response(err, response).into()
}

/// Maps a failed operation to its HTTP response.
fn error_response(err: &TaskError) -> HttpResponse {
    match err {
        TaskError::Validation(violations) => {
            tracing::debug!(count = violations.len(), "request rejected by validation");
            HttpResponse::BadRequest().json(json!({
                "error": "VALIDATION_FAILED",
                "violations": violations,
            }))
        }
        TaskError::NotFound(id) => HttpResponse::NotFound().json(json!({
            "error": "NOT_FOUND",
            "id": id,
        })),
        TaskError::Timeout => {
            tracing::warn!("request exceeded the configured timeout");
            HttpResponse::GatewayTimeout().json(json!({ "error": "TIMEOUT" }))
        }
        TaskError::Storage(cause) => {
            tracing::error!(error = %cause, "storage failure");
            HttpResponse::InternalServerError().json(json!({ "error": "STORAGE_ERROR" }))
        }
    }
}

#[post("/tasks")]
async fn create_task(state: web::Data<ServerState>, payload: web::Json<Map<String, Value>>) -> impl Responder {
    let payload = payload.into_inner();
    match execute(&state, move |service| service.create_task(&payload)).await {
        Ok(task) => HttpResponse::Created().json(task),
        Err(err) => error_response(&err),
    }
}

#[get("/tasks")]
async fn list_tasks(state: web::Data<ServerState>, query: web::Query<ListParams>) -> impl Responder {
    let filter = match validation::validate_filter(query.status.as_deref(), query.priority.as_deref()) {
        Ok(filter) => filter,
        Err(violations) => return error_response(&TaskError::Validation(violations)),
    };
    match execute(&state, move |service| service.list_tasks(&filter)).await {
        Ok(tasks) => HttpResponse::Ok().json(tasks),
        Err(err) => error_response(&err),
    }
}

#[get("/tasks/{id}")]
async fn get_task(state: web::Data<ServerState>, path: web::Path<i64>) -> impl Responder {
    let id = path.into_inner();
    match execute(&state, move |service| service.get_task(id)).await {
        Ok(task) => HttpResponse::Ok().json(task),
        Err(err) => error_response(&err),
    }
}

#[patch("/tasks/{id}")]
async fn update_task(state: web::Data<ServerState>, path: web::Path<i64>, payload: web::Json<Map<String, Value>>) -> impl Responder {
    let id = path.into_inner();
    let payload = payload.into_inner();
    match execute(&state, move |service| service.update_task(id, &payload)).await {
        Ok(task) => HttpResponse::Ok().json(task),
        Err(err) => error_response(&err),
    }
}

#[delete("/tasks/{id}")]
async fn delete_task(state: web::Data<ServerState>, path: web::Path<i64>) -> impl Responder {
    let id = path.into_inner();
    match execute(&state, move |service| service.remove_task(id)).await {
        Ok(id) => HttpResponse::Ok().json(json!({ "deleted": id })),
        Err(err) => error_response(&err),
    }
}

/// Registers the five task routes on an actix-web app.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .service(create_task)
        .service(list_tasks)
        .service(get_task)
        .service(update_task)
        .service(delete_task);
}

/// Binds and runs the HTTP server until shutdown.
pub async fn run(config: Config) -> anyhow::Result<()> {
    let server = config.server();
    let state = web::Data::new(ServerState { config: config.clone() });

    tracing::info!(listen = %server.listen, timeout_secs = server.request_timeout_secs, "starting HTTP server");

    HttpServer::new(move || App::new().app_data(state.clone()).configure(configure))
        .bind(server.listen.as_str())?
        .run()
        .await?;

    Ok(())
}
