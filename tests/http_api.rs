use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use serde_json::{json, Value};
use taskdeck::libs::config::{Config, DatabaseConfig, ServerConfig, DEFAULT_LISTEN};
use taskdeck::libs::data_storage::DataStorage;
use taskdeck::server::{configure, ServerState};
use tempfile::TempDir;

/// Points the data directory at a fresh temp dir for the duration of a test.
fn sandbox() -> TempDir {
    let temp_dir = tempfile::tempdir().unwrap();
    std::env::set_var("HOME", temp_dir.path());
    std::env::set_var("LOCALAPPDATA", temp_dir.path());
    temp_dir
}

fn state_for(db_file: &str) -> web::Data<ServerState> {
    web::Data::new(ServerState {
        config: Config {
            server: None,
            database: Some(DatabaseConfig { file: db_file.to_string() }),
        },
    })
}

#[actix_web::test]
async fn test_create_returns_created_task() {
    let _dir = sandbox();
    let app = test::init_service(App::new().app_data(state_for("http_create.db")).configure(configure)).await;

    let req = test::TestRequest::post().uri("/tasks").set_json(json!({"title": "Buy milk"})).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let task: Value = test::read_body_json(resp).await;
    assert_eq!(task["title"], "Buy milk");
    assert_eq!(task["status"], "PENDING");
    assert_eq!(task["priority"], Value::Null);
    assert_eq!(task["due_date"], Value::Null);
    assert!(task["id"].as_i64().unwrap() > 0);
    assert_eq!(task["created_at"], task["updated_at"]);
}

#[actix_web::test]
async fn test_create_rejects_invalid_payload() {
    let _dir = sandbox();
    let app = test::init_service(App::new().app_data(state_for("http_invalid.db")).configure(configure)).await;

    let req = test::TestRequest::post()
        .uri("/tasks")
        .set_json(json!({"title": "T", "priority": "URGENT"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "VALIDATION_FAILED");
    assert_eq!(body["violations"][0]["field"], "priority");
    assert_eq!(body["violations"][0]["violation"], "INVALID_ENUM_VALUE");
}

#[actix_web::test]
async fn test_get_missing_task_is_404() {
    let _dir = sandbox();
    let app = test::init_service(App::new().app_data(state_for("http_missing.db")).configure(configure)).await;

    let req = test::TestRequest::get().uri("/tasks/12345").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "NOT_FOUND");
    assert_eq!(body["id"], 12345);
}

#[actix_web::test]
async fn test_update_patches_task() {
    let _dir = sandbox();
    let app = test::init_service(App::new().app_data(state_for("http_update.db")).configure(configure)).await;

    let req = test::TestRequest::post()
        .uri("/tasks")
        .set_json(json!({"title": "Ship release", "priority": "HIGH"}))
        .to_request();
    let created: Value = test::read_body_json(test::call_service(&app, req).await).await;
    let id = created["id"].as_i64().unwrap();

    let req = test::TestRequest::patch()
        .uri(&format!("/tasks/{id}"))
        .set_json(json!({"status": "COMPLETED"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let updated: Value = test::read_body_json(resp).await;
    assert_eq!(updated["status"], "COMPLETED");
    assert_eq!(updated["title"], "Ship release");
    assert_eq!(updated["priority"], "HIGH");
    assert_eq!(updated["created_at"], created["created_at"]);
}

#[actix_web::test]
async fn test_update_empty_payload_is_rejected() {
    let _dir = sandbox();
    let app = test::init_service(App::new().app_data(state_for("http_update_empty.db")).configure(configure)).await;

    let req = test::TestRequest::post().uri("/tasks").set_json(json!({"title": "Idle"})).to_request();
    let created: Value = test::read_body_json(test::call_service(&app, req).await).await;
    let id = created["id"].as_i64().unwrap();

    let req = test::TestRequest::patch().uri(&format!("/tasks/{id}")).set_json(json!({})).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["violations"][0]["violation"], "EMPTY_UPDATE");
}

#[actix_web::test]
async fn test_delete_then_get_is_404() {
    let _dir = sandbox();
    let app = test::init_service(App::new().app_data(state_for("http_delete.db")).configure(configure)).await;

    let req = test::TestRequest::post().uri("/tasks").set_json(json!({"title": "Temp"})).to_request();
    let created: Value = test::read_body_json(test::call_service(&app, req).await).await;
    let id = created["id"].as_i64().unwrap();

    let req = test::TestRequest::delete().uri(&format!("/tasks/{id}")).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["deleted"], id);

    let req = test::TestRequest::get().uri(&format!("/tasks/{id}")).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // Double delete reports NOT_FOUND rather than succeeding silently.
    let req = test::TestRequest::delete().uri(&format!("/tasks/{id}")).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_list_filters_by_status() {
    let _dir = sandbox();
    let app = test::init_service(App::new().app_data(state_for("http_list.db")).configure(configure)).await;

    for (title, status) in [("A", "PENDING"), ("B", "IN_PROGRESS"), ("C", "PENDING")] {
        let req = test::TestRequest::post()
            .uri("/tasks")
            .set_json(json!({"title": title, "status": status}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let req = test::TestRequest::get().uri("/tasks?status=PENDING").to_request();
    let tasks: Value = test::read_body_json(test::call_service(&app, req).await).await;
    let titles: Vec<&str> = tasks.as_array().unwrap().iter().map(|t| t["title"].as_str().unwrap()).collect();
    assert_eq!(titles, vec!["A", "C"]);
}

#[actix_web::test]
async fn test_expired_request_is_504() {
    let _dir = sandbox();
    // A zero-second budget expires before the blocking task can finish.
    let state = web::Data::new(ServerState {
        config: Config {
            server: Some(ServerConfig {
                listen: DEFAULT_LISTEN.to_string(),
                request_timeout_secs: 0,
            }),
            database: Some(DatabaseConfig {
                file: "http_timeout.db".to_string(),
            }),
        },
    });
    let app = test::init_service(App::new().app_data(state).configure(configure)).await;

    let req = test::TestRequest::post().uri("/tasks").set_json(json!({"title": "Slow"})).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::GATEWAY_TIMEOUT);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "TIMEOUT");
}

#[actix_web::test]
async fn test_corrupt_database_is_500() {
    let _dir = sandbox();
    // A file that is not an SQLite database fails when migrations run.
    let db_path = DataStorage::new().get_path("http_corrupt.db").unwrap();
    std::fs::write(&db_path, b"this is not a database").unwrap();
    let app = test::init_service(App::new().app_data(state_for("http_corrupt.db")).configure(configure)).await;

    let req = test::TestRequest::get().uri("/tasks/1").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "STORAGE_ERROR");
}

#[actix_web::test]
async fn test_non_object_body_keeps_error_shape() {
    let _dir = sandbox();
    let app = test::init_service(App::new().app_data(state_for("http_non_object.db")).configure(configure)).await;

    let req = test::TestRequest::post().uri("/tasks").set_json(json!(5)).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "VALIDATION_FAILED");
    assert_eq!(body["violations"][0]["field"], "payload");
    assert_eq!(body["violations"][0]["violation"], "MALFORMED_PAYLOAD");
}

#[actix_web::test]
async fn test_list_rejects_unknown_filter_value() {
    let _dir = sandbox();
    let app = test::init_service(App::new().app_data(state_for("http_bad_filter.db")).configure(configure)).await;

    let req = test::TestRequest::get().uri("/tasks?status=URGENT").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "VALIDATION_FAILED");
    assert_eq!(body["violations"][0]["field"], "status");
}
