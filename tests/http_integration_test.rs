// HTTP-level integration tests: management API CRUD and catch-all mock
// dispatch through the real actix routing table.

use actix_web::{test, web, App};
use mocknest::config::Config;
use mocknest::mock::MockEngine;
use mocknest::server::{configure_app, dispatch_handler, AppState};
use serde_json::{json, Value};
use std::sync::Arc;

fn app_state(engine: Arc<MockEngine>) -> web::Data<AppState> {
    web::Data::new(AppState {
        config: Config::default(),
        engine,
    })
}

macro_rules! init_app {
    ($engine:expr) => {
        test::init_service(
            App::new()
                .app_data(app_state($engine))
                .configure(configure_app)
                .default_service(web::to(dispatch_handler)),
        )
        .await
    };
}

#[actix_web::test]
async fn test_config_crud_over_http() {
    let app = init_app!(Arc::new(MockEngine::default()));

    // Create
    let req = test::TestRequest::post()
        .uri("/__admin/configs")
        .set_json(json!({"name": "users", "base_path": "/api"}))
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let config_id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["name"], "users");
    assert_eq!(created["enabled"], true);

    // Update
    let req = test::TestRequest::put()
        .uri(&format!("/__admin/configs/{}", config_id))
        .set_json(json!({"enabled": false}))
        .to_request();
    let updated: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(updated["enabled"], false);

    // List
    let req = test::TestRequest::get().uri("/__admin/configs").to_request();
    let listed: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);

    // Delete
    let req = test::TestRequest::delete()
        .uri(&format!("/__admin/configs/{}", config_id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 204);

    // Gone
    let req = test::TestRequest::get()
        .uri(&format!("/__admin/configs/{}", config_id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
}

#[actix_web::test]
async fn test_end_to_end_dispatch_with_path_param() {
    let engine = Arc::new(MockEngine::default());
    let app = init_app!(engine.clone());

    let req = test::TestRequest::post()
        .uri("/__admin/configs")
        .set_json(json!({"name": "users", "base_path": "/api"}))
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let config_id = created["id"].as_str().unwrap();

    let req = test::TestRequest::post()
        .uri(&format!("/__admin/configs/{}/routes", config_id))
        .set_json(json!({
            "method": "GET",
            "path": "/users/:id",
            "response": {"status": 200, "body": {"id": "{{params.id}}"}}
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);

    let req = test::TestRequest::get().uri("/api/users/7").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({"id": "7"}));

    // The dispatch was recorded as matched.
    let req = test::TestRequest::get()
        .uri("/__admin/requests?limit=10")
        .to_request();
    let log: Value = test::call_and_read_body_json(&app, req).await;
    let entries = log.as_array().unwrap();
    assert_eq!(entries[0]["path"], "/api/users/7");
    assert_eq!(entries[0]["matched"], true);
}

#[actix_web::test]
async fn test_dispatch_404_names_method_and_path() {
    let app = init_app!(Arc::new(MockEngine::default()));

    let req = test::TestRequest::delete().uri("/no/such/route").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["method"], "DELETE");
    assert_eq!(body["path"], "/no/such/route");
}

#[actix_web::test]
async fn test_route_update_and_delete_over_http() {
    let engine = Arc::new(MockEngine::default());
    let app = init_app!(engine.clone());

    let req = test::TestRequest::post()
        .uri("/__admin/configs")
        .set_json(json!({"name": "demo"}))
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let config_id = created["id"].as_str().unwrap();

    let req = test::TestRequest::post()
        .uri(&format!("/__admin/configs/{}/routes", config_id))
        .set_json(json!({"method": "GET", "path": "/a", "response": {"status": 200}}))
        .to_request();
    let route: Value = test::call_and_read_body_json(&app, req).await;
    let route_id = route["id"].as_str().unwrap();

    let req = test::TestRequest::put()
        .uri(&format!(
            "/__admin/configs/{}/routes/{}",
            config_id, route_id
        ))
        .set_json(json!({"response": {"status": 503}}))
        .to_request();
    let updated: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(updated["response"]["status"], 503);

    let req = test::TestRequest::get().uri("/a").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 503);

    let req = test::TestRequest::delete()
        .uri(&format!(
            "/__admin/configs/{}/routes/{}",
            config_id, route_id
        ))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 204);

    let req = test::TestRequest::get().uri("/a").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
}

#[actix_web::test]
async fn test_malformed_import_applies_nothing() {
    let engine = Arc::new(MockEngine::default());
    let app = init_app!(engine.clone());

    let req = test::TestRequest::post()
        .uri("/__admin/import")
        .set_json(json!([
            {"name": "good", "routes": [{"method": "GET", "path": "/ok"}]},
            {"name": "", "routes": []}
        ]))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    assert_eq!(engine.registry.config_count(), 0);
}

#[actix_web::test]
async fn test_valid_import_and_stats() {
    let engine = Arc::new(MockEngine::default());
    let app = init_app!(engine.clone());

    let req = test::TestRequest::post()
        .uri("/__admin/import")
        .set_json(json!([
            {
                "name": "ping",
                "routes": [
                    {"method": "GET", "path": "/ping", "response": {"status": 200, "body": "pong"}}
                ]
            }
        ]))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);

    let req = test::TestRequest::get().uri("/ping").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let body = test::read_body(resp).await;
    assert_eq!(body, web::Bytes::from_static(b"pong"));

    let req = test::TestRequest::get().uri("/__admin/stats").to_request();
    let stats: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(stats["total_requests"], 1);
    assert_eq!(stats["matched_requests"], 1);
    assert_eq!(stats["active_configs"], 1);
    assert_eq!(stats["total_routes"], 1);
}

#[actix_web::test]
async fn test_request_body_drives_template() {
    let engine = Arc::new(MockEngine::default());
    let app = init_app!(engine.clone());

    engine
        .registry
        .import(vec![serde_json::from_value(json!({
            "name": "echo",
            "routes": [{
                "method": "POST",
                "path": "/echo",
                "response": {"status": 200, "body": {"hello": "{{body.name}}"}}
            }]
        }))
        .unwrap()])
        .unwrap();

    let req = test::TestRequest::post()
        .uri("/echo")
        .set_json(json!({"name": "ann"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({"hello": "ann"}));
}

#[actix_web::test]
async fn test_header_rendered_with_illegal_bytes_is_dropped_not_500() {
    let engine = Arc::new(MockEngine::default());
    let app = init_app!(engine.clone());

    engine
        .registry
        .import(vec![serde_json::from_value(json!({
            "name": "echo-hdr",
            "routes": [{
                "method": "POST",
                "path": "/echo",
                "response": {
                    "status": 200,
                    "headers": {"X-Name": "{{body.name}}"},
                    "body": {"ok": true}
                }
            }]
        }))
        .unwrap()])
        .unwrap();

    // The rendered header value would carry a CRLF, which is illegal in
    // HTTP. The pair is dropped and the response still succeeds.
    let req = test::TestRequest::post()
        .uri("/echo")
        .set_json(json!({"name": "evil\r\ninjected: yes"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    assert!(resp.headers().get("X-Name").is_none());
    assert!(resp.headers().get("injected").is_none());
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({"ok": true}));
}

#[actix_web::test]
async fn test_templated_response_headers() {
    let engine = Arc::new(MockEngine::default());
    let app = init_app!(engine.clone());

    engine
        .registry
        .import(vec![serde_json::from_value(json!({
            "name": "hdr",
            "routes": [{
                "method": "GET",
                "path": "/items/:id",
                "response": {
                    "status": 200,
                    "headers": {"X-Item-Id": "{{params.id}}"}
                }
            }]
        }))
        .unwrap()])
        .unwrap();

    let req = test::TestRequest::get().uri("/items/99").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers().get("X-Item-Id").unwrap().to_str().unwrap(),
        "99"
    );
}
