/*
 * Copyright 2026 Mocknest Team
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

use crate::mock::processor::{InboundRequest, MockOutcome};
use crate::mock::registry::RegistryError;
use crate::mock::types::{ConfigImport, ConfigUpdate, NewConfig, NewRoute, RouteUpdate};
use crate::server::app::AppState;
use crate::server::openapi::HealthResponse;
use actix_web::http::header;
use actix_web::web;
use actix_web::HttpRequest;
use actix_web::HttpResponse;
use actix_web::Responder;
use serde::Deserialize;
use tracing::{info, warn};
use utoipa::IntoParams;

fn registry_error_response(error: RegistryError) -> HttpResponse {
    match &error {
        RegistryError::ConfigNotFound(_) | RegistryError::RouteNotFound(_) => {
            HttpResponse::NotFound().json(serde_json::json!({"error": error.to_string()}))
        }
        RegistryError::InvalidInput(_) => {
            HttpResponse::BadRequest().json(serde_json::json!({"error": error.to_string()}))
        }
    }
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    responses(
        (status = 200, description = "Server is healthy", body = HealthResponse)
    )
)]
pub async fn health_handler() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "mocknest",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

#[utoipa::path(
    post,
    path = "/__admin/configs",
    tag = "Configs",
    request_body = NewConfig,
    responses(
        (status = 201, description = "Config created", body = crate::mock::types::MockConfig),
        (status = 400, description = "Invalid input")
    )
)]
pub async fn create_config(
    data: web::Data<AppState>,
    payload: web::Json<NewConfig>,
) -> impl Responder {
    match data.engine.registry.create_config(payload.into_inner()) {
        Ok(config) => {
            info!(config_id = %config.id, name = %config.name, "Mock config created");
            HttpResponse::Created().json(config)
        }
        Err(e) => registry_error_response(e),
    }
}

#[utoipa::path(
    get,
    path = "/__admin/configs",
    tag = "Configs",
    responses(
        (status = 200, description = "All mock configs", body = Vec<crate::mock::types::MockConfig>)
    )
)]
pub async fn list_configs(data: web::Data<AppState>) -> impl Responder {
    let configs: Vec<_> = data
        .engine
        .registry
        .list_configs()
        .iter()
        .map(|c| c.as_ref().clone())
        .collect();
    HttpResponse::Ok().json(configs)
}

#[utoipa::path(
    get,
    path = "/__admin/configs/{id}",
    tag = "Configs",
    responses(
        (status = 200, description = "The mock config", body = crate::mock::types::MockConfig),
        (status = 404, description = "Unknown config")
    )
)]
pub async fn get_config(data: web::Data<AppState>, id: web::Path<String>) -> impl Responder {
    match data.engine.registry.get_config(&id) {
        Ok(config) => HttpResponse::Ok().json(config.as_ref()),
        Err(e) => registry_error_response(e),
    }
}

#[utoipa::path(
    put,
    path = "/__admin/configs/{id}",
    tag = "Configs",
    request_body = ConfigUpdate,
    responses(
        (status = 200, description = "Updated config", body = crate::mock::types::MockConfig),
        (status = 404, description = "Unknown config")
    )
)]
pub async fn update_config(
    data: web::Data<AppState>,
    id: web::Path<String>,
    payload: web::Json<ConfigUpdate>,
) -> impl Responder {
    match data.engine.registry.update_config(&id, payload.into_inner()) {
        Ok(config) => HttpResponse::Ok().json(config),
        Err(e) => registry_error_response(e),
    }
}

#[utoipa::path(
    delete,
    path = "/__admin/configs/{id}",
    tag = "Configs",
    responses(
        (status = 204, description = "Config deleted"),
        (status = 404, description = "Unknown config")
    )
)]
pub async fn delete_config(data: web::Data<AppState>, id: web::Path<String>) -> impl Responder {
    match data.engine.registry.delete_config(&id) {
        Ok(()) => {
            info!(config_id = %id, "Mock config deleted");
            HttpResponse::NoContent().finish()
        }
        Err(e) => registry_error_response(e),
    }
}

#[utoipa::path(
    post,
    path = "/__admin/configs/{id}/routes",
    tag = "Routes",
    request_body = NewRoute,
    responses(
        (status = 201, description = "Route created", body = crate::mock::types::Route),
        (status = 404, description = "Unknown config")
    )
)]
pub async fn create_route(
    data: web::Data<AppState>,
    id: web::Path<String>,
    payload: web::Json<NewRoute>,
) -> impl Responder {
    match data.engine.registry.add_route(&id, payload.into_inner()) {
        Ok(route) => {
            info!(config_id = %id, route_id = %route.id, path = %route.path, "Route created");
            HttpResponse::Created().json(route)
        }
        Err(e) => registry_error_response(e),
    }
}

#[utoipa::path(
    put,
    path = "/__admin/configs/{id}/routes/{route_id}",
    tag = "Routes",
    request_body = RouteUpdate,
    responses(
        (status = 200, description = "Updated route", body = crate::mock::types::Route),
        (status = 404, description = "Unknown config or route")
    )
)]
pub async fn update_route(
    data: web::Data<AppState>,
    path: web::Path<(String, String)>,
    payload: web::Json<RouteUpdate>,
) -> impl Responder {
    let (config_id, route_id) = path.into_inner();
    match data
        .engine
        .registry
        .update_route(&config_id, &route_id, payload.into_inner())
    {
        Ok(route) => HttpResponse::Ok().json(route),
        Err(e) => registry_error_response(e),
    }
}

#[utoipa::path(
    delete,
    path = "/__admin/configs/{id}/routes/{route_id}",
    tag = "Routes",
    responses(
        (status = 204, description = "Route deleted"),
        (status = 404, description = "Unknown config or route")
    )
)]
pub async fn delete_route(
    data: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> impl Responder {
    let (config_id, route_id) = path.into_inner();
    match data.engine.registry.delete_route(&config_id, &route_id) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => registry_error_response(e),
    }
}

#[utoipa::path(
    post,
    path = "/__admin/import",
    tag = "Configs",
    request_body = Vec<ConfigImport>,
    responses(
        (status = 201, description = "All configs imported", body = Vec<crate::mock::types::MockConfig>),
        (status = 400, description = "Malformed import, nothing was applied")
    )
)]
pub async fn import_configs(
    data: web::Data<AppState>,
    payload: web::Json<Vec<ConfigImport>>,
) -> impl Responder {
    match data.engine.registry.import(payload.into_inner()) {
        Ok(configs) => {
            info!(count = configs.len(), "Mock configs imported");
            HttpResponse::Created().json(configs)
        }
        Err(e) => registry_error_response(e),
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct LogQuery {
    /// Maximum number of entries to return, newest first.
    pub limit: Option<usize>,
}

#[utoipa::path(
    get,
    path = "/__admin/requests",
    tag = "Introspection",
    params(LogQuery),
    responses(
        (status = 200, description = "Recent mock requests", body = Vec<crate::mock::store::RequestLogEntry>)
    )
)]
pub async fn request_log(data: web::Data<AppState>, query: web::Query<LogQuery>) -> impl Responder {
    let limit = query.limit.unwrap_or(100);
    HttpResponse::Ok().json(data.engine.log.recent(limit))
}

#[utoipa::path(
    get,
    path = "/__admin/stats",
    tag = "Introspection",
    responses(
        (status = 200, description = "Aggregate statistics", body = crate::mock::store::StatsSnapshot)
    )
)]
pub async fn stats_handler(data: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(data.engine.stats_snapshot())
}

/// Catch-all mock dispatch. Unmatched routes and unresolvable template
/// expressions are normal outcomes here; a 500 would mean a genuine
/// internal fault.
pub async fn dispatch_handler(
    req: HttpRequest,
    body: web::Bytes,
    data: web::Data<AppState>,
) -> impl Responder {
    let method = req.method().to_string();
    let path = req.uri().path().to_string();

    let headers = req
        .headers()
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("").to_string()))
        .collect();

    let body_str = if body.is_empty() {
        None
    } else {
        match String::from_utf8(body.to_vec()) {
            Ok(s) => Some(s),
            Err(_) => {
                return HttpResponse::BadRequest().json(serde_json::json!({
                    "error": "Invalid UTF-8 sequence in request body"
                }));
            }
        }
    };

    let outcome = data
        .engine
        .processor
        .process(InboundRequest {
            method,
            path,
            headers,
            body: body_str,
        })
        .await;

    match outcome {
        MockOutcome::Matched(response) => {
            let status = actix_web::http::StatusCode::from_u16(response.status)
                .unwrap_or(actix_web::http::StatusCode::OK);
            let mut builder = HttpResponse::build(status);

            let mut explicit_content_type = false;
            // A rendered header may contain bytes illegal in HTTP (a
            // template can pull a CRLF out of the request body). Such
            // pairs are dropped; dispatch itself never turns into a 500.
            for (key, value) in response.headers {
                let (name, value) = match (
                    header::HeaderName::try_from(key.as_str()),
                    header::HeaderValue::try_from(value.as_str()),
                ) {
                    (Ok(name), Ok(value)) => (name, value),
                    _ => {
                        warn!(header = %key, "skipping invalid rendered response header");
                        continue;
                    }
                };
                if name == header::CONTENT_TYPE {
                    explicit_content_type = true;
                }
                builder.insert_header((name, value));
            }

            match response.body {
                serde_json::Value::Null => builder.finish(),
                serde_json::Value::String(text) => {
                    if !explicit_content_type {
                        builder.insert_header((header::CONTENT_TYPE, "text/plain; charset=utf-8"));
                    }
                    builder.body(text)
                }
                json => {
                    if !explicit_content_type {
                        builder.insert_header(header::ContentType::json());
                    }
                    builder.body(json.to_string())
                }
            }
        }
        MockOutcome::NoRoute { method, path } => {
            HttpResponse::NotFound().json(serde_json::json!({
                "error": "No mock route matched",
                "method": method,
                "path": path
            }))
        }
    }
}
