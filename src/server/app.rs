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

use crate::config::Config;
use crate::mock::MockEngine;
use crate::server::handlers;
use crate::server::openapi::ApiDoc;
use crate::telemetry::tracing_middleware;
use actix_web::dev::Server;
use actix_web::http::header;
use actix_web::web;
use actix_web::App;
use actix_web::HttpResponse;
use actix_web::HttpServer;
use actix_web::Responder;
use std::sync::Arc;
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::{SwaggerUi, Url};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub engine: Arc<MockEngine>,
}

/// Configures the management scope plus the catch-all mock dispatcher.
/// Shared with the integration tests so they exercise the same routing
/// table as the real server.
pub fn configure_app(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/health").to(handlers::health_handler))
        .service(
            web::scope("/__admin")
                .service(
                    web::resource("/configs")
                        .route(web::get().to(handlers::list_configs))
                        .route(web::post().to(handlers::create_config)),
                )
                .service(
                    web::resource("/configs/{id}")
                        .route(web::get().to(handlers::get_config))
                        .route(web::put().to(handlers::update_config))
                        .route(web::delete().to(handlers::delete_config)),
                )
                .service(
                    web::resource("/configs/{id}/routes")
                        .route(web::post().to(handlers::create_route)),
                )
                .service(
                    web::resource("/configs/{id}/routes/{route_id}")
                        .route(web::put().to(handlers::update_route))
                        .route(web::delete().to(handlers::delete_route)),
                )
                .service(web::resource("/import").route(web::post().to(handlers::import_configs)))
                .service(web::resource("/requests").route(web::get().to(handlers::request_log)))
                .service(web::resource("/stats").route(web::get().to(handlers::stats_handler))),
        );
}

pub async fn run_server(config: Config, engine: Arc<MockEngine>) -> anyhow::Result<Server> {
    let server_config = config.server.clone();
    let addr = format!("{}:{}", server_config.host, server_config.port);

    info!("Starting server on {}", addr);
    info!("Server workers: {}", server_config.workers);
    info!("Max request size: {} bytes", server_config.max_request_size);

    let openapi = ApiDoc::openapi();
    let swagger_urls = vec![(Url::new("Mocknest API", "/api-docs/openapi.json"), openapi)];

    let server = HttpServer::new(move || {
        let app_state = web::Data::new(AppState {
            config: config.clone(),
            engine: engine.clone(),
        });

        App::new()
            .wrap(tracing_middleware())
            .app_data(app_state.clone())
            .app_data(web::JsonConfig::default().limit(config.server.max_request_size))
            .configure(configure_app)
            .service(SwaggerUi::new("/swagger-ui/{_:.*}").urls(swagger_urls.clone()))
            .service(web::resource("/api-docs/openapi.json").to(openapi_json_handler))
            .default_service(web::to(handlers::dispatch_handler))
    })
    .workers(server_config.workers)
    .bind(addr)?
    .run();

    Ok(server)
}

async fn openapi_json_handler() -> impl Responder {
    let openapi = ApiDoc::openapi();
    match serde_json::to_string(&openapi) {
        Ok(json) => HttpResponse::Ok()
            .insert_header(header::ContentType::json())
            .body(json),
        Err(_) => HttpResponse::InternalServerError().finish(),
    }
}
