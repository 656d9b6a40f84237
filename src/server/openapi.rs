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

use crate::mock::store::{RequestLogEntry, StatsSnapshot};
use crate::mock::types::{
    ConfigImport, ConfigUpdate, MockConfig, NewConfig, NewRoute, ResponseSpec, Route, RouteUpdate,
};
use serde::Serialize;
use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Mocknest API",
        description = "Mock HTTP server engine: config management, route templating and request introspection",
        version = "0.1.0",
        license(
            name = "Apache-2.0",
            url = "https://github.com/mocknest/mocknest/blob/main/LICENSE"
        )
    ),
    paths(
        super::handlers::health_handler,
        super::handlers::create_config,
        super::handlers::list_configs,
        super::handlers::get_config,
        super::handlers::update_config,
        super::handlers::delete_config,
        super::handlers::create_route,
        super::handlers::update_route,
        super::handlers::delete_route,
        super::handlers::import_configs,
        super::handlers::request_log,
        super::handlers::stats_handler,
    ),
    components(
        schemas(
            HealthResponse,
            ErrorResponse,
            MockConfig,
            Route,
            ResponseSpec,
            NewConfig,
            ConfigUpdate,
            NewRoute,
            RouteUpdate,
            ConfigImport,
            RequestLogEntry,
            StatsSnapshot
        )
    ),
    tags(
        (name = "System", description = "System endpoints"),
        (name = "Configs", description = "Mock config management"),
        (name = "Routes", description = "Route management within a config"),
        (name = "Introspection", description = "Request log and statistics")
    )
)]
pub struct ApiDoc;

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub timestamp: String,
}

#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}
