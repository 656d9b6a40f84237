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

use crate::mock::context::TemplateContext;
use crate::mock::faker::FakeDataProvider;
use crate::mock::registry::MockRouteRegistry;
use crate::mock::store::{RequestLogEntry, RequestLogStore, StatsCollector};
use crate::mock::template;
use chrono::Utc;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct InboundRequest {
    pub method: String,
    pub path: String,
    pub headers: HashMap<String, String>,
    pub body: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RenderedResponse {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: Value,
}

/// Outcome of processing one mock request. A missing route is a normal
/// result, not an error.
#[derive(Debug, Clone)]
pub enum MockOutcome {
    Matched(RenderedResponse),
    NoRoute { method: String, path: String },
}

/// Top-level orchestrator for mock dispatch: log, resolve, render, delay.
pub struct MockRequestProcessor {
    registry: Arc<MockRouteRegistry>,
    log: Arc<RequestLogStore>,
    stats: Arc<StatsCollector>,
    faker: Arc<dyn FakeDataProvider>,
    max_delay: Duration,
}

impl MockRequestProcessor {
    pub fn new(
        registry: Arc<MockRouteRegistry>,
        log: Arc<RequestLogStore>,
        stats: Arc<StatsCollector>,
        faker: Arc<dyn FakeDataProvider>,
        max_delay: Duration,
    ) -> Self {
        Self {
            registry,
            log,
            stats,
            faker,
            max_delay,
        }
    }

    pub async fn process(&self, request: InboundRequest) -> MockOutcome {
        let entry_id = uuid::Uuid::new_v4().to_string();
        self.log.append(RequestLogEntry {
            id: entry_id.clone(),
            method: request.method.clone(),
            path: request.path.clone(),
            body: request.body.clone(),
            headers: request.headers.clone(),
            timestamp: Utc::now(),
            matched: false,
        });
        self.stats.record_request();

        let Some(resolved) = self.registry.resolve(&request.method, &request.path) else {
            debug!(
                method = %request.method,
                path = %request.path,
                "no mock route matched"
            );
            return MockOutcome::NoRoute {
                method: request.method,
                path: request.path,
            };
        };

        self.log.mark_matched(&entry_id);
        self.stats.record_match(&resolved.config.id);

        info!(
            config = %resolved.config.name,
            route = %resolved.route.path,
            method = %request.method,
            path = %request.path,
            "serving mock route"
        );

        // Raw bodies that are not JSON stay addressable as a single string.
        let body_value = request.body.as_deref().map(|raw| {
            serde_json::from_str::<Value>(raw)
                .unwrap_or_else(|_| Value::String(raw.to_string()))
        });

        let context = TemplateContext::new(
            &resolved.params,
            body_value.as_ref(),
            &request.headers,
            self.faker.clone(),
        );

        let spec = &resolved.route.response;
        let headers = spec
            .headers
            .iter()
            .map(|(key, value)| {
                (
                    template::render_str(key, &context),
                    template::render_str(value, &context),
                )
            })
            .collect();
        let body = template::render(&spec.body, &context);

        // Clamped so a single route cannot park a connection indefinitely.
        // This awaits the tokio timer; other in-flight requests are not
        // held up.
        let delay = Duration::from_millis(spec.delay_ms).min(self.max_delay);
        if !delay.is_zero() {
            debug!(delay_ms = delay.as_millis() as u64, "applying response delay");
            tokio::time::sleep(delay).await;
        }

        MockOutcome::Matched(RenderedResponse {
            status: spec.status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::faker::BuiltinFakeProvider;
    use crate::mock::types::{NewConfig, NewRoute, ResponseSpec};
    use assert_json_diff::assert_json_eq;
    use serde_json::json;
    use std::time::Instant;

    fn processor_with_registry() -> (MockRequestProcessor, Arc<MockRouteRegistry>) {
        let registry = Arc::new(MockRouteRegistry::new());
        let processor = MockRequestProcessor::new(
            registry.clone(),
            Arc::new(RequestLogStore::new(100)),
            Arc::new(StatsCollector::new()),
            Arc::new(BuiltinFakeProvider),
            Duration::from_secs(60),
        );
        (processor, registry)
    }

    fn request(method: &str, path: &str) -> InboundRequest {
        InboundRequest {
            method: method.to_string(),
            path: path.to_string(),
            headers: HashMap::new(),
            body: None,
        }
    }

    fn route(method: &str, path: &str, body: Value) -> NewRoute {
        NewRoute {
            method: method.to_string(),
            path: path.to_string(),
            response: ResponseSpec {
                status: 200,
                headers: HashMap::new(),
                body,
                delay_ms: 0,
            },
        }
    }

    #[tokio::test]
    async fn test_no_route_outcome() {
        let (processor, _registry) = processor_with_registry();
        let outcome = processor.process(request("GET", "/missing")).await;
        let MockOutcome::NoRoute { method, path } = outcome else {
            panic!("expected NoRoute");
        };
        assert_eq!(method, "GET");
        assert_eq!(path, "/missing");
    }

    #[tokio::test]
    async fn test_matched_route_renders_params() {
        let (processor, registry) = processor_with_registry();
        let config = registry
            .create_config(NewConfig {
                name: "demo".to_string(),
                base_path: "/api".to_string(),
                enabled: true,
            })
            .unwrap();
        registry
            .add_route(
                &config.id,
                route("GET", "/users/:id", json!({"id": "{{params.id}}"})),
            )
            .unwrap();

        let outcome = processor.process(request("GET", "/api/users/7")).await;
        let MockOutcome::Matched(response) = outcome else {
            panic!("expected a match");
        };
        assert_eq!(response.status, 200);
        assert_json_eq!(response.body, json!({"id": "7"}));
    }

    #[tokio::test]
    async fn test_headers_are_templated() {
        let (processor, registry) = processor_with_registry();
        let config = registry
            .create_config(NewConfig {
                name: "demo".to_string(),
                base_path: String::new(),
                enabled: true,
            })
            .unwrap();
        let mut headers = HashMap::new();
        headers.insert("X-Item".to_string(), "{{params.id}}".to_string());
        registry
            .add_route(
                &config.id,
                NewRoute {
                    method: "GET".to_string(),
                    path: "/items/:id".to_string(),
                    response: ResponseSpec {
                        status: 201,
                        headers,
                        body: Value::Null,
                        delay_ms: 0,
                    },
                },
            )
            .unwrap();

        let outcome = processor.process(request("GET", "/items/9")).await;
        let MockOutcome::Matched(response) = outcome else {
            panic!("expected a match");
        };
        assert_eq!(response.status, 201);
        assert_eq!(response.headers.get("X-Item"), Some(&"9".to_string()));
    }

    #[tokio::test]
    async fn test_request_body_available_in_template() {
        let (processor, registry) = processor_with_registry();
        let config = registry
            .create_config(NewConfig {
                name: "demo".to_string(),
                base_path: String::new(),
                enabled: true,
            })
            .unwrap();
        registry
            .add_route(
                &config.id,
                route("POST", "/echo", json!({"name": "{{body.name}}"})),
            )
            .unwrap();

        let mut req = request("POST", "/echo");
        req.body = Some(r#"{"name":"ann"}"#.to_string());

        let outcome = processor.process(req).await;
        let MockOutcome::Matched(response) = outcome else {
            panic!("expected a match");
        };
        assert_json_eq!(response.body, json!({"name": "ann"}));
    }

    #[tokio::test]
    async fn test_delay_is_applied_and_clamped() {
        let registry = Arc::new(MockRouteRegistry::new());
        let processor = MockRequestProcessor::new(
            registry.clone(),
            Arc::new(RequestLogStore::new(10)),
            Arc::new(StatsCollector::new()),
            Arc::new(BuiltinFakeProvider),
            Duration::from_millis(80),
        );

        let config = registry
            .create_config(NewConfig {
                name: "demo".to_string(),
                base_path: String::new(),
                enabled: true,
            })
            .unwrap();
        registry
            .add_route(
                &config.id,
                NewRoute {
                    method: "GET".to_string(),
                    path: "/slow".to_string(),
                    response: ResponseSpec {
                        status: 200,
                        headers: HashMap::new(),
                        body: Value::Null,
                        // Far above the 80ms ceiling configured above.
                        delay_ms: 10_000,
                    },
                },
            )
            .unwrap();

        let start = Instant::now();
        let outcome = processor.process(request("GET", "/slow")).await;
        let elapsed = start.elapsed();

        assert!(matches!(outcome, MockOutcome::Matched(_)));
        assert!(elapsed >= Duration::from_millis(80));
        assert!(elapsed < Duration::from_millis(1000));
    }

    #[tokio::test]
    async fn test_log_and_stats_updated() {
        let registry = Arc::new(MockRouteRegistry::new());
        let log = Arc::new(RequestLogStore::new(10));
        let stats = Arc::new(StatsCollector::new());
        let processor = MockRequestProcessor::new(
            registry.clone(),
            log.clone(),
            stats.clone(),
            Arc::new(BuiltinFakeProvider),
            Duration::from_secs(60),
        );

        let config = registry
            .create_config(NewConfig {
                name: "demo".to_string(),
                base_path: String::new(),
                enabled: true,
            })
            .unwrap();
        registry
            .add_route(&config.id, route("GET", "/hit", Value::Null))
            .unwrap();

        processor.process(request("GET", "/hit")).await;
        processor.process(request("GET", "/miss")).await;

        let snapshot = stats.snapshot(1, 1);
        assert_eq!(snapshot.total_requests, 2);
        assert_eq!(snapshot.matched_requests, 1);
        assert_eq!(snapshot.hits_per_config.get(&config.id), Some(&1));

        let recent = log.recent(10);
        assert_eq!(recent.len(), 2);
        assert!(!recent[0].matched); // /miss, most recent first
        assert!(recent[1].matched); // /hit
    }

    #[tokio::test]
    async fn test_unresolved_expression_survives_dispatch() {
        let (processor, registry) = processor_with_registry();
        let config = registry
            .create_config(NewConfig {
                name: "demo".to_string(),
                base_path: String::new(),
                enabled: true,
            })
            .unwrap();
        registry
            .add_route(
                &config.id,
                route("GET", "/x", json!({"v": "{{nope.nope}}"})),
            )
            .unwrap();

        let outcome = processor.process(request("GET", "/x")).await;
        let MockOutcome::Matched(response) = outcome else {
            panic!("expected a match");
        };
        assert_json_eq!(response.body, json!({"v": "{{nope.nope}}"}));
    }
}
