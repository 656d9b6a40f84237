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

pub mod context;
pub mod evaluator;
pub mod faker;
pub mod matcher;
pub mod processor;
pub mod registry;
pub mod store;
pub mod template;
pub mod types;

use crate::config::types::MockSettings;
use processor::MockRequestProcessor;
use registry::MockRouteRegistry;
use std::sync::Arc;
use std::time::Duration;
use store::{RequestLogStore, StatsCollector};

/// The mock subsystem as one explicit service object: registry, request
/// processor, request log and statistics. Constructed once at startup and
/// handed to request handlers; there is no ambient global state.
pub struct MockEngine {
    pub registry: Arc<MockRouteRegistry>,
    pub processor: MockRequestProcessor,
    pub log: Arc<RequestLogStore>,
    pub stats: Arc<StatsCollector>,
}

impl MockEngine {
    pub fn new(settings: &MockSettings) -> Self {
        let registry = Arc::new(MockRouteRegistry::new());
        let log = Arc::new(RequestLogStore::new(settings.request_log_capacity));
        let stats = Arc::new(StatsCollector::new());
        let provider = faker::provider_for(settings.fake_data);

        let processor = MockRequestProcessor::new(
            registry.clone(),
            log.clone(),
            stats.clone(),
            provider,
            Duration::from_millis(settings.max_delay_ms),
        );

        Self {
            registry,
            processor,
            log,
            stats,
        }
    }

    pub fn stats_snapshot(&self) -> store::StatsSnapshot {
        let active_configs = self
            .registry
            .list_configs()
            .iter()
            .filter(|c| c.enabled)
            .count();
        self.stats
            .snapshot(active_configs, self.registry.route_count())
    }
}

impl Default for MockEngine {
    fn default() -> Self {
        Self::new(&MockSettings::default())
    }
}
