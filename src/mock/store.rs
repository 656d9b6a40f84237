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

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::Serialize;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use utoipa::ToSchema;

pub const DEFAULT_LOG_CAPACITY: usize = 1000;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RequestLogEntry {
    pub id: String,
    pub method: String,
    pub path: String,
    pub body: Option<String>,
    pub headers: HashMap<String, String>,
    pub timestamp: DateTime<Utc>,
    pub matched: bool,
}

/// Bounded FIFO of the most recent mock requests. Eviction runs inline on
/// insert; the store never grows past its capacity.
pub struct RequestLogStore {
    entries: Mutex<VecDeque<RequestLogEntry>>,
    capacity: usize,
}

impl RequestLogStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Mutex::new(VecDeque::with_capacity(capacity.min(64))),
            capacity: capacity.max(1),
        }
    }

    pub fn append(&self, entry: RequestLogEntry) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.push_back(entry);
        while entries.len() > self.capacity {
            entries.pop_front();
        }
    }

    pub fn mark_matched(&self, id: &str) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(entry) = entries.iter_mut().rev().find(|e| e.id == id) {
            entry.matched = true;
        }
    }

    /// Most-recent-first listing, capped at `limit`.
    pub fn recent(&self, limit: usize) -> Vec<RequestLogEntry> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.iter().rev().take(limit).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for RequestLogStore {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_CAPACITY)
    }
}

/// Rolling counters for the introspection endpoint.
#[derive(Default)]
pub struct StatsCollector {
    total_requests: AtomicU64,
    matched_requests: AtomicU64,
    hits_per_config: DashMap<String, u64>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StatsSnapshot {
    pub total_requests: u64,
    pub matched_requests: u64,
    pub active_configs: usize,
    pub total_routes: usize,
    pub hits_per_config: HashMap<String, u64>,
}

impl StatsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_request(&self) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_match(&self, config_id: &str) {
        self.matched_requests.fetch_add(1, Ordering::Relaxed);
        *self.hits_per_config.entry(config_id.to_string()).or_insert(0) += 1;
    }

    pub fn snapshot(&self, active_configs: usize, total_routes: usize) -> StatsSnapshot {
        StatsSnapshot {
            total_requests: self.total_requests.load(Ordering::Relaxed),
            matched_requests: self.matched_requests.load(Ordering::Relaxed),
            active_configs,
            total_routes,
            hits_per_config: self
                .hits_per_config
                .iter()
                .map(|entry| (entry.key().clone(), *entry.value()))
                .collect(),
        }
    }
}
