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

use crate::mock::types::ConfigImport;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub mock: MockSettings,
    /// Mock configs registered at startup, validated like a bulk import.
    #[serde(default)]
    pub seeds: Vec<ConfigImport>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_workers")]
    pub workers: usize,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_max_request_size")]
    pub max_request_size: usize,
}

fn default_port() -> u16 {
    8080
}

fn default_workers() -> usize {
    4
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_max_request_size() -> usize {
    10 * 1024 * 1024 // 10MB
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "plain".to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FakeDataSource {
    Library,
    Builtin,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MockSettings {
    #[serde(default = "default_fake_data")]
    pub fake_data: FakeDataSource,
    /// Ceiling for per-route artificial latency; larger configured delays
    /// are clamped to this value at dispatch time.
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
    #[serde(default = "default_request_log_capacity")]
    pub request_log_capacity: usize,
}

fn default_fake_data() -> FakeDataSource {
    FakeDataSource::Library
}

fn default_max_delay_ms() -> u64 {
    60_000
}

fn default_request_log_capacity() -> usize {
    crate::mock::store::DEFAULT_LOG_CAPACITY
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            workers: default_workers(),
            host: default_host(),
            max_request_size: default_max_request_size(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for MockSettings {
    fn default() -> Self {
        Self {
            fake_data: default_fake_data(),
            max_delay_ms: default_max_delay_ms(),
            request_log_capacity: default_request_log_capacity(),
        }
    }
}
