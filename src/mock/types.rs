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
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use utoipa::ToSchema;

/// A named, enable/disable-able collection of routes sharing a base path
/// prefix. Route order is insertion order and defines match priority.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MockConfig {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub base_path: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub routes: Vec<Route>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_enabled() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Route {
    pub id: String,
    pub method: String,
    pub path: String,
    pub response: ResponseSpec,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ResponseSpec {
    #[serde(default = "default_status")]
    pub status: u16,
    #[serde(default)]
    pub headers: HashMap<String, String>,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub body: Value,
    /// Artificial latency in milliseconds, applied before delivery.
    #[serde(default)]
    pub delay_ms: u64,
}

fn default_status() -> u16 {
    200
}

impl Default for ResponseSpec {
    fn default() -> Self {
        Self {
            status: default_status(),
            headers: HashMap::new(),
            body: Value::Null,
            delay_ms: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NewConfig {
    pub name: String,
    #[serde(default)]
    pub base_path: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ConfigUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub base_path: Option<String>,
    #[serde(default)]
    pub enabled: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NewRoute {
    pub method: String,
    pub path: String,
    #[serde(default)]
    pub response: ResponseSpec,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct RouteUpdate {
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub response: Option<ResponseSpec>,
}

/// One config in a bulk import payload (also the shape of seed configs in
/// the YAML configuration file).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ConfigImport {
    pub name: String,
    #[serde(default)]
    pub base_path: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub routes: Vec<NewRoute>,
}
