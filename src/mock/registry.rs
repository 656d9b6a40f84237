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

use crate::mock::matcher::{self, PathParams};
use crate::mock::types::{
    ConfigImport, ConfigUpdate, MockConfig, NewConfig, NewRoute, Route, RouteUpdate,
};
use arc_swap::ArcSwap;
use chrono::Utc;
use std::sync::{Arc, Mutex};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("mock config not found: {0}")]
    ConfigNotFound(String),
    #[error("route not found: {0}")]
    RouteNotFound(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

pub type RegistryResult<T> = Result<T, RegistryError>;

/// The route selected for an incoming request, carried by value so the
/// caller keeps a consistent view even if the registry changes afterwards.
#[derive(Debug, Clone)]
pub struct ResolvedRoute {
    pub config: Arc<MockConfig>,
    pub route: Route,
    pub params: PathParams,
}

/// Owns every mock server configuration. Readers load an immutable
/// snapshot through `arc-swap`; writers serialize behind a mutex, build a
/// new snapshot and publish it atomically. A `resolve` in flight therefore
/// never observes a half-updated config.
pub struct MockRouteRegistry {
    configs: ArcSwap<Vec<Arc<MockConfig>>>,
    write_lock: Mutex<()>,
}

impl MockRouteRegistry {
    pub fn new() -> Self {
        Self {
            configs: ArcSwap::from_pointee(Vec::new()),
            write_lock: Mutex::new(()),
        }
    }

    pub fn create_config(&self, new: NewConfig) -> RegistryResult<MockConfig> {
        if new.name.trim().is_empty() {
            return Err(RegistryError::InvalidInput(
                "config name cannot be empty".to_string(),
            ));
        }

        let now = Utc::now();
        let config = MockConfig {
            id: uuid::Uuid::new_v4().to_string(),
            name: new.name,
            base_path: new.base_path,
            enabled: new.enabled,
            routes: Vec::new(),
            created_at: now,
            updated_at: now,
        };

        self.mutate(|configs| {
            configs.push(Arc::new(config.clone()));
            Ok(())
        })?;

        Ok(config)
    }

    pub fn list_configs(&self) -> Vec<Arc<MockConfig>> {
        self.configs.load().as_ref().clone()
    }

    pub fn get_config(&self, id: &str) -> RegistryResult<Arc<MockConfig>> {
        self.configs
            .load()
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(|| RegistryError::ConfigNotFound(id.to_string()))
    }

    pub fn update_config(&self, id: &str, update: ConfigUpdate) -> RegistryResult<MockConfig> {
        self.mutate_config(id, |config| {
            if let Some(name) = update.name.clone() {
                if name.trim().is_empty() {
                    return Err(RegistryError::InvalidInput(
                        "config name cannot be empty".to_string(),
                    ));
                }
                config.name = name;
            }
            if let Some(base_path) = update.base_path.clone() {
                config.base_path = base_path;
            }
            if let Some(enabled) = update.enabled {
                config.enabled = enabled;
            }
            Ok(())
        })
    }

    pub fn delete_config(&self, id: &str) -> RegistryResult<()> {
        self.mutate(|configs| {
            let before = configs.len();
            configs.retain(|c| c.id != id);
            if configs.len() == before {
                return Err(RegistryError::ConfigNotFound(id.to_string()));
            }
            Ok(())
        })
    }

    pub fn add_route(&self, config_id: &str, new: NewRoute) -> RegistryResult<Route> {
        validate_route(&new)?;

        let now = Utc::now();
        let route = Route {
            id: uuid::Uuid::new_v4().to_string(),
            method: new.method,
            path: new.path,
            response: new.response,
            created_at: now,
            updated_at: now,
        };

        let added = route.clone();
        self.mutate_config(config_id, move |config| {
            config.routes.push(route.clone());
            Ok(())
        })?;

        Ok(added)
    }

    pub fn update_route(
        &self,
        config_id: &str,
        route_id: &str,
        update: RouteUpdate,
    ) -> RegistryResult<Route> {
        let mut updated: Option<Route> = None;
        self.mutate_config(config_id, |config| {
            let route = config
                .routes
                .iter_mut()
                .find(|r| r.id == route_id)
                .ok_or_else(|| RegistryError::RouteNotFound(route_id.to_string()))?;

            if let Some(method) = update.method.clone() {
                if method.trim().is_empty() {
                    return Err(RegistryError::InvalidInput(
                        "route method cannot be empty".to_string(),
                    ));
                }
                route.method = method;
            }
            if let Some(path) = update.path.clone() {
                if path.trim().is_empty() {
                    return Err(RegistryError::InvalidInput(
                        "route path cannot be empty".to_string(),
                    ));
                }
                route.path = path;
            }
            if let Some(response) = update.response.clone() {
                validate_response_status(response.status)?;
                route.response = response;
            }
            route.updated_at = Utc::now();
            updated = Some(route.clone());
            Ok(())
        })?;

        updated.ok_or_else(|| RegistryError::RouteNotFound(route_id.to_string()))
    }

    pub fn delete_route(&self, config_id: &str, route_id: &str) -> RegistryResult<()> {
        self.mutate_config(config_id, |config| {
            let before = config.routes.len();
            config.routes.retain(|r| r.id != route_id);
            if config.routes.len() == before {
                return Err(RegistryError::RouteNotFound(route_id.to_string()));
            }
            Ok(())
        })?;
        Ok(())
    }

    /// Bulk import. The whole payload is validated before any mutation, so
    /// a malformed entry aborts the import without partial state.
    pub fn import(&self, imports: Vec<ConfigImport>) -> RegistryResult<Vec<MockConfig>> {
        for import in &imports {
            validate_import(import)?;
        }

        let now = Utc::now();
        let configs: Vec<MockConfig> = imports
            .into_iter()
            .map(|import| MockConfig {
                id: uuid::Uuid::new_v4().to_string(),
                name: import.name,
                base_path: import.base_path,
                enabled: import.enabled,
                routes: import
                    .routes
                    .into_iter()
                    .map(|route| Route {
                        id: uuid::Uuid::new_v4().to_string(),
                        method: route.method,
                        path: route.path,
                        response: route.response,
                        created_at: now,
                        updated_at: now,
                    })
                    .collect(),
                created_at: now,
                updated_at: now,
            })
            .collect();

        let imported = configs.clone();
        self.mutate(move |existing| {
            existing.extend(configs.iter().cloned().map(Arc::new));
            Ok(())
        })?;

        Ok(imported)
    }

    /// Selects the first route matching method and path: configs in
    /// registry insertion order (disabled ones skipped), routes in config
    /// insertion order. This total ordering is the only tie-break rule.
    pub fn resolve(&self, method: &str, path: &str) -> Option<ResolvedRoute> {
        let snapshot = self.configs.load();

        for config in snapshot.iter() {
            if !config.enabled {
                continue;
            }
            for route in &config.routes {
                if !route.method.eq_ignore_ascii_case(method) {
                    continue;
                }
                if let Some(params) = matcher::match_path(&route.path, path, &config.base_path) {
                    return Some(ResolvedRoute {
                        config: config.clone(),
                        route: route.clone(),
                        params,
                    });
                }
            }
        }

        None
    }

    pub fn config_count(&self) -> usize {
        self.configs.load().len()
    }

    pub fn route_count(&self) -> usize {
        self.configs.load().iter().map(|c| c.routes.len()).sum()
    }

    fn mutate<F>(&self, apply: F) -> RegistryResult<()>
    where
        F: FnOnce(&mut Vec<Arc<MockConfig>>) -> RegistryResult<()>,
    {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut configs = self.configs.load().as_ref().clone();
        apply(&mut configs)?;
        self.configs.store(Arc::new(configs));
        Ok(())
    }

    /// Rewrites one config in place. Unaffected routes keep their order;
    /// the owning config's `updated_at` is always refreshed.
    fn mutate_config<F>(&self, id: &str, apply: F) -> RegistryResult<MockConfig>
    where
        F: FnOnce(&mut MockConfig) -> RegistryResult<()>,
    {
        let mut result: Option<MockConfig> = None;
        self.mutate(|configs| {
            let slot = configs
                .iter_mut()
                .find(|c| c.id == id)
                .ok_or_else(|| RegistryError::ConfigNotFound(id.to_string()))?;

            let mut config = slot.as_ref().clone();
            apply(&mut config)?;
            config.updated_at = Utc::now();
            result = Some(config.clone());
            *slot = Arc::new(config);
            Ok(())
        })?;

        result.ok_or_else(|| RegistryError::ConfigNotFound(id.to_string()))
    }
}

impl Default for MockRouteRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_route(route: &NewRoute) -> RegistryResult<()> {
    if route.method.trim().is_empty() {
        return Err(RegistryError::InvalidInput(
            "route method cannot be empty".to_string(),
        ));
    }
    if route.path.trim().is_empty() {
        return Err(RegistryError::InvalidInput(
            "route path cannot be empty".to_string(),
        ));
    }
    validate_response_status(route.response.status)
}

fn validate_response_status(status: u16) -> RegistryResult<()> {
    if !(100..600).contains(&status) {
        return Err(RegistryError::InvalidInput(format!(
            "invalid HTTP status code: {}",
            status
        )));
    }
    Ok(())
}

/// Validation shared by the bulk-import endpoint and the config-file
/// seed loader.
pub fn validate_import(import: &ConfigImport) -> RegistryResult<()> {
    if import.name.trim().is_empty() {
        return Err(RegistryError::InvalidInput(
            "imported config name cannot be empty".to_string(),
        ));
    }
    for route in &import.routes {
        validate_route(route)?;
    }
    Ok(())
}
