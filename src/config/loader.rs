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

use crate::config::types::Config;
use crate::mock::registry::validate_import;
use anyhow::Context;
use std::fs;
use std::path::Path;

pub struct ConfigLoader;

impl ConfigLoader {
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Config> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        Self::from_str(&content)
    }

    pub fn from_str(content: &str) -> anyhow::Result<Config> {
        let config: Config =
            serde_yaml::from_str(content).with_context(|| "Failed to parse YAML configuration")?;

        Self::validate(&config)?;

        Ok(config)
    }

    fn validate(config: &Config) -> anyhow::Result<()> {
        if config.server.port == 0 {
            anyhow::bail!("Server port cannot be 0");
        }

        if config.server.workers == 0 {
            anyhow::bail!("Number of workers cannot be 0");
        }

        let format = config.logging.format.as_str();
        if format != "plain" && format != "json" {
            anyhow::bail!("Log format must be 'plain' or 'json', got '{}'", format);
        }

        if config.mock.max_delay_ms == 0 {
            anyhow::bail!("Mock max delay must be greater than 0");
        }

        if config.mock.request_log_capacity == 0 {
            anyhow::bail!("Request log capacity must be greater than 0");
        }

        // Seed configs obey the same rules as a bulk import; a malformed
        // entry rejects the whole file.
        for seed in &config.seeds {
            validate_import(seed)
                .with_context(|| format!("Invalid seed config '{}'", seed.name))?;
        }

        Ok(())
    }
}
