// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const CONFIG_ENV: &str = "LISTAGG_CONFIG";

fn default_log_level() -> String {
    "info".to_string()
}

/// Loads the config named by `$LISTAGG_CONFIG`, or `./listagg.toml` when present,
/// otherwise returns the built-in defaults.
pub fn from_env_or_default() -> Result<ListAggConfig> {
    match config_path_from_env() {
        Some(path) => ListAggConfig::load_from_file(&path),
        None => Ok(ListAggConfig::default()),
    }
}

fn config_path_from_env() -> Option<PathBuf> {
    if let Ok(p) = std::env::var(CONFIG_ENV) {
        if !p.trim().is_empty() {
            return Some(PathBuf::from(p.trim()));
        }
    }

    let candidates = [PathBuf::from("listagg.toml")];
    candidates.into_iter().find(|p| p.exists())
}

#[derive(Clone, Debug, Deserialize)]
pub struct ListAggConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Optional full tracing EnvFilter expression.
    /// If set, this takes precedence over `log_level`.
    /// Example: "novarocks_listagg=debug"
    #[serde(default)]
    pub log_filter: Option<String>,

    #[serde(default)]
    pub exec: ExecConfig,
}

impl ListAggConfig {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read config file: {}", path.display()))?;
        Self::from_toml_str(&s).with_context(|| format!("parse toml: {}", path.display()))
    }

    pub fn from_env_or_default() -> Result<Self> {
        from_env_or_default()
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        let cfg: ListAggConfig = toml::from_str(s)?;
        Ok(cfg)
    }

    pub fn effective_log_filter(&self) -> &str {
        self.log_filter
            .as_deref()
            .filter(|f| !f.trim().is_empty())
            .unwrap_or(&self.log_level)
    }
}

impl Default for ListAggConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_filter: None,
            exec: ExecConfig::default(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct ExecConfig {
    /// Run per-row passes on the rayon pool.
    #[serde(default = "default_parallel")]
    pub parallel: bool,
    /// Inputs with fewer rows than this run sequentially even when `parallel` is set.
    #[serde(default = "default_parallel_min_rows")]
    pub parallel_min_rows: usize,
    /// 0 uses the global rayon pool.
    #[serde(default)]
    pub max_threads: usize,
    /// Check caller obligations (sorted groups, monotonic order column, matching
    /// key/value counts) and report violations as errors.
    #[serde(default)]
    pub verify_preconditions: bool,
}

fn default_parallel() -> bool {
    true
}

fn default_parallel_min_rows() -> usize {
    4096
}

impl Default for ExecConfig {
    fn default() -> Self {
        Self {
            parallel: default_parallel(),
            parallel_min_rows: default_parallel_min_rows(),
            max_threads: 0,
            verify_preconditions: false,
        }
    }
}
