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
//! Explicit execution context threaded through every list/aggregation call.
//!
//! Replaces ambient process-wide defaults: the caller decides whether per-row passes may
//! run on rayon and whether caller obligations are verified.

use std::sync::Arc;

use rayon::prelude::*;

use crate::common::app_config::{ExecConfig, ListAggConfig};
use crate::common::error::{ListAggError, Result};

#[derive(Clone, Debug)]
pub struct ExecContext {
    parallel: bool,
    parallel_min_rows: usize,
    verify_preconditions: bool,
    pool: Option<Arc<rayon::ThreadPool>>,
}

impl Default for ExecContext {
    fn default() -> Self {
        Self {
            parallel: true,
            parallel_min_rows: 4096,
            verify_preconditions: false,
            pool: None,
        }
    }
}

impl ExecContext {
    /// Single-threaded context, mostly useful for tests and tiny inputs.
    pub fn sequential() -> Self {
        Self {
            parallel: false,
            ..Self::default()
        }
    }

    pub fn from_config(config: &ListAggConfig) -> Result<Self> {
        Self::from_exec_config(&config.exec)
    }

    pub fn from_exec_config(exec: &ExecConfig) -> Result<Self> {
        let pool = if exec.parallel && exec.max_threads > 0 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(exec.max_threads)
                .thread_name(|idx| format!("listagg-{idx}"))
                .build()
                .map_err(|e| {
                    ListAggError::invalid_argument(format!("build rayon pool: {e}"))
                })?;
            Some(Arc::new(pool))
        } else {
            None
        };
        Ok(Self {
            parallel: exec.parallel,
            parallel_min_rows: exec.parallel_min_rows,
            verify_preconditions: exec.verify_preconditions,
            pool,
        })
    }

    pub fn with_verify_preconditions(mut self, verify: bool) -> Self {
        self.verify_preconditions = verify;
        self
    }

    pub fn with_parallel_min_rows(mut self, rows: usize) -> Self {
        self.parallel_min_rows = rows;
        self
    }

    pub fn verify_preconditions(&self) -> bool {
        self.verify_preconditions
    }

    pub fn use_parallel(&self, rows: usize) -> bool {
        self.parallel && rows >= self.parallel_min_rows
    }

    /// Maps `f` over `0..len`, in parallel when the context allows it for `len` rows.
    /// Output order always follows the index order.
    pub fn map_rows<T, F>(&self, len: usize, f: F) -> Vec<T>
    where
        T: Send,
        F: Fn(usize) -> T + Sync + Send,
    {
        if !self.use_parallel(len) {
            return (0..len).map(f).collect();
        }
        match &self.pool {
            Some(pool) => pool.install(|| (0..len).into_par_iter().map(&f).collect()),
            None => (0..len).into_par_iter().map(f).collect(),
        }
    }

    /// Fallible variant of [`ExecContext::map_rows`]; the first error (by index order
    /// when sequential, any when parallel) aborts the whole pass.
    pub fn try_map_rows<T, F>(&self, len: usize, f: F) -> Result<Vec<T>>
    where
        T: Send,
        F: Fn(usize) -> Result<T> + Sync + Send,
    {
        if !self.use_parallel(len) {
            return (0..len).map(f).collect();
        }
        match &self.pool {
            Some(pool) => pool.install(|| (0..len).into_par_iter().map(&f).collect()),
            None => (0..len).into_par_iter().map(f).collect(),
        }
    }
}
