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
//! Execution layer for list aggregation.
//!
//! Responsibilities:
//! - Element equality/ordering under null and NaN policies (`compare`).
//! - Nested list column assembly (`column`).
//! - Row-wise collect aggregations and whole-column reductions (`agg`).
//! - List column operations (`lists`) and rolling windows (`window`).
//!
//! Every operation takes an explicit [`context::ExecContext`]; there is no process-wide
//! execution state.

pub mod agg;
pub mod column;
pub mod compare;
pub mod context;
pub mod lists;
pub mod window;
