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
//! Nested column construction.
//!
//! Responsibilities:
//! - Validates offsets/child/null-mask triples and wraps them into `ListArray` columns.
//! - Carries the segmented index plan shared by every aggregator.
//! - Models single list values produced by whole-column reductions.

mod list_builder;

pub use list_builder::{
    GatherPlan, ListScalar, as_list_array, build_lists_column, list_data_type, list_field,
};
