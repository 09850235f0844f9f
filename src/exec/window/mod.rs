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
//! Rolling window resolution and rolling list aggregation.
//!
//! Responsibilities:
//! - Resolves per-row half-open input ranges for fixed, per-row, grouped and grouped
//!   time-range windows.
//! - Applies a collect aggregation to every resolved window, honoring `min_periods`.
//!
//! Key exported interfaces:
//! - Types: `WindowBounds`, `WindowExtent`, `RangeBound`, `SortOrder`, `TimeRangeFrame`.
//! - Functions: `resolve_rows`, `resolve_grouped`, `resolve_grouped_time_range`,
//!   `group_offsets`, `rolling_collect` and the topology-specific rolling entry points.
//!
//! Current limitations:
//! - Group keys and time-range order columns must arrive sorted; violations are reported
//!   only when the execution context verifies preconditions.

mod bounds;
mod grouping;
mod rolling;

pub use bounds::{
    RangeBound, SortOrder, TimeRangeFrame, WindowBounds, WindowExtent, resolve_grouped,
    resolve_grouped_time_range, resolve_rows,
};
pub use grouping::group_offsets;
pub use rolling::{
    grouped_rolling_window, grouped_time_range_rolling_window, rolling_collect,
    rolling_window, rolling_window_per_row,
};
