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
//! List collection, set deduplication and rolling-window list aggregation over Arrow
//! columns.

pub mod common;
pub mod exec;

pub use common::app_config as listagg_config;
pub use common::logging as listagg_logging;

pub use common::error::{ListAggError, Result};
pub use exec::agg::{CollectAggregation, reduce};
pub use exec::column::{GatherPlan, ListScalar, build_lists_column};
pub use exec::compare::{
    DuplicateKeepOption, ElementKind, EqualityPolicy, NanEquality, NullEquality, NullPolicy,
};
pub use exec::context::ExecContext;
pub use exec::lists::{
    ConcatenateNullPolicy, concatenate_list_elements, concatenate_rows, drop_list_duplicates,
    drop_list_duplicates_with_values,
};
pub use exec::window::{
    RangeBound, SortOrder, TimeRangeFrame, WindowBounds, WindowExtent,
    grouped_rolling_window, grouped_time_range_rolling_window, rolling_collect,
    rolling_window, rolling_window_per_row,
};
