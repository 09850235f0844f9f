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
use std::ops::Range;

use arrow::array::{Array, ArrayRef, ListArray};

use super::dedup_plan;
use crate::common::error::Result;
use crate::exec::column::GatherPlan;
use crate::exec::compare::{
    DuplicateKeepOption, EqualityPolicy, NullPolicy, ensure_equality_supported,
};
use crate::exec::context::ExecContext;
use crate::listagg_logging::trace;

/// Elements of each segment in input order, without nulls under `NullPolicy::Exclude`.
pub fn collect_list_plan(
    ctx: &ExecContext,
    values: &dyn Array,
    segments: &[Range<usize>],
    null_policy: NullPolicy,
) -> Result<GatherPlan> {
    let exclude_nulls = null_policy == NullPolicy::Exclude && values.null_count() > 0;
    let rows = ctx.map_rows(segments.len(), |row| {
        let segment = segments[row].clone();
        if exclude_nulls {
            segment
                .filter(|idx| values.is_valid(*idx))
                .map(|idx| idx as u32)
                .collect::<Vec<_>>()
        } else {
            segment.map(|idx| idx as u32).collect()
        }
    });
    trace!(
        "collect_list planned: segments={} exclude_nulls={}",
        segments.len(),
        exclude_nulls
    );
    GatherPlan::from_segments(rows)
}

/// Distinct elements of each segment. At most one null survives when nulls compare equal.
pub fn collect_set_plan(
    ctx: &ExecContext,
    values: &ArrayRef,
    segments: &[Range<usize>],
    null_policy: NullPolicy,
    equality: EqualityPolicy,
) -> Result<GatherPlan> {
    ensure_equality_supported(values.data_type())?;
    let plan = collect_list_plan(ctx, values.as_ref(), segments, null_policy)?;
    dedup_plan(ctx, values, &plan, equality, DuplicateKeepOption::KeepFirst)
}

/// Concatenation of the lists in each segment of outer rows. Indices point into
/// `lists.values()`. Null outer rows contribute nothing; null elements inside a valid
/// list are kept.
pub fn merge_lists_plan(
    ctx: &ExecContext,
    lists: &ListArray,
    segments: &[Range<usize>],
) -> Result<GatherPlan> {
    let offsets = lists.value_offsets();
    let rows = ctx.map_rows(segments.len(), |row| {
        let mut out = Vec::new();
        for outer in segments[row].clone() {
            if lists.is_null(outer) {
                continue;
            }
            let start = offsets[outer] as u32;
            let end = offsets[outer + 1] as u32;
            out.extend(start..end);
        }
        out
    });
    GatherPlan::from_segments(rows)
}

pub fn merge_sets_plan(
    ctx: &ExecContext,
    lists: &ListArray,
    segments: &[Range<usize>],
    equality: EqualityPolicy,
) -> Result<GatherPlan> {
    ensure_equality_supported(lists.values().data_type())?;
    let plan = merge_lists_plan(ctx, lists, segments)?;
    dedup_plan(
        ctx,
        lists.values(),
        &plan,
        equality,
        DuplicateKeepOption::KeepFirst,
    )
}
