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
use arrow::array::ArrayRef;

use crate::common::error::Result;
use crate::exec::column::GatherPlan;
use crate::exec::compare::{DuplicateKeepOption, ElementComparator, EqualityPolicy};
use crate::exec::context::ExecContext;

/// Deduplicates one segment of indices into the comparator's column.
///
/// Indices are stably sorted by element order (nulls last), adjacent equal elements form
/// a run, and `keep` picks which member of each run survives. Survivors come out in sorted
/// order.
pub(crate) fn dedup_segment(
    cmp: &ElementComparator,
    segment: &[u32],
    keep: DuplicateKeepOption,
) -> Vec<u32> {
    if segment.len() < 2 {
        return segment.to_vec();
    }
    let mut sorted = segment.to_vec();
    sorted.sort_by(|a, b| cmp.compare(*a as usize, *b as usize));

    let mut out = Vec::with_capacity(sorted.len());
    let mut run_start = 0usize;
    for pos in 1..=sorted.len() {
        let run_ends = pos == sorted.len()
            || !cmp.equal(sorted[run_start] as usize, sorted[pos] as usize);
        if !run_ends {
            continue;
        }
        let run = &sorted[run_start..pos];
        match keep {
            DuplicateKeepOption::KeepFirst => out.push(run[0]),
            DuplicateKeepOption::KeepLast => out.push(run[run.len() - 1]),
            DuplicateKeepOption::KeepNone => {
                if run.len() == 1 {
                    out.push(run[0]);
                }
            }
        }
        run_start = pos;
    }
    out
}

/// Applies [`dedup_segment`] to every row of `plan`, whose indices point into `values`.
pub(crate) fn dedup_plan(
    ctx: &ExecContext,
    values: &ArrayRef,
    plan: &GatherPlan,
    equality: EqualityPolicy,
    keep: DuplicateKeepOption,
) -> Result<GatherPlan> {
    let cmp = ElementComparator::try_new(values, equality)?;
    let segments = ctx.map_rows(plan.num_rows(), |row| dedup_segment(&cmp, plan.row(row), keep));
    GatherPlan::from_segments(segments)
}
