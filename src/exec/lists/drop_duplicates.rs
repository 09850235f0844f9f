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

use arrow::array::{Array, ListArray};

use super::row_spans;
use crate::common::error::{ListAggError, Result};
use crate::exec::agg::dedup_plan;
use crate::exec::column::GatherPlan;
use crate::exec::compare::{DuplicateKeepOption, EqualityPolicy, ensure_equality_supported};
use crate::exec::context::ExecContext;
use crate::listagg_logging::debug;

fn spans_to_plan(spans: &[Range<usize>]) -> Result<GatherPlan> {
    GatherPlan::from_segments(
        spans
            .iter()
            .map(|span| span.clone().map(|idx| idx as u32).collect())
            .collect(),
    )
}

/// Unique elements of every row of `keys`. Null rows stay null.
///
/// Element order inside a row is not preserved; survivors come out sorted with nulls
/// last.
pub fn drop_list_duplicates(
    ctx: &ExecContext,
    keys: &ListArray,
    equality: EqualityPolicy,
) -> Result<ListArray> {
    ensure_equality_supported(keys.values().data_type())?;
    let spans = row_spans(keys);
    let plan = spans_to_plan(&spans)?;
    let unique = dedup_plan(
        ctx,
        keys.values(),
        &plan,
        equality,
        DuplicateKeepOption::KeepFirst,
    )?;
    debug!(
        "drop_list_duplicates: rows={} elements={} unique={}",
        keys.len(),
        plan.num_indices(),
        unique.num_indices()
    );
    unique.into_lists_column(keys.values().as_ref(), keys.nulls().cloned())
}

/// Unique elements of every row of `keys` together with the element of `values` at the
/// same position in the row. `keep` decides which duplicate supplies the value.
///
/// Each non-null row of `keys` must have as many elements as the same row of `values`.
/// That is only checked when the context verifies preconditions.
pub fn drop_list_duplicates_with_values(
    ctx: &ExecContext,
    keys: &ListArray,
    values: &ListArray,
    keep: DuplicateKeepOption,
    equality: EqualityPolicy,
) -> Result<(ListArray, ListArray)> {
    if keys.len() != values.len() {
        return Err(ListAggError::shape(format!(
            "keys have {} rows but values have {}",
            keys.len(),
            values.len()
        )));
    }
    ensure_equality_supported(keys.values().data_type())?;
    let key_offsets = keys.value_offsets();
    let value_offsets = values.value_offsets();
    if ctx.verify_preconditions() {
        for row in 0..keys.len() {
            if keys.is_null(row) {
                continue;
            }
            let key_len = key_offsets[row + 1] - key_offsets[row];
            let value_len = value_offsets[row + 1] - value_offsets[row];
            if key_len != value_len {
                return Err(ListAggError::precondition(format!(
                    "row {row}: {key_len} keys but {value_len} values"
                )));
            }
        }
    }

    let spans = row_spans(keys);
    let plan = spans_to_plan(&spans)?;
    let unique = dedup_plan(ctx, keys.values(), &plan, equality, keep)?;

    let value_rows = ctx.try_map_rows(unique.num_rows(), |row| {
        let key_base = key_offsets[row] as i64;
        let value_base = value_offsets[row] as i64;
        let value_end = value_offsets[row + 1] as i64;
        unique
            .row(row)
            .iter()
            .map(|key_idx| {
                let idx = value_base + (*key_idx as i64 - key_base);
                if idx >= value_end {
                    return Err(ListAggError::precondition(format!(
                        "row {row}: key position {} has no matching value",
                        *key_idx as i64 - key_base
                    )));
                }
                Ok(idx as u32)
            })
            .collect::<Result<Vec<_>>>()
    })?;
    let value_plan = GatherPlan::from_segments(value_rows)?;
    debug!(
        "drop_list_duplicates_with_values: rows={} keep={:?} unique={}",
        keys.len(),
        keep,
        unique.num_indices()
    );
    let out_keys = unique.into_lists_column(keys.values().as_ref(), keys.nulls().cloned())?;
    let out_values =
        value_plan.into_lists_column(values.values().as_ref(), values.nulls().cloned())?;
    Ok((out_keys, out_values))
}
