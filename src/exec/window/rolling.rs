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

use arrow::array::{Array, ArrayRef, Int32Array, ListArray};
use arrow_buffer::NullBuffer;

use super::bounds::{
    TimeRangeFrame, WindowBounds, WindowExtent, resolve_grouped, resolve_grouped_time_range,
    resolve_rows,
};
use crate::common::error::{ListAggError, Result};
use crate::exec::agg::CollectAggregation;
use crate::exec::compare::NullPolicy;
use crate::exec::context::ExecContext;
use crate::listagg_logging::debug;

/// Number of observations each window contributes toward `min_periods`.
fn observation_counts(
    input: &dyn Array,
    bounds: &WindowBounds,
    null_policy: NullPolicy,
) -> Vec<usize> {
    if null_policy == NullPolicy::Include || input.null_count() == 0 {
        return bounds.iter().map(|r| r.len()).collect();
    }
    let mut prefix = Vec::with_capacity(input.len() + 1);
    prefix.push(0usize);
    let mut valid = 0usize;
    for row in 0..input.len() {
        if input.is_valid(row) {
            valid += 1;
        }
        prefix.push(valid);
    }
    bounds
        .iter()
        .map(|r| prefix[r.end] - prefix[r.start])
        .collect()
}

/// Applies `agg` to every window of `bounds` over `input`.
///
/// Output row `i` is null with an empty list when its window holds fewer than
/// `min_periods` observations. Observations are the window width, or the non-null
/// elements in it under `NullPolicy::Exclude`. Otherwise the row is valid, even if its
/// list ends up empty.
pub fn rolling_collect(
    ctx: &ExecContext,
    input: &ArrayRef,
    bounds: &WindowBounds,
    agg: &CollectAggregation,
    min_periods: usize,
) -> Result<ListArray> {
    if bounds.len() != input.len() {
        return Err(ListAggError::shape(format!(
            "{} window bounds for {} input rows",
            bounds.len(),
            input.len()
        )));
    }
    let output_type = agg.output_type(input.data_type())?;
    if let Some(bad) = bounds.iter().find(|r| r.start > r.end || r.end > input.len()) {
        return Err(ListAggError::shape(format!(
            "window {}..{} outside of {} input rows",
            bad.start,
            bad.end,
            input.len()
        )));
    }

    let observations = observation_counts(input.as_ref(), bounds, agg.null_policy());
    let validity: Vec<bool> = observations.iter().map(|n| *n >= min_periods).collect();
    let segments: Vec<Range<usize>> = bounds
        .iter()
        .zip(&validity)
        .map(|(r, valid)| if *valid { r.clone() } else { r.start..r.start })
        .collect();

    let (plan, source) = agg.plan(ctx, input, &segments)?;
    let null_rows = validity.iter().filter(|v| !**v).count();
    let nulls = (null_rows > 0).then(|| NullBuffer::from(validity));
    debug!(
        "rolling {}: rows={} min_periods={} null_rows={} elements={}",
        agg.name(),
        input.len(),
        min_periods,
        null_rows,
        plan.num_indices()
    );
    let out = plan.into_lists_column(source.as_ref(), nulls)?;
    debug_assert_eq!(out.data_type(), &output_type);
    Ok(out)
}

/// Fixed-size rolling window over the whole column.
pub fn rolling_window(
    ctx: &ExecContext,
    input: &ArrayRef,
    preceding: i32,
    following: i32,
    min_periods: usize,
    agg: &CollectAggregation,
) -> Result<ListArray> {
    let bounds = resolve_rows(ctx, &WindowExtent::fixed(preceding, following), input.len())?;
    rolling_collect(ctx, input, &bounds, agg, min_periods)
}

/// Rolling window whose sizes are given per row.
pub fn rolling_window_per_row(
    ctx: &ExecContext,
    input: &ArrayRef,
    preceding: &Int32Array,
    following: &Int32Array,
    min_periods: usize,
    agg: &CollectAggregation,
) -> Result<ListArray> {
    let extent = WindowExtent::per_row(preceding.clone(), following.clone());
    let bounds = resolve_rows(ctx, &extent, input.len())?;
    rolling_collect(ctx, input, &bounds, agg, min_periods)
}

/// Row-count rolling window that never crosses a group boundary.
pub fn grouped_rolling_window(
    ctx: &ExecContext,
    group_keys: &[ArrayRef],
    input: &ArrayRef,
    extent: &WindowExtent,
    min_periods: usize,
    agg: &CollectAggregation,
) -> Result<ListArray> {
    let bounds = resolve_grouped(ctx, group_keys, extent, input.len())?;
    rolling_collect(ctx, input, &bounds, agg, min_periods)
}

/// Value-range rolling window over a per-group sorted order column.
pub fn grouped_time_range_rolling_window(
    ctx: &ExecContext,
    group_keys: &[ArrayRef],
    order_by: &ArrayRef,
    frame: &TimeRangeFrame,
    input: &ArrayRef,
    min_periods: usize,
    agg: &CollectAggregation,
) -> Result<ListArray> {
    if order_by.len() != input.len() {
        return Err(ListAggError::shape(format!(
            "order column has {} rows, input has {}",
            order_by.len(),
            input.len()
        )));
    }
    let bounds = resolve_grouped_time_range(ctx, group_keys, order_by, frame)?;
    rolling_collect(ctx, input, &bounds, agg, min_periods)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::column::{list_data_type, list_field};
    use crate::exec::compare::EqualityPolicy;
    use arrow::array::AsArray;
    use arrow::datatypes::{DataType, Int32Type};
    use arrow_buffer::{OffsetBuffer, ScalarBuffer};
    use std::sync::Arc;

    fn rows(list: &ListArray) -> Vec<Option<Vec<Option<i32>>>> {
        (0..list.len())
            .map(|i| {
                list.is_valid(i)
                    .then(|| list.value(i).as_primitive::<Int32Type>().iter().collect())
            })
            .collect()
    }

    #[test]
    fn min_periods_nulls_short_windows() {
        let ctx = ExecContext::sequential();
        let input: ArrayRef = Arc::new(Int32Array::from(vec![0, 1, 2, 3, 4, 5]));
        let out = rolling_window(
            &ctx,
            &input,
            2,
            1,
            3,
            &CollectAggregation::collect_list(NullPolicy::Include),
        )
        .unwrap();
        let expected = vec![
            None,
            Some(vec![Some(0), Some(1), Some(2)]),
            Some(vec![Some(1), Some(2), Some(3)]),
            Some(vec![Some(2), Some(3), Some(4)]),
            Some(vec![Some(3), Some(4), Some(5)]),
            None,
        ];
        assert_eq!(rows(&out), expected);
        assert_eq!(out.value_length(0), 0);
        assert_eq!(out.value_length(5), 0);
    }

    #[test]
    fn exclude_counts_only_valid_observations() {
        let ctx = ExecContext::sequential();
        let input: ArrayRef = Arc::new(Int32Array::from(vec![Some(1), None, None, Some(4)]));
        let out = rolling_window(
            &ctx,
            &input,
            2,
            0,
            1,
            &CollectAggregation::collect_list(NullPolicy::Exclude),
        )
        .unwrap();
        assert_eq!(
            rows(&out),
            vec![Some(vec![Some(1)]), Some(vec![Some(1)]), None, Some(vec![Some(4)])]
        );

        let include = rolling_window(
            &ctx,
            &input,
            2,
            0,
            1,
            &CollectAggregation::collect_list(NullPolicy::Include),
        )
        .unwrap();
        assert_eq!(include.null_count(), 0);
        assert_eq!(rows(&include)[2], Some(vec![None, None]));
    }

    #[test]
    fn bounds_length_must_match_input() {
        let ctx = ExecContext::sequential();
        let input: ArrayRef = Arc::new(Int32Array::from(vec![1, 2]));
        let bounds = WindowBounds::new(vec![0..1]);
        let err = rolling_collect(
            &ctx,
            &input,
            &bounds,
            &CollectAggregation::collect_list(NullPolicy::Include),
            0,
        )
        .unwrap_err();
        assert!(matches!(err, ListAggError::Shape(_)));
    }

    #[test]
    fn collect_set_over_lists_is_unsupported() {
        let ctx = ExecContext::sequential();
        let input: ArrayRef = Arc::new(ListArray::from_iter_primitive::<Int32Type, _, _>(vec![
            Some(vec![Some(1)]),
        ]));
        let err = rolling_window(
            &ctx,
            &input,
            1,
            0,
            0,
            &CollectAggregation::collect_set(NullPolicy::Include, EqualityPolicy::default()),
        )
        .unwrap_err();
        assert!(matches!(err, ListAggError::UnsupportedType(_)));
    }

    #[test]
    fn merge_over_flat_input_is_unsupported() {
        let ctx = ExecContext::sequential();
        let input: ArrayRef = Arc::new(Int32Array::from(vec![1]));
        let err = rolling_window(&ctx, &input, 1, 0, 0, &CollectAggregation::merge_lists())
            .unwrap_err();
        assert!(matches!(err, ListAggError::UnsupportedType(_)));
    }

    #[test]
    fn output_column_type_matches_aggregation() {
        let ctx = ExecContext::sequential();
        let inner: ArrayRef = Arc::new(Int32Array::from(vec![1, 2, 3]));
        let input: ArrayRef = Arc::new(
            ListArray::try_new(
                list_field(&DataType::Int32),
                OffsetBuffer::new(ScalarBuffer::from(vec![0, 1, 3])),
                inner,
                None,
            )
            .unwrap(),
        );
        let agg = CollectAggregation::merge_lists();
        let out = rolling_window(&ctx, &input, 2, 0, 0, &agg).unwrap();
        assert_eq!(out.data_type(), &list_data_type(&DataType::Int32));
        assert_eq!(
            agg.output_type(input.data_type()).unwrap(),
            list_data_type(&DataType::Int32)
        );
        assert_eq!(rows(&out)[1], Some(vec![Some(1), Some(2), Some(3)]));

        let collect = CollectAggregation::collect_list(NullPolicy::Include);
        assert_eq!(
            collect.output_type(input.data_type()).unwrap(),
            list_data_type(input.data_type())
        );
    }
}
