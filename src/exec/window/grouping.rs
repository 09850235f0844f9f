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
use std::collections::HashSet;

use arrow::array::{Array, ArrayRef};
use arrow::row::{RowConverter, SortField};

use crate::common::error::{ListAggError, Result};
use crate::exec::context::ExecContext;
use crate::listagg_logging::trace;

/// Boundaries of the runs of equal group keys over `num_rows` rows.
///
/// Returns `groups + 1` offsets starting at 0 and ending at `num_rows`. Rows are compared
/// on every key column at once; null keys group together. Without key columns the whole
/// input is one group.
///
/// Keys must already be clustered (every key value forms a single run). With precondition
/// verification enabled a key value reappearing after its run fails with `Precondition`.
pub fn group_offsets(
    ctx: &ExecContext,
    group_keys: &[ArrayRef],
    num_rows: usize,
) -> Result<Vec<usize>> {
    for (idx, key) in group_keys.iter().enumerate() {
        if key.len() != num_rows {
            return Err(ListAggError::shape(format!(
                "group key {idx} has {} rows, expected {num_rows}",
                key.len()
            )));
        }
    }
    if num_rows == 0 {
        return Ok(vec![0]);
    }
    if group_keys.is_empty() {
        return Ok(vec![0, num_rows]);
    }

    let fields = group_keys
        .iter()
        .map(|key| SortField::new(key.data_type().clone()))
        .collect();
    let converter = RowConverter::new(fields)?;
    let rows = converter.convert_columns(group_keys)?;

    let mut offsets = vec![0usize];
    for i in 1..num_rows {
        if rows.row(i - 1) != rows.row(i) {
            offsets.push(i);
        }
    }
    offsets.push(num_rows);

    if ctx.verify_preconditions() {
        let mut seen = HashSet::with_capacity(offsets.len());
        for start in &offsets[..offsets.len() - 1] {
            if !seen.insert(rows.row(*start).owned()) {
                return Err(ListAggError::precondition(format!(
                    "group keys are not clustered: key at row {start} already formed an earlier group"
                )));
            }
        }
    }
    trace!(
        "group_offsets: rows={} groups={}",
        num_rows,
        offsets.len() - 1
    );
    Ok(offsets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{Int32Array, StringArray};
    use std::sync::Arc;

    #[test]
    fn splits_on_any_key_change() {
        let ctx = ExecContext::sequential();
        let a: ArrayRef = Arc::new(Int32Array::from(vec![1, 1, 1, 2, 2]));
        let b: ArrayRef = Arc::new(StringArray::from(vec!["x", "x", "y", "y", "y"]));
        assert_eq!(group_offsets(&ctx, &[a, b], 5).unwrap(), vec![0, 2, 3, 5]);
    }

    #[test]
    fn null_keys_group_together() {
        let ctx = ExecContext::sequential();
        let a: ArrayRef = Arc::new(Int32Array::from(vec![None, None, Some(1)]));
        assert_eq!(group_offsets(&ctx, &[a], 3).unwrap(), vec![0, 2, 3]);
    }

    #[test]
    fn no_keys_means_single_group() {
        let ctx = ExecContext::sequential();
        assert_eq!(group_offsets(&ctx, &[], 4).unwrap(), vec![0, 4]);
        assert_eq!(group_offsets(&ctx, &[], 0).unwrap(), vec![0]);
    }

    #[test]
    fn unclustered_keys_rejected_only_when_verified() {
        let a: ArrayRef = Arc::new(Int32Array::from(vec![1, 2, 1]));
        let keys = [a];
        assert_eq!(
            group_offsets(&ExecContext::sequential(), &keys, 3).unwrap(),
            vec![0, 1, 2, 3]
        );
        let strict = ExecContext::sequential().with_verify_preconditions(true);
        assert!(matches!(
            group_offsets(&strict, &keys, 3),
            Err(ListAggError::Precondition(_))
        ));
    }

    #[test]
    fn key_length_mismatch_is_a_shape_error() {
        let a: ArrayRef = Arc::new(Int32Array::from(vec![1, 2]));
        assert!(matches!(
            group_offsets(&ExecContext::sequential(), &[a], 3),
            Err(ListAggError::Shape(_))
        ));
    }
}
