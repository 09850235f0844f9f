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
use arrow::array::{Array, ArrayRef, ListArray};
use arrow::compute::concat;
use arrow_buffer::NullBuffer;

use crate::common::error::{ListAggError, Result};
use crate::exec::column::{GatherPlan, as_list_array};
use crate::exec::context::ExecContext;
use crate::listagg_logging::debug;

/// How a null list taking part in a concatenation affects the output row.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConcatenateNullPolicy {
    /// Null lists are skipped. For `concatenate_rows` the output row is null only when
    /// every input row is null.
    #[default]
    Ignore,
    /// Any null list makes the output row null.
    NullifyOutputRow,
}

fn assemble(
    rows: Vec<(Vec<u32>, bool)>,
    source: &dyn Array,
) -> Result<ListArray> {
    let mut segments = Vec::with_capacity(rows.len());
    let mut validity = Vec::with_capacity(rows.len());
    for (segment, valid) in rows {
        segments.push(segment);
        validity.push(valid);
    }
    let nulls = validity
        .iter()
        .any(|v| !*v)
        .then(|| NullBuffer::from(validity));
    GatherPlan::from_segments(segments)?.into_lists_column(source, nulls)
}

/// Row-wise concatenation of list columns of one type and length.
///
/// `[{0, 1}, {2}]` and `[{8}, {9, 10}]` give `[{0, 1, 8}, {2, 9, 10}]`.
pub fn concatenate_rows(
    ctx: &ExecContext,
    inputs: &[ListArray],
    null_policy: ConcatenateNullPolicy,
) -> Result<ListArray> {
    let Some(first) = inputs.first() else {
        return Err(ListAggError::shape("concatenate_rows needs at least one column"));
    };
    for (idx, input) in inputs.iter().enumerate().skip(1) {
        if input.data_type() != first.data_type() {
            return Err(ListAggError::unsupported_type(format!(
                "column {idx} has type {:?}, expected {:?}",
                input.data_type(),
                first.data_type()
            )));
        }
        if input.len() != first.len() {
            return Err(ListAggError::shape(format!(
                "column {idx} has {} rows, expected {}",
                input.len(),
                first.len()
            )));
        }
    }

    let children: Vec<&dyn Array> = inputs.iter().map(|l| l.values().as_ref()).collect();
    let source: ArrayRef = concat(&children)?;
    let mut bases = Vec::with_capacity(inputs.len());
    let mut base = 0usize;
    for input in inputs {
        bases.push(base);
        base += input.values().len();
    }

    let rows = ctx.map_rows(first.len(), |row| {
        let null_count = inputs.iter().filter(|l| l.is_null(row)).count();
        let valid = match null_policy {
            ConcatenateNullPolicy::Ignore => null_count < inputs.len(),
            ConcatenateNullPolicy::NullifyOutputRow => null_count == 0,
        };
        let mut segment = Vec::new();
        if valid {
            for (input, base) in inputs.iter().zip(&bases) {
                if input.is_null(row) {
                    continue;
                }
                let offsets = input.value_offsets();
                let start = base + offsets[row] as usize;
                let end = base + offsets[row + 1] as usize;
                segment.extend((start..end).map(|idx| idx as u32));
            }
        }
        (segment, valid)
    });
    debug!(
        "concatenate_rows: columns={} rows={} policy={:?}",
        inputs.len(),
        first.len(),
        null_policy
    );
    assemble(rows, source.as_ref())
}

/// Flattens each row of a list-of-lists column into one list.
///
/// `[[{1, 2}, {3}], [{6}, {}, {7, 8}]]` gives `[{1, 2, 3}, {6, 7, 8}]`. A null outer row
/// stays null.
pub fn concatenate_list_elements(
    ctx: &ExecContext,
    input: &ListArray,
    null_policy: ConcatenateNullPolicy,
) -> Result<ListArray> {
    let inner = as_list_array(input.values().as_ref(), "concatenate_list_elements")?;
    let outer_offsets = input.value_offsets();
    let inner_offsets = inner.value_offsets();
    let rows = ctx.map_rows(input.len(), |row| {
        if input.is_null(row) {
            return (Vec::new(), false);
        }
        let mut segment = Vec::new();
        for list in outer_offsets[row] as usize..outer_offsets[row + 1] as usize {
            if inner.is_null(list) {
                match null_policy {
                    ConcatenateNullPolicy::Ignore => continue,
                    ConcatenateNullPolicy::NullifyOutputRow => return (Vec::new(), false),
                }
            }
            let start = inner_offsets[list] as u32;
            let end = inner_offsets[list + 1] as u32;
            segment.extend(start..end);
        }
        (segment, true)
    });
    assemble(rows, inner.values().as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::AsArray;
    use arrow::datatypes::{Field, Int32Type, Int64Type};
    use arrow_buffer::{OffsetBuffer, ScalarBuffer};
    use std::sync::Arc;

    fn ints(rows: Vec<Option<Vec<i32>>>) -> ListArray {
        ListArray::from_iter_primitive::<Int32Type, _, _>(
            rows.into_iter()
                .map(|r| r.map(|v| v.into_iter().map(Some).collect::<Vec<_>>())),
        )
    }

    fn row(list: &ListArray, idx: usize) -> Vec<i32> {
        list.value(idx)
            .as_primitive::<Int32Type>()
            .iter()
            .flatten()
            .collect()
    }

    #[test]
    fn concatenates_rows_in_argument_order() {
        let ctx = ExecContext::sequential();
        let s1 = ints(vec![
            Some(vec![0, 1]),
            Some(vec![2, 3, 4]),
            Some(vec![5]),
            Some(vec![]),
            Some(vec![6, 7]),
        ]);
        let s2 = ints(vec![
            Some(vec![8]),
            Some(vec![9]),
            Some(vec![]),
            Some(vec![10, 11, 12]),
            Some(vec![13, 14, 15, 16]),
        ]);
        let out = concatenate_rows(&ctx, &[s1, s2], ConcatenateNullPolicy::Ignore).unwrap();
        assert_eq!(out.null_count(), 0);
        assert_eq!(row(&out, 0), vec![0, 1, 8]);
        assert_eq!(row(&out, 1), vec![2, 3, 4, 9]);
        assert_eq!(row(&out, 2), vec![5]);
        assert_eq!(row(&out, 3), vec![10, 11, 12]);
        assert_eq!(row(&out, 4), vec![6, 7, 13, 14, 15, 16]);
    }

    #[test]
    fn null_policy_controls_output_validity() {
        let ctx = ExecContext::sequential();
        let s1 = ints(vec![Some(vec![1]), None, None]);
        let s2 = ints(vec![None, Some(vec![2]), None]);
        let ignore =
            concatenate_rows(&ctx, &[s1.clone(), s2.clone()], ConcatenateNullPolicy::Ignore)
                .unwrap();
        assert_eq!(row(&ignore, 0), vec![1]);
        assert_eq!(row(&ignore, 1), vec![2]);
        assert!(ignore.is_null(2));

        let nullify =
            concatenate_rows(&ctx, &[s1, s2], ConcatenateNullPolicy::NullifyOutputRow).unwrap();
        assert_eq!(nullify.null_count(), 3);
    }

    #[test]
    fn mismatched_inputs_are_rejected() {
        let ctx = ExecContext::sequential();
        let a = ints(vec![Some(vec![1])]);
        let b = ints(vec![Some(vec![1]), Some(vec![2])]);
        assert!(matches!(
            concatenate_rows(&ctx, &[a.clone(), b], ConcatenateNullPolicy::Ignore),
            Err(ListAggError::Shape(_))
        ));
        let c = ListArray::from_iter_primitive::<Int64Type, _, _>(vec![Some(vec![Some(1i64)])]);
        assert!(matches!(
            concatenate_rows(&ctx, &[a, c], ConcatenateNullPolicy::Ignore),
            Err(ListAggError::UnsupportedType(_))
        ));
        assert!(matches!(
            concatenate_rows(&ctx, &[], ConcatenateNullPolicy::Ignore),
            Err(ListAggError::Shape(_))
        ));
    }

    fn nested() -> ListArray {
        // [[{1, 2}, {3, 4}, {5}], [{6}, null, {7, 8, 9}]]
        let inner = ints(vec![
            Some(vec![1, 2]),
            Some(vec![3, 4]),
            Some(vec![5]),
            Some(vec![6]),
            None,
            Some(vec![7, 8, 9]),
        ]);
        ListArray::new(
            Arc::new(Field::new("item", inner.data_type().clone(), true)),
            OffsetBuffer::new(ScalarBuffer::from(vec![0, 3, 6])),
            Arc::new(inner),
            None,
        )
    }

    #[test]
    fn flattens_list_elements() {
        let ctx = ExecContext::sequential();
        let out = concatenate_list_elements(&ctx, &nested(), ConcatenateNullPolicy::Ignore)
            .unwrap();
        assert_eq!(row(&out, 0), vec![1, 2, 3, 4, 5]);
        assert_eq!(row(&out, 1), vec![6, 7, 8, 9]);

        let out = concatenate_list_elements(
            &ctx,
            &nested(),
            ConcatenateNullPolicy::NullifyOutputRow,
        )
        .unwrap();
        assert!(out.is_valid(0));
        assert!(out.is_null(1));
    }

    #[test]
    fn flat_lists_cannot_be_flattened() {
        let ctx = ExecContext::sequential();
        let err = concatenate_list_elements(
            &ctx,
            &ints(vec![Some(vec![1])]),
            ConcatenateNullPolicy::Ignore,
        )
        .unwrap_err();
        assert!(matches!(err, ListAggError::UnsupportedType(_)));
    }
}
