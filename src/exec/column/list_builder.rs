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
use std::sync::Arc;

use arrow::array::{Array, ArrayRef, ListArray, UInt32Array, new_empty_array};
use arrow::compute::take;
use arrow::datatypes::{DataType, Field, FieldRef};
use arrow_buffer::{NullBuffer, OffsetBuffer, ScalarBuffer};

use crate::common::error::{ListAggError, Result};

/// Child field of every list column this crate produces.
pub fn list_field(item_type: &DataType) -> FieldRef {
    Arc::new(Field::new("item", item_type.clone(), true))
}

pub fn list_data_type(item_type: &DataType) -> DataType {
    DataType::List(list_field(item_type))
}

pub fn as_list_array<'a>(array: &'a dyn Array, what: &str) -> Result<&'a ListArray> {
    array.as_any().downcast_ref::<ListArray>().ok_or_else(|| {
        ListAggError::unsupported_type(format!(
            "{what} expects a list column, got {:?}",
            array.data_type()
        ))
    })
}

/// Assembles a list column from raw parts.
///
/// `offsets` must start at 0, never decrease, and end at `child.len()`; `nulls`, when
/// present, must carry one bit per row. A null row may span elements; consumers ignore
/// them.
pub fn build_lists_column(
    offsets: Vec<i32>,
    child: ArrayRef,
    nulls: Option<NullBuffer>,
) -> Result<ListArray> {
    let Some(first) = offsets.first() else {
        return Err(ListAggError::shape("offsets must contain at least one entry"));
    };
    if *first != 0 {
        return Err(ListAggError::shape(format!(
            "offsets must start at 0, got {first}"
        )));
    }
    if let Some(pos) = offsets.windows(2).position(|w| w[1] < w[0]) {
        return Err(ListAggError::shape(format!(
            "offsets decrease at position {}: {} -> {}",
            pos + 1,
            offsets[pos],
            offsets[pos + 1]
        )));
    }
    let last = offsets[offsets.len() - 1];
    if usize::try_from(last).ok() != Some(child.len()) {
        return Err(ListAggError::shape(format!(
            "last offset {last} does not match child length {}",
            child.len()
        )));
    }
    let rows = offsets.len() - 1;
    if let Some(nulls) = &nulls
        && nulls.len() != rows
    {
        return Err(ListAggError::shape(format!(
            "null mask has {} bits for {rows} rows",
            nulls.len()
        )));
    }
    let field = list_field(child.data_type());
    let offsets = OffsetBuffer::new(ScalarBuffer::from(offsets));
    Ok(ListArray::try_new(field, offsets, child, nulls)?)
}

/// One list value, the result of reducing a whole column.
#[derive(Clone, Debug)]
pub struct ListScalar {
    values: ArrayRef,
    valid: bool,
}

impl ListScalar {
    pub fn new(values: ArrayRef) -> Self {
        Self {
            values,
            valid: true,
        }
    }

    pub fn empty(item_type: &DataType) -> Self {
        Self::new(new_empty_array(item_type))
    }

    pub fn null(item_type: &DataType) -> Self {
        Self {
            values: new_empty_array(item_type),
            valid: false,
        }
    }

    pub fn values(&self) -> &ArrayRef {
        &self.values
    }

    pub fn into_values(self) -> ArrayRef {
        self.values
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn item_type(&self) -> &DataType {
        self.values.data_type()
    }
}

/// Per-row index lists into a values column.
///
/// Every aggregator first decides *which* elements land in each output row and only then
/// moves data, with a single `take` over the child. This keeps strings and structs on the
/// same path as fixed-width elements.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GatherPlan {
    offsets: Vec<i32>,
    indices: Vec<u32>,
}

impl GatherPlan {
    pub fn from_segments(segments: Vec<Vec<u32>>) -> Result<Self> {
        let total: usize = segments.iter().map(Vec::len).sum();
        if i32::try_from(total).is_err() {
            return Err(ListAggError::shape(format!(
                "{total} gathered elements exceed the list offset range"
            )));
        }
        let mut offsets = Vec::with_capacity(segments.len() + 1);
        let mut indices = Vec::with_capacity(total);
        offsets.push(0i32);
        for segment in segments {
            indices.extend_from_slice(&segment);
            offsets.push(indices.len() as i32);
        }
        Ok(Self { offsets, indices })
    }

    pub fn num_rows(&self) -> usize {
        self.offsets.len().saturating_sub(1)
    }

    pub fn num_indices(&self) -> usize {
        self.indices.len()
    }

    pub fn offsets(&self) -> &[i32] {
        &self.offsets
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn row(&self, row: usize) -> &[u32] {
        let start = self.offsets[row] as usize;
        let end = self.offsets[row + 1] as usize;
        &self.indices[start..end]
    }

    pub fn gather(&self, values: &dyn Array) -> Result<ArrayRef> {
        if let Some(bad) = self.indices.iter().find(|i| **i as usize >= values.len()) {
            return Err(ListAggError::shape(format!(
                "gather index {bad} out of bounds for {} values",
                values.len()
            )));
        }
        let indices = UInt32Array::from(self.indices.clone());
        Ok(take(values, &indices, None)?)
    }

    pub fn into_lists_column(
        self,
        values: &dyn Array,
        nulls: Option<NullBuffer>,
    ) -> Result<ListArray> {
        let child = self.gather(values)?;
        build_lists_column(self.offsets, child, nulls)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{AsArray, Int32Array, StringArray};
    use arrow::datatypes::Int32Type;

    #[test]
    fn build_rejects_malformed_offsets() {
        let child: ArrayRef = Arc::new(Int32Array::from(vec![1, 2, 3]));
        for offsets in [vec![], vec![1, 3], vec![0, 2, 1, 3], vec![0, 2]] {
            let err = build_lists_column(offsets.clone(), Arc::clone(&child), None).unwrap_err();
            assert!(matches!(err, ListAggError::Shape(_)), "{offsets:?}");
        }
        let nulls = NullBuffer::from(vec![true]);
        let err = build_lists_column(vec![0, 1, 3], child, Some(nulls)).unwrap_err();
        assert!(matches!(err, ListAggError::Shape(_)));
    }

    #[test]
    fn build_keeps_null_rows_with_spans() {
        let child: ArrayRef = Arc::new(Int32Array::from(vec![1, 2, 3]));
        let nulls = NullBuffer::from(vec![true, false]);
        let list = build_lists_column(vec![0, 1, 3], child, Some(nulls)).unwrap();
        assert_eq!(list.len(), 2);
        assert!(list.is_null(1));
        assert_eq!(list.value_length(1), 2);
        let first = list.value(0);
        assert_eq!(first.as_primitive::<Int32Type>().values().to_vec(), vec![1]);
    }

    #[test]
    fn gather_plan_moves_strings() {
        let values = StringArray::from(vec![Some("a"), None, Some("c")]);
        let plan = GatherPlan::from_segments(vec![vec![2, 0], vec![], vec![1]]).unwrap();
        assert_eq!(plan.num_rows(), 3);
        assert_eq!(plan.row(0), &[2, 0]);
        let list = plan.into_lists_column(&values, None).unwrap();
        let row0 = list.value(0);
        let row0 = row0.as_string::<i32>();
        assert_eq!(row0.value(0), "c");
        assert_eq!(row0.value(1), "a");
        assert_eq!(list.value_length(1), 0);
        assert!(list.value(2).is_null(0));
    }

    #[test]
    fn gather_rejects_out_of_range_index() {
        let values = Int32Array::from(vec![1]);
        let plan = GatherPlan::from_segments(vec![vec![3]]).unwrap();
        assert!(matches!(plan.gather(&values), Err(ListAggError::Shape(_))));
    }

    #[test]
    fn scalar_constructors() {
        let null = ListScalar::null(&DataType::Utf8);
        assert!(!null.is_valid());
        assert!(null.is_empty());
        assert_eq!(null.item_type(), &DataType::Utf8);
        assert!(ListScalar::empty(&DataType::Int32).is_valid());
    }
}
