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
use std::cmp::Ordering;
use std::sync::Arc;

use arrow::array::{Array, ArrayRef, AsArray, StructArray};
use arrow::compute::{SortOptions, cast};
use arrow::datatypes::{DataType, Fields, Float16Type, Float32Type, Float64Type};
use arrow::row::{RowConverter, Rows, SortField};

use super::{EqualityPolicy, ensure_equality_supported};
use crate::common::error::Result;

/// Total order and policy-aware equality over the rows of one element column.
///
/// Rows are encoded once with the Arrow row format so that ordering a segment costs
/// a byte comparison per pair. Nulls order after every non-null value. Elements that
/// can never equal anything under the policy (nulls with `NullEquality::Unequal`,
/// NaNs with `NanEquality::Unequal`, and structs containing either) are flagged
/// singular and only ever equal themselves by index.
pub struct ElementComparator {
    rows: Rows,
    singular: Option<Vec<bool>>,
}

impl ElementComparator {
    pub fn try_new(values: &ArrayRef, policy: EqualityPolicy) -> Result<Self> {
        ensure_equality_supported(values.data_type())?;
        let key = normalize_float_keys(values, policy.nans_equal())?;
        let converter = RowConverter::new(vec![SortField::new_with_options(
            key.data_type().clone(),
            SortOptions {
                descending: false,
                nulls_first: false,
            },
        )])?;
        let rows = converter.convert_columns(&[key])?;
        let singular = singular_flags(values.as_ref(), policy);
        Ok(Self { rows, singular })
    }

    pub fn len(&self) -> usize {
        self.rows.num_rows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_singular(&self, row: usize) -> bool {
        self.singular.as_ref().is_some_and(|flags| flags[row])
    }

    pub fn compare(&self, left: usize, right: usize) -> Ordering {
        self.rows.row(left).cmp(&self.rows.row(right))
    }

    pub fn equal(&self, left: usize, right: usize) -> bool {
        if left == right {
            return true;
        }
        if self.is_singular(left) || self.is_singular(right) {
            return false;
        }
        self.rows.row(left) == self.rows.row(right)
    }
}

/// Rewrites floating point leaves so that the row encoding treats `-0.0` and `0.0` as
/// one value and, when NaNs compare equal, collapses every NaN payload to one bit
/// pattern. Half floats are widened to `f32` first. Only the comparison key is
/// rewritten; gathered output keeps the input bits.
fn normalize_float_keys(array: &ArrayRef, nans_equal: bool) -> Result<ArrayRef> {
    let out: ArrayRef = match array.data_type() {
        DataType::Float16 => {
            let widened = cast(array.as_ref(), &DataType::Float32)?;
            return normalize_float_keys(&widened, nans_equal);
        }
        DataType::Float32 => {
            let arr = array.as_primitive::<Float32Type>();
            Arc::new(arr.unary::<_, Float32Type>(|v| {
                if v.is_nan() {
                    if nans_equal { f32::NAN } else { v }
                } else if v == 0.0 {
                    0.0
                } else {
                    v
                }
            }))
        }
        DataType::Float64 => {
            let arr = array.as_primitive::<Float64Type>();
            Arc::new(arr.unary::<_, Float64Type>(|v| {
                if v.is_nan() {
                    if nans_equal { f64::NAN } else { v }
                } else if v == 0.0 {
                    0.0
                } else {
                    v
                }
            }))
        }
        DataType::Struct(fields) => {
            let arr = array.as_struct();
            let children = arr
                .columns()
                .iter()
                .map(|child| normalize_float_keys(child, nans_equal))
                .collect::<Result<Vec<_>>>()?;
            let fields: Fields = fields
                .iter()
                .zip(&children)
                .map(|(field, child)| {
                    field.as_ref().clone().with_data_type(child.data_type().clone())
                })
                .collect();
            Arc::new(StructArray::try_new(fields, children, arr.nulls().cloned())?)
        }
        _ => Arc::clone(array),
    };
    Ok(out)
}

fn singular_flags(values: &dyn Array, policy: EqualityPolicy) -> Option<Vec<bool>> {
    let check_nulls = !policy.nulls_equal();
    let check_nans = !policy.nans_equal() && has_float_leaf(values.data_type());
    if !check_nulls && !check_nans {
        return None;
    }
    if check_nulls && !check_nans && values.null_count() == 0 && !has_struct_child(values) {
        return None;
    }
    let flags: Vec<bool> = (0..values.len())
        .map(|row| {
            (check_nulls && contains_null(values, row)) || (check_nans && contains_nan(values, row))
        })
        .collect();
    flags.iter().any(|f| *f).then_some(flags)
}

fn has_struct_child(values: &dyn Array) -> bool {
    matches!(values.data_type(), DataType::Struct(_))
}

fn has_float_leaf(data_type: &DataType) -> bool {
    match data_type {
        DataType::Float16 | DataType::Float32 | DataType::Float64 => true,
        DataType::Struct(fields) => fields.iter().any(|f| has_float_leaf(f.data_type())),
        _ => false,
    }
}

fn contains_null(array: &dyn Array, row: usize) -> bool {
    if array.is_null(row) {
        return true;
    }
    match array.data_type() {
        DataType::Struct(_) => array
            .as_struct()
            .columns()
            .iter()
            .any(|child| contains_null(child.as_ref(), row)),
        _ => false,
    }
}

fn contains_nan(array: &dyn Array, row: usize) -> bool {
    if array.is_null(row) {
        return false;
    }
    match array.data_type() {
        DataType::Float16 => array.as_primitive::<Float16Type>().value(row).is_nan(),
        DataType::Float32 => array.as_primitive::<Float32Type>().value(row).is_nan(),
        DataType::Float64 => array.as_primitive::<Float64Type>().value(row).is_nan(),
        DataType::Struct(_) => array
            .as_struct()
            .columns()
            .iter()
            .any(|child| contains_nan(child.as_ref(), row)),
        _ => false,
    }
}
