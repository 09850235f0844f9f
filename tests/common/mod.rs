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
//! Array builders and order-insensitive comparison helpers for integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use arrow::array::{Array, ArrayRef, Int32Array, ListArray, StringArray, StructArray};
use arrow::datatypes::{DataType, Field, Fields, Int32Type};
use arrow::util::display::array_value_to_string;
use arrow_buffer::{NullBuffer, OffsetBuffer, ScalarBuffer};

use novarocks_listagg::{ExecContext, ListScalar};

pub fn ctx() -> ExecContext {
    ExecContext::sequential()
}

/// Context that goes parallel for any input size.
pub fn parallel_ctx() -> ExecContext {
    ExecContext::default().with_parallel_min_rows(1)
}

pub fn ints(values: Vec<Option<i32>>) -> ArrayRef {
    Arc::new(Int32Array::from(values))
}

pub fn strs(values: Vec<Option<&str>>) -> ArrayRef {
    Arc::new(StringArray::from(values))
}

pub fn int_lists(rows: Vec<Option<Vec<Option<i32>>>>) -> ListArray {
    ListArray::from_iter_primitive::<Int32Type, _, _>(rows)
}

/// List column over an arbitrary child, `None` rows become null with an empty span.
pub fn lists_of(child: ArrayRef, lengths: &[Option<usize>]) -> ListArray {
    let mut offsets = vec![0i32];
    let mut validity = Vec::with_capacity(lengths.len());
    for len in lengths {
        let last = offsets[offsets.len() - 1];
        offsets.push(last + len.unwrap_or(0) as i32);
        validity.push(len.is_some());
    }
    ListArray::new(
        Arc::new(Field::new("item", child.data_type().clone(), true)),
        OffsetBuffer::new(ScalarBuffer::from(offsets)),
        child,
        Some(NullBuffer::from(validity)),
    )
}

/// Struct column `{a: Int32, b: Utf8}`.
pub fn int_str_structs(a: Vec<Option<i32>>, b: Vec<Option<&str>>) -> ArrayRef {
    let fields = Fields::from(vec![
        Field::new("a", DataType::Int32, true),
        Field::new("b", DataType::Utf8, true),
    ]);
    Arc::new(StructArray::new(fields, vec![ints(a), strs(b)], None))
}

pub fn render(array: &dyn Array, idx: usize) -> String {
    if array.is_null(idx) {
        return "NULL".to_string();
    }
    array_value_to_string(array, idx).unwrap_or_else(|e| format!("<{e}>"))
}

pub fn rendered(array: &dyn Array) -> Vec<String> {
    (0..array.len()).map(|i| render(array, i)).collect()
}

pub fn sorted(mut values: Vec<String>) -> Vec<String> {
    values.sort();
    values
}

pub fn owned(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

/// Elements of one list row, `None` when the row is null.
pub fn row_values(list: &ListArray, row: usize) -> Option<Vec<String>> {
    list.is_valid(row).then(|| rendered(list.value(row).as_ref()))
}

pub fn sorted_row(list: &ListArray, row: usize) -> Option<Vec<String>> {
    row_values(list, row).map(sorted)
}

pub fn scalar_values(scalar: &ListScalar) -> Vec<String> {
    rendered(scalar.values().as_ref())
}
