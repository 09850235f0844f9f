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
//! Operations over whole list columns.
//!
//! Responsibilities:
//! - Per-row duplicate removal for list columns, optionally carrying an associated
//!   values column along with the surviving keys.
//! - Row-wise concatenation of several list columns and flattening of list-of-list rows.

mod concatenate;
mod drop_duplicates;

pub use concatenate::{ConcatenateNullPolicy, concatenate_list_elements, concatenate_rows};
pub use drop_duplicates::{drop_list_duplicates, drop_list_duplicates_with_values};

use std::ops::Range;

use arrow::array::{Array, ListArray};

/// Child-element spans of each row; null rows get an empty span.
pub(crate) fn row_spans(list: &ListArray) -> Vec<Range<usize>> {
    let offsets = list.value_offsets();
    (0..list.len())
        .map(|row| {
            if list.is_null(row) {
                let start = offsets[row] as usize;
                start..start
            } else {
                offsets[row] as usize..offsets[row + 1] as usize
            }
        })
        .collect()
}
