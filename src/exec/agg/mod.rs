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
//! Row-wise list aggregation.
//!
//! Responsibilities:
//! - Defines the four collect aggregations and their policies.
//! - Turns (values, per-row segments) into a `GatherPlan` naming the surviving elements.
//! - Reduces a whole column into one list value.
//!
//! Key exported interfaces:
//! - Types: `CollectAggregation`.
//! - Functions: `collect_list_plan`, `collect_set_plan`, `merge_lists_plan`,
//!   `merge_sets_plan`, `reduce`.

mod collect;
mod dedup;
mod reduce;

use std::ops::Range;

use arrow::array::{Array, ArrayRef};
use arrow::datatypes::DataType;

pub use collect::{collect_list_plan, collect_set_plan, merge_lists_plan, merge_sets_plan};
pub(crate) use dedup::dedup_plan;
pub use reduce::reduce;

use crate::common::error::{ListAggError, Result};
use crate::exec::column::{GatherPlan, as_list_array, list_data_type};
use crate::exec::compare::{EqualityPolicy, NullPolicy, ensure_equality_supported};
use crate::exec::context::ExecContext;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CollectAggregation {
    /// Elements in input order, optionally without nulls.
    CollectList { null_policy: NullPolicy },
    /// Distinct elements under `equality`; order is unspecified but deterministic.
    CollectSet {
        null_policy: NullPolicy,
        equality: EqualityPolicy,
    },
    /// Concatenation of list-typed inputs. Null lists contribute nothing.
    MergeLists,
    /// `MergeLists` followed by set deduplication.
    MergeSets { equality: EqualityPolicy },
}

impl CollectAggregation {
    pub fn collect_list(null_policy: NullPolicy) -> Self {
        CollectAggregation::CollectList { null_policy }
    }

    pub fn collect_set(null_policy: NullPolicy, equality: EqualityPolicy) -> Self {
        CollectAggregation::CollectSet {
            null_policy,
            equality,
        }
    }

    pub fn merge_lists() -> Self {
        CollectAggregation::MergeLists
    }

    pub fn merge_sets(equality: EqualityPolicy) -> Self {
        CollectAggregation::MergeSets { equality }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CollectAggregation::CollectList { .. } => "collect_list",
            CollectAggregation::CollectSet { .. } => "collect_set",
            CollectAggregation::MergeLists => "merge_lists",
            CollectAggregation::MergeSets { .. } => "merge_sets",
        }
    }

    pub fn is_merge(&self) -> bool {
        matches!(
            self,
            CollectAggregation::MergeLists | CollectAggregation::MergeSets { .. }
        )
    }

    /// Merge variants always count every outer row.
    pub fn null_policy(&self) -> NullPolicy {
        match self {
            CollectAggregation::CollectList { null_policy }
            | CollectAggregation::CollectSet { null_policy, .. } => *null_policy,
            CollectAggregation::MergeLists | CollectAggregation::MergeSets { .. } => {
                NullPolicy::Include
            }
        }
    }

    /// Element type of the produced lists, validating that the aggregation accepts
    /// `input_type`.
    pub fn output_item_type(&self, input_type: &DataType) -> Result<DataType> {
        match self {
            CollectAggregation::CollectList { .. } => Ok(input_type.clone()),
            CollectAggregation::CollectSet { .. } => {
                ensure_equality_supported(input_type)?;
                Ok(input_type.clone())
            }
            CollectAggregation::MergeLists => match input_type {
                DataType::List(field) => Ok(field.data_type().clone()),
                other => Err(ListAggError::unsupported_type(format!(
                    "{} expects list input, got {other:?}",
                    self.name()
                ))),
            },
            CollectAggregation::MergeSets { .. } => match input_type {
                DataType::List(field) => {
                    ensure_equality_supported(field.data_type())?;
                    Ok(field.data_type().clone())
                }
                other => Err(ListAggError::unsupported_type(format!(
                    "{} expects list input, got {other:?}",
                    self.name()
                ))),
            },
        }
    }

    /// Full list type of the produced column for `input_type`.
    pub fn output_type(&self, input_type: &DataType) -> Result<DataType> {
        Ok(list_data_type(&self.output_item_type(input_type)?))
    }

    /// Plans one output list per segment of `input` rows. Returns the plan together
    /// with the column its indices point into (the input itself, or the child of a list
    /// input for the merge variants).
    pub fn plan(
        &self,
        ctx: &ExecContext,
        input: &ArrayRef,
        segments: &[Range<usize>],
    ) -> Result<(GatherPlan, ArrayRef)> {
        self.output_item_type(input.data_type())?;
        if let Some(bad) = segments.iter().find(|s| s.start > s.end || s.end > input.len()) {
            return Err(ListAggError::shape(format!(
                "segment {}..{} outside of {} input rows",
                bad.start,
                bad.end,
                input.len()
            )));
        }
        match self {
            CollectAggregation::CollectList { null_policy } => Ok((
                collect_list_plan(ctx, input.as_ref(), segments, *null_policy)?,
                ArrayRef::clone(input),
            )),
            CollectAggregation::CollectSet {
                null_policy,
                equality,
            } => Ok((
                collect_set_plan(ctx, input, segments, *null_policy, *equality)?,
                ArrayRef::clone(input),
            )),
            CollectAggregation::MergeLists => {
                let lists = as_list_array(input.as_ref(), self.name())?;
                Ok((
                    merge_lists_plan(ctx, lists, segments)?,
                    ArrayRef::clone(lists.values()),
                ))
            }
            CollectAggregation::MergeSets { equality } => {
                let lists = as_list_array(input.as_ref(), self.name())?;
                Ok((
                    merge_sets_plan(ctx, lists, segments, *equality)?,
                    ArrayRef::clone(lists.values()),
                ))
            }
        }
    }
}
