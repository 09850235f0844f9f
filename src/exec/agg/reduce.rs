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
use arrow::array::{Array, ArrayRef};

use super::CollectAggregation;
use crate::common::error::Result;
use crate::exec::column::ListScalar;
use crate::exec::context::ExecContext;
use crate::listagg_logging::debug;

/// Reduces the whole `column` into one list value.
///
/// A column without any valid row (empty or all null) yields an empty, invalid scalar of
/// the output element type rather than an error.
pub fn reduce(
    ctx: &ExecContext,
    column: &ArrayRef,
    agg: &CollectAggregation,
) -> Result<ListScalar> {
    let item_type = agg.output_item_type(column.data_type())?;
    if column.null_count() == column.len() {
        debug!(
            "{} reduction over {} rows without valid input",
            agg.name(),
            column.len()
        );
        return Ok(ListScalar::null(&item_type));
    }
    let (plan, source) = agg.plan(ctx, column, &[0..column.len()])?;
    let values = plan.gather(source.as_ref())?;
    debug!(
        "{} reduction: input_rows={} output_len={}",
        agg.name(),
        column.len(),
        values.len()
    );
    Ok(ListScalar::new(values))
}
