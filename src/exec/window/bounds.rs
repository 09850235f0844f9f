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

use arrow::array::{Array, ArrayRef, AsArray, Int32Array};
use arrow::datatypes::{
    ArrowPrimitiveType, DataType, Date32Type, Date64Type, Int8Type, Int16Type, Int32Type,
    Int64Type, TimeUnit, TimestampMicrosecondType, TimestampMillisecondType,
    TimestampNanosecondType, TimestampSecondType, UInt8Type, UInt16Type, UInt32Type, UInt64Type,
};

use super::group_offsets;
use crate::common::error::{ListAggError, Result};
use crate::exec::context::ExecContext;
use crate::listagg_logging::debug;

/// One half-open range of input rows per output row.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WindowBounds {
    ranges: Vec<Range<usize>>,
}

impl WindowBounds {
    pub fn new(ranges: Vec<Range<usize>>) -> Self {
        Self { ranges }
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn get(&self, row: usize) -> Option<Range<usize>> {
        self.ranges.get(row).cloned()
    }

    pub fn as_slice(&self) -> &[Range<usize>] {
        &self.ranges
    }

    pub fn iter(&self) -> impl Iterator<Item = &Range<usize>> {
        self.ranges.iter()
    }

    pub fn into_inner(self) -> Vec<Range<usize>> {
        self.ranges
    }
}

/// Row-count window sizes. `preceding` counts the current row, so `preceding = 2` means
/// the current row and one row before it. Sizes may be zero or negative.
#[derive(Clone, Debug)]
pub enum WindowExtent {
    Fixed { preceding: i32, following: i32 },
    PerRow {
        preceding: Int32Array,
        following: Int32Array,
    },
}

impl WindowExtent {
    pub fn fixed(preceding: i32, following: i32) -> Self {
        WindowExtent::Fixed {
            preceding,
            following,
        }
    }

    pub fn per_row(preceding: Int32Array, following: Int32Array) -> Self {
        WindowExtent::PerRow {
            preceding,
            following,
        }
    }

    fn validate(&self, rows: usize) -> Result<()> {
        let WindowExtent::PerRow {
            preceding,
            following,
        } = self
        else {
            return Ok(());
        };
        for (name, sizes) in [("preceding", preceding), ("following", following)] {
            if sizes.len() != rows {
                return Err(ListAggError::shape(format!(
                    "{name} has {} entries for {rows} rows",
                    sizes.len()
                )));
            }
            if sizes.null_count() > 0 {
                return Err(ListAggError::invalid_argument(format!(
                    "{name} window sizes must not contain nulls"
                )));
            }
        }
        Ok(())
    }

    fn sizes(&self, row: usize) -> (i64, i64) {
        match self {
            WindowExtent::Fixed {
                preceding,
                following,
            } => (*preceding as i64, *following as i64),
            WindowExtent::PerRow {
                preceding,
                following,
            } => (preceding.value(row) as i64, following.value(row) as i64),
        }
    }
}

/// Window of `row` inside `[lo, hi)`; empty (anchored at the clamped start) when the
/// sizes cross.
fn row_window(row: usize, preceding: i64, following: i64, lo: usize, hi: usize) -> Range<usize> {
    let i = row as i64;
    let (lo, hi) = (lo as i64, hi as i64);
    let start = i.saturating_sub(preceding).saturating_add(1).clamp(lo, hi);
    let end = i.saturating_add(following).saturating_add(1).clamp(lo, hi);
    if end <= start {
        start as usize..start as usize
    } else {
        start as usize..end as usize
    }
}

/// Fixed or per-row windows over `rows` rows without grouping.
pub fn resolve_rows(ctx: &ExecContext, extent: &WindowExtent, rows: usize) -> Result<WindowBounds> {
    extent.validate(rows)?;
    let ranges = ctx.map_rows(rows, |row| {
        let (preceding, following) = extent.sizes(row);
        row_window(row, preceding, following, 0, rows)
    });
    Ok(WindowBounds::new(ranges))
}

/// Like [`resolve_rows`], with every window clipped to the group of its row.
pub fn resolve_grouped(
    ctx: &ExecContext,
    group_keys: &[ArrayRef],
    extent: &WindowExtent,
    rows: usize,
) -> Result<WindowBounds> {
    extent.validate(rows)?;
    let offsets = group_offsets(ctx, group_keys, rows)?;
    let mut ranges = Vec::with_capacity(rows);
    for group in offsets.windows(2) {
        let (lo, hi) = (group[0], group[1]);
        ranges.extend((lo..hi).map(|row| {
            let (preceding, following) = extent.sizes(row);
            row_window(row, preceding, following, lo, hi)
        }));
    }
    debug!(
        "resolve_grouped: rows={} groups={}",
        rows,
        offsets.len() - 1
    );
    Ok(WindowBounds::new(ranges))
}

/// Distance limit of one side of a time-range window, in the order column's own unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RangeBound {
    Bounded(i64),
    Unbounded,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

/// Value-range window over an order column.
///
/// For ascending order a row at time `t` sees every row of its group with time in
/// `[t - preceding, t + following]`; for descending order preceding rows carry larger
/// times, so the range is `[t - following, t + preceding]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeRangeFrame {
    pub order: SortOrder,
    pub preceding: RangeBound,
    pub following: RangeBound,
}

impl TimeRangeFrame {
    pub fn new(order: SortOrder, preceding: RangeBound, following: RangeBound) -> Self {
        Self {
            order,
            preceding,
            following,
        }
    }

    /// Inclusive value range seen from time `t`; `None` stands for an open end.
    fn value_range(&self, t: i64) -> (Option<i64>, Option<i64>) {
        let (below, above) = match self.order {
            SortOrder::Ascending => (self.preceding, self.following),
            SortOrder::Descending => (self.following, self.preceding),
        };
        let low = match below {
            RangeBound::Bounded(d) => Some(t.saturating_sub(d)),
            RangeBound::Unbounded => None,
        };
        let high = match above {
            RangeBound::Bounded(d) => Some(t.saturating_add(d)),
            RangeBound::Unbounded => None,
        };
        (low, high)
    }
}

fn widen<T>(array: &dyn Array) -> Vec<Option<i64>>
where
    T: ArrowPrimitiveType,
    T::Native: Into<i64>,
{
    array
        .as_primitive::<T>()
        .iter()
        .map(|v| v.map(Into::into))
        .collect()
}

/// Order column values as `i64` in the column's own unit.
fn order_values(order_by: &dyn Array) -> Result<Vec<Option<i64>>> {
    let values = match order_by.data_type() {
        DataType::Int8 => widen::<Int8Type>(order_by),
        DataType::Int16 => widen::<Int16Type>(order_by),
        DataType::Int32 => widen::<Int32Type>(order_by),
        DataType::Int64 => widen::<Int64Type>(order_by),
        DataType::UInt8 => widen::<UInt8Type>(order_by),
        DataType::UInt16 => widen::<UInt16Type>(order_by),
        DataType::UInt32 => widen::<UInt32Type>(order_by),
        DataType::UInt64 => order_by
            .as_primitive::<UInt64Type>()
            .iter()
            .map(|v| {
                v.map(|v| {
                    i64::try_from(v).map_err(|_| {
                        ListAggError::invalid_argument(format!(
                            "order value {v} does not fit in i64"
                        ))
                    })
                })
                .transpose()
            })
            .collect::<Result<Vec<_>>>()?,
        DataType::Date32 => widen::<Date32Type>(order_by),
        DataType::Date64 => widen::<Date64Type>(order_by),
        DataType::Timestamp(TimeUnit::Second, _) => widen::<TimestampSecondType>(order_by),
        DataType::Timestamp(TimeUnit::Millisecond, _) => {
            widen::<TimestampMillisecondType>(order_by)
        }
        DataType::Timestamp(TimeUnit::Microsecond, _) => {
            widen::<TimestampMicrosecondType>(order_by)
        }
        DataType::Timestamp(TimeUnit::Nanosecond, _) => {
            widen::<TimestampNanosecondType>(order_by)
        }
        other => {
            return Err(ListAggError::unsupported_type(format!(
                "time-range windows need an integer, date or timestamp order column, got {other:?}"
            )));
        }
    };
    Ok(values)
}

/// Resolves value-range windows for one group `[lo, hi)` of `times`.
fn resolve_time_group(
    times: &[Option<i64>],
    lo: usize,
    hi: usize,
    frame: &TimeRangeFrame,
    verify: bool,
    out: &mut Vec<Range<usize>>,
) -> Result<()> {
    let leading = times[lo..hi].iter().take_while(|t| t.is_none()).count();
    let trailing = if leading == hi - lo {
        0
    } else {
        times[lo..hi].iter().rev().take_while(|t| t.is_none()).count()
    };
    let (nlo, nhi) = (lo + leading, hi - trailing);
    let valid = &times[nlo..nhi];

    if verify {
        let mut prev: Option<i64> = None;
        for (pos, t) in valid.iter().enumerate() {
            let Some(t) = *t else {
                return Err(ListAggError::precondition(format!(
                    "null order value at row {} is not at the start or end of its group",
                    nlo + pos
                )));
            };
            if let Some(p) = prev {
                let ordered = match frame.order {
                    SortOrder::Ascending => p <= t,
                    SortOrder::Descending => p >= t,
                };
                if !ordered {
                    return Err(ListAggError::precondition(format!(
                        "order column is not {:?} at row {}",
                        frame.order,
                        nlo + pos
                    )));
                }
            }
            prev = Some(t);
        }
    }

    out.extend((lo..nlo).map(|_| lo..nlo));
    for (pos, t) in valid.iter().enumerate() {
        let Some(t) = *t else {
            // Misplaced null; only reachable without verification.
            let row = nlo + pos;
            out.push(row..row + 1);
            continue;
        };
        let (low, high) = frame.value_range(t);
        let (start, end) = match frame.order {
            SortOrder::Ascending => (
                low.map_or(0, |low| valid.partition_point(|v| v.is_some_and(|v| v < low))),
                high.map_or(valid.len(), |high| {
                    valid.partition_point(|v| v.is_some_and(|v| v <= high))
                }),
            ),
            SortOrder::Descending => (
                high.map_or(0, |high| {
                    valid.partition_point(|v| v.is_some_and(|v| v > high))
                }),
                low.map_or(valid.len(), |low| {
                    valid.partition_point(|v| v.is_some_and(|v| v >= low))
                }),
            ),
        };
        let end = end.max(start);
        out.push(nlo + start..nlo + end);
    }
    out.extend((nhi..hi).map(|_| nhi..hi));
    Ok(())
}

/// Value-range windows within each group. `order_by` must be sorted per group in
/// `frame.order`, with nulls clustered at the start or end of each group. A null-ordered
/// row sees exactly the null rows of its group; other rows never see null rows.
pub fn resolve_grouped_time_range(
    ctx: &ExecContext,
    group_keys: &[ArrayRef],
    order_by: &ArrayRef,
    frame: &TimeRangeFrame,
) -> Result<WindowBounds> {
    let rows = order_by.len();
    let times = order_values(order_by.as_ref())?;
    let offsets = group_offsets(ctx, group_keys, rows)?;
    let mut ranges = Vec::with_capacity(rows);
    for group in offsets.windows(2) {
        resolve_time_group(
            &times,
            group[0],
            group[1],
            frame,
            ctx.verify_preconditions(),
            &mut ranges,
        )?;
    }
    debug!(
        "resolve_grouped_time_range: rows={} groups={} order={:?}",
        rows,
        offsets.len() - 1,
        frame.order
    );
    Ok(WindowBounds::new(ranges))
}
