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
//! Error taxonomy shared by every list/aggregation operation.
//!
//! All failures are synchronous contract violations reported before any output is
//! returned. There is no retry path: the caller fixes the call and tries again.

use arrow::error::ArrowError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ListAggError {
    /// Malformed offsets, mismatched column lengths, or per-row window sizes whose
    /// length differs from the input column.
    #[error("shape error: {0}")]
    Shape(String),

    /// A nested type was used where element equality/ordering is required, or an
    /// aggregation was applied to an element type it cannot handle.
    #[error("unsupported type: {0}")]
    UnsupportedType(String),

    /// A caller obligation (sorted group keys, monotonic order column, matching per-row
    /// key/value counts) was violated. Only reported when precondition verification is
    /// enabled on the execution context.
    #[error("precondition violated: {0}")]
    Precondition(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("arrow error: {0}")]
    Arrow(#[from] ArrowError),
}

impl ListAggError {
    pub fn shape(msg: impl Into<String>) -> Self {
        ListAggError::Shape(msg.into())
    }

    pub fn unsupported_type(msg: impl Into<String>) -> Self {
        ListAggError::UnsupportedType(msg.into())
    }

    pub fn precondition(msg: impl Into<String>) -> Self {
        ListAggError::Precondition(msg.into())
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        ListAggError::InvalidArgument(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, ListAggError>;
