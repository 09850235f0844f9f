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
//! Equality and ordering policies for list element comparison.
//!
//! Responsibilities:
//! - Names the null/NaN equality flags, null inclusion policy, and duplicate retention option.
//! - Classifies element representations into a closed set of kinds with their capabilities.
//! - Provides the element comparator used by sort-based deduplication.
//!
//! Key exported interfaces:
//! - Types: `EqualityPolicy`, `NullEquality`, `NanEquality`, `NullPolicy`,
//!   `DuplicateKeepOption`, `ElementKind`, `ElementComparator`.
//! - Functions: `ensure_equality_supported`.

mod comparator;
mod element_kind;

pub use comparator::ElementComparator;
pub use element_kind::{ElementKind, ensure_equality_supported};

/// Whether two null elements compare equal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum NullEquality {
    #[default]
    Equal,
    Unequal,
}

/// Whether two NaN elements compare equal. Only meaningful for floating point elements
/// (directly or as struct fields).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum NanEquality {
    AllEqual,
    #[default]
    Unequal,
}

/// Whether null elements participate in a collect aggregation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum NullPolicy {
    #[default]
    Include,
    Exclude,
}

/// Which occurrence(s) of a run of equal keys survive deduplication.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DuplicateKeepOption {
    #[default]
    KeepFirst,
    KeepLast,
    KeepNone,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct EqualityPolicy {
    pub nulls: NullEquality,
    pub nans: NanEquality,
}

impl EqualityPolicy {
    pub fn new(nulls: NullEquality, nans: NanEquality) -> Self {
        Self { nulls, nans }
    }

    pub fn nulls_equal(&self) -> bool {
        self.nulls == NullEquality::Equal
    }

    pub fn nans_equal(&self) -> bool {
        self.nans == NanEquality::AllEqual
    }
}
