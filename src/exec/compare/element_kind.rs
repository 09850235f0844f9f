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
use arrow::datatypes::DataType;

use crate::common::error::{ListAggError, Result};

/// Closed classification of element representations.
///
/// Every kind can be gathered and concatenated through the Arrow selection kernels;
/// only some kinds can be compared.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ElementKind {
    Boolean,
    FixedWidth,
    String,
    Binary,
    Struct,
    List,
    Other,
}

impl ElementKind {
    pub fn of(data_type: &DataType) -> Self {
        match data_type {
            DataType::Boolean => ElementKind::Boolean,
            DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float16
            | DataType::Float32
            | DataType::Float64
            | DataType::Date32
            | DataType::Date64
            | DataType::Time32(_)
            | DataType::Time64(_)
            | DataType::Timestamp(_, _)
            | DataType::Duration(_)
            | DataType::Interval(_)
            | DataType::Decimal128(_, _)
            | DataType::Decimal256(_, _)
            | DataType::FixedSizeBinary(_) => ElementKind::FixedWidth,
            DataType::Utf8 | DataType::LargeUtf8 | DataType::Utf8View => ElementKind::String,
            DataType::Binary | DataType::LargeBinary | DataType::BinaryView => {
                ElementKind::Binary
            }
            DataType::Struct(_) => ElementKind::Struct,
            DataType::List(_)
            | DataType::LargeList(_)
            | DataType::FixedSizeList(_, _)
            | DataType::ListView(_)
            | DataType::LargeListView(_) => ElementKind::List,
            _ => ElementKind::Other,
        }
    }

    /// Whether elements of this kind have a total order and an equality. A struct
    /// qualifies only when each of its fields does as well.
    pub fn supports_equality(&self) -> bool {
        matches!(
            self,
            ElementKind::Boolean
                | ElementKind::FixedWidth
                | ElementKind::String
                | ElementKind::Binary
                | ElementKind::Struct
        )
    }

    pub fn is_nested(&self) -> bool {
        matches!(self, ElementKind::Struct | ElementKind::List)
    }
}

/// Fails with `UnsupportedType` unless elements of `data_type` can be compared for
/// equality and ordering.
pub fn ensure_equality_supported(data_type: &DataType) -> Result<()> {
    let kind = ElementKind::of(data_type);
    if !kind.supports_equality() {
        let what = if kind.is_nested() {
            "nested list elements"
        } else {
            "elements"
        };
        return Err(ListAggError::unsupported_type(format!(
            "{what} of type {data_type:?} cannot be compared for equality"
        )));
    }
    if let DataType::Struct(fields) = data_type {
        for field in fields.iter() {
            ensure_equality_supported(field.data_type()).map_err(|_| {
                ListAggError::unsupported_type(format!(
                    "struct field '{}' of type {:?} cannot be compared for equality",
                    field.name(),
                    field.data_type()
                ))
            })?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::datatypes::{Field, Fields};
    use std::sync::Arc;

    #[test]
    fn classifies_common_types() {
        assert_eq!(ElementKind::of(&DataType::Int32), ElementKind::FixedWidth);
        assert_eq!(ElementKind::of(&DataType::Utf8), ElementKind::String);
        assert_eq!(ElementKind::of(&DataType::Boolean), ElementKind::Boolean);
        let list = DataType::List(Arc::new(Field::new("item", DataType::Int32, true)));
        assert_eq!(ElementKind::of(&list), ElementKind::List);
        assert_eq!(ElementKind::of(&DataType::Null), ElementKind::Other);
    }

    #[test]
    fn equality_capability_per_kind() {
        assert!(ElementKind::FixedWidth.supports_equality());
        assert!(ElementKind::String.supports_equality());
        assert!(ElementKind::Struct.supports_equality());
        assert!(!ElementKind::List.supports_equality());
        assert!(!ElementKind::Other.supports_equality());
        assert!(ElementKind::List.is_nested() && !ElementKind::Binary.is_nested());
        let err = ensure_equality_supported(&DataType::Null).unwrap_err();
        assert!(err.to_string().contains("cannot be compared"));
    }

    #[test]
    fn struct_of_scalars_is_comparable() {
        let st = DataType::Struct(Fields::from(vec![
            Field::new("a", DataType::Int32, true),
            Field::new("b", DataType::Utf8, true),
        ]));
        assert!(ensure_equality_supported(&st).is_ok());
    }

    #[test]
    fn lists_and_structs_of_lists_are_rejected() {
        let list = DataType::List(Arc::new(Field::new("item", DataType::Int32, true)));
        assert!(matches!(
            ensure_equality_supported(&list),
            Err(ListAggError::UnsupportedType(_))
        ));
        let st = DataType::Struct(Fields::from(vec![Field::new("l", list, true)]));
        assert!(matches!(
            ensure_equality_supported(&st),
            Err(ListAggError::UnsupportedType(_))
        ));
    }
}
