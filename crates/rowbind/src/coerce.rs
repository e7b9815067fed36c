//! Value coercion: choosing the parameter binding discipline for a field.
//!
//! Six logical types collapse onto two binding kinds. No numeric validation or date
//! parsing happens here; the server parses the bound value into the column type.
//!
//! | logical type                                        | binding   |
//! |-----------------------------------------------------|-----------|
//! | `string` `text` `date` `datetime` `decimal` `float` | text      |
//! | `boolean` `integer`                                 | integer   |

use crate::error::{BindError, BindResult};
use crate::metadata::{FieldMapping, FieldType};
use crate::value::Value;

/// Physical binding kind of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageType {
    /// Explicit SQL NULL.
    Null,
    Text,
    Integer,
}

impl StorageType {
    /// Binding kind for a logical type, or `None` when the type is unsupported.
    pub fn for_field_type(ty: &FieldType) -> Option<Self> {
        match ty {
            FieldType::String
            | FieldType::Text
            | FieldType::Date
            | FieldType::DateTime
            | FieldType::Decimal
            | FieldType::Float => Some(StorageType::Text),
            FieldType::Boolean | FieldType::Integer => Some(StorageType::Integer),
            FieldType::Other(_) => None,
        }
    }
}

/// A value paired with the binding kind it will be sent as.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundValue {
    pub storage: StorageType,
    pub value: Value,
}

impl BoundValue {
    pub fn null() -> Self {
        Self {
            storage: StorageType::Null,
            value: Value::Null,
        }
    }

    pub fn integer(value: impl Into<Value>) -> Self {
        Self {
            storage: StorageType::Integer,
            value: value.into(),
        }
    }

    pub fn text(value: impl Into<Value>) -> Self {
        Self {
            storage: StorageType::Text,
            value: value.into(),
        }
    }

    /// Wire text for this value, `None` for SQL NULL.
    pub fn to_wire_text(&self) -> Option<String> {
        match self.storage {
            StorageType::Null => None,
            StorageType::Text => self.value.to_text(),
            StorageType::Integer => self.value.to_integer_text(),
        }
    }
}

/// Pick the binding for `value` according to `mapping`.
///
/// A null value on a nullable field binds as SQL NULL before the type is looked at.
/// A null value on a non-nullable field goes through the normal type mapping and
/// therefore still reaches the server as NULL, where the column constraint decides.
pub fn coerce(value: Value, mapping: &FieldMapping) -> BindResult<BoundValue> {
    if value.is_null() && mapping.nullable {
        return Ok(BoundValue::null());
    }

    let storage = StorageType::for_field_type(&mapping.field_type)
        .ok_or_else(|| BindError::unsupported_type(mapping.field_type.as_str()))?;

    Ok(BoundValue { storage, value })
}
