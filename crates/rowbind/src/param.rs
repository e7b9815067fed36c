//! Bound parameters and their wire encoding.
//!
//! Every parameter is sent in the text wire format. Postgres then parses the text
//! into whatever the target column is (`numeric`, `date`, `timestamp`, `int4`,
//! `bool`, ...), which is what lets text-bound decimals and dates land in typed
//! columns without client-side parsing.

use crate::coerce::{BoundValue, StorageType};
use bytes::BytesMut;
use std::error::Error;
use std::sync::Arc;
use tokio_postgres::types::{Format, IsNull, ToSql, Type};

/// A shared bound parameter.
///
/// Cloning shares the underlying value, so two placeholders built from clones of
/// the same `Param` are guaranteed to carry the same value.
#[derive(Clone, Debug, PartialEq)]
pub struct Param(Arc<BoundValue>);

impl Param {
    pub fn new(value: BoundValue) -> Self {
        Param(Arc::new(value))
    }

    pub fn value(&self) -> &BoundValue {
        &self.0
    }

    pub fn storage(&self) -> StorageType {
        self.0.storage
    }

    /// Whether both handles point at the same parameter instance.
    pub fn same_instance(&self, other: &Param) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Get a reference to the parameter as a ToSql trait object.
    pub fn as_sql(&self) -> &(dyn ToSql + Sync) {
        self
    }
}

impl ToSql for Param {
    fn to_sql(
        &self,
        _ty: &Type,
        out: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
        match self.0.to_wire_text() {
            Some(text) => {
                out.extend_from_slice(text.as_bytes());
                Ok(IsNull::No)
            }
            None => Ok(IsNull::Yes),
        }
    }

    fn accepts(_ty: &Type) -> bool {
        true
    }

    fn encode_format(&self, _ty: &Type) -> Format {
        Format::Text
    }

    tokio_postgres::types::to_sql_checked!();
}

/// Parameters in placeholder order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParamList {
    params: Vec<Param>,
}

impl ParamList {
    pub fn new() -> Self {
        Self { params: Vec::new() }
    }

    /// Add a parameter and return its 1-based index.
    pub fn push(&mut self, param: Param) -> usize {
        self.params.push(param);
        self.params.len()
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Param> {
        self.params.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Param> {
        self.params.get(index)
    }

    /// All parameters as references for tokio-postgres.
    pub fn as_refs(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.params.iter().map(Param::as_sql).collect()
    }
}
