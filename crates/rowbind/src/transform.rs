//! Per-field value rewriting before coercion.
//!
//! A [`ValueTransform`] sees every field that survives the metadata lookup, once,
//! before its value is coerced. It can rewrite the value but cannot drop the field;
//! the field set is decided by metadata alone.
//!
//! ```ignore
//! use rowbind::{StatementBuilder, Value};
//!
//! let builder = StatementBuilder::new(registry).with_transform(
//!     |value: Value, field: &str, _ctx: &rowbind::TransformContext<'_>| match (field, value) {
//!         ("description", Value::Text(s)) => Value::Text(s.trim().to_string()),
//!         (_, v) => v,
//!     },
//! );
//! ```

use crate::metadata::FieldMapping;
use crate::statement::StatementKind;
use crate::value::Value;

/// Information about the field being transformed.
#[derive(Debug, Clone, Copy)]
pub struct TransformContext<'a> {
    pub entity: &'a str,
    pub table: &'a str,
    pub mapping: &'a FieldMapping,
    pub kind: StatementKind,
}

/// Rewrites a field value before coercion.
pub trait ValueTransform {
    fn transform(&self, value: Value, field: &str, ctx: &TransformContext<'_>) -> Value;
}

/// Returns every value unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityTransform;

impl ValueTransform for IdentityTransform {
    fn transform(&self, value: Value, _field: &str, _ctx: &TransformContext<'_>) -> Value {
        value
    }
}

impl<F> ValueTransform for F
where
    F: Fn(Value, &str, &TransformContext<'_>) -> Value,
{
    fn transform(&self, value: Value, field: &str, ctx: &TransformContext<'_>) -> Value {
        self(value, field, ctx)
    }
}

/// Applies transforms in registration order, each seeing the previous output.
#[derive(Default)]
pub struct TransformChain {
    transforms: Vec<Box<dyn ValueTransform + Send + Sync>>,
}

impl TransformChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(mut self, transform: impl ValueTransform + Send + Sync + 'static) -> Self {
        self.transforms.push(Box::new(transform));
        self
    }

    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }
}

impl ValueTransform for TransformChain {
    fn transform(&self, value: Value, field: &str, ctx: &TransformContext<'_>) -> Value {
        self.transforms
            .iter()
            .fold(value, |value, t| t.transform(value, field, ctx))
    }
}

impl std::fmt::Debug for TransformChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransformChain")
            .field("len", &self.transforms.len())
            .finish()
    }
}
