//! Strategies for the generic container shapes.

use std::sync::Arc;

use eqv_ir::{ContainerShape, ContainerValue, Name, TypeTag, Value};

use crate::{RecursionGuard, ValueProvider, WitnessError, WitnessFactory, WitnessTriple};

fn container(kind: &Name, shape: ContainerShape) -> Value {
    Value::Container(ContainerValue::new(kind.clone(), shape))
}

/// A container over one element type (`Optional<T>`, `List<T>`, ...).
///
/// Each witness wraps the matching element witness. When the element type
/// is single-valued the two wrapped containers would be equal, so the
/// `empty` shape, if there is one, is used for `alternate` instead.
#[derive(Clone)]
pub struct SingleArg {
    kind: Name,
    wrap: fn(Value) -> ContainerShape,
    empty: Option<ContainerShape>,
}

impl SingleArg {
    pub fn new(kind: impl Into<Name>, wrap: fn(Value) -> ContainerShape) -> Self {
        SingleArg {
            kind: kind.into(),
            wrap,
            empty: None,
        }
    }

    #[must_use]
    pub fn with_empty(mut self, empty: ContainerShape) -> Self {
        self.empty = Some(empty);
        self
    }

    pub fn create(
        &self,
        tag: &TypeTag,
        provider: &dyn ValueProvider,
        guard: &RecursionGuard,
    ) -> Result<WitnessTriple, WitnessError> {
        let element = provider.resolve(&tag.generic_argument_at(0), guard)?;
        let wrap = |value: &Value| container(&self.kind, (self.wrap)(value.clone()));
        let alternate = match &self.empty {
            Some(empty) if element.is_degenerate() => container(&self.kind, empty.clone()),
            _ => wrap(&element.alternate),
        };
        Ok(WitnessTriple::new(
            wrap(&element.primary),
            alternate,
            wrap(&element.primary_copy),
        ))
    }
}

impl From<SingleArg> for WitnessFactory {
    fn from(strategy: SingleArg) -> Self {
        WitnessFactory::new(move |tag, provider, guard| strategy.create(tag, provider, guard))
    }
}

/// A map-shaped container over key and value types.
///
/// `primary` is `{key.primary: value.alternate}` and `alternate` is
/// `{key.alternate: value.alternate}`. A single-valued key type leaves
/// `alternate` empty instead of repeating the primary entry.
#[derive(Clone)]
pub struct MapShaped {
    kind: Name,
}

impl MapShaped {
    pub fn new(kind: impl Into<Name>) -> Self {
        MapShaped { kind: kind.into() }
    }

    pub fn create(
        &self,
        tag: &TypeTag,
        provider: &dyn ValueProvider,
        guard: &RecursionGuard,
    ) -> Result<WitnessTriple, WitnessError> {
        let key = provider.resolve(&tag.generic_argument_at(0), guard)?;
        let value = provider.resolve(&tag.generic_argument_at(1), guard)?;
        let entry = |k: &Value| ContainerShape::Map(vec![(k.clone(), value.alternate.clone())]);
        let alternate = if key.is_degenerate() {
            ContainerShape::Map(Vec::new())
        } else {
            entry(&key.alternate)
        };
        Ok(WitnessTriple::new(
            container(&self.kind, entry(&key.primary)),
            container(&self.kind, alternate),
            container(&self.kind, entry(&key.primary)),
        ))
    }
}

impl From<MapShaped> for WitnessFactory {
    fn from(strategy: MapShaped) -> Self {
        WitnessFactory::new(move |tag, provider, guard| strategy.create(tag, provider, guard))
    }
}

/// A table-shaped container keyed by a row and a column type.
///
/// Built like [`MapShaped`] with a two-part key; if either axis is
/// single-valued the alternate table is empty.
#[derive(Clone)]
pub struct TableShaped {
    kind: Name,
}

impl TableShaped {
    pub fn new(kind: impl Into<Name>) -> Self {
        TableShaped { kind: kind.into() }
    }

    pub fn create(
        &self,
        tag: &TypeTag,
        provider: &dyn ValueProvider,
        guard: &RecursionGuard,
    ) -> Result<WitnessTriple, WitnessError> {
        let row = provider.resolve(&tag.generic_argument_at(0), guard)?;
        let column = provider.resolve(&tag.generic_argument_at(1), guard)?;
        let value = provider.resolve(&tag.generic_argument_at(2), guard)?;
        let cell = |r: &Value, c: &Value| {
            ContainerShape::Table(vec![(r.clone(), c.clone(), value.alternate.clone())])
        };
        let alternate = if row.is_degenerate() || column.is_degenerate() {
            ContainerShape::Table(Vec::new())
        } else {
            cell(&row.alternate, &column.alternate)
        };
        Ok(WitnessTriple::new(
            container(&self.kind, cell(&row.primary, &column.primary)),
            container(&self.kind, alternate),
            container(&self.kind, cell(&row.primary, &column.primary)),
        ))
    }
}

impl From<TableShaped> for WitnessFactory {
    fn from(strategy: TableShaped) -> Self {
        WitnessFactory::new(move |tag, provider, guard| strategy.create(tag, provider, guard))
    }
}

type Transform = dyn Fn(&Value) -> Value + Send + Sync;

/// A container built from the witnesses of another container type with the
/// same type arguments, such as an immutable list from a list.
#[derive(Clone)]
pub struct CopyThrough {
    source: Name,
    transform: Arc<Transform>,
}

impl CopyThrough {
    pub fn new(source: impl Into<Name>, transform: impl Fn(&Value) -> Value + Send + Sync + 'static) -> Self {
        CopyThrough {
            source: source.into(),
            transform: Arc::new(transform),
        }
    }

    /// Re-label the source container's contents as `kind`.
    pub fn rekinding(source: impl Into<Name>, kind: impl Into<Name>) -> Self {
        let kind = kind.into();
        CopyThrough::new(source, move |value| match value {
            Value::Container(c) => Value::Container(c.rekinded(kind.clone())),
            other => other.clone(),
        })
    }

    pub fn create(
        &self,
        tag: &TypeTag,
        provider: &dyn ValueProvider,
        guard: &RecursionGuard,
    ) -> Result<WitnessTriple, WitnessError> {
        let source_tag = TypeTag::of(self.source.clone(), tag.args().iter().cloned());
        let source = provider.resolve(&source_tag, guard)?;
        Ok(WitnessTriple::new(
            (self.transform)(&source.primary),
            (self.transform)(&source.alternate),
            (self.transform)(&source.primary_copy),
        ))
    }
}

impl From<CopyThrough> for WitnessFactory {
    fn from(strategy: CopyThrough) -> Self {
        WitnessFactory::new(move |tag, provider, guard| strategy.create(tag, provider, guard))
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
