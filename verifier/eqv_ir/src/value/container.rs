//! Immutable container values: optionals, sequences, sets, maps and tables.
//!
//! Containers are immutable once built. Their `kind` is the raw type name
//! they were built for (`List`, `ImmutableList`, `SortedMap`, ...); the
//! runtime's equivalence compares contents by shape and ignores the kind,
//! while structural comparison requires the kinds to match.

use std::fmt;
use std::sync::Arc;

use super::Value;
use crate::Name;

/// The contents of a container.
#[derive(Clone, Debug)]
pub enum ContainerShape {
    Optional(Option<Value>),
    /// Ordered elements.
    Seq(Vec<Value>),
    /// Unordered, duplicate-free elements.
    Set(Vec<Value>),
    /// Key/value entries with unique keys.
    Map(Vec<(Value, Value)>),
    /// `(row, column, value)` cells with unique `(row, column)` keys.
    Table(Vec<(Value, Value, Value)>),
}

impl ContainerShape {
    /// Number of elements, entries or cells.
    pub fn len(&self) -> usize {
        match self {
            ContainerShape::Optional(v) => usize::from(v.is_some()),
            ContainerShape::Seq(v) | ContainerShape::Set(v) => v.len(),
            ContainerShape::Map(v) => v.len(),
            ContainerShape::Table(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// An empty container of the same shape.
    pub fn emptied(&self) -> ContainerShape {
        match self {
            ContainerShape::Optional(_) => ContainerShape::Optional(None),
            ContainerShape::Seq(_) => ContainerShape::Seq(Vec::new()),
            ContainerShape::Set(_) => ContainerShape::Set(Vec::new()),
            ContainerShape::Map(_) => ContainerShape::Map(Vec::new()),
            ContainerShape::Table(_) => ContainerShape::Table(Vec::new()),
        }
    }
}

struct ContainerData {
    kind: Name,
    shape: ContainerShape,
}

/// Handle to an immutable container.
#[derive(Clone)]
pub struct ContainerValue(Arc<ContainerData>);

impl ContainerValue {
    pub fn new(kind: impl Into<Name>, shape: ContainerShape) -> Self {
        ContainerValue(Arc::new(ContainerData {
            kind: kind.into(),
            shape,
        }))
    }

    pub fn kind(&self) -> &Name {
        &self.0.kind
    }

    pub fn shape(&self) -> &ContainerShape {
        &self.0.shape
    }

    /// The same contents under a different container kind.
    pub fn rekinded(&self, kind: impl Into<Name>) -> Self {
        ContainerValue::new(kind, self.0.shape.clone())
    }

    #[inline]
    pub fn ptr_eq(&self, other: &ContainerValue) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for ContainerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:?}", self.0.kind, self.0.shape)
    }
}
