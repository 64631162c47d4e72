//! Shared object and array handles.
//!
//! A handle is an `Arc` around its cells, so cloning a handle aliases the
//! same instance. Locks are held only for the duration of a single slot
//! access; callers never hold one across user callbacks.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use super::Value;
use crate::TypeTag;

struct Cells {
    tag: TypeTag,
    cells: Mutex<Vec<Value>>,
}

impl Cells {
    fn new(tag: TypeTag, cells: Vec<Value>) -> Arc<Self> {
        Arc::new(Cells {
            tag,
            cells: Mutex::new(cells),
        })
    }

    fn get(&self, index: usize) -> Option<Value> {
        self.cells.lock().get(index).cloned()
    }

    fn set(&self, index: usize, value: Value) -> bool {
        match self.cells.lock().get_mut(index) {
            Some(cell) => {
                *cell = value;
                true
            }
            None => false,
        }
    }

    fn snapshot(&self) -> Vec<Value> {
        self.cells.lock().clone()
    }

    fn len(&self) -> usize {
        self.cells.lock().len()
    }
}

/// Handle to an instance of a record type.
#[derive(Clone)]
pub struct ObjectRef(Arc<Cells>);

impl ObjectRef {
    /// Wrap member slots, in declaration order, as a new instance of `tag`.
    pub fn new(tag: TypeTag, slots: Vec<Value>) -> Self {
        ObjectRef(Cells::new(tag, slots))
    }

    /// The resolved type this instance was allocated as.
    pub fn tag(&self) -> &TypeTag {
        &self.0.tag
    }

    pub fn slot(&self, index: usize) -> Option<Value> {
        self.0.get(index)
    }

    /// Overwrite a slot. Returns `false` if `index` is out of range.
    pub fn set_slot(&self, index: usize, value: Value) -> bool {
        self.0.set(index, value)
    }

    /// A snapshot of every slot.
    pub fn slots(&self) -> Vec<Value> {
        self.0.snapshot()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn ptr_eq(&self, other: &ObjectRef) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Address of the instance; stable for its lifetime.
    pub fn addr(&self) -> usize {
        Arc::as_ptr(&self.0) as usize
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Object({}@{:x})", self.0.tag, self.addr())
    }
}

/// Handle to a fixed-length array.
#[derive(Clone)]
pub struct ArrayRef(Arc<Cells>);

impl ArrayRef {
    pub fn new(component: TypeTag, cells: Vec<Value>) -> Self {
        ArrayRef(Cells::new(component, cells))
    }

    /// The array's element type.
    pub fn component(&self) -> &TypeTag {
        &self.0.tag
    }

    /// The array-shaped tag of this array.
    pub fn tag(&self) -> TypeTag {
        TypeTag::array_of(self.0.tag.clone())
    }

    pub fn get(&self, index: usize) -> Option<Value> {
        self.0.get(index)
    }

    /// Overwrite a cell. Returns `false` if `index` is out of range.
    pub fn set(&self, index: usize, value: Value) -> bool {
        self.0.set(index, value)
    }

    /// A snapshot of every cell.
    pub fn cells(&self) -> Vec<Value> {
        self.0.snapshot()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn ptr_eq(&self, other: &ArrayRef) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub fn addr(&self) -> usize {
        Arc::as_ptr(&self.0) as usize
    }
}

impl fmt::Debug for ArrayRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Array({}[{}]@{:x})", self.0.tag, self.len(), self.addr())
    }
}
