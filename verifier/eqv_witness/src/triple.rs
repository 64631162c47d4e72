//! The witness bundle resolved for one type.

use eqv_ir::{Runtime, Value};

/// The three witnesses of one type.
///
/// `primary` and `alternate` differ structurally, unless the type has fewer
/// than two values (an empty or one-constant enumeration). `primary_copy`
/// is structurally equal to `primary`; for reference-like values it is a
/// distinct instance.
#[derive(Clone, Debug)]
pub struct WitnessTriple {
    pub primary: Value,
    pub alternate: Value,
    pub primary_copy: Value,
}

impl WitnessTriple {
    pub fn new(primary: Value, alternate: Value, primary_copy: Value) -> Self {
        WitnessTriple {
            primary,
            alternate,
            primary_copy,
        }
    }

    /// A triple whose copy is derived from `primary` by the runtime.
    pub fn from_pair(rt: &Runtime, primary: Value, alternate: Value) -> Self {
        let primary_copy = rt.copy(&primary);
        WitnessTriple::new(primary, alternate, primary_copy)
    }

    /// The same value in every slot, for single-valued types.
    pub fn single(value: Value) -> Self {
        WitnessTriple::new(value.clone(), value.clone(), value)
    }

    /// All slots absent, for types with no values at all.
    pub fn absent() -> Self {
        WitnessTriple::single(Value::Null)
    }

    /// Whether `primary` and `alternate` are structurally the same.
    pub fn is_degenerate(&self) -> bool {
        self.primary.structurally_equal(&self.alternate)
    }
}
