//! Witness synthesis errors.

use std::fmt;

use eqv_ir::{AccessError, TypeTag};

/// Why no witness could be produced for a type.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum WitnessError {
    /// The type graph revisits a type that has no prefab value. `chain`
    /// runs from the first occurrence of the repeated type up to, but not
    /// including, the repeat.
    #[error("recursive data structure {}; register prefab values for one of these types", Chain(.chain))]
    CycleDetected { chain: Vec<TypeTag> },

    #[error("cannot produce witnesses for `{tag}`: {reason}; register prefab values for it")]
    UnresolvableType { tag: TypeTag, reason: String },

    #[error(transparent)]
    Access(#[from] AccessError),

    #[error("invalid prefab values for `{tag}`: {reason}")]
    InvalidPrefab { tag: TypeTag, reason: &'static str },
}

impl WitnessError {
    pub fn unresolvable(tag: &TypeTag, reason: impl Into<String>) -> Self {
        WitnessError::UnresolvableType {
            tag: tag.clone(),
            reason: reason.into(),
        }
    }
}

struct Chain<'a>(&'a [TypeTag]);

impl fmt::Display for Chain<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, tag) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, " -> ")?;
            }
            write!(f, "{tag}")?;
        }
        Ok(())
    }
}
