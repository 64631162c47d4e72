//! In-flight type stack for cycle detection.

use eqv_ir::TypeTag;

/// The ordered set of tags currently being synthesized.
///
/// Persistent: [`push`](RecursionGuard::push) returns a new guard sharing
/// structure with the old one, so sibling branches of a type graph never see
/// each other's entries.
#[derive(Clone, Debug, Default)]
pub struct RecursionGuard {
    stack: im::Vector<TypeTag>,
}

impl RecursionGuard {
    pub fn new() -> Self {
        RecursionGuard::default()
    }

    pub fn contains(&self, tag: &TypeTag) -> bool {
        self.stack.contains(tag)
    }

    /// A new guard with `tag` appended. `self` is unchanged.
    #[must_use]
    pub fn push(&self, tag: TypeTag) -> Self {
        let mut stack = self.stack.clone();
        stack.push_back(tag);
        RecursionGuard { stack }
    }

    /// The cycle `tag` would close: the entries from its first occurrence
    /// onwards. `None` when `tag` is not in flight.
    pub fn cycle_from(&self, tag: &TypeTag) -> Option<Vec<TypeTag>> {
        let start = self.stack.index_of(tag)?;
        Some(self.stack.iter().skip(start).cloned().collect())
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TypeTag> {
        self.stack.iter()
    }
}

#[cfg(test)]
mod tests;
