//! Type descriptors.
//!
//! A [`TypeTag`] is the normalized identity of a type plus its resolved generic
//! arguments. It is the universal cache and lookup key of the witness engine:
//! two tags are equal exactly when their raw names and argument lists are
//! equal, recursively.
//!
//! A [`DeclaredType`] is what a member declaration says before substitution.
//! It may mention the enclosing type's parameters; resolving it against the
//! enclosing tag yields a concrete `TypeTag`.

use std::fmt;
use std::sync::Arc;

use crate::builtin;
use crate::{Name, PrimitiveKind};

/// Normalized identity of a type plus its resolved generic arguments.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct TypeTag {
    raw: Name,
    args: Arc<[TypeTag]>,
}

impl TypeTag {
    /// Create a tag for `raw` applied to `args`.
    pub fn of(raw: impl Into<Name>, args: impl IntoIterator<Item = TypeTag>) -> Self {
        TypeTag {
            raw: raw.into(),
            args: args.into_iter().collect(),
        }
    }

    /// Create a tag without generic arguments.
    pub fn simple(raw: impl Into<Name>) -> Self {
        TypeTag::of(raw, [])
    }

    /// The top type, used wherever a type argument is unknown.
    pub fn top() -> Self {
        TypeTag::simple(builtin::OBJECT)
    }

    /// An array-shaped tag with the given component type.
    pub fn array_of(component: TypeTag) -> Self {
        TypeTag::of(builtin::ARRAY, [component])
    }

    #[inline]
    pub fn raw(&self) -> &Name {
        &self.raw
    }

    #[inline]
    pub fn args(&self) -> &[TypeTag] {
        &self.args
    }

    /// The `n`th generic argument, or the top type when `n` exceeds the
    /// declared arity (raw or wildcard usage).
    pub fn generic_argument_at(&self, n: usize) -> TypeTag {
        self.args.get(n).cloned().unwrap_or_else(TypeTag::top)
    }

    pub fn is_array(&self) -> bool {
        self.raw == builtin::ARRAY
    }

    pub fn is_top(&self) -> bool {
        self.raw == builtin::OBJECT && self.args.is_empty()
    }

    /// The scalar kind, if this is a built-in primitive.
    pub fn primitive_kind(&self) -> Option<PrimitiveKind> {
        PrimitiveKind::from_name(self.raw.as_str())
    }

    /// Component type of an array-shaped tag.
    pub fn component(&self) -> Option<TypeTag> {
        self.is_array().then(|| self.generic_argument_at(0))
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_array() {
            return write!(f, "{}[]", self.generic_argument_at(0));
        }
        write!(f, "{}", self.raw)?;
        if !self.args.is_empty() {
            write!(f, "<")?;
            for (i, arg) in self.args.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{arg}")?;
            }
            write!(f, ">")?;
        }
        Ok(())
    }
}

impl fmt::Debug for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeTag({self})")
    }
}

/// The type of a member as written in its declaration.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum DeclaredType {
    /// A type parameter of the enclosing type (`T`).
    Param(Name),
    /// A named type, possibly generic (`Map<K, String>`).
    Named { raw: Name, args: Vec<DeclaredType> },
    /// An array of the element type (`T[]`).
    Array(Box<DeclaredType>),
}

impl DeclaredType {
    pub fn named(raw: impl Into<Name>) -> Self {
        DeclaredType::Named {
            raw: raw.into(),
            args: Vec::new(),
        }
    }

    pub fn generic(raw: impl Into<Name>, args: impl IntoIterator<Item = DeclaredType>) -> Self {
        DeclaredType::Named {
            raw: raw.into(),
            args: args.into_iter().collect(),
        }
    }

    pub fn param(name: impl Into<Name>) -> Self {
        DeclaredType::Param(name.into())
    }

    pub fn array(element: DeclaredType) -> Self {
        DeclaredType::Array(Box::new(element))
    }

    /// Substitute the enclosing type's resolved arguments for its parameters.
    ///
    /// `params` are the enclosing definition's parameter names in declaration
    /// order; `enclosing` is the tag being synthesized. A parameter that is not
    /// declared, or has no resolved argument, becomes the top type.
    pub fn resolve(&self, params: &[Name], enclosing: &TypeTag) -> TypeTag {
        match self {
            DeclaredType::Param(name) => match params.iter().position(|p| p == name) {
                Some(index) => enclosing.generic_argument_at(index),
                None => TypeTag::top(),
            },
            DeclaredType::Named { raw, args } => TypeTag::of(
                raw.clone(),
                args.iter()
                    .map(|arg| arg.resolve(params, enclosing))
                    .collect::<Vec<_>>(),
            ),
            DeclaredType::Array(element) => TypeTag::array_of(element.resolve(params, enclosing)),
        }
    }
}

impl From<&TypeTag> for DeclaredType {
    fn from(tag: &TypeTag) -> Self {
        if let Some(component) = tag.component() {
            return DeclaredType::array(DeclaredType::from(&component));
        }
        DeclaredType::generic(tag.raw().clone(), tag.args().iter().map(DeclaredType::from))
    }
}

#[cfg(test)]
mod tests;
