//! Type definitions registered with the runtime.

use std::fmt;
use std::sync::Arc;

use bitflags::bitflags;

use super::Instance;
use crate::{DeclaredType, InstanceError, Name, PrimitiveKind, TypeTag, Value};

bitflags! {
    /// Declaration modifiers of a record member.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct FieldFlags: u8 {
        /// Assigned once at construction; not expected to change afterwards.
        const FINAL = 1 << 0;
        /// Belongs to the type, not the instance. Never touched by synthesis.
        const STATIC = 1 << 1;
        /// Declared as not part of the instance's identity.
        const TRANSIENT = 1 << 2;
        /// A compile-time constant. Holds its initializer on every instance.
        const CONSTANT = 1 << 3;
    }
}

/// `equals(this, other)`.
pub type EqualsFn = Arc<dyn Fn(&Instance<'_>, &Value) -> Result<bool, InstanceError> + Send + Sync>;
/// `hash_code(this)`.
pub type HashFn = Arc<dyn Fn(&Instance<'_>) -> Result<i32, InstanceError> + Send + Sync>;
/// `render(this)`, the string form.
pub type RenderFn = Arc<dyn Fn(&Instance<'_>) -> Result<String, InstanceError> + Send + Sync>;

/// The operations a record type defines for itself.
///
/// A missing operation is inherited from the top type: identity equality,
/// identity hashing, and `Type@hash` rendering.
#[derive(Clone, Default)]
pub struct Methods {
    pub equals: Option<EqualsFn>,
    pub hash_code: Option<HashFn>,
    pub render: Option<RenderFn>,
}

impl fmt::Debug for Methods {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Methods")
            .field("equals", &self.equals.is_some())
            .field("hash_code", &self.hash_code.is_some())
            .field("render", &self.render.is_some())
            .finish()
    }
}

/// One member declaration of a record type.
#[derive(Clone, Debug)]
pub struct FieldDef {
    pub name: Name,
    pub ty: DeclaredType,
    pub flags: FieldFlags,
    /// Value held by `CONSTANT` and `STATIC` members.
    pub initializer: Option<Value>,
}

impl FieldDef {
    pub fn new(name: impl Into<Name>, ty: DeclaredType) -> Self {
        FieldDef {
            name: name.into(),
            ty,
            flags: FieldFlags::empty(),
            initializer: None,
        }
    }

    /// A `FINAL` member.
    pub fn fixed(name: impl Into<Name>, ty: DeclaredType) -> Self {
        FieldDef::new(name, ty).with_flags(FieldFlags::FINAL)
    }

    /// A `FINAL | CONSTANT` member holding `value` on every instance.
    pub fn constant(name: impl Into<Name>, ty: DeclaredType, value: Value) -> Self {
        FieldDef {
            initializer: Some(value),
            ..FieldDef::new(name, ty).with_flags(FieldFlags::FINAL | FieldFlags::CONSTANT)
        }
    }

    #[must_use]
    pub fn with_flags(mut self, flags: FieldFlags) -> Self {
        self.flags |= flags;
        self
    }

    #[must_use]
    pub fn with_initializer(mut self, value: Value) -> Self {
        self.initializer = Some(value);
        self
    }

    pub fn is_final(&self) -> bool {
        self.flags.contains(FieldFlags::FINAL)
    }

    pub fn is_static(&self) -> bool {
        self.flags.contains(FieldFlags::STATIC)
    }

    pub fn is_transient(&self) -> bool {
        self.flags.contains(FieldFlags::TRANSIENT)
    }

    pub fn is_constant(&self) -> bool {
        self.flags.contains(FieldFlags::CONSTANT)
    }
}

/// The shape of a registered type.
#[derive(Clone, Debug)]
pub enum TypeKind {
    Primitive(PrimitiveKind),
    /// Enumeration constants in ordinal order.
    Enum(Vec<Name>),
    /// Member declarations in declaration order.
    Record(Vec<FieldDef>),
    /// A type with no instances of its own (interfaces, abstract bases).
    Abstract,
}

/// A type known to the runtime.
#[derive(Clone, Debug)]
pub struct TypeDef {
    name: Name,
    params: Vec<Name>,
    kind: TypeKind,
    methods: Methods,
}

impl TypeDef {
    fn with_kind(name: impl Into<Name>, kind: TypeKind) -> Self {
        TypeDef {
            name: name.into(),
            params: Vec::new(),
            kind,
            methods: Methods::default(),
        }
    }

    /// A record type with no members yet.
    pub fn record(name: impl Into<Name>) -> Self {
        TypeDef::with_kind(name, TypeKind::Record(Vec::new()))
    }

    pub fn enumeration<N: Into<Name>>(
        name: impl Into<Name>,
        constants: impl IntoIterator<Item = N>,
    ) -> Self {
        TypeDef::with_kind(
            name,
            TypeKind::Enum(constants.into_iter().map(Into::into).collect()),
        )
    }

    pub fn abstract_type(name: impl Into<Name>) -> Self {
        TypeDef::with_kind(name, TypeKind::Abstract)
    }

    pub fn primitive(kind: PrimitiveKind) -> Self {
        TypeDef::with_kind(kind.name(), TypeKind::Primitive(kind))
    }

    /// Declare the type's generic parameters, in order.
    #[must_use]
    pub fn with_params<N: Into<Name>>(mut self, params: impl IntoIterator<Item = N>) -> Self {
        self.params = params.into_iter().map(Into::into).collect();
        self
    }

    /// Append a member. Ignored for anything but records.
    #[must_use]
    pub fn with_field(mut self, field: FieldDef) -> Self {
        if let TypeKind::Record(fields) = &mut self.kind {
            fields.push(field);
        }
        self
    }

    #[must_use]
    pub fn with_equals(
        mut self,
        f: impl Fn(&Instance<'_>, &Value) -> Result<bool, InstanceError> + Send + Sync + 'static,
    ) -> Self {
        self.methods.equals = Some(Arc::new(f));
        self
    }

    #[must_use]
    pub fn with_hash(
        mut self,
        f: impl Fn(&Instance<'_>) -> Result<i32, InstanceError> + Send + Sync + 'static,
    ) -> Self {
        self.methods.hash_code = Some(Arc::new(f));
        self
    }

    #[must_use]
    pub fn with_render(
        mut self,
        f: impl Fn(&Instance<'_>) -> Result<String, InstanceError> + Send + Sync + 'static,
    ) -> Self {
        self.methods.render = Some(Arc::new(f));
        self
    }

    #[inline]
    pub fn name(&self) -> &Name {
        &self.name
    }

    #[inline]
    pub fn params(&self) -> &[Name] {
        &self.params
    }

    #[inline]
    pub fn kind(&self) -> &TypeKind {
        &self.kind
    }

    #[inline]
    pub fn methods(&self) -> &Methods {
        &self.methods
    }

    pub fn is_record(&self) -> bool {
        matches!(self.kind, TypeKind::Record(_))
    }

    /// Member declarations; empty for anything but records.
    pub fn fields(&self) -> &[FieldDef] {
        match &self.kind {
            TypeKind::Record(fields) => fields,
            _ => &[],
        }
    }

    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields().iter().position(|f| f.name == name)
    }

    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields().iter().find(|f| f.name == name)
    }

    /// Whether the type defines its own equivalence instead of inheriting
    /// identity. Scalars and enumerations always do.
    pub fn declares_equals(&self) -> bool {
        match self.kind {
            TypeKind::Record(_) => self.methods.equals.is_some(),
            TypeKind::Primitive(_) | TypeKind::Enum(_) => true,
            TypeKind::Abstract => false,
        }
    }

    /// The enumeration constant at `ordinal`.
    pub fn enum_constant(&self, ordinal: usize) -> Option<Value> {
        let TypeKind::Enum(constants) = &self.kind else {
            return None;
        };
        let name = constants.get(ordinal)?;
        Some(Value::Enum(crate::EnumConstant {
            ty: self.name.clone(),
            ordinal: u32::try_from(ordinal).ok()?,
            name: name.clone(),
        }))
    }

    /// Resolve a member's declared type against the tag being instantiated.
    pub fn member_tag(&self, field: &FieldDef, enclosing: &TypeTag) -> TypeTag {
        field.ty.resolve(&self.params, enclosing)
    }
}
