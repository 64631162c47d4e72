//! The built-in registry entries.

use eqv_ir::builtin;
use eqv_ir::{ContainerShape, Value};

use crate::{CopyThrough, FactoryRegistry, MapShaped, SingleArg, TableShaped};

pub(crate) fn install(registry: &mut FactoryRegistry) {
    // Scalars
    registry
        .register_values(builtin::BOOL, Value::Bool(true), Value::Bool(false))
        .register_values(builtin::I32, Value::I32(1), Value::I32(2))
        .register_values(builtin::I64, Value::I64(1), Value::I64(2))
        .register_values(builtin::F32, Value::F32(0.5), Value::F32(1.0))
        .register_values(builtin::F64, Value::F64(0.5), Value::F64(1.0))
        .register_values(builtin::CHAR, Value::Char('a'), Value::Char('b'))
        .register_values(builtin::STRING, Value::str("one"), Value::str("two"));

    // The top type stands in for unknown arguments; any two distinct values
    // will do.
    registry.register_values(builtin::OBJECT, Value::str("one"), Value::str("two"));

    // Containers
    registry
        .register(
            builtin::OPTIONAL,
            SingleArg::new(builtin::OPTIONAL, |v| {
                ContainerShape::Optional((!v.is_null()).then_some(v))
            })
            .with_empty(ContainerShape::Optional(None))
            .into(),
        )
        .register(
            builtin::LIST,
            SingleArg::new(builtin::LIST, |v| ContainerShape::Seq(vec![v])).into(),
        )
        .register(
            builtin::SET,
            SingleArg::new(builtin::SET, |v| ContainerShape::Set(vec![v]))
                .with_empty(ContainerShape::Set(Vec::new()))
                .into(),
        )
        .register(builtin::MAP, MapShaped::new(builtin::MAP).into())
        .register(builtin::SORTED_MAP, MapShaped::new(builtin::SORTED_MAP).into())
        .register(builtin::TABLE, TableShaped::new(builtin::TABLE).into())
        .register(
            builtin::IMMUTABLE_LIST,
            CopyThrough::rekinding(builtin::LIST, builtin::IMMUTABLE_LIST).into(),
        )
        .register(
            builtin::IMMUTABLE_SET,
            CopyThrough::rekinding(builtin::SET, builtin::IMMUTABLE_SET).into(),
        );
}
