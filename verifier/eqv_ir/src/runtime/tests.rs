use super::*;
use crate::DeclaredType;
use pretty_assertions::assert_eq;

fn point_def() -> TypeDef {
    TypeDef::record("Point")
        .with_field(FieldDef::fixed("x", DeclaredType::named("i32")))
        .with_field(FieldDef::fixed("y", DeclaredType::named("i32")))
        .with_field(FieldDef::constant(
            "ORIGIN_NAME",
            DeclaredType::named("String"),
            Value::str("origin"),
        ))
        .with_equals(|this, other| match this.peer(other) {
            Some(that) => this.equals_members(&that, &["x", "y"]),
            None => Ok(false),
        })
        .with_hash(|this| this.hash_members(&["x", "y"]))
        .with_render(|this| {
            Ok(format!(
                "Point({}, {})",
                this.rt().render(&this.get("x")?)?,
                this.rt().render(&this.get("y")?)?
            ))
        })
}

fn runtime() -> Runtime {
    Runtime::new()
        .with(point_def())
        .with(TypeDef::record("Opaque").with_field(FieldDef::new("n", DeclaredType::named("i32"))))
        .with(TypeDef::enumeration("Color", ["Red", "Green"]))
        .with(
            TypeDef::record("Holder")
                .with_params(["T"])
                .with_field(FieldDef::new("value", DeclaredType::param("T")))
                .with_field(FieldDef::new("label", DeclaredType::named("String"))),
        )
}

fn point(rt: &Runtime, x: i32, y: i32) -> Value {
    let Ok(obj) = rt.allocate(&TypeTag::simple("Point")) else {
        panic!("Point is allocatable");
    };
    obj.set_slot(0, Value::I32(x));
    obj.set_slot(1, Value::I32(y));
    Value::Object(obj)
}

// === Allocation ===

#[test]
fn allocate_zeroes_members_and_keeps_constants() {
    let rt = runtime();
    let obj = rt.allocate(&TypeTag::simple("Point")).unwrap();
    let slots = obj.slots();
    assert_eq!(slots[0].as_i32(), Some(0));
    assert_eq!(slots[1].as_i32(), Some(0));
    assert_eq!(slots[2].as_str(), Some("origin"));
}

#[test]
fn allocate_resolves_generic_member_defaults() {
    let rt = runtime();
    let of_int = rt
        .allocate(&TypeTag::of("Holder", [TypeTag::simple("i32")]))
        .unwrap();
    assert_eq!(of_int.slot(0).and_then(|v| v.as_i32()), Some(0));
    assert!(of_int.slot(1).is_some_and(|v| v.is_null()));

    let of_string = rt
        .allocate(&TypeTag::of("Holder", [TypeTag::simple("String")]))
        .unwrap();
    assert!(of_string.slot(0).is_some_and(|v| v.is_null()));
}

#[test]
fn allocate_refuses_non_records() {
    let rt = runtime();
    assert!(matches!(
        rt.allocate(&TypeTag::simple("Color")),
        Err(AccessError::NotInstantiable { .. })
    ));
    assert!(matches!(
        rt.allocate(&TypeTag::top()),
        Err(AccessError::NotInstantiable { .. })
    ));
    assert_eq!(
        rt.allocate(&TypeTag::simple("Missing")).unwrap_err(),
        AccessError::UnknownType(Name::new("Missing"))
    );
}

#[test]
fn definitions_are_found_by_tag_name() {
    let rt = runtime();
    let tag = TypeTag::of("Holder", [TypeTag::simple("i32")]);
    assert!(rt.lookup(tag.raw()).is_some_and(|def| def.name() == "Holder"));
    assert!(rt.declares_equals(TypeTag::simple("Point").raw()));
    assert_eq!(
        rt.require(TypeTag::simple("Missing").raw()).unwrap_err(),
        AccessError::UnknownType(Name::new("Missing"))
    );
}

// === Equivalence ===

#[test]
fn user_equals_is_dispatched() {
    let rt = runtime();
    let a = point(&rt, 1, 2);
    let b = point(&rt, 1, 2);
    let c = point(&rt, 2, 2);
    assert_eq!(rt.equals(&a, &b), Ok(true));
    assert_eq!(rt.equals(&a, &c), Ok(false));
    assert_eq!(rt.equals(&a, &Value::Null), Ok(false));
    assert_eq!(rt.equals(&a, &Value::I32(1)), Ok(false));
}

#[test]
fn inherited_identity_without_equals() {
    let rt = runtime();
    let a = Value::Object(rt.allocate(&TypeTag::simple("Opaque")).unwrap());
    let copy = rt.copy(&a);
    assert_eq!(rt.equals(&a, &a), Ok(true));
    assert_eq!(rt.equals(&a, &copy), Ok(false));
    assert!(!rt.declares_equals("Opaque"));
    assert!(rt.declares_equals("Point"));
    assert!(rt.declares_equals("Color"));
}

#[test]
fn null_receiver_is_a_dereference() {
    let rt = runtime();
    assert_eq!(rt.equals(&Value::Null, &Value::Null), Ok(true));
    assert_eq!(
        rt.invoke_equals(&Value::Null, &Value::Null),
        Err(InstanceError::NullDereference {
            operation: "equals"
        })
    );
    assert_eq!(rt.hash_code(&Value::Null), Ok(0));
    assert!(rt.invoke_hash(&Value::Null).is_err());
    assert_eq!(rt.render(&Value::Null).as_deref(), Ok("null"));
    assert!(rt.invoke_render(&Value::Null).is_err());
}

#[test]
fn floats_are_canonical() {
    let rt = runtime();
    assert_eq!(rt.equals(&Value::F64(f64::NAN), &Value::F64(f64::NAN)), Ok(true));
    assert_eq!(rt.equals(&Value::F32(0.0), &Value::F32(-0.0)), Ok(false));
}

#[test]
fn arrays_compare_by_identity() {
    let rt = runtime();
    let a = Value::Array(ArrayRef::new(TypeTag::simple("i32"), vec![Value::I32(1)]));
    let b = rt.copy(&a);
    assert_eq!(rt.equals(&a, &b), Ok(false));
    assert_eq!(rt.array_equals(&a, &b), Ok(true));
    assert_eq!(rt.array_hash_code(&a), rt.array_hash_code(&b));
}

#[test]
fn nested_arrays_need_deep_comparison() {
    let rt = runtime();
    let inner = Value::Array(ArrayRef::new(TypeTag::simple("i32"), vec![Value::I32(1)]));
    let outer = Value::Array(ArrayRef::new(
        TypeTag::array_of(TypeTag::simple("i32")),
        vec![inner],
    ));
    let copy = rt.deep_copy(&outer);
    assert_eq!(rt.array_equals(&outer, &copy), Ok(false));
    assert_eq!(rt.deep_equals(&outer, &copy), Ok(true));
    assert_eq!(rt.deep_hash_code(&outer), rt.deep_hash_code(&copy));
}

#[test]
fn sets_and_maps_ignore_order() {
    let rt = runtime();
    let set = |items: Vec<Value>| Value::Container(ContainerValue::new("Set", ContainerShape::Set(items)));
    assert_eq!(
        rt.equals(
            &set(vec![Value::I32(1), Value::I32(2)]),
            &set(vec![Value::I32(2), Value::I32(1)])
        ),
        Ok(true)
    );
    let map = |entries: Vec<(Value, Value)>| {
        Value::Container(ContainerValue::new("Map", ContainerShape::Map(entries)))
    };
    let m1 = map(vec![(Value::str("a"), Value::I32(1)), (Value::str("b"), Value::I32(2))]);
    let m2 = map(vec![(Value::str("b"), Value::I32(2)), (Value::str("a"), Value::I32(1))]);
    let m3 = map(vec![(Value::str("a"), Value::I32(1)), (Value::str("b"), Value::I32(3))]);
    assert_eq!(rt.equals(&m1, &m2), Ok(true));
    assert_eq!(rt.equals(&m1, &m3), Ok(false));
    assert_eq!(rt.hash_code(&m1), rt.hash_code(&m2));
}

#[test]
fn lists_respect_order_and_ignore_kind() {
    let rt = runtime();
    let list = ContainerValue::new("List", ContainerShape::Seq(vec![Value::I32(1), Value::I32(2)]));
    let reversed = ContainerValue::new("List", ContainerShape::Seq(vec![Value::I32(2), Value::I32(1)]));
    let immutable = list.rekinded("ImmutableList");
    assert_eq!(
        rt.equals(&Value::Container(list.clone()), &Value::Container(reversed)),
        Ok(false)
    );
    assert_eq!(
        rt.equals(&Value::Container(list), &Value::Container(immutable)),
        Ok(true)
    );
}

// === Hashing ===

#[test]
fn scalar_hashes() {
    let rt = runtime();
    assert_eq!(rt.hash_code(&Value::Bool(true)), Ok(1231));
    assert_eq!(rt.hash_code(&Value::I32(42)), Ok(42));
    assert_eq!(rt.hash_code(&Value::I64(1 << 32)), Ok(1));
    assert_eq!(rt.hash_code(&Value::str("ab")), Ok(97 * 31 + 98));
}

#[test]
fn user_hash_is_dispatched() {
    let rt = runtime();
    assert_eq!(rt.hash_code(&point(&rt, 1, 2)), Ok((31 + 1) * 31 + 2));
}

// === Rendering ===

#[test]
fn render_uses_user_operation_or_default() {
    let rt = runtime();
    assert_eq!(rt.render(&point(&rt, 1, 2)).as_deref(), Ok("Point(1, 2)"));
    let opaque = Value::Object(rt.allocate(&TypeTag::simple("Opaque")).unwrap());
    assert!(rt.render(&opaque).unwrap().starts_with("Opaque@"));
    let list = Value::Container(ContainerValue::new(
        "List",
        ContainerShape::Seq(vec![Value::I32(1), Value::Null]),
    ));
    assert_eq!(rt.render(&list).as_deref(), Ok("[1, null]"));
}

// === Copying ===

#[test]
fn copy_is_distinct_and_structurally_equal() {
    let rt = runtime();
    let a = point(&rt, 3, 4);
    let b = rt.copy(&a);
    assert!(!a.identical(&b));
    assert!(a.structurally_equal(&b));
    let s = Value::str("text");
    let t = rt.copy(&s);
    assert!(!s.identical(&t));
    assert!(s.structurally_equal(&t));
}

// === Instance ===

#[test]
fn instance_reports_unknown_member() {
    let rt = Runtime::new().with(
        TypeDef::record("Broken")
            .with_field(FieldDef::new("a", DeclaredType::named("i32")))
            .with_equals(|this, _| this.get("missing").map(|_| true)),
    );
    let obj = Value::Object(rt.allocate(&TypeTag::simple("Broken")).unwrap());
    assert_eq!(
        rt.equals(&obj, &obj),
        Err(InstanceError::UnknownMember {
            ty: Name::new("Broken"),
            member: Name::new("missing"),
        })
    );
}

#[test]
fn instance_reads_members_of_registered_objects() {
    let rt = runtime();
    let Value::Object(obj) = point(&rt, 3, 4) else {
        panic!("points are objects");
    };
    let this = rt.instance(&obj).unwrap();
    assert_eq!(this.get("y").map(|v| v.as_i32()), Ok(Some(4)));
    assert_eq!(this.hash_members(&["x", "y"]), Ok((31 + 3) * 31 + 4));

    let stray = ObjectRef::new(TypeTag::simple("Nowhere"), Vec::new());
    assert!(matches!(rt.instance(&stray), Err(AccessError::UnknownType(_))));
}

#[test]
fn enum_constants_by_ordinal() {
    let rt = runtime();
    let def = rt.lookup("Color").unwrap();
    let red = def.enum_constant(0).unwrap();
    let green = def.enum_constant(1).unwrap();
    assert!(def.enum_constant(2).is_none());
    assert_eq!(rt.equals(&red, &red.clone()), Ok(true));
    assert_eq!(rt.equals(&red, &green), Ok(false));
    assert_eq!(rt.render(&green).as_deref(), Ok("Green"));
}
