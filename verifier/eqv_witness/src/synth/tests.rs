use super::*;
use crate::{CachedValueProvider, FactoryRegistry, PrefabValues};
use eqv_ir::{DeclaredType, FieldDef, FieldFlags, Runtime, TypeDef};
use pretty_assertions::assert_eq;

fn runtime() -> Runtime {
    Runtime::new()
        .with(TypeDef::enumeration("Empty", Vec::<&str>::new()))
        .with(TypeDef::enumeration("Unit", ["Only"]))
        .with(TypeDef::enumeration("Color", ["Red", "Green", "Blue"]))
        .with(TypeDef::abstract_type("Shape"))
        .with(
            TypeDef::record("Pair")
                .with_params(["A", "B"])
                .with_field(FieldDef::new("first", DeclaredType::param("A")))
                .with_field(FieldDef::new("second", DeclaredType::param("B")))
                .with_field(FieldDef::constant(
                    "TAG",
                    DeclaredType::named("String"),
                    Value::str("pair"),
                ))
                .with_field(
                    FieldDef::new("instances", DeclaredType::named("i32"))
                        .with_flags(FieldFlags::STATIC),
                ),
        )
}

fn synthesize(rt: &Runtime, tag: &TypeTag) -> Result<WitnessTriple, WitnessError> {
    let registry = FactoryRegistry::with_defaults();
    let prefab = PrefabValues::new();
    let provider = CachedValueProvider::new(rt, &registry, &prefab);
    StructuralSynthesizer.synthesize(tag, &provider, &RecursionGuard::new())
}

// === Enumerations ===

#[test]
fn enum_with_no_constants_is_absent() {
    let rt = runtime();
    let triple = synthesize(&rt, &TypeTag::simple("Empty")).unwrap();
    assert!(triple.primary.is_null());
    assert!(triple.alternate.is_null());
    assert!(triple.primary_copy.is_null());
}

#[test]
fn enum_with_one_constant_repeats_it() {
    let rt = runtime();
    let triple = synthesize(&rt, &TypeTag::simple("Unit")).unwrap();
    assert!(triple.is_degenerate());
    assert_eq!(triple.primary.as_enum().map(|c| c.name.as_str()), Some("Only"));
}

#[test]
fn enum_uses_first_two_constants() {
    let rt = runtime();
    let triple = synthesize(&rt, &TypeTag::simple("Color")).unwrap();
    let name = |v: &Value| v.as_enum().map(|c| c.name.to_string());
    assert_eq!(name(&triple.primary).as_deref(), Some("Red"));
    assert_eq!(name(&triple.alternate).as_deref(), Some("Green"));
    assert!(triple.primary_copy.identical(&triple.primary));
}

// === Arrays ===

#[test]
fn arrays_hold_one_element_witness() {
    let rt = runtime();
    let triple = synthesize(&rt, &TypeTag::array_of(TypeTag::simple("i32"))).unwrap();
    let cells = |v: &Value| v.as_array().map(ArrayRef::cells).unwrap_or_default();
    assert_eq!(cells(&triple.primary).len(), 1);
    assert_eq!(cells(&triple.primary)[0].as_i32(), Some(1));
    assert_eq!(cells(&triple.alternate)[0].as_i32(), Some(2));
    assert!(!triple.primary.identical(&triple.primary_copy));
    assert!(triple.primary.structurally_equal(&triple.primary_copy));
}

// === Records ===

#[test]
fn record_members_follow_generic_arguments() {
    let rt = runtime();
    let tag = TypeTag::of("Pair", [TypeTag::simple("String"), TypeTag::simple("bool")]);
    let triple = synthesize(&rt, &tag).unwrap();
    let slots = |v: &Value| v.as_object().map(eqv_ir::ObjectRef::slots).unwrap_or_default();

    let primary = slots(&triple.primary);
    let alternate = slots(&triple.alternate);
    assert_eq!(primary[0].as_str(), Some("one"));
    assert_eq!(alternate[0].as_str(), Some("two"));
    assert_eq!(primary[1].as_bool(), Some(true));
    assert_eq!(alternate[1].as_bool(), Some(false));
}

#[test]
fn record_leaves_constant_and_static_members_alone() {
    let rt = runtime();
    let tag = TypeTag::of("Pair", [TypeTag::simple("i32"), TypeTag::simple("i32")]);
    let triple = synthesize(&rt, &tag).unwrap();
    for value in [&triple.primary, &triple.alternate, &triple.primary_copy] {
        let slots = value.as_object().map(eqv_ir::ObjectRef::slots).unwrap_or_default();
        assert_eq!(slots[2].as_str(), Some("pair"));
        assert_eq!(slots[3].as_i32(), Some(0));
    }
}

#[test]
fn record_copy_is_distinct_and_equal() {
    let rt = runtime();
    let tag = TypeTag::of("Pair", [TypeTag::simple("i64"), TypeTag::simple("char")]);
    let triple = synthesize(&rt, &tag).unwrap();
    assert!(!triple.is_degenerate());
    assert!(!triple.primary.identical(&triple.primary_copy));
    assert!(triple.primary.structurally_equal(&triple.primary_copy));
}

#[test]
fn raw_generic_usage_falls_back_to_top() {
    let rt = runtime();
    let triple = synthesize(&rt, &TypeTag::simple("Pair")).unwrap();
    let slots = triple.primary.as_object().map(eqv_ir::ObjectRef::slots).unwrap_or_default();
    assert_eq!(slots[0].as_str(), Some("one"));
}

// === Failures ===

#[test]
fn abstract_and_unknown_types_are_unresolvable() {
    let rt = runtime();
    assert!(matches!(
        synthesize(&rt, &TypeTag::simple("Shape")),
        Err(WitnessError::UnresolvableType { .. })
    ));
    assert!(matches!(
        synthesize(&rt, &TypeTag::simple("Nowhere")),
        Err(WitnessError::UnresolvableType { .. })
    ));
}
