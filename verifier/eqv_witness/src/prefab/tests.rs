use super::*;
use eqv_ir::{DeclaredType, FieldDef, TypeDef};
use pretty_assertions::assert_eq;

fn runtime() -> Runtime {
    Runtime::new().with(
        TypeDef::record("Always")
            .with_field(FieldDef::new("n", DeclaredType::named("i32")))
            .with_equals(|_, _| Ok(true))
            .with_hash(|_| Ok(0)),
    )
}

fn always(rt: &Runtime, n: i32) -> Value {
    let Ok(obj) = rt.allocate(&TypeTag::simple("Always")) else {
        return Value::Null;
    };
    obj.set_slot(0, Value::I32(n));
    Value::Object(obj)
}

#[test]
fn exact_tag_before_raw_name() {
    let rt = runtime();
    let list_of_i32 = TypeTag::of("List", [TypeTag::simple("i32")]);
    let mut prefab = PrefabValues::new();
    prefab
        .insert(list_of_i32.clone(), Value::I32(1), Value::I32(2))
        .insert_raw("List", Value::I32(7), Value::I32(8));

    let exact = prefab.get(&rt, &list_of_i32);
    assert_eq!(exact.map(|t| t.primary.as_i32()), Some(Some(1)));

    let by_raw = prefab.get(&rt, &TypeTag::of("List", [TypeTag::simple("String")]));
    assert_eq!(by_raw.map(|t| t.primary.as_i32()), Some(Some(7)));

    assert!(prefab.get(&rt, &TypeTag::simple("Set")).is_none());
    assert_eq!(prefab.len(), 2);
}

#[test]
fn rejects_null_identical_and_equal_pairs() {
    let rt = runtime();
    let mut prefab = PrefabValues::new();
    let tag = TypeTag::simple("String");

    let null = prefab.register(&rt, tag.clone(), Value::Null, Value::str("a"));
    assert!(matches!(null, Err(WitnessError::InvalidPrefab { reason: "values must not be null", .. })));

    let same = prefab.register(&rt, tag.clone(), Value::str("a"), Value::str("a"));
    assert!(matches!(same, Err(WitnessError::InvalidPrefab { reason: "the two values are identical", .. })));

    let equal = prefab.register(
        &rt,
        TypeTag::simple("Always"),
        always(&rt, 1),
        always(&rt, 2),
    );
    assert!(matches!(equal, Err(WitnessError::InvalidPrefab { reason: "the two values are equal", .. })));

    assert!(prefab.is_empty());
    assert!(prefab.register(&rt, tag, Value::str("a"), Value::str("b")).is_ok());
}

#[test]
fn validate_reports_unchecked_inserts() {
    let rt = runtime();
    let mut prefab = PrefabValues::new();
    prefab.insert_raw("String", Value::str("x"), Value::str("x"));
    assert!(prefab.validate(&rt).is_err());
}

#[test]
fn merge_prefers_right_side() {
    let rt = runtime();
    let mut left = PrefabValues::new();
    left.insert_raw("String", Value::str("l1"), Value::str("l2"));
    let mut right = PrefabValues::new();
    right.insert_raw("String", Value::str("r1"), Value::str("r2"));
    let merged = left.merge(&right);
    let triple = merged.get(&rt, &TypeTag::simple("String"));
    assert_eq!(
        triple.as_ref().and_then(|t| t.primary.as_str()),
        Some("r1")
    );
}
