use super::*;
use crate::{CachedValueProvider, FactoryRegistry, PrefabValues};
use eqv_ir::{DeclaredType, FieldDef, TypeDef};
use pretty_assertions::assert_eq;

fn runtime() -> Runtime {
    Runtime::new().with(
        TypeDef::record("Account")
            .with_field(FieldDef::fixed("id", DeclaredType::named("i64")))
            .with_field(FieldDef::new("owner", DeclaredType::named("String")))
            .with_field(
                FieldDef::new("cache", DeclaredType::named("i32")).with_flags(FieldFlags::TRANSIENT),
            )
            .with_field(FieldDef::constant(
                "KIND",
                DeclaredType::named("String"),
                Value::str("account"),
            ))
            .with_field(
                FieldDef::new("COUNT", DeclaredType::named("i32"))
                    .with_flags(FieldFlags::STATIC)
                    .with_initializer(Value::I32(7)),
            ),
    )
}

fn account(rt: &Runtime) -> InstanceAccessor<'_> {
    InstanceAccessor::allocate(rt, &TypeTag::simple("Account")).unwrap()
}

#[test]
fn members_follow_declaration_order() {
    let rt = runtime();
    let acc = account(&rt);
    let names: Vec<&str> = acc.members().iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["id", "owner", "cache", "KIND", "COUNT"]);
    assert!(acc.member("cache").unwrap().is_transient());
    assert!(acc.member("KIND").unwrap().is_skipped());
    assert!(acc.member("COUNT").unwrap().is_skipped());
    assert!(acc.member("id").unwrap().is_non_nullable_primitive());
    assert!(!acc.member("owner").unwrap().is_non_nullable_primitive());
}

#[test]
fn set_and_default_out() {
    let rt = runtime();
    let acc = account(&rt);
    let owner = acc.member("owner").unwrap().clone();
    acc.set(&owner, Value::str("ada")).unwrap();
    assert_eq!(acc.get(&owner).as_str(), Some("ada"));
    acc.default_out(&owner).unwrap();
    assert!(acc.get(&owner).is_null());

    let id = acc.member("id").unwrap().clone();
    acc.set(&id, Value::I64(5)).unwrap();
    acc.default_out(&id).unwrap();
    assert_eq!(acc.get(&id).as_i64(), Some(0));
}

#[test]
fn static_and_constant_members_are_refused() {
    let rt = runtime();
    let acc = account(&rt);
    let kind = acc.member("KIND").unwrap().clone();
    let count = acc.member("COUNT").unwrap().clone();
    assert!(matches!(
        acc.set(&kind, Value::str("other")),
        Err(AccessError::Refused { .. })
    ));
    assert!(matches!(acc.default_out(&count), Err(AccessError::Refused { .. })));
    assert_eq!(acc.get(&kind).as_str(), Some("account"));
    assert_eq!(acc.get(&count).as_i32(), Some(7));
}

#[test]
fn copy_is_a_distinct_instance() {
    let rt = runtime();
    let acc = account(&rt);
    let owner = acc.member("owner").unwrap().clone();
    acc.set(&owner, Value::str("ada")).unwrap();

    let copy = acc.copy();
    assert!(!copy.subject().ptr_eq(acc.subject()));
    assert!(copy.value().structurally_equal(&acc.value()));

    copy.set(&owner, Value::str("grace")).unwrap();
    assert_eq!(acc.get(&owner).as_str(), Some("ada"));
}

#[test]
fn change_member_toggles_between_witnesses() {
    let rt = runtime();
    let registry = FactoryRegistry::with_defaults();
    let prefab = PrefabValues::new();
    let provider = CachedValueProvider::new(&rt, &registry, &prefab);
    let guard = RecursionGuard::new();
    let acc = account(&rt);
    let owner = acc.member("owner").unwrap().clone();

    acc.change_member(&owner, &provider, &guard).unwrap();
    assert_eq!(acc.get(&owner).as_str(), Some("one"));
    acc.change_member(&owner, &provider, &guard).unwrap();
    assert_eq!(acc.get(&owner).as_str(), Some("two"));
    acc.change_member(&owner, &provider, &guard).unwrap();
    assert_eq!(acc.get(&owner).as_str(), Some("one"));
}

#[test]
fn copy_member_from_other_instance() {
    let rt = runtime();
    let a = account(&rt);
    let b = account(&rt);
    let id = a.member("id").unwrap().clone();
    b.set(&id, Value::I64(42)).unwrap();
    a.copy_member_from(&b, &id).unwrap();
    assert_eq!(a.get(&id).as_i64(), Some(42));
}

#[test]
fn non_objects_cannot_be_wrapped() {
    let rt = runtime();
    assert_eq!(
        InstanceAccessor::of(&rt, &Value::I32(1)).unwrap_err(),
        AccessError::NotAnObject {
            found: "i32".to_owned()
        }
    );
}
