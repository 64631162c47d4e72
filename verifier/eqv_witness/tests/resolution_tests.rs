#![allow(clippy::unwrap_used, clippy::expect_used)]
//! End-to-end witness resolution over small type graphs.

use eqv_ir::{builtin, DeclaredType, FieldDef, Runtime, TypeDef, TypeTag, Value};
use eqv_witness::{
    CachedValueProvider, FactoryRegistry, PrefabValues, RecursionGuard, ValueProvider,
    WitnessError,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn runtime() -> Runtime {
    Runtime::new()
        .with(TypeDef::enumeration("Suit", ["Hearts", "Spades"]))
        .with(
            TypeDef::record("Card")
                .with_field(FieldDef::fixed("suit", DeclaredType::named("Suit")))
                .with_field(FieldDef::fixed("rank", DeclaredType::named("i32"))),
        )
        .with(
            TypeDef::record("Hand")
                .with_field(FieldDef::fixed(
                    "cards",
                    DeclaredType::generic(builtin::LIST, [DeclaredType::named("Card")]),
                ))
                .with_field(FieldDef::fixed(
                    "scores",
                    DeclaredType::generic(
                        builtin::MAP,
                        [DeclaredType::named("String"), DeclaredType::named("f64")],
                    ),
                )),
        )
        // Parent -> children: List<Child> -> Child.parent: Parent
        .with(
            TypeDef::record("Parent")
                .with_field(FieldDef::new("name", DeclaredType::named("String")))
                .with_field(FieldDef::new(
                    "children",
                    DeclaredType::generic(builtin::LIST, [DeclaredType::named("Child")]),
                )),
        )
        .with(
            TypeDef::record("Child")
                .with_field(FieldDef::new("age", DeclaredType::named("i32")))
                .with_field(FieldDef::new("parent", DeclaredType::named("Parent"))),
        )
        .with(
            TypeDef::record("Root").with_field(FieldDef::new("parent", DeclaredType::named("Parent"))),
        )
}

/// `Link0 -> Link1 -> ... -> LinkN`, no cycles.
fn chain_runtime(depth: usize) -> Runtime {
    let mut rt = Runtime::new();
    for i in 0..depth {
        let mut def = TypeDef::record(format!("Link{i}"))
            .with_field(FieldDef::new("n", DeclaredType::named("i32")));
        if i + 1 < depth {
            def = def.with_field(FieldDef::new("next", DeclaredType::named(format!("Link{}", i + 1))));
        }
        rt.define(def);
    }
    rt
}

#[test]
fn mutual_recursion_names_each_type_once() {
    let rt = runtime();
    let registry = FactoryRegistry::with_defaults();
    let prefab = PrefabValues::new();
    let provider = CachedValueProvider::new(&rt, &registry, &prefab);

    let err = provider
        .resolve(&TypeTag::simple("Root"), &RecursionGuard::new())
        .unwrap_err();
    let WitnessError::CycleDetected { chain } = err else {
        panic!("expected a cycle, got {err:?}");
    };
    assert_eq!(
        chain,
        vec![
            TypeTag::simple("Parent"),
            TypeTag::of(builtin::LIST, [TypeTag::simple("Child")]),
            TypeTag::simple("Child"),
        ]
    );
}

#[test]
fn prefab_parent_breaks_mutual_recursion() {
    let rt = runtime();
    let registry = FactoryRegistry::with_defaults();
    let parent = TypeTag::simple("Parent");
    let red = rt.allocate(&parent).unwrap();
    red.set_slot(0, Value::str("red"));
    let blue = rt.allocate(&parent).unwrap();
    blue.set_slot(0, Value::str("blue"));
    let mut prefab = PrefabValues::new();
    prefab
        .register(&rt, parent, Value::Object(red), Value::Object(blue))
        .unwrap();

    let provider = CachedValueProvider::new(&rt, &registry, &prefab);
    let triple = provider
        .resolve(&TypeTag::simple("Root"), &RecursionGuard::new())
        .unwrap();
    assert!(!triple.is_degenerate());
}

#[test]
fn nested_generic_record_resolves() {
    let rt = runtime();
    let registry = FactoryRegistry::with_defaults();
    let prefab = PrefabValues::new();
    let provider = CachedValueProvider::new(&rt, &registry, &prefab);
    let triple = provider
        .resolve(&TypeTag::simple("Hand"), &RecursionGuard::new())
        .unwrap();
    assert!(!triple.is_degenerate());
    assert!(triple.primary.structurally_equal(&triple.primary_copy));
    assert!(!triple.primary.identical(&triple.primary_copy));
}

#[test]
fn long_acyclic_chain_resolves() {
    let rt = chain_runtime(2_000);
    let registry = FactoryRegistry::with_defaults();
    let prefab = PrefabValues::new();
    let provider = CachedValueProvider::new(&rt, &registry, &prefab);
    let triple = provider
        .resolve(&TypeTag::simple("Link0"), &RecursionGuard::new())
        .unwrap();
    assert!(!triple.is_degenerate());
}

fn tags() -> Vec<TypeTag> {
    vec![
        TypeTag::simple(builtin::BOOL),
        TypeTag::simple(builtin::I64),
        TypeTag::simple(builtin::F32),
        TypeTag::simple(builtin::STRING),
        TypeTag::simple("Suit"),
        TypeTag::simple("Card"),
        TypeTag::simple("Hand"),
        TypeTag::array_of(TypeTag::simple("Card")),
        TypeTag::of(builtin::SET, [TypeTag::simple("Suit")]),
        TypeTag::of(
            builtin::TABLE,
            [TypeTag::simple("i32"), TypeTag::simple("char"), TypeTag::simple("Card")],
        ),
        TypeTag::of(builtin::IMMUTABLE_SET, [TypeTag::simple(builtin::STRING)]),
    ]
}

proptest! {
    #[test]
    fn give_other_is_an_involution(tag in prop::sample::select(tags())) {
        let rt = runtime();
        let registry = FactoryRegistry::with_defaults();
        let prefab = PrefabValues::new();
        let provider = CachedValueProvider::new(&rt, &registry, &prefab);
        let guard = RecursionGuard::new();
        let triple = provider.resolve(&tag, &guard).unwrap();

        prop_assert!(!triple.is_degenerate());
        let from_primary = provider.give_other(&tag, &triple.primary, &guard).unwrap();
        let from_alternate = provider.give_other(&tag, &triple.alternate, &guard).unwrap();
        prop_assert!(from_primary.structurally_equal(&triple.alternate));
        prop_assert!(from_alternate.structurally_equal(&triple.primary));
    }

    #[test]
    fn copies_are_equal_but_distinct(tag in prop::sample::select(tags())) {
        let rt = runtime();
        let registry = FactoryRegistry::with_defaults();
        let prefab = PrefabValues::new();
        let provider = CachedValueProvider::new(&rt, &registry, &prefab);
        let triple = provider.resolve(&tag, &RecursionGuard::new()).unwrap();
        prop_assert!(triple.primary.structurally_equal(&triple.primary_copy));
    }
}
