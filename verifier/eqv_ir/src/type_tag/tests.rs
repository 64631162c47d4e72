use super::*;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn map_of(k: &str, v: &str) -> TypeTag {
    TypeTag::of(builtin::MAP, [TypeTag::simple(k), TypeTag::simple(v)])
}

// === Construction ===

#[test]
fn simple_tag_has_no_arguments() {
    let tag = TypeTag::simple("Point");
    assert_eq!(tag.raw().as_str(), "Point");
    assert!(tag.args().is_empty());
    assert!(!tag.is_array());
}

#[test]
fn argument_beyond_arity_is_top() {
    let list = TypeTag::simple(builtin::LIST);
    assert_eq!(list.generic_argument_at(0), TypeTag::top());
    assert_eq!(map_of("String", "i32").generic_argument_at(5), TypeTag::top());
}

#[test]
fn array_component() {
    let array = TypeTag::array_of(TypeTag::simple("i32"));
    assert!(array.is_array());
    assert_eq!(array.component(), Some(TypeTag::simple("i32")));
    assert_eq!(TypeTag::simple("i32").component(), None);
}

#[test]
fn primitive_kind_lookup() {
    assert_eq!(TypeTag::simple("f64").primitive_kind(), Some(PrimitiveKind::F64));
    assert_eq!(TypeTag::simple("Point").primitive_kind(), None);
}

// === Display ===

#[test]
fn display_generic_and_array() {
    assert_eq!(map_of("String", "i32").to_string(), "Map<String, i32>");
    assert_eq!(
        TypeTag::array_of(TypeTag::array_of(TypeTag::simple("char"))).to_string(),
        "char[][]"
    );
}

// === Equality ===

#[test]
fn equality_is_structural_over_arguments() {
    assert_eq!(map_of("String", "i32"), map_of("String", "i32"));
    assert_ne!(map_of("String", "i32"), map_of("i32", "String"));
    assert_ne!(TypeTag::simple(builtin::LIST), TypeTag::of(builtin::LIST, [TypeTag::top()]));
}

// === Resolution ===

#[test]
fn resolve_substitutes_params_by_position() {
    let params = [Name::new("K"), Name::new("V")];
    let enclosing = TypeTag::of("Pair", [TypeTag::simple("String"), TypeTag::simple("i64")]);

    let declared = DeclaredType::generic(
        builtin::LIST,
        [DeclaredType::param("V")],
    );
    assert_eq!(
        declared.resolve(&params, &enclosing),
        TypeTag::of(builtin::LIST, [TypeTag::simple("i64")])
    );

    let array = DeclaredType::array(DeclaredType::param("K"));
    assert_eq!(
        array.resolve(&params, &enclosing),
        TypeTag::array_of(TypeTag::simple("String"))
    );
}

#[test]
fn unresolved_param_is_top() {
    let params = [Name::new("T")];
    let raw_usage = TypeTag::simple("Box");
    assert_eq!(DeclaredType::param("T").resolve(&params, &raw_usage), TypeTag::top());
    assert_eq!(DeclaredType::param("U").resolve(&params, &raw_usage), TypeTag::top());
}

#[test]
fn declared_type_from_tag_resolves_back() {
    let tag = TypeTag::array_of(map_of("String", "i32"));
    let declared = DeclaredType::from(&tag);
    assert_eq!(declared.resolve(&[], &TypeTag::top()), tag);
}

// === Properties ===

fn arb_tag() -> impl Strategy<Value = TypeTag> {
    let leaf = prop::sample::select(vec!["i32", "String", "Point", "bool"]).prop_map(TypeTag::simple);
    leaf.prop_recursive(3, 16, 3, |inner| {
        prop_oneof![
            (
                prop::sample::select(vec!["List", "Map", "Table"]),
                prop::collection::vec(inner.clone(), 0..3)
            )
                .prop_map(|(raw, args)| TypeTag::of(raw, args)),
            inner.prop_map(TypeTag::array_of),
        ]
    })
}

proptest! {
    #[test]
    fn rebuilt_tag_is_equal_and_hashes_equal(tag in arb_tag()) {
        use std::hash::{BuildHasher, BuildHasherDefault};
        let rebuilt = DeclaredType::from(&tag).resolve(&[], &TypeTag::top());
        prop_assert_eq!(&rebuilt, &tag);
        let hasher = BuildHasherDefault::<rustc_hash::FxHasher>::default();
        prop_assert_eq!(hasher.hash_one(&rebuilt), hasher.hash_one(&tag));
    }

    #[test]
    fn display_distinguishes_unequal_tags(a in arb_tag(), b in arb_tag()) {
        if a != b {
            prop_assert_ne!(a.to_string(), b.to_string());
        }
    }
}
