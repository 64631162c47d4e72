use super::*;
use pretty_assertions::assert_eq;

fn tag(name: &str) -> TypeTag {
    TypeTag::simple(name)
}

#[test]
fn push_leaves_original_untouched() {
    let root = RecursionGuard::new().push(tag("A"));
    let left = root.push(tag("B"));
    let right = root.push(tag("C"));

    assert_eq!(root.len(), 1);
    assert!(left.contains(&tag("B")));
    assert!(!left.contains(&tag("C")));
    assert!(right.contains(&tag("C")));
    assert!(!right.contains(&tag("B")));
}

#[test]
fn cycle_starts_at_first_occurrence() {
    let guard = RecursionGuard::new()
        .push(tag("Root"))
        .push(tag("Node"))
        .push(tag("Edge"));
    assert_eq!(guard.cycle_from(&tag("Node")), Some(vec![tag("Node"), tag("Edge")]));
    assert_eq!(guard.cycle_from(&tag("Leaf")), None);
}

#[test]
fn generic_instantiations_are_distinct_entries() {
    let list_of_a = TypeTag::of("List", [tag("A")]);
    let guard = RecursionGuard::new().push(list_of_a.clone());
    assert!(guard.contains(&list_of_a));
    assert!(!guard.contains(&TypeTag::of("List", [tag("B")])));
    assert!(!guard.contains(&tag("List")));
}
