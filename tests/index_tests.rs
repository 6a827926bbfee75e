use argmap::{ArgList, ArgMap, Variant};

fn create_map_with_list() -> Variant {
    // Root map with list "li" [1, 2, 3] and "num" = 42
    let map = ArgMap::new();
    map.set("li", ArgList::from_iter([1, 2, 3]));
    map.set("num", 42);
    Variant::from(map)
}

#[test]
fn index_usize_on_list() {
    let root = Variant::from(ArgList::from_iter([1, 2, 3]));
    assert_eq!(root.at(0_usize).and_then(|v| v.get::<i32>()), Some(1));
    assert_eq!(root.at(1_usize).and_then(|v| v.get::<i32>()), Some(2));
    assert_eq!(root.at(2_usize).and_then(|v| v.get::<i32>()), Some(3));
    assert!(root.at(3_usize).is_none());
}

#[test]
fn index_str_on_map() {
    let root = create_map_with_list();
    assert!(root.at("li").is_some());
    assert_eq!(root.at("num").and_then(|v| v.get::<i32>()), Some(42));
    assert!(root.at("nonexistent").is_none());
}

#[test]
fn index_string_on_map() {
    let root = create_map_with_list();
    let key = String::from("num");
    assert_eq!(root.at(&key).and_then(|v| v.get::<i32>()), Some(42));
    assert_eq!(root.at(key).and_then(|v| v.get::<i32>()), Some(42));
}

#[test]
fn nested_index() {
    let root = create_map_with_list();
    let list = root.at("li").unwrap();
    assert_eq!(list.at(0_usize).and_then(|v| v.get::<i32>()), Some(1));
    assert_eq!(list.at(2_usize).and_then(|v| v.get::<i32>()), Some(3));
}

#[test]
fn index_wrong_container() {
    let root = create_map_with_list();
    // Maps are not indexed by position
    assert!(root.at(0_usize).is_none());

    let list = root.at("li").unwrap();
    // Lists are not indexed by key
    assert!(list.at("0").is_none());

    // Scalars have no children
    let num = root.at("num").unwrap();
    assert!(num.at(0_usize).is_none());
    assert!(num.at("x").is_none());
    assert!(Variant::Null.at("x").is_none());
}

#[test]
fn index_does_not_resolve_paths() {
    let map = ArgMap::new();
    map.set("a|b", 1);
    let root = Variant::from(map);
    assert!(root.at("a|b").is_none());
    assert!(root.at("a").is_some());
}

#[test]
fn null_elements_are_absent() {
    let list = ArgList::with_len(2);
    list.set(1, "x");
    let root = Variant::from(list);
    assert!(root.at(0_usize).is_none());
    assert_eq!(root.at(1_usize).and_then(|v| v.get::<String>()).as_deref(), Some("x"));
}
