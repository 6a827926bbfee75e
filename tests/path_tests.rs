use argmap::{ArgList, ArgMap, PATH_DELIMITER, VALUE_KEY, Variant};

#[test]
fn set_by_path() {
    let m2 = ArgMap::new();
    m2.set("abc|2|x", 12345);
    assert_eq!(m2.get("abc|2|x", -1), 12345);

    // The intermediate list is padded with nulls
    let list = m2.get("abc", ArgList::new());
    assert_eq!(list.len(), 3);
    assert!(list.get_variant(0).is_none());
    assert!(list.get_variant(1).is_none());
    assert_eq!(list.get(2, ArgMap::new()).get("x", -1), 12345);

    let m = ArgMap::new();
    m.set("abc|xyz", 12345);
    let m1 = m.get("abc", ArgMap::new());
    assert_eq!(m1.len(), 1);
    assert_eq!(m1.get("xyz", -1), 12345);

    // The container already exists
    m.set("abc|xyz", 54321);
    assert_eq!(m1.get("xyz", -1), 54321);

    // A scalar in the way moves under "value"
    m.set("abc|xyz|def", 112233);
    assert_eq!(m.get("abc|xyz", -1), 54321);
    assert_eq!(m.get("abc|xyz|def", -1), 112233);
    assert_eq!(m.get(&format!("abc|xyz|{VALUE_KEY}"), -1), 54321);

    m.set("qqq", 123);
    assert_eq!(m.get("qqq", -1), 123);
    m.set("qqq", 456);
    assert_eq!(m.get("qqq", -1), 456);
}

#[test]
fn oversized_index_is_dropped() {
    let m = ArgMap::new();
    m.set("cfg|18446744073709551615", 1);
    m.set("cfg|99999999999999999999", 2);
    assert!(!m.contains_key("cfg|18446744073709551615"));
    assert_eq!(m.get("cfg|99999999999999999999", -1), -1);

    m.set("list|0", "a");
    m.set("list|99999999999999999999|x", "b");
    assert_eq!(m.get("list", ArgList::new()).len(), 1);
    assert_eq!(m.get_str("list|0", ""), "a");
}

#[test]
fn exact_key_wins() {
    // Collecting stores keys verbatim, delimiter included
    let m = ArgMap::from([
        ("a", Variant::from(ArgMap::from([("b", 1)]))),
        ("a|b", Variant::from(2)),
    ]);

    assert_eq!(m.get("a|b", -1), 2);
    m.set("a|b", 3);
    assert_eq!(m.get("a|b", -1), 3);
    assert!(m.contains_key("a|b"));

    // The nested entry was untouched
    assert_eq!(m.get("a", ArgMap::new()).get("b", -1), 1);
    assert_eq!(PATH_DELIMITER, '|');
}

#[test]
fn missing_paths_read_default() {
    let m = ArgMap::new();
    m.set("a|b", 1);

    assert_eq!(m.get("a|c", -1), -1);
    assert_eq!(m.get("x|b", -1), -1);
    assert_eq!(m.get("a|b|c", -1), -1);
    assert_eq!(m.get("a|0", -1), -1);
    assert_eq!(m.get_str("a|", "V"), "V");
    assert!(m.get_variant("a|c").is_none());
}

#[test]
fn list_index_through_map_is_dropped() {
    let m = ArgMap::new();
    m.set("a|x", 1);

    // "a" holds a map, which cannot be indexed
    m.set("a|0", 2);
    assert_eq!(m.get("a|0", -1), -1);
    assert_eq!(m.get("a|x", -1), 1);
}

#[test]
fn paths_into_lists() {
    let m = ArgMap::new();
    m.set("l|1", "one");
    m.set("l|0|name", "zero");

    assert_eq!(m.get_str("l|1", ""), "one");
    assert_eq!(m.get_str("l|0|name", ""), "zero");
    assert_eq!(m.get("l", ArgList::new()).len(), 2);

    // Out of range and non-numeric segments resolve to nothing
    assert!(m.get_variant("l|5").is_none());
    assert!(m.get_variant("l|name").is_none());
}

#[test]
fn deep_paths_create_maps() {
    let m = ArgMap::new();
    m.set("a|b|c|d", 1.5);
    assert_eq!(m.get("a|b|c|d", 0.0), 1.5);

    let b = m.get("a|b", ArgMap::new());
    assert_eq!(b.get("c|d", 0.0), 1.5);
    assert_eq!(m.to_string(), r#"{"a":{"b":{"c":{"d":1.5}}}}"#);
}
