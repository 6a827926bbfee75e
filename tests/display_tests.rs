use argmap::{ArgList, ArgMap, Complex32, Duration, Timestamp, Variant};

#[test]
fn scalars() {
    assert_eq!(Variant::Null.to_string(), "null");
    assert_eq!(Variant::from(true).to_string(), "true");
    assert_eq!(Variant::from(-30).to_string(), "-30");
    assert_eq!(Variant::from(2.5f32).to_string(), "2.5");
    assert_eq!(Variant::from(1.25e100).to_string(), "1.25e+100");
    assert_eq!(Variant::from("hi").to_string(), r#""hi""#);
}

#[test]
fn escapes() {
    assert_eq!(
        Variant::from("a\"b\\c\nd\te").to_string(),
        r#""a\"b\\c\nd\te""#
    );
    assert_eq!(Variant::from("\u{1}").to_string(), r#""\u0001""#);
}

#[test]
fn times() {
    let m = ArgMap::new();
    m.set("t", Timestamp::from_millis(1125));
    assert_eq!(m.to_string(), r#"{"t":1.125}"#);

    m.set("t", Duration::from_secs(-2));
    assert_eq!(m.to_string(), r#"{"t":-2}"#);
}

#[test]
fn maps_sort_and_skip_nulls() {
    let m = ArgMap::new();
    m.set("b", 2);
    m.set("a", 1);
    m.set("n", Variant::Null);
    assert_eq!(m.to_string(), r#"{"a":1,"b":2}"#);
    assert_eq!(ArgMap::new().to_string(), "{}");
}

#[test]
fn lists_and_vectors() {
    let list = ArgList::new();
    list.push(1);
    list.push("hi");
    list.push(Variant::Null);
    assert_eq!(list.to_string(), r#"[1,"hi",null]"#);

    let m = ArgMap::new();
    m.set("v", vec![1i16, 2, 3]);
    m.set("s", vec!["x".to_owned()]);
    m.set("c32", vec![Complex32::new(1.0, 2.0), Complex32::new(3.0, 5.0)]);
    assert_eq!(
        m.to_string(),
        r#"{"c32":["(1,2)","(3,5)"],"s":["x"],"v":[1,2,3]}"#
    );
}

#[test]
fn list_of_maps() {
    let m = ArgMap::new();
    let v = ArgList::new();
    v.push(ArgMap::from([("i32", 1234)]));
    v.push(ArgMap::from([("i32", 4321)]));
    m.set("v", v);
    assert_eq!(m.to_string(), r#"{"v":[{"i32":1234},{"i32":4321}]}"#);
}
