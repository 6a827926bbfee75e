use argmap::{
    ArgList, ArgMap, CodecConfig, Complex32, Decoder, Duration, Encoder, Error, SharedVec,
    Timestamp, Variant, VariantType,
};

fn round_trip(map: &ArgMap) -> ArgMap {
    let bytes = map.to_vec();
    let mut decoder = Decoder::new(&bytes);
    let decoded = decoder.decode();
    assert!(decoder.error().is_none(), "{:?}", decoder.error());
    assert_eq!(decoder.position(), bytes.len());
    decoded
}

fn single(key: &str, value: impl Into<Variant>) -> Vec<u8> {
    let map = ArgMap::new();
    map.set(key, value);
    map.to_vec()
}

#[test]
fn cbor_example() {
    let map = ArgMap::new();
    map.set("count", 1234u16);
    map.set("name", "Glenn");

    let mut buf = [0u8; 128];
    let mut encoder = Encoder::new(&mut buf);
    let len = encoder.encode(&map).unwrap();
    assert_eq!(len, 21);
    assert_eq!(encoder.bytes_serialized(), 21);
    assert_eq!(encoder.bytes_needed(), 21);
    assert!(encoder.result().is_ok());
    assert_eq!(encoder.as_bytes()[0], 0xa2);

    let decoded = ArgMap::from_slice(&buf[..len]);
    assert_eq!(decoded.get("count", 0u16), 1234);
    assert_eq!(decoded.get_str("name", ""), "Glenn");
    assert_eq!(
        decoded.get_variant("count").map(|v| v.type_tag()),
        Some(VariantType::UInt16)
    );
}

#[test]
fn buffer_too_small_measures() {
    let map = ArgMap::from([("count", Variant::from(1234u16)), ("name", Variant::from("Glenn"))]);

    let mut small = [0u8; 4];
    let mut encoder = Encoder::new(&mut small);
    match encoder.encode(&map) {
        Err(Error::BufferTooSmall { needed, capacity }) => {
            assert_eq!(needed, 21);
            assert_eq!(capacity, 4);
        }
        other => panic!("expected BufferTooSmall, got {other:?}"),
    }
    assert!(encoder.bytes_serialized() <= 4);
    assert_eq!(encoder.bytes_needed(), 21);
    assert_eq!(map.encoded_len(), 21);

    // Retry with a buffer of the reported size
    let mut buf = vec![0u8; encoder.bytes_needed()];
    let mut retry = Encoder::new(&mut buf);
    assert_eq!(retry.encode(&map).unwrap(), 21);
    assert_eq!(ArgMap::from_slice(&buf), map);
}

#[test]
fn encoder_restart_and_init_buffer() {
    let map = ArgMap::from([("a", 1u8)]);
    let mut first = [0u8; 16];
    let mut second = [0u8; 16];

    let mut encoder = Encoder::new(&mut first);
    assert_eq!(encoder.encode(&map).unwrap(), 4);
    // Encoding again appends
    assert_eq!(encoder.encode(&map).unwrap(), 8);
    encoder.restart();
    assert_eq!(encoder.encode(&map).unwrap(), 4);

    encoder.init_buffer(&mut second);
    assert_eq!(encoder.bytes_serialized(), 0);
    assert_eq!(encoder.encode(&map).unwrap(), 4);
    assert_eq!(second[..4], [0xa1, 0x61, b'a', 0x01]);
}

#[test]
fn exact_scalar_bytes() {
    assert_eq!(single("b", true), [0xa1, 0x61, b'b', 0xf5]);
    assert_eq!(single("u", 200u8), [0xa1, 0x61, b'u', 0x18, 0xc8]);
    assert_eq!(single("i", -5i8), [0xa1, 0x61, b'i', 0x24]);
    assert_eq!(single("i", 5i16), [0xa1, 0x61, b'i', 0x19, 0x00, 0x05]);
    assert_eq!(single("i", -1i32), [0xa1, 0x61, b'i', 0x3a, 0, 0, 0, 0]);
    assert_eq!(
        single("f", 1.5f32),
        [0xa1, 0x61, b'f', 0xfa, 0x3f, 0xc0, 0x00, 0x00]
    );
    assert_eq!(single("s", "hi"), [0xa1, 0x61, b's', 0x62, b'h', b'i']);
}

#[test]
fn every_scalar_round_trips() {
    let map = ArgMap::new();
    map.set("bool", true);
    map.set("false", false);
    map.set("i8", -100i8);
    map.set("i16", -30000i16);
    map.set("i32", -2000000000i32);
    map.set("i64", -9000000000000000000i64);
    map.set("u8", 255u8);
    map.set("u16", 65535u16);
    map.set("u32", 4000000000u32);
    map.set("u64", u64::MAX);
    map.set("f32", 1.25f32);
    map.set("f64", -2.5e-300);
    map.set("str", "hello world");
    map.set("empty", "");

    let decoded = round_trip(&map);
    assert_eq!(decoded.len(), map.len());
    for (key, value) in &map {
        assert_eq!(decoded.get_variant(&key), Some(value), "{key}");
    }
}

#[test]
fn non_negative_signed_decode_unsigned() {
    let map = ArgMap::new();
    map.set("i16", 300i16);
    map.set("i32", 1234);
    map.set("i64", 0i64);

    let decoded = round_trip(&map);
    let tag = |key: &str| decoded.get_variant(key).map(|v| v.type_tag());
    assert_eq!(tag("i16"), Some(VariantType::UInt16));
    assert_eq!(tag("i32"), Some(VariantType::UInt32));
    assert_eq!(tag("i64"), Some(VariantType::UInt64));

    // The values themselves survive
    assert_eq!(decoded.get("i16", 0i16), 300);
    assert_eq!(decoded.get("i32", 0), 1234);
    assert_eq!(decoded.get("i64", -1i64), 0);
}

#[test]
fn negative_values_widen() {
    // A one-byte argument holding -256 does not fit an i8
    let bytes = [0xa1, 0x61, b'n', 0x38, 0xff];
    let decoded = ArgMap::from_slice(&bytes);
    assert_eq!(decoded.get_variant("n"), Some(Variant::Int16(-256)));

    let bytes = [0xa1, 0x61, b'n', 0x39, 0x03, 0xe7];
    let decoded = ArgMap::from_slice(&bytes);
    assert_eq!(decoded.get_variant("n"), Some(Variant::Int16(-1000)));

    // Beyond i64 the value becomes a float
    let bytes = [
        0xa1, 0x61, b'n', 0x3b, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    ];
    let decoded = ArgMap::from_slice(&bytes);
    assert_eq!(
        decoded.get_variant("n").map(|v| v.type_tag()),
        Some(VariantType::Float64)
    );
    assert_eq!(decoded.get("n", 0.0), -18446744073709551616.0);
}

#[test]
fn times_round_trip() {
    let t = Timestamp::from_millis(1125);
    assert_eq!(
        single("t", t),
        [
            0xa1, 0x61, b't', 0xd9, 0x03, 0xe9, 0xa2, 0x01, 0x01, 0x28, 0x1a, 0x07, 0x73, 0x59,
            0x40
        ]
    );

    let map = ArgMap::new();
    map.set("t", t);
    map.set("now", Timestamp::now());
    map.set("d", Duration::from_millis(-1500));
    map.set("zero", Duration::ZERO);

    let decoded = round_trip(&map);
    assert_eq!(decoded.get_variant("t"), Some(Variant::Timestamp(t)));
    assert_eq!(decoded.get_variant("now"), map.get_variant("now"));
    assert_eq!(
        decoded.get_variant("d"),
        Some(Variant::Duration(Duration::from_millis(-1500)))
    );
    assert_eq!(decoded.get("zero", Duration::from_secs(1)), Duration::ZERO);
}

#[test]
fn extreme_times_round_trip() {
    let map = ArgMap::new();
    map.set("min", Timestamp::from_nanos(i64::MIN));
    map.set("max", Timestamp::from_nanos(i64::MAX));
    map.set("d", Duration::from_nanos(i64::MIN + 1));

    let decoded = round_trip(&map);
    assert_eq!(
        decoded.get_variant("min"),
        Some(Variant::Timestamp(Timestamp::from_nanos(i64::MIN)))
    );
    assert_eq!(
        decoded.get_variant("max"),
        Some(Variant::Timestamp(Timestamp::from_nanos(i64::MAX)))
    );
    assert_eq!(
        decoded.get_variant("d"),
        Some(Variant::Duration(Duration::from_nanos(i64::MIN + 1)))
    );
}

#[test]
fn time_maps_tolerate_odd_keys() {
    // {"t": 1001({5: "x", 1: 2})}
    let unknown_key = [
        0xa1, 0x61, b't', 0xd9, 0x03, 0xe9, 0xa2, 0x05, 0x61, b'x', 0x01, 0x02,
    ];
    assert_eq!(
        ArgMap::from_slice(&unknown_key).get_variant("t"),
        Some(Variant::Timestamp(Timestamp::from_secs(2)))
    );

    // {"t": 1001({-9: 125000000})}, seconds missing
    let nanos_only = [
        0xa1, 0x61, b't', 0xd9, 0x03, 0xe9, 0xa1, 0x28, 0x1a, 0x07, 0x73, 0x59, 0x40,
    ];
    assert_eq!(
        ArgMap::from_slice(&nanos_only).get_variant("t"),
        Some(Variant::Timestamp(Timestamp::from_millis(125)))
    );
}

#[test]
fn time_vectors() {
    let stamps = vec![
        Timestamp::from_secs(0),
        Timestamp::from_millis(1125),
        Timestamp::from_millis(-1),
    ];
    let durations = vec![Duration::from_secs(3), Duration::from_millis(250)];
    let map = ArgMap::new();
    map.set("stamps", stamps.clone());
    map.set("durations", durations.clone());

    let decoded = round_trip(&map);
    assert_eq!(decoded.get("stamps", Vec::<Timestamp>::new()), stamps);
    assert_eq!(decoded.get("durations", Vec::<Duration>::new()), durations);
}

#[test]
fn bool_and_string_vectors() {
    let bools = vec![true, false, false, true];
    assert_eq!(
        single("b", bools.clone()),
        [0xa1, 0x61, b'b', 0xd8, 0x29, 0x84, 0xf5, 0xf4, 0xf4, 0xf5]
    );

    let map = ArgMap::new();
    map.set("b", bools.clone());
    map.set("s", vec!["a".to_owned(), String::new(), "ccc".to_owned()]);

    let decoded = round_trip(&map);
    assert_eq!(decoded.get("b", Vec::<bool>::new()), bools);
    assert_eq!(decoded.get("s", Vec::<String>::new()), ["a", "", "ccc"]);
    assert_eq!(decoded.get("b", -1i16), -1);
}

#[test]
fn typed_vectors_round_trip() {
    let map = ArgMap::new();
    map.set("u8", vec![1u8, 2, 255]);
    map.set("u16", vec![1u16, 65535]);
    map.set("u32", vec![7u32, 4000000000]);
    map.set("u64", vec![u64::MAX, 0]);
    map.set("i8", vec![-128i8, 127]);
    map.set("i16", vec![-2i16, 300]);
    map.set("i32", vec![i32::MIN, 0, i32::MAX]);
    map.set("i64", vec![-1i64]);
    map.set("f32", vec![1.5f32, -0.25]);
    map.set("f64", vec![1e300, -2.5]);
    map.set("empty", Vec::<f64>::new());

    let decoded = round_trip(&map);
    for (key, value) in &map {
        assert_eq!(decoded.get_variant(&key), Some(value), "{key}");
    }
}

#[test]
fn typed_vector_bytes() {
    // Tag 77 marks little-endian int16
    assert_eq!(
        single("v", vec![1i16, -2]),
        [0xa1, 0x61, b'v', 0xd8, 0x4d, 0x44, 0x01, 0x00, 0xfe, 0xff]
    );
    // Tag 64 marks uint8
    assert_eq!(
        single("v", vec![1u8, 2]),
        [0xa1, 0x61, b'v', 0xd8, 0x40, 0x42, 0x01, 0x02]
    );
}

#[test]
fn typed_vector_partial_element_is_dropped() {
    // {"v": 69(h'010002')}, uint16 with one stray byte
    let bytes = [0xa1, 0x61, b'v', 0xd8, 0x45, 0x43, 0x01, 0x00, 0x02];
    let mut decoder = Decoder::new(&bytes);
    let decoded = decoder.decode();
    assert!(decoder.error().is_none());
    assert_eq!(decoded.get("v", Vec::<u16>::new()), vec![1u16]);
}

#[test]
fn homogeneous_array_of_unsupported_items_is_skipped() {
    // {"h": 41([1, 2]), "z": 7}
    let bytes = [
        0xa2, 0x61, b'h', 0xd8, 0x29, 0x82, 0x01, 0x02, 0x61, b'z', 0x07,
    ];
    let mut decoder = Decoder::new(&bytes);
    let decoded = decoder.decode();
    assert!(decoder.error().is_none());
    assert!(!decoded.contains_key("h"));
    assert_eq!(decoded.get("z", 0), 7);
    assert_eq!(decoder.position(), bytes.len());
}

#[test]
fn decoded_vectors_are_independent() {
    let shared = SharedVec::new(vec![1i32, 2]);
    let map = ArgMap::new();
    map.set("v", shared.clone());

    let decoded = round_trip(&map);
    let copy = decoded.get("v", SharedVec::<i32>::default());
    assert!(!copy.ptr_eq(&shared));
    copy.borrow_mut().push(3);
    assert_eq!(shared.len(), 2);
}

#[test]
fn child_maps_and_lists() {
    let map = ArgMap::new();
    map.set("child|x", 1u8);
    map.set("child|name", "inner");
    map.set("list|0", 1u8);
    map.set("list|1", "two");
    map.set("list|2|deep", 3.5);
    map.set("nested", ArgList::from_iter([ArgList::from_iter([1u8, 2])]));

    let decoded = round_trip(&map);
    assert_eq!(decoded.get("child|x", 0), 1);
    assert_eq!(decoded.get_str("child|name", ""), "inner");
    assert_eq!(decoded.get("list", ArgList::new()).len(), 3);
    assert_eq!(decoded.get("list|0", 0), 1);
    assert_eq!(decoded.get_str("list|1", ""), "two");
    assert_eq!(decoded.get("list|2|deep", 0.0), 3.5);
    assert_eq!(decoded.get("nested|0|1", 0), 2);
    assert_eq!(decoded, map);
}

#[test]
fn null_entries_are_skipped() {
    let map = ArgMap::new();
    map.set("a", 1u8);
    map.set("gone", Variant::Null);
    assert_eq!(map.to_vec(), [0xa1, 0x61, b'a', 0x01]);

    // Wire nulls in maps are dropped, in lists kept
    let bytes = [0xa2, 0x61, b'a', 0xf6, 0x61, b'l', 0x82, 0xf6, 0x01];
    let decoded = ArgMap::from_slice(&bytes);
    assert!(!decoded.contains_key("a"));
    let list = decoded.get("l", ArgList::new());
    assert_eq!(list.len(), 2);
    assert!(list.get_variant(0).is_none());
}

#[test]
fn complex_values_write_placeholder() {
    let map = ArgMap::new();
    map.set("c", Complex32::new(1.0, 2.0));
    map.set("cv", vec![Complex32::new(1.0, 2.0)]);

    let decoded = round_trip(&map);
    assert_eq!(decoded.get_str("c", ""), "Error");
    assert_eq!(decoded.get_str("cv", ""), "Error");
}

#[test]
fn null_terminated_strings() {
    let map = ArgMap::from([("s", "hi")]);
    let config = CodecConfig {
        null_terminate: true,
    };
    let bytes = map.to_vec_with(config);
    assert_eq!(bytes, [0xa1, 0x62, b's', 0, 0x63, b'h', b'i', 0]);
    assert_eq!(map.encoded_len_with(config), bytes.len());

    let decoded = ArgMap::from_slice(&bytes);
    assert_eq!(decoded.get_str("s", ""), "hi");
    assert!(decoded.contains_key("s"));
}

#[test]
fn malformed_input_degrades() {
    // Root item that is not a map
    let mut decoder = Decoder::new(&[0x01]);
    assert!(decoder.decode().is_empty());
    assert!(decoder.error().is_none());

    // Truncated input keeps the entries read before the cut
    let bytes = [0xa2, 0x61, b'a', 0x01, 0x61, b'b', 0x19, 0x04];
    let mut decoder = Decoder::new(&bytes);
    let decoded = decoder.decode();
    assert_eq!(decoded.get("a", 0), 1);
    assert!(!decoded.contains_key("b"));
    assert!(matches!(decoder.error(), Some(Error::EndOfFile)));

    // Reserved additional info
    let mut decoder = Decoder::new(&[0xa1, 0x61, b'a', 0x1c]);
    assert!(decoder.decode().is_empty());
    assert!(matches!(decoder.error(), Some(Error::InvalidHeader(0x1c))));

    // Empty input
    let mut decoder = Decoder::new(&[]);
    assert!(decoder.decode().is_empty());
    assert!(matches!(decoder.error(), Some(Error::EndOfFile)));
}

#[test]
fn unusual_keys_and_items() {
    // An integer key is skipped with its value; undefined decodes as null
    let bytes = [0xa3, 0x01, 0x02, 0x61, b'u', 0xf7, 0x61, b'x', 0xf0];
    let decoded = ArgMap::from_slice(&bytes);
    assert_eq!(decoded.len(), 1);
    assert_eq!(decoded.get_str("x", ""), "Error");

    // An empty homogeneous array has no element type
    let bytes = [0xa1, 0x61, b'e', 0xd8, 0x29, 0x80];
    assert!(ArgMap::from_slice(&bytes).is_empty());
}

#[test]
fn decoder_restart() {
    let bytes = ArgMap::from([("a", 1u8)]).to_vec();
    let other = ArgMap::from([("b", 2u8)]).to_vec();
    let mut decoder = Decoder::new(&bytes);
    assert_eq!(decoder.decode().get("a", 0), 1);
    assert_eq!(decoder.position(), bytes.len());

    decoder.restart();
    assert_eq!(decoder.position(), 0);
    assert_eq!(decoder.decode().get("a", 0), 1);

    decoder.init_buffer(&other);
    assert_eq!(decoder.decode().get("b", 0), 2);
}

#[test]
fn deep_nesting_is_bounded() {
    let root = ArgMap::new();
    let mut current = root.clone();
    for _ in 0..300 {
        let child = ArgMap::new();
        current.set("c", &child);
        current = child;
    }
    current.set("leaf", 1);

    // The encoder cuts the tree with a null, which the decoder drops
    let decoded = round_trip(&root);
    let mut depth = 0;
    let mut node = decoded;
    while let Some(child) = node.get_variant("c") {
        node = child.as_map().cloned().unwrap();
        depth += 1;
    }
    assert!(depth < 300);
    assert!(!node.contains_key("leaf"));
}

#[test]
fn writers_and_bytes() {
    let map = ArgMap::from([("name", "Glenn")]);
    let mut out = Vec::new();
    map.write_to(&mut out).unwrap();
    assert_eq!(out, map.to_vec());
    assert_eq!(map.to_bytes().as_ref(), out.as_slice());
}
